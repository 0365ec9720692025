//! The choreography for each handover, as ordered step lists.
//!
//! Every geometry or decoration change to the window being shown is issued
//! before that window is mapped, and the window being hidden is out of the
//! way before the shown one is mapped.

use crate::transition::steps::{ChoreographyStep, FailurePolicy, StepAction};
use crate::transition::tuning::ChoreographyTuning;
use crate::window::handle::{Geometry, WindowHandle};
use crate::window::hints::StateFlag;
use crate::window::op::WindowOp;

fn park(handle: WindowHandle, tuning: &ChoreographyTuning) -> WindowOp {
    WindowOp::Move {
        handle,
        x: tuning.offscreen.0,
        y: tuning.offscreen.1,
    }
}

fn set(handle: WindowHandle, flag: StateFlag) -> WindowOp {
    WindowOp::SetState { handle, flag }
}

fn clear(handle: WindowHandle, flag: StateFlag) -> WindowOp {
    WindowOp::ClearState { handle, flag }
}

/// Bring the UI window forward and put the player window away.
pub fn plan_to_ui(
    ui: WindowHandle,
    player: Option<WindowHandle>,
    screen: Geometry,
    tuning: &ChoreographyTuning,
) -> Vec<ChoreographyStep> {
    let mut steps = vec![ChoreographyStep::hide_pointer("hide pointer")];

    if let Some(player) = player {
        steps.push(ChoreographyStep::batch(
            "hide player",
            vec![
                WindowOp::Unmap(player),
                park(player, tuning),
                set(player, StateFlag::Hidden),
                clear(player, StateFlag::Above),
                set(player, StateFlag::Below),
            ],
        ));
    }

    steps.extend([
        ChoreographyStep::op(
            "ui window type",
            WindowOp::SetWindowType {
                handle: ui,
                kind: tuning.ui_window_type,
            },
        )
        .policy(FailurePolicy::Expected),
        ChoreographyStep::strip_decorations(
            "strip ui decorations",
            ui,
            tuning.prepare_decoration_attempts,
        ),
        ChoreographyStep::new(
            "fit ui geometry",
            StepAction::PlaceIfNeeded {
                handle: ui,
                target: screen,
            },
        ),
        ChoreographyStep::batch(
            "maximize ui",
            vec![
                set(ui, StateFlag::MaximizedVert),
                set(ui, StateFlag::MaximizedHorz),
            ],
        )
        .policy(FailurePolicy::Expected),
        ChoreographyStep::settle_for("settle before map", tuning.pre_map_settle()),
        ChoreographyStep::hide_pointer("hide pointer before map"),
        ChoreographyStep::strip_decorations("strip ui decorations before map", ui, 1),
        ChoreographyStep::op("clear ui hidden", clear(ui, StateFlag::Hidden))
            .settle(tuning.brief_wait()),
        ChoreographyStep::op("ui above", set(ui, StateFlag::Above)),
        ChoreographyStep::op("map ui", WindowOp::Map(ui)),
        ChoreographyStep::op("clear ui iconic", clear(ui, StateFlag::Iconic))
            .policy(FailurePolicy::Expected),
        ChoreographyStep::strip_decorations(
            "strip ui decorations after map",
            ui,
            tuning.post_map_decoration_attempts,
        ),
        ChoreographyStep::op("raise ui", WindowOp::Raise(ui)).settle(tuning.raise_gap()),
        ChoreographyStep::op("raise ui again", WindowOp::Raise(ui)),
        ChoreographyStep::hide_pointer("hide pointer after raise"),
        ChoreographyStep::op("focus ui", WindowOp::Activate(ui)),
    ]);
    steps
}

/// Bring the player window forward and put the UI window away.
pub fn plan_to_video(
    ui: Option<WindowHandle>,
    player: WindowHandle,
    screen: Geometry,
    tuning: &ChoreographyTuning,
) -> Vec<ChoreographyStep> {
    let mut steps = vec![
        ChoreographyStep::strip_decorations(
            "pre-strip player decorations",
            player,
            tuning.player_predecoration_attempts,
        ),
        ChoreographyStep::batch(
            "reset player",
            vec![
                WindowOp::Unmap(player),
                park(player, tuning),
                set(player, StateFlag::Hidden),
            ],
        ),
        ChoreographyStep::batch(
            "fit player geometry",
            vec![
                WindowOp::Move {
                    handle: player,
                    x: screen.x,
                    y: screen.y,
                },
                WindowOp::Resize {
                    handle: player,
                    width: screen.width,
                    height: screen.height,
                },
            ],
        ),
        ChoreographyStep::strip_decorations("strip player decorations", player, 1),
        ChoreographyStep::op("clear player below", clear(player, StateFlag::Below))
            .policy(FailurePolicy::Expected),
    ];

    if let Some(ui) = ui {
        steps.push(
            ChoreographyStep::op("ui not above", clear(ui, StateFlag::Above))
                .policy(FailurePolicy::Expected),
        );
        steps.push(ChoreographyStep::batch(
            "hide ui",
            vec![WindowOp::Unmap(ui), park(ui, tuning)],
        ));
    }

    steps.extend([
        ChoreographyStep::settle_for("settle before map", tuning.pre_map_settle()),
        ChoreographyStep::hide_pointer("hide pointer before map"),
        ChoreographyStep::op("clear player hidden", clear(player, StateFlag::Hidden))
            .settle(tuning.brief_wait()),
        ChoreographyStep::op("player above", set(player, StateFlag::Above)),
        ChoreographyStep::op("map player", WindowOp::Map(player)),
        ChoreographyStep::op("clear player iconic", clear(player, StateFlag::Iconic))
            .policy(FailurePolicy::Expected),
        ChoreographyStep::strip_decorations(
            "strip player decorations after map",
            player,
            tuning.player_post_map_decoration_attempts,
        )
        .settle(tuning.brief_wait()),
        ChoreographyStep::op("raise player", WindowOp::Raise(player)),
        ChoreographyStep::strip_decorations("strip player decorations after raise", player, 1),
        ChoreographyStep::hide_pointer("hide pointer after raise"),
        ChoreographyStep::op("focus player", WindowOp::Activate(player)),
    ]);
    steps
}

/// Recovery path: make the UI window visible without the choreography.
pub fn plan_ensure_visible(ui: WindowHandle) -> Vec<ChoreographyStep> {
    vec![
        ChoreographyStep::op("map ui", WindowOp::Map(ui)).policy(FailurePolicy::Abort),
        ChoreographyStep::batch(
            "clear ui hidden",
            vec![clear(ui, StateFlag::Hidden), clear(ui, StateFlag::Iconic)],
        )
        .policy(FailurePolicy::Expected),
        ChoreographyStep::op("ui above", set(ui, StateFlag::Above)),
        ChoreographyStep::op("raise ui", WindowOp::Raise(ui)),
        ChoreographyStep::op("focus ui", WindowOp::Activate(ui)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const UI: WindowHandle = WindowHandle(100);
    const PLAYER: WindowHandle = WindowHandle(200);
    const SCREEN: Geometry = Geometry {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    fn flatten(steps: &[ChoreographyStep]) -> Vec<WindowOp> {
        steps.iter().flat_map(|s| s.action.ops()).collect()
    }

    fn index_of(ops: &[WindowOp], wanted: &WindowOp) -> usize {
        ops.iter()
            .position(|op| op == wanted)
            .unwrap_or_else(|| panic!("{wanted:?} missing from plan"))
    }

    /// Every presentation change to `handle` lands before its map.
    fn presentation_precedes_map(ops: &[WindowOp], handle: WindowHandle) {
        let map = index_of(ops, &WindowOp::Map(handle));
        let last_before = ops[..map]
            .iter()
            .rposition(|op| op.handle() == Some(handle) && op.is_presentation_change())
            .expect("presentation change before map");
        assert!(last_before < map);
        assert!(!ops[map..].iter().any(|op| matches!(
            op,
            WindowOp::Move { handle: h, .. } | WindowOp::Resize { handle: h, .. } if *h == handle
        )));
    }

    #[test]
    fn to_ui_hides_the_player_before_touching_the_ui() {
        let tuning = ChoreographyTuning::immediate();
        let ops = flatten(&plan_to_ui(UI, Some(PLAYER), SCREEN, &tuning));
        let unmap_player = index_of(&ops, &WindowOp::Unmap(PLAYER));
        let first_ui = ops.iter().position(|op| op.handle() == Some(UI)).unwrap();
        assert!(unmap_player < first_ui);
        assert!(!ops.contains(&WindowOp::Map(PLAYER)));
        presentation_precedes_map(&ops, UI);
    }

    #[test]
    fn to_ui_sets_above_before_mapping_and_raises_twice() {
        let tuning = ChoreographyTuning::immediate();
        let ops = flatten(&plan_to_ui(UI, None, SCREEN, &tuning));
        let above = index_of(&ops, &set(UI, StateFlag::Above));
        let map = index_of(&ops, &WindowOp::Map(UI));
        assert!(above < map);
        assert_eq!(ops.iter().filter(|op| **op == WindowOp::Raise(UI)).count(), 2);
        assert_eq!(ops.last(), Some(&WindowOp::Activate(UI)));
        let strips = ops
            .iter()
            .filter(|op| **op == WindowOp::StripDecorations(UI))
            .count() as u32;
        assert_eq!(
            strips,
            tuning.prepare_decoration_attempts + 1 + tuning.post_map_decoration_attempts
        );
    }

    #[test]
    fn to_video_prepares_player_before_hiding_ui() {
        let tuning = ChoreographyTuning::immediate();
        let ops = flatten(&plan_to_video(Some(UI), PLAYER, SCREEN, &tuning));
        let resize = index_of(
            &ops,
            &WindowOp::Resize {
                handle: PLAYER,
                width: 1920,
                height: 1080,
            },
        );
        let unmap_ui = index_of(&ops, &WindowOp::Unmap(UI));
        let map_player = index_of(&ops, &WindowOp::Map(PLAYER));
        assert!(resize < unmap_ui);
        assert!(unmap_ui < map_player);
        assert_eq!(ops[0], WindowOp::StripDecorations(PLAYER));
        assert!(index_of(&ops, &set(PLAYER, StateFlag::Above)) < map_player);
        presentation_precedes_map(&ops, PLAYER);
    }

    #[test]
    fn to_video_without_ui_window_still_shows_player() {
        let tuning = ChoreographyTuning::immediate();
        let ops = flatten(&plan_to_video(None, PLAYER, SCREEN, &tuning));
        assert!(ops.iter().all(|op| op.handle() == Some(PLAYER)));
        assert!(ops.contains(&WindowOp::Map(PLAYER)));
    }

    #[test]
    fn ensure_visible_aborts_only_on_map() {
        let steps = plan_ensure_visible(UI);
        assert_eq!(steps[0].policy, FailurePolicy::Abort);
        assert!(steps[1..].iter().all(|s| s.policy != FailurePolicy::Abort));
    }
}
