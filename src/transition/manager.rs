use crate::transition::plan::{plan_ensure_visible, plan_to_ui, plan_to_video};
use crate::transition::state::{can_transition, TransitionDirection, TransitionState};
use crate::transition::steps::{run_steps, ChoreographyStep};
use crate::transition::tuning::ChoreographyTuning;
use crate::window::control::WindowControl;
use crate::window::handle::{Geometry, WindowHandle, WindowRole};
use crate::window::resolver::{ResolveOptions, WindowResolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    /// Another transition is in flight; nothing was touched.
    Busy,
    /// The window that should be shown could not be found; nothing was
    /// touched.
    Unresolved(WindowRole),
    /// A step with an abort policy failed part way through.
    Aborted(&'static str),
    /// Every step ran but the shown window did not check out afterwards.
    ValidationFailed,
}

impl TransitionOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, TransitionOutcome::Completed)
    }
}

/// Runs the handover protocols between the UI window and the player window.
///
/// Calls block until the whole sequence has run. The manager owns no
/// ambient state; the caller keeps it and must not start a new transition
/// before the previous call returned.
#[derive(Debug)]
pub struct TransitionManager {
    resolver: WindowResolver,
    tuning: ChoreographyTuning,
    screen: Geometry,
    state: TransitionState,
    last_completed: TransitionDirection,
}

impl TransitionManager {
    pub fn new(resolver: WindowResolver, tuning: ChoreographyTuning, screen: Geometry) -> Self {
        Self {
            resolver,
            tuning,
            screen,
            state: TransitionState::Idle,
            last_completed: TransitionDirection::None,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn last_completed(&self) -> TransitionDirection {
        self.last_completed
    }

    /// True when the last completed handover left the player window in front.
    pub fn player_exposed(&self) -> bool {
        self.last_completed == TransitionDirection::ToVideo
    }

    pub fn tuning(&self) -> &ChoreographyTuning {
        &self.tuning
    }

    pub fn screen(&self) -> Geometry {
        self.screen
    }

    pub fn set_screen(&mut self, screen: Geometry) {
        self.screen = screen;
    }

    pub fn resolver(&self) -> &WindowResolver {
        &self.resolver
    }

    /// Forget cached window ids, e.g. after the player process restarted.
    pub fn invalidate(&mut self) {
        self.resolver.invalidate();
    }

    pub fn to_ui(&mut self, control: &mut dyn WindowControl) -> TransitionOutcome {
        if !self.begin(TransitionDirection::ToUi) {
            return TransitionOutcome::Busy;
        }
        let outcome = self.run_to_ui(control);
        self.finish(TransitionDirection::ToUi, &outcome);
        outcome
    }

    pub fn to_video(&mut self, control: &mut dyn WindowControl) -> TransitionOutcome {
        if !self.begin(TransitionDirection::ToVideo) {
            return TransitionOutcome::Busy;
        }
        let outcome = self.run_to_video(control);
        self.finish(TransitionDirection::ToVideo, &outcome);
        outcome
    }

    /// Make the UI window visible without the full choreography.
    pub fn ensure_ui_visible(&mut self, control: &mut dyn WindowControl) -> bool {
        if self.state.is_busy() {
            return false;
        }
        let Some(ui) = self
            .resolver
            .resolve(control, WindowRole::UiWindow, ResolveOptions::forced())
        else {
            tracing::warn!("ensure visible: ui window not found");
            return false;
        };
        let report = run_steps(control, &plan_ensure_visible(ui));
        if report.completed() {
            self.last_completed = TransitionDirection::ToUi;
        }
        report.completed()
    }

    fn begin(&mut self, direction: TransitionDirection) -> bool {
        let next = TransitionState::for_direction(direction);
        if self.state.is_busy() || !can_transition(self.state, next) {
            tracing::warn!(%direction, state = ?self.state, "transition refused while busy");
            return false;
        }
        self.state = next;
        true
    }

    fn finish(&mut self, direction: TransitionDirection, outcome: &TransitionOutcome) {
        self.state = TransitionState::Idle;
        if outcome.succeeded() {
            self.last_completed = direction;
            tracing::info!(%direction, "transition completed");
        } else {
            tracing::warn!(%direction, ?outcome, "transition failed");
        }
    }

    fn run_to_ui(&mut self, control: &mut dyn WindowControl) -> TransitionOutcome {
        let Some(ui) = self
            .resolver
            .resolve(control, WindowRole::UiWindow, ResolveOptions::forced())
        else {
            return TransitionOutcome::Unresolved(WindowRole::UiWindow);
        };
        let player =
            self.resolver
                .resolve(control, WindowRole::PlayerWindow, ResolveOptions::forced());
        let steps = plan_to_ui(ui, player, self.screen, &self.tuning);
        self.execute(control, &steps, WindowRole::UiWindow, ui)
    }

    fn run_to_video(&mut self, control: &mut dyn WindowControl) -> TransitionOutcome {
        let ui = self
            .resolver
            .resolve(control, WindowRole::UiWindow, ResolveOptions::default());
        let Some(player) = self.resolver.resolve(
            control,
            WindowRole::PlayerWindow,
            ResolveOptions::forced_with_retries(
                self.tuning.player_resolve_attempts,
                self.tuning.player_resolve_delay(),
            ),
        ) else {
            return TransitionOutcome::Unresolved(WindowRole::PlayerWindow);
        };
        let steps = plan_to_video(ui, player, self.screen, &self.tuning);
        self.execute(control, &steps, WindowRole::PlayerWindow, player)
    }

    fn execute(
        &mut self,
        control: &mut dyn WindowControl,
        steps: &[ChoreographyStep],
        role: WindowRole,
        handle: WindowHandle,
    ) -> TransitionOutcome {
        let report = run_steps(control, steps);
        if let Some(step) = report.aborted_at {
            return TransitionOutcome::Aborted(step);
        }
        if !report.failed.is_empty() {
            tracing::debug!(failed = ?report.failed, "transition steps reported failures");
        }
        if self.validate(control, role, handle) {
            TransitionOutcome::Completed
        } else {
            TransitionOutcome::ValidationFailed
        }
    }

    /// Re-resolve the shown window and require the same handle. With
    /// `verify_geometry`, its geometry must also equal the screen area.
    fn validate(
        &mut self,
        control: &mut dyn WindowControl,
        role: WindowRole,
        expected: WindowHandle,
    ) -> bool {
        let delay = self.tuning.validation_delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        match self.resolver.resolve(control, role, ResolveOptions::forced()) {
            Some(found) if found == expected => {}
            Some(found) => {
                tracing::warn!(%role, %expected, %found, "window changed during transition");
                return false;
            }
            None => {
                tracing::warn!(%role, %expected, "window vanished during transition");
                return false;
            }
        }
        if self.tuning.verify_geometry {
            let geometry = control.geometry(expected);
            if geometry != Some(self.screen) {
                tracing::warn!(%role, ?geometry, screen = ?self.screen, "geometry mismatch");
                return false;
            }
        }
        true
    }
}
