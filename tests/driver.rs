use std::time::Duration;

use kiosk_player::driver::PlaybackDriver;
use kiosk_player::transition::{ChoreographyTuning, TransitionDirection, TransitionManager};
use kiosk_player::window::op::OpKind;
use kiosk_player::window::{Geometry, WindowHandle, WindowOp, WindowQuery, WindowResolver};

use fake_control::FakeControl;

const UI: WindowHandle = WindowHandle(21);
const PLAYER: WindowHandle = WindowHandle(42);

fn ui() -> WindowQuery {
    WindowQuery::Title("KioskUI".into())
}

fn player() -> WindowQuery {
    WindowQuery::Class("mpv".into())
}

fn driver() -> PlaybackDriver {
    let mut tuning = ChoreographyTuning::immediate();
    tuning.player_resolve_attempts = 2;
    PlaybackDriver::new(TransitionManager::new(
        WindowResolver::new(ui(), player(), Duration::from_secs(5)),
        tuning,
        Geometry {
            x: 0,
            y: 0,
            width: 1280,
            height: 720,
        },
    ))
}

#[test]
fn switching_to_video_hides_the_ui() {
    let mut control = FakeControl::default()
        .with_window(ui(), UI)
        .with_window(player(), PLAYER);
    let mut driver = driver();
    driver.playback_started();

    assert!(driver.switch_to_video(&mut control));
    assert!(driver.ui_hidden());
    assert!(driver.preserve_player_region());
    assert!(driver.frame_request(true).overlay_visible);

    assert!(driver.switch_to_ui(&mut control));
    assert!(!driver.ui_hidden());
    assert!(!driver.preserve_player_region());
}

#[test]
fn failed_switch_retries_once_then_recovers_the_ui() {
    let mut control = FakeControl::default().with_window(ui(), UI);
    let mut driver = driver();
    driver.playback_started();

    assert!(!driver.switch_to_video(&mut control));

    // two attempts of two lookups each
    assert_eq!(control.finds(&player()), 4);
    assert!(!driver.ui_hidden());
    assert_eq!(control.ops().first(), Some(&WindowOp::Map(UI)));
    assert_eq!(
        driver.transitions().last_completed(),
        TransitionDirection::ToUi
    );
}

#[test]
fn retry_succeeds_when_the_player_appears_late() {
    let mut control = FakeControl::default()
        .with_window(ui(), UI)
        .script(player(), vec![None, None])
        .with_window(player(), PLAYER);
    let mut driver = driver();

    assert!(driver.switch_to_video(&mut control));
    assert!(driver.ui_hidden());
}

#[test]
fn ui_stays_flagged_hidden_when_recovery_fails() {
    let mut control = FakeControl::default()
        .with_window(ui(), UI)
        .with_window(player(), PLAYER);
    let mut driver = driver();
    driver.playback_started();
    assert!(driver.switch_to_video(&mut control));

    // the ui window went away entirely
    let mut empty = FakeControl::default();
    assert!(!driver.switch_to_ui(&mut empty));
    assert!(driver.ui_hidden());
    assert_eq!(empty.mutations(), 0);
}

#[test]
fn map_failure_during_video_fallback_leaves_flags_alone() {
    let mut control = FakeControl::default()
        .with_window(ui(), UI)
        .failing(OpKind::Map);
    let mut driver = driver();

    assert!(!driver.switch_to_video(&mut control));
    assert!(!driver.ui_hidden());
    assert_eq!(
        driver.transitions().last_completed(),
        TransitionDirection::None
    );
}

#[test]
fn latest_request_wins() {
    let mut control = FakeControl::default()
        .with_window(ui(), UI)
        .with_window(player(), PLAYER);
    let mut driver = driver();

    driver.request(TransitionDirection::ToVideo);
    driver.request(TransitionDirection::None);
    driver.request(TransitionDirection::ToUi);
    assert_eq!(driver.pending(), Some(TransitionDirection::ToUi));

    assert_eq!(driver.pump(&mut control), Some(true));
    assert_eq!(driver.pump(&mut control), None);
    assert!(!control.ops().contains(&WindowOp::Map(PLAYER)));
    assert_eq!(
        driver.transitions().last_completed(),
        TransitionDirection::ToUi
    );
}

#[test]
fn stopping_playback_drops_cached_windows() {
    let mut control = FakeControl::default()
        .with_window(ui(), UI)
        .with_window(player(), PLAYER);
    let mut driver = driver();
    driver.playback_started();
    driver.switch_to_video(&mut control);

    driver.playback_stopped();

    assert!(!driver.has_playback());
    assert!(!driver.preserve_player_region());
    assert!(driver
        .transitions()
        .resolver()
        .cached(kiosk_player::window::WindowRole::PlayerWindow)
        .is_none());
}
