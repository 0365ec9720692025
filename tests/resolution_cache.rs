use std::time::{Duration, Instant};

use kiosk_player::window::{
    ResolveOptions, WindowHandle, WindowQuery, WindowResolver, WindowRole,
};

use fake_control::FakeControl;

fn ui() -> WindowQuery {
    WindowQuery::Title("KioskUI".into())
}

fn player() -> WindowQuery {
    WindowQuery::Class("mpv".into())
}

fn resolver(ttl: Duration) -> WindowResolver {
    WindowResolver::new(ui(), player(), ttl)
}

#[test]
fn second_resolve_within_ttl_hits_the_cache() {
    let mut control = FakeControl::default().with_window(ui(), WindowHandle(11));
    let mut resolver = resolver(Duration::from_secs(5));

    let first = resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::default());
    let second = resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::default());

    assert_eq!(first, Some(WindowHandle(11)));
    assert_eq!(second, first);
    assert_eq!(control.finds(&ui()), 1);
}

#[test]
fn forced_refresh_always_looks_up() {
    let mut control = FakeControl::default().with_window(ui(), WindowHandle(11));
    let mut resolver = resolver(Duration::from_secs(5));

    resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::default());
    resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::forced());
    resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::forced());

    assert_eq!(control.finds(&ui()), 3);
}

#[test]
fn invalidate_forces_a_fresh_lookup() {
    let mut control = FakeControl::default().with_window(player(), WindowHandle(7));
    let mut resolver = resolver(Duration::from_secs(5));

    resolver.resolve(&mut control, WindowRole::PlayerWindow, ResolveOptions::default());
    resolver.invalidate();
    assert!(resolver.cached(WindowRole::PlayerWindow).is_none());
    resolver.resolve(&mut control, WindowRole::PlayerWindow, ResolveOptions::default());

    assert_eq!(control.finds(&player()), 2);
}

#[test]
fn expired_entry_is_resolved_again() {
    let mut control = FakeControl::default().with_window(ui(), WindowHandle(11));
    let mut resolver = resolver(Duration::from_millis(20));

    resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::default());
    std::thread::sleep(Duration::from_millis(30));
    resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::default());

    assert_eq!(control.finds(&ui()), 2);
}

#[test]
fn failed_lookup_keeps_the_stale_entry() {
    let mut control = FakeControl::default().script(ui(), vec![Some(WindowHandle(11)), None]);
    let mut resolver = resolver(Duration::from_secs(5));

    resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::default());
    let forced = resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::forced());
    assert_eq!(forced, None);

    let entry = resolver.cached(WindowRole::UiWindow).expect("entry kept");
    assert_eq!(entry.handle, WindowHandle(11));
    assert_eq!(
        resolver.resolve(&mut control, WindowRole::UiWindow, ResolveOptions::default()),
        Some(WindowHandle(11))
    );
    assert_eq!(control.finds(&ui()), 2);
}

#[test]
fn retries_stop_at_first_success_and_space_attempts() {
    let mut control = FakeControl::default().script(
        player(),
        vec![None, None, Some(WindowHandle(9)), Some(WindowHandle(10))],
    );
    let mut resolver = resolver(Duration::from_secs(5));
    let started = Instant::now();

    let found = resolver.resolve(
        &mut control,
        WindowRole::PlayerWindow,
        ResolveOptions::forced_with_retries(5, Duration::from_millis(10)),
    );

    assert_eq!(found, Some(WindowHandle(9)));
    assert_eq!(control.finds(&player()), 3);
    assert!(started.elapsed() >= Duration::from_millis(20));
    assert_eq!(
        resolver.cached(WindowRole::PlayerWindow).map(|e| e.handle),
        Some(WindowHandle(9))
    );
}

#[test]
fn exhausted_retries_return_none() {
    let mut control = FakeControl::default();
    let mut resolver = resolver(Duration::from_secs(5));

    let found = resolver.resolve(
        &mut control,
        WindowRole::PlayerWindow,
        ResolveOptions::forced_with_retries(4, Duration::ZERO),
    );

    assert_eq!(found, None);
    assert_eq!(control.finds(&player()), 4);
    assert!(resolver.cached(WindowRole::PlayerWindow).is_none());
}
