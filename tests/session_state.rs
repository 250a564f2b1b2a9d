use stay_awake::session::{SessionController, SessionState};
use stay_awake::settings::Settings;
use stay_awake::timer::{TimerFired, TimerKind, TimerService};
use std::sync::mpsc;
use std::time::{Duration, Instant};

fn controller() -> SessionController {
    SessionController::new(TimerService::spawn(|_| {}))
}

#[test]
fn starts_idle_with_start_label() {
    let c = controller();
    assert_eq!(c.state(), SessionState::Idle);
    assert_eq!(c.menu_label(), "Start");
    assert!(!c.glyph_active());
}

#[test]
fn start_sets_running_and_stop_label() {
    let mut c = controller();
    c.start(&Settings::default());
    assert!(c.is_running());
    assert_eq!(c.menu_label(), "Stop");
    assert!(c.glyph_active());
}

#[test]
fn stop_returns_to_idle() {
    let mut c = controller();
    c.start(&Settings::default());
    c.stop();
    assert_eq!(c.state(), SessionState::Idle);
    assert_eq!(c.menu_label(), "Start");
    assert!(!c.glyph_active());
}

#[test]
fn stop_is_idempotent() {
    let mut c = controller();
    c.start(&Settings::default());
    c.stop();
    c.stop();
    assert_eq!(c.state(), SessionState::Idle);
    assert_eq!(c.menu_label(), "Start");
    assert!(!c.glyph_active());

    // stop without ever starting is also harmless
    let mut fresh = controller();
    fresh.stop();
    assert_eq!(fresh.state(), SessionState::Idle);
}

#[test]
fn restart_replaces_timers_with_new_generation() {
    let mut c = controller();
    let settings = Settings::default();
    c.start(&settings);
    let first = c.generation();
    c.start(&settings);
    let second = c.generation();
    assert!(c.is_running());
    assert_ne!(first, second);
    // still exactly one glyph push outstanding
    assert!(c.glyph_active());
    c.stop();
    assert!(!c.glyph_active());
}

#[test]
fn toggle_alternates_between_states() {
    let mut c = controller();
    let settings = Settings::default();
    c.toggle(&settings);
    assert!(c.is_running());
    c.toggle(&settings);
    assert!(!c.is_running());
    c.toggle(&settings);
    assert!(c.is_running());
}

#[test]
fn stale_expiry_is_ignored() {
    let mut c = controller();
    c.start(&Settings::default());
    let live = c.generation();
    c.handle_timer(TimerFired {
        kind: TimerKind::Expiry,
        generation: live.wrapping_sub(1),
    });
    assert!(c.is_running(), "a fire from a replaced session must not stop the new one");
}

#[test]
fn current_expiry_stops_the_session() {
    let mut c = controller();
    c.start(&Settings::default());
    let live = c.generation();
    c.handle_timer(TimerFired {
        kind: TimerKind::Expiry,
        generation: live,
    });
    assert_eq!(c.state(), SessionState::Idle);
    assert_eq!(c.menu_label(), "Start");
    assert!(!c.glyph_active());
}

#[test]
fn timer_fires_while_idle_are_ignored() {
    let mut c = controller();
    c.handle_timer(TimerFired {
        kind: TimerKind::Move,
        generation: 1,
    });
    c.handle_timer(TimerFired {
        kind: TimerKind::Expiry,
        generation: 1,
    });
    assert_eq!(c.state(), SessionState::Idle);
}

#[test]
fn glyph_stays_balanced_across_sequences() {
    let mut c = controller();
    let settings = Settings::default();
    c.start(&settings);
    c.start(&settings);
    c.stop();
    c.stop();
    c.toggle(&settings);
    c.toggle(&settings);
    c.start(&settings);
    c.stop();
    assert_eq!(c.state(), SessionState::Idle);
    assert!(!c.glyph_active(), "every push must be matched by one pop at idle rest");
}

#[test]
fn session_expires_end_to_end() {
    let (tx, rx) = mpsc::channel();
    let timers = TimerService::spawn(move |fired| {
        let _ = tx.send(fired);
    });
    let mut c = SessionController::new(timers);
    c.start_with(Duration::from_millis(30), Duration::from_millis(120));

    let deadline = Instant::now() + Duration::from_secs(2);
    while c.is_running() && Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(fired) => c.handle_timer(fired),
            Err(_) => break,
        }
    }

    assert_eq!(c.state(), SessionState::Idle, "expiry should stop the session");
    assert_eq!(c.menu_label(), "Start");
    assert!(!c.glyph_active());
}

#[test]
fn stop_mid_session_cancels_the_expiry() {
    let (tx, rx) = mpsc::channel();
    let timers = TimerService::spawn(move |fired| {
        let _ = tx.send(fired);
    });
    let mut c = SessionController::new(timers);
    c.start_with(Duration::from_millis(20), Duration::from_millis(10_000));

    std::thread::sleep(Duration::from_millis(70));
    c.stop();

    // Anything already in flight carries a stale generation and is dropped.
    std::thread::sleep(Duration::from_millis(60));
    while let Ok(fired) = rx.try_recv() {
        c.handle_timer(fired);
    }
    assert_eq!(c.state(), SessionState::Idle);

    // After cancellation has settled, no further fires arrive at all.
    std::thread::sleep(Duration::from_millis(150));
    assert!(rx.try_recv().is_err(), "cancelled timers must not keep firing");
}
