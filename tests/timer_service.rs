use stay_awake::timer::{TimerFired, TimerKind, TimerService};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn collecting_service() -> (TimerService, Arc<Mutex<Vec<TimerFired>>>) {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();
    let service = TimerService::spawn(move |f| sink.lock().unwrap().push(f));
    (service, fired)
}

#[test]
fn recurring_ticks_and_one_expiry() {
    let (service, fired) = collecting_service();
    let generation = service.begin_session(Duration::from_millis(30), Duration::from_millis(100));

    thread::sleep(Duration::from_millis(250));
    service.cancel();

    let events = fired.lock().unwrap().clone();
    let moves = events.iter().filter(|f| f.kind == TimerKind::Move).count();
    let expiries = events.iter().filter(|f| f.kind == TimerKind::Expiry).count();
    assert!(moves >= 2, "expected repeated move ticks, got {moves}");
    assert_eq!(expiries, 1, "the expiry must fire exactly once");
    assert!(events.iter().all(|f| f.generation == generation));
}

#[test]
fn expiry_fires_after_the_moves_due_before_it() {
    let (service, fired) = collecting_service();
    service.begin_session(Duration::from_millis(25), Duration::from_millis(80));

    thread::sleep(Duration::from_millis(150));
    service.cancel();

    let events = fired.lock().unwrap().clone();
    let expiry_pos = events.iter().position(|f| f.kind == TimerKind::Expiry);
    let first_move = events.iter().position(|f| f.kind == TimerKind::Move);
    assert!(expiry_pos.is_some());
    assert!(first_move.is_some());
    assert!(first_move < expiry_pos, "ticks due earlier must be delivered earlier");
}

#[test]
fn cancel_stops_all_fires() {
    let (service, fired) = collecting_service();
    service.begin_session(Duration::from_millis(20), Duration::from_secs(10));

    thread::sleep(Duration::from_millis(70));
    service.cancel();

    // Let anything already past the generation check drain out.
    thread::sleep(Duration::from_millis(50));
    let settled = fired.lock().unwrap().len();

    thread::sleep(Duration::from_millis(200));
    let later = fired.lock().unwrap().len();
    assert_eq!(settled, later, "no new fires may be produced after cancel returns");
}

#[test]
fn new_session_invalidates_the_previous_one() {
    let (service, fired) = collecting_service();
    let first = service.begin_session(Duration::from_millis(20), Duration::from_secs(10));
    thread::sleep(Duration::from_millis(60));

    let second = service.begin_session(Duration::from_millis(20), Duration::from_secs(10));
    assert_ne!(first, second);

    // Give the replaced entries time to surface if they were still armed.
    thread::sleep(Duration::from_millis(120));
    service.cancel();
    thread::sleep(Duration::from_millis(50));

    let events = fired.lock().unwrap().clone();
    let trailing_new = events
        .iter()
        .rev()
        .take_while(|f| f.generation != first)
        .count();
    assert!(trailing_new >= 1, "fires from the new session should follow the switch");
    let last = events.last().copied();
    assert_eq!(
        last.map(|f| f.generation),
        Some(second),
        "the most recent fire must belong to the replacement session"
    );
}

#[test]
fn generation_advances_on_every_session_and_cancel() {
    let (service, _fired) = collecting_service();
    let g1 = service.begin_session(Duration::from_secs(5), Duration::from_secs(900));
    service.cancel();
    let g2 = service.begin_session(Duration::from_secs(5), Duration::from_secs(900));
    assert!(g2 > g1);
    assert_eq!(service.generation(), g2);
    service.cancel();
    assert!(service.generation() > g2);
}
