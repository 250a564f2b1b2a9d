//! Deadline scheduling for the session timers.
//!
//! A single worker thread sleeps on a deadline heap and reports fires through
//! a callback. Entries are tagged with a session generation; bumping the
//! generation (a new session, or cancellation) makes every older entry inert,
//! so a cancelled session can never tick again and a replaced recurring entry
//! is not re-armed. The consumer applies the same generation filter on
//! receipt, which keeps cancellation observably synchronous even though fires
//! travel through a channel.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKind {
    /// Recurring tick that triggers one cursor nudge.
    Move,
    /// One-shot fire that ends the session.
    Expiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

// Ordered by (deadline, seq) via the derive; the remaining fields never
// decide ordering because seq is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Scheduled {
    deadline: Instant,
    seq: u64,
    kind: TimerKind,
    generation: u64,
    repeat: Option<Duration>,
}

struct Inner {
    heap: Mutex<BinaryHeap<Reverse<Scheduled>>>,
    condvar: Condvar,
    generation: AtomicU64,
    seq: AtomicU64,
    shutdown: AtomicBool,
}

pub struct TimerService {
    inner: Arc<Inner>,
}

impl TimerService {
    /// Start the worker thread. `on_fire` is invoked from that thread for
    /// every live fire; implementations should hand the event off to the
    /// dispatch loop rather than doing work inline.
    pub fn spawn<F>(mut on_fire: F) -> Self
    where
        F: FnMut(TimerFired) + Send + 'static,
    {
        let inner = Arc::new(Inner {
            heap: Mutex::new(BinaryHeap::new()),
            condvar: Condvar::new(),
            generation: AtomicU64::new(0),
            seq: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        });
        let worker = inner.clone();
        thread::spawn(move || run(worker, &mut on_fire));
        Self { inner }
    }

    /// Replace whatever is scheduled with a fresh session: a recurring move
    /// tick every `interval` and a one-shot expiry after `duration`. Returns
    /// the new session generation.
    pub fn begin_session(&self, interval: Duration, duration: Duration) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Instant::now();
        {
            let mut heap = self.inner.heap.lock().unwrap();
            heap.clear();
            heap.push(Reverse(Scheduled {
                deadline: now + interval,
                seq: self.next_seq(),
                kind: TimerKind::Move,
                generation,
                repeat: Some(interval),
            }));
            heap.push(Reverse(Scheduled {
                deadline: now + duration,
                seq: self.next_seq(),
                kind: TimerKind::Expiry,
                generation,
                repeat: None,
            }));
        }
        self.inner.condvar.notify_one();
        generation
    }

    /// Invalidate every scheduled entry. Once this returns, no new fires are
    /// produced for any earlier generation.
    pub fn cancel(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.heap.lock().unwrap().clear();
        self.inner.condvar.notify_one();
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    fn next_seq(&self) -> u64 {
        self.inner.seq.fetch_add(1, Ordering::SeqCst)
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        self.inner.condvar.notify_one();
    }
}

fn run(inner: Arc<Inner>, on_fire: &mut dyn FnMut(TimerFired)) {
    let mut heap = inner.heap.lock().unwrap();
    loop {
        if inner.shutdown.load(Ordering::SeqCst) {
            return;
        }
        let Some(&Reverse(next)) = heap.peek() else {
            heap = inner.condvar.wait(heap).unwrap();
            continue;
        };
        let now = Instant::now();
        if next.deadline > now {
            let wait = next.deadline.saturating_duration_since(now);
            heap = inner.condvar.wait_timeout(heap, wait).unwrap().0;
            continue;
        }
        heap.pop();
        if next.generation != inner.generation.load(Ordering::SeqCst) {
            // Cancelled or replaced; drop without firing or re-arming.
            continue;
        }
        if let Some(every) = next.repeat {
            heap.push(Reverse(Scheduled {
                deadline: next.deadline + every,
                seq: inner.seq.fetch_add(1, Ordering::SeqCst),
                ..next
            }));
        }
        drop(heap);
        on_fire(TimerFired {
            kind: next.kind,
            generation: next.generation,
        });
        heap = inner.heap.lock().unwrap();
    }
}
