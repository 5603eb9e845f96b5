//! Frame scheduler
//!
//! Queues "run before the next repaint" callbacks and flushes them once per
//! frame. Hosts drive [`AnimationScheduler::tick`] from their event loop;
//! tests drive a [`ManualClock`]-backed scheduler through virtual time.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::time::Instant;

new_key_type! {
    pub struct FrameRequestId;
}

/// Callback invoked with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// The frame-scheduling primitive animations are driven by
pub trait FrameScheduler {
    /// Run `callback` once, on the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Withdraw a pending request. Returns false if it already ran or was cancelled.
    fn cancel_frame(&self, id: FrameRequestId) -> bool;
}

/// Source of frame timestamps
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock, measured from its creation
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Virtual clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn advance(&self, dt_ms: f64) {
        self.now.set(self.now.get() + dt_ms);
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

struct PendingFrame {
    seq: u64,
    callback: FrameCallback,
}

/// The frame scheduler that flushes queued callbacks once per tick
pub struct AnimationScheduler<C: Clock = SystemClock> {
    clock: C,
    frames: RefCell<SlotMap<FrameRequestId, PendingFrame>>,
    next_seq: Cell<u64>,
    last_frame: Cell<Option<f64>>,
    frame_count: Cell<u64>,
}

impl AnimationScheduler<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for AnimationScheduler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> AnimationScheduler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            frames: RefCell::new(SlotMap::with_key()),
            next_seq: Cell::new(0),
            last_frame: Cell::new(None),
            frame_count: Cell::new(0),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run every callback that was pending when the tick began.
    ///
    /// Callbacks are invoked in request order with a single timestamp.
    /// Requests made while the tick runs wait for the next tick. Returns the
    /// number of callbacks invoked.
    pub fn tick(&self) -> usize {
        let now = self.clock.now_ms();
        let dt = self.last_frame.replace(Some(now)).map(|last| now - last);
        self.frame_count.set(self.frame_count.get() + 1);

        let mut due: SmallVec<[(u64, FrameRequestId); 8]> = self
            .frames
            .borrow()
            .iter()
            .map(|(id, frame)| (frame.seq, id))
            .collect();
        due.sort_unstable_by_key(|(seq, _)| *seq);

        tracing::trace!(
            "AnimationScheduler::tick now={:.2}ms dt={:?} due={}",
            now,
            dt,
            due.len()
        );

        let mut ran = 0;
        for (_, id) in due {
            // Earlier callbacks in this batch may have cancelled this one
            let frame = self.frames.borrow_mut().remove(id);
            if let Some(frame) = frame {
                (frame.callback)(now);
                ran += 1;
            }
        }
        ran
    }

    /// Number of frame requests waiting for the next tick
    pub fn pending_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn has_pending_frames(&self) -> bool {
        self.pending_count() > 0
    }

    /// Number of ticks run so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count.get()
    }
}

impl AnimationScheduler<ManualClock> {
    /// Scheduler on a virtual clock starting at zero
    pub fn manual() -> Self {
        Self::with_clock(ManualClock::new())
    }

    /// Move virtual time forward by `dt_ms`, then tick
    pub fn advance(&self, dt_ms: f64) -> usize {
        self.clock.advance(dt_ms);
        self.tick()
    }

    /// Tick every `frame_ms` until nothing is pending or `max_frames` ticks ran.
    ///
    /// The first tick happens at the current time. Returns the number of ticks.
    pub fn run_until_idle(&self, frame_ms: f64, max_frames: usize) -> usize {
        let mut ticks = 0;
        while self.has_pending_frames() && ticks < max_frames {
            if ticks > 0 {
                self.clock.advance(frame_ms);
            }
            self.tick();
            ticks += 1;
        }
        ticks
    }
}

impl<C: Clock> FrameScheduler for AnimationScheduler<C> {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.frames
            .borrow_mut()
            .insert(PendingFrame { seq, callback })
    }

    fn cancel_frame(&self, id: FrameRequestId) -> bool {
        // Drop the callback after releasing the queue
        let removed = self.frames.borrow_mut().remove(id);
        removed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_callbacks_run_in_request_order_with_tick_timestamp() {
        let scheduler = AnimationScheduler::with_clock(ManualClock::starting_at(1000.0));
        let log = Rc::new(RefCell::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let log = log.clone();
            scheduler.request_frame(Box::new(move |ts| log.borrow_mut().push((label, ts))));
        }

        assert_eq!(scheduler.pending_count(), 3);
        assert_eq!(scheduler.advance(16.0), 3);
        assert_eq!(
            *log.borrow(),
            vec![("a", 1016.0), ("b", 1016.0), ("c", 1016.0)]
        );
        assert!(!scheduler.has_pending_frames());
    }

    #[test]
    fn test_request_during_tick_waits_for_next_tick() {
        let scheduler = Rc::new(AnimationScheduler::manual());
        let hits = Rc::new(Cell::new(0));

        let inner_scheduler = scheduler.clone();
        let inner_hits = hits.clone();
        scheduler.request_frame(Box::new(move |_| {
            inner_hits.set(inner_hits.get() + 1);
            let hits = inner_hits.clone();
            inner_scheduler.request_frame(Box::new(move |_| hits.set(hits.get() + 10)));
        }));

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending_count(), 1);

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn test_cancelled_frame_never_runs() {
        let scheduler = AnimationScheduler::manual();
        let ran = Rc::new(Cell::new(false));

        let flag = ran.clone();
        let id = scheduler.request_frame(Box::new(move |_| flag.set(true)));
        assert!(scheduler.cancel_frame(id));
        assert!(!scheduler.cancel_frame(id));

        assert_eq!(scheduler.advance(16.0), 0);
        assert!(!ran.get());
    }

    #[test]
    fn test_cancel_within_same_batch() {
        let scheduler = Rc::new(AnimationScheduler::manual());
        let ran = Rc::new(Cell::new(false));
        let victim: Rc<Cell<Option<FrameRequestId>>> = Rc::new(Cell::new(None));

        let canceller = scheduler.clone();
        let target = victim.clone();
        scheduler.request_frame(Box::new(move |_| {
            if let Some(id) = target.get() {
                canceller.cancel_frame(id);
            }
        }));
        let flag = ran.clone();
        victim.set(Some(
            scheduler.request_frame(Box::new(move |_| flag.set(true))),
        ));

        assert_eq!(scheduler.tick(), 1);
        assert!(!ran.get());
    }

    #[test]
    fn test_run_until_idle_respects_frame_limit() {
        let scheduler = Rc::new(AnimationScheduler::manual());

        fn reschedule(scheduler: Rc<AnimationScheduler<ManualClock>>) {
            let next = scheduler.clone();
            scheduler.request_frame(Box::new(move |_| reschedule(next)));
        }
        reschedule(scheduler.clone());

        assert_eq!(scheduler.run_until_idle(10.0, 5), 5);
        assert_eq!(scheduler.clock().now_ms(), 40.0);
        assert_eq!(scheduler.frame_count(), 5);
        assert!(scheduler.has_pending_frames());
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
