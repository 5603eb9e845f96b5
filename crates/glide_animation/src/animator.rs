//! Time-driven property animator
//!
//! An [`Animator`] turns an [`AnimationRequest`] into a loop of frame
//! callbacks on an injected [`FrameScheduler`]. Each run owns its own timing
//! state; the returned [`AnimationHandle`] observes and cancels it.
//!
//! ```ignore
//! let scheduler = Rc::new(AnimationScheduler::new());
//! let animator = Animator::new(scheduler.clone());
//!
//! let handle = animator.animate(
//!     AnimationRequest::new(0.0, 240.0, 300.0, move |h| panel.set_height(h))
//!         .with_easing(Easing::EaseOutQuart)
//!         .on_complete(|| tracing::info!("panel open")),
//! )?;
//!
//! // host event loop
//! scheduler.tick();
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::AnimatorConfig;
use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::scheduler::{FrameRequestId, FrameScheduler};

type FrameFn = Box<dyn FnMut(f64)>;
type CompleteFn = Box<dyn FnOnce()>;

/// Parameters of one timed transition
pub struct AnimationRequest {
    start: f64,
    end: f64,
    duration_ms: f64,
    easing: Option<Easing>,
    on_frame: FrameFn,
    on_complete: Option<CompleteFn>,
}

impl AnimationRequest {
    /// Animate from `start` to `end` over `duration_ms`, feeding each value to `on_frame`
    pub fn new(
        start: f64,
        end: f64,
        duration_ms: f64,
        on_frame: impl FnMut(f64) + 'static,
    ) -> Self {
        Self {
            start,
            end,
            duration_ms,
            easing: None,
            on_frame: Box::new(on_frame),
            on_complete: None,
        }
    }

    /// Builder: set the easing curve (the animator's default otherwise)
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Builder: run `callback` once after the final frame
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn easing(&self) -> Option<Easing> {
        self.easing
    }

    /// Check the request before anything is scheduled
    pub fn validate(&self) -> Result<()> {
        check_params(self.start, self.end, self.duration_ms)
    }
}

pub(crate) fn check_params(start: f64, end: f64, duration_ms: f64) -> Result<()> {
    if !(duration_ms.is_finite() && duration_ms > 0.0) {
        return Err(AnimationError::InvalidDuration(duration_ms));
    }
    if !start.is_finite() {
        return Err(AnimationError::NonFiniteValue {
            field: "start",
            value: start,
        });
    }
    if !end.is_finite() {
        return Err(AnimationError::NonFiniteValue {
            field: "end",
            value: end,
        });
    }
    Ok(())
}

impl fmt::Debug for AnimationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("on_complete", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a single animation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Completed,
    Cancelled,
}

struct AnimationRun {
    start: f64,
    end: f64,
    duration_ms: f64,
    easing: Easing,
    /// Jump straight to the end value on the first frame
    snap: bool,
    origin: Cell<Option<f64>>,
    state: Cell<AnimationState>,
    pending: Cell<Option<FrameRequestId>>,
    on_frame: RefCell<FrameFn>,
    on_complete: RefCell<Option<CompleteFn>>,
    scheduler: Weak<dyn FrameScheduler>,
}

impl AnimationRun {
    fn schedule(self: &Rc<Self>) {
        let Some(scheduler) = self.scheduler.upgrade() else {
            self.abandon();
            return;
        };
        let guard = FrameGuard {
            run: Some(Rc::clone(self)),
        };
        let id = scheduler.request_frame(Box::new(move |timestamp| guard.fire(timestamp)));
        self.pending.set(Some(id));
    }

    /// The pending frame will never run: the scheduler is gone
    fn abandon(&self) {
        self.pending.set(None);
        if self.state.get() != AnimationState::Running {
            return;
        }
        self.state.set(AnimationState::Cancelled);
        let on_complete = self.on_complete.borrow_mut().take();
        drop(on_complete);
        tracing::debug!(
            "Frame scheduler dropped, abandoning animation {} -> {}",
            self.start,
            self.end
        );
    }

    fn frame(self: &Rc<Self>, timestamp: f64) {
        self.pending.set(None);
        if self.state.get() != AnimationState::Running {
            return;
        }

        let origin = match self.origin.get() {
            Some(origin) => origin,
            None => {
                self.origin.set(Some(timestamp));
                timestamp
            }
        };
        let elapsed = (timestamp - origin).clamp(0.0, self.duration_ms);

        if self.snap || elapsed >= self.duration_ms {
            self.finish();
            return;
        }

        let value = self
            .easing
            .value(elapsed, self.start, self.end - self.start, self.duration_ms);
        tracing::trace!("Animation frame elapsed={:.2}ms value={}", elapsed, value);
        (&mut *self.on_frame.borrow_mut())(value);

        // on_frame may have cancelled us
        if self.state.get() == AnimationState::Running {
            self.schedule();
        }
    }

    fn finish(&self) {
        (&mut *self.on_frame.borrow_mut())(self.end);
        if self.state.get() != AnimationState::Running {
            return;
        }
        self.state.set(AnimationState::Completed);
        tracing::debug!(
            "Animation completed {} -> {} over {}ms",
            self.start,
            self.end,
            self.duration_ms
        );

        let on_complete = self.on_complete.borrow_mut().take();
        if let Some(on_complete) = on_complete {
            on_complete();
        }
    }
}

/// Owned by a queued frame callback.
///
/// Dropped without firing means the scheduler discarded the request.
struct FrameGuard {
    run: Option<Rc<AnimationRun>>,
}

impl FrameGuard {
    fn fire(mut self, timestamp: f64) {
        if let Some(run) = self.run.take() {
            run.frame(timestamp);
        }
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.abandon();
        }
    }
}

/// Observes and cancels a running animation.
///
/// Dropping the handle does not stop the animation.
#[derive(Clone)]
pub struct AnimationHandle {
    run: Rc<AnimationRun>,
}

impl AnimationHandle {
    /// Stop the animation before its next frame and drop its completion callback.
    ///
    /// No-op once the animation has completed or was already cancelled.
    pub fn cancel(&self) {
        let run = &self.run;
        if run.state.get() != AnimationState::Running {
            return;
        }
        run.state.set(AnimationState::Cancelled);

        if let Some(id) = run.pending.take() {
            if let Some(scheduler) = run.scheduler.upgrade() {
                scheduler.cancel_frame(id);
            }
        }
        run.on_complete.borrow_mut().take();
        tracing::debug!("Animation cancelled {} -> {}", run.start, run.end);
    }

    pub fn state(&self) -> AnimationState {
        self.run.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == AnimationState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.state() == AnimationState::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == AnimationState::Cancelled
    }
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("start", &self.run.start)
            .field("end", &self.run.end)
            .field("duration_ms", &self.run.duration_ms)
            .field("state", &self.run.state.get())
            .finish()
    }
}

/// Starts animations on a frame scheduler
pub struct Animator {
    scheduler: Rc<dyn FrameScheduler>,
    config: AnimatorConfig,
}

impl Animator {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self::with_config(scheduler, AnimatorConfig::default())
    }

    pub fn with_config(scheduler: Rc<dyn FrameScheduler>, config: AnimatorConfig) -> Self {
        Self { scheduler, config }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Rc<dyn FrameScheduler> {
        &self.scheduler
    }

    /// Validate `request` and schedule its first frame.
    ///
    /// The first frame reports the start value and pins the run's time
    /// origin. The frame where the duration has elapsed reports exactly the
    /// end value, followed by the completion callback.
    pub fn animate(&self, request: AnimationRequest) -> Result<AnimationHandle> {
        request.validate()?;

        let AnimationRequest {
            start,
            end,
            duration_ms,
            easing,
            on_frame,
            on_complete,
        } = request;
        let easing = easing.unwrap_or(self.config.default_easing);

        tracing::debug!(
            "Starting animation {} -> {} over {}ms ({})",
            start,
            end,
            duration_ms,
            easing
        );

        let run = Rc::new(AnimationRun {
            start,
            end,
            duration_ms,
            easing,
            snap: self.config.reduced_motion,
            origin: Cell::new(None),
            state: Cell::new(AnimationState::Running),
            pending: Cell::new(None),
            on_frame: RefCell::new(on_frame),
            on_complete: RefCell::new(on_complete),
            scheduler: Rc::downgrade(&self.scheduler),
        });
        run.schedule();

        Ok(AnimationHandle { run })
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
