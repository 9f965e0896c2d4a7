//! Timer-driven animations.
//!
//! An [`Animation`] interpolates a normalized progress value over a duration
//! and hands it to a per-frame callback. The [`AnimationRunner`] owns running
//! animations until they finish or are stopped; the host frame pump drives it
//! through [`AnimationRunner::step`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//! use trellis_ui::animation::{Animation, AnimationCurve, AnimationRunner};
//!
//! let last = Arc::new(AtomicU32::new(0));
//! let sink = last.clone();
//! let runner = AnimationRunner::new();
//! let handle = runner.start(
//!     Animation::new(Duration::from_millis(200), move |p| {
//!         sink.store(p.to_bits(), Ordering::Relaxed);
//!     })
//!     .curve(AnimationCurve::Linear),
//! );
//!
//! runner.step(0.1);
//! assert_eq!(f32::from_bits(last.load(Ordering::Relaxed)), 0.5);
//! runner.step(0.1);
//! assert!(!runner.is_running(handle));
//! ```

use std::time::Duration;

use parking_lot::Mutex;
use trellis_core::alloc::{HashSet, IndexMap};
use trellis_core::profiling::profile_function;

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationCurve {
    Linear,
    /// Slow start
    EaseIn,
    /// Slow end
    EaseOut,
    /// Slow start and end
    #[default]
    EaseInOut,
}

impl AnimationCurve {
    /// Apply the curve to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            AnimationCurve::Linear => t,
            AnimationCurve::EaseIn => t * t,
            AnimationCurve::EaseOut => t * (2.0 - t),
            AnimationCurve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// How many times an animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatCount {
    #[default]
    Once,
    /// Run this many cycles in total.
    Times(u32),
    Forever,
}

type TickFn = Box<dyn FnMut(f32) + Send>;

/// A timed interpolation with a per-frame callback.
pub struct Animation {
    /// Duration in seconds
    duration: f32,
    curve: AnimationCurve,
    repeat: RepeatCount,
    auto_reverse: bool,
    tick: TickFn,
    /// Elapsed time in seconds
    elapsed: f32,
    /// Current direction (1.0 = forward, -1.0 = reverse)
    direction: f32,
    cycles: u32,
}

impl Animation {
    pub fn new(duration: Duration, tick: impl FnMut(f32) + Send + 'static) -> Self {
        Animation {
            duration: duration.as_secs_f32(),
            curve: AnimationCurve::default(),
            repeat: RepeatCount::Once,
            auto_reverse: false,
            tick: Box::new(tick),
            elapsed: 0.0,
            direction: 1.0,
            cycles: 0,
        }
    }

    pub fn curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn repeat(mut self, repeat: RepeatCount) -> Self {
        self.repeat = repeat;
        self
    }

    /// Play each cycle forward then backward.
    pub fn auto_reverse(mut self, auto_reverse: bool) -> Self {
        self.auto_reverse = auto_reverse;
        self
    }

    /// Eased progress at the current elapsed time.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.curve.apply(self.elapsed / self.duration)
    }

    /// Advance by `delta_time` seconds and invoke the callback.
    ///
    /// Returns true if the animation is still running.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.duration <= 0.0 {
            (self.tick)(1.0);
            return false;
        }

        self.elapsed += delta_time.max(0.0) * self.direction;

        let mut running = true;
        if self.direction > 0.0 && self.elapsed >= self.duration {
            if self.auto_reverse {
                self.direction = -1.0;
                self.elapsed = self.duration;
            } else {
                running = self.finish_cycle();
            }
        } else if self.direction < 0.0 && self.elapsed <= 0.0 {
            running = self.finish_cycle();
        }

        let progress = self.progress();
        (self.tick)(progress);
        running
    }

    fn finish_cycle(&mut self) -> bool {
        self.cycles += 1;
        let more = match self.repeat {
            RepeatCount::Once => false,
            RepeatCount::Times(n) => self.cycles < n,
            RepeatCount::Forever => true,
        };
        if more {
            self.elapsed = 0.0;
            self.direction = 1.0;
        } else if self.auto_reverse {
            self.elapsed = 0.0;
        } else {
            self.elapsed = self.duration;
        }
        more
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("duration", &self.duration)
            .field("curve", &self.curve)
            .field("repeat", &self.repeat)
            .field("auto_reverse", &self.auto_reverse)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

/// Identifies a started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

#[derive(Default)]
struct RunnerState {
    next: u64,
    animations: IndexMap<u64, Animation>,
    /// Animations taken out of the map by an in-progress step.
    in_flight: HashSet<u64>,
    /// In-flight animations stopped before the step finished.
    cancelled: HashSet<u64>,
}

/// Owns running animations and advances them once per frame.
///
/// Callbacks run without the runner lock held, so they may start or stop
/// animations themselves.
#[derive(Default)]
pub struct AnimationRunner {
    state: Mutex<RunnerState>,
}

impl AnimationRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, animation: Animation) -> AnimationHandle {
        let mut state = self.state.lock();
        state.next += 1;
        let id = state.next;
        state.animations.insert(id, animation);
        tracing::trace!("Started animation {}", id);
        AnimationHandle(id)
    }

    /// Stop an animation. It will not be ticked again.
    ///
    /// Returns false if it had already finished or been stopped.
    pub fn stop(&self, handle: AnimationHandle) -> bool {
        let mut state = self.state.lock();
        if state.animations.shift_remove(&handle.0).is_some() {
            return true;
        }
        if state.in_flight.contains(&handle.0) {
            return state.cancelled.insert(handle.0);
        }
        false
    }

    pub fn is_running(&self, handle: AnimationHandle) -> bool {
        let state = self.state.lock();
        state.animations.contains_key(&handle.0)
            || (state.in_flight.contains(&handle.0) && !state.cancelled.contains(&handle.0))
    }

    /// Advance every running animation by `delta_time` seconds.
    pub fn step(&self, delta_time: f32) {
        profile_function!();
        let batch = {
            let mut state = self.state.lock();
            let batch = std::mem::take(&mut state.animations);
            state.in_flight = batch.keys().copied().collect();
            batch
        };
        if batch.is_empty() {
            return;
        }

        let mut still_running = Vec::with_capacity(batch.len());
        for (id, mut animation) in batch {
            if self.state.lock().cancelled.contains(&id) {
                continue;
            }
            if animation.update(delta_time) {
                still_running.push((id, animation));
            } else {
                tracing::trace!("Animation {} finished", id);
            }
        }

        let mut state = self.state.lock();
        let started_during_step = std::mem::take(&mut state.animations);
        for (id, animation) in still_running {
            if !state.cancelled.contains(&id) {
                state.animations.insert(id, animation);
            }
        }
        state.animations.extend(started_during_step);
        state.in_flight.clear();
        state.cancelled.clear();
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.animations.len() + state.in_flight.len() - state.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for AnimationRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationRunner")
            .field("running", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> (Arc<Mutex<Vec<f32>>>, impl FnMut(f32) + Send + 'static) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink = values.clone();
        (values, move |p| sink.lock().push(p))
    }

    #[test]
    fn test_linear_curve() {
        let curve = AnimationCurve::Linear;
        assert_eq!(curve.apply(0.0), 0.0);
        assert_eq!(curve.apply(0.5), 0.5);
        assert_eq!(curve.apply(2.0), 1.0);
    }

    #[test]
    fn test_animation_update() {
        let (values, tick) = recorder();
        let mut anim = Animation::new(Duration::from_secs(1), tick).curve(AnimationCurve::Linear);

        assert!(anim.update(0.5));
        assert!(!anim.update(0.5));
        assert_eq!(*values.lock(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_auto_reverse() {
        let (values, tick) = recorder();
        let mut anim = Animation::new(Duration::from_secs(1), tick)
            .curve(AnimationCurve::Linear)
            .auto_reverse(true);

        assert!(anim.update(1.0));
        assert!(!anim.update(1.0));
        assert_eq!(*values.lock(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_repeat_times() {
        let (_, tick) = recorder();
        let mut anim = Animation::new(Duration::from_secs(1), tick).repeat(RepeatCount::Times(3));
        assert!(anim.update(1.0));
        assert!(anim.update(1.0));
        assert!(!anim.update(1.0));
    }

    #[test]
    fn test_runner_stop() {
        let (values, tick) = recorder();
        let runner = AnimationRunner::new();
        let handle = runner.start(Animation::new(Duration::from_secs(1), tick).repeat(RepeatCount::Forever));

        runner.step(0.25);
        assert!(runner.is_running(handle));
        assert_eq!(runner.len(), 1);

        assert!(runner.stop(handle));
        assert!(!runner.stop(handle));
        runner.step(0.25);
        assert_eq!(values.lock().len(), 1);
        assert!(runner.is_empty());
    }

    #[test]
    fn test_callback_may_start_animations() {
        let runner = Arc::new(AnimationRunner::new());
        let inner = runner.clone();
        runner.start(Animation::new(Duration::from_secs(1), move |p| {
            if p >= 1.0 {
                inner.start(Animation::new(Duration::from_secs(1), |_| {}));
            }
        }));

        runner.step(1.0);
        assert_eq!(runner.len(), 1);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let (values, tick) = recorder();
        let runner = AnimationRunner::new();
        let handle = runner.start(Animation::new(Duration::ZERO, tick));
        runner.step(0.016);
        assert!(!runner.is_running(handle));
        assert_eq!(*values.lock(), vec![1.0]);
    }
}
