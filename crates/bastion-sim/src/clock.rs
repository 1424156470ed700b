//! Fixed-timestep frame clock.
//!
//! The host calls [`FrameLoop::frame`] once per rendered frame with its wall
//! clock. Elapsed time is clamped, scaled and accumulated; the loop then runs
//! as many whole simulation ticks as the accumulator holds and renders once
//! with the leftover fraction as the interpolation alpha.

use bastion_core::constants::{ACCUMULATOR_EPSILON, FIXED_STEP, MAX_FRAME_DELTA, MAX_TIME_SCALE};

/// Callbacks driven by the frame loop.
pub trait LoopHost {
    /// Advance the simulation by exactly one fixed step.
    fn update(&mut self);

    /// Present committed state. `alpha` is the fraction of a step carried
    /// over in the accumulator, in `[0, 1)`.
    fn render(&mut self, alpha: f64);

    /// Called at the start of every frame with the wall clock, before any
    /// tick runs. Wall-clock timers fire here.
    fn poll(&mut self, _now: f64) {}
}

/// Accumulator of unconsumed simulation time.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    accumulator: f64,
    time_scale: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            time_scale: 1.0,
        }
    }

    /// Feed one frame's wall-clock delta.
    pub fn push(&mut self, delta: f64) {
        let delta = if delta.is_finite() {
            delta.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.accumulator += delta * self.time_scale;
    }

    /// Take one fixed step out of the accumulator if it holds one.
    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator + ACCUMULATOR_EPSILON >= FIXED_STEP {
            self.accumulator -= FIXED_STEP;
            true
        } else {
            false
        }
    }

    pub fn alpha(&self) -> f64 {
        (self.accumulator / FIXED_STEP).clamp(0.0, 1.0)
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the simulation speed multiplier, clamped to `[0, MAX_TIME_SCALE]`.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() {
            scale.clamp(0.0, MAX_TIME_SCALE)
        } else {
            1.0
        };
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame driver around a [`FrameClock`].
#[derive(Debug, Default)]
pub struct FrameLoop {
    clock: FrameClock,
    running: bool,
    last_frame: Option<f64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin measuring from `now` and run the first frame. No-op if running.
    pub fn start<H: LoopHost>(&mut self, now: f64, host: &mut H) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_frame = Some(now);
        self.clock.reset();
        self.frame(now, host);
    }

    /// Stop the loop. Later frames run no ticks and render nothing.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.clock.set_time_scale(scale);
    }

    /// Run one rendered frame at wall-clock time `now` (seconds). Returns the
    /// number of simulation ticks executed.
    pub fn frame<H: LoopHost>(&mut self, now: f64, host: &mut H) -> u32 {
        if !self.running {
            return 0;
        }

        host.poll(now);

        let delta = self.last_frame.map_or(0.0, |last| now - last);
        self.last_frame = Some(now);
        self.clock.push(delta);

        let mut ticks = 0;
        while self.clock.consume_tick() {
            host.update();
            ticks += 1;
        }

        host.render(self.clock.alpha());
        ticks
    }
}
