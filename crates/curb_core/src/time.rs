//! Fixed-timestep frame clock.
//!
//! Wall-clock time is fed into an accumulator and consumed in fixed slices;
//! each slice is one logical tick of the frame scheduler. The slice length is
//! the `dt` every [`FrameInput`](crate::frame::FrameInput) carries, so gravity
//! integration never sees a variable step.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;
const DEFAULT_TICK_RATE: f64 = 60.0;
const DEFAULT_MAX_ACCUMULATOR: f64 = 0.25;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub tick_count: u64,
    pub frame_count: u64,
    pub ticks_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK_RATE)
    }

    pub fn with_tick_rate(ticks_per_second: f64) -> Self {
        let fixed_dt = 1.0 / ticks_per_second.max(1.0);
        Self {
            fixed_dt,
            max_accumulator: DEFAULT_MAX_ACCUMULATOR,
            accumulator: 0.0,
            total_time: 0.0,
            tick_count: 0,
            frame_count: 0,
            ticks_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Measure the wall-clock delta since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed an explicit wall-clock delta. `begin_frame` calls this; tests and
    /// headless runs call it directly.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt.max(0.0);

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.ticks_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// Consume one fixed slice if enough time has accumulated.
    pub fn should_tick(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.tick_count += 1;
            self.ticks_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn dt(&self) -> f32 {
        self.fixed_dt as f32
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_fixed_slice_yields_one_tick() {
        let mut time = TimeState::new();
        time.advance(time.fixed_dt);
        assert!(time.should_tick());
        assert!(!time.should_tick());
        assert_eq!(time.ticks_this_frame, 1);
        assert_eq!(time.tick_count, 1);
    }

    #[test]
    fn short_frame_yields_no_tick() {
        let mut time = TimeState::new();
        time.advance(time.fixed_dt * 0.5);
        assert!(!time.should_tick());
        time.advance(time.fixed_dt * 0.6);
        assert!(time.should_tick());
    }

    #[test]
    fn long_frame_is_capped() {
        let mut time = TimeState::with_tick_rate(60.0);
        time.advance(5.0);
        let mut ticks = 0;
        while time.should_tick() {
            ticks += 1;
        }
        // 0.25s at 60Hz, give or take float rounding on the last slice
        assert!((14..=15).contains(&ticks), "got {ticks} ticks");
    }

    #[test]
    fn dt_matches_tick_rate() {
        let time = TimeState::with_tick_rate(30.0);
        assert!((time.dt() - 1.0 / 30.0).abs() < 1e-6);
    }
}
