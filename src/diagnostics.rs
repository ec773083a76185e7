//! Per-stage frame timing, kept outside the solver.
//!
//! The profiler is an optional observer: it accumulates one duration sample
//! per pipeline stage per frame and logs the averages once per report
//! interval, then zeroes itself. The solver core never depends on it;
//! [`profiled_step`] runs the same pipeline as
//! [`FlipSimulation2D::step`](crate::FlipSimulation2D::step) with timing
//! samples between stages.

use std::time::{Duration, Instant};

use crate::sensor::Accelerometer;
use crate::FlipSimulation2D;

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Sensor,
    Integrate,
    Separate,
    TransferToGrid,
    Pressure,
    TransferToParticles,
    Classify,
}

const STAGE_COUNT: usize = 7;

const STAGE_NAMES: [&str; STAGE_COUNT] = [
    "sensor", "integrate", "separate", "to-grid", "solve", "to-particles", "classify",
];

/// Accumulates per-stage microseconds and reports through `log::info!`.
pub struct FrameProfiler {
    accum_us: [u64; STAGE_COUNT],
    frames: u32,
    last_report: Instant,
    report_interval: Duration,
}

impl FrameProfiler {
    pub fn new(report_interval: Duration) -> Self {
        Self {
            accum_us: [0; STAGE_COUNT],
            frames: 0,
            last_report: Instant::now(),
            report_interval,
        }
    }

    /// Record one stage sample for the current frame.
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.accum_us[stage as usize] += elapsed.as_micros() as u64;
    }

    /// Close out a frame; logs and resets once per report interval.
    pub fn end_frame(&mut self) {
        self.frames += 1;
        if self.last_report.elapsed() < self.report_interval {
            return;
        }

        let frames = self.frames.max(1) as u64;
        let avg: Vec<String> = STAGE_NAMES
            .iter()
            .zip(&self.accum_us)
            .map(|(name, &us)| format!("{}:{}us", name, us / frames))
            .collect();
        log::info!("[{} fps] {}", self.frames, avg.join("  "));

        self.accum_us = [0; STAGE_COUNT];
        self.frames = 0;
        self.last_report = Instant::now();
    }

    /// Accumulated microseconds for one stage (for tests and dashboards).
    pub fn accumulated_us(&self, stage: Stage) -> u64 {
        self.accum_us[stage as usize]
    }

    /// Frames accumulated since the last report.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

/// Run one full simulation frame with per-stage timing.
///
/// Identical stage order to [`FlipSimulation2D::step`], with the sensor read
/// as the first stage when a sensor is present.
pub fn profiled_step(
    sim: &mut FlipSimulation2D,
    sensor: Option<&mut dyn Accelerometer>,
    dt: f32,
    profiler: &mut FrameProfiler,
) {
    let mut t = Instant::now();
    let mut lap = |profiler: &mut FrameProfiler, stage: Stage| {
        let now = Instant::now();
        profiler.record(stage, now - t);
        t = now;
    };

    if let Some(imu) = sensor {
        sim.sample_accelerometer(imu);
    }
    lap(profiler, Stage::Sensor);

    sim.integrate(dt);
    lap(profiler, Stage::Integrate);

    sim.separate();
    lap(profiler, Stage::Separate);

    sim.transfer_to_grid();
    lap(profiler, Stage::TransferToGrid);

    sim.project(dt);
    lap(profiler, Stage::Pressure);

    sim.transfer_to_particles();
    lap(profiler, Stage::TransferToParticles);

    sim.classify();
    lap(profiler, Stage::Classify);

    profiler.end_frame();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut profiler = FrameProfiler::new(Duration::from_secs(3600));
        profiler.record(Stage::Pressure, Duration::from_micros(120));
        profiler.record(Stage::Pressure, Duration::from_micros(80));

        assert_eq!(profiler.accumulated_us(Stage::Pressure), 200);
        assert_eq!(profiler.accumulated_us(Stage::Classify), 0);
    }

    #[test]
    fn test_report_resets_counters() {
        // Zero interval: every end_frame reports and resets
        let mut profiler = FrameProfiler::new(Duration::ZERO);
        profiler.record(Stage::Integrate, Duration::from_micros(50));
        profiler.end_frame();

        assert_eq!(profiler.accumulated_us(Stage::Integrate), 0);
        assert_eq!(profiler.frames(), 0);
    }

    #[test]
    fn test_profiled_step_runs_pipeline() {
        let mut sim = FlipSimulation2D::new(64, 42);
        let mut profiler = FrameProfiler::new(Duration::from_secs(3600));

        profiled_step(&mut sim, None, 1.0 / 60.0, &mut profiler);

        assert_eq!(profiler.frames(), 1);
        assert_eq!(sim.particles.len(), 64);
    }
}
