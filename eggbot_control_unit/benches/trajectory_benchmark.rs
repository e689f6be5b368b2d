//! Trajectory sample micro-benchmark.
//!
//! Measures the per-sample math of the curved patterns:
//! - Wave velocity law
//! - Feedback circle command (phase + radial correction)
//! - Fixed-sweep circle command
//! - One simulated wave revolution end to end

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use eggbot_common::config::EggbotConfig;
use eggbot_control_unit::pen::PenController;
use eggbot_control_unit::trajectory::TrajectoryGenerator;
use eggbot_control_unit::trajectory::circle::{
    CircleGeometry, fixed_sweep_amplitude, fixed_sweep_command,
};
use eggbot_control_unit::trajectory::wave::wave_velocity;
use eggbot_hal::SimulationDriver;

fn bench_wave_velocity(c: &mut Criterion) {
    let mut angle = 0.0_f64;

    c.bench_function("wave_velocity", |b| {
        b.iter(|| {
            angle = (angle + 0.09) % 360.0;
            black_box(wave_velocity(black_box(120.0), black_box(10.0), angle))
        })
    });
}

fn bench_circle_command(c: &mut Criterion) {
    let ring = CircleGeometry::starting_at(0.0, 0.0, 8.5, 1.5);
    let mut phase = 0.0_f64;

    c.bench_function("circle_command", |b| {
        b.iter(|| {
            phase += 0.01;
            let rotation = -12.75 + 12.75 * phase.cos();
            let traverse = 8.5 * phase.sin();
            black_box(ring.command(black_box(rotation), black_box(traverse), 100.0, 1.0))
        })
    });
}

fn bench_fixed_sweep(c: &mut Criterion) {
    let amplitude = fixed_sweep_amplitude(8.5, Duration::from_millis(1));
    let mut step = 0u32;

    c.bench_function("fixed_sweep_command", |b| {
        b.iter(|| {
            step = (step + 1) % 360;
            black_box(fixed_sweep_command(amplitude, 1.5, f64::from(step)))
        })
    });
}

fn bench_simulated_wave(c: &mut Criterion) {
    let config = EggbotConfig::default();
    let traj = TrajectoryGenerator::new(config.trajectory.clone());

    c.bench_function("simulated_wave_revolution", |b| {
        b.iter(|| {
            let (mut machine, _handles) =
                SimulationDriver::build(&config).expect("default config is valid");
            let mut pen = PenController::new(config.pen.clone());
            black_box(traj.wave(&mut machine, &mut pen, 120.0, 10.0).map(|r| r.samples.len()))
        })
    });
}

criterion_group!(
    benches,
    bench_wave_velocity,
    bench_circle_command,
    bench_fixed_sweep,
    bench_simulated_wave
);
criterion_main!(benches);
