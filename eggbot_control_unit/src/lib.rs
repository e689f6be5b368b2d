//! # Eggbot Control Unit Library
//!
//! The pattern drawing engine of the eggbot: a three-axis machine that
//! rotates an egg, sweeps a pen along it and lifts the pen on and off the
//! shell.
//!
//! ## Layers
//!
//! 1. **Session** - start beep, homing, settle delay, one pattern, end beep
//! 2. **PatternSequencer** - named designs and pattern files as step lists
//! 3. **DrawingPrimitives / TrajectoryGenerator** - lines, dots, strokes,
//!    and curves synthesised from live rotation feedback
//! 4. **PenController / HomingController** - stall-detected contact and
//!    mechanical reference frames
//!
//! All hardware access goes through the capability traits in
//! `eggbot_common::hal::driver`, handed over as one `Machine`. Each axis is
//! borrowed mutably by exactly one controller at a time.

pub mod config;
pub mod error;
pub mod homing;
pub mod pen;
pub mod primitives;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod trajectory;
