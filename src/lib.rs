//! `hiitclock` - Countdown interval timer for HIIT workouts
//!
//! This library provides the workout engine, its display and cue
//! collaborators, workout file loading, and the CLI built on top of them.

pub mod cli;
pub mod config;
pub mod cue;
pub mod display;
pub mod error;
pub mod observability;
pub mod workout;
