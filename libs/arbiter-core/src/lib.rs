//! Arbiter core - submission execution and judging engine
//!
//! Judges untrusted source code against ordered (input, expected output)
//! pairs: compiles where the language needs it, runs each test under a
//! wall-clock timeout, measures time and memory, and publishes per-test
//! results to a process-wide progress store for concurrent pollers.

pub mod compare;
pub mod config;
pub mod engine;
pub mod executor;
pub mod progress;
pub mod runner;
pub mod task;
pub mod testfile;
pub mod types;
