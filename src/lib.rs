//! Core library for the `wrkbench` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, configuration loading and validation, the wrk report
//! parser, server process supervision, the per-test orchestration state
//! machine, and report rendering. The primary user-facing interface is the
//! `wrkbench` command-line application; library APIs may evolve as the CLI
//! grows.
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod logger;
pub mod model;
pub mod parser;
pub mod process;
pub mod report;
pub mod runner;
pub mod shutdown;
pub mod shutdown_handlers;
