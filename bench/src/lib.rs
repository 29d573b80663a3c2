//! Benchmark utilities for the sparse-set registry.
//!
//! - **Microbenchmarks**: individual registry operations (create, emplace, find, remove, views)
//! - **Scenario benchmarks**: a particle workload with constant entity churn
//! - **Memory tracking**: heap allocation profiling via dhat
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_ecs_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_ecs_bench -- view
//!
//! # Run with memory profiling (slower)
//! cargo bench -p rusty_ecs_bench --features memory_profiling
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports. Memory profiling results are
//! written to `dhat-heap.json`.

pub mod components;
pub mod memory;
pub mod scenarios;
