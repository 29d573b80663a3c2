//! Sparse-set entity/component storage.
//!
//! Entities are plain ids. Components are stored per type in packed sparse sets and
//! are joined back together through views. See [`ecs::Registry`] for the entry point.

// Allow the derive macros to refer to `::rusty_ecs` from inside this crate.
extern crate self as rusty_ecs;

pub mod ecs;
