//! Per-device action routing for local multiplayer input.
//!
//! A game defines one set of logical actions; every connected joypad gets its
//! own isolated copy of the joypad bindings, kept in sync as joypads are
//! plugged in and out. See [`engine::input`] for the entry points.

pub mod core;
pub mod engine;
