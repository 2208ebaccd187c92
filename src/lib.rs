//! Simulation core for two single-screen mini-games: a top-down arcade
//! shooter driven by a virtual-clock scheduler, and a click counter with
//! achievements.  Rendering and raw input handling live in the binary.

pub mod clicker;
pub mod compute;
pub mod config;
pub mod entities;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod view;
pub mod weapons;
