//! Shared foundational types for the levsim gate-level simulator.
//!
//! This crate provides the four-valued logic algebra, packed logic vectors
//! used for output and state snapshots, and packed coverage bitmaps.

#![warn(missing_docs)]

pub mod bitmap;
pub mod logic;
pub mod logic_vec;

pub use bitmap::CoverageBitmap;
pub use logic::Logic;
pub use logic_vec::LogicVec;
