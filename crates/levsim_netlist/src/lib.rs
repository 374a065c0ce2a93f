//! Circuit description data for the levsim simulator.
//!
//! This crate holds the data model the simulation core is built from:
//! [`GateKind`] with its numeric netlist codes, the validated [`Netlist`],
//! the per-kind [`DelayTable`], and [`FaultRecord`]s. It also provides the
//! dense [`Arena`] and the ID types the core indexes gates and faults with,
//! plus readers for the `.lev`, `.dly`, `.eqf` and input-vector text formats.

#![warn(missing_docs)]

pub mod arena;
pub mod delay;
pub mod error;
pub mod fault_list;
pub mod ids;
pub mod kind;
pub mod lev;
pub mod loader;
pub mod netlist;
pub mod vector;

pub use arena::{Arena, ArenaId};
pub use delay::{parse_dly, read_dly, DelayTable, DEFAULT_DELAY};
pub use error::NetlistError;
pub use fault_list::{parse_eqf, read_eqf, FaultRecord};
pub use ids::{FaultId, GateId};
pub use kind::GateKind;
pub use lev::{parse_lev, read_lev};
pub use loader::{circuit_path, load_circuit, open_vectors, CircuitFiles, LoadOptions};
pub use netlist::{GateRecord, Netlist, LEVEL_SCALE};
pub use vector::{parse_vector, VectorReader, END_MARKER};
