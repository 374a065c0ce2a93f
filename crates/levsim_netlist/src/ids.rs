//! Opaque ID newtypes for gates and faults.
//!
//! Each ID is a thin `u32` wrapper over a zero-based arena index. Netlist files
//! number gates from 1; [`GateId::from_netlist_id`] and
//! [`GateId::netlist_id`] convert between the two.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the raw index as `usize`.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a gate in a circuit.
    GateId
);

define_id!(
    /// Opaque, copyable ID for a fault in a circuit's fault list.
    FaultId
);

impl GateId {
    /// Converts a 1-based netlist gate number to an ID.
    ///
    /// Returns `None` for 0, which no gate carries.
    pub fn from_netlist_id(id: u32) -> Option<Self> {
        id.checked_sub(1).map(Self)
    }

    /// Returns the 1-based gate number used in netlist and fault files.
    pub fn netlist_id(self) -> u32 {
        self.0 + 1
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.netlist_id())
    }
}
