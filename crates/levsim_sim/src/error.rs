//! Simulation error types for the gate-level simulator.
//!
//! All errors that can occur while building a circuit or running a cycle
//! are represented as variants of [`SimError`].

use levsim_netlist::NetlistError;
use std::io;

/// Errors that can occur during circuit construction or simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Circuit description data could not be read or was malformed.
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// An input vector's length differs from the primary-input count.
    #[error("cycle {cycle}: vector has {found} values but the circuit has {expected} inputs")]
    VectorLength {
        /// 0-based cycle index.
        cycle: u64,
        /// Number of primary inputs.
        expected: usize,
        /// Length of the supplied vector.
        found: usize,
    },

    /// A fault names a gate the circuit does not have.
    #[error("fault targets gate {0}, which is not in the circuit")]
    GateNotFound(u32),

    /// A fault names a fan-in the target gate does not have.
    #[error("fault on gate {gate} targets net {net}, but the gate has {fanin_count} fan-in(s)")]
    FaultNetOutOfRange {
        /// 1-based target gate id.
        gate: u32,
        /// The requested net.
        net: u32,
        /// The gate's fan-in count.
        fanin_count: usize,
    },

    /// Fault simulation was requested with a wheel that does not drain in
    /// level order.
    #[error("fault simulation requires the zero-delay level wheel")]
    FaultModeRequiresLevelWheel,

    /// An I/O error occurred while writing simulation output.
    #[error("output I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_length_display() {
        let e = SimError::VectorLength {
            cycle: 3,
            expected: 5,
            found: 4,
        };
        assert_eq!(
            e.to_string(),
            "cycle 3: vector has 4 values but the circuit has 5 inputs"
        );
    }

    #[test]
    fn gate_not_found_display() {
        assert_eq!(
            SimError::GateNotFound(42).to_string(),
            "fault targets gate 42, which is not in the circuit"
        );
    }

    #[test]
    fn fault_net_display() {
        let e = SimError::FaultNetOutOfRange {
            gate: 7,
            net: 3,
            fanin_count: 2,
        };
        assert_eq!(
            e.to_string(),
            "fault on gate 7 targets net 3, but the gate has 2 fan-in(s)"
        );
    }

    #[test]
    fn netlist_error_is_transparent() {
        let e: SimError = NetlistError::GateCountMismatch {
            declared: 3,
            found: 2,
        }
        .into();
        assert_eq!(e.to_string(), "netlist declares 3 gates but 2 were read");
    }

    #[test]
    fn io_display() {
        let e = SimError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(e.to_string().contains("output I/O error"));
    }
}
