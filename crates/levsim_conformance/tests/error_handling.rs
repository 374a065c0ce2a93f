//! Malformed input surfaces as typed errors, never as a panic or exit, and
//! out-of-range lookups return `None`.

use levsim_conformance::{build_circuit, config, run_vectors, C17, TOGGLE};
use levsim_netlist::{load_circuit, parse_dly, LoadOptions, NetlistError};
use levsim_sim::{SimError, SimMode, Simulator};
use tempfile::TempDir;

#[test]
fn unknown_gate_kind_code() {
    let err = build_circuit("3\n-\n1 1 0 0\n2 99 5 1 1\n", None, "").unwrap_err();
    assert!(matches!(
        err,
        SimError::Netlist(NetlistError::UnknownGateKind { gate: 2, code: 99 })
    ));
}

#[test]
fn flip_flop_with_two_fanins() {
    let err = build_circuit("4\n-\n1 1 0 0\n2 1 0 0\n3 5 0 2 1 2\n", None, "").unwrap_err();
    assert!(matches!(
        err,
        SimError::Netlist(NetlistError::DffFanin { gate: 3, count: 2 })
    ));
}

#[test]
fn fanin_to_missing_gate() {
    let err = build_circuit("3\n-\n1 1 0 0\n2 10 5 1 7\n", None, "").unwrap_err();
    assert!(matches!(
        err,
        SimError::Netlist(NetlistError::UnknownFanin { gate: 2, fanin: 7 })
    ));
}

#[test]
fn unknown_delay_token() {
    let err = parse_dly("nand 2\nflux 3\n").unwrap_err();
    assert!(matches!(err, NetlistError::UnknownDelayKind { line: 2, .. }));
}

#[test]
fn delay_keywords_are_not_confused() {
    let table = parse_dly("NAND 4\nAND 2\nXNOR 7\nXOR 3\n").unwrap();
    let circuit = build_circuit(C17, Some("NAND 4\nAND 2\nXNOR 7\nXOR 3\n"), "").unwrap();
    assert_eq!(circuit.gate_by_id(6).map(|g| g.delay()), Some(4));
    assert_eq!(table.max_delay(), 7);
}

#[test]
fn invalid_vector_character() {
    let circuit = build_circuit(C17, None, "").unwrap();
    let err = run_vectors(circuit, config(SimMode::Logic), &["00000", "01z01"]).unwrap_err();
    assert!(matches!(
        err,
        SimError::Netlist(NetlistError::InvalidVectorChar {
            line: 2,
            column: 3,
            ch: 'z'
        })
    ));
}

#[test]
fn vector_length_mismatch() {
    let circuit = build_circuit(C17, None, "").unwrap();
    let err = run_vectors(circuit, config(SimMode::Logic), &["00000", "000"]).unwrap_err();
    assert!(matches!(
        err,
        SimError::VectorLength {
            cycle: 1,
            expected: 5,
            found: 3
        }
    ));
}

#[test]
fn fault_targets_are_checked() {
    let err = build_circuit(C17, None, "6 3 0\n").unwrap_err();
    assert!(matches!(
        err,
        SimError::FaultNetOutOfRange {
            gate: 6,
            net: 3,
            fanin_count: 2
        }
    ));
    let err = build_circuit(C17, None, "99 0 1\n").unwrap_err();
    assert!(matches!(err, SimError::GateNotFound(99)));
}

#[test]
fn fault_simulation_needs_level_order() {
    let circuit = build_circuit(C17, None, "6 0 0\n").unwrap();
    assert!(run_vectors(circuit, config(SimMode::Fault), &["00000"]).is_ok());

    let circuit = build_circuit(C17, None, "6 0 0\n").unwrap();
    let err = Simulator::with_delay_wheel(circuit, config(SimMode::Fault)).unwrap_err();
    assert!(matches!(err, SimError::FaultModeRequiresLevelWheel));
}

#[test]
fn missing_circuit_file() {
    let dir = TempDir::new().unwrap();
    let err = load_circuit(&dir.path().join("nothing"), LoadOptions::default()).unwrap_err();
    match err {
        NetlistError::MissingFile(path) => assert!(path.ends_with("nothing.lev")),
        other => panic!("expected MissingFile, got {other:?}"),
    }
}

#[test]
fn out_of_range_lookups_return_none() {
    let circuit = build_circuit(TOGGLE, None, "").unwrap();
    assert!(circuit.gate_by_id(0).is_none());
    assert!(circuit.gate_by_id(7).is_none());
    assert!(circuit.gate_by_id(6).is_some());
    assert!(circuit.output(1).is_none());
    assert!(circuit.state_var(1).is_none());
    assert!(circuit.state_var(0).is_some());
    assert!(circuit.input(2).is_none());
}
