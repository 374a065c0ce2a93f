//! Gate input combination, flip-flop state and toggle coverage.

use levsim_conformance::{build_circuit, exhaustive_vectors, run_vectors, C17, TOGGLE};
use levsim_sim::{CoverageRatio, SimConfig, MAX_GIC_INPUTS};

fn gic() -> SimConfig {
    SimConfig {
        gic: true,
        toggle: true,
        ..SimConfig::default()
    }
}

#[test]
fn c17_exhaustive_gic_is_complete() {
    let vectors = exhaustive_vectors(5);
    let refs: Vec<&str> = vectors.iter().map(String::as_str).collect();
    let result = run_vectors(build_circuit(C17, None, "").unwrap(), gic(), &refs).unwrap();
    // Six two-input NANDs and two single-input outputs; inputs carry no
    // bitmap.
    assert_eq!(result.summary.gic, Some(CoverageRatio::new(28, 28)));
}

#[test]
fn single_vector_covers_one_combination_per_gate() {
    let result = run_vectors(build_circuit(C17, None, "").unwrap(), gic(), &["00000"]).unwrap();
    assert_eq!(result.summary.gic, Some(CoverageRatio::new(8, 28)));
}

#[test]
fn all_unknown_inputs_cover_nothing() {
    let result = run_vectors(
        build_circuit(C17, None, "").unwrap(),
        gic(),
        &["xxxxx", "xxxxx", "xxxxx"],
    )
    .unwrap();
    assert_eq!(result.summary.gic, Some(CoverageRatio::new(0, 28)));
    assert_eq!(result.summary.toggle, Some(CoverageRatio::new(0, 12)));
}

#[test]
fn flip_flop_states_join_gic() {
    let config = SimConfig {
        flop_group_size: 1,
        ..gic()
    };
    let result = run_vectors(
        build_circuit(TOGGLE, None, "").unwrap(),
        config,
        &["00", "11", "11"],
    )
    .unwrap();
    // XOR saw (0,1) and (1,1), AND saw (1,1) and (0,1), the output and the
    // flip-flop saw 0 and then 1. Each two-input gate has four points, the
    // output and the flip-flop two each.
    assert_eq!(result.summary.gic, Some(CoverageRatio::new(8, 12)));
}

#[test]
fn strict_toggle_ignores_transitions_from_unknown() {
    let config = SimConfig {
        toggle: true,
        ..SimConfig::default()
    };
    let result = run_vectors(
        build_circuit(TOGGLE, None, "").unwrap(),
        config,
        &["00", "11", "11"],
    )
    .unwrap();
    // Flip-flop rose, XOR fell, AND rose and fell.
    assert_eq!(result.summary.toggle, Some(CoverageRatio::new(4, 6)));
}

#[test]
fn relaxed_toggle_counts_arrivals() {
    let config = SimConfig {
        toggle: true,
        relaxed_toggle: true,
        ..SimConfig::default()
    };
    let result = run_vectors(
        build_circuit(TOGGLE, None, "").unwrap(),
        config,
        &["00", "11", "11"],
    )
    .unwrap();
    assert_eq!(result.summary.toggle, Some(CoverageRatio::new(6, 6)));
}

#[test]
fn coverage_off_by_default() {
    let result = run_vectors(
        build_circuit(C17, None, "").unwrap(),
        SimConfig::default(),
        &["00000", "11111"],
    )
    .unwrap();
    assert!(result.summary.gic.is_none());
    assert!(result.summary.toggle.is_none());
    assert_eq!(result.summary.cycles, 2);
}

#[test]
fn wide_gates_leave_gic() {
    // 17 inputs; gate 18 ANDs all of them, gate 19 the first 16.
    let inputs = MAX_GIC_INPUTS + 1;
    let mut lev = format!("{}\nwide\n", inputs + 5);
    for id in 1..=inputs {
        lev.push_str(&format!("{id} 1 0 0\n"));
    }
    let all: Vec<String> = (1..=inputs).map(|i| i.to_string()).collect();
    lev.push_str(&format!("{} 6 5 {} {}\n", inputs + 1, inputs, all.join(" ")));
    lev.push_str(&format!(
        "{} 6 5 {} {}\n",
        inputs + 2,
        MAX_GIC_INPUTS,
        all[..MAX_GIC_INPUTS].join(" ")
    ));
    lev.push_str(&format!("{} 2 10 1 {}\n", inputs + 3, inputs + 1));
    lev.push_str(&format!("{} 2 10 1 {}\n", inputs + 4, inputs + 2));

    let circuit = build_circuit(&lev, None, "").unwrap();
    let vector = "1".repeat(inputs);
    let result = run_vectors(circuit, gic(), &[vector.as_str()]).unwrap();
    // The 16-input AND plus both outputs, each of which saw a 1.
    assert_eq!(
        result.summary.gic,
        Some(CoverageRatio::new(3, (1 << MAX_GIC_INPUTS) + 4))
    );
    assert_eq!(result.outputs(), vec!["11"]);
}

#[test]
fn outputs_count_toward_gic() {
    // in1, in2 -> AND -> OUT
    let lev = "5\n-\n1 1 0 0\n2 1 0 0\n3 6 5 2 1 2\n4 2 10 1 3\n";
    let result = run_vectors(build_circuit(lev, None, "").unwrap(), gic(), &["11"]).unwrap();
    assert_eq!(result.summary.gic, Some(CoverageRatio::new(2, 6)));

    let result = run_vectors(
        build_circuit(lev, None, "").unwrap(),
        gic(),
        &["11", "01", "00", "10"],
    )
    .unwrap();
    assert_eq!(result.summary.gic, Some(CoverageRatio::new(6, 6)));
}
