//! Fault simulation of a combinational netlist
//!
//! The main entry point is [`Session`], which applies test vectors one after the other and
//! accumulates the detected faults. Serial simulation, one fault at a time, is available to
//! check the results.

mod deductive;
mod fault;
mod session;
mod simple_sim;
mod source;
mod universe;

use crate::error::Result;
use crate::Netlist;

pub use deductive::{add_local_faults, propagate_faults, DeductiveSimulator, SimulationState};
pub use fault::{Fault, FaultSet};
pub use session::{check_target, Coverage, Session, SessionState, SessionSummary, VectorReport};
pub use source::{RandomVectors, VectorList, VectorSource};
pub use universe::{FaultSites, FaultUniverse};

/// Simulate a combinatorial netlist; return the output values
///
/// Fails with [`Error::VectorLengthMismatch`](crate::Error::VectorLengthMismatch) if there is
/// not one value per primary input, like all simulation functions of this module.
pub fn simulate(netlist: &Netlist, input_values: &[bool]) -> Result<Vec<bool>> {
    use simple_sim::SimpleSimulator;
    let mut sim = SimpleSimulator::from_netlist(netlist);
    sim.run(input_values)
}

/// Simulate a combinatorial netlist with a fault injected; return the output values
pub fn simulate_with_fault(
    netlist: &Netlist,
    input_values: &[bool],
    fault: Fault,
) -> Result<Vec<bool>> {
    use simple_sim::SimpleSimulator;
    let mut sim = SimpleSimulator::from_netlist(netlist);
    sim.run_with_fault(input_values, Some(fault))
}

/// Returns whether the fault changes a primary output for this vector, by serial simulation
pub fn detects_fault(netlist: &Netlist, input_values: &[bool], fault: Fault) -> Result<bool> {
    use simple_sim::SimpleSimulator;
    let mut sim = SimpleSimulator::from_netlist(netlist);
    let expected = sim.run(input_values)?;
    let faulty = sim.run_with_fault(input_values, Some(fault))?;
    Ok(expected != faulty)
}

/// Faults of the universe detected by a single vector, by deductive simulation
///
/// Vectors are independent: results for several vectors can be computed separately and
/// merged into a session with [`Session::merge`].
pub fn detect(
    netlist: &Netlist,
    universe: &FaultUniverse,
    input_values: &[bool],
) -> Result<FaultSet> {
    let mut sim = DeductiveSimulator::new(netlist, universe);
    sim.run(input_values)?;
    Ok(sim.detected_faults())
}

/// Faults of the universe detected by a single vector, by serial simulation of each fault
pub fn detect_serial(
    netlist: &Netlist,
    universe: &FaultUniverse,
    input_values: &[bool],
) -> Result<FaultSet> {
    use simple_sim::SimpleSimulator;
    let mut sim = SimpleSimulator::from_netlist(netlist);
    let expected = sim.run(input_values)?;
    let mut ret = FaultSet::new();
    for f in universe.faults() {
        if sim.run_with_fault(input_values, Some(f))? != expected {
            ret.insert(f);
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::{detect, detect_serial, detects_fault, simulate, simulate_with_fault};
    use super::{DeductiveSimulator, Fault, FaultSites, FaultUniverse, Session};
    use crate::error::Error;
    use crate::network::generators::{adder, random, testcases};
    use crate::network::NodeId;

    #[test]
    fn test_basic() {
        let net = testcases::c17();
        // 22 = !(!(1 & 3) & !(2 & !(3 & 6)))
        let eval = |v: &[bool]| {
            let (i1, i2, i3, i6, i7) = (v[0], v[1], v[2], v[3], v[4]);
            let n10 = !(i1 & i3);
            let n11 = !(i3 & i6);
            let n16 = !(i2 & n11);
            let n19 = !(n11 & i7);
            vec![!(n10 & n16), !(n16 & n19)]
        };
        for p in 0..32u32 {
            let v: Vec<bool> = (0..5).map(|i| (p >> i) & 1 != 0).collect();
            assert_eq!(simulate(&net, &v).unwrap(), eval(&v));
        }
    }

    #[test]
    fn test_adder() {
        let net = adder::ripple_carry(3);
        for a in 0..8u32 {
            for b in 0..8u32 {
                for c in 0..2u32 {
                    let mut v = Vec::new();
                    for i in 0..3 {
                        v.push((a >> i) & 1 != 0);
                        v.push((b >> i) & 1 != 0);
                    }
                    v.push(c != 0);
                    let sum = a + b + c;
                    let expected: Vec<bool> = (0..4).map(|i| (sum >> i) & 1 != 0).collect();
                    assert_eq!(simulate(&net, &v).unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn test_fault_injection() {
        let n = NodeId::new;
        let net = testcases::and2();
        assert_eq!(
            simulate_with_fault(&net, &[true, true], Fault::stuck_at_0(n(1))).unwrap(),
            vec![false]
        );
        assert!(detects_fault(&net, &[true, true], Fault::stuck_at_0(n(3))).unwrap());
        assert!(!detects_fault(&net, &[true, true], Fault::stuck_at_1(n(3))).unwrap());
        assert!(!detects_fault(&net, &[false, false], Fault::stuck_at_1(n(1))).unwrap());
    }

    #[test]
    fn test_serial_length_mismatch() {
        let net = testcases::and2();
        let u = FaultUniverse::new(&net, FaultSites::All);
        let f = Fault::stuck_at_0(NodeId::new(1));
        let is_mismatch = |e: Error| {
            matches!(
                e,
                Error::VectorLengthMismatch {
                    expected: 2,
                    actual: 3
                }
            )
        };
        let v = [true, false, true];
        assert!(is_mismatch(simulate(&net, &v).unwrap_err()));
        assert!(is_mismatch(simulate_with_fault(&net, &v, f).unwrap_err()));
        assert!(is_mismatch(detects_fault(&net, &v, f).unwrap_err()));
        assert!(is_mismatch(detect_serial(&net, &u, &v).unwrap_err()));
        assert!(is_mismatch(detect(&net, &u, &v).unwrap_err()));
    }

    /// The deductive fault lists must match serial simulation of every single fault
    #[test]
    fn test_deductive_matches_serial() {
        let mut rng = SmallRng::seed_from_u64(42);
        for seed in 0..200 {
            let nb_inputs = rng.gen_range(1..=6);
            let nb_gates = rng.gen_range(1..=20);
            let net = random::random_netlist(nb_inputs, nb_gates, seed);
            for sites in FaultSites::ALL {
                let u = FaultUniverse::new(&net, sites);
                for _ in 0..8 {
                    let v: Vec<bool> = (0..nb_inputs).map(|_| rng.gen()).collect();
                    let deductive = detect(&net, &u, &v).unwrap();
                    let serial = detect_serial(&net, &u, &v).unwrap();
                    assert_eq!(deductive, serial, "Mismatch for seed {seed} on\n{net}");
                }
            }
        }
    }

    /// Beyond primary outputs, the fault list of every node matches serial simulation
    #[test]
    fn test_internal_fault_lists() {
        let net = testcases::c17();
        let u = FaultUniverse::new(&net, FaultSites::All);
        let mut sim = DeductiveSimulator::new(&net, &u);
        for p in 0..32u32 {
            let v: Vec<bool> = (0..5).map(|i| (p >> i) & 1 != 0).collect();
            sim.run(&v).unwrap();
            let observed = sim.state().faults(NodeId::new(16));
            // Node 16 is not an output: expose it through a copy of the netlist
            let n16 = crate::Netlist::new(
                net.inputs().to_vec(),
                net.gates().map(|(_, g)| g.clone()).collect(),
                vec![NodeId::new(16)],
            )
            .unwrap();
            let expected = detect_serial(&n16, &u, &v).unwrap();
            assert_eq!(observed, &expected);
        }
    }

    #[test]
    fn test_exhaustive_c17() {
        // c17 has no redundant stem fault: exhaustive vectors detect everything
        let net = testcases::c17();
        let u = FaultUniverse::new(&net, FaultSites::All);
        let mut session = Session::new(&net, &u);
        for p in 0..32u32 {
            let v: Vec<bool> = (0..5).map(|i| (p >> i) & 1 != 0).collect();
            session.apply(&v).unwrap();
        }
        assert_eq!(session.coverage().detected, u.len());
    }

    #[test]
    fn test_merge_independent_vectors() {
        let net = random::random_netlist(6, 20, 3);
        let u = FaultUniverse::new(&net, FaultSites::All);
        let mut rng = SmallRng::seed_from_u64(3);
        let vectors: Vec<Vec<bool>> = (0..10)
            .map(|_| (0..6).map(|_| rng.gen()).collect())
            .collect();

        let mut sequential = Session::new(&net, &u);
        for v in &vectors {
            sequential.apply(v).unwrap();
        }
        // Same vectors, simulated separately and merged in reverse order
        let mut merged = Session::new(&net, &u);
        for v in vectors.iter().rev() {
            merged.merge(&detect(&net, &u, v).unwrap());
        }
        assert_eq!(sequential.detected(), merged.detected());
    }
}
