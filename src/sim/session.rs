//! Simulation sessions: vectors applied one after the other, with cumulative coverage

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::io::format_vector;
use crate::network::{Netlist, NodeId};
use crate::report::ReportSink;

use super::{DeductiveSimulator, FaultSet, FaultUniverse, VectorSource};

/// Fault coverage: detected faults out of the fault universe
///
/// This is an exact ratio; how it is rounded for display is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coverage {
    /// Number of faults detected
    pub detected: usize,
    /// Number of faults in the universe
    pub total: usize,
}

impl Coverage {
    /// Coverage as a ratio between 0 and 1; an empty universe is fully covered
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.detected as f64 / self.total as f64
        }
    }

    /// Coverage as a percentage
    pub fn percent(&self) -> f64 {
        100.0 * self.ratio()
    }

    /// Coverage as a percentage, truncated to an integer
    pub fn percent_floor(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.detected * 100 / self.total
        }
    }

    /// Returns whether the coverage is at least `target` percent
    pub fn reaches(&self, target: f64) -> bool {
        if self.total == 0 {
            return true;
        }
        (self.detected as f64) * 100.0 >= target * (self.total as f64)
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.2}%)",
            self.detected,
            self.total,
            self.percent()
        )
    }
}

/// Check that a coverage target, in percent, can be used for a session
pub fn check_target(target: f64) -> Result<()> {
    if target.is_finite() && (0.0..100.0).contains(&target) {
        Ok(())
    } else {
        Err(Error::InvalidTarget(target))
    }
}

/// Phase of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next vector
    AwaitingVector,
    /// Simulating a vector
    Evaluating,
    /// Results of the last vector are available
    Reporting,
    /// The session is over
    Done,
}

/// Results of a single vector
#[derive(Clone, Debug, PartialEq)]
pub struct VectorReport {
    /// Number of vectors applied so far in the session, including this one
    pub index: usize,
    /// Values of the primary inputs
    pub vector: Vec<bool>,
    /// Faults observed at each primary output for this vector
    pub output_faults: Vec<(NodeId, FaultSet)>,
    /// Faults detected by this vector and by no previous one
    pub new_faults: FaultSet,
    /// Cumulative coverage after this vector
    pub coverage: Coverage,
}

/// Results of a whole session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    /// Number of vectors applied
    pub nb_vectors: usize,
    /// Final coverage
    pub coverage: Coverage,
    /// All faults detected during the session
    pub detected: FaultSet,
    /// For target-coverage sessions, whether the target was reached
    pub target_reached: Option<bool>,
}

/// A fault simulation session
///
/// The netlist and fault universe are shared and never modified. The set of detected faults
/// only grows during the session.
pub struct Session<'a> {
    netlist: &'a Netlist,
    universe: &'a FaultUniverse,
    sim: DeductiveSimulator<'a>,
    detected: FaultSet,
    nb_vectors: usize,
    state: SessionState,
}

impl<'a> Session<'a> {
    /// Start a new session
    pub fn new(netlist: &'a Netlist, universe: &'a FaultUniverse) -> Session<'a> {
        info!(
            inputs = netlist.nb_inputs(),
            outputs = netlist.nb_outputs(),
            gates = netlist.nb_gates(),
            faults = universe.len(),
            "starting fault simulation session"
        );
        Session {
            netlist,
            universe,
            sim: DeductiveSimulator::new(netlist, universe),
            detected: FaultSet::new(),
            nb_vectors: 0,
            state: SessionState::AwaitingVector,
        }
    }

    /// Current phase
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Faults detected so far
    pub fn detected(&self) -> &FaultSet {
        &self.detected
    }

    /// Number of vectors applied so far
    pub fn nb_vectors(&self) -> usize {
        self.nb_vectors
    }

    /// Current cumulative coverage
    pub fn coverage(&self) -> Coverage {
        Coverage {
            detected: self.detected.len(),
            total: self.universe.len(),
        }
    }

    fn transition(&mut self, next: SessionState) {
        use SessionState::*;
        debug_assert!(
            matches!(
                (self.state, next),
                (AwaitingVector, Evaluating)
                    | (Evaluating, Reporting)
                    | (Evaluating, AwaitingVector)
                    | (Reporting, AwaitingVector)
                    | (Reporting, Done)
                    | (AwaitingVector, Done)
            ),
            "invalid session transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state == SessionState::Done {
            Err(Error::SessionFinished)
        } else {
            Ok(())
        }
    }

    /// Simulate one vector and add the faults it detects to the session
    ///
    /// A vector of the wrong length is rejected and leaves the session unchanged.
    /// Once the session is finished, every vector is rejected with [`Error::SessionFinished`].
    pub fn apply(&mut self, vector: &[bool]) -> Result<VectorReport> {
        self.check_not_finished()?;
        if self.state == SessionState::Reporting {
            self.transition(SessionState::AwaitingVector);
        }
        self.transition(SessionState::Evaluating);
        if let Err(e) = self.sim.run(vector) {
            self.transition(SessionState::AwaitingVector);
            return Err(e);
        }
        self.nb_vectors += 1;
        let detected = self.sim.detected_faults();
        let new_faults = self.merge(&detected);
        let report = VectorReport {
            index: self.nb_vectors,
            vector: vector.to_vec(),
            output_faults: self.sim.output_faults(),
            new_faults,
            coverage: self.coverage(),
        };
        debug!(
            index = report.index,
            vector = %format_vector(vector),
            new_faults = report.new_faults.len(),
            coverage = %report.coverage,
            "vector applied"
        );
        self.transition(SessionState::Reporting);
        Ok(report)
    }

    /// Add faults detected elsewhere, for example by a vector simulated independently
    ///
    /// Returns the faults that were not detected yet. Faults outside of the session's fault
    /// universe are ignored.
    pub fn merge(&mut self, faults: &FaultSet) -> FaultSet {
        let new_faults: FaultSet = faults
            .difference(&self.detected)
            .filter(|f| self.universe.contains(f))
            .copied()
            .collect();
        self.detected.extend(new_faults.iter().copied());
        new_faults
    }

    /// End the session
    pub fn finish(&mut self) -> SessionSummary {
        if self.state != SessionState::Done {
            self.transition(SessionState::Done);
        }
        let summary = SessionSummary {
            nb_vectors: self.nb_vectors,
            coverage: self.coverage(),
            detected: self.detected.clone(),
            target_reached: None,
        };
        info!(
            vectors = summary.nb_vectors,
            coverage = %summary.coverage,
            "fault simulation session finished"
        );
        summary
    }

    /// Apply vectors until the source runs out
    ///
    /// Vectors that are malformed or of the wrong length are reported to the sink and
    /// skipped, so that the operator can enter them again.
    pub fn run_interactive<S, R>(&mut self, source: &mut S, sink: &mut R) -> Result<SessionSummary>
    where
        S: VectorSource + ?Sized,
        R: ReportSink + ?Sized,
    {
        self.check_not_finished()?;
        let nb_inputs = self.netlist.nb_inputs();
        while let Some(next) = source.next_vector(nb_inputs) {
            let res = next.and_then(|v| self.apply(&v));
            match res {
                Ok(report) => sink.vector(&report)?,
                Err(e) if e.is_vector_error() => {
                    warn!("rejected test vector: {e}");
                    sink.rejected(&e)?;
                }
                Err(e) => return Err(e),
            }
        }
        let summary = self.finish();
        sink.finish(&summary)?;
        Ok(summary)
    }

    /// Apply vectors until the coverage reaches `target` percent
    ///
    /// At most `max_vectors` vectors are drawn: a source may never reach the target, for
    /// example when some faults are undetectable. Any invalid vector is an error here.
    pub fn run_to_target<S, R>(
        &mut self,
        target: f64,
        max_vectors: usize,
        source: &mut S,
        sink: &mut R,
    ) -> Result<SessionSummary>
    where
        S: VectorSource + ?Sized,
        R: ReportSink + ?Sized,
    {
        check_target(target)?;
        self.check_not_finished()?;
        info!(
            target_coverage = target,
            max_vectors,
            "running until the coverage target is reached"
        );
        let nb_inputs = self.netlist.nb_inputs();
        let mut reached = false;
        for _ in 0..max_vectors {
            let Some(next) = source.next_vector(nb_inputs) else {
                break;
            };
            let report = self.apply(&next?)?;
            sink.vector(&report)?;
            if report.coverage.reaches(target) {
                reached = true;
                break;
            }
        }
        if !reached {
            warn!(
                target_coverage = target,
                vectors = self.nb_vectors,
                coverage = %self.coverage(),
                "coverage target not reached"
            );
        }
        let mut summary = self.finish();
        summary.target_reached = Some(reached);
        sink.finish(&summary)?;
        Ok(summary)
    }
}
