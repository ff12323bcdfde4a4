//! Reporting of simulation results
//!
//! A [`ReportSink`] receives the results of each vector as they are computed, and the
//! summary at the end of the session.

use std::io::Write;

use itertools::Itertools;
use kdam::{tqdm, Bar, BarExt};

use crate::error::Error;
use crate::io::format_vector;
use crate::sim::{FaultSet, SessionSummary, VectorReport};

/// Destination of the results of a session
pub trait ReportSink {
    /// Called after each vector is simulated
    fn vector(&mut self, report: &VectorReport) -> std::io::Result<()>;

    /// Called when a vector is rejected and the session goes on
    fn rejected(&mut self, _error: &Error) -> std::io::Result<()> {
        Ok(())
    }

    /// Called once at the end of the session
    fn finish(&mut self, summary: &SessionSummary) -> std::io::Result<()>;
}

/// Human-readable report
///
/// For each vector, it lists the faults observed at each primary output, the number of
/// vectors applied, the coverage so far and the faults detected so far.
pub struct TextReport<W: Write> {
    out: W,
    detected: FaultSet,
}

impl<W: Write> TextReport<W> {
    /// Write the report to `out`
    pub fn new(out: W) -> Self {
        TextReport {
            out,
            detected: FaultSet::new(),
        }
    }

    /// Get back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn vector(&mut self, report: &VectorReport) -> std::io::Result<()> {
        self.detected.extend(report.new_faults.iter().copied());
        writeln!(self.out)?;
        writeln!(self.out, "The input vector is: {}", format_vector(&report.vector))?;
        for (o, faults) in &report.output_faults {
            if faults.is_empty() {
                writeln!(self.out, "No fault propagated to output {o}")?;
            } else {
                writeln!(
                    self.out,
                    "Faults propagated to output {o}: {}",
                    faults.iter().join(", ")
                )?;
            }
        }
        writeln!(self.out, "Vectors applied: {}", report.index)?;
        writeln!(
            self.out,
            "Faults detected: {} out of {}",
            report.coverage.detected, report.coverage.total
        )?;
        writeln!(self.out, "Fault coverage: {:.2}%", report.coverage.percent())?;
        writeln!(self.out, "Fault list: {}", self.detected.iter().join(", "))
    }

    fn rejected(&mut self, error: &Error) -> std::io::Result<()> {
        writeln!(self.out, "Vector rejected: {error}")
    }

    fn finish(&mut self, summary: &SessionSummary) -> std::io::Result<()> {
        writeln!(self.out)?;
        match summary.target_reached {
            Some(true) => writeln!(self.out, "Coverage target reached")?,
            Some(false) => writeln!(self.out, "Coverage target not reached")?,
            None => (),
        }
        writeln!(self.out, "Fault coverage: {}", summary.coverage)?;
        writeln!(self.out, "Vectors applied: {}", summary.nb_vectors)?;
        writeln!(
            self.out,
            "Final fault list: {}",
            summary.detected.iter().join(", ")
        )?;
        self.out.flush()
    }
}

/// Progress bar over the fault universe, forwarding the results to another sink
pub struct ProgressReport<R: ReportSink> {
    bar: Bar,
    inner: R,
}

impl<R: ReportSink> ProgressReport<R> {
    /// Show a progress bar for a universe of `nb_faults` faults
    pub fn new(nb_faults: usize, inner: R) -> Self {
        let mut bar = tqdm!(total = nb_faults);
        bar.set_description("Faults detected");
        ProgressReport { bar, inner }
    }

    /// Get back the wrapped sink
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ReportSink> ReportSink for ProgressReport<R> {
    fn vector(&mut self, report: &VectorReport) -> std::io::Result<()> {
        self.bar.set_postfix(format!("vectors={}", report.index));
        self.bar.update_to(report.coverage.detected)?;
        self.inner.vector(report)
    }

    fn rejected(&mut self, error: &Error) -> std::io::Result<()> {
        self.inner.rejected(error)
    }

    fn finish(&mut self, summary: &SessionSummary) -> std::io::Result<()> {
        self.bar.write(format!(
            "Applied {} vectors, detecting {}",
            summary.nb_vectors, summary.coverage
        ))?;
        self.inner.finish(summary)
    }
}

/// Keeps all results in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryReport {
    /// Results of each vector
    pub vectors: Vec<VectorReport>,
    /// Messages for the rejected vectors
    pub rejected: Vec<String>,
    /// Summary, once the session is finished
    pub summary: Option<SessionSummary>,
}

impl ReportSink for MemoryReport {
    fn vector(&mut self, report: &VectorReport) -> std::io::Result<()> {
        self.vectors.push(report.clone());
        Ok(())
    }

    fn rejected(&mut self, error: &Error) -> std::io::Result<()> {
        self.rejected.push(error.to_string());
        Ok(())
    }

    fn finish(&mut self, summary: &SessionSummary) -> std::io::Result<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportSink, TextReport};
    use crate::network::generators::testcases;
    use crate::sim::{FaultSites, FaultUniverse, Session, VectorList};

    #[test]
    fn test_text_report() {
        let net = testcases::and2();
        let u = FaultUniverse::new(&net, FaultSites::PrimaryInputs);
        let mut session = Session::new(&net, &u);
        let mut report = TextReport::new(Vec::new());
        let mut source = VectorList::new(vec![vec![true, true], vec![false], vec![false, false]]);
        session.run_interactive(&mut source, &mut report).unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();
        assert!(text.contains("The input vector is: 11"));
        assert!(text.contains("Faults propagated to output 3: 1 s-a-0, 2 s-a-0"));
        assert!(text.contains("No fault propagated to output 3"));
        assert!(text.contains("Vector rejected: test vector has 1 bits, expected 2"));
        assert!(text.contains("Faults detected: 2 out of 4"));
        assert!(text.contains("Fault coverage: 50.00%"));
        assert!(text.contains("Vectors applied: 2"));
        assert!(text.contains("Final fault list: 1 s-a-0, 2 s-a-0"));
    }

    #[test]
    fn test_default_rejected() {
        struct Counter(usize);
        impl ReportSink for Counter {
            fn vector(&mut self, _: &crate::sim::VectorReport) -> std::io::Result<()> {
                self.0 += 1;
                Ok(())
            }
            fn finish(&mut self, _: &crate::sim::SessionSummary) -> std::io::Result<()> {
                Ok(())
            }
        }
        let net = testcases::and2();
        let u = FaultUniverse::new(&net, FaultSites::All);
        let mut session = Session::new(&net, &u);
        let mut sink = Counter(0);
        let mut source = VectorList::new(vec![vec![true], vec![true, false]]);
        let summary = session.run_interactive(&mut source, &mut sink).unwrap();
        assert_eq!(sink.0, 1);
        assert_eq!(summary.nb_vectors, 1);
    }
}
