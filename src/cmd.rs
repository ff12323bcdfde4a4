//! Command line interface

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use tracing::{error, info};

use dfsim::io::{read_netlist_file, read_vector_file, PromptVectors};
use dfsim::report::{ProgressReport, ReportSink, TextReport};
use dfsim::sim::{
    check_target, detect_serial, FaultSet, FaultSites, FaultUniverse, RandomVectors, Session,
    SessionSummary, VectorList, VectorReport,
};
use dfsim::{stats, Netlist};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level: -v for info, -vv for debug, -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a circuit
    ///
    /// Will print the number of inputs, outputs and gates, and the number of faults
    /// for each choice of fault sites.
    #[clap()]
    Show(ShowArgs),

    /// Simulate test vectors and report the faults they detect
    ///
    /// Vectors are read from a file, or entered one by one on the terminal.
    /// Each vector has one bit per primary input, in declaration order:
    ///    01101
    /// Enter q, n or an empty line to stop.
    ///
    /// Fault sites are:
    ///   1 (pi): primary inputs
    ///   2 (po): primary outputs
    ///   3 (go): gate outputs
    ///   4 (pi-po): primary inputs and outputs
    ///   5 (all): all of the above
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),

    /// Apply random vectors until a fault coverage target is reached
    ///
    /// Some faults may be undetectable, so the number of vectors is capped.
    #[clap(alias = "cov")]
    Coverage(CoverageArgs),
}

fn read_circuit(path: &Path) -> Result<Netlist> {
    let netlist = read_netlist_file(path)
        .with_context(|| format!("Failed to read circuit {}", path.display()))?;
    info!("Circuit {}:\n{}", path.display(), netlist);
    Ok(netlist)
}

fn open_report(path: Option<&Path>, default: Box<dyn Write>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let f = File::create(p)
                .with_context(|| format!("Failed to create report file {}", p.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => default,
    })
}

/// Command arguments for circuit informations
#[derive(Args)]
pub struct ShowArgs {
    /// Circuit to show
    circuit: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) -> Result<()> {
        let netlist = read_circuit(&self.circuit)?;
        println!("Circuit stats:\n{}", stats::stats(&netlist));
        println!("Faults:");
        for sites in FaultSites::ALL {
            let u = FaultUniverse::new(&netlist, sites);
            println!("\t{}: {}", sites, u.len());
        }
        Ok(())
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Circuit to simulate
    circuit: PathBuf,

    /// Fault sites: 1 (pi), 2 (po), 3 (go), 4 (pi-po) or 5 (all)
    #[arg(short, long)]
    sites: FaultSites,

    /// Test vector file; vectors are entered on the terminal if absent
    #[arg(short = 'i', long)]
    vectors: Option<PathBuf>,

    /// Output file for the report; the report is printed if absent
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Check the results against serial simulation of each fault
    #[arg(long)]
    verify: bool,
}

impl SimulateArgs {
    pub fn run(&self) -> Result<()> {
        let netlist = read_circuit(&self.circuit)?;
        let universe = FaultUniverse::new(&netlist, self.sites);
        let out = open_report(self.output.as_deref(), Box::new(std::io::stdout()))?;
        let mut sink = Verifier {
            netlist: &netlist,
            universe: &universe,
            enabled: self.verify,
            mismatches: 0,
            inner: TextReport::new(out),
        };
        let mut session = Session::new(&netlist, &universe);
        match &self.vectors {
            Some(path) => {
                let vectors = read_vector_file(path)
                    .with_context(|| format!("Failed to read vectors {}", path.display()))?;
                let mut source = VectorList::new(vectors);
                session.run_interactive(&mut source, &mut sink)?;
            }
            None => {
                let mut source = PromptVectors::new(std::io::stdin().lock(), std::io::stdout());
                session.run_interactive(&mut source, &mut sink)?;
            }
        }
        if sink.mismatches != 0 {
            bail!(
                "Deductive and serial simulation disagree on {} vectors",
                sink.mismatches
            );
        }
        Ok(())
    }
}

/// Compares the faults detected by each vector with serial fault simulation
struct Verifier<'a, R: ReportSink> {
    netlist: &'a Netlist,
    universe: &'a FaultUniverse,
    enabled: bool,
    mismatches: usize,
    inner: R,
}

impl<R: ReportSink> ReportSink for Verifier<'_, R> {
    fn vector(&mut self, report: &VectorReport) -> std::io::Result<()> {
        if self.enabled {
            let deductive: FaultSet = report
                .output_faults
                .iter()
                .flat_map(|(_, f)| f.iter().copied())
                .collect();
            let serial = match detect_serial(self.netlist, self.universe, &report.vector) {
                Ok(serial) => serial,
                Err(e) => {
                    error!("Vector {}: serial simulation failed: {e}", report.index);
                    self.mismatches += 1;
                    return self.inner.vector(report);
                }
            };
            if deductive != serial {
                error!(
                    "Vector {}: deductive simulation missed {} and wrongly detected {}",
                    report.index,
                    serial.difference(&deductive).join(", "),
                    deductive.difference(&serial).join(", ")
                );
                self.mismatches += 1;
            }
        }
        self.inner.vector(report)
    }

    fn rejected(&mut self, error: &dfsim::Error) -> std::io::Result<()> {
        self.inner.rejected(error)
    }

    fn finish(&mut self, summary: &SessionSummary) -> std::io::Result<()> {
        self.inner.finish(summary)
    }
}

/// Command arguments for target coverage
#[derive(Args)]
pub struct CoverageArgs {
    /// Circuit to simulate
    circuit: PathBuf,

    /// Fault sites: 1 (pi), 2 (po), 3 (go), 4 (pi-po) or 5 (all)
    #[arg(short, long)]
    sites: FaultSites,

    /// Target fault coverage, in percent (at least 0 and below 100)
    #[arg(short, long)]
    target: f64,

    /// Random seed for vector generation
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Maximum number of vectors to apply
    #[arg(long, default_value_t = 10000)]
    max_vectors: usize,

    /// Output file for the detailed report
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl CoverageArgs {
    pub fn run(&self) -> Result<()> {
        check_target(self.target)?;
        let netlist = read_circuit(&self.circuit)?;
        let universe = FaultUniverse::new(&netlist, self.sites);
        let out = open_report(self.output.as_deref(), Box::new(std::io::sink()))?;
        let mut sink = ProgressReport::new(universe.len(), TextReport::new(out));
        let mut source = RandomVectors::from_seed(self.seed);
        let mut session = Session::new(&netlist, &universe);
        let summary =
            session.run_to_target(self.target, self.max_vectors, &mut source, &mut sink)?;
        println!("Fault coverage: {}", summary.coverage);
        println!("Vectors applied: {}", summary.nb_vectors);
        if summary.target_reached == Some(false) {
            println!(
                "Coverage target of {}% not reached after {} vectors",
                self.target, self.max_vectors
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};

    #[test]
    fn test_target_checked_before_loading() {
        // The circuit does not exist: only the target can be reported
        let cli = Cli::try_parse_from([
            "dfsim",
            "coverage",
            "no_such_circuit.txt",
            "--sites",
            "all",
            "--target",
            "100",
        ])
        .unwrap();
        let Commands::Coverage(args) = cli.command else {
            panic!("Expected the coverage command");
        };
        let err = args.run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<dfsim::Error>(),
            Some(dfsim::Error::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_sites_argument() {
        let cli = Cli::try_parse_from(["dfsim", "sim", "c17.txt", "--sites", "pi-po"]).unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("Expected the simulate command");
        };
        assert_eq!(args.sites, dfsim::sim::FaultSites::InputsOutputs);
        assert!(Cli::try_parse_from(["dfsim", "sim", "c17.txt", "--sites", "6"]).is_err());
    }
}
