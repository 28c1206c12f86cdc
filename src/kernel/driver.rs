use std::fs;
use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use log::info;

use super::*;

use crate::config::{Config, QuantumSource};
use crate::io::{loader, EventLog, Program};

/// Loads the programs once and runs a fresh scheduler for every configured quantum.
pub struct Driver {
    config: Config,
}

impl Driver {
    pub fn new(config: Config) -> Driver {
        Driver { config }
    }

    pub fn start(&mut self) -> Result<Vec<RunStatistics>> {
        info!("Starting the driver.");
        let quanta = self.quanta()?;

        let priorities = loader::read_priorities(&self.config.priorities_file)
            .context("Failed to read the priority list")?;
        let programs = loader::load_programs(&self.config.programs_dir, &priorities)
            .context("Failed to load programs")?;

        if programs.is_empty() {
            info!("No programs to schedule.");
        }

        fs::create_dir_all(&self.config.log_dir)
            .with_context(|| format!("Failed to create {}", self.config.log_dir.display()))?;

        let mut run_stats = Vec::with_capacity(quanta.len());
        for quantum in quanta {
            info!("...Running {} processes with quantum {}.", programs.len(), quantum);

            let mut event_log = EventLog::open(&self.config.log_dir, quantum.get())
                .with_context(|| format!("Failed to open the event log for quantum {}", quantum))?;
            let stats =
                Driver::run_once(&programs, quantum, self.config.credit_policy, &mut event_log);
            run_stats.push(stats);
        }

        print_stats(&run_stats);
        Ok(run_stats)
    }

    /// One complete scheduler run over `programs`.
    pub fn run_once(
        programs: &[Program],
        quantum: NonZeroUsize,
        credit_policy: CreditPolicy,
        sink: &mut dyn EventSink,
    ) -> RunStatistics {
        let mut sts = ShortTermScheduler::new(quantum, credit_policy);
        sts.load(programs, sink);
        sts.run(sink)
    }

    fn quanta(&self) -> Result<Vec<NonZeroUsize>> {
        match &self.config.quantum {
            QuantumSource::Fixed(quantum) => Ok(vec![*quantum]),
            QuantumSource::File(path) => {
                let quantum = loader::read_quantum(path).context("Failed to read the quantum")?;
                Ok(vec![quantum])
            }
            QuantumSource::Sweep { first, last } => Ok((first.get()..=last.get())
                .filter_map(NonZeroUsize::new)
                .collect()),
        }
    }
}

/// Quantum with the highest ratio of instructions per switch to switches per process.
///
/// The first quantum wins ties; runs without switches score 0.
pub fn best_quantum(run_stats: &[RunStatistics]) -> Option<usize> {
    let score = |stats: &RunStatistics| {
        let mean_switches = stats.mean_switches();
        if mean_switches == 0.0 {
            0.0
        } else {
            stats.mean_instructions_per_switch() / mean_switches
        }
    };

    let mut best: Option<(usize, f64)> = None;
    for stats in run_stats {
        let candidate = score(stats);
        if best.map_or(true, |(_, top)| candidate > top) {
            best = Some((stats.quantum, candidate));
        }
    }

    best.map(|(quantum, _)| quantum)
}

fn print_stats(run_stats: &[RunStatistics]) {
    println!("Stats for scheduler runs:");
    println!("... Quantum | Switches | Instructions | Mean Switches | Mean Instr/Switch");
    println!("...---------|----------|--------------|---------------|------------------");
    for stats in run_stats {
        println!(
            "... {:02}      | {:05}    | {:05}        | {:06.2}        | {:06.2}",
            stats.quantum,
            stats.context_switches,
            stats.instructions_executed,
            stats.mean_switches(),
            stats.mean_instructions_per_switch()
        );
    }

    if run_stats.len() > 1 {
        if let Some(quantum) = best_quantum(run_stats) {
            println!("Best quantum: {}", quantum);
        }
    }
}
