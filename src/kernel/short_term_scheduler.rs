use std::cmp::Reverse;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

use log::{debug, warn};

use super::{Cpu, Event, EventSink, Interrupt, ProcessControlBlock, ProcessState, ProcessTable};

use crate::io::Program;

/// How credits are charged to a running process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CreditPolicy {
    /// One credit per dispatch, however many instructions the quantum runs.
    #[default]
    PerDispatch,
    /// One credit per executed instruction.
    PerInstruction,
}

/// Aggregate numbers for one scheduler run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunStatistics {
    pub quantum: usize,
    pub context_switches: usize,
    pub instructions_executed: usize,
    pub processes_loaded: usize,
}

impl RunStatistics {
    pub fn mean_switches(&self) -> f64 {
        if self.processes_loaded == 0 {
            return 0.0;
        }
        self.context_switches as f64 / self.processes_loaded as f64
    }

    pub fn mean_instructions_per_switch(&self) -> f64 {
        if self.context_switches == 0 {
            return 0.0;
        }
        self.instructions_executed as f64 / self.context_switches as f64
    }
}

/// Credit-based preemptive scheduler.
///
/// The process table owns the PCBs; both queues refer to them by name. The
/// ready queue is kept ordered by credits (highest first, ties in arrival
/// order) and dispatch always takes its head.
pub(crate) struct ShortTermScheduler {
    quantum: NonZeroUsize,
    credit_policy: CreditPolicy,
    process_table: ProcessTable,
    ready_queue: VecDeque<String>,
    blocked_queue: Vec<String>,
    context_switches: usize,
    instructions_executed: usize,
    processes_loaded: usize,
}

impl ShortTermScheduler {
    pub fn new(quantum: NonZeroUsize, credit_policy: CreditPolicy) -> ShortTermScheduler {
        ShortTermScheduler {
            quantum,
            credit_policy,
            process_table: ProcessTable::new(),
            ready_queue: VecDeque::new(),
            blocked_queue: Vec::new(),
            context_switches: 0,
            instructions_executed: 0,
            processes_loaded: 0,
        }
    }

    /// Builds a PCB per program and orders the ready queue by priority.
    pub fn load(&mut self, programs: &[Program], sink: &mut dyn EventSink) {
        for program in programs {
            let pcb = ProcessControlBlock::new(program);
            let name = pcb.get_name().to_string();

            if self.process_table.add(pcb).is_some() {
                warn!("Process {} loaded twice, keeping the last definition.", name);
                self.ready_queue.retain(|queued| *queued != name);
            } else {
                self.processes_loaded += 1;
            }
            self.ready_queue.push_back(name);
        }

        // Stable: equal priorities keep load order.
        let process_table = &self.process_table;
        self.ready_queue
            .make_contiguous()
            .sort_by_key(|name| {
                Reverse(process_table.get(name).map_or(0, |pcb| pcb.get_priority()))
            });

        for name in &self.ready_queue {
            emit(sink, Event::Loaded { name: name.clone() });
        }
    }

    /// Runs until every process has terminated or exited, then reports the statistics.
    pub fn run(&mut self, sink: &mut dyn EventSink) -> RunStatistics {
        while self.has_work() {
            self.step(sink);
        }

        let stats = self.statistics();
        emit(sink, Event::MeanSwitches(stats.mean_switches()));
        emit(sink, Event::MeanInstructionsPerSwitch(stats.mean_instructions_per_switch()));
        emit(sink, Event::Quantum(stats.quantum));

        stats
    }

    pub fn has_work(&self) -> bool {
        !self.ready_queue.is_empty() || !self.blocked_queue.is_empty()
    }

    /// One pass of the dispatch loop.
    pub fn step(&mut self, sink: &mut dyn EventSink) {
        if self.credits_exhausted() {
            self.redistribute_credits();
        }

        if !self.blocked_queue.is_empty() {
            self.age_blocked();
        }

        if let Some(name) = self.ready_queue.pop_front() {
            self.dispatch(&name, sink);
            self.sort_ready_by_credits();
        }
    }

    /// Gives every ready process its priority back as credits.
    pub fn redistribute_credits(&mut self) {
        debug!("Redistributing credits to {} ready processes.", self.ready_queue.len());

        for name in &self.ready_queue {
            if let Some(pcb) = self.process_table.get_mut(name) {
                pcb.restore_credits();
            }
        }
        self.sort_ready_by_credits();
    }

    pub fn statistics(&self) -> RunStatistics {
        RunStatistics {
            quantum: self.quantum.get(),
            context_switches: self.context_switches,
            instructions_executed: self.instructions_executed,
            processes_loaded: self.processes_loaded,
        }
    }

    fn credits_exhausted(&self) -> bool {
        !self.ready_queue.is_empty()
            && self.ready_queue.iter().all(|name| self.process_table.credits_of(name) == 0)
    }

    fn sort_ready_by_credits(&mut self) {
        let process_table = &self.process_table;
        self.ready_queue
            .make_contiguous()
            .sort_by_key(|name| Reverse(process_table.credits_of(name)));
    }

    /// Counts every blocked process down one tick and moves the ones that are
    /// done waiting to the tail of the ready queue, in blocked-queue order.
    fn age_blocked(&mut self) {
        let mut still_blocked = Vec::with_capacity(self.blocked_queue.len());

        for name in std::mem::take(&mut self.blocked_queue) {
            let Some(pcb) = self.process_table.get_mut(&name) else {
                continue;
            };

            if pcb.tick_wait() {
                debug!("Process {} woke up.", name);
                self.ready_queue.push_back(name);
            } else {
                still_blocked.push(name);
            }
        }

        self.blocked_queue = still_blocked;
    }

    fn dispatch(&mut self, name: &str, sink: &mut dyn EventSink) {
        let Some(pcb) = self.process_table.get_mut(name) else {
            return;
        };

        self.context_switches += 1;
        if self.credit_policy == CreditPolicy::PerDispatch {
            pcb.spend_credit();
        }
        emit(sink, Event::Dispatched { name: name.to_string() });

        let mut executed = 0;
        let mut interrupt = None;

        for _ in 0..self.quantum.get() {
            if pcb.is_finished() {
                let event = Event::Terminated {
                    name: name.to_string(),
                    x: pcb.register_x,
                    y: pcb.register_y,
                };
                self.instructions_executed += executed;
                self.remove_process(name);
                emit(sink, event);
                return;
            }

            interrupt = Cpu::cycle(pcb);
            executed += 1;
            if self.credit_policy == CreditPolicy::PerInstruction {
                pcb.spend_credit();
            }

            if interrupt.is_some() {
                break;
            }
        }

        self.instructions_executed += executed;
        let (x, y) = (pcb.register_x, pcb.register_y);
        let still_ready = pcb.state == ProcessState::Ready;

        match interrupt {
            Some(Interrupt::Io) => {
                emit(sink, Event::IoStarted { name: name.to_string() });
                self.blocked_queue.push(name.to_string());
            }
            Some(Interrupt::Exit) => {
                self.remove_process(name);
                emit(sink, Event::Exited { name: name.to_string(), x, y });
            }
            None if still_ready => self.ready_queue.push_back(name.to_string()),
            None => {}
        }

        emit(
            sink,
            Event::Interrupted {
                name: name.to_string(),
                instructions: executed,
                x,
                y,
            },
        );
    }

    fn remove_process(&mut self, name: &str) {
        self.process_table.remove(name);
        debug!("Process {} removed, {} left.", name, self.process_table.len());
        self.ready_queue.retain(|queued| queued != name);
        self.blocked_queue.retain(|queued| queued != name);
    }
}

fn emit(sink: &mut dyn EventSink, event: Event) {
    debug!("{}", event);
    sink.record(event);
}
