mod cpu;
mod event;
mod process_control_block;
mod process_table;
mod short_term_scheduler;

use cpu::{Cpu, Interrupt};
use process_control_block::{ProcessControlBlock, ProcessState};
use process_table::ProcessTable;
use short_term_scheduler::ShortTermScheduler;

pub mod driver;

pub use driver::Driver;
pub use event::{Event, EventSink};
pub use short_term_scheduler::{CreditPolicy, RunStatistics};
