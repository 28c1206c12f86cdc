use crate::io::Program;

use super::cpu::Instruction;

/// Ticks a process spends in the blocked queue after issuing `E/S`.
pub(crate) const IO_WAIT_TICKS: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProcessState {
    Ready,
    Blocked,
}

#[derive(Debug)]
pub(crate) struct ProcessControlBlock {
    pub program_counter: usize,
    pub register_x: i64,
    pub register_y: i64,
    pub state: ProcessState,
    pub credits: u32,
    pub wait_ticks: i32,

    name: String,
    priority: u32,
    instructions: Vec<Instruction>,
}

impl ProcessControlBlock {
    pub fn new(program: &Program) -> ProcessControlBlock {
        ProcessControlBlock {
            name: program.name.clone(),
            priority: program.priority,
            instructions: program
                .instructions
                .iter()
                .map(String::as_str)
                .map(Instruction::decode)
                .collect(),
            program_counter: 0,
            register_x: 0,
            register_y: 0,
            state: ProcessState::Ready,
            credits: program.priority,
            wait_ticks: 0,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_priority(&self) -> u32 {
        self.priority
    }

    /// The instruction at the program counter, or `None` once the program has run off its end.
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.instructions.get(self.program_counter)
    }

    pub fn is_finished(&self) -> bool {
        self.program_counter >= self.instructions.len()
    }

    pub fn restore_credits(&mut self) {
        self.credits = self.priority;
    }

    pub fn spend_credit(&mut self) {
        self.credits = self.credits.saturating_sub(1);
    }

    pub fn block_for_io(&mut self) {
        self.state = ProcessState::Blocked;
        self.wait_ticks = IO_WAIT_TICKS;
    }

    /// Counts one aging pass down. Returns true when the process is ready again.
    pub fn tick_wait(&mut self) -> bool {
        self.wait_ticks -= 1;
        if self.wait_ticks <= 0 {
            self.state = ProcessState::Ready;
            return true;
        }
        false
    }
}
