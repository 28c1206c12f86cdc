use super::ProcessControlBlock;

/// A decoded program line. Decoding happens once, when the PCB is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Instruction {
    SetX(i64),
    SetY(i64),
    Compute,
    BlockOnIo,
    Exit,
    Unknown,
}

impl Instruction {
    pub fn decode(text: &str) -> Instruction {
        let text = text.trim();

        if let Some(operand) = text.strip_prefix("X=") {
            return operand.trim().parse().map(Instruction::SetX).unwrap_or(Instruction::Unknown);
        }
        if let Some(operand) = text.strip_prefix("Y=") {
            return operand.trim().parse().map(Instruction::SetY).unwrap_or(Instruction::Unknown);
        }

        match text {
            "COM" => Instruction::Compute,
            "E/S" => Instruction::BlockOnIo,
            "SAIDA" => Instruction::Exit,
            _ => Instruction::Unknown,
        }
    }
}

/// Why a process gave up the CPU before its quantum ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Interrupt {
    Io,
    Exit,
}

pub(crate) struct Cpu;

impl Cpu {
    /// Fetches the instruction at the program counter, advances the counter and executes it.
    ///
    /// Callers check `is_finished` first; a PCB with nothing left to fetch is left untouched.
    pub fn cycle(pcb: &mut ProcessControlBlock) -> Option<Interrupt> {
        let instruction = *pcb.current_instruction()?;
        pcb.program_counter += 1;

        Cpu::execute(pcb, instruction)
    }

    fn execute(pcb: &mut ProcessControlBlock, instruction: Instruction) -> Option<Interrupt> {
        match instruction {
            Instruction::SetX(value) => pcb.register_x = value,
            Instruction::SetY(value) => pcb.register_y = value,
            Instruction::Compute => {}
            Instruction::BlockOnIo => {
                pcb.block_for_io();
                return Some(Interrupt::Io);
            }
            Instruction::Exit => return Some(Interrupt::Exit),
            // Unrecognised lines are tolerated.
            Instruction::Unknown => {}
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::io::Program;
    use crate::kernel::ProcessState;

    fn pcb_with(instructions: &[&str]) -> ProcessControlBlock {
        ProcessControlBlock::new(&Program {
            name: "P1".to_string(),
            priority: 1,
            instructions: instructions.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_decode_known_instructions() {
        assert_eq!(Instruction::decode("X=5"), Instruction::SetX(5));
        assert_eq!(Instruction::decode("Y=-12"), Instruction::SetY(-12));
        assert_eq!(Instruction::decode("COM"), Instruction::Compute);
        assert_eq!(Instruction::decode("E/S"), Instruction::BlockOnIo);
        assert_eq!(Instruction::decode("SAIDA"), Instruction::Exit);
    }

    #[test]
    fn test_decode_trims_whitespace() {
        assert_eq!(Instruction::decode("  X= 7 \r"), Instruction::SetX(7));
        assert_eq!(Instruction::decode("COM\n"), Instruction::Compute);
    }

    #[test]
    fn test_decode_unknown_instructions() {
        assert_eq!(Instruction::decode("JMP 4"), Instruction::Unknown);
        assert_eq!(Instruction::decode("X=abc"), Instruction::Unknown);
        assert_eq!(Instruction::decode("com"), Instruction::Unknown);
        assert_eq!(Instruction::decode(""), Instruction::Unknown);
    }

    #[test]
    fn test_cycle_sets_registers_and_advances() {
        let mut pcb = pcb_with(&["X=5", "Y=7"]);
        assert_eq!(Cpu::cycle(&mut pcb), None);
        assert_eq!(Cpu::cycle(&mut pcb), None);
        assert_eq!(pcb.register_x, 5);
        assert_eq!(pcb.register_y, 7);
        assert_eq!(pcb.program_counter, 2);
    }

    #[test]
    fn test_cycle_io_blocks_process() {
        let mut pcb = pcb_with(&["E/S"]);
        assert_eq!(Cpu::cycle(&mut pcb), Some(Interrupt::Io));
        assert_eq!(pcb.state, ProcessState::Blocked);
        assert_eq!(pcb.wait_ticks, 2);
        assert_eq!(pcb.program_counter, 1);
    }

    #[test]
    fn test_cycle_exit_interrupts() {
        let mut pcb = pcb_with(&["SAIDA", "X=1"]);
        assert_eq!(Cpu::cycle(&mut pcb), Some(Interrupt::Exit));
        assert_eq!(pcb.state, ProcessState::Ready);
        assert_eq!(pcb.register_x, 0);
    }

    #[test]
    fn test_cycle_unknown_is_noop() {
        let mut pcb = pcb_with(&["NOP", "COM"]);
        assert_eq!(Cpu::cycle(&mut pcb), None);
        assert_eq!(Cpu::cycle(&mut pcb), None);
        assert_eq!(pcb.register_x, 0);
        assert_eq!(pcb.program_counter, 2);
    }

    #[test]
    fn test_cycle_past_end_does_nothing() {
        let mut pcb = pcb_with(&[]);
        assert_eq!(Cpu::cycle(&mut pcb), None);
        assert_eq!(pcb.program_counter, 0);
    }
}
