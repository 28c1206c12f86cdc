use std::collections::HashMap;

use super::ProcessControlBlock;

/// Owns every live PCB, keyed by process name.
pub(crate) struct ProcessTable {
    pcb_map: HashMap<String, ProcessControlBlock>,
}

impl ProcessTable {
    pub fn new() -> ProcessTable {
        ProcessTable {
            pcb_map: HashMap::new(),
        }
    }

    /// Inserts the PCB, replacing any live process with the same name.
    pub fn add(&mut self, pcb: ProcessControlBlock) -> Option<ProcessControlBlock> {
        self.pcb_map.insert(pcb.get_name().to_string(), pcb)
    }

    pub fn remove(&mut self, name: &str) -> Option<ProcessControlBlock> {
        self.pcb_map.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ProcessControlBlock> {
        self.pcb_map.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ProcessControlBlock> {
        self.pcb_map.get_mut(name)
    }

    /// Credits of a live process; 0 for names no longer in the table.
    pub fn credits_of(&self, name: &str) -> u32 {
        self.get(name).map_or(0, |pcb| pcb.credits)
    }

    pub fn len(&self) -> usize {
        self.pcb_map.len()
    }
}
