/// A program as read from disk, before the scheduler turns it into a PCB.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub priority: u32,
    pub instructions: Vec<String>,
}
