use std::fmt;

/// Something the scheduler reports while a run progresses.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Loaded { name: String },
    Dispatched { name: String },
    IoStarted { name: String },
    Interrupted { name: String, instructions: usize, x: i64, y: i64 },
    Terminated { name: String, x: i64, y: i64 },
    Exited { name: String, x: i64, y: i64 },
    MeanSwitches(f64),
    MeanInstructionsPerSwitch(f64),
    Quantum(usize),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Loaded { name } => write!(f, "Loading {}", name),
            Event::Dispatched { name } => write!(f, "Executing {}", name),
            Event::IoStarted { name } => write!(f, "I/O started in {}", name),
            Event::Interrupted { name, instructions, x, y } => write!(
                f,
                "Interrupting {} after {} instructions. X={}, Y={}",
                name, instructions, x, y
            ),
            Event::Terminated { name, x, y } => {
                write!(f, "Process {} terminated. X={}, Y={}", name, x, y)
            }
            Event::Exited { name, x, y } => write!(f, "Process {} exited. X={}, Y={}", name, x, y),
            Event::MeanSwitches(mean) => write!(f, "MEAN SWITCHES: {:.2}", mean),
            Event::MeanInstructionsPerSwitch(mean) => {
                write!(f, "MEAN INSTRUCTIONS PER QUANTUM: {:.2}", mean)
            }
            Event::Quantum(quantum) => write!(f, "QUANTUM: {}", quantum),
        }
    }
}

/// Receives scheduler events. The file-backed sink lives in `io::event_log`.
pub trait EventSink {
    fn record(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn record(&mut self, event: Event) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        let interrupted = Event::Interrupted {
            name: "P1".to_string(),
            instructions: 2,
            x: 5,
            y: 0,
        };
        assert_eq!(interrupted.to_string(), "Interrupting P1 after 2 instructions. X=5, Y=0");

        let terminated = Event::Terminated { name: "P1".to_string(), x: 5, y: 7 };
        assert_eq!(terminated.to_string(), "Process P1 terminated. X=5, Y=7");

        assert_eq!(Event::MeanSwitches(1.5).to_string(), "MEAN SWITCHES: 1.50");
        assert_eq!(
            Event::MeanInstructionsPerSwitch(0.0).to_string(),
            "MEAN INSTRUCTIONS PER QUANTUM: 0.00"
        );
        assert_eq!(Event::Quantum(3).to_string(), "QUANTUM: 3");
    }

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<Event> = Vec::new();
        sink.record(Event::Loaded { name: "A".to_string() });
        sink.record(Event::Dispatched { name: "A".to_string() });

        assert_eq!(
            sink,
            vec![
                Event::Loaded { name: "A".to_string() },
                Event::Dispatched { name: "A".to_string() },
            ]
        );
    }
}
