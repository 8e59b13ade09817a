use crate::domain::outcome::OperationOutcome;

/// Progress and result reporting for a batch, decoupled from any terminal.
///
/// `start` and `stop` bracket a running operation; `finish` reports its final
/// outcome once the indicator is gone. Implementations must not fail and must
/// not block the operation they decorate.
pub trait Reporter {
    fn start(&mut self, label: &str);
    fn stop(&mut self);
    fn finish(&mut self, name: &str, outcome: &OperationOutcome);
}

/// Everything a reporter was asked to show, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Started(String),
    Stopped,
    Finished(String, OperationOutcome),
}

/// Reporter that keeps every call, for tests and non-interactive callers
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines a console would have printed: quiet successes print nothing
    pub fn printed_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Finished(name, OperationOutcome::Success(summary)) => {
                    Some(format!("{}: {}", name, summary))
                }
                ReportEvent::Finished(name, OperationOutcome::Failure(message)) => {
                    Some(format!("{}: {}", name, message))
                }
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn start(&mut self, label: &str) {
        self.events.push(ReportEvent::Started(label.to_string()));
    }

    fn stop(&mut self) {
        self.events.push(ReportEvent::Stopped);
    }

    fn finish(&mut self, name: &str, outcome: &OperationOutcome) {
        self.events
            .push(ReportEvent::Finished(name.to_string(), outcome.clone()));
    }
}
