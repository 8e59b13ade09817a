use crate::error::OperationError;

/// Final result of one operation on one batch item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Success(String),
    /// Succeeded with nothing worth printing
    Quiet,
    Failure(String),
}

impl OperationOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, OperationOutcome::Failure(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OperationOutcome::Failure(_))
    }
}

impl From<OperationError> for OperationOutcome {
    fn from(err: OperationError) -> Self {
        OperationOutcome::Failure(err.to_string())
    }
}

/// One item of a batch together with the name it was reported under
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRecord<T> {
    pub item: T,
    pub name: String,
    pub outcome: OperationOutcome,
}

/// Ordered outcomes of a batch run, one record per item, in scan order
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult<T> {
    records: Vec<OutcomeRecord<T>>,
}

impl<T> BatchResult<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: OutcomeRecord<T>) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[OutcomeRecord<T>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutcomeRecord<T>> {
        self.records.iter()
    }

    pub fn failures(&self) -> impl Iterator<Item = &OutcomeRecord<T>> {
        self.records.iter().filter(|r| r.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new()
    }
}
