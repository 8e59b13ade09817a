//! Batch orchestration shared by every subcommand.
//!
//! A batch runs one [`Operation`] per item, strictly in order. Whatever a
//! single item does, including panicking, ends up as that item's
//! [`OperationOutcome`] and the batch moves on to the next item.

use crate::domain::outcome::{BatchResult, OperationOutcome, OutcomeRecord};
use crate::domain::repo::RepositoryRef;
use crate::error::Result;
use crate::ports::reporter::Reporter;
use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// A single-item operation driven by [`run_batch`]
pub trait Operation<T = RepositoryRef> {
    /// Name the item is reported under. Failing here skips the item
    /// without starting the progress indicator.
    fn display_name(&self, item: &T) -> Result<String>;

    /// Text shown next to the progress indicator while the item runs
    fn label(&self, name: &str) -> String;

    fn run(&mut self, item: &T) -> Result<OperationOutcome>;
}

/// Stops the indicator when dropped, whichever way the operation ended
struct Running<'a> {
    reporter: &'a mut dyn Reporter,
}

impl<'a> Running<'a> {
    fn start(reporter: &'a mut dyn Reporter, label: &str) -> Self {
        reporter.start(label);
        Self { reporter }
    }
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.reporter.stop();
    }
}

/// Run `op` over every item, in order, isolating each item's failure.
///
/// Always returns exactly one record per item, in the order given.
pub fn run_batch<T, O>(items: &[T], op: &mut O, reporter: &mut dyn Reporter) -> BatchResult<T>
where
    T: Clone + Display,
    O: Operation<T> + ?Sized,
{
    let mut result = BatchResult::new();

    for item in items {
        let (name, outcome) = run_one(item, op, reporter);
        reporter.finish(&name, &outcome);
        result.push(OutcomeRecord {
            item: item.clone(),
            name,
            outcome,
        });
    }

    debug!(
        total = result.len(),
        failed = result.failures().count(),
        "batch finished"
    );
    result
}

fn run_one<T, O>(item: &T, op: &mut O, reporter: &mut dyn Reporter) -> (String, OperationOutcome)
where
    T: Display,
    O: Operation<T> + ?Sized,
{
    let name = match op.display_name(item) {
        Ok(name) => name,
        Err(err) => {
            warn!(item = %item, error = %err, "skipping item");
            return (item.to_string(), err.into());
        }
    };

    let label = op.label(&name);
    let _running = Running::start(reporter, &label);

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| op.run(item))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            debug!(name = %name, error = %err, "operation failed");
            err.into()
        }
        Err(payload) => {
            warn!(name = %name, "operation panicked");
            OperationOutcome::Failure(panic_message(payload.as_ref()))
        }
    };

    (name, outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("internal error: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("internal error: {}", s)
    } else {
        "internal error".to_string()
    }
}
