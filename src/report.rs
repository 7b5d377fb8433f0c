use rcs_file::Num;
use thiserror::Error;

/// A non-fatal defect found while indexing or walking an RCS file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("delta {0} has no matching deltatext")]
    MissingDeltaText(Num),

    #[error("deltatext {0} has no matching delta")]
    MissingDelta(Num),

    #[error("revision {revision} names an ancestor {next} that is not in the file")]
    BrokenChain { revision: Num, next: Num },

    #[error("ancestor chain loops back through {0}")]
    CircularChain(Num),
}

/// Receives the warnings a model emits.
///
/// The reporter is injected at construction so that callers can capture
/// warnings instead of logging them; it must be shareable because queries
/// take the model by shared reference.
pub trait ReportWarnings: Send + Sync {
    fn report(&self, warning: &Warning);
}

/// The default reporter: forwards warnings to the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl ReportWarnings for LogReporter {
    fn report(&self, warning: &Warning) {
        log::warn!("{}", warning);
    }
}
