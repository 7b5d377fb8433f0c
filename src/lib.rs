//! Historical queries over RCS (`,v`) version-control files, as used by RCS
//! and CVS.
//!
//! The centrepiece is a revision-aware grep: [`RcsFile::grep`] walks the
//! trunk from the head revision backwards, replaying each stored edit script
//! in reverse, and reports every line of every revision that matches a
//! pattern without ever materialising a full revision body other than the
//! head.

mod error;
mod format;
mod grep;
mod model;
mod report;

pub use error::Error;
pub use format::{Directive, Field, DEFAULT_FORMAT};
pub use grep::Match;
pub use model::RcsFile;
pub use report::{LogReporter, ReportWarnings, Warning};

pub use rcs_file::{Admin, Date, Delta, DeltaText, Id, Num, Rev, Sym, VString};
