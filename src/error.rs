use rcs_file::Num;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    File(#[from] rcs_file::Error),

    #[error(transparent)]
    EditScript(#[from] ed_script::Error),

    #[error(transparent)]
    BadPattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("duplicate revision {0}")]
    DuplicateRevision(Num),

    #[error("unknown revision {0}")]
    UnknownRevision(Num),

    #[error("no head revision, and no trunk revision to fall back on")]
    MissingHead,

    #[error("unknown format directive {0:?}")]
    BadFormat(char),
}
