use std::path::PathBuf;

use thiserror::Error;

/// Fatal conversion failures. Any of these aborts the whole run; no partial
/// ledger text is returned. Documents that merely fail the acceptance rules
/// (unknown account, missing amount tag) are skipped, not errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse account map {}: {source}", path.display())]
    MapCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("account map {} line {line}: expected 2 columns, found {found}", path.display())]
    MapRowShape { path: PathBuf, line: u64, found: usize },

    #[error("failed to parse {} as XML: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    #[error("unable to parse receipt date {value:?} from {}", path.display())]
    ReceiptDate { path: PathBuf, value: String },

    #[error("unable to parse net amount {value:?} from {}", path.display())]
    NetAmount { path: PathBuf, value: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
