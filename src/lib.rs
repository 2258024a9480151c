pub use self::{
    account_map::AccountMap,
    convert::{convert, convert_files, ConvertOptions},
    error::{ConvertError, Result},
    transaction::TransactionRecord,
};

mod account_map;
pub mod args;
pub mod cli;
mod convert;
mod error;
mod iif;
mod pjr;
mod transaction;
