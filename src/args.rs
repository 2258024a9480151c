use std::path::PathBuf;

use clap::Parser;

/// Convert PJR transaction export files to a QuickBooks IIF import file.
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Args {
    /// Path to the account-ID map CSV file
    #[clap(long)]
    pub account_id_map_file: PathBuf,

    /// Where to write the IIF output; stdout when omitted
    #[clap(long)]
    pub iif_output_file: Option<PathBuf>,

    /// PJR files, or directories containing them
    #[clap(required = true)]
    pub pjr_location: Vec<PathBuf>,

    /// Delete the source PJR files after a successful conversion
    #[clap(long)]
    pub delete_pjrs_on_convert: bool,

    /// Leave transactions with a negative amount out of the output
    #[clap(long)]
    pub ignore_negative_transactions: bool,

    /// Only convert documents carrying this tender code (e.g. houseCharges)
    #[clap(long)]
    pub tender_code: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
