use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::account_map::AccountMap;
use crate::error::{ConvertError, Result};
use crate::iif;
use crate::pjr;
use crate::transaction::TransactionRecord;

/// Conversion behavior toggles, owned by the caller.
#[derive(Debug, Default, Clone)]
pub struct ConvertOptions {
    /// Drop records with a negative amount after extraction succeeds.
    pub ignore_negative: bool,
    /// When set, only documents whose `TenderCode` equals this value are
    /// converted; everything else is skipped.
    pub tender_code: Option<String>,
}

/// Converts an ordered sequence of PJR documents into IIF ledger text.
///
/// Documents that cannot be matched to an account, or that carry no net
/// amount, are skipped and logged. Unreadable XML, malformed receipt dates
/// and malformed amounts abort the whole run; no partial text is returned.
pub fn convert<R: BufRead>(
    documents: impl IntoIterator<Item = (PathBuf, R)>,
    account_map: &AccountMap,
    options: &ConvertOptions,
) -> Result<String> {
    let mut records = Vec::new();
    for (origin, source) in documents {
        process_document(source, &origin, account_map, options, &mut records)?;
    }
    Ok(iif::render(&records))
}

/// Opens and converts the given files, one at a time, in the given order.
/// Each file handle is scoped to its own document, so a fatal error midway
/// through a document releases that file before propagating.
pub fn convert_files(
    paths: &[PathBuf],
    account_map: &AccountMap,
    options: &ConvertOptions,
) -> Result<String> {
    let mut records = Vec::new();
    for path in paths {
        let source = File::open(path)
            .map(BufReader::new)
            .map_err(|source| ConvertError::Io {
                path: path.clone(),
                source,
            })?;
        process_document(source, path, account_map, options, &mut records)?;
    }
    Ok(iif::render(&records))
}

fn process_document(
    source: impl BufRead,
    origin: &Path,
    account_map: &AccountMap,
    options: &ConvertOptions,
    records: &mut Vec<TransactionRecord>,
) -> Result<()> {
    let Some(record) = extract_record(source, origin, account_map, options)? else {
        return Ok(());
    };
    if options.ignore_negative && record.amount < Decimal::ZERO {
        log::info!(
            "Ignoring negative transaction {} ({}) from {}",
            record.transaction_id,
            record.amount,
            origin.display()
        );
        return Ok(());
    }
    records.push(record);
    Ok(())
}

fn extract_record(
    source: impl BufRead,
    origin: &Path,
    account_map: &AccountMap,
    options: &ConvertOptions,
) -> Result<Option<TransactionRecord>> {
    let fields = pjr::extract_fields(source, origin)?;
    log::debug!("Extracted from {}: {:?}", origin.display(), fields);

    if let Some(wanted) = &options.tender_code {
        if fields.tender_code.as_deref() != Some(wanted.as_str()) {
            log::info!(
                "Skipping {}: tender code {:?} is not {:?}",
                origin.display(),
                fields.tender_code,
                wanted
            );
            return Ok(None);
        }
    }

    let account_name = fields
        .account_id
        .as_deref()
        .and_then(|raw_id| account_map.resolve(raw_id));
    let Some(account_name) = account_name else {
        log::info!(
            "Skipping {}: no account matches ID {:?}",
            origin.display(),
            fields.account_id
        );
        return Ok(None);
    };
    let Some(net_amount) = &fields.net_amount else {
        log::info!(
            "Skipping {}: no TransactionTotalNetAmount tag",
            origin.display()
        );
        return Ok(None);
    };

    let receipt_date = match &fields.receipt_date {
        Some(value) => pjr::parse_receipt_date(value, origin)?,
        None => {
            return Err(ConvertError::ReceiptDate {
                path: origin.to_path_buf(),
                value: String::new(),
            })
        }
    };
    let amount = pjr::parse_net_amount(net_amount, origin)?;

    Ok(Some(TransactionRecord {
        receipt_date,
        transaction_id: fields.transaction_id.unwrap_or_default(),
        amount,
        account_name: account_name.to_string(),
    }))
}
