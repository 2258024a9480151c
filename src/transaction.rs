use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One accepted transaction, ready for ledger emission.
///
/// A record only exists once its account name resolved and its amount
/// parsed; documents failing either rule never get this far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub receipt_date: NaiveDate,
    pub transaction_id: String,
    pub amount: Decimal,
    pub account_name: String,
}
