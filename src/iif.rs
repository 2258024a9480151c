use std::fmt::Write as _;

use crate::transaction::TransactionRecord;

/// IIF field-layout declaration, emitted exactly once per output file no
/// matter how many transactions follow.
const IIF_HEADER: &str = "!TRNS\tTRNSID\tTRNSTYPE\tDATE\tDOCNUM\tACCNT\tNAME\tAMOUNT\tPAID\n\
                          !SPL\tSPLID\tTRNSTYPE\tDATE\tACCNT\tAMOUNT\tCLEAR\n\
                          !ENDTRNS\n";

const RECEIVABLE_ACCOUNT: &str = "Accounts Receivable";
const SALES_ACCOUNT: &str = "Sales:Local Account Sales";

/// Renders the full ledger text: header block plus one TRNS/SPL/ENDTRNS
/// block per record, in the given order.
pub fn render(records: &[TransactionRecord]) -> String {
    let mut out = String::from(IIF_HEADER);
    for record in records {
        append_transaction(&mut out, record);
    }
    out
}

/// Appends one double-entry pair: the invoice line against the receivable
/// account and the offsetting split against the sales account. The date is
/// pinned to zero-padded `MM/DD/YY`.
fn append_transaction(out: &mut String, record: &TransactionRecord) {
    let date = record.receipt_date.format("%m/%d/%y");
    write!(
        out,
        "\nTRNS\t\tINVOICE\t{date}\t{doc_num}\t{RECEIVABLE_ACCOUNT}\t{name}\t{amount:.2}\tN\n\
         SPL\t\tINVOICE\t{date}\t{SALES_ACCOUNT}\t{split_amount:.2}\tN\n\
         ENDTRNS\n",
        doc_num = record.transaction_id,
        name = record.account_name,
        amount = record.amount,
        split_amount = -record.amount,
    )
    .expect("writing to a String cannot fail");
}
