use std::io::BufRead;
use std::path::Path;

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::Decimal;

use crate::error::{ConvertError, Result};

const RECEIPT_DATE_TAG: &str = "ReceiptDate";
const TRANSACTION_ID_TAG: &str = "TransactionID";
const TRANSACTION_TOTAL_NET_AMOUNT_TAG: &str = "TransactionTotalNetAmount";
const ACCOUNT_ID_TAG: &str = "AccountID";
const TENDER_CODE_TAG: &str = "TenderCode";

/// The scalar values pulled out of one PJR document. Each value comes from
/// the first element with the matching local name, in document order and
/// regardless of nesting depth. A missing tag leaves the value absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PjrFields {
    pub receipt_date: Option<String>,
    pub transaction_id: Option<String>,
    pub net_amount: Option<String>,
    pub account_id: Option<String>,
    pub tender_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ReceiptDate,
    TransactionId,
    NetAmount,
    AccountId,
    TenderCode,
}

const FIELD_COUNT: usize = 5;

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            name if name == RECEIPT_DATE_TAG.as_bytes() => Some(Self::ReceiptDate),
            name if name == TRANSACTION_ID_TAG.as_bytes() => Some(Self::TransactionId),
            name if name == TRANSACTION_TOTAL_NET_AMOUNT_TAG.as_bytes() => Some(Self::NetAmount),
            name if name == ACCOUNT_ID_TAG.as_bytes() => Some(Self::AccountId),
            name if name == TENDER_CODE_TAG.as_bytes() => Some(Self::TenderCode),
            _ => None,
        }
    }
}

/// Scans a PJR document and captures the text of the first occurrence of
/// each interesting tag. Malformed XML is fatal to the whole run.
pub fn extract_fields(source: impl BufRead, origin: &Path) -> Result<PjrFields> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut values: [Option<String>; FIELD_COUNT] = Default::default();
    let mut seen = [false; FIELD_COUNT];
    let mut capturing: Option<Field> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                if capturing.is_none() {
                    if let Some(field) = Field::from_local_name(start.local_name().as_ref()) {
                        // Only the first occurrence of a tag counts, even if
                        // it turns out to hold no text.
                        if !seen[field as usize] {
                            seen[field as usize] = true;
                            capturing = Some(field);
                        }
                    }
                }
            }
            Ok(Event::Empty(empty)) => {
                if capturing.is_none() {
                    if let Some(field) = Field::from_local_name(empty.local_name().as_ref()) {
                        seen[field as usize] = true;
                    }
                }
            }
            Ok(Event::Text(text)) => {
                if let Some(field) = capturing {
                    let chunk = text.unescape().map_err(|e| ConvertError::Xml {
                        path: origin.to_path_buf(),
                        message: e.to_string(),
                    })?;
                    values[field as usize]
                        .get_or_insert_with(String::new)
                        .push_str(&chunk);
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(field) = capturing {
                    let chunk = String::from_utf8_lossy(&cdata).into_owned();
                    values[field as usize]
                        .get_or_insert_with(String::new)
                        .push_str(&chunk);
                }
            }
            Ok(Event::End(end)) => {
                if capturing == Field::from_local_name(end.local_name().as_ref()) {
                    capturing = None;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ConvertError::Xml {
                    path: origin.to_path_buf(),
                    message: e.to_string(),
                })
            }
        }
        buf.clear();
    }

    let [receipt_date, transaction_id, net_amount, account_id, tender_code] = values;
    Ok(PjrFields {
        receipt_date,
        transaction_id,
        net_amount,
        account_id,
        tender_code,
    })
}

/// Parses a receipt date in `YYYY-MM-DD` form: exactly three numeric
/// components separated by `-`, no zero-padding required. Anything else is
/// fatal to the whole run.
pub fn parse_receipt_date(value: &str, origin: &Path) -> Result<NaiveDate> {
    let fail = || ConvertError::ReceiptDate {
        path: origin.to_path_buf(),
        value: value.to_string(),
    };

    let mut parts = value.split('-');
    let year = parts.next().ok_or_else(fail)?;
    let month = parts.next().ok_or_else(fail)?;
    let day = parts.next().ok_or_else(fail)?;
    if parts.next().is_some() {
        return Err(fail());
    }

    let year: i32 = year.parse().map_err(|_| fail())?;
    let month: u32 = month.parse().map_err(|_| fail())?;
    let day: u32 = day.parse().map_err(|_| fail())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(fail)
}

/// Parses the net-amount text as a decimal. A parse failure is fatal.
pub fn parse_net_amount(value: &str, origin: &Path) -> Result<Decimal> {
    Decimal::from_str_exact(value.trim())
        .or_else(|_| value.trim().parse())
        .map_err(|_| ConvertError::NetAmount {
            path: origin.to_path_buf(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;

    use super::*;

    fn origin() -> PathBuf {
        PathBuf::from("test.xml")
    }

    fn extract(xml: &str) -> Result<PjrFields> {
        extract_fields(xml.as_bytes(), &origin())
    }

    const FULL_PJR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <Transaction>
          <Header>
            <TransactionID>T1</TransactionID>
            <ReceiptDate>2022-01-10</ReceiptDate>
          </Header>
          <Tender>
            <TenderCode>houseCharges</TenderCode>
            <Customer>
              <AccountID>123-4</AccountID>
            </Customer>
          </Tender>
          <Totals>
            <TransactionTotalNetAmount>100.00</TransactionTotalNetAmount>
          </Totals>
        </Transaction>"#;

    #[test]
    fn extracts_all_fields_regardless_of_nesting() {
        let fields = extract(FULL_PJR).unwrap();
        assert_eq!(
            fields,
            PjrFields {
                receipt_date: Some("2022-01-10".to_string()),
                transaction_id: Some("T1".to_string()),
                net_amount: Some("100.00".to_string()),
                account_id: Some("123-4".to_string()),
                tender_code: Some("houseCharges".to_string()),
            }
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let fields = extract(
            "<T><AccountID>123-4</AccountID><AccountID>999-9</AccountID></T>",
        )
        .unwrap();
        assert_eq!(fields.account_id.as_deref(), Some("123-4"));
    }

    #[test]
    fn empty_first_occurrence_stays_absent() {
        let fields =
            extract("<T><AccountID/><AccountID>999-9</AccountID></T>").unwrap();
        assert_eq!(fields.account_id, None);
    }

    #[test]
    fn missing_tags_are_absent_not_errors() {
        let fields = extract("<T><TransactionID>T1</TransactionID></T>").unwrap();
        assert_eq!(fields.transaction_id.as_deref(), Some("T1"));
        assert_eq!(fields.receipt_date, None);
        assert_eq!(fields.net_amount, None);
        assert_eq!(fields.account_id, None);
        assert_eq!(fields.tender_code, None);
    }

    #[test]
    fn text_is_unescaped() {
        let fields = extract("<T><TransactionID>A&amp;B</TransactionID></T>").unwrap();
        assert_eq!(fields.transaction_id.as_deref(), Some("A&B"));
    }

    #[test]
    fn malformed_xml_is_fatal() {
        let err = extract("<T><ReceiptDate>2022-01-10</Wrong></T>").unwrap_err();
        match err {
            ConvertError::Xml { path, .. } => assert_eq!(path, origin()),
            other => panic!("expected Xml error, got {other:?}"),
        }
    }

    #[rstest]
    #[case::padded("2023-03-05", 2023, 3, 5)]
    #[case::unpadded("2023-3-5", 2023, 3, 5)]
    #[case::january("2022-01-10", 2022, 1, 10)]
    fn date_accepts_numeric_ymd(
        #[case] input: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
    ) {
        assert_eq!(
            parse_receipt_date(input, &origin()).unwrap(),
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        );
    }

    #[rstest]
    #[case::wrong_separator("2023/03/05")]
    #[case::two_components("2023-03")]
    #[case::four_components("2023-03-05-01")]
    #[case::non_numeric("2023-Mar-05")]
    #[case::month_out_of_range("2023-13-05")]
    #[case::day_out_of_range("2023-02-30")]
    #[case::empty("")]
    fn bad_date_is_fatal(#[case] input: &str) {
        let err = parse_receipt_date(input, &origin()).unwrap_err();
        match err {
            ConvertError::ReceiptDate { value, .. } => assert_eq!(value, input),
            other => panic!("expected ReceiptDate error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("100.00", "100.00")]
    #[case("-5.5", "-5.5")]
    #[case("0", "0")]
    fn amount_parses_decimals(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            parse_net_amount(input, &origin()).unwrap(),
            Decimal::from_str_exact(expected).unwrap()
        );
    }

    #[test]
    fn bad_amount_is_fatal() {
        let err = parse_net_amount("12.34.56", &origin()).unwrap_err();
        assert!(matches!(err, ConvertError::NetAmount { .. }));
    }
}
