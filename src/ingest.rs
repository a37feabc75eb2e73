use std::io::BufReader;
use std::path::Path;

use csv::StringRecord;
use regex::Regex;

use crate::categorize::{categorize_bank, is_pet_merchant, normalize_category};
use crate::error::Result;
use crate::models::CandidateTransaction;

// Positive card-style rows with this vocabulary are bill repayments already
// counted as an outflow on the paying account, so they never become records.
const CARD_REPAYMENT_KEYWORDS: &[&str] = &["PAYMENT", "BILL PA", "AUTOPAY", "ONLINE PMT"];

const MONTH_TOKENS: &[&str] = &[
    "january", "february", "march", "april", "august", "september", "october", "november",
    "december", "june", "july", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep",
    "oct", "nov", "dec",
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

/// Normalize a month/day/year date to ISO. Unparsable input is passed through
/// unchanged; the store's validation is the backstop for garbage.
pub fn normalize_date(raw: &str) -> String {
    match chrono::NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn date_shaped(field: &str) -> bool {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$")
        .map(|re| re.is_match(field.trim()))
        .unwrap_or(false)
}

fn field<'a>(record: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

fn header_index(header: &StringRecord, name: &str) -> Option<usize> {
    header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvFormat {
    /// Separate debit/credit columns; sign comes from column presence.
    Ledger,
    /// Single signed amount column plus a transaction-date column.
    Card,
    /// Five positional columns, no header row, first field is a date.
    Headerless,
    Unknown,
}

pub fn detect_format(first_record: &StringRecord) -> CsvFormat {
    let headers: Vec<String> = first_record
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let has = |name: &str| headers.iter().any(|h| h == name);

    if has("debit") && has("credit") {
        CsvFormat::Ledger
    } else if has("amount") && (has("transaction date") || has("trans. date")) {
        CsvFormat::Card
    } else if first_record.len() == 5 && date_shaped(&first_record[0]) {
        CsvFormat::Headerless
    } else {
        CsvFormat::Unknown
    }
}

// ---------------------------------------------------------------------------
// parse_csv
// ---------------------------------------------------------------------------

/// Parse a CSV export into candidate transactions for `account`.
///
/// An unrecognized layout yields an empty vec, not an error; malformed rows
/// are skipped individually.
pub fn parse_csv(path: &Path, account: &str) -> Result<Vec<CandidateTransaction>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for result in rdr.records() {
        let Ok(record) = result else { continue };
        records.push(record);
    }
    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };

    Ok(match detect_format(first) {
        CsvFormat::Ledger => parse_ledger(&records, account),
        CsvFormat::Card => parse_card(&records, account),
        CsvFormat::Headerless => parse_headerless(&records, account),
        CsvFormat::Unknown => Vec::new(),
    })
}

fn parse_ledger(records: &[StringRecord], account: &str) -> Vec<CandidateTransaction> {
    let header = &records[0];
    let idx_date = header_index(header, "date");
    let idx_type = header_index(header, "transaction type");
    let idx_desc = header_index(header, "description");
    let idx_debit = header_index(header, "debit");
    let idx_credit = header_index(header, "credit");

    let mut rows = Vec::new();
    for record in &records[1..] {
        let date_raw = field(record, idx_date);
        if date_raw.is_empty() {
            continue;
        }

        // A non-empty debit decides the sign; credit is only consulted when
        // the debit cell is blank. Rows with neither are dropped.
        let debit = field(record, idx_debit);
        let credit = field(record, idx_credit);
        let amount = if !debit.is_empty() {
            match parse_amount(debit) {
                Some(v) => -v.abs(),
                None => continue,
            }
        } else if !credit.is_empty() {
            match parse_amount(credit) {
                Some(v) => v,
                None => continue,
            }
        } else {
            continue;
        };

        let txn_type = field(record, idx_type);
        let description = field(record, idx_desc).to_string();
        let (category, auto_exclude_reason) = categorize_bank(txn_type, &description, amount);

        rows.push(CandidateTransaction {
            date: normalize_date(date_raw),
            raw_description: format!("{txn_type}: {description}"),
            description,
            amount,
            account: account.to_string(),
            category: category.to_string(),
            auto_exclude_reason,
        });
    }
    rows
}

fn parse_card(records: &[StringRecord], account: &str) -> Vec<CandidateTransaction> {
    let header = &records[0];
    let idx_date =
        header_index(header, "transaction date").or_else(|| header_index(header, "trans. date"));
    let idx_desc = header_index(header, "description");
    let idx_amount = header_index(header, "amount");
    let idx_category = header_index(header, "category");

    let mut rows = Vec::new();
    for record in &records[1..] {
        let date_raw = field(record, idx_date);
        if date_raw.is_empty() {
            continue;
        }
        let Some(amount) = parse_amount(field(record, idx_amount)) else {
            continue;
        };

        let description = field(record, idx_desc).to_string();
        let desc_upper = description.to_uppercase();

        // Positive payment rows are the card bill being paid, not income;
        // counting them would double up against the paying account's outflow.
        if amount > 0.0 && CARD_REPAYMENT_KEYWORDS.iter().any(|k| desc_upper.contains(k)) {
            continue;
        }

        let category = if is_pet_merchant(&description) {
            "Pets"
        } else {
            normalize_category(field(record, idx_category))
        };

        rows.push(CandidateTransaction {
            date: normalize_date(date_raw),
            raw_description: description.clone(),
            description,
            amount,
            account: account.to_string(),
            category: category.to_string(),
            auto_exclude_reason: None,
        });
    }
    rows
}

fn parse_headerless(records: &[StringRecord], account: &str) -> Vec<CandidateTransaction> {
    // Positional layout: date, amount, _, _, description. Amounts arrive
    // already signed.
    let mut rows = Vec::new();
    for record in records {
        if record.len() < 5 {
            continue;
        }
        let date_raw = record.get(0).unwrap_or("").trim();
        if !date_raw.contains('/') {
            continue;
        }
        let Some(amount) = parse_amount(record.get(1).unwrap_or("")) else {
            continue;
        };
        let description = record.get(4).unwrap_or("").trim().to_string();
        let (category, auto_exclude_reason) = categorize_bank("DEBIT", &description, amount);

        rows.push(CandidateTransaction {
            date: normalize_date(date_raw),
            raw_description: description.clone(),
            description,
            amount,
            account: account.to_string(),
            category: category.to_string(),
            auto_exclude_reason,
        });
    }
    rows
}

// ---------------------------------------------------------------------------
// Account labels
// ---------------------------------------------------------------------------

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn strip_month_tokens(raw: &str) -> String {
    let mut s = raw.to_string();
    for token in MONTH_TOKENS {
        s = s.replace(token, "");
    }
    s.trim().to_string()
}

/// Derive a display label for the owning account from the export's filename,
/// following the `owner-kind-bank.csv` convention. Anything else is just
/// cleaned up for display.
pub fn account_label_from_filename(filename: &str) -> String {
    let name = filename.to_lowercase();
    let name = name.strip_suffix(".csv").unwrap_or(&name);

    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() >= 3 {
        let mut label = format!("{} {}", title_case(parts[0]), title_case(parts[1]));
        let institution = strip_month_tokens(parts[2]);
        if !institution.is_empty() && institution != "unknown" {
            label.push_str(&format!(" ({})", title_case(&institution)));
        }
        return label;
    }

    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AutoExcludeReason;

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("$500.00"), Some(500.0));
        assert_eq!(parse_amount("\"2,000.00\""), Some(2000.0));
        assert_eq!(parse_amount("  -42.50  "), Some(-42.5));
        assert_eq!(parse_amount("(75.00)"), Some(-75.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("not_a_number"), None);
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("8/27/2025"), "2025-08-27");
        assert_eq!(normalize_date("03/05/2024"), "2024-03-05");
        // Unparsable dates pass through unchanged.
        assert_eq!(normalize_date("pending"), "pending");
        assert_eq!(normalize_date("2024-03-05"), "2024-03-05");
    }

    #[test]
    fn test_detect_ledger_format() {
        let rec = StringRecord::from(vec!["Date", "Transaction Type", "Description", "Debit", "Credit"]);
        assert_eq!(detect_format(&rec), CsvFormat::Ledger);
    }

    #[test]
    fn test_detect_card_format() {
        let rec = StringRecord::from(vec!["Transaction Date", "Description", "Amount", "Category"]);
        assert_eq!(detect_format(&rec), CsvFormat::Card);
        let rec = StringRecord::from(vec!["Trans. Date", "Description", "Amount"]);
        assert_eq!(detect_format(&rec), CsvFormat::Card);
    }

    #[test]
    fn test_detect_headerless_format() {
        let rec = StringRecord::from(vec!["8/26/2025", "-100", "*", "", "ATM WITHDRAWAL"]);
        assert_eq!(detect_format(&rec), CsvFormat::Headerless);
    }

    #[test]
    fn test_detect_unknown_format() {
        let rec = StringRecord::from(vec!["Foo", "Bar"]);
        assert_eq!(detect_format(&rec), CsvFormat::Unknown);
    }

    #[test]
    fn test_parse_ledger_signs_amounts_by_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "bank.csv",
            "Date,Transaction Type,Description,Debit,Credit\n\
             8/27/2025,CREDIT,Deposit,,200.00\n\
             8/26/2025,DEBIT,Withdrawal,100.00,\n",
        );
        let rows = parse_csv(&path, "Test Bank").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, 200.0);
        assert_eq!(rows[1].amount, -100.0);
        assert_eq!(rows[0].raw_description, "CREDIT: Deposit");
    }

    #[test]
    fn test_parse_ledger_skips_rows_without_amounts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "bank.csv",
            "Date,Transaction Type,Description,Debit,Credit\n\
             8/27/2025,CREDIT,Empty amount,,\n\
             8/26/2025,DEBIT,Valid amount,100.00,\n",
        );
        let rows = parse_csv(&path, "Test Bank").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Valid amount");
    }

    #[test]
    fn test_parse_ledger_tags_card_payment() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "bank.csv",
            "Date,Transaction Type,Description,Debit,Credit\n\
             8/27/2025,DEBIT,CREDIT CRD EPAY,500.00,\n",
        );
        let rows = parse_csv(&path, "Test Bank").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, -500.0);
        assert_eq!(rows[0].category, "Transfers");
        assert_eq!(rows[0].auto_exclude_reason, Some(AutoExcludeReason::CreditCardPayment));
    }

    #[test]
    fn test_parse_card_drops_repayment_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "card.csv",
            "Transaction Date,Description,Amount,Category\n\
             8/27/2025,ONLINE PMT THANK YOU,500.00,Fees\n\
             8/26/2025,WHOLE FOODS,-82.50,Groceries\n",
        );
        let rows = parse_csv(&path, "Tom Credit").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "WHOLE FOODS");
        assert_eq!(rows[0].amount, -82.5);
        assert_eq!(rows[0].category, "Groceries");
        assert_eq!(rows[0].auto_exclude_reason, None);
    }

    #[test]
    fn test_parse_card_keeps_negative_payment_vocabulary() {
        // Only positive repayment rows are dropped; a negative "payment" is a
        // real purchase description.
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "card.csv",
            "Transaction Date,Description,Amount,Category\n\
             8/27/2025,INSURANCE PAYMENT,-120.00,Bills\n",
        );
        let rows = parse_csv(&path, "Tom Credit").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_parse_card_pet_merchant_overrides_institution_category() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "card.csv",
            "Transaction Date,Description,Amount,Category\n\
             8/27/2025,PETSMART #42,-35.99,Merchandise\n",
        );
        let rows = parse_csv(&path, "Tom Credit").unwrap();
        assert_eq!(rows[0].category, "Pets");
    }

    #[test]
    fn test_parse_headerless_positional_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "tom.csv",
            "8/26/2025,-100.00,*,,ATM WITHDRAWAL\n\
             8/25/2025,-45.00,*,,SHELL GAS\n\
             not-a-date,-1.00,*,,JUNK\n",
        );
        let rows = parse_csv(&path, "Tom Bank").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "ATM WITHDRAWAL");
        assert_eq!(rows[0].category, "Other");
        assert_eq!(rows[1].category, "Automotive");
    }

    #[test]
    fn test_unrecognized_format_yields_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "odd.csv", "Col1,Col2\nfoo,bar\n");
        let rows = parse_csv(&path, "Whatever").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_file_yields_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "empty.csv", "");
        let rows = parse_csv(&path, "Whatever").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_account_label_standard_convention() {
        assert_eq!(account_label_from_filename("dara-bank-july-aug.csv"), "Dara Bank");
        assert_eq!(account_label_from_filename("tom-credit-chase.CSV"), "Tom Credit (Chase)");
        assert_eq!(account_label_from_filename("joint-bank-july-aug.csv"), "Joint Bank");
    }

    #[test]
    fn test_account_label_fallback_cleanup() {
        assert_eq!(account_label_from_filename("my_checking.csv"), "My Checking");
        assert_eq!(account_label_from_filename("statement.csv"), "Statement");
    }
}
