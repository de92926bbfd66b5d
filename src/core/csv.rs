//! CSV validation and parsing
//!
//! Turns a raw upload into candidate hospital rows plus structured
//! validation issues. Parsing is pure: no network access, no registry
//! access, and all rows are scanned even after the first problem.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Maximum hospital name length in characters
pub const MAX_NAME_LEN: usize = 200;
/// Maximum address length in characters
pub const MAX_ADDRESS_LEN: usize = 500;
/// Maximum phone length in characters
pub const MAX_PHONE_LEN: usize = 20;

const REQUIRED_COLUMNS: [&str; 2] = ["name", "address"];
const OPTIONAL_COLUMNS: [&str; 1] = ["phone"];

/// One parsed CSV data line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalRow {
    /// 1-based position among data lines, header excluded
    pub row_number: usize,
    /// Hospital name, trimmed, never empty
    pub name: String,
    /// Hospital address, trimmed, never empty
    pub address: String,
    /// Optional phone number, trimmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A problem found while validating an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Offending data row; `None` for file-level issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Offending column; `None` for file-level issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    /// Issue affecting the whole file
    pub fn file(message: impl Into<String>) -> Self {
        Self {
            row: None,
            field: None,
            message: message.into(),
        }
    }

    /// Issue affecting one field of one data row
    pub fn for_row(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    /// Whether this issue rejects the file as a whole
    pub fn is_file_level(&self) -> bool {
        self.row.is_none()
    }
}

/// Outcome of parsing one CSV upload
#[derive(Debug, Clone, Default)]
pub struct CsvParse {
    /// Rows that passed every check, in input order
    pub rows: Vec<HospitalRow>,
    /// Everything that failed, file-level issues first encountered first
    pub issues: Vec<ValidationIssue>,
    /// Non-fatal observations, e.g. ignored columns
    pub warnings: Vec<String>,
    /// Number of data lines seen, valid or not
    pub total_rows: usize,
}

impl CsvParse {
    /// Whether the upload passed validation outright
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues that reject the file as a whole
    pub fn file_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_file_level())
    }
}

/// CSV validator with a configurable data-row ceiling
#[derive(Debug, Clone)]
pub struct CsvValidator {
    max_rows: usize,
}

impl CsvValidator {
    /// Create a validator accepting at most `max_rows` data lines
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    /// Parse raw upload bytes into rows and issues
    ///
    /// Column names are matched case-sensitively against
    /// `name`/`address`/`phone`. A missing required column or an
    /// undecodable file aborts parsing with a single file-level issue;
    /// per-row problems exclude that row and scanning continues.
    pub fn parse(&self, content: &[u8]) -> CsvParse {
        let mut parse = CsvParse::default();

        let content = content.strip_prefix(b"\xef\xbb\xbf").unwrap_or(content);
        let text = match std::str::from_utf8(content) {
            Ok(text) => text,
            Err(_) => {
                parse.issues.push(ValidationIssue::file(
                    "Invalid file encoding. Please use UTF-8 encoding.",
                ));
                return parse;
            }
        };

        if text.trim().is_empty() {
            parse
                .issues
                .push(ValidationIssue::file("CSV file is empty or has no headers"));
            return parse;
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                parse
                    .issues
                    .push(ValidationIssue::file(format!("CSV parsing error: {}", e)));
                return parse;
            }
        };
        let header_names: Vec<&str> = headers.iter().map(str::trim).collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|col| !header_names.contains(col))
            .collect();
        if !missing.is_empty() {
            parse.issues.push(ValidationIssue::file(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
            return parse;
        }

        let unknown: Vec<&str> = header_names
            .iter()
            .copied()
            .filter(|h| {
                !h.is_empty() && !REQUIRED_COLUMNS.contains(h) && !OPTIONAL_COLUMNS.contains(h)
            })
            .collect();
        if !unknown.is_empty() {
            parse.warnings.push(format!(
                "Unknown columns will be ignored: {}",
                unknown.join(", ")
            ));
        }

        // Unwraps are safe: presence was checked above.
        let name_idx = header_names.iter().position(|h| *h == "name").unwrap();
        let address_idx = header_names.iter().position(|h| *h == "address").unwrap();
        let phone_idx = header_names.iter().position(|h| *h == "phone");

        let mut row_number = 0;
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    parse
                        .issues
                        .push(ValidationIssue::file(format!("CSV parsing error: {}", e)));
                    break;
                }
            };
            row_number += 1;

            let name = record.get(name_idx).unwrap_or("").trim();
            let address = record.get(address_idx).unwrap_or("").trim();
            let phone = phone_idx
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|p| !p.is_empty());

            let mut row_ok = true;
            if name.is_empty() {
                parse.issues.push(ValidationIssue::for_row(
                    row_number,
                    "name",
                    "Missing or empty 'name' field",
                ));
                row_ok = false;
            } else if name.chars().count() > MAX_NAME_LEN {
                parse.issues.push(ValidationIssue::for_row(
                    row_number,
                    "name",
                    format!("Hospital name exceeds {} characters", MAX_NAME_LEN),
                ));
                row_ok = false;
            }
            if address.is_empty() {
                parse.issues.push(ValidationIssue::for_row(
                    row_number,
                    "address",
                    "Missing or empty 'address' field",
                ));
                row_ok = false;
            } else if address.chars().count() > MAX_ADDRESS_LEN {
                parse.issues.push(ValidationIssue::for_row(
                    row_number,
                    "address",
                    format!("Address exceeds {} characters", MAX_ADDRESS_LEN),
                ));
                row_ok = false;
            }
            if let Some(phone) = phone {
                if phone.chars().count() > MAX_PHONE_LEN {
                    parse.issues.push(ValidationIssue::for_row(
                        row_number,
                        "phone",
                        format!("Phone number exceeds {} characters", MAX_PHONE_LEN),
                    ));
                    row_ok = false;
                }
            }

            if row_ok {
                parse.rows.push(HospitalRow {
                    row_number,
                    name: name.to_string(),
                    address: address.to_string(),
                    phone: phone.map(String::from),
                });
            }
        }
        parse.total_rows = row_number;

        if parse.total_rows == 0 {
            parse
                .issues
                .push(ValidationIssue::file("CSV file contains no data rows"));
        } else if parse.total_rows > self.max_rows {
            parse.issues.push(ValidationIssue::file(format!(
                "CSV contains {} data rows. Maximum allowed is {}.",
                parse.total_rows, self.max_rows
            )));
        }

        parse
    }
}
