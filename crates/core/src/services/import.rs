//! CSV bulk import pipeline.
//!
//! Ingests a guest-list CSV as a best-effort batch: headers may be in
//! English or Vietnamese, individual rows may fail validation without
//! aborting the batch, and rows whose name pair already exists are
//! silently skipped. All parsing happens before any database write
//! (parse-then-commit, not streaming writes).

use banquet_common::{AppError, AppResult, Config};
use banquet_db::{entities::guest, repositories::GuestRepository};
use chrono::Utc;
use csv::StringRecord;
use sea_orm::Set;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use validator::ValidateEmail;

use super::guest::allocate_token;

/// Free-text values accepted as `true` in boolean-ish CSV columns.
/// Unrecognized text is `false`; no error is raised for it.
const BOOLISH_TRUE: [&str; 5] = ["true", "1", "yes", "có", "co"];

/// Parse a free-text CSV value as a boolean.
#[must_use]
pub fn parse_boolish(value: &str) -> bool {
    BOOLISH_TRUE.contains(&value.trim().to_lowercase().as_str())
}

/// Map a raw CSV header to its canonical field name.
///
/// Headers are BOM-stripped, trimmed, and lowercased, then looked up in
/// a bilingual (Latin/Vietnamese) synonym table. Unrecognized headers
/// pass through unchanged and are ignored downstream.
#[must_use]
pub fn canonical_header(raw: &str) -> String {
    let clean = raw.trim_start_matches('\u{feff}').trim().to_lowercase();

    let mapped = match clean.as_str() {
        "tên" | "ten" | "firstname" | "first_name" => "firstName",
        "họ" | "ho" | "lastname" | "last_name" => "lastName",
        "họ tên" | "ho ten" | "tên đầy đủ" | "ten day du" | "fullname" | "full_name" => {
            "fullName"
        }
        "email" => "email",
        "điện thoại" | "dien thoai" | "số điện thoại" | "so dien thoai" | "phone" => "phone",
        "đội ngũ cô dâu" | "doi ngu co dau" | "bridal party" | "bridalparty"
        | "bridal_party" => "bridalParty",
        "bàn số" | "ban so" | "table number" | "tablenumber" | "table_number" => "tableNumber",
        "ghi chú" | "ghi chu" | "notes" | "note" => "notes",
        "nz invite" | "nzinvite" | "nz_invite" => "nzInvite",
        "my invite" | "myinvite" | "my_invite" => "myInvite",
        _ => return clean,
    };

    mapped.to_string()
}

/// Split a combined full name: first token becomes the first name, the
/// remaining tokens joined by a space become the last name.
#[must_use]
pub fn split_full_name(full: &str) -> (String, String) {
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// A CSV row that passed field validation and is queued for a store
/// write during the commit phase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bridal_party: bool,
    pub nz_invite: bool,
    pub my_invite: bool,
    pub table_number: Option<i32>,
    pub notes: Option<String>,
}

/// A structured per-row failure.
#[derive(Debug, Serialize)]
pub struct ImportRowError {
    /// 1-based row number over data rows, excluding the header.
    pub row: usize,
    /// The offending row data as parsed.
    pub data: Value,
    /// Human-readable failure message.
    pub error: String,
}

/// Aggregated result of an import run.
///
/// The operation as a whole never fails due to row-level problems; even
/// a run where every row errored reports success with `imported = 0`.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

enum CommitOutcome {
    Imported,
    Skipped,
}

/// CSV bulk import service.
#[derive(Clone)]
pub struct ImportService {
    repo: GuestRepository,
    max_file_size: usize,
}

impl ImportService {
    /// Create a new import service.
    #[must_use]
    pub fn new(repo: GuestRepository, config: &Config) -> Self {
        Self {
            repo,
            max_file_size: config.import.max_file_size,
        }
    }

    /// Run a full import: file checks, parse phase, commit phase.
    ///
    /// Only file-level problems (wrong extension, oversize, unreadable
    /// header) fail the request; everything row-level lands in the
    /// report.
    pub async fn import(&self, file_name: &str, bytes: &[u8]) -> AppResult<ImportReport> {
        if !file_name.ends_with(".csv") {
            return Err(AppError::File("please upload a CSV file".to_string()));
        }
        if bytes.len() > self.max_file_size {
            return Err(AppError::File(format!(
                "file exceeds the maximum size of {} bytes",
                self.max_file_size
            )));
        }

        let (candidates, mut errors) = parse_rows(bytes)?;

        let mut imported = 0;
        let mut skipped = 0;

        // Commit phase: one single-row write per candidate, in file
        // order. Partial success is designed-in; a client disconnect
        // does not roll back rows already committed.
        for (row, candidate) in candidates {
            match self.commit(&candidate).await {
                Ok(CommitOutcome::Imported) => imported += 1,
                Ok(CommitOutcome::Skipped) => skipped += 1,
                Err(e) => errors.push(ImportRowError {
                    row,
                    data: serde_json::to_value(&candidate).unwrap_or(Value::Null),
                    error: e.to_string(),
                }),
            }
        }

        info!(imported, skipped, errors = errors.len(), "CSV import finished");

        Ok(ImportReport {
            imported,
            skipped,
            errors,
        })
    }

    async fn commit(&self, candidate: &ImportCandidate) -> AppResult<CommitOutcome> {
        // Pre-existing name pairs are a benign, expected outcome.
        if self
            .repo
            .find_by_name(&candidate.first_name, &candidate.last_name)
            .await?
            .is_some()
        {
            return Ok(CommitOutcome::Skipped);
        }

        let token = allocate_token(&self.repo).await?;
        let now = Utc::now();

        let model = guest::ActiveModel {
            first_name: Set(candidate.first_name.clone()),
            last_name: Set(candidate.last_name.clone()),
            email: Set(candidate.email.clone()),
            phone: Set(candidate.phone.clone()),
            bridal_party: Set(candidate.bridal_party),
            nz_invite: Set(candidate.nz_invite),
            my_invite: Set(candidate.my_invite),
            dinner: Set(false),
            rsvp: Set(None),
            rsvp_others_yes: Set(None),
            rsvp_others_no: Set(None),
            rsvp_date: Set(None),
            rsvp_token: Set(Some(token)),
            invited_at: Set(Some(now)),
            rsvp_viewed_at: Set(None),
            table_number: Set(candidate.table_number),
            notes: Set(candidate.notes.clone()),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };

        // A lost race against a concurrent writer surfaces here as a
        // DuplicateGuest error and lands in the report.
        self.repo.create(model).await?;
        Ok(CommitOutcome::Imported)
    }
}

/// Parse all data rows, collecting candidates and structured errors.
///
/// Row numbers are 1-based over data rows. A malformed row does not
/// stop the rest of the stream from being read; only a header that
/// cannot be read at all fails the file.
pub fn parse_rows(
    bytes: &[u8],
) -> AppResult<(Vec<(usize, ImportCandidate)>, Vec<ImportRowError>)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::File(e.to_string()))?
        .iter()
        .map(canonical_header)
        .collect();

    let mut candidates = Vec::new();
    let mut errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        match result {
            Err(e) => errors.push(ImportRowError {
                row,
                data: Value::Null,
                error: e.to_string(),
            }),
            Ok(record) => match build_candidate(&headers, &record) {
                Ok(candidate) => candidates.push((row, candidate)),
                Err(error) => errors.push(ImportRowError {
                    row,
                    data: raw_row(&headers, &record),
                    error,
                }),
            },
        }
    }

    Ok((candidates, errors))
}

/// Row data as a JSON object keyed by canonical header, for error
/// reporting.
fn raw_row(headers: &[String], record: &StringRecord) -> Value {
    let map: serde_json::Map<String, Value> = headers
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.clone(), Value::String(v.to_string())))
        .collect();
    Value::Object(map)
}

fn build_candidate(headers: &[String], record: &StringRecord) -> Result<ImportCandidate, String> {
    let field = |name: &str| -> &str {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| record.get(i))
            .unwrap_or("")
    };

    let mut first_name = field("firstName").trim().to_string();
    let mut last_name = field("lastName").trim().to_string();

    // A combined fullName column is split only when the dedicated
    // columns are absent or empty.
    let full_name = field("fullName").trim();
    if first_name.is_empty() && last_name.is_empty() && !full_name.is_empty() {
        (first_name, last_name) = split_full_name(full_name);
    }

    if first_name.is_empty() || last_name.is_empty() {
        return Err("firstName and lastName are required".to_string());
    }

    let email = non_empty(field("email"));
    if let Some(addr) = &email
        && !addr.validate_email()
    {
        return Err("email must be a valid email address".to_string());
    }

    let table_number = match non_empty(field("tableNumber")) {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| "tableNumber must be a number".to_string())?,
        ),
        None => None,
    };

    Ok(ImportCandidate {
        first_name,
        last_name,
        email,
        phone: non_empty(field("phone")),
        bridal_party: parse_boolish(field("bridalParty")),
        nz_invite: parse_boolish(field("nzInvite")),
        my_invite: parse_boolish(field("myInvite")),
        table_number,
        notes: non_empty(field("notes")),
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
