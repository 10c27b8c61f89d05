use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use std::fmt;

use crate::logic::sanitize::clean_text;
use crate::model::{BookInstanceDraft, BookInstanceFields, BookInstanceForm, DEFAULT_STATUS};

/// A rejected input field and the reason it was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Each rule inspects one field and reports at most one error
type FieldRule = fn(&BookInstanceDraft) -> Option<FieldError>;

const BOOK_INSTANCE_RULES: [FieldRule; 3] = [require_book, require_imprint, check_due_back];

pub struct BookInstanceValidator;

impl BookInstanceValidator {
    /// Sanitize a submitted form without judging it. Used to repopulate a
    /// form that failed validation.
    pub fn sanitize(form: &BookInstanceForm) -> BookInstanceDraft {
        BookInstanceDraft {
            id: None,
            book: clean_text(form.book.as_deref()),
            imprint: clean_text(form.imprint.as_deref()),
            status: clean_text(form.status.as_deref()),
            due_back: form.due_back.as_deref().unwrap_or_default().trim().to_string(),
        }
    }

    /// Validate and normalize a submitted form. All rules run; every failure
    /// is reported in rule order.
    pub fn validate(form: &BookInstanceForm) -> Result<BookInstanceFields, Vec<FieldError>> {
        Self::validate_draft(&Self::sanitize(form))
    }

    pub fn validate_draft(draft: &BookInstanceDraft) -> Result<BookInstanceFields, Vec<FieldError>> {
        let errors: Vec<FieldError> = BOOK_INSTANCE_RULES
            .iter()
            .filter_map(|rule| rule(draft))
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }

        let due_back = parse_due_back(&draft.due_back).map_err(|e| vec![e])?;
        let status = if draft.status.is_empty() {
            DEFAULT_STATUS.to_string()
        } else {
            draft.status.clone()
        };

        Ok(BookInstanceFields {
            book: draft.book.clone(),
            imprint: draft.imprint.clone(),
            status,
            due_back,
        })
    }
}

fn require_book(draft: &BookInstanceDraft) -> Option<FieldError> {
    draft
        .book
        .is_empty()
        .then(|| FieldError::new("book", "must be specified"))
}

fn require_imprint(draft: &BookInstanceDraft) -> Option<FieldError> {
    draft
        .imprint
        .is_empty()
        .then(|| FieldError::new("imprint", "must be specified"))
}

fn check_due_back(draft: &BookInstanceDraft) -> Option<FieldError> {
    parse_due_back(&draft.due_back).err()
}

/// Blank means no due date. Anything else must be an ISO-8601 date:
/// calendar (`2024-03-01`, `20240301`), reduced precision (`2024-03`, `2024`),
/// ordinal (`2024-061`), week (`2024-W09-5`), or any of those followed by a
/// time after `T` or a space. Reduced precision resolves to the first day and
/// only the date part of a date-time is kept.
pub fn parse_due_back(value: &str) -> Result<Option<NaiveDate>, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let invalid = || FieldError::new("due_back", "invalid date");
    let (date_part, time_part) = match value.find(['T', ' ']) {
        Some(at) => (&value[..at], Some(&value[at + 1..])),
        None => (value, None),
    };

    let date = parse_iso_date(date_part).ok_or_else(invalid)?;
    if let Some(time) = time_part {
        if !is_iso_time(time) {
            return Err(invalid());
        }
    }
    Ok(Some(date))
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if let Some((year, week)) = s.split_once('W') {
        return parse_week_date(year, week);
    }
    if !s.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return None;
    }

    let format = match (s.len(), s.matches('-').count()) {
        (10, 2) => "%Y-%m-%d",
        (8, 0) => "%Y%m%d",
        (8, 1) => "%Y-%j",
        (7, 0) => "%Y%j",
        (7, 1) => return NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok(),
        (4, 0) => return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        _ => return None,
    };
    NaiveDate::parse_from_str(s, format).ok()
}

/// `2024-W09-5`, `2024-W09`, `2024W095` or `2024W09`. A missing weekday means Monday.
fn parse_week_date(year: &str, week: &str) -> Option<NaiveDate> {
    let (year, extended) = match year.strip_suffix('-') {
        Some(year) => (year, true),
        None => (year, false),
    };
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !week.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return None;
    }

    let (week, day) = match (extended, week.len()) {
        (_, 2) => (week, "1"),
        (true, 4) => week.split_once('-')?,
        (false, 3) => week.split_at(2),
        _ => return None,
    };
    if week.len() != 2 || !week.chars().chain(day.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let weekday = match day {
        "1" => Weekday::Mon,
        "2" => Weekday::Tue,
        "3" => Weekday::Wed,
        "4" => Weekday::Thu,
        "5" => Weekday::Fri,
        "6" => Weekday::Sat,
        "7" => Weekday::Sun,
        _ => return None,
    };
    NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, weekday)
}

/// Time of day with an optional `Z` or `±HH[:MM]` offset
fn is_iso_time(time: &str) -> bool {
    let (clock, offset) = if let Some(clock) = time.strip_suffix('Z') {
        (clock, None)
    } else if let Some(at) = time.rfind(['+', '-']) {
        (&time[..at], Some(&time[at + 1..]))
    } else {
        (time, None)
    };

    if let Some(offset) = offset {
        let digits = offset.replacen(':', "", 1);
        let valid_offset = matches!(digits.len(), 2 | 4)
            && digits.chars().all(|c| c.is_ascii_digit())
            && digits[..2].parse::<u32>().map_or(false, |h| h <= 23)
            && (digits.len() == 2 || digits[2..].parse::<u32>().map_or(false, |m| m <= 59));
        if !valid_offset {
            return false;
        }
    }

    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M", "%H%M%S%.f", "%H%M%S", "%H%M"]
        .iter()
        .any(|format| NaiveTime::parse_from_str(clock, format).is_ok())
}
