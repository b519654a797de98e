//! `Created:` / `Last Updated:` markers embedded in entity documents.

use chrono::{DateTime, NaiveDate, Utc};

const CREATED_MARKER: &str = "Created:";
const UPDATED_MARKER: &str = "Last Updated:";

/// Dates declared by a document. Later markers override earlier ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentDates {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DocumentDates {
    /// Scan `content` line by line for date markers.
    pub fn scan(content: &str) -> Self {
        let mut dates = Self::default();
        for line in content.lines() {
            if let Some(d) = marker_date(line, UPDATED_MARKER) {
                dates.updated_at = Some(d);
            }
            if let Some(d) = marker_date(line, CREATED_MARKER) {
                dates.created_at = Some(d);
            }
        }
        dates
    }
}

fn marker_date(line: &str, marker: &str) -> Option<DateTime<Utc>> {
    let (_, rest) = line.split_once(marker)?;
    let raw = rest.trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '_');
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc()
    }

    #[test]
    fn reads_both_markers() {
        let dates = DocumentDates::scan("# Patients\nCreated: 2024-01-02\nLast Updated: 2024-03-04\n");
        assert_eq!(dates.created_at, Some(ymd(2024, 1, 2)));
        assert_eq!(dates.updated_at, Some(ymd(2024, 3, 4)));
    }

    #[test]
    fn tolerates_bold_markers() {
        let dates = DocumentDates::scan("**Last Updated:** 2025-06-30");
        assert_eq!(dates.updated_at, Some(ymd(2025, 6, 30)));
        assert!(dates.created_at.is_none());
    }

    #[test]
    fn unparseable_dates_are_ignored() {
        let dates = DocumentDates::scan("Created: yesterday\nLast Updated: 2024-13-40");
        assert_eq!(dates, DocumentDates::default());
    }
}
