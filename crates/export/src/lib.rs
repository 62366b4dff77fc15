#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Delimited-text export of verdicts
//!
//! Output is a header row `Email,Status,Reason` followed by one row per
//! included verdict, comma separated and joined with `\n` (no trailing
//! newline). Fields that contain a comma, a double quote or a line break
//! are quoted with embedded quotes doubled; all other fields are written
//! verbatim.

use chrono::NaiveDate;
use mailcheck_errors::Error;
use mailcheck_types::{ExportFilter, Verdict};
use std::borrow::Cow;
use std::path::Path;

/// Header row of every export
pub const HEADER: &str = "Email,Status,Reason";

/// Render verdicts as CSV text, keeping only those the filter selects
#[must_use]
pub fn render_csv(verdicts: &[Verdict], filter: ExportFilter) -> String {
    let mut out = String::from(HEADER);
    for verdict in verdicts.iter().filter(|v| filter.matches(v)) {
        out.push('\n');
        out.push_str(&escape_field(&verdict.email));
        out.push(',');
        out.push_str(verdict.status.as_str());
        out.push(',');
        out.push_str(&escape_field(&verdict.reason));
    }
    out
}

/// Write the rendered export to `path`
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub async fn write_csv(
    path: &Path,
    verdicts: &[Verdict],
    filter: ExportFilter,
) -> Result<usize, Error> {
    let content = render_csv(verdicts, filter);
    tokio::fs::write(path, content.as_bytes())
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;
    let rows = verdicts.iter().filter(|v| filter.matches(v)).count();
    tracing::debug!(path = %path.display(), rows, %filter, "export written");
    Ok(rows)
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Suggested download name for an export
///
/// `All` keeps the run's name without its spreadsheet extension; a single
/// category is named after the category.
#[must_use]
pub fn export_file_name(source_name: &str, filter: ExportFilter, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match filter {
        ExportFilter::All => format!("{}_results_{date}.csv", strip_extension(source_name)),
        ExportFilter::Only(status) => {
            format!("{}_results_{date}.csv", status.as_str().to_ascii_lowercase())
        }
    }
}

fn strip_extension(name: &str) -> &str {
    for ext in [".csv", ".xlsx", ".xls"] {
        if name.len() >= ext.len() {
            let split = name.len() - ext.len();
            if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(ext) {
                return &name[..split];
            }
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcheck_types::VerdictStatus;
    use proptest::prelude::*;

    fn sample() -> Vec<Verdict> {
        vec![
            Verdict::new("a@x.com", VerdictStatus::Good, "Valid mailbox"),
            Verdict::new("b@x.com", VerdictStatus::Error, "Server not reachable"),
            Verdict::new("c@x.com", VerdictStatus::Good, "Valid mailbox"),
            Verdict::new("d@x.com", VerdictStatus::Risky, "Catch-all"),
        ]
    }

    #[test]
    fn empty_input_is_header_only() {
        assert_eq!(render_csv(&[], ExportFilter::All), "Email,Status,Reason");
    }

    #[test]
    fn all_filter_keeps_every_row_in_order() {
        let csv = render_csv(&sample(), ExportFilter::All);
        assert_eq!(
            csv,
            "Email,Status,Reason\n\
             a@x.com,Good,Valid mailbox\n\
             b@x.com,Error,Server not reachable\n\
             c@x.com,Good,Valid mailbox\n\
             d@x.com,Risky,Catch-all"
        );
    }

    #[test]
    fn category_filter_keeps_matching_rows_in_order() {
        let csv = render_csv(&sample(), ExportFilter::Only(VerdictStatus::Good));
        assert_eq!(
            csv,
            "Email,Status,Reason\na@x.com,Good,Valid mailbox\nc@x.com,Good,Valid mailbox"
        );
    }

    #[test]
    fn filter_without_matches_is_header_only() {
        let csv = render_csv(&sample(), ExportFilter::Only(VerdictStatus::Bad));
        assert_eq!(csv, HEADER);
    }

    #[test]
    fn delimiters_in_fields_are_quoted() {
        let verdicts = vec![Verdict::new(
            "x@y.com",
            VerdictStatus::Bad,
            "Disposable, \"burner\" domain",
        )];
        assert_eq!(
            render_csv(&verdicts, ExportFilter::All),
            "Email,Status,Reason\nx@y.com,Bad,\"Disposable, \"\"burner\"\" domain\""
        );
    }

    #[test]
    fn line_breaks_in_fields_are_quoted() {
        let verdicts = vec![Verdict::new("x@y.com", VerdictStatus::Risky, "line one\nline two")];
        assert!(render_csv(&verdicts, ExportFilter::All).ends_with("\"line one\nline two\""));
    }

    #[test]
    fn file_names_follow_filter() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            export_file_name("Leads.XLSX", ExportFilter::All, date),
            "Leads_results_2024-03-09.csv"
        );
        assert_eq!(
            export_file_name("list.csv", ExportFilter::All, date),
            "list_results_2024-03-09.csv"
        );
        assert_eq!(
            export_file_name("notes", ExportFilter::All, date),
            "notes_results_2024-03-09.csv"
        );
        assert_eq!(
            export_file_name("list.csv", ExportFilter::Only(VerdictStatus::Risky), date),
            "risky_results_2024-03-09.csv"
        );
    }

    #[tokio::test]
    async fn write_csv_reports_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let rows = write_csv(&path, &sample(), ExportFilter::Only(VerdictStatus::Good))
            .await
            .unwrap();

        assert_eq!(rows, 2);
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    fn status() -> impl Strategy<Value = VerdictStatus> {
        prop::sample::select(VerdictStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn row_count_matches_filter(
            statuses in prop::collection::vec(status(), 0..30),
            pick in status(),
        ) {
            let verdicts: Vec<Verdict> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| Verdict::new(format!("u{i}@x.com"), *s, "r"))
                .collect();

            let all = render_csv(&verdicts, ExportFilter::All);
            prop_assert_eq!(all.lines().count(), verdicts.len() + 1);

            let only = render_csv(&verdicts, ExportFilter::Only(pick));
            let expected = statuses.iter().filter(|s| **s == pick).count();
            prop_assert_eq!(only.lines().count(), expected + 1);
        }
    }
}
