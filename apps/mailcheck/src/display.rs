//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use mailcheck_ops::{BulkReport, ExportReport, OperationResult, RunListing};
use mailcheck_types::{ColorChoice, Summary, Verdict, VerdictStatus};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        self.term.write_line(&json)
    }

    /// Render as formatted table
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Verdict(verdict) => self.render_verdict(verdict),
            OperationResult::Bulk(report) => self.render_bulk(report),
            OperationResult::History(runs) => self.render_history(runs),
            OperationResult::Export(report) => self.render_export(report),
        }
    }

    fn render_verdict(&self, verdict: &Verdict) -> io::Result<()> {
        self.term.write_line(&format!(
            "{}  {}  {}",
            self.style_bold(&verdict.email),
            self.style_status(verdict.status),
            verdict.reason
        ))
    }

    fn render_bulk(&self, report: &BulkReport) -> io::Result<()> {
        let run = &report.run;
        if run.is_empty() {
            self.term.write_line("No addresses were verified.")?;
        } else {
            let mut table = self.table(&["Email", "Status", "Reason"]);
            for verdict in run.verdicts() {
                table.add_row(vec![
                    Cell::new(&verdict.email),
                    self.status_cell(verdict.status),
                    Cell::new(&verdict.reason),
                ]);
            }
            self.term.write_line(&table.to_string())?;
        }

        self.term.write_line("")?;
        self.render_summary(&run.summary())?;
        self.term.write_line("")?;

        match &report.save_error {
            None => self.term.write_line(&format!(
                "Saved run {} ({})",
                run.id(),
                self.style_bold(run.source_name())
            )),
            Some(failure) => {
                self.term
                    .write_line(&format!("[WARN] Run not saved: {}", failure.message))?;
                if let Some(hint) = &failure.hint {
                    self.term.write_line(&format!("  Hint: {hint}"))?;
                }
                Ok(())
            }
        }
    }

    fn render_summary(&self, summary: &Summary) -> io::Result<()> {
        let mut table = self.table(&["Category", "Count", "Share"]);
        for status in VerdictStatus::ALL {
            table.add_row(vec![
                self.status_cell(status),
                Cell::new(summary.count(status)),
                Cell::new(format!("{}%", summary.percentage(status))),
            ]);
        }
        table.add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(summary.total()),
            Cell::new(""),
        ]);
        self.term.write_line(&table.to_string())
    }

    fn render_history(&self, runs: &[RunListing]) -> io::Result<()> {
        if runs.is_empty() {
            return self.term.write_line("No runs in history.");
        }

        let mut table = self.table(&[
            "Run", "Name", "Date", "Total", "Good", "Risky", "Bad", "Error",
        ]);
        for run in runs {
            table.add_row(vec![
                Cell::new(run.id),
                Cell::new(&run.source_name),
                Cell::new(run.created_at.format("%Y-%m-%d %H:%M")),
                Cell::new(run.total),
                Cell::new(run.summary.good),
                Cell::new(run.summary.risky),
                Cell::new(run.summary.bad),
                Cell::new(run.summary.error),
            ]);
        }
        self.term.write_line(&table.to_string())
    }

    fn render_export(&self, report: &ExportReport) -> io::Result<()> {
        self.term.write_line(&format!(
            "[OK] Exported {} row(s) ({}) to {}",
            report.rows,
            report.filter,
            report.path.display()
        ))
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        if !self.supports_color() {
            table.force_no_tty();
        }
        table
    }

    fn status_cell(&self, status: VerdictStatus) -> Cell {
        let cell = Cell::new(status.as_str());
        if self.supports_color() {
            cell.fg(status_color(status))
        } else {
            cell
        }
    }

    fn style_status(&self, status: VerdictStatus) -> String {
        if !self.supports_color() {
            return status.to_string();
        }
        let style = match status {
            VerdictStatus::Good => Style::new().green(),
            VerdictStatus::Risky => Style::new().yellow(),
            VerdictStatus::Bad => Style::new().red(),
            VerdictStatus::Error => Style::new().magenta(),
        };
        style.bold().apply_to(status.as_str()).to_string()
    }

    fn style_bold(&self, text: &str) -> String {
        if self.supports_color() {
            Style::new().bold().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn status_color(status: VerdictStatus) -> Color {
    match status {
        VerdictStatus::Good => Color::Green,
        VerdictStatus::Risky => Color::Yellow,
        VerdictStatus::Bad => Color::Red,
        VerdictStatus::Error => Color::Magenta,
    }
}
