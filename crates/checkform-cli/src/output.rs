//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use checkform_domain::CheckboxRecord;
use checkform_eval::MetricsReport;
use checkform_extractor::BatchOutcome;
use checkform_optimizer::{OptimizationResult, RoundRecord};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format extracted checkbox records.
    pub fn format_records(&self, records: &[CheckboxRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(checkform_eval::records_to_json(records)?),
            OutputFormat::Table => Ok(self.format_records_table(records)),
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_records_table(&self, records: &[CheckboxRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No checkboxes found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["State", "Section", "Label"]);

        for record in records {
            let state = if record.is_checked { "checked" } else { "-" };
            builder.push_record([state, record.section.as_str(), record.label.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a metrics report.
    pub fn format_metrics(&self, metrics: &MetricsReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(metrics)?),
            OutputFormat::Quiet => Ok(format!(
                "{:.4} {:.4} {:.4}",
                metrics.precision, metrics.recall, metrics.f1_score
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value"]);
                let rows = [
                    ("Precision", format!("{:.2}%", metrics.precision * 100.0)),
                    ("Recall", format!("{:.2}%", metrics.recall * 100.0)),
                    ("F1 Score", format!("{:.2}%", metrics.f1_score * 100.0)),
                    ("True Positives", metrics.true_positives.to_string()),
                    ("False Positives", metrics.false_positives.to_string()),
                    ("False Negatives", metrics.false_negatives.to_string()),
                ];
                for (name, value) in rows {
                    builder.push_record([name, value.as_str()]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format the requirement check against configured thresholds.
    pub fn requirement_check(
        &self,
        metrics: &MetricsReport,
        min_precision: f64,
        min_recall: f64,
    ) -> String {
        let mut lines = Vec::new();

        if metrics.meets(min_precision, min_recall) {
            lines.push(self.success("Performance meets the requirements"));
        } else {
            lines.push(self.error("Performance does not meet the requirements"));
        }

        if metrics.precision < min_precision {
            lines.push(format!(
                "  Required precision: {:.0}%, achieved: {:.2}%",
                min_precision * 100.0,
                metrics.precision * 100.0
            ));
        }
        if metrics.recall < min_recall {
            lines.push(format!(
                "  Required recall: {:.0}%, achieved: {:.2}%",
                min_recall * 100.0,
                metrics.recall * 100.0
            ));
        }

        lines.join("\n")
    }

    /// Format an optimization run's round history.
    pub fn format_history(&self, result: &OptimizationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(format!(
                "{} {:.4}",
                result.outcome, result.best_metrics.f1_score
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Round", "Precision", "Recall", "F1", "Note"]);

                for RoundRecord {
                    round,
                    metrics,
                    failure,
                    ..
                } in &result.history
                {
                    builder.push_record([
                        round.to_string(),
                        format!("{:.2}%", metrics.precision * 100.0),
                        format!("{:.2}%", metrics.recall * 100.0),
                        format!("{:.2}%", metrics.f1_score * 100.0),
                        failure.clone().unwrap_or_default(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(format!(
                    "{}\nRun {} finished: {}",
                    table, result.run_id, result.outcome
                ))
            }
        }
    }

    /// Format a batch outcome summary.
    pub fn format_batch(&self, outcome: &BatchOutcome) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Source", "Checkboxes", "Status"]);

        for result in &outcome.results {
            let count = result.records.len().to_string();
            builder.push_record([result.source_id.as_str(), count.as_str(), "ok"]);
        }
        for failure in &outcome.failures {
            builder.push_record([failure.source_id.as_str(), "-", failure.reason.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_formatter(format: OutputFormat) -> Formatter {
        Formatter::new(format, false)
    }

    #[test]
    fn test_records_json_shape() {
        let records = vec![CheckboxRecord::new("A", "B", true)];
        let out = plain_formatter(OutputFormat::Json)
            .format_records(&records)
            .unwrap();
        assert!(out.contains("\"checkboxes\""));
        assert!(out.contains("\"is_checked\": true"));
    }

    #[test]
    fn test_records_table_mentions_labels() {
        let records = vec![CheckboxRecord::new("TYPE OF INSURANCE", "OCCUR", true)];
        let out = plain_formatter(OutputFormat::Table)
            .format_records(&records)
            .unwrap();
        assert!(out.contains("OCCUR"));
        assert!(out.contains("checked"));
    }

    #[test]
    fn test_metrics_quiet_format() {
        let metrics = MetricsReport::from_counts(1, 0, 0);
        let out = plain_formatter(OutputFormat::Quiet)
            .format_metrics(&metrics)
            .unwrap();
        assert_eq!(out, "1.0000 1.0000 1.0000");
    }

    #[test]
    fn test_requirement_check_reports_shortfall() {
        let metrics = MetricsReport::from_counts(8, 2, 2);
        let formatter = plain_formatter(OutputFormat::Table);
        let out = formatter.requirement_check(&metrics, 0.97, 0.90);
        assert!(out.contains("does not meet"));
        assert!(out.contains("Required precision"));
    }

    #[test]
    fn test_no_color_strips_styling() {
        let formatter = plain_formatter(OutputFormat::Table);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
