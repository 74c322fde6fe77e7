//! Render roll history as CSV, JSON, or Markdown.

use std::fmt;
use std::str::FromStr;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, HistoryResult};
use crate::filter::DateRange;
use crate::record::RollRecord;
use crate::stats::RollStatistics;

/// Header row of the CSV export.
pub const CSV_HEADER: &str =
    "id,dice_type,result,modifier,total,timestamp,session_id,context,character_name";

/// Output format for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values, one roll per line.
    #[default]
    Csv,
    /// A JSON document with a `rolls` array.
    Json,
    /// A Markdown table.
    Markdown,
}

impl ExportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(HistoryError::UnknownFormat(other.to_string())),
        }
    }
}

/// What to export and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Append aggregate statistics for the exported rolls.
    pub include_statistics: bool,
    /// Only export rolls in this window.
    pub date_range: DateRange,
}

impl ExportOptions {
    /// Options for one format, all rolls, no statistics.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Include statistics.
    pub fn with_statistics(mut self, include: bool) -> Self {
        self.include_statistics = include;
        self
    }

    /// Restrict to a date range.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    rolls: &'a [RollRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a RollStatistics>,
}

/// Render `records` in `format`, appending `stats` when given.
///
/// CSV output ignores `stats`; it is a flat table of rolls.
pub fn export(
    records: &[RollRecord],
    stats: Option<&RollStatistics>,
    format: ExportFormat,
) -> HistoryResult<String> {
    match format {
        ExportFormat::Csv => Ok(to_csv(records)),
        ExportFormat::Json => {
            let doc = ExportDocument {
                rolls: records,
                statistics: stats,
            };
            Ok(serde_json::to_string_pretty(&doc)?)
        }
        ExportFormat::Markdown => Ok(to_markdown(records, stats)),
    }
}

fn timestamp(record: &RollRecord) -> String {
    record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_csv(records: &[RollRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        let fields = [
            r.id.to_string(),
            csv_field(&r.dice_type),
            r.result.to_string(),
            r.modifier.to_string(),
            r.total.to_string(),
            timestamp(r),
            csv_field(r.session_id.as_deref().unwrap_or_default()),
            csv_field(r.context.as_deref().unwrap_or_default()),
            csv_field(r.character_name.as_deref().unwrap_or_default()),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn md_cell(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.replace('|', "\\|").replace('\n', " "),
        _ => "-".to_string(),
    }
}

fn signed(n: i64) -> String {
    if n >= 0 { format!("+{n}") } else { n.to_string() }
}

fn to_markdown(records: &[RollRecord], stats: Option<&RollStatistics>) -> String {
    let mut out = String::from("# Roll History\n\n");
    if records.is_empty() {
        out.push_str("No rolls recorded.\n");
    } else {
        out.push_str("| ID | Dice | Result | Modifier | Total | Time | Session | Context | Character |\n");
        out.push_str("|---:|------|-------:|---------:|------:|------|---------|---------|-----------|\n");
        for r in records {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                r.id,
                md_cell(Some(&r.dice_type)),
                r.result,
                signed(r.modifier),
                r.total,
                timestamp(r),
                md_cell(r.session_id.as_deref()),
                md_cell(r.context.as_deref()),
                md_cell(r.character_name.as_deref()),
            ));
        }
    }

    if let Some(stats) = stats {
        out.push_str("\n## Statistics\n\n");
        out.push_str(&format!("Total rolls: {}\n", stats.total_rolls));
        if !stats.dice_type_stats.is_empty() {
            out.push_str("\n| Dice | Count | Average | Min | Max | Share |\n");
            out.push_str("|------|------:|--------:|----:|----:|------:|\n");
            for s in &stats.dice_type_stats {
                out.push_str(&format!(
                    "| {} | {} | {:.2} | {} | {} | {:.1}% |\n",
                    md_cell(Some(&s.dice_type)),
                    s.count,
                    s.average,
                    s.min,
                    s.max,
                    s.percentage,
                ));
            }
        }
        out.push_str(&format!(
            "\nLongest win streak: {}\nLongest loss streak: {}\n",
            stats.streaks.longest_win_streak, stats.streaks.longest_loss_streak
        ));
    }
    out
}
