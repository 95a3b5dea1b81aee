// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat, one-row-per-query export of the telemetry log.

use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumString};
use tiergate_core::{Backend, TiergateError};

use crate::metric::QueryMetric;

/// Questions longer than this are cut in JSON output.
const QUESTION_PREVIEW_CHARS: usize = 50;

const CSV_HEADER: [&str; 6] = [
    "timestamp",
    "backend",
    "success",
    "iterations",
    "latency_ms",
    "cost",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Parse a format name, rejecting anything but `json` and `csv`.
    pub fn parse(name: &str) -> Result<Self, TiergateError> {
        Self::from_str(name.trim())
            .map_err(|_| TiergateError::UnsupportedExportFormat(name.to_string()))
    }
}

#[derive(Serialize)]
struct JsonRow {
    timestamp: String,
    question: String,
    backend: Backend,
    success: bool,
    iterations: u32,
    latency_ms: f64,
    cost: f64,
}

fn preview(question: &str) -> String {
    match question.char_indices().nth(QUESTION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &question[..cut]),
        None => question.to_string(),
    }
}

/// Render `metrics` in `format`.
pub fn export(metrics: &[QueryMetric], format: ExportFormat) -> Result<String, TiergateError> {
    match format {
        ExportFormat::Json => export_json(metrics),
        ExportFormat::Csv => export_csv(metrics),
    }
}

fn export_json(metrics: &[QueryMetric]) -> Result<String, TiergateError> {
    let rows: Vec<_> = metrics
        .iter()
        .map(|m| JsonRow {
            timestamp: m.timestamp.to_rfc3339(),
            question: preview(&m.question),
            backend: m.backend,
            success: m.success,
            iterations: m.iterations,
            latency_ms: m.latency_ms,
            cost: m.estimated_cost,
        })
        .collect();
    serde_json::to_string_pretty(&rows).map_err(|e| TiergateError::Export {
        source: Box::new(e),
    })
}

fn export_csv(metrics: &[QueryMetric]) -> Result<String, TiergateError> {
    let csv_err = |e: csv::Error| TiergateError::Export {
        source: Box::new(e),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for m in metrics {
        writer
            .write_record([
                m.timestamp.to_rfc3339(),
                m.backend.to_string(),
                m.success.to_string(),
                m.iterations.to_string(),
                format!("{:.1}", m.latency_ms),
                format!("{:.6}", m.estimated_cost),
            ])
            .map_err(csv_err)?;
    }

    let bytes = writer.into_inner().map_err(|e| TiergateError::Export {
        source: Box::new(e.into_error()),
    })?;
    String::from_utf8(bytes).map_err(|e| TiergateError::Export {
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::metric;
    use tiergate_core::Complexity;

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(ExportFormat::parse("JSON").unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(" csv ").unwrap(), ExportFormat::Csv);
        let err = ExportFormat::parse("xml").unwrap_err();
        assert!(matches!(err, TiergateError::UnsupportedExportFormat(ref f) if f == "xml"));
    }

    #[test]
    fn csv_has_header_and_fixed_precision() {
        let mut m = metric(Backend::ApiEconomy, Complexity::Simple, 0);
        m.latency_ms = 1234.56;
        m.estimated_cost = 0.0003;
        let out = export(&[m.clone()], ExportFormat::Csv).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "timestamp,backend,success,iterations,latency_ms,cost");
        assert_eq!(
            lines[1],
            format!("{},api_economy,true,1,1234.6,0.000300", m.timestamp.to_rfc3339())
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn json_truncates_long_questions() {
        let mut long = metric(Backend::ApiPremium, Complexity::Complex, 0);
        long.question = "x".repeat(60);
        let short = metric(Backend::SelfHosted, Complexity::Simple, 1);

        let out = export(&[long, short], ExportFormat::Json).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["question"], format!("{}...", "x".repeat(50)));
        assert_eq!(rows[0]["backend"], "api_premium");
        assert_eq!(rows[1]["question"], "question 1");
        assert_eq!(rows[1]["iterations"], 1);
        assert!(rows[1].get("user_id").is_none());
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let question = "é".repeat(51);
        assert_eq!(preview(&question), format!("{}...", "é".repeat(50)));
        assert_eq!(preview(&"é".repeat(50)), "é".repeat(50));
    }

    #[test]
    fn empty_log_exports() {
        assert_eq!(export(&[], ExportFormat::Json).unwrap(), "[]");
        assert_eq!(
            export(&[], ExportFormat::Csv).unwrap().trim_end(),
            "timestamp,backend,success,iterations,latency_ms,cost"
        );
    }
}
