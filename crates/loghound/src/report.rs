//! Report — format the final tally for humans or machines.
//!
//! The pipeline itself never writes output; this is the collaborator that
//! turns its `(record, count)` pairs into text or JSON.

use std::io::{self, Write};

use clap::ValueEnum;
use serde_json::json;

use crate::record::Record;

const RULE_WIDTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn write(&self, tally: &[(Record, usize)], out: &mut dyn Write) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => write_text(tally, out),
            ReportFormat::Json => write_json(tally, out),
        }
    }
}

fn write_text(tally: &[(Record, usize)], out: &mut dyn Write) -> io::Result<()> {
    for (record, count) in tally {
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            out,
            "count = {}  proc_name = {}  exception = {}",
            count,
            record.proc_name().unwrap_or("<unknown>"),
            record.ex_name().unwrap_or("<unknown>"),
        )?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(out, "{}", record.text)?;
    }
    Ok(())
}

fn write_json(tally: &[(Record, usize)], out: &mut dyn Write) -> io::Result<()> {
    let entries: Vec<serde_json::Value> = tally
        .iter()
        .map(|(record, count)| {
            json!({
                "count": count,
                "timestamp": record.timestamp,
                "fields": record.fields,
                "text": record.text,
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &entries).map_err(io::Error::other)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn tally() -> Vec<(Record, usize)> {
        let mut fields = BTreeMap::new();
        fields.insert("proc_name".to_string(), "com.example.app".to_string());
        fields.insert("ex_name".to_string(), "java.lang.NullPointerException".to_string());
        vec![(
            Record {
                text: "AndroidRuntime: FATAL EXCEPTION: main".to_string(),
                timestamp: Some("11-17 16:27:00.050".to_string()),
                fields,
            },
            2,
        )]
    }

    #[test]
    fn test_text_report_layout() {
        let mut out = Vec::new();
        Reporter::new(ReportFormat::Text)
            .write(&tally(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&"=".repeat(RULE_WIDTH)));
        assert!(text.contains(
            "count = 2  proc_name = com.example.app  exception = java.lang.NullPointerException"
        ));
        assert!(text.contains("AndroidRuntime: FATAL EXCEPTION: main"));
    }

    #[test]
    fn test_text_report_missing_fields() {
        let mut out = Vec::new();
        let tally = vec![(
            Record {
                text: "pid: <pid>".to_string(),
                timestamp: None,
                fields: BTreeMap::new(),
            },
            1,
        )];
        Reporter::new(ReportFormat::Text).write(&tally, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("proc_name = <unknown>"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let mut out = Vec::new();
        Reporter::new(ReportFormat::Json)
            .write(&tally(), &mut out)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["count"], 2);
        assert_eq!(parsed[0]["fields"]["proc_name"], "com.example.app");
        assert_eq!(parsed[0]["timestamp"], "11-17 16:27:00.050");
    }

    #[test]
    fn test_empty_tally_writes_nothing_text() {
        let mut out = Vec::new();
        Reporter::new(ReportFormat::Text).write(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
