use serde::{Deserialize, Serialize};

use crate::analyzer::{BlackjackAnalysis, PokerAnalysis};

/// One analysed frame, tagged by game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum Analysis {
    Poker(PokerAnalysis),
    Blackjack(BlackjackAnalysis),
}

/// A single JSONL line of the analysis log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Unique identifier for this analysis (format: YYYYMMDD-NNNNNN)
    pub id: String,
    /// Timestamp when the analysis was logged (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    pub analysis: Analysis,
}

pub fn format_record_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct AnalysisLogger<W: Write> {
    writer: W,
    date: String,
    seq: u32,
}

impl AnalysisLogger<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self::new(BufWriter::new(f)))
    }
}

impl<W: Write> AnalysisLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_record_id(&self.date, self.seq)
    }

    /// Stamps `analysis` with the next id and the current time, writes it as
    /// one JSON line and returns the record.
    pub fn log(&mut self, analysis: Analysis) -> std::io::Result<AnalysisRecord> {
        let record = AnalysisRecord {
            id: self.next_id(),
            ts: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            analysis,
        };
        self.write(&record)?;
        Ok(record)
    }

    pub fn write(&mut self, record: &AnalysisRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
