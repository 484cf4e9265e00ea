//! Output writers for replay results.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use analyzer::{DivergenceLog, Scorecard, SessionAnalysis};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{CsvSummaryRow, DetailLevel, OutputFormat};

pub struct OutputWriter<W: Write> {
    out: W,
    format: OutputFormat,
    detail: DetailLevel,
    /// Buffered sessions for the single-document format.
    buffered: Vec<Value>,
    csv_writer: Option<csv::Writer<Box<dyn Write>>>,
    csv_path: Option<PathBuf>,
    timestamp: String,
}

fn now_iso8601() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .unwrap_or_else(|_| "unknown".to_string())
}

impl<W: Write> OutputWriter<W> {
    /// `summary_csv` ending in `.gz` is written compressed.
    pub fn new(
        out: W,
        format: OutputFormat,
        detail: DetailLevel,
        summary_csv: Option<&Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let csv_writer = match summary_csv {
            Some(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir)?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)?;
                let sink: Box<dyn Write> = if path.extension().is_some_and(|e| e == "gz") {
                    Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
                } else {
                    Box::new(BufWriter::new(file))
                };
                Some(csv::Writer::from_writer(sink))
            }
            None => None,
        };

        Ok(Self {
            out,
            format,
            detail,
            buffered: Vec::new(),
            csv_writer,
            csv_path: summary_csv.map(Path::to_path_buf),
            timestamp: now_iso8601(),
        })
    }

    fn render(&self, analysis: &SessionAnalysis) -> Result<Value, serde_json::Error> {
        match self.detail {
            DetailLevel::Report => serde_json::to_value(&analysis.comparison),
            DetailLevel::Full => serde_json::to_value(analysis),
        }
    }

    pub fn write_session(
        &mut self,
        analysis: &SessionAnalysis,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let value = self.render(analysis)?;
        match self.format {
            OutputFormat::Jsonl => {
                writeln!(self.out, "{}", serde_json::to_string(&value)?)?;
                self.out.flush()?;
            }
            OutputFormat::Json => self.buffered.push(value),
        }

        if let Some(ref mut writer) = self.csv_writer {
            writer.serialize(CsvSummaryRow::new(analysis, &self.timestamp))?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Emit the buffered document (JSON format) and flush everything.
    pub fn finish(
        mut self,
        scorecard: &Scorecard,
        divergences: &DivergenceLog,
    ) -> Result<W, Box<dyn std::error::Error>> {
        if matches!(self.format, OutputFormat::Json) {
            let doc = BatchDocument {
                generated_at: &self.timestamp,
                sessions: &self.buffered,
                scorecard,
                divergences_by_kind: divergences
                    .counts_by_kind()
                    .into_iter()
                    .map(|(k, n)| (k.label().to_string(), json!(n)))
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut self.out, &doc)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        if let Some(mut writer) = self.csv_writer.take() {
            writer.flush()?;
        }
        Ok(self.out)
    }

    pub fn csv_path(&self) -> Option<&PathBuf> {
        self.csv_path.as_ref()
    }
}

#[derive(Serialize)]
struct BatchDocument<'a> {
    generated_at: &'a str,
    sessions: &'a [Value],
    scorecard: &'a Scorecard,
    divergences_by_kind: serde_json::Map<String, Value>,
}

/// Convenience for callers that only need a file path.
pub fn create_file(path: &Path) -> std::io::Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

#[cfg(test)]
mod tests {
    use analyzer::{analyze_archive, AnalyzerConfig, ComparatorConfig};

    use super::*;

    fn analysis(name: &str) -> SessionAnalysis {
        let doc = json!({"session": name, "events": [
            {"e": "round_start", "dealer": 3, "mode": "sun"},
            {"e": "play", "seat": 0, "card": "AS"},
            {"e": "play", "seat": 1, "card": "KS"},
            {"e": "play", "seat": 2, "card": "QS"},
            {"e": "play", "seat": 3, "card": "JS"},
            {"e": "trick", "next": 0}
        ]});
        analyze_archive(&doc, "fallback", &AnalyzerConfig::default()).unwrap()
    }

    #[test]
    fn jsonl_writes_one_line_per_session_and_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("out/summary.csv");
        let mut writer = OutputWriter::new(
            Vec::new(),
            OutputFormat::Jsonl,
            DetailLevel::Report,
            Some(&csv_path),
        )
        .unwrap();
        writer.write_session(&analysis("a")).unwrap();
        writer.write_session(&analysis("b")).unwrap();
        let scorecard = Scorecard::from_reports(&[], &ComparatorConfig::default());
        let out = writer.finish(&scorecard, &DivergenceLog::new()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["session"], "a");
        assert_eq!(lines[1]["total_tricks"], 1);

        let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "session");
        let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "b");
    }

    #[test]
    fn json_buffers_into_one_document() {
        let mut writer =
            OutputWriter::new(Vec::new(), OutputFormat::Json, DetailLevel::Full, None).unwrap();
        let a = analysis("a");
        writer.write_session(&a).unwrap();
        let config = ComparatorConfig::default();
        let scorecard = Scorecard::from_report(&a.comparison, &config);
        let out = writer.finish(&scorecard, &DivergenceLog::new()).unwrap();

        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["sessions"].as_array().unwrap().len(), 1);
        assert_eq!(doc["sessions"][0]["session"], "a");
        assert!(doc["sessions"][0]["extraction"].is_object());
        assert_eq!(doc["scorecard"]["sessions"], 1);
    }
}
