//! Archive session readers: plain or gzip, JSON or JSONL.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde_json::Value;

/// One session document, or the reason it could not be parsed.
#[derive(Debug)]
pub struct SessionSource {
    pub name: String,
    pub doc: Result<Value, serde_json::Error>,
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// File name without `.gz` and the format extension.
fn stem_and_ext(path: &Path) -> (String, String) {
    let inner = if is_gzip(path) {
        PathBuf::from(path.file_stem().unwrap_or_default())
    } else {
        path.to_path_buf()
    };
    let stem = inner
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string());
    let ext = inner
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    (stem, ext)
}

fn is_archive(path: &Path) -> bool {
    let (_, ext) = stem_and_ext(path);
    path.is_file() && (ext == "json" || ext == "jsonl")
}

/// Expand directories one level into their archive files, sorted by name.
pub fn collect_inputs(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| is_archive(p))
                .collect();
            entries.sort();
            out.extend(entries);
        } else {
            out.push(path.clone());
        }
    }
    Ok(out)
}

fn open(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    Ok(if is_gzip(path) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    })
}

/// Read every session in one file. JSONL files yield one session per
/// non-blank line, named `<stem>#<line>`.
pub fn read_sources(path: &Path) -> std::io::Result<Vec<SessionSource>> {
    let (stem, ext) = stem_and_ext(path);
    let reader = BufReader::new(open(path)?);

    if ext == "jsonl" {
        let mut out = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(SessionSource {
                name: format!("{stem}#{}", i + 1),
                doc: serde_json::from_str(&line),
            });
        }
        Ok(out)
    } else {
        Ok(vec![SessionSource {
            name: stem,
            doc: serde_json::from_reader(reader),
        }])
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    #[test]
    fn plain_json_is_one_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table-7.json");
        std::fs::write(&path, r#"{"session": "s", "events": []}"#).unwrap();

        let sources = read_sources(&path).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "table-7");
        assert!(sources[0].doc.is_ok());
    }

    #[test]
    fn gzip_jsonl_isolates_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.jsonl.gz");
        let mut gz = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(gz, r#"{{"events": []}}"#).unwrap();
        writeln!(gz).unwrap();
        writeln!(gz, "{{not json").unwrap();
        writeln!(gz, r#"{{"session": "c", "events": []}}"#).unwrap();
        gz.finish().unwrap();

        let sources = read_sources(&path).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["batch#1", "batch#3", "batch#4"]);
        assert!(sources[0].doc.is_ok());
        assert!(sources[1].doc.is_err());
        assert!(sources[2].doc.is_ok());
    }

    #[test]
    fn directories_expand_to_sorted_archives() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.jsonl", "notes.txt", "c.json.gz"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let inputs = collect_inputs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.jsonl", "b.json", "c.json.gz"]);
    }
}
