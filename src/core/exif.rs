use std::path::PathBuf;

use serde_json::Value;

use crate::utils::error::{MediaError, Result};

/// Tag shown when the caller does not ask for specific ones.
pub const DEFAULT_TAG: &str = "EXIF:DateTimeOriginal";

/// One file's metadata as reported by exiftool.
#[derive(Debug, Clone)]
pub struct ExifRecord {
    pub source_file: String,
    pub tags: serde_json::Map<String, Value>,
}

impl ExifRecord {
    /// Printable value for a tag, or "-" when the file does not carry it.
    pub fn tag_display(&self, tag: &str) -> String {
        match self.tags.get(tag) {
            Some(Value::String(s)) => normalize_exif_datetime(s),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Null) | None => "-".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Reads metadata for a whole batch of files in one exiftool run.
///
/// `-G` keeps the group prefix on tag names ("EXIF:DateTimeOriginal"),
/// `-j` selects JSON output and `-n` keeps values machine-readable.
pub async fn read_metadata_batch(files: &[PathBuf]) -> Result<Vec<ExifRecord>> {
    let output = tokio::process::Command::new("exiftool")
        .args(["-G", "-j", "-n"])
        .args(files)
        .output()
        .await
        .map_err(|e| MediaError::ToolNotFound {
            tool: "exiftool".to_string(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stdout.trim().is_empty() {
            return Err(MediaError::ToolFailed {
                tool: "exiftool".to_string(),
                exit_code: output.status.code(),
                stderr: stderr.to_string(),
            });
        }
        // exiftool 部分檔案失敗時仍會輸出其餘檔案的 JSON
        tracing::warn!("exiftool reported errors: {}", stderr.trim());
    }

    parse_records(&stdout)
}

/// Parses the JSON array exiftool prints with `-j`, one object per file.
pub fn parse_records(json: &str) -> Result<Vec<ExifRecord>> {
    let value: Value = serde_json::from_str(json).map_err(|e| MediaError::ParseError {
        message: format!("{e}: {json}"),
    })?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(MediaError::ParseError {
                message: format!("expected a JSON array from exiftool, got: {}", other),
            })
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let tags = match entry {
            Value::Object(tags) => tags,
            other => {
                return Err(MediaError::ParseError {
                    message: format!("expected one JSON object per file, got: {}", other),
                })
            }
        };
        let source_file = tags
            .get("SourceFile")
            .and_then(Value::as_str)
            .unwrap_or("(unknown)")
            .to_string();
        records.push(ExifRecord { source_file, tags });
    }

    Ok(records)
}

/// EXIF timestamps come back as `2016:01:17 14:21:03`; reformat them to
/// the ISO-style date form. Anything else passes through untouched.
pub fn normalize_exif_datetime(raw: &str) -> String {
    match chrono::NaiveDateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S") {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Fixed-width listing, one row per file: source file first, then the
/// requested tags. Columns are 20 characters wide, long values truncated.
pub fn format_table(records: &[ExifRecord], tags: &[String]) -> String {
    let mut lines = Vec::with_capacity(records.len());

    for record in records {
        let mut columns = vec![format!("{:<20.20}", record.source_file)];
        for tag in tags {
            columns.push(format!("{:<20.20}", record.tag_display(tag)));
        }
        lines.push(columns.join(" ").trim_end().to_string());
    }

    lines.join("\n")
}

/// Writes the same listing as CSV, with a header row.
pub fn export_csv<W: std::io::Write>(
    records: &[ExifRecord],
    tags: &[String],
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["SourceFile".to_string()];
    header.extend(tags.iter().cloned());
    csv_writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.source_file.clone()];
        for tag in tags {
            row.push(record.tag_display(tag));
        }
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OUTPUT: &str = r#"[
      {
        "SourceFile": "photos/IMG_1234.jpg",
        "ExifTool:ExifToolVersion": 12.40,
        "File:FileName": "IMG_1234.jpg",
        "EXIF:Make": "Canon",
        "EXIF:DateTimeOriginal": "2016:01:17 14:21:03",
        "EXIF:ISO": 100
      },
      {
        "SourceFile": "photos/screenshot.png",
        "File:FileName": "screenshot.png"
      }
    ]"#;

    fn sample_records() -> Vec<ExifRecord> {
        parse_records(SAMPLE_OUTPUT).unwrap()
    }

    #[test]
    fn test_parse_records() {
        let records = sample_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source_file, "photos/IMG_1234.jpg");
        assert_eq!(records[1].source_file, "photos/screenshot.png");
    }

    #[test]
    fn test_tag_display_formats_datetime() {
        let records = sample_records();
        assert_eq!(
            records[0].tag_display("EXIF:DateTimeOriginal"),
            "2016-01-17 14:21:03"
        );
    }

    #[test]
    fn test_tag_display_numbers_and_missing_tags() {
        let records = sample_records();

        assert_eq!(records[0].tag_display("EXIF:ISO"), "100");
        assert_eq!(records[1].tag_display("EXIF:DateTimeOriginal"), "-");
        assert_eq!(records[1].tag_display("EXIF:Make"), "-");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_records(r#"{"SourceFile": "a.jpg"}"#);
        assert!(matches!(result, Err(MediaError::ParseError { .. })));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_records("not json at all").is_err());
    }

    #[test]
    fn test_normalize_passes_through_other_strings() {
        assert_eq!(normalize_exif_datetime("Canon"), "Canon");
        assert_eq!(normalize_exif_datetime("2016:13:45 99:99:99"), "2016:13:45 99:99:99");
    }

    #[test]
    fn test_format_table_columns() {
        let records = sample_records();
        let tags = vec![DEFAULT_TAG.to_string()];

        let table = format_table(&records, &tags);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "photos/IMG_1234.jpg  2016-01-17 14:21:03");
        assert_eq!(lines[1], "photos/screenshot.pn -");
    }

    #[test]
    fn test_format_table_truncates_long_values() {
        let json = r#"[{"SourceFile": "a-very-long-directory-name/photo.jpg"}]"#;
        let records = parse_records(json).unwrap();

        let table = format_table(&records, &[]);

        assert_eq!(table, "a-very-long-director");
    }

    #[test]
    fn test_export_csv() {
        let records = sample_records();
        let tags = vec![DEFAULT_TAG.to_string(), "EXIF:Make".to_string()];

        let mut buffer = Vec::new();
        export_csv(&records, &tags, &mut buffer).unwrap();
        let csv_text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines[0], "SourceFile,EXIF:DateTimeOriginal,EXIF:Make");
        assert_eq!(lines[1], "photos/IMG_1234.jpg,2016-01-17 14:21:03,Canon");
        assert_eq!(lines[2], "photos/screenshot.png,-,-");
    }
}
