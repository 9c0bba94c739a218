//! TextCatalogDecoder - `Key: value` 形式のカタログエントリ
//!
//! ```text
//! Name: Widget
//! Price: 10.00
//! Score: 0.8
//! Entity: 12
//! Last Modified: 2024-05-01 09:30:00
//! ```
//!
//! - 知らないキーの行は無視（UTF-8 でないバイトが含まれていてもよい）
//! - Name / Price / Score は必須、Entity / Last Modified は任意
//! - Price / Score / Last Modified が壊れていればファイル全体がデコード失敗
//! - Entity が壊れていても警告だけ出して 0 のまま

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::domain::CatalogRecord;
use crate::ports::{CatalogDecoder, DecodeError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct TextCatalogDecoder {
    max_name_chars: usize,
}

impl TextCatalogDecoder {
    pub fn new(max_name_len: usize) -> Self {
        Self {
            max_name_chars: max_name_len.saturating_sub(1),
        }
    }

    /// Decode already-read text; `path` is only used in errors.
    pub fn decode_str(&self, path: &Path, text: &str) -> Result<CatalogRecord, DecodeError> {
        let malformed = |field: &'static str, value: &str| DecodeError::Malformed {
            path: path.to_path_buf(),
            field,
            value: value.to_string(),
        };

        let mut name = None;
        let mut price = None;
        let mut score = None;
        let mut entity = 0;
        let mut last_modified = None;

        for line in text.lines() {
            if let Some(value) = line.strip_prefix("Name:") {
                let value = value.trim();
                if !value.is_empty() {
                    name = Some(value.chars().take(self.max_name_chars).collect::<String>());
                }
            } else if let Some(value) = line.strip_prefix("Price:") {
                let value = value.trim();
                price = Some(value.parse::<f64>().map_err(|_| malformed("Price", value))?);
            } else if let Some(value) = line.strip_prefix("Score:") {
                let value = value.trim();
                score = Some(value.parse::<f64>().map_err(|_| malformed("Score", value))?);
            } else if let Some(value) = line.strip_prefix("Entity:") {
                let value = value.trim();
                match value.parse::<i64>() {
                    Ok(parsed) => entity = parsed,
                    Err(_) => {
                        warn!(path = %path.display(), value, "malformed Entity ignored");
                    }
                }
            } else if let Some(value) = line.strip_prefix("Last Modified:") {
                let value = value.trim();
                last_modified = Some(
                    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
                        .map_err(|_| malformed("Last Modified", value))?,
                );
            }
        }

        let missing = |field| DecodeError::MissingField {
            path: path.to_path_buf(),
            field,
        };
        Ok(CatalogRecord {
            name: name.ok_or_else(|| missing("Name"))?,
            price: price.ok_or_else(|| missing("Price"))?,
            score: score.ok_or_else(|| missing("Score"))?,
            entity,
            last_modified,
        })
    }
}

impl Default for TextCatalogDecoder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_NAME_LEN)
    }
}

impl CatalogDecoder for TextCatalogDecoder {
    fn decode(&self, path: &Path) -> Result<CatalogRecord, DecodeError> {
        let bytes = fs::read(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode_str(path, &String::from_utf8_lossy(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn decode(text: &str) -> Result<CatalogRecord, DecodeError> {
        TextCatalogDecoder::default().decode_str(Path::new("entry.txt"), text)
    }

    #[test]
    fn decodes_all_known_keys() {
        let record = decode(
            "Name: Widget\nPrice: 10.0\nScore: 0.8\nEntity: 42\nLast Modified: 2024-05-01 09:30:00\n",
        )
        .unwrap();

        assert_eq!(record.name, "Widget");
        assert_eq!(record.price, 10.0);
        assert_eq!(record.score, 0.8);
        assert_eq!(record.entity, 42);
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(record.last_modified, Some(expected));
    }

    #[test]
    fn unknown_lines_are_ignored() {
        let record = decode("Color: red\nName: Widget\n\nPrice: 1.5\nScore: 2\nnotes\n").unwrap();
        assert_eq!(record.name, "Widget");
        assert_eq!(record.entity, 0);
        assert_eq!(record.last_modified, None);
    }

    #[rstest]
    #[case::bad_timestamp("Name: W\nPrice: 1\nScore: 1\nLast Modified: yesterday\n", "Last Modified")]
    #[case::bad_price("Name: W\nPrice: cheap\nScore: 1\n", "Price")]
    #[case::bad_score("Name: W\nPrice: 1\nScore: high\n", "Score")]
    fn malformed_values_fail_the_whole_file(#[case] text: &str, #[case] expected: &str) {
        match decode(text) {
            Err(DecodeError::Malformed { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected malformed {expected}, got {other:?}"),
        }
    }

    #[rstest]
    #[case::no_name("Price: 1\nScore: 1\n", "Name")]
    #[case::no_price("Name: W\nScore: 1\n", "Price")]
    #[case::no_score("Name: W\nPrice: 1\n", "Score")]
    fn required_fields_must_be_present(#[case] text: &str, #[case] expected: &str) {
        match decode(text) {
            Err(DecodeError::MissingField { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected missing {expected}, got {other:?}"),
        }
    }

    #[test]
    fn long_names_are_truncated() {
        let text = format!("Name: {}\nPrice: 1\nScore: 1\n", "n".repeat(80));
        assert_eq!(decode(&text).unwrap().name.len(), 49);
    }

    #[test]
    fn malformed_entity_keeps_the_record() {
        let record = decode("Name: Widget\nPrice: 10\nScore: 0.8\nEntity: N/A\n").unwrap();
        assert_eq!(record.name, "Widget");
        assert_eq!(record.entity, 0);
        assert!((record.contribution(2) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn non_utf8_bytes_on_unknown_lines_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.txt");
        let mut bytes = b"Name: Widget\nPrice: 10\nScore: 0.8\nNote: caf".to_vec();
        bytes.extend_from_slice(&[0xE9, b'\n']);
        std::fs::write(&path, bytes).unwrap();

        let record = TextCatalogDecoder::default().decode(&path).unwrap();
        assert_eq!(record.name, "Widget");
        assert_eq!(record.price, 10.0);
        assert_eq!(record.score, 0.8);
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextCatalogDecoder::default()
            .decode(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }
}
