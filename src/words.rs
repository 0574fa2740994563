//! Word dataset loading.
//!
//! The dataset is a directory tree of JSON files, one per featured word:
//!
//! ```text
//! data/words/
//! ├── 2023/
//! │   └── 20231231.json     {"word": "auld"}
//! └── 2024/
//!     ├── 20240116.json     {"word": "serendipity"}
//!     └── 20240301.json     {"word": "Japan", "preserve_case": true}
//! ```
//!
//! `date` may be given explicitly in the file; otherwise the file stem must
//! be an 8-digit compact date. Entries are returned sorted by date, then word,
//! so batch output order is stable across runs.

use crate::naming::{CompactDate, NamingError};
use crate::types::WordEntry;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WordsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot walk {0}: {1}")]
    Walk(PathBuf, walkdir::Error),
    #[error("Invalid word file {0}: {1}")]
    Json(PathBuf, serde_json::Error),
    #[error("Word file {0} has no date and its name is not YYYYMMDD")]
    MissingDate(PathBuf),
    #[error("Word file {0}: {1}")]
    Date(PathBuf, NamingError),
}

/// The fields a card needs. Word files carry definitions and other content
/// alongside these, which is ignored here.
#[derive(Deserialize)]
struct WordFile {
    word: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    preserve_case: bool,
}

/// Load every `*.json` word file under `dir`.
pub fn load_entries(dir: &Path) -> Result<Vec<WordEntry>, WordsError> {
    let mut entries = Vec::new();

    for item in WalkDir::new(dir).follow_links(true) {
        let item = item.map_err(|e| WordsError::Walk(dir.to_path_buf(), e))?;
        let path = item.path();
        if !item.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }
        entries.push(load_entry(path)?);
    }

    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.word.cmp(&b.word)));
    Ok(entries)
}

fn load_entry(path: &Path) -> Result<WordEntry, WordsError> {
    let content = std::fs::read_to_string(path)?;
    let file: WordFile =
        serde_json::from_str(&content).map_err(|e| WordsError::Json(path.to_path_buf(), e))?;

    let date = match file.date {
        Some(date) => date,
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()))
            .map(str::to_string)
            .ok_or_else(|| WordsError::MissingDate(path.to_path_buf()))?,
    };
    CompactDate::parse(&date).map_err(|e| WordsError::Date(path.to_path_buf(), e))?;

    Ok(WordEntry {
        word: file.word,
        date,
        preserve_case: file.preserve_case,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_and_sorts_by_date() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "2024/20240301.json", r#"{"word": "Japan", "preserve_case": true}"#);
        write(tmp.path(), "2023/20231231.json", r#"{"word": "auld"}"#);
        write(tmp.path(), "2024/20240116.json", r#"{"word": "serendipity"}"#);

        let entries = load_entries(tmp.path()).unwrap();
        let dates: Vec<_> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["20231231", "20240116", "20240301"]);
        assert!(entries[2].preserve_case);
        assert!(!entries[1].preserve_case);
    }

    #[test]
    fn explicit_date_overrides_file_name() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "halcyon.json", r#"{"word": "halcyon", "date": "20240501"}"#);

        let entries = load_entries(tmp.path()).unwrap();
        assert_eq!(entries[0].date, "20240501");
    }

    #[test]
    fn extra_content_fields_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "2024/20240116.json",
            r#"{
                "word": "serendipity",
                "date": "20240116",
                "data": [
                    {
                        "partOfSpeech": "noun",
                        "text": "The occurrence of events by chance in a happy way."
                    }
                ]
            }"#,
        );

        let entries = load_entries(tmp.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "serendipity");
        assert_eq!(entries[0].date.as_str(), "20240116");
    }

    #[test]
    fn same_date_sorts_by_word() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.json", r#"{"word": "zest", "date": "20240501"}"#);
        write(tmp.path(), "a.json", r#"{"word": "apple", "date": "20240501"}"#);

        let words: Vec<_> = load_entries(tmp.path())
            .unwrap()
            .into_iter()
            .map(|e| e.word)
            .collect();
        assert_eq!(words, vec!["apple", "zest"]);
    }

    #[test]
    fn non_json_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", "# words");
        write(tmp.path(), "20240116.json", r#"{"word": "serendipity"}"#);
        assert_eq!(load_entries(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn missing_date_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "serendipity.json", r#"{"word": "serendipity"}"#);
        assert!(matches!(
            load_entries(tmp.path()),
            Err(WordsError::MissingDate(_))
        ));
    }

    #[test]
    fn impossible_date_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "20241340.json", r#"{"word": "nope"}"#);
        assert!(matches!(load_entries(tmp.path()), Err(WordsError::Date(..))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "20240116.json", "{word: serendipity}");
        assert!(matches!(load_entries(tmp.path()), Err(WordsError::Json(..))));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_entries(&tmp.path().join("nope")).is_err());
    }
}
