//! Output path resolution for social images.
//!
//! Every artifact maps to exactly one file under the social image root:
//!
//! | Artifact | Path |
//! |---|---|
//! | Word | `{root}/{year}/{date}-{slug}.png` |
//! | Word, nothing sluggable | `{root}/{year}/{date}-word.png` |
//! | Word (demo) | `{root}/demo/{year}/{date}-{slug}.png` |
//! | Page | `{root}/pages/{slug}.png` |
//!
//! Dates are compact `YYYYMMDD`; the year directory is the first four digits.
//! Page slugs replace `/` with `-` before slugging, so `words/browse` becomes
//! `words-browse.png`. An empty page path (the site root) is `index`.
//!
//! Writes go through [`write_artifact`], which creates missing directories and
//! replaces the target atomically via a uniquely named sibling temp file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamingError {
    #[error("Invalid date {0:?}: expected YYYYMMDD")]
    InvalidDate(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// URL-safe slug: lowercase ASCII alphanumerics, everything else collapsed
/// into single hyphens, no leading or trailing hyphen.
///
/// - `"Serendipity"` → `"serendipity"`
/// - `"déjà vu"` → `"d-j-vu"`
/// - `"  rock 'n' roll  "` → `"rock-n-roll"`
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// A validated compact date (`YYYYMMDD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompactDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl CompactDate {
    pub fn parse(date: &str) -> Result<Self, NamingError> {
        let invalid = || NamingError::InvalidDate(date.to_string());
        if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let field = |range: std::ops::Range<usize>| {
            date[range].parse::<u32>().map_err(|_| invalid())
        };
        let parsed = Self {
            year: field(0..4)?,
            month: field(4..6)?,
            day: field(6..8)?,
        };
        if !(1..=12).contains(&parsed.month)
            || parsed.day == 0
            || parsed.day > parsed.days_in_month()
        {
            return Err(invalid());
        }
        Ok(parsed)
    }

    fn days_in_month(&self) -> u32 {
        match self.month {
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// `"January 16, 2024"`
    pub fn long_form(&self) -> String {
        let month = MONTHS[(self.month - 1) as usize];
        format!("{} {}, {}", month, self.day, self.year)
    }

    /// Year directory name, always four digits.
    pub fn year_dir(&self) -> String {
        format!("{:04}", self.year)
    }
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Format a compact date for display on a card.
pub fn format_date(date: &str) -> Result<String, NamingError> {
    Ok(CompactDate::parse(date)?.long_form())
}

/// What a social image is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Word { word: String, date: String },
    Page { path: String },
}

impl ArtifactKind {
    /// Human label for progress output and error context.
    pub fn label(&self) -> String {
        match self {
            ArtifactKind::Word { word, date } => format!("word '{}' ({})", word, date),
            ArtifactKind::Page { path } => format!("page '{}'", path),
        }
    }
}

/// Where social images live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub social_root: PathBuf,
    /// Route word images into `demo/` so sample runs never mix with real output.
    pub demo: bool,
}

impl OutputLayout {
    pub fn new(social_root: impl Into<PathBuf>) -> Self {
        Self {
            social_root: social_root.into(),
            demo: false,
        }
    }

    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    /// Resolve the output file for an artifact. Pure; touches no filesystem.
    pub fn resolve(&self, kind: &ArtifactKind) -> Result<PathBuf, NamingError> {
        match kind {
            ArtifactKind::Word { word, date } => {
                let parsed = CompactDate::parse(date)?;
                let base = if self.demo {
                    self.social_root.join("demo")
                } else {
                    self.social_root.clone()
                };
                Ok(base
                    .join(parsed.year_dir())
                    .join(format!("{}-{}.png", date, word_slug(word))))
            }
            ArtifactKind::Page { path } => Ok(self
                .social_root
                .join("pages")
                .join(format!("{}.png", page_slug(path)))),
        }
    }
}

fn word_slug(word: &str) -> String {
    let s = slug(word);
    if s.is_empty() { "word".to_string() } else { s }
}

fn page_slug(path: &str) -> String {
    let s = slug(&path.replace('/', "-"));
    if s.is_empty() { "index".to_string() } else { s }
}

/// Write `bytes` to `path`, creating parent directories as needed.
///
/// The data lands in a dot-prefixed sibling with a unique name and is renamed
/// over the target, so a reader never sees a half-written image and two
/// writers racing on one path never share a temp file. The temp file is
/// removed if anything fails before the rename.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), NamingError> {
    if path.file_name().is_none() {
        let err = io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name");
        return Err(err.into());
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
