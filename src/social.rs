//! Social image batch driver.
//!
//! Turns word entries and page entries into PNG files on disk:
//!
//! 1. **Resolve**: the output path comes from [`OutputLayout::resolve`]; word
//!    dates are validated here, before any rendering.
//! 2. **Skip**: if the file already exists and `force` is off, nothing is
//!    rendered.
//! 3. **Render**: [`render_card`] composes the scene and hands it to the
//!    encoder.
//! 4. **Write**: [`write_artifact`] creates directories and replaces the file
//!    atomically.
//!
//! ## Failure model
//!
//! A single call ([`SocialGenerator::render_word`],
//! [`SocialGenerator::render_page`]) returns the error so the caller can exit
//! non-zero. Bulk calls ([`SocialGenerator::generate_words`],
//! [`SocialGenerator::generate_pages`]) never abort: each failure is reported
//! as a [`SocialEvent::Failed`] carrying the artifact label, tallied in
//! [`BatchStats`], and the run moves on.
//!
//! Bulk runs fan out over the global rayon pool; per-worker stats are merged
//! with `reduce`. Progress events go through an optional
//! [`std::sync::mpsc::Sender`] so the CLI can print from a single thread.

use crate::config::RenderConfig;
use crate::imaging::{CardText, RenderError, SceneEncoder, TypefaceSet, render_card};
use crate::naming::{ArtifactKind, NamingError, OutputLayout, format_date, write_artifact};
use crate::types::{PageEntry, WordEntry};
use rayon::prelude::*;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialError {
    #[error("Path error: {0}")]
    Naming(#[from] NamingError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("{label}: {source}")]
    Artifact {
        label: String,
        source: Box<SocialError>,
    },
}

impl SocialError {
    fn for_artifact(kind: &ArtifactKind, source: SocialError) -> Self {
        SocialError::Artifact {
            label: kind.label(),
            source: Box::new(source),
        }
    }
}

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rendered(PathBuf),
    /// Output already existed and `force` was off.
    Skipped(PathBuf),
}

/// Progress events emitted during bulk runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialEvent {
    Rendered { label: String, path: PathBuf },
    Skipped { label: String, path: PathBuf },
    Failed { label: String, error: String },
}

/// Tally of a bulk run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub rendered: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl BatchStats {
    pub fn total(&self) -> u32 {
        self.rendered + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn merge(self, other: BatchStats) -> BatchStats {
        BatchStats {
            rendered: self.rendered + other.rendered,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }

    fn record(result: &Result<Outcome, SocialError>) -> BatchStats {
        let mut stats = BatchStats::default();
        match result {
            Ok(Outcome::Rendered(_)) => stats.rendered = 1,
            Ok(Outcome::Skipped(_)) => stats.skipped = 1,
            Err(_) => stats.failed = 1,
        }
        stats
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rendered, {} skipped, {} failed ({} total)",
            self.rendered,
            self.skipped,
            self.failed,
            self.total()
        )
    }
}

/// Headline as drawn on the card. Lowercased unless the entry asks otherwise;
/// the file name is slugged separately and is always lowercase.
pub fn headline_text(word: &str, preserve_case: bool) -> String {
    if preserve_case {
        word.to_string()
    } else {
        word.to_lowercase()
    }
}

/// Everything needed to render artifacts, borrowed for the length of a run.
pub struct SocialGenerator<'a, E: SceneEncoder> {
    pub encoder: &'a E,
    pub typefaces: &'a TypefaceSet,
    pub config: &'a RenderConfig,
    pub layout: &'a OutputLayout,
    /// Re-render even if the output file already exists.
    pub force: bool,
}

impl<E: SceneEncoder> SocialGenerator<'_, E> {
    /// Render the card for one word.
    pub fn render_word(&self, entry: &WordEntry) -> Result<Outcome, SocialError> {
        self.render_artifact(&word_kind(entry), || {
            let subtitle = format_date(&entry.date)?;
            let headline = headline_text(&entry.word, entry.preserve_case);
            self.encode(Some(&subtitle), &headline)
        })
    }

    /// Render the card for one generic page.
    pub fn render_page(&self, page: &PageEntry) -> Result<Outcome, SocialError> {
        self.render_artifact(&page_kind(page), || {
            self.encode(page.subtitle.as_deref(), &page.title)
        })
    }

    /// Render every word entry, continuing past failures.
    pub fn generate_words(
        &self,
        entries: &[WordEntry],
        events: Option<&Sender<SocialEvent>>,
    ) -> BatchStats {
        entries
            .par_iter()
            .map(|entry| {
                let result = self.render_word(entry);
                emit(events, word_kind(entry).label(), &result);
                BatchStats::record(&result)
            })
            .reduce(BatchStats::default, BatchStats::merge)
    }

    /// Render every page entry, continuing past failures.
    pub fn generate_pages(
        &self,
        pages: &[PageEntry],
        events: Option<&Sender<SocialEvent>>,
    ) -> BatchStats {
        pages
            .par_iter()
            .map(|page| {
                let result = self.render_page(page);
                emit(events, page_kind(page).label(), &result);
                BatchStats::record(&result)
            })
            .reduce(BatchStats::default, BatchStats::merge)
    }

    fn encode(&self, subtitle: Option<&str>, headline: &str) -> Result<Vec<u8>, SocialError> {
        Ok(render_card(
            self.encoder,
            self.typefaces,
            self.config,
            CardText { subtitle, headline },
        )?)
    }

    fn render_artifact(
        &self,
        kind: &ArtifactKind,
        render: impl FnOnce() -> Result<Vec<u8>, SocialError>,
    ) -> Result<Outcome, SocialError> {
        let run = || -> Result<Outcome, SocialError> {
            let path = self.layout.resolve(kind)?;
            if !self.force && path.exists() {
                return Ok(Outcome::Skipped(path));
            }
            let bytes = render()?;
            write_artifact(&path, &bytes)?;
            Ok(Outcome::Rendered(path))
        };
        run().map_err(|e| SocialError::for_artifact(kind, e))
    }
}

fn word_kind(entry: &WordEntry) -> ArtifactKind {
    ArtifactKind::Word {
        word: entry.word.clone(),
        date: entry.date.clone(),
    }
}

fn page_kind(page: &PageEntry) -> ArtifactKind {
    ArtifactKind::Page {
        path: page.path.clone(),
    }
}

fn emit(
    events: Option<&Sender<SocialEvent>>,
    label: String,
    result: &Result<Outcome, SocialError>,
) {
    let Some(tx) = events else {
        return;
    };
    let event = match result {
        Ok(Outcome::Rendered(path)) => SocialEvent::Rendered {
            label,
            path: path.clone(),
        },
        Ok(Outcome::Skipped(path)) => SocialEvent::Skipped {
            label,
            path: path.clone(),
        },
        Err(e) => SocialEvent::Failed {
            label,
            error: match e {
                SocialError::Artifact { source, .. } => source.to_string(),
                other => other.to_string(),
            },
        },
    };
    // Receiver hung up: nobody is listening, keep rendering.
    let _ = tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockEncoder;
    use crate::test_helpers::{noto_typefaces, test_render_config};
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn word(word: &str, date: &str) -> WordEntry {
        WordEntry {
            word: word.into(),
            date: date.into(),
            preserve_case: false,
        }
    }

    fn page(path: &str, title: &str, subtitle: Option<&str>) -> PageEntry {
        PageEntry {
            path: path.into(),
            title: title.into(),
            subtitle: subtitle.map(String::from),
        }
    }

    struct Fixture {
        tmp: TempDir,
        typefaces: TypefaceSet,
        config: RenderConfig,
        layout: OutputLayout,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let layout = OutputLayout::new(tmp.path().join("social"));
            Self {
                tmp,
                typefaces: noto_typefaces(),
                config: test_render_config(),
                layout,
            }
        }

        fn generator<'a>(
            &'a self,
            encoder: &'a MockEncoder,
            force: bool,
        ) -> SocialGenerator<'a, MockEncoder> {
            SocialGenerator {
                encoder,
                typefaces: &self.typefaces,
                config: &self.config,
                layout: &self.layout,
                force,
            }
        }
    }

    // =========================================================================
    // Single artifacts
    // =========================================================================

    #[test]
    fn renders_word_to_year_directory() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let outcome = fx
            .generator(&encoder, false)
            .render_word(&word("serendipity", "20240116"))
            .unwrap();

        let expected = fx.tmp.path().join("social/2024/20240116-serendipity.png");
        assert_eq!(outcome, Outcome::Rendered(expected.clone()));
        assert_eq!(fs::read(&expected).unwrap(), b"mock-png");
    }

    #[test]
    fn word_card_has_site_title_date_and_headline() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        fx.generator(&encoder, false)
            .render_word(&word("Serendipity", "20240116"))
            .unwrap();

        let recorded = encoder.recorded();
        assert_eq!(recorded[0].canvas, (1200, 630));
        assert_eq!(
            recorded[0].texts,
            vec![
                fx.config.site_title.clone(),
                "January 16, 2024".to_string(),
                "serendipity".to_string()
            ]
        );
    }

    #[test]
    fn preserve_case_affects_glyphs_not_file_name() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let mut entry = word("Japan", "20240301");
        entry.preserve_case = true;
        let outcome = fx.generator(&encoder, false).render_word(&entry).unwrap();

        assert_eq!(encoder.recorded()[0].texts[2], "Japan");
        assert_eq!(
            outcome,
            Outcome::Rendered(fx.tmp.path().join("social/2024/20240301-japan.png"))
        );
    }

    #[test]
    fn renders_page() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let outcome = fx
            .generator(&encoder, false)
            .render_page(&page("stats", "Statistics", None))
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Rendered(fx.tmp.path().join("social/pages/stats.png"))
        );
        assert_eq!(
            encoder.recorded()[0].texts,
            vec![fx.config.site_title.clone(), "Statistics".to_string()]
        );
    }

    #[test]
    fn existing_output_is_skipped_without_force() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let target = fx.tmp.path().join("social/pages/stats.png");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"existing").unwrap();

        let outcome = fx
            .generator(&encoder, false)
            .render_page(&page("stats", "Statistics", None))
            .unwrap();
        assert_eq!(outcome, Outcome::Skipped(target.clone()));
        assert!(encoder.recorded().is_empty());
        assert_eq!(fs::read(&target).unwrap(), b"existing");
    }

    #[test]
    fn force_overwrites_existing_output() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let target = fx.tmp.path().join("social/pages/stats.png");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"existing").unwrap();

        let outcome = fx
            .generator(&encoder, true)
            .render_page(&page("stats", "Statistics", None))
            .unwrap();
        assert_eq!(outcome, Outcome::Rendered(target.clone()));
        assert_eq!(fs::read(&target).unwrap(), b"mock-png");
    }

    #[test]
    fn invalid_date_fails_before_rendering() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let err = fx
            .generator(&encoder, false)
            .render_word(&word("serendipity", "2024-01-16"))
            .unwrap_err();

        assert!(encoder.recorded().is_empty());
        match err {
            SocialError::Artifact { label, source } => {
                assert_eq!(label, "word 'serendipity' (2024-01-16)");
                assert!(matches!(*source, SocialError::Naming(NamingError::InvalidDate(_))));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn encode_failure_carries_label_and_writes_nothing() {
        let fx = Fixture::new();
        let encoder = MockEncoder::failing_on(&["broken"]);
        let err = fx
            .generator(&encoder, false)
            .render_word(&word("broken", "20240116"))
            .unwrap_err();

        assert!(err.to_string().starts_with("word 'broken' (20240116): "));
        assert!(!fx.tmp.path().join("social/2024/20240116-broken.png").exists());
    }

    #[test]
    fn headline_casing() {
        assert_eq!(headline_text("Japan", false), "japan");
        assert_eq!(headline_text("Japan", true), "Japan");
        assert_eq!(headline_text("", false), "");
    }

    // =========================================================================
    // Bulk runs
    // =========================================================================

    #[test]
    fn bulk_run_continues_past_failures() {
        let fx = Fixture::new();
        let encoder = MockEncoder::failing_on(&["broken"]);
        let entries = vec![
            word("serendipity", "20240116"),
            word("broken", "20240117"),
            word("halcyon", "20240118"),
            word("nodate", "nope"),
        ];

        let stats = fx.generator(&encoder, false).generate_words(&entries, None);
        assert_eq!(
            stats,
            BatchStats {
                rendered: 2,
                skipped: 0,
                failed: 2
            }
        );
        assert!(fx.tmp.path().join("social/2024/20240118-halcyon.png").exists());
    }

    #[test]
    fn bulk_run_emits_one_event_per_artifact() {
        let fx = Fixture::new();
        let encoder = MockEncoder::failing_on(&["Broken"]);
        let pages = vec![
            page("stats", "Statistics", None),
            page("words/browse", "Broken", Some("Every word")),
        ];
        let (tx, rx) = mpsc::channel();

        let stats = fx.generator(&encoder, false).generate_pages(&pages, Some(&tx));
        drop(tx);
        let events: Vec<SocialEvent> = rx.into_iter().collect();

        assert_eq!(stats.total(), 2);
        assert_eq!(events.len(), 2);
        assert!(events.contains(&SocialEvent::Rendered {
            label: "page 'stats'".into(),
            path: fx.tmp.path().join("social/pages/stats.png"),
        }));
        assert!(events.iter().any(|e| matches!(
            e,
            SocialEvent::Failed { label, .. } if label == "page 'words/browse'"
        )));
    }

    #[test]
    fn pages_sharing_an_output_file_both_render() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let pages = vec![
            page("words/browse", "Browse", None),
            page("words-browse", "Browse Again", None),
        ];

        let stats = fx.generator(&encoder, true).generate_pages(&pages, None);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.rendered, 2);

        let dir = fx.tmp.path().join("social/pages");
        let names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["words-browse.png".to_string()]);
    }

    #[test]
    fn second_bulk_run_skips_everything() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let entries = vec![word("serendipity", "20240116"), word("halcyon", "20240118")];
        let generator = fx.generator(&encoder, false);

        assert_eq!(generator.generate_words(&entries, None).rendered, 2);
        let again = generator.generate_words(&entries, None);
        assert_eq!(again.skipped, 2);
        assert_eq!(again.rendered, 0);
    }

    #[test]
    fn demo_layout_isolates_word_output() {
        let fx = Fixture::new();
        let encoder = MockEncoder::new();
        let layout = fx.layout.clone().with_demo(true);
        let generator = SocialGenerator {
            layout: &layout,
            ..fx.generator(&encoder, false)
        };
        generator.render_word(&word("serendipity", "20240116")).unwrap();

        assert!(fx
            .tmp
            .path()
            .join("social/demo/2024/20240116-serendipity.png")
            .exists());
        assert!(!fx.tmp.path().join("social/2024").exists());
    }

    // =========================================================================
    // BatchStats
    // =========================================================================

    #[test]
    fn stats_display() {
        let stats = BatchStats {
            rendered: 3,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(stats.to_string(), "3 rendered, 1 skipped, 0 failed (4 total)");
        assert!(!stats.has_failures());
    }

    #[test]
    fn stats_merge() {
        let a = BatchStats {
            rendered: 1,
            skipped: 2,
            failed: 3,
        };
        assert_eq!(
            a.merge(a),
            BatchStats {
                rendered: 2,
                skipped: 4,
                failed: 6
            }
        );
    }
}
