//! CLI output formatting for social image runs.
//!
//! # Output Format
//!
//! ```text
//! word 'serendipity' (20240116) → public/images/social/2024/20240116-serendipity.png
//! page 'stats' → public/images/social/pages/stats.png (exists, skipped)
//! word 'broken' (20240117) FAILED: Render error: Encode error: Invalid glyph geometry in 'broken'
//!
//! 1 rendered, 1 skipped, 1 failed (3 total)
//! ```
//!
//! # Architecture
//!
//! Format functions are pure (no I/O) and return the lines to print; the
//! `print_*` wrappers write them out. Failures go to stderr, everything else
//! to stdout.

use crate::social::{BatchStats, Outcome, SocialEvent};

/// Format one progress event as a single line.
pub fn format_social_event(event: &SocialEvent) -> String {
    match event {
        SocialEvent::Rendered { label, path } => format!("{} → {}", label, path.display()),
        SocialEvent::Skipped { label, path } => {
            format!("{} → {} (exists, skipped)", label, path.display())
        }
        SocialEvent::Failed { label, error } => format!("{} FAILED: {}", label, error),
    }
}

/// Format the result of a single-artifact command.
pub fn format_outcome(label: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Rendered(path) => format!("{} → {}", label, path.display()),
        Outcome::Skipped(path) => format!(
            "{} → {} (exists, skipped; use --force to re-render)",
            label,
            path.display()
        ),
    }
}

/// Format the closing summary of a bulk run.
pub fn format_batch_summary(kind: &str, stats: &BatchStats) -> Vec<String> {
    if stats.total() == 0 {
        return vec![format!("No {} to render", kind)];
    }
    vec![String::new(), format!("{}: {}", capitalize(kind), stats)]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Print one event, routing failures to stderr.
pub fn print_social_event(event: &SocialEvent) {
    let line = format_social_event(event);
    match event {
        SocialEvent::Failed { .. } => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

pub fn print_batch_summary(kind: &str, stats: &BatchStats) {
    for line in format_batch_summary(kind, stats) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn rendered_event_line() {
        let event = SocialEvent::Rendered {
            label: "word 'serendipity' (20240116)".into(),
            path: PathBuf::from("social/2024/20240116-serendipity.png"),
        };
        assert_eq!(
            format_social_event(&event),
            "word 'serendipity' (20240116) → social/2024/20240116-serendipity.png"
        );
    }

    #[test]
    fn skipped_event_line() {
        let event = SocialEvent::Skipped {
            label: "page 'stats'".into(),
            path: PathBuf::from("social/pages/stats.png"),
        };
        assert_eq!(
            format_social_event(&event),
            "page 'stats' → social/pages/stats.png (exists, skipped)"
        );
    }

    #[test]
    fn failed_event_line() {
        let event = SocialEvent::Failed {
            label: "page 'stats'".into(),
            error: "IO error: permission denied".into(),
        };
        assert_eq!(
            format_social_event(&event),
            "page 'stats' FAILED: IO error: permission denied"
        );
    }

    #[test]
    fn skipped_outcome_mentions_force() {
        let line = format_outcome("page 'stats'", &Outcome::Skipped(PathBuf::from("x.png")));
        assert!(line.contains("--force"));
    }

    #[test]
    fn summary_lines() {
        let stats = BatchStats {
            rendered: 3,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(
            format_batch_summary("words", &stats),
            vec![
                String::new(),
                "Words: 3 rendered, 1 skipped, 0 failed (4 total)".to_string()
            ]
        );
    }

    #[test]
    fn empty_summary() {
        assert_eq!(
            format_batch_summary("pages", &BatchStats::default()),
            vec!["No pages to render".to_string()]
        );
    }
}
