use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Sender};
use wotd_social::config::{self, CONFIG_FILENAME};
use wotd_social::imaging::{RustBackend, TypefaceSet};
use wotd_social::naming::{ArtifactKind, OutputLayout};
use wotd_social::social::{BatchStats, Outcome, SocialError, SocialEvent, SocialGenerator};
use wotd_social::types::{PageEntry, WordEntry};
use wotd_social::{output, words};

/// Shared flag for commands that write images.
#[derive(clap::Args, Clone, Copy)]
struct ForceArgs {
    /// Re-render even if the output file already exists
    #[arg(long)]
    force: bool,
}

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "wotd-social")]
#[command(about = "Social preview image generator for a word-of-the-day site")]
#[command(long_about = "\
Social preview image generator for a word-of-the-day site

Renders 1200x630 PNG cards: site title, date or subtitle, and the headline
in a brand-color gradient, shrunk to fit when long.

Output layout:

  <output>/
  ├── 2024/
  │   └── 20240116-serendipity.png   # word card (file name always lowercase)
  ├── demo/2024/...                  # word cards rendered with --demo
  └── pages/
      ├── stats.png                  # [[pages]] path = \"stats\"
      └── words-browse.png           # [[pages]] path = \"words/browse\"

Existing files are skipped; pass --force to re-render.

Run 'wotd-social gen-config' to generate a documented social.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Social image root (overrides `output_dir` from the config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Write word images under <output>/demo/ (placeholder data runs)
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the card for one word
    Word {
        /// The word, as it should appear on the card
        word: String,
        /// Date featured, YYYYMMDD
        date: String,
        /// Keep the word's casing on the card (file name is still lowercase)
        #[arg(long)]
        preserve_case: bool,
        #[command(flatten)]
        force: ForceArgs,
    },
    /// Render cards for every word file in a dataset directory
    Words {
        /// Directory of word JSON files
        #[arg(long, default_value = "data/words")]
        source: PathBuf,
        #[command(flatten)]
        force: ForceArgs,
    },
    /// Render the card for one page
    Page {
        /// Site path, e.g. "stats" or "words/browse"
        path: String,
        /// Headline
        #[arg(long)]
        title: String,
        /// Line under the site title
        #[arg(long)]
        subtitle: Option<String>,
        #[command(flatten)]
        force: ForceArgs,
    },
    /// Render cards for every [[pages]] entry in the config
    Pages {
        #[command(flatten)]
        force: ForceArgs,
    },
    /// Print a stock social.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let site_config = config::load_config(&cli.config)?;
    let render_config = site_config.render_config()?;
    // Fatal: no card can be drawn without both faces.
    let typefaces = TypefaceSet::load(&site_config.fonts)?;
    let encoder = RustBackend::new(site_config.palette_size(), site_config.quality());
    let layout = OutputLayout::new(
        cli.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&site_config.output_dir)),
    )
    .with_demo(cli.demo);

    let generator = |force: ForceArgs| SocialGenerator {
        encoder: &encoder,
        typefaces: &typefaces,
        config: &render_config,
        layout: &layout,
        force: force.force,
    };

    let code = match cli.command {
        Command::Word {
            word,
            date,
            preserve_case,
            force,
        } => {
            let entry = WordEntry {
                word,
                date,
                preserve_case,
            };
            let label = ArtifactKind::Word {
                word: entry.word.clone(),
                date: entry.date.clone(),
            }
            .label();
            single_result(&label, generator(force).render_word(&entry))
        }
        Command::Words { source, force } => {
            let entries = words::load_entries(&source)?;
            println!("==> Rendering {} word cards from {}", entries.len(), source.display());
            init_thread_pool(&site_config.processing);
            let stats = run_batch(|tx| generator(force).generate_words(&entries, Some(tx)))?;
            batch_result("words", &stats)
        }
        Command::Page {
            path,
            title,
            subtitle,
            force,
        } => {
            let page = PageEntry {
                path,
                title,
                subtitle,
            };
            let label = ArtifactKind::Page {
                path: page.path.clone(),
            }
            .label();
            single_result(&label, generator(force).render_page(&page))
        }
        Command::Pages { force } => {
            println!("==> Rendering {} page cards", site_config.pages.len());
            init_thread_pool(&site_config.processing);
            let pages = &site_config.pages;
            let stats = run_batch(|tx| generator(force).generate_pages(pages, Some(tx)))?;
            batch_result("pages", &stats)
        }
        Command::GenConfig => ExitCode::SUCCESS,
    };

    Ok(code)
}

fn single_result(label: &str, result: Result<Outcome, SocialError>) -> ExitCode {
    match result {
        Ok(outcome) => {
            println!("{}", output::format_outcome(label, &outcome));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn batch_result(kind: &str, stats: &BatchStats) -> ExitCode {
    output::print_batch_summary(kind, stats);
    if stats.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Run a bulk job with a printer thread draining its events.
fn run_batch(
    job: impl FnOnce(&Sender<SocialEvent>) -> BatchStats,
) -> Result<BatchStats, Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_social_event(&event);
        }
    });
    let stats = job(&tx);
    drop(tx);
    printer.join().map_err(|_| "output thread panicked")?;
    Ok(stats)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
