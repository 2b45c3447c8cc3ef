mod captions;

use anyhow::Context;
use clap::{Parser, Subcommand};
use poem_core::constants::{
    DB_PATH_ENV, DEFAULT_AUTHOR, DEFAULT_DISTINCT_ATTEMPTS, DEFAULT_TITLE, DICTIONARY_PATH_ENV,
};
use poem_core::pattern::parse_syllable_counts;
use poem_core::{
    compose_distinct, ingestion_report, CoreConfig, LabelConstraint, LineRepository,
    PatternSpec, PoemComposer, PoemError, PronouncingDictionary, SharedDictionary,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "poem")]
#[command(about = "Compose rhyming poems out of found text")]
struct Cli {
    /// SQLite database (defaults to $POEM_DB_PATH, then poems.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Pronunciation dictionary, CMUdict text or JSON (defaults to
    /// $POEM_DICTIONARY_PATH, then cmudict.dict)
    #[arg(long, global = true)]
    dictionary: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete every stored line
    Reset,
    /// Analyse and store the fragments found in caption or text files
    Ingest {
        /// Files to read; fragments are separated by blank lines
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Reset the store before ingesting
        #[arg(long)]
        fresh: bool,
        /// Print every fragment that failed to parse with its reason
        #[arg(long)]
        show_failures: bool,
    },
    /// Compose a poem following a rhyme scheme such as AABBA
    Compose {
        /// Rhyme scheme; lines sharing a label rhyme
        pattern: String,
        /// Syllable constraint per label, e.g. A=7,8 or B=5-7 (repeatable)
        #[arg(short, long = "syllables", required = true)]
        syllables: Vec<LabelConstraint>,
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,
        #[arg(long, default_value = DEFAULT_AUTHOR)]
        author: String,
        /// Attempts made to avoid lines ending in the same word
        #[arg(long, default_value_t = DEFAULT_DISTINCT_ATTEMPTS)]
        attempts: usize,
        /// Seed for reproducible poems
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List rhyme groups and their sizes for some syllable counts
    Groups {
        /// Syllable counts, e.g. 7,8 or 5-7
        #[arg(long, value_parser = parse_counts)]
        syllables: BTreeSet<u32>,
        /// Only show groups with at least this many lines
        #[arg(long, default_value_t = 1)]
        min: usize,
        /// Print the groups as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_counts(s: &str) -> Result<BTreeSet<u32>, PoemError> {
    parse_syllable_counts(s)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("poem=info".parse()?)
                .add_directive("poem_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = CoreConfig::from_overrides(
        cli.db
            .or_else(|| std::env::var_os(DB_PATH_ENV).map(PathBuf::from)),
        cli.dictionary
            .or_else(|| std::env::var_os(DICTIONARY_PATH_ENV).map(PathBuf::from)),
    )?;

    match cli.command {
        Some(Commands::Reset) => {
            open_repository(&cfg, no_dictionary(), true)?;
            println!("Reset {}", cfg.db_path().display());
        }
        Some(Commands::Ingest {
            files,
            fresh,
            show_failures,
        }) => {
            let mut fragments = Vec::new();
            for file in &files {
                let found = captions::read_fragments(file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                tracing::info!("{} fragments in {}", found.len(), file.display());
                fragments.extend(found);
            }

            let mut repository = open_repository(&cfg, load_dictionary(&cfg)?, fresh)?;
            let failed = repository.insert_many(&fragments)?;

            if show_failures {
                for line in &failed {
                    println!("{:?}: {}", line.content(), line.diagnostic());
                }
            }
            println!("{}", ingestion_report(failed.len(), fragments.len()));
        }
        Some(Commands::Compose {
            pattern,
            syllables,
            title,
            author,
            attempts,
            seed,
        }) => {
            let spec = syllables
                .into_iter()
                .fold(PatternSpec::new(pattern), PatternSpec::with_constraint);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let repository = open_repository(&cfg, load_dictionary(&cfg)?, false)?;
            let composer = PoemComposer::new(&repository);
            let poem = compose_distinct(&composer, &spec, &title, &author, attempts, &mut rng)?;
            println!("{poem}");
        }
        Some(Commands::Groups {
            syllables,
            min,
            json,
        }) => {
            let repository = open_repository(&cfg, no_dictionary(), false)?;
            let groups = repository.rhyme_groups(&syllables)?;
            let shown: Vec<_> = groups.iter().filter(|g| g.line_count >= min).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else if shown.is_empty() {
                println!("No rhyme groups found.");
            } else {
                for group in shown {
                    println!("{:>6}  {}", group.line_count, group.rhyme_key);
                }
            }
        }
        None => {
            println!("Use 'poem --help' for commands");
        }
    }

    Ok(())
}

fn load_dictionary(cfg: &CoreConfig) -> anyhow::Result<SharedDictionary> {
    let dictionary = PronouncingDictionary::load(cfg.dictionary_path()).with_context(|| {
        format!(
            "failed to load pronunciation dictionary {}",
            cfg.dictionary_path().display()
        )
    })?;
    Ok(Arc::new(dictionary))
}

/// Commands that never analyse text do not need the dictionary loaded.
fn no_dictionary() -> SharedDictionary {
    Arc::new(PronouncingDictionary::new())
}

fn open_repository(
    cfg: &CoreConfig,
    dictionary: SharedDictionary,
    fresh: bool,
) -> anyhow::Result<LineRepository> {
    LineRepository::open(cfg.db_path(), dictionary, fresh)
        .with_context(|| format!("failed to open database {}", cfg.db_path().display()))
}
