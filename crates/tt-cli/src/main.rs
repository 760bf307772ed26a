mod app;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use tt_core::{Label, Session, Stats, TermStore};
use tt_store::{Store, bridge};

use crate::app::{App, AppOptions};

#[derive(Parser)]
#[command(name = "tt", about = "Interactive triage of corpus term lists")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a vocabulary term list into a triage database
    Import {
        /// Term list produced by the extraction stage, TSV unless --json
        file: PathBuf,

        /// Triage database path
        #[arg(long, default_value = "terms.db")]
        db: PathBuf,

        /// Read JSON instead of TSV
        #[arg(long)]
        json: bool,
    },

    /// Run an interactive classification session
    Triage {
        /// Triage database path
        #[arg(long, default_value = "terms.db")]
        db: PathBuf,

        /// Review terms already classified with this label
        #[arg(long, short = 'l', value_name = "LABEL")]
        label: Option<String>,

        /// Do not write any results
        #[arg(long)]
        dry_run: bool,

        /// Save only at the end of the session
        #[arg(long)]
        no_auto_save: bool,
    },

    /// Show classification statistics
    Stats {
        /// Triage database path
        #[arg(long, default_value = "terms.db")]
        db: PathBuf,

        /// Emit JSON instead of the text panel
        #[arg(long)]
        json: bool,
    },

    /// Export the vocabulary for downstream stages
    Export {
        /// Output file, or '-' for stdout
        out: PathBuf,

        /// Triage database path
        #[arg(long, default_value = "terms.db")]
        db: PathBuf,

        /// Write JSON instead of TSV
        #[arg(long)]
        json: bool,

        /// Export only terms carrying this label
        #[arg(long, short = 'l', value_name = "LABEL")]
        label: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Import { file, db, json } => cmd_import(file, db, *json),
        Commands::Triage {
            db,
            label,
            dry_run,
            no_auto_save,
        } => cmd_triage(db, label.as_deref(), *dry_run, *no_auto_save),
        Commands::Stats { db, json } => cmd_stats(db, *json),
        Commands::Export {
            out,
            db,
            json,
            label,
        } => cmd_export(out, db, *json, label.as_deref()),
    }
}

/// Resolve a user-supplied label name; the empty/`None` marker is not a
/// valid choice anywhere on the command line.
fn parse_label(name: &str) -> Result<Label> {
    match Label::from_name(name) {
        Some(label) if label != Label::None => Ok(label),
        _ => bail!("'{name}' is not a valid label"),
    }
}

fn load_term_store(store: &Store) -> Result<TermStore> {
    let records = store.load_terms().context("failed to load terms")?;
    TermStore::load(&records).context("rejected stored terms")
}

fn cmd_import(file: &Path, db: &Path, json: bool) -> Result<()> {
    let records = if json {
        bridge::read_json_file(file)
    } else {
        bridge::read_tsv_file(file)
    }
    .with_context(|| format!("failed to read {}", file.display()))?;

    // validate every row before anything is written
    let terms =
        TermStore::load(&records).with_context(|| format!("rejected input {}", file.display()))?;

    let store = Store::open(db).context("failed to open database")?;
    store.save_terms(&records).context("failed to save terms")?;

    println!("imported {} terms into {}", terms.len(), db.display());
    Ok(())
}

fn cmd_triage(db: &Path, label: Option<&str>, dry_run: bool, no_auto_save: bool) -> Result<()> {
    let review = match label {
        Some(name) => parse_label(name)?,
        None => Label::None,
    };

    let store = Store::open(db).context("failed to open database")?;
    let mut terms = load_term_store(&store)?;
    if terms.is_empty() {
        bail!("no terms in {} — run `tt import` first", db.display());
    }

    // Review bookkeeping: switching the review target (or dropping back to a
    // normal session) discards the previous pass's group/undo history.
    let last_review = store.last_review().context("failed to read metadata")?;
    if review != Label::None {
        if last_review.as_deref() != Some(review.name()) {
            terms.reset_history();
        }
    } else if last_review.is_some() {
        store
            .clear_last_review()
            .context("failed to clear review metadata")?;
        terms.reset_history();
    }

    let session = Session::new(terms, review);
    tracing::info!(
        total = session.store().len(),
        classified = session.store().count_classified(),
        review = review.name(),
        "session started"
    );

    let mut app = App::new(
        session,
        store,
        AppOptions {
            dry_run,
            auto_save: !no_auto_save,
        },
    );
    ui::run(&mut app).context("terminal session failed")?;

    // Nothing is discarded before a successful write: a failure here exits
    // non-zero with the classifications still in the database from the last
    // auto-save (if any).
    if !dry_run {
        app.save().context("failed to write classifications")?;
    }
    if review != Label::None && !dry_run {
        app.store_handle()
            .set_last_review(review.name())
            .context("failed to record review label")?;
    }

    tracing::info!(
        classified = app.session().store().count_classified(),
        "session ended"
    );
    Ok(())
}

fn cmd_stats(db: &Path, json: bool) -> Result<()> {
    let store = Store::open(db).context("failed to open database")?;
    let terms = load_term_store(&store)?;
    let stats = Stats::collect(&terms, 0);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in stats.lines() {
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_export(out: &Path, db: &Path, json: bool, label: Option<&str>) -> Result<()> {
    let store = Store::open(db).context("failed to open database")?;
    let terms = load_term_store(&store)?;

    let records = match label {
        Some(name) => {
            let label = parse_label(name)?;
            terms
                .terms_with_label(label)
                .into_iter()
                .map(|t| t.to_record())
                .collect()
        }
        None => terms.records(),
    };

    if out.as_os_str() == "-" {
        let content = if json {
            bridge::to_json(&records).context("failed to encode terms")?
        } else {
            bridge::to_tsv(&records)
        };
        print!("{content}");
        return Ok(());
    }

    if json {
        bridge::write_json_file(out, &records)
    } else {
        bridge::write_tsv_file(out, &records)
    }
    .with_context(|| format!("failed to write {}", out.display()))?;

    println!("exported {} terms to {}", records.len(), out.display());
    Ok(())
}
