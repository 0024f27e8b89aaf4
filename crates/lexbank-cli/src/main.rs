use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod output;

use output::ColorMode;

use lexbank_core::{CorpusStore, NewRegulation, record_name_from_path};
use lexbank_ingest::extract_document;

/// Legislation Text Bank - extract legislation PDFs into a searchable local corpus
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a document's text and print it
    Extract {
        /// Path to the PDF or plain-text file
        file_path: PathBuf,

        /// Write the text to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Extract a document and store it in the corpus
    Add {
        /// Path to the PDF or plain-text file
        file_path: PathBuf,

        /// Record name (defaults to the cleaned-up file name)
        #[arg(long)]
        name: Option<String>,

        /// Path to the corpus database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Import every supported document in a directory
    Import {
        /// Directory containing PDF or plain-text files
        dir: PathBuf,

        /// Path to the corpus database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List stored records
    List {
        /// Path to the corpus database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Emit JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print a stored record's body
    Show {
        /// Record name, as shown by `lexbank list`
        name: String,

        /// Path to the corpus database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Write the body to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove a stored record
    Remove {
        /// Record name, as shown by `lexbank list`
        name: String,

        /// Path to the corpus database
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Export every record as JSON
    Export {
        /// Path to the corpus database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Write the JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            file_path,
            output,
            no_color,
        } => extract(file_path, output, no_color),
        Command::Add {
            file_path,
            name,
            db,
            no_color,
        } => add(file_path, name, db, no_color),
        Command::Import { dir, db, no_color } => import(dir, db, no_color),
        Command::List { db, json, no_color } => list(db, json, no_color),
        Command::Show { name, db, output } => show(name, db, output),
        Command::Remove { name, db } => remove(name, db),
        Command::Export { db, output } => export(db, output),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the corpus database path: CLI flag > LEXBANK_DB env > data dir.
fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("LEXBANK_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lexbank")
                .join("corpus.db")
        })
}

fn open_store(db: Option<PathBuf>) -> anyhow::Result<CorpusStore> {
    Ok(CorpusStore::open(&resolve_db_path(db))?)
}

fn make_writer(output: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    })
}

fn extract(file_path: PathBuf, output: Option<PathBuf>, no_color: bool) -> anyhow::Result<()> {
    let use_color = !no_color && output.is_none();

    let extracted = extract_document(&file_path)?;
    let mut writer = make_writer(output.as_ref())?;
    writer.write_all(extracted.text.as_bytes())?;
    writer.flush()?;

    output::print_extraction_summary(
        &mut std::io::stderr(),
        &file_path,
        &extracted,
        ColorMode(use_color),
    )?;
    Ok(())
}

fn add(
    file_path: PathBuf,
    name: Option<String>,
    db: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    let name = name.unwrap_or_else(|| record_name_from_path(&file_path));
    anyhow::ensure!(
        !name.is_empty(),
        "cannot derive a record name from {}; pass one with --name",
        file_path.display()
    );

    let extracted = extract_document(&file_path)?;
    let page_count = extracted.page_count;

    let store = open_store(db)?;
    let outcome = store.insert(&NewRegulation {
        name: name.clone(),
        body: extracted.text,
        page_count,
        source_path: Some(file_path.display().to_string()),
    })?;

    output::print_add_result(
        &mut std::io::stdout(),
        &name,
        page_count,
        outcome,
        ColorMode(!no_color),
    )?;
    Ok(())
}

fn import(dir: PathBuf, db: Option<PathBuf>, no_color: bool) -> anyhow::Result<()> {
    let documents = lexbank_ingest::collect_documents(&dir)?;
    anyhow::ensure!(
        !documents.is_empty(),
        "no PDF or plain-text documents found in {}",
        dir.display()
    );

    let store = open_store(db)?;
    let bar = indicatif::ProgressBar::new(documents.len() as u64);

    let mut imported = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();
    for path in &documents {
        match extract_document(path) {
            Ok(extracted) => {
                let name = record_name_from_path(path);
                store.insert(&NewRegulation {
                    name,
                    page_count: extracted.page_count,
                    body: extracted.text,
                    source_path: Some(path.display().to_string()),
                })?;
                imported += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping document");
                failed.push((path.clone(), e.to_string()));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    output::print_import_summary(
        &mut std::io::stdout(),
        imported,
        &failed,
        ColorMode(!no_color),
    )?;
    Ok(())
}

fn list(db: Option<PathBuf>, json: bool, no_color: bool) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let summaries = store.list()?;

    if json {
        serde_json::to_writer_pretty(std::io::stdout(), &summaries)?;
        println!();
    } else {
        output::print_record_list(&mut std::io::stdout(), &summaries, ColorMode(!no_color))?;
    }
    Ok(())
}

fn show(name: String, db: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let record = store
        .get(&name)?
        .ok_or_else(|| anyhow::anyhow!("no record named \"{name}\"; see `lexbank list`"))?;

    let mut writer = make_writer(output.as_ref())?;
    writer.write_all(record.body.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn remove(name: String, db: Option<PathBuf>) -> anyhow::Result<()> {
    let store = open_store(db)?;
    anyhow::ensure!(
        store.remove(&name)?,
        "no record named \"{name}\"; see `lexbank list`"
    );
    println!("Removed \"{name}\"");
    Ok(())
}

fn export(db: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let records = store.all()?;

    let mut writer = make_writer(output.as_ref())?;
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
