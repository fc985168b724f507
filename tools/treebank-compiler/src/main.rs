mod source;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use treebank_graph::validate_tree;
use treebank_protocol::CorpusSnapshot;
use treebank_store::{LoadOptions, LoadReport, TreebankStore};

use crate::source::DirectorySource;

#[derive(Parser)]
#[command(author, version, about = "Normalizes, inspects and compiles CoNLL-U treebanks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrites the input as canonical CoNLL-U
    Normalize {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Prints sentence and token counts plus tree problems
    Stats {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        json: bool,
    },
    /// Compiles the input to an rkyv snapshot
    Compile {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Turns an rkyv snapshot back into CoNLL-U
    Decompile {
        #[arg(value_name = "FILE")]
        snapshot: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Dumps the parsed model as JSON
    Export {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// CoNLL-U files, loaded in the order given
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Corpus name; also the sub-directory read under --root
    #[arg(long, default_value = "corpus")]
    name: String,

    /// Directory holding one sub-directory of *.conllu files per corpus
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Release the corpus is tagged with
    #[arg(long)]
    release: Option<String>,

    /// Parse blocks on the calling thread only
    #[arg(long)]
    sequential: bool,
}

#[derive(Serialize)]
struct Stats<'a> {
    name: &'a str,
    version: Option<&'a str>,
    sentences: usize,
    words: usize,
    multiword_spans: usize,
    tree_errors: Vec<TreeReport>,
}

#[derive(Serialize)]
struct TreeReport {
    sent_id: Option<String>,
    errors: Vec<String>,
}

fn report_load(origin: &str, report: &LoadReport) {
    if report.skipped() > 0 || !report.diagnostics.is_empty() {
        warn!(
            origin,
            skipped = report.skipped(),
            diagnostics = report.diagnostics.len(),
            "input had problems"
        );
    }
    info!(origin, sentences = report.loaded, "loaded");
}

fn load_store(input: &InputArgs) -> anyhow::Result<TreebankStore> {
    if input.files.is_empty() && input.root.is_none() {
        bail!("nothing to load: pass CoNLL-U files or --root");
    }

    let options = if input.sequential {
        LoadOptions::sequential()
    } else {
        LoadOptions::default()
    };
    let mut store = TreebankStore::new(&input.name);

    if let Some(root) = &input.root {
        let report = store.load_source(&DirectorySource::new(root), input.release.as_deref(), &options)?;
        report_load(&root.display().to_string(), &report);
    } else if let Some(release) = &input.release {
        store = store.with_version(release);
    }

    for path in &input.files {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let report = store.load_with(&raw, &options);
        report_load(&path.display().to_string(), &report);
    }
    Ok(store)
}

fn write_output(output: Option<&Path>, content: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = content.len(), "written");
        }
        None => io::stdout().lock().write_all(content)?,
    }
    Ok(())
}

fn stats(store: &TreebankStore) -> Stats<'_> {
    let mut words = 0;
    let mut multiword_spans = 0;
    let mut tree_errors = Vec::new();

    for sentence in store {
        for token in sentence.tokens() {
            if token.is_multiword() {
                multiword_spans += 1;
            } else {
                words += 1;
            }
        }

        let errors = validate_tree(sentence);
        if !errors.is_empty() {
            tree_errors.push(TreeReport {
                sent_id: sentence.sent_id.clone(),
                errors: errors.iter().map(ToString::to_string).collect(),
            });
        }
    }

    Stats {
        name: store.name(),
        version: store.version(),
        sentences: store.len(),
        words,
        multiword_spans,
        tree_errors,
    }
}

fn print_stats(stats: &Stats<'_>) {
    println!("corpus:          {}", stats.name);
    if let Some(version) = stats.version {
        println!("release:         {version}");
    }
    println!("sentences:       {}", stats.sentences);
    println!("words:           {}", stats.words);
    println!("multiword spans: {}", stats.multiword_spans);
    println!("invalid trees:   {}", stats.tree_errors.len());
    for report in &stats.tree_errors {
        let sent_id = report.sent_id.as_deref().unwrap_or("(no sent_id)");
        for error in &report.errors {
            println!("  {sent_id}: {error}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Normalize { input, output } => {
            let store = load_store(&input)?;
            write_output(output.as_deref(), store.save().as_bytes())?;
        }
        Command::Stats { input, json } => {
            let store = load_store(&input)?;
            let summary = stats(&store);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_stats(&summary);
            }
        }
        Command::Compile { input, output } => {
            let store = load_store(&input)?;
            info!(sentences = store.len(), "compiling snapshot");
            let bytes = store.snapshot().to_bytes()?;
            write_output(Some(output.as_path()), &bytes)?;
        }
        Command::Decompile { snapshot, output } => {
            let bytes = fs::read(&snapshot).with_context(|| format!("reading {}", snapshot.display()))?;
            let store = TreebankStore::from_snapshot(CorpusSnapshot::from_bytes(&bytes)?)?;
            write_output(output.as_deref(), store.save().as_bytes())?;
        }
        Command::Export { input, output } => {
            let store = load_store(&input)?;
            let json = serde_json::to_string_pretty(&store.snapshot())?;
            write_output(output.as_deref(), json.as_bytes())?;
        }
    }

    Ok(())
}
