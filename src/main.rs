//! manuscript: outline and word counts for long-form writing.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use manuscript::edit_script::EditScript;
use manuscript::report::{self, DocumentReport};
use manuscript::structure::DocumentStructure;
use manuscript::{config, input};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "manuscript")]
#[command(about = "Outline and word counts for manuscripts", long_about = None)]
struct Args {
    /// Files or directories to read
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Replay a JSON edit script against each document before reporting
    #[arg(long, value_name = "FILE")]
    edits: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Words that fill one page
    #[arg(long, value_name = "N")]
    words_per_page: Option<usize>,

    /// Log more (repeat for trace output)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::builder()
        .filter_module("manuscript", level)
        .parse_default_env()
        .try_init();

    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }
    if let Some(words_per_page) = args.words_per_page {
        cfg.words_per_page = words_per_page;
    }

    let documents = input::find_documents(args.paths, &cfg.file_extensions)?;

    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    let script = args
        .edits
        .as_deref()
        .map(EditScript::from_file)
        .transpose()
        .map_err(io::Error::other)?;

    let mut reports = Vec::new();
    for path in &documents {
        let mut doc = match input::load_document(path, &cfg) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("Skipping {}: {e}", path.display());
                continue;
            }
        };
        let mut structure = DocumentStructure::with_document(&cfg, &doc);
        if let Some(script) = &script {
            script
                .apply(&mut doc, &mut structure)
                .map_err(io::Error::other)?;
        }
        structure.wait_idle();
        reports.push(DocumentReport::new(
            path.display().to_string(),
            &doc,
            &structure,
        ));
    }

    if args.json {
        let json = report::to_json(&reports).map_err(io::Error::other)?;
        println!("{json}");
    } else {
        for report in &reports {
            print!("{}", report.render_outline());
        }
    }

    Ok(())
}
