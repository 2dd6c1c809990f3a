//! Slide Weaver CLI
//!
//! Usage:
//!   slide-weaver [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>         Options file (TOML format)
//!   -t, --templates <DIR>       Directory templates and embeds are resolved against
//!   --separator <PATTERN>       Slide group separator pattern
//!   --vertical-separator <PAT>  Vertical slide separator pattern
//!   --default-template <NAME>   Template for slides without a directive
//!   --log                       Log every stage that changed the document
//!   -h, --help                  Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use slide_weaver::{process, DirectoryLoader, Options};

#[derive(Parser)]
#[command(name = "slide-weaver")]
#[command(about = "Expand slide templates in annotated markdown")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Options file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory templates and embeds are resolved against
    /// (defaults to the input file's directory)
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Slide group separator pattern
    #[arg(long)]
    separator: Option<String>,

    /// Vertical slide separator pattern
    #[arg(long)]
    vertical_separator: Option<String>,

    /// Template applied to slides without their own directive
    #[arg(long)]
    default_template: Option<String>,

    /// Log every stage that changed the document
    #[arg(long)]
    log: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log);

    // Load options
    let mut options = match &cli.config {
        Some(path) => match Options::from_file(path) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error loading options '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };
    if let Some(pattern) = cli.separator {
        options = options.with_separator(pattern);
    }
    if let Some(pattern) = cli.vertical_separator {
        options = options.with_vertical_separator(pattern);
    }
    if let Some(name) = cli.default_template {
        options = options.with_default_template(name);
    }
    if cli.log {
        options = options.with_log(true);
    }

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let base = cli
        .templates
        .clone()
        .or_else(|| cli.input.as_deref().and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let filename = cli
        .input
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    match process(&source, DirectoryLoader::with_base_path(base), &mut options) {
        Ok(processed) => {
            for diagnostic in &processed.diagnostics {
                eprintln!("{}", diagnostic.format(&filename));
            }
            print!("{}", processed.markdown);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--log`
fn init_tracing(log: bool) {
    let default_level = if log { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
