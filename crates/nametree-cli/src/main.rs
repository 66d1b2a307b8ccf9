use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use nametree::{DEFAULT_MAX_DEPTH, Dtab, NameTree, ParseOptions, Path, Resolution, SyntaxError};
use serde::Serialize;

#[derive(ClapParser)]
#[command(name = "nametree")]
#[command(about = "Read, simplify, evaluate and delegate name trees")]
struct Cli {
    /// Deepest parenthesis nesting accepted by the parser
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the simplified form of a tree
    Simplify {
        /// Tree in text form, e.g. "/s/a & /s/b | /s/backup"
        tree: String,
    },
    /// Print the destinations a tree resolves to
    Eval {
        tree: String,
        /// Tell a failure apart from "no route"
        #[arg(long)]
        verbose: bool,
    },
    /// Parse a tree and print it back in canonical form
    Show { tree: String },
    /// Delegate a path through a dtab
    Lookup {
        /// Dtab in text form, e.g. "/s => /srv/a; /s/x => /srv/b"
        #[arg(long)]
        dtab: String,
        path: String,
    },
    /// Check that a dtab file parses
    Check {
        /// Path to the dtab file
        file: PathBuf,
    },
}

#[derive(Serialize)]
struct Delegation<'a> {
    path: &'a Path,
    delegated: &'a NameTree<Path>,
    simplified: &'a NameTree<Path>,
    resolution: &'a Resolution<Path>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = ParseOptions::default().with_max_depth(cli.max_depth);
    log::debug!("parse options: {options:?}");

    match cli.command {
        Commands::Simplify { tree } => {
            let tree = read_tree(&tree, &options).simplified();
            emit(cli.format, &tree, || tree.show());
        }
        Commands::Eval { tree, verbose } => {
            let resolution = read_tree(&tree, &options).resolve();
            emit(cli.format, &resolution, || describe(&resolution, verbose));
        }
        Commands::Show { tree } => {
            let tree = read_tree(&tree, &options);
            emit(cli.format, &tree, || tree.show());
        }
        Commands::Lookup { dtab, path } => {
            let dtab = Dtab::read_with_options(&dtab, &options)
                .unwrap_or_else(|error| fail(&error, "dtab"));
            let path = Path::read(&path).unwrap_or_else(|error| fail(&error, "path"));
            let delegated = dtab.lookup(&path);
            let simplified = delegated.simplified();
            let resolution = delegated.resolve();
            let delegation = Delegation {
                path: &path,
                delegated: &delegated,
                simplified: &simplified,
                resolution: &resolution,
            };
            emit(cli.format, &delegation, || {
                format!(
                    "delegated:  {delegated}\nsimplified: {simplified}\nresolution: {}",
                    describe(&resolution, true)
                )
            });
        }
        Commands::Check { file } => {
            let text = match fs::read_to_string(&file) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Error reading file: {}", e);
                    std::process::exit(1);
                }
            };
            let name = file.display().to_string();
            let dtab = Dtab::read_with_options(&text, &options)
                .unwrap_or_else(|error| fail(&error, &name));
            eprintln!("Parse OK: {} dentries in {name}", dtab.len());
            emit(cli.format, &dtab, || dtab.to_string());
        }
    }
}

fn read_tree(text: &str, options: &ParseOptions) -> NameTree<Path> {
    nametree::read_with_options(text, options).unwrap_or_else(|error| fail(&error, "tree"))
}

fn fail(error: &SyntaxError, name: &str) -> ! {
    eprint!("{}", error.report(name));
    std::process::exit(1);
}

fn describe(resolution: &Resolution<Path>, verbose: bool) -> String {
    match resolution {
        Resolution::Leaf(destinations) => {
            let destinations: Vec<String> = destinations.iter().map(Path::to_string).collect();
            format!("{{{}}}", destinations.join(", "))
        }
        Resolution::Fail if verbose => "fail".to_string(),
        Resolution::Neg if verbose => "neg".to_string(),
        Resolution::Fail | Resolution::Neg => "no destination".to_string(),
    }
}

fn emit<V: Serialize>(format: Format, value: &V, text: impl FnOnce() -> String) {
    match format {
        Format::Text => println!("{}", text()),
        Format::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error encoding JSON: {}", e);
                std::process::exit(1);
            }
        },
    }
}
