use clap::{Parser, Subcommand};
use std::io::ErrorKind;
use tracing::debug;
use uni_parser::{Element, Forest, ParserConfig, DEFAULT_MAX_DEPTH};

#[derive(Parser)]
#[command(name = "uni")]
#[command(about = "Check and format Uni markup documents")]
#[command(version)]
struct Cli {
    /// Deepest element nesting accepted by the parser
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log parser activity to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a .uni file and report the first error
    Check {
        /// Input .uni file
        path: String,
    },

    /// Print a .uni file in canonical form
    Fmt {
        /// Input .uni file
        path: String,

        /// Rewrite the file in place instead of printing it
        #[arg(long, conflicts_with = "check")]
        write: bool,

        /// Exit with an error if the file is not already canonical
        #[arg(long)]
        check: bool,
    },

    /// Print the element outline of a .uni file
    Tree {
        /// Input .uni file
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ParserConfig::default().with_max_depth(cli.max_depth);

    match cli.command {
        Command::Check { path } => cmd_check(&path, config),
        Command::Fmt { path, write, check } => cmd_fmt(&path, config, write, check),
        Command::Tree { path } => cmd_tree(&path, config),
    }
}

/// Install a stderr subscriber when `RUST_LOG` is set or `--verbose` is given.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("uni_parser=debug,uni_lexer=debug")
    } else {
        return;
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn read_source(path: &str) -> String {
    load(path).unwrap_or_else(|message| {
        eprintln!("{message}");
        std::process::exit(1);
    })
}

fn load(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => format!("{path}: file not found"),
        _ => format!("{path}: cannot read: {e}"),
    })
}

fn parse_source(path: &str, source: &str, config: ParserConfig) -> Forest {
    match uni_parser::parse_with_config(source, config) {
        Ok(forest) => forest,
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &str, config: ParserConfig) {
    let source = read_source(path);
    let forest = parse_source(path, &source, config);
    debug!(path, elements = forest.len(), "checked");
    eprintln!("OK: {path}");
}

fn cmd_fmt(path: &str, config: ParserConfig, write: bool, check: bool) {
    let source = read_source(path);
    let forest = parse_source(path, &source, config);
    let formatted = uni_serializer::serialize(&forest);

    if check {
        if formatted != source {
            eprintln!("Not canonical: {path}");
            std::process::exit(1);
        }
        eprintln!("OK: {path}");
        return;
    }

    if write {
        if formatted == source {
            debug!(path, "already canonical");
            return;
        }
        if let Err(e) = std::fs::write(path, &formatted) {
            eprintln!("Error writing {path}: {e}");
            std::process::exit(1);
        }
        eprintln!("Formatted: {path}");
        return;
    }

    print!("{formatted}");
}

fn cmd_tree(path: &str, config: ParserConfig) {
    let source = read_source(path);
    let forest = parse_source(path, &source, config);
    let mut out = String::new();
    for element in &forest {
        outline(element, 0, &mut out);
    }
    print!("{out}");
}

/// One line per element: its first attribute name, attribute count and
/// child count.
fn outline(element: &Element, depth: usize, out: &mut String) {
    let label = element
        .attributes
        .first()
        .map_or("(empty)", |attribute| attribute.name.as_str());
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!(
        "{label} [{} attributes, {} children]\n",
        element.attributes.len(),
        element.children.len()
    ));
    for child in &element.children {
        outline(child, depth + 1, out);
    }
}
