use anyhow::{Context, Result};
use clap::Parser;
use dfasim::report::{render_snapshot, render_trace, result_line, to_json};
use dfasim::{Automaton, AutomatonLoader, SampleManager, TableConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Checks input strings against a deterministic finite automaton read from a table.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  dfasim-cli --table dfa_transitions.csv --input aaaa --input bbbba
  dfasim-cli --sample starts-and-ends-with-a --verbose --input aba
  printf 'ab\\naba\\n' | dfasim-cli --table dfa_transitions.csv")]
struct Cli {
    /// The transition table to load (.csv or .tsv)
    #[clap(short, long, conflicts_with = "sample", required_unless_present_any = ["sample", "list_samples"])]
    table: Option<PathBuf>,

    /// Use a built-in sample automaton instead of a table file
    #[clap(short, long)]
    sample: Option<String>,

    /// List the built-in samples and exit
    #[clap(long)]
    list_samples: bool,

    /// Strings to check. Without any, strings are read from stdin
    #[clap(short, long)]
    input: Vec<String>,

    /// Print the automaton and every step of each run
    #[clap(short, long)]
    verbose: bool,

    /// Print the automaton as JSON and exit
    #[clap(long)]
    json: bool,

    /// TOML file with marker and tokenization settings
    #[clap(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_samples {
        for name in SampleManager::names() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => TableConfig::load(path)?,
        None => TableConfig::default(),
    };

    let automaton = load_automaton(&cli, &config)?;

    if cli.json {
        println!("{}", to_json(&automaton.snapshot())?);
        return Ok(());
    }

    if cli.verbose {
        print!("{}", render_snapshot(&automaton.snapshot()));
    }

    for input in read_inputs(&cli)? {
        let symbols = config.tokenization.tokenize(&input);

        if cli.verbose {
            print!("{}", render_trace(&input, &automaton.trace(&symbols)));
        } else {
            println!("{}", result_line(&input, &automaton.run(&symbols)));
        }
    }

    Ok(())
}

fn load_automaton(cli: &Cli, config: &TableConfig) -> Result<Automaton> {
    if let Some(name) = &cli.sample {
        return Ok(SampleManager::get(name)?.clone());
    }

    let path = cli
        .table
        .as_ref()
        .context("Either --table or --sample is required")?;

    AutomatonLoader::load(path, config)
        .with_context(|| format!("Failed to load DFA from {}", path.display()))
}

/// Strings from `--input`, else one prompted line on a terminal, else every line of stdin.
fn read_inputs(cli: &Cli) -> Result<Vec<String>> {
    if !cli.input.is_empty() {
        return Ok(cli.input.clone());
    }

    let stdin = io::stdin();

    if atty::is(atty::Stream::Stdin) {
        print!("Enter a string: ");
        io::stdout().flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        return Ok(vec![line.trim_end_matches(['\r', '\n']).to_string()]);
    }

    stdin
        .lock()
        .lines()
        .map(|line| line.context("Failed to read input from stdin"))
        .collect()
}
