mod config;
mod repl;

use std::io::{BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bitwise_lang::{
    default_registry, evaluate_document, export_document, format_value, AngleMode, Dimension,
    Session,
};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::repl::{Repl, Step};

#[derive(Parser)]
#[command(name = "bitwise", version, about = "Line-by-line calculator scratchpad")]
struct Cli {
    /// Angle mode for trigonometry (overrides config)
    #[arg(long, global = true, value_enum)]
    angle_mode: Option<ModeArg>,

    /// Decimal places shown, 0-10 (overrides config)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=10))]
    precision: Option<u8>,

    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single expression
    Eval {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Evaluate a document, line by line
    Run {
        /// Document to read (stdin when omitted)
        file: Option<PathBuf>,

        /// Write the result layout to this file instead of stdout
        #[arg(long)]
        export: Option<PathBuf>,

        /// Also print the final variables
        #[arg(long)]
        vars: bool,
    },

    /// Interactive scratchpad reading from stdin
    Repl,

    /// List known units grouped by dimension
    Units,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Deg,
    Rad,
}

impl From<ModeArg> for AngleMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Deg => AngleMode::Deg,
            ModeArg::Rad => AngleMode::Rad,
        }
    }
}

/// Effective settings: config file values overridden by flags.
struct Settings {
    mode: AngleMode,
    precision: u8,
    export_width: usize,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            mode: cli.angle_mode.map(AngleMode::from).unwrap_or(config.angle_mode),
            precision: cli.precision.unwrap_or_else(|| config.precision()),
            export_width: config.export_width,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, &config);

    match cli.command {
        Commands::Eval { expression } => cmd_eval(&expression.join(" "), &settings),
        Commands::Run { file, export, vars } => {
            cmd_run(file.as_deref(), export.as_deref(), vars, &settings)
        }
        Commands::Repl => cmd_repl(&settings),
        Commands::Units => cmd_units(),
    }
}

fn cmd_eval(expression: &str, settings: &Settings) -> Result<()> {
    match bitwise_lang::run_with_mode(expression, settings.mode) {
        Ok(value) => {
            println!("{}", format_value(&value, settings.precision));
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}

fn cmd_run(
    file: Option<&Path>,
    export: Option<&Path>,
    vars: bool,
    settings: &Settings,
) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    let text = text.strip_suffix('\n').unwrap_or(&text);

    let mut session = Session::new(settings.mode, settings.precision);
    session.edit(text);
    let outcome = session.refresh();
    let layout = export_document(text, &outcome.display, settings.export_width);

    match export {
        Some(path) => {
            std::fs::write(path, format!("{layout}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Exported {} lines to {}", outcome.results.len(), path.display());
        }
        None => println!("{layout}"),
    }

    if vars {
        println!();
        for (name, value) in session.variables() {
            println!("{name} = {value}");
        }
    }
    Ok(())
}

fn cmd_repl(settings: &Settings) -> Result<()> {
    let mut repl = Repl::new(settings.mode, settings.precision);
    let interactive = std::io::stdin().is_terminal();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    if interactive {
        println!("bitwise {} ({}), :help for commands", env!("CARGO_PKG_VERSION"), settings.mode);
    }
    loop {
        if interactive {
            print!("> ");
            stdout.flush().context("writing prompt")?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("reading stdin")? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        match repl.handle(line) {
            Step::Print(out) => println!("{out}"),
            Step::Nothing => {}
            Step::Quit => break,
        }
    }
    Ok(())
}

fn cmd_units() -> Result<()> {
    let registry = default_registry();
    for dimension in Dimension::ALL {
        println!("{dimension}:");
        for unit in registry.units_of(dimension) {
            let names = registry.names_for(unit);
            let aliases: Vec<&str> = names
                .into_iter()
                .filter(|name| *name != unit.symbol())
                .collect();
            println!("  {:<6} {}", unit.symbol(), aliases.join(", "));
        }
    }
    Ok(())
}
