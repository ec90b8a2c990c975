//! keyline CLI: load, inspect, and query typed configuration files.

use clap::{Parser, Subcommand, ValueEnum};
use kl_common::{Error, Result};
use kl_core::exit_codes::ExitCode;
use kl_core::resolve::{resolve_config_path, ConfigSources};
use kl_core::table::ConfigTable;
use kl_core::value::ValueKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keyline", version, about = "Typed line-oriented configuration loader")]
struct Cli {
    /// Base configuration file (overrides $KEYLINE_CONFIG and defaults)
    #[arg(long, global = true, value_name = "FILE")]
    use_config: Option<PathBuf>,

    /// Extra configuration file merged over the base, in order (repeatable)
    #[arg(long = "add-config", global = true, value_name = "FILE")]
    add_config: Vec<PathBuf>,

    /// Define a single variable, highest precedence (repeatable)
    #[arg(
        short = 'D',
        long = "define",
        global = true,
        num_args = 3,
        value_names = ["NAME", "TYPE", "VALUE"]
    )]
    define: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the configuration and report the number of bound variables
    Check,
    /// Look up one variable and print its value
    Get {
        /// Variable name
        name: String,
        /// Kind to look the variable up as; inferred from the stored
        /// value when omitted
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Print all bindings, sorted by name
    Dump {
        #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
        format: DumpFormat,
    },
    /// Print the bound names, one per line
    Names,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum KindArg {
    Int,
    Float,
    Bool,
    Char,
    String,
}

impl From<KindArg> for ValueKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Int => ValueKind::Int,
            KindArg::Float => ValueKind::Float,
            KindArg::Bool => ValueKind::Bool,
            KindArg::Char => ValueKind::Char,
            KindArg::String => ValueKind::String,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DumpFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from_error(&err)
        }
    };
    std::process::exit(code.as_i32());
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_sources(cli: &Cli) -> Result<ConfigSources> {
    let base = resolve_config_path(cli.use_config.clone());
    let mut sources = ConfigSources::new(base);
    for extra in &cli.add_config {
        sources.add_extra(extra);
    }
    for triple in cli.define.chunks(3) {
        sources.add_define(&triple[0], &triple[1], &triple[2])?;
    }
    Ok(sources)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let sources = build_sources(&cli)?;
    let table = sources.load_default()?;

    match cli.command {
        Command::Check => {
            println!("ok ({} values)", table.len());
        }
        Command::Get { name, kind } => print_value(&table, &name, kind)?,
        Command::Dump { format } => match format {
            DumpFormat::Text => {
                for name in table.names() {
                    if let Some(value) = table.get(name) {
                        println!("{name} = {value}");
                    }
                }
            }
            DumpFormat::Json => {
                let json = serde_json::to_string_pretty(&table)
                    .expect("configuration table always serializes");
                println!("{json}");
            }
        },
        Command::Names => {
            for name in table.names() {
                println!("{name}");
            }
        }
    }
    Ok(ExitCode::Ok)
}

fn print_value(table: &ConfigTable, name: &str, kind: Option<KindArg>) -> Result<()> {
    let kind = match kind {
        Some(kind) => kind.into(),
        None => table
            .get(name)
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })?
            .kind(),
    };
    match kind {
        ValueKind::Int => println!("{}", table.get_int(name)?),
        ValueKind::Float => println!("{}", table.get_float(name)?),
        ValueKind::Bool => println!("{}", table.get_bool(name)?),
        ValueKind::Char => println!("{}", table.get_char(name)?),
        ValueKind::String => println!("{}", table.get_string(name)?),
    }
    Ok(())
}
