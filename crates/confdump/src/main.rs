//! Export resolved Kconfig configuration values as JSON or TOML.

mod export;

use {
    clap::{builder::PossibleValue, Parser, ValueEnum},
    std::{path::PathBuf, process::ExitCode},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum OutputFormat {
    /// Output a JSON object.
    #[default]
    Json,

    /// Output a TOML table.
    Toml,
}

impl OutputFormat {
    /// The output filename used when `--output` is not given.
    fn default_output(self) -> &'static str {
        match self {
            Self::Json => "config.json",
            Self::Toml => "config.toml",
        }
    }
}

impl ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Json, Self::Toml]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::Json => PossibleValue::new("json").alias("JSON").help("Output a JSON object"),
            Self::Toml => PossibleValue::new("toml").alias("TOML").help("Output a TOML table"),
        })
    }
}

/// Command line options for the exporter.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Options {
    /// The path to the top-level Kconfig file.
    #[arg(long, default_value = "Kconfig")]
    kconfig: PathBuf,

    /// The path to the .config file holding user selections.
    #[arg(long, default_value = ".config")]
    dotconfig: PathBuf,

    /// The directory that source statements are resolved against. Defaults to the directory
    /// containing the top-level Kconfig file.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// The format to write the configuration in.
    #[arg(long, short, default_value = "json")]
    format: OutputFormat,

    /// The output file to write, or - for stdout. Defaults to config.json or config.toml
    /// depending on the format.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let options = Options::parse();

    match export::run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
