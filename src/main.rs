#![deny(clippy::unwrap_used)]

use clap::{Parser, Subcommand};
use pleadr::{
    configuration::PleadingConfiguration, document::PleadingDocument, error::ContextError,
};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

#[derive(Parser, Debug)]
#[command(version, about = "Renders pleading paper court filings as PDF documents", long_about = None)]
struct CliArguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Renders a JSON document onto pleading paper
    Render {
        #[arg(short = 'd', long = "document", value_name = "json_file")]
        document_path: PathBuf,
        #[arg(short = 'c', long = "configuration", value_name = "json_file")]
        configuration_path: Option<PathBuf>,
        #[arg(short = 'o', long = "output", value_name = "pdf_file")]
        output_file_path: PathBuf,
        /// Dates the document at the Unix epoch so that the output is identical between runs
        #[arg(long)]
        reproducible: bool,
    },
    /// Writes empty pleading paper
    Blank {
        #[arg(short = 'p', long = "pages", default_value_t = 1)]
        page_count: usize,
        #[arg(short = 't', long = "title")]
        title: Option<String>,
        #[arg(short = 'c', long = "configuration", value_name = "json_file")]
        configuration_path: Option<PathBuf>,
        #[arg(short = 'o', long = "output", value_name = "pdf_file")]
        output_file_path: PathBuf,
        #[arg(long)]
        reproducible: bool,
    },
    /// Prints the baseline of every numbered line
    Grid {
        #[arg(short = 'c', long = "configuration", value_name = "json_file")]
        configuration_path: Option<PathBuf>,
    },
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<(), ContextError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let arguments = CliArguments::parse();
    log::debug!("{:?}", arguments);

    match arguments.command {
        Command::Render {
            document_path,
            configuration_path,
            output_file_path,
            reproducible,
        } => {
            let configuration = load_configuration(configuration_path.as_deref())?;
            let document = PleadingDocument::from_path(&document_path)?;
            document
                .save_to_pdf_file(&configuration, creation_date(reproducible), &output_file_path)
                .map_err(|error| {
                    ContextError::with_error(
                        format!("Failed to render the document {:?}", document_path),
                        &error,
                    )
                })
        }
        Command::Blank {
            page_count,
            title,
            configuration_path,
            output_file_path,
            reproducible,
        } => {
            let configuration = load_configuration(configuration_path.as_deref())?;
            let document = PleadingDocument::blank(title, page_count);
            document
                .save_to_pdf_file(&configuration, creation_date(reproducible), &output_file_path)
                .map_err(|error| {
                    ContextError::with_error("Failed to render the blank pleading paper", &error)
                })
        }
        Command::Grid { configuration_path } => {
            let configuration = load_configuration(configuration_path.as_deref())?;
            let grid = configuration.grid()?;
            for (line, baseline) in grid.lines() {
                println!("{:>2} {:.2}", line, baseline);
            }
            Ok(())
        }
    }
}

fn load_configuration(configuration_path: Option<&Path>) -> Result<PleadingConfiguration, ContextError> {
    match configuration_path {
        Some(configuration_path) => PleadingConfiguration::from_path(configuration_path),
        None => {
            let configuration = PleadingConfiguration::default();
            configuration.validate()?;
            Ok(configuration)
        }
    }
}

fn creation_date(reproducible: bool) -> OffsetDateTime {
    if reproducible {
        OffsetDateTime::UNIX_EPOCH
    } else {
        OffsetDateTime::now_utc()
    }
}
