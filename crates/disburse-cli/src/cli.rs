//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use disburse_output::OutputLayout;

#[derive(Parser)]
#[command(
    name = "disburse",
    version,
    about = "Map CSV payee exports onto disbursement payloads",
    long_about = "Map the columns of a CSV payee export onto a nested JSON disbursement\n\
                  template and write one payload per row, or one array of payloads.\n\n\
                  Mappings can be suggested from the CSV headers, validated against the\n\
                  template's required fields and saved for reuse."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace logs (they hold payee personal data).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Configuration file (default: ./disburse.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory of saved mappings (overrides the configuration file).
    #[arg(long = "mappings-dir", value_name = "DIR", global = true)]
    pub mappings_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the addressable fields of a template.
    Fields(FieldsArgs),

    /// Bind CSV headers to template fields by name.
    Suggest(SuggestArgs),

    /// Check that a mapping binds every required field.
    Validate(ValidateArgs),

    /// Show the payload built from the first CSV row.
    Preview(PreviewArgs),

    /// Build payloads for every CSV row and write them out.
    Transform(TransformArgs),

    /// Manage saved mappings.
    #[command(subcommand)]
    Mappings(MappingsCommand),
}

#[derive(Args)]
pub struct TemplateArg {
    /// Template JSON file (default: the built-in disbursement template).
    #[arg(long = "template", value_name = "PATH")]
    pub template: Option<PathBuf>,
}

#[derive(Args)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    /// Only list fields the built-in template does not have.
    #[arg(long = "additional", requires = "template")]
    pub additional: bool,

    /// Print the fields as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// CSV file whose headers are bound.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub template: TemplateArg,

    /// Near matches shown for each unbound header.
    #[arg(long = "candidates", default_value_t = 3)]
    pub candidates: usize,

    /// Save the suggested mapping under this name.
    #[arg(long = "save", value_name = "NAME")]
    pub save: Option<String>,

    /// Write the suggested mapping table to a JSON file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct MappingArg {
    /// Mapping file, saved mapping id, or saved mapping name.
    #[arg(long = "mapping", short = 'm', value_name = "MAPPING")]
    pub mapping: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub mapping: MappingArg,

    #[command(flatten)]
    pub template: TemplateArg,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// CSV file to read.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub mapping: MappingArg,

    #[command(flatten)]
    pub template: TemplateArg,

    /// Print single-line JSON.
    #[arg(long = "compact")]
    pub compact: bool,
}

#[derive(Args)]
pub struct TransformArgs {
    /// CSV file to read.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub mapping: MappingArg,

    #[command(flatten)]
    pub template: TemplateArg,

    /// Local directory the output files are written under.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// One array file, or one file per row.
    #[arg(long = "layout", value_enum)]
    pub layout: Option<LayoutArg>,

    /// Remote directory mirrored under the output directory.
    #[arg(long = "remote-path", value_name = "PATH")]
    pub remote_path: Option<String>,

    /// Write outputs even when required fields are unbound.
    #[arg(long = "allow-incomplete")]
    pub allow_incomplete: bool,

    /// Transform and report without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum MappingsCommand {
    /// List saved mappings.
    List,

    /// Print a saved mapping as JSON.
    Show {
        /// Saved mapping id or name.
        #[arg(value_name = "MAPPING")]
        mapping: String,
    },

    /// Save a mapping table file under a name.
    Save {
        /// Name to save under.
        #[arg(long = "name")]
        name: String,

        /// Mapping table JSON file.
        #[arg(value_name = "PATH")]
        file: PathBuf,

        /// Keep this template with the mapping.
        #[arg(long = "template", value_name = "PATH")]
        template: Option<PathBuf>,
    },

    /// Delete a saved mapping.
    Delete {
        /// Saved mapping id.
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    Array,
    PerRow,
}

impl From<LayoutArg> for OutputLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Array => Self::Array,
            LayoutArg::PerRow => Self::PerRow,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
