use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "swagger-ts")]
#[command(author, version, about = "Swagger/OpenAPI to TypeScript API client generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from a Swagger/OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate TypeScript API modules from a Swagger/OpenAPI document
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path or http(s) URL of the Swagger 2.0 / OpenAPI 3 document (JSON or YAML)
  #[arg(short, long, value_name = "FILE|URL")]
  pub input: Option<String>,

  /// Directory the generated modules are written to
  #[arg(short, long, value_name = "DIR", default_value = "output")]
  pub output: PathBuf,

  /// Print per-operation details and every warning
  #[arg(short, long, default_value_t = false, conflicts_with = "quiet")]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,

  /// Go source root scanned for json struct tags
  #[arg(long, value_name = "DIR")]
  pub go_source: Option<PathBuf>,

  /// Directory names under the Go source root that are scanned (comma-separated)
  #[arg(long, value_name = "DIRS", value_delimiter = ',', default_value = "schema,fiberx")]
  pub go_source_include: Vec<String>,

  /// Treat fields as required unless their Go json tag carries omitempty (needs --go-source)
  #[arg(long, default_value_t = false)]
  pub required_by_omitempty: bool,

  /// Remove generated module directories that no longer exist in the document
  #[arg(
    long,
    value_name = "BOOL",
    default_value_t = true,
    action = ArgAction::Set,
    num_args = 0..=1,
    require_equals = true,
    default_missing_value = "true"
  )]
  pub clean_output: bool,

  /// Re-export identical model types from the first module that declares them
  #[arg(long, default_value_t = false)]
  pub dedupe_cross_group_models: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every operation with its generated function name and module
  Operations {
    /// Path or http(s) URL of the Swagger 2.0 / OpenAPI 3 document
    #[arg(short, long, value_name = "FILE|URL")]
    input: String,
  },
}
