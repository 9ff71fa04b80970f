use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use thiserror::Error;

use crate::{
  generator::{
    metrics::GenerationStats,
    orchestrator::{GeneratedOutput, GeneratorOptions, Orchestrator},
  },
  optionality::{GoSourceOptions, OptionalityIndex, scan_go_sources},
  spec::Info,
  ui::{Colors, GenerateCommand},
  utils::{
    fs::{prune_stale_module_dirs, write_generated_files},
    spec::{SpecLoader, SpecMeta},
  },
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

/// Invalid flag combinations, reported before any input is read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("input is required: use -i or --input")]
  MissingInput,
  #[error("--required-by-omitempty requires --go-source")]
  GoSourceRequired,
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: String,
  pub output: PathBuf,
  pub verbose: bool,
  pub quiet: bool,
  /// Present only when inferred optionality is applied.
  pub go_source: Option<GoSourceOptions>,
  pub clean_output: bool,
  pub dedupe_cross_module: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> Result<Self, ConfigError> {
    let GenerateCommand {
      input,
      output,
      verbose,
      quiet,
      go_source,
      go_source_include,
      required_by_omitempty,
      clean_output,
      dedupe_cross_group_models,
    } = command;

    let input = input
      .map(|input| input.trim().to_string())
      .filter(|input| !input.is_empty())
      .ok_or(ConfigError::MissingInput)?;

    let go_source = match (required_by_omitempty, go_source) {
      (false, _) => None,
      (true, None) => return Err(ConfigError::GoSourceRequired),
      (true, Some(root)) => Some(GoSourceOptions::new(root, go_source_include)),
    };

    Ok(Self {
      input,
      output,
      verbose,
      quiet,
      go_source,
      clean_output,
      dedupe_cross_module: dedupe_cross_group_models,
    })
  }

  fn scan_optionality(&self) -> anyhow::Result<Option<OptionalityIndex>> {
    self.go_source.as_ref().map(scan_go_sources).transpose()
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.primary())
      );
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self, loader: &SpecLoader) {
    let action = if loader.is_remote() { "Fetching" } else { "Loading" };
    self.info(&format!("{action} spec from: {}", self.config.input));
  }

  fn log_loaded(&self, meta: &SpecMeta, info: &Info) {
    let title = [info.title.trim(), info.version.trim()]
      .into_iter()
      .filter(|part| !part.is_empty())
      .collect::<Vec<_>>()
      .join(" ");
    if title.is_empty() {
      self.info(&format!("Parsed {} document", meta.version));
    } else {
      self.info(&format!("Parsed {} document: {title}", meta.version));
    }
  }

  fn log_optionality(&self, index: &OptionalityIndex) {
    let Some(options) = &self.config.go_source else {
      return;
    };
    if index.is_empty() {
      if !self.config.quiet {
        eprintln!(
          "{} {}",
          "Warning:".with(self.colors.accent()),
          format!("no Go struct declarations found under {}", options.root.display()).with(self.colors.primary())
        );
      }
      return;
    }
    self.info(&format!(
      "Scanned Go sources in {}: {} struct types",
      options.root.display(),
      index.type_count()
    ));
  }

  fn log_pruned(&self, removed: &[PathBuf]) {
    if self.config.verbose {
      for dir in removed {
        self.info(&format!("Removed stale module: {}", dir.display()));
      }
    }
  }

  fn print_traces(&self, stats: &GenerationStats) {
    if !self.config.verbose || self.config.quiet {
      return;
    }
    for trace in &stats.traces {
      println!("              {}", trace.to_string().with(self.colors.value()));
    }
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    self.stat("Modules generated:", stats.modules_generated.to_string());
    self.stat("Operations converted:", stats.operations_converted.to_string());
    self.stat("Types generated:", stats.types_generated.to_string());
    if stats.types_reexported > 0 {
      self.stat("", format!("{} re-exported", stats.types_reexported));
    }
    self.stat("API files written:", stats.api_files_written.to_string());
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    if stats.warnings.is_empty() || self.config.quiet {
      return;
    }

    let mut printed_header = false;
    for warning in &stats.warnings {
      if !warning.is_skipped_item() && !self.config.verbose {
        continue;
      }
      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(&format!("Writing to: {}", self.config.output.display()));
  }

  fn print_summary(&self, meta: &SpecMeta, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }
    println!();
    println!("{} {}", "Source:".with(self.colors.label()), meta.source);
    println!("{} {}", "Spec:".with(self.colors.label()), meta.version);
    println!(
      "{}",
      format!(
        "Modules: {}, Operations: {}, Types: {}",
        stats.modules_generated, stats.operations_converted, stats.types_generated
      )
      .with(self.colors.success())
    );
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<GeneratedOutput> {
  let logger = GenerateLogger::new(&config, colors);

  let loader = SpecLoader::new(&config.input)?;
  logger.log_loading(&loader);
  let (spec, meta) = loader.load().await?;
  logger.log_loaded(&meta, &spec.info);

  let optionality = config.scan_optionality()?;
  if let Some(index) = &optionality {
    logger.log_optionality(index);
  }

  logger.info("Generating TypeScript modules...");
  let options = GeneratorOptions::builder()
    .dedupe_cross_module(config.dedupe_cross_module)
    .maybe_optionality(optionality.as_ref())
    .build();
  let output = Orchestrator::new(&spec, options).generate()?;

  logger.print_traces(&output.stats);
  logger.print_statistics(&output.stats);
  logger.print_warnings(&output.stats);

  if config.clean_output {
    let removed = prune_stale_module_dirs(&config.output, &output.modules).await?;
    logger.log_pruned(&removed);
  }

  logger.log_writing();
  write_generated_files(&config.output, &output.files).await?;

  logger.print_summary(&meta, &output.stats);
  Ok(output)
}
