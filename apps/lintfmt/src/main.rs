//! lintfmt CLI binary entry point.
//! Resolves settings, runs the requested inspection, and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use lintfmt::cli::{Cli, Commands};
use lintfmt::config::{self, Effective};
use lintfmt::fixable::RuleCatalog;
use lintfmt::inspect;
use lintfmt::models::lint_config::LintConfig;
use lintfmt::models::options::FormattingOptions;
use lintfmt::output;
use lintfmt::pipeline::{FormatRequest, StageOrder};
use lintfmt::resolver::{load_lint_config, FsConfigResolver};
use owo_colors::OwoColorize;
use serde_json::Value as Json;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let prefix = if std::env::var_os("NO_COLOR").is_none() {
                "error:".red().bold().to_string()
            } else {
                "error:".to_string()
            };
            eprintln!("{} {:#}", prefix, e);
            ExitCode::from(2)
        }
    }
}

/// `--log-level`, else `LOG_LEVEL`, else `warn`; events go to stderr.
fn init_logging(cli_level: Option<&str>) {
    let level = cli_level
        .map(str::to_string)
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    debug!("logging initialized at level: {}", level);
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Options {
            files,
            repo_root,
            output,
            lint_config,
            options,
            fallback,
            order,
            catalog,
        } => {
            if files.is_empty() {
                bail!("no files given");
            }
            let order = order.as_deref().map(parse_order).transpose()?;
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                order,
                catalog.as_deref(),
            );
            let mut fallback_options = eff.fallback.clone();
            if let Some(raw) = fallback.as_deref() {
                fallback_options.overlay(&parse_options(raw, "--fallback")?);
            }
            let explicit = match options.as_deref() {
                Some(raw) => parse_options(raw, "--options")?,
                None => FormattingOptions::new(),
            };
            let template = FormatRequest::default()
                .with_lint_config(explicit_lint_config(&eff, lint_config.as_deref())?)
                .with_formatter_options(explicit)
                .with_fallback_options(fallback_options)
                .with_stage_order(eff.order);

            let targets = inspect::collect_targets(&eff.repo_root, &files);
            let resolver = FsConfigResolver::new(&eff.repo_root);
            let reports = inspect::run_options(
                &eff.repo_root,
                &targets,
                &template,
                &resolver,
                &rule_catalog(&eff)?,
            );
            output::print_options(&reports, &eff.output);
        }
        Commands::FixConfig {
            file,
            repo_root,
            output,
            lint_config,
            catalog,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                None,
                catalog.as_deref(),
            );
            let template = FormatRequest::default()
                .with_lint_config(explicit_lint_config(&eff, lint_config.as_deref())?);
            let path = eff.repo_root.join(&file);
            let resolver = FsConfigResolver::new(&eff.repo_root);
            let report = inspect::run_fix_config(
                &eff.repo_root,
                &path,
                &template,
                &resolver,
                &rule_catalog(&eff)?,
            );
            output::print_fix_config(&report, &eff.output);
        }
    }
    Ok(())
}

fn parse_order(raw: &str) -> Result<StageOrder> {
    match StageOrder::from_name(raw) {
        Some(order) => Ok(order),
        None => bail!("unknown stage order '{}' (expected fix-then-format|format-then-fix)", raw),
    }
}

fn parse_options(raw: &str, flag: &str) -> Result<FormattingOptions> {
    let value: Json =
        serde_json::from_str(raw).with_context(|| format!("{} is not valid JSON", flag))?;
    match value {
        Json::Object(map) => Ok(FormattingOptions::from_json_map(&map)),
        _ => bail!("{} must be a JSON object", flag),
    }
}

/// The `--lint-config` file, with the settings' extensions when it sets none.
fn explicit_lint_config(eff: &Effective, path: Option<&str>) -> Result<LintConfig> {
    let mut cfg = match path {
        Some(p) => load_lint_config(Path::new(p)).context("load --lint-config")?,
        None => LintConfig::default(),
    };
    if cfg.extensions.is_none() {
        cfg.extensions = eff.extensions.clone();
    }
    Ok(cfg)
}

fn rule_catalog(eff: &Effective) -> Result<RuleCatalog> {
    match &eff.catalog {
        Some(path) => RuleCatalog::load(path).context("load rule catalog"),
        None => Ok(RuleCatalog::fallback()),
    }
}
