//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lintfmt",
    version,
    about = "Derive formatter options and fix configs from linter rules",
    long_about = "lintfmt — inspect how linter rules translate into formatter options and into the configuration of the autofix pass.\n\nConfiguration precedence: CLI > lintfmt.toml > defaults.",
    after_help = "Examples:\n  lintfmt options 'src/**/*.js'\n  lintfmt options src/app.ts --options '{\"printWidth\": 100}' --output json\n  lintfmt fix-config src/app.ts --catalog rules.json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Log filter, e.g. debug or lintfmt=trace (default: LOG_LEVEL or warn)"
    )]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current lintfmt version.")]
    Version,
    /// Derive formatter options per file
    #[command(
        about = "Derive formatter options",
        long_about = "Resolve linter config and formatter options for each file and print the options the formatter would receive.",
        after_help = "Examples:\n  lintfmt options 'src/**/*.{js,ts}'\n  lintfmt options a.js --fallback '{\"semi\": false}' --output json"
    )]
    Options {
        #[arg(help = "Files or glob patterns, relative to the repository root")]
        files: Vec<String>,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Linter config file merged over discovered configs")]
        lint_config: Option<String>,
        #[arg(long, help = "Explicit formatter options as a JSON object")]
        options: Option<String>,
        #[arg(long, help = "Fallback formatter options as a JSON object")]
        fallback: Option<String>,
        #[arg(long, help = "Stage order: fix-then-format|format-then-fix")]
        order: Option<String>,
        #[arg(long, help = "JSON rule catalog: rule name -> {fixable}")]
        catalog: Option<String>,
    },
    /// Show the autofix configuration for a file
    #[command(
        about = "Show the fix-pass configuration",
        long_about = "Print the linter configuration used by the autofix pass for one file, including rules forced off because they cannot fix anything.",
        after_help = "Examples:\n  lintfmt fix-config src/app.js\n  lintfmt fix-config src/app.js --catalog rules.json --output json"
    )]
    FixConfig {
        #[arg(help = "File identity, relative to the repository root")]
        file: String,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Linter config file merged over discovered configs")]
        lint_config: Option<String>,
        #[arg(long, help = "JSON rule catalog: rule name -> {fixable}")]
        catalog: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_command() {
        let cli = Cli::parse_from([
            "lintfmt",
            "--log-level",
            "debug",
            "options",
            "src/*.js",
            "b.ts",
            "--output",
            "json",
            "--order",
            "format-then-fix",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.cmd {
            Commands::Options {
                files,
                output,
                order,
                ..
            } => {
                assert_eq!(files, vec!["src/*.js", "b.ts"]);
                assert_eq!(output.as_deref(), Some("json"));
                assert_eq!(order.as_deref(), Some("format-then-fix"));
            }
            _ => panic!("expected options"),
        }
    }

    #[test]
    fn test_parse_fix_config_command() {
        let cli = Cli::parse_from(["lintfmt", "fix-config", "a.js", "--catalog", "rules.json"]);
        match cli.cmd {
            Commands::FixConfig { file, catalog, .. } => {
                assert_eq!(file, "a.js");
                assert_eq!(catalog.as_deref(), Some("rules.json"));
            }
            _ => panic!("expected fix-config"),
        }
    }
}
