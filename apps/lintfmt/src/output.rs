//! Output rendering for the `options` and `fix-config` commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file fields and a top-level summary.

use crate::models::{FixConfigReport, OptionsReport};
use crate::pipeline::StageOrder;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("cannot render output: {}", e),
    }
}

fn header(file: &str, fix_stage: bool, order: StageOrder, color: bool) -> String {
    let stage = if fix_stage { order.as_str() } else { "format only" };
    if color {
        format!("{} {}", file.bold(), format!("({})", stage).bright_black())
    } else {
        format!("{} ({})", file, stage)
    }
}

/// Print derived formatter options per file.
pub fn print_options(reports: &[OptionsReport], output: &str) {
    match output {
        "json" => print_json(&compose_options_json(reports)),
        _ => {
            let color = use_colors(output);
            for r in reports {
                println!("{}", header(&r.file, r.fix_stage, r.order, color));
                for (name, value) in r.options.to_json_map() {
                    if color {
                        println!("  {} {}", format!("{}:", name).cyan(), value);
                    } else {
                        println!("  {}: {}", name, value);
                    }
                }
            }
            let summary = format!(
                "— Summary — files={} fix_stage={}",
                reports.len(),
                reports.iter().filter(|r| r.fix_stage).count()
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print the fix-pass configuration for one file.
pub fn print_fix_config(report: &FixConfigReport, output: &str) {
    match output {
        "json" => print_json(&compose_fix_config_json(report)),
        _ => {
            let color = use_colors(output);
            let stage = if report.fix_stage { "fix stage runs" } else { "fix stage skipped" };
            if color {
                println!("{} {}", report.file.bold(), format!("({})", stage).bright_black());
            } else {
                println!("{} ({})", report.file, stage);
            }
            for name in &report.disabled {
                if color {
                    println!("  {} {}", "off (not fixable):".yellow().bold(), name);
                } else {
                    println!("  off (not fixable): {}", name);
                }
            }
            match serde_json::to_string_pretty(&report.config) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("cannot render fix config: {}", e),
            }
        }
    }
}

/// Compose options JSON object (pure) for testing/snapshot purposes.
pub fn compose_options_json(reports: &[OptionsReport]) -> JsonVal {
    let items: Vec<_> = reports
        .iter()
        .map(|r| {
            json!({
                "file": r.file,
                "fixStage": r.fix_stage,
                "order": r.order,
                "options": r.options.to_json_map(),
            })
        })
        .collect();
    let summary = json!({
        "files": reports.len(),
        "fixStage": reports.iter().filter(|r| r.fix_stage).count(),
    });
    json!({"results": items, "summary": summary})
}

/// Compose fix-config JSON object (pure) for testing/snapshot purposes.
pub fn compose_fix_config_json(report: &FixConfigReport) -> JsonVal {
    json!({
        "file": report.file,
        "fixStage": report.fix_stage,
        "disabled": report.disabled,
        "config": report.config,
    })
}
