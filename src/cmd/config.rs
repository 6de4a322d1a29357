//! Config validate and show commands for logdeck.
//!
//! Provides config introspection and validation for CI pipelines and developer debugging.

use colored::Colorize;
use logdeck::config::{self, Settings};
use std::path::PathBuf;

/// Get the effective config path (closest wins: project > global).
fn effective_config_path() -> Option<PathBuf> {
    let discovery = config::discover();
    discovery.project_config.or(discovery.global_config)
}

/// Validate the effective config file.
///
/// Follows Unix conventions:
/// - Exit 0 with no output on success (quiet success)
/// - Exit 1 with error message to stderr on failure
pub fn validate() -> Result<(), i32> {
    let config_path = match effective_config_path() {
        Some(path) => path,
        None => {
            eprintln!("error: No config found to validate");
            return Err(1);
        }
    };

    match config::load_single_file(&config_path) {
        Ok(settings) => {
            if let Some(root) = &settings.project_root {
                if !root.is_dir() {
                    eprintln!("error: Project root not found: {}", root.display());
                    return Err(1);
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            Err(1)
        }
    }
}

/// Show the effective configuration.
///
/// Respects NO_COLOR environment variable via the colored crate.
pub fn show() -> Result<(), i32> {
    match effective_config_path() {
        Some(path) => match config::load_single_file(&path) {
            Ok(settings) => {
                println!("Using: {}", path.display().to_string().dimmed());
                println!();
                show_settings(&settings);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", e);
                Err(1)
            }
        },
        None => {
            println!("{}", "No config found. Using defaults.".dimmed());
            println!();
            show_settings(&Settings::default());
            Ok(())
        }
    }
}

fn show_settings(settings: &Settings) {
    let flag = |v: bool| if v { "true".green() } else { "false".yellow() };

    println!("{}: {}", "clear_on_play".cyan(), flag(settings.clear_on_play));
    println!("{}: {}", "clear_on_build".cyan(), flag(settings.clear_on_build));
    println!(
        "{}: {}",
        "clear_on_recompile".cyan(),
        flag(settings.clear_on_recompile)
    );
    println!(
        "{}: {}",
        "live_compiler_sync".cyan(),
        flag(settings.live_compiler_sync)
    );
    match &settings.project_root {
        Some(root) => println!("{}: {}", "project_root".cyan(), root.display().to_string().green()),
        None => println!("{}: {}", "project_root".cyan(), "(not set)".dimmed()),
    }
    println!(
        "{}: {}ms",
        "poll_interval".cyan(),
        settings.poll_interval.as_millis()
    );
    println!("{}: {}ms", "sync_grace".cyan(), settings.sync_grace.as_millis());

    println!();
    println!("{}:", "stack".cyan());
    show_list("system_prefixes", &settings.stack.system_prefixes);
    show_list("source_markers", &settings.stack.source_markers);
    show_list("tool_dirs", &settings.stack.tool_dirs);
    show_list("root_markers", &settings.stack.root_markers);
}

fn show_list(name: &str, items: &[String]) {
    if items.is_empty() {
        println!("  {}: {}", name.blue(), "(none)".dimmed());
        return;
    }
    println!("  {}:", name.blue());
    for item in items {
        println!("    - {}", item.yellow());
    }
}
