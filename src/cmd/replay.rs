//! Replay a recorded event log into a console and print what a viewer sees.

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use logdeck::config::{self, Settings};
use logdeck::console::Console;
use logdeck::entry::Severity;
use logdeck::event::ConsoleEvent;
use logdeck::filter::SearchMode;
use logdeck::persistence::slots::{FileSlots, MemorySlots, SlotStore};
use logdeck::view::prefs::{self, FilterPrefs};
use logdeck::view::{Row, ViewFilter};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use super::ReplayArgs;

pub fn run(args: &ReplayArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let slots = match &args.state {
        Some(path) => Some(FileSlots::open(path)),
        None => FileSlots::open_default(),
    };

    match slots {
        Some(slots) => {
            tracing::debug!(path = %slots.path().display(), "using slot file");
            replay(Console::new(settings, slots), args)
        }
        None => replay(Console::new(settings, MemorySlots::new()), args),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => config::load_single_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => config::load(&config::discover()).context("Failed to load config"),
    }
}

fn replay<S: SlotStore>(mut console: Console<S>, args: &ReplayArgs) -> Result<()> {
    let mut view = build_view(args);
    console.attach(&mut view);

    let events = match &args.events {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event log {}", path.display()))?;
            read_events(BufReader::new(file))?
        }
        _ => read_events(io::stdin().lock()).context("Failed to read from stdin")?,
    };
    tracing::debug!(count = events.len(), "replaying events");

    for event in events {
        console.handle(event, Instant::now());
    }

    view.sync(console.store());
    if args.save_prefs {
        prefs::save_prefs(&view.prefs());
    }

    for row in view.visible_rows(console.store()) {
        print_row(&console, row, args.frames);
    }

    let counts = console.counts();
    println!(
        "{}",
        format!(
            "{} shown | {} info, {} warnings, {} errors",
            view.visible_count(),
            counts.info(),
            counts.warnings(),
            counts.errors()
        )
        .dimmed()
    );
    Ok(())
}

/// Parse JSON-lines events, skipping blank lines.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<ConsoleEvent>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event log")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}

/// Build the viewer filter from saved prefs (when asked) and the flags.
pub fn build_view(args: &ReplayArgs) -> ViewFilter {
    let base = if args.use_prefs {
        prefs::load_prefs()
    } else {
        FilterPrefs::default()
    };
    let mut view = ViewFilter::from_prefs(&base);

    if args.collapse {
        view.set_collapse(true);
    }
    if let Some(search) = &args.search {
        let mode = if args.regex {
            SearchMode::Regex
        } else {
            SearchMode::Plain
        };
        view.set_search(search.as_str(), mode);
    }
    if !args.tags.is_empty() {
        view.clear_tags();
        for tag in &args.tags {
            view.enable_tag(tag.as_str());
        }
    }
    if args.hide_info {
        view.set_severity_visible(Severity::Info, false);
    }
    if args.hide_warnings {
        view.set_severity_visible(Severity::Warning, false);
    }
    if args.hide_errors {
        view.set_severity_visible(Severity::Error, false);
    }
    view
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Info => "info ".normal(),
        Severity::Warning => "warn ".yellow(),
        Severity::Error => "error".red().bold(),
    }
}

fn print_row<S: SlotStore>(console: &Console<S>, row: Row<'_>, frames: bool) {
    let count = if row.count > 1 {
        format!(" (x{})", row.count).dimmed().to_string()
    } else {
        String::new()
    };
    println!(
        "{} {} {}{}",
        severity_label(row.severity()),
        format!("[{}]", row.tag()).cyan(),
        row.message(),
        count
    );

    if !frames || row.stack().is_empty() {
        return;
    }
    for frame in console.frames(row.stack()) {
        if frame.is_user {
            println!("      {}", frame.display);
        } else {
            println!("      {}", frame.display.dimmed());
        }
    }
    if let Some(target) = console.navigation_target(row.stack()) {
        println!(
            "      {} {}:{}",
            "->".green(),
            target.path.display(),
            target.line
        );
    }
}
