use std::ops::ControlFlow;
use std::path::Path;

use anyhow::{bail, Context};
use colored::{ColoredString, Colorize};
use datadiff_align::{AlignedRow, AlignedView, RowKind, Span};
use datadiff_load::{JsonEntry, JsonEntryDiff, SpriteInfo};
use datadiff_scan::{friendly_folder_name, paginate, ChangeFilter, ChangeKind, FileChange, FolderScanner};
use datadiff_session::{Comparison, ContentType, DiffSession, FilePair, LoadStage, SessionDiff};
use datadiff_table::{CellStyle, FilterState, RecordTable, Row, SplitTables};
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::config::{self, AppConfig, KEYS};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config_path = config::config_path(cli.config.as_deref());
    let mut app = AppConfig::load(&config_path)?;
    match cli.command {
        Command::Scan(args) => cmd_scan(args, &cli.format, &mut app, &config_path),
        Command::Diff(args) => cmd_diff(args, &cli.format, &app),
        Command::Table(args) => cmd_table(args, &cli.format, &app),
        Command::Config(args) => cmd_config(args, &cli.format, &mut app, &config_path),
    }
}

fn cmd_scan(args: ScanArgs, format: &OutputFormat, app: &mut AppConfig, config_path: &Path) -> anyhow::Result<()> {
    let base = args
        .base
        .or_else(|| app.base_dir.clone())
        .context("no original folder given and none remembered")?;
    let mod_dir = args
        .mod_dir
        .or_else(|| app.mod_dir.clone())
        .context("no mod folder given and none remembered")?;

    let changes = FolderScanner::new(&base, &mod_dir).scan()?;
    if app.remember_folders(&base, &mod_dir) {
        app.save(config_path)?;
    }

    let mut filter = ChangeFilter::new();
    if let Some(kind) = args.kind {
        filter = filter.kind(kind.into());
    }
    if let Some(ext) = args.ext {
        filter = filter.extension(ext);
    }
    if let Some(search) = args.search {
        filter = filter.search(search);
    }
    let matched = filter.apply(&changes);
    let page = paginate(&matched, app.page_size, args.page);

    match format {
        OutputFormat::Json => {
            let out = json!({
                "original": base,
                "modified": mod_dir,
                "total": changes.len(),
                "matched": matched.len(),
                "page": page.page,
                "page_count": page.page_count,
                "changes": page.items,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!(
                "Comparing {} with {}",
                friendly_folder_name(&base).bold(),
                friendly_folder_name(&mod_dir).bold()
            );
            if matched.is_empty() {
                println!("{} No differences.", "✓".green().bold());
                return Ok(());
            }
            for change in page.items {
                print_change(change);
            }
            println!(
                "\nPage {}/{} ({} of {} changes)",
                page.page,
                page.page_count,
                matched.len(),
                changes.len()
            );
        }
    }
    Ok(())
}

fn print_change(change: &FileChange) {
    let label = format!("{:<10}", change.kind.label());
    let label = match change.kind {
        ChangeKind::New => label.green(),
        ChangeKind::Changed => label.yellow(),
        ChangeKind::ComparisonError => label.red(),
    };
    println!("  {} {}  {}", label, change.relative_path, change.detail_text().dimmed());
}

/// Log progress ticks; the command line never cancels.
fn log_progress(stage: LoadStage, done: usize, total: usize) -> ControlFlow<()> {
    debug!(?stage, done, total, "loading");
    ControlFlow::Continue(())
}

fn open_pair(app: &AppConfig, pair: &FilePair, content_type: Option<ContentType>) -> anyhow::Result<Comparison> {
    let session = DiffSession::new(app.session.clone());
    let content_type = content_type.unwrap_or_else(|| session.content_type(pair));
    let mut progress = log_progress;
    let comparison = session.open_as(pair, content_type, &mut progress)?;
    for problem in &comparison.problems {
        eprintln!("{} {}", "warning:".yellow().bold(), problem);
    }
    Ok(comparison)
}

fn cmd_diff(args: DiffArgs, format: &OutputFormat, app: &AppConfig) -> anyhow::Result<()> {
    let pair = FilePair::existing(&args.left, &args.right);
    let comparison = open_pair(app, &pair, args.forced_type())?;
    let filter = FilterState::new(args.only_diff, "", false);

    match (format, comparison.diff) {
        (OutputFormat::Json, SessionDiff::Lines(view)) => {
            let out = json!({
                "content_type": comparison.content_type,
                "stats": view.stats(),
                "rows": view.visible_rows(args.only_diff),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        (OutputFormat::Json, SessionDiff::Entries(diff)) => {
            let entries: Vec<&JsonEntry> = diff
                .entries()
                .iter()
                .filter(|e| !args.only_diff || e.differs)
                .collect();
            let out = match &diff {
                JsonEntryDiff::Entries { .. } => json!({
                    "content_type": comparison.content_type,
                    "entries": entries,
                }),
                JsonEntryDiff::Mismatched { .. } => json!({
                    "content_type": comparison.content_type,
                    "mismatched": diff,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        (OutputFormat::Json, SessionDiff::Table(mut tables)) => {
            tables.set_filter(filter);
            let out = json!({
                "content_type": comparison.content_type,
                "left": table_json(tables.left()),
                "right": table_json(tables.right()),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        (OutputFormat::Json, SessionDiff::Sprite(diff)) => {
            let out = json!({ "content_type": comparison.content_type, "sprite": diff });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        (OutputFormat::Json, SessionDiff::Binary { identical }) => {
            let out = json!({ "content_type": comparison.content_type, "identical": identical });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        (OutputFormat::Text, SessionDiff::Lines(view)) => print_lines(&view, args.only_diff),
        (OutputFormat::Text, SessionDiff::Entries(diff)) => print_entries(&diff, args.only_diff),
        (OutputFormat::Text, SessionDiff::Table(mut tables)) => {
            tables.set_filter(filter);
            print_split(&tables);
        }
        (OutputFormat::Text, SessionDiff::Sprite(diff)) => {
            let describe = |info: Option<SpriteInfo>| match info {
                Some(i) => format!("{}x{}, {} frame(s), version {}", i.width, i.height, i.frames, i.version),
                None => "(no sprite)".to_string(),
            };
            println!("original: {}", describe(diff.left));
            println!("modified: {}", describe(diff.right));
            let mark = |same: bool| if same { "same".green() } else { "differs".red() };
            println!("  size:    {}", mark(diff.same_size));
            println!("  frames:  {}", mark(diff.same_frames));
            println!("  version: {}", mark(diff.same_version));
            println!("  pixels:  {}", mark(diff.same_pixels));
        }
        (OutputFormat::Text, SessionDiff::Binary { identical }) => {
            if identical {
                println!("{} Files are identical.", "✓".green().bold());
            } else {
                println!("{} Files differ.", "✗".red().bold());
            }
        }
    }
    Ok(())
}

fn highlight(line: &str, spans: &[Span], changed: fn(&str) -> ColoredString) -> String {
    if spans.is_empty() {
        return line.to_string();
    }
    spans
        .iter()
        .map(|span| {
            let text = span.text(line);
            if span.changed {
                changed(text).bold().to_string()
            } else {
                text.to_string()
            }
        })
        .collect()
}

fn print_row(row: &AlignedRow) {
    let number = |n: Option<usize>| n.map_or_else(|| "     ".to_string(), |n| format!("{n:>5}"));
    let left_no = number(row.left.as_ref().map(|l| l.number));
    let right_no = number(row.right.as_ref().map(|l| l.number));
    match row.kind {
        RowKind::Equal => {
            let text = row.left.as_ref().map_or("", |l| l.text.as_str());
            println!("{} {}   {}", left_no.dimmed(), right_no.dimmed(), text);
        }
        RowKind::Changed | RowKind::Removed | RowKind::Added => {
            if let Some(left) = &row.left {
                let text = highlight(&left.text, &row.left_spans, |s| s.red());
                println!("{} {} {} {}", left_no.dimmed(), right_no.dimmed(), "-".red(), text);
            }
            if let Some(right) = &row.right {
                let text = highlight(&right.text, &row.right_spans, |s| s.green());
                println!("{} {} {} {}", left_no.dimmed(), right_no.dimmed(), "+".green(), text);
            }
        }
    }
}

fn print_lines(view: &AlignedView, only_diff: bool) {
    for row in view.visible_rows(only_diff) {
        print_row(row);
    }
    let stats = view.stats();
    if stats.differences() == 0 {
        println!("{} No differences.", "✓".green().bold());
    } else {
        println!(
            "\n{} changed, {} removed, {} added, {} unchanged",
            stats.changed.to_string().yellow(),
            stats.removed.to_string().red(),
            stats.added.to_string().green(),
            stats.equal
        );
    }
}

fn entry_value(value: Option<&serde_json::Value>) -> String {
    value.map_or_else(|| "<missing>".to_string(), ToString::to_string)
}

fn print_entries(diff: &JsonEntryDiff, only_diff: bool) {
    if let JsonEntryDiff::Mismatched { left, right } = diff {
        println!(
            "{} Top levels cannot be paired: original is {}, modified is {}.",
            "✗".red().bold(),
            left,
            right
        );
        return;
    }
    let entries = diff.entries();
    for entry in entries.iter().filter(|e| !only_diff || e.differs) {
        let left = format!("{}: {}", entry.key, entry_value(entry.left.as_ref()));
        let right = format!("{}: {}", entry.key, entry_value(entry.right.as_ref()));
        if entry.differs {
            println!("{} {}", "-".red(), left.red());
            println!("{} {}", "+".green(), right.green());
        } else {
            println!("  {left}");
        }
    }
    let changed = entries.iter().filter(|e| e.differs).count();
    if changed == 0 {
        println!("{} No differences.", "✓".green().bold());
    } else {
        println!("\n{} of {} entries differ", changed.to_string().yellow(), entries.len());
    }
}

fn cmd_table(args: TableArgs, format: &OutputFormat, app: &AppConfig) -> anyhow::Result<()> {
    let pair = FilePair::existing(&args.left, &args.right);
    let comparison = open_pair(app, &pair, Some(ContentType::Table))?;
    let SessionDiff::Table(mut tables) = comparison.diff else {
        bail!("{} did not load as a table", args.left.display());
    };
    let filter = FilterState::new(args.only_diff, args.search, args.whole_word);

    if args.merged {
        let header = if tables.right().header().is_empty() {
            tables.left().header().to_vec()
        } else {
            tables.right().header().to_vec()
        };
        let mut merged = RecordTable::merged(&rows_of(tables.left()), &rows_of(tables.right()), header);
        merged.set_filter(filter);
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table_json(&merged))?),
            OutputFormat::Text => print_table(&merged),
        }
        return Ok(());
    }

    tables.set_filter(filter);
    match format {
        OutputFormat::Json => {
            let out = json!({ "left": table_json(tables.left()), "right": table_json(tables.right()) });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => print_split(&tables),
    }
    Ok(())
}

fn rows_of(table: &RecordTable) -> Vec<Row> {
    (0..table.len()).filter_map(|i| table.row(i).cloned()).collect()
}

fn styled(value: &str, style: CellStyle) -> ColoredString {
    match style {
        CellStyle::Plain => value.normal(),
        CellStyle::Changed => value.yellow(),
        CellStyle::Added => value.green(),
        CellStyle::Removed => value.red().strikethrough(),
        CellStyle::SearchHit => value.black().on_yellow(),
    }
}

fn print_table(table: &RecordTable) {
    println!("{:>6}  {}", "#".dimmed(), table.header().join(" | ").bold());
    for display in 0..table.visible_len() {
        let Some(real) = table.real_row(display) else {
            continue;
        };
        let cells: Vec<String> = (0..table.column_count())
            .filter_map(|col| table.cell_at(display, col))
            .map(|cell| styled(cell.value, cell.style).to_string())
            .collect();
        println!("{:>6}  {}", (real + 1).to_string().dimmed(), cells.join(" | "));
    }
    let stats = table.stats();
    println!(
        "{} of {} rows shown, {} of {} differing",
        stats.visible, stats.total, stats.visible_diff, stats.total_diff
    );
}

fn print_split(tables: &SplitTables) {
    println!("{}", "original".bold().underline());
    print_table(tables.left());
    println!("\n{}", "modified".bold().underline());
    print_table(tables.right());
}

fn table_json(table: &RecordTable) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = table
        .visible_rows()
        .iter()
        .enumerate()
        .map(|(display, &real)| {
            let cells: Vec<serde_json::Value> = (0..table.column_count())
                .filter_map(|col| table.cell_at(display, col))
                .map(|cell| json!({ "value": cell.value, "style": cell.style }))
                .collect();
            json!({ "row": real, "diff": table.is_diff_row(real), "cells": cells })
        })
        .collect();
    json!({
        "header": table.header(),
        "stats": table.stats(),
        "rows": rows,
    })
}

fn cmd_config(args: ConfigArgs, format: &OutputFormat, app: &mut AppConfig, path: &Path) -> anyhow::Result<()> {
    match (&args.key, &args.value) {
        (Some(key), Some(value)) => {
            app.set(key, value)?;
            app.save(path)?;
            println!("Set {} = {}", key.bold(), value);
        }
        (Some(key), None) => match app.get(key)? {
            Some(value) => println!("{} = {}", key.bold(), value),
            None => println!("{} = (not set)", key.bold()),
        },
        (None, _) => match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(app)?),
            OutputFormat::Text => {
                for key in KEYS {
                    let value = app.get(key)?.unwrap_or_else(|| "(not set)".into());
                    println!("{} = {}", key.bold(), value);
                }
            }
        },
    }
    Ok(())
}
