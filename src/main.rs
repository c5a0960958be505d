// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! cellgraph CLI entrypoint.
//!
//! Inspects multi-page documents and prints JSON to stdout. Nothing is written back.
//! Diagnostics go to stderr; set `RUST_LOG` to change the level (default `warn`).

use std::process::ExitCode;

use cellgraph::model::CellModel;
use cellgraph::query::{find_tables, find_vertices, TableFilter, VertexFilter};
use cellgraph::store::{DocumentFile, PageSelector, StoreError};
use cellgraph::table::{read_table, TableError};
use cellgraph::ErrorCategory;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} pages <document>\n  {program} vertices <document> [--page <name|index>] [--kind <kind>] [--label-contains <text>]\n  {program} tables <document> [--page <name|index>] [--has-column <header>]\n  {program} table <document> <table-id> [--page <name|index>]\n\n--page selects by zero-based index when numeric, by name otherwise (default: first page)."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Pages,
    Vertices,
    Tables,
    Table { table_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Command,
    document: String,
    page: Option<String>,
    kind: Option<String>,
    label_contains: Option<String>,
    has_column: Option<String>,
}

fn set_once(slot: &mut Option<String>, args: &mut impl Iterator<Item = String>) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(args.next().ok_or(())?);
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut positional = Vec::new();
    let mut page = None;
    let mut kind = None;
    let mut label_contains = None;
    let mut has_column = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--page" => set_once(&mut page, &mut args)?,
            "--kind" => set_once(&mut kind, &mut args)?,
            "--label-contains" => set_once(&mut label_contains, &mut args)?,
            "--has-column" => set_once(&mut has_column, &mut args)?,
            _ if arg.starts_with('-') => return Err(()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(name), Some(document)) = (positional.next(), positional.next()) else {
        return Err(());
    };
    let command = match (name.as_str(), positional.next()) {
        ("pages", None) => Command::Pages,
        ("vertices", None) => Command::Vertices,
        ("tables", None) => Command::Tables,
        ("table", Some(table_id)) => Command::Table { table_id },
        _ => return Err(()),
    };
    if positional.next().is_some() {
        return Err(());
    }

    let options = CliOptions { command, document, page, kind, label_contains, has_column };
    let vertex_filters = options.kind.is_some() || options.label_contains.is_some();
    let misplaced = match options.command {
        Command::Pages => options.page.is_some() || vertex_filters || options.has_column.is_some(),
        Command::Vertices => options.has_column.is_some(),
        Command::Tables => vertex_filters,
        Command::Table { .. } => vertex_filters || options.has_column.is_some(),
    };
    if misplaced {
        return Err(());
    }
    Ok(options)
}

impl CliOptions {
    fn selector(&self) -> PageSelector {
        self.page.as_deref().map_or(PageSelector::First, |raw| match raw.parse() {
            Ok(selector) => selector,
            Err(never) => match never {},
        })
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Store(err) => err.category(),
            Self::Table(err) => err.category(),
            Self::Json(_) => ErrorCategory::InvalidArgument,
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(options: CliOptions) -> Result<(), CliError> {
    let file = DocumentFile::new(&options.document);
    let selector = options.selector();
    let load = || -> Result<CellModel, CliError> { Ok(file.load_page(&selector)?) };

    match &options.command {
        Command::Pages => print_json(&file.list_pages()?),
        Command::Vertices => {
            let filter = VertexFilter {
                kind: options.kind.clone(),
                label_contains: options.label_contains.clone(),
                ..VertexFilter::default()
            };
            print_json(&find_vertices(&load()?, &filter))
        }
        Command::Tables => {
            let filter = TableFilter {
                has_column: options.has_column.clone(),
                ..TableFilter::default()
            };
            print_json(&find_tables(&load()?, &filter))
        }
        Command::Table { table_id } => print_json(&read_table(&load()?, table_id)?),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "cellgraph".to_owned());
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            return ExitCode::from(2);
        }
    };

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(category = %err.category(), "command failed");
            eprintln!("error ({}): {err}", err.category());
            ExitCode::from(1)
        }
    }
}
