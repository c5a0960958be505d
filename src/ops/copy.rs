// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Copying vertices and tables between models.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::link::{link_vertices, LinkOptions};
use crate::model::{CellId, CellModel, ModelError, ShapeKind, VertexInfo, VertexSpec};
use crate::table::{create_table, read_table, TableData, TableError, TableSpec};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyOptions {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Prepended to every source id that has no explicit mapping.
    pub id_prefix: Option<String>,
    /// Explicit source id -> target id renames; wins over `id_prefix`.
    pub id_mapping: HashMap<String, String>,
    /// Also copy edges whose endpoints are both among the copied vertices.
    pub copy_edges: bool,
}

impl CopyOptions {
    pub fn offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = Some(prefix.into());
        self
    }

    pub fn map_id(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.id_mapping.insert(from.into(), to.into());
        self
    }

    pub fn with_edges(mut self) -> Self {
        self.copy_edges = true;
        self
    }

    fn target_id(&self, source_id: &str) -> String {
        if let Some(mapped) = self.id_mapping.get(source_id) {
            return mapped.clone();
        }
        match &self.id_prefix {
            Some(prefix) => format!("{prefix}{source_id}"),
            None => source_id.to_owned(),
        }
    }
}

/// Ids created in the target model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    pub vertices: Vec<CellId>,
    pub edges: Vec<CellId>,
}

fn spec_from_info(info: &VertexInfo, options: &CopyOptions) -> VertexSpec {
    let mut spec = VertexSpec::new(
        info.label.clone(),
        info.x + options.offset_x,
        info.y + options.offset_y,
    )
    .kind(info.kind.name())
    .size(info.width, info.height);
    if info.kind == ShapeKind::RoundedRectangle {
        if let Some(radius) = info.corner_radius {
            spec = spec.corner_radius(f64::from(radius));
        }
    }
    if let Some(data) = &info.custom_data {
        spec = spec.custom_data(data.clone());
    }
    spec
}

/// Copies vertices from `source` into `target`, keeping kind, size, label and custom data and
/// shifting positions by the configured offset. Copies land on the target's default layer.
///
/// Every source id is resolved before anything is written, so an unknown id leaves `target`
/// untouched. A later failure (for example a target id collision) keeps what was copied so far.
pub fn copy_vertices<S: AsRef<str>>(
    source: &CellModel,
    ids: &[S],
    target: &mut CellModel,
    options: &CopyOptions,
) -> Result<CopyReport, ModelError> {
    let infos = ids
        .iter()
        .map(|id| {
            let id = id.as_ref();
            source.vertex_info(id).ok_or_else(|| ModelError::vertex_not_found(id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut report = CopyReport::default();
    let mut mapping = HashMap::<&str, String>::new();
    for info in &infos {
        let target_id = options.target_id(info.id.as_str());
        let cell = target.add_vertex(&target_id, spec_from_info(info, options))?;
        report.vertices.push(cell.id().clone());
        mapping.insert(info.id.as_str(), target_id);
    }

    if options.copy_edges {
        for edge in source.edges() {
            let Some((from, to)) = edge.endpoints() else {
                continue;
            };
            let (Some(new_from), Some(new_to)) =
                (mapping.get(from.as_str()), mapping.get(to.as_str()))
            else {
                continue;
            };
            let mut link = LinkOptions::default();
            if !edge.label().is_empty() {
                link = link.label(edge.label());
            }
            report.edges.push(link_vertices(target, new_from, new_to, link)?);
        }
    }

    debug!(vertices = report.vertices.len(), edges = report.edges.len(), "vertices copied");
    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyTableOptions {
    /// Target container id; defaults to the source table id.
    pub new_id: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub title: Option<String>,
}

/// Rebuilds a table in `target` from its reconstructed contents: headers, rows, cell sizing,
/// title and container custom data.
pub fn copy_table(
    source: &CellModel,
    table_id: &str,
    target: &mut CellModel,
    options: &CopyTableOptions,
) -> Result<TableData, TableError> {
    let table = read_table(source, table_id)?;
    let new_id = options.new_id.clone().unwrap_or_else(|| table.id.to_string());

    let mut spec = TableSpec::new(table.columns)
        .at(options.x.unwrap_or(table.x), options.y.unwrap_or(table.y))
        .cell_size(table.cell_width, table.cell_height)
        .custom_data(table.custom_data);
    spec.rows = table.rows;
    spec.title = options.title.clone().or(Some(table.title));

    create_table(target, &new_id, spec)
}
