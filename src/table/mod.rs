// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tables built from primitive cells.
//!
//! A table is a container vertex whose custom data carries a `table` descriptor, plus child
//! vertices named `{table}_header_c{col}` and `{table}_r{row}_c{col}`. Child geometry is relative
//! to the container: the header row sits at `y = 0`, data row `r` at `y = (r + 1) * cellHeight`,
//! column `c` at `x = c * cellWidth`. The container is always `columns * cellWidth` wide and
//! `(rows + 1) * cellHeight` tall.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ErrorCategory;
use crate::model::{
    parse_style, CellId, CellModel, CustomData, Geometry, ModelError, Style, VertexSpec,
};

mod edit;

pub use edit::{
    insert_column, insert_row, link_to_cell, remove_column, remove_row, rename_column,
    update_cell,
};

pub const TABLE_DATA_KEY: &str = "table";
pub const DEFAULT_CELL_WIDTH: f64 = 120.0;
pub const DEFAULT_CELL_HEIGHT: f64 = 30.0;
/// Rows a table may hold beyond what its container height declares, for partially edited tables.
pub const MAX_STRAY_ROWS: usize = 1024;
const MAX_TABLE_ROWS: usize = 1 << 20;

const CONTAINER_STYLE: &str = "container=1;collapsible=0;";
const HEADER_STYLE: &str = "fontStyle=1;fillColor=#dae8fc;";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("table headers must not be empty")]
    EmptyHeaders,
    #[error("table '{table_id}' not found")]
    TableNotFound { table_id: String },
    #[error("vertex '{table_id}' carries no table descriptor")]
    NotATable { table_id: String },
    #[error("column '{column}' not found in table '{table_id}'")]
    ColumnNotFound { table_id: String, column: String },
    #[error("column index {index} out of range (columns={len})")]
    ColumnOutOfRange { index: usize, len: usize },
    #[error("row index {index} out of range (rows={len})")]
    RowOutOfRange { index: usize, len: usize },
    #[error("row has {found} values but the table has {expected} columns")]
    RowWidthMismatch { expected: usize, found: usize },
    #[error("cannot remove the only column of table '{table_id}'")]
    LastColumn { table_id: String },
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TableError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TableNotFound { .. } | Self::NotATable { .. } | Self::ColumnNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::EmptyHeaders
            | Self::ColumnOutOfRange { .. }
            | Self::RowOutOfRange { .. }
            | Self::RowWidthMismatch { .. }
            | Self::LastColumn { .. } => ErrorCategory::InvalidArgument,
            Self::Model(err) => err.category(),
        }
    }
}

/// Table metadata stored on the container under [`TABLE_DATA_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    pub columns: Vec<String>,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl TableDescriptor {
    /// Reads the descriptor out of a container's custom data, if present and well-formed.
    pub fn from_custom_data(data: &CustomData) -> Option<Self> {
        let value = data.get(TABLE_DATA_KEY)?;
        serde_json::from_value(value.clone()).ok()
    }

    fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "columns": self.columns,
            "cellWidth": self.cell_width,
            "cellHeight": self.cell_height,
        })
    }

    fn container_size(&self, row_count: usize) -> (f64, f64) {
        (
            self.columns.len() as f64 * self.cell_width,
            (row_count + 1) as f64 * self.cell_height,
        )
    }

    /// Data rows the container height accounts for.
    fn declared_rows(&self, container_height: f64) -> usize {
        let rows = container_height / self.cell_height - 1.0;
        if rows.is_finite() && rows > 0.0 {
            // float to int casts saturate
            (rows.round() as usize).min(MAX_TABLE_ROWS)
        } else {
            0
        }
    }

    fn header_geometry(&self, col: usize) -> Geometry {
        Geometry::new(col as f64 * self.cell_width, 0.0, self.cell_width, self.cell_height)
    }

    fn data_geometry(&self, row: usize, col: usize) -> Geometry {
        Geometry::new(
            col as f64 * self.cell_width,
            (row + 1) as f64 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }
}

/// Column addressed by its header text or its zero-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

pub fn header_cell_id(table_id: &str, col: usize) -> CellId {
    CellId::derived(format!("{table_id}_header_c{col}"))
}

pub fn data_cell_id(table_id: &str, row: usize, col: usize) -> CellId {
    CellId::derived(format!("{table_id}_r{row}_c{col}"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub x: f64,
    pub y: f64,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub cell_width: f64,
    pub cell_height: f64,
    pub title: Option<String>,
    pub custom_data: CustomData,
}

impl TableSpec {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            title: None,
            custom_data: CustomData::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn row<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn cell_size(mut self, width: f64, height: f64) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn custom_data(mut self, custom_data: CustomData) -> Self {
        self.custom_data = custom_data;
        self
    }
}

/// A table as reconstructed from its cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub id: CellId,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Container custom data without the table descriptor.
    pub custom_data: CustomData,
}

impl TableData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub(crate) fn descriptor(&self) -> TableDescriptor {
        TableDescriptor {
            columns: self.columns.clone(),
            cell_width: self.cell_width,
            cell_height: self.cell_height,
        }
    }

    /// Resolves a column reference against the current headers.
    pub fn resolve_column(&self, column: &ColumnRef) -> Result<usize, TableError> {
        match column {
            ColumnRef::Name(name) => {
                self.column_index(name).ok_or_else(|| TableError::ColumnNotFound {
                    table_id: self.id.to_string(),
                    column: name.clone(),
                })
            }
            ColumnRef::Index(index) if *index < self.columns.len() => Ok(*index),
            ColumnRef::Index(index) => {
                Err(TableError::ColumnOutOfRange { index: *index, len: self.columns.len() })
            }
        }
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<(), TableError> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(TableError::RowOutOfRange { index: row, len: self.rows.len() })
        }
    }
}

pub(crate) fn add_header_cell(
    model: &mut CellModel,
    table_id: &str,
    descriptor: &TableDescriptor,
    col: usize,
    text: &str,
) -> Result<(), ModelError> {
    let geometry = descriptor.header_geometry(col);
    let style = parse_style(HEADER_STYLE);
    add_child(model, table_id, header_cell_id(table_id, col), geometry, text, Some(style))
}

pub(crate) fn add_data_cell(
    model: &mut CellModel,
    table_id: &str,
    descriptor: &TableDescriptor,
    row: usize,
    col: usize,
    text: &str,
) -> Result<(), ModelError> {
    let geometry = descriptor.data_geometry(row, col);
    add_child(model, table_id, data_cell_id(table_id, row, col), geometry, text, None)
}

fn add_child(
    model: &mut CellModel,
    table_id: &str,
    cell_id: CellId,
    geometry: Geometry,
    text: &str,
    style: Option<Style>,
) -> Result<(), ModelError> {
    let mut spec = VertexSpec::new(text, geometry.x, geometry.y)
        .parent(table_id)
        .size(geometry.width, geometry.height);
    spec.style = style;
    model.add_vertex(cell_id.as_str(), spec)?;
    Ok(())
}

/// Writes the descriptor back and re-establishes the container size invariant.
pub(crate) fn store_descriptor(
    model: &mut CellModel,
    table_id: &str,
    descriptor: &TableDescriptor,
    row_count: usize,
) -> Result<(), TableError> {
    let Some(container) = model.cell_mut(table_id) else {
        return Err(TableError::TableNotFound { table_id: table_id.to_owned() });
    };

    let mut data = container.custom_data().cloned().unwrap_or_default();
    data.insert(TABLE_DATA_KEY.to_owned(), descriptor.to_value());
    container.set_custom_data(Some(data));

    let (width, height) = descriptor.container_size(row_count);
    if let Some(geometry) = container.geometry_mut() {
        geometry.width = width;
        geometry.height = height;
    }
    Ok(())
}

/// Creates a container vertex plus one header cell per column and one data cell per
/// `(row, column)`. Short rows are padded with empty cells.
pub fn create_table(
    model: &mut CellModel,
    table_id: &str,
    spec: TableSpec,
) -> Result<TableData, TableError> {
    if spec.headers.is_empty() {
        return Err(TableError::EmptyHeaders);
    }

    let descriptor = TableDescriptor {
        columns: spec.headers.clone(),
        cell_width: spec.cell_width,
        cell_height: spec.cell_height,
    };
    let (width, height) = descriptor.container_size(spec.rows.len());

    let mut data = spec.custom_data;
    data.insert(TABLE_DATA_KEY.to_owned(), descriptor.to_value());

    let container = VertexSpec::new(spec.title.unwrap_or_default(), spec.x, spec.y)
        .size(width, height)
        .style(parse_style(CONTAINER_STYLE))
        .custom_data(data);
    model.add_vertex(table_id, container)?;

    for (col, header) in descriptor.columns.iter().enumerate() {
        add_header_cell(model, table_id, &descriptor, col, header)?;
    }
    for (row, values) in spec.rows.iter().enumerate() {
        for col in 0..descriptor.columns.len() {
            let text = values.get(col).map(String::as_str).unwrap_or("");
            add_data_cell(model, table_id, &descriptor, row, col, text)?;
        }
    }

    debug!(
        table_id,
        columns = descriptor.columns.len(),
        rows = spec.rows.len(),
        "table created"
    );
    read_table(model, table_id)
}

/// Matches `{table}_r{row}_c{col}` ids for one table.
pub(crate) fn data_cell_pattern(table_id: &str) -> Regex {
    let pattern = format!(r"^{}_r(\d+)_c(\d+)$", regex::escape(table_id));
    Regex::new(&pattern).expect("escaped table id forms a valid regex")
}

/// Reconstructs a table from its container descriptor and whatever data cells exist. Rows are
/// filled up to the highest row index seen; missing cells read as empty strings. Cells more than
/// [`MAX_STRAY_ROWS`] rows past the container's height are ignored.
pub fn read_table(model: &CellModel, table_id: &str) -> Result<TableData, TableError> {
    let Some(container) = model.cell(table_id).filter(|cell| cell.is_vertex()) else {
        return Err(TableError::TableNotFound { table_id: table_id.to_owned() });
    };
    let Some(descriptor) = container.custom_data().and_then(TableDescriptor::from_custom_data)
    else {
        return Err(TableError::NotATable { table_id: table_id.to_owned() });
    };

    let geometry = container.geometry().copied().unwrap_or_default();
    let row_limit = descriptor.declared_rows(geometry.height).saturating_add(MAX_STRAY_ROWS);

    let pattern = data_cell_pattern(table_id);
    let mut found = Vec::<(usize, usize, &str)>::new();
    let mut row_count = 0usize;
    for cell in model.vertices() {
        let Some(captures) = pattern.captures(cell.id().as_str()) else {
            continue;
        };
        let (Ok(row), Ok(col)) = (captures[1].parse::<usize>(), captures[2].parse::<usize>())
        else {
            continue;
        };
        if row >= row_limit {
            warn!(table_id, cell_id = %cell.id(), row_limit, "table cell beyond the table ignored");
            continue;
        }
        row_count = row_count.max(row + 1);
        found.push((row, col, cell.label()));
    }

    let column_count = descriptor.columns.len();
    let mut rows = vec![vec![String::new(); column_count]; row_count];
    for (row, col, text) in found {
        if col < column_count {
            rows[row][col] = text.to_owned();
        }
    }

    let mut custom_data = container.custom_data().cloned().unwrap_or_default();
    custom_data.remove(TABLE_DATA_KEY);

    Ok(TableData {
        id: container.id().clone(),
        title: container.label().to_owned(),
        x: geometry.x,
        y: geometry.y,
        columns: descriptor.columns,
        rows,
        cell_width: descriptor.cell_width,
        cell_height: descriptor.cell_height,
        custom_data,
    })
}

/// True when the vertex carries a well-formed table descriptor.
pub fn is_table(model: &CellModel, id: &str) -> bool {
    model
        .cell(id)
        .and_then(|cell| cell.custom_data())
        .and_then(TableDescriptor::from_custom_data)
        .is_some()
}

#[cfg(test)]
mod tests;
