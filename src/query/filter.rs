// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Deserialize;

use crate::model::{normalize_kind, CellModel, CustomData, VertexInfo};
use crate::table::{is_table, read_table, TableData, TABLE_DATA_KEY};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VertexFilter {
    pub id: Option<String>,
    /// Case-sensitive substring of the id.
    pub id_contains: Option<String>,
    pub label: Option<String>,
    /// Case-insensitive substring of the label.
    pub label_contains: Option<String>,
    /// Kind name; misspelled aliases are normalized first.
    pub kind: Option<String>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    /// Every key must be present on the candidate with an equal value.
    pub data: Option<CustomData>,
}

impl VertexFilter {
    pub fn id_contains(mut self, needle: impl Into<String>) -> Self {
        self.id_contains = Some(needle.into());
        self
    }

    pub fn label_contains(mut self, needle: impl Into<String>) -> Self {
        self.label_contains = Some(needle.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn x_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.x_min = min;
        self.x_max = max;
        self
    }

    pub fn y_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.y_min = min;
        self.y_max = max;
        self
    }

    pub fn data(mut self, data: CustomData) -> Self {
        self.data = Some(data);
        self
    }

    fn matches(&self, info: &VertexInfo, custom_data: Option<&CustomData>) -> bool {
        if self.id.as_deref().is_some_and(|id| info.id != id) {
            return false;
        }
        if self.id_contains.as_deref().is_some_and(|needle| !info.id.as_str().contains(needle)) {
            return false;
        }
        if self.label.as_deref().is_some_and(|label| info.label != label) {
            return false;
        }
        if let Some(needle) = self.label_contains.as_deref() {
            if !info.label.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if self.kind.as_deref().is_some_and(|kind| normalize_kind(kind) != info.kind.name()) {
            return false;
        }
        if !in_range(info.x, self.x_min, self.x_max) || !in_range(info.y, self.y_min, self.y_max) {
            return false;
        }
        match &self.data {
            None => true,
            Some(wanted) => custom_data.is_some_and(|have| is_subset(wanted, have)),
        }
    }
}

fn in_range(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

fn is_subset(wanted: &CustomData, have: &CustomData) -> bool {
    wanted.iter().all(|(key, value)| have.get(key) == Some(value))
}

pub fn find_vertices(model: &CellModel, filter: &VertexFilter) -> Vec<VertexInfo> {
    model
        .list_vertices()
        .into_iter()
        .filter(|info| filter.matches(info, info.custom_data.as_ref()))
        .collect()
}

/// Table search: the vertex predicates apply to the container (the label predicates match the
/// title) plus the table-only predicates below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableFilter {
    #[serde(flatten)]
    pub vertex: VertexFilter,
    pub has_column: Option<String>,
    pub min_rows: Option<usize>,
    pub max_rows: Option<usize>,
}

impl TableFilter {
    pub fn has_column(mut self, column: impl Into<String>) -> Self {
        self.has_column = Some(column.into());
        self
    }

    pub fn rows(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_rows = min;
        self.max_rows = max;
        self
    }

    fn matches_table(&self, table: &TableData) -> bool {
        let rows = table.row_count();
        self.has_column.as_deref().map_or(true, |column| table.column_index(column).is_some())
            && self.min_rows.map_or(true, |min| rows >= min)
            && self.max_rows.map_or(true, |max| rows <= max)
    }
}

/// Finds every well-formed table whose container and contents satisfy the filter. The table
/// descriptor key never takes part in data matching.
pub fn find_tables(model: &CellModel, filter: &TableFilter) -> Vec<TableData> {
    model
        .vertices()
        .filter(|cell| is_table(model, cell.id().as_str()))
        .filter_map(|cell| {
            let mut info = model.vertex_info(cell.id().as_str())?;
            if let Some(data) = info.custom_data.as_mut() {
                data.remove(TABLE_DATA_KEY);
            }
            if !filter.vertex.matches(&info, info.custom_data.as_ref()) {
                return None;
            }
            let table = read_table(model, cell.id().as_str()).ok()?;
            filter.matches_table(&table).then_some(table)
        })
        .collect()
}
