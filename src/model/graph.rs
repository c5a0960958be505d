// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::cell::{Cell, CustomData, Geometry};
use super::ids::{CellId, IdError};
use super::kind::{apply_corner_radius, corner_radius, infer_kind, resolve_kind, ShapeKind};
use super::kind::UnknownKind;
use super::style::Style;
use crate::error::ErrorCategory;

/// Id of the model's root cell.
pub const ROOT_ID: &str = "0";
/// Id of the default layer every top-level cell hangs off.
pub const LAYER_ID: &str = "1";
/// Caller-facing name for the default container.
pub const ROOT_PARENT: &str = "root";

pub(crate) const EDGE_ID_SEPARATOR: &str = "-2-";

/// The id an edge from `source` to `target` is stored under by the linking protocol.
pub(crate) fn derived_edge_id(source: &str, target: &str) -> CellId {
    CellId::derived(format!("{source}{EDGE_ID_SEPARATOR}{target}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Cell,
    Vertex,
    Edge,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cell => "cell",
            Self::Vertex => "vertex",
            Self::Edge => "edge",
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid id for {field}: {source}")]
    InvalidId {
        field: &'static str,
        #[source]
        source: IdError,
    },
    #[error("id '{id}' is reserved")]
    ReservedId { id: String },
    #[error("cell '{id}' already exists")]
    AlreadyExists { id: CellId },
    #[error("{kind} not found (id={id})")]
    NotFound { kind: ObjectKind, id: String },
    #[error("parent vertex '{parent_id}' does not exist")]
    MissingParent { parent_id: String },
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),
}

impl ModelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MissingParent { .. } => ErrorCategory::Reference,
            Self::InvalidId { .. }
            | Self::ReservedId { .. }
            | Self::AlreadyExists { .. }
            | Self::UnknownKind(_) => ErrorCategory::InvalidArgument,
        }
    }

    pub(crate) fn vertex_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { kind: ObjectKind::Vertex, id: id.into() }
    }
}

pub(crate) fn cell_id(field: &'static str, raw: &str) -> Result<CellId, ModelError> {
    CellId::new(raw).map_err(|source| ModelError::InvalidId { field, source })
}

pub(crate) fn layer_id() -> CellId {
    CellId::derived(LAYER_ID.to_owned())
}

fn is_reserved(id: &str) -> bool {
    id == ROOT_ID || id == LAYER_ID || id == ROOT_PARENT
}

/// Everything needed to create a vertex. `kind` defaults to `rectangle`; `width`/`height` and
/// `style` override the kind template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexSpec {
    pub label: String,
    pub parent_id: Option<String>,
    pub kind: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub corner_radius: Option<f64>,
    pub custom_data: Option<CustomData>,
    pub style: Option<Style>,
}

impl VertexSpec {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self { label: label.into(), x, y, ..Self::default() }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn custom_data(mut self, custom_data: CustomData) -> Self {
        self.custom_data = Some(custom_data);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

/// How an edit treats the vertex's custom data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataPatch {
    #[default]
    Keep,
    /// Drop all custom data.
    Clear,
    /// Shallow merge; patch values win on shared keys.
    Merge(CustomData),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexPatch {
    pub label: Option<String>,
    pub kind: Option<String>,
    pub corner_radius: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub custom_data: DataPatch,
}

/// Read-side projection of a vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexInfo {
    pub id: CellId,
    pub label: String,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub parent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// The in-memory graph store: vertices and edges keyed by id, in insertion order.
///
/// The root (`"0"`) and default layer (`"1"`) cells are implicit; they are written on export and
/// never stored or listed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellModel {
    cells: IndexMap<CellId, Cell>,
}

impl CellModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub(crate) fn cell_mut(&mut self, id: &str) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cells.contains_key(id)
    }

    pub fn contains_vertex(&self, id: &str) -> bool {
        self.cell(id).is_some_and(Cell::is_vertex)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(|cell| cell.is_vertex())
    }

    pub fn edges(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(|cell| cell.is_edge())
    }

    pub fn edge(&self, id: &str) -> Option<&Cell> {
        self.cell(id).filter(|cell| cell.is_edge())
    }

    /// Inserts a fully-formed cell, as read back from a serialized model. Endpoint and parent
    /// references are not checked here.
    pub(crate) fn insert_cell(&mut self, cell: Cell) -> Result<(), ModelError> {
        if is_reserved(cell.id().as_str()) {
            return Err(ModelError::ReservedId { id: cell.id().to_string() });
        }
        if self.cells.contains_key(cell.id()) {
            return Err(ModelError::AlreadyExists { id: cell.id().clone() });
        }
        self.cells.insert(cell.id().clone(), cell);
        Ok(())
    }

    fn check_new_id(&self, field: &'static str, raw: &str) -> Result<CellId, ModelError> {
        let id = cell_id(field, raw)?;
        if is_reserved(raw) {
            return Err(ModelError::ReservedId { id: raw.to_owned() });
        }
        if self.cells.contains_key(raw) {
            return Err(ModelError::AlreadyExists { id });
        }
        Ok(id)
    }

    /// Resolves a caller-supplied parent. `None`, `"root"` and the reserved ids map onto the
    /// default layer; anything else must be an existing vertex.
    pub fn resolve_parent(&self, parent_id: Option<&str>) -> Result<CellId, ModelError> {
        match parent_id {
            None => Ok(layer_id()),
            Some(raw) if is_reserved(raw) => Ok(layer_id()),
            Some(raw) => match self.cells.get(raw) {
                Some(cell) if cell.is_vertex() => Ok(cell.id().clone()),
                _ => Err(ModelError::MissingParent { parent_id: raw.to_owned() }),
            },
        }
    }

    pub fn add_vertex(&mut self, id: &str, spec: VertexSpec) -> Result<&Cell, ModelError> {
        let parent = self.resolve_parent(spec.parent_id.as_deref())?;
        let id = self.check_new_id("vertex id", id)?;
        let kind = resolve_kind(spec.kind.as_deref().unwrap_or("rectangle"))?;

        let mut style = kind.default_style();
        if let Some(overrides) = spec.style.as_ref() {
            style.merge(overrides);
        }
        if kind == ShapeKind::RoundedRectangle {
            apply_corner_radius(&mut style, spec.corner_radius);
        }

        let (default_width, default_height) = kind.default_size();
        let geometry = Geometry::new(
            spec.x,
            spec.y,
            spec.width.unwrap_or(default_width),
            spec.height.unwrap_or(default_height),
        );

        let cell = Cell::vertex(id.clone(), parent, spec.label, geometry)
            .with_style(style)
            .with_custom_data(spec.custom_data);

        debug!(vertex_id = %id, kind = %kind, "vertex added");
        let (index, _) = self.cells.insert_full(id, cell);
        Ok(&self.cells[index])
    }

    pub fn edit_vertex(&mut self, id: &str, patch: VertexPatch) -> Result<&Cell, ModelError> {
        let new_kind = patch.kind.as_deref().map(resolve_kind).transpose()?;

        let Some(cell) = self.cells.get_mut(id).filter(|cell| cell.is_vertex()) else {
            return Err(ModelError::vertex_not_found(id));
        };

        if let Some(label) = patch.label {
            cell.set_label(label);
        }

        match new_kind {
            Some(kind) => {
                let mut style = kind.default_style();
                if kind == ShapeKind::RoundedRectangle {
                    apply_corner_radius(&mut style, patch.corner_radius);
                }
                cell.set_style(style);
            }
            None => {
                if patch.corner_radius.is_some()
                    && infer_kind(cell.style()) == ShapeKind::RoundedRectangle
                {
                    apply_corner_radius(cell.style_mut(), patch.corner_radius);
                }
            }
        }

        if let Some(geometry) = cell.geometry_mut() {
            if let Some(x) = patch.x {
                geometry.x = x;
            }
            if let Some(y) = patch.y {
                geometry.y = y;
            }
            if let Some(width) = patch.width {
                geometry.width = width;
            }
            if let Some(height) = patch.height {
                geometry.height = height;
            }
        }

        match patch.custom_data {
            DataPatch::Keep => {}
            DataPatch::Clear => cell.set_custom_data(None),
            DataPatch::Merge(data) => {
                let mut merged = cell.custom_data().cloned().unwrap_or_default();
                merged.extend(data);
                cell.set_custom_data(Some(merged));
            }
        }

        debug!(vertex_id = %id, "vertex edited");
        Ok(&*cell)
    }

    /// Removes the given cells and every cell below them in the parent tree. Edges whose
    /// endpoints disappear are left in place; see [`CellModel::prune_dangling_edges`].
    pub fn remove_vertices<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<Vec<CellId>, ModelError> {
        let mut doomed = BTreeSet::<CellId>::new();
        for raw in ids {
            let raw = raw.as_ref();
            let Some(cell) = self.cells.get(raw) else {
                return Err(ModelError::NotFound { kind: ObjectKind::Cell, id: raw.to_owned() });
            };
            doomed.insert(cell.id().clone());
        }

        loop {
            let before = doomed.len();
            for cell in self.cells.values() {
                if doomed.contains(cell.parent()) {
                    doomed.insert(cell.id().clone());
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let removed = self
            .cells
            .keys()
            .filter(|id| doomed.contains(*id))
            .cloned()
            .collect::<Vec<_>>();
        self.cells.retain(|id, _| !doomed.contains(id));
        debug!(count = removed.len(), "cells removed");
        Ok(removed)
    }

    /// Drops edges whose source or target no longer resolves to a vertex.
    pub fn prune_dangling_edges(&mut self) -> Vec<CellId> {
        let dangling = self
            .edges()
            .filter(|edge| {
                edge.endpoints().is_some_and(|(source, target)| {
                    !self.contains_vertex(source.as_str()) || !self.contains_vertex(target.as_str())
                })
            })
            .map(|edge| edge.id().clone())
            .collect::<Vec<_>>();
        for id in &dangling {
            self.cells.shift_remove(id);
        }
        dangling
    }

    /// Inserts an edge between two existing vertices. No identity rules are applied here; use
    /// [`crate::ops::link_vertices`] for deduplicated connections.
    pub fn add_edge(
        &mut self,
        id: &str,
        source: &str,
        target: &str,
        label: Option<String>,
        style: Style,
    ) -> Result<&Cell, ModelError> {
        let id = self.check_new_id("edge id", id)?;
        let source = self.existing_vertex_id(source)?;
        let target = self.existing_vertex_id(target)?;

        let mut cell = Cell::edge(id.clone(), layer_id(), source, target).with_style(style);
        if let Some(label) = label {
            cell.set_label(label);
        }

        debug!(edge_id = %id, "edge added");
        let (index, _) = self.cells.insert_full(id, cell);
        Ok(&self.cells[index])
    }

    fn existing_vertex_id(&self, raw: &str) -> Result<CellId, ModelError> {
        match self.cells.get(raw) {
            Some(cell) if cell.is_vertex() => Ok(cell.id().clone()),
            _ => Err(ModelError::vertex_not_found(raw)),
        }
    }

    /// Renames cells in two phases: all new ids are computed and checked first, then the map is
    /// rebuilt in one pass so no intermediate state holds duplicate keys. `parent`, `source` and
    /// `target` references follow the rename, as do derived edge ids; cell order is preserved.
    pub fn rename_cells(&mut self, renames: &[(CellId, CellId)]) -> Result<(), ModelError> {
        if renames.is_empty() {
            return Ok(());
        }

        let mut mapping = renames.iter().cloned().collect::<HashMap<CellId, CellId>>();
        let mut targets = BTreeSet::new();
        for (from, to) in renames {
            if !self.cells.contains_key(from) {
                return Err(ModelError::NotFound { kind: ObjectKind::Cell, id: from.to_string() });
            }
            if is_reserved(to.as_str()) {
                return Err(ModelError::ReservedId { id: to.to_string() });
            }
            let occupied_by_stayer = self.cells.contains_key(to) && !mapping.contains_key(to);
            if occupied_by_stayer || !targets.insert(to.clone()) {
                return Err(ModelError::AlreadyExists { id: to.clone() });
            }
        }

        for (from, to) in self.edge_rekeys(&mapping, &targets) {
            mapping.insert(from, to);
        }

        let remap = |id: &CellId| mapping.get(id).cloned();
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .map(|(id, mut cell)| {
                let id = match remap(&id) {
                    Some(new_id) => {
                        cell.set_id(new_id.clone());
                        new_id
                    }
                    None => id,
                };
                if let Some(parent) = remap(cell.parent()) {
                    cell.set_parent(parent);
                }
                if let Some((source, target)) = cell.endpoints_mut() {
                    if let Some(new_source) = remap(source) {
                        *source = new_source;
                    }
                    if let Some(new_target) = remap(target) {
                        *target = new_target;
                    }
                }
                (id, cell)
            })
            .collect();

        debug!(count = renames.len(), "cells renamed");
        Ok(())
    }

    /// Edges stored under `{source}-2-{target}` (or the reversed pair) whose endpoints are being
    /// renamed move to the id derived from the new endpoints, so later links find them by their
    /// current endpoints. An edge whose new id is held by a cell that stays keeps its old id.
    fn edge_rekeys(
        &self,
        mapping: &HashMap<CellId, CellId>,
        targets: &BTreeSet<CellId>,
    ) -> Vec<(CellId, CellId)> {
        let renamed = |id: &CellId| mapping.get(id).unwrap_or(id).clone();
        let mut rekeys = self
            .edges()
            .filter(|edge| !mapping.contains_key(edge.id()))
            .filter_map(|edge| {
                let (source, target) = edge.endpoints()?;
                if !mapping.contains_key(source) && !mapping.contains_key(target) {
                    return None;
                }
                let (new_source, new_target) = (renamed(source), renamed(target));
                let id = edge.id();
                let new_id = if *id == derived_edge_id(source.as_str(), target.as_str()) {
                    derived_edge_id(new_source.as_str(), new_target.as_str())
                } else if *id == derived_edge_id(target.as_str(), source.as_str()) {
                    derived_edge_id(new_target.as_str(), new_source.as_str())
                } else {
                    return None;
                };
                (new_id != *id).then(|| (id.clone(), new_id))
            })
            .collect::<Vec<_>>();

        // dropping one rekey can block another that expected its slot to free up
        loop {
            let moving = mapping
                .keys()
                .chain(rekeys.iter().map(|(from, _)| from))
                .cloned()
                .collect::<BTreeSet<_>>();
            let mut claimed = targets.clone();
            let before = rekeys.len();
            rekeys.retain(|(_, to)| {
                let held_by_stayer = self.cells.contains_key(to) && !moving.contains(to);
                !held_by_stayer && claimed.insert(to.clone())
            });
            if rekeys.len() == before {
                return rekeys;
            }
        }
    }

    pub fn vertex_info(&self, id: &str) -> Option<VertexInfo> {
        self.cell(id).and_then(vertex_info)
    }

    pub fn list_vertices(&self) -> Vec<VertexInfo> {
        self.vertices().filter_map(vertex_info).collect()
    }
}

fn vertex_info(cell: &Cell) -> Option<VertexInfo> {
    let geometry = cell.geometry()?;
    let kind = infer_kind(cell.style());
    let parent_id = if cell.parent().as_str() == LAYER_ID {
        ROOT_PARENT.to_owned()
    } else {
        cell.parent().to_string()
    };

    Some(VertexInfo {
        id: cell.id().clone(),
        label: cell.label().to_owned(),
        kind,
        x: geometry.x,
        y: geometry.y,
        width: geometry.width,
        height: geometry.height,
        parent_id,
        corner_radius: (kind == ShapeKind::RoundedRectangle)
            .then(|| corner_radius(cell.style()))
            .flatten(),
        custom_data: cell.custom_data().cloned(),
    })
}
