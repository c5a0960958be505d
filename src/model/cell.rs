// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use super::ids::CellId;
use super::style::Style;

/// Opaque per-cell payload. Stored as JSON text on the serialized cell.
pub type CustomData = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellKind {
    Vertex { geometry: Geometry },
    Edge { source: CellId, target: CellId },
}

/// A vertex or an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: CellId,
    label: String,
    style: Style,
    parent: CellId,
    kind: CellKind,
    custom_data: Option<CustomData>,
}

impl Cell {
    pub fn vertex(id: CellId, parent: CellId, label: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id,
            label: label.into(),
            style: Style::new(),
            parent,
            kind: CellKind::Vertex { geometry },
            custom_data: None,
        }
    }

    pub fn edge(id: CellId, parent: CellId, source: CellId, target: CellId) -> Self {
        Self {
            id,
            label: String::new(),
            style: Style::new(),
            parent,
            kind: CellKind::Edge { source, target },
            custom_data: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_custom_data(mut self, custom_data: Option<CustomData>) -> Self {
        self.custom_data = custom_data;
        self
    }

    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: CellId) {
        self.id = id;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn parent(&self) -> &CellId {
        &self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: CellId) {
        self.parent = parent;
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self.kind, CellKind::Vertex { .. })
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, CellKind::Edge { .. })
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            CellKind::Vertex { geometry } => Some(geometry),
            CellKind::Edge { .. } => None,
        }
    }

    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.kind {
            CellKind::Vertex { geometry } => Some(geometry),
            CellKind::Edge { .. } => None,
        }
    }

    /// `(source, target)` for edges.
    pub fn endpoints(&self) -> Option<(&CellId, &CellId)> {
        match &self.kind {
            CellKind::Edge { source, target } => Some((source, target)),
            CellKind::Vertex { .. } => None,
        }
    }

    pub(crate) fn endpoints_mut(&mut self) -> Option<(&mut CellId, &mut CellId)> {
        match &mut self.kind {
            CellKind::Edge { source, target } => Some((source, target)),
            CellKind::Vertex { .. } => None,
        }
    }

    pub fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }

    pub fn custom_data_mut(&mut self) -> Option<&mut CustomData> {
        self.custom_data.as_mut()
    }

    pub fn set_custom_data(&mut self, custom_data: Option<CustomData>) {
        self.custom_data = custom_data;
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Geometry};
    use crate::model::CellId;

    #[test]
    fn vertex_exposes_geometry_and_no_endpoints() {
        let mut cell = Cell::vertex(
            CellId::new("a").expect("id"),
            CellId::new("1").expect("layer id"),
            "A",
            Geometry::new(1.0, 2.0, 3.0, 4.0),
        );
        assert!(cell.is_vertex());
        assert!(cell.endpoints().is_none());

        cell.geometry_mut().expect("geometry").x = 10.0;
        assert_eq!(cell.geometry(), Some(&Geometry::new(10.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn edge_exposes_endpoints_and_no_geometry() {
        let cell = Cell::edge(
            CellId::new("a-2-b").expect("id"),
            CellId::new("1").expect("layer id"),
            CellId::new("a").expect("source"),
            CellId::new("b").expect("target"),
        );
        assert!(cell.is_edge());
        assert!(cell.geometry().is_none());
        let (source, target) = cell.endpoints().expect("endpoints");
        assert_eq!((source.as_str(), target.as_str()), ("a", "b"));
    }
}
