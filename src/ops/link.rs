// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edge identity: deterministic edge ids and find-or-update-or-create linking.

use tracing::debug;

use crate::model::graph::derived_edge_id;
use crate::model::{CellId, CellModel, ModelError, Style};

/// The three ids an edge between two vertices may be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIds {
    pub direct: CellId,
    pub reverse: CellId,
    /// Lexicographically ordered pair; used for undirected edges.
    pub canonical: CellId,
}

pub fn edge_ids(from_id: &str, to_id: &str) -> EdgeIds {
    let (low, high) = if from_id <= to_id { (from_id, to_id) } else { (to_id, from_id) };
    EdgeIds {
        direct: derived_edge_id(from_id, to_id),
        reverse: derived_edge_id(to_id, from_id),
        canonical: derived_edge_id(low, high),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkOptions {
    pub label: Option<String>,
    pub style: Option<Style>,
    pub undirected: bool,
}

impl LinkOptions {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn undirected(mut self) -> Self {
        self.undirected = true;
        self
    }
}

/// Base connector style merged under caller overrides: straight segments, no automatic routing,
/// orthogonal ports, HTML labels.
pub fn base_edge_style() -> Style {
    [("edgeStyle", "none"), ("noEdgeStyle", "1"), ("orthogonal", "1"), ("html", "1")]
        .into_iter()
        .collect()
}

/// Effective connector style. `undirected` strips both arrowheads and discards any `reverse`
/// override.
pub fn edge_style(overrides: Option<&Style>, undirected: bool) -> Style {
    let mut style = base_edge_style();
    if let Some(overrides) = overrides {
        style.merge(overrides);
    }
    if undirected {
        style.set("startArrow", "none");
        style.set("endArrow", "none");
        style.remove("reverse");
    }
    style
}

/// Links two vertices, reusing an existing edge stored under the direct, reverse or canonical id
/// (checked in that order). An existing edge keeps its id and only gets its label (when given) and
/// style rewritten. New edges use the canonical id when undirected, the direct id otherwise.
pub fn link_vertices(
    model: &mut CellModel,
    from_id: &str,
    to_id: &str,
    options: LinkOptions,
) -> Result<CellId, ModelError> {
    for endpoint in [from_id, to_id] {
        if !model.contains_vertex(endpoint) {
            return Err(ModelError::vertex_not_found(endpoint));
        }
    }

    let ids = edge_ids(from_id, to_id);
    let style = edge_style(options.style.as_ref(), options.undirected);

    let existing = [&ids.direct, &ids.reverse, &ids.canonical]
        .into_iter()
        .find(|id| model.edge(id.as_str()).is_some())
        .cloned();

    if let Some(edge_id) = existing {
        if let Some(edge) = model.cell_mut(edge_id.as_str()) {
            if let Some(label) = options.label {
                edge.set_label(label);
            }
            edge.set_style(style);
        }
        debug!(edge_id = %edge_id, "edge upserted");
        return Ok(edge_id);
    }

    let edge_id = if options.undirected { ids.canonical } else { ids.direct };
    model.add_edge(edge_id.as_str(), from_id, to_id, options.label, style)?;
    Ok(edge_id)
}
