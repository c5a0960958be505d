// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A [`CellModel`] holds vertices and edges (cells) keyed by id. Styles are ordered key-value maps
//! ([`Style`]) whose defaults come from the closed kind catalog ([`ShapeKind`]).

pub mod cell;
pub mod graph;
pub mod ids;
pub mod kind;
pub mod style;

pub use cell::{Cell, CellKind, CustomData, Geometry};
pub use graph::{
    CellModel, DataPatch, ModelError, ObjectKind, VertexInfo, VertexPatch, VertexSpec, LAYER_ID,
    ROOT_ID, ROOT_PARENT,
};
pub use ids::{CellId, Id, IdError, PageId};
pub use kind::{
    coerce_corner_radius, infer_kind, normalize_kind, resolve_kind, ShapeKind, UnknownKind,
    DEFAULT_CORNER_RADIUS,
};
pub use style::{parse_style, stringify_style, Style, StyleValue};
