// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! cellgraph: diagram documents built from cells.
//!
//! A [`model::CellModel`] holds vertices and edges with ordered styles and opaque custom data.
//! On top of it sit typed shape kinds, idempotent edge linking ([`ops::link_vertices`]), tables
//! assembled from child cells ([`table`]), filtered search ([`query`]), and multi-page documents
//! whose untouched pages survive a save byte for byte ([`store`]).

pub mod error;
pub mod format;
pub mod layout;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
pub mod table;

pub use error::ErrorCategory;
