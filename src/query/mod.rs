// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only searches over a cell model.
//!
//! Filters are conjunctive: every predicate that is set must hold. Unset predicates match
//! everything, so `VertexFilter::default()` returns all vertices.

mod filter;

pub use filter::{find_tables, find_vertices, TableFilter, VertexFilter};
