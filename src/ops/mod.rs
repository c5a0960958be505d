// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations over a cell model.
//!
//! Single operations live on [`CellModel`] and in [`crate::table`]; this module adds edge
//! linking, cross-model copies, and batched application that reports a coarse delta.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::ErrorCategory;
use crate::model::{CellId, CellModel, ModelError, VertexPatch, VertexSpec};
use crate::table::{self, ColumnRef, TableError, TableSpec};

pub mod copy;
pub mod link;

pub use copy::{copy_table, copy_vertices, CopyOptions, CopyReport, CopyTableOptions};
pub use link::{base_edge_style, edge_ids, link_vertices, EdgeIds, LinkOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddVertex { vertex_id: String, spec: VertexSpec },
    EditVertex { vertex_id: String, patch: VertexPatch },
    RemoveVertices { ids: Vec<String> },
    Link { from_id: String, to_id: String, options: LinkOptions },
    CreateTable { table_id: String, spec: TableSpec },
    InsertColumn { table_id: String, header: String, position: Option<usize> },
    RenameColumn { table_id: String, old_name: String, new_name: String },
    RemoveColumn { table_id: String, column: ColumnRef },
    InsertRow { table_id: String, values: Vec<String>, position: Option<usize> },
    RemoveRow { table_id: String, row: usize },
    UpdateCell { table_id: String, row: usize, column: ColumnRef, value: String },
    LinkToCell {
        from_id: String,
        table_id: String,
        row: usize,
        column: ColumnRef,
        options: LinkOptions,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
}

/// Cells that changed as the result of applying ops.
///
/// Coarse by construction: it is a diff of the model before and after the batch, so a cell that
/// was changed and then changed back is not reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<CellId>,
    pub removed: Vec<CellId>,
    pub updated: Vec<CellId>,
}

impl Delta {
    pub fn between(before: &CellModel, after: &CellModel) -> Self {
        let mut added = BTreeSet::new();
        let mut updated = BTreeSet::new();
        for cell in after.cells() {
            match before.cell(cell.id().as_str()) {
                None => {
                    added.insert(cell.id().clone());
                }
                Some(old) if old != cell => {
                    updated.insert(cell.id().clone());
                }
                Some(_) => {}
            }
        }
        let removed = before
            .cells()
            .filter(|cell| !after.contains(cell.id().as_str()))
            .map(|cell| cell.id().clone())
            .collect::<BTreeSet<_>>();

        Self {
            added: added.into_iter().collect(),
            removed: removed.into_iter().collect(),
            updated: updated.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OpError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Table(#[from] TableError),
}

impl OpError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Model(err) => err.category(),
            Self::Table(err) => err.category(),
        }
    }
}

/// A failed batch: the zero-based index of the op that failed and why.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("op {index} failed: {source}")]
pub struct ApplyError {
    pub index: usize,
    #[source]
    pub source: OpError,
}

impl ApplyError {
    pub fn category(&self) -> ErrorCategory {
        self.source.category()
    }
}

pub fn apply_op(model: &mut CellModel, op: &Op) -> Result<(), OpError> {
    match op {
        Op::AddVertex { vertex_id, spec } => {
            model.add_vertex(vertex_id, spec.clone())?;
        }
        Op::EditVertex { vertex_id, patch } => {
            model.edit_vertex(vertex_id, patch.clone())?;
        }
        Op::RemoveVertices { ids } => {
            model.remove_vertices(ids.as_slice())?;
        }
        Op::Link { from_id, to_id, options } => {
            link_vertices(model, from_id, to_id, options.clone())?;
        }
        Op::CreateTable { table_id, spec } => {
            table::create_table(model, table_id, spec.clone())?;
        }
        Op::InsertColumn { table_id, header, position } => {
            table::insert_column(model, table_id, header, *position)?;
        }
        Op::RenameColumn { table_id, old_name, new_name } => {
            table::rename_column(model, table_id, old_name, new_name)?;
        }
        Op::RemoveColumn { table_id, column } => {
            table::remove_column(model, table_id, column.clone())?;
        }
        Op::InsertRow { table_id, values, position } => {
            table::insert_row(model, table_id, values, *position)?;
        }
        Op::RemoveRow { table_id, row } => {
            table::remove_row(model, table_id, *row)?;
        }
        Op::UpdateCell { table_id, row, column, value } => {
            table::update_cell(model, table_id, *row, column.clone(), value)?;
        }
        Op::LinkToCell { from_id, table_id, row, column, options } => {
            table::link_to_cell(model, from_id, table_id, *row, column.clone(), options.clone())?;
        }
    }
    Ok(())
}

/// Applies ops in order and stops at the first failure. Ops applied before the failing one stay
/// applied; use [`apply_ops_atomic`] for all-or-nothing batches.
pub fn apply_ops(model: &mut CellModel, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult { applied: 0, delta: Delta::default() });
    }

    let before = model.clone();
    for (index, op) in ops.iter().enumerate() {
        apply_op(model, op).map_err(|source| ApplyError { index, source })?;
    }

    let delta = Delta::between(&before, model);
    debug!(applied = ops.len(), added = delta.added.len(), "ops applied");
    Ok(ApplyResult { applied: ops.len(), delta })
}

/// Like [`apply_ops`], but restores the model to its previous state if any op fails.
pub fn apply_ops_atomic(model: &mut CellModel, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
    let snapshot = model.clone();
    apply_ops(model, ops).map_err(|err| {
        *model = snapshot;
        debug!(index = err.index, "batch rolled back");
        err
    })
}
