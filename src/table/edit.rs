// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::{
    add_data_cell, add_header_cell, data_cell_id, header_cell_id, read_table, store_descriptor,
    ColumnRef, TableData, TableDescriptor, TableError,
};
use crate::model::{CellId, CellModel};
use crate::ops::link::{link_vertices, LinkOptions};

/// Collects the header and data cell ids of one column that are actually present.
fn column_cells(model: &CellModel, table: &TableData, col: usize) -> Vec<(Option<usize>, CellId)> {
    let table_id = table.id.as_str();
    std::iter::once((None, header_cell_id(table_id, col)))
        .chain((0..table.row_count()).map(|row| (Some(row), data_cell_id(table_id, row, col))))
        .filter(|(_, id)| model.contains(id.as_str()))
        .collect()
}

fn row_cells(model: &CellModel, table: &TableData, row: usize) -> Vec<(usize, CellId)> {
    let table_id = table.id.as_str();
    (0..table.columns.len())
        .map(|col| (col, data_cell_id(table_id, row, col)))
        .filter(|(_, id)| model.contains(id.as_str()))
        .collect()
}

/// Moves a column's cells to `to`, renaming ids and resetting relative geometry.
fn column_moves(
    model: &CellModel,
    table: &TableData,
    from: usize,
    to: usize,
) -> Vec<(CellId, CellId)> {
    let table_id = table.id.as_str();
    column_cells(model, table, from)
        .into_iter()
        .map(|(row, id)| {
            let new_id = match row {
                None => header_cell_id(table_id, to),
                Some(row) => data_cell_id(table_id, row, to),
            };
            (id, new_id)
        })
        .collect()
}

fn row_moves(model: &CellModel, table: &TableData, from: usize, to: usize) -> Vec<(CellId, CellId)> {
    let table_id = table.id.as_str();
    row_cells(model, table, from)
        .into_iter()
        .map(|(col, id)| (id, data_cell_id(table_id, to, col)))
        .collect()
}

/// Re-places every present child cell at the slot its id names.
fn reposition(model: &mut CellModel, table_id: &str, descriptor: &TableDescriptor, rows: usize) {
    for col in 0..descriptor.columns.len() {
        if let Some(geometry) =
            model.cell_mut(header_cell_id(table_id, col).as_str()).and_then(|c| c.geometry_mut())
        {
            *geometry = descriptor.header_geometry(col);
        }
        for row in 0..rows {
            if let Some(geometry) = model
                .cell_mut(data_cell_id(table_id, row, col).as_str())
                .and_then(|c| c.geometry_mut())
            {
                *geometry = descriptor.data_geometry(row, col);
            }
        }
    }
}

/// Inserts a column at `position` (default: after the last one). Cells to the right shift one
/// column over and every existing row gets an empty cell in the new column.
pub fn insert_column(
    model: &mut CellModel,
    table_id: &str,
    header: &str,
    position: Option<usize>,
) -> Result<(), TableError> {
    let table = read_table(model, table_id)?;
    let len = table.columns.len();
    let position = position.unwrap_or(len);
    if position > len {
        return Err(TableError::ColumnOutOfRange { index: position, len });
    }

    let renames = (position..len)
        .rev()
        .flat_map(|col| column_moves(model, &table, col, col + 1))
        .collect::<Vec<_>>();
    model.rename_cells(&renames)?;

    let mut descriptor = table.descriptor();
    descriptor.columns.insert(position, header.to_owned());
    let rows = table.row_count();

    add_header_cell(model, table_id, &descriptor, position, header)?;
    for row in 0..rows {
        add_data_cell(model, table_id, &descriptor, row, position, "")?;
    }
    reposition(model, table_id, &descriptor, rows);
    store_descriptor(model, table_id, &descriptor, rows)?;

    debug!(table_id, position, "table column inserted");
    Ok(())
}

/// Changes a column's header text, both in the descriptor and on the header cell.
pub fn rename_column(
    model: &mut CellModel,
    table_id: &str,
    old_name: &str,
    new_name: &str,
) -> Result<(), TableError> {
    let table = read_table(model, table_id)?;
    let col = table.resolve_column(&ColumnRef::Name(old_name.to_owned()))?;

    let mut descriptor = table.descriptor();
    descriptor.columns[col] = new_name.to_owned();
    if let Some(cell) = model.cell_mut(header_cell_id(table_id, col).as_str()) {
        cell.set_label(new_name);
    }
    store_descriptor(model, table_id, &descriptor, table.row_count())?;

    debug!(table_id, col, "table column renamed");
    Ok(())
}

/// Removes a column's cells and shifts the columns to its right one slot left. The last
/// remaining column cannot be removed.
pub fn remove_column(
    model: &mut CellModel,
    table_id: &str,
    column: impl Into<ColumnRef>,
) -> Result<(), TableError> {
    let table = read_table(model, table_id)?;
    let col = table.resolve_column(&column.into())?;
    let len = table.columns.len();
    if len == 1 {
        return Err(TableError::LastColumn { table_id: table_id.to_owned() });
    }

    let doomed = column_cells(model, &table, col)
        .into_iter()
        .map(|(_, id)| id)
        .collect::<Vec<_>>();
    model.remove_vertices(&doomed)?;

    let renames = (col + 1..len)
        .flat_map(|from| column_moves(model, &table, from, from - 1))
        .collect::<Vec<_>>();
    model.rename_cells(&renames)?;

    let mut descriptor = table.descriptor();
    descriptor.columns.remove(col);
    let rows = table.row_count();
    reposition(model, table_id, &descriptor, rows);
    store_descriptor(model, table_id, &descriptor, rows)?;

    debug!(table_id, col, "table column removed");
    Ok(())
}

/// Inserts a row of values at `position` (default: after the last row). Rows at or below the
/// position shift down by one.
pub fn insert_row(
    model: &mut CellModel,
    table_id: &str,
    values: &[String],
    position: Option<usize>,
) -> Result<(), TableError> {
    let table = read_table(model, table_id)?;
    let expected = table.columns.len();
    if values.len() != expected {
        return Err(TableError::RowWidthMismatch { expected, found: values.len() });
    }
    let rows = table.row_count();
    let position = position.unwrap_or(rows);
    if position > rows {
        return Err(TableError::RowOutOfRange { index: position, len: rows });
    }

    let renames = (position..rows)
        .rev()
        .flat_map(|row| row_moves(model, &table, row, row + 1))
        .collect::<Vec<_>>();
    model.rename_cells(&renames)?;

    let descriptor = table.descriptor();
    for (col, value) in values.iter().enumerate() {
        add_data_cell(model, table_id, &descriptor, position, col, value)?;
    }
    reposition(model, table_id, &descriptor, rows + 1);
    store_descriptor(model, table_id, &descriptor, rows + 1)?;

    debug!(table_id, position, "table row inserted");
    Ok(())
}

/// Removes one data row and shifts the rows below it up.
pub fn remove_row(model: &mut CellModel, table_id: &str, row: usize) -> Result<(), TableError> {
    let table = read_table(model, table_id)?;
    table.check_row(row)?;
    let rows = table.row_count();

    let doomed = row_cells(model, &table, row)
        .into_iter()
        .map(|(_, id)| id)
        .collect::<Vec<_>>();
    model.remove_vertices(&doomed)?;

    let renames = (row + 1..rows)
        .flat_map(|from| row_moves(model, &table, from, from - 1))
        .collect::<Vec<_>>();
    model.rename_cells(&renames)?;

    let descriptor = table.descriptor();
    reposition(model, table_id, &descriptor, rows - 1);
    store_descriptor(model, table_id, &descriptor, rows - 1)?;

    debug!(table_id, row, "table row removed");
    Ok(())
}

/// Sets the text of a single data cell. A cell missing from a damaged table is recreated.
pub fn update_cell(
    model: &mut CellModel,
    table_id: &str,
    row: usize,
    column: impl Into<ColumnRef>,
    value: &str,
) -> Result<(), TableError> {
    let table = read_table(model, table_id)?;
    let col = table.resolve_column(&column.into())?;
    table.check_row(row)?;

    match model.cell_mut(data_cell_id(table_id, row, col).as_str()) {
        Some(cell) => cell.set_label(value),
        None => add_data_cell(model, table_id, &table.descriptor(), row, col, value)?,
    }
    Ok(())
}

/// Links a vertex to one data cell of a table, following the usual edge identity rules.
pub fn link_to_cell(
    model: &mut CellModel,
    from_id: &str,
    table_id: &str,
    row: usize,
    column: impl Into<ColumnRef>,
    options: LinkOptions,
) -> Result<CellId, TableError> {
    let table = read_table(model, table_id)?;
    let col = table.resolve_column(&column.into())?;
    table.check_row(row)?;

    let target = data_cell_id(table_id, row, col);
    Ok(link_vertices(model, from_id, target.as_str(), options)?)
}
