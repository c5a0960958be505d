// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use serde_json::json;

use super::{
    create_table, data_cell_id, header_cell_id, insert_column, insert_row, is_table, link_to_cell,
    read_table, remove_column, remove_row, rename_column, update_cell, ColumnRef, TableError,
    TableSpec, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH,
};
use crate::error::ErrorCategory;
use crate::model::{CellModel, DataPatch, VertexPatch, VertexSpec};
use crate::ops::link::LinkOptions;

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[fixture]
fn people() -> CellModel {
    let mut model = CellModel::new();
    create_table(
        &mut model,
        "t",
        TableSpec::new(["Name", "Age"])
            .at(40.0, 60.0)
            .row(["Ann", "31"])
            .row(["Bob", "42"])
            .title("People"),
    )
    .expect("create table");
    model
}

fn geometry_of(model: &CellModel, id: &str) -> (f64, f64, f64, f64) {
    let geometry = model.cell(id).and_then(|cell| cell.geometry()).expect("geometry");
    (geometry.x, geometry.y, geometry.width, geometry.height)
}

fn container_size(model: &CellModel, id: &str) -> (f64, f64) {
    let (_, _, width, height) = geometry_of(model, id);
    (width, height)
}

#[test]
fn create_table_lays_out_cells_and_container() {
    let mut model = CellModel::new();
    let table = create_table(
        &mut model,
        "t",
        TableSpec::new(["Name", "Age"]).at(10.0, 20.0).row(["Ann", "31"]).row(["Bob"]),
    )
    .expect("create");

    assert_eq!(table.columns, row(&["Name", "Age"]));
    assert_eq!(table.rows, vec![row(&["Ann", "31"]), row(&["Bob", ""])]);
    assert_eq!((table.x, table.y), (10.0, 20.0));
    assert_eq!(table.title, "");

    assert_eq!(container_size(&model, "t"), (2.0 * DEFAULT_CELL_WIDTH, 3.0 * DEFAULT_CELL_HEIGHT));
    assert_eq!(geometry_of(&model, "t_header_c1"), (120.0, 0.0, 120.0, 30.0));
    assert_eq!(geometry_of(&model, "t_r1_c0"), (0.0, 60.0, 120.0, 30.0));
    assert_eq!(model.cell("t_r1_c1").expect("padded cell").label(), "");
    assert_eq!(model.cell("t_r0_c0").expect("cell").parent(), "t");
    assert_eq!(model.cell("t_header_c0").expect("header").style().get_text("fontStyle"), Some("1"));
    assert!(is_table(&model, "t"));
}

#[test]
fn create_table_without_headers_is_rejected() {
    let mut model = CellModel::new();
    let err = create_table(&mut model, "t", TableSpec::new(Vec::<String>::new())).unwrap_err();
    assert_eq!(err, TableError::EmptyHeaders);
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    assert!(model.is_empty());
}

#[test]
fn create_table_with_zero_rows() {
    let mut model = CellModel::new();
    let table = create_table(&mut model, "t", TableSpec::new(["Only"])).expect("create");
    assert!(table.rows.is_empty());
    assert_eq!(container_size(&model, "t"), (120.0, 30.0));
}

#[test]
fn read_table_keeps_custom_data_but_hides_descriptor() {
    let mut model = CellModel::new();
    let data = json!({ "owner": "ops" }).as_object().cloned().expect("object");
    create_table(&mut model, "t", TableSpec::new(["A"]).custom_data(data)).expect("create");

    let table = read_table(&model, "t").expect("read");
    assert_eq!(table.custom_data.get("owner"), Some(&json!("ops")));
    assert!(!table.custom_data.contains_key("table"));
}

#[test]
fn read_table_rejects_plain_vertices_and_unknown_ids() {
    let mut model = CellModel::new();
    model.add_vertex("plain", VertexSpec::new("p", 0.0, 0.0)).expect("add");

    let err = read_table(&model, "plain").unwrap_err();
    assert!(matches!(err, TableError::NotATable { .. }));
    let err = read_table(&model, "ghost").unwrap_err();
    assert!(matches!(err, TableError::TableNotFound { .. }));
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[rstest]
fn read_table_fills_holes_in_damaged_tables(mut people: CellModel) {
    people.remove_vertices(&["t_r0_c1"]).expect("remove cell");
    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.rows, vec![row(&["Ann", ""]), row(&["Bob", "42"])]);
}

#[rstest]
fn read_table_does_not_pick_up_similarly_named_tables(mut people: CellModel) {
    create_table(&mut people, "t2", TableSpec::new(["X"]).row(["x"]).row(["y"]).row(["z"]))
        .expect("second table");
    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.row_count(), 2);
}

#[rstest]
fn insert_column_in_the_middle_shifts_cells(mut people: CellModel) {
    insert_column(&mut people, "t", "Email", Some(1)).expect("insert");

    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.columns, row(&["Name", "Email", "Age"]));
    assert_eq!(table.rows, vec![row(&["Ann", "", "31"]), row(&["Bob", "", "42"])]);
    assert_eq!(people.cell("t_header_c2").expect("header").label(), "Age");
    assert_eq!(geometry_of(&people, "t_r0_c2"), (240.0, 30.0, 120.0, 30.0));
    assert_eq!(container_size(&people, "t"), (360.0, 90.0));
}

#[rstest]
fn insert_column_appends_by_default(mut people: CellModel) {
    insert_column(&mut people, "t", "City", None).expect("insert");
    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.columns.last().map(String::as_str), Some("City"));
    assert_eq!(table.rows[1], row(&["Bob", "42", ""]));
}

#[rstest]
fn insert_column_past_the_end_is_rejected(mut people: CellModel) {
    let err = insert_column(&mut people, "t", "X", Some(5)).unwrap_err();
    assert_eq!(err, TableError::ColumnOutOfRange { index: 5, len: 2 });
}

#[rstest]
fn rename_column_updates_header_cell(mut people: CellModel) {
    rename_column(&mut people, "t", "Age", "Years").expect("rename");
    assert_eq!(people.cell("t_header_c1").expect("header").label(), "Years");
    assert_eq!(read_table(&people, "t").expect("read").columns, row(&["Name", "Years"]));

    let err = rename_column(&mut people, "t", "Age", "Again").unwrap_err();
    assert!(matches!(err, TableError::ColumnNotFound { .. }));
}

#[rstest]
#[case::by_name(ColumnRef::from("Name"))]
#[case::by_index(ColumnRef::from(0usize))]
fn remove_column_shifts_remaining_cells_left(mut people: CellModel, #[case] column: ColumnRef) {
    remove_column(&mut people, "t", column).expect("remove");

    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.columns, row(&["Age"]));
    assert_eq!(table.rows, vec![row(&["31"]), row(&["42"])]);
    assert!(!people.contains("t_r0_c1"));
    assert_eq!(geometry_of(&people, "t_r1_c0"), (0.0, 60.0, 120.0, 30.0));
    assert_eq!(container_size(&people, "t"), (120.0, 90.0));
}

#[rstest]
fn remove_column_refuses_the_last_column(mut people: CellModel) {
    remove_column(&mut people, "t", "Age").expect("remove age");
    let err = remove_column(&mut people, "t", "Name").unwrap_err();
    assert!(matches!(err, TableError::LastColumn { .. }));
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);
}

#[rstest]
fn insert_row_at_top_shifts_existing_rows_down(mut people: CellModel) {
    insert_row(&mut people, "t", &row(&["Cat", "7"]), Some(0)).expect("insert");

    let table = read_table(&people, "t").expect("read");
    assert_eq!(
        table.rows,
        vec![row(&["Cat", "7"]), row(&["Ann", "31"]), row(&["Bob", "42"])]
    );
    assert_eq!(geometry_of(&people, "t_r2_c0"), (0.0, 90.0, 120.0, 30.0));
    assert_eq!(container_size(&people, "t"), (240.0, 120.0));
}

#[rstest]
fn insert_row_requires_one_value_per_column(mut people: CellModel) {
    let err = insert_row(&mut people, "t", &row(&["only one"]), None).unwrap_err();
    assert_eq!(err, TableError::RowWidthMismatch { expected: 2, found: 1 });

    let err = insert_row(&mut people, "t", &row(&["a", "b"]), Some(3)).unwrap_err();
    assert_eq!(err, TableError::RowOutOfRange { index: 3, len: 2 });
}

#[rstest]
fn remove_row_shifts_rows_up(mut people: CellModel) {
    remove_row(&mut people, "t", 0).expect("remove");

    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.rows, vec![row(&["Bob", "42"])]);
    assert!(!people.contains("t_r1_c0"));
    assert_eq!(geometry_of(&people, "t_r0_c1"), (120.0, 30.0, 120.0, 30.0));
    assert_eq!(container_size(&people, "t"), (240.0, 60.0));

    let err = remove_row(&mut people, "t", 1).unwrap_err();
    assert_eq!(err, TableError::RowOutOfRange { index: 1, len: 1 });
}

#[rstest]
fn update_cell_by_name_and_index(mut people: CellModel) {
    update_cell(&mut people, "t", 1, "Age", "43").expect("update by name");
    update_cell(&mut people, "t", 0, 0usize, "Anna").expect("update by index");

    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.rows, vec![row(&["Anna", "31"]), row(&["Bob", "43"])]);

    let err = update_cell(&mut people, "t", 0, "Missing", "x").unwrap_err();
    assert!(matches!(err, TableError::ColumnNotFound { .. }));
    let err = update_cell(&mut people, "t", 9, "Age", "x").unwrap_err();
    assert!(matches!(err, TableError::RowOutOfRange { .. }));
}

#[rstest]
fn link_to_cell_targets_the_data_cell(mut people: CellModel) {
    people.add_vertex("svc", VertexSpec::new("Service", 400.0, 0.0)).expect("add");

    let edge_id =
        link_to_cell(&mut people, "svc", "t", 1, "Name", LinkOptions::default().label("reads"))
            .expect("link");
    assert_eq!(edge_id, "svc-2-t_r1_c0");
    let edge = people.edge(edge_id.as_str()).expect("edge");
    assert_eq!(edge.endpoints().map(|(_, target)| target.as_str()), Some("t_r1_c0"));
}

#[rstest]
fn edges_follow_shifted_cells(mut people: CellModel) {
    people.add_vertex("svc", VertexSpec::new("Service", 400.0, 0.0)).expect("add");
    link_to_cell(&mut people, "svc", "t", 0, "Age", LinkOptions::default()).expect("link");

    insert_row(&mut people, "t", &row(&["Cat", "7"]), Some(0)).expect("insert");

    assert!(people.edge("svc-2-t_r0_c1").is_none());
    let edge = people.edge("svc-2-t_r1_c1").expect("edge id follows the cell");
    assert_eq!(edge.endpoints().map(|(_, target)| target.as_str()), Some("t_r1_c1"));
}

#[rstest]
fn linking_after_a_column_shift_reaches_the_new_cell(mut people: CellModel) {
    people.add_vertex("svc", VertexSpec::new("Service", 400.0, 0.0)).expect("add");
    let link = |model: &mut CellModel| {
        link_to_cell(model, "svc", "t", 0, 0usize, LinkOptions::default()).expect("link")
    };
    let first = link(&mut people);
    assert_eq!(first, "svc-2-t_r0_c0");

    insert_column(&mut people, "t", "Id", Some(0)).expect("insert column");
    let second = link(&mut people);

    assert_eq!(second, "svc-2-t_r0_c0");
    let target = |id: &str| {
        people.edge(id).and_then(|edge| edge.endpoints()).map(|(_, target)| target.to_string())
    };
    assert_eq!(target("svc-2-t_r0_c0").as_deref(), Some("t_r0_c0"));
    assert_eq!(target("svc-2-t_r0_c1").as_deref(), Some("t_r0_c1"));
    assert_eq!(people.edges().count(), 2);
}

#[rstest]
fn descriptor_survives_unrelated_custom_data_edits(mut people: CellModel) {
    let patch = VertexPatch {
        custom_data: DataPatch::Merge(json!({ "note": "x" }).as_object().cloned().expect("obj")),
        ..VertexPatch::default()
    };
    people.edit_vertex("t", patch).expect("edit");
    assert!(is_table(&people, "t"));
    assert_eq!(header_cell_id("t", 3), "t_header_c3");
    assert_eq!(data_cell_id("t", 2, 1), "t_r2_c1");
}

#[rstest]
#[case::max_index("t_r18446744073709551615_c0")]
#[case::far_past_the_container("t_r100000000_c0")]
fn read_table_ignores_cells_far_beyond_the_table(mut people: CellModel, #[case] stray: &str) {
    people.add_vertex(stray, VertexSpec::new("junk", 0.0, 0.0).parent("t")).expect("add");

    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.rows, vec![row(&["Ann", "31"]), row(&["Bob", "42"])]);
    insert_row(&mut people, "t", &row(&["Cat", "7"]), None).expect("insert still works");
}

#[rstest]
fn read_table_keeps_stray_rows_close_to_the_table(mut people: CellModel) {
    people.add_vertex("t_r3_c1", VertexSpec::new("9", 0.0, 0.0).parent("t")).expect("add");

    let table = read_table(&people, "t").expect("read");
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.cell(3, 1), Some("9"));
    assert_eq!(table.cell(2, 0), Some(""));
}
