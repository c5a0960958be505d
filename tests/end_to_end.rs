// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use cellgraph::format::{export_model, parse_model};
use cellgraph::model::{CellModel, Geometry, VertexSpec};
use cellgraph::ops::{copy_vertices, link_vertices, CopyOptions, LinkOptions};
use cellgraph::store::{parse_pages, DocumentFile, PageSelector};
use cellgraph::table::{
    create_table, insert_column, read_table, remove_column, update_cell, TableSpec,
};
use serde_json::json;

fn geometries(model: &CellModel) -> Vec<(String, Geometry)> {
    model
        .vertices()
        .filter_map(|cell| Some((cell.id().as_str().to_owned(), *cell.geometry()?)))
        .collect()
}

#[test]
fn table_update_round_trips_through_a_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = DocumentFile::new(dir.path().join("people.drawio"));

    let mut model = CellModel::new();
    let spec = TableSpec::new(["Name", "Age"]).row(["Ann", "30"]);
    create_table(&mut model, "people", spec).expect("create_table");
    file.save_page(&model, Some("Staff")).expect("save_page");

    let mut model = file.load_page(&PageSelector::Name("Staff".to_owned())).expect("load_page");
    let table = read_table(&model, "people").expect("read_table");
    assert_eq!(table.columns, ["Name", "Age"]);
    assert_eq!(table.rows, [["Ann", "30"]]);

    update_cell(&mut model, "people", 0, "Age", "31").expect("update_cell");
    file.save_page(&model, Some("Staff")).expect("save_page");

    let model = file.load_page(&PageSelector::First).expect("load_page");
    assert_eq!(read_table(&model, "people").expect("read_table").rows, [["Ann", "31"]]);
}

#[test]
fn column_insert_then_remove_restores_every_cell() {
    let mut model = CellModel::new();
    let spec = TableSpec::new(["a", "b", "c"])
        .at(10.0, 20.0)
        .row(["1", "2", "3"])
        .row(["4", "5", "6"]);
    create_table(&mut model, "t", spec).expect("create_table");
    let mut before = geometries(&model);
    before.sort_by(|l, r| l.0.cmp(&r.0));

    insert_column(&mut model, "t", "inserted", Some(1)).expect("insert_column");
    let widened = read_table(&model, "t").expect("read_table");
    assert_eq!(widened.columns, ["a", "inserted", "b", "c"]);
    remove_column(&mut model, "t", "inserted").expect("remove_column");

    let table = read_table(&model, "t").expect("read_table");
    assert_eq!(table.columns, ["a", "b", "c"]);
    assert_eq!(table.rows, [["1", "2", "3"], ["4", "5", "6"]]);
    let mut after = geometries(&model);
    after.sort_by(|l, r| l.0.cmp(&r.0));
    assert_eq!(after, before);
}

#[test]
fn copied_vertices_keep_kind_and_data_across_documents() {
    let mut source = CellModel::new();
    let data = json!({ "owner": "ops", "tier": 2 });
    let data = data.as_object().cloned().expect("object");
    let db = VertexSpec::new("Database", 100.0, 50.0).kind("cylinder").custom_data(data.clone());
    source.add_vertex("db", db).expect("add_vertex");
    source.add_vertex("api", VertexSpec::new("API", 300.0, 50.0)).expect("add_vertex");
    link_vertices(&mut source, "api", "db", LinkOptions::default().label("reads")).expect("link");

    // serialize and reparse to copy out of a loaded document, not a live model
    let source = parse_model(&export_model(&source)).expect("parse_model");

    let mut target = CellModel::new();
    let options = CopyOptions::default().offset(10.0, 5.0).id_prefix("x_").with_edges();
    let report = copy_vertices(&source, &["db", "api"], &mut target, &options).expect("copy");
    assert_eq!(report.vertices.len(), 2);
    assert_eq!(report.edges.len(), 1);

    let original = source.vertex_info("db").expect("source vertex");
    let copy = target.vertex_info("x_db").expect("copied vertex");
    assert_eq!((copy.x, copy.y), (original.x + 10.0, original.y + 5.0));
    assert_eq!(copy.kind, original.kind);
    assert_eq!(copy.custom_data, Some(data));
    assert_eq!(target.edge("x_api-2-x_db").map(|edge| edge.label()), Some("reads"));
}

#[test]
fn saving_one_page_leaves_siblings_byte_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = DocumentFile::new(dir.path().join("two.drawio"));

    let mut a = CellModel::new();
    a.add_vertex("only_a", VertexSpec::new("A & <friends>", 0.0, 0.0)).expect("add_vertex");
    let mut b = CellModel::new();
    b.add_vertex("only_b", VertexSpec::new("B", 0.0, 0.0)).expect("add_vertex");
    file.save_page(&a, Some("A")).expect("save A");
    file.save_page(&b, Some("B")).expect("save B");

    let before = parse_pages(&file.read_text().expect("read_text"));
    b.add_vertex("later", VertexSpec::new("later", 40.0, 40.0)).expect("add_vertex");
    file.save_page(&b, Some("B")).expect("save B again");
    let after = parse_pages(&file.read_text().expect("read_text"));

    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1].id, before[1].id);
    assert_ne!(after[1].model_text, before[1].model_text);
    let reloaded = file.load_page(&PageSelector::Index(1)).expect("load B");
    assert!(reloaded.contains_vertex("later"));
}

#[test]
fn linking_the_same_pair_twice_keeps_one_edge() {
    let mut model = CellModel::new();
    model.add_vertex("b", VertexSpec::new("B", 0.0, 0.0)).expect("add_vertex");
    model.add_vertex("a", VertexSpec::new("A", 100.0, 0.0)).expect("add_vertex");

    let undirected = LinkOptions::default().undirected();
    let first = link_vertices(&mut model, "b", "a", undirected.clone()).expect("link");
    let second = link_vertices(&mut model, "a", "b", undirected.label("peer")).expect("link");

    assert_eq!(first.as_str(), "a-2-b");
    assert_eq!(first, second);
    assert_eq!(model.edges().count(), 1);
    assert_eq!(model.edge("a-2-b").map(|edge| edge.label()), Some("peer"));
}
