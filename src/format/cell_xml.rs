// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The `<model>` fragment: one `<cell>` element per vertex or edge under a `<root>` element,
//! preceded by the implicit root (`0`) and default layer (`1`) cells.

use std::fmt::Write as _;

use tracing::warn;

use crate::error::ErrorCategory;
use crate::model::style::format_number;
use crate::model::{
    parse_style, stringify_style, Cell, CellId, CellKind, CellModel, CustomData, Geometry,
    IdError, ModelError, LAYER_ID, ROOT_ID,
};

#[derive(Debug, thiserror::Error)]
pub enum CellXmlError {
    #[error("malformed model xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected <model> as the root element, found <{found}>")]
    UnexpectedRoot { found: String },
    #[error("<model> has no <root> element")]
    MissingRoot,
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute { element: &'static str, attribute: &'static str },
    #[error("cell '{cell_id}': invalid number `{value}` for `{attribute}`")]
    InvalidNumber { cell_id: String, attribute: &'static str, value: String },
    #[error("cell '{cell_id}': custom data is not a JSON object")]
    InvalidData {
        cell_id: String,
        #[source]
        source: Option<serde_json::Error>,
    },
    #[error("invalid cell id")]
    InvalidId(#[from] IdError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CellXmlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Model(err) => err.category(),
            _ => ErrorCategory::InvalidArgument,
        }
    }
}

/// Escapes text for use inside a double-quoted attribute. Line breaks and tabs become character
/// references so they survive attribute-value normalization.
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            other => out.push(other),
        }
    }
    out
}

pub fn export_model(model: &CellModel) -> String {
    let mut out = String::new();
    out.push_str("<model>\n  <root>\n");
    let _ = writeln!(out, "    <cell id=\"{ROOT_ID}\"/>");
    let _ = writeln!(out, "    <cell id=\"{LAYER_ID}\" parent=\"{ROOT_ID}\"/>");
    for cell in model.cells() {
        write_cell(&mut out, cell);
    }
    out.push_str("  </root>\n</model>");
    out
}

fn write_cell(out: &mut String, cell: &Cell) {
    let _ = write!(
        out,
        "    <cell id=\"{}\" value=\"{}\" style=\"{}\"",
        escape_attr(cell.id().as_str()),
        escape_attr(cell.label()),
        escape_attr(&stringify_style(cell.style())),
    );

    match cell.kind() {
        CellKind::Vertex { .. } => {
            let _ = write!(out, " vertex=\"1\" parent=\"{}\"", escape_attr(cell.parent().as_str()));
        }
        CellKind::Edge { source, target } => {
            let _ = write!(
                out,
                " edge=\"1\" parent=\"{}\" source=\"{}\" target=\"{}\"",
                escape_attr(cell.parent().as_str()),
                escape_attr(source.as_str()),
                escape_attr(target.as_str()),
            );
        }
    }

    if let Some(data) = cell.custom_data() {
        let json = serde_json::Value::Object(data.clone()).to_string();
        let _ = write!(out, " data=\"{}\"", escape_attr(&json));
    }
    out.push_str(">\n");

    match cell.kind() {
        CellKind::Vertex { geometry } => {
            let _ = writeln!(
                out,
                "      <geometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
                format_number(geometry.x),
                format_number(geometry.y),
                format_number(geometry.width),
                format_number(geometry.height),
            );
        }
        CellKind::Edge { .. } => out.push_str("      <geometry relative=\"1\"/>\n"),
    }
    out.push_str("    </cell>\n");
}

/// Rebuilds a model from a `<model>` fragment. Cell order is kept. Edge endpoints and parents
/// are not required to resolve; unrecognized cells are skipped.
pub fn parse_model(input: &str) -> Result<CellModel, CellXmlError> {
    let doc = roxmltree::Document::parse(input)?;
    let model_el = doc.root_element();
    if !model_el.has_tag_name("model") {
        return Err(CellXmlError::UnexpectedRoot { found: model_el.tag_name().name().to_owned() });
    }
    let root_el = model_el
        .children()
        .find(|node| node.has_tag_name("root"))
        .ok_or(CellXmlError::MissingRoot)?;

    let mut model = CellModel::new();
    for node in root_el.children().filter(|node| node.has_tag_name("cell")) {
        let raw_id = node
            .attribute("id")
            .ok_or(CellXmlError::MissingAttribute { element: "cell", attribute: "id" })?;
        if raw_id == ROOT_ID || raw_id == LAYER_ID {
            continue;
        }
        if let Some(cell) = parse_cell(node, raw_id)? {
            model.insert_cell(cell)?;
        }
    }
    Ok(model)
}

fn parse_cell(node: roxmltree::Node<'_, '_>, raw_id: &str) -> Result<Option<Cell>, CellXmlError> {
    let id = CellId::new(raw_id)?;
    let parent = match node.attribute("parent") {
        None | Some(ROOT_ID) => CellId::new(LAYER_ID)?,
        Some(raw) => CellId::new(raw)?,
    };
    let label = node.attribute("value").unwrap_or_default();
    let style = parse_style(node.attribute("style").unwrap_or_default());

    let cell = if node.attribute("edge") == Some("1") {
        let (Some(source), Some(target)) = (node.attribute("source"), node.attribute("target"))
        else {
            warn!(cell_id = raw_id, "edge without endpoints skipped");
            return Ok(None);
        };
        let mut cell = Cell::edge(id, parent, CellId::new(source)?, CellId::new(target)?);
        cell.set_label(label);
        cell
    } else if node.attribute("vertex") == Some("1") {
        let geometry = node
            .children()
            .find(|child| child.has_tag_name("geometry"))
            .map(|geometry| parse_geometry(geometry, raw_id))
            .transpose()?
            .unwrap_or_default();
        Cell::vertex(id, parent, label, geometry)
    } else {
        warn!(cell_id = raw_id, "cell that is neither vertex nor edge skipped");
        return Ok(None);
    };

    let custom_data = node.attribute("data").map(|raw| parse_data(raw, raw_id)).transpose()?;
    Ok(Some(cell.with_style(style).with_custom_data(custom_data)))
}

fn parse_geometry(node: roxmltree::Node<'_, '_>, cell_id: &str) -> Result<Geometry, CellXmlError> {
    let number = |attribute: &'static str| -> Result<f64, CellXmlError> {
        match node.attribute(attribute) {
            None => Ok(0.0),
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| CellXmlError::InvalidNumber {
                cell_id: cell_id.to_owned(),
                attribute,
                value: raw.to_owned(),
            }),
        }
    };
    Ok(Geometry::new(number("x")?, number("y")?, number("width")?, number("height")?))
}

fn parse_data(raw: &str, cell_id: &str) -> Result<CustomData, CellXmlError> {
    let value = serde_json::from_str::<serde_json::Value>(raw).map_err(|source| {
        CellXmlError::InvalidData { cell_id: cell_id.to_owned(), source: Some(source) }
    })?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(CellXmlError::InvalidData { cell_id: cell_id.to_owned(), source: None }),
    }
}
