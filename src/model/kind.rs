// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Kind catalog: the closed set of shape kinds, their default style templates and sizes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::style::{parse_style, Style};

pub const DEFAULT_CORNER_RADIUS: u32 = 12;

const ABSOLUTE_ARC_SIZE: &str = "absoluteArcSize";
const ARC_SIZE: &str = "arcSize";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Cylinder,
    Cloud,
    Square,
    Circle,
    Step,
    Actor,
    Text,
    RoundedRectangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        Self::Rectangle,
        Self::Ellipse,
        Self::Cylinder,
        Self::Cloud,
        Self::Square,
        Self::Circle,
        Self::Step,
        Self::Actor,
        Self::Text,
        Self::RoundedRectangle,
    ];

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Default style template for this kind.
    pub fn default_style(self) -> Style {
        parse_style(self.spec().style)
    }

    pub fn default_size(self) -> (f64, f64) {
        let spec = self.spec();
        (spec.width, spec.height)
    }

    fn spec(self) -> &'static KindSpec {
        // CATALOG is declared in the same order as `ShapeKind::ALL`.
        &CATALOG[self as usize]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shape kind '{name}'")]
pub struct UnknownKind {
    pub name: String,
}

impl FromStr for ShapeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_kind(s)
    }
}

struct KindSpec {
    name: &'static str,
    style: &'static str,
    width: f64,
    height: f64,
}

static CATALOG: [KindSpec; 10] = [
    KindSpec {
        name: "rectangle",
        style: "whiteSpace=wrap;html=1;",
        width: 120.0,
        height: 60.0,
    },
    KindSpec {
        name: "ellipse",
        style: "ellipse;whiteSpace=wrap;html=1;",
        width: 120.0,
        height: 80.0,
    },
    KindSpec {
        name: "cylinder",
        style: "shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;backgroundOutline=1;size=15;",
        width: 60.0,
        height: 80.0,
    },
    KindSpec {
        name: "cloud",
        style: "shape=cloud;whiteSpace=wrap;html=1;",
        width: 120.0,
        height: 80.0,
    },
    KindSpec {
        name: "square",
        style: "whiteSpace=wrap;html=1;aspect=fixed;",
        width: 80.0,
        height: 80.0,
    },
    KindSpec {
        name: "circle",
        style: "ellipse;whiteSpace=wrap;html=1;aspect=fixed;",
        width: 80.0,
        height: 80.0,
    },
    KindSpec {
        name: "step",
        style: "shape=step;perimeter=stepPerimeter;whiteSpace=wrap;html=1;fixedSize=1;",
        width: 120.0,
        height: 80.0,
    },
    KindSpec {
        name: "actor",
        style: "shape=umlActor;verticalLabelPosition=bottom;verticalAlign=top;html=1;outlineConnect=0;",
        width: 30.0,
        height: 60.0,
    },
    KindSpec {
        name: "text",
        style: "text;html=1;strokeColor=none;fillColor=none;align=center;verticalAlign=middle;whiteSpace=wrap;rounded=0;",
        width: 60.0,
        height: 30.0,
    },
    KindSpec {
        name: "rounded-rectangle",
        style: "rounded=1;whiteSpace=wrap;html=1;absoluteArcSize=1;arcSize=24;",
        width: 120.0,
        height: 60.0,
    },
];

/// Known misspellings and their canonical kind names.
const MISSPELLINGS: &[(&str, &str)] = &[
    ("elipse", "ellipse"),
    ("ellipsis", "ellipse"),
    ("rectange", "rectangle"),
    ("rounded-rectange", "rounded-rectangle"),
    ("cilinder", "cylinder"),
];

/// Corrects known misspellings; every other name (including unknown ones) passes through.
pub fn normalize_kind(name: &str) -> &str {
    MISSPELLINGS
        .iter()
        .find(|(wrong, _)| *wrong == name)
        .map(|(_, right)| *right)
        .unwrap_or(name)
}

/// Normalizes and looks up a kind name.
pub fn resolve_kind(name: &str) -> Result<ShapeKind, UnknownKind> {
    let normalized = normalize_kind(name);
    ShapeKind::ALL
        .into_iter()
        .find(|kind| kind.name() == normalized)
        .ok_or_else(|| UnknownKind { name: name.to_owned() })
}

/// Coerces a requested corner radius to an integer >= 1, falling back to the default for missing,
/// non-finite or non-positive input.
pub fn coerce_corner_radius(radius: Option<f64>) -> u32 {
    match radius {
        Some(r) if r.is_finite() && r > 0.0 => (r.round() as u32).max(1),
        _ => DEFAULT_CORNER_RADIUS,
    }
}

/// Writes the rounded-rectangle corner radius. The renderer treats `arcSize` as a diameter, so the
/// stored value is twice the pixel radius.
pub fn apply_corner_radius(style: &mut Style, radius: Option<f64>) {
    let radius = coerce_corner_radius(radius);
    style.set(ABSOLUTE_ARC_SIZE, "1");
    style.set(ARC_SIZE, radius.saturating_mul(2));
}

/// Reads a corner radius back from a style carrying the absolute-arc signature.
pub fn corner_radius(style: &Style) -> Option<u32> {
    if !style.is_enabled(ABSOLUTE_ARC_SIZE) {
        return None;
    }
    let arc = style.get_number(ARC_SIZE)?;
    if !arc.is_finite() || arc <= 0.0 {
        return None;
    }
    Some(((arc / 2.0).round() as u32).max(1))
}

type KindRule = (fn(&Style) -> bool, ShapeKind);

fn shape_is(style: &Style, shape: &str) -> bool {
    style.get_text("shape") == Some(shape)
}

fn aspect_fixed(style: &Style) -> bool {
    style.get_text("aspect") == Some("fixed")
}

/// Reverse style -> kind rules, evaluated in order; the first match wins.
const KIND_RULES: &[KindRule] = &[
    (
        |s: &Style| s.contains_key("ellipse") && !aspect_fixed(s) && !s.contains_key("shape"),
        ShapeKind::Ellipse,
    ),
    (|s: &Style| shape_is(s, "cylinder3") || shape_is(s, "cylinder"), ShapeKind::Cylinder),
    (|s: &Style| shape_is(s, "cloud"), ShapeKind::Cloud),
    (|s: &Style| shape_is(s, "step"), ShapeKind::Step),
    (|s: &Style| shape_is(s, "umlActor"), ShapeKind::Actor),
    (
        |s: &Style| {
            s.contains_key("text")
                && s.get_text("strokeColor") == Some("none")
                && s.get_text("fillColor") == Some("none")
        },
        ShapeKind::Text,
    ),
    (|s: &Style| s.contains_key("ellipse") && aspect_fixed(s), ShapeKind::Circle),
    (|s: &Style| aspect_fixed(s) && !s.contains_key("ellipse"), ShapeKind::Square),
    (
        |s: &Style| s.is_enabled("rounded") && s.is_enabled(ABSOLUTE_ARC_SIZE),
        ShapeKind::RoundedRectangle,
    ),
];

/// Best-effort kind inference from a style.
///
/// This is lossy: any style that happens to carry a rule's signature reports that kind, whether or
/// not it was created from the catalog template.
pub fn infer_kind(style: &Style) -> ShapeKind {
    KIND_RULES
        .iter()
        .find(|(matches, _)| matches(style))
        .map(|(_, kind)| *kind)
        .unwrap_or(ShapeKind::Rectangle)
}
