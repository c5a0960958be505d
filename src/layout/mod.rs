// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Vertex placement.
//!
//! Layout algorithms live outside this crate. Callers validate an algorithm name and its options
//! into a [`LayoutRequest`] and hand the model to a [`LayoutEngine`], which moves vertices in
//! place.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::ErrorCategory;
use crate::model::CellModel;

pub const DEFAULT_SPACING: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown layout algorithm '{name}'")]
    UnknownAlgorithm { name: String },
    #[error("unknown layout direction '{name}' (expected top-down or left-right)")]
    UnknownDirection { name: String },
    #[error("layout algorithm '{algorithm}' does not accept a direction")]
    DirectionNotSupported { algorithm: LayoutAlgorithm },
    #[error("layout algorithm '{algorithm}' is not supported by this engine")]
    Unsupported { algorithm: LayoutAlgorithm },
}

impl LayoutError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::InvalidArgument
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutAlgorithm {
    Hierarchical,
    Circle,
    Organic,
    CompactTree,
    RadialTree,
    Partition,
    Stack,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 7] = [
        Self::Hierarchical,
        Self::Circle,
        Self::Organic,
        Self::CompactTree,
        Self::RadialTree,
        Self::Partition,
        Self::Stack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hierarchical => "hierarchical",
            Self::Circle => "circle",
            Self::Organic => "organic",
            Self::CompactTree => "compact-tree",
            Self::RadialTree => "radial-tree",
            Self::Partition => "partition",
            Self::Stack => "stack",
        }
    }

    pub fn accepts_direction(self) -> bool {
        self == Self::Hierarchical
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| LayoutError::UnknownAlgorithm { name: s.to_owned() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    TopDown,
    LeftRight,
}

impl LayoutDirection {
    pub fn name(self) -> &'static str {
        match self {
            Self::TopDown => "top-down",
            Self::LeftRight => "left-right",
        }
    }
}

impl FromStr for LayoutDirection {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-down" => Ok(Self::TopDown),
            "left-right" => Ok(Self::LeftRight),
            _ => Err(LayoutError::UnknownDirection { name: s.to_owned() }),
        }
    }
}

/// A validated layout invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    algorithm: LayoutAlgorithm,
    direction: Option<LayoutDirection>,
    spacing: f64,
}

impl LayoutRequest {
    pub fn new(algorithm: LayoutAlgorithm) -> Self {
        Self { algorithm, direction: None, spacing: DEFAULT_SPACING }
    }

    /// Parses an algorithm name and optional direction name. Only `hierarchical` takes a
    /// direction.
    pub fn parse(algorithm: &str, direction: Option<&str>) -> Result<Self, LayoutError> {
        let request = Self::new(algorithm.parse()?);
        match direction {
            None => Ok(request),
            Some(direction) => request.with_direction(direction.parse()?),
        }
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Result<Self, LayoutError> {
        if !self.algorithm.accepts_direction() {
            return Err(LayoutError::DirectionNotSupported { algorithm: self.algorithm });
        }
        self.direction = Some(direction);
        Ok(self)
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.algorithm
    }

    pub fn direction(&self) -> Option<LayoutDirection> {
        self.direction
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }
}

/// Something that can reposition vertices in place.
pub trait LayoutEngine {
    fn apply(&self, model: &mut CellModel, request: &LayoutRequest) -> Result<(), LayoutError>;
}

pub fn apply_layout<E: LayoutEngine + ?Sized>(
    model: &mut CellModel,
    engine: &E,
    request: &LayoutRequest,
) -> Result<(), LayoutError> {
    debug!(
        algorithm = %request.algorithm(),
        direction = request.direction().map(LayoutDirection::name),
        "applying layout"
    );
    engine.apply(model, request)
}
