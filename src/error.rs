// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error categories shared by every subsystem.
//!
//! Each module owns its own error enum; `category()` on those enums maps them onto this coarse
//! taxonomy so callers can branch without matching every variant.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A referenced vertex, edge, table, column, row or page does not exist.
    NotFound,
    /// Empty header list, mismatched row width, out-of-range index, unsupported layout option,
    /// malformed document.
    InvalidArgument,
    /// The parent vertex named at creation time does not exist.
    Reference,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::Reference => "reference",
        })
    }
}
