// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialized forms of a cell model.

pub mod cell_xml;

pub use cell_xml::{escape_attr, export_model, parse_model, CellXmlError};
