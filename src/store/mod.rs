// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for multi-page documents on disk.
//!
//! A document holds any number of named pages, each embedding one serialized cell model. Only
//! the page being saved is rewritten; sibling model fragments are carried over byte for byte.

pub mod document;

pub use document::{
    load_page, parse_pages, render_document, DocumentFile, Page, PageSelector, PageSummary,
    StoreError, WriteDurability, DEFAULT_PAGE_NAME,
};
