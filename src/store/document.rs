// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ErrorCategory;
use crate::format::{escape_attr, export_model, parse_model, CellXmlError};
use crate::model::{CellModel, PageId};

pub const DEFAULT_PAGE_NAME: &str = "Page-1";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("document contains no parsable pages")]
    NoPages,
    #[error("page index {index} out of range (pages={count})")]
    PageIndexOutOfRange { index: usize, count: usize },
    #[error("page '{name}' not found; available pages: {}", available.join(", "))]
    PageNotFound { name: String, available: Vec<String> },
    #[error("cannot remove the only page of a document")]
    LastPage,
    #[error("cannot parse model of page '{page}': {source}")]
    Model {
        page: String,
        #[source]
        source: CellXmlError,
    },
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                ErrorCategory::NotFound
            }
            Self::PageNotFound { .. } => ErrorCategory::NotFound,
            Self::Model { source, .. } => source.category(),
            Self::Io { .. } | Self::NoPages | Self::PageIndexOutOfRange { .. } | Self::LastPage => {
                ErrorCategory::InvalidArgument
            }
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Also flushes the file contents and the rename to stable storage where the platform
    /// allows it.
    Durable,
}

/// One page as found in a document. `model_text` is the raw `<model>` fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub model_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub id: PageId,
    pub name: String,
    pub index: usize,
}

/// Which page to operate on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelector {
    #[default]
    First,
    Index(usize),
    Name(String),
}

impl FromStr for PageSelector {
    type Err = std::convert::Infallible;

    /// All-digit input selects by index, anything else by name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Name(s.to_owned()),
        })
    }
}

fn page_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<page\b([^>]*)>(.*?)</page>").expect("valid regex"))
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([A-Za-z_][\w.-]*)\s*=\s*"([^"]*)""#).expect("valid regex"))
}

fn model_fragment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<model\b.*</model>").expect("valid regex"))
}

fn new_page_id() -> PageId {
    PageId::derived(format!("page-{}", Uuid::new_v4().simple()))
}

/// Extracts every page in document order. Pages without an embedded `<model>` fragment are
/// skipped. A page with a missing or empty id gets a fresh one, which the next save persists.
pub fn parse_pages(document: &str) -> Vec<Page> {
    let mut pages = Vec::new();
    for captures in page_block_regex().captures_iter(document) {
        let (attrs, body) = (&captures[1], &captures[2]);

        let mut id = None;
        let mut name = String::new();
        for attr in attribute_regex().captures_iter(attrs) {
            let value = htmlize::unescape(&attr[2]).into_owned();
            match &attr[1] {
                "id" => id = PageId::new(value).ok(),
                "name" => name = value,
                _ => {}
            }
        }

        let Some(fragment) = model_fragment_regex().find(body) else {
            warn!(page = %name, "page without a model fragment skipped");
            continue;
        };

        let id = id.unwrap_or_else(|| {
            let id = new_page_id();
            warn!(page = %name, assigned = %id, "page without a usable id gets a fresh one");
            id
        });
        pages.push(Page {
            id,
            name,
            model_text: fragment.as_str().to_owned(),
        });
    }
    pages
}

/// Assembles pages into the document wrapper. Model fragments are written verbatim.
pub fn render_document(pages: &[Page]) -> String {
    let modified = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut out = String::new();
    let _ = writeln!(out, "<document modified=\"{modified}\">");
    for page in pages {
        let _ = writeln!(
            out,
            "  <page id=\"{}\" name=\"{}\">\n{}\n  </page>",
            escape_attr(page.id.as_str()),
            escape_attr(&page.name),
            page.model_text,
        );
    }
    out.push_str("</document>\n");
    out
}

fn select<'a>(pages: &'a [Page], selector: &PageSelector) -> Result<(usize, &'a Page), StoreError> {
    if pages.is_empty() {
        return Err(StoreError::NoPages);
    }
    match selector {
        PageSelector::First => Ok((0, &pages[0])),
        PageSelector::Index(index) => pages
            .get(*index)
            .map(|page| (*index, page))
            .ok_or(StoreError::PageIndexOutOfRange { index: *index, count: pages.len() }),
        PageSelector::Name(name) => pages
            .iter()
            .enumerate()
            .find(|(_, page)| page.name == *name)
            .ok_or_else(|| StoreError::PageNotFound {
                name: name.clone(),
                available: pages.iter().map(|page| page.name.clone()).collect(),
            }),
    }
}

/// Parses one page's model out of document text.
pub fn load_page(document: &str, selector: &PageSelector) -> Result<CellModel, StoreError> {
    let pages = parse_pages(document);
    let (_, page) = select(&pages, selector)?;
    parse_model(&page.model_text)
        .map_err(|source| StoreError::Model { page: page.name.clone(), source })
}

/// A document file on disk.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), durability: WriteDurability::default() }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_text(&self) -> Result<String, StoreError> {
        fs::read_to_string(&self.path).map_err(|source| StoreError::io(&self.path, source))
    }

    fn read_pages_if_exists(&self) -> Result<Option<Vec<Page>>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(parse_pages(&text))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::io(&self.path, source)),
        }
    }

    pub fn list_pages(&self) -> Result<Vec<PageSummary>, StoreError> {
        let pages = parse_pages(&self.read_text()?);
        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| PageSummary { id: page.id, name: page.name, index })
            .collect())
    }

    pub fn load_page(&self, selector: &PageSelector) -> Result<CellModel, StoreError> {
        let model = load_page(&self.read_text()?, selector)?;
        debug!(path = ?self.path, cells = model.len(), "page loaded");
        Ok(model)
    }

    /// Writes `model` into the page called `name` (default: the first page's name). A missing
    /// document is created; a missing page is appended under a fresh id. Every other page keeps
    /// its model fragment unchanged. An existing file without a single parsable page is left
    /// alone and reported as [`StoreError::NoPages`].
    pub fn save_page(
        &self,
        model: &CellModel,
        name: Option<&str>,
    ) -> Result<PageSummary, StoreError> {
        let mut pages = match self.read_pages_if_exists()? {
            Some(pages) if pages.is_empty() => return Err(StoreError::NoPages),
            Some(pages) => pages,
            None => Vec::new(),
        };
        let model_text = export_model(model);

        let name = name
            .map(str::to_owned)
            .or_else(|| pages.first().map(|page| page.name.clone()))
            .unwrap_or_else(|| DEFAULT_PAGE_NAME.to_owned());

        let index = match pages.iter().position(|page| page.name == name) {
            Some(index) => {
                pages[index].model_text = model_text;
                index
            }
            None => {
                pages.push(Page { id: new_page_id(), name, model_text });
                pages.len() - 1
            }
        };

        self.write(&render_document(&pages))?;
        let page = &pages[index];
        info!(path = ?self.path, page = %page.name, index, "page saved");
        Ok(PageSummary { id: page.id.clone(), name: page.name.clone(), index })
    }

    /// Drops one page. The last remaining page cannot be removed.
    pub fn remove_page(&self, selector: &PageSelector) -> Result<PageSummary, StoreError> {
        let mut pages = parse_pages(&self.read_text()?);
        let (index, _) = select(&pages, selector)?;
        if pages.len() == 1 {
            return Err(StoreError::LastPage);
        }

        let page = pages.remove(index);
        self.write(&render_document(&pages))?;
        info!(path = ?self.path, page = %page.name, "page removed");
        Ok(PageSummary { id: page.id, name: page.name, index })
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        write_atomic(&self.path, contents.as_bytes(), self.durability)
    }
}

/// Writes through a temp file in the same directory and renames it over `path`, so readers
/// never see a partially written document.
fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::io(path, io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")));
    };
    fs::create_dir_all(parent).map_err(|source| StoreError::io(parent, source))?;

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path =
        parent.join(format!(".cellgraph.tmp.{}.{}", file_name.to_string_lossy(), nanos));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::io(&tmp_path, source))?;
    file.write_all(contents).map_err(|source| StoreError::io(&tmp_path, source))?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::io(&tmp_path, source))?;
    }
    drop(file);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::io(path, source));
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::io(parent, source))?;
            dir.sync_all().map_err(|source| StoreError::io(parent, source))?;
        }
    }
    Ok(())
}
