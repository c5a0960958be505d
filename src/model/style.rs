// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cellgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of cellgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Style codec: `key1=value1;key2=value2;` text <-> ordered key-value mapping.
//!
//! Styles are held as a single ordered mapping everywhere inside the crate; the flattened text form
//! only exists at the serialization boundary.

use std::fmt;

use indexmap::IndexMap;

/// One style value.
///
/// `Unset` is the "undefined" marker: it is dropped by [`stringify_style`] and, when used as an
/// override in [`Style::merge`], removes the key from the base style.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Unset,
}

impl StyleValue {
    /// Falsy-but-defined values render as a bare key.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Bool(b) => !*b,
            Self::Unset => false,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view; text values are parsed leniently (`"24"` -> `24.0`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Unset => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            Self::Unset => Ok(()),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered style mapping. Key order is insertion order; re-setting a key keeps its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    entries: IndexMap<String, StyleValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(StyleValue::as_text)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.entries.get(key).and_then(StyleValue::as_number)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// True when the key is present and its value reads as `1` (a flag such as `rounded=1`).
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get_number(key).is_some_and(|n| n == 1.0)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.entries.shift_remove(key)
    }

    /// Applies `overrides` on top of `self`: override values win, `Unset` overrides delete.
    pub fn merge(&mut self, overrides: &Style) {
        for (key, value) in &overrides.entries {
            if value.is_unset() {
                self.entries.shift_remove(key);
            } else {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn merged(mut self, overrides: &Style) -> Self {
        self.merge(overrides);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Style::new();
        for (key, value) in iter {
            style.set(key, value);
        }
        style
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify_style(self))
    }
}

/// Parses flattened style text. Empty segments are ignored; a key without `=` (or with nothing
/// after it) maps to the empty string.
pub fn parse_style(input: &str) -> Style {
    let mut style = Style::new();
    for segment in input.split(';') {
        if segment.is_empty() {
            continue;
        }
        let (key, value) = match segment.split_once('=') {
            Some((key, value)) => (key, value),
            None => (segment, ""),
        };
        if key.is_empty() {
            continue;
        }
        style.set(key, value);
    }
    style
}

/// Flattens a style. `Unset` entries are omitted, falsy values become a bare `key;`, everything
/// else is `key=value;`.
pub fn stringify_style(style: &Style) -> String {
    let mut out = String::new();
    for (key, value) in &style.entries {
        if value.is_unset() {
            continue;
        }
        out.push_str(key);
        if !value.is_falsy() {
            out.push('=');
            out.push_str(&value.to_string());
        }
        out.push(';');
    }
    out
}

pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
