//! Field resolution over a document tree
//!
//! Every query searches the descendants of a scope element in document order
//! and takes the first match. Resolution never fails: a miss degrades to
//! `FieldValue::NotFound`.

use std::fmt;

use scraper::{ElementRef, Html};
use tracing::trace;

use super::locator::{Locator, LocatorPlan};

/// Sentinel rendered for a field no locator could resolve.
pub const NOT_FOUND: &str = "Не найдено";

/// Trimmed text of a matched node, or the "not found" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Found(String),
    NotFound,
}

impl FieldValue {
    fn from_text(text: String) -> Self {
        if text.is_empty() {
            FieldValue::NotFound
        } else {
            FieldValue::Found(text)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Found(text) => text,
            FieldValue::NotFound => NOT_FOUND,
        }
    }

    pub fn found(&self) -> Option<&str> {
        match self {
            FieldValue::Found(text) => Some(text),
            FieldValue::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldValue::Found(_))
    }

    /// Field-specific placeholder instead of the generic sentinel.
    pub fn or_placeholder<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.found().unwrap_or(placeholder)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope covering the whole document.
pub fn document_scope(document: &Html) -> ElementRef<'_> {
    document.root_element()
}

fn descendants<'a>(scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    // descendants() yields the scope itself first
    scope.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First descendant matching `locator`, in document order.
pub fn find_first<'a>(scope: ElementRef<'a>, locator: &Locator) -> Option<ElementRef<'a>> {
    descendants(scope).find(|el| locator.matches(el))
}

/// Every descendant matching `locator`, in document order. Nested matches are
/// all returned.
pub fn find_all<'a>(scope: ElementRef<'a>, locator: &Locator) -> Vec<ElementRef<'a>> {
    descendants(scope).filter(|el| locator.matches(el)).collect()
}

/// First candidate of `plan` that matches any node at all, regardless of its
/// text. Used for section containers.
pub fn locate<'a>(scope: ElementRef<'a>, plan: &LocatorPlan) -> Option<ElementRef<'a>> {
    plan.candidates().find_map(|locator| {
        let found = find_first(scope, locator);
        if found.is_some() {
            trace!(%locator, "container located");
        }
        found
    })
}

/// Concatenated descendant text, trimmed.
pub fn node_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Descendant text nodes joined with newlines, trimmed. Keeps paragraphs of
/// multi-block content apart.
pub fn block_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join("\n").trim().to_string()
}

/// Resolve a single-node field: the first candidate whose first match has
/// non-empty text wins. The primary locator short-circuits the fallbacks.
pub fn resolve_text(scope: ElementRef<'_>, plan: &LocatorPlan) -> FieldValue {
    resolve_with(scope, plan, node_text)
}

/// Like `resolve_text`, but reads the whole block with newline separators.
pub fn resolve_block(scope: ElementRef<'_>, plan: &LocatorPlan) -> FieldValue {
    resolve_with(scope, plan, block_text)
}

fn resolve_with(
    scope: ElementRef<'_>,
    plan: &LocatorPlan,
    extract: fn(ElementRef<'_>) -> String,
) -> FieldValue {
    plan.candidates()
        .find_map(|locator| {
            let el = find_first(scope, locator)?;
            let text = extract(el);
            if text.is_empty() {
                trace!(%locator, "matched node has no text, falling through");
                return None;
            }
            trace!(%locator, "field resolved");
            Some(text)
        })
        .map(FieldValue::from_text)
        .unwrap_or(FieldValue::NotFound)
}
