//! HTML extraction modules
//!
//! Each page kind has a fixed set of locator plans resolved against the
//! parsed document and rendered as Markdown text.

mod locator;
mod resolver;
mod resume_extractor;
mod vacancy_extractor;

pub use locator::*;
pub use resolver::*;
pub use resume_extractor::*;
pub use vacancy_extractor::*;

use scraper::Html;
use serde::{Deserialize, Serialize};

/// Kind of page being extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Vacancy,
    Resume,
}

/// Extract and render a page of the given kind.
pub fn extract_text(kind: PageKind, document: &Html) -> String {
    match kind {
        PageKind::Vacancy => extract_vacancy_text(document),
        PageKind::Resume => extract_resume_text(document),
    }
}
