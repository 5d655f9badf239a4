//! One scoring interaction: fetch both pages, extract, score.

use tracing::info;

use crate::error::AppError;
use crate::extractors::{extract_text, PageKind};
use crate::fetch::{FetchError, PageSource};
use crate::scoring::{build_user_prompt, Scorer, SYSTEM_PROMPT};

/// Both summaries and the model's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub vacancy_text: String,
    pub resume_text: String,
    pub verdict: String,
}

/// Fetch a page and render its summary.
pub fn fetch_and_extract<S: PageSource + ?Sized>(
    source: &S,
    kind: PageKind,
    url: &str,
) -> Result<String, FetchError> {
    let page = source.fetch(url)?;
    let text = extract_text(kind, &page.document());
    info!(url = %page.url, ?kind, chars = text.len(), "page extracted");
    Ok(text)
}

/// Fetch the vacancy, then the résumé, then score them. Any fetch failure
/// aborts before scoring.
pub fn assess<S, C>(
    source: &S,
    scorer: &C,
    vacancy_url: &str,
    resume_url: &str,
) -> Result<Assessment, AppError>
where
    S: PageSource + ?Sized,
    C: Scorer + ?Sized,
{
    let vacancy_text = fetch_and_extract(source, PageKind::Vacancy, vacancy_url)?;
    let resume_text = fetch_and_extract(source, PageKind::Resume, resume_url)?;

    let prompt = build_user_prompt(&vacancy_text, &resume_text);
    let verdict = scorer.score(SYSTEM_PROMPT, &prompt)?;

    Ok(Assessment {
        vacancy_text,
        resume_text,
        verdict,
    })
}
