//! Vacancy / résumé fit scoring
//!
//! Fetches a job posting and a résumé, extracts their fields from volatile
//! markup into Markdown summaries, and asks a chat model to score the fit:
//! - Field resolution with ordered fallback locators
//! - Job posting and résumé extraction (experience blocks, skill tags)
//! - Blocking page fetch and chat-completion scoring

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod pipeline;
pub mod scoring;

pub use error::AppError;
pub use extractors::*;
pub use pipeline::{assess, fetch_and_extract, Assessment};
