//! Résumé extraction
//!
//! Scalar header fields go through the same non-empty-wins resolution as
//! vacancies. Work experience is a two-level search: locate the section, then
//! enumerate repeated item blocks by class substring and resolve each block's
//! sub-fields independently. Skills are collected from tag nodes inside the
//! skills container.

use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::{debug, warn};

use super::locator::{Locator, LocatorPlan, Predicate};
use super::resolver::{document_scope, find_all, locate, resolve_text, FieldValue};

pub const NO_PERIOD: &str = "Период не указан";
pub const NO_COMPANY: &str = "Компания не указана";
pub const NO_POSITION: &str = "Должность не указана";
pub const NO_DESCRIPTION: &str = "Описание отсутствует";
pub const NO_EXPERIENCE: &str = "Опыт работы не найден.\n";
pub const NO_SKILLS: &str = "Навыки не указаны.\n";

/// One work-experience block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub period: String,
    pub duration: Option<String>,
    pub company: String,
    pub position: String,
    pub description: String,
}

impl ExperienceEntry {
    /// Period with the duration folded in as a parenthesized suffix.
    pub fn period_with_duration(&self) -> String {
        match self.duration.as_deref() {
            Some(duration) if duration != self.period => {
                if self.period.contains(duration) {
                    self.period.replace(duration, &format!(" ({})", duration))
                } else {
                    format!("{} ({})", self.period, duration)
                }
            }
            _ => self.period.clone(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "**{}**\n\n*{}*\n\n**{}**\n\n{}\n",
            self.period_with_duration().trim(),
            self.company,
            self.position,
            self.description
        )
    }
}

/// Why an item block was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedItem {
    #[error("experience item has no recognizable sub-elements")]
    NoSubElements,
}

/// Resolved fields of a résumé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resume {
    pub name: FieldValue,
    pub gender_age: FieldValue,
    pub location: FieldValue,
    pub job_title: FieldValue,
    pub job_status: FieldValue,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
}

fn name_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("h2").data_qa("bloko-header-1"))
        .or(Locator::tag("h1").data_qa("bloko-header-1"))
        .or(Locator::tag("h2").class("bloko-header-1"))
        .or("h1")
        .or("h2")
}

fn gender_age_plan() -> LocatorPlan {
    LocatorPlan::new("p")
        .or(Locator::tag("span").class("resume-personal-gender-age"))
        .or("p")
}

fn location_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("span").data_qa("resume-personal-address"))
        .or(Locator::tag("div").data_qa("resume-personal-address"))
        .or(Locator::tag("span").class("resume-personal-address"))
        .or("span")
}

fn job_title_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("span").data_qa("resume-block-title-position"))
        .or(Locator::tag("div").data_qa("resume-block-title-position"))
        .or(Locator::tag("h3").class("bloko-header-2"))
        .or("span")
}

fn job_status_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("span").data_qa("job-search-status"))
        .or(Locator::tag("div").data_qa("job-search-status"))
        .or(Locator::tag("span").class("job-search-status"))
        .or("span")
}

fn experience_section_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").data_qa("resume-block-experience"))
        .or(Locator::tag("div").class("resume-block-experience"))
        .or(Locator::tag("div").id("resume-block-experience"))
}

fn experience_item_locator() -> Locator {
    Locator::any_tag(&["div", "section"]).class_contains("resume-block-item")
}

fn loose_experience_item_locator() -> Locator {
    Locator::tag("div").matching(Predicate::AnyOf(vec![
        Predicate::ClassAttrContains {
            needle: "gap",
            ignore_case: false,
        },
        Predicate::ClassAttrContains {
            needle: "item",
            ignore_case: false,
        },
    ]))
}

fn period_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").class("bloko-column_s-2"))
        .or(Locator::tag("div").class_contains_ci("period"))
        .or("h4")
        .or("div")
}

fn duration_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").class("bloko-text"))
        .or(Locator::tag("span").class_contains_ci("duration"))
}

fn item_company_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").class("bloko-text_strong"))
        .or("strong")
        .or("b")
}

fn position_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").data_qa("resume-block-experience-position"))
        .or(Locator::tag("div").class_contains_ci("position"))
        .or("h5")
}

fn item_description_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").data_qa("resume-block-experience-description"))
        .or(Locator::tag("div").class_contains_ci("description"))
        .or("p")
}

fn skills_section_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").data_qa("skills-table"))
        .or(Locator::tag("div").class("skills-table"))
        .or(Locator::tag("div").class("bloko-tag-list"))
}

fn skill_tag_locator() -> Locator {
    Locator::any_tag(&["span", "div"]).data_qa("bloko-tag__text")
}

fn loose_skill_tag_locator() -> Locator {
    Locator::any_tag(&["span", "div"]).matching(Predicate::AnyOf(vec![
        Predicate::ClassAttrContains {
            needle: "tag",
            ignore_case: false,
        },
        Predicate::ClassAttrContains {
            needle: "skill",
            ignore_case: true,
        },
    ]))
}

/// Resolve one item block. Missing sub-fields get placeholders; a block with
/// none of them is malformed.
pub fn extract_experience_item(item: ElementRef<'_>) -> Result<ExperienceEntry, MalformedItem> {
    let period = resolve_text(item, &period_plan());
    let duration = resolve_text(item, &duration_plan());
    let company = resolve_text(item, &item_company_plan());
    let position = resolve_text(item, &position_plan());
    let description = resolve_text(item, &item_description_plan());

    if ![&period, &duration, &company, &position, &description]
        .iter()
        .any(|field| field.is_found())
    {
        return Err(MalformedItem::NoSubElements);
    }

    Ok(ExperienceEntry {
        period: period.or_placeholder(NO_PERIOD).to_string(),
        duration: duration.found().map(String::from),
        company: company.or_placeholder(NO_COMPANY).to_string(),
        position: position.or_placeholder(NO_POSITION).to_string(),
        description: description.or_placeholder(NO_DESCRIPTION).to_string(),
    })
}

/// Work experience in document order. Malformed blocks are logged and skipped.
pub fn extract_experience(document: &Html) -> Vec<ExperienceEntry> {
    let Some(section) = locate(document_scope(document), &experience_section_plan()) else {
        debug!("experience section not found");
        return vec![];
    };

    let mut items = find_all(section, &experience_item_locator());
    if items.is_empty() {
        items = find_all(section, &loose_experience_item_locator());
    }

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match extract_experience_item(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(index, error = %e, "skipping experience item");
                None
            }
        })
        .collect()
}

/// Non-empty skill names from the skills container.
pub fn extract_skills(document: &Html) -> Vec<String> {
    let Some(section) = locate(document_scope(document), &skills_section_plan()) else {
        debug!("skills section not found");
        return vec![];
    };

    let mut tags = find_all(section, &skill_tag_locator());
    if tags.is_empty() {
        tags = find_all(section, &loose_skill_tag_locator());
    }

    tags.into_iter()
        .map(|tag| tag.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Resolve all résumé fields from a parsed page.
pub fn extract_resume(document: &Html) -> Resume {
    let scope = document_scope(document);

    let resume = Resume {
        name: resolve_text(scope, &name_plan()),
        gender_age: resolve_text(scope, &gender_age_plan()),
        location: resolve_text(scope, &location_plan()),
        job_title: resolve_text(scope, &job_title_plan()),
        job_status: resolve_text(scope, &job_status_plan()),
        experience: extract_experience(document),
        skills: extract_skills(document),
    };

    debug!(
        name = resume.name.is_found(),
        experience = resume.experience.len(),
        skills = resume.skills.len(),
        "resume fields resolved"
    );

    resume
}

/// Render a résumé as Markdown. Unresolved header lines are omitted; the
/// experience and skills sections are always present.
pub fn render_resume(resume: &Resume) -> String {
    let mut markdown = format!("# {}\n\n", resume.name);

    if let Some(gender_age) = resume.gender_age.found() {
        markdown.push_str(&format!("**{}**\n\n", gender_age));
    }

    if let Some(location) = resume.location.found() {
        markdown.push_str(&format!("**Местоположение:** {}\n\n", location));
    }

    if let Some(job_title) = resume.job_title.found() {
        markdown.push_str(&format!("**Должность:** {}\n\n", job_title));
    }

    if let Some(job_status) = resume.job_status.found() {
        markdown.push_str(&format!("**Статус:** {}\n\n", job_status));
    }

    markdown.push_str("## Опыт работы\n\n");
    if resume.experience.is_empty() {
        markdown.push_str(NO_EXPERIENCE);
    } else {
        let blocks: Vec<String> = resume.experience.iter().map(|e| e.render()).collect();
        markdown.push_str(&blocks.join("\n"));
    }

    markdown.push_str("\n## Ключевые навыки\n\n");
    if resume.skills.is_empty() {
        markdown.push_str(NO_SKILLS);
    } else {
        markdown.push_str(&resume.skills.join(", "));
    }

    markdown.trim().to_string()
}

/// Extract and render a résumé in one step.
pub fn extract_resume_text(document: &Html) -> String {
    render_resume(&extract_resume(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESUME: &str = r#"
    <html>
    <body>
        <h2 data-qa="bloko-header-1">Иван Петров</h2>
        <p>Мужчина, 32 года</p>
        <span data-qa="resume-personal-address">Москва</span>
        <span data-qa="resume-block-title-position">Backend-разработчик</span>
        <span data-qa="job-search-status">Активно ищет работу</span>
        <div data-qa="resume-block-experience">
            <div class="resume-block-item-gap">
                <div class="bloko-column_s-2">Март 2021 — настоящее время<div class="bloko-text">3 года</div></div>
                <div class="bloko-text_strong">Яндекс</div>
                <div data-qa="resume-block-experience-position">Старший разработчик</div>
                <div data-qa="resume-block-experience-description">Писал сервисы на Rust.</div>
            </div>
            <div class="resume-block-item-gap">
                <div class="bloko-column_s-2">Январь 2018 — Февраль 2021</div>
                <strong>Сбер</strong>
                <h5>Разработчик</h5>
            </div>
        </div>
        <div data-qa="skills-table">
            <span data-qa="bloko-tag__text">Rust</span>
            <span data-qa="bloko-tag__text">PostgreSQL</span>
        </div>
    </body>
    </html>
    "#;

    #[test]
    fn test_full_resume_rendering() {
        let document = Html::parse_document(FULL_RESUME);
        let expected = "# Иван Петров\n\n\
            **Мужчина, 32 года**\n\n\
            **Местоположение:** Москва\n\n\
            **Должность:** Backend-разработчик\n\n\
            **Статус:** Активно ищет работу\n\n\
            ## Опыт работы\n\n\
            **Март 2021 — настоящее время (3 года)**\n\n\
            *Яндекс*\n\n\
            **Старший разработчик**\n\n\
            Писал сервисы на Rust.\n\n\
            **Январь 2018 — Февраль 2021**\n\n\
            *Сбер*\n\n\
            **Разработчик**\n\n\
            Описание отсутствует\n\n\
            ## Ключевые навыки\n\n\
            Rust, PostgreSQL";

        assert_eq!(extract_resume_text(&document), expected);
    }

    #[test]
    fn test_malformed_item_is_skipped() {
        let html = r#"
        <div data-qa="resume-block-experience">
            <div class="resume-block-item">
                <div class="bloko-column_s-2">2020 — 2022</div>
                <div class="bloko-text_strong">Acme</div>
            </div>
            <div class="resume-block-item">просто текст без разметки</div>
        </div>
        "#;
        let document = Html::parse_document(html);

        let experience = extract_experience(&document);
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].company, "Acme");

        let text = extract_resume_text(&document);
        assert_eq!(text.matches("**2020 — 2022**").count(), 1);
    }

    #[test]
    fn test_loose_item_predicate_when_no_block_items() {
        let html = r#"
        <div id="resume-block-experience">
            <div class="exp-gap_x1"><h4>2019 — 2020</h4><b>Контора</b></div>
            <div class="row-item_y2"><h4>2017 — 2019</h4><b>Другая контора</b></div>
        </div>
        "#;
        let document = Html::parse_document(html);

        let companies: Vec<String> = extract_experience(&document)
            .into_iter()
            .map(|e| e.company)
            .collect();
        assert_eq!(companies, vec!["Контора", "Другая контора"]);
    }

    #[test]
    fn test_duration_is_appended_when_not_inside_period() {
        let entry = ExperienceEntry {
            period: "2020 — 2022".to_string(),
            duration: Some("2 года".to_string()),
            company: "Acme".to_string(),
            position: NO_POSITION.to_string(),
            description: NO_DESCRIPTION.to_string(),
        };
        assert_eq!(entry.period_with_duration(), "2020 — 2022 (2 года)");
    }

    #[test]
    fn test_skills_drop_blank_tags() {
        let html = r#"
        <div class="bloko-tag-list">
            <div data-qa="bloko-tag__text">Docker</div>
            <div data-qa="bloko-tag__text">   </div>
            <div data-qa="bloko-tag__text">Kubernetes</div>
        </div>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_skills(&document), vec!["Docker", "Kubernetes"]);
        assert!(extract_resume_text(&document).ends_with("## Ключевые навыки\n\nDocker, Kubernetes"));
    }

    #[test]
    fn test_skills_class_fallback() {
        let html = r#"
        <div class="skills-table">
            <span class="SkillChip">Go</span>
            <span class="chip">ignored</span>
            <span class="bloko-tag">gRPC</span>
        </div>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_skills(&document), vec!["Go", "gRPC"]);
    }

    #[test]
    fn test_empty_resume_placeholders() {
        let document = Html::parse_document("");
        assert_eq!(
            extract_resume_text(&document),
            "# Не найдено\n\n\
             ## Опыт работы\n\n\
             Опыт работы не найден.\n\n\
             ## Ключевые навыки\n\n\
             Навыки не указаны."
        );
    }

    #[test]
    fn test_scalar_plans_end_in_wildcard() {
        let plans = [
            name_plan(),
            gender_age_plan(),
            location_plan(),
            job_title_plan(),
            job_status_plan(),
            period_plan(),
            item_company_plan(),
            position_plan(),
            item_description_plan(),
        ];
        for plan in plans {
            assert!(plan.has_wildcard_terminal(), "{}", plan.primary());
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let document = Html::parse_document(FULL_RESUME);
        assert_eq!(extract_resume_text(&document), extract_resume_text(&document));
    }
}
