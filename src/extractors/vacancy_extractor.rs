//! Job posting extraction

use scraper::Html;
use tracing::debug;

use super::locator::{Locator, LocatorPlan};
use super::resolver::{document_scope, resolve_block, resolve_text, FieldValue};

/// Rendered when no description container is present.
pub const NO_VACANCY_DESCRIPTION: &str = "Описание не найдено";

/// Resolved fields of a job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vacancy {
    pub title: FieldValue,
    pub salary: FieldValue,
    pub company: FieldValue,
    pub description: FieldValue,
}

fn title_plan() -> LocatorPlan {
    LocatorPlan::new("h1")
        .or(Locator::tag("h1").class("bloko-header-1"))
        .or("title")
        .or("h1")
}

fn salary_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("span").data_qa("vacancy-salary"))
        .or(Locator::tag("div").class("vacancy-salary"))
        .or(Locator::tag("span").class("bloko-header-2"))
        .or("span")
}

fn company_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("a").data_qa("vacancy-company-name"))
        .or(Locator::tag("span").data_qa("vacancy-company-name"))
        .or(Locator::tag("a").class("vacancy-company-name"))
        .or("a")
}

fn description_plan() -> LocatorPlan {
    LocatorPlan::new(Locator::tag("div").data_qa("vacancy-description"))
        .or(Locator::tag("div").class("vacancy-description"))
        .or(Locator::tag("div").id("vacancy-description"))
}

/// Resolve all vacancy fields from a parsed page.
pub fn extract_vacancy(document: &Html) -> Vacancy {
    let scope = document_scope(document);

    let vacancy = Vacancy {
        title: resolve_text(scope, &title_plan()),
        salary: resolve_text(scope, &salary_plan()),
        company: resolve_text(scope, &company_plan()),
        description: resolve_block(scope, &description_plan()),
    };

    debug!(
        title = vacancy.title.is_found(),
        salary = vacancy.salary.is_found(),
        company = vacancy.company.is_found(),
        description = vacancy.description.is_found(),
        "vacancy fields resolved"
    );

    vacancy
}

/// Render a vacancy as Markdown. Unresolved company and salary lines are
/// omitted; the title and description sections are always present.
pub fn render_vacancy(vacancy: &Vacancy) -> String {
    let mut markdown = format!("# {}\n\n", vacancy.title);

    if let Some(company) = vacancy.company.found() {
        markdown.push_str(&format!("**Компания:** {}\n\n", company));
    }

    if let Some(salary) = vacancy.salary.found() {
        markdown.push_str(&format!("**Зарплата:** {}\n\n", salary));
    }

    markdown.push_str(&format!(
        "## Описание\n\n{}",
        vacancy.description.or_placeholder(NO_VACANCY_DESCRIPTION)
    ));

    markdown.trim().to_string()
}

/// Extract and render a job posting in one step.
pub fn extract_vacancy_text(document: &Html) -> String {
    render_vacancy(&extract_vacancy(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_vacancy() {
        let document = Html::parse_document("<h1>Backend Engineer</h1>");
        assert_eq!(
            extract_vacancy_text(&document),
            "# Backend Engineer\n\n## Описание\n\nОписание не найдено"
        );
    }

    #[test]
    fn test_full_vacancy() {
        let html = r#"
        <html>
        <head><title>Вакансия Rust-разработчик</title></head>
        <body>
            <h1 data-qa="vacancy-title">Rust-разработчик</h1>
            <div data-qa="vacancy-salary-block">
                <span data-qa="vacancy-salary">от 250 000 ₽ на руки</span>
            </div>
            <a data-qa="vacancy-company-name" href="/employer/1">ООО Ромашка</a>
            <div data-qa="vacancy-description"><p>Пишем сервисы.</p><ul><li>Rust</li><li>PostgreSQL</li></ul></div>
        </body>
        </html>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(
            extract_vacancy_text(&document),
            "# Rust-разработчик\n\n\
             **Компания:** ООО Ромашка\n\n\
             **Зарплата:** от 250 000 ₽ на руки\n\n\
             ## Описание\n\n\
             Пишем сервисы.\nRust\nPostgreSQL"
        );
    }

    #[test]
    fn test_title_falls_back_to_document_title() {
        let html = r#"<html><head><title>Аналитик данных</title></head><body><h1>  </h1></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_vacancy(&document).title.as_str(), "Аналитик данных");
    }

    #[test]
    fn test_description_alternate_containers() {
        let by_class = Html::parse_document(
            r#"<h1>QA</h1><div class="g-user-content vacancy-description">Тестируем</div>"#,
        );
        assert_eq!(
            extract_vacancy(&by_class).description.as_str(),
            "Тестируем"
        );

        let by_id = Html::parse_document(r#"<h1>QA</h1><div id="vacancy-description">По id</div>"#);
        assert_eq!(extract_vacancy(&by_id).description.as_str(), "По id");
    }

    #[test]
    fn test_missing_fields_are_omitted_not_printed() {
        let document = Html::parse_document(
            r#"<h1>DevOps</h1><div id="vacancy-description">Описание работы</div>"#,
        );
        let text = extract_vacancy_text(&document);
        assert!(!text.contains("Компания"));
        assert!(!text.contains("Зарплата"));
        assert!(!text.contains("Не найдено"));
    }

    #[test]
    fn test_empty_document_still_renders() {
        let document = Html::parse_document("");
        assert_eq!(
            extract_vacancy_text(&document),
            "# Не найдено\n\n## Описание\n\nОписание не найдено"
        );
    }

    #[test]
    fn test_scalar_plans_end_in_wildcard() {
        for plan in [title_plan(), salary_plan(), company_plan()] {
            assert!(plan.has_wildcard_terminal(), "{:?}", plan.primary());
        }
        assert!(!description_plan().has_wildcard_terminal());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let document = Html::parse_document(
            r#"<h1>SRE</h1><span data-qa="vacancy-salary">300 000</span><a href="/">Acme</a>"#,
        );
        assert_eq!(extract_vacancy_text(&document), extract_vacancy_text(&document));
    }
}
