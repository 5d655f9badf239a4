//! Locators and locator plans
//!
//! A `Locator` names one or more acceptable tag names plus a conjunction of
//! predicates. A `LocatorPlan` is a primary locator followed by progressively
//! looser fallbacks, tried in order.

use std::fmt;

use scraper::ElementRef;

/// The capabilities a locator needs from a tree node.
pub trait ElementView {
    fn tag_name(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;

    fn tag_name_is(&self, tag: &str) -> bool {
        self.tag_name().eq_ignore_ascii_case(tag)
    }

    fn has_attribute(&self, name: &str, value: &str) -> bool {
        self.attr(name) == Some(value)
    }

    /// Whole-token match against the class list.
    fn class_list_contains(&self, token: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == token))
    }

    /// Substring match against the raw class attribute. Hashed class names
    /// (`resume-block-item-gap_a1b2`) only match this way.
    fn class_attr_contains(&self, needle: &str, ignore_case: bool) -> bool {
        match self.attr("class") {
            Some(classes) if ignore_case => classes
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Some(classes) => classes.contains(needle),
            None => false,
        }
    }
}

impl ElementView for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }
}

/// A single node test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Attribute {
        name: &'static str,
        value: &'static str,
    },
    ClassListContains(&'static str),
    ClassAttrContains {
        needle: &'static str,
        ignore_case: bool,
    },
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn matches<E: ElementView + ?Sized>(&self, el: &E) -> bool {
        match self {
            Predicate::Attribute { name, value } => el.has_attribute(name, value),
            Predicate::ClassListContains(token) => el.class_list_contains(token),
            Predicate::ClassAttrContains {
                needle,
                ignore_case,
            } => el.class_attr_contains(needle, *ignore_case),
            Predicate::AnyOf(options) => options.iter().any(|p| p.matches(el)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Attribute { name, value } => write!(f, "[{}=\"{}\"]", name, value),
            Predicate::ClassListContains(token) => write!(f, ".{}", token),
            Predicate::ClassAttrContains {
                needle,
                ignore_case: false,
            } => write!(f, "[class*=\"{}\"]", needle),
            Predicate::ClassAttrContains {
                needle,
                ignore_case: true,
            } => write!(f, "[class*=\"{}\" i]", needle),
            Predicate::AnyOf(options) => {
                write!(f, ":is(")?;
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", option)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Tag names (any of) plus predicates (all of).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    tags: Vec<&'static str>,
    predicates: Vec<Predicate>,
}

impl Locator {
    pub fn tag(tag: &'static str) -> Self {
        Self {
            tags: vec![tag],
            predicates: vec![],
        }
    }

    pub fn any_tag(tags: &[&'static str]) -> Self {
        Self {
            tags: tags.to_vec(),
            predicates: vec![],
        }
    }

    /// Attribute filter. `class` filters match a single class token, every
    /// other attribute must be equal.
    pub fn attr(self, name: &'static str, value: &'static str) -> Self {
        if name == "class" {
            return self.matching(Predicate::ClassListContains(value));
        }
        self.matching(Predicate::Attribute { name, value })
    }

    pub fn data_qa(self, value: &'static str) -> Self {
        self.attr("data-qa", value)
    }

    pub fn class(self, token: &'static str) -> Self {
        self.attr("class", token)
    }

    pub fn id(self, id: &'static str) -> Self {
        self.attr("id", id)
    }

    pub fn class_contains(self, needle: &'static str) -> Self {
        self.matching(Predicate::ClassAttrContains {
            needle,
            ignore_case: false,
        })
    }

    pub fn class_contains_ci(self, needle: &'static str) -> Self {
        self.matching(Predicate::ClassAttrContains {
            needle,
            ignore_case: true,
        })
    }

    pub fn matching(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// True when the locator matches by tag alone.
    pub fn is_tag_only(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches<E: ElementView + ?Sized>(&self, el: &E) -> bool {
        self.tags.iter().any(|tag| el.tag_name_is(tag))
            && self.predicates.iter().all(|p| p.matches(el))
    }
}

impl From<&'static str> for Locator {
    fn from(tag: &'static str) -> Self {
        Locator::tag(tag)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tags.as_slice() {
            [single] => write!(f, "{}", single)?,
            many => write!(f, ":is({})", many.join(", "))?,
        }
        for predicate in &self.predicates {
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}

/// Primary locator followed by ordered fallbacks. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorPlan {
    primary: Locator,
    fallbacks: Vec<Locator>,
}

impl LocatorPlan {
    pub fn new(primary: impl Into<Locator>) -> Self {
        Self {
            primary: primary.into(),
            fallbacks: vec![],
        }
    }

    pub fn or(mut self, fallback: impl Into<Locator>) -> Self {
        self.fallbacks.push(fallback.into());
        self
    }

    pub fn primary(&self) -> &Locator {
        &self.primary
    }

    pub fn fallbacks(&self) -> &[Locator] {
        &self.fallbacks
    }

    /// Primary first, then fallbacks in declared order.
    pub fn candidates(&self) -> impl Iterator<Item = &Locator> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.fallbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the last candidate is a tag-only wildcard.
    pub fn has_wildcard_terminal(&self) -> bool {
        self.fallbacks
            .last()
            .unwrap_or(&self.primary)
            .is_tag_only()
    }
}
