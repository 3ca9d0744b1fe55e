// Rule registry
//
// Maps a rule name (the field's `data-type`) to a predicate. Seeded with the
// `default`, `email` and `date` rules; caller entries replace or extend them.

use crate::markup::{Element, DEFAULT_TYPE};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

/// Name a rule is registered and looked up under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleName {
    /// Presence check, used when a field declares no type
    Default,
    Email,
    /// Day, month and year subfields form an existing date
    Date,
    Custom(String),
}

impl RuleName {
    pub fn as_str(&self) -> &str {
        match self {
            RuleName::Default => DEFAULT_TYPE,
            RuleName::Email => "email",
            RuleName::Date => "date",
            RuleName::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, RuleName::Custom(_))
    }
}

impl From<&str> for RuleName {
    fn from(name: &str) -> Self {
        match name {
            DEFAULT_TYPE => RuleName::Default,
            "email" => RuleName::Email,
            "date" => RuleName::Date,
            other => RuleName::Custom(other.to_string()),
        }
    }
}

impl From<String> for RuleName {
    fn from(name: String) -> Self {
        RuleName::from(name.as_str())
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.as_str().to_string()
    }
}

impl FromStr for RuleName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RuleName::from(s))
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// `Custom("date")` and `Date` name the same slot.
impl PartialEq for RuleName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for RuleName {}

impl Hash for RuleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

/// What a rule is evaluated against.
#[derive(Debug, Clone)]
pub enum RuleTarget<'a> {
    /// A field whose row has no subfields
    Field(&'a Element),
    /// A field plus the row's subfields, in row order
    Group {
        field: &'a Element,
        subfields: Vec<&'a Element>,
    },
}

impl<'a> RuleTarget<'a> {
    pub fn field(&self) -> &'a Element {
        match self {
            RuleTarget::Field(field) | RuleTarget::Group { field, .. } => *field,
        }
    }

    /// The field's own value.
    pub fn value(&self) -> &'a str {
        &self.field().value
    }

    /// Empty unless this is a group.
    pub fn subfields(&self) -> &[&'a Element] {
        match self {
            RuleTarget::Field(_) => &[],
            RuleTarget::Group { subfields, .. } => subfields.as_slice(),
        }
    }
}

/// Predicate behind a rule; `true` means valid.
pub type RuleFn = Arc<dyn Fn(&RuleTarget<'_>) -> bool + Send + Sync>;

/// A registry slot.
#[derive(Clone)]
pub enum Rule {
    Callable(RuleFn),
    /// Registered but not callable. Fields naming it are skipped, never failed.
    Inert,
}

impl Rule {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&RuleTarget<'_>) -> bool + Send + Sync + 'static,
    {
        Rule::Callable(Arc::new(predicate))
    }

    pub fn as_callable(&self) -> Option<&RuleFn> {
        match self {
            Rule::Callable(f) => Some(f),
            Rule::Inert => None,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Callable(_) => f.write_str("Rule::Callable(..)"),
            Rule::Inert => f.write_str("Rule::Inert"),
        }
    }
}

/// Pattern the built-in `email` rule matches against.
#[derive(Debug, Clone)]
pub struct EmailPattern(Regex);

impl EmailPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for EmailPattern {
    fn default() -> Self {
        Self(EMAIL_REGEX.clone())
    }
}

impl From<Regex> for EmailPattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

/// Built-in `default` rule: the field has a value.
pub fn is_present(target: &RuleTarget<'_>) -> bool {
    !target.value().is_empty()
}

fn date_part(element: &Element) -> Option<i64> {
    let raw = element.value.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

// Browsers read years 0-99 as 1900-1999, so those never name themselves.
const FIRST_FULL_YEAR: i32 = 100;

/// Built-in `date` rule: subfields are day, month (1-12) and year of a real date.
pub fn is_calendar_date(target: &RuleTarget<'_>) -> bool {
    let [day, month, year] = match target.subfields() {
        [d, m, y, ..] => [*d, *m, *y],
        _ => return false,
    };

    let (Some(day), Some(month), Some(year)) = (date_part(day), date_part(month), date_part(year))
    else {
        return false;
    };

    let (Ok(day), Ok(month), Ok(year)) = (u32::try_from(day), u32::try_from(month), i32::try_from(year))
    else {
        return false;
    };

    if year < FIRST_FULL_YEAR {
        return false;
    }

    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Rules available to one engine.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<RuleName, Rule>,
}

impl RuleRegistry {
    /// An empty registry, without the built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// `default`, `email` (matching `email`) and `date`.
    pub fn with_defaults(email: EmailPattern) -> Self {
        let mut registry = Self::new();
        registry.insert(RuleName::Default, Rule::new(is_present));
        registry.insert(
            RuleName::Email,
            Rule::new(move |target| email.is_match(target.value())),
        );
        registry.insert(RuleName::Date, Rule::new(is_calendar_date));
        registry
    }

    /// Put `rule` under `name`, returning what it replaced.
    pub fn insert(&mut self, name: impl Into<RuleName>, rule: Rule) -> Option<Rule> {
        self.rules.insert(name.into(), rule)
    }

    /// Builder form of [`insert`](Self::insert) for a predicate.
    pub fn with<F>(mut self, name: impl Into<RuleName>, predicate: F) -> Self
    where
        F: Fn(&RuleTarget<'_>) -> bool + Send + Sync + 'static,
    {
        self.insert(name, Rule::new(predicate));
        self
    }

    pub fn register_inert(&mut self, name: impl Into<RuleName>) {
        self.insert(name, Rule::Inert);
    }

    /// Entries of `overrides` win over entries already present.
    pub fn merge(&mut self, overrides: RuleRegistry) {
        self.rules.extend(overrides.rules);
    }

    pub fn get(&self, name: &RuleName) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn callable(&self, name: &RuleName) -> Option<&RuleFn> {
        self.get(name).and_then(Rule::as_callable)
    }

    pub fn contains(&self, name: &RuleName) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<RuleName> {
        let mut names: Vec<_> = self.rules.keys().cloned().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.names().iter().map(|n| (n.as_str(), &self.rules[n]))).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: &str, month: &str, year: &str) -> bool {
        let field = Element::new("").field().with_type("date");
        let parts = [Element::new(day), Element::new(month), Element::new(year)];
        let target = RuleTarget::Group {
            field: &field,
            subfields: parts.iter().collect(),
        };
        is_calendar_date(&target)
    }

    #[test]
    fn test_rule_name_normalizes() {
        assert_eq!(RuleName::from("default"), RuleName::Default);
        assert_eq!(RuleName::Custom("date".into()), RuleName::Date);
        assert_eq!("age".parse::<RuleName>().unwrap(), RuleName::Custom("age".into()));
        assert_eq!(RuleName::Email.to_string(), "email");
        assert!(RuleName::Date.is_builtin());
        assert!(!RuleName::from("age").is_builtin());
    }

    #[test]
    fn test_rule_name_serde_as_string() {
        let json = serde_json::to_string(&vec![RuleName::Date, RuleName::from("age")]).unwrap();
        assert_eq!(json, r#"["date","age"]"#);
        let back: Vec<RuleName> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![RuleName::Date, RuleName::from("age")]);
    }

    #[test]
    fn test_present() {
        let filled = Element::new("x");
        let blank = Element::new("");
        let spaces = Element::new("  ");
        assert!(is_present(&RuleTarget::Field(&filled)));
        assert!(!is_present(&RuleTarget::Field(&blank)));
        assert!(is_present(&RuleTarget::Field(&spaces)));
    }

    #[test]
    fn test_calendar_dates() {
        assert!(date("29", "2", "2024"));
        assert!(!date("29", "2", "2023"));
        assert!(!date("31", "4", "2024"));
        assert!(date("30", "4", "2024"));
        assert!(date(" 01 ", "12", "1999"));
        assert!(!date("1", "13", "2024"));
        assert!(!date("0", "1", "2024"));
        assert!(!date("", "1", "2024"));
        assert!(!date("1", "1", "twenty"));
        assert!(!date("-1", "1", "2024"));
        assert!(!date("1.5", "1", "2024"));
        assert!(!date("1", "1", ""));
        assert!(!date("1", "1", "0"));
        assert!(!date("15", "6", "50"));
        assert!(!date("1", "", "2024"));
        assert!(date("1", "1", "100"));
    }

    #[test]
    fn test_date_needs_three_subfields() {
        let field = Element::new("2024-02-29");
        assert!(!is_calendar_date(&RuleTarget::Field(&field)));

        let parts = [Element::new("1"), Element::new("1")];
        let target = RuleTarget::Group {
            field: &field,
            subfields: parts.iter().collect(),
        };
        assert!(!is_calendar_date(&target));
    }

    #[test]
    fn test_default_email_pattern() {
        let registry = RuleRegistry::with_defaults(EmailPattern::default());
        let email = registry.callable(&RuleName::Email).unwrap();
        assert!(email(&RuleTarget::Field(&Element::new("jane@example.com"))));
        assert!(!email(&RuleTarget::Field(&Element::new("jane@"))));
    }

    #[test]
    fn test_injected_email_pattern() {
        let pattern = EmailPattern::new(r"^[^@]+@corp\.example$").unwrap();
        let registry = RuleRegistry::with_defaults(pattern);
        let email = registry.callable(&RuleName::Email).unwrap();
        assert!(email(&RuleTarget::Field(&Element::new("jane@corp.example"))));
        assert!(!email(&RuleTarget::Field(&Element::new("jane@example.com"))));
        assert!(EmailPattern::new("(").is_err());
    }

    #[test]
    fn test_merge_overrides_and_extends() {
        let mut registry = RuleRegistry::with_defaults(EmailPattern::default());
        registry.merge(
            RuleRegistry::new()
                .with("default", |t| t.value() == "ok")
                .with("age", |t| t.value().parse::<u32>().is_ok_and(|age| age >= 18)),
        );

        assert_eq!(registry.len(), 4);
        let default = registry.callable(&RuleName::Default).unwrap();
        assert!(!default(&RuleTarget::Field(&Element::new("anything"))));
        assert!(default(&RuleTarget::Field(&Element::new("ok"))));
        assert!(registry.contains(&RuleName::from("age")));
    }

    #[test]
    fn test_inert_slot_is_not_callable() {
        let mut registry = RuleRegistry::with_defaults(EmailPattern::default());
        registry.register_inert("email");
        assert!(registry.contains(&RuleName::Email));
        assert!(registry.callable(&RuleName::Email).is_none());
        assert_eq!(
            registry.names(),
            vec![RuleName::Date, RuleName::Default, RuleName::Email]
        );
    }
}
