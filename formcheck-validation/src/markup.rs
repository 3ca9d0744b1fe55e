// Form markup model
//
// A snapshot of the page's form: rows in document order, each holding its
// inputs. Only the class and attribute markers below are interpreted.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Marks an element as a field to validate.
pub const FIELD_CLASS: &str = "js-field";
/// Marks a row whose fields must be validated.
pub const REQUIRED_CLASS: &str = "js-required";
/// Marks an element as one part of a composite value.
pub const SUBFIELD_CLASS: &str = "js-subfield";
/// Set on a row whose rule failed in the latest pass.
pub const ERROR_CLASS: &str = "has-error";
/// Attribute naming the rule a field is checked with.
pub const TYPE_ATTRIBUTE: &str = "data-type";
/// Rule used when a field has no `data-type`.
pub const DEFAULT_TYPE: &str = "default";

/// One input element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add the `js-field` marker.
    pub fn field(self) -> Self {
        self.class(FIELD_CLASS)
    }

    /// Add the `js-subfield` marker.
    pub fn subfield(self) -> Self {
        self.class(SUBFIELD_CLASS)
    }

    /// Set `data-type`.
    pub fn with_type(self, rule: impl Into<String>) -> Self {
        self.attr(TYPE_ATTRIBUTE, rule)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_field(&self) -> bool {
        self.has_class(FIELD_CLASS)
    }

    pub fn is_subfield(&self) -> bool {
        self.has_class(SUBFIELD_CLASS)
    }

    /// The `data-type` attribute, if present and non-empty.
    pub fn declared_type(&self) -> Option<&str> {
        self.attributes
            .get(TYPE_ATTRIBUTE)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// The container a field is displayed in; error state is tracked per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the `js-required` marker.
    pub fn required(mut self) -> Self {
        self.classes.insert(REQUIRED_CLASS.to_string());
        self
    }

    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn is_required(&self) -> bool {
        self.classes.contains(REQUIRED_CLASS)
    }

    pub fn has_error(&self) -> bool {
        self.classes.contains(ERROR_CLASS)
    }

    pub(crate) fn set_error(&mut self, failed: bool) {
        if failed {
            self.classes.insert(ERROR_CLASS.to_string());
        } else {
            self.classes.remove(ERROR_CLASS);
        }
    }

    /// Indices of `js-subfield` elements, in row order.
    pub fn subfield_indices(&self) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_subfield())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Position of an element inside a [`FormScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    pub row: usize,
    pub index: usize,
}

/// The form (or any sub-container) whose fields make up one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormScope {
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl FormScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Parse a snapshot sent by the page.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn element(&self, at: ElementRef) -> Option<&Element> {
        self.rows.get(at.row)?.elements.get(at.index)
    }

    pub fn element_mut(&mut self, at: ElementRef) -> Option<&mut Element> {
        self.rows.get_mut(at.row)?.elements.get_mut(at.index)
    }

    /// Every `js-field` element in document order.
    pub fn fields(&self) -> impl Iterator<Item = (ElementRef, &Element)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, r)| {
            r.elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_field())
                .map(move |(index, e)| (ElementRef { row, index }, e))
        })
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Indices of rows currently flagged with `has-error`.
    pub fn error_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.has_error())
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_row() -> Row {
        Row::new()
            .required()
            .element(Element::new("").field().with_type("date"))
            .element(Element::new("12").subfield())
            .element(Element::new("5").subfield())
            .element(Element::new("2020").subfield())
    }

    #[test]
    fn test_fields_in_document_order() {
        let scope = FormScope::new()
            .row(Row::new().element(Element::new("a").field()))
            .row(date_row())
            .row(Row::new().element(Element::new("not a field")));

        let refs: Vec<_> = scope.fields().map(|(at, _)| at).collect();
        assert_eq!(refs, vec![ElementRef { row: 0, index: 0 }, ElementRef { row: 1, index: 0 }]);
        assert_eq!(scope.field_count(), 2);
    }

    #[test]
    fn test_subfield_indices() {
        assert_eq!(date_row().subfield_indices(), vec![1, 2, 3]);
        assert!(Row::new().subfield_indices().is_empty());
    }

    #[test]
    fn test_declared_type_ignores_empty() {
        assert_eq!(Element::new("").with_type("email").declared_type(), Some("email"));
        assert_eq!(Element::new("").with_type("").declared_type(), None);
        assert_eq!(Element::new("").declared_type(), None);
    }

    #[test]
    fn test_error_flag_toggle() {
        let mut row = Row::new().required();
        row.set_error(true);
        assert!(row.has_error());
        assert!(row.is_required());
        row.set_error(false);
        assert!(!row.has_error());
    }

    #[test]
    fn test_from_json() {
        let scope = FormScope::from_json(
            r#"{"rows": [{"classes": ["form__row", "js-required"],
                          "elements": [{"value": "x", "classes": ["js-field"],
                                        "attributes": {"data-type": "email"}}]}]}"#,
        )
        .unwrap();

        assert!(scope.rows[0].is_required());
        assert_eq!(scope.rows[0].elements[0].declared_type(), Some("email"));
        assert_eq!(scope.field_count(), 1);
    }
}
