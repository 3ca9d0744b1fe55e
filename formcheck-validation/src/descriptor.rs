// Per-pass field descriptors

use crate::markup::{ElementRef, FormScope};
use crate::rules::{RuleName, RuleTarget};

/// What a pass needs to know about one `js-field` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub position: ElementRef,
    /// Index of the owning row
    pub row: usize,
    /// `data-type`, or `default`
    pub type_name: RuleName,
    /// The owning row is marked `js-required`
    pub required: bool,
    /// `js-subfield` elements of the owning row, in row order
    pub subfields: Vec<ElementRef>,
}

impl FieldDescriptor {
    /// Descriptors for every field of `scope`, in document order.
    pub fn collect(scope: &FormScope) -> Vec<Self> {
        scope
            .fields()
            .map(|(position, element)| {
                let row = &scope.rows[position.row];
                FieldDescriptor {
                    position,
                    row: position.row,
                    type_name: element.declared_type().map(RuleName::from).unwrap_or(RuleName::Default),
                    required: row.is_required(),
                    subfields: row
                        .subfield_indices()
                        .into_iter()
                        .map(|index| ElementRef { row: position.row, index })
                        .collect(),
                }
            })
            .collect()
    }

    pub fn is_group(&self) -> bool {
        !self.subfields.is_empty()
    }

    /// Borrow the elements this field's rule is evaluated against.
    pub fn target<'a>(&self, scope: &'a FormScope) -> Option<RuleTarget<'a>> {
        let field = scope.element(self.position)?;
        if !self.is_group() {
            return Some(RuleTarget::Field(field));
        }

        let subfields = self
            .subfields
            .iter()
            .map(|at| scope.element(*at))
            .collect::<Option<Vec<_>>>()?;
        Some(RuleTarget::Group { field, subfields })
    }
}
