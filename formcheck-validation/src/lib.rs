//! Form validation by named rules.
//!
//! A form is described as rows of elements carrying the markup markers
//! (`js-field`, `js-required`, `js-subfield`, `data-type`). Each pass checks
//! every field of a required row with the rule its `data-type` names, flags
//! failing rows with `has-error` and fires a success or error callback.
//!
//! ```
//! use formcheck_validation::*;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! let rejected = Arc::new(AtomicBool::new(false));
//! let flag = rejected.clone();
//!
//! let settings = Settings::builder()
//!     .rule("age", |t| t.value().parse::<u32>().is_ok_and(|age| age >= 18))
//!     .rule("fullname", |t| t.value().split(' ').count() > 1)
//!     .on_error(move || flag.store(true, Ordering::SeqCst))
//!     .build();
//!
//! let mut form = FormScope::new()
//!     .row(Row::new().required().element(Element::new("16").field().with_type("age")))
//!     .row(Row::new().required().element(Element::new("Jane").field().with_type("fullname")));
//!
//! let mut submit = Trigger::submit();
//! let outcome = validate_form(Some(&mut submit), &mut form, settings).unwrap();
//!
//! assert_eq!(outcome.errors, 2);
//! assert_eq!(form.error_rows(), vec![0, 1]);
//! assert!(submit.is_default_prevented());
//! assert!(rejected.load(Ordering::SeqCst));
//! ```
//!
//! ## Composite fields
//!
//! When a row contains `js-subfield` elements the rule receives them as a
//! group. The built-in `date` rule reads them as day, month and year:
//!
//! ```
//! use formcheck_validation::*;
//!
//! let mut form = FormScope::new().row(
//!     Row::new()
//!         .required()
//!         .element(Element::new("").field().with_type("date"))
//!         .element(Element::new("29").subfield())
//!         .element(Element::new("2").subfield())
//!         .element(Element::new("2023").subfield()),
//! );
//!
//! let engine = ValidationEngine::new(Settings::default()).unwrap();
//! assert!(!engine.run(None, &mut form).unwrap().is_valid());
//! ```

mod config;
mod descriptor;
mod engine;
mod errors;
mod markup;
mod rules;
mod settings;
mod trigger;

pub use config::*;
pub use descriptor::*;
pub use engine::*;
pub use errors::*;
pub use markup::*;
pub use rules::*;
pub use settings::*;
pub use trigger::*;
