//! Formfields Core - declarative form schemas and submitted value validation
//!
//! This crate decodes a form schema (an ordered list of typed fields) and
//! validates submitted form values against it:
//! - **Choice fields**: `Dropdown`, `ChooseOne`, `ChooseMultiple`, with
//!   `value | label` choice strings
//! - **Text fields**: `LongText` with an optional maximum length, and
//!   `ShortText` with HTML-style attributes (`type`, `pattern`, `multiple`,
//!   `maxlength`, `minlength`)
//!
//! ## Quick Start
//!
//! ```rust
//! use formfields_core::{validate_form_values, ErrorKind, SubmittedValues};
//!
//! let schema = br#"[
//!     {"label": "Email", "name": "email", "presence": "Required",
//!      "type": {"type": "ShortText", "attributes": {"type": "email"}}}
//! ]"#;
//!
//! let ok = SubmittedValues::from_query("email=alice%40example.com");
//! assert!(validate_form_values(schema, &ok).is_ok());
//!
//! let bad = SubmittedValues::from_query("email=invalid-email");
//! let err = validate_form_values(schema, &bad).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidEmail);
//! ```
//!
//! ## Validation Order
//!
//! Fields are checked in schema order and the first failing field is
//! reported. [`FormSchema::collect_errors`] gathers one error per failing
//! field instead, bounded by a [`ValidationConfig`].
//!
//! Copyright (c) 2025 Formfields Team
//! Licensed under the Apache-2.0 license

pub mod choice;
pub mod error;
pub mod field;
pub mod schema;
pub mod validator;
pub mod values;

// Re-export commonly used types for convenience
pub use choice::{Choice, Choices};
pub use error::{Error, ErrorKind, Result, ValidationErrors};
pub use field::{is_valid_email, FieldDescriptor, FieldType, Presence, ShortText};
pub use schema::FormSchema;
pub use validator::{collect_form_errors, validate_form_values, ValidationConfig};
pub use values::SubmittedValues;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
