//! Record filtering engine for Radarr payloads.
//!
//! Radarr returns large nested movie records. Before anything is handed
//! back to an agent the records are pushed through a fixed pipeline:
//!
//! 1. [`project`] reduces a record to a named [`FieldSet`]
//! 2. [`rewrite_locators`] turns relative image locators into absolute URLs
//! 3. [`DerivedStatus::derive`] adds tracked/monitored/downloaded flags
//!    computed from the *unfiltered* record
//! 4. [`Schema::validate`] checks and coerces the final shape
//!
//! [`SearchCriteria`] is the ad-hoc filter applied to whole collections
//! before projection.
//!
//! Everything here is synchronous and pure: nothing fails except schema
//! validation and criteria parsing.

pub mod fieldsets;
pub mod path;
pub mod project;
pub mod query;
pub mod rewrite;
pub mod schema;
pub mod shapes;
pub mod status;

pub use path::{KeyPath, Segment, select};
pub use project::{FieldSet, project, project_record};
pub use query::{Criterion, CriteriaError, NumericPredicate, SearchCriteria};
pub use rewrite::rewrite_locators;
pub use schema::{
    Extensibility, FieldError, FieldErrorKind, FieldSpec, FieldType, Schema, SchemaError,
    Validated, ValidatedShape,
};
pub use status::DerivedStatus;
