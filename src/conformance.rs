//! Conformance checking for trees built to the unist shape
//!
//!     The data model has no operations of its own. Whether a tree honors it is
//!     decided here, by matching shapes: a value conforms when it has a string
//!     `type`, optional `data` without the reserved key, an optional well-ordered
//!     `position`, and `children` that are themselves conforming nodes.
//!
//!     Violations become diagnostics in a [`Report`] instead of errors, so one
//!     pass surfaces every problem in the tree.
//!
//! Rules
//!
//!     Hard shape violations are errors. Document-order and containment problems
//!     between positioned siblings and parents are warnings. A node carrying both
//!     `children` and `value` is legal but unusual and gets a hint.
//!
//!     With source text attached ([`Checker::with_source`]) every point is also
//!     checked for agreement between its line, column and offset.

pub mod checker;
pub mod diagnostics;

pub use checker::Checker;
pub use diagnostics::{Diagnostic, Report, Rule, Severity};
