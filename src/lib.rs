//! # unist
//!
//! Structural contracts for unist syntax trees, and a checker that tells
//! whether a tree honors them.
//!
//! The [`ast`] module is the data model: the [`Node`](ast::Node),
//! [`Parent`](ast::Parent) and [`Literal`](ast::Literal) traits, and the
//! [`Position`](ast::Position), [`Point`](ast::Point) and [`Data`](ast::Data)
//! types they expose. Downstream crates define concrete node variants and
//! implement the traits; conformance is by shape, not by inheritance.
//!
//! The [`conformance`] module checks trees in their JSON shape against the
//! invariants of the model. [`loader`] reads trees from JSON or YAML files and
//! [`config`] holds the checker settings layered over embedded defaults.

pub mod ast;
pub mod config;
pub mod conformance;
pub mod error;
pub mod loader;

pub use error::{Error, Result};
