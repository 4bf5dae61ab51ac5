//! The tree-node data model
//!
//!     Syntactic units in unist syntax trees are called nodes. Every node has a
//!     `type` naming its variant, may carry ecosystem `data`, and carries a
//!     `position` when it was parsed from source text. Generated nodes, those
//!     synthesized by a tool, have no position.
//!
//!     Two refinements build the tree: a [`Parent`] owns an ordered list of
//!     children in document order, a [`Literal`] holds a single value such as
//!     raw text. Nothing prevents a node from being both.
//!
//! Modules
//!
//!     - `node` - the `Node`, `Parent` and `Literal` contracts, and `GenericNode`
//!     - `position` - `Point` and `Position`
//!     - `data` - the open `Data` mapping and its reserved key
//!     - `location` - converting offsets in source text to points
//!     - `error` - shape violations found on typed values
//!
//! JSON shape
//!
//! ```text
//! {
//!   "type": "text",
//!   "value": "hi",
//!   "position": {
//!     "start": {"line": 1, "column": 1, "offset": 0},
//!     "end": {"line": 1, "column": 3, "offset": 2},
//!     "indent": []
//!   }
//! }
//! ```

pub mod data;
pub mod error;
pub mod location;
pub mod node;
pub mod position;

pub use data::{Data, RESERVED_KEY};
pub use error::ShapeError;
pub use location::SourceLocation;
pub use node::{validate_node, GenericNode, Literal, Node, Parent};
pub use position::{Point, Position};
