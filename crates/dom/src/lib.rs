//! Tabstrip DOM - Document Object Model
//!
//! An arena tree standing in for the browser chrome document. The host owns
//! it; widgets read geometry from it and write classes, attributes, inline
//! styles and text back.

mod node;
mod tree;
mod error;
mod query;

pub use node::{Node, NodeId, NodeType, ElementData};
pub use tree::{DomTree, Selection};
pub use error::{DomError, DomResult};
pub use query::Queryable;
