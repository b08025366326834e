//! E4X-style views over an XML tree.
//!
//! This crate wraps an externally parsed XML tree in two dual view
//! kinds: [`XmlView`], a view over exactly one node, and [`XmlList`], a
//! view over an ordered sequence of nodes. Both expose the same query
//! surface — child, attribute and descendant lookup by name, kind
//! filters, content classification, structural equality and string
//! conversion — and a length-1 list behaves exactly like the view over
//! its member. The [`Selection`] union on top routes named and
//! positional keys to whichever view kind fits the result cardinality.
//!
//! ```rust
//! use xml_view::TreeStore;
//!
//! let store = TreeStore::new();
//! let people = store.parse_view(
//!     r#"<people><person id="1"><name>sam</name></person></people>"#,
//!     None,
//! )?;
//!
//! let names = people.child("person").child("name");
//! assert_eq!(names.len(), 1);
//! assert_eq!(names.string_value()?, "sam");
//! assert_eq!(people.get("person").get("@id").string_value()?, "1");
//! # Ok::<(), xml_view::Error>(())
//! ```

pub mod access;
pub mod compare;
pub mod error;
pub mod list;
pub mod node;
pub mod tree;

pub use access::Selection;
pub use error::{Error, Result};
pub use list::XmlList;
pub use node::XmlView;
pub use tree::{
    escape_attribute_value, escape_text, NodeKind, TreeStore, XmlName, WILDCARD, XHTML_NAMESPACE,
};

// Re-export the node handle for callers that adapt raw nodes.
pub use xot::Node;
