//! Document tree for the article preview
//!
//! This module owns the tree representation of the rendered article: an
//! arena of element/text nodes parsed from the HTML that the markdown
//! renderer produces. Both the preview pane and the clipboard export engine
//! walk this tree.

mod tree;

pub use tree::{is_void_element, DomTree, Element, Node, NodeId, PREVIEW_ROOT_ID};
