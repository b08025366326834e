//! Adapter over the xot tree
//!
//! Everything xot-specific lives in this module: parsing, serialization,
//! node-kind classification, name access, clone and normalize. The view
//! types in the rest of the crate only go through this surface.

use std::cell::{Ref, RefCell, RefMut};

use xot::{Node, Value, ValueType, Xot};

use crate::error::{Error, Result};
use crate::list::XmlList;
use crate::node::XmlView;

/// Name pattern that matches anything in name-filtered lookups.
pub const WILDCARD: &str = "*";

/// Default namespace for XHTML-flavored fragments.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Kind of a tree node.
///
/// These are the kinds the backing tree can materialize; CDATA sections
/// arrive from the parser as `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
    /// Namespace declaration node
    Namespace,
}

/// Expanded name of an element, attribute or processing-instruction
/// target. The namespace is the URI, never the lexical prefix; an empty
/// string means no namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XmlName {
    /// Local part of the name
    pub local_name: String,
    /// Namespace URI, empty when the name is in no namespace
    pub namespace: String,
}

impl std::fmt::Display for XmlName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        }
    }
}

/// Owns the xot arena the views point into.
///
/// Multiple documents and fragments can live in one store. Views borrow
/// the store and carry node handles; the store is the single owner of
/// every node, including detached fragment roots and clones. Access is
/// single-threaded: the mutating operations take short exclusive borrows
/// and nothing holds a borrow across calls.
#[derive(Debug)]
pub struct TreeStore {
    xot: RefCell<Xot>,
}

impl TreeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            xot: RefCell::new(Xot::new()),
        }
    }

    /// Shared access to the underlying arena.
    pub fn xot(&self) -> Ref<'_, Xot> {
        self.xot.borrow()
    }

    /// Exclusive access to the underlying arena.
    pub fn xot_mut(&self) -> RefMut<'_, Xot> {
        self.xot.borrow_mut()
    }

    // ==================== Constructors ====================

    /// Parse a complete XML document; the view is over the document node.
    pub fn parse_document(&self, xml: &str) -> Result<XmlView<'_>> {
        let node = self
            .xot
            .borrow_mut()
            .parse(xml)
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(XmlView::new(self, node))
    }

    /// Parse markup as a fragment and view its single top-level node.
    ///
    /// The text is wrapped in a synthetic root bound to
    /// `default_namespace`, so content with a namespace-less prefix
    /// still parses; the top-level node is then unwrapped as an
    /// independent root. Exactly one top-level node is accepted.
    pub fn parse_view(&self, text: &str, default_namespace: Option<&str>) -> Result<XmlView<'_>> {
        let roots = self.parse_fragment(text, default_namespace)?;
        match roots.len() {
            1 => Ok(XmlView::new(self, roots[0])),
            n => Err(Error::Conversion(format!(
                "fragment has {} top-level nodes, a single-node view needs exactly 1",
                n
            ))),
        }
    }

    /// Parse markup as a fragment and view all of its top-level nodes,
    /// zero or more, in order.
    pub fn parse_list(&self, text: &str, default_namespace: Option<&str>) -> Result<XmlList<'_>> {
        let roots = self.parse_fragment(text, default_namespace)?;
        Ok(XmlList::new(self, roots))
    }

    /// View over a fresh empty text node.
    pub fn empty_view(&self) -> XmlView<'_> {
        let node = self.xot.borrow_mut().new_text("");
        XmlView::new(self, node)
    }

    /// Adapt a raw node handle.
    pub fn view_of(&self, node: Node) -> XmlView<'_> {
        XmlView::new(self, node)
    }

    /// Adapt a raw node sequence.
    pub fn list_of(&self, nodes: Vec<Node>) -> XmlList<'_> {
        XmlList::new(self, nodes)
    }

    fn parse_fragment(&self, text: &str, default_namespace: Option<&str>) -> Result<Vec<Node>> {
        let wrapped = match default_namespace {
            Some(ns) if !ns.is_empty() => format!(
                "<fragment xmlns=\"{}\">{}</fragment>",
                escape_attribute_value(ns),
                text
            ),
            _ => format!("<fragment>{}</fragment>", text),
        };
        let mut xot = self.xot.borrow_mut();
        let doc = xot
            .parse(&wrapped)
            .map_err(|e| Error::Parse(e.to_string()))?;
        let wrapper = xot
            .document_element(doc)
            .map_err(|e| Error::Parse(e.to_string()))?;
        let children: Vec<Node> = xot.children(wrapper).collect();
        // Unwrap the top-level nodes as independent roots. Cloning with
        // the prefixes in scope keeps namespaced fragments serializable
        // on their own.
        let roots = children
            .into_iter()
            .map(|child| xot.clone_with_prefixes(child))
            .collect();
        Ok(roots)
    }

    // ==================== Classification & metadata ====================

    /// Kind of a node.
    pub fn node_kind(&self, node: Node) -> NodeKind {
        match self.xot.borrow().value_type(node) {
            ValueType::Document => NodeKind::Document,
            ValueType::Element => NodeKind::Element,
            ValueType::Attribute => NodeKind::Attribute,
            ValueType::Text => NodeKind::Text,
            ValueType::Comment => NodeKind::Comment,
            ValueType::ProcessingInstruction => NodeKind::ProcessingInstruction,
            ValueType::Namespace => NodeKind::Namespace,
        }
    }

    /// Expanded name of an element, attribute or PI target.
    pub fn node_name(&self, node: Node) -> Option<XmlName> {
        let xot = self.xot.borrow();
        let id = xot.node_name(node)?;
        let (local_name, namespace) = xot.name_ns_str(id);
        Some(XmlName {
            local_name: local_name.to_string(),
            namespace: namespace.to_string(),
        })
    }

    /// Local part of the node name.
    pub fn local_name(&self, node: Node) -> Option<String> {
        self.node_name(node).map(|name| name.local_name)
    }

    /// Text payload of a leaf node: text, comment, PI data or attribute
    /// value.
    pub fn node_value(&self, node: Node) -> Option<String> {
        let xot = self.xot.borrow();
        match xot.value(node) {
            Value::Text(text) => Some(text.get().to_string()),
            Value::Comment(comment) => Some(comment.get().to_string()),
            Value::ProcessingInstruction(pi) => Some(pi.data().unwrap_or_default().to_string()),
            Value::Attribute(attr) => Some(attr.value().to_string()),
            _ => None,
        }
    }

    /// Local-name match for name-filtered lookups. `*` matches anything;
    /// the namespace of the candidate is not restricted.
    pub fn name_matches(&self, node: Node, pattern: &str) -> bool {
        if pattern == WILDCARD {
            return true;
        }
        let xot = self.xot.borrow();
        match xot.node_name(node) {
            Some(id) => xot.name_ns_str(id).0 == pattern,
            None => false,
        }
    }

    // ==================== Navigation ====================

    /// Parent of a node, if any.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.xot.borrow().parent(node)
    }

    /// Ordinary children, in order; attribute and namespace nodes are not
    /// children.
    pub fn children(&self, node: Node) -> Vec<Node> {
        self.xot.borrow().children(node).collect()
    }

    /// Attribute nodes of an element, in document order. Empty for any
    /// other kind.
    pub fn attribute_nodes(&self, node: Node) -> Vec<Node> {
        let xot = self.xot.borrow();
        xot.attribute_nodes(node).collect()
    }

    /// Element descendants at any depth, the node itself excluded,
    /// document order.
    pub fn descendant_elements(&self, node: Node) -> Vec<Node> {
        let xot = self.xot.borrow();
        xot.descendants(node)
            .filter(|n| *n != node && xot.value_type(*n) == ValueType::Element)
            .collect()
    }

    // ==================== Content ====================

    /// Simple content means text-only effective content. Text and
    /// attribute nodes are always simple; any other kind is simple when
    /// it has no element children.
    pub fn has_simple_content(&self, node: Node) -> bool {
        let xot = self.xot.borrow();
        match xot.value_type(node) {
            ValueType::Text | ValueType::Attribute => true,
            _ => !xot
                .children(node)
                .any(|child| xot.value_type(child) == ValueType::Element),
        }
    }

    /// Text contribution of a subtree: text and attribute payloads;
    /// comment and processing-instruction subtrees contribute nothing.
    pub fn text_contribution(&self, node: Node) -> String {
        let xot = self.xot.borrow();
        let mut out = String::new();
        collect_text(&xot, node, &mut out);
        out
    }

    /// Serialize a node and its subtree to markup text.
    pub fn serialize(&self, node: Node) -> Result<String> {
        self.xot
            .borrow()
            .to_string(node)
            .map_err(|e| Error::Serialize(e.to_string()))
    }

    // ==================== Mutation ====================

    /// Deep-clone a subtree into new, independently rooted nodes. The
    /// clone carries the namespace prefixes in scope at the original.
    pub fn clone_subtree(&self, node: Node) -> Node {
        self.xot.borrow_mut().clone_with_prefixes(node)
    }

    /// Merge adjacent text children and drop empty text nodes, in place,
    /// recursively.
    pub fn normalize(&self, node: Node) -> Result<()> {
        let mut xot = self.xot.borrow_mut();
        let containers: Vec<Node> = xot
            .descendants(node)
            .filter(|n| {
                matches!(
                    xot.value_type(*n),
                    ValueType::Document | ValueType::Element
                )
            })
            .collect();
        for container in containers {
            let children: Vec<Node> = xot.children(container).collect();
            let mut run_start: Option<Node> = None;
            let mut run_text = String::new();
            let mut absorbed: Vec<Node> = Vec::new();
            let mut runs: Vec<(Node, String)> = Vec::new();
            for child in children {
                if xot.value_type(child) == ValueType::Text {
                    let text = xot.text_str(child).unwrap_or_default().to_string();
                    match run_start {
                        Some(_) => {
                            run_text.push_str(&text);
                            absorbed.push(child);
                        }
                        None => {
                            run_start = Some(child);
                            run_text = text;
                        }
                    }
                } else if let Some(start) = run_start.take() {
                    runs.push((start, std::mem::take(&mut run_text)));
                }
            }
            if let Some(start) = run_start.take() {
                runs.push((start, std::mem::take(&mut run_text)));
            }
            for node in absorbed {
                xot.remove(node).map_err(|e| Error::NodeAccess(e.to_string()))?;
            }
            for (start, text) in runs {
                if text.is_empty() {
                    xot.remove(start).map_err(|e| Error::NodeAccess(e.to_string()))?;
                } else if let Some(value) = xot.text_mut(start) {
                    value.set(text);
                }
            }
        }
        Ok(())
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_text(xot: &Xot, node: Node, out: &mut String) {
    match xot.value(node) {
        Value::Text(text) => out.push_str(text.get()),
        Value::Attribute(attr) => out.push_str(attr.value()),
        Value::Comment(_) | Value::ProcessingInstruction(_) => {}
        _ => {
            for child in xot.children(node) {
                collect_text(xot, child, out);
            }
        }
    }
}

/// Escape reserved characters for text content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value: the text escapes plus the double quote and
/// the whitespace control characters.
pub fn escape_attribute_value(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(c),
        }
    }
    out
}
