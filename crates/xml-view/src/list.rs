//! Ordered collection view

use xot::Node;

use crate::error::{Error, Result};
use crate::node::XmlView;
use crate::tree::{NodeKind, TreeStore};

/// View over an ordered sequence of zero or more tree nodes.
///
/// Members need not be siblings and need not be unique. Every lookup
/// flat-maps the member results in order; a length-1 list behaves
/// exactly like the single-node view over its member.
#[derive(Debug, Clone)]
pub struct XmlList<'a> {
    store: &'a TreeStore,
    nodes: Vec<Node>,
}

impl<'a> XmlList<'a> {
    pub(crate) fn new(store: &'a TreeStore, nodes: Vec<Node>) -> Self {
        Self { store, nodes }
    }

    /// The owning store.
    pub fn store(&self) -> &'a TreeStore {
        self.store
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when there are no members.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The sole node handle; defined only for a length-1 list.
    pub fn node(&self) -> Option<Node> {
        if self.nodes.len() == 1 {
            Some(self.nodes[0])
        } else {
            None
        }
    }

    /// The member node handles, in order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// One single-node view per member, in order; restartable.
    pub fn iter(&self) -> impl Iterator<Item = XmlView<'a>> + '_ {
        let store = self.store;
        self.nodes.iter().map(move |node| XmlView::new(store, *node))
    }

    /// The single-node view over the sole member; errors for any other
    /// length.
    pub fn to_view(&self) -> Result<XmlView<'a>> {
        match self.node() {
            Some(node) => Ok(XmlView::new(self.store, node)),
            None => Err(Error::Conversion(format!(
                "cannot view a collection of length {} as a single node",
                self.nodes.len()
            ))),
        }
    }

    fn flat_map_members(&self, f: impl Fn(&XmlView<'a>) -> XmlList<'a>) -> XmlList<'a> {
        let mut nodes = Vec::new();
        for member in self.iter() {
            nodes.extend_from_slice(f(&member).nodes());
        }
        XmlList::new(self.store, nodes)
    }

    // ==================== Lookups ====================

    /// Member attributes with a matching local name, flat-mapped.
    pub fn attribute(&self, name: &str) -> XmlList<'a> {
        self.flat_map_members(|member| member.attribute(name))
    }

    /// All member attributes, flat-mapped.
    pub fn attributes(&self) -> XmlList<'a> {
        self.flat_map_members(|member| member.attributes())
    }

    /// Member children by name, flat-mapped; `*` matches every ordinary
    /// child of any kind.
    pub fn child(&self, name: &str) -> XmlList<'a> {
        self.flat_map_members(|member| member.child(name))
    }

    /// Each member's child at `index`, flat-mapped.
    pub fn child_at(&self, index: usize) -> XmlList<'a> {
        self.flat_map_members(|member| member.child_at(index))
    }

    /// Every direct child of every member.
    pub fn children(&self) -> XmlList<'a> {
        self.flat_map_members(|member| member.children())
    }

    /// Member comment children, flat-mapped.
    pub fn comments(&self) -> XmlList<'a> {
        self.flat_map_members(|member| member.comments())
    }

    /// Member text children, flat-mapped.
    pub fn text(&self) -> XmlList<'a> {
        self.flat_map_members(|member| member.text())
    }

    /// Member processing-instruction children by target, flat-mapped.
    pub fn processing_instructions(&self, target: &str) -> XmlList<'a> {
        self.flat_map_members(|member| member.processing_instructions(target))
    }

    /// Member element children by local name, flat-mapped.
    pub fn elements(&self, name: &str) -> XmlList<'a> {
        self.flat_map_members(|member| member.elements(name))
    }

    /// Member element descendants by local name, flat-mapped.
    pub fn descendants(&self, name: &str) -> XmlList<'a> {
        self.flat_map_members(|member| member.descendants(name))
    }

    /// Keep the members the predicate holds for, preserving relative
    /// order; the index passed is the member's position in this list.
    pub fn filter(&self, mut predicate: impl FnMut(&XmlView<'a>, usize) -> bool) -> XmlList<'a> {
        let mut nodes = Vec::new();
        for (index, member) in self.iter().enumerate() {
            if predicate(&member, index) {
                nodes.push(member.node());
            }
        }
        XmlList::new(self.store, nodes)
    }

    /// The shared parent of every member, when they all agree on one;
    /// absent for an empty list or disagreeing parents.
    pub fn parent(&self) -> Option<XmlView<'a>> {
        let mut parents = self.nodes.iter().map(|node| self.store.parent(*node));
        let first = parents.next()??;
        for parent in parents {
            if parent != Some(first) {
                return None;
            }
        }
        Some(XmlView::new(self.store, first))
    }

    // ==================== Content ====================

    /// Empty list: simple. One member: that member's rule. Otherwise
    /// simple only when no member is an element.
    pub fn has_simple_content(&self) -> bool {
        match self.nodes.len() {
            0 => true,
            1 => self.store.has_simple_content(self.nodes[0]),
            _ => !self
                .nodes
                .iter()
                .any(|node| self.store.node_kind(*node) == NodeKind::Element),
        }
    }

    /// Exact complement of [`XmlList::has_simple_content`].
    pub fn has_complex_content(&self) -> bool {
        !self.has_simple_content()
    }

    /// For simple content, the concatenated text contribution of every
    /// member (comments and processing instructions contribute nothing);
    /// otherwise the concatenated markup of every member.
    pub fn string_value(&self) -> Result<String> {
        let mut out = String::new();
        if self.has_simple_content() {
            for node in &self.nodes {
                out.push_str(&self.store.text_contribution(*node));
            }
        } else {
            for member in self.iter() {
                out.push_str(&member.to_xml()?);
            }
        }
        Ok(out)
    }

    /// Same rule as [`XmlList::string_value`]: a simple-content list
    /// converts through its text contribution.
    pub fn to_xml(&self) -> Result<String> {
        self.string_value()
    }

    // ==================== Structure ====================

    /// Deep-clone every member, preserving order; the clones are
    /// independent roots in the same store.
    pub fn copy(&self) -> XmlList<'a> {
        let nodes = self
            .nodes
            .iter()
            .map(|node| self.store.clone_subtree(*node))
            .collect();
        XmlList::new(self.store, nodes)
    }

    // ==================== Equality ====================

    /// Deep structural equality: equal lengths and pairwise structural
    /// equality of members, in order.
    pub fn is_equal(&self, other: &XmlList<'_>) -> bool {
        self.nodes.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(member_a, member_b)| member_a.is_equal(&member_b))
    }

    /// Identity: the very same nodes in the very same store, in the same
    /// order.
    pub fn is_same(&self, other: &XmlList<'_>) -> bool {
        std::ptr::eq(self.store, other.store()) && self.nodes == other.nodes()
    }
}
