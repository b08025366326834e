//! Single-node view

use xot::Node;

use crate::compare;
use crate::error::Result;
use crate::list::XmlList;
use crate::tree::{escape_attribute_value, NodeKind, TreeStore, XmlName, WILDCARD};

/// View over exactly one tree node.
///
/// A cheap handle: the store reference plus the node id. Query
/// operations never mutate the tree; `copy` and `normalize` are the
/// only exceptions and say so.
#[derive(Debug, Clone, Copy)]
pub struct XmlView<'a> {
    store: &'a TreeStore,
    node: Node,
}

impl<'a> XmlView<'a> {
    pub(crate) fn new(store: &'a TreeStore, node: Node) -> Self {
        Self { store, node }
    }

    /// The wrapped node handle.
    pub fn node(&self) -> Node {
        self.node
    }

    /// The owning store.
    pub fn store(&self) -> &'a TreeStore {
        self.store
    }

    /// Always 1.
    pub fn len(&self) -> usize {
        1
    }

    /// Never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Kind of the wrapped node.
    pub fn node_kind(&self) -> NodeKind {
        self.store.node_kind(self.node)
    }

    /// Expanded name of the node, if it has one.
    pub fn name(&self) -> Option<XmlName> {
        self.store.node_name(self.node)
    }

    /// Local part of the node name.
    pub fn local_name(&self) -> Option<String> {
        self.store.local_name(self.node)
    }

    // ==================== Lookups ====================

    /// Own attributes with a matching local name; `*` matches all.
    /// Matching never restricts by namespace.
    pub fn attribute(&self, name: &str) -> XmlList<'a> {
        let hits = self
            .store
            .attribute_nodes(self.node)
            .into_iter()
            .filter(|n| self.store.name_matches(*n, name))
            .collect();
        XmlList::new(self.store, hits)
    }

    /// All own attributes.
    pub fn attributes(&self) -> XmlList<'a> {
        self.attribute(WILDCARD)
    }

    /// Direct element children with a matching local name. `*` is
    /// special: it matches every ordinary child regardless of kind.
    pub fn child(&self, name: &str) -> XmlList<'a> {
        let hits = self
            .store
            .children(self.node)
            .into_iter()
            .filter(|n| {
                name == WILDCARD
                    || (self.store.node_kind(*n) == NodeKind::Element
                        && self.store.name_matches(*n, name))
            })
            .collect();
        XmlList::new(self.store, hits)
    }

    /// The child at `index` among all ordinary children, as a singleton
    /// list, or empty when out of range.
    pub fn child_at(&self, index: usize) -> XmlList<'a> {
        let children = self.store.children(self.node);
        let hits = children.get(index).copied().into_iter().collect();
        XmlList::new(self.store, hits)
    }

    /// Every direct child regardless of kind.
    pub fn children(&self) -> XmlList<'a> {
        self.child(WILDCARD)
    }

    /// Direct comment children.
    pub fn comments(&self) -> XmlList<'a> {
        self.children_of_kind(NodeKind::Comment)
    }

    /// Direct text children.
    pub fn text(&self) -> XmlList<'a> {
        self.children_of_kind(NodeKind::Text)
    }

    /// Direct processing-instruction children, filtered by target name;
    /// `*` matches every target.
    pub fn processing_instructions(&self, target: &str) -> XmlList<'a> {
        let hits = self
            .store
            .children(self.node)
            .into_iter()
            .filter(|n| {
                self.store.node_kind(*n) == NodeKind::ProcessingInstruction
                    && self.store.name_matches(*n, target)
            })
            .collect();
        XmlList::new(self.store, hits)
    }

    /// Direct element children filtered by local name; `*` for all.
    pub fn elements(&self, name: &str) -> XmlList<'a> {
        let hits = self
            .store
            .children(self.node)
            .into_iter()
            .filter(|n| {
                self.store.node_kind(*n) == NodeKind::Element
                    && self.store.name_matches(*n, name)
            })
            .collect();
        XmlList::new(self.store, hits)
    }

    /// Element descendants at any depth with a matching local name, this
    /// node excluded; `*` for all.
    pub fn descendants(&self, name: &str) -> XmlList<'a> {
        let hits = self
            .store
            .descendant_elements(self.node)
            .into_iter()
            .filter(|n| self.store.name_matches(*n, name))
            .collect();
        XmlList::new(self.store, hits)
    }

    fn children_of_kind(&self, kind: NodeKind) -> XmlList<'a> {
        let hits = self
            .store
            .children(self.node)
            .into_iter()
            .filter(|n| self.store.node_kind(*n) == kind)
            .collect();
        XmlList::new(self.store, hits)
    }

    // ==================== Content ====================

    /// True when the effective content is text only: text and attribute
    /// nodes always, anything else when it has no element children.
    pub fn has_simple_content(&self) -> bool {
        self.store.has_simple_content(self.node)
    }

    /// Exact complement of [`XmlView::has_simple_content`].
    pub fn has_complex_content(&self) -> bool {
        !self.has_simple_content()
    }

    /// Text value for simple content, serialized markup otherwise.
    /// Comment and processing-instruction children contribute nothing to
    /// the text value.
    pub fn string_value(&self) -> Result<String> {
        if self.has_simple_content() {
            Ok(self.store.text_contribution(self.node))
        } else {
            self.to_xml()
        }
    }

    /// Serialized markup form; attribute nodes yield their escaped
    /// value.
    pub fn to_xml(&self) -> Result<String> {
        match self.node_kind() {
            NodeKind::Attribute => Ok(escape_attribute_value(
                &self.store.node_value(self.node).unwrap_or_default(),
            )),
            _ => self.store.serialize(self.node),
        }
    }

    // ==================== Structure ====================

    /// Deep-clone the node and its subtree; the clone is an independent
    /// root in the same store.
    pub fn copy(&self) -> XmlView<'a> {
        XmlView::new(self.store, self.store.clone_subtree(self.node))
    }

    /// Merge adjacent text children and drop empty text runs, in place,
    /// recursively. Returns self for chaining.
    pub fn normalize(&self) -> Result<&Self> {
        self.store.normalize(self.node)?;
        Ok(self)
    }

    /// View of the parent node, if any.
    pub fn parent(&self) -> Option<XmlView<'a>> {
        self.store
            .parent(self.node)
            .map(|parent| XmlView::new(self.store, parent))
    }

    /// Keep this node when the predicate holds for it; the index passed
    /// is always 0.
    pub fn filter(&self, mut predicate: impl FnMut(&XmlView<'a>, usize) -> bool) -> XmlList<'a> {
        if predicate(self, 0) {
            XmlList::new(self.store, vec![self.node])
        } else {
            XmlList::new(self.store, Vec::new())
        }
    }

    /// The same node as a length-1 collection.
    pub fn to_list(&self) -> XmlList<'a> {
        XmlList::new(self.store, vec![self.node])
    }

    /// Yields this view exactly once; restartable.
    pub fn iter(&self) -> impl Iterator<Item = XmlView<'a>> {
        std::iter::once(*self)
    }

    // ==================== Equality ====================

    /// Deep structural equality: same kinds, names by namespace URI and
    /// local name, values and child order; lexical prefixes and
    /// namespace declarations are ignored.
    pub fn is_equal(&self, other: &XmlView<'_>) -> bool {
        compare::same_structure(
            &self.store.xot(),
            self.node,
            &other.store().xot(),
            other.node(),
        )
    }

    /// Identity: the very same node in the very same store. Never true
    /// across independently parsed trees.
    pub fn is_same(&self, other: &XmlView<'_>) -> bool {
        std::ptr::eq(self.store, other.store()) && self.node == other.node()
    }
}
