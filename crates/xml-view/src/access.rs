//! Dynamic access layer
//!
//! Uniform named and positional lookup over both view kinds. A lookup
//! result is a tagged union: exactly one hit resolves to a single-node
//! view, zero or many hits to a collection, and an out-of-range
//! position to nothing, so callers can chain lookups without caring
//! which view kind produced them.

use crate::error::Result;
use crate::list::XmlList;
use crate::node::XmlView;

/// Result of a dynamic lookup.
#[derive(Debug, Clone)]
pub enum Selection<'a> {
    /// Exactly one node matched
    One(XmlView<'a>),
    /// Zero or several nodes matched
    Many(XmlList<'a>),
    /// The requested position does not exist
    Absent,
}

impl<'a> Selection<'a> {
    fn from_list(list: XmlList<'a>) -> Self {
        match list.node() {
            Some(node) => Selection::One(list.store().view_of(node)),
            None => Selection::Many(list),
        }
    }

    /// The single view, when exactly one node was selected.
    pub fn view(&self) -> Option<XmlView<'a>> {
        match self {
            Selection::One(view) => Some(*view),
            _ => None,
        }
    }

    /// The selection as a collection; `None` for an absent position.
    pub fn list(&self) -> Option<XmlList<'a>> {
        match self {
            Selection::One(view) => Some(view.to_list()),
            Selection::Many(list) => Some(list.clone()),
            Selection::Absent => None,
        }
    }

    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        match self {
            Selection::One(_) => 1,
            Selection::Many(list) => list.len(),
            Selection::Absent => 0,
        }
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True only for an out-of-range position.
    pub fn is_absent(&self) -> bool {
        matches!(self, Selection::Absent)
    }

    /// Chain a named lookup through the selection.
    pub fn get(&self, key: &str) -> Selection<'a> {
        match self {
            Selection::One(view) => view.get(key),
            Selection::Many(list) => list.get(key),
            Selection::Absent => Selection::Absent,
        }
    }

    /// Chain a presence check through the selection.
    pub fn has(&self, key: &str) -> bool {
        match self {
            Selection::One(view) => view.has(key),
            Selection::Many(list) => list.has(key),
            Selection::Absent => false,
        }
    }

    /// Chain a positional lookup through the selection.
    pub fn index(&self, index: usize) -> Selection<'a> {
        match self {
            Selection::One(view) => view.index(index),
            Selection::Many(list) => list.index(index),
            Selection::Absent => Selection::Absent,
        }
    }

    /// String conversion of the selected content; an absent position
    /// yields the empty string.
    pub fn string_value(&self) -> Result<String> {
        match self {
            Selection::One(view) => view.string_value(),
            Selection::Many(list) => list.string_value(),
            Selection::Absent => Ok(String::new()),
        }
    }
}

impl<'a> XmlView<'a> {
    /// Dynamic lookup: numeric keys route to positions, `@name` to
    /// attributes, anything else to child names; `*` and `@*` are the
    /// wildcards.
    pub fn get(&self, key: &str) -> Selection<'a> {
        if let Ok(index) = key.parse::<usize>() {
            return self.index(index);
        }
        let hits = match key.strip_prefix('@') {
            Some(attr) => self.attribute(attr),
            None => self.child(key),
        };
        Selection::from_list(hits)
    }

    /// Presence check with the same routing as [`XmlView::get`].
    pub fn has(&self, key: &str) -> bool {
        if let Ok(index) = key.parse::<usize>() {
            return index == 0;
        }
        match key.strip_prefix('@') {
            Some(attr) => !self.attribute(attr).is_empty(),
            None => !self.child(key).is_empty(),
        }
    }

    /// Positional access; position 0 is this view itself, matching the
    /// length-1 collection duality.
    pub fn index(&self, index: usize) -> Selection<'a> {
        if index == 0 {
            Selection::One(*self)
        } else {
            Selection::Absent
        }
    }

    /// The present positional keys.
    pub fn keys(&self) -> Vec<usize> {
        vec![0]
    }
}

impl<'a> XmlList<'a> {
    /// Dynamic lookup with the same routing as [`XmlView::get`]; named
    /// lookups aggregate over the members, numeric keys select a member.
    pub fn get(&self, key: &str) -> Selection<'a> {
        if let Ok(index) = key.parse::<usize>() {
            return self.index(index);
        }
        let hits = match key.strip_prefix('@') {
            Some(attr) => self.attribute(attr),
            None => self.child(key),
        };
        Selection::from_list(hits)
    }

    /// Presence check with the same routing as [`XmlList::get`].
    pub fn has(&self, key: &str) -> bool {
        if let Ok(index) = key.parse::<usize>() {
            return index < self.len();
        }
        match key.strip_prefix('@') {
            Some(attr) => !self.attribute(attr).is_empty(),
            None => !self.child(key).is_empty(),
        }
    }

    /// The member at `index`, or absent when out of range.
    pub fn index(&self, index: usize) -> Selection<'a> {
        match self.nodes().get(index) {
            Some(node) => Selection::One(self.store().view_of(*node)),
            None => Selection::Absent,
        }
    }

    /// The present positional keys, `0..len`.
    pub fn keys(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }
}
