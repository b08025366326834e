//! Structural equality over tree nodes
//!
//! Deep value equality between nodes of possibly distinct arenas. Name
//! comparison is by namespace URI and local name at the string level, so
//! interned ids never alias across arenas and lexical prefixes never
//! participate.

use std::collections::HashMap;

use xot::{Node, Value, Xot};

/// Recursive structural equality between two nodes.
///
/// Node kinds must match, then per-kind payload rules, then the ordinary
/// children pairwise in order, with equal counts required at every
/// level. Namespace declarations are namespace nodes in this tree, never
/// attributes and never children, so they stay out of the comparison.
pub fn same_structure(xot_a: &Xot, a: Node, xot_b: &Xot, b: Node) -> bool {
    if xot_a.value_type(a) != xot_b.value_type(b) {
        return false;
    }
    let here = match (xot_a.value(a), xot_b.value(b)) {
        (Value::Document, Value::Document) => true,
        (Value::Element(_), Value::Element(_)) => {
            names_match(xot_a, a, xot_b, b) && attributes_match(xot_a, a, xot_b, b)
        }
        (Value::Attribute(attr_a), Value::Attribute(attr_b)) => {
            names_match(xot_a, a, xot_b, b) && attr_a.value() == attr_b.value()
        }
        (Value::Text(text_a), Value::Text(text_b)) => text_a.get() == text_b.get(),
        (Value::Comment(comment_a), Value::Comment(comment_b)) => {
            comment_a.get() == comment_b.get()
        }
        (Value::ProcessingInstruction(pi_a), Value::ProcessingInstruction(pi_b)) => {
            names_match(xot_a, a, xot_b, b)
                && pi_a.data().unwrap_or_default() == pi_b.data().unwrap_or_default()
        }
        (Value::Namespace(ns_a), Value::Namespace(ns_b)) => {
            xot_a.namespace_str(ns_a.namespace()) == xot_b.namespace_str(ns_b.namespace())
        }
        _ => false,
    };
    if !here {
        return false;
    }
    let children_a: Vec<Node> = xot_a.children(a).collect();
    let children_b: Vec<Node> = xot_b.children(b).collect();
    children_a.len() == children_b.len()
        && children_a
            .iter()
            .zip(children_b)
            .all(|(child_a, child_b)| same_structure(xot_a, *child_a, xot_b, child_b))
}

fn names_match(xot_a: &Xot, a: Node, xot_b: &Xot, b: Node) -> bool {
    match (xot_a.node_name(a), xot_b.node_name(b)) {
        (Some(name_a), Some(name_b)) => xot_a.name_ns_str(name_a) == xot_b.name_ns_str(name_b),
        (None, None) => true,
        _ => false,
    }
}

/// Attribute sets match when their cardinality is equal and every
/// attribute of one side has a counterpart with the same namespace,
/// local name and value on the other, in any order.
fn attributes_match(xot_a: &Xot, a: Node, xot_b: &Xot, b: Node) -> bool {
    let attrs_a = attribute_nodes(xot_a, a);
    let attrs_b = attribute_nodes(xot_b, b);
    if attrs_a.len() != attrs_b.len() {
        return false;
    }
    let mut indexed: HashMap<(String, String), String> = HashMap::new();
    for attr in attrs_b {
        if let (Some(name), Some(value)) = (expanded_name(xot_b, attr), attribute_value(xot_b, attr))
        {
            indexed.insert(name, value);
        }
    }
    attrs_a.into_iter().all(|attr| {
        match (expanded_name(xot_a, attr), attribute_value(xot_a, attr)) {
            (Some(name), Some(value)) => indexed.get(&name) == Some(&value),
            _ => false,
        }
    })
}

fn attribute_nodes(xot: &Xot, node: Node) -> Vec<Node> {
    xot.attribute_nodes(node).collect()
}

fn expanded_name(xot: &Xot, node: Node) -> Option<(String, String)> {
    let id = xot.node_name(node)?;
    let (local_name, namespace) = xot.name_ns_str(id);
    Some((namespace.to_string(), local_name.to_string()))
}

fn attribute_value(xot: &Xot, node: Node) -> Option<String> {
    match xot.value(node) {
        Value::Attribute(attr) => Some(attr.value().to_string()),
        _ => None,
    }
}
