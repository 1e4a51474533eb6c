// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The element arena.
//!
//! Nodes live in a per-balance arena and are addressed by [`NodeId`];
//! the tree-construction stacks hold ids, never references, so a node can
//! sit on the stack of open elements and in the list of active formatting
//! elements at the same time without aliasing.
//!
//! A node's children are serialized text interleaved with ids of still
//! live child elements. When an element is closed it is *flattened*: its
//! subtree is serialized by the HTML fragment serialization algorithm and
//! the resulting string replaces it in its parent's children. A flattened
//! node is a tombstone; touching it again is a bug.

use markup5ever::{ExpandedName, LocalName, Namespace};
use tendril::StrTendril;

use crate::attrs;

/// HTML elements serialized without an end tag. Their children list must
/// stay empty.
static VOID_ELEMENTS: phf::Set<&'static str> = phf::phf_set! {
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame",
    "hr", "img", "input", "keygen", "link", "meta", "param", "source",
    "track", "wbr",
};

/// Handle to a node in an [`Arena`]. Ids are never reused within one
/// balance run, so equality is node identity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeId(usize);

/// The parent slot of a node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Parent {
    /// Created but not yet placed, or detached for re-parenting.
    Unlinked,
    /// Attached under this element.
    Elem(NodeId),
    /// Tombstone: the node has been serialized and replaced by text.
    Flattened,
}

/// One entry in a children list.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Child {
    /// Already-serialized content. Adjacent text children are coalesced.
    Text(StrTendril),
    /// A live child element.
    Elem(NodeId),
}

pub struct Node {
    pub ns: Namespace,
    pub name: LocalName,
    /// Canonical attribute string: empty, or `name="value"` pairs each
    /// preceded by a space.
    pub attrs: StrTendril,
    pub children: Vec<Child>,
    pub parent: Parent,
}

impl Node {
    pub fn is_void(&self) -> bool {
        self.ns == ns!(html) && VOID_ELEMENTS.contains(&*self.name)
    }
}

pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Arena {
        Arena { nodes: Vec::new() }
    }

    pub fn create(&mut self, ns: Namespace, name: LocalName, attrs: StrTendril) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            ns,
            name,
            attrs,
            children: Vec::new(),
            parent: Parent::Unlinked,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn expanded(&self, id: NodeId) -> ExpandedName<'_> {
        let node = &self.nodes[id.0];
        ExpandedName {
            ns: &node.ns,
            local: &node.name,
        }
    }

    /// MathML `annotation-xml` counts as an HTML integration point only
    /// when its `encoding` attribute says the content is HTML.
    pub fn is_annotation_xml_integration_point(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        if node.ns != ns!(mathml) || node.name != local_name!("annotation-xml") {
            return false;
        }
        match attrs::value(&node.attrs, "encoding") {
            Some(enc) => {
                enc.eq_ignore_ascii_case("text/html")
                    || enc.eq_ignore_ascii_case("application/xhtml+xml")
            },
            None => false,
        }
    }

    fn assert_live(&self, id: NodeId) {
        assert!(
            self.nodes[id.0].parent != Parent::Flattened,
            "operation on a flattened node"
        );
    }

    /// Append text, coalescing with a trailing text child.
    pub fn append_text(&mut self, parent: NodeId, text: StrTendril) {
        self.assert_live(parent);
        let node = &mut self.nodes[parent.0];
        debug_assert!(!node.is_void(), "text appended to a void element");
        match node.children.last_mut() {
            Some(Child::Text(existing)) => existing.push_tendril(&text),
            _ => node.children.push(Child::Text(text)),
        }
    }

    /// Append a child element. The child must be unlinked.
    pub fn append_elem(&mut self, parent: NodeId, child: NodeId) {
        self.assert_live(parent);
        debug_assert_eq!(self.nodes[child.0].parent, Parent::Unlinked);
        debug_assert!(
            !self.nodes[parent.0].is_void(),
            "child appended to a void element"
        );
        self.nodes[child.0].parent = Parent::Elem(parent);
        self.nodes[parent.0].children.push(Child::Elem(child));
    }

    /// Insert text immediately before the child `sibling` of `parent`,
    /// coalescing with a preceding text child.
    pub fn insert_text_before(&mut self, parent: NodeId, sibling: NodeId, text: StrTendril) {
        let pos = self.position_of(parent, sibling);
        let children = &mut self.nodes[parent.0].children;
        if pos > 0 {
            if let Child::Text(existing) = &mut children[pos - 1] {
                existing.push_tendril(&text);
                return;
            }
        }
        children.insert(pos, Child::Text(text));
    }

    /// Insert an unlinked element immediately before the child `sibling`
    /// of `parent`.
    pub fn insert_elem_before(&mut self, parent: NodeId, sibling: NodeId, child: NodeId) {
        debug_assert_eq!(self.nodes[child.0].parent, Parent::Unlinked);
        let pos = self.position_of(parent, sibling);
        self.nodes[child.0].parent = Parent::Elem(parent);
        self.nodes[parent.0].children.insert(pos, Child::Elem(child));
    }

    /// Detach a node from its parent, leaving it unlinked. Text children
    /// left adjacent by the removal are merged.
    pub fn detach(&mut self, id: NodeId) {
        let Parent::Elem(parent) = self.nodes[id.0].parent else {
            self.nodes[id.0].parent = Parent::Unlinked;
            return;
        };
        let pos = self.position_of(parent, id);
        self.nodes[parent.0].children.remove(pos);
        self.merge_at(parent, pos);
        self.nodes[id.0].parent = Parent::Unlinked;
    }

    /// Move every child of `from` to the end of `to`, in order.
    pub fn adopt_children(&mut self, from: NodeId, to: NodeId) {
        self.assert_live(from);
        self.assert_live(to);
        let children = std::mem::take(&mut self.nodes[from.0].children);
        for child in children {
            match child {
                Child::Text(text) => self.append_text(to, text),
                Child::Elem(elem) => {
                    self.nodes[elem.0].parent = Parent::Elem(to);
                    self.nodes[to.0].children.push(Child::Elem(elem));
                },
            }
        }
    }

    /// Serialize a node's subtree and replace the node by the resulting
    /// text in its parent's children list. A node detached from the tree
    /// is serialized and dropped.
    pub fn flatten(&mut self, id: NodeId) {
        let parent = self.nodes[id.0].parent;
        let mut text = StrTendril::new();
        self.serialize(id, &mut text);
        match parent {
            Parent::Elem(p) => {
                let pos = self.position_of(p, id);
                self.nodes[p.0].children[pos] = Child::Text(text);
                self.merge_at(p, pos + 1);
                self.merge_at(p, pos);
            },
            Parent::Unlinked => (),
            Parent::Flattened => unreachable!("flatten of a flattened node"),
        }
    }

    /// HTML fragment serialization of a subtree. Tombstones every element
    /// it visits.
    pub fn serialize(&mut self, id: NodeId, out: &mut StrTendril) {
        self.assert_live(id);
        self.nodes[id.0].parent = Parent::Flattened;

        let (name, attrs, children, void) = {
            let node = &mut self.nodes[id.0];
            (
                node.name.clone(),
                std::mem::take(&mut node.attrs),
                std::mem::take(&mut node.children),
                node.is_void(),
            )
        };

        out.push_char('<');
        out.push_slice(&name);
        out.push_tendril(&attrs);
        out.push_char('>');

        if void {
            assert!(children.is_empty(), "void element with children");
            return;
        }

        for child in children {
            match child {
                Child::Text(text) => out.push_tendril(&text),
                Child::Elem(elem) => self.serialize(elem, out),
            }
        }

        out.push_slice("</");
        out.push_slice(&name);
        out.push_char('>');
    }

    /// Concatenate (and flatten) the root's children. The root element
    /// itself is never serialized; it is the stripped outer wrapper.
    pub fn finish(mut self, root: NodeId) -> StrTendril {
        let children = std::mem::take(&mut self.nodes[root.0].children);
        let mut out = StrTendril::new();
        for child in children {
            match child {
                Child::Text(text) => out.push_tendril(&text),
                Child::Elem(elem) => self.serialize(elem, &mut out),
            }
        }
        out
    }

    fn position_of(&self, parent: NodeId, child: NodeId) -> usize {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|c| matches!(c, Child::Elem(e) if *e == child))
            .expect("child not present in claimed parent")
    }

    // Merge children[pos - 1] and children[pos] if both are text.
    fn merge_at(&mut self, parent: NodeId, pos: usize) {
        let children = &mut self.nodes[parent.0].children;
        if pos == 0 || pos >= children.len() {
            return;
        }
        if let (Child::Text(_), Child::Text(_)) = (&children[pos - 1], &children[pos]) {
            let Child::Text(tail) = children.remove(pos) else {
                unreachable!()
            };
            let Child::Text(head) = &mut children[pos - 1] else {
                unreachable!()
            };
            head.push_tendril(&tail);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tendril::SliceExt;

    fn elem(arena: &mut Arena, name: &str) -> NodeId {
        arena.create(ns!(html), LocalName::from(name), StrTendril::new())
    }

    #[test]
    fn append_coalesces_text() {
        let mut arena = Arena::new();
        let div = elem(&mut arena, "div");
        arena.append_text(div, "a".to_tendril());
        arena.append_text(div, "b".to_tendril());
        assert_eq!(arena.get(div).children.len(), 1);
    }

    #[test]
    fn flatten_replaces_node_with_text() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let b = elem(&mut arena, "b");
        arena.append_text(root, "x".to_tendril());
        arena.append_elem(root, b);
        arena.append_text(b, "y".to_tendril());
        arena.flatten(b);
        assert_eq!(
            arena.get(root).children,
            vec![Child::Text("x<b>y</b>".to_tendril())]
        );
        assert_eq!(arena.get(b).parent, Parent::Flattened);
    }

    #[test]
    fn flatten_serializes_unflattened_descendants() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let outer = elem(&mut arena, "div");
        let inner = elem(&mut arena, "i");
        arena.append_elem(root, outer);
        arena.append_elem(outer, inner);
        arena.append_text(inner, "t".to_tendril());
        arena.flatten(outer);
        assert_eq!(
            arena.get(root).children,
            vec![Child::Text("<div><i>t</i></div>".to_tendril())]
        );
        assert_eq!(arena.get(inner).parent, Parent::Flattened);
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let br = elem(&mut arena, "br");
        arena.append_elem(root, br);
        assert_eq!(&*arena.finish(root), "<br>");
    }

    #[test]
    #[should_panic(expected = "flattened")]
    fn double_flatten_panics() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let b = elem(&mut arena, "b");
        arena.append_elem(root, b);
        arena.flatten(b);
        arena.flatten(b);
    }

    #[test]
    fn detach_merges_text_neighbors() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let b = elem(&mut arena, "b");
        arena.append_text(root, "a".to_tendril());
        arena.append_elem(root, b);
        arena.append_text(root, "c".to_tendril());
        arena.detach(b);
        assert_eq!(arena.get(root).children, vec![Child::Text("ac".to_tendril())]);
        assert_eq!(arena.get(b).parent, Parent::Unlinked);
    }

    #[test]
    fn annotation_xml_integration_point_depends_on_encoding() {
        let mut arena = Arena::new();
        let yes = arena.create(
            ns!(mathml),
            LocalName::from("annotation-xml"),
            " encoding=\"text/html\"".to_tendril(),
        );
        let no = arena.create(
            ns!(mathml),
            LocalName::from("annotation-xml"),
            " encoding=\"application/mathml+xml\"".to_tendril(),
        );
        assert!(arena.is_annotation_xml_integration_point(yes));
        assert!(!arena.is_annotation_xml_integration_point(no));
    }
}
