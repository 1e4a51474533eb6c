// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The stack of open elements.
//!
//! Index 0 is the sentinel root `<html>`, which is never popped; popping
//! any other element flattens it. The stack also owns the insertion-point
//! decision: when `foster_parenting` is set and the current node is a
//! table section or row, new content is redirected out of the table.

use markup5ever::{ExpandedName, LocalName};
use tendril::StrTendril;

use crate::dom::{Arena, Child, NodeId, Parent};

declare_tag_set!(foster_target = "table" "tbody" "tfoot" "thead" "tr");

/// Where a new node goes, per the "appropriate place for inserting a
/// node" rules.
pub(crate) enum InsertionPoint {
    /// Append as last child.
    LastChild(NodeId),
    /// Insert before this sibling in its parent (table fostering).
    BeforeSibling { parent: NodeId, sibling: NodeId },
}

pub(crate) struct OpenElemStack {
    elems: Vec<NodeId>,
    /// Redirect insertion around tables.
    pub foster_parenting: bool,
}

impl OpenElemStack {
    pub fn new(root: NodeId) -> OpenElemStack {
        OpenElemStack {
            elems: vec![root],
            foster_parenting: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.elems[0]
    }

    /// The current node: top of the stack.
    pub fn current(&self) -> NodeId {
        *self.elems.last().expect("no current element")
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn get(&self, index: usize) -> NodeId {
        self.elems[index]
    }

    /// Bottom-to-top iteration; use `.rev()` for scope-style walks.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.elems.iter()
    }

    pub fn push(&mut self, elem: NodeId) {
        self.elems.push(elem);
    }

    /// Pop and flatten the current node.
    pub fn pop(&mut self, arena: &mut Arena) -> NodeId {
        assert!(self.elems.len() > 1, "popping the root");
        let elem = self.elems.pop().expect("no current element");
        arena.flatten(elem);
        elem
    }

    /// Pop and flatten down to `len` elements.
    pub fn pop_to(&mut self, arena: &mut Arena, len: usize) {
        while self.elems.len() > len {
            self.pop(arena);
        }
    }

    /// Pop elements until one matching `pred` has been popped, or the
    /// root is reached. Returns the number of elements popped.
    pub fn pop_until<P>(&mut self, arena: &mut Arena, pred: P) -> usize
    where
        P: Fn(ExpandedName) -> bool,
    {
        let mut n = 0;
        while self.elems.len() > 1 {
            let matched = pred(arena.expanded(self.current()));
            self.pop(arena);
            n += 1;
            if matched {
                break;
            }
        }
        n
    }

    /// Pop elements until the current node is in the set. The root
    /// (which every context set contains) stops the walk.
    pub fn pop_until_current<P>(&mut self, arena: &mut Arena, pred: P)
    where
        P: Fn(ExpandedName) -> bool,
    {
        while self.elems.len() > 1 && !pred(arena.expanded(self.current())) {
            self.pop(arena);
        }
    }

    pub fn position_of(&self, elem: NodeId) -> Option<usize> {
        self.elems.iter().rposition(|&e| e == elem)
    }

    /// Excise an element from anywhere in the stack. The node stays in
    /// the tree and is serialized when its parent is: with foster
    /// parenting a mid-stack node can be the tree ancestor of elements
    /// above it, so it must not be flattened early.
    pub fn remove(&mut self, elem: NodeId) {
        if let Some(position) = self.position_of(elem) {
            self.elems.remove(position);
        }
    }

    pub fn insert(&mut self, index: usize, elem: NodeId) {
        self.elems.insert(index, elem);
    }

    pub fn replace(&mut self, index: usize, elem: NodeId) {
        self.elems[index] = elem;
    }

    /// Walk top-of-stack first: `true` on the first node matching `pred`,
    /// `false` on the first scope-set member.
    pub fn in_scope<S, P>(&self, arena: &Arena, scope: S, pred: P) -> bool
    where
        S: Fn(ExpandedName) -> bool,
        P: Fn(NodeId) -> bool,
    {
        for &node in self.elems.iter().rev() {
            if pred(node) {
                return true;
            }
            if scope(arena.expanded(node)) {
                return false;
            }
        }
        // The root <html> is in every scope set.
        false
    }

    /// <https://html.spec.whatwg.org/multipage/#appropriate-place-for-inserting-a-node>
    pub fn insertion_point(&self, arena: &Arena, override_target: Option<NodeId>) -> InsertionPoint {
        let target = override_target.unwrap_or_else(|| self.current());
        if !(self.foster_parenting && foster_target(arena.expanded(target))) {
            return InsertionPoint::LastChild(target);
        }

        // Foster parenting: the last template wins if it is above the
        // last table; otherwise insert just before the last table.
        for &elem in self.elems.iter().rev() {
            if is_html_elem(arena, elem, local_name!("template")) {
                return InsertionPoint::LastChild(elem);
            }
            if is_html_elem(arena, elem, local_name!("table")) {
                if let Parent::Elem(parent) = arena.get(elem).parent {
                    return InsertionPoint::BeforeSibling {
                        parent,
                        sibling: elem,
                    };
                }
            }
        }
        InsertionPoint::LastChild(self.root())
    }

    /// Place text at the appropriate insertion point.
    pub fn insert_text(&self, arena: &mut Arena, text: StrTendril) {
        match self.insertion_point(arena, None) {
            InsertionPoint::LastChild(parent) => arena.append_text(parent, text),
            InsertionPoint::BeforeSibling { parent, sibling } => {
                arena.insert_text_before(parent, sibling, text)
            },
        }
    }

    /// Place a node at the insertion point for `override_target` (the
    /// current node if `None`). Does not push.
    pub fn insert_node(&self, arena: &mut Arena, override_target: Option<NodeId>, child: Child) {
        let insertion_point = self.insertion_point(arena, override_target);
        match (insertion_point, child) {
            (InsertionPoint::LastChild(parent), Child::Text(text)) => {
                arena.append_text(parent, text)
            },
            (InsertionPoint::LastChild(parent), Child::Elem(elem)) => {
                arena.append_elem(parent, elem)
            },
            (InsertionPoint::BeforeSibling { parent, sibling }, Child::Text(text)) => {
                arena.insert_text_before(parent, sibling, text)
            },
            (InsertionPoint::BeforeSibling { parent, sibling }, Child::Elem(elem)) => {
                arena.insert_elem_before(parent, sibling, elem)
            },
        }
    }
}

fn is_html_elem(arena: &Arena, elem: NodeId, name: LocalName) -> bool {
    let node = arena.get(elem);
    node.ns == ns!(html) && node.name == name
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree_builder::tag_sets::*;
    use tendril::SliceExt;

    fn elem(arena: &mut Arena, name: &str) -> NodeId {
        arena.create(ns!(html), LocalName::from(name), StrTendril::new())
    }

    fn push_child(arena: &mut Arena, stack: &mut OpenElemStack, name: &str) -> NodeId {
        let id = elem(arena, name);
        let parent = stack.current();
        arena.append_elem(parent, id);
        stack.push(id);
        id
    }

    #[test]
    fn pop_flattens_into_parent() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let mut stack = OpenElemStack::new(root);
        push_child(&mut arena, &mut stack, "b");
        stack.pop(&mut arena);
        assert_eq!(
            arena.get(root).children,
            vec![Child::Text("<b></b>".to_tendril())]
        );
    }

    #[test]
    fn in_scope_stops_at_scope_member() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let mut stack = OpenElemStack::new(root);
        let p = push_child(&mut arena, &mut stack, "p");
        push_child(&mut arena, &mut stack, "table");
        push_child(&mut arena, &mut stack, "span");
        assert!(!stack.in_scope(&arena, default_scope, |n| n == p));
        let span = stack.current();
        assert!(stack.in_scope(&arena, default_scope, |n| n == span));
    }

    #[test]
    fn foster_parenting_inserts_before_table() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let mut stack = OpenElemStack::new(root);
        let table = push_child(&mut arena, &mut stack, "table");
        stack.foster_parenting = true;
        stack.insert_text(&mut arena, "x".to_tendril());
        assert_eq!(
            arena.get(root).children,
            vec![Child::Text("x".to_tendril()), Child::Elem(table)]
        );
    }

    #[test]
    fn foster_parenting_prefers_inner_template() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let mut stack = OpenElemStack::new(root);
        push_child(&mut arena, &mut stack, "table");
        let template = push_child(&mut arena, &mut stack, "template");
        let tr = elem(&mut arena, "tr");
        arena.append_elem(template, tr);
        stack.push(tr);
        stack.foster_parenting = true;
        stack.insert_text(&mut arena, "x".to_tendril());
        assert_eq!(
            arena.get(template).children.last(),
            Some(&Child::Text("x".to_tendril()))
        );
    }

    #[test]
    fn pop_until_never_pops_the_root() {
        let mut arena = Arena::new();
        let root = elem(&mut arena, "html");
        let mut stack = OpenElemStack::new(root);
        push_child(&mut arena, &mut stack, "i");
        push_child(&mut arena, &mut stack, "b");
        stack.pop_until(&mut arena, heading_tag);
        assert_eq!(stack.len(), 1);
    }
}
