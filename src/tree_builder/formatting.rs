// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The list of active formatting elements.
//!
//! Each element entry freezes the [`Tag`] it was created from, so clones
//! made during reconstruction and the adoption agency reproduce the
//! original attributes even if the live node has since been mutated.
//! Markers fence off scoping boundaries (`applet`, `marquee`, `object`,
//! `template`, `caption`, `td`, `th`).

use std::iter::{Enumerate, Rev};
use std::slice;

use crate::dom::NodeId;
use crate::tokenizer::Tag;

pub(crate) enum FormatEntry {
    Element(NodeId, Tag),
    Marker,
}

#[derive(Default)]
pub(crate) struct ActiveFormattingList {
    entries: Vec<FormatEntry>,
}

impl ActiveFormattingList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> &FormatEntry {
        &self.entries[index]
    }

    /// The frozen tag of the element entry at `index`. Panics on a
    /// marker; callers index entries they have already classified.
    pub fn tag(&self, index: usize) -> &Tag {
        match self.entries[index] {
            FormatEntry::Element(_, ref tag) => tag,
            FormatEntry::Marker => panic!("marker where an element entry was expected"),
        }
    }

    pub fn push_marker(&mut self) {
        self.entries.push(FormatEntry::Marker);
    }

    /// Push an element entry, applying the Noah's Ark clause: if three
    /// entries since the last marker already carry the same name and
    /// frozen attribute string, the earliest of them is evicted.
    /// Canonical attribute strings make string equality equivalent to
    /// attribute-set equality modulo order.
    pub fn push_element(&mut self, elem: NodeId, tag: Tag) {
        let mut first_match = None;
        let mut matches = 0usize;
        for (i, _, old_tag) in self.end_to_marker() {
            if old_tag.name == tag.name && old_tag.attrs == tag.attrs {
                first_match = Some(i);
                matches += 1;
            }
        }

        if matches >= 3 {
            self.entries.remove(first_match.expect("matches with no index"));
        }
        self.entries.push(FormatEntry::Element(elem, tag));
    }

    pub fn insert(&mut self, index: usize, entry: FormatEntry) {
        self.entries.insert(index, entry);
    }

    pub fn remove(&mut self, index: usize) {
        self.entries.remove(index);
    }

    pub fn replace(&mut self, index: usize, entry: FormatEntry) {
        self.entries[index] = entry;
    }

    /// Remove entries down to and including the most recent marker, or
    /// everything if there is none.
    pub fn clear_to_marker(&mut self) {
        loop {
            match self.entries.pop() {
                None | Some(FormatEntry::Marker) => break,
                _ => (),
            }
        }
    }

    pub fn position_of(&self, elem: NodeId) -> Option<usize> {
        self.entries.iter().position(|entry| match entry {
            FormatEntry::Marker => false,
            FormatEntry::Element(e, _) => *e == elem,
        })
    }

    /// Iterate element entries (with index) from the end back to the
    /// last marker, or the whole list if there are no markers.
    pub fn end_to_marker(&self) -> ActiveFormattingIter<'_> {
        ActiveFormattingIter {
            iter: self.entries.iter().enumerate().rev(),
        }
    }
}

pub(crate) struct ActiveFormattingIter<'a> {
    iter: Rev<Enumerate<slice::Iter<'a, FormatEntry>>>,
}

impl<'a> Iterator for ActiveFormattingIter<'a> {
    type Item = (usize, NodeId, &'a Tag);
    fn next(&mut self) -> Option<(usize, NodeId, &'a Tag)> {
        match self.iter.next() {
            None | Some((_, &FormatEntry::Marker)) => None,
            Some((i, FormatEntry::Element(h, t))) => Some((i, *h, t)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::Arena;
    use crate::tokenizer::{StartTag, Tag};
    use markup5ever::LocalName;
    use tendril::{SliceExt, StrTendril};

    fn tag(name: &str, attrs: &str) -> Tag {
        Tag {
            kind: StartTag,
            name: LocalName::from(name),
            attrs: attrs.to_tendril(),
            self_closing: false,
        }
    }

    fn node(arena: &mut Arena, name: &str) -> NodeId {
        arena.create(ns!(html), LocalName::from(name), StrTendril::new())
    }

    #[test]
    fn noahs_ark_evicts_the_earliest_of_three() {
        let mut arena = Arena::new();
        let mut list = ActiveFormattingList::default();
        let first = node(&mut arena, "b");
        list.push_element(first, tag("b", " class=\"x\""));
        for _ in 0..2 {
            let id = node(&mut arena, "b");
            list.push_element(id, tag("b", " class=\"x\""));
        }
        assert_eq!(list.len(), 3);
        let fourth = node(&mut arena, "b");
        list.push_element(fourth, tag("b", " class=\"x\""));
        assert_eq!(list.len(), 3);
        assert_eq!(list.position_of(first), None);
    }

    #[test]
    fn noahs_ark_distinguishes_attrs() {
        let mut arena = Arena::new();
        let mut list = ActiveFormattingList::default();
        for i in 0..4 {
            let id = node(&mut arena, "b");
            let attrs = format!(" n=\"{i}\"");
            list.push_element(id, tag("b", &attrs));
        }
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn markers_fence_the_ark_scan() {
        let mut arena = Arena::new();
        let mut list = ActiveFormattingList::default();
        for _ in 0..3 {
            let id = node(&mut arena, "b");
            list.push_element(id, tag("b", ""));
        }
        list.push_marker();
        let id = node(&mut arena, "b");
        list.push_element(id, tag("b", ""));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn clear_to_marker_removes_the_marker() {
        let mut arena = Arena::new();
        let mut list = ActiveFormattingList::default();
        let outer = node(&mut arena, "i");
        list.push_element(outer, tag("i", ""));
        list.push_marker();
        let inner = node(&mut arena, "b");
        list.push_element(inner, tag("b", ""));
        list.clear_to_marker();
        assert_eq!(list.len(), 1);
        assert!(list.position_of(outer).is_some());
    }
}
