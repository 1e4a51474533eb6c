// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The HTML5 tree builder, restricted to fragments and rebuilt around a
//! flatten-on-pop arena: subtrees are serialized the moment they close,
//! so no DOM survives the parse.

use std::borrow::Cow::{self, Borrowed};
use std::collections::VecDeque;
use std::fmt;

use log::{debug, log_enabled, Level};
use tendril::StrTendril;

use crate::attrs;
use crate::dom::{Arena, Child, NodeId};
use crate::tokenizer::{self, StartTag, Tag, TokenSink};
use crate::util::str::to_escaped_string;
use crate::{ExpandedName, LocalName, Namespace};

use self::formatting::{ActiveFormattingList, FormatEntry};
use self::stack::OpenElemStack;
use self::tag_sets::*;
use self::types::*;

#[macro_use]
pub(crate) mod tag_sets;

pub(crate) mod data;
mod formatting;
mod rules;
mod stack;
mod types;

pub(crate) enum PushFlag {
    Push,
    NoPush,
}

enum Bookmark {
    Replace(NodeId),
    InsertAfter(NodeId),
}

/// The fragment tree builder.
///
/// Feed it tokens through [`TokenSink`], then call [`TreeBuilder::finish`]
/// to collect the balanced output. The fragment context element is
/// `<body>`; the sentinel root stands in for it on the stack and its
/// children become the output, so the outer wrapper never appears.
pub struct TreeBuilder {
    /// Node storage for this balance run.
    arena: Arena,

    /// Insertion mode.
    mode: InsertionMode,

    /// Original insertion mode, used by Text and InTableText modes.
    orig_mode: Option<InsertionMode>,

    /// Stack of template insertion modes.
    template_modes: Vec<InsertionMode>,

    /// Pending table character tokens.
    pending_table_text: Vec<(SplitStatus, StrTendril)>,

    /// Stack of open elements, most recently added at end.
    open_elems: OpenElemStack,

    /// List of active formatting elements.
    active_formatting: ActiveFormattingList,
}

impl TreeBuilder {
    pub fn new() -> TreeBuilder {
        let mut arena = Arena::new();
        let root = arena.create(ns!(html), local_name!("html"), StrTendril::new());
        TreeBuilder {
            arena,
            mode: InsertionMode::InBody,
            orig_mode: None,
            template_modes: Vec::new(),
            pending_table_text: Vec::new(),
            open_elems: OpenElemStack::new(root),
            active_formatting: ActiveFormattingList::default(),
        }
    }

    /// Close everything still open and return the balanced fragment.
    pub fn finish(mut self) -> StrTendril {
        self.open_elems.pop_to(&mut self.arena, 1);
        let root = self.open_elems.root();
        self.arena.finish(root)
    }

    fn debug_step(&self, mode: InsertionMode, token: &Token) {
        if log_enabled!(Level::Debug) {
            debug!(
                "processing {} in insertion mode {:?}",
                to_escaped_string(token),
                mode
            );
        }
    }

    fn process_to_completion(&mut self, mut token: Token) {
        // Queue of additional tokens yet to be processed.
        // This stays empty in the common case where we don't split whitespace.
        let mut more_tokens = VecDeque::new();

        loop {
            let should_have_acknowledged_self_closing_flag = matches!(
                token,
                Token::Tag(Tag {
                    self_closing: true,
                    kind: StartTag,
                    ..
                })
            );
            let result = if self.is_foreign(&token) {
                self.step_foreign(token)
            } else {
                let mode = self.mode;
                self.step(mode, token)
            };
            match result {
                ProcessResult::Done => {
                    if should_have_acknowledged_self_closing_flag {
                        self.parse_error(Borrowed("Unacknowledged self-closing tag"));
                    }
                    let Some(new_token) = more_tokens.pop_front() else {
                        return;
                    };
                    token = new_token;
                },
                ProcessResult::DoneAckSelfClosing => {
                    let Some(new_token) = more_tokens.pop_front() else {
                        return;
                    };
                    token = new_token;
                },
                ProcessResult::Reprocess(m, t) => {
                    self.mode = m;
                    token = t;
                },
                ProcessResult::SplitWhitespace(mut buf) => {
                    let p = buf.pop_front_char_run(|c| c.is_ascii_whitespace());
                    let Some((first, is_ws)) = p else {
                        return;
                    };
                    let status = if is_ws {
                        SplitStatus::Whitespace
                    } else {
                        SplitStatus::NotWhitespace
                    };
                    token = Token::Characters(status, first);

                    if buf.len32() > 0 {
                        more_tokens.push_back(Token::Characters(SplitStatus::NotSplit, buf));
                    }
                },
            }
        }
    }
}

impl TokenSink for TreeBuilder {
    fn process_token(&mut self, token: tokenizer::Token) {
        let token = match token {
            tokenizer::TagToken(x) => Token::Tag(x),
            tokenizer::EOFToken => Token::Eof,
            tokenizer::CharacterTokens(x) => {
                if x.is_empty() {
                    return;
                }
                Token::Characters(SplitStatus::NotSplit, x)
            },
        };

        self.process_to_completion(token);
    }

    fn end(&mut self) {
        self.open_elems.pop_to(&mut self.arena, 1);
    }
}

#[doc(hidden)]
impl TreeBuilder {
    fn parse_error(&self, msg: Cow<'static, str>) {
        // Recoverable by definition; the insertion modes absorb it.
        debug!("parse error: {msg}");
    }

    fn unexpected<T: fmt::Debug>(&mut self, _thing: &T) -> ProcessResult {
        self.parse_error(Cow::from(format!(
            "Unexpected token {} in insertion mode {:?}",
            to_escaped_string(_thing),
            self.mode
        )));
        ProcessResult::Done
    }

    fn assert_named(&self, node: NodeId, name: LocalName) {
        assert!(self.html_elem_named(node, name));
    }

    fn stop_parsing(&mut self) -> ProcessResult {
        ProcessResult::Done
    }

    //§ parsing-elements-that-contain-only-text
    // There is no raw-text tokenizer state behind Text mode; the
    // sanitizer already escaped the content of style/noframes.
    fn to_text_mode(&mut self) -> ProcessResult {
        self.orig_mode = Some(self.mode);
        self.mode = InsertionMode::Text;
        ProcessResult::Done
    }

    fn parse_raw_data(&mut self, tag: Tag) -> ProcessResult {
        self.insert_element_for(tag);
        self.to_text_mode()
    }
    //§ END

    fn current_node(&self) -> NodeId {
        self.open_elems.current()
    }

    /// The fragment context is `<body>`; the sentinel root (also in the
    /// HTML namespace) stands in for it when the stack is bare.
    fn adjusted_current_node(&self) -> NodeId {
        if self.open_elems.len() == 1 {
            self.open_elems.root()
        } else {
            self.current_node()
        }
    }

    fn current_node_in<TagSet>(&self, set: TagSet) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        set(self.arena.expanded(self.current_node()))
    }

    fn elem_in<TagSet>(&self, elem: NodeId, set: TagSet) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        set(self.arena.expanded(elem))
    }

    fn html_elem_named(&self, elem: NodeId, name: LocalName) -> bool {
        let node = self.arena.get(elem);
        node.ns == ns!(html) && node.name == name
    }

    fn in_html_elem_named(&self, name: LocalName) -> bool {
        self.open_elems
            .iter()
            .any(|&elem| self.html_elem_named(elem, name.clone()))
    }

    fn current_node_named(&self, name: LocalName) -> bool {
        self.html_elem_named(self.current_node(), name)
    }

    fn in_scope<TagSet, Pred>(&self, scope: TagSet, pred: Pred) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
        Pred: Fn(NodeId) -> bool,
    {
        self.open_elems.in_scope(&self.arena, scope, pred)
    }

    fn in_scope_named<TagSet>(&self, scope: TagSet, name: LocalName) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        self.in_scope(scope, |elem| self.html_elem_named(elem, name.clone()))
    }

    fn pop(&mut self) -> NodeId {
        self.open_elems.pop(&mut self.arena)
    }

    /// <https://html.spec.whatwg.org/#generate-implied-end-tags>
    fn generate_implied_end_tags<TagSet>(&mut self, set: TagSet)
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        while self.current_node_in(&set) {
            self.pop();
        }
    }

    fn generate_implied_end_except(&mut self, except: LocalName) {
        self.generate_implied_end_tags(|p| {
            if *p.ns == ns!(html) && *p.local == except {
                false
            } else {
                cursory_implied_end(p)
            }
        });
    }
    //§ END

    // Pop elements until the current element is in the set.
    fn pop_until_current<TagSet>(&mut self, tag_set: TagSet)
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        self.open_elems.pop_until_current(&mut self.arena, tag_set);
    }

    // Pop elements until an element from the set has been popped. Returns
    // the number of elements popped.
    fn pop_until<P>(&mut self, pred: P) -> usize
    where
        P: Fn(ExpandedName) -> bool,
    {
        self.open_elems.pop_until(&mut self.arena, pred)
    }

    fn pop_until_named(&mut self, name: LocalName) -> usize {
        self.pop_until(|p| *p.ns == ns!(html) && *p.local == name)
    }

    /// Pop elements until one with the specified name has been popped.
    /// Signal an error if it was not the first one.
    fn expect_to_close(&mut self, name: LocalName) {
        if self.pop_until_named(name.clone()) != 1 {
            self.parse_error(Cow::from(format!(
                "Unexpected open element while closing {name}"
            )));
        }
    }

    fn close_p_element(&mut self) {
        declare_tag_set!(implied = [cursory_implied_end] - "p");
        self.generate_implied_end_tags(implied);
        self.expect_to_close(local_name!("p"));
    }

    fn close_p_element_in_button_scope(&mut self) {
        if self.in_scope_named(button_scope, local_name!("p")) {
            self.close_p_element();
        }
    }

    // Check <input> tags for type=hidden
    fn is_type_hidden(&self, tag: &Tag) -> bool {
        match attrs::value(&tag.attrs, "type") {
            None => false,
            Some(value) => value.eq_ignore_ascii_case("hidden"),
        }
    }

    fn foster_parent_in_body(&mut self, token: Token) -> ProcessResult {
        self.open_elems.foster_parenting = true;
        let res = self.step(InsertionMode::InBody, token);
        self.open_elems.foster_parenting = false;
        res
    }

    fn process_chars_in_table(&mut self, token: Token) -> ProcessResult {
        declare_tag_set!(table_outer = "table" "tbody" "tfoot" "thead" "tr");
        if self.current_node_in(table_outer) {
            assert!(self.pending_table_text.is_empty());
            self.orig_mode = Some(self.mode);
            ProcessResult::Reprocess(InsertionMode::InTableText, token)
        } else {
            self.parse_error(Borrowed("Unexpected characters in table"));
            self.foster_parent_in_body(token)
        }
    }

    // https://html.spec.whatwg.org/multipage/#reset-the-insertion-mode-appropriately
    fn reset_insertion_mode(&self) -> InsertionMode {
        for (i, &node) in self.open_elems.iter().enumerate().rev() {
            let last = i == 0usize;
            if last {
                // Fragment case: the context element is <body>.
                return InsertionMode::InBody;
            }
            let expanded = self.arena.expanded(node);
            let name = match expanded {
                ExpandedName {
                    ns: &ns!(html),
                    local,
                } => local,
                _ => continue,
            };
            match *name {
                local_name!("td") | local_name!("th") => return InsertionMode::InCell,
                local_name!("tr") => return InsertionMode::InRow,
                local_name!("tbody") | local_name!("thead") | local_name!("tfoot") => {
                    return InsertionMode::InTableBody;
                },
                local_name!("caption") => return InsertionMode::InCaption,
                local_name!("colgroup") => return InsertionMode::InColumnGroup,
                local_name!("table") => return InsertionMode::InTable,
                local_name!("template") => {
                    return *self
                        .template_modes
                        .last()
                        .expect("no template insertion modes");
                },
                local_name!("body") => return InsertionMode::InBody,
                _ => (),
            }
        }
        InsertionMode::InBody
    }

    fn close_the_cell(&mut self) {
        self.generate_implied_end_tags(cursory_implied_end);
        if self.pop_until(td_th) != 1 {
            self.parse_error(Borrowed("expected to close <td> or <th> with cell"));
        }
        self.active_formatting.clear_to_marker();
    }

    fn append_text(&mut self, text: StrTendril) -> ProcessResult {
        self.open_elems.insert_text(&mut self.arena, text);
        ProcessResult::Done
    }

    //§ creating-and-inserting-nodes
    // https://html.spec.whatwg.org/multipage/#create-an-element-for-the-token
    fn insert_element(
        &mut self,
        push: PushFlag,
        ns: Namespace,
        name: LocalName,
        attrs: StrTendril,
    ) -> NodeId {
        let elem = self.arena.create(ns, name, attrs);
        self.open_elems
            .insert_node(&mut self.arena, None, Child::Elem(elem));
        match push {
            PushFlag::Push => self.open_elems.push(elem),
            PushFlag::NoPush => (),
        }
        elem
    }

    fn insert_element_for(&mut self, tag: Tag) -> NodeId {
        self.insert_element(PushFlag::Push, ns!(html), tag.name, tag.attrs)
    }

    fn insert_and_pop_element_for(&mut self, tag: Tag) -> NodeId {
        self.insert_element(PushFlag::NoPush, ns!(html), tag.name, tag.attrs)
    }

    fn insert_phantom(&mut self, name: LocalName) -> NodeId {
        self.insert_element(PushFlag::Push, ns!(html), name, StrTendril::new())
    }
    //§ END

    // Insert at the "appropriate place for inserting a node".
    fn insert_appropriately(&mut self, child: Child, override_target: Option<NodeId>) {
        self.open_elems
            .insert_node(&mut self.arena, override_target, child);
    }

    fn create_formatting_element_for(&mut self, tag: Tag) -> NodeId {
        let elem = self.insert_element(
            PushFlag::Push,
            ns!(html),
            tag.name.clone(),
            tag.attrs.clone(),
        );
        self.active_formatting.push_element(elem, tag);
        elem
    }

    fn clear_active_formatting_to_marker(&mut self) {
        self.active_formatting.clear_to_marker();
    }

    /// The "any other end tag" algorithm: walk the stack top-to-root; on
    /// a matching name generate implied end tags (except it) and pop
    /// through the match; a special-set element first means ignore.
    fn process_end_tag_in_body(&mut self, tag: Tag) {
        let mut match_idx = None;
        for (i, &elem) in self.open_elems.iter().enumerate().rev() {
            if self.html_elem_named(elem, tag.name.clone()) {
                match_idx = Some(i);
                break;
            }

            if self.elem_in(elem, special_tag) {
                self.parse_error(Borrowed("Found special tag while closing generic tag"));
                return;
            }
        }

        let Some(match_idx) = match_idx else {
            // The root <html> is in the special set, so the walk above
            // cannot fall off the stack.
            self.unexpected(&tag);
            return;
        };

        self.generate_implied_end_except(tag.name.clone());

        if match_idx != self.open_elems.len() - 1 {
            // mis-nested tags
            self.unexpected(&tag);
        }
        self.open_elems.pop_to(&mut self.arena, match_idx);
    }

    fn handle_misnested_a_tags(&mut self, tag: &Tag) {
        let Some(node) = self
            .active_formatting
            .end_to_marker()
            .find(|&(_, n, _)| self.html_elem_named(n, local_name!("a")))
            .map(|(_, n, _)| n)
        else {
            return;
        };

        self.unexpected(tag);
        self.adoption_agency(local_name!("a"));
        if let Some(index) = self.active_formatting.position_of(node) {
            self.active_formatting.remove(index);
        }
        self.open_elems.remove(node);
    }

    /// <https://html.spec.whatwg.org/#an-introduction-to-error-handling-and-strange-cases-in-the-parser>
    ///
    /// Returns `false` only when no matching formatting entry exists and
    /// the caller must fall through to the generic end-tag algorithm.
    fn adoption_agency(&mut self, subject: LocalName) -> bool {
        // 1. Fast path: current node matches and is not an active
        // formatting element.
        if self.current_node_named(subject.clone())
            && self
                .active_formatting
                .position_of(self.current_node())
                .is_none()
        {
            self.pop();
            return true;
        }

        // 2. 3. 4.
        for _ in 0..8 {
            // 5.
            let maybe_fmt_entry = self
                .active_formatting
                .end_to_marker()
                .find(|&(_, _, tag)| tag.name == subject)
                .map(|(i, h, t)| (i, h, t.clone()));

            let Some((fmt_elem_index, fmt_elem, fmt_elem_tag)) = maybe_fmt_entry else {
                return false;
            };

            // 6.
            let Some(fmt_elem_stack_index) = self.open_elems.position_of(fmt_elem) else {
                self.parse_error(Borrowed("Formatting element not open"));
                self.active_formatting.remove(fmt_elem_index);
                return true;
            };

            // 7.
            if !self.in_scope(default_scope, |n| n == fmt_elem) {
                self.parse_error(Borrowed("Formatting element not in scope"));
                return true;
            }

            // 8.
            if self.current_node() != fmt_elem {
                self.parse_error(Borrowed("Formatting element not current node"));
            }

            // 9.
            let maybe_furthest_block = self
                .open_elems
                .iter()
                .enumerate()
                .skip(fmt_elem_stack_index)
                .find(|&(_, &open_element)| self.elem_in(open_element, special_tag))
                .map(|(i, &h)| (i, h));

            let Some((furthest_block_index, furthest_block)) = maybe_furthest_block else {
                // 10. Pop the stack through the formatting element.
                self.open_elems.pop_to(&mut self.arena, fmt_elem_stack_index);
                self.active_formatting.remove(fmt_elem_index);
                return true;
            };

            // 11.
            let common_ancestor = self.open_elems.get(fmt_elem_stack_index - 1);

            // 12.
            let mut bookmark = Bookmark::Replace(fmt_elem);

            // 13.
            let mut node;
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // 13.1.
            let mut inner_counter = 0;
            loop {
                // 13.2.
                inner_counter += 1;

                // 13.3.
                node_index -= 1;
                node = self.open_elems.get(node_index);

                // 13.4.
                if node == fmt_elem {
                    break;
                }

                // 13.5.
                if inner_counter > 3 {
                    if let Some(position) = self.active_formatting.position_of(node) {
                        self.active_formatting.remove(position);
                    }
                    self.open_elems.remove(node);
                    continue;
                }

                let Some(node_formatting_index) = self.active_formatting.position_of(node) else {
                    // 13.6.
                    self.open_elems.remove(node);
                    continue;
                };

                // 13.7. Clone from the frozen tag; replace the stack and
                // list entries in place.
                let tag = self.active_formatting.tag(node_formatting_index).clone();
                let new_element =
                    self.arena
                        .create(ns!(html), tag.name.clone(), tag.attrs.clone());
                self.open_elems.replace(node_index, new_element);
                self.active_formatting
                    .replace(node_formatting_index, FormatEntry::Element(new_element, tag));
                node = new_element;

                // 13.8.
                if last_node == furthest_block {
                    bookmark = Bookmark::InsertAfter(node);
                }

                // 13.9.
                self.arena.detach(last_node);
                self.arena.append_elem(node, last_node);

                // 13.10.
                last_node = node;

                // 13.11.
            }

            // 14.
            self.arena.detach(last_node);
            self.insert_appropriately(Child::Elem(last_node), Some(common_ancestor));

            // 15.
            let new_element = self.arena.create(
                ns!(html),
                fmt_elem_tag.name.clone(),
                fmt_elem_tag.attrs.clone(),
            );
            let new_entry = FormatEntry::Element(new_element, fmt_elem_tag);

            // 16.
            self.arena.adopt_children(furthest_block, new_element);

            // 17.
            self.arena.append_elem(furthest_block, new_element);

            // 18.
            match bookmark {
                Bookmark::Replace(to_replace) => {
                    let index = self
                        .active_formatting
                        .position_of(to_replace)
                        .expect("bookmark not found in active formatting elements");
                    self.active_formatting.replace(index, new_entry);
                },
                Bookmark::InsertAfter(previous) => {
                    let index = self
                        .active_formatting
                        .position_of(previous)
                        .expect("bookmark not found in active formatting elements")
                        + 1;
                    self.active_formatting.insert(index, new_entry);
                    let old_index = self
                        .active_formatting
                        .position_of(fmt_elem)
                        .expect("formatting element not found in active formatting elements");
                    self.active_formatting.remove(old_index);
                },
            }

            // 19.
            self.open_elems.remove(fmt_elem);
            let new_furthest_block_index = self
                .open_elems
                .position_of(furthest_block)
                .expect("furthest block missing from open element stack");
            self.open_elems
                .insert(new_furthest_block_index + 1, new_element);

            // 20.
        }
        true
    }

    fn is_marker_or_open(&self, entry: &FormatEntry) -> bool {
        match *entry {
            FormatEntry::Marker => true,
            FormatEntry::Element(node, _) => self.open_elems.position_of(node).is_some(),
        }
    }

    /// <https://html.spec.whatwg.org/#reconstruct-the-active-formatting-elements>
    fn reconstruct_active_formatting_elements(&mut self) {
        // Step 1-2: nothing to do if the list is empty or ends with a
        // marker or a still-open element.
        if self.active_formatting.is_empty() {
            return;
        }
        if self.is_marker_or_open(
            self.active_formatting
                .entry(self.active_formatting.len() - 1),
        ) {
            return;
        }

        // Step 3-7: rewind to just after the nearest marker or still-open
        // entry.
        let mut entry_index = self.active_formatting.len() - 1;
        loop {
            if entry_index == 0 {
                break;
            }
            entry_index -= 1;
            if self.is_marker_or_open(self.active_formatting.entry(entry_index)) {
                entry_index += 1;
                break;
            }
        }

        // Step 8-10: walk forward, cloning each entry from its frozen tag
        // and replacing the entry with the fresh element.
        loop {
            let tag = self.active_formatting.tag(entry_index).clone();
            let new_element = self.insert_element(
                PushFlag::Push,
                ns!(html),
                tag.name.clone(),
                tag.attrs.clone(),
            );
            self.active_formatting
                .replace(entry_index, FormatEntry::Element(new_element, tag));
            if entry_index == self.active_formatting.len() - 1 {
                break;
            }
            entry_index += 1;
        }
    }

    //§ tree-construction
    fn is_foreign(&self, token: &Token) -> bool {
        if let Token::Eof = *token {
            return false;
        }

        let current = self.adjusted_current_node();
        let name = self.arena.expanded(current);
        if let ns!(html) = *name.ns {
            return false;
        }

        if mathml_text_integration_point(name) {
            match *token {
                Token::Characters(..) => return false,
                Token::Tag(Tag {
                    kind: StartTag,
                    ref name,
                    ..
                }) if !matches!(*name, local_name!("mglyph") | local_name!("malignmark")) => {
                    return false;
                },
                _ => (),
            }
        }

        if svg_html_integration_point(name) {
            match *token {
                Token::Characters(..) => return false,
                Token::Tag(Tag { kind: StartTag, .. }) => return false,
                _ => (),
            }
        }

        if let expanded_name!(mathml "annotation-xml") = name {
            match *token {
                Token::Tag(Tag {
                    kind: StartTag,
                    name: local_name!("svg"),
                    ..
                }) => return false,
                Token::Characters(..) | Token::Tag(Tag { kind: StartTag, .. }) => {
                    return !self.arena.is_annotation_xml_integration_point(current);
                },
                _ => {},
            };
        }

        true
    }
    //§ END

    fn enter_foreign(&mut self, mut tag: Tag, ns: Namespace) -> ProcessResult {
        tag.attrs = attrs::adjust_foreign(&tag.attrs, &ns);

        if tag.self_closing {
            self.insert_element(PushFlag::NoPush, ns, tag.name, tag.attrs);
            ProcessResult::DoneAckSelfClosing
        } else {
            self.insert_element(PushFlag::Push, ns, tag.name, tag.attrs);
            ProcessResult::Done
        }
    }

    fn foreign_start_tag(&mut self, mut tag: Tag) -> ProcessResult {
        let current_ns = self.arena.get(self.adjusted_current_node()).ns.clone();
        if current_ns == ns!(svg) {
            tag.name = data::adjust_svg_tag_name(tag.name);
        }
        self.enter_foreign(tag, current_ns)
    }

    fn is_foreign_breakout(&self, tag: &Tag) -> bool {
        if data::FOREIGN_BREAKOUT.contains(&*tag.name) {
            return true;
        }
        tag.name == local_name!("font")
            && ["color", "face", "size"]
                .iter()
                .any(|name| attrs::has(&tag.attrs, name))
    }

    /// An HTML-like tag inside foreign content: pop out of the foreign
    /// subtree, then reprocess the tag as HTML.
    fn breakout_from_foreign_content(&mut self, tag: Tag) -> ProcessResult {
        self.unexpected(&tag);
        while !self.current_node_in(|n| {
            *n.ns == ns!(html) || mathml_text_integration_point(n) || svg_html_integration_point(n)
        }) {
            self.pop();
        }
        let mode = self.mode;
        self.step(mode, Token::Tag(tag))
    }
}
