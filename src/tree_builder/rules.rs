// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The tree builder rules, as a single, enormous nested match expression.

use std::borrow::Cow::Borrowed;

use tendril::StrTendril;

use crate::tokenizer::{EndTag, StartTag, Tag};
use crate::tree_builder::tag_sets::*;
use crate::tree_builder::types::*;
use crate::tree_builder::TreeBuilder;

fn any_not_whitespace(x: &StrTendril) -> bool {
    x.chars().any(|c| !c.is_ascii_whitespace())
}

#[rustfmt::skip]
macro_rules! tag {
    // Any start tag
    (<>) => {
        crate::tokenizer::Tag { kind: crate::tokenizer::StartTag, .. }
    };
    (<>|$($tail:tt)*) => {
        tag!(<>) | tag!($($tail)*)
    };

    // Any end tag
    (</>) => {
        crate::tokenizer::Tag { kind: crate::tokenizer::EndTag, .. }
    };
    (</>|$($tail:tt)*) => {
        tag!(</>) | tag!($($tail)*)
    };

    // Named start tag
    (<$tag:tt>) => {
        crate::tokenizer::Tag { kind: crate::tokenizer::StartTag, name: local_name!($tag), .. }
    };
    (<$tag:tt>|$($tail:tt)*) => {
        tag!(<$tag>) | tag!($($tail)*)
    };

    // Named end tag
    (</$tag:tt>) => {
        crate::tokenizer::Tag { kind: crate::tokenizer::EndTag, name: local_name!($tag), .. }
    };
    (</$tag:tt>|$($tail:tt)*) => {
        tag!(</$tag>) | tag!($($tail)*)
    };
}

#[doc(hidden)]
impl TreeBuilder {
    /// Process an HTML content token
    ///
    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml>
    pub(crate) fn step(&mut self, mode: InsertionMode, token: Token) -> ProcessResult {
        self.debug_step(mode, &token);

        match mode {
            // § parsing-main-inbody
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody>
            InsertionMode::InBody => match token {
                Token::Characters(_, text) => {
                    self.reconstruct_active_formatting_elements();
                    self.append_text(text)
                },

                Token::Tag(
                    tag!(<"base"> | <"basefont"> | <"bgsound"> | <"link"> | <"meta"> | <"noframes">
                            | <"style"> | <"template"> | </"template">),
                ) => self.step(InsertionMode::InHead, token),

                Token::Eof => {
                    if !self.template_modes.is_empty() {
                        self.step(InsertionMode::InTemplate, token)
                    } else {
                        self.stop_parsing()
                    }
                },

                Token::Tag(
                    tag @
                    tag!(<"address"> | <"article"> | <"aside"> | <"blockquote"> | <"center"> | <"details"> | <"dialog"> |
                          <"dir"> | <"div"> | <"dl"> | <"fieldset"> | <"figcaption"> | <"figure"> | <"footer"> | <"header"> |
                          <"hgroup"> | <"main"> | <"nav"> | <"ol"> | <"p"> | <"section"> | <"summary"> | <"ul">),
                ) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"menu">)) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"h1"> | <"h2"> | <"h3"> | <"h4"> | <"h5"> | <"h6">)) => {
                    self.close_p_element_in_button_scope();
                    if self.current_node_in(heading_tag) {
                        self.parse_error(Borrowed("nested heading tags"));
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                // Linefeeds right after these are the caller's problem.
                Token::Tag(tag @ tag!(<"pre"> | <"listing">)) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"li"> | <"dd"> | <"dt">)) => {
                    declare_tag_set!(close_list = "li");
                    declare_tag_set!(close_defn = "dd" "dt");
                    declare_tag_set!(extra_special = [special_tag] - "address" "div" "p");
                    let list = match tag.name {
                        local_name!("li") => true,
                        local_name!("dd") | local_name!("dt") => false,
                        _ => unreachable!(),
                    };

                    let mut to_close = None;
                    for &node in self.open_elems.iter().rev() {
                        let name = self.arena.expanded(node);
                        let can_close = if list {
                            close_list(name)
                        } else {
                            close_defn(name)
                        };
                        if can_close {
                            to_close = Some(name.local.clone());
                            break;
                        }
                        if extra_special(name) {
                            break;
                        }
                    }

                    if let Some(name) = to_close {
                        self.generate_implied_end_except(name.clone());
                        self.expect_to_close(name);
                    }

                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"button">)) => {
                    if self.in_scope_named(default_scope, local_name!("button")) {
                        self.parse_error(Borrowed("nested buttons"));
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.pop_until_named(local_name!("button"));
                    }
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(
                    tag @
                    tag!(</"address"> | </"article"> | </"aside"> | </"blockquote"> | </"button"> | </"center"> |
                              </"details"> | </"dialog"> | </"dir"> | </"div"> | </"dl"> | </"fieldset"> | </"figcaption"> |
                              </"figure"> | </"footer"> | </"header"> | </"hgroup"> | </"listing"> | </"main"> | </"menu"> |
                              </"nav"> | </"ol"> | </"pre"> | </"section"> | </"summary"> | </"ul">),
                ) => {
                    if !self.in_scope_named(default_scope, tag.name.clone()) {
                        self.unexpected(&tag);
                    } else {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name);
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag!(</"p">)) => {
                    if !self.in_scope_named(button_scope, local_name!("p")) {
                        self.parse_error(Borrowed("No <p> tag to close"));
                        self.insert_phantom(local_name!("p"));
                    }
                    self.close_p_element();
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(</"li"> | </"dd"> | </"dt">)) => {
                    let in_scope = if tag.name == local_name!("li") {
                        self.in_scope_named(list_item_scope, tag.name.clone())
                    } else {
                        self.in_scope_named(default_scope, tag.name.clone())
                    };
                    if in_scope {
                        self.generate_implied_end_except(tag.name.clone());
                        self.expect_to_close(tag.name);
                    } else {
                        self.parse_error(Borrowed("No matching tag to close"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(</"h1"> | </"h2"> | </"h3"> | </"h4"> | </"h5"> | </"h6">)) => {
                    if self.in_scope(default_scope, |n| self.elem_in(n, heading_tag)) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        if !self.current_node_named(tag.name) {
                            self.parse_error(Borrowed("Closing wrong heading tag"));
                        }
                        self.pop_until(heading_tag);
                    } else {
                        self.parse_error(Borrowed("No heading tag to close"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"a">)) => {
                    self.handle_misnested_a_tags(&tag);
                    self.reconstruct_active_formatting_elements();
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(
                    tag @
                    tag!(<"b"> | <"big"> | <"code"> | <"em"> | <"font"> | <"i"> | <"s"> | <"small"> | <"strike"> | <"strong"> | <"tt"> | <"u">),
                ) => {
                    self.reconstruct_active_formatting_elements();
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"nobr">)) => {
                    self.reconstruct_active_formatting_elements();
                    if self.in_scope_named(default_scope, local_name!("nobr")) {
                        self.parse_error(Borrowed("Nested <nobr>"));
                        self.adoption_agency(local_name!("nobr"));
                        self.reconstruct_active_formatting_elements();
                    }
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(
                    tag @ tag!(</"a"> | </"b"> | </"big"> | </"code"> | </"em"> | </"font"> | </"i"> | </"nobr"> |
                                </"s"> | </"small"> | </"strike"> | </"strong"> | </"tt"> | </"u">),
                ) => {
                    if !self.adoption_agency(tag.name.clone()) {
                        self.process_end_tag_in_body(tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"applet"> | <"marquee"> | <"object">)) => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    self.active_formatting.push_marker();
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(</"applet"> | </"marquee"> | </"object">)) => {
                    if !self.in_scope_named(default_scope, tag.name.clone()) {
                        self.unexpected(&tag);
                    } else {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name);
                        self.clear_active_formatting_to_marker();
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"table">)) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    self.mode = InsertionMode::InTable;
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(</"br">)) => {
                    self.unexpected(&tag);
                    self.step(
                        InsertionMode::InBody,
                        Token::Tag(Tag {
                            kind: StartTag,
                            attrs: StrTendril::new(),
                            ..tag
                        }),
                    )
                },

                Token::Tag(
                    tag @ tag!(<"area"> | <"br"> | <"embed"> | <"img"> | <"keygen"> | <"wbr"> | <"input">),
                ) => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag @ tag!(<"param"> | <"source"> | <"track">)) => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag @ tag!(<"hr">)) => {
                    self.close_p_element_in_button_scope();
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag @ tag!(<"image">)) => {
                    self.unexpected(&tag);
                    self.step(
                        InsertionMode::InBody,
                        Token::Tag(Tag {
                            name: local_name!("img"),
                            ..tag
                        }),
                    )
                },

                Token::Tag(tag @ tag!(<"rb"> | <"rtc">)) => {
                    if self.in_scope_named(default_scope, local_name!("ruby")) {
                        self.generate_implied_end_tags(cursory_implied_end);
                    }
                    if !self.current_node_named(local_name!("ruby")) {
                        self.unexpected(&tag);
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"rp"> | <"rt">)) => {
                    if self.in_scope_named(default_scope, local_name!("ruby")) {
                        self.generate_implied_end_except(local_name!("rtc"));
                    }
                    if !self.current_node_named(local_name!("rtc"))
                        && !self.current_node_named(local_name!("ruby"))
                    {
                        self.unexpected(&tag);
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"math">)) => {
                    self.reconstruct_active_formatting_elements();
                    self.enter_foreign(tag, ns!(mathml))
                },

                Token::Tag(tag @ tag!(<"svg">)) => {
                    self.reconstruct_active_formatting_elements();
                    self.enter_foreign(tag, ns!(svg))
                },

                Token::Tag(
                    tag!(<"caption"> | <"col"> | <"colgroup"> |
                                <"tbody"> | <"td"> | <"tfoot"> | <"th"> | <"thead"> | <"tr">),
                ) => {
                    self.unexpected(&token);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<>)) => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(</>)) => {
                    self.process_end_tag_in_body(tag);
                    ProcessResult::Done
                },
            },

            // § parsing-main-incdata
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata>
            InsertionMode::Text => match token {
                Token::Characters(_, text) => self.append_text(text),

                Token::Tag(tag!(</>)) => {
                    self.pop();
                    self.mode = self.orig_mode.take().expect("no saved insertion mode");
                    ProcessResult::Done
                },

                // EOF, or a start tag the sanitizer let through: the
                // raw-text element is over.
                token => {
                    self.unexpected(&token);
                    self.pop();
                    ProcessResult::Reprocess(
                        self.orig_mode.take().expect("no saved insertion mode"),
                        token,
                    )
                },
            },

            // § parsing-main-intable
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable>
            InsertionMode::InTable => match token {
                token @ Token::Characters(..) => self.process_chars_in_table(token),

                Token::Tag(tag @ tag!(<"caption">)) => {
                    self.pop_until_current(table_scope);
                    self.active_formatting.push_marker();
                    self.insert_element_for(tag);
                    self.mode = InsertionMode::InCaption;
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(<"colgroup">)) => {
                    self.pop_until_current(table_scope);
                    self.insert_element_for(tag);
                    self.mode = InsertionMode::InColumnGroup;
                    ProcessResult::Done
                },

                Token::Tag(tag!(<"col">)) => {
                    self.pop_until_current(table_scope);
                    self.insert_phantom(local_name!("colgroup"));
                    ProcessResult::Reprocess(InsertionMode::InColumnGroup, token)
                },

                Token::Tag(tag @ tag!(<"tbody"> | <"tfoot"> | <"thead">)) => {
                    self.pop_until_current(table_scope);
                    self.insert_element_for(tag);
                    self.mode = InsertionMode::InTableBody;
                    ProcessResult::Done
                },

                Token::Tag(tag!(<"td"> | <"th"> | <"tr">)) => {
                    self.pop_until_current(table_scope);
                    self.insert_phantom(local_name!("tbody"));
                    ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                },

                Token::Tag(tag!(<"table">)) => {
                    self.unexpected(&token);
                    if self.in_scope_named(table_scope, local_name!("table")) {
                        self.pop_until_named(local_name!("table"));
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    } else {
                        ProcessResult::Done
                    }
                },

                Token::Tag(tag!(</"table">)) => {
                    if self.in_scope_named(table_scope, local_name!("table")) {
                        self.pop_until_named(local_name!("table"));
                        self.mode = self.reset_insertion_mode();
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(
                    tag!(</"caption"> | </"col"> | </"colgroup"> |
                        </"tbody"> | </"td"> | </"tfoot"> | </"th"> | </"thead"> | </"tr">),
                ) => self.unexpected(&token),

                Token::Tag(tag!(<"style"> | <"template"> | </"template">)) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(tag @ tag!(<"input">)) => {
                    self.unexpected(&tag);
                    if self.is_type_hidden(&tag) {
                        self.insert_and_pop_element_for(tag);
                        ProcessResult::DoneAckSelfClosing
                    } else {
                        self.foster_parent_in_body(Token::Tag(tag))
                    }
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => {
                    self.unexpected(&token);
                    self.foster_parent_in_body(token)
                },
            },

            // § parsing-main-intabletext
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext>
            InsertionMode::InTableText => match token {
                Token::Characters(split, text) => {
                    self.pending_table_text.push((split, text));
                    ProcessResult::Done
                },

                token => {
                    let pending = std::mem::take(&mut self.pending_table_text);
                    let contains_nonspace = pending.iter().any(|&(split, ref text)| match split {
                        SplitStatus::Whitespace => false,
                        SplitStatus::NotWhitespace => true,
                        SplitStatus::NotSplit => any_not_whitespace(text),
                    });

                    if contains_nonspace {
                        self.parse_error(Borrowed("Non-space table text"));
                        for (split, text) in pending.into_iter() {
                            match self.foster_parent_in_body(Token::Characters(split, text)) {
                                ProcessResult::Done => (),
                                _ => panic!("text fostering should complete in one step"),
                            }
                        }
                    } else {
                        for (_, text) in pending.into_iter() {
                            self.append_text(text);
                        }
                    }

                    ProcessResult::Reprocess(self.orig_mode.take().expect("no saved mode"), token)
                },
            },

            // § parsing-main-incaption
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption>
            InsertionMode::InCaption => match token {
                Token::Tag(
                    tag @ tag!(<"caption"> | <"col"> | <"colgroup"> | <"tbody"> | <"td"> | <"tfoot"> |
                                <"th"> | <"thead"> | <"tr"> | </"table"> | </"caption">),
                ) => {
                    if self.in_scope_named(table_scope, local_name!("caption")) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(local_name!("caption"));
                        self.clear_active_formatting_to_marker();
                        match tag {
                            Tag {
                                kind: EndTag,
                                name: local_name!("caption"),
                                ..
                            } => {
                                self.mode = InsertionMode::InTable;
                                ProcessResult::Done
                            },
                            _ => ProcessResult::Reprocess(InsertionMode::InTable, Token::Tag(tag)),
                        }
                    } else {
                        self.unexpected(&tag);
                        ProcessResult::Done
                    }
                },

                Token::Tag(
                    tag!(</"col"> | </"colgroup"> | </"tbody"> |
                            </"td"> | </"tfoot"> | </"th"> | </"thead"> | </"tr">),
                ) => self.unexpected(&token),

                token => self.step(InsertionMode::InBody, token),
            },

            // § parsing-main-incolgroup
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup>
            InsertionMode::InColumnGroup => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),

                Token::Tag(tag @ tag!(<"col">)) => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag!(</"colgroup">)) => {
                    if self.current_node_named(local_name!("colgroup")) {
                        self.pop();
                        self.mode = InsertionMode::InTable;
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag!(</"col">)) => self.unexpected(&token),

                Token::Tag(tag!(<"template"> | </"template">)) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => {
                    if self.current_node_named(local_name!("colgroup")) {
                        self.pop();
                        ProcessResult::Reprocess(InsertionMode::InTable, token)
                    } else {
                        self.unexpected(&token)
                    }
                },
            },

            // § parsing-main-intbody
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody>
            InsertionMode::InTableBody => match token {
                Token::Tag(tag @ tag!(<"tr">)) => {
                    self.pop_until_current(table_body_context);
                    self.insert_element_for(tag);
                    self.mode = InsertionMode::InRow;
                    ProcessResult::Done
                },

                Token::Tag(tag!(<"th"> | <"td">)) => {
                    self.unexpected(&token);
                    self.pop_until_current(table_body_context);
                    self.insert_phantom(local_name!("tr"));
                    ProcessResult::Reprocess(InsertionMode::InRow, token)
                },

                Token::Tag(tag @ tag!(</"tbody"> | </"tfoot"> | </"thead">)) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.pop_until_current(table_body_context);
                        self.pop();
                        self.mode = InsertionMode::InTable;
                    } else {
                        self.unexpected(&tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(
                    tag!(<"caption"> | <"col"> | <"colgroup"> | <"tbody"> | <"tfoot"> | <"thead"> | </"table">),
                ) => {
                    declare_tag_set!(table_outer = "table" "tbody" "tfoot" "thead");
                    if self.in_scope(table_scope, |e| self.elem_in(e, table_outer)) {
                        self.pop_until_current(table_body_context);
                        self.pop();
                        ProcessResult::Reprocess(InsertionMode::InTable, token)
                    } else {
                        self.unexpected(&token)
                    }
                },

                Token::Tag(tag!(</"caption"> | </"col"> | </"colgroup"> | </"td"> | </"th"> | </"tr">)) => {
                    self.unexpected(&token)
                },

                token => self.step(InsertionMode::InTable, token),
            },

            // § parsing-main-intr
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr>
            InsertionMode::InRow => match token {
                Token::Tag(tag @ tag!(<"th"> | <"td">)) => {
                    self.pop_until_current(table_row_context);
                    self.insert_element_for(tag);
                    self.mode = InsertionMode::InCell;
                    self.active_formatting.push_marker();
                    ProcessResult::Done
                },

                Token::Tag(tag!(</"tr">)) => {
                    if self.in_scope_named(table_scope, local_name!("tr")) {
                        self.pop_until_current(table_row_context);
                        let node = self.pop();
                        self.assert_named(node, local_name!("tr"));
                        self.mode = InsertionMode::InTableBody;
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(
                    tag!(<"caption"> | <"col"> | <"colgroup"> | <"tbody"> | <"tfoot"> | <"thead"> | <"tr"> | </"table">),
                ) => {
                    if self.in_scope_named(table_scope, local_name!("tr")) {
                        self.pop_until_current(table_row_context);
                        let node = self.pop();
                        self.assert_named(node, local_name!("tr"));
                        ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                    } else {
                        self.unexpected(&token)
                    }
                },

                Token::Tag(tag @ tag!(</"tbody"> | </"tfoot"> | </"thead">)) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        if self.in_scope_named(table_scope, local_name!("tr")) {
                            self.pop_until_current(table_row_context);
                            let node = self.pop();
                            self.assert_named(node, local_name!("tr"));
                            ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
                        } else {
                            ProcessResult::Done
                        }
                    } else {
                        self.unexpected(&tag)
                    }
                },

                Token::Tag(tag!(</"caption"> | </"col"> | </"colgroup"> | </"td"> | </"th">)) => {
                    self.unexpected(&token)
                },

                token => self.step(InsertionMode::InTable, token),
            },

            // § parsing-main-intd
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd>
            InsertionMode::InCell => match token {
                Token::Tag(tag @ tag!(</"td"> | </"th">)) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name);
                        self.clear_active_formatting_to_marker();
                        self.mode = InsertionMode::InRow;
                    } else {
                        self.unexpected(&tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(
                    tag!(<"caption"> | <"col"> | <"colgroup"> | <"tbody"> | <"td"> | <"tfoot"> | <"th"> | <"thead"> | <"tr">),
                ) => {
                    if self.in_scope(table_scope, |n| self.elem_in(n, td_th)) {
                        self.close_the_cell();
                        ProcessResult::Reprocess(InsertionMode::InRow, token)
                    } else {
                        self.unexpected(&token)
                    }
                },

                Token::Tag(tag!(</"caption"> | </"col"> | </"colgroup">)) => self.unexpected(&token),

                Token::Tag(tag @ tag!(</"table"> | </"tbody"> | </"tfoot"> | </"thead"> | </"tr">)) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.close_the_cell();
                        ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
                    } else {
                        self.unexpected(&tag)
                    }
                },

                token => self.step(InsertionMode::InBody, token),
            },

            // § parsing-main-intemplate
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate>
            InsertionMode::InTemplate => match token {
                Token::Characters(_, _) => self.step(InsertionMode::InBody, token),

                Token::Tag(
                    tag!(<"base"> | <"basefont"> | <"bgsound"> | <"link"> | <"meta"> | <"noframes"> |
                                <"style"> | <"template"> | </"template">),
                ) => self.step(InsertionMode::InHead, token),

                Token::Tag(tag!(<"caption"> | <"colgroup"> | <"tbody"> | <"tfoot"> | <"thead">)) => {
                    self.template_modes.pop();
                    self.template_modes.push(InsertionMode::InTable);
                    ProcessResult::Reprocess(InsertionMode::InTable, token)
                },

                Token::Tag(tag!(<"col">)) => {
                    self.template_modes.pop();
                    self.template_modes.push(InsertionMode::InColumnGroup);
                    ProcessResult::Reprocess(InsertionMode::InColumnGroup, token)
                },

                Token::Tag(tag!(<"tr">)) => {
                    self.template_modes.pop();
                    self.template_modes.push(InsertionMode::InTableBody);
                    ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                },

                Token::Tag(tag!(<"td"> | <"th">)) => {
                    self.template_modes.pop();
                    self.template_modes.push(InsertionMode::InRow);
                    ProcessResult::Reprocess(InsertionMode::InRow, token)
                },

                Token::Eof => {
                    if !self.in_html_elem_named(local_name!("template")) {
                        self.stop_parsing()
                    } else {
                        self.unexpected(&token);
                        self.pop_until_named(local_name!("template"));
                        self.clear_active_formatting_to_marker();
                        self.template_modes.pop();
                        self.mode = self.reset_insertion_mode();
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    }
                },

                Token::Tag(tag @ tag!(<>)) => {
                    self.template_modes.pop();
                    self.template_modes.push(InsertionMode::InBody);
                    ProcessResult::Reprocess(InsertionMode::InBody, Token::Tag(tag))
                },

                token => self.unexpected(&token),
            },

            // § parsing-main-inhead
            // <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead>
            //
            // Only ever delegated to, for the handful of elements that are
            // legal in head; the mode proper is never entered.
            InsertionMode::InHead => match token {
                Token::Tag(tag @ tag!(<"base"> | <"basefont"> | <"bgsound"> | <"link"> | <"meta">)) => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag @ tag!(<"style"> | <"noframes">)) => self.parse_raw_data(tag),

                Token::Tag(tag @ tag!(<"template">)) => {
                    self.insert_element_for(tag);
                    self.active_formatting.push_marker();
                    self.mode = InsertionMode::InTemplate;
                    self.template_modes.push(InsertionMode::InTemplate);
                    ProcessResult::Done
                },

                Token::Tag(tag @ tag!(</"template">)) => {
                    if !self.in_html_elem_named(local_name!("template")) {
                        self.unexpected(&tag);
                    } else {
                        self.generate_implied_end_tags(thorough_implied_end);
                        self.expect_to_close(local_name!("template"));
                        self.clear_active_formatting_to_marker();
                        self.template_modes.pop();
                        self.mode = self.reset_insertion_mode();
                    }
                    ProcessResult::Done
                },

                token => self.step(InsertionMode::InBody, token),
            },
        }
    }

    /// § The rules for parsing tokens in foreign content
    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign>
    pub(crate) fn step_foreign(&mut self, token: Token) -> ProcessResult {
        match token {
            Token::Characters(_, text) => self.append_text(text),

            Token::Tag(tag @ tag!(<>)) => {
                if self.is_foreign_breakout(&tag) {
                    self.breakout_from_foreign_content(tag)
                } else {
                    self.foreign_start_tag(tag)
                }
            },

            Token::Tag(tag @ tag!(</"br"> | </"p">)) => self.breakout_from_foreign_content(tag),

            Token::Tag(tag @ tag!(</>)) => {
                let mut first = true;
                let mut stack_idx = self.open_elems.len() - 1;
                loop {
                    if stack_idx == 0 {
                        return ProcessResult::Done;
                    }

                    let node = self.open_elems.get(stack_idx);
                    let (html, eq) = {
                        let node = self.arena.get(node);
                        (
                            node.ns == ns!(html),
                            node.name.eq_ignore_ascii_case(&tag.name),
                        )
                    };
                    if !first && html {
                        let mode = self.mode;
                        return self.step(mode, Token::Tag(tag));
                    }

                    if eq {
                        self.open_elems.pop_to(&mut self.arena, stack_idx);
                        return ProcessResult::Done;
                    }

                    if first {
                        self.unexpected(&tag);
                        first = false;
                    }
                    stack_idx -= 1;
                }
            },

            Token::Eof => unreachable!("EOF is never routed to foreign content"),
        }
    }
}
