// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Token extraction over sanitized input.
//!
//! The upstream sanitizer guarantees that comments and null bytes are
//! gone, that every `<` which does not start a tag is entity-escaped, and
//! that attribute values are quoted and escaped. Tokenization therefore
//! reduces to splitting the input on `<` and matching one regular
//! expression per chunk; there are no tokenizer states.
//!
//! Chunks that fail the tag expression, and tags rejected by the
//! allow-list, degrade to literal text with `<`/`>` entity-escaped.
//! Tags in the unsupported set are dropped outright (strict mode treats
//! both cases as input-contract violations).

use log::debug;
use markup5ever::LocalName;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tendril::{SliceExt, StrTendril};

use crate::attrs;
use crate::error::{Error, Result};
use crate::tree_builder::data::UNSUPPORTED_ELEMENTS;

pub use self::TagKind::{EndTag, StartTag};
pub use self::Token::{CharacterTokens, EOFToken, TagToken};

/// A chunk between `<` delimiters, split into
/// `slash, name, attrs, brace, rest`.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(/?)([a-zA-Z][^\t\n\f />]*)([^>]*?)(/?>)(.*)$").expect("tag expression")
});

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum TagKind {
    StartTag,
    EndTag,
}

/// A tag token, with its attributes already canonicalized.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Tag {
    pub kind: TagKind,
    pub name: LocalName,
    /// Canonical attribute string (see [`crate::attrs`]). Always empty
    /// for end tags.
    pub attrs: StrTendril,
    pub self_closing: bool,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Token {
    TagToken(Tag),
    CharacterTokens(StrTendril),
    EOFToken,
}

/// Types which can receive tokens from the tokenizer.
pub trait TokenSink {
    fn process_token(&mut self, token: Token);

    /// The tokenizer will no longer produce tokens.
    fn end(&mut self);
}

#[derive(Default)]
pub struct TokenizerOpts {
    /// Assert the sanitizer's input contract instead of degrading.
    pub strict: bool,
    /// Lowercased HTML tag names allowed through; anything else becomes
    /// literal text. `None` admits every supported element.
    pub allowed: Option<HashSet<LocalName>>,
}

/// The balancer front end: splits sanitized input into tokens and feeds
/// them to a [`TokenSink`].
pub struct Tokenizer<'a, Sink> {
    pub sink: Sink,
    opts: TokenizerOpts,
    /// Host hook run on each raw attribute string before normalization
    /// (template/variable substitution and the like).
    process_attrs: Option<&'a mut dyn FnMut(&mut String)>,
}

impl<'a, Sink: TokenSink> Tokenizer<'a, Sink> {
    pub fn new(
        sink: Sink,
        opts: TokenizerOpts,
        process_attrs: Option<&'a mut dyn FnMut(&mut String)>,
    ) -> Tokenizer<'a, Sink> {
        Tokenizer {
            sink,
            opts,
            process_attrs,
        }
    }

    /// Tokenize a fragment of input.
    pub fn feed(&mut self, input: &str) -> Result<()> {
        let mut chunks = input.split('<');
        if let Some(leading) = chunks.next() {
            self.emit_text(leading);
        }
        for chunk in chunks {
            self.step(chunk)?;
        }
        Ok(())
    }

    /// Signal the end of input: emits EOF and finishes the sink.
    pub fn end(&mut self) {
        self.sink.process_token(EOFToken);
        self.sink.end();
    }

    pub fn into_sink(self) -> Sink {
        self.sink
    }

    // One chunk that followed a `<` delimiter.
    fn step(&mut self, chunk: &str) -> Result<()> {
        let Some(caps) = TAG_RE.captures(chunk) else {
            if self.opts.strict {
                return Err(Error::StrayMarkup(snippet(chunk)));
            }
            debug!("tokenizer: non-tag `<` degraded to text");
            self.emit_rejected(chunk);
            return Ok(());
        };

        let kind = if caps[1].is_empty() { StartTag } else { EndTag };
        let name = caps[2].to_ascii_lowercase();
        let rest = caps.get(5).map(|m| m.as_str()).unwrap_or("");

        // The host hook sees every start tag's raw attributes, before
        // any filter can drop the tag.
        let mut raw_attrs = String::new();
        if kind == StartTag {
            raw_attrs.push_str(&caps[3]);
            if let Some(hook) = self.process_attrs.as_mut() {
                hook(&mut raw_attrs);
            }
        }

        if UNSUPPORTED_ELEMENTS.contains(name.as_str()) {
            if self.opts.strict {
                return Err(Error::UnsupportedElement(name));
            }
            debug!("tokenizer: dropping unsupported tag <{name}>");
            self.emit_text(rest);
            return Ok(());
        }

        let name = LocalName::from(&*name);
        if let Some(allowed) = &self.opts.allowed {
            if !allowed.contains(&name) {
                debug!("tokenizer: tag <{name}> not in the allow-list");
                self.emit_rejected(chunk);
                return Ok(());
            }
        }

        let attrs = if kind == EndTag {
            // Attributes on end tags are a parse error; drop them.
            StrTendril::new()
        } else {
            if self.opts.strict && !attrs::is_canonical(&raw_attrs) {
                return Err(Error::NonCanonicalAttributes(raw_attrs));
            }
            attrs::normalize(&raw_attrs)
        };

        self.sink.process_token(TagToken(Tag {
            kind,
            name,
            attrs,
            self_closing: &caps[4] == "/>",
        }));
        self.emit_text(rest);
        Ok(())
    }

    // Plain text between tags. Every `>` here is unbalanced.
    fn emit_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut out = StrTendril::new();
        push_escaped(&mut out, text);
        self.sink.process_token(CharacterTokens(out));
    }

    // A chunk that is not (or may not be emitted as) a tag: the literal
    // `<...` becomes text.
    fn emit_rejected(&mut self, chunk: &str) {
        let mut out = "&lt;".to_tendril();
        push_escaped(&mut out, chunk);
        self.sink.process_token(CharacterTokens(out));
    }
}

fn push_escaped(out: &mut StrTendril, text: &str) {
    for c in text.chars() {
        match c {
            '>' => out.push_slice("&gt;"),
            c => out.push_char(c),
        }
    }
}

fn snippet(chunk: &str) -> String {
    let mut s: String = chunk.chars().take(32).collect();
    s.insert(0, '<');
    s
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct Sink {
        tokens: Vec<Token>,
        ended: bool,
    }

    impl TokenSink for Sink {
        fn process_token(&mut self, token: Token) {
            self.tokens.push(token);
        }
        fn end(&mut self) {
            self.ended = true;
        }
    }

    fn tokenize(input: &str) -> Vec<Token> {
        let mut tok = Tokenizer::new(Sink::default(), TokenizerOpts::default(), None);
        tok.feed(input).unwrap();
        tok.end();
        let sink = tok.into_sink();
        assert!(sink.ended);
        sink.tokens
    }

    fn text(s: &str) -> Token {
        CharacterTokens(s.to_tendril())
    }

    #[test]
    fn splits_tags_and_text() {
        assert_eq!(
            tokenize("a<b>c</b>d"),
            vec![
                text("a"),
                TagToken(Tag {
                    kind: StartTag,
                    name: LocalName::from("b"),
                    attrs: StrTendril::new(),
                    self_closing: false,
                }),
                text("c"),
                TagToken(Tag {
                    kind: EndTag,
                    name: LocalName::from("b"),
                    attrs: StrTendril::new(),
                    self_closing: false,
                }),
                text("d"),
                EOFToken,
            ]
        );
    }

    #[test]
    fn lowercases_names_and_normalizes_attrs() {
        let tokens = tokenize(r#"<DIV Title="T" class="c">"#);
        assert_eq!(
            tokens[0],
            TagToken(Tag {
                kind: StartTag,
                name: LocalName::from("div"),
                attrs: r#" class="c" title="T""#.to_tendril(),
                self_closing: false,
            })
        );
    }

    #[test]
    fn self_closing_flag() {
        let tokens = tokenize("<br/>");
        assert_eq!(
            tokens[0],
            TagToken(Tag {
                kind: StartTag,
                name: LocalName::from("br"),
                attrs: StrTendril::new(),
                self_closing: true,
            })
        );
    }

    #[test]
    fn non_tag_chunk_degrades_to_text() {
        assert_eq!(tokenize("a < b"), vec![text("a "), text("&lt; b"), EOFToken]);
    }

    #[test]
    fn unbalanced_gt_is_escaped() {
        assert_eq!(tokenize("a > b"), vec![text("a &gt; b"), EOFToken]);
    }

    #[test]
    fn unsupported_tags_are_dropped() {
        assert_eq!(
            tokenize("<script>x</script>y"),
            vec![text("x"), text("y"), EOFToken]
        );
    }

    #[test]
    fn allow_list_rejects_to_literal_text() {
        let mut allowed = HashSet::new();
        allowed.insert(LocalName::from("b"));
        let mut tok = Tokenizer::new(
            Sink::default(),
            TokenizerOpts {
                strict: false,
                allowed: Some(allowed),
            },
            None,
        );
        tok.feed("<b><i>x</i></b>").unwrap();
        tok.end();
        let tokens = tok.into_sink().tokens;
        assert_eq!(tokens[1], text("&lt;i&gt;x"));
        assert_eq!(tokens[2], text("&lt;/i&gt;"));
    }

    #[test]
    fn strict_mode_rejects_stray_lt() {
        let mut tok = Tokenizer::new(
            Sink::default(),
            TokenizerOpts {
                strict: true,
                allowed: None,
            },
            None,
        );
        assert!(matches!(tok.feed("a < b"), Err(Error::StrayMarkup(_))));
    }

    #[test]
    fn attr_hook_runs_even_for_rejected_tags() {
        let mut allowed = HashSet::new();
        allowed.insert(LocalName::from("b"));
        let mut seen = Vec::new();
        let mut hook = |attrs: &mut String| {
            seen.push(attrs.clone());
        };
        let mut tok = Tokenizer::new(
            Sink::default(),
            TokenizerOpts {
                strict: false,
                allowed: Some(allowed),
            },
            Some(&mut hook),
        );
        tok.feed(r#"<b><i x="1">y"#).unwrap();
        tok.end();
        let tokens = tok.into_sink().tokens;
        assert_eq!(tokens[1], text(r#"&lt;i x="1"&gt;y"#));
        assert_eq!(seen, vec!["".to_string(), r#" x="1""#.to_string()]);
    }

    #[test]
    fn attr_hook_runs_before_normalization() {
        let mut hook = |attrs: &mut String| {
            *attrs = attrs.replace("{{x}}", "1");
        };
        let mut tok = Tokenizer::new(
            Sink::default(),
            TokenizerOpts::default(),
            Some(&mut hook),
        );
        tok.feed(r#"<div data-n="{{x}}">"#).unwrap();
        tok.end();
        let tokens = tok.into_sink().tokens;
        assert_eq!(
            tokens[0],
            TagToken(Tag {
                kind: StartTag,
                name: LocalName::from("div"),
                attrs: r#" data-n="1""#.to_tendril(),
                self_closing: false,
            })
        );
    }
}
