// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The balancer: a convenient entry point to tokenizer plus tree builder.

use std::collections::HashSet;

use markup5ever::LocalName;

use crate::error::{Error, Result};
use crate::tokenizer::{Tokenizer, TokenizerOpts};
use crate::tree_builder::{data::UNSUPPORTED_ELEMENTS, TreeBuilder};

/// Balancer configuration.
#[derive(Clone, Default)]
pub struct BalancerOpts {
    /// Assert the sanitizer's input contract (no stray `<`, canonical
    /// attribute strings, no unsupported elements) instead of degrading
    /// gracefully. Default: false.
    pub strict: bool,

    /// Lowercased HTML tag names allowed through. Tags outside the set
    /// degrade to literal text. `None` admits every supported element.
    pub allowed_html_elements: Option<HashSet<LocalName>>,
}

/// A validated, reusable balancer. Each [`Balancer::balance`] call owns
/// its own arena and stacks, so one instance may serve many threads by
/// reference.
pub struct Balancer {
    opts: BalancerOpts,
}

impl Balancer {
    /// Validate the configuration. An allow-list naming an unsupported
    /// element is a configuration error, not a runtime surprise.
    pub fn new(opts: BalancerOpts) -> Result<Balancer> {
        if let Some(allowed) = &opts.allowed_html_elements {
            for name in allowed {
                if UNSUPPORTED_ELEMENTS.contains(&**name) {
                    return Err(Error::UnsupportedAllowedElement(name.to_string()));
                }
            }
        }
        Ok(Balancer { opts })
    }

    /// Balance one sanitized fragment. In non-strict mode this never
    /// fails; malformed markup degrades per the HTML5 parse-error rules.
    pub fn balance(&self, src: &str) -> Result<String> {
        self.run(src, None)
    }

    /// Like [`Balancer::balance`], with a host hook that may rewrite each
    /// raw attribute string before normalization (template substitution
    /// and the like).
    pub fn balance_with(
        &self,
        src: &str,
        process_attrs: &mut dyn FnMut(&mut String),
    ) -> Result<String> {
        self.run(src, Some(process_attrs))
    }

    fn run(&self, src: &str, process_attrs: Option<&mut dyn FnMut(&mut String)>) -> Result<String> {
        let opts = TokenizerOpts {
            strict: self.opts.strict,
            allowed: self.opts.allowed_html_elements.clone(),
        };
        let mut tokenizer = Tokenizer::new(TreeBuilder::new(), opts, process_attrs);
        tokenizer.feed(src)?;
        tokenizer.end();
        Ok(tokenizer.into_sink().finish().to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn allow_list_may_not_name_unsupported_elements() {
        let mut allowed = HashSet::new();
        allowed.insert(LocalName::from("b"));
        allowed.insert(LocalName::from("script"));
        let err = Balancer::new(BalancerOpts {
            strict: false,
            allowed_html_elements: Some(allowed),
        })
        .err();
        assert_eq!(
            err,
            Some(Error::UnsupportedAllowedElement("script".to_string()))
        );
    }
}
