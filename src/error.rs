// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! User-facing errors: configuration mistakes and strict-mode violations
//! of the input contract.
//!
//! Malformed *content* (mis-nested tags, unmatched end tags, elements in
//! illegal contexts) is never an error; the insertion modes absorb it.

use thiserror::Error;

/// Result type alias for balancer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The configured allow-list names an element the balancer refuses to
    /// emit (`<script>`, `<form>`, document structure tags, ...).
    #[error("allowed element `{0}` is in the unsupported set")]
    UnsupportedAllowedElement(String),

    /// Strict mode: a `<` that does not begin a tag reached the balancer.
    /// The upstream sanitizer is supposed to entity-escape these.
    #[error("strict mode: stray `<` in input near `{0}`")]
    StrayMarkup(String),

    /// Strict mode: the input contained a tag the balancer does not
    /// support. Non-strict mode drops the tag silently.
    #[error("strict mode: unsupported element `<{0}>` in input")]
    UnsupportedElement(String),

    /// Strict mode: an attribute string was not in the canonical
    /// `(" " name "=" '"' value '"')*` form produced by the sanitizer.
    #[error("strict mode: attribute string `{0}` is not canonical")]
    NonCanonicalAttributes(String),
}
