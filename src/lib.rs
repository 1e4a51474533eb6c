// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A streaming HTML5 fragment balancer.
//!
//! `html5tidy` takes markup that has already been through an upstream
//! sanitizer (no comments, no null bytes, stray `<` entity-escaped) and
//! emits well-formed HTML that survives a round trip through any
//! conforming HTML5 parser and serializer: open tags are closed,
//! mis-nested formatting is untangled by the adoption agency algorithm,
//! content that is illegal in its context is restructured, and MathML/SVG
//! subtrees are recognized and scoped.
//!
//! The engine runs the HTML5 tree-construction insertion modes over a
//! stack of open elements and a list of active formatting elements, but
//! never materializes a DOM for the finished document: whenever an element
//! is popped from the stack its subtree is serialized to a string which
//! replaces it in its parent ("flatten on pop"), so peak memory tracks the
//! deepest unclosed nesting rather than the document size.

#![allow(unused_parens)]

#[macro_use]
extern crate markup5ever;

pub use markup5ever::{ExpandedName, LocalName, Namespace};

pub use crate::driver::{Balancer, BalancerOpts};
pub use crate::error::Error;

mod util {
    pub mod str;
}

pub mod attrs;
pub mod dom;
pub mod driver;
pub mod error;
pub mod tokenizer;
pub mod tree_builder;

/// Re-export the tendril crate.
pub use tendril;
