// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Canonical attribute strings.
//!
//! Attributes travel through the balancer as a single canonical string:
//! empty, or one ` name="value"` pair per attribute with names lowercased
//! and sorted. Canonical strings compare equal exactly when the attribute
//! sets are equal, which is what the Noah's Ark clause needs, and they
//! serialize by plain concatenation.
//!
//! Foreign (MathML/SVG) elements additionally get the spec's
//! case-restoring adjustments so that output like `definitionURL` or
//! `viewBox` matches what a conforming parser/serializer pair would
//! produce.

use markup5ever::Namespace;
use once_cell::sync::Lazy;
use regex::Regex;
use tendril::StrTendril;

/// One attribute in a raw (pre-normalization) attribute string: a name,
/// optionally followed by a double-quoted, single-quoted or bare value.
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s=/>'"]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]*)))?"#)
        .expect("attribute expression")
});

/// The canonical form the sanitizer hands us in strict mode. Values are
/// double-quoted and entity-escaped: a `&` is only legal as the start of
/// a character reference.
static CANONICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^( [^\s=/>'"]+="(?:[^"&]|&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);)*")* *$"#,
    )
    .expect("canonical expression")
});

/// A character reference as the sanitizer leaves them: named, decimal or
/// hexadecimal.
static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);")
        .expect("reference expression")
});

pub fn is_canonical(raw: &str) -> bool {
    CANONICAL_RE.is_match(raw)
}

/// Parse a raw attribute string into `(name, value)` pairs. Names are
/// lowercased; the first of duplicate names wins.
pub fn parse(raw: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for caps in ATTR_RE.captures_iter(raw) {
        let name = caps[1].to_ascii_lowercase();
        if pairs.iter().any(|(n, _)| *n == name) {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        pairs.push((name, value.to_string()));
    }
    pairs
}

/// Canonicalize a raw attribute string: lowercase names, sort by name,
/// keep the first of duplicates, re-quote with double quotes.
pub fn normalize(raw: &str) -> StrTendril {
    let mut pairs = parse(raw);
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let mut out = StrTendril::new();
    for (name, value) in &pairs {
        out.push_char(' ');
        out.push_slice(name);
        out.push_slice("=\"");
        push_escaped_value(&mut out, value);
        out.push_char('"');
    }
    out
}

// Escape for a double-quoted value: `&` before `"`. A `&` that already
// starts a character reference stays as is, so canonical strings are a
// fixed point.
fn push_escaped_value(out: &mut StrTendril, value: &str) {
    for (i, c) in value.char_indices() {
        match c {
            '&' if !REFERENCE_RE.is_match(&value[i..]) => out.push_slice("&amp;"),
            '"' => out.push_slice("&quot;"),
            c => out.push_char(c),
        }
    }
}

/// Look up an attribute's value in a canonical string.
pub fn value(attrs: &str, name: &str) -> Option<String> {
    for caps in ATTR_RE.captures_iter(attrs) {
        if caps[1].eq_ignore_ascii_case(name) {
            return Some(
                caps.get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str())
                    .unwrap_or("")
                    .to_string(),
            );
        }
    }
    None
}

pub fn has(attrs: &str, name: &str) -> bool {
    value(attrs, name).is_some()
}

/// Restore the case of attribute names that are case-sensitive inside the
/// given foreign namespace. `xlink:`/`xml:`-prefixed names keep their
/// textual form and need no rewrite.
pub fn adjust_foreign(attrs: &StrTendril, ns: &Namespace) -> StrTendril {
    let mut out = StrTendril::new();
    for caps in ATTR_RE.captures_iter(attrs) {
        let name = &caps[1];
        let adjusted = match *ns {
            ns!(svg) => svg_attr_case(name),
            ns!(mathml) => mathml_attr_case(name),
            _ => None,
        };
        out.push_char(' ');
        out.push_slice(adjusted.unwrap_or(name));
        out.push_slice("=\"");
        out.push_slice(caps.get(2).map(|m| m.as_str()).unwrap_or(""));
        out.push_char('"');
    }
    out
}

fn mathml_attr_case(name: &str) -> Option<&'static str> {
    match name {
        "definitionurl" => Some("definitionURL"),
        _ => None,
    }
}

fn svg_attr_case(name: &str) -> Option<&'static str> {
    Some(match name {
        "attributename" => "attributeName",
        "attributetype" => "attributeType",
        "basefrequency" => "baseFrequency",
        "baseprofile" => "baseProfile",
        "calcmode" => "calcMode",
        "clippathunits" => "clipPathUnits",
        "diffuseconstant" => "diffuseConstant",
        "edgemode" => "edgeMode",
        "filterunits" => "filterUnits",
        "glyphref" => "glyphRef",
        "gradienttransform" => "gradientTransform",
        "gradientunits" => "gradientUnits",
        "kernelmatrix" => "kernelMatrix",
        "kernelunitlength" => "kernelUnitLength",
        "keypoints" => "keyPoints",
        "keysplines" => "keySplines",
        "keytimes" => "keyTimes",
        "lengthadjust" => "lengthAdjust",
        "limitingconeangle" => "limitingConeAngle",
        "markerheight" => "markerHeight",
        "markerunits" => "markerUnits",
        "markerwidth" => "markerWidth",
        "maskcontentunits" => "maskContentUnits",
        "maskunits" => "maskUnits",
        "numoctaves" => "numOctaves",
        "pathlength" => "pathLength",
        "patterncontentunits" => "patternContentUnits",
        "patterntransform" => "patternTransform",
        "patternunits" => "patternUnits",
        "pointsatx" => "pointsAtX",
        "pointsaty" => "pointsAtY",
        "pointsatz" => "pointsAtZ",
        "preservealpha" => "preserveAlpha",
        "preserveaspectratio" => "preserveAspectRatio",
        "primitiveunits" => "primitiveUnits",
        "refx" => "refX",
        "refy" => "refY",
        "repeatcount" => "repeatCount",
        "repeatdur" => "repeatDur",
        "requiredextensions" => "requiredExtensions",
        "requiredfeatures" => "requiredFeatures",
        "specularconstant" => "specularConstant",
        "specularexponent" => "specularExponent",
        "spreadmethod" => "spreadMethod",
        "startoffset" => "startOffset",
        "stddeviation" => "stdDeviation",
        "stitchtiles" => "stitchTiles",
        "surfacescale" => "surfaceScale",
        "systemlanguage" => "systemLanguage",
        "tablevalues" => "tableValues",
        "targetx" => "targetX",
        "targety" => "targetY",
        "textlength" => "textLength",
        "viewbox" => "viewBox",
        "viewtarget" => "viewTarget",
        "xchannelselector" => "xChannelSelector",
        "ychannelselector" => "yChannelSelector",
        "zoomandpan" => "zoomAndPan",
        _ => return None,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_sorts_and_requotes() {
        assert_eq!(&*normalize(r#" b='2' a=1 c"#), r#" a="1" b="2" c="""#);
    }

    #[test]
    fn normalize_lowercases_and_keeps_first_duplicate() {
        assert_eq!(&*normalize(r#" HREF="x" href="y""#), r#" href="x""#);
    }

    #[test]
    fn normalize_escapes_quotes_from_single_quoted_values() {
        assert_eq!(&*normalize(r#" alt='a "b"'"#), r#" alt="a &quot;b&quot;""#);
    }

    #[test]
    fn normalize_escapes_bare_ampersands_only() {
        assert_eq!(&*normalize(r#" href="a&b""#), r#" href="a&amp;b""#);
        assert_eq!(&*normalize(r#" href="a&amp;b""#), r#" href="a&amp;b""#);
        assert_eq!(
            &*normalize(r#" title="&#38;&#x2a;&lt;""#),
            r#" title="&#38;&#x2a;&lt;""#
        );
        assert_eq!(&*normalize(r#" alt="a&& b""#), r#" alt="a&amp;&amp; b""#);
    }

    #[test]
    fn canonical_form() {
        assert!(is_canonical(r#" a="1" b="2""#));
        assert!(is_canonical(""));
        assert!(is_canonical(" "));
        assert!(!is_canonical(r#"a="1""#));
        assert!(!is_canonical(r#" a='1'"#));
        assert!(!is_canonical(r#" a=1"#));
    }

    #[test]
    fn canonical_form_requires_escaped_ampersands() {
        assert!(is_canonical(r#" a="x&amp;y""#));
        assert!(is_canonical(r#" a="&#38; &#xA0;""#));
        assert!(!is_canonical(r#" a="x&y""#));
        assert!(!is_canonical(r#" a="x & y""#));
    }

    #[test]
    fn value_lookup() {
        assert_eq!(value(r#" a="1" b="2""#, "b").as_deref(), Some("2"));
        assert_eq!(value(r#" a="1""#, "c"), None);
    }

    #[test]
    fn foreign_case_restoration() {
        let attrs = normalize(r##" viewBox="0 0 1 1" xlink:href="#a""##);
        assert_eq!(&*attrs, r##" viewbox="0 0 1 1" xlink:href="#a""##);
        let adjusted = adjust_foreign(&attrs, &ns!(svg));
        assert_eq!(&*adjusted, r##" viewBox="0 0 1 1" xlink:href="#a""##);
    }

    #[test]
    fn mathml_definitionurl() {
        let adjusted = adjust_foreign(&normalize(r#" definitionURL="u""#), &ns!(mathml));
        assert_eq!(&*adjusted, r#" definitionURL="u""#);
    }
}
