// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashSet;

use html5tidy::{Balancer, BalancerOpts, Error, LocalName};

fn balance(src: &str) -> String {
    Balancer::new(BalancerOpts::default())
        .unwrap()
        .balance(src)
        .unwrap()
}

// A second pass over the output must be a fixed point.
fn assert_balanced(src: &str, expected: &str) {
    let out = balance(src);
    assert_eq!(out, expected, "balancing {src:?}");
    assert_eq!(balance(&out), out, "idempotence of {src:?}");
}

#[test]
fn adoption_agency_untangles_misnested_formatting() {
    assert_balanced("<b>1<i>2</b>3</i>", "<b>1<i>2</i></b><i>3</i>");
}

#[test]
fn block_element_closes_paragraph() {
    assert_balanced("<p><div>x</div></p>", "<p></p><div>x</div><p></p>");
}

#[test]
fn table_foster_parents_stray_content() {
    assert_balanced(
        "<table><b>x</b><tr><td>y</td></tr></table>",
        "<b>x</b><table><tbody><tr><td>y</td></tr></tbody></table>",
    );
}

#[test]
fn adoption_agency_for_nested_anchors() {
    assert_balanced("<a>1<a>2</a>3</a>", "<a>1</a><a>2</a>3");
}

#[test]
fn implied_list_item_end_tags() {
    assert_balanced("<ul><li>a<li>b</ul>", "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn mathml_is_preserved_and_breakout_works() {
    assert_balanced("<math><mi>x</mi></math>", "<math><mi>x</mi></math>");
    assert_balanced("<math><p>x</p></math>", "<math></math><p>x</p>");
}

#[test]
fn open_tags_are_closed_at_eof() {
    assert_balanced("<div><b>x", "<div><b>x</b></div>");
}

#[test]
fn stray_end_tags_are_dropped() {
    assert_balanced("a</div>b</span>c", "abc");
}

#[test]
fn paragraph_closes_paragraph() {
    assert_balanced("<p>a<p>b", "<p>a</p><p>b</p>");
}

#[test]
fn definition_list_items_imply_ends() {
    assert_balanced(
        "<dl><dt>t<dd>d</dl>",
        "<dl><dt>t</dt><dd>d</dd></dl>",
    );
}

#[test]
fn heading_end_tag_matches_any_open_heading() {
    assert_balanced("<h2>x</h3>y", "<h2>x</h2>y");
}

#[test]
fn nested_nobr_runs_the_adoption_agency() {
    assert_balanced("<nobr>a<nobr>b", "<nobr>a</nobr><nobr>b</nobr>");
}

#[test]
fn formatting_is_reconstructed_across_blocks() {
    assert_balanced("<p><b></p><p>x</p>", "<p><b></b></p><p><b>x</b></p>");
}

#[test]
fn void_elements_swallow_self_closing_syntax() {
    assert_balanced("<br/><hr>", "<br><hr>");
}

#[test]
fn attributes_are_canonicalized() {
    assert_balanced(
        r#"<div TITLE="t" class="c">x</div>"#,
        r#"<div class="c" title="t">x</div>"#,
    );
}

#[test]
fn bare_ampersands_in_attribute_values_are_escaped() {
    assert_balanced(
        r#"<a href="?x=1&y=2">z</a>"#,
        r#"<a href="?x=1&amp;y=2">z</a>"#,
    );
}

#[test]
fn nonspace_table_text_is_fostered_out() {
    assert_balanced(
        "<table>x<tr></tr></table>",
        "x<table><tbody><tr></tr></tbody></table>",
    );
}

#[test]
fn whitespace_table_text_stays_in_place() {
    assert_balanced(
        "<table> <tr></tr></table>",
        "<table> <tbody><tr></tr></tbody></table>",
    );
}

#[test]
fn colgroup_splits_leading_whitespace() {
    assert_balanced(
        "<table><colgroup> x</colgroup></table>",
        "x<table><colgroup> </colgroup></table>",
    );
}

#[test]
fn caption_closes_before_cells() {
    assert_balanced(
        "<table><caption>a<td>x</td></caption></table>",
        "<table><caption>a</caption><tbody><tr><td>x</td></tr></tbody></table>",
    );
}

#[test]
fn nested_tables_close_the_outer_scope() {
    assert_balanced(
        "<table><tr><td><table></table></td></tr></table>",
        "<table><tbody><tr><td><table></table></td></tr></tbody></table>",
    );
}

#[test]
fn template_contents_are_scoped() {
    assert_balanced(
        "<template><td>x</td></template>",
        "<template><td>x</td></template>",
    );
}

#[test]
fn unclosed_template_recovers_at_eof() {
    assert_balanced("<template><div>a", "<template><div>a</div></template>");
}

#[test]
fn style_content_passes_through() {
    assert_balanced("<style>.a { color: red }</style>", "<style>.a { color: red }</style>");
}

#[test]
fn svg_names_get_their_case_back() {
    assert_balanced(
        r#"<svg viewBox="0 0 1 1"><foreignObject><div>x</div></foreignObject></svg>"#,
        r#"<svg viewBox="0 0 1 1"><foreignObject><div>x</div></foreignObject></svg>"#,
    );
}

#[test]
fn annotation_xml_encoding_gates_html_content() {
    assert_balanced(
        r#"<math><annotation-xml encoding="text/html"><p>x</p></annotation-xml></math>"#,
        r#"<math><annotation-xml encoding="text/html"><p>x</p></annotation-xml></math>"#,
    );
    assert_balanced(
        "<math><annotation-xml><p>x</p></annotation-xml></math>",
        "<math><annotation-xml></annotation-xml></math><p>x</p>",
    );
}

#[test]
fn font_breaks_out_of_svg_only_with_html_attributes() {
    assert_balanced(
        r#"<svg><font color="red">x"#,
        r#"<svg></svg><font color="red">x</font>"#,
    );
    assert_balanced("<svg><font>x", "<svg><font>x</font></svg>");
}

#[test]
fn mathml_definitionurl_round_trips() {
    assert_balanced(
        r#"<math definitionURL="u"><mi>x</mi></math>"#,
        r#"<math definitionURL="u"><mi>x</mi></math>"#,
    );
}

#[test]
fn self_closing_foreign_elements_pop_immediately() {
    assert_balanced(
        r#"<svg><circle r="1"/><circle r="2"/></svg>"#,
        r#"<svg><circle r="1"></circle><circle r="2"></circle></svg>"#,
    );
}

#[test]
fn end_br_becomes_a_br() {
    assert_balanced("a</br>b", "a<br>b");
}

#[test]
fn image_is_renamed_to_img() {
    assert_balanced(r#"<image src="x">"#, r#"<img src="x">"#);
}

#[test]
fn unsupported_elements_never_reach_the_output() {
    assert_balanced("<script>alert(1)</script>", "alert(1)");
    assert_balanced("<textarea>a</textarea>", "a");
    assert_balanced("<body>x</body>", "x");
}

#[test]
fn escaped_markup_stays_escaped() {
    assert_balanced("&lt;script&gt;", "&lt;script&gt;");
}

#[test]
fn stray_angle_brackets_degrade_to_text() {
    assert_balanced("1 < 2 > 3", "1 &lt; 2 &gt; 3");
}

#[test]
fn allow_list_degrades_other_tags_to_text() {
    let mut allowed = HashSet::new();
    allowed.insert(LocalName::from("b"));
    let balancer = Balancer::new(BalancerOpts {
        strict: false,
        allowed_html_elements: Some(allowed),
    })
    .unwrap();
    assert_eq!(
        balancer.balance("<b><i>x</i></b>").unwrap(),
        "<b>&lt;i&gt;x&lt;/i&gt;</b>"
    );
}

#[test]
fn allow_list_rejects_unsupported_names() {
    let mut allowed = HashSet::new();
    allowed.insert(LocalName::from("iframe"));
    assert!(matches!(
        Balancer::new(BalancerOpts {
            strict: false,
            allowed_html_elements: Some(allowed),
        }),
        Err(Error::UnsupportedAllowedElement(_))
    ));
}

#[test]
fn strict_mode_asserts_the_input_contract() {
    let strict = Balancer::new(BalancerOpts {
        strict: true,
        allowed_html_elements: None,
    })
    .unwrap();
    assert!(matches!(
        strict.balance("a < b"),
        Err(Error::StrayMarkup(_))
    ));
    assert!(matches!(
        strict.balance("<script>x</script>"),
        Err(Error::UnsupportedElement(_))
    ));
    assert!(matches!(
        strict.balance("<div class=c>"),
        Err(Error::NonCanonicalAttributes(_))
    ));
    assert!(matches!(
        strict.balance(r#"<a href="a&b">"#),
        Err(Error::NonCanonicalAttributes(_))
    ));
    assert_eq!(
        strict.balance(r#"<a href="a&amp;b">x</a>"#).unwrap(),
        r#"<a href="a&amp;b">x</a>"#
    );
    assert_eq!(
        strict.balance(r#"<div class="c">x</div>"#).unwrap(),
        r#"<div class="c">x</div>"#
    );
}

#[test]
fn attribute_hook_rewrites_before_normalization() {
    let balancer = Balancer::new(BalancerOpts::default()).unwrap();
    let mut hook = |attrs: &mut String| {
        *attrs = attrs.replace("{{name}}", "world");
    };
    assert_eq!(
        balancer
            .balance_with(r#"<div title="{{name}}">hi</div>"#, &mut hook)
            .unwrap(),
        r#"<div title="world">hi</div>"#
    );
}

#[test]
fn balancing_is_idempotent_over_messy_input() {
    let cases = [
        "<b><i>deep</b></i>",
        "<table><td>implied",
        "<ul><li><ul><li>x",
        "<p><table>x</table>",
        "<applet><b></applet></b>",
        "<td>loose</td>",
        "x</p>y</p>",
        "<svg><desc><b>bold</b></desc></svg>",
    ];
    for case in cases {
        let once = balance(case);
        assert_eq!(balance(&once), once, "idempotence of {case:?}");
    }
}
