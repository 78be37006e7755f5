//! Assert that HTML looks like an expected pattern.
//!
//! This crate compares an actual HTML string against an expected pattern
//! that may contain `{{ ... }}` wildcard placeholders. A placeholder stands
//! in for any sequence of sibling nodes (including none at all), so tests
//! can pin down the markup they care about and ignore the rest. Extra
//! attributes on the actual side are tolerated too: the expected pattern is
//! the schema, and only missing or changed attributes count as mismatches.
//!
//! # Example
//! ```ignore
//! use html_looks_like::html_looks_like;
//!
//! let actual = r#"
//!     <div>
//!         <h1 class="title">Hello</h1>
//!         <p>Some body text</p>
//!         <footer>fine print</footer>
//!     </div>
//! "#;
//! let expected = r#"
//!     <div>
//!         <h1 class="title">Hello</h1>
//!         {{ ... anything else ... }}
//!     </div>
//! "#;
//!
//! assert!(html_looks_like(actual, expected).is_ok());
//! ```
//!
//! For testing, the assertion macro panics with a report of every mismatch:
//! ```ignore
//! # use html_looks_like::assert_html_looks_like;
//! assert_html_looks_like!(
//!     "<ul><li>one</li><li>two</li></ul>",
//!     "<ul><li>one</li>{{ ... more items ... }}</ul>"
//! );
//! ```

/// Asserts that the actual HTML looks like the expected pattern.
///
/// Wildcard placeholders `{{ ... }}` in the pattern absorb any sequence of
/// sibling nodes. On mismatch this panics with every rendered difference.
///
/// # Examples
/// ```ignore
/// use html_looks_like::assert_html_looks_like;
///
/// assert_html_looks_like!(
///     "<div><span>First</span><span>Second</span></div>",
///     "<div><span>First</span>{{ ... the rest ... }}</div>"
/// );
/// ```
#[macro_export]
macro_rules! assert_html_looks_like {
    ($actual:expr, $expected:expr $(,)?) => {{
        match (&$actual, &$expected) {
            (actual_val, expected_val) => {
                if let Err(err) = $crate::html_looks_like(actual_val, expected_val) {
                    panic!(
                        "\n\
                        HTML comparison failed:\n\
                        {}\n",
                        err
                    );
                }
            }
        }
    }};
}

mod diff;
mod dom;
mod normalize;
mod report;

use diff::Edit;
use dom::DomNode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HtmlLooksLikeError {
    /// The actual markup does not look like the expected pattern. The
    /// message aggregates every rendered mismatch, separated by blank
    /// lines; partial success is not a concept here.
    #[error("{0}")]
    Mismatch(String),
}

/// Compare actual HTML against an expected pattern with wildcards.
///
/// Returns `Ok(())` when the actual markup looks like the pattern, and
/// `Err(HtmlLooksLikeError::Mismatch)` carrying the full rendered report
/// otherwise. Comparison is pure and deterministic: the same inputs always
/// produce the same result, message order included.
pub fn html_looks_like(actual: &str, expected: &str) -> Result<(), HtmlLooksLikeError> {
    let (mismatches, actual_tree, expected_tree) = compare(actual, expected);
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(HtmlLooksLikeError::Mismatch(report::render_mismatches(
            &mismatches,
            &actual_tree,
            &expected_tree,
        )))
    }
}

/// Predicate form of [`html_looks_like`]: the same comparison, reported as
/// a plain boolean for callers that want to branch rather than assert.
pub fn html_matches(actual: &str, expected: &str) -> bool {
    compare(actual, expected).0.is_empty()
}

fn compare(actual: &str, expected: &str) -> (Vec<Edit>, DomNode, DomNode) {
    let actual_tree = dom::build_tree(actual);
    let expected_tree = dom::build_tree(&dom::rewrite_wildcards(expected));
    let mismatches = normalize::normalize(diff::diff(&expected_tree, &actual_tree));
    (mismatches, actual_tree, expected_tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_html_matches() {
        assert!(html_matches("<div><p>Hello</p></div>", "<div><p>Hello</p></div>"));
    }

    #[test]
    fn whitespace_differences_are_ignored() {
        assert!(html_matches(
            "<div><p>Hello</p></div>",
            "<div>\n  <p>\n    Hello\n  </p>\n</div>"
        ));
    }

    #[test]
    fn attribute_order_is_ignored() {
        assert!(html_matches(
            "<div class='test' id='1'>Test</div>",
            "<div id='1' class='test'>Test</div>"
        ));
    }

    #[test]
    fn different_text_does_not_match() {
        assert!(!html_matches("<p>Hello</p>", "<p>Goodbye</p>"));
    }

    #[test]
    fn matches_no_element_at_end() {
        let actual = "
            <div>
                <span>First thing</span>
            </div>
        ";
        let expected = "
            <div>
                <span>First thing</span>
                {{ ... other things ... }}
            </div>
        ";
        assert!(html_matches(actual, expected));
    }

    #[test]
    fn matches_no_element_at_beginning() {
        let actual = "
            <div>
                <span>Last thing</span>
            </div>
        ";
        let expected = "
            <div>
                {{ ... other things ... }}
                <span>Last thing</span>
            </div>
        ";
        assert!(html_matches(actual, expected));
    }

    #[test]
    fn matches_arbitrary_elements_at_end() {
        let actual = "
            <div>
                <span>First thing</span>
                <span>Last thing</span>
            </div>
        ";
        let expected = "
            <div>
                <span>First thing</span>
                {{ ... some things ... }}
            </div>
        ";
        assert!(html_looks_like(actual, expected).is_ok());
        assert!(html_matches(actual, expected));
    }

    #[test]
    fn matches_arbitrary_elements_at_beginning() {
        let actual = "
            <div>
                <span>First thing</span>
                <span>Last thing</span>
            </div>
        ";
        let expected = "
            <div>
                {{ ... some things ... }}
                <span>Last thing</span>
            </div>
        ";
        assert!(html_looks_like(actual, expected).is_ok());
        assert!(html_matches(actual, expected));
    }

    #[test]
    fn matches_arbitrary_elements() {
        let actual = "
            <div>
                <span>First thing</span>
                <span>Middle thing</span>
                <span>Last thing</span>
            </div>
        ";
        let expected = "
            <div>
                {{ ... literally anything ... }}
            </div>
        ";
        assert!(html_looks_like(actual, expected).is_ok());
    }

    #[test]
    fn detects_missing_attribute_through_wildcards() {
        let actual = r#"
            <div class="fe10c23a">
                <h1 class="aab058a7">This is a title</h1>
                <p>This is some text content</p>
            </div>
        "#;
        let expected = r#"
            <div>
                {{ ... }}
                <p class="highlighted">This is some text content</p>
                {{ ... }}
            </div>
        "#;
        let err = html_looks_like(actual, expected).unwrap_err();
        assert_eq!(
            err.to_string(),
            "HTML is missing the attribute `class=\"highlighted\"` on the element\n\
             ```html\n\
             <p>This is some text content</p>\n\
             ```"
        );
    }

    #[test]
    fn extra_attributes_are_tolerated() {
        assert!(html_matches(
            "<div class='x' id='main' data-extra='1'><p>Body</p></div>",
            "<div class='x'><p>Body</p></div>"
        ));
    }

    #[test]
    fn missing_attributes_are_not_tolerated() {
        assert!(!html_matches(
            "<div><p>Body</p></div>",
            "<div class='x'><p>Body</p></div>"
        ));
    }

    #[test]
    fn wildcard_absorbs_mixed_text_and_elements() {
        let actual = "<div><span>First</span>loose text<b>bold</b></div>";
        let expected = "<div><span>First</span>{{ ... }}</div>";
        assert!(html_matches(actual, expected));
    }

    #[test]
    fn wildcard_replaced_by_a_single_element_still_matches() {
        // The differ reports this as one combined replacement of the
        // sentinel; splitting must make it absorbable all the same.
        let actual = "<div><section>anything</section></div>";
        let expected = "<div>{{ ... }}</div>";
        assert!(html_matches(actual, expected));
    }

    #[test]
    fn wildcards_in_separate_subtrees_absorb_independently() {
        let actual = "
            <div>
                <ul><li>1</li><li>2</li><li>3</li></ul>
                <p>intro <em>emphasis</em></p>
            </div>
        ";
        let expected = "
            <div>
                <ul>{{ ... items ... }}</ul>
                <p>intro {{ ... }}</p>
            </div>
        ";
        assert!(html_matches(actual, expected));
    }

    #[test]
    fn a_wildcard_does_not_absorb_a_missing_sibling_after_it() {
        let actual = "<div><a>1</a><p>x</p></div>";
        let expected = "<div>{{ ... }}<p>x</p><span>required</span></div>";
        let err = html_looks_like(actual, expected).unwrap_err();
        assert_eq!(
            err.to_string(),
            "HTML is missing the expected element\n```html\n<span>required</span>\n```"
        );
    }

    #[test]
    fn mismatches_are_aggregated_into_one_report() {
        let actual = "<div><p>a</p></div>";
        let expected = "<div><p>b</p><span>s</span></div>";
        let err = html_looks_like(actual, expected).unwrap_err();
        assert_eq!(
            err.to_string(),
            "HTML text mismatch. Expected\nb\nbut got\na\n\n\
             HTML is missing the expected element\n```html\n<span>s</span>\n```"
        );
    }

    #[test]
    fn comparison_is_deterministic() {
        let actual = "<div class='x'><h1>T</h1><p>Body</p></div>";
        let expected = "<div>{{ ... }}<p class='highlighted'>Body</p>{{ ... }}</div>";
        let first = html_looks_like(actual, expected).unwrap_err().to_string();
        let second = html_looks_like(actual, expected).unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_html_matches_empty_pattern() {
        assert!(html_matches("", ""));
        assert!(html_matches("   \n\t  ", ""));
    }

    #[test]
    fn a_wildcard_alone_matches_anything() {
        assert!(html_matches("<main><article>long</article></main>", "{{ ... }}"));
        assert!(html_matches("", "{{ ... }}"));
    }

    #[test]
    fn unclosed_tags_are_recovered_by_the_parser() {
        assert!(html_matches("<p>Text", "<p>Text</p>"));
    }

    #[test]
    fn stray_closing_tags_surface_as_extra_elements() {
        assert!(!html_matches("<p>Text</p></p>", "<p>Text</p>"));
    }

    #[test]
    fn unicode_content_compares_cleanly() {
        assert!(html_matches("<p>Hello 世界 🌍</p>", "<p>Hello 世界 🌍</p>"));
        assert!(html_matches(
            "<div><p>Hello 世界</p><p>more</p></div>",
            "<div><p>Hello 世界</p>{{ ... }}</div>"
        ));
    }

    #[test]
    fn assert_macro_is_silent_on_match() {
        assert_html_looks_like!(
            "<div><span>First</span><span>Second</span></div>",
            "<div><span>First</span>{{ ... }}</div>"
        );
    }

    #[test]
    #[should_panic(expected = "HTML is missing the expected element")]
    fn assert_macro_panics_with_the_report() {
        assert_html_looks_like!("<div></div>", "<div><p>required</p></div>");
    }
}
