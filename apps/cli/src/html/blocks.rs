//! Balanced-block location in rendered HTML.

use std::ops::Range;

/// Finds the byte range of the first `tag` element whose `id` equals `id`,
/// from the start of its opening tag through the end of its matching close.
pub fn element_with_id(html: &str, tag: &str, id: &str) -> Option<Range<usize>> {
    find_element(html, tag, |tag_text| {
        attr_value(tag_text, "id").map(|value| value == id).unwrap_or(false)
    })
}

/// Finds the byte range of the first `tag` element whose `class` list
/// contains `class` as a whole token.
pub fn element_with_class(html: &str, tag: &str, class: &str) -> Option<Range<usize>> {
    find_element(html, tag, |tag_text| {
        attr_value(tag_text, "class")
            .map(|value| value.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    })
}

/// Finds the `<li>` block wrapping the navigation link for `#fragment`.
pub fn nav_entry(html: &str, fragment: &str) -> Option<Range<usize>> {
    let needle = format!("href=\"#{fragment}\"");
    let href = html.find(&needle)?;
    let mut scan = href;
    while let Some(open) = html[..scan].rfind("<li") {
        // Skip lookalikes such as `<link`.
        if is_open(&html[open..], "li") {
            let end = block_end(html, "li", open)?;
            return (end > href).then_some(open..end);
        }
        scan = open;
    }
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Scanner internals
// ────────────────────────────────────────────────────────────────────────────

fn find_element(
    html: &str,
    tag: &str,
    matches: impl Fn(&str) -> bool,
) -> Option<Range<usize>> {
    let mut from = 0;
    while let Some(rel) = html[from..].find('<') {
        let start = from + rel;
        let rest = &html[start..];
        if is_open(rest, tag) {
            let tag_len = rest.find('>')? + 1;
            if matches(&rest[..tag_len]) {
                let end = block_end(html, tag, start)?;
                return Some(start..end);
            }
        }
        from = start + 1;
    }
    None
}

/// Byte offset one past the closing tag of the `tag` element opening at
/// `open`. A self-closed opening tag is its own block.
fn block_end(html: &str, tag: &str, open: usize) -> Option<usize> {
    let open_tag_end = open + html[open..].find('>')? + 1;
    if html[..open_tag_end].ends_with("/>") {
        return Some(open_tag_end);
    }

    let mut depth = 1usize;
    let mut at = open_tag_end;
    while let Some(rel) = html[at..].find('<') {
        let pos = at + rel;
        let rest = &html[pos..];
        if is_close(rest, tag) {
            depth -= 1;
            let close_end = pos + rest.find('>')? + 1;
            if depth == 0 {
                return Some(close_end);
            }
            at = close_end;
        } else if is_open(rest, tag) {
            let tag_end = pos + rest.find('>')? + 1;
            if !html[pos..tag_end].ends_with("/>") {
                depth += 1;
            }
            at = tag_end;
        } else {
            at = pos + 1;
        }
    }
    None
}

/// True when `rest` (positioned on a `<`) opens a `tag` element — the tag
/// name must end at a delimiter so `<div` does not match `<division`.
fn is_open(rest: &str, tag: &str) -> bool {
    let Some(body) = rest.strip_prefix('<') else {
        return false;
    };
    body.len() > tag.len()
        && body.starts_with(tag)
        && matches!(
            body.as_bytes()[tag.len()],
            b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'
        )
}

fn is_close(rest: &str, tag: &str) -> bool {
    let Some(body) = rest.strip_prefix("</") else {
        return false;
    };
    body.len() > tag.len()
        && body.starts_with(tag)
        && body[tag.len()..].trim_start().starts_with('>')
}

/// Extracts a double-quoted attribute value from an opening tag's text.
fn attr_value<'a>(tag_text: &'a str, name: &str) -> Option<&'a str> {
    let pattern = format!("{name}=\"");
    let mut from = 0;
    while let Some(rel) = tag_text[from..].find(&pattern) {
        let at = from + rel;
        // Word boundary so `data-id=` never satisfies a lookup for `id=`.
        let bounded = at > 0 && tag_text.as_bytes()[at - 1].is_ascii_whitespace();
        if bounded {
            let value_start = at + pattern.len();
            let value_len = tag_text[value_start..].find('"')?;
            return Some(&tag_text[value_start..value_start + value_len]);
        }
        from = at + pattern.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<div class=\"card profile-card\">",
        "<div class=\"social-links text-center\"><a href=\"x\">gh</a></div>",
        "</div>",
        "<div class=\"detail\" id=\"work-experience\"><div class=\"inner\"><p>w</p></div></div>",
        "<div class=\"detail\" id=\"volunteer-work\"><div class=\"inner\"><p>v</p></div></div>",
    );

    #[test]
    fn test_element_with_id_spans_nested_divs() {
        let range = element_with_id(PAGE, "div", "work-experience").unwrap();
        let block = &PAGE[range];
        assert!(block.starts_with("<div class=\"detail\" id=\"work-experience\">"));
        assert!(block.ends_with("<p>w</p></div></div>"));
    }

    #[test]
    fn test_element_with_class_matches_whole_tokens() {
        let range = element_with_class(PAGE, "div", "social-links").unwrap();
        assert!(PAGE[range].contains("gh"));
        // `profile` is a substring of `profile-card` but not a class token.
        assert!(element_with_class(PAGE, "div", "profile").is_none());
    }

    #[test]
    fn test_missing_element_is_none() {
        assert!(element_with_id(PAGE, "div", "education").is_none());
    }

    #[test]
    fn test_unbalanced_block_is_none() {
        let html = "<div class=\"detail\" id=\"open\"><div>never closed";
        assert!(element_with_id(html, "div", "open").is_none());
    }

    #[test]
    fn test_self_closing_tag_is_its_own_block() {
        let html = "before <div id=\"spacer\"/> after";
        let range = element_with_id(html, "div", "spacer").unwrap();
        assert_eq!(&html[range], "<div id=\"spacer\"/>");
    }

    #[test]
    fn test_nav_entry_wraps_the_matching_li() {
        let html = "<ul><li><a href=\"#work-experience\">Work</a></li>\
                    <li><a href=\"#volunteer-work\">Volunteer</a></li></ul>";
        let range = nav_entry(html, "volunteer-work").unwrap();
        assert_eq!(&html[range], "<li><a href=\"#volunteer-work\">Volunteer</a></li>");
    }

    #[test]
    fn test_nav_entry_absent_fragment_is_none() {
        assert!(nav_entry("<ul><li><a href=\"#a\">A</a></li></ul>", "b").is_none());
    }

    #[test]
    fn test_attr_value_respects_word_boundaries() {
        let tag = "<div data-id=\"decoy\" id=\"real\">";
        assert_eq!(attr_value(tag, "id"), Some("real"));
    }
}
