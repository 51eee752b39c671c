//! Lightweight HTML handling: escaping, entity decoding, image discovery and
//! tag rewriting.

use std::fmt::Write as _;
use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::resource::ResourceRef;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("valid comment pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\b([a-z][a-z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attribute pattern")
});

static BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break pattern"));

static BLOCK_END_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(p|div|h[1-6]|li|ul|ol|blockquote|pre|tr|table)\s*>")
        .expect("valid block pattern")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>").expect("valid heading pattern")
});

static STRONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(strong|b)\b[^>]*>(.*?)</(strong|b)\s*>").expect("valid strong pattern")
});

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(em|i)\b[^>]*>(.*?)</(em|i)\s*>").expect("valid emphasis pattern")
});

static CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<code\b[^>]*>(.*?)</code\s*>").expect("valid code pattern")
});

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#)
        .expect("valid link pattern")
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("valid list item pattern"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"));

static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("valid entity pattern"));

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline pattern"));

const REMOTE_PREFIXES: [&str; 3] = ["http://", "https://", "data:"];

/// Escapes the characters with a meaning in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decodes the common named entities and all numeric character references.
pub fn decode_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(text, |caps: &Captures<'_>| {
        let reference = &caps[1];
        let code = match reference.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => reference.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_owned())
    });

    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// An `<img>` tag with its attributes decoded.
#[derive(Debug, Default)]
struct ImageTag {
    span: Range<usize>,
    src: Option<String>,
    alt: Option<String>,
}

/// Finds the `<img>` tags of an HTML fragment, skipping comments.
///
/// Quoted attribute values may contain `>`.
fn image_tags(html: &str) -> Vec<ImageTag> {
    let bytes = html.as_bytes();
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            pos = rest[4..].find("-->").map_or(html.len(), |end| start + 4 + end + 3);
            continue;
        }

        let is_image = rest.get(..4).is_some_and(|name| name.eq_ignore_ascii_case("<img"))
            && bytes
                .get(start + 4)
                .is_some_and(|&c| c.is_ascii_whitespace() || matches!(c, b'/' | b'>'));
        if !is_image {
            pos = start + 1;
            continue;
        }

        let Some(end) = tag_end(bytes, start + 4) else {
            break;
        };
        let mut tag = image_attributes(&html[start..end]);
        tag.span = start..end;
        tags.push(tag);
        pos = end;
    }

    tags
}

/// Returns the offset just past the `>` closing a tag, ignoring quoted `>`.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (index, &c) in bytes.iter().enumerate().skip(from) {
        match (quote, c) {
            (None, b'"' | b'\'') => quote = Some(c),
            (Some(open), _) if open == c => quote = None,
            (None, b'>') => return Some(index + 1),
            _ => {}
        }
    }
    None
}

fn image_attributes(tag: &str) -> ImageTag {
    let mut image = ImageTag::default();
    for caps in ATTRIBUTE.captures_iter(tag) {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| decode_entities(m.as_str()))
            .unwrap_or_default();
        match caps[1].to_ascii_lowercase().as_str() {
            "src" => image.src = Some(value),
            "alt" => image.alt = Some(value),
            _ => {}
        }
    }
    image
}

/// Builds a resource reference for an image source, unless it is empty or
/// points outside the document (a remote or `data:` URI).
pub(super) fn local_image(src: String, alt: Option<String>) -> Option<ResourceRef> {
    if src.is_empty() || REMOTE_PREFIXES.iter().any(|prefix| src.starts_with(prefix)) {
        return None;
    }
    Some(ResourceRef::new(src).with_alt(alt.filter(|alt| !alt.is_empty())))
}

/// Finds the local images referenced by `<img>` tags in an HTML fragment.
pub fn extract_images(html: &str) -> Vec<ResourceRef> {
    image_tags(html)
        .into_iter()
        .filter_map(|tag| local_image(tag.src?, tag.alt))
        .collect()
}

/// Reduces an HTML fragment to its text, keeping paragraph breaks.
pub fn html_to_plain(html: &str) -> String {
    let text = COMMENT.replace_all(html, "");
    let text = BREAK_TAG.replace_all(&text, "\n");
    let text = BLOCK_END_TAG.replace_all(&text, "\n\n");
    let text = ANY_TAG.replace_all(&text, "");
    tidy(&decode_entities(&text))
}

/// Rewrites the common inline and block tags of an HTML fragment as Markdown.
///
/// Tags without a Markdown counterpart are dropped, keeping their text.
pub fn html_to_markdown(html: &str) -> String {
    let text = COMMENT.replace_all(html, "");
    let text = HEADING.replace_all(&text, |caps: &Captures<'_>| {
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("\n\n{} {}\n\n", "#".repeat(level), &caps[2])
    });
    let text = STRONG.replace_all(&text, "**$2**");
    let text = EMPHASIS.replace_all(&text, "*$2*");
    let text = CODE.replace_all(&text, "`$1`");
    let text = LINK.replace_all(&text, "[$2]($1)");
    let text = images_to_markdown(&text);
    let text = LIST_ITEM.replace_all(&text, "\n- ");
    let text = BREAK_TAG.replace_all(&text, "  \n");
    let text = BLOCK_END_TAG.replace_all(&text, "\n\n");
    let text = ANY_TAG.replace_all(&text, "");
    tidy(&decode_entities(&text))
}

/// Rewrites every `<img>` tag as a Markdown image, remote sources included.
///
/// Attribute values are re-escaped so the final entity pass restores them
/// unchanged.
fn images_to_markdown(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for tag in image_tags(html) {
        out.push_str(&html[last..tag.span.start]);
        if let Some(src) = tag.src {
            let alt = tag.alt.unwrap_or_default();
            let _ = write!(out, "![{}]({})", escape_html(&alt), escape_html(&src));
        }
        last = tag.span.end;
    }
    out.push_str(&html[last..]);
    out
}

fn tidy(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = lines.join("\n");
    EXCESS_NEWLINES
        .replace_all(&joined, "\n\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&lt;p&gt; &amp;amp; &#65;&#x42;"), "<p> &amp; AB");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_extract_images() {
        let html = r#"<img src="pics/a.png"><IMG alt='b' SRC='pics/b.png' />
            <img src="https://ex.com/c.png"><img src="http://ex.com/d.png">
            <img src="data:image/png;base64,AAA="><img alt="no source">"#;
        let images = extract_images(html);

        assert_eq!(images.len(), 2);
        assert_eq!(images[0], ResourceRef::new("pics/a.png"));
        assert_eq!(images[1].path, "pics/b.png");
        assert_eq!(images[1].alt.as_deref(), Some("b"));
    }

    #[test]
    fn test_quoted_angle_bracket_in_image_tag() {
        let images = extract_images(r#"<p><img alt="x > y" src="pics/a.png"></p>"#);
        assert_eq!(images, vec![ResourceRef::new("pics/a.png").with_alt(Some("x > y".to_owned()))]);
    }

    #[test]
    fn test_commented_images_are_skipped() {
        let html = r#"<!-- <img src="old.png"> --><img src="pics/b.png"><!-- <img src="c.png">"#;
        assert_eq!(extract_images(html), vec![ResourceRef::new("pics/b.png")]);
        assert_eq!(html_to_markdown(html), "![](pics/b.png)");
    }

    #[test]
    fn test_image_sources_decode_alike() {
        let html = r#"<img src="a&amp;b.png" alt="x &amp;amp; y">"#;
        let images = extract_images(html);
        assert_eq!(images[0].path, "a&b.png");
        assert_eq!(images[0].alt.as_deref(), Some("x &amp; y"));
        assert_eq!(html_to_markdown(html), "![x &amp; y](a&b.png)");
    }

    #[test]
    fn test_unterminated_image_tag() {
        assert!(extract_images(r#"<img src="a.png""#).is_empty());
        assert!(extract_images("<imgx src=a.png>").is_empty());
    }

    #[test]
    fn test_html_to_plain() {
        let html = "<p>First<br>line</p><p>Second &lt;para&gt;</p>";
        assert_eq!(html_to_plain(html), "First\nline\n\nSecond <para>");
    }

    #[test]
    fn test_html_to_markdown() {
        let html = r#"<h2>Cells</h2><p>The <strong>nucleus</strong> holds <a href="https://dna.org">DNA</a>.</p><ul><li>one</li><li>two</li></ul><img src="c.png" alt="cell">"#;
        assert_eq!(
            html_to_markdown(html),
            "## Cells\n\nThe **nucleus** holds [DNA](https://dna.org).\n\n- one\n\n- two\n\n![cell](c.png)"
        );
    }
}
