//! Minimal HTML handling for note content.
//!
//! Note bodies are HTML produced by the editor. The core only needs three
//! things from it: the visible text (for search), a Markdown or plain-text
//! rendering (for per-note downloads), and the reverse direction for text
//! typed on the command line. Parsing goes through `scraper` (html5ever)
//! and is copied into a small owned tree; it is lenient and never fails.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html};

/// Elements whose text is never visible.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "head", "title", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_hidden(&self) -> bool {
        HIDDEN_ELEMENTS.contains(&self.name.as_str())
    }
}

/// Output flavor for `render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Markdown,
    PlainText,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse an HTML fragment into a list of top-level nodes.
///
/// html5ever does the tokenizing and tree building, so character
/// references, implied end tags and stray markup are handled the way a
/// browser handles them. Comments and doctypes are dropped.
pub fn parse(html: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    convert_element(fragment.root_element()).children
}

fn convert_element(el: ElementRef<'_>) -> Element {
    let children = el
        .children()
        .filter_map(|child| match child.value() {
            // Editors pad with no-break spaces; search treats them as spaces
            scraper::Node::Text(text) => Some(Node::Text(text.replace('\u{a0}', " "))),
            scraper::Node::Element(_) => {
                ElementRef::wrap(child).map(|e| Node::Element(convert_element(e)))
            }
            _ => None,
        })
        .collect();

    Element {
        name: el.value().name().to_string(),
        attrs: el
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children,
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Text extraction
// ============================================================================

/// Visible text nodes, one entry per node. Markup never contributes text,
/// and adjacent nodes are kept apart so a search cannot match across an
/// element boundary.
pub fn text_segments(html: &str) -> Vec<String> {
    let mut out = Vec::new();
    collect_text(&parse(html), &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push(text.clone()),
            Node::Element(el) if !el.is_hidden() => collect_text(&el.children, out),
            Node::Element(_) => {}
        }
    }
}

/// Case-insensitive substring search over the visible text of `html`.
pub fn contains_text(html: &str, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    text_segments(html)
        .iter()
        .any(|segment| segment.to_lowercase().contains(&needle))
}

// ============================================================================
// Rendering
// ============================================================================

pub fn to_markdown(html: &str) -> String {
    render(html, TextFormat::Markdown)
}

pub fn to_plain_text(html: &str) -> String {
    render(html, TextFormat::PlainText)
}

/// Best-effort, lossy rendering. Unrecognized elements are dropped but
/// their text is kept.
pub fn render(html: &str, format: TextFormat) -> String {
    let ctx = Context {
        format,
        in_pre: false,
    };
    normalize(&render_nodes(&parse(html), ctx))
}

#[derive(Clone, Copy)]
struct Context {
    format: TextFormat,
    in_pre: bool,
}

impl Context {
    fn markdown(&self) -> bool {
        self.format == TextFormat::Markdown
    }
}

fn render_nodes(nodes: &[Node], ctx: Context) -> String {
    nodes.iter().map(|node| render_node(node, ctx)).collect()
}

fn render_node(node: &Node, ctx: Context) -> String {
    match node {
        Node::Text(text) if ctx.in_pre => text.clone(),
        Node::Text(text) => collapse_whitespace(text),
        Node::Element(el) => render_element(el, ctx),
    }
}

fn render_element(el: &Element, ctx: Context) -> String {
    let md = ctx.markdown();

    match el.name.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let inner = render_nodes(&el.children, ctx);
            let inner = inner.trim();
            let level = el.name[1..].parse::<usize>().unwrap_or(1);
            if md && !inner.is_empty() {
                block(&format!("{} {}", "#".repeat(level), inner))
            } else {
                block(inner)
            }
        }
        "p" | "div" => block(render_nodes(&el.children, ctx).trim()),
        "br" => "\n".to_string(),
        "strong" | "b" => wrap(el, ctx, "**"),
        "em" | "i" => wrap(el, ctx, "*"),
        "s" | "strike" | "del" => wrap(el, ctx, "~~"),
        "code" if ctx.in_pre => render_nodes(&el.children, ctx),
        "code" => wrap(el, ctx, "`"),
        "pre" => {
            let inner = render_nodes(&el.children, Context { in_pre: true, ..ctx });
            let inner = inner.trim_matches('\n');
            if md {
                block(&format!("```\n{}\n```", inner))
            } else {
                block(inner)
            }
        }
        "a" => {
            let inner = render_nodes(&el.children, ctx);
            match el.attr("href") {
                Some(href) if md && !href.is_empty() && !inner.trim().is_empty() => {
                    format!("[{}]({})", inner.trim(), href)
                }
                _ => inner,
            }
        }
        "blockquote" => {
            let inner = normalize(&render_nodes(&el.children, ctx));
            if md && !inner.is_empty() {
                block(&prefix_lines(&inner, "> ", ">"))
            } else {
                block(&inner)
            }
        }
        "ul" | "ol" => render_list(el, ctx),
        _ if el.is_hidden() => String::new(),
        _ => render_nodes(&el.children, ctx),
    }
}

fn render_list(el: &Element, ctx: Context) -> String {
    let ordered = el.name == "ol";
    let mut index = el
        .attr("start")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1);

    let mut items: Vec<String> = Vec::new();
    for child in &el.children {
        let Node::Element(item) = child else {
            continue;
        };

        if item.name != "li" {
            // A list nested directly in a list belongs to the previous item
            let nested = normalize(&render_element(item, ctx));
            if nested.is_empty() {
                continue;
            }
            match items.last_mut() {
                Some(last) => {
                    last.push('\n');
                    last.push_str(&prefix_lines(&nested, "  ", ""));
                }
                None => items.push(nested),
            }
            continue;
        }

        let marker = if ordered {
            format!("{}. ", index)
        } else {
            "- ".to_string()
        };
        index += 1;

        let body = compact(&normalize(&render_nodes(&item.children, ctx)));
        let indent = " ".repeat(marker.len());
        let mut lines = body.lines();
        let mut text = format!("{}{}", marker, lines.next().unwrap_or(""));
        for line in lines {
            text.push('\n');
            if !line.is_empty() {
                text.push_str(&indent);
            }
            text.push_str(line);
        }
        items.push(text);
    }

    if items.is_empty() {
        return String::new();
    }
    block(&items.join("\n"))
}

fn wrap(el: &Element, ctx: Context, marker: &str) -> String {
    let inner = render_nodes(&el.children, ctx);
    let trimmed = inner.trim();
    if !ctx.markdown() || trimmed.is_empty() {
        return inner;
    }

    let leading = &inner[..inner.len() - inner.trim_start().len()];
    let trailing = &inner[inner.trim_end().len()..];
    format!("{}{}{}{}{}", leading, marker, trimmed, marker, trailing)
}

fn block(s: &str) -> String {
    if s.is_empty() {
        String::new()
    } else {
        format!("\n\n{}\n\n", s)
    }
}

fn prefix_lines(s: &str, prefix: &str, empty_prefix: &str) -> String {
    s.lines()
        .map(|line| {
            if line.is_empty() {
                empty_prefix.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

fn paragraph_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"))
}

fn collapse_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text, " ").into_owned()
}

/// Trim line ends, cap runs of blank lines at one, trim the whole.
fn normalize(s: &str) -> String {
    let trimmed = s
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    blank_lines_re()
        .replace_all(&trimmed, "\n\n")
        .trim()
        .to_string()
}

/// Remove blank lines entirely (list item bodies).
fn compact(s: &str) -> String {
    s.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Plain text to HTML
// ============================================================================

/// Turn typed text into editor HTML: blank lines separate paragraphs,
/// single newlines become `<br>`.
pub fn from_plain_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    paragraph_break_re()
        .split(&text)
        .map(|p| p.trim_matches('\n'))
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(escape_html).collect();
            format!("<p>{}</p>", lines.join("<br>"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_tree() {
        let nodes = parse(r#"<p class="x">Hi <b>there</b></p>"#);
        assert_eq!(nodes.len(), 1);
        let Node::Element(p) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(p.name, "p");
        assert_eq!(p.attr("class"), Some("x"));
        assert_eq!(p.children.len(), 2);
    }

    #[test]
    fn test_parse_void_and_unclosed() {
        let nodes = parse("<p>a<br>b<p>c");
        assert_eq!(nodes.len(), 2);
        let Node::Element(first) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(first.children.len(), 3);
    }

    #[test]
    fn test_stray_close_tag_ignored() {
        assert_eq!(text_segments("a</div>b"), vec!["ab"]);
    }

    #[test]
    fn test_attribute_with_gt_inside_quotes() {
        let nodes = parse(r#"<a href="x>y" title='t'>link</a>"#);
        let Node::Element(a) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(a.attr("href"), Some("x>y"));
        assert_eq!(a.attr("title"), Some("t"));
        assert_eq!(text_segments(r#"<a href="x>y">link</a>"#), vec!["link"]);
    }

    #[test]
    fn test_tag_name_does_not_match() {
        let html = "<divination>hello</divination>";
        assert!(!contains_text(html, "divination"));
        assert!(contains_text(html, "hello"));
        assert!(contains_text(html, "HELLO"));
    }

    #[test]
    fn test_attribute_value_does_not_match() {
        assert!(!contains_text(r#"<a href="https://secret.example">x</a>"#, "secret"));
    }

    #[test]
    fn test_word_split_across_elements_does_not_match() {
        let html = "<p><b>hel</b><i>lo</i></p>";
        assert!(!contains_text(html, "hello"));
        assert!(contains_text(html, "hel"));
    }

    #[test]
    fn test_entities_decoded_for_search() {
        assert!(contains_text("<p>fish &amp; chips</p>", "fish & chips"));
        assert!(contains_text("<p>caf&#233;</p>", "café"));
        assert!(contains_text("<p>&#x41;BC</p>", "abc"));
        assert!(contains_text("<p>two&nbsp;words</p>", "two words"));
    }

    #[test]
    fn test_named_entities_decoded_for_search() {
        let html = "<p>caf&eacute; &mdash; na&iuml;ve</p>";
        assert_eq!(text_segments(html), vec!["café — naïve"]);
        assert!(contains_text(html, "café"));
        assert!(contains_text(html, "NAÏVE"));
        assert!(!contains_text(html, "eacute"));
    }

    #[test]
    fn test_named_entities_rendered() {
        let html = "<p>caf&eacute; &mdash; na&iuml;ve &hellip; &copy;</p>";
        assert_eq!(to_markdown(html), "café — naïve … ©");
        assert_eq!(to_plain_text(html), "café — naïve … ©");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(text_segments("<p>a &bogus; b & c</p>"), vec!["a &bogus; b & c"]);
    }

    #[test]
    fn test_comments_and_scripts_hidden() {
        let html = "<!-- note --><p>shown</p><script>hidden()</script>";
        assert_eq!(text_segments(html), vec!["shown"]);
        assert!(!contains_text(html, "note"));
    }

    #[test]
    fn test_lone_less_than_is_text() {
        assert!(contains_text("<p>1 < 2</p>", "1 < 2"));
    }

    #[test]
    fn test_markdown_inline() {
        let html = "<p>A <strong>bold</strong>, <em>soft</em>, <s>gone</s> and <code>x = 1</code> line</p>";
        assert_eq!(
            to_markdown(html),
            "A **bold**, *soft*, ~~gone~~ and `x = 1` line"
        );
    }

    #[test]
    fn test_markdown_headings_and_paragraphs() {
        let html = "<h1>Title</h1><p>one</p><h3>Sub</h3><p>two<br>three</p>";
        assert_eq!(to_markdown(html), "# Title\n\none\n\n### Sub\n\ntwo\nthree");
    }

    #[test]
    fn test_markdown_link() {
        let html = r#"<p>see <a href="https://example.com">the site</a></p>"#;
        assert_eq!(to_markdown(html), "see [the site](https://example.com)");
        assert_eq!(to_plain_text(html), "see the site");
    }

    #[test]
    fn test_markdown_blockquote() {
        let html = "<blockquote><p>first</p><p>second</p></blockquote>";
        assert_eq!(to_markdown(html), "> first\n>\n> second");
    }

    #[test]
    fn test_markdown_lists() {
        let html = "<ul><li><p>milk</p></li><li><p>eggs</p></li></ul><ol><li>one</li><li>two</li></ol>";
        assert_eq!(to_markdown(html), "- milk\n- eggs\n\n1. one\n2. two");
    }

    #[test]
    fn test_markdown_nested_list() {
        let html = "<ul><li><p>fruit</p><ul><li><p>apple</p></li></ul></li><li><p>bread</p></li></ul>";
        assert_eq!(to_markdown(html), "- fruit\n  - apple\n- bread");
    }

    #[test]
    fn test_markdown_nested_inline() {
        let html = "<p><strong>very <em>important</em></strong></p>";
        assert_eq!(to_markdown(html), "**very *important***");
    }

    #[test]
    fn test_markdown_code_block() {
        let html = "<pre><code>fn main() {\n    run();\n}</code></pre>";
        assert_eq!(to_markdown(html), "```\nfn main() {\n    run();\n}\n```");
    }

    #[test]
    fn test_unknown_tags_dropped_text_kept() {
        let html = r#"<p><span style="color:red">red</span> <mark>marked</mark></p><img src="x.png">"#;
        assert_eq!(to_markdown(html), "red marked");
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let html = "<h2>Plan</h2><p><b>Do</b> it</p><ul><li>now</li></ul>";
        assert_eq!(to_plain_text(html), "Plan\n\nDo it\n\n- now");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(to_markdown(""), "");
        assert_eq!(to_plain_text("<p></p>"), "");
    }

    #[test]
    fn test_from_plain_text() {
        let html = from_plain_text("Line one\nline <two>\n\nSecond & last");
        assert_eq!(
            html,
            "<p>Line one<br>line &lt;two&gt;</p><p>Second &amp; last</p>"
        );
        assert_eq!(to_plain_text(&html), "Line one\nline <two>\n\nSecond & last");
    }

    #[test]
    fn test_from_plain_text_blank() {
        assert_eq!(from_plain_text("  \n\n "), "");
    }
}
