//! Markdown to sanitized HTML.
//!
//! Parsing uses pulldown-cmark with the GitHub-flavored extensions and
//! single newlines rendered as hard breaks. The HTML is then cleaned by
//! ammonia against a fixed tag and attribute allow-list. Anything else is
//! stripped; `script` and `style` are removed together with their content.
//!
//! Rendering never fails: if the pipeline panics the error is logged and the
//! original text is returned as-is.

use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

use ammonia::Builder;
use once_cell::sync::Lazy;
use pulldown_cmark::{
    html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;

pub const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "u", "a", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6",
    "code", "pre", "blockquote",
];

pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "target", "rel"];

static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
        .tag_attributes(HashMap::new())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect::<HashSet<_>>())
        // `rel` is passed through as written instead of being forced
        .link_rel(None);
    builder
});

/// Bare `http(s)://` and `www.` links, GFM autolink-literal style.
static AUTOLINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<]+").expect("autolink regex pattern is valid")
});

fn gfm_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Parse markdown into HTML without sanitizing it.
fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, gfm_options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let events = autolink(TextMergeStream::new(parser));

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Wrap bare URLs in text events with links. Text inside links, images and
/// code blocks is left alone.
fn autolink<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut opaque_depth = 0usize;

    for event in events {
        match event {
            Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_))) => {
                opaque_depth += 1;
                out.push(Event::Start(tag));
            }
            Event::End(end @ (TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock)) => {
                opaque_depth = opaque_depth.saturating_sub(1);
                out.push(Event::End(end));
            }
            Event::Text(text) if opaque_depth == 0 => push_linked_text(&mut out, text),
            other => out.push(other),
        }
    }
    out
}

fn push_linked_text<'a>(out: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    if !AUTOLINK_RE.is_match(&text) {
        out.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for found in AUTOLINK_RE.find_iter(&text) {
        let Some(url) = trim_autolink(found.as_str()) else {
            continue;
        };
        let start = found.start();
        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }

        let href = if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));
        last = start + url.len();
    }

    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Drop trailing punctuation and unbalanced closing parens from a matched
/// URL. Returns `None` when nothing is left past the scheme or `www.`.
fn trim_autolink(url: &str) -> Option<&str> {
    let prefix_len = match url.find("://") {
        Some(idx) => idx + 3,
        None => 4,
    };

    let mut url = url;
    while let Some(last) = url.chars().last() {
        let trim = match last {
            '?' | '!' | '.' | ',' | ':' | ';' | '*' | '_' | '~' | '\'' | '"' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !trim {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }

    (url.len() > prefix_len).then_some(url)
}

/// Clean arbitrary HTML against the allow-list.
pub fn sanitize_html(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Render markdown to HTML that is safe to display.
pub fn render_markdown(markdown: &str) -> String {
    render_with(markdown, |text| sanitize_html(&markdown_to_html(text)))
}

/// Run `pipeline`, returning `markdown` unchanged if it panics.
fn render_with(markdown: &str, pipeline: impl FnOnce(&str) -> String) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| pipeline(markdown))) {
        Ok(html) => html,
        Err(_) => {
            log::error!("Error parsing markdown, falling back to plain text");
            markdown.to_string()
        }
    }
}
