//! Markdown to sanitized HTML for message bodies.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

const SAFE_SCHEMES: [&str; 3] = ["http:", "https:", "mailto:"];

/// Renders Markdown to HTML.
///
/// Raw HTML in the source is shown as text rather than interpreted and links
/// open in a new window. Links and images with a scheme other than
/// http(s)/mailto lose their target.
pub fn render_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            dest_url, title, ..
        }) => Event::InlineHtml(CowStr::from(open_link(&dest_url, &title))),
        Event::End(TagEnd::Link) => Event::InlineHtml(CowStr::Borrowed("</a>")),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_href(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn open_link(dest: &str, title: &str) -> String {
    let mut tag = String::from("<a");
    if is_safe_href(dest) {
        tag.push_str(" href=\"");
        tag.push_str(&escape_html(dest));
        tag.push('"');
    }
    if !title.is_empty() {
        tag.push_str(" title=\"");
        tag.push_str(&escape_html(title));
        tag.push('"');
    }
    tag.push_str(" target=\"_blank\" rel=\"noopener noreferrer\">");
    tag
}

fn is_safe_href(dest: &str) -> bool {
    let lower = dest.trim().to_ascii_lowercase();
    match lower.find(':') {
        // Relative references carry no scheme.
        None => true,
        Some(colon) if lower[..colon].contains(['/', '?', '#']) => true,
        Some(_) => SAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)),
    }
}

/// Escapes text for use inside HTML element content or a quoted attribute.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
