use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::utils::escape_html;

/// Render bot text to HTML.
///
/// Markdown emphasis is honored, raw HTML in the text is shown literally,
/// single newlines become `<br />` and bare `http(s)://` URLs become links
/// that open in a new tab. Links to anything but `http(s)` and all images are
/// reduced to their text.
pub fn render_bot_text(text: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH));

    let mut events = Vec::new();
    let mut code_depth = 0usize;
    let mut image_depth = 0usize;
    // One entry per open link: whether it was kept
    let mut links: Vec<bool> = Vec::new();

    for event in parser {
        match event {
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            Event::Text(alt) | Event::Code(alt) if image_depth > 0 => events.push(Event::Text(alt)),
            _ if image_depth > 0 => {}
            Event::Start(Tag::CodeBlock(_)) => {
                code_depth += 1;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                code_depth = code_depth.saturating_sub(1);
                events.push(event);
            }
            Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                let keep = is_web_url(&dest_url);
                links.push(keep);
                if keep {
                    events.push(Event::Start(Tag::Link { link_type, dest_url, title, id }));
                }
            }
            Event::End(TagEnd::Link) => {
                if links.pop().unwrap_or(false) {
                    events.push(event);
                }
            }
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Text(text) if code_depth == 0 && !links.contains(&true) => {
                push_autolinked(&mut events, &text);
            }
            other => events.push(other),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

fn push_autolinked(events: &mut Vec<Event<'_>>, text: &str) {
    let mut rest = text;
    while let Some((start, end)) = find_url(rest) {
        if start > 0 {
            events.push(Event::Text(CowStr::from(rest[..start].to_string())));
        }
        let url = escape_html(&rest[start..end]);
        events.push(Event::InlineHtml(CowStr::from(format!(
            r#"<a href="{0}" target="_blank" rel="noopener noreferrer">{0}</a>"#,
            url
        ))));
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        events.push(Event::Text(CowStr::from(rest.to_string())));
    }
}

fn is_web_url(url: &str) -> bool {
    ["https://", "http://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Byte range of the first bare URL, without trailing sentence punctuation
fn find_url(s: &str) -> Option<(usize, usize)> {
    let start = ["https://", "http://"].iter().filter_map(|scheme| s.find(scheme)).min()?;
    let candidate = &s[start..];
    let len = candidate.find(char::is_whitespace).unwrap_or(candidate.len());
    let url = candidate[..len].trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);

    let scheme_len = if url.starts_with("https://") { 8 } else { 7 };
    if url.len() <= scheme_len {
        return None;
    }
    Some((start, start + url.len()))
}
