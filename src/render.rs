//! Turn content to HTML. Assistant replies are markdown; user text is shown
//! exactly as typed.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::chat::{Role, Turn};

pub fn render_turn(turn: &Turn) -> String {
    match turn.role() {
        Role::User => render_plain(turn.content()),
        Role::Assistant => render_markdown(turn.content()),
    }
}

fn render_plain(text: &str) -> String {
    format!("<pre class=\"turn-text\">{}</pre>", tera::escape_html(text))
}

fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    // Raw HTML from the model is shown as text, never injected.
    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let scheme = url.trim_start().to_ascii_lowercase();
    if ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|prefix| scheme.starts_with(prefix))
    {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Transcript;

    fn rendered(role: Role, content: &str) -> String {
        let mut transcript = Transcript::default();
        transcript.append(role, content);
        render_turn(&transcript.turns()[0])
    }

    #[test]
    fn assistant_text_is_markdown() {
        let html = rendered(Role::Assistant, "# Title\n\nSome **bold** and `code`.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn assistant_tables_render() {
        let html = rendered(Role::Assistant, "| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn user_text_is_literal_and_keeps_newlines() {
        let html = rendered(Role::User, "**not bold**\n  indented <b>x</b>");
        assert!(html.starts_with("<pre class=\"turn-text\">**not bold**\n  indented &lt;b&gt;x"));
        assert!(html.ends_with("</pre>"));
        assert!(!html.contains("<strong>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn raw_html_in_replies_is_escaped() {
        let html = rendered(Role::Assistant, "hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn script_links_are_neutralized() {
        let html = rendered(Role::Assistant, "[click](javascript:alert(1)) [ok](https://example.com)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("href=\"#\""));
        assert!(html.contains("href=\"https://example.com\""));
    }
}
