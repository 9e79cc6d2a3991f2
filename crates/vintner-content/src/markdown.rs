//! Markdown body rendering.

use pulldown_cmark::{html, Options, Parser};

/// Render a markdown body to an HTML fragment.
///
/// Fenced code blocks are part of the base grammar; tables, footnotes,
/// strikethrough and task lists are enabled on top.
pub fn render_markdown(body: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(body, options);

    let mut fragment = String::new();
    html::push_html(&mut fragment, parser);

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_paragraphs() {
        let fragment = render_markdown("# Hi\n\nLook at this!");

        assert!(fragment.contains("<h1>Hi</h1>"));
        assert!(fragment.contains("<p>Look at this!</p>"));
    }

    #[test]
    fn renders_fenced_code_blocks() {
        let fragment = render_markdown("```rust\nfn main() {}\n```");

        assert!(fragment.contains("<pre><code"));
        assert!(fragment.contains("fn main() {}"));
    }

    #[test]
    fn renders_inline_code() {
        let fragment = render_markdown("call `build` first");

        assert!(fragment.contains("<code>build</code>"));
    }

    #[test]
    fn empty_body_renders_empty_fragment() {
        assert_eq!(render_markdown(""), "");
    }
}
