//! Markdown → HTML for the editor preview.
//!
//! Display only: the HTML is sanitized and never written back into the draft.

use comrak::Options;

fn options() -> Options<'static> {
    let mut options = Options::default();
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    options
}

pub fn render_preview(markdown: &str) -> String {
    let html = comrak::markdown_to_html(markdown, &options());
    ammonia::clean(&html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_common_markdown() {
        let html = render_preview("# Title\n\n**bold** and _italic_");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn strips_scripts() {
        let html = render_preview("hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_content_renders_empty() {
        assert_eq!(render_preview("").trim(), "");
    }
}
