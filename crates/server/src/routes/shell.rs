//! HTML application shell.
//!
//! Every non-API page gets the same document; the client bundle takes over
//! from the empty mount point.

use axum::{extract::State, response::Html};

use crate::routes::ServerState;

const MOUNT: &str = r#"<div id="root"></div>"#;

/// Pre-split document around the mount point.
#[derive(Debug, Clone)]
pub struct HtmlShell {
    start: String,
    end: String,
}

impl HtmlShell {
    pub fn new(title: &str) -> Self {
        let start = format!(
            concat!(
                "<!doctype html>",
                "<html lang=\"en\">",
                "<head>",
                "<meta charset=\"utf-8\">",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
                "<title>{}</title>",
                "<link rel=\"stylesheet\" href=\"/css/main.css\">",
                "</head>",
                "<body>",
            ),
            escape_html(title)
        );
        let end = "<script src=\"/js/main.bundle.js\"></script></body></html>".to_string();
        Self { start, end }
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.start.len() + MOUNT.len() + self.end.len());
        out.push_str(&self.start);
        out.push_str(MOUNT);
        out.push_str(&self.end);
        out
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub async fn shell(State(state): State<ServerState>) -> Html<String> {
    Html(state.shell.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_wraps_mount_point() {
        let page = HtmlShell::new("Skillcrucial").render();
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("<title>Skillcrucial</title>"));
        assert!(page.contains(MOUNT));
        assert!(page.ends_with("</html>"));
    }

    #[test]
    fn title_is_escaped() {
        let page = HtmlShell::new("<b>Tom & Jerry</b>").render();
        assert!(page.contains("<title>&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</title>"));
    }
}
