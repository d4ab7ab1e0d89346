//! Server-rendered listing page.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use url::Url;

use crate::domain::ArticleSummary;

const SCRIPT: &str = r#"
function markRead(id, button) {
  button.disabled = true;
  fetch("/", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ action: "markRead", id: id })
  })
    .then(function (res) { return res.json(); })
    .then(function (result) {
      if (result.status === "success") {
        var item = button.closest("li");
        item.classList.add("read");
        button.remove();
      } else {
        button.disabled = false;
        alert(result.message);
      }
    })
    .catch(function () { button.disabled = false; });
}
"#;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 48rem; margin: 0 auto; padding: 1rem; }
ul { list-style: none; padding: 0; }
li { padding: 0.5rem 0; border-bottom: 1px solid #ddd; }
li.read a { color: #888; }
.meta { font-size: 0.8rem; color: #666; }
"#;

/// Renders the listing, in the order given.
pub fn render_page(articles: &[ArticleSummary]) -> String {
    let mut html = String::with_capacity(1024 + articles.len() * 256);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Stackdock</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n<h1>Stackdock</h1>\n");

    if articles.is_empty() {
        html.push_str("<p>Nothing saved yet.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for article in articles {
            render_item(&mut html, article);
        }
        html.push_str("</ul>\n");
    }

    let _ = writeln!(html, "<script>{}</script>", SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_item(html: &mut String, article: &ArticleSummary) {
    let class = if article.is_read { " class=\"read\"" } else { "" };
    let added = article
        .added_date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    let _ = write!(html, "<li{}>", class);
    if is_web_link(&article.url) {
        let _ = write!(
            html,
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            encode_double_quoted_attribute(&article.url),
            encode_text(&article.title),
        );
    } else {
        let _ = write!(
            html,
            "<span>{}</span> <code>{}</code>",
            encode_text(&article.title),
            encode_text(&article.url),
        );
    }
    let _ = write!(html, "\n<div class=\"meta\">{}", encode_text(&added));

    if !article.is_read {
        // The id goes through JSON string encoding, then attribute escaping.
        let id_literal = serde_json::to_string(&article.id).unwrap_or_else(|_| "\"\"".into());
        let _ = write!(
            html,
            " <button onclick=\"markRead({}, this)\">mark read</button>",
            encode_double_quoted_attribute(&id_literal),
        );
    }

    html.push_str("</div></li>\n");
}

/// Only http(s) urls become links; anything else is shown as text.
fn is_web_link(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
