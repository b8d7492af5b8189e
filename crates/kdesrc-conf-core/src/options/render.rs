//! Markdown documentation for options
//!
//! Catalog notes are HTML scraped from the kdesrc-build handbook; editors
//! display Markdown, so the handful of tags the handbook uses are translated
//! and everything else is stripped.

use regex::Regex;
use std::sync::OnceLock;

use super::descriptor::OptionDescriptor;

impl OptionDescriptor {
    /// Documentation shown on hover and in resolved completions
    pub fn render_markdown(&self) -> String {
        let mut sections = vec![format!("# {}", self.name)];

        if let Some(default) = self.get_default() {
            sections.push(format!("**Default:** `{default}`"));
        }

        if !self.doc.is_empty() {
            sections.push(html_to_markdown(&self.doc));
        }

        if let Some(since) = self.since {
            sections.push(format!("**Since:** {since}"));
        }

        if let Some(url) = self.doc_url() {
            sections.push(format!("[Read more at kdesrc-build website]({url})"));
        }

        sections.join("\n\n")
    }
}

/// Convert the HTML subset found in handbook notes to Markdown
pub fn html_to_markdown(html: &str) -> String {
    static CODE_RE: OnceLock<Regex> = OnceLock::new();
    static LINK_RE: OnceLock<Regex> = OnceLock::new();
    static EMPHASIS_RE: OnceLock<Regex> = OnceLock::new();
    static STRONG_RE: OnceLock<Regex> = OnceLock::new();
    static BREAK_RE: OnceLock<Regex> = OnceLock::new();
    static ITEM_RE: OnceLock<Regex> = OnceLock::new();
    static TAG_RE: OnceLock<Regex> = OnceLock::new();

    let code_re = CODE_RE.get_or_init(|| Regex::new(r"(?s)<code[^>]*>(.*?)</code>").unwrap());
    let link_re = LINK_RE.get_or_init(|| {
        Regex::new(r#"(?s)<a\s[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#).unwrap()
    });
    let emphasis_re =
        EMPHASIS_RE.get_or_init(|| Regex::new(r"</?(?:em|i)(?:\s[^>]*)?>").unwrap());
    let strong_re =
        STRONG_RE.get_or_init(|| Regex::new(r"</?(?:strong|b)(?:\s[^>]*)?>").unwrap());
    let break_re = BREAK_RE.get_or_init(|| Regex::new(r"<br\s*/?>|</?p(?:\s[^>]*)?>").unwrap());
    let item_re = ITEM_RE.get_or_init(|| Regex::new(r"<li(?:\s[^>]*)?>").unwrap());
    let tag_re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());

    let text = code_re.replace_all(html, "`$1`");
    let text = link_re.replace_all(&text, "[$2]($1)");
    let text = emphasis_re.replace_all(&text, "*");
    let text = strong_re.replace_all(&text, "**");
    let text = break_re.replace_all(&text, "\n\n");
    let text = item_re.replace_all(&text, "\n\n- ");
    let text = tag_re.replace_all(&text, "");
    let text = unescape_entities(&text);

    text.split("\n\n")
        .map(|paragraph| paragraph.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
