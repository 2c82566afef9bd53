//! HTML serializer: standalone HTML page with semantic markup.
//!
//! Branches become nested `<section>`s headed by their name, runs of leaves
//! become definition lists.

use crate::error::Result;
use crate::serialize::Serializer;
use crate::tree::DocValue;

pub struct HtmlSerializer {
    body: String,
    title: Option<String>,
    depth: usize,
    in_list: bool,
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self {
            body: String::new(),
            title: None,
            depth: 0,
            in_list: false,
        }
    }

    fn end_list(&mut self) {
        if self.in_list {
            self.body.push_str("</dl>\n");
            self.in_list = false;
        }
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for HtmlSerializer {
    fn open(&mut self, name: &str) {
        self.end_list();
        if self.depth > 0 {
            let level = (self.depth + 1).min(6);
            self.body.push_str(&format!(
                "<section class=\"{}\">\n<h{}>{}</h{}>\n",
                html_escape(&class_name(name)),
                level,
                html_escape(name),
                level
            ));
        }
        self.depth += 1;
    }

    fn leaf(&mut self, name: &str, value: &DocValue) {
        if self.depth == 1 && name == "display_name" && self.title.is_none() {
            self.title = Some(value.as_str().to_string());
        }
        if !self.in_list {
            self.body.push_str("<dl>\n");
            self.in_list = true;
        }
        // Verbatim values are entity-encoded here too.
        self.body.push_str(&format!(
            "  <dt>{}</dt>\n  <dd>{}</dd>\n",
            html_escape(name),
            html_escape(value.as_str())
        ));
    }

    fn close(&mut self, _name: &str) {
        self.end_list();
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 {
            self.body.push_str("</section>\n");
        }
    }

    fn encode(&self) -> Result<String> {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        if let Some(ref title) = self.title {
            out.push_str(&format!("<title>{}</title>\n", html_escape(title)));
        }
        out.push_str("<style>\n");
        out.push_str("body { font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }\n");
        out.push_str("section { border-left: 2px solid #e4e4e4; padding-left: 1em; margin: 1em 0; }\n");
        out.push_str("dt { font-weight: bold; margin-top: 0.5em; }\n");
        out.push_str("dd { margin-left: 1.5em; white-space: pre-wrap; }\n");
        out.push_str("</style>\n");
        out.push_str("</head>\n<body>\n");
        if let Some(ref title) = self.title {
            out.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
        }
        out.push_str(&self.body);
        out.push_str("</body>\n</html>\n");
        Ok(out)
    }

    fn extension(&self) -> &str {
        "html"
    }
}

fn class_name(name: &str) -> String {
    name.to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "-")
}

/// Text an HTML parser recovers from an escaped value: NUL, which parsers
/// drop, becomes U+2400.
pub fn readable_text(s: &str) -> String {
    s.replace('\0', "\u{2400}")
}

/// Entity-encode markup characters. CR is written as `&#13;` so the parser's
/// newline normalization keeps it.
fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\r' => out.push_str("&#13;"),
            '\0' => out.push('\u{2400}'),
            c => out.push(c),
        }
    }
    out
}
