//! XML serializer: tab-indented elements under a `<root>` document element.

use crate::error::Result;
use crate::serialize::Serializer;
use crate::tree::DocValue;

pub struct XmlSerializer {
    out: String,
    depth: usize,
}

impl XmlSerializer {
    pub fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for XmlSerializer {
    fn open(&mut self, name: &str) {
        self.indent();
        self.out.push_str(&format!("<{}>\n", element_name(name)));
        self.depth += 1;
    }

    fn leaf(&mut self, name: &str, value: &DocValue) {
        let tag = element_name(name);
        let text = match value {
            DocValue::Escaped(s) => escape(s),
            DocValue::Verbatim(s) => s.clone(),
        };
        self.indent();
        self.out.push_str(&format!("<{}>{}</{}>\n", tag, text, tag));
    }

    fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str(&format!("</{}>\n", element_name(name)));
    }

    fn encode(&self) -> Result<String> {
        Ok(self.out.clone())
    }

    fn extension(&self) -> &str {
        "xml"
    }
}

/// Coerce a node name into a valid XML element name.
fn element_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let ok = c.is_alphanumeric() || c == '_' || (i > 0 && (c == '-' || c == '.'));
        if i == 0 && c.is_ascii_digit() {
            out.push('_');
        }
        out.push(if ok { c } else { '_' });
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Stand-in for characters XML 1.0 cannot carry.
///
/// C0 controls other than tab, LF and CR map to their Control Pictures
/// symbol (U+2400 + code point, so NUL becomes `\u{2400}`); the
/// noncharacters U+FFFE and U+FFFF map to U+FFFD.
pub fn substitute(c: char) -> Option<char> {
    match c {
        '\t' | '\n' | '\r' => None,
        c if (c as u32) < 0x20 => char::from_u32(0x2400 + c as u32),
        '\u{FFFE}' | '\u{FFFF}' => Some('\u{FFFD}'),
        _ => None,
    }
}

/// Text an XML reader recovers from `escape(s)`: `s` with [`substitute`]
/// applied.
pub fn readable_text(s: &str) -> String {
    s.chars().map(|c| substitute(c).unwrap_or(c)).collect()
}

/// Encode text for element content.
///
/// Markup characters become entities and CR becomes `&#xD;` so end-of-line
/// normalization leaves it alone. Other controls become character
/// references, except those XML 1.0 forbids, which are substituted.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => out.push_str("&#xD;"),
            '\t' | '\n' => out.push(c),
            c => match substitute(c) {
                Some(stand_in) => out.push(stand_in),
                None if c.is_control() => out.push_str(&format!("&#x{:X};", c as u32)),
                None => out.push(c),
            },
        }
    }
    out
}

/// Decode the entities and character references produced by [`escape`].
/// Substituted characters are not restored.
///
/// Unknown or malformed references are kept literally.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = if let Some(hex) = entity
                        .strip_prefix("#x")
                        .or_else(|| entity.strip_prefix("#X"))
                    {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(dec) = entity.strip_prefix('#') {
                        dec.parse::<u32>().ok()
                    } else {
                        None
                    };
                    code.and_then(char::from_u32)
                }
            };
            c.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
