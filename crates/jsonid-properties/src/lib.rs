//! A minimal, order-preserving reader and writer for flat `key=value`
//! files (a Java `.properties` subset).
//!
//! The goal is a reliable round trip for the mapper's persisted store
//! and label config rather than full Java properties compliance.

/// A single `key=value` pair, in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    pub key: String,
    pub value: String,
}

/// An ordered string-to-string table. Insertion order is preserved;
/// duplicate keys are allowed by the format and resolved first-wins on
/// lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertiesTable {
    entries: Vec<PropertyEntry>,
}

impl PropertiesTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of the first entry with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Replaces the first entry with `key`, or appends a new one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(PropertyEntry { key, value }),
        }
    }

    /// Removes the first entry with `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(idx).value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.key.as_str(), e.value.as_str()))
    }
}

impl FromIterator<(String, String)> for PropertiesTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| PropertyEntry { key, value })
            .collect();
        Self { entries }
    }
}

/// Parse flat `key=value` text into an ordered table.
///
/// Comment lines (`#`/`!`), blank lines, and malformed lines are
/// skipped; `=`, `:` or bare whitespace separate key from value;
/// trailing-`\` continuation lines are joined as in Java properties.
#[must_use]
pub fn parse(text: &str) -> PropertiesTable {
    let mut entries = Vec::new();
    let mut lines = text.lines();

    while let Some(first) = lines.next() {
        let mut logical = String::new();
        let mut physical = first;
        loop {
            let segment = if logical.is_empty() {
                physical
            } else {
                // Continuations drop the leading whitespace of the
                // next physical line.
                physical.trim_start_matches([' ', '\t', '\x0C'])
            };

            if ends_with_unescaped_backslash(segment) {
                logical.push_str(&segment[..segment.len() - 1]);
                match lines.next() {
                    Some(next) => physical = next,
                    None => break,
                }
            } else {
                logical.push_str(segment);
                break;
            }
        }

        if let Some(entry) = parse_logical_line(&logical) {
            entries.push(entry);
        }
    }

    PropertiesTable { entries }
}

/// Serialize the table as one `key=value` line per entry.
///
/// Escaping mirrors what [`parse`] unescapes, so
/// `parse(&serialize(t))` reproduces the same key/value sequence.
#[must_use]
pub fn serialize(table: &PropertiesTable) -> String {
    let mut out = String::new();
    for (key, value) in table.iter() {
        push_escaped(&mut out, key, true);
        out.push('=');
        push_escaped(&mut out, value, false);
        out.push('\n');
    }
    out
}

fn ends_with_unescaped_backslash(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|&b| b == b'\\').count();
    trailing % 2 == 1
}

fn parse_logical_line(line: &str) -> Option<PropertyEntry> {
    let bytes = line.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() && is_format_whitespace(bytes[i]) {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] == b'#' || bytes[i] == b'!' {
        return None;
    }

    let key_start = i;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'=' | b':' => break,
            b if is_format_whitespace(b) => break,
            _ => i += 1,
        }
    }
    let key_end = i.min(bytes.len());

    while i < bytes.len() && is_format_whitespace(bytes[i]) {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'=' || bytes[i] == b':') {
        i += 1;
    }
    while i < bytes.len() && is_format_whitespace(bytes[i]) {
        i += 1;
    }

    // `key_end` and `i` always sit on an ASCII separator, whitespace,
    // or the end of the line, so the slices are valid UTF-8 boundaries.
    Some(PropertyEntry {
        key: unescape(&line[key_start..key_end]),
        value: unescape(&line[i..]),
    })
}

fn is_format_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\x0C')
}

fn unescape(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0C'),
            'u' => match take_unicode_escape(&mut chars) {
                Some(decoded) => out.push(decoded),
                // Malformed sequence: unknown-escape rule, digits (if
                // any) are left in place.
                None => out.push('u'),
            },
            // Java rule: an unknown escape yields the escaped
            // character itself (this also covers `\\` and `\ `).
            other => out.push(other),
        }
    }

    out
}

/// Decodes the `XXXX` after a `\u` escape, including a trailing
/// `\uXXXX` low-surrogate continuation pair as written by Java for
/// supplementary-plane characters. Consumes nothing and returns `None`
/// when the sequence is malformed.
fn take_unicode_escape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let mut rest = chars.clone();
    let high = hex_unit(&mut rest)?;

    let code = if (0xD800..=0xDBFF).contains(&high) {
        let mut pair = rest.clone();
        if pair.next() != Some('\\') || pair.next() != Some('u') {
            return None;
        }
        let low = hex_unit(&mut pair)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return None;
        }
        rest = pair;
        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
    } else {
        high
    };

    let decoded = char::from_u32(code)?;
    *chars = rest;
    Some(decoded)
}

fn hex_unit(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        value = (value << 4) | chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_escaped(out: &mut String, text: &str, is_key: bool) {
    for (idx, ch) in text.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0C' => out.push_str("\\f"),
            '=' | ':' | ' ' if is_key => {
                out.push('\\');
                out.push(ch);
            }
            // A leading space in a value would be trimmed on parse.
            ' ' if idx == 0 => out.push_str("\\ "),
            '#' | '!' if is_key && idx == 0 => {
                out.push('\\');
                out.push(ch);
            }
            // Keep the output ASCII, Java-style: one `\uXXXX` per
            // UTF-16 unit, so supplementary-plane characters become a
            // surrogate pair.
            ch if !ch.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units).iter() {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
            _ => out.push(ch),
        }
    }
}
