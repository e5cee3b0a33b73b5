//! Java-style `.properties` parsing
//!
//! Signing material for Android release builds lives in `key.properties`,
//! a file in the `java.util.Properties` text format. The parser here covers
//! that format: `#`/`!` comments, `=`/`:`/whitespace separators, backslash
//! line continuations and escape sequences including `\uXXXX`. Lines may end
//! in `\n`, `\r\n` or a lone `\r`.

use crate::error::{Error, ErrorCode, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed key-value pairs. Later duplicates win.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

// Values routinely hold passwords; only key names are printable.
impl std::fmt::Debug for Properties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Properties")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Properties {
    /// Parse properties text
    pub fn parse(input: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut lines = split_lines(input).enumerate();

        while let Some((idx, raw)) = lines.next() {
            let line_no = idx + 1;
            let trimmed = raw.trim_start_matches(is_whitespace);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while has_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(is_whitespace)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical, line_no)?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// Read and parse a properties file
    ///
    /// Files that are not valid UTF-8 are decoded as ISO-8859-1, the
    /// format's historical encoding.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes)
            .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| char::from(b)).collect());
        Self::parse(&text)
    }

    /// Look up a value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether a key is defined
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Defined keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are defined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lines ending in `\n`, `\r\n` or a lone `\r`
fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = input;
    std::iter::from_fn(move || {
        let text = rest;
        if text.is_empty() {
            return None;
        }
        let (line, tail) = match text.find(['\r', '\n']) {
            Some(i) if text[i..].starts_with("\r\n") => (&text[..i], &text[i + 2..]),
            Some(i) => (&text[..i], &text[i + 1..]),
            None => (text, ""),
        };
        rest = tail;
        Some(line)
    })
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// An odd run of trailing backslashes continues the line.
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str, line_no: usize) -> Result<(String, String)> {
    let mut key_end = line.len();
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_whitespace(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let mut rest = line[key_end..].trim_start_matches(is_whitespace);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_whitespace);
    }

    Ok((unescape(&line[..key_end], line_no)?, unescape(rest, line_no)?))
}

fn unescape(raw: &str, line_no: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_hex4(&mut chars, line_no)?;
                if (0xD800..0xDC00).contains(&unit) {
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_hex4(&mut chars, line_no)?,
                        _ => return Err(bad_escape(line_no, "unpaired surrogate")),
                    };
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(bad_escape(line_no, "unpaired surrogate"));
                    }
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined).ok_or_else(|| bad_escape(line_no, "invalid code point"))?);
                } else {
                    out.push(char::from_u32(unit).ok_or_else(|| bad_escape(line_no, "unpaired surrogate"))?);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>, line_no: usize) -> Result<u32> {
    let mut unit = 0;
    for _ in 0..4 {
        let c = chars.next().ok_or_else(|| bad_escape(line_no, "truncated \\u escape"))?;
        let digit = c
            .to_digit(16)
            .ok_or_else(|| bad_escape(line_no, "non-hex digit in \\u escape"))?;
        unit = unit * 16 + digit;
    }
    Ok(unit)
}

fn bad_escape(line_no: usize, what: &str) -> Error {
    Error::new(
        ErrorCode::ConfigParseError,
        format!("Malformed escape on line {line_no}: {what}"),
    )
}
