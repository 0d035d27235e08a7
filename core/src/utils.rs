use crate::config::JSON_INDENT;
use anyhow::Result;
use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

/// drops every char that isn't an ascii digit, so `1,234` becomes `1234`
/// and `1a2` becomes `12`
pub fn strip_non_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// replaces every non-ascii char with a lowercase `\uXXXX` escape, using a
/// surrogate pair outside the bmp. json punctuation is ascii, so only string
/// contents are touched
pub fn escape_non_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut units = [0u16; 2];

    for c in s.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

/// serializes `value` as ascii-only json indented with four spaces
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut ser)?;
    Ok(escape_non_ascii(&String::from_utf8(buf)?))
}
