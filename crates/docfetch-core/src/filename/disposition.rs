//! `Content-Disposition` handling: read a filename out of an upstream header,
//! or build an attachment header for a resolved document.

use super::percent::percent_decode;

/// Builds `attachment; filename="<name>"`.
///
/// Quotes and backslashes are escaped; CR, LF and other control characters
/// are dropped so the value is always a legal header.
pub fn attachment(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => {}
            c => quoted.push(c),
        }
    }
    format!("attachment; filename=\"{}\"", quoted)
}

/// Extracts the filename from a `Content-Disposition` value.
///
/// `filename*=UTF-8''...` wins over `filename=`; quoted values are unescaped.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;

    for (name, raw) in params(value) {
        if name.eq_ignore_ascii_case("filename*") {
            let encoded = raw
                .split_once("''")
                .filter(|(charset, _)| charset.eq_ignore_ascii_case("utf-8"))
                .map(|(_, rest)| rest);
            if let Some(encoded) = encoded {
                let decoded = percent_decode(encoded);
                if !decoded.is_empty() {
                    return Some(decoded);
                }
            }
        } else if name.eq_ignore_ascii_case("filename") {
            let value = unquote(raw);
            if !value.is_empty() {
                plain = Some(value);
            }
        }
    }

    plain
}

/// Splits `type; a=b; c="d"` into `(name, raw value)` pairs, skipping the
/// disposition type. `;` inside a quoted value does not split.
fn params(value: &str) -> Vec<(&str, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);

    parts
        .into_iter()
        .skip(1)
        .filter_map(|p| p.split_once('='))
        .map(|(n, v)| (n.trim(), v.trim()))
        .collect()
}

fn unquote(raw: &str) -> String {
    let inner = match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner,
        None => return raw.to_string(),
    };
    let mut out = String::with_capacity(inner.len());
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    out
}
