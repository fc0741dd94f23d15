//! Filenames for resolved documents.
//!
//! The HTTP endpoint needs a filename for the synthesized attachment header;
//! `docfetch fetch` needs a safe local filename to write the bytes to.

mod disposition;
mod percent;

pub use disposition::{attachment, filename_from_disposition};
pub use percent::percent_decode;

/// Used when neither the header nor the URL yields anything usable.
const FALLBACK_NAME: &str = "document";

/// Final path segment of a public id (`docs/2024/report.pdf` → `report.pdf`).
pub fn basename(public_id: &str) -> &str {
    public_id
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_NAME)
}

/// Picks a local filename for a fetched document: the `Content-Disposition`
/// filename when present, otherwise the last segment of the document URL.
/// The result is always a single safe path component.
pub fn local_name(document_url: &str, content_disposition: Option<&str>) -> String {
    let from_url = || {
        url::Url::parse(document_url)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut segs| segs.next_back().map(percent_decode))
            })
            .filter(|s| !s.is_empty())
    };

    let raw = content_disposition
        .and_then(filename_from_disposition)
        .or_else(from_url)
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    let safe = sanitize(&raw);
    if safe.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        safe
    }
}

/// Makes `name` safe as a single Linux path component: separators and
/// control characters become `_`, leading/trailing dots and spaces go, and
/// the result fits NAME_MAX (255 bytes).
fn sanitize(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());

    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
