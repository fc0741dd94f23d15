//! Collect response header lines into name/value pairs.

/// Parses raw header lines as delivered by libcurl.
///
/// With redirects followed, libcurl reports every hop's headers; a status
/// line (`HTTP/...`) starts a new block, so only the final response's
/// headers are kept.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if !name.is_empty() {
                headers.push((name.to_string(), value.trim().to_string()));
            }
        }
    }
    headers
}
