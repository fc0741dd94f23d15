//! Alternative spellings of a public id.
//!
//! Raw uploads keep their extension in the public id; image and video
//! uploads usually do not. Both forms are probed.

/// Removes a trailing `.ext` from the final path segment. Dotfiles and ids
/// without an extension are returned unchanged.
pub fn strip_extension(public_id: &str) -> &str {
    let segment_start = public_id.rfind('/').map_or(0, |i| i + 1);
    match public_id[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => &public_id[..segment_start + dot],
        _ => public_id,
    }
}

/// The id as extracted, then the extension-stripped id if it differs.
pub fn identifier_forms(public_id: &str) -> Vec<String> {
    let mut forms = vec![public_id.to_string()];
    let stripped = strip_extension(public_id);
    if stripped != public_id {
        forms.push(stripped.to_string());
    }
    forms
}
