//! Image URL sanitization
//!
//! Image targets come from authored content and may be pasted from
//! anywhere; only a small set of protocols is allowed through to the
//! rendered output.

const ALLOWED_PROTOCOLS: [&str; 4] = ["http:", "https:", "web+graphie:", "data:image/"];

/// Return the url if it uses an allowed protocol (or is relative),
/// otherwise `None`.
pub fn sanitize_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_ascii_lowercase();
    match lowered.find(':') {
        None => Some(trimmed.to_string()),
        Some(_) => {
            if ALLOWED_PROTOCOLS
                .iter()
                .any(|proto| lowered.starts_with(proto))
            {
                Some(trimmed.to_string())
            } else {
                None
            }
        }
    }
}
