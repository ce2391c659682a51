use infer::Infer;

const GENERIC_BINARY: &str = "application/octet-stream";

/// Resolves the MIME type to validate an upload against.
///
/// The type the client declared wins. Only when nothing useful was declared
/// is the payload's magic number consulted.
pub fn resolve_content_type(declared: Option<&str>, payload: &[u8]) -> Option<String> {
    let declared = declared
        .and_then(|d| d.split(';').next())
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty() && d != GENERIC_BINARY);

    declared.or_else(|| {
        Infer::new()
            .get(payload)
            .map(|kind| kind.mime_type().to_string())
    })
}

pub fn is_allowed(content_type: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(content_type))
}
