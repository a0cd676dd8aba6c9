//! Canonical format identifiers, alias normalization, and format metadata.
//!
//! Every file format the service knows about has exactly one canonical
//! lowercase identifier and zero or more accepted aliases. Normalization is a
//! pure, total function: unrecognized strings pass through trimmed and
//! lower-cased so that "unsupported format" is reported uniformly by the
//! registry lookup, never here.

/// Alias table: canonical identifier first, accepted aliases after it.
const FORMAT_ALIASES: &[(&str, &[&str])] = &[
    ("heif", &["heic"]),
    ("jpeg", &["jpg"]),
    ("tiff", &["tif"]),
];

/// Generic MIME type for formats without a table entry.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Resolves a user-supplied format string to its canonical identifier.
///
/// Trims surrounding whitespace and lower-cases; known aliases map to their
/// canonical identifier, anything else passes through unchanged. Idempotent.
pub fn canonical_format(raw: &str) -> String {
    let normalized = raw.trim().to_ascii_lowercase();
    for (canonical, aliases) in FORMAT_ALIASES {
        if normalized == *canonical || aliases.contains(&normalized.as_str()) {
            return (*canonical).to_string();
        }
    }
    normalized
}

/// Returns the canonical identifier followed by its aliases.
///
/// A format without aliases yields just its canonical identifier.
pub fn aliases_for(format: &str) -> Vec<String> {
    let canonical = canonical_format(format);
    let mut output = vec![canonical.clone()];
    for (name, aliases) in FORMAT_ALIASES {
        if *name == canonical {
            output.extend(aliases.iter().map(|a| (*a).to_string()));
        }
    }
    output
}

/// Maps a format to its MIME type, falling back to a generic binary type.
pub fn mime_type(format: &str) -> &'static str {
    match canonical_format(format).as_str() {
        "avif" => "image/avif",
        "gif" => "image/gif",
        "heif" => "image/heif",
        "jpeg" => "image/jpeg",
        "png" => "image/png",
        "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => OCTET_STREAM,
    }
}

/// Derives the output file name: original base name with the extension
/// replaced by the target format. Blank input falls back to `converted`.
pub fn output_file_name(input_file_name: &str, target_format: &str) -> String {
    let trimmed = input_file_name.trim();
    if trimmed.is_empty() {
        return format!("converted.{target_format}");
    }

    let base = match trimmed.rfind('.') {
        Some(index) => &trimmed[..index],
        None => trimmed,
    };
    let base = if base.is_empty() { "converted" } else { base };

    format!("{base}.{target_format}")
}
