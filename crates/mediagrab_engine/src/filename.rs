use sha2::{Digest, Sha256};

/// Deterministic, Windows-safe filename for a saved asset:
/// `{sanitized_stem}--{short_hash(url)}.{ext}`.
///
/// The URL hash keeps names from distinct assets apart even when their stems
/// collide; the extension is supplied by the caller from the media type.
pub fn media_filename(stem: Option<&str>, url: &str, ext: &str) -> String {
    format!(
        "{}--{}.{ext}",
        sanitize_stem(stem.unwrap_or("media")),
        short_hash(url)
    )
}

fn sanitize_stem(input: &str) -> String {
    // Map forbidden characters to '_', collapsing runs as they appear.
    let mut mapped = String::with_capacity(input.len());
    let mut run_of_underscores = false;
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && run_of_underscores {
            continue;
        }
        run_of_underscores = c == '_';
        mapped.push(c);
    }

    let mut name = mapped.trim_matches(&['_', ' ', '.'][..]).to_string();
    if name.is_empty() {
        name = "media".to_string();
    }
    if name.len() > 80 {
        name.truncate(80);
    }
    if is_reserved_windows_name(&name) {
        name.push('_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

fn is_reserved_windows_name(name: &str) -> bool {
    const DEVICES: [&str; 4] = ["CON", "PRN", "AUX", "NUL"];
    if DEVICES.iter().any(|device| device.eq_ignore_ascii_case(name)) {
        return true;
    }
    let upper = name.to_ascii_uppercase();
    (upper.starts_with("COM") || upper.starts_with("LPT"))
        && upper.len() == 4
        && matches!(upper.as_bytes()[3], b'1'..=b'9')
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect()
}
