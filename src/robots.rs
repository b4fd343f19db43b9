//! Parse robots.txt sitemap declarations.

/// Extract `Sitemap:` declarations from a robots.txt body.
///
/// The key is matched case-insensitively and the value is everything
/// after the first colon, trimmed, so sitemap URLs containing colons
/// survive intact. Order of appearance is preserved; duplicates are the
/// caller's concern.
pub fn sitemap_declarations(txt: &str) -> Vec<String> {
    let mut out = Vec::new();

    for line in txt.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if !key.trim().eq_ignore_ascii_case("sitemap") {
            continue;
        }

        let value = value.trim();
        if !value.is_empty() {
            out.push(value.to_string());
        }
    }

    out
}
