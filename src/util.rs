use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// `local@domain.tld` with no whitespace and exactly one `@` per side.
fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"))
}

/// Basic shape check for an email address. Not RFC 5322; rejects only the
/// obviously malformed.
pub fn is_valid_email(email: &str) -> bool {
    email_shape().is_match(email)
}

/// Canonical form used as the lead's business key.
///
/// Example: "  Sarah.Chen@Acme.COM " → "sarah.chen@acme.com"
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Convert text to a URL-safe kebab-case slug.
///
/// Accents are folded (NFKD, combining marks dropped) so "Café Ops" becomes
/// "cafe-ops". Every run of non `[a-z0-9]` characters collapses to a single
/// hyphen and leading/trailing hyphens are trimmed.
///
/// Example: "Acme Corp" → "acme-corp"
pub fn slugify(name: &str) -> String {
    name.nfkd()
        .filter(|c| c.is_ascii() || !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

/// Trim a string and map empty to `None`.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
