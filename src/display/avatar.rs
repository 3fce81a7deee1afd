//! Avatar resolution.

/// Strings longer than this with no recognised prefix are bare base64 data.
const BARE_BASE64_MIN_LEN: usize = 50;

/// Turn a stored avatar value into something displayable.
///
/// `data:` and `http(s)` URLs pass through, `uploads/...` paths are served by
/// the API host, long unprefixed strings are base64 PNG data, and anything
/// else passes through unchanged.
pub fn resolve_avatar(avatar: Option<&str>, base_url: &str) -> Option<String> {
    let avatar = avatar?.trim();
    if avatar.is_empty() {
        return None;
    }

    if avatar.starts_with("data:") || avatar.starts_with("http") {
        return Some(avatar.to_string());
    }

    if avatar.starts_with("uploads/") {
        return Some(format!("{}/{}", base_url.trim_end_matches('/'), avatar));
    }

    if avatar.len() > BARE_BASE64_MIN_LEN {
        return Some(format!("data:image/png;base64,{avatar}"));
    }

    Some(avatar.to_string())
}

/// Up to two uppercase initials of `name`; `U` when there is no name.
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "U".to_string()
    } else {
        initials
    }
}
