use std::time::SystemTime;

/// Turns a slug such as `landing_page` into `Landing page`.
pub fn humanize_slug(slug: &str) -> String {
    let spaced = slug.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_slug() {
        assert_eq!(humanize_slug("page"), "Page");
        assert_eq!(humanize_slug("landing_page"), "Landing page");
        assert_eq!(humanize_slug("case-study"), "Case study");
        assert_eq!(humanize_slug(""), "");
    }
}
