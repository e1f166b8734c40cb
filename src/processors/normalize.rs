use std::sync::LazyLock;

use regex::Regex;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern compiles"));

/// Lower-cases `text`, turns every character outside `[a-z0-9]` into a
/// space and collapses the result to single-spaced words.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = NON_ALPHANUMERIC.replace_all(&lowered, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(
            normalize_text("Water LEAK on Park-Street!!  Fix it, ASAP."),
            "water leak on park street fix it asap"
        );
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   \t\n "), "");
        assert_eq!(normalize_text("?!,"), "");
    }

    #[test]
    fn test_normalize_drops_non_ascii_letters() {
        assert_eq!(normalize_text("café No.5"), "caf no 5");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_text("Garbage   not collected (3 days)");
        assert_eq!(normalize_text(&once), once);
    }
}
