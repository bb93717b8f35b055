//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// `max_len` counts bytes; the cut always lands on a character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Lowercased alphanumeric words of at least `min_len` bytes.
pub fn keywords(s: &str, min_len: usize) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= min_len)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("/cart", 10), "/cart");
        assert_eq!(truncate("200 OK :: {\"items\": []}", 8), "200 O...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "é" is two bytes; the cut must not split it
        assert_eq!(truncate("café crème brûlée", 7), "caf...");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            keywords("Add a product to the cart!", 3),
            vec!["add", "product", "the", "cart"]
        );
        assert!(keywords("a b c", 2).is_empty());
    }
}
