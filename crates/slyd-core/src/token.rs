//! Access-token helpers. The backend never echoes a full token back, only
//! the masked form produced here.

/// First 8 characters followed by `...`; tokens of 8 characters or fewer
/// only show 2.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let keep = if token.chars().count() <= 8 { 2 } else { 8 };
    let prefix: String = token.chars().take(keep).collect();
    format!("{}...", prefix)
}

/// A masked value pasted back in as if it were the real token.
pub fn looks_masked(token: &str) -> bool {
    token.contains("...") && token.len() < 20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(""), "");
        assert_eq!(mask_token("hf_abc"), "hf...");
        assert_eq!(mask_token("hf_abcdefghijklmnop"), "hf_abcde...");
    }

    #[test]
    fn test_masked_tokens_are_recognised() {
        assert!(looks_masked(&mask_token("hf_abcdefghijklmnop")));
        assert!(!looks_masked("hf_abcdefghijklmnop"));
        assert!(!looks_masked("hf_abcdefghijklmnopqrstu..."));
    }
}
