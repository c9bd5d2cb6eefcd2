//! Token resolution
//!
//! Tokens are opaque to this crate. They come from, in order: an explicit
//! value, the `GITHUB_TOKEN` or `GIST_TOKEN` environment variables, or the
//! config file.

/// Environment variables checked for a token
pub const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GIST_TOKEN"];

/// First non-empty token from the environment
pub fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Pick the effective token (explicit > environment > config)
pub fn resolve_token(explicit: Option<&str>, configured: Option<&str>) -> Option<String> {
    let clean = |t: &str| {
        let t = t.trim();
        (!t.is_empty()).then(|| t.to_string())
    };

    explicit
        .and_then(clean)
        .or_else(token_from_env)
        .or_else(|| configured.and_then(clean))
}

/// Mask a token for log output, keeping only the last four characters
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_token_wins() {
        assert_eq!(
            resolve_token(Some(" abc "), Some("cfg")),
            Some("abc".to_string())
        );
    }

    #[test]
    fn blank_explicit_token_is_skipped() {
        // Environment may or may not carry a token; the blank value never does
        let resolved = resolve_token(Some("   "), Some("cfg"));
        assert_ne!(resolved.as_deref(), Some(""));
        assert_ne!(resolved.as_deref(), Some("   "));
    }

    #[test]
    fn mask_keeps_tail() {
        assert_eq!(mask_token("ghp_123456789"), "****6789");
        assert_eq!(mask_token("abc"), "****");
    }
}
