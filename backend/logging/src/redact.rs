//! Log Redaction
//!
//! Scrubs Telegram bot tokens (`<bot id>:<secret>`) from strings before they
//! reach logs or chat replies. Request URLs embed the token, so transport
//! errors can carry it.

use once_cell::sync::Lazy;
use regex::Regex;

static BOT_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{5,}:[A-Za-z0-9_-]{30,}").unwrap());

/// Redacts bot tokens in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    BOT_TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_token_in_url() {
        let raw = "error sending request for url (https://api.telegram.org/bot123456789:AAH3xv-Qz9_abcdefghijklmnopqrstuvw/banChatMember)";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("AAH3xv"));
        assert!(clean.contains("/bot[REDACTED_TOKEN]/banChatMember"));
    }

    #[test]
    fn leaves_member_labels_alone() {
        let raw = "alice (ID: 123456789) has been kicked for 7 days.";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
