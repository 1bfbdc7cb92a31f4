//! Phone number helpers shared by the dispatch loop and the conversation viewer.

/// Country code prepended to numbers typed without one (Brazil).
pub const DEFAULT_COUNTRY_CODE: &str = "55";

/// Strip everything that is not an ASCII digit.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Clean a phone number for the messaging API.
///
/// Keeps only digits and prefixes `country_code` unless the number already
/// starts with it. Returns `None` when nothing dialable is left.
///
/// ```
/// use painel_types::phone::normalize_phone;
///
/// assert_eq!(normalize_phone("(87) 99205-2920", "55").as_deref(), Some("5587992052920"));
/// assert_eq!(normalize_phone("+55 87 99205-2920", "55").as_deref(), Some("5587992052920"));
/// assert_eq!(normalize_phone("sem telefone", "55"), None);
/// ```
pub fn normalize_phone(raw: &str, country_code: &str) -> Option<String> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with(country_code) {
        Some(digits)
    } else {
        Some(format!("{country_code}{digits}"))
    }
}

/// Extract the phone part of a chat-agent session id.
///
/// Session ids look like `5587992052920@s.whatsapp.net`, sometimes with a
/// `_buffer` suffix for the agent's debounce buffer.
pub fn phone_from_session_id(session_id: &str) -> String {
    session_id
        .replacen("_buffer", "", 1)
        .replacen("@s.whatsapp.net", "", 1)
}

/// Loose equality of two phone numbers, tolerant of a missing country or
/// area code on either side.
///
/// Both sides are reduced to digits; they match when one ends with the
/// other. A side with no digits never matches.
pub fn phones_match(a: &str, b: &str) -> bool {
    let a = digits_only(a);
    let b = digits_only(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.ends_with(&b) || b.ends_with(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_country_code() {
        assert_eq!(normalize_phone("87 9205-2920", "55").unwrap(), "558792052920");
    }

    #[test]
    fn test_normalize_keeps_existing_country_code() {
        assert_eq!(normalize_phone("5587992052920", "55").unwrap(), "5587992052920");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_phone("", "55"), None);
        assert_eq!(normalize_phone("---", "55"), None);
    }

    #[test]
    fn test_session_id_parsing() {
        assert_eq!(phone_from_session_id("5587992052920@s.whatsapp.net"), "5587992052920");
        assert_eq!(
            phone_from_session_id("5587992052920@s.whatsapp.net_buffer"),
            "5587992052920"
        );
        assert_eq!(phone_from_session_id("5587992052920_buffer"), "5587992052920");
        assert_eq!(phone_from_session_id("plain"), "plain");
    }

    #[test]
    fn test_phones_match_suffix_either_way() {
        assert!(phones_match("5587920529200", "87920529200"));
        assert!(phones_match("(87) 92052-9200", "5587920529200"));
        assert!(phones_match("87920529200", "87920529200"));
        assert!(!phones_match("5587920529200", "87920529201"));
    }

    #[test]
    fn test_phones_match_empty_never_matches() {
        assert!(!phones_match("5587920529200", "n/a"));
        assert!(!phones_match("", ""));
    }
}
