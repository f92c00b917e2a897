use serde::{de, Deserialize, Deserializer};

/// Auto-incrementing row identifier shared by proxies, endpoints and example schemas
pub type Id = i64;

/// Parse a status code string into its numeric value.
///
/// Non-numeric codes yield `None` and sort after every numeric code.
pub fn numeric_status(status_code: &str) -> Option<u32> {
    let trimmed = status_code.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Ordering key for example schemas: numeric status ascending (non-numeric last),
/// then identifier descending so the newest row for a status comes first.
pub fn status_order_key(status_code: &str, id: Id) -> (bool, u32, std::cmp::Reverse<Id>) {
    match numeric_status(status_code) {
        Some(code) => (false, code, std::cmp::Reverse(id)),
        None => (true, 0, std::cmp::Reverse(id)),
    }
}

/// Accept an identifier given either as a JSON integer or as a numeric string
pub fn deserialize_integer_like<'de, D>(deserializer: D) -> Result<Id, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntegerLike {
        Number(Id),
        Text(String),
    }

    match IntegerLike::deserialize(deserializer)? {
        IntegerLike::Number(id) => Ok(id),
        IntegerLike::Text(text) => text
            .trim()
            .parse::<Id>()
            .map_err(|_| de::Error::custom(format!("'{}' is not an integer identifier", text))),
    }
}
