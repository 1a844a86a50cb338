//! Regexes applied to document field names and string values

use regex::Regex;
use std::sync::OnceLock;

static MARKUP: OnceLock<Vec<Regex>> = OnceLock::new();
static PII: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
static SENSITIVE_NAMES: OnceLock<Vec<Regex>> = OnceLock::new();
static LATITUDE: OnceLock<Regex> = OnceLock::new();
static LONGITUDE: OnceLock<Regex> = OnceLock::new();
static DATE_VALUES: OnceLock<Vec<Regex>> = OnceLock::new();
static DATE_NAMES: OnceLock<Vec<Regex>> = OnceLock::new();

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

/// HTML tags, Markdown links, headers and emphasis
pub fn has_markup(text: &str) -> bool {
    MARKUP
        .get_or_init(|| {
            compile(&[
                r"<[^>]+>",
                r"\[.*?\]\(.*?\)",
                r"#{1,6}\s",
                r"\*{1,2}[^*]+\*{1,2}",
            ])
        })
        .iter()
        .any(|re| re.is_match(text))
}

/// Names of the PII kinds whose pattern occurs in `text`.
pub fn pii_kinds(text: &str) -> impl Iterator<Item = &'static str> + '_ {
    PII.get_or_init(|| {
        vec![
            (
                "email",
                Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex"),
            ),
            (
                "phone",
                Regex::new(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}")
                    .expect("valid regex"),
            ),
            (
                "ssn",
                Regex::new(r"\b\d{3}[-\s]?\d{2}[-\s]?\d{4}\b").expect("valid regex"),
            ),
            (
                "credit_card",
                Regex::new(r"\b(?:\d{4}[-\s]?){3}\d{4}\b").expect("valid regex"),
            ),
            (
                "ip_address",
                Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("valid regex"),
            ),
        ]
    })
    .iter()
    .filter(move |(_, re)| re.is_match(text))
    .map(|(kind, _)| *kind)
}

/// Field name suggesting personal or secret data. Matched against the leaf key.
pub fn is_sensitive_name(key: &str) -> bool {
    SENSITIVE_NAMES
        .get_or_init(|| {
            compile(&[
                r"(?i)^(email|e_mail|e-mail|mail)$",
                r"(?i)(password|passwd|pwd|secret|token|api_key|apikey)",
                r"(?i)(ssn|social_security|social-security)",
                r"(?i)(credit.?card|card.?number|ccn)",
                r"(?i)(phone|mobile|cell|tel|fax)",
                r"(?i)(address|street|zip|postal|city)",
                r"(?i)(birth.?date|dob|birthday|date.?of.?birth)",
                r"(?i)(driver.?license|passport|national.?id)",
                r"(?i)(salary|income|wage|compensation)",
                r"(?i)(bank|account|routing|iban|swift)",
            ])
        })
        .iter()
        .any(|re| re.is_match(key))
}

pub fn is_latitude_name(key: &str) -> bool {
    LATITUDE
        .get_or_init(|| Regex::new(r"(?i)^(lat|latitude)$").expect("valid regex"))
        .is_match(key)
}

pub fn is_longitude_name(key: &str) -> bool {
    LONGITUDE
        .get_or_init(|| Regex::new(r"(?i)^(lng|lon|long|longitude)$").expect("valid regex"))
        .is_match(key)
}

/// ISO-8601, US and EU dates, and 10 or 13 digit epoch strings
pub fn is_date_value(text: &str) -> bool {
    DATE_VALUES
        .get_or_init(|| {
            compile(&[
                r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2})?",
                r"^\d{2}/\d{2}/\d{4}$",
                r"^\d{2}-\d{2}-\d{4}$",
                r"^\d{10}(\d{3})?$",
            ])
        })
        .iter()
        .any(|re| re.is_match(text))
}

/// Field name suggesting a date or time (`created_at`, `publishedOn`, `end_date`).
///
/// Suffixes must start a word, so `format` or `weekend` do not match.
pub fn is_date_name(key: &str) -> bool {
    DATE_NAMES
        .get_or_init(|| {
            compile(&[
                r"(?i)(created|updated|modified|deleted|published|posted|submitted)[_-]?(at|on|date|time)?$",
                r"(?i)^(date|time|timestamp|datetime)",
                r"(?i)(^|[_-])(start|end|begin|finish)([_-]?(date|time))?$",
                r"(?i)(^|[_-])(date|time|at|on)$",
                r"[a-z](Date|Time|At|On)$",
            ])
        })
        .iter()
        .any(|re| re.is_match(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup() {
        assert!(has_markup("<p>Hello world</p>"));
        assert!(has_markup("see [docs](https://example.com) here"));
        assert!(has_markup("## Heading text"));
        assert!(!has_markup("plain sentence with no markup"));
    }

    #[test]
    fn test_pii_kinds() {
        let kinds: Vec<_> = pii_kinds("contact jane@example.com").collect();
        assert_eq!(kinds, vec!["email"]);
        let kinds: Vec<_> = pii_kinds("server at 192.168.10.1").collect();
        assert!(kinds.contains(&"ip_address"));
        assert_eq!(pii_kinds("nothing to see").count(), 0);
    }

    #[test]
    fn test_sensitive_names() {
        assert!(is_sensitive_name("email"));
        assert!(is_sensitive_name("api_key"));
        assert!(is_sensitive_name("phoneNumber"));
        assert!(!is_sensitive_name("title"));
        assert!(!is_sensitive_name("genre"));
    }

    #[test]
    fn test_geo_names() {
        assert!(is_latitude_name("Lat"));
        assert!(is_longitude_name("lon"));
        assert!(!is_latitude_name("plateau"));
    }

    #[test]
    fn test_date_values() {
        assert!(is_date_value("2024-01-05"));
        assert!(is_date_value("2024-01-05T10:00:00Z"));
        assert!(is_date_value("01/05/2024"));
        assert!(is_date_value("1704412800"));
        assert!(!is_date_value("hello world"));
    }

    #[test]
    fn test_date_names() {
        for name in ["created_at", "updatedAt", "release_date", "date", "end_date", "postedOn"] {
            assert!(is_date_name(name), "{} should look like a date", name);
        }
        for name in ["format", "weekend", "title", "cat", "legend"] {
            assert!(!is_date_name(name), "{} should not look like a date", name);
        }
    }
}
