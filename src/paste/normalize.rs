use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Sentinel author for guests and placeholder names
pub const DEFAULT_AUTHOR: &str = "A Guest";

/// Sentinel title for missing and placeholder titles
pub const DEFAULT_TITLE: &str = "Untitled";

/// Author values the site uses when nobody is logged in
const AUTHOR_PLACEHOLDERS: &[&str] = &["", "Unknown", "Anonymous", DEFAULT_AUTHOR];

/// Title values the site uses when the paste has no name
const TITLE_PLACEHOLDERS: &[&str] = &["", "Unknown", DEFAULT_TITLE];

/// Suffix the site appends to every `<title>`
const SITE_TITLE_SUFFIX: &str = "- Pastebin.com";

/// Local date layouts, tried in order, after the zone abbreviation, the
/// `of` filler and the ordinal suffix have been removed
const LOCAL_FORMATS: &[&str] = &["%A %d %B %Y %I:%M:%S %p", "%A %B %d %Y %I:%M:%S %p"];

/// A zone abbreviation the site emits, resolved to its IANA zone
struct ZoneAbbreviation {
    abbreviation: &'static str,
    zone: Tz,
    /// Picks the daylight instant when a local time is ambiguous
    daylight: bool,
}

const ZONE_ABBREVIATIONS: &[ZoneAbbreviation] = &[
    ZoneAbbreviation {
        abbreviation: "CDT",
        zone: chrono_tz::America::Chicago,
        daylight: true,
    },
    ZoneAbbreviation {
        abbreviation: "CST",
        zone: chrono_tz::America::Chicago,
        daylight: false,
    },
];

/// Errors produced while normalizing a paste date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("Date '{0}' does not match the expected format")]
    Malformed(String),

    #[error("Unknown timezone abbreviation '{0}'")]
    UnknownTimezone(String),

    #[error("Local time '{0}' does not exist in its timezone")]
    NonexistentLocalTime(String),
}

/// Normalizes the site's date string to a UTC timestamp
///
/// The expected shape is `Tuesday 21st of June 2022 10:15:32 AM CDT`. The
/// `of` filler and the ordinal suffix are optional, and the month may come
/// before the day. The trailing abbreviation must be one of the known zone
/// abbreviations; anything else is rejected rather than guessed.
///
/// # Examples
///
/// ```
/// use paste_crawler::paste::normalize_date;
///
/// let date = normalize_date("Tuesday 21st of June 2022 10:15:32 AM CDT").unwrap();
/// assert_eq!(date.to_rfc3339(), "2022-06-21T15:15:32+00:00");
/// ```
pub fn normalize_date(raw: &str) -> Result<DateTime<Utc>, DateParseError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let (abbreviation, rest) = tokens
        .split_last()
        .ok_or_else(|| DateParseError::Malformed(raw.to_string()))?;

    if rest.is_empty() {
        return Err(DateParseError::Malformed(raw.to_string()));
    }

    let zone = ZONE_ABBREVIATIONS
        .iter()
        .find(|z| z.abbreviation == *abbreviation)
        .ok_or_else(|| DateParseError::UnknownTimezone(abbreviation.to_string()))?;

    let local = rest
        .iter()
        .filter(|token| !token.eq_ignore_ascii_case("of"))
        .map(|token| strip_ordinal(token))
        .collect::<Vec<_>>()
        .join(" ");

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&local, format).ok())
        .ok_or_else(|| DateParseError::Malformed(raw.to_string()))?;

    let candidates = zone.zone.from_local_datetime(&naive);
    let resolved = if zone.daylight {
        candidates.earliest()
    } else {
        candidates.latest()
    };

    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| DateParseError::NonexistentLocalTime(raw.to_string()))
}

/// `21st` -> `21`; tokens that do not start with a digit are left alone
fn strip_ordinal(token: &str) -> &str {
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        token.trim_end_matches(|c: char| c.is_ascii_alphabetic())
    } else {
        token
    }
}

/// Normalizes an author name, collapsing guests and placeholders to `A Guest`
///
/// # Examples
///
/// ```
/// use paste_crawler::paste::normalize_author;
///
/// assert_eq!(normalize_author("  Anonymous "), "A Guest");
/// assert_eq!(normalize_author("jdoe"), "jdoe");
/// ```
pub fn normalize_author(raw: &str) -> String {
    let author = raw.trim();
    if AUTHOR_PLACEHOLDERS.contains(&author) {
        DEFAULT_AUTHOR.to_string()
    } else {
        author.to_string()
    }
}

/// Normalizes a page title, dropping the site suffix and collapsing
/// placeholders to `Untitled`
///
/// # Examples
///
/// ```
/// use paste_crawler::paste::normalize_title;
///
/// assert_eq!(normalize_title("My Paste - Pastebin.com"), "My Paste");
/// ```
pub fn normalize_title(raw: &str) -> String {
    let title = raw.trim();
    let title = title.strip_suffix(SITE_TITLE_SUFFIX).unwrap_or(title).trim();
    if TITLE_PLACEHOLDERS.contains(&title) {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}
