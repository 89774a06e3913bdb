use chrono::{DateTime, Local, NaiveDateTime};

// Local time, no offset. Fraction is only written when non-zero.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// Forms found in documents written by older versions of the blog
const LEGACY_FORMATS: [&str; 2] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
];

pub fn format_date_time(date_time: &NaiveDateTime) -> String {
    date_time.format(DATE_TIME_FORMAT).to_string()
}

/// Timestamps without an offset are taken as local time. The ones carrying an
/// offset are converted to local time.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    let buf = buf.trim();

    if let Ok(date_time) = NaiveDateTime::parse_from_str(buf, DATE_TIME_FORMAT) {
        return Ok(date_time);
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(buf) {
        return Ok(date_time.with_timezone(&Local).naive_local());
    }

    LEGACY_FORMATS.iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(buf, fmt).ok())
        .ok_or_else(|| format!("Unable to parse date time {}", buf))
}

pub fn slug_from_title(title: &str) -> String {
    let ascii_title = unidecode::unidecode(title);

    let mut slug = String::new();
    for c in ascii_title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if matches!(c, ' ' | '-' | '_') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}
