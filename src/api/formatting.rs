//! Display formatting for plant and location data
//!
//! Pure helpers used by views: distances, coordinates, HP, dates and avatar
//! URLs.

use chrono::{DateTime, NaiveDateTime, Utc};
use url::Url;

const DICEBEAR_THUMBS_URL: &str = "https://api.dicebear.com/9.x/thumbs/svg";
const DICEBEAR_GLASS_URL: &str = "https://api.dicebear.com/9.x/glass/svg";
const EMPTY_SEED: &str = "empty-seed";

/// Distances of 1 km and up in km with one decimal, otherwise meters with two
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{:.2} m", meters)
    }
}

/// e.g. `51.501°N, 0.124°W`
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let lat_direction = if latitude >= 0.0 { 'N' } else { 'S' };
    let lon_direction = if longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.3}°{}, {:.3}°{}",
        latitude.abs(),
        lat_direction,
        longitude.abs(),
        lon_direction
    )
}

pub fn format_hp(hp: f64) -> String {
    format!("{}", hp.round() as i64)
}

/// Uppercase the first character, leaving the rest untouched
pub fn sentence_case(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a backend timestamp. Offsets are honoured; naive times are UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `dd/MM/yy` in UTC, `Unknown` when absent, `Invalid date` when unparsable
pub fn format_plant_date(value: Option<&str>) -> String {
    match value {
        None => "Unknown".to_string(),
        Some(raw) if raw.is_empty() => "Unknown".to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(date) => date.format("%d/%m/%y").to_string(),
            None => "Invalid date".to_string(),
        },
    }
}

/// Human distance between two instants, e.g. "3 hours ago" or "in 2 days"
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let seconds = delta.num_seconds().abs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let span = if seconds < 30 {
        "less than a minute".to_string()
    } else if minutes < 2 {
        "1 minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if hours < 24 {
        format!("about {} hours", hours)
    } else if hours < 42 {
        "1 day".to_string()
    } else if days < 30 {
        format!("{} days", days)
    } else if days < 365 {
        let months = (days / 30).max(1);
        if months == 1 {
            "about 1 month".to_string()
        } else {
            format!("{} months", months)
        }
    } else {
        let years = days / 365;
        if years == 1 {
            "about 1 year".to_string()
        } else {
            format!("about {} years", years)
        }
    };

    if delta.num_seconds() >= 0 {
        format!("{} ago", span)
    } else {
        format!("in {}", span)
    }
}

fn avatar_url(base: &str, seed: Option<&str>, extra: &[(&str, &str)]) -> String {
    let seed = seed.filter(|s| !s.is_empty());
    let mut url = match Url::parse(base) {
        Ok(url) => url,
        Err(_) => return base.to_string(),
    };
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("seed", seed.unwrap_or(EMPTY_SEED));
        for (key, value) in extra {
            query.append_pair(key, value);
        }
    }
    url.to_string()
}

/// Plant avatar; rotated unless it is the empty placeholder
pub fn dicebear_thumbs_url(seed: Option<&str>) -> String {
    match seed.filter(|s| !s.is_empty()) {
        Some(seed) => avatar_url(
            DICEBEAR_THUMBS_URL,
            Some(seed),
            &[("backgroundColor", "transparent"), ("shapeRotation", "-20")],
        ),
        None => avatar_url(DICEBEAR_THUMBS_URL, None, &[("backgroundColor", "transparent")]),
    }
}

/// User avatar
pub fn dicebear_glass_url(seed: Option<&str>) -> String {
    avatar_url(DICEBEAR_GLASS_URL, seed, &[])
}
