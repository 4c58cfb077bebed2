//! Locale configuration of the wiki whose pages are parsed.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Everything locale-specific the parser needs to recognize signatures.
///
/// All fields have defaults describing an English-language wiki running
/// on UTC, so a JSON file only needs the fields that differ.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Date format in MediaWiki `sprintfDate` syntax, e.g. `H:i, j F Y`.
    pub date_format: String,
    /// Localized digits 0-9 as a 10-character string, if not ASCII.
    pub digits: Option<String>,
    /// IANA name of the wiki's local timezone.
    pub local_timezone: String,
    /// Localized timezone abbreviation -> canonical abbreviation.
    pub timezones: BTreeMap<String, String>,
    /// Maximum characters of text to scan backwards for a signature link.
    pub signature_scan_limit: usize,
    pub namespace_ids: NamespaceIds,
    /// Lowercase namespace prefix (localized names and aliases) -> id.
    pub namespace_names: BTreeMap<String, i32>,
    /// Canonical name of Special:Contributions in this language.
    pub special_contributions_name: String,
    /// Article path with a `$1` placeholder, e.g. `/wiki/$1`.
    pub article_path: String,
    /// Element ids whose subtrees never contain comments.
    pub skip_ids: Vec<String>,
    /// Text inserted before the `~~~~` of an automatic signature.
    pub signature_prefix: String,
    pub messages: DateMessages,
}

/// Namespace numbers that identify user links.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct NamespaceIds {
    pub user: i32,
    pub user_talk: i32,
    pub special: i32,
}

/// Localized names used by the date format directives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DateMessages {
    /// `F`: full month names, January first.
    pub months: Vec<String>,
    /// `xg`: genitive month names.
    pub months_genitive: Vec<String>,
    /// `M`: abbreviated month names.
    pub months_short: Vec<String>,
    /// `l`: full weekday names, Sunday first.
    pub weekdays: Vec<String>,
    /// `D`: abbreviated weekday names.
    pub weekdays_short: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            date_format: "H:i, j F Y".to_string(),
            digits: None,
            local_timezone: "UTC".to_string(),
            timezones: BTreeMap::from([("UTC".to_string(), "UTC".to_string())]),
            signature_scan_limit: 100,
            namespace_ids: NamespaceIds::default(),
            namespace_names: BTreeMap::from([
                ("user".to_string(), 2),
                ("user talk".to_string(), 3),
                ("special".to_string(), -1),
                ("talk".to_string(), 1),
                ("template".to_string(), 10),
                ("wikipedia".to_string(), 4),
            ]),
            special_contributions_name: "Contributions".to_string(),
            article_path: "/wiki/$1".to_string(),
            skip_ids: vec!["toc".to_string()],
            signature_prefix: " ".to_string(),
            messages: DateMessages::default(),
        }
    }
}

impl Default for NamespaceIds {
    fn default() -> Self {
        Self {
            user: 2,
            user_talk: 3,
            special: -1,
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for DateMessages {
    fn default() -> Self {
        let months = strings(&[
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ]);
        Self {
            months_genitive: months.clone(),
            months,
            months_short: strings(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            weekdays: strings(&[
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]),
            weekdays_short: strings(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
        }
    }
}
