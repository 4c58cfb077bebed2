//! Locale-aware timestamp detection and parsing.
//!
//! A MediaWiki date format (`sprintfDate` syntax, e.g. `H:i, j F Y`) is
//! compiled into a regular expression with one capture group per date
//! directive, followed by the ` (TZ)` suffix every signature carries. The
//! same format drives [`TimestampParser`], which turns the captured groups
//! back into a UTC instant.

use std::collections::BTreeMap;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use threadscribe_core::{
    DateMessages, LocaleConfig, MarkupNode, NodeType, ParseError, Timestamp, TimestampWarning,
};

/// A date format directive that captures part of the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `d`: day of month, two digits.
    Day2,
    /// `j`: day of month, one or two digits.
    Day,
    /// `D`: abbreviated weekday name (ignored when parsing).
    WeekdayShort,
    /// `l`: full weekday name (ignored when parsing).
    Weekday,
    /// `F`: full month name.
    Month,
    /// `xg`: genitive month name.
    MonthGenitive,
    /// `M`: abbreviated month name.
    MonthShort,
    /// `n`: month number.
    MonthNumber,
    /// `Y`: four-digit year.
    Year,
    /// `xkY`: Thai solar calendar year.
    ThaiYear,
    /// `G`: hour, one or two digits.
    Hour,
    /// `H`: hour, two digits.
    Hour2,
    /// `i`: minute, two digits.
    Minute,
}

impl Directive {
    fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "d" => Directive::Day2,
            "j" => Directive::Day,
            "D" => Directive::WeekdayShort,
            "l" => Directive::Weekday,
            "F" => Directive::Month,
            "xg" => Directive::MonthGenitive,
            "M" => Directive::MonthShort,
            "n" => Directive::MonthNumber,
            "Y" => Directive::Year,
            "xkY" => Directive::ThaiYear,
            "G" => Directive::Hour,
            "H" => Directive::Hour2,
            "i" => Directive::Minute,
            _ => return None,
        })
    }

    /// Repetition count for numeric directives.
    fn digit_count(self) -> Option<&'static str> {
        match self {
            Directive::Day2 | Directive::Hour2 | Directive::Minute => Some("2"),
            Directive::Day | Directive::MonthNumber | Directive::Hour => Some("1,2"),
            Directive::Year | Directive::ThaiYear => Some("4"),
            _ => None,
        }
    }

    fn names(self, messages: &DateMessages) -> Option<&[String]> {
        match self {
            Directive::WeekdayShort => Some(&messages.weekdays_short),
            Directive::Weekday => Some(&messages.weekdays),
            Directive::Month => Some(&messages.months),
            Directive::MonthGenitive => Some(&messages.months_genitive),
            Directive::MonthShort => Some(&messages.months_short),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Directive(Directive),
}

/// Split a date format into literals and directives.
fn tokenize(format: &str) -> Vec<Token> {
    let chars: Vec<char> = format.chars().collect();
    let mut tokens = Vec::new();
    let mut p = 0;
    while p < chars.len() {
        let mut code = chars[p].to_string();
        if code == "x" && p + 1 < chars.len() {
            p += 1;
            code.push(chars[p]);
        }
        if code == "xk" && p + 1 < chars.len() {
            p += 1;
            code.push(chars[p]);
        }

        if let Some(directive) = Directive::from_code(&code) {
            tokens.push(Token::Directive(directive));
        } else {
            match code.as_str() {
                "xx" => tokens.push(Token::Literal("x".to_string())),
                "\\" => {
                    if p + 1 < chars.len() {
                        p += 1;
                        tokens.push(Token::Literal(chars[p].to_string()));
                    } else {
                        tokens.push(Token::Literal("\\".to_string()));
                    }
                }
                "\"" => {
                    // An unterminated quote is a literal quote character.
                    match chars[p + 1..].iter().position(|&c| c == '"') {
                        Some(offset) => {
                            let end = p + 1 + offset;
                            tokens.push(Token::Literal(chars[p + 1..end].iter().collect()));
                            p = end;
                        }
                        _ => tokens.push(Token::Literal("\"".to_string())),
                    }
                }
                // Unknown codes fall through as their last character.
                _ => tokens.push(Token::Literal(chars[p].to_string())),
            }
        }
        p += 1;
    }
    tokens
}

fn alternation<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let escaped: Vec<String> = names.into_iter().map(regex::escape).collect();
    format!("({})", escaped.join("|"))
}

/// Regex fragment matching a single digit: `[0-9]`, or a class of the
/// localized digits.
pub fn digit_pattern(digits: Option<&str>) -> String {
    match digits {
        Some(digits) => {
            let class: String = digits
                .chars()
                .map(|c| regex::escape(&c.to_string()))
                .collect();
            format!("[{class}]")
        }
        None => "[0-9]".to_string(),
    }
}

/// Compile a date format into a regular expression source string.
///
/// Every directive becomes one capture group, in order; the last group
/// captures the timezone abbreviation, drawn from `abbreviations`.
pub fn compile_pattern<'a>(
    format: &str,
    digit_pattern: &str,
    abbreviations: impl IntoIterator<Item = &'a str>,
    messages: &DateMessages,
) -> String {
    let mut pattern = String::new();
    for token in tokenize(format) {
        match token {
            Token::Literal(text) => pattern.push_str(&regex::escape(&text)),
            Token::Directive(directive) => {
                if let Some(count) = directive.digit_count() {
                    pattern.push_str(&format!("({digit_pattern}{{{count}}})"));
                } else if let Some(names) = directive.names(messages) {
                    pattern.push_str(&alternation(names.iter().map(String::as_str)));
                }
            }
        }
    }
    // Invisible bidi marks often sneak into copy-pasted timestamps.
    pattern.push_str(r"[\x{200E}\x{200F}]? [\x{200E}\x{200F}]?\(");
    pattern.push_str(&alternation(abbreviations));
    pattern.push_str(r"\)");
    pattern
}

/// Turns the capture groups of a compiled timestamp pattern back into a
/// UTC instant.
#[derive(Debug, Clone)]
pub struct TimestampParser {
    directives: Vec<Directive>,
    digits: Option<Vec<char>>,
    timezone: Tz,
    abbreviations: BTreeMap<String, String>,
    messages: DateMessages,
}

impl TimestampParser {
    pub fn new(
        format: &str,
        digits: Option<&str>,
        local_timezone: &str,
        abbreviations: BTreeMap<String, String>,
        messages: DateMessages,
    ) -> Result<Self, ParseError> {
        let timezone: Tz = local_timezone
            .parse()
            .map_err(|_| ParseError::InvalidConfig(format!("unknown timezone: {local_timezone}")))?;
        let directives = tokenize(format)
            .into_iter()
            .filter_map(|token| match token {
                Token::Directive(directive) => Some(directive),
                Token::Literal(_) => None,
            })
            .collect();
        Ok(Self {
            directives,
            digits: digits.map(|d| d.chars().collect()),
            timezone,
            abbreviations,
            messages,
        })
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    fn untransform_digits(&self, text: &str) -> String {
        match &self.digits {
            Some(digits) => text
                .chars()
                .map(|c| match digits.iter().position(|&d| d == c) {
                    Some(i) => char::from_digit(i as u32, 10).unwrap_or(c),
                    None => c,
                })
                .collect(),
            None => text.to_string(),
        }
    }

    fn number(&self, directive: Directive, text: &str) -> Result<i32, ParseError> {
        self.untransform_digits(text)
            .parse()
            .map_err(|_| ParseError::MalformedTimestamp(format!("{directive:?}: {text:?}")))
    }

    fn name_index(&self, directive: Directive, text: &str) -> Result<i32, ParseError> {
        directive
            .names(&self.messages)
            .and_then(|names| names.iter().position(|name| name == text))
            .map(|i| i as i32)
            .ok_or_else(|| ParseError::MalformedTimestamp(format!("{directive:?}: {text:?}")))
    }

    /// Parse the capture groups of a match (group 1 onwards). The final
    /// group is the timezone abbreviation.
    pub fn parse(&self, groups: &[Option<String>]) -> Result<Timestamp, ParseError> {
        let (mut year, mut month, mut day, mut hour, mut minute) = (0, 0, 0, 0, 0);

        for (i, &directive) in self.directives.iter().enumerate() {
            let text = groups
                .get(i)
                .and_then(|g| g.as_deref())
                .ok_or_else(|| ParseError::MalformedTimestamp(format!("missing {directive:?}")))?;
            match directive {
                Directive::Day | Directive::Day2 => day = self.number(directive, text)?,
                Directive::Weekday | Directive::WeekdayShort => {}
                Directive::Month | Directive::MonthGenitive | Directive::MonthShort => {
                    month = self.name_index(directive, text)?;
                }
                Directive::MonthNumber => month = self.number(directive, text)? - 1,
                Directive::Year => year = self.number(directive, text)?,
                Directive::ThaiYear => year = self.number(directive, text)? - 543,
                Directive::Hour | Directive::Hour2 => hour = self.number(directive, text)?,
                Directive::Minute => minute = self.number(directive, text)?,
            }
        }

        let captured = groups.last().and_then(|g| g.as_deref()).unwrap_or_default();
        let expected = self.abbreviations.get(captured).map(String::as_str);

        let date = u32::try_from(month + 1)
            .ok()
            .zip(u32::try_from(day).ok())
            .and_then(|(m, d)| NaiveDate::from_ymd_opt(year, m, d));
        let time = u32::try_from(hour)
            .ok()
            .zip(u32::try_from(minute).ok())
            .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0));
        let (Some(date), Some(time)) = (date, time) else {
            return Err(ParseError::InvalidDate(format!(
                "{year:04}-{:02}-{day:02} {hour:02}:{minute:02}",
                month + 1
            )));
        };

        self.resolve(NaiveDateTime::new(date, time), expected)
    }

    /// Resolve a local wall-clock time, using the captured abbreviation to
    /// pick between the two instants of a DST fall-back hour.
    fn resolve(&self, local: NaiveDateTime, expected: Option<&str>) -> Result<Timestamp, ParseError> {
        let matches = |dt: &DateTime<Tz>| Some(dt.offset().to_string().as_str()) == expected;

        let (earlier, later) = match self.timezone.from_local_datetime(&local) {
            LocalResult::Single(dt) => (dt, dt),
            LocalResult::Ambiguous(earlier, later) => (earlier, later),
            LocalResult::None => {
                // Skipped by a spring-forward transition; move past the gap.
                let dt = self
                    .timezone
                    .from_local_datetime(&(local + TimeDelta::hours(1)))
                    .earliest()
                    .ok_or_else(|| ParseError::InvalidDate(local.to_string()))?;
                (dt, dt)
            }
        };

        if matches(&earlier) {
            return Ok(Timestamp::new(earlier.with_timezone(&Utc)));
        }
        let warning = if matches(&later) {
            log::debug!("ambiguous local time {local} resolved to the later instant");
            TimestampWarning::AmbiguousDst
        } else {
            TimestampWarning::WrongAbbreviation
        };
        Ok(Timestamp {
            instant: later.with_timezone(&Utc),
            warning: Some(warning),
        })
    }
}

/// A timestamp found in text. Offsets are in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampMatch {
    pub start: usize,
    pub end: usize,
    /// Capture groups 1.., the last one being the timezone abbreviation.
    pub groups: Vec<Option<String>>,
}

/// Compiled timestamp regex plus its parser.
#[derive(Debug, Clone)]
pub struct TimestampMatcher {
    regex: Regex,
    parser: TimestampParser,
}

impl TimestampMatcher {
    pub fn new(config: &LocaleConfig) -> Result<Self, ParseError> {
        if config.timezones.is_empty() {
            return Err(ParseError::InvalidConfig(
                "no timezone abbreviations configured".to_string(),
            ));
        }
        let pattern = compile_pattern(
            &config.date_format,
            &digit_pattern(config.digits.as_deref()),
            config.timezones.keys().map(String::as_str),
            &config.messages,
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| ParseError::InvalidConfig(format!("timestamp pattern: {e}")))?;
        let parser = TimestampParser::new(
            &config.date_format,
            config.digits.as_deref(),
            &config.local_timezone,
            config.timezones.clone(),
            config.messages.clone(),
        )?;
        Ok(Self { regex, parser })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// First timestamp in `text`.
    pub fn find(&self, text: &str) -> Option<TimestampMatch> {
        let caps = self.regex.captures(text)?;
        let whole = caps.get(0)?;
        let start = text[..whole.start()].chars().count();
        Some(TimestampMatch {
            start,
            end: start + whole.as_str().chars().count(),
            groups: (1..caps.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                .collect(),
        })
    }

    /// First timestamp in a text node, reading through any `mw:Entity`
    /// elements (and the text after them) that follow it.
    pub fn find_in_node<N: MarkupNode>(&self, node: &N) -> Option<TimestampMatch> {
        self.find(&stitched_text(node))
    }

    pub fn parse(&self, found: &TimestampMatch) -> Result<Timestamp, ParseError> {
        self.parser.parse(&found.groups)
    }
}

/// Text of `node` joined with following `typeof="mw:Entity"` siblings and
/// the text nodes between them.
pub fn stitched_text<N: MarkupNode>(node: &N) -> String {
    let mut text = String::new();
    let mut current = Some(node.clone());
    while let Some(n) = current.take() {
        text.push_str(&n.data().unwrap_or_default());
        if let Some(entity) = n.next_sibling()
            && entity.is_element()
            && entity.attribute("typeof").as_deref() == Some("mw:Entity")
        {
            if let Some(data) = entity.first_child().and_then(|c| c.data()) {
                text.push_str(&data);
            }
            current = entity
                .next_sibling()
                .filter(|s| s.node_type() == NodeType::Text);
        }
    }
    text
}

/// Node and character offset for position `offset` of the
/// [`stitched_text`] starting at `node`. A position at the boundary
/// between two pieces resolves to the end of the earlier one.
pub fn stitched_position<N: MarkupNode>(node: &N, offset: usize) -> (N, usize) {
    let mut remaining = offset;
    let mut current = node.clone();
    loop {
        let length = current.data().unwrap_or_default().chars().count();
        if remaining <= length {
            return (current, remaining);
        }
        remaining -= length;

        let Some(entity) = current
            .next_sibling()
            .filter(|e| e.is_element() && e.attribute("typeof").as_deref() == Some("mw:Entity"))
        else {
            return (current, length);
        };
        if let Some(text) = entity.first_child().filter(|c| c.data().is_some()) {
            let length = text.data().unwrap_or_default().chars().count();
            if remaining <= length {
                return (text, remaining);
            }
            remaining -= length;
            current = text;
        }
        match entity.next_sibling().filter(|s| s.node_type() == NodeType::Text) {
            Some(next) => current = next,
            None => return (current.clone(), current.data().unwrap_or_default().chars().count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn english() -> DateMessages {
        DateMessages::default()
    }

    fn utc_parser(format: &str) -> (Regex, TimestampParser) {
        let pattern = compile_pattern(format, "[0-9]", ["UTC"], &english());
        let parser = TimestampParser::new(
            format,
            None,
            "UTC",
            BTreeMap::from([("UTC".to_string(), "UTC".to_string())]),
            english(),
        )
        .unwrap();
        (Regex::new(&pattern).unwrap(), parser)
    }

    fn groups(regex: &Regex, text: &str) -> Vec<Option<String>> {
        let caps = regex.captures(text).unwrap();
        (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect()
    }

    #[test]
    fn test_default_format() {
        let (regex, parser) = utc_parser("H:i, j F Y");
        let text = "Reply 14:32, 3 June 2021 (UTC) trailing";
        let found = regex.find(text).unwrap();
        assert_eq!(found.as_str(), "14:32, 3 June 2021 (UTC)");
        let ts = parser.parse(&groups(&regex, text)).unwrap();
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2021, 6, 3, 14, 32, 0).unwrap());
        assert_eq!(ts.warning, None);
        assert_eq!(ts.to_iso(), "2021-06-03T14:32:00.000Z");
    }

    #[test]
    fn test_pattern_shape() {
        let pattern = compile_pattern("H:i, j F Y", "[0-9]", ["UTC"], &english());
        assert!(pattern.starts_with("([0-9]{2}):([0-9]{2}), ([0-9]{1,2}) (January|February"));
        assert!(pattern.ends_with(r"[\x{200E}\x{200F}]? [\x{200E}\x{200F}]?\((UTC)\)"));
    }

    #[test]
    fn test_tokenize_escapes_and_quotes() {
        assert_eq!(
            tokenize(r#"\H "at" xx"#),
            vec![
                Token::Literal("H".into()),
                Token::Literal(" ".into()),
                Token::Literal("at".into()),
                Token::Literal(" ".into()),
                Token::Literal("x".into()),
            ]
        );
        assert_eq!(tokenize("\"H"), vec![Token::Literal("\"".into()), Token::Directive(Directive::Hour2)]);
        assert_eq!(tokenize("xq"), vec![Token::Literal("q".into())]);
        assert_eq!(tokenize("xkY"), vec![Token::Directive(Directive::ThaiYear)]);
    }

    #[test]
    fn test_bidi_marks_tolerated() {
        let (regex, _) = utc_parser("H:i, j F Y");
        assert!(regex.is_match("14:32, 3 June 2021\u{200E} (UTC)"));
        assert!(!regex.is_match("14:32, 3 June 2021(UTC)"));
    }

    #[test]
    fn test_localized_digits_and_thai_year() {
        let digits = "๐๑๒๓๔๕๖๗๘๙";
        let format = "H:i, j F xkY";
        let pattern = compile_pattern(format, &digit_pattern(Some(digits)), ["UTC"], &english());
        let regex = Regex::new(&pattern).unwrap();
        let parser = TimestampParser::new(
            format,
            Some(digits),
            "UTC",
            BTreeMap::from([("UTC".to_string(), "UTC".to_string())]),
            english(),
        )
        .unwrap();
        // 2564 BE = 2021 CE
        let text = "๑๔:๓๒, ๓ June ๒๕๖๔ (UTC)";
        let ts = parser.parse(&groups(&regex, text)).unwrap();
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2021, 6, 3, 14, 32, 0).unwrap());
    }

    fn new_york() -> TimestampMatcher {
        let config = LocaleConfig {
            local_timezone: "America/New_York".to_string(),
            timezones: BTreeMap::from([
                ("EDT".to_string(), "EDT".to_string()),
                ("EST".to_string(), "EST".to_string()),
                ("PST".to_string(), "PST".to_string()),
            ]),
            ..LocaleConfig::default()
        };
        TimestampMatcher::new(&config).unwrap()
    }

    fn parse_with(matcher: &TimestampMatcher, text: &str) -> Timestamp {
        matcher.parse(&matcher.find(text).unwrap()).unwrap()
    }

    #[test]
    fn test_dst_fall_back_earlier() {
        let ts = parse_with(&new_york(), "01:30, 1 November 2020 (EDT)");
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2020, 11, 1, 5, 30, 0).unwrap());
        assert_eq!(ts.warning, None);
    }

    #[test]
    fn test_dst_fall_back_later() {
        let ts = parse_with(&new_york(), "01:30, 1 November 2020 (EST)");
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2020, 11, 1, 6, 30, 0).unwrap());
        assert_eq!(ts.warning, Some(TimestampWarning::AmbiguousDst));
    }

    #[test]
    fn test_wrong_abbreviation() {
        let ts = parse_with(&new_york(), "01:30, 1 November 2020 (PST)");
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2020, 11, 1, 6, 30, 0).unwrap());
        assert_eq!(ts.warning, Some(TimestampWarning::WrongAbbreviation));

        let ts = parse_with(&new_york(), "12:00, 1 July 2020 (EST)");
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2020, 7, 1, 16, 0, 0).unwrap());
        assert_eq!(ts.warning, Some(TimestampWarning::WrongAbbreviation));
    }

    #[test]
    fn test_spring_forward_gap() {
        let ts = parse_with(&new_york(), "02:30, 8 March 2020 (EDT)");
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2020, 3, 8, 7, 30, 0).unwrap());
        assert_eq!(ts.warning, None);
    }

    #[test]
    fn test_invalid_date() {
        let matcher = TimestampMatcher::new(&LocaleConfig::default()).unwrap();
        for text in ["12:00, 31 February 2021 (UTC)", "99:99, 1 May 2021 (UTC)"] {
            let found = matcher.find(text).unwrap();
            assert!(
                matches!(matcher.parse(&found), Err(ParseError::InvalidDate(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn test_unknown_timezone_is_invalid_config() {
        let config = LocaleConfig {
            local_timezone: "Mars/Olympus_Mons".to_string(),
            ..LocaleConfig::default()
        };
        assert!(matches!(
            TimestampMatcher::new(&config),
            Err(ParseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_char_offsets() {
        let matcher = TimestampMatcher::new(&LocaleConfig::default()).unwrap();
        let found = matcher.find("Zażółć 14:32, 3 June 2021 (UTC)").unwrap();
        assert_eq!(found.start, 7);
        assert_eq!(found.end, 31);
    }
}
