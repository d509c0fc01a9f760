//! Attribute validation rules.
//!
//! A [`Rule`] is a named, parameterized predicate over a single attribute
//! value: no internal state, purely a function of its construction
//! parameters and its input. Evaluation is total — malformed input yields
//! `false`, never an error.

use cmip6_model::AttrValue;
use regex::Regex;

use crate::dates;

/// CF calendar names accepted by [`Rule::Calendar`].
const CF_CALENDARS: &[&str] = &[
    "gregorian",
    "standard",
    "proleptic_gregorian",
    "noleap",
    "365_day",
    "all_leap",
    "366_day",
    "360_day",
    "julian",
    "none",
];

#[derive(Debug, Clone)]
pub enum Rule {
    /// Value coerces to true: non-empty text, non-zero number.
    Nonempty,
    /// Value is exactly one of the allowed values (no case folding).
    ValueIn(Vec<AttrValue>),
    /// Value is a double-precision float. Single-precision floats and
    /// integers are rejected: this is type discrimination, not a range check.
    FloatStrict,
    /// Value is an integer, optionally constrained to be positive and/or
    /// non-zero.
    Integer { positive: bool, nonzero: bool },
    /// Value is text; a pattern, if given, must match from the start of the
    /// string (not necessarily to the end).
    Text { pattern: Option<Regex> },
    /// Value is a CF time-units string `days since <date> [<calendar>]` with
    /// a known calendar name and a parseable date expression.
    Calendar,
    /// Value is a date/time string matching the given strftime template.
    DateTemplate(String),
    /// Every nested rule passes.
    AllOf(Vec<Rule>),
}

impl Rule {
    /// Text of any content.
    pub fn text() -> Self {
        Self::Text { pattern: None }
    }

    /// Text matching `pattern` from the start of the string.
    pub fn text_matching(pattern: &Regex) -> Self {
        Self::Text {
            pattern: Some(pattern.clone()),
        }
    }

    /// Non-empty text.
    pub fn nonempty_text() -> Self {
        Self::AllOf(vec![Self::text(), Self::Nonempty])
    }

    /// Membership in a fixed value set.
    pub fn value_in<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AttrValue>,
    {
        Self::ValueIn(values.into_iter().map(Into::into).collect())
    }

    /// Positive, non-zero integer.
    pub fn positive_integer() -> Self {
        Self::Integer {
            positive: true,
            nonzero: true,
        }
    }

    /// Evaluate the rule against an attribute value.
    pub fn evaluate(&self, value: &AttrValue) -> bool {
        match self {
            Self::Nonempty => value.truthy(),
            Self::ValueIn(allowed) => allowed.contains(value),
            Self::FloatStrict => matches!(value, AttrValue::Double(_)),
            Self::Integer { positive, nonzero } => match value {
                AttrValue::Int(v) => !(*positive && *v < 0) && !(*nonzero && *v == 0),
                _ => false,
            },
            Self::Text { pattern } => match value.as_text() {
                Some(text) => pattern
                    .as_ref()
                    .is_none_or(|pattern| matches_from_start(pattern, text)),
                None => false,
            },
            Self::Calendar => value.as_text().is_some_and(is_valid_calendar),
            Self::DateTemplate(template) => value
                .as_text()
                .is_some_and(|text| dates::parse_template(text, template).is_some()),
            Self::AllOf(rules) => rules.iter().all(|rule| rule.evaluate(value)),
        }
    }
}

/// `re.match` semantics: the leftmost match must begin at offset zero.
fn matches_from_start(pattern: &Regex, text: &str) -> bool {
    pattern.find(text).is_some_and(|found| found.start() == 0)
}

fn is_valid_calendar(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("days since ") else {
        return false;
    };
    let Some((date_part, calendar_part)) = rest.rsplit_once(' ') else {
        return false;
    };
    let Some(name) = calendar_part
        .strip_prefix('[')
        .and_then(|part| part.strip_suffix(']'))
    else {
        return false;
    };
    if !CF_CALENDARS.contains(&name) {
        return false;
    }
    if date_part.is_empty()
        || !date_part
            .bytes()
            .all(|byte| byte.is_ascii_digit() || byte == b'-')
    {
        return false;
    }
    dates::parse_loose_date(date_part).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> AttrValue {
        AttrValue::from(value)
    }

    #[test]
    fn nonempty_follows_truthiness() {
        assert!(Rule::Nonempty.evaluate(&text("x")));
        assert!(!Rule::Nonempty.evaluate(&text("")));
        assert!(!Rule::Nonempty.evaluate(&AttrValue::Int(0)));
    }

    #[test]
    fn value_in_is_exact() {
        let rule = Rule::value_in(["areacella", "areacello"]);
        assert!(rule.evaluate(&text("areacella")));
        assert!(!rule.evaluate(&text("Areacella")));
        assert!(!rule.evaluate(&text("areacell")));
    }

    #[test]
    fn float_rule_discriminates_types() {
        assert!(Rule::FloatStrict.evaluate(&AttrValue::Double(1.0)));
        assert!(Rule::FloatStrict.evaluate(&AttrValue::Double(-1.0)));
        assert!(!Rule::FloatStrict.evaluate(&AttrValue::Int(1)));
        assert!(!Rule::FloatStrict.evaluate(&AttrValue::Float(1.0)));
        assert!(!Rule::FloatStrict.evaluate(&text("1.0")));
    }

    #[test]
    fn integer_policy_combinations() {
        let strict = Rule::positive_integer();
        assert!(strict.evaluate(&AttrValue::Int(5)));
        assert!(!strict.evaluate(&AttrValue::Int(0)));
        assert!(!strict.evaluate(&AttrValue::Int(-4)));
        assert!(!strict.evaluate(&AttrValue::Double(0.5)));
        assert!(!strict.evaluate(&text("1")));
        assert!(!strict.evaluate(&AttrValue::Double(1.0)));

        let signed = Rule::Integer {
            positive: false,
            nonzero: true,
        };
        assert!(signed.evaluate(&AttrValue::Int(-1)));
        assert!(!signed.evaluate(&AttrValue::Int(0)));

        let with_zero = Rule::Integer {
            positive: true,
            nonzero: false,
        };
        assert!(with_zero.evaluate(&AttrValue::Int(0)));
        assert!(!with_zero.evaluate(&AttrValue::Int(-1)));

        let lax = Rule::Integer {
            positive: false,
            nonzero: false,
        };
        assert!(lax.evaluate(&AttrValue::Int(0)));
        assert!(lax.evaluate(&AttrValue::Int(-7)));
    }

    #[test]
    fn text_rule_matches_from_start_only() {
        let pattern = Regex::new(r"hdl:21\.14100/[a-zA-Z\d\-]+$").expect("pattern");
        let rule = Rule::text_matching(&pattern);
        assert!(rule.evaluate(&text("hdl:21.14100/abc-123")));
        assert!(!rule.evaluate(&text("see hdl:21.14100/abc-123")));
        assert!(!rule.evaluate(&AttrValue::Int(21)));

        let unanchored = Regex::new(r"\d{4}").expect("pattern");
        let rule = Rule::text_matching(&unanchored);
        assert!(rule.evaluate(&text("2016 onwards")));
        assert!(!rule.evaluate(&text("year 2016")));
    }

    #[test]
    fn calendar_rule() {
        assert!(Rule::Calendar.evaluate(&text("days since 01-01-1850 [gregorian]")));
        assert!(Rule::Calendar.evaluate(&text("days since 3313 [gregorian]")));
        assert!(Rule::Calendar.evaluate(&text("days since 1850-01-01 [360_day]")));
        assert!(!Rule::Calendar.evaluate(&text("days since 1-1-1990 [foo]")));
        assert!(!Rule::Calendar.evaluate(&text("foo [bar]")));
        assert!(!Rule::Calendar.evaluate(&text("days since [gregorian]")));
        assert!(!Rule::Calendar.evaluate(&AttrValue::Double(0.0)));
    }

    #[test]
    fn date_template_rule_never_raises() {
        let rule = Rule::DateTemplate("%Y-%m-%dT%H:%M:%SZ".to_string());
        assert!(rule.evaluate(&text("2019-03-21T10:05:02Z")));
        assert!(!rule.evaluate(&text("21/03/2019")));
        assert!(!rule.evaluate(&text("")));
        assert!(!rule.evaluate(&AttrValue::Int(2019)));
    }

    #[test]
    fn all_of_composes() {
        let rule = Rule::nonempty_text();
        assert!(rule.evaluate(&text("gn")));
        assert!(!rule.evaluate(&text("")));
        assert!(!rule.evaluate(&AttrValue::Int(1)));
    }
}
