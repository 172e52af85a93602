//! Timeframe registry.
//!
//! Maps free-text timeframe strings onto one of five canonical bucket widths.
//! The mapping is total: anything outside the alias table, including a missing
//! or empty string, resolves to [`Timeframe::DEFAULT`] (`30s`). Callers that
//! need strict validation should check [`Timeframe::lookup`] themselves.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical bar timeframe.
///
/// Serialises as its canonical name. Deserialisation never fails: strings and
/// whole numbers go through [`Timeframe::normalize`], anything else is `30s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Timeframe {
    /// 30 seconds.
    S30,
    /// 1 minute.
    M1,
    /// 2 minutes.
    M2,
    /// 3 minutes.
    M3,
    /// 5 minutes.
    M5,
}

/// Alias table. Matching is ASCII case-insensitive and does not trim.
const ALIASES: &[(&str, Timeframe)] = &[
    ("30s", Timeframe::S30),
    ("30sec", Timeframe::S30),
    ("30", Timeframe::S30),
    ("1m", Timeframe::M1),
    ("1min", Timeframe::M1),
    ("60s", Timeframe::M1),
    ("60", Timeframe::M1),
    ("2m", Timeframe::M2),
    ("2min", Timeframe::M2),
    ("120s", Timeframe::M2),
    ("120", Timeframe::M2),
    ("3m", Timeframe::M3),
    ("3min", Timeframe::M3),
    ("180s", Timeframe::M3),
    ("180", Timeframe::M3),
    ("5m", Timeframe::M5),
    ("5min", Timeframe::M5),
    ("300s", Timeframe::M5),
    ("300", Timeframe::M5),
];

impl Timeframe {
    /// Fallback for unrecognised input.
    pub const DEFAULT: Timeframe = Timeframe::S30;

    /// Every canonical timeframe, shortest first.
    pub const ALL: [Timeframe; 5] = [
        Timeframe::S30,
        Timeframe::M1,
        Timeframe::M2,
        Timeframe::M3,
        Timeframe::M5,
    ];

    /// Strict alias lookup. `None` for anything not in the table.
    pub fn lookup(input: &str) -> Option<Timeframe> {
        ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(input))
            .map(|&(_, tf)| tf)
    }

    /// Lenient lookup: unknown, empty or missing input yields `30s`.
    pub fn normalize(input: Option<&str>) -> Timeframe {
        input.and_then(Self::lookup).unwrap_or(Self::DEFAULT)
    }

    /// Canonical identifier (`"30s"`, `"1m"`, ...).
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Timeframe::S30 => "30s",
            Timeframe::M1 => "1m",
            Timeframe::M2 => "2m",
            Timeframe::M3 => "3m",
            Timeframe::M5 => "5m",
        }
    }

    /// Bucket width in seconds.
    pub const fn seconds(self) -> u32 {
        match self {
            Timeframe::S30 => 30,
            Timeframe::M1 => 60,
            Timeframe::M2 => 120,
            Timeframe::M3 => 180,
            Timeframe::M5 => 300,
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Raw timeframe value as it appears in a config document.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimeframe {
    Text(String),
    Whole(u64),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let timeframe = match Option::<RawTimeframe>::deserialize(deserializer)? {
            Some(RawTimeframe::Text(text)) => Timeframe::normalize(Some(&text)),
            Some(RawTimeframe::Whole(secs)) => Timeframe::normalize(Some(&secs.to_string())),
            Some(RawTimeframe::Other(_)) | None => Timeframe::DEFAULT,
        };
        Ok(timeframe)
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.canonical_name().to_string()
    }
}

/// Normalize free text to a canonical timeframe name.
pub fn normalize(input: Option<&str>) -> &'static str {
    Timeframe::normalize(input).canonical_name()
}

/// Bucket width for a canonical name. Non-canonical input is normalized first.
pub fn to_seconds(canonical_name: &str) -> u32 {
    Timeframe::normalize(Some(canonical_name)).seconds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_aliases() {
        assert_eq!(normalize(Some("30sec")), "30s");
        assert_eq!(normalize(Some("30")), "30s");
        assert_eq!(normalize(Some("1MIN")), "1m");
        assert_eq!(normalize(Some("60s")), "1m");
        assert_eq!(normalize(Some("120")), "2m");
        assert_eq!(normalize(Some("3Min")), "3m");
        assert_eq!(normalize(Some("300S")), "5m");
    }

    #[test]
    fn test_unknown_defaults_to_30s() {
        assert_eq!(normalize(None), "30s");
        assert_eq!(normalize(Some("")), "30s");
        assert_eq!(normalize(Some("15m")), "30s");
        assert_eq!(normalize(Some(" 1m")), "30s");
        assert_eq!(normalize(Some("1h")), "30s");
    }

    #[test]
    fn test_alias_closure() {
        for (alias, tf) in ALIASES {
            let canonical = normalize(Some(alias));
            assert_eq!(canonical, tf.canonical_name());
            assert_eq!(normalize(Some(canonical)), canonical);
        }
    }

    #[test]
    fn test_to_seconds() {
        let secs: Vec<u32> = Timeframe::ALL
            .iter()
            .map(|tf| to_seconds(tf.canonical_name()))
            .collect();
        assert_eq!(secs, vec![30, 60, 120, 180, 300]);
    }

    #[test]
    fn test_strict_lookup() {
        assert_eq!(Timeframe::lookup("5MIN"), Some(Timeframe::M5));
        assert_eq!(Timeframe::lookup("7m"), None);
    }

    #[test]
    fn test_serde_is_lenient() {
        let tf: Timeframe = serde_json::from_str("\"2min\"").unwrap();
        assert_eq!(tf, Timeframe::M2);
        let tf: Timeframe = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(tf, Timeframe::S30);
        let tf: Timeframe = serde_json::from_str("null").unwrap();
        assert_eq!(tf, Timeframe::S30);
        assert_eq!(serde_json::to_string(&Timeframe::M3).unwrap(), "\"3m\"");
    }

    #[test]
    fn test_serde_accepts_any_json_value() {
        let decode = |json: &str| serde_json::from_str::<Timeframe>(json).unwrap();
        assert_eq!(decode("60"), Timeframe::M1);
        assert_eq!(decode("300"), Timeframe::M5);
        assert_eq!(decode("45"), Timeframe::S30);
        assert_eq!(decode("1.5"), Timeframe::S30);
        assert_eq!(decode("-60"), Timeframe::S30);
        assert_eq!(decode("true"), Timeframe::S30);
        assert_eq!(decode(r#"{"tf": "1m"}"#), Timeframe::S30);
        assert_eq!(decode(r#"["5m"]"#), Timeframe::S30);
    }

    proptest! {
        #[test]
        fn unlisted_strings_normalize_to_30s(input in "\\PC{0,12}") {
            prop_assume!(!ALIASES.iter().any(|(alias, _)| alias.eq_ignore_ascii_case(&input)));
            prop_assert_eq!(normalize(Some(&input)), "30s");
            prop_assert_eq!(to_seconds(&input), 30);
        }

        #[test]
        fn alias_shaped_strings_normalize_to_30s(input in "[0-9]{1,4}[a-zA-Z]{0,4}") {
            prop_assume!(Timeframe::lookup(&input).is_none());
            prop_assert_eq!(Timeframe::normalize(Some(&input)), Timeframe::DEFAULT);
        }
    }
}
