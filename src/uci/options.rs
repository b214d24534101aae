//! Engine option tables sent with `setoption`.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Option names that carry the engine's contempt setting. Engine versions
/// expose one or the other, so both are sent.
pub const CONTEMPT_OPTIONS: [&str; 2] = ["Contempt Factor", "Contempt"];

/// Option value as written after `value` in a `setoption` command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OptionValue {
    /// Interpret a raw `value` token the way an engine would.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ => raw
                .parse::<i64>()
                .map_or_else(|_| OptionValue::Text(raw.to_string()), OptionValue::Int),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(n) => write!(f, "{n}"),
            OptionValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Int(i64::from(n))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

/// Ordered option table. Insertion order is the order options are sent;
/// re-inserting a name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptionSet {
    entries: Vec<(String, OptionValue)>,
}

impl OptionSet {
    #[must_use]
    pub fn new() -> Self {
        OptionSet::default()
    }

    /// The table every session starts from.
    #[must_use]
    pub fn defaults() -> Self {
        let mut set = OptionSet::new();
        set.insert("Write Debug Log", false);
        set.insert("Contempt Factor", 0);
        set.insert("Contempt", 0);
        set.insert("Min Split Depth", 0);
        set.insert("Threads", 4);
        set.insert("Hash", 128);
        set.insert("MultiPV", 1);
        set.insert("Skill Level", 20);
        set.insert("Move Overhead", 30);
        set.insert("Minimum Thinking Time", 20);
        set.insert("Slow Mover", 80);
        set.insert("UCI_Chess960", false);
        set
    }

    /// Builder form of [`OptionSet::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Apply `overrides` on top of this table; an override always wins.
    pub fn overlay(&mut self, overrides: &OptionSet) {
        for (name, value) in overrides.iter() {
            self.insert(name, value.clone());
        }
    }

    /// Replace both contempt entries with independent draws from `range`.
    pub fn randomize_contempt<R: Rng + ?Sized>(&mut self, range: &ContemptRange, rng: &mut R) {
        for name in CONTEMPT_OPTIONS {
            self.insert(name, range.sample(rng));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<OptionValue>> FromIterator<(N, V)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = OptionSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Inclusive range contempt values are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContemptRange {
    pub min: i64,
    pub max: i64,
}

impl ContemptRange {
    #[must_use]
    pub fn new(min: i64, max: i64) -> Self {
        ContemptRange { min, max }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    #[must_use]
    pub fn as_range(&self) -> RangeInclusive<i64> {
        self.min..=self.max
    }

    /// Uniform draw; callers check [`ContemptRange::is_valid`] first.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.as_range())
    }
}

impl Default for ContemptRange {
    fn default() -> Self {
        ContemptRange { min: -10, max: 10 }
    }
}

/// Build the table a session sends: defaults, then random contempt, then
/// caller overrides.
pub fn effective_options<R: Rng + ?Sized>(
    overrides: &OptionSet,
    contempt: Option<&ContemptRange>,
    rng: &mut R,
) -> OptionSet {
    let mut table = OptionSet::defaults();
    if let Some(range) = contempt {
        table.randomize_contempt(range, rng);
    }
    table.overlay(overrides);
    table
}

#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.is_empty() || parts[0] != "setoption" {
        return None;
    }

    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" if mode != "value" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_table() {
        let defaults = OptionSet::defaults();
        assert_eq!(defaults.len(), 12);
        assert_eq!(defaults.get("Threads"), Some(&OptionValue::Int(4)));
        assert_eq!(defaults.get("Hash"), Some(&OptionValue::Int(128)));
        assert_eq!(defaults.get("Write Debug Log"), Some(&OptionValue::Bool(false)));
        assert_eq!(defaults.get("UCI_Chess960"), Some(&OptionValue::Bool(false)));
        assert_eq!(defaults.get("Ponder"), None);

        let names: Vec<&str> = defaults.iter().map(|(n, _)| n).collect();
        assert_eq!(names[0], "Write Debug Log");
        assert_eq!(names[11], "UCI_Chess960");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut set = OptionSet::defaults();
        set.insert("Hash", 256);
        assert_eq!(set.len(), 12);
        let position = set.iter().position(|(n, _)| n == "Hash");
        assert_eq!(position, Some(5));
        assert_eq!(set.get("Hash"), Some(&OptionValue::Int(256)));
    }

    #[test]
    fn test_overlay_appends_new_names() {
        let mut set = OptionSet::defaults();
        set.overlay(&OptionSet::new().with("SyzygyPath", "/tb"));
        assert_eq!(set.len(), 13);
        assert_eq!(
            set.get("SyzygyPath"),
            Some(&OptionValue::Text("/tb".to_string()))
        );
    }

    #[test]
    fn test_contempt_unset_without_randomization() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = effective_options(&OptionSet::new(), None, &mut rng);
        for name in CONTEMPT_OPTIONS {
            assert_eq!(table.get(name), Some(&OptionValue::Int(0)));
        }
    }

    #[test]
    fn test_override_beats_randomized_contempt() {
        let mut rng = StdRng::seed_from_u64(7);
        let overrides = OptionSet::new().with("Contempt", 42);
        let table = effective_options(&overrides, Some(&ContemptRange::new(-3, 3)), &mut rng);
        assert_eq!(table.get("Contempt"), Some(&OptionValue::Int(42)));
    }

    #[test]
    fn test_option_value_parse() {
        assert_eq!(OptionValue::parse("true"), OptionValue::Bool(true));
        assert_eq!(OptionValue::parse(" -15 "), OptionValue::Int(-15));
        assert_eq!(
            OptionValue::parse("<empty>"),
            OptionValue::Text("<empty>".to_string())
        );
    }

    #[test]
    fn test_parse_setoption() {
        let parts = ["setoption", "name", "Minimum", "Thinking", "Time", "value", "20"];
        assert_eq!(
            parse_setoption(&parts),
            Some(("Minimum Thinking Time".to_string(), Some("20".to_string())))
        );
        assert_eq!(
            parse_setoption(&["setoption", "name", "Clear", "Hash"]),
            Some(("Clear Hash".to_string(), None))
        );
        assert_eq!(parse_setoption(&["setoption", "value", "1"]), None);
        assert_eq!(parse_setoption(&["position"]), None);
    }

    #[test]
    fn test_contempt_range_validity() {
        assert!(ContemptRange::default().is_valid());
        assert!(ContemptRange::new(5, 5).is_valid());
        assert!(!ContemptRange::new(6, 5).is_valid());
    }

    fn option_value_strategy() -> impl Strategy<Value = OptionValue> {
        prop_oneof![
            any::<bool>().prop_map(OptionValue::Bool),
            any::<i64>().prop_map(OptionValue::Int),
            "[a-z/]{0,8}".prop_map(OptionValue::Text),
        ]
    }

    fn overrides_strategy() -> impl Strategy<Value = Vec<(String, OptionValue)>> {
        let names = prop_oneof![
            Just("Threads".to_string()),
            Just("Hash".to_string()),
            Just("Contempt".to_string()),
            Just("Skill Level".to_string()),
            "[A-Z][a-z]{1,6}",
        ];
        prop::collection::vec((names, option_value_strategy()), 0..8)
    }

    proptest! {
        /// Property: effective table equals defaults overlaid by overrides
        #[test]
        fn prop_override_always_wins(overrides in overrides_strategy(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let override_set: OptionSet = overrides.into_iter().collect();
            let table = effective_options(&override_set, None, &mut rng);

            for (name, value) in override_set.iter() {
                prop_assert_eq!(table.get(name), Some(value));
            }
            for (name, value) in OptionSet::defaults().iter() {
                if override_set.get(name).is_none() {
                    prop_assert_eq!(table.get(name), Some(value));
                }
            }
        }

        /// Property: randomized contempt values stay inside the range
        #[test]
        fn prop_contempt_within_range(lo in -100i64..100, span in 0i64..50, seed in any::<u64>()) {
            let range = ContemptRange::new(lo, lo + span);
            let mut rng = StdRng::seed_from_u64(seed);
            let table = effective_options(&OptionSet::new(), Some(&range), &mut rng);

            for name in CONTEMPT_OPTIONS {
                match table.get(name) {
                    Some(OptionValue::Int(v)) => prop_assert!(range.as_range().contains(v)),
                    other => prop_assert!(false, "unexpected contempt value {:?}", other),
                }
            }
        }
    }
}
