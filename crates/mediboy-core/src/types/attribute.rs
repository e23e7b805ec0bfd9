use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed vocabulary of attributes the extraction pipeline can produce.
///
/// The serialized form is the camelCase name, which is also the name of the
/// regex capture group that feeds the attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Title,
    Season,
    Episode,
    ReleaseYear,
    Resolution,
    ReleaseType,
    Special,
    Extension,
}

impl Attribute {
    /// All attributes, in declaration order.
    pub const ALL: [Attribute; 8] = [
        Self::Title,
        Self::Season,
        Self::Episode,
        Self::ReleaseYear,
        Self::Resolution,
        Self::ReleaseType,
        Self::Special,
        Self::Extension,
    ];

    /// The capture-group / serialized name of this attribute.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Season => "season",
            Self::Episode => "episode",
            Self::ReleaseYear => "releaseYear",
            Self::Resolution => "resolution",
            Self::ReleaseType => "releaseType",
            Self::Special => "special",
            Self::Extension => "extension",
        }
    }

    /// Looks up an attribute by its capture-group name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown attribute: {s}"))
    }
}

/// Attribute name to the ordered list of values extracted for it.
///
/// Several rules (or a parent and a child bag) may contribute values for the
/// same attribute; contributions are appended in order and never deduplicated.
/// A key is present only when it has at least one non-empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag {
    values: BTreeMap<Attribute, Vec<String>>,
}

impl AttributeBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `attr`. Empty values are ignored.
    pub fn push(&mut self, attr: Attribute, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.values.entry(attr).or_default().push(value);
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, attr: Attribute, value: impl Into<String>) -> Self {
        self.push(attr, value);
        self
    }

    /// Appends every value of `other` after the values already present.
    pub fn merge(&mut self, other: &AttributeBag) {
        for (attr, values) in other.iter() {
            for value in values {
                self.push(attr, value.as_str());
            }
        }
    }

    /// Values extracted for `attr`, empty when absent.
    pub fn get(&self, attr: Attribute) -> &[String] {
        self.values.get(&attr).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first value extracted for `attr`.
    pub fn first(&self, attr: Attribute) -> Option<&str> {
        self.get(attr).first().map(String::as_str)
    }

    pub fn contains(&self, attr: Attribute) -> bool {
        self.values.contains_key(&attr)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of attributes present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over present attributes in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &[String])> {
        self.values.iter().map(|(attr, values)| (*attr, values.as_slice()))
    }

    /// Every value in the bag, in attribute then contribution order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.values().flatten().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(Attribute, S)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (Attribute, S)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (attr, value) in iter {
            bag.push(attr, value);
        }
        bag
    }
}
