//! # Extraction Rules
//!
//! Declarative building blocks of the extraction pipeline. A [`Rule`] owns an
//! ordered list of [`Candidate`] patterns plus optional pre- and post-filters;
//! the engine in [`engine`](super::engine) interprets them.

use regex::{Captures, Regex};

use crate::error::Result;
use crate::types::Attribute;

/// Neutral token that replaces spans already claimed by an earlier rule.
pub const SEPARATOR: &str = " =::= ";

/// How a candidate's declared variables must be captured for a match to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relation {
    /// Every declared variable captured a value.
    #[default]
    And,
    /// At least one declared variable captured a value.
    Or,
}

/// Which of several accepted matches a candidate keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Head,
    Tail,
}

/// Named-group values of one match, in the order the groups appear in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    entries: Vec<(Attribute, Option<String>)>,
}

impl Groups {
    fn from_captures(regex: &Regex, caps: &Captures<'_>) -> Self {
        let entries = regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                let attr = Attribute::from_name(name)?;
                Some((attr, caps.name(name).map(|m| m.as_str().to_string())))
            })
            .collect();
        Self { entries }
    }

    /// Value captured for `attr`, if the group participated in the match.
    pub fn get(&self, attr: Attribute) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| *a == attr)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Replaces (or adds) the value for `attr`.
    pub fn set(&mut self, attr: Attribute, value: Option<String>) {
        match self.entries.iter_mut().find(|(a, _)| *a == attr) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((attr, value)),
        }
    }

    fn captured(&self, attr: Attribute) -> bool {
        self.entries.iter().any(|(a, v)| *a == attr && v.is_some())
    }

    /// Non-empty values, group order preserved.
    pub fn into_values(self) -> Vec<(Attribute, String)> {
        self.entries
            .into_iter()
            .filter_map(|(attr, value)| value.filter(|v| !v.is_empty()).map(|v| (attr, v)))
            .collect()
    }
}

/// Rewrites the raw group values of the selected match.
pub type PostProcess = fn(&mut Groups);

/// One regex alternative of a rule.
#[derive(Debug, Clone)]
pub struct Candidate {
    regex: Regex,
    variables: Vec<Attribute>,
    relation: Relation,
    selection: Selection,
    post_process: Option<PostProcess>,
    not_followed_by: Option<Regex>,
    /// `regex` anchored at the haystack end, for retrying guard-rejected matches.
    end_anchored: Option<Regex>,
}

impl Candidate {
    /// Compiles `pattern`. The declared variables default to the owning rule's
    /// attribute.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            variables: Vec::new(),
            relation: Relation::default(),
            selection: Selection::default(),
            post_process: None,
            not_followed_by: None,
            end_anchored: None,
        })
    }

    pub fn variables(mut self, variables: &[Attribute]) -> Self {
        self.variables = variables.to_vec();
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn post_process(mut self, post_process: PostProcess) -> Self {
        self.post_process = Some(post_process);
        self
    }

    /// Rejects any match immediately followed by `pattern` (a negative
    /// look-ahead, which `regex` cannot express inline). A rejected match is
    /// retried at the same start with shorter ends before the scan moves on.
    ///
    /// The candidate's own pattern must not use `$`.
    pub fn not_followed_by(mut self, pattern: &str) -> Result<Self> {
        self.not_followed_by = Some(Regex::new(&format!("^(?:{pattern})"))?);
        self.end_anchored = Some(Regex::new(&format!("(?:{})$", self.regex.as_str()))?);
        Ok(self)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// All matches, left to right. A match rejected by the look-ahead guard
    /// falls back to its longest accepted prefix; failing that, the scan
    /// resumes one character after its start.
    fn matches(&self, haystack: &str) -> Vec<Groups> {
        let mut found = Vec::new();
        let mut at = 0;
        while at <= haystack.len() {
            let Some(caps) = self.regex.captures_at(haystack, at) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let rejected = self
                .not_followed_by
                .as_ref()
                .is_some_and(|guard| guard.is_match(&haystack[whole.end()..]));
            if rejected {
                at = match self.shorter_match(haystack, whole.start(), whole.end()) {
                    Some((groups, end)) => {
                        found.push(groups);
                        if end == whole.start() {
                            next_boundary(haystack, end)
                        } else {
                            end
                        }
                    }
                    None => next_boundary(haystack, whole.start()),
                };
                continue;
            }
            found.push(Groups::from_captures(&self.regex, &caps));
            at = if whole.is_empty() {
                next_boundary(haystack, whole.end())
            } else {
                whole.end()
            };
        }
        found
    }

    /// Longest match starting at `start` and ending before `end` that the
    /// guard lets through, with its end offset.
    fn shorter_match(&self, haystack: &str, start: usize, end: usize) -> Option<(Groups, usize)> {
        let anchored = self.end_anchored.as_ref()?;
        let guard = self.not_followed_by.as_ref()?;
        let ends = haystack[start..end].char_indices().map(|(i, _)| start + i).rev();
        for end in ends {
            let Some(caps) = anchored.captures_at(&haystack[..end], start) else {
                continue;
            };
            let starts_here = caps.get(0).is_some_and(|m| m.start() == start);
            if starts_here && !guard.is_match(&haystack[end..]) {
                return Some((Groups::from_captures(anchored, &caps), end));
            }
        }
        None
    }

    fn accepts(&self, groups: &Groups, default_variable: Attribute) -> bool {
        let variables = if self.variables.is_empty() {
            std::slice::from_ref(&default_variable)
        } else {
            self.variables.as_slice()
        };
        let captured = variables.iter().filter(|v| groups.captured(**v)).count();
        match self.relation {
            Relation::And => captured == variables.len(),
            Relation::Or => captured > 0,
        }
    }

    /// Runs this candidate against `haystack`, returning the selected match
    /// after post-processing.
    fn select(&self, haystack: &str, default_variable: Attribute) -> Option<Groups> {
        let mut accepted: Vec<Groups> = self
            .matches(haystack)
            .into_iter()
            .filter(|groups| self.accepts(groups, default_variable))
            .collect();
        let mut groups = match self.selection {
            Selection::Head if !accepted.is_empty() => accepted.swap_remove(0),
            Selection::Head => return None,
            Selection::Tail => accepted.pop()?,
        };
        if let Some(post_process) = self.post_process {
            post_process(&mut groups);
        }
        Some(groups)
    }
}

fn next_boundary(haystack: &str, at: usize) -> usize {
    haystack[at..]
        .chars()
        .next()
        .map_or(haystack.len() + 1, |c| at + c.len_utf8())
}

/// Literal text or a compiled regex.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    fn replace_all(&self, input: &str, with: &str) -> String {
        match self {
            Self::Literal(target) if target.is_empty() => input.to_string(),
            Self::Literal(target) => input.replace(target.as_str(), with),
            Self::Regex(re) => re.replace_all(input, regex::NoExpand(with)).into_owned(),
        }
    }

    fn split<'a>(&self, input: &'a str) -> Vec<&'a str> {
        match self {
            Self::Literal(target) if target.is_empty() => vec![input],
            Self::Literal(target) => input.split(target.as_str()).collect(),
            Self::Regex(re) => re.split(input).collect(),
        }
    }
}

/// A string-to-string transform over the working string.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Replace every occurrence of `target` with `with`.
    Replace { target: Pattern, with: String },
    /// Split by each pattern in turn, each time keeping the first non-blank
    /// trimmed piece. Yields an empty string as soon as nothing is left.
    SplitFirst(Vec<Pattern>),
    Map(fn(&str) -> String),
}

impl Filter {
    /// Regex replacement filter.
    pub fn replace(pattern: &str, with: &str) -> Result<Self> {
        Ok(Self::Replace {
            target: Pattern::regex(pattern)?,
            with: with.to_string(),
        })
    }

    pub fn replace_literal(target: &str, with: &str) -> Self {
        Self::Replace {
            target: Pattern::Literal(target.to_string()),
            with: with.to_string(),
        }
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::Replace { target, with } => target.replace_all(input, with),
            Self::SplitFirst(targets) => {
                let mut current = input.to_string();
                for target in targets {
                    let first = target
                        .split(&current)
                        .into_iter()
                        .map(str::trim)
                        .find(|piece| !piece.is_empty())
                        .map(str::to_string);
                    match first {
                        Some(piece) => current = piece,
                        None => return String::new(),
                    }
                }
                current
            }
            Self::Map(transform) => transform(input),
        }
    }
}

/// Transform applied to the working string after a rule produced a result.
#[derive(Debug, Clone)]
pub enum PostFilter {
    /// Replace every extracted value with [`SEPARATOR`].
    EraseValues,
    Apply(Filter),
}

impl PostFilter {
    fn apply(&self, input: &str, found: &[(Attribute, String)]) -> String {
        match self {
            Self::EraseValues => found.iter().fold(input.to_string(), |acc, (_, value)| {
                acc.replace(value.as_str(), SEPARATOR)
            }),
            Self::Apply(filter) => filter.apply(input),
        }
    }
}

/// A named pipeline step.
#[derive(Debug, Clone)]
pub struct Rule {
    attribute: Attribute,
    candidates: Vec<Candidate>,
    pre_filters: Vec<Filter>,
    post_filters: Vec<PostFilter>,
}

impl Rule {
    /// Creates a rule that erases its values from the working string on success.
    pub fn new(attribute: Attribute, candidates: Vec<Candidate>) -> Self {
        Self {
            attribute,
            candidates,
            pre_filters: Vec::new(),
            post_filters: vec![PostFilter::EraseValues],
        }
    }

    pub fn with_pre_filters(mut self, filters: Vec<Filter>) -> Self {
        self.pre_filters = filters;
        self
    }

    pub fn with_post_filters(mut self, filters: Vec<PostFilter>) -> Self {
        self.post_filters = filters;
        self
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub(crate) fn pre_filter(&self, working: &str) -> String {
        self.pre_filters
            .iter()
            .fold(working.to_string(), |acc, filter| filter.apply(&acc))
    }

    pub(crate) fn post_filter(&self, working: &str, found: &[(Attribute, String)]) -> String {
        self.post_filters
            .iter()
            .fold(working.to_string(), |acc, filter| filter.apply(&acc, found))
    }

    /// First candidate (in order) that yields an accepted match wins.
    pub(crate) fn find(&self, working: &str) -> Option<Vec<(Attribute, String)>> {
        for candidate in &self.candidates {
            if let Some(groups) = candidate.select(working, self.attribute) {
                return Some(groups.into_values());
            }
        }
        None
    }
}
