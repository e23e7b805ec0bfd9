use tracing::trace;

use crate::error::Result;
use crate::parser::rule::Rule;
use crate::parser::standard::standard_rules;
use crate::types::AttributeBag;

/// An immutable, ordered extraction pipeline.
///
/// Build it once (usually with [`RuleTable::standard`]) and share it by
/// reference; extraction never mutates the table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Wraps a custom, already ordered, list of rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compiles the built-in pipeline.
    ///
    /// # Errors
    ///
    /// Returns `MediboyError::RegexError` if any pattern fails to compile.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(standard_rules()?))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs every rule in order over `input`.
    ///
    /// Each rule first applies its pre-filters to the working string, then
    /// tries its candidates; on success its post-filters (by default: erase
    /// the found values) update the working string and the values are
    /// appended to the bag. Unmatched rules contribute nothing.
    ///
    /// # Examples
    /// ```
    /// use mediboy_core::{Attribute, RuleTable};
    ///
    /// let rules = RuleTable::standard().unwrap();
    /// let bag = rules.extract("Show.Name.S01E02.1080p.WEB-DL.mkv");
    ///
    /// assert_eq!(bag.first(Attribute::Title), Some("Show Name"));
    /// assert_eq!(bag.first(Attribute::Season), Some("S01"));
    /// ```
    pub fn extract(&self, input: &str) -> AttributeBag {
        let mut working = input.to_string();
        let mut bag = AttributeBag::new();

        for rule in &self.rules {
            working = rule.pre_filter(&working);

            let Some(found) = rule.find(&working) else {
                continue;
            };
            trace!(rule = %rule.attribute(), ?found, "rule matched");

            working = rule.post_filter(&working, &found);
            for (attr, value) in found {
                bag.push(attr, value);
            }
        }

        bag
    }
}

/// Free-function form of [`RuleTable::extract`].
pub fn extract(rules: &RuleTable, input: &str) -> AttributeBag {
    rules.extract(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::rule::{Candidate, Filter, PostFilter};
    use crate::types::Attribute;

    fn rules() -> RuleTable {
        RuleTable::standard().unwrap()
    }

    fn values(bag: &AttributeBag, attr: Attribute) -> Vec<&str> {
        bag.get(attr).iter().map(String::as_str).collect()
    }

    #[test]
    fn scene_episode_release() {
        let bag = rules().extract("Show.Name.S01E02.1080p.WEB-DL.mkv");

        assert_eq!(values(&bag, Attribute::Season), ["S01"]);
        assert_eq!(values(&bag, Attribute::Episode), ["E02"]);
        assert_eq!(values(&bag, Attribute::Resolution), ["1080p"]);
        assert_eq!(values(&bag, Attribute::ReleaseType), ["WEB-DL"]);
        assert_eq!(values(&bag, Attribute::Extension), [".mkv"]);
        assert_eq!(values(&bag, Attribute::Title), ["Show Name"]);
        assert!(!bag.contains(Attribute::ReleaseYear));
        assert!(!bag.contains(Attribute::Special));
    }

    #[test]
    fn four_k_normalizes_to_2160p() {
        let bag = rules().extract("Movie.Title.2020.4k.BluRay.mkv");

        assert_eq!(values(&bag, Attribute::Resolution), ["2160p"]);
        assert_eq!(values(&bag, Attribute::ReleaseYear), ["2020"]);
        assert_eq!(values(&bag, Attribute::ReleaseType), ["BluRay"]);
        assert_eq!(values(&bag, Attribute::Title), ["Movie Title"]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let rules = rules();
        for input in [
            "Show.Name.S01E02.1080p.WEB-DL.mkv",
            "[Group] Some Anime - 05 [1080p].mkv",
            "American Dad! Seasons 1 to 18 (S01-S18) Remastered Edition [1080p]",
            "",
        ] {
            assert_eq!(rules.extract(input), rules.extract(input), "input: {input}");
        }
    }

    #[test]
    fn bags_never_hold_empty_values() {
        let rules = rules();
        for input in [
            "",
            "   ",
            "[]().mkv",
            "2nd Season - 01~12",
            "Some Show 1x04 (2009).mp4",
            "=::=",
        ] {
            let bag = rules.extract(input);
            for (attr, vals) in bag.iter() {
                assert!(!vals.is_empty(), "{attr} empty for {input:?}");
                assert!(vals.iter().all(|v| !v.is_empty()), "{attr} for {input:?}");
            }
        }
    }

    #[test]
    fn empty_input_yields_empty_bag() {
        assert!(rules().extract("").is_empty());
    }

    #[test]
    fn trailing_episode_number() {
        let bag = rules().extract("[Group] Some Anime - 05 [1080p].mkv");

        assert_eq!(values(&bag, Attribute::Episode), ["05"]);
        assert_eq!(values(&bag, Attribute::Extension), [".mkv"]);
        assert_eq!(values(&bag, Attribute::Resolution), ["1080p"]);
        assert_eq!(values(&bag, Attribute::Title), ["Some Anime"]);
    }

    #[test]
    fn bracketed_year_is_preferred() {
        let bag = rules().extract("The Heist (2024) [Hindi 1080p]");
        assert_eq!(values(&bag, Attribute::ReleaseYear), ["2024"]);
        assert_eq!(values(&bag, Attribute::Title), ["The Heist"]);
    }

    #[test]
    fn cross_notation_season() {
        let bag = rules().extract("Some Show 1x04 (2009).mp4");
        assert_eq!(values(&bag, Attribute::Season), ["S1"]);
        assert_eq!(values(&bag, Attribute::Episode), ["E04"]);
        assert_eq!(values(&bag, Attribute::ReleaseYear), ["2009"]);
    }

    #[test]
    fn season_range_is_kept_as_range() {
        let bag = rules().extract("Digimon [S01-S06] 720p");
        assert_eq!(values(&bag, Attribute::Season), ["S01-06"]);
        assert_eq!(values(&bag, Attribute::Title), ["Digimon"]);
    }

    #[test]
    fn worded_season() {
        let bag = rules().extract("Show Name Season 2 [720p]");
        assert_eq!(values(&bag, Attribute::Season), ["S2"]);
        assert_eq!(values(&bag, Attribute::Title), ["Show Name"]);
    }

    #[test]
    fn ordinal_season_with_episode_range() {
        let bag = rules().extract("Some Anime 2nd Season - 01~12");
        assert_eq!(values(&bag, Attribute::Season), ["S2"]);
        assert_eq!(values(&bag, Attribute::Episode), ["E01-12"]);
    }

    #[test]
    fn special_markers() {
        let rules = rules();
        let bag = rules.extract("[Group] Some Anime NCOP [1080p].mkv");
        assert_eq!(values(&bag, Attribute::Special), ["NCOP"]);

        let bag = rules.extract("Doctor Who Christmas Special 2010");
        assert_eq!(values(&bag, Attribute::Special), ["Christmas Special"]);
        assert_eq!(values(&bag, Attribute::ReleaseYear), ["2010"]);
    }

    #[test]
    fn complete_collection_is_dropped_from_title() {
        let bag = rules().extract("Band Complete Collection (1990-2000)");
        assert_eq!(values(&bag, Attribute::ReleaseYear), ["1990-2000"]);
        assert_eq!(values(&bag, Attribute::Title), ["Band"]);
    }

    #[test]
    fn website_prefix_is_dropped_from_title() {
        let bag = rules().extract("www.Example.org - The Heist (2024) [1080p].mkv");
        assert_eq!(values(&bag, Attribute::Title), ["The Heist"]);
    }

    #[test]
    fn chained_years_keep_the_last_one() {
        let bag = rules().extract("Title 2010.2012.2014.mkv");
        assert_eq!(values(&bag, Attribute::ReleaseYear), ["2014"]);

        let bag = rules().extract("Title 1999.2001.2010 720p");
        assert_eq!(values(&bag, Attribute::ReleaseYear), ["2010"]);
        assert_eq!(values(&bag, Attribute::Resolution), ["720p"]);
    }

    #[test]
    fn fullwidth_digits_are_not_numbers() {
        let bag = rules().extract("[Group] Anime - ０５.mkv");
        assert!(!bag.contains(Attribute::Episode));
        assert_eq!(values(&bag, Attribute::Title), ["Anime"]);

        let bag = rules().extract("Show S０１E０２ x");
        assert!(!bag.contains(Attribute::Season));
        assert!(!bag.contains(Attribute::Episode));
        assert_eq!(values(&bag, Attribute::Title), ["Show SE x"]);
    }

    #[test]
    fn website_prefix_needs_ascii_host() {
        let bag = rules().extract("www.ｓｉｔｅ.com Title");
        assert_eq!(values(&bag, Attribute::Title), ["www com Title"]);
    }

    #[test]
    fn pre_filter_effects_persist_without_match() {
        let rules = RuleTable::new(vec![
            Rule::new(
                Attribute::Special,
                vec![Candidate::new(r"(?P<special>NCOP)").unwrap()],
            )
            .with_pre_filters(vec![Filter::replace_literal("junk", "")]),
            Rule::new(
                Attribute::Title,
                vec![Candidate::new(r"(?P<title>.+)").unwrap()],
            ),
        ]);
        let bag = rules.extract("Title junk");
        assert!(!bag.contains(Attribute::Special));
        assert_eq!(values(&bag, Attribute::Title), ["Title "]);
    }

    #[test]
    fn custom_post_filters_replace_default_erasure() {
        let rules = RuleTable::new(vec![
            Rule::new(
                Attribute::Resolution,
                vec![Candidate::new(r"(?P<resolution>\d+p)").unwrap()],
            )
            .with_post_filters(vec![PostFilter::Apply(Filter::replace_literal("x", "y"))]),
            Rule::new(
                Attribute::Title,
                vec![Candidate::new(r"(?P<title>.+)").unwrap()],
            ),
        ]);
        let bag = rules.extract("x 720p");
        assert_eq!(values(&bag, Attribute::Resolution), ["720p"]);
        assert_eq!(values(&bag, Attribute::Title), ["y 720p"]);
    }

    #[test]
    fn free_function_matches_method() {
        let rules = rules();
        let input = "Movie.Title.2020.2160p.BluRay.mkv";
        assert_eq!(extract(&rules, input), rules.extract(input));
        assert_eq!(rules.rules().len(), 8);
    }
}
