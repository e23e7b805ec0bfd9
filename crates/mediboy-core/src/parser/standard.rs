//! The built-in pipeline: `episode → extension → releaseType → resolution →
//! releaseYear → season → special → title`.
//!
//! Order matters. Every rule erases what it found from the working string, so
//! the catch-all `title` rule only sees what nothing else claimed.

use crate::error::Result;
use crate::parser::rule::{Candidate, Filter, Groups, Pattern, Relation, Rule, SEPARATOR, Selection};
use crate::types::Attribute;

const RELEASE_TYPES: &str = "CAM-Rip|CAM|HDCAM|TS|HDTS|TELESYNC|PDVD|PreDVDRip|Uncommon|WP|WORKPRINT|\
Extremely rare|TC|HDTC|TELECINE|DVDRemux|PPV|PPVRip|SCR|SCREENER|DVDSCR|DVDSCREENER|BDSCR|BD|\
WEBSCREENER|DDC|R5|R5\\.LINE|R5\\.AC3\\.5\\.1\\.HQ|DVDRip|DVDMux|DVDR|DVD-Full|Full-Rip|ISO rip|\
lossless rip|untouched rip|DVD-5|DVD-9|DSR|DSRip|SATRip|DTHRip|DVBRip|HDTV|PDTV|DTVRip|TVRip|\
HDTVRip|VODRip|VODR|HC|HD-Rip|WEB-Cap|WEBCAP|WEB Cap|HDRip|WEB-DLRip|WEBRip|WEB Rip|WEB-Rip|\
WEB-DL|WEBDL|WEB DL|WEB|Blu-Ray|BluRay|BLURAY|BDRip|BRip|BRRip|BD25|BD50|BD66|BD100|BD5|BD9|\
BDMV|BDISO|COMPLETE\\.BLURAY|VBR|CBR|DVT";

/// Builds the standard rule list.
///
/// # Errors
///
/// Returns `MediboyError::RegexError` if a pattern fails to compile
/// (should never happen with the static patterns defined here).
pub fn standard_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        episode()?,
        extension()?,
        release_type()?,
        resolution()?,
        release_year()?,
        season()?,
        special()?,
        title()?,
    ])
}

fn episode() -> Result<Rule> {
    Ok(Rule::new(
        Attribute::Episode,
        vec![
            // "... 2 05.mkv": season and episode right before the extension
            Candidate::new(
                r"(?i)(?P<season>[0-9]{1,3})[\s_-]+(?P<episode>[0-9]{1,3}[a-z]?)[\s_-]*?(?:\[.*?\])?\.(?:mkv|mp4)$",
            )?
            .variables(&[Attribute::Season, Attribute::Episode]),
            // "... - 05 [crc].mkv"
            Candidate::new(r"[\s_-](?P<episode>[0-9]{1,3}[a-z]?)[\s_-]*?(?:\[.*?\])?\.(?:mkv|mp4)$")?,
        ],
    ))
}

fn extension() -> Result<Rule> {
    Ok(Rule::new(
        Attribute::Extension,
        vec![Candidate::new(
            r"(?i)(?P<extension>\.(?:mkv|mp4|m4p|webm|mpg|mp2|mpeg|mpe|mpv|m2v))\s*$",
        )?],
    ))
}

fn release_type() -> Result<Rule> {
    let pattern = format!(r"(?i)[\s\[(._-](?P<releaseType>{RELEASE_TYPES})[\s\])._-]");
    Ok(Rule::new(Attribute::ReleaseType, vec![Candidate::new(&pattern)?]))
}

fn resolution() -> Result<Rule> {
    Ok(Rule::new(
        Attribute::Resolution,
        vec![
            Candidate::new(
                r"(?i)[-_.(\[\s]\s*(?P<resolution>1080p|2160p|720p|480p|400p|4k|[0-9]{3,4}X[0-9]{3,4})\s*(?:[.)_\-\]\s]|$)",
            )?
            .post_process(normalize_4k),
        ],
    ))
}

fn release_year() -> Result<Rule> {
    Ok(Rule::new(
        Attribute::ReleaseYear,
        vec![
            // bracketed year or range wins outright
            Candidate::new(
                r"[(\[](?P<releaseYear>(?:19[0-9]{2}|20[0-9]{2})(?:[-_.](?:19[0-9]{2}|20[0-9]{2}))?)[)\]]",
            )?,
            Candidate::new(r"(?P<releaseYear>19[0-9]{2}|20[0-9]{2})[-_.]")?
                .selection(Selection::Tail)
                .not_followed_by(r"=19[0-9]{2}|20[0-9]{2}")?,
            // "2006-2013"
            Candidate::new(
                r"[-_(.\[\s](?P<releaseYear>(?:19[0-9]{2}|20[0-9]{2})(?:[-_.](?:19[0-9]{2}|20[0-9]{2}))?)[-).\]\s]?",
            )?
            .selection(Selection::Tail)
            .not_followed_by(r"19[0-9]{2}|20[0-9]{2}")?,
        ],
    ))
}

fn season() -> Result<Rule> {
    let season_episode = [Attribute::Season, Attribute::Episode];
    Ok(Rule::new(
        Attribute::Season,
        vec![
            // 12x13
            Candidate::new(r"(?i)[\s.({_-](?:(?P<season>[0-9]{1,4})|=::=)x(?P<episode>[0-9]{1,2})[\s.({_-]")?
                .variables(&season_episode)
                .relation(Relation::Or)
                .post_process(prefix_season_episode),
            // S01E01
            Candidate::new(
                r"(?i)[.(\[\s-]?\s*(?P<season>S[0-9]{1,2}(?:=E[0-9]{1,3}(?:[.\s-][0-9]{1,3})?)?)(?P<episode>E[0-9]{1,3}(?:[.\s-][0-9]{1,3})?)?\s*[.)\]\s-]?\s*",
            )?
            .variables(&season_episode),
            // 2nd Season - 01~12
            Candidate::new(
                r"(?i)[.(\[\s-]?\s*(?P<season>[0-9]{1,2}(?:st|nd|rd|th)[.\[\s]+Seasons?)(?:[.(\[\s-]+(?P<episode>[0-9]{1,3}(?:[.\s~-]+[0-9]+)?)?)?\s*[-.)\]\s]?\s*",
            )?
            .variables(&season_episode)
            .post_process(ordinal_season),
            // Season 6 - 7
            Candidate::new(
                r"(?i)[.(\[\s-]?\s*(?P<season>Seasons?[.\s-]*[0-9]{1,2}(?:[-.\s])*(?:Seasons?)?[.\s-]*(?:[0-9]{1,2})?)",
            )?
            .post_process(worded_season),
            // S01-S06, [s9-s10us]
            Candidate::new(
                r"(?i)(?:^|[^A-Za-z0-9_])(?P<season>S[0-9]{1,2}(?:[\s.-]S?[0-9]{1,2})?)\s*[-.)\]\s]?\s*(?:[^A-Za-z0-9_]|$)",
            )?
            .post_process(bare_season),
            // 01 - 12
            Candidate::new(r"(?i)[\s_-]+(?P<episode>[0-9]{1,3}[\s_-]+[0-9]{1,3})(?:$|[\s_-])")?
                .variables(&[Attribute::Episode]),
        ],
    ))
}

fn special() -> Result<Rule> {
    Ok(Rule::new(
        Attribute::Special,
        vec![Candidate::new(
            r"(?i)[-\s_\[{(]?(?P<special>NCED|NCOP|Opening|Ending|(?:christmas|holiday)[\s._-]speciale?|special[\s._-]ending|[\s\[](?:sp|pv|ova)[0-9]*?[\s\]])",
        )?],
    ))
}

fn title() -> Result<Rule> {
    Ok(Rule::new(Attribute::Title, vec![Candidate::new(r"(?P<title>.+)")?]).with_pre_filters(vec![
        Filter::replace(r"(?i)(?:The)?[\s.-_]?Complete?[\s.-_]?Collection", "")?,
        // the title is whatever precedes the first claimed span
        Filter::SplitFirst(vec![
            Pattern::Literal(SEPARATOR.to_string()),
            Pattern::regex(r"(?i)\s[0-9]{1,3}$")?,
            Pattern::regex(r"(?i)seasons?[\s_-]*[0-9]{1,3}")?,
            Pattern::regex(r"(?i)seasons?[0-9]{1,3}")?,
        ]),
        Filter::replace(r"[\[{(].+?[}\])]", "")?,
        Filter::replace(r"[\[(].+?$", "")?,
        Filter::replace(r"【.*】", "")?,
        Filter::replace(r"^www\.[A-Za-z0-9_]+\.[A-Za-z0-9_]{1,4}", "")?,
        Filter::replace(r"[-_\[\].)(]", " ")?,
        Filter::Map(squash_whitespace),
        Filter::Map(strip_foreign_characters),
    ]))
}

fn normalize_4k(groups: &mut Groups) {
    if groups
        .get(Attribute::Resolution)
        .is_some_and(|res| res.to_ascii_lowercase().contains("4k"))
    {
        groups.set(Attribute::Resolution, Some("2160p".to_string()));
    }
}

fn prefixed(prefix: char, value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| format!("{prefix}{v}"))
}

fn prefix_season_episode(groups: &mut Groups) {
    let season = groups.get(Attribute::Season).map(str::to_string);
    let episode = groups.get(Attribute::Episode).map(str::to_string);
    groups.set(Attribute::Season, prefixed('S', season));
    groups.set(Attribute::Episode, prefixed('E', episode));
}

fn ordinal_season(groups: &mut Groups) {
    // "2nd Season" -> "2"
    let season = groups.get(Attribute::Season).map(|raw| {
        let head = raw.split("eason").next().unwrap_or_default();
        head.chars()
            .filter(|c| !c.is_ascii_alphabetic())
            .collect::<String>()
            .trim()
            .to_string()
    });
    // "01~12" -> "01-12"
    let episode = groups
        .get(Attribute::Episode)
        .map(|raw| raw.replace(['~', '.'], "-"));
    groups.set(Attribute::Season, prefixed('S', season));
    groups.set(Attribute::Episode, prefixed('E', episode));
}

fn worded_season(groups: &mut Groups) {
    let season = groups
        .get(Attribute::Season)
        .map(|raw| remove_season_word(raw).trim().to_string());
    groups.set(Attribute::Season, prefixed('S', season));
}

fn bare_season(groups: &mut Groups) {
    let season = groups.get(Attribute::Season).map(|raw| {
        let digits: String = raw.chars().filter(|c| !matches!(c, 's' | 'S')).collect();
        collapse_whitespace_runs(&digits)
    });
    groups.set(Attribute::Season, prefixed('S', season));
}

/// Drops every case-insensitive "season"/"seasons".
fn remove_season_word(value: &str) -> String {
    const WORD: &str = "season";
    let lower = value.to_ascii_lowercase();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;
    while let Some(c) = value[i..].chars().next() {
        if lower[i..].starts_with(WORD) {
            i += WORD.len();
            if lower[i..].starts_with('s') {
                i += 1;
            }
            continue;
        }
        out.push(c);
        i += c.len_utf8();
    }
    out
}

/// Each run of whitespace becomes a single space; nothing is trimmed.
fn collapse_whitespace_runs(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_space = false;
    for c in value.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn squash_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps Latin, Greek, Cyrillic, Armenian and Hebrew plus letter-like
/// symbols; drops everything else and a few noisy punctuation marks.
fn strip_foreign_characters(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| matches!(c, '\u{0}'..='\u{5C0}' | '\u{2100}'..='\u{214F}'))
        .filter(|c| !matches!(c, '~' | '"' | '\'' | '!'))
        .collect();
    squash_whitespace(&kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_order_is_fixed() {
        let order: Vec<_> = standard_rules()
            .unwrap()
            .iter()
            .map(|rule| rule.attribute())
            .collect();
        assert_eq!(
            order,
            vec![
                Attribute::Episode,
                Attribute::Extension,
                Attribute::ReleaseType,
                Attribute::Resolution,
                Attribute::ReleaseYear,
                Attribute::Season,
                Attribute::Special,
                Attribute::Title,
            ]
        );
    }

    #[test]
    fn season_word_removal() {
        assert_eq!(remove_season_word("Season 6 - 7"), " 6 - 7");
        assert_eq!(remove_season_word("SEASONS 1-2"), " 1-2");
        assert_eq!(remove_season_word("Season.3.Season.4"), ".3..4");
    }

    #[test]
    fn bare_season_strips_letters() {
        let mut groups = Groups::default();
        groups.set(Attribute::Season, Some("S01-S06".into()));
        bare_season(&mut groups);
        assert_eq!(groups.get(Attribute::Season), Some("S01-06"));
    }

    #[test]
    fn ordinal_season_normalizes_both_groups() {
        let mut groups = Groups::default();
        groups.set(Attribute::Season, Some("2nd Season".into()));
        groups.set(Attribute::Episode, Some("01~12".into()));
        ordinal_season(&mut groups);
        assert_eq!(groups.get(Attribute::Season), Some("S2"));
        assert_eq!(groups.get(Attribute::Episode), Some("E01-12"));
    }

    #[test]
    fn prefixing_skips_missing_values() {
        let mut groups = Groups::default();
        groups.set(Attribute::Season, None);
        groups.set(Attribute::Episode, Some("04".into()));
        prefix_season_episode(&mut groups);
        assert_eq!(groups.get(Attribute::Season), None);
        assert_eq!(groups.get(Attribute::Episode), Some("E04"));
    }

    #[test]
    fn foreign_characters_are_stripped() {
        assert_eq!(strip_foreign_characters("Naruto ナルト  Shippuden!"), "Naruto Shippuden");
        assert_eq!(strip_foreign_characters("Amélie's ~Tale~"), "Amélies Tale");
    }

    #[test]
    fn whitespace_helpers() {
        assert_eq!(squash_whitespace("  a \t b  "), "a b");
        assert_eq!(collapse_whitespace_runs(" 01  06 "), " 01 06 ");
    }
}
