//! Title candidate ranking and display formatting.

use std::cmp::Ordering;

/// `true` for values such as `1990-2000`, `S01-06` or `E01-12`.
pub fn is_range(value: &str) -> bool {
    value.contains('-')
}

/// "Complete collection" style names describe a bundle rather than the show.
fn is_collection(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("collection")
        || lower.contains("complete")
        || lower.ends_with("series")
        || lower.ends_with("serie")
}

/// Non-whitespace characters outside `[a-zA-Z1-9]`, after folding `à` to `a`.
fn non_english_count(title: &str) -> usize {
    title
        .chars()
        .map(|c| if matches!(c, 'à' | 'À') { 'a' } else { c })
        .filter(|c| !c.is_whitespace())
        .filter(|c| !(c.is_ascii_alphabetic() || ('1'..='9').contains(c)))
        .count()
}

/// Orders title candidates from most to least preferred.
///
/// Collection-like names always lose to plain names; otherwise the title with
/// fewer non-English characters wins.
///
/// # Examples
/// ```
/// use mediboy_core::classify::compare_titles;
///
/// let mut titles = vec!["Amélie", "Amelie"];
/// titles.sort_by(|a, b| compare_titles(a, b));
/// assert_eq!(titles[0], "Amelie");
/// ```
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    match (is_collection(a), is_collection(b)) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => non_english_count(a).cmp(&non_english_count(b)),
    }
}

/// Upper-cases the first character of every space-separated word and
/// lower-cases the rest.
pub fn display_title(title: &str) -> String {
    title
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best<'a>(mut titles: Vec<&'a str>) -> &'a str {
        titles.sort_by(|a, b| compare_titles(a, b));
        titles[0]
    }

    #[test]
    fn plain_ascii_beats_accented() {
        assert_eq!(best(vec!["Amélie", "Amelie"]), "Amelie");
    }

    #[test]
    fn plain_beats_collection() {
        assert_eq!(best(vec!["Band Complete Collection", "Band"]), "Band");
        assert_eq!(best(vec!["Friends The Complete Series", "Friends"]), "Friends");
        assert_eq!(best(vec!["Show The Series", "Show"]), "Show");
    }

    #[test]
    fn collection_check_wins_over_character_count() {
        assert_eq!(best(vec!["Complete Collection", "Ünïcödé"]), "Ünïcödé");
    }

    #[test]
    fn fewer_non_english_characters_win() {
        assert_eq!(best(vec!["Steins;Gate: 0", "Steins;Gate"]), "Steins;Gate");
    }

    #[test]
    fn grave_a_is_folded() {
        assert_eq!(non_english_count("Voilà"), 0);
        assert_eq!(non_english_count("Café"), 1);
        // zero is not considered an English digit
        assert_eq!(non_english_count("Room 101"), 1);
    }

    #[test]
    fn ties_keep_input_order() {
        assert_eq!(best(vec!["First Show", "Second Show"]), "First Show");
    }

    #[test]
    fn ranges_are_detected() {
        assert!(is_range("1990-2000"));
        assert!(is_range("S01-06"));
        assert!(!is_range("2020"));
    }

    #[test]
    fn display_title_capitalizes_words() {
        assert_eq!(display_title("show NAME"), "Show Name");
        assert_eq!(display_title("the  heist"), "The  Heist");
        assert_eq!(display_title("élan vital"), "Élan Vital");
        assert_eq!(display_title(""), "");
    }
}
