//! Majority vote over the classifications of files sharing one parent directory.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::types::Category;

/// The title folder and category every sibling will be filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consensus {
    pub title: String,
    pub category: Category,
}

/// Most frequent value; ties go to the value seen first.
pub fn majority<T>(values: impl IntoIterator<Item = T>) -> Option<T>
where
    T: Eq + Hash + Clone,
{
    let mut tallies: Vec<(T, usize)> = Vec::new();
    let mut slots: HashMap<T, usize> = HashMap::new();

    for value in values {
        match slots.get(&value) {
            Some(&slot) => tallies[slot].1 += 1,
            None => {
                slots.insert(value.clone(), tallies.len());
                tallies.push((value, 1));
            }
        }
    }

    // tallies are in first-seen order, so a strict `>` keeps the earliest on ties
    let mut winner: Option<(T, usize)> = None;
    for (value, count) in tallies {
        if winner.as_ref().is_none_or(|(_, best)| count > *best) {
            winner = Some((value, count));
        }
    }
    winner.map(|(value, _)| value)
}

/// Picks one title and, independently, one category for a batch of siblings.
///
/// Returns `None` when there are no siblings or the winning title is empty;
/// callers should skip the directory with a warning.
///
/// # Examples
/// ```
/// use mediboy_core::classify::reconcile;
/// use mediboy_core::Category;
///
/// let consensus = reconcile([
///     ("X", Category::Tv),
///     ("Y", Category::Movie),
///     ("X", Category::Tv),
/// ])
/// .unwrap();
/// assert_eq!(consensus.title, "X");
/// assert_eq!(consensus.category, Category::Tv);
/// ```
pub fn reconcile<'a, I>(siblings: I) -> Option<Consensus>
where
    I: IntoIterator<Item = (&'a str, Category)>,
{
    let (titles, categories): (Vec<&str>, Vec<Category>) = siblings.into_iter().unzip();
    let title = majority(titles)?;
    let category = majority(categories)?;

    if title.is_empty() {
        debug!(%category, "winning title is empty");
        return None;
    }

    Some(Consensus {
        title: title.to_string(),
        category,
    })
}
