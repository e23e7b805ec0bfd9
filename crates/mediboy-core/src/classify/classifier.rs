use tracing::debug;

use crate::classify::consensus::reconcile;
use crate::classify::title::{compare_titles, display_title, is_range};
use crate::config::LayoutConfig;
use crate::error::{MediboyError, Result};
use crate::parser::RuleTable;
use crate::types::{Attribute, AttributeBag, Category, MediaPath};

/// Files parent/child name pairs into the library layout.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
    layout: LayoutConfig,
}

/// Child values first, then parent values.
fn chained<'a>(
    first: &'a AttributeBag,
    second: &'a AttributeBag,
    attr: Attribute,
) -> impl Iterator<Item = &'a str> + 'a {
    first
        .get(attr)
        .iter()
        .chain(second.get(attr))
        .map(String::as_str)
}

impl Classifier {
    /// Uses `rules` with the default layout.
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            layout: LayoutConfig::default(),
        }
    }

    /// The standard rule table with the default layout.
    ///
    /// # Errors
    ///
    /// Returns `MediboyError::RegexError` if the rule table fails to compile.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(RuleTable::standard()?))
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Extracts the attributes of a single name.
    pub fn extract(&self, input: &str) -> AttributeBag {
        self.rules.extract(input)
    }

    /// Combines the parent directory's attributes with those of `child` and
    /// decides where the child belongs.
    ///
    /// # Examples
    /// ```
    /// use mediboy_core::{Attribute, AttributeBag, Category, Classifier};
    ///
    /// let classifier = Classifier::standard().unwrap();
    /// let parent = AttributeBag::new().with(Attribute::Title, "Show Name");
    /// let media = classifier.classify(&parent, "Show.Name.S01E02.1080p.WEB-DL.mkv");
    ///
    /// assert_eq!(media.category, Category::Tv);
    /// assert_eq!(media.path(), "TV/Show Name/Season 01/Show.Name.S01E02.1080p.WEB-DL.mkv");
    /// ```
    pub fn classify(&self, parent: &AttributeBag, child: &str) -> MediaPath {
        let child_bag = self.rules.extract(child);

        let release_year = chained(&child_bag, parent, Attribute::ReleaseYear).find(|v| !is_range(v));
        let has_season_range = chained(&child_bag, parent, Attribute::Season).any(is_range);
        let season = chained(&child_bag, parent, Attribute::Season).find(|v| !is_range(v));
        let has_episode = chained(&child_bag, parent, Attribute::Episode).next().is_some();
        let special = chained(&child_bag, parent, Attribute::Special).find(|v| !is_range(v));

        let mut titles: Vec<&str> = chained(parent, &child_bag, Attribute::Title)
            .filter(|t| !t.is_empty() && !is_range(t))
            .collect();
        titles.sort_by(|a, b| compare_titles(a, b));
        let title = titles.first().map(|t| display_title(t)).unwrap_or_default();

        let (category, season) = match season {
            Some(season) if has_episode => (Category::Tv, Some(season.replace(['s', 'S'], ""))),
            Some(_) => (Category::Tv, None),
            None if has_episode || has_season_range => (Category::Tv, None),
            None => (Category::Movie, None),
        };

        let mut intermediate_path = String::new();
        if let Some(season) = &season {
            intermediate_path.push_str(&format!("/{} {season}", self.layout.season_prefix));
        }
        if special.is_some() {
            intermediate_path.push('/');
            intermediate_path.push_str(&self.layout.special_dir);
        }

        let media = MediaPath {
            category,
            title,
            release_year: release_year.map(str::to_string),
            season,
            special: special.map(str::to_string),
            child: child.to_string(),
            category_dir: category.dir_name(&self.layout).to_string(),
            intermediate_path,
        };
        debug!(child, path = %media, "classified");
        media
    }

    /// Classifies every child of one directory as a batch.
    ///
    /// The parent name is extracted once; the children then vote on a shared
    /// title folder and category, and each child keeps its own season/special
    /// sub-path. Paths are returned in `children` order.
    ///
    /// # Errors
    ///
    /// Returns `MediboyError::NoConsensus` when the vote yields no usable
    /// title (including an empty `children` list). This is not fatal; callers
    /// should warn and continue with the next directory.
    pub fn classify_dir<S: AsRef<str>>(&self, parent: &str, children: &[S]) -> Result<Vec<String>> {
        let parent_bag = self.rules.extract(parent);
        let media: Vec<MediaPath> = children
            .iter()
            .map(|child| self.classify(&parent_bag, child.as_ref()))
            .collect();

        let folders: Vec<String> = media
            .iter()
            .map(|m| if m.title.is_empty() { String::new() } else { m.folder() })
            .collect();
        let consensus = reconcile(
            folders
                .iter()
                .map(String::as_str)
                .zip(media.iter().map(|m| m.category)),
        )
        .ok_or_else(|| MediboyError::NoConsensus {
            parent: parent.to_string(),
        })?;

        let category_dir = consensus.category.dir_name(&self.layout);
        Ok(media
            .iter()
            .map(|m| {
                format!(
                    "{category_dir}/{}{}/{}",
                    consensus.title, m.intermediate_path, m.child
                )
            })
            .collect())
    }
}
