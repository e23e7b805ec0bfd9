use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;

/// Top-level library a file is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "TV")]
    Tv,
    Movie,
}

impl Category {
    /// Directory name for this category under the given layout.
    pub fn dir_name(self, layout: &LayoutConfig) -> &str {
        match self {
            Self::Tv => &layout.tv_dir,
            Self::Movie => &layout.movie_dir,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tv => f.write_str("TV"),
            Self::Movie => f.write_str("Movie"),
        }
    }
}

/// Classification of one child file into the canonical library layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPath {
    pub category: Category,

    /// Display title, empty when nothing title-like was found.
    pub title: String,

    pub release_year: Option<String>,

    /// Season number with any `s`/`S` removed. Only set for files that get a
    /// season folder.
    pub season: Option<String>,

    /// Raw special marker (e.g. `NCOP`, `[OVA1]`).
    pub special: Option<String>,

    /// The child file name, unchanged.
    pub child: String,

    /// Category directory name, e.g. `TV`.
    pub category_dir: String,

    /// `[/<season prefix> <N>][/<special dir>]`.
    pub intermediate_path: String,
}

impl MediaPath {
    /// `<Title>[ (Year)]`, the per-title folder name.
    pub fn folder(&self) -> String {
        match &self.release_year {
            Some(year) => format!("{} ({year})", self.title),
            None => self.title.clone(),
        }
    }

    /// The relative POSIX path this file should be linked at.
    pub fn path(&self) -> String {
        format!(
            "{}/{}{}/{}",
            self.category_dir,
            self.folder(),
            self.intermediate_path,
            self.child
        )
    }
}

impl fmt::Display for MediaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
