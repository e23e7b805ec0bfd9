//! # Library Layout Configuration
//!
//! Names of the directories the classifier emits. The defaults produce the
//! canonical `TV/<Title>/Season <N>/Special` and `Movie/<Title>` layout.

/// Directory names used when rendering a [`MediaPath`](crate::types::MediaPath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Root directory for episodic content.
    pub tv_dir: String,
    /// Root directory for films.
    pub movie_dir: String,
    /// Prefix of the per-season folder, followed by a space and the number.
    pub season_prefix: String,
    /// Folder holding specials (openings, endings, OVAs, ...).
    pub special_dir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tv_dir: "TV".into(),
            movie_dir: "Movie".into(),
            season_prefix: "Season".into(),
            special_dir: "Special".into(),
        }
    }
}

impl LayoutConfig {
    /// Create a layout with the default directory names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TV root directory name.
    pub fn with_tv_dir(mut self, name: impl Into<String>) -> Self {
        self.tv_dir = name.into();
        self
    }

    /// Set the movie root directory name.
    pub fn with_movie_dir(mut self, name: impl Into<String>) -> Self {
        self.movie_dir = name.into();
        self
    }

    /// Set the season folder prefix.
    pub fn with_season_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.season_prefix = prefix.into();
        self
    }

    /// Set the specials folder name.
    pub fn with_special_dir(mut self, name: impl Into<String>) -> Self {
        self.special_dir = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_canonical_layout() {
        let layout = LayoutConfig::new();
        assert_eq!(layout.tv_dir, "TV");
        assert_eq!(layout.movie_dir, "Movie");
        assert_eq!(layout.season_prefix, "Season");
        assert_eq!(layout.special_dir, "Special");
    }

    #[test]
    fn builders_override_names() {
        let layout = LayoutConfig::new()
            .with_tv_dir("Shows")
            .with_movie_dir("Films")
            .with_season_prefix("Staffel")
            .with_special_dir("Extras");
        assert_eq!(layout.tv_dir, "Shows");
        assert_eq!(layout.movie_dir, "Films");
        assert_eq!(layout.season_prefix, "Staffel");
        assert_eq!(layout.special_dir, "Extras");
    }
}
