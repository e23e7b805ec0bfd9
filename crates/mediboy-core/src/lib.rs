//! # Mediboy Core
//!
//! Extracts structured metadata (title, season, episode, release year,
//! resolution, release type, special marker, extension) from free-form media
//! release names, and files them into a `TV/...` or `Movie/...` library layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use mediboy_core::{Attribute, Classifier};
//!
//! let classifier = Classifier::standard().unwrap();
//! let parent = classifier.extract("Movie Title");
//! let media = classifier.classify(&parent, "Movie.Title.2020.2160p.BluRay.mkv");
//!
//! assert_eq!(media.path(), "Movie/Movie Title (2020)/Movie.Title.2020.2160p.BluRay.mkv");
//!
//! let bag = classifier.extract("Movie.Title.2020.4k.BluRay.mkv");
//! assert_eq!(bag.first(Attribute::Resolution), Some("2160p"));
//! ```
pub mod classify;
pub mod config;
pub mod error;
pub mod parser;
pub mod types;

// Re-export primary API
pub use classify::{reconcile, Classifier, Consensus};
pub use config::LayoutConfig;
pub use error::{MediboyError, Result};
pub use parser::{extract, RuleTable};
pub use types::{Attribute, AttributeBag, Category, MediaPath};
