//! # Path Classification
//!
//! Turns extracted attributes into library paths: one file at a time with
//! [`Classifier::classify`], or a whole directory with
//! [`Classifier::classify_dir`], whose siblings agree on a title through
//! [`reconcile`].

pub mod classifier;
pub mod consensus;
pub mod title;

pub use classifier::Classifier;
pub use consensus::{majority, reconcile, Consensus};
pub use title::{compare_titles, display_title, is_range};
