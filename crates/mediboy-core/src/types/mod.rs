pub mod attribute;
pub mod media_path;

pub use attribute::{Attribute, AttributeBag};
pub use media_path::{Category, MediaPath};
