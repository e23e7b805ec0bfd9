use mediboy_core::{AttributeBag, Classifier, MediaPath};
use serde::Serialize;

/// What `mediboy parse` prints for one `parent/child` target.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub parent: String,
    pub parent_attributes: AttributeBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_attributes: Option<AttributeBag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ParseReport {
    /// Splits `target` on its first `/`; without one the whole target is the parent.
    pub fn build(classifier: &Classifier, target: &str) -> Self {
        let (parent, child) = match target.split_once('/') {
            Some((parent, child)) if !child.is_empty() => (parent, Some(child)),
            Some((parent, _)) => (parent, None),
            None => (target, None),
        };

        let parent_attributes = classifier.extract(parent);
        let child_attributes = child.map(|child| classifier.extract(child));
        let media = child.map(|child| classifier.classify(&parent_attributes, child));

        Self {
            parent: parent.to_string(),
            child: child.map(str::to_string),
            path: media.as_ref().map(MediaPath::path),
            parent_attributes,
            child_attributes,
            media,
        }
    }
}
