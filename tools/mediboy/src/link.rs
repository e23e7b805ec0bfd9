//! Directory mode: every sub-directory of the input is one batch, and each of
//! its files is symlinked into the library under the output root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mediboy_core::Classifier;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub linked: usize,
    pub existing: usize,
    pub skipped_directories: usize,
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

/// Entries of `dir` matching `keep`, sorted by file name.
fn sorted_entries(dir: &Path, keep: impl Fn(&fs::Metadata) -> bool) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("Failed to read {}", dir.display()))?
            .path();
        // follows symlinks, so linked files and directories count too
        match fs::metadata(&path) {
            Ok(meta) if keep(&meta) => entries.push(path),
            Ok(_) => {}
            Err(err) => warn!("Skipping {}: {err}", path.display()),
        }
    }
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Classifies the files of every sub-directory of `input` and links them
/// below `output`. Existing links are left untouched.
pub fn link_tree(classifier: &Classifier, input: &Path, output: &Path) -> Result<Summary> {
    let mut summary = Summary::default();

    for dir in sorted_entries(input, fs::Metadata::is_dir)? {
        let Some(parent) = file_name(&dir) else {
            warn!("Skipping non UTF-8 directory {}", dir.display());
            summary.skipped_directories += 1;
            continue;
        };

        let mut files = Vec::new();
        let mut names = Vec::new();
        for file in sorted_entries(&dir, fs::Metadata::is_file)? {
            match file_name(&file) {
                Some(name) => {
                    names.push(name.to_string());
                    files.push(file.clone());
                }
                None => warn!("Skipping non UTF-8 file {}", file.display()),
            }
        }

        let paths = match classifier.classify_dir(parent, &names) {
            Ok(paths) => paths,
            Err(err) => {
                warn!("Skipping {}: {err}", dir.display());
                summary.skipped_directories += 1;
                continue;
            }
        };

        for (original, relative) in files.iter().zip(paths) {
            let link = output.join(&relative);
            if fs::symlink_metadata(&link).is_ok() {
                warn!("{} already exists, leaving it in place", link.display());
                summary.existing += 1;
                continue;
            }
            if let Some(dir) = link.parent() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            symlink(original, &link)
                .with_context(|| format!("Failed to link {}", link.display()))?;
            debug!(link = %link.display(), original = %original.display(), "linked");
            summary.linked += 1;
        }
    }

    Ok(summary)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn links_each_directory_as_a_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let show = input.path().join("Show Name (2019)");
        touch(&show.join("Show.Name.S01E01.mkv"));
        touch(&show.join("Show.Name.S01E02.mkv"));
        touch(&input.path().join("Movie Title").join("Movie.Title.2020.2160p.BluRay.mkv"));
        // loose files at the top level are not part of any batch
        touch(&input.path().join("loose.mkv"));

        let classifier = Classifier::standard().unwrap();
        let summary = link_tree(&classifier, input.path(), output.path()).unwrap();

        assert_eq!(summary.linked, 3);
        assert_eq!(summary.skipped_directories, 0);

        let link = output
            .path()
            .join("TV/Show Name (2019)/Season 01/Show.Name.S01E02.mkv");
        assert_eq!(fs::read_link(&link).unwrap(), show.join("Show.Name.S01E02.mkv"));

        let movie = output
            .path()
            .join("Movie/Movie Title (2020)/Movie.Title.2020.2160p.BluRay.mkv");
        assert!(fs::symlink_metadata(movie).unwrap().file_type().is_symlink());
    }

    #[test]
    fn existing_links_are_kept() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        touch(&input.path().join("Show Name").join("Show.Name.S01E01.mkv"));

        let classifier = Classifier::standard().unwrap();
        let first = link_tree(&classifier, input.path(), output.path()).unwrap();
        let second = link_tree(&classifier, input.path(), output.path()).unwrap();

        assert_eq!(first.linked, 1);
        assert_eq!(second.linked, 0);
        assert_eq!(second.existing, 1);
    }

    #[test]
    fn untitled_directories_are_skipped() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        touch(&input.path().join("[1080p]").join("[720p].mkv"));

        let classifier = Classifier::standard().unwrap();
        let summary = link_tree(&classifier, input.path(), output.path()).unwrap();

        assert_eq!(summary.linked, 0);
        assert_eq!(summary.skipped_directories, 1);
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }
}
