//! Line mode: `parent/child` lists in, library paths out.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use mediboy_core::{Classifier, MediboyError};
use tracing::{debug, warn};

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub directories: usize,
    pub paths: usize,
    pub skipped_lines: usize,
    pub skipped_directories: usize,
}

/// Splits `parent/child` on the first `/`. Both halves must be non-empty.
pub fn split_line(line: &str) -> mediboy_core::Result<(&str, &str)> {
    match line.split_once('/') {
        Some((parent, child)) if !parent.is_empty() && !child.is_empty() => Ok((parent, child)),
        _ => Err(MediboyError::MalformedLine {
            line: line.to_string(),
        }),
    }
}

/// Consecutive children of one parent.
struct Group {
    parent: String,
    children: Vec<String>,
}

impl Group {
    fn flush<W: Write>(self, classifier: &Classifier, writer: &mut W, summary: &mut Summary) -> Result<()> {
        summary.directories += 1;
        match classifier.classify_dir(&self.parent, &self.children) {
            Ok(paths) => {
                for path in paths {
                    writeln!(writer, "{path}").context("Failed to write output path")?;
                    summary.paths += 1;
                }
            }
            Err(err) => {
                warn!("Skipping {}: {err}", self.parent);
                summary.skipped_directories += 1;
            }
        }
        Ok(())
    }
}

/// Reads `parent/child` lines, classifies each run of lines sharing a parent
/// and writes one relative path per line.
///
/// Blank lines are ignored and malformed lines are skipped with a warning; a
/// malformed line does not end the current group.
pub fn process_lines<R: BufRead, W: Write>(
    classifier: &Classifier,
    reader: R,
    writer: &mut W,
) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut current: Option<Group> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let (parent, child) = match split_line(line) {
            Ok(parts) => parts,
            Err(err) => {
                warn!("Line {}: {err}", index + 1);
                summary.skipped_lines += 1;
                continue;
            }
        };

        match current.as_mut() {
            Some(group) if group.parent == parent => group.children.push(child.to_string()),
            _ => {
                if let Some(group) = current.take() {
                    group.flush(classifier, writer, &mut summary)?;
                }
                debug!(parent, "new directory");
                current = Some(Group {
                    parent: parent.to_string(),
                    children: vec![child.to_string()],
                });
            }
        }
    }

    if let Some(group) = current {
        group.flush(classifier, writer, &mut summary)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (String, Summary) {
        let classifier = Classifier::standard().unwrap();
        let mut out = Vec::new();
        let summary = process_lines(&classifier, Cursor::new(input), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn split_line_requires_both_halves() {
        assert_eq!(split_line("Show/ep.mkv").unwrap(), ("Show", "ep.mkv"));
        assert_eq!(split_line("Show/sub/ep.mkv").unwrap(), ("Show", "sub/ep.mkv"));
        assert!(matches!(
            split_line("no-separator"),
            Err(MediboyError::MalformedLine { .. })
        ));
        assert!(split_line("/ep.mkv").is_err());
        assert!(split_line("Show/").is_err());
    }

    #[test]
    fn groups_consecutive_parents() {
        let input = "\
Show Name (2019)/Show.Name.S01E01.mkv
Show Name (2019)/Show.Name.S01E02.mkv
Movie Title/Movie.Title.2020.2160p.BluRay.mkv
";
        let (out, summary) = run(input);

        assert_eq!(
            out,
            "TV/Show Name (2019)/Season 01/Show.Name.S01E01.mkv\n\
             TV/Show Name (2019)/Season 01/Show.Name.S01E02.mkv\n\
             Movie/Movie Title (2020)/Movie.Title.2020.2160p.BluRay.mkv\n"
        );
        assert_eq!(summary.directories, 2);
        assert_eq!(summary.paths, 3);
    }

    #[test]
    fn malformed_and_blank_lines_are_skipped() {
        let input = "\
Show Name (2019)/Show.Name.S01E01.mkv

not a pair
Show Name (2019)/Show.Name.S01E02.mkv
";
        let (out, summary) = run(input);

        assert_eq!(out.lines().count(), 2);
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.skipped_lines, 1);
    }

    #[test]
    fn untitled_directory_is_skipped() {
        let input = "\
[1080p]/[720p].mkv
Movie Title/Movie.Title.2020.2160p.BluRay.mkv
";
        let (out, summary) = run(input);

        assert_eq!(out, "Movie/Movie Title (2020)/Movie.Title.2020.2160p.BluRay.mkv\n");
        assert_eq!(summary.skipped_directories, 1);
        assert_eq!(summary.paths, 1);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let (out, summary) = run("");
        assert!(out.is_empty());
        assert_eq!(summary, Summary::default());
    }
}
