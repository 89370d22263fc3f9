//! Per-file line classifier.
//!
//! A [`LineClassifier`] consumes one raw line at a time and attributes it
//! to code, comment, or whitespace, carrying the open-block-comment flag
//! across lines. A line holding code plus a trailing comment marker counts
//! toward both code and comments. One classifier instance is used per file
//! and never shared between files.

use crate::error::Error;
use crate::tags::{self, CommentTags};

/// Line counts for a single file or an aggregate of files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    pub code: u64,
    pub comment: u64,
    pub whitespace: u64,
}

impl LineCounts {
    pub fn accumulate(&mut self, other: LineCounts) {
        self.code += other.code;
        self.comment += other.comment;
        self.whitespace += other.whitespace;
    }
}

/// Byte position and length of a marker hit within a line.
struct MarkerHit {
    at: usize,
    len: usize,
}

/// Searches `haystack` for one marker category. Markers are tried in
/// registration order and the first one found anywhere wins, even when a
/// later marker would match at an earlier byte position.
fn find_marker(haystack: &str, markers: &[&str]) -> Option<MarkerHit> {
    markers.iter().find_map(|marker| {
        haystack.find(marker).map(|at| MarkerHit {
            at,
            len: marker.len(),
        })
    })
}

/// Two-state classifier: outside or inside a block comment.
#[derive(Debug)]
pub struct LineClassifier {
    tags: &'static CommentTags,
    in_block_comment: bool,
    counts: LineCounts,
}

impl LineClassifier {
    /// Builds a classifier from the registry entry for `extension`.
    pub fn for_extension(extension: &str) -> Result<Self, Error> {
        let tags = tags::lookup(extension)
            .ok_or_else(|| Error::UnsupportedFileType(extension.to_string()))?;
        Ok(LineClassifier {
            tags,
            in_block_comment: false,
            counts: LineCounts::default(),
        })
    }

    /// Classifies one raw line. Lines are trimmed before inspection; a
    /// blank line counts as whitespace even inside a block comment and
    /// leaves the block state untouched.
    pub fn classify(&mut self, raw_line: &str) {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            self.counts.whitespace += 1;
            return;
        }

        if self.in_block_comment {
            self.counts.comment += 1;
            if find_marker(trimmed, self.tags.block_close).is_some() {
                self.in_block_comment = false;
            }
            return;
        }

        if let Some(hit) = find_marker(trimmed, self.tags.line) {
            if hit.at > 0 {
                self.counts.code += 1;
            }
            self.counts.comment += 1;
            return;
        }

        if let Some(hit) = find_marker(trimmed, self.tags.block_open) {
            if hit.at > 0 {
                self.counts.code += 1;
            }
            self.in_block_comment = true;
            let rest = &trimmed[hit.at + hit.len..];
            if find_marker(rest, self.tags.block_close).is_some() {
                // Opened and closed on the same line.
                self.in_block_comment = false;
                self.counts.comment += 1;
            } else if !rest.is_empty() {
                // A bare opening tag contributes no comment line of its
                // own; an opener followed by text does.
                self.counts.comment += 1;
            }
            return;
        }

        self.counts.code += 1;
    }

    pub fn counts(&self) -> LineCounts {
        self.counts
    }
}
