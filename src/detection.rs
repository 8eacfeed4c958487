//! Delimiter detection for delimited-text files.
//!
//! Scores a fixed candidate set against a bounded sample of the file and
//! picks the candidate whose per-line occurrence counts are both frequent
//! and consistent. Returns no guess when no candidate appears at all; the
//! caller falls back to comma.

use std::fs::File;
use std::io::Read;
use std::path::Path;

const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
const SAMPLE_BYTES: usize = 4096;
const SAMPLE_LINES: usize = 10;

/// Detect the most likely delimiter in a text sample.
pub fn detect_delimiter(content: &str) -> Option<u8> {
    let sample_lines: Vec<&str> = content.lines().take(SAMPLE_LINES).collect();
    if sample_lines.is_empty() {
        return None;
    }

    let mut best: Option<u8> = None;
    let mut best_score = 0.0f32;

    for &delimiter in &CANDIDATES {
        let field_counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        // Score by frequency dampened by inconsistency across lines.
        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;
        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best = Some(delimiter);
        }
    }

    best
}

/// Detect the delimiter of a file from a bounded prefix sample.
pub fn detect_delimiter_in_file(path: impl AsRef<Path>) -> std::io::Result<Option<u8>> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; SAMPLE_BYTES];
    let n = file.read(&mut buffer)?;
    buffer.truncate(n);
    let sample = String::from_utf8_lossy(&buffer);
    Ok(detect_delimiter(&sample))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_delimiters() {
        assert_eq!(detect_delimiter("a,b,c\nd,e,f"), Some(b','));
        assert_eq!(detect_delimiter("a;b;c\nd;e;f"), Some(b';'));
        assert_eq!(detect_delimiter("a\tb\tc\nd\te\tf"), Some(b'\t'));
        assert_eq!(detect_delimiter("a|b|c\nd|e|f"), Some(b'|'));
    }

    #[test]
    fn prefers_consistent_delimiter() {
        // Semicolons appear on every line; commas only inside one value.
        let content = "name;note\nAda;likes,commas\nGrace;plain\n";
        assert_eq!(detect_delimiter(content), Some(b';'));
    }

    #[test]
    fn no_guess_for_delimiter_free_content() {
        assert_eq!(detect_delimiter("justoneword\nanother\n"), None);
        assert_eq!(detect_delimiter(""), None);
    }
}
