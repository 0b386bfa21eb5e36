//! Character statistics.
//!
//! A single forward pass classifies every codepoint of the buffer.
//! Fullwidth letters, digits and the ideographic space fold into their
//! ASCII categories; CJK ideographs are counted on their own.

use serde::{Deserialize, Serialize};

use crate::codepoint::codepoints;

/// Category assigned to one codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharCategory {
    Letter,
    Digit,
    Space,
    Punctuation,
    Chinese,
    Other,
}

/// Aggregate category counts for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharStatistics {
    pub letters: usize,
    pub digits: usize,
    pub spaces: usize,
    pub punctuation: usize,
    pub chinese: usize,
    pub other: usize,
    /// Every decoded codepoint
    pub total: usize,
}

impl CharStatistics {
    /// Counts every codepoint of every line.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut stats = Self::default();
        for line in lines {
            for (_, decoded) in codepoints(line) {
                stats.record(classify(decoded.codepoint));
            }
        }
        stats
    }

    /// Adds one codepoint of the given category.
    pub fn record(&mut self, category: CharCategory) {
        self.total += 1;
        match category {
            CharCategory::Letter => self.letters += 1,
            CharCategory::Digit => self.digits += 1,
            CharCategory::Space => self.spaces += 1,
            CharCategory::Punctuation => self.punctuation += 1,
            CharCategory::Chinese => self.chinese += 1,
            CharCategory::Other => self.other += 1,
        }
    }

    /// Count for a single category.
    pub fn get(&self, category: CharCategory) -> usize {
        match category {
            CharCategory::Letter => self.letters,
            CharCategory::Digit => self.digits,
            CharCategory::Space => self.spaces,
            CharCategory::Punctuation => self.punctuation,
            CharCategory::Chinese => self.chinese,
            CharCategory::Other => self.other,
        }
    }
}

impl std::fmt::Display for CharStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Letters:     {}", self.letters)?;
        writeln!(f, "Chinese:     {}", self.chinese)?;
        writeln!(f, "Digits:      {}", self.digits)?;
        writeln!(f, "Spaces:      {}", self.spaces)?;
        writeln!(f, "Punctuation: {}", self.punctuation)?;
        writeln!(f, "Other:       {}", self.other)?;
        write!(f, "Total:       {}", self.total)
    }
}

/// Classifies a codepoint. Malformed bytes decode to values below 0x100
/// and land in `Other` unless they are ASCII.
pub fn classify(cp: u32) -> CharCategory {
    if cp < 0x80 {
        // cp < 0x80 always fits in a byte
        return classify_ascii(cp as u8);
    }
    match cp {
        0x3000 => CharCategory::Space,
        0xFF10..=0xFF19 => CharCategory::Digit,
        0xFF21..=0xFF3A | 0xFF41..=0xFF5A => CharCategory::Letter,
        _ if is_cjk_ideograph(cp) => CharCategory::Chinese,
        _ if is_cjk_punctuation(cp) => CharCategory::Punctuation,
        _ => CharCategory::Other,
    }
}

fn classify_ascii(c: u8) -> CharCategory {
    match c {
        b'a'..=b'z' | b'A'..=b'Z' => CharCategory::Letter,
        b'0'..=b'9' => CharCategory::Digit,
        b' ' | b'\t' => CharCategory::Space,
        b'!'..=b'/' | b':'..=b'@' | b'['..=b'`' | b'{'..=b'~' => CharCategory::Punctuation,
        _ => CharCategory::Other,
    }
}

fn is_cjk_ideograph(cp: u32) -> bool {
    matches!(
        cp,
        0x4E00..=0x9FFF          // Unified Ideographs
            | 0x3400..=0x4DBF    // Extension A
            | 0x20000..=0x2A6DF  // Extension B
            | 0x2A700..=0x2CEAF  // Extensions C to E
            | 0xF900..=0xFAFF // Compatibility Ideographs
    )
}

fn is_cjk_punctuation(cp: u32) -> bool {
    matches!(
        cp,
        0x3000..=0x303F          // Symbols and Punctuation
            | 0xFE30..=0xFE4F    // Compatibility Forms
            | 0xFF00..=0xFF65 // Fullwidth forms
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_classes() {
        assert_eq!(classify('q' as u32), CharCategory::Letter);
        assert_eq!(classify('7' as u32), CharCategory::Digit);
        assert_eq!(classify('\t' as u32), CharCategory::Space);
        assert_eq!(classify('~' as u32), CharCategory::Punctuation);
        assert_eq!(classify(0x7F), CharCategory::Other);
    }

    #[test]
    fn test_fullwidth_folding() {
        assert_eq!(classify(0x3000), CharCategory::Space);
        assert_eq!(classify('\u{ff13}' as u32), CharCategory::Digit);
        assert_eq!(classify('\u{ff21}' as u32), CharCategory::Letter);
        assert_eq!(classify('\u{ff0c}' as u32), CharCategory::Punctuation);
        assert_eq!(classify('\u{3002}' as u32), CharCategory::Punctuation);
    }

    #[test]
    fn test_cjk_and_other() {
        assert_eq!(classify('\u{4e2d}' as u32), CharCategory::Chinese);
        assert_eq!(classify('\u{20000}' as u32), CharCategory::Chinese);
        assert_eq!(classify('\u{1f600}' as u32), CharCategory::Other);
        assert_eq!(classify('\u{e9}' as u32), CharCategory::Other);
    }

    #[test]
    fn test_from_lines() {
        let lines: Vec<&[u8]> = vec![
            "Hi 42!".as_bytes(),
            "\u{4e2d}\u{6587}\u{ff0c}\u{1f600}".as_bytes(),
        ];
        let stats = CharStatistics::from_lines(lines);
        assert_eq!(stats.letters, 2);
        assert_eq!(stats.digits, 2);
        assert_eq!(stats.spaces, 1);
        assert_eq!(stats.punctuation, 2);
        assert_eq!(stats.chinese, 2);
        assert_eq!(stats.other, 1);
        assert_eq!(stats.total, 10);
        assert_eq!(stats.get(CharCategory::Chinese), 2);
    }
}
