//! UTF-8 codepoint decoding over raw line bytes.
//!
//! ## Learning: Why Not `str::chars()`?
//!
//! Lines are stored as `Vec<u8>`, not `String`. A line cut at the byte
//! limit can end in the middle of a multi-byte character, so the content
//! is not guaranteed to be valid UTF-8. `str::chars()` would refuse such a
//! line; this decoder never fails. A malformed lead byte is consumed on
//! its own and reported as its raw value, so decoding a line always takes
//! at most `line.len()` steps.

/// One decoded codepoint and the number of bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Scalar value, or the raw byte value for a malformed lead byte
    pub codepoint: u32,
    /// Bytes consumed, always 1..=4
    pub len: usize,
}

/// Returns the sequence length announced by a UTF-8 lead byte.
///
/// Continuation bytes and bytes above `0xF7` are not valid leads and
/// count as a single byte.
#[inline]
pub fn sequence_len(lead: u8) -> usize {
    if lead < 0x80 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Decodes the codepoint starting at byte `at`.
///
/// Continuation bytes are not validated; a sequence cut short by the end
/// of the slice is consumed up to the end, with the missing bits left as
/// zero. Returns `None` only when `at` is past the end.
pub fn decode_at(bytes: &[u8], at: usize) -> Option<Decoded> {
    let lead = *bytes.get(at)?;
    let announced = sequence_len(lead);
    let len = announced.min(bytes.len() - at);

    // Missing continuation bytes decode as zero payload
    let cont = |i: usize| -> u32 {
        if i < len {
            u32::from(bytes[at + i] & 0x3F)
        } else {
            0
        }
    };

    let codepoint = match announced {
        2 => (u32::from(lead & 0x1F) << 6) | cont(1),
        3 => (u32::from(lead & 0x0F) << 12) | (cont(1) << 6) | cont(2),
        4 => (u32::from(lead & 0x07) << 18) | (cont(1) << 12) | (cont(2) << 6) | cont(3),
        _ => u32::from(lead),
    };

    Some(Decoded { codepoint, len })
}

/// Iterator over `(byte_offset, Decoded)` pairs of a byte line.
#[derive(Debug, Clone)]
pub struct Codepoints<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Codepoints<'a> {
    /// Starts decoding at the beginning of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = (usize, Decoded);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let decoded = decode_at(self.bytes, start)?;
        self.pos += decoded.len;
        Some((start, decoded))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() - self.pos;
        (remaining.div_ceil(4), Some(remaining))
    }
}

/// Convenience constructor for [`Codepoints`].
pub fn codepoints(bytes: &[u8]) -> Codepoints<'_> {
    Codepoints::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii_and_multibyte() {
        let text = "a\u{e9}\u{4e2d}\u{1f600}".as_bytes();
        let decoded: Vec<_> = codepoints(text).map(|(_, d)| (d.codepoint, d.len)).collect();
        assert_eq!(
            decoded,
            vec![(0x61, 1), (0xE9, 2), (0x4E2D, 3), (0x1F600, 4)]
        );
    }

    #[test]
    fn test_malformed_lead_consumes_one_byte() {
        let bytes = [0x80, 0xFF, b'x'];
        let decoded: Vec<_> = codepoints(&bytes).collect();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].1, Decoded { codepoint: 0x80, len: 1 });
        assert_eq!(decoded[1].1, Decoded { codepoint: 0xFF, len: 1 });
        assert_eq!(decoded[2], (2, Decoded { codepoint: 0x78, len: 1 }));
    }

    #[test]
    fn test_cut_sequence_stops_at_end() {
        // First two bytes of a three-byte character
        let bytes = &"\u{4e2d}".as_bytes()[..2];
        let decoded: Vec<_> = codepoints(bytes).collect();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].1.len, 2);
    }

    #[test]
    fn test_decode_past_end() {
        assert_eq!(decode_at(b"ab", 2), None);
    }
}
