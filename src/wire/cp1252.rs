//! Windows-1252 (code page 1252) translation.
//!
//! Bytes `0x00..=0x7F` and `0xA0..=0xFF` map to the code point of the same
//! value. The block `0x80..=0x9F` carries typographic characters; five of its
//! slots are unassigned and rejected when decoding.

/// Characters for bytes `0x80..=0x9F`, `None` where the code page leaves the slot undefined.
const HIGH_BLOCK: [Option<char>; 32] = [
    Some('\u{20AC}'), None,             Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None,             Some('\u{017D}'), None,
    None,             Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None,             Some('\u{017E}'), Some('\u{0178}'),
];

/// Translate one byte, `None` for the five undefined bytes.
#[inline]
pub fn decode_byte(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => HIGH_BLOCK[(byte - 0x80) as usize],
        _ => Some(char::from(byte)),
    }
}

/// Translate one character, `None` if the code page has no slot for it.
pub fn encode_char(ch: char) -> Option<u8> {
    let cp = ch as u32;
    match cp {
        0x00..=0x7F | 0xA0..=0xFF => Some(cp as u8),
        _ => HIGH_BLOCK
            .iter()
            .position(|c| *c == Some(ch))
            .map(|i| 0x80 + i as u8),
    }
}

/// Decode a byte slice, reporting the offset of the first undefined byte.
pub fn decode(bytes: &[u8]) -> Result<String, usize> {
    let mut out = String::with_capacity(bytes.len());
    for (offset, &b) in bytes.iter().enumerate() {
        out.push(decode_byte(b).ok_or(offset)?);
    }
    Ok(out)
}
