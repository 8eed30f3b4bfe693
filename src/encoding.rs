//! Entry-name decoding.
//!
//! Zip entry names are stored as raw bytes plus a header flag that is
//! *supposed* to say whether they are UTF-8. Legacy archivers leave the
//! flag unset for names that are really UTF-8, or set it on names that are
//! really in an OEM code page, so extraction accepts a [`NameDecoding`]
//! override for archives the container's default decoding gets wrong.

/// How entry-name bytes are decoded when a container session opens.
///
/// The default defers to the container engine: names flagged UTF-8 decode
/// as UTF-8, everything else as IBM code page 437 (the format's historical
/// default). The overrides force one interpretation for every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameDecoding {
    /// Trust the per-entry UTF-8 flag; unflagged names decode as CP437.
    #[default]
    ContainerDefault,
    /// Decode every name as UTF-8, replacing invalid sequences.
    Utf8,
    /// Decode every name as IBM code page 437.
    Cp437,
}

/// CP437 code points for bytes `0x80..=0xFF`; the low half is ASCII.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

/// Decodes a byte string as IBM code page 437.
///
/// Every byte maps to exactly one character, so this never fails. All-ASCII
/// input borrows nothing special but still allocates one `String`; entry
/// names are short enough that this is not worth optimizing.
pub fn decode_cp437(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b < 0x80 {
                b as char
            } else {
                CP437_HIGH[(b - 0x80) as usize]
            }
        })
        .collect()
}
