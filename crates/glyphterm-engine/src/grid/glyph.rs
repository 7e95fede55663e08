use std::collections::HashMap;
use std::sync::OnceLock;

/// Glyph used for characters the font has no sprite for.
pub const FALLBACK_GLYPH: char = '?';

/// Code page 437, sixteen glyphs per row, in sprite-sheet order.
///
/// Entry 0 is NUL (an empty cell in every CP437 sheet) and entry 255 is the
/// non-breaking space.
const CP437_ROWS: [&str; 16] = [
    "\0☺☻♥♦♣♠•◘○◙♂♀♪♫☼",
    "►◄↕‼¶§▬↨↑↓→←∟↔▲▼",
    " !\"#$%&'()*+,-./",
    "0123456789:;<=>?",
    "@ABCDEFGHIJKLMNO",
    "PQRSTUVWXYZ[\\]^_",
    "`abcdefghijklmno",
    "pqrstuvwxyz{|}~⌂",
    "ÇüéâäàåçêëèïîìÄÅ",
    "ÉæÆôöòûùÿÖÜ¢£¥₧ƒ",
    "áíóúñÑªº¿⌐¬½¼¡«»",
    "░▒▓│┤╡╢╖╕╣║╗╝╜╛┐",
    "└┴┬├─┼╞╟╚╔╩╦╠═╬╧",
    "╨╤╥╙╘╒╓╫╪┘┌█▄▌▐▀",
    "αßΓπΣσµτΦΘΩδ∞φε∩",
    "≡±≥≤⌠⌡÷≈°∙·√ⁿ²■\u{a0}",
];

fn table() -> &'static HashMap<char, u8> {
    static TABLE: OnceLock<HashMap<char, u8>> = OnceLock::new();
    TABLE.get_or_init(|| {
        CP437_ROWS
            .iter()
            .flat_map(|row| row.chars())
            .enumerate()
            .map(|(i, c)| (c, i as u8))
            .collect()
    })
}

/// Sprite index of `c` in a code page 437 sheet.
///
/// Characters outside the code page map to [`FALLBACK_GLYPH`].
pub fn glyph_index(c: char) -> u8 {
    if c.is_ascii_graphic() || c == ' ' {
        return c as u8;
    }
    match table().get(&c) {
        Some(&i) => i,
        None => FALLBACK_GLYPH as u8,
    }
}

/// Inverse of [`glyph_index`].
pub fn glyph_char(index: u8) -> char {
    let row = CP437_ROWS[(index / 16) as usize];
    // Every row holds exactly 16 chars.
    row.chars().nth((index % 16) as usize).unwrap_or(FALLBACK_GLYPH)
}
