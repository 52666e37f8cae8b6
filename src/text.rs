//! Fixed-slot string codecs for in-record and in-save text.

use crate::codec::{set_u16_le, u16_le};

/// Substituted for characters a generation cannot store or a code unit we cannot read.
pub const PLACEHOLDER: char = '?';

const GEN3_TERMINATOR: u8 = 0xff;
const GEN3_PLACEHOLDER: u8 = 0xac;
const GEN4_TERMINATOR: u16 = 0xffff;
const GEN4_PLACEHOLDER: u16 = 0x01ac;
const GEN5_TERMINATOR: u16 = 0xffff;

/// Gen 5 private-use glyphs and their Unicode (or gen 6 private-use) equivalents.
const GEN5_TRANSLATION: [(u16, char); 5] = [
    (0x2467, '×'),
    (0x2468, '÷'),
    (0x246c, '…'),
    (0x246d, '♂'),
    (0x246e, '♀'),
];
/// Remaining gen 5 symbols that live at `0xE090..` in gen 6 and later.
const GEN5_SYMBOLS: std::ops::RangeInclusive<u16> = 0x246f..=0x247d;
const GEN6_SYMBOLS_START: u16 = 0xe090;

const GEN6_MALE: u16 = 0xe08e;
const GEN6_FEMALE: u16 = 0xe08f;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    /// 8-bit Ruby/Sapphire/Emerald/FireRed/LeafGreen table.
    Gen3,
    /// 16-bit proprietary table of Diamond/Pearl/Platinum/HeartGold/SoulSilver.
    Gen4,
    /// UTF-16 with the gen 4/5 private-use symbols, `0xFFFF` terminated.
    Gen5,
    /// UTF-16 with the gen 6+ private-use symbols, zero terminated.
    Gen6,
}

impl Charset {
    fn unit_size(self) -> usize {
        match self {
            Charset::Gen3 => 1,
            _ => 2,
        }
    }
}

/// Reads a string of at most `units` code units starting at `ofs`.
pub fn read_string(data: &[u8], ofs: usize, units: usize, charset: Charset) -> String {
    if charset == Charset::Gen3 {
        return decode_gen3(&data[ofs..ofs + units]);
    }

    let mut out = String::new();
    for idx in 0..units {
        let unit = u16_le(data, ofs + idx * charset.unit_size());
        let decoded = match charset {
            Charset::Gen4 => {
                if unit == GEN4_TERMINATOR {
                    break;
                }
                gen4_to_char(unit).unwrap_or(PLACEHOLDER)
            }
            Charset::Gen5 => {
                if unit == GEN5_TERMINATOR {
                    break;
                }
                gen5_to_char(unit)
            }
            _ => {
                if unit == 0 {
                    break;
                }
                gen6_to_char(unit)
            }
        };
        out.push(decoded);
    }
    out
}

/// Writes `value` into a slot of `units` code units, terminating and padding as the
/// generation does. Characters past the slot are dropped.
pub fn write_string(data: &mut [u8], ofs: usize, units: usize, charset: Charset, value: &str) {
    if charset == Charset::Gen3 {
        let encoded = encode_gen3(value, units);
        data[ofs..ofs + units].copy_from_slice(&encoded);
        return;
    }

    let (terminator, padding) = match charset {
        Charset::Gen4 => (GEN4_TERMINATOR, 0),
        Charset::Gen5 => (GEN5_TERMINATOR, 0),
        _ => (0, 0),
    };
    let mut encoded: Vec<u16> = value
        .chars()
        .take(units.saturating_sub(1))
        .map(|c| match charset {
            Charset::Gen4 => char_to_gen4(c).unwrap_or(GEN4_PLACEHOLDER),
            Charset::Gen5 => char_to_gen5(c),
            _ => char_to_gen6(c),
        })
        .collect();
    if encoded.len() < units {
        encoded.push(terminator);
    }
    encoded.resize(units, padding);
    for (idx, unit) in encoded.into_iter().enumerate() {
        set_u16_le(data, ofs + idx * 2, unit);
    }
}

/// Decodes gen 3 text, stopping at the first control code.
pub fn decode_gen3(text_data: &[u8]) -> String {
    let mut out_text = String::new();
    for byte in text_data {
        let decoded_char = match *byte {
            0xfa..=0xff => break,
            0x00 => ' ',
            0xa1..=0xaa => (b'0' + (byte - 0xa1)) as char,
            0xab => '!',
            0xac => '?',
            0xad => '.',
            0xae => '-',
            0xb0 => '…',
            0xb1 => '“',
            0xb2 => '”',
            0xb3 => '‘',
            0xb4 => '’',
            0xb5 => '♂',
            0xb6 => '♀',
            0xb8 => ',',
            0xba => '/',
            0xbb..=0xd4 => (b'A' + (byte - 0xbb)) as char,
            0xd5..=0xee => (b'a' + (byte - 0xd5)) as char,
            _ => PLACEHOLDER,
        };
        out_text.push(decoded_char);
    }

    out_text
}

/// Encodes to exactly `len` bytes; a terminator follows the text when it fits.
pub fn encode_gen3(text: &str, len: usize) -> Vec<u8> {
    let mut out: Vec<u8> = text
        .chars()
        .take(len)
        .map(|c| match c {
            ' ' => 0x00,
            '0'..='9' => 0xa1 + (c as u8 - b'0'),
            '!' => 0xab,
            '?' => 0xac,
            '.' => 0xad,
            '-' => 0xae,
            '…' => 0xb0,
            '“' => 0xb1,
            '”' => 0xb2,
            '‘' => 0xb3,
            '’' => 0xb4,
            '♂' => 0xb5,
            '♀' => 0xb6,
            ',' => 0xb8,
            '/' => 0xba,
            'A'..='Z' => 0xbb + (c as u8 - b'A'),
            'a'..='z' => 0xd5 + (c as u8 - b'a'),
            _ => GEN3_PLACEHOLDER,
        })
        .collect();
    out.resize(len, GEN3_TERMINATOR);
    out
}

fn gen4_to_char(unit: u16) -> Option<char> {
    let c = match unit {
        0x0121..=0x012a => char::from(b'0' + (unit - 0x0121) as u8),
        0x012b..=0x0144 => char::from(b'A' + (unit - 0x012b) as u8),
        0x0145..=0x015e => char::from(b'a' + (unit - 0x0145) as u8),
        0x01ab => '!',
        0x01ac => '?',
        0x01ad => ',',
        0x01ae => '.',
        0x01af => '…',
        0x01b1 => '/',
        0x01b2 => '‘',
        0x01b3 => '’',
        0x01b4 => '“',
        0x01b5 => '”',
        0x01b9 => '(',
        0x01ba => ')',
        0x01bb => '♂',
        0x01bc => '♀',
        0x01bd => '+',
        0x01be => '-',
        0x01c4 => ':',
        0x01de => ' ',
        _ => return None,
    };
    Some(c)
}

fn char_to_gen4(c: char) -> Option<u16> {
    let unit = match c {
        '0'..='9' => 0x0121 + (c as u16 - '0' as u16),
        'A'..='Z' => 0x012b + (c as u16 - 'A' as u16),
        'a'..='z' => 0x0145 + (c as u16 - 'a' as u16),
        '!' => 0x01ab,
        '?' => 0x01ac,
        ',' => 0x01ad,
        '.' => 0x01ae,
        '…' => 0x01af,
        '/' => 0x01b1,
        '‘' => 0x01b2,
        '’' => 0x01b3,
        '“' => 0x01b4,
        '”' => 0x01b5,
        '(' => 0x01b9,
        ')' => 0x01ba,
        '♂' => 0x01bb,
        '♀' => 0x01bc,
        '+' => 0x01bd,
        '-' => 0x01be,
        ':' => 0x01c4,
        ' ' => 0x01de,
        _ => return None,
    };
    Some(unit)
}

fn gen5_to_char(unit: u16) -> char {
    if let Some((_, c)) = GEN5_TRANSLATION.iter().find(|(u, _)| *u == unit) {
        return *c;
    }
    if GEN5_SYMBOLS.contains(&unit) {
        return utf16_unit_to_char(GEN6_SYMBOLS_START + (unit - GEN5_SYMBOLS.start()));
    }
    utf16_unit_to_char(unit)
}

fn char_to_gen5(c: char) -> u16 {
    if let Some((u, _)) = GEN5_TRANSLATION.iter().find(|(_, ch)| *ch == c) {
        return *u;
    }
    let unit = char_to_utf16_unit(c);
    let symbols_end = GEN6_SYMBOLS_START + (GEN5_SYMBOLS.end() - GEN5_SYMBOLS.start());
    if (GEN6_SYMBOLS_START..=symbols_end).contains(&unit) {
        return GEN5_SYMBOLS.start() + (unit - GEN6_SYMBOLS_START);
    }
    unit
}

fn gen6_to_char(unit: u16) -> char {
    match unit {
        GEN6_MALE => '♂',
        GEN6_FEMALE => '♀',
        other => utf16_unit_to_char(other),
    }
}

fn char_to_gen6(c: char) -> u16 {
    match c {
        '♂' => GEN6_MALE,
        '♀' => GEN6_FEMALE,
        other => char_to_utf16_unit(other),
    }
}

fn utf16_unit_to_char(unit: u16) -> char {
    char::from_u32(unit as u32).unwrap_or(PLACEHOLDER)
}

fn char_to_utf16_unit(c: char) -> u16 {
    u16::try_from(c as u32).unwrap_or(PLACEHOLDER as u16)
}
