//! Base-14 font metrics and the paragraph wrapper.
//!
//! Every document uses the three standard Helvetica faces, so widths come from
//! static AFM tables rather than parsed font files. Text is encoded as WinAnsi
//! (Windows-1252), which covers the Portuguese alphabet. Input is composed to
//! NFC first so decomposed accents map onto their WinAnsi letters.

use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

impl FontStyle {
    /// Resource name used in page content streams.
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            FontStyle::Normal => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }

    pub(crate) fn base_font(self) -> &'static str {
        match self {
            FontStyle::Normal => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
        }
    }

    pub(crate) const ALL: [FontStyle; 3] = [FontStyle::Normal, FontStyle::Bold, FontStyle::Italic];
}

/// Result of wrapping one paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub line_height: f32,
}

pub const DEFAULT_LINE_HEIGHT_RATIO: f32 = 1.15;

const DEFAULT_WIDTH: f32 = 556.0;

// Helvetica widths for ASCII 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

// Helvetica-Bold widths for ASCII 32..=126.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {..~
];

/// Map accented Latin-1 letters to the unaccented letter sharing their advance width.
fn base_letter(c: char) -> Option<char> {
    Some(match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        _ => return None,
    })
}

/// Width in 1000-units of glyphs outside ASCII that have a fixed width in
/// both faces, or differ only slightly.
fn symbol_width_1000(c: char, bold: bool) -> Option<f32> {
    let w = match c {
        '\u{00A0}' => 278.0,
        '°' => 400.0,
        'ª' => 370.0,
        'º' => 365.0,
        '§' | '«' | '»' | '€' | '–' | '£' | '¥' => 556.0,
        '—' | '…' | '‰' => 1000.0,
        '±' | '×' | '÷' | '¬' => 584.0,
        '·' => 278.0,
        '•' => 350.0,
        '‘' | '’' | '‚' => {
            if bold {
                278.0
            } else {
                222.0
            }
        }
        '“' | '”' | '„' => {
            if bold {
                500.0
            } else {
                333.0
            }
        }
        '‹' | '›' | 'ˆ' | '˜' | '¨' | '´' | '¯' | '¸' | '¹' | '²' | '³' => 333.0,
        '™' => 1000.0,
        '©' | '®' => 737.0,
        '¼' | '½' | '¾' => 834.0,
        '¦' => {
            if bold {
                280.0
            } else {
                260.0
            }
        }
        '¡' => 333.0,
        '¿' => 611.0,
        'Æ' => 1000.0,
        'æ' => 889.0,
        'ß' => 611.0,
        'Œ' => 1000.0,
        'œ' => 944.0,
        _ => return None,
    };
    Some(w)
}

/// Advance width of a single character in 1000-units.
pub(crate) fn char_width_1000(c: char, style: FontStyle) -> f32 {
    let bold = style == FontStyle::Bold;
    let table = if bold {
        &HELVETICA_BOLD_ASCII
    } else {
        &HELVETICA_ASCII
    };
    // Unmappable characters are rendered as '?'.
    let c = match char_to_winansi(c) {
        0 => '?',
        _ => base_letter(c).unwrap_or(c),
    };
    match c as u32 {
        0x20..=0x7E => table[(c as u32 - 0x20) as usize] as f32,
        _ => symbol_width_1000(c, bold).unwrap_or(DEFAULT_WIDTH),
    }
}

/// Rendered width of `text` in points.
pub fn text_width(text: &str, font_size: f32, style: FontStyle) -> f32 {
    text.nfc()
        .filter(|c| !c.is_control())
        .map(|c| char_width_1000(c, style))
        .sum::<f32>()
        * font_size
        / 1000.0
}

pub fn line_height(font_size: f32, ratio: f32) -> f32 {
    font_size * ratio
}

/// Wrap a paragraph into lines no wider than `max_width`.
///
/// Breaks happen at whitespace; `\n` forces a break. A word wider than the
/// whole line is kept intact on a line of its own. Empty input yields a
/// single empty line.
pub fn wrap(text: &str, max_width: f32, font_size: f32, style: FontStyle) -> WrappedText {
    wrap_with_ratio(text, max_width, font_size, style, DEFAULT_LINE_HEIGHT_RATIO)
}

pub fn wrap_with_ratio(
    text: &str,
    max_width: f32,
    font_size: f32,
    style: FontStyle,
    line_height_ratio: f32,
) -> WrappedText {
    let space_w = char_width_1000(' ', style) * font_size / 1000.0;
    let text: String = text.nfc().collect();
    let mut lines: Vec<String> = Vec::new();

    for hard_line in text.split('\n') {
        let mut current = String::new();
        let mut current_w: f32 = 0.0;

        for word in hard_line.split_whitespace() {
            let ww = text_width(word, font_size, style);
            if current.is_empty() {
                current.push_str(word);
                current_w = ww;
            } else if current_w + space_w + ww <= max_width {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + ww;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = ww;
            }
        }
        lines.push(current);
    }

    WrappedText {
        lines,
        line_height: line_height(font_size, line_height_ratio),
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page become `?`.
pub fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.nfc()
        .filter(|c| !c.is_control())
        .map(|c| match char_to_winansi(c) {
            0 => b'?',
            b => b,
        })
        .collect()
}
