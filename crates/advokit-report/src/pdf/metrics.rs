//! Font metrics for the standard PDF base fonts used by the report
//! engine, and the text measurement / wrapping primitives built on them.
//!
//! Widths are the AFM advance widths in 1/1000 em for the printable
//! ASCII range. Codepoints outside the table fall back to the lowercase
//! alphabetic average; `cleantext` strips most non-ASCII before text
//! reaches measurement, so the fallback is rarely hit.

/// The base fonts the report engine draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    Courier,
}

impl Font {
    /// PostScript base font name for the font dictionary.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::Courier => "Courier",
        }
    }

    /// Resource name inside each page's font dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
            Self::HelveticaOblique => "F3",
            Self::Courier => "F4",
        }
    }

    pub const ALL: [Font; 4] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::HelveticaOblique,
        Font::Courier,
    ];
}

/// Advance width of one codepoint, in 1/1000 em.
fn char_width(font: Font, c: char) -> u32 {
    match font {
        Font::Courier => 600,
        Font::Helvetica | Font::HelveticaOblique => helvetica_width(c),
        Font::HelveticaBold => helvetica_bold_width(c),
    }
}

// AFM advance widths for Helvetica, chars 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

// AFM advance widths for Helvetica-Bold, chars 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn helvetica_width(c: char) -> u32 {
    match (c as usize).checked_sub(0x20) {
        Some(i) if i < HELVETICA_WIDTHS.len() => HELVETICA_WIDTHS[i] as u32,
        _ => 556,
    }
}

fn helvetica_bold_width(c: char) -> u32 {
    match (c as usize).checked_sub(0x20) {
        Some(i) if i < HELVETICA_BOLD_WIDTHS.len() => HELVETICA_BOLD_WIDTHS[i] as u32,
        _ => 611,
    }
}

/// Width of `text` set in `font` at `size` points, in points.
pub fn text_width_pt(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| char_width(font, c)).sum();
    units as f64 * size / 1000.0
}

/// Width of `text` set in `font` at `size` points, in millimetres.
pub fn text_width_mm(text: &str, font: Font, size: f64) -> f64 {
    pt_to_mm(text_width_pt(text, font, size))
}

pub fn pt_to_mm(pt: f64) -> f64 {
    pt * 25.4 / 72.0
}

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * 72.0 / 25.4
}

/// Greedy word wrap of `text` into lines no wider than `max_width_mm`.
///
/// Embedded newlines force breaks. A single word wider than the line is
/// hard-split at the last codepoint that still fits, so no returned line
/// ever exceeds the limit and no input is dropped.
pub fn split_text_to_size(text: &str, max_width_mm: f64, font: Font, size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        wrap_line(raw_line, max_width_mm, font, size, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_line(raw: &str, max_width_mm: f64, font: Font, size: f64, out: &mut Vec<String>) {
    let mut current = String::new();
    for word in raw.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width_mm(&candidate, font, size) <= max_width_mm {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if text_width_mm(word, font, size) <= max_width_mm {
            current = word.to_string();
        } else {
            current = hard_split(word, max_width_mm, font, size, out);
        }
    }
    if !current.is_empty() || raw.trim().is_empty() {
        out.push(current);
    }
}

/// Split an over-long word into full-width chunks, returning the
/// still-open remainder.
fn hard_split(word: &str, max_width_mm: f64, font: Font, size: f64, out: &mut Vec<String>) -> String {
    let mut chunk = String::new();
    for c in word.chars() {
        chunk.push(c);
        if text_width_mm(&chunk, font, size) > max_width_mm && chunk.chars().count() > 1 {
            let overflow = chunk.pop().unwrap();
            out.push(std::mem::take(&mut chunk));
            chunk.push(overflow);
        }
    }
    chunk
}

/// Line height in millimetres for a font size in points, using the
/// conventional 1.15 leading the layout engine assumes throughout.
pub fn line_height_mm(size: f64) -> f64 {
    pt_to_mm(size * 1.15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courier_is_fixed_pitch() {
        assert_eq!(char_width(Font::Courier, 'i'), 600);
        assert_eq!(char_width(Font::Courier, 'W'), 600);
        assert_eq!(
            text_width_pt("abcde", Font::Courier, 10.0),
            5.0 * 600.0 * 10.0 / 1000.0
        );
    }

    #[test]
    fn test_helvetica_known_widths() {
        assert_eq!(char_width(Font::Helvetica, ' '), 278);
        assert_eq!(char_width(Font::Helvetica, 'i'), 222);
        assert_eq!(char_width(Font::Helvetica, 'W'), 944);
        assert_eq!(char_width(Font::HelveticaBold, 'i'), 278);
    }

    #[test]
    fn test_oblique_shares_regular_widths() {
        for c in "The quick brown fox 0123456789".chars() {
            assert_eq!(
                char_width(Font::Helvetica, c),
                char_width(Font::HelveticaOblique, c)
            );
        }
    }

    #[test]
    fn test_non_ascii_falls_back() {
        assert_eq!(char_width(Font::Helvetica, 'é'), 556);
        assert_eq!(char_width(Font::HelveticaBold, 'é'), 611);
    }

    #[test]
    fn test_split_respects_max_width() {
        let text = "The tenant reported a persistent leak in the bathroom ceiling that \
                    worsened after each rainfall and was never addressed";
        let lines = split_text_to_size(text, 60.0, Font::Helvetica, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(
                text_width_mm(line, Font::Helvetica, 10.0) <= 60.0,
                "line too wide: {:?}",
                line
            );
        }
    }

    #[test]
    fn test_split_preserves_all_words() {
        let text = "one two three four five six seven eight nine ten";
        let lines = split_text_to_size(text, 25.0, Font::Helvetica, 10.0);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined.split_whitespace().count(), 10);
    }

    #[test]
    fn test_split_handles_embedded_newlines() {
        let lines = split_text_to_size("first\nsecond", 100.0, Font::Helvetica, 10.0);
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_split_hard_breaks_overlong_word() {
        let word = "a".repeat(200);
        let lines = split_text_to_size(&word, 30.0, Font::Helvetica, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, Font::Helvetica, 10.0) <= 30.0);
        }
        let total: usize = lines.iter().map(|l| l.chars().count()).sum();
        assert_eq!(total, 200);
    }

    #[test]
    fn test_split_empty_input_yields_single_empty_line() {
        let lines = split_text_to_size("", 100.0, Font::Helvetica, 10.0);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_unit_conversions_round_trip() {
        let mm = 210.0;
        assert!((pt_to_mm(mm_to_pt(mm)) - mm).abs() < 1e-9);
    }
}
