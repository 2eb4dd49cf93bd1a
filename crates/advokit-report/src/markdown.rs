//! Markdown-to-PDF transliteration for chat transcripts.
//!
//! The assistant's replies are markdown; the report renders them
//! line-oriented: fenced code blocks, pipe tables, headings, bullet and
//! numbered lines, a bold leading `**label:**` run, and plain wrapped
//! paragraphs. This is a transliteration, not a full markdown engine —
//! inline emphasis beyond the leading bold run is stripped, not styled.

use std::sync::OnceLock;

use regex::Regex;

use crate::cleantext::clean_text;
use crate::layout::PageCursor;
use crate::pdf::{line_height_mm, split_text_to_size, text_width_mm, Color, Font};

const BODY_SIZE: f64 = 10.0;
const CODE_SIZE: f64 = 9.0;
const TABLE_SIZE: f64 = 9.0;
const MAX_TABLE_COLUMNS: usize = 4;

const BODY_COLOR: Color = Color(30, 41, 59);
const CODE_COLOR: Color = Color(51, 65, 85);
const CODE_BACKGROUND: Color = Color(241, 245, 249);

fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)[.)]\s+(.*)$").unwrap())
}

fn bold_lead_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\*\*([^*]+?):?\*\*:?\s*(.*)$").unwrap())
}

/// Render one chat message body at `x`, wrapped to `width`.
pub fn render_markdown(cursor: &mut PageCursor, text: &str, x: f64, width: f64) {
    let mut code_buffer: Vec<String> = Vec::new();
    let mut table_buffer: Vec<String> = Vec::new();
    let mut in_code = false;

    for line in text.lines() {
        if in_code {
            if line.trim_start().starts_with("```") {
                flush_code_block(cursor, &mut code_buffer, x, width);
                in_code = false;
            } else {
                code_buffer.push(line.to_string());
            }
            continue;
        }
        if line.trim_start().starts_with("```") {
            flush_table(cursor, &mut table_buffer, x, width);
            in_code = true;
            continue;
        }
        if is_table_line(line) {
            table_buffer.push(line.to_string());
            continue;
        }
        flush_table(cursor, &mut table_buffer, x, width);
        render_text_line(cursor, line, x, width);
    }

    // Unterminated structures at end of message still render.
    flush_code_block(cursor, &mut code_buffer, x, width);
    flush_table(cursor, &mut table_buffer, x, width);
}

fn is_table_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.len() > 1
}

fn render_text_line(cursor: &mut PageCursor, line: &str, x: f64, width: f64) {
    let trimmed = line.trim_end();
    if trimmed.trim().is_empty() {
        cursor.advance(2.0);
        return;
    }

    if let Some(rest) = trimmed.strip_prefix("### ") {
        heading(cursor, rest, x, width, 11.0);
    } else if let Some(rest) = trimmed.strip_prefix("## ") {
        heading(cursor, rest, x, width, 12.5);
    } else if let Some(rest) = trimmed.strip_prefix("# ") {
        heading(cursor, rest, x, width, 14.0);
    } else if let Some(rest) = bullet_content(trimmed) {
        let body = clean_text(&strip_bold(rest));
        bullet_line(cursor, &body, x, width);
    } else if let Some(caps) = numbered_re().captures(trimmed) {
        let body = clean_text(&strip_bold(&caps[2]));
        let marker = format!("{}.", &caps[1]);
        numbered_line(cursor, &marker, &body, x, width);
    } else if let Some(caps) = bold_lead_re().captures(trimmed) {
        let label = clean_text(&caps[1]);
        let rest = clean_text(&strip_bold(&caps[2]));
        bold_lead_line(cursor, &label, &rest, x, width);
    } else {
        let body = clean_text(&strip_bold(trimmed));
        cursor.paragraph(&body, x, width, Font::Helvetica, BODY_SIZE, BODY_COLOR);
    }
}

/// Strip `**` delimiters without styling the runs they wrapped.
fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}

fn heading(cursor: &mut PageCursor, text: &str, x: f64, width: f64, size: f64) {
    cursor.advance(1.5);
    let body = clean_text(&strip_bold(text));
    cursor.paragraph(&body, x, width, Font::HelveticaBold, size, BODY_COLOR);
    cursor.advance(1.0);
}

fn bullet_content(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("\u{2022} "))
}

fn bullet_line(cursor: &mut PageCursor, body: &str, x: f64, width: f64) {
    let indent = 5.0;
    let lines = split_text_to_size(body, width - indent, Font::Helvetica, BODY_SIZE);
    cursor.ensure_room(lines.len() as f64 * line_height_mm(BODY_SIZE));
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            let y = cursor.y();
            let baseline = y + line_height_mm(BODY_SIZE) * 0.8;
            let pdf = cursor.pdf_mut();
            pdf.set_font(Font::Helvetica, BODY_SIZE);
            pdf.set_text_color(BODY_COLOR);
            pdf.text("\u{2022}", x + 1.0, baseline);
        }
        cursor.text_line(line, x + indent, Font::Helvetica, BODY_SIZE, BODY_COLOR);
    }
}

fn numbered_line(cursor: &mut PageCursor, marker: &str, body: &str, x: f64, width: f64) {
    let indent = 7.0;
    let lines = split_text_to_size(body, width - indent, Font::Helvetica, BODY_SIZE);
    cursor.ensure_room(lines.len() as f64 * line_height_mm(BODY_SIZE));
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            let baseline = cursor.y() + line_height_mm(BODY_SIZE) * 0.8;
            let pdf = cursor.pdf_mut();
            pdf.set_font(Font::Helvetica, BODY_SIZE);
            pdf.set_text_color(BODY_COLOR);
            pdf.text(marker, x + 1.0, baseline);
        }
        cursor.text_line(line, x + indent, Font::Helvetica, BODY_SIZE, BODY_COLOR);
    }
}

/// `**Label:** rest` — the one case that renders true bold: the label in
/// bold, the remainder flowing after it on the same line.
fn bold_lead_line(cursor: &mut PageCursor, label: &str, rest: &str, x: f64, width: f64) {
    let label_text = format!("{}:", label);
    let label_width = text_width_mm(&label_text, Font::HelveticaBold, BODY_SIZE);

    if rest.is_empty() || label_width + 10.0 > width {
        cursor.paragraph(&label_text, x, width, Font::HelveticaBold, BODY_SIZE, BODY_COLOR);
        if !rest.is_empty() {
            cursor.paragraph(rest, x, width, Font::Helvetica, BODY_SIZE, BODY_COLOR);
        }
        return;
    }

    let rest_x = x + label_width + 2.0;
    let mut segments = split_text_to_size(rest, width - label_width - 2.0, Font::Helvetica, BODY_SIZE);
    let first = segments.remove(0);

    cursor.ensure_room(line_height_mm(BODY_SIZE));
    let baseline = cursor.y() + line_height_mm(BODY_SIZE) * 0.8;
    {
        let pdf = cursor.pdf_mut();
        pdf.set_font(Font::HelveticaBold, BODY_SIZE);
        pdf.set_text_color(BODY_COLOR);
        pdf.text(&label_text, x, baseline);
    }
    cursor.text_line(&first, rest_x, Font::Helvetica, BODY_SIZE, BODY_COLOR);

    if !segments.is_empty() {
        let remainder = segments.join(" ");
        cursor.paragraph(&remainder, x, width, Font::Helvetica, BODY_SIZE, BODY_COLOR);
    }
}

/// Monospace block on a filled background.
fn flush_code_block(cursor: &mut PageCursor, buffer: &mut Vec<String>, x: f64, width: f64) {
    if buffer.is_empty() {
        return;
    }
    let lines = std::mem::take(buffer);
    let line_height = line_height_mm(CODE_SIZE);
    let padding = 1.5;
    let block_height = lines.len() as f64 * line_height + 2.0 * padding;
    let usable = cursor.config().page_height - 2.0 * cursor.config().margin;

    if block_height <= usable {
        cursor.ensure_room(block_height);
        cursor.fill_rect(x, cursor.y(), width, block_height, CODE_BACKGROUND);
        cursor.advance(padding);
        for line in &lines {
            code_line(cursor, line, x, width);
        }
        cursor.advance(padding);
    } else {
        // Taller than a page: per-line backgrounds so breaks stay clean.
        for line in &lines {
            cursor.ensure_room(line_height);
            cursor.fill_rect(x, cursor.y(), width, line_height, CODE_BACKGROUND);
            code_line(cursor, line, x, width);
        }
    }
    cursor.advance(1.0);
}

fn code_line(cursor: &mut PageCursor, line: &str, x: f64, width: f64) {
    // Hard-split rather than word-wrap; code lines keep their spacing.
    let cleaned = clean_text(line);
    let segments = split_text_to_size(&cleaned, width - 2.0, Font::Courier, CODE_SIZE);
    for segment in segments {
        cursor.text_line(&segment, x + 1.0, Font::Courier, CODE_SIZE, CODE_COLOR);
    }
}

/// Naive pipe table: first row is the header, the row at index 1 is
/// assumed to be the separator and skipped, at most four columns render,
/// and cell text is truncated with a `..` ellipsis to its column width.
fn flush_table(cursor: &mut PageCursor, buffer: &mut Vec<String>, x: f64, width: f64) {
    if buffer.is_empty() {
        return;
    }
    let raw_rows = std::mem::take(buffer);
    let rows: Vec<Vec<String>> = raw_rows
        .iter()
        .map(|line| {
            line.trim()
                .trim_matches('|')
                .split('|')
                .map(|cell| clean_text(&strip_bold(cell.trim())))
                .collect()
        })
        .collect();

    let columns = rows
        .first()
        .map(|header| header.len().min(MAX_TABLE_COLUMNS))
        .unwrap_or(0);
    if columns == 0 {
        return;
    }
    let column_width = width / columns as f64;
    let row_height = line_height_mm(TABLE_SIZE) + 1.0;

    for (index, row) in rows.iter().enumerate() {
        if index == 1 {
            continue; // separator row
        }
        let font = if index == 0 {
            Font::HelveticaBold
        } else {
            Font::Helvetica
        };
        cursor.ensure_room(row_height);
        let baseline = cursor.y() + line_height_mm(TABLE_SIZE) * 0.8;
        for (col, cell) in row.iter().take(columns).enumerate() {
            let cell_text = truncate_cell(cell, column_width - 2.0, font);
            let pdf = cursor.pdf_mut();
            pdf.set_font(font, TABLE_SIZE);
            pdf.set_text_color(BODY_COLOR);
            pdf.text(&cell_text, x + col as f64 * column_width, baseline);
        }
        cursor.advance(row_height);
    }
    cursor.advance(1.0);
}

/// Truncate cell text to fit, appending `..` when anything was cut.
fn truncate_cell(text: &str, max_width: f64, font: Font) -> String {
    if text_width_mm(text, font, TABLE_SIZE) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        out.push(c);
        if text_width_mm(&format!("{}..", out), font, TABLE_SIZE) > max_width {
            out.pop();
            break;
        }
    }
    format!("{}..", out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;

    fn render(text: &str) -> (usize, String) {
        let mut cursor = PageCursor::new(ReportConfig::default());
        let width = cursor.content_width();
        render_markdown(&mut cursor, text, 20.0, width);
        let pages = cursor.page_count();
        let bytes = cursor.into_pdf().render();
        (pages, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[test]
    fn test_plain_paragraph_renders() {
        let (_, out) = render("Your landlord must provide heat in winter.");
        assert!(out.contains("(Your landlord must provide heat in winter.)"));
    }

    #[test]
    fn test_heading_renders_without_hashes() {
        let (_, out) = render("## Your Rights\nBody text.");
        assert!(out.contains("(Your Rights)"));
        assert!(!out.contains("(## Your Rights)"));
    }

    #[test]
    fn test_bold_markers_stripped() {
        let (_, out) = render("This is **very important** to document.");
        assert!(out.contains("(This is very important to document.)"));
    }

    #[test]
    fn test_bold_lead_renders_label_separately() {
        let (_, out) = render("**Next step:** send a written notice.");
        assert!(out.contains("(Next step:)"));
        assert!(out.contains("(send a written notice.)"));
    }

    #[test]
    fn test_bullet_line_gets_marker() {
        let (_, out) = render("- keep copies of everything");
        assert!(out.contains("(\\225)")); // WinAnsi bullet
        assert!(out.contains("(keep copies of everything)"));
    }

    #[test]
    fn test_numbered_line_keeps_number() {
        let (_, out) = render("1. photograph the damage\n2. email the landlord");
        assert!(out.contains("(1.)"));
        assert!(out.contains("(photograph the damage)"));
        assert!(out.contains("(2.)"));
    }

    #[test]
    fn test_code_fence_monospace_with_background() {
        let (_, out) = render("```\nRent: $1,850\n```");
        assert!(out.contains("/F4")); // Courier
        assert!(out.contains("(Rent: $1,850)"));
        assert!(!out.contains("(```)"));
    }

    #[test]
    fn test_table_skips_separator_and_caps_columns() {
        let table = "| Issue | Date | Status | Ref | Extra |\n\
                     |---|---|---|---|---|\n\
                     | Leak | Jan 5 | Open | A1 | dropped |";
        let (_, out) = render(table);
        assert!(out.contains("(Issue)"));
        assert!(out.contains("(Leak)"));
        // Separator dashes never render.
        assert!(!out.contains("(---)"));
        // Fifth column is beyond the cap.
        assert!(!out.contains("(dropped)"));
        assert!(!out.contains("(Extra)"));
    }

    #[test]
    fn test_table_cells_truncate_with_ellipsis() {
        let table = "| A | B |\n|---|---|\n| short | an exceedingly long cell value that cannot possibly fit the column |";
        let (_, out) = render(table);
        assert!(out.contains("..)"));
    }

    #[test]
    fn test_entities_unescaped_in_output() {
        let (_, out) = render("Smith &amp; Co");
        assert!(out.contains("(Smith & Co)"));
    }

    #[test]
    fn test_unterminated_code_fence_still_renders() {
        let (_, out) = render("```\ndangling code");
        assert!(out.contains("(dangling code)"));
    }

    #[test]
    fn test_long_transcript_paginates() {
        let text = vec!["A fairly long paragraph about tenant rights and remedies."; 120].join("\n\n");
        let (pages, _) = render(&text);
        assert!(pages > 1);
    }
}
