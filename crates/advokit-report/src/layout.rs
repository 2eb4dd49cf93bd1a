//! Page layout cursor.
//!
//! A single running vertical position over an A4 page, with one
//! pagination primitive: before a block is drawn, the cursor checks
//! whether the block still fits above the bottom margin and starts a new
//! page if not. There is no widow/orphan control beyond that per-block
//! atomicity.

use crate::config::ReportConfig;
use crate::pdf::{line_height_mm, split_text_to_size, Color, Font, Pdf};

/// A document under layout: the PDF writer plus the running cursor.
pub struct PageCursor {
    pdf: Pdf,
    config: ReportConfig,
    y: f64,
}

impl PageCursor {
    pub fn new(config: ReportConfig) -> Self {
        let pdf = Pdf::new(config.page_width, config.page_height);
        let y = config.margin;
        Self { pdf, config, y }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Current vertical position, millimetres from the top of the page.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    pub fn content_width(&self) -> f64 {
        self.config.content_width()
    }

    pub fn left(&self) -> f64 {
        self.config.margin
    }

    /// Start a new page and reset the cursor to the top margin.
    pub fn new_page(&mut self) {
        self.pdf.add_page();
        self.y = self.config.margin;
    }

    /// The sole pagination mechanism: if `needed_mm` of vertical space
    /// would cross the bottom margin, start a new page. Returns whether a
    /// break happened.
    pub fn ensure_room(&mut self, needed_mm: f64) -> bool {
        if self.y + needed_mm > self.config.page_height - self.config.margin {
            self.new_page();
            return true;
        }
        false
    }

    /// Draw one line of text at the cursor and advance by its height.
    /// The caller is responsible for `ensure_room`.
    pub fn text_line(&mut self, text: &str, x: f64, font: Font, size: f64, color: Color) {
        self.pdf.set_font(font, size);
        self.pdf.set_text_color(color);
        let baseline = self.y + line_height_mm(size) * 0.8;
        self.pdf.text(text, x, baseline);
        self.y += line_height_mm(size);
    }

    /// Wrap `text` to `width` and draw it as one atomic block: if the
    /// whole block fits on a fresh page it never straddles a break.
    /// Blocks taller than a full page degrade to line-level breaking.
    pub fn paragraph(&mut self, text: &str, x: f64, width: f64, font: Font, size: f64, color: Color) {
        let lines = split_text_to_size(text, width, font, size);
        let block_height = lines.len() as f64 * line_height_mm(size);
        let usable = self.config.page_height - 2.0 * self.config.margin;
        if block_height <= usable {
            self.ensure_room(block_height);
            for line in &lines {
                self.text_line(line, x, font, size, color);
            }
        } else {
            for line in &lines {
                self.ensure_room(line_height_mm(size));
                self.text_line(line, x, font, size, color);
            }
        }
    }

    /// Filled rectangle at an absolute position on the current page.
    /// Does not move the cursor.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.pdf.set_fill_color(color);
        self.pdf.fill_rect(x, y, w, h);
    }

    /// Direct access to the writer for image placement and the footer
    /// pass.
    pub fn pdf_mut(&mut self) -> &mut Pdf {
        &mut self.pdf
    }

    pub fn page_count(&self) -> usize {
        self.pdf.page_count()
    }

    /// Finish layout and hand the writer back for final passes.
    pub fn into_pdf(self) -> Pdf {
        self.pdf
    }
}
