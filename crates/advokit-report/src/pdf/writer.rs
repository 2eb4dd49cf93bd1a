//! Minimal PDF document writer.
//!
//! Produces the object graph, content streams, cross-reference table, and
//! trailer for a multi-page document drawn with the standard base fonts.
//! The drawing API takes millimetres with a top-left origin (the layout
//! engine's coordinate system); conversion to PDF points and bottom-left
//! origin happens here.
//!
//! Content streams are written uncompressed. Documents stay small (text
//! plus pass-through images) and the raw streams keep rendered output
//! inspectable in tests.

use super::image::{ColorSpace, ImageEncoding, PdfImage};
use super::metrics::{mm_to_pt, Font};

/// An RGB color with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);

    fn operands(&self) -> String {
        format!(
            "{:.3} {:.3} {:.3}",
            self.0 as f64 / 255.0,
            self.1 as f64 / 255.0,
            self.2 as f64 / 255.0
        )
    }
}

/// Identifier of an image registered with [`Pdf::add_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageId(usize);

/// In-memory PDF document under construction.
pub struct Pdf {
    width_pt: f64,
    height_pt: f64,
    pages: Vec<String>,
    images: Vec<PdfImage>,
    active: usize,
    font: Font,
    font_size: f64,
    text_color: Color,
    fill_color: Color,
}

impl Pdf {
    /// Create a document with one empty page of the given size.
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_pt: mm_to_pt(width_mm),
            height_pt: mm_to_pt(height_mm),
            pages: vec![String::new()],
            images: Vec::new(),
            active: 0,
            font: Font::Helvetica,
            font_size: 10.0,
            text_color: Color::BLACK,
            fill_color: Color::BLACK,
        }
    }

    /// Append a new page and make it active.
    pub fn add_page(&mut self) {
        self.pages.push(String::new());
        self.active = self.pages.len() - 1;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Switch drawing to an existing page (0-based). Used by the footer
    /// pass once the total page count is known.
    pub fn set_page(&mut self, index: usize) {
        debug_assert!(index < self.pages.len());
        self.active = index.min(self.pages.len() - 1);
    }

    pub fn set_font(&mut self, font: Font, size: f64) {
        self.font = font;
        self.font_size = size;
    }

    pub fn font(&self) -> (Font, f64) {
        (self.font, self.font_size)
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// Draw `text` with its baseline at `(x_mm, y_mm)` from the top-left
    /// corner, in the current font and text color.
    pub fn text(&mut self, text: &str, x_mm: f64, y_mm: f64) {
        let x = mm_to_pt(x_mm);
        let y = self.height_pt - mm_to_pt(y_mm);
        let op = format!(
            "BT /{} {:.2} Tf {} rg 1 0 0 1 {:.2} {:.2} Tm ({}) Tj ET\n",
            self.font.resource_name(),
            self.font_size,
            self.text_color.operands(),
            x,
            y,
            escape_text(text)
        );
        self.pages[self.active].push_str(&op);
    }

    /// Fill a rectangle whose top-left corner is `(x_mm, y_mm)`.
    pub fn fill_rect(&mut self, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64) {
        let x = mm_to_pt(x_mm);
        let y = self.height_pt - mm_to_pt(y_mm + h_mm);
        let op = format!(
            "{} rg {:.2} {:.2} {:.2} {:.2} re f\n",
            self.fill_color.operands(),
            x,
            y,
            mm_to_pt(w_mm),
            mm_to_pt(h_mm)
        );
        self.pages[self.active].push_str(&op);
    }

    /// Register an image for later placement. Images are shared across
    /// pages; registering once and placing many times is fine.
    pub fn add_image(&mut self, image: PdfImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    /// Place a registered image with its top-left corner at
    /// `(x_mm, y_mm)`, scaled into a `w_mm` × `h_mm` box.
    pub fn draw_image(&mut self, id: ImageId, x_mm: f64, y_mm: f64, w_mm: f64, h_mm: f64) {
        let x = mm_to_pt(x_mm);
        let y = self.height_pt - mm_to_pt(y_mm + h_mm);
        let op = format!(
            "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im{} Do Q\n",
            mm_to_pt(w_mm),
            mm_to_pt(h_mm),
            x,
            y,
            id.0
        );
        self.pages[self.active].push_str(&op);
    }

    /// Serialize the document.
    pub fn render(self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        // Object numbering: 1 catalog, 2 page tree, 3-6 fonts, then one
        // object per image, then (page, content) pairs.
        let font_base = 3usize;
        let image_base = font_base + Font::ALL.len();
        let page_base = image_base + self.images.len();
        let total = page_base + 2 * self.pages.len() - 1;

        let mut offsets: Vec<(usize, usize)> = Vec::new();
        let mut push_obj = |out: &mut Vec<u8>, num: usize, body: &[u8]| {
            offsets.push((num, out.len()));
            out.extend_from_slice(format!("{} 0 obj\n", num).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        };

        push_obj(
            &mut out,
            1,
            b"<< /Type /Catalog /Pages 2 0 R >>",
        );

        let kids: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", page_base + 2 * i))
            .collect();
        push_obj(
            &mut out,
            2,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.pages.len()
            )
            .as_bytes(),
        );

        for (i, font) in Font::ALL.iter().enumerate() {
            push_obj(
                &mut out,
                font_base + i,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_name()
                )
                .as_bytes(),
            );
        }

        for (i, image) in self.images.iter().enumerate() {
            let body = image_object(image);
            push_obj(&mut out, image_base + i, &body);
        }

        let font_dict: String = Font::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| format!("/{} {} 0 R ", f.resource_name(), font_base + i))
            .collect();
        let xobject_dict: String = (0..self.images.len())
            .map(|i| format!("/Im{} {} 0 R ", i, image_base + i))
            .collect();

        for (i, content) in self.pages.iter().enumerate() {
            let page_num = page_base + 2 * i;
            let content_num = page_num + 1;
            let mut resources = format!("/Font << {}>>", font_dict);
            if !self.images.is_empty() {
                resources.push_str(&format!(" /XObject << {}>>", xobject_dict));
            }
            push_obj(
                &mut out,
                page_num,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << {} >> /Contents {} 0 R >>",
                    self.width_pt, self.height_pt, resources, content_num
                )
                .as_bytes(),
            );
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(content.as_bytes());
            stream.extend_from_slice(b"endstream");
            push_obj(&mut out, content_num, &stream);
        }

        let xref_start = out.len();
        offsets.sort_by_key(|(num, _)| *num);
        out.extend_from_slice(format!("xref\n0 {}\n", total + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for (_, offset) in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                total + 1,
                xref_start
            )
            .as_bytes(),
        );
        out
    }
}

/// Serialize an image XObject dictionary plus stream.
fn image_object(image: &PdfImage) -> Vec<u8> {
    let mut dict = format!(
        "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /{} \
         /BitsPerComponent 8 ",
        image.width,
        image.height,
        image.color_space.pdf_name()
    );
    match image.encoding {
        ImageEncoding::Jpeg => {
            dict.push_str("/Filter /DCTDecode ");
            // Adobe CMYK JPEGs store inverted values.
            if image.color_space == ColorSpace::DeviceCmyk {
                dict.push_str("/Decode [1 0 1 0 1 0 1 0] ");
            }
        }
        ImageEncoding::PngFlate => {
            dict.push_str(&format!(
                "/Filter /FlateDecode /DecodeParms << /Predictor 15 /Colors {} \
                 /BitsPerComponent 8 /Columns {} >> ",
                image.color_space.components(),
                image.width
            ));
        }
    }
    dict.push_str(&format!("/Length {} >>\nstream\n", image.data.len()));

    let mut body = dict.into_bytes();
    body.extend_from_slice(&image.data);
    body.extend_from_slice(b"\nendstream");
    body
}

/// Escape text for a PDF literal string in WinAnsi encoding.
///
/// Latin-1 codepoints outside printable ASCII are written as octal
/// escapes, the typographic characters WinAnsi places in 0x80-0x9F are
/// mapped there, and anything else that survived `cleantext` becomes a
/// question mark.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            '\u{A0}'..='\u{FF}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => match winansi_high(c) {
                Some(byte) => out.push_str(&format!("\\{:03o}", byte)),
                None => out.push('?'),
            },
        }
    }
    out
}

/// WinAnsi 0x80-0x9F assignments for the typographic characters chat
/// content actually contains.
fn winansi_high(c: char) -> Option<u8> {
    match c {
        '\u{20AC}' => Some(0x80), // euro
        '\u{2026}' => Some(0x85), // ellipsis
        '\u{2018}' => Some(0x91), // left single quote
        '\u{2019}' => Some(0x92), // right single quote
        '\u{201C}' => Some(0x93), // left double quote
        '\u{201D}' => Some(0x94), // right double quote
        '\u{2022}' => Some(0x95), // bullet
        '\u{2013}' => Some(0x96), // en dash
        '\u{2014}' => Some(0x97), // em dash
        '\u{2122}' => Some(0x99), // trademark
        _ => None,
    }
}
