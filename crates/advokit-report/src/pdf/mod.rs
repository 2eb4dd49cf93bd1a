//! Low-level PDF generation: document writer, font metrics, and
//! pass-through image decoding.

pub mod image;
pub mod metrics;
pub mod writer;

pub use image::{ColorSpace, ImageEncoding, PdfImage};
pub use metrics::{
    line_height_mm, mm_to_pt, pt_to_mm, split_text_to_size, text_width_mm, text_width_pt, Font,
};
pub use writer::{Color, ImageId, Pdf};
