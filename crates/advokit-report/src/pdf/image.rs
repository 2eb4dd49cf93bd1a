//! Pass-through image decoding for PDF embedding.
//!
//! JPEG and PNG assets are embedded without re-encoding: JPEG data goes
//! into a DCTDecode stream verbatim, and a non-interlaced 8-bit PNG's
//! concatenated IDAT zlib stream goes into a FlateDecode stream with PNG
//! predictor parameters. Only the headers are parsed here, for the
//! dimensions and color layout the XObject dictionary needs.

use advokit_core::{Error, Result};

/// Color space of an embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::DeviceGray => "DeviceGray",
            Self::DeviceRgb => "DeviceRGB",
            Self::DeviceCmyk => "DeviceCMYK",
        }
    }

    /// Color components per pixel, for PNG predictor parameters.
    pub fn components(&self) -> u8 {
        match self {
            Self::DeviceGray => 1,
            Self::DeviceRgb => 3,
            Self::DeviceCmyk => 4,
        }
    }
}

/// Stream encoding of the embedded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// JPEG file body passed through as a DCTDecode stream.
    Jpeg,
    /// PNG IDAT zlib stream passed through as FlateDecode with PNG
    /// predictors.
    PngFlate,
}

/// A decoded image ready for XObject serialization.
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub encoding: ImageEncoding,
    pub data: Vec<u8>,
}

impl PdfImage {
    /// Sniff and parse an asset for embedding.
    ///
    /// Supported: any baseline/progressive JPEG; non-interlaced 8-bit
    /// grayscale or truecolor PNG. Everything else is an `Error::Image`,
    /// which report layers degrade to a placeholder line.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        match infer::get(bytes).map(|t| t.mime_type()) {
            Some("image/jpeg") => decode_jpeg(bytes),
            Some("image/png") => decode_png(bytes),
            Some(other) => Err(Error::Image(format!("unsupported image type: {}", other))),
            None => Err(Error::Image("unrecognized image data".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// JPEG
// ---------------------------------------------------------------------------

/// Start-of-frame markers carrying the image dimensions.
fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

fn decode_jpeg(bytes: &[u8]) -> Result<PdfImage> {
    let err = || Error::Image("malformed JPEG header".to_string());
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return Err(err());
    }
    let mut pos = 2usize;
    while pos + 9 < bytes.len() {
        if bytes[pos] != 0xFF {
            return Err(err());
        }
        let marker = bytes[pos + 1];
        // Standalone markers without a length field.
        if matches!(marker, 0xD8 | 0x01 | 0xD0..=0xD7) {
            pos += 2;
            continue;
        }
        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if len < 2 {
            return Err(err());
        }
        if is_sof_marker(marker) {
            let height = u16::from_be_bytes([bytes[pos + 5], bytes[pos + 6]]) as u32;
            let width = u16::from_be_bytes([bytes[pos + 7], bytes[pos + 8]]) as u32;
            let color_space = match bytes[pos + 9] {
                1 => ColorSpace::DeviceGray,
                3 => ColorSpace::DeviceRgb,
                4 => ColorSpace::DeviceCmyk,
                n => {
                    return Err(Error::Image(format!(
                        "unsupported JPEG component count: {}",
                        n
                    )))
                }
            };
            if width == 0 || height == 0 {
                return Err(err());
            }
            return Ok(PdfImage {
                width,
                height,
                color_space,
                encoding: ImageEncoding::Jpeg,
                data: bytes.to_vec(),
            });
        }
        pos += 2 + len;
    }
    Err(err())
}

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn decode_png(bytes: &[u8]) -> Result<PdfImage> {
    let err = |msg: &str| Error::Image(format!("PNG: {}", msg));
    if bytes.len() < 33 || bytes[..8] != PNG_SIGNATURE {
        return Err(err("malformed signature"));
    }

    // IHDR is required to be the first chunk.
    if &bytes[12..16] != b"IHDR" {
        return Err(err("missing IHDR"));
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    let bit_depth = bytes[24];
    let color_type = bytes[25];
    let interlace = bytes[28];

    if width == 0 || height == 0 {
        return Err(err("zero dimension"));
    }
    if bit_depth != 8 {
        return Err(err("only 8-bit depth is embeddable"));
    }
    if interlace != 0 {
        return Err(err("interlaced images are not embeddable"));
    }
    let color_space = match color_type {
        0 => ColorSpace::DeviceGray,
        2 => ColorSpace::DeviceRgb,
        // Palette, alpha, and gray+alpha would need re-encoding.
        n => return Err(err(&format!("unsupported color type {}", n))),
    };

    let mut idat = Vec::new();
    let mut pos = 8usize;
    while pos + 8 <= bytes.len() {
        let len =
            u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
                as usize;
        let chunk_type = &bytes[pos + 4..pos + 8];
        let data_start = pos + 8;
        let data_end = data_start.checked_add(len).ok_or_else(|| err("bad chunk"))?;
        if data_end > bytes.len() {
            return Err(err("truncated chunk"));
        }
        match chunk_type {
            b"IDAT" => idat.extend_from_slice(&bytes[data_start..data_end]),
            b"IEND" => break,
            _ => {}
        }
        // Skip data + CRC.
        pos = data_end + 4;
    }
    if idat.is_empty() {
        return Err(err("no IDAT data"));
    }

    Ok(PdfImage {
        width,
        height,
        color_space,
        encoding: ImageEncoding::PngFlate,
        data: idat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal JPEG: SOI, APP0 stub, SOF0 with dimensions, EOI.
    pub(crate) fn tiny_jpeg(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        // APP0 "JFIF" so `infer` recognizes the payload.
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        bytes.extend_from_slice(b"JFIF\0");
        bytes.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
        // SOF0: length 17, 8-bit precision, dims, 3 components.
        bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&[
            0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01,
        ]);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    fn png_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0, 0, 0, 0]); // CRC unchecked
        out
    }

    fn tiny_png(width: u32, height: u32, color_type: u8, bit_depth: u8) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);

        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend(png_chunk(b"IHDR", &ihdr));
        bytes.extend(png_chunk(b"IDAT", &[0x78, 0x9C, 0x01, 0x02, 0x03]));
        bytes.extend(png_chunk(b"IEND", &[]));
        bytes
    }

    #[test]
    fn test_decode_jpeg_dimensions() {
        let img = PdfImage::decode(&tiny_jpeg(640, 480)).unwrap();
        assert_eq!(img.width, 640);
        assert_eq!(img.height, 480);
        assert_eq!(img.color_space, ColorSpace::DeviceRgb);
        assert_eq!(img.encoding, ImageEncoding::Jpeg);
    }

    #[test]
    fn test_decode_png_truecolor() {
        let img = PdfImage::decode(&tiny_png(32, 16, 2, 8)).unwrap();
        assert_eq!(img.width, 32);
        assert_eq!(img.height, 16);
        assert_eq!(img.color_space, ColorSpace::DeviceRgb);
        assert_eq!(img.encoding, ImageEncoding::PngFlate);
        assert!(!img.data.is_empty());
    }

    #[test]
    fn test_decode_png_grayscale() {
        let img = PdfImage::decode(&tiny_png(8, 8, 0, 8)).unwrap();
        assert_eq!(img.color_space, ColorSpace::DeviceGray);
    }

    #[test]
    fn test_decode_png_palette_rejected() {
        let result = PdfImage::decode(&tiny_png(8, 8, 3, 8));
        assert!(matches!(result, Err(Error::Image(_))));
    }

    #[test]
    fn test_decode_png_16_bit_rejected() {
        let result = PdfImage::decode(&tiny_png(8, 8, 2, 16));
        assert!(matches!(result, Err(Error::Image(_))));
    }

    #[test]
    fn test_decode_garbage_rejected() {
        let result = PdfImage::decode(b"this is not an image at all");
        assert!(matches!(result, Err(Error::Image(_))));
    }

    #[test]
    fn test_decode_empty_rejected() {
        assert!(PdfImage::decode(&[]).is_err());
    }
}
