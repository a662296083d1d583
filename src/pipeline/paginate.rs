//! Image to PDF: slice one tall page capture into A4 bands.
//!
//! The rasteriser returns the whole document as a single image. This module
//! cuts that image into page-height horizontal bands, JPEG-encodes each
//! band once, and assembles a PDF that shows band `i` on page `i` inside
//! the content box. Slicing in pixel space keeps every page's image object
//! as small as its visible content; embedding the full capture on every
//! page and shifting it upward would multiply the file size by the page
//! count.
//!
//! Geometry is fixed A4 portrait. With the default 25 mm margins the
//! content box is 160 × 247 mm; the capture is scaled to the content width
//! and the band height in pixels follows from that scale factor. The final
//! band is usually shorter and keeps the same scale, anchored at the top
//! margin.

use crate::error::ExportError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::io::Cursor;
use tracing::debug;

// A4 portrait in millimetres and PostScript points.
const PAGE_W_MM: f64 = 210.0;
const PAGE_H_MM: f64 = 297.0;
const MM_TO_PT: f64 = 72.0 / 25.4;

/// Document metadata written to the PDF Info dictionary.
#[derive(Debug, Clone, Copy)]
pub struct PdfMeta<'a> {
    /// `Title` entry, the project title.
    pub title: &'a str,
    /// `Producer` entry, the generator label.
    pub producer: &'a str,
}

/// A finished PDF and its page count.
#[derive(Debug, Clone)]
pub struct PdfAssembly {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Slice the page capture into bands and assemble the PDF.
///
/// No `CreationDate` is written, so the same capture yields byte-identical
/// output across runs.
pub fn paginate(
    image: &DynamicImage,
    margins_mm: f32,
    jpeg_quality: u8,
    meta: &PdfMeta<'_>,
) -> Result<PdfAssembly, ExportError> {
    let (width_px, height_px) = (image.width(), image.height());
    if width_px == 0 || height_px == 0 {
        return Err(ExportError::EmptyRender {
            width: width_px,
            height: height_px,
        });
    }

    let margins = margins_mm as f64;
    let content_w_mm = PAGE_W_MM - 2.0 * margins;
    let content_h_mm = PAGE_H_MM - 2.0 * margins;
    if content_w_mm <= 0.0 || content_h_mm <= 0.0 {
        return Err(ExportError::InvalidConfig(format!(
            "Margins of {margins_mm} mm leave no content area on an A4 page"
        )));
    }

    // One source pixel maps to content_w_mm / width_px millimetres; a full
    // band is therefore this many pixels tall. Sub-pixel remainders fold
    // into the last band instead of producing a sliver page.
    let band_h_px = content_h_mm * width_px as f64 / content_w_mm;
    let mut bands = Vec::new();
    let mut start = 0.0_f64;
    while (start.round() as u32) < height_px {
        let y0 = start.round() as u32;
        let y1 = ((start + band_h_px).round() as u32).min(height_px);
        if y1 <= y0 {
            break;
        }
        bands.push((y0, y1 - y0));
        start += band_h_px;
    }
    debug!(
        width_px,
        height_px,
        bands = bands.len(),
        band_h_px = band_h_px.round() as u32,
        "slicing capture into pages"
    );

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut page_ids = Vec::with_capacity(bands.len());

    for (y0, band_height) in &bands {
        let band = image.crop_imm(0, *y0, width_px, *band_height).to_rgb8();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut Cursor::new(&mut jpeg), jpeg_quality)
            .encode_image(&band)?;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width_px as i64,
                "Height" => *band_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        // Place the band full content width, top-aligned at the top margin.
        let band_h_mm = *band_height as f64 * content_w_mm / width_px as f64;
        let w_pt = (content_w_mm * MM_TO_PT) as f32;
        let h_pt = (band_h_mm * MM_TO_PT) as f32;
        let x_pt = (margins * MM_TO_PT) as f32;
        let y_pt = ((PAGE_H_MM - margins - band_h_mm) * MM_TO_PT) as f32;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        w_pt.into(),
                        0_i64.into(),
                        0_i64.into(),
                        h_pt.into(),
                        x_pt.into(),
                        y_pt.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content.encode().map_err(|e| ExportError::PdfAssembly {
            detail: format!("content stream encoding failed: {e}"),
        })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0_i64.into(),
                0_i64.into(),
                ((PAGE_W_MM * MM_TO_PT) as f32).into(),
                ((PAGE_H_MM * MM_TO_PT) as f32).into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => pdf_string(meta.title),
        "Producer" => pdf_string(meta.producer),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::PdfAssembly {
            detail: format!("could not serialise document: {e}"),
        })?;

    Ok(PdfAssembly {
        bytes,
        pages: page_ids.len(),
    })
}

/// PDF text string: plain literal for ASCII, UTF-16BE with BOM otherwise.
/// German umlauts in titles are the norm here, not the exception.
fn pdf_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const META: PdfMeta<'_> = PdfMeta {
        title: "Leistungsbeschreibung",
        producer: "Leistungsbeschreibungs-Generator",
    };

    fn white_capture(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).expect("valid pdf").get_pages().len()
    }

    #[test]
    fn short_capture_yields_one_page() {
        let assembly = paginate(&white_capture(794, 500), 25.0, 90, &META).unwrap();
        assert_eq!(assembly.pages, 1);
        assert_eq!(page_count(&assembly.bytes), 1);
    }

    #[test]
    fn tall_capture_spills_over_pages() {
        // At 794 px width and 25 mm margins a full band is ~1226 px.
        let assembly = paginate(&white_capture(794, 3000), 25.0, 90, &META).unwrap();
        assert_eq!(assembly.pages, 3);
        assert_eq!(page_count(&assembly.bytes), 3);
    }

    #[test]
    fn band_heights_cover_the_capture_exactly() {
        let assembly = paginate(&white_capture(1588, 5000), 25.0, 90, &META).unwrap();
        // 5000 / (247 * 1588 / 160) ≈ 2.04 bands.
        assert_eq!(assembly.pages, 3);
    }

    #[test]
    fn empty_capture_is_rejected() {
        let err = paginate(&white_capture(0, 0), 25.0, 90, &META).unwrap_err();
        assert!(matches!(
            err,
            ExportError::EmptyRender {
                width: 0,
                height: 0
            }
        ));
    }

    #[test]
    fn oversized_margins_are_rejected() {
        let err = paginate(&white_capture(794, 500), 110.0, 90, &META).unwrap_err();
        assert!(matches!(err, ExportError::InvalidConfig(_)));
    }

    #[test]
    fn metadata_lands_in_the_info_dictionary() {
        let assembly = paginate(&white_capture(794, 400), 25.0, 90, &META).unwrap();
        let doc = Document::load_mem(&assembly.bytes).unwrap();
        let info_id = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        let title = info.get(b"Title").and_then(Object::as_str).unwrap();
        assert_eq!(title, b"Leistungsbeschreibung");
    }

    #[test]
    fn umlaut_title_is_utf16_encoded() {
        let meta = PdfMeta {
            title: "Gebäudereinigung",
            producer: "Generator",
        };
        let assembly = paginate(&white_capture(794, 400), 25.0, 90, &meta).unwrap();
        let doc = Document::load_mem(&assembly.bytes).unwrap();
        let info_id = doc
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        let title = info.get(b"Title").and_then(Object::as_str).unwrap();
        assert_eq!(&title[0..2], &[0xFE, 0xFF]);
    }

    #[test]
    fn same_capture_serialises_identically() {
        let capture = white_capture(794, 600);
        let a = paginate(&capture, 25.0, 90, &META).unwrap();
        let b = paginate(&capture, 25.0, 90, &META).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }
}
