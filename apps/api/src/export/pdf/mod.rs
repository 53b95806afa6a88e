//! Minimal single-page PDF 1.4 output for a captured surface.

pub mod content;
pub mod images;
pub mod objects;
pub mod writer;

use std::io;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::export::capture::{Capture, DrawOp};
use crate::export::font_metrics::Face;
use crate::export::page::{page_size_pt, Placement, PT_PER_MM};
use content::{encode_win_ansi, ContentStream};
use objects::{PdfDictionary, PdfObject, PdfStream};
use writer::PdfWriter;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
}

const PRODUCER: &str = "resumeforge";

fn round2(v: f32) -> f64 {
    (f64::from(v) * 100.0).round() / 100.0
}

/// Paints `capture` onto one A4 page at `placement` and serializes the file.
pub fn write_page(
    capture: &Capture,
    placement: &Placement,
    meta: &PageMeta,
    compress: bool,
) -> Result<Vec<u8>, PdfError> {
    let (page_w, page_h) = page_size_pt();
    let mut pdf = PdfWriter::new(Vec::new(), compress);
    pdf.write_header()?;

    let catalog_ref = pdf.allocate_object();
    let pages_ref = pdf.allocate_object();
    let page_ref = pdf.allocate_object();
    let content_ref = pdf.allocate_object();
    let info_ref = pdf.allocate_object();
    let font_refs: Vec<(Face, u32)> = Face::ALL
        .iter()
        .map(|face| (*face, pdf.allocate_object()))
        .collect();
    let image_refs: Vec<u32> = capture
        .images
        .iter()
        .map(|_| pdf.allocate_object())
        .collect();

    let mut catalog = PdfDictionary::with_type("Catalog");
    catalog.insert("Pages", PdfObject::Reference(pages_ref));
    pdf.write_object(catalog_ref, &PdfObject::Dictionary(catalog))?;

    let mut pages = PdfDictionary::with_type("Pages");
    pages.insert("Kids", PdfObject::Array(vec![PdfObject::Reference(page_ref)]));
    pages.insert("Count", PdfObject::Integer(1));
    pdf.write_object(pages_ref, &PdfObject::Dictionary(pages))?;

    let mut fonts = PdfDictionary::new();
    for (face, num) in &font_refs {
        fonts.insert(face.resource_name(), PdfObject::Reference(*num));
    }
    let mut resources = PdfDictionary::new();
    resources.insert("Font", PdfObject::Dictionary(fonts));
    if !image_refs.is_empty() {
        let mut xobjects = PdfDictionary::new();
        for (i, num) in image_refs.iter().enumerate() {
            xobjects.insert(image_name(i), PdfObject::Reference(*num));
        }
        resources.insert("XObject", PdfObject::Dictionary(xobjects));
    }

    let mut page = PdfDictionary::with_type("Page");
    page.insert("Parent", PdfObject::Reference(pages_ref));
    page.insert(
        "MediaBox",
        PdfObject::Array(vec![
            PdfObject::Integer(0),
            PdfObject::Integer(0),
            PdfObject::Real(round2(page_w)),
            PdfObject::Real(round2(page_h)),
        ]),
    );
    page.insert("Resources", PdfObject::Dictionary(resources));
    page.insert("Contents", PdfObject::Reference(content_ref));
    pdf.write_object(page_ref, &PdfObject::Dictionary(page))?;

    let stream = PdfStream::new(paint(capture, placement, page_h));
    pdf.write_stream_object(content_ref, stream)?;

    let mut info = PdfDictionary::new();
    info.insert("Title", PdfObject::String(encode_win_ansi(&meta.title)));
    info.insert("Producer", PdfObject::String(PRODUCER.as_bytes().to_vec()));
    if let Some(created_at) = meta.created_at {
        let stamp = created_at.format("D:%Y%m%d%H%M%SZ").to_string();
        info.insert("CreationDate", PdfObject::String(stamp.into_bytes()));
    }
    pdf.write_object(info_ref, &PdfObject::Dictionary(info))?;

    for (face, num) in &font_refs {
        let mut font = PdfDictionary::with_type("Font");
        font.insert("Subtype", PdfObject::name("Type1"));
        font.insert("BaseFont", PdfObject::name(face.base_font()));
        font.insert("Encoding", PdfObject::name("WinAnsiEncoding"));
        pdf.write_object(*num, &PdfObject::Dictionary(font))?;
    }

    for (image, num) in capture.images.iter().zip(&image_refs) {
        pdf.write_stream_object(*num, image.to_xobject())?;
    }

    pdf.write_xref_and_trailer(catalog_ref, Some(info_ref))?;
    pdf.finish()
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Builds the page content: clip to the placed area, then replay the capture's ops in
/// page space.
fn paint(capture: &Capture, placement: &Placement, page_h: f32) -> Vec<u8> {
    let k = f64::from(placement.scale_pt());
    let origin_x = f64::from(placement.x * PT_PER_MM);
    let top = f64::from(page_h - placement.y * PT_PER_MM);
    let px = |x: f32| origin_x + f64::from(x) * k;
    let py = |y: f32| top - f64::from(y) * k;

    let mut stream = ContentStream::new();
    stream
        .save_state()
        .rect(
            origin_x,
            py(capture.height),
            f64::from(capture.width) * k,
            f64::from(capture.height) * k,
        )
        .clip();

    for op in &capture.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                stream
                    .set_fill_color(*color)
                    .rect(px(*x), py(y + height), f64::from(*width) * k, f64::from(*height) * k)
                    .fill();
            }
            DrawOp::Circle {
                cx,
                cy,
                radius,
                color,
            } => {
                stream
                    .set_fill_color(*color)
                    .circle(px(*cx), py(*cy), f64::from(*radius) * k)
                    .fill();
            }
            DrawOp::Text {
                x,
                baseline,
                size,
                face,
                color,
                content,
            } => {
                stream.set_fill_color(*color).text_line(
                    *face,
                    f64::from(*size) * k,
                    px(*x),
                    py(*baseline),
                    content,
                );
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                index,
            } => {
                stream.draw_image(
                    &image_name(*index),
                    px(*x),
                    py(y + height),
                    f64::from(*width) * k,
                    f64::from(*height) * k,
                );
            }
        }
    }

    stream.restore_state();
    stream.into_bytes()
}
