// Template Renderer: pure mapping from (ResumeRecord, Viewport) to a document tree.
// One renderer per layout variant behind the `Renderer` trait; `render_record` dispatches on
// the record's template. No I/O and no hidden state, so equal inputs give equal trees.

pub mod classic;
pub mod document;
pub mod html;
pub mod modern;
pub mod sections;

use serde::{Deserialize, Serialize};

use crate::models::resume::{ResumeRecord, Template};

pub use classic::ClassicRenderer;
pub use document::Document;
pub use modern::ModernRenderer;

/// The width the document is laid out for, in CSS px.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub const MIN_WIDTH: u32 = 320;
    pub const MAX_WIDTH: u32 = 1600;

    pub fn new(width: u32) -> Self {
        Self {
            width: width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH),
        }
    }
}

impl Default for Viewport {
    /// The preview card width.
    fn default() -> Self {
        Self { width: 896 }
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, record: &ResumeRecord, viewport: Viewport) -> Document;
}

pub fn renderer_for(template: Template) -> &'static dyn Renderer {
    match template {
        Template::Modern => &ModernRenderer,
        Template::Classic => &ClassicRenderer,
    }
}

pub fn render_record(record: &ResumeRecord, viewport: Viewport) -> Document {
    renderer_for(record.template).render(record, viewport)
}

/// A mounted preview: the record snapshot and the document rendered from it.
/// This is the handle the export pipeline captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedView {
    pub record: ResumeRecord,
    pub document: Document,
}

impl RenderedView {
    pub fn mount(record: ResumeRecord, viewport: Viewport) -> Self {
        let document = render_record(&record, viewport);
        Self { record, document }
    }
}
