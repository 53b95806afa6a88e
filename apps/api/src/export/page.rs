//! Single-page A4 placement: uniform scale to fit, centered horizontally, anchored to the top.

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Where a captured surface lands on the page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Millimetres per capture unit.
    pub ratio: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Points per capture unit.
    pub fn scale_pt(&self) -> f32 {
        self.ratio * PT_PER_MM
    }
}

pub fn fit_to_page(width: f32, height: f32) -> Placement {
    let width = width.max(1.0);
    let height = height.max(1.0);
    let ratio = (A4_WIDTH_MM / width).min(A4_HEIGHT_MM / height);
    Placement {
        ratio,
        x: (A4_WIDTH_MM - width * ratio) / 2.0,
        y: 0.0,
        width: width * ratio,
        height: height * ratio,
    }
}

pub fn page_size_pt() -> (f32, f32) {
    (A4_WIDTH_MM * PT_PER_MM, A4_HEIGHT_MM * PT_PER_MM)
}
