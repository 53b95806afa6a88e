//! Capture: lays a rendered document out at its viewport width and records the
//! resulting paint operations, oversampled for print.
//!
//! Coordinates are capture units (CSS px × `OVERSAMPLE`), origin top-left, y down.

use crate::export::font_metrics::{Face, ASCENT, LINE_HEIGHT};
use crate::export::pdf::images::JpegImage;
use crate::form::image::{ImageFormat, ProfileImage};
use crate::render::document::{
    Align, BlockStyle, Color, ColumnWidth, Document, FontFamily, Node, TextRun, TextStyle,
};

pub const OVERSAMPLE: f32 = 2.0;

const TIMELINE_INSET: f32 = 16.0;
const TIMELINE_WIDTH: f32 = 2.0;
const BORDER_GAP: f32 = 12.0;
const SPREAD_GAP: f32 = 12.0;
const CHIP_PAD_X: f32 = 10.0;
const CHIP_PAD_Y: f32 = 2.0;
const CHIP_GAP: f32 = 6.0;
const BAR_GAP: f32 = 4.0;
const BAR_HEIGHT: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        face: Face,
        color: Color,
        content: String,
    },
    /// Paints `Capture::images[index]`.
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        index: usize,
    },
}

impl DrawOp {
    fn scaled(self, k: f32) -> Self {
        match self {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => DrawOp::Rect {
                x: x * k,
                y: y * k,
                width: width * k,
                height: height * k,
                color,
            },
            DrawOp::Circle {
                cx,
                cy,
                radius,
                color,
            } => DrawOp::Circle {
                cx: cx * k,
                cy: cy * k,
                radius: radius * k,
                color,
            },
            DrawOp::Text {
                x,
                baseline,
                size,
                face,
                color,
                content,
            } => DrawOp::Text {
                x: x * k,
                baseline: baseline * k,
                size: size * k,
                face,
                color,
                content,
            },
            DrawOp::Image {
                x,
                y,
                width,
                height,
                index,
            } => DrawOp::Image {
                x: x * k,
                y: y * k,
                width: width * k,
                height: height * k,
                index,
            },
        }
    }
}

/// The captured surface: its extent and everything painted on it, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
    pub images: Vec<JpegImage>,
}

impl Capture {
    /// Every text run in paint order, one per line.
    pub fn text_lines(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}

pub fn capture(document: &Document) -> Capture {
    let width = document.viewport.width as f32;
    let mut layout = Layout::default();
    let height = layout.node(&document.root, 0.0, 0.0, width, 0.0);
    Capture {
        width: width * OVERSAMPLE,
        height: height * OVERSAMPLE,
        ops: layout
            .ops
            .into_iter()
            .map(|op| op.scaled(OVERSAMPLE))
            .collect(),
        images: layout.images,
    }
}

#[derive(Default)]
struct Layout {
    ops: Vec<DrawOp>,
    images: Vec<JpegImage>,
}

impl Layout {
    /// Lays `node` out with its top-left at (x, y) within `width`; returns the height used.
    /// Blocks stretch to `min_height` (column siblings share a height).
    fn node(&mut self, node: &Node, x: f32, y: f32, width: f32, min_height: f32) -> f32 {
        match node {
            Node::Block {
                style, children, ..
            } => self.block(style, children, x, y, width, min_height),
            Node::Columns { gap, columns } => {
                let count = columns.len();
                if count == 0 {
                    return 0.0;
                }
                let gaps = gap * (count - 1) as f32;
                let fixed: f32 = columns
                    .iter()
                    .filter_map(|c| match c.width {
                        ColumnWidth::Fixed(px) => Some(px),
                        ColumnWidth::Fill => None,
                    })
                    .sum();
                let fills = columns
                    .iter()
                    .filter(|c| c.width == ColumnWidth::Fill)
                    .count();
                let fill_width = if fills == 0 {
                    0.0
                } else {
                    ((width - gaps - fixed) / fills as f32).max(0.0)
                };
                let widths: Vec<f32> = columns
                    .iter()
                    .map(|c| match c.width {
                        ColumnWidth::Fixed(px) => px,
                        ColumnWidth::Fill => fill_width,
                    })
                    .collect();

                let tallest = columns
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| Layout::default().node(&c.node, 0.0, 0.0, *w, 0.0))
                    .fold(min_height, f32::max);

                let mut cx = x;
                for (column, w) in columns.iter().zip(&widths) {
                    self.node(&column.node, cx, y, *w, tallest);
                    cx += w + gap;
                }
                tallest
            }
            Node::Text(run) => self.text(run, x, y, width),
            Node::Spread { start, end } => self.spread(start, end, x, y, width),
            Node::Chips {
                items,
                text,
                background,
            } => self.chips(items, text, *background, x, y, width),
            Node::SkillBar {
                label,
                percent,
                track,
                fill,
            } => {
                let label_height = self.text(label, x, y, width);
                let bar_y = y + label_height + BAR_GAP;
                self.rect(x, bar_y, width, BAR_HEIGHT, *track);
                let filled = width * f32::from((*percent).min(100)) / 100.0;
                self.rect(x, bar_y, filled, BAR_HEIGHT, *fill);
                label_height + BAR_GAP + BAR_HEIGHT
            }
            Node::Rule { color, thickness } => {
                self.rect(x, y, width, *thickness, *color);
                *thickness
            }
            Node::Avatar {
                image,
                initials,
                size,
                background,
            } => {
                let left = x + ((width - size) / 2.0).max(0.0);
                match image.as_ref().and_then(embeddable) {
                    Some(jpeg) => {
                        self.images.push(jpeg);
                        self.ops.push(DrawOp::Image {
                            x: left,
                            y,
                            width: *size,
                            height: *size,
                            index: self.images.len() - 1,
                        });
                    }
                    None => {
                        let radius = size / 2.0;
                        self.ops.push(DrawOp::Circle {
                            cx: left + radius,
                            cy: y + radius,
                            radius,
                            color: *background,
                        });
                        let style = TextStyle::new(FontFamily::Sans, size * 0.36)
                            .bold()
                            .color(Color::WHITE);
                        let face = face_of(&style);
                        let text_width = face.measure(initials) * style.size;
                        let line_height = style.size * LINE_HEIGHT;
                        self.line(
                            initials,
                            &style,
                            left + radius - text_width / 2.0,
                            y + (size - line_height) / 2.0,
                        );
                    }
                }
                *size
            }
            Node::Spacer(height) => *height,
        }
    }

    fn block(
        &mut self,
        style: &BlockStyle,
        children: &[Node],
        x: f32,
        y: f32,
        width: f32,
        min_height: f32,
    ) -> f32 {
        let background_at = self.ops.len();
        let left = style.padding
            + if style.timeline.is_some() {
                TIMELINE_INSET
            } else {
                0.0
            };
        let inner_width = (width - left - style.padding).max(0.0);
        let content_top = y + style.padding;

        let mut cursor = content_top;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                cursor += style.gap;
            }
            cursor += self.node(child, x + left, cursor, inner_width, 0.0);
        }

        if let Some(color) = style.timeline {
            self.rect(x, content_top, TIMELINE_WIDTH, cursor - content_top, color);
        }
        if let Some((color, thickness)) = style.border_bottom {
            cursor += BORDER_GAP;
            self.rect(x, cursor, width, thickness, color);
            cursor += thickness;
        }

        let height = (cursor + style.padding - y).max(min_height);
        if let Some(color) = style.background {
            self.ops.insert(
                background_at,
                DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                },
            );
        }
        height
    }

    fn text(&mut self, run: &TextRun, x: f32, y: f32, width: f32) -> f32 {
        let style = &run.style;
        let face = face_of(style);
        let line_height = style.size * LINE_HEIGHT;
        let lines = face.wrap(&run.display(), width / style.size);
        for (i, line) in lines.iter().enumerate() {
            let line_x = match style.align {
                Align::Start => x,
                Align::Center => {
                    let w = face.measure(line) * style.size;
                    x + ((width - w) / 2.0).max(0.0)
                }
            };
            self.line(line, style, line_x, y + i as f32 * line_height);
        }
        lines.len() as f32 * line_height
    }

    /// Paints one unwrapped line whose line box starts at `top`.
    fn line(&mut self, content: &str, style: &TextStyle, x: f32, top: f32) {
        let line_height = style.size * LINE_HEIGHT;
        self.ops.push(DrawOp::Text {
            x,
            baseline: top + (line_height - style.size) / 2.0 + style.size * ASCENT,
            size: style.size,
            face: face_of(style),
            color: style.color,
            content: content.to_string(),
        });
    }

    fn spread(&mut self, start: &TextRun, end: &TextRun, x: f32, y: f32, width: f32) -> f32 {
        let end_text = end.display();
        if end_text.trim().is_empty() {
            return self.text(start, x, y, width);
        }
        let end_width = face_of(&end.style).measure(&end_text) * end.style.size;
        let start_width = (width - end_width - SPREAD_GAP).max(width * 0.4);
        let start_height = self.text(start, x, y, start_width);
        self.line(&end_text, &end.style, x + width - end_width, y);
        start_height.max(end.style.size * LINE_HEIGHT)
    }

    fn chips(
        &mut self,
        items: &[String],
        text: &TextStyle,
        background: Color,
        x: f32,
        y: f32,
        width: f32,
    ) -> f32 {
        if items.is_empty() {
            return 0.0;
        }
        let face = face_of(text);
        let chip_height = text.size * LINE_HEIGHT + CHIP_PAD_Y * 2.0;
        let mut cx = x;
        let mut cy = y;
        for item in items {
            let chip_width = face.measure(item) * text.size + CHIP_PAD_X * 2.0;
            if cx > x && cx + chip_width > x + width {
                cx = x;
                cy += chip_height + CHIP_GAP;
            }
            self.rect(cx, cy, chip_width, chip_height, background);
            self.line(item, text, cx + CHIP_PAD_X, cy + CHIP_PAD_Y);
            cx += chip_width + CHIP_GAP;
        }
        cy + chip_height - y
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if width > 0.0 && height > 0.0 {
            self.ops.push(DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            });
        }
    }
}

fn face_of(style: &TextStyle) -> Face {
    Face::of(style.family, style.weight)
}

/// JPEG avatars are embedded as-is; anything else falls back to initials.
fn embeddable(image: &ProfileImage) -> Option<JpegImage> {
    if image.format() != ImageFormat::Jpeg {
        return None;
    }
    let bytes = image.decode().ok()?;
    JpegImage::parse(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::image::tests::tiny_jpeg;
    use crate::models::resume::{Experience, ResumeRecord, Template};
    use crate::render::{render_record, Viewport};

    fn jane(template: Template) -> ResumeRecord {
        ResumeRecord {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            template,
            technical_skills: "Rust, SQL".to_string(),
            experience: vec![Experience {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                duration: "2020-2022".to_string(),
                description: "Built things".to_string(),
            }],
            ..ResumeRecord::default()
        }
    }

    #[test]
    fn test_capture_is_oversampled() {
        let doc = render_record(&jane(Template::Classic), Viewport::new(800));
        let cap = capture(&doc);
        assert_eq!(cap.width, 1600.0);
        assert!(cap.height > 0.0);
    }

    #[test]
    fn test_captured_text_matches_document() {
        for template in [Template::Modern, Template::Classic] {
            let doc = render_record(&jane(template), Viewport::default());
            let cap = capture(&doc);
            let lines = cap.text_lines();
            assert!(lines.contains(&"Jane Doe"), "{template:?}: {lines:?}");
            assert!(lines.iter().any(|l| l.contains("Engineer")));
        }
    }

    #[test]
    fn test_text_stays_within_surface() {
        let mut record = jane(Template::Modern);
        record.summary = "Seasoned engineer ".repeat(40);
        let cap = capture(&render_record(&record, Viewport::default()));
        for op in &cap.ops {
            if let DrawOp::Text { x, baseline, .. } = op {
                assert!(*x >= 0.0 && *x < cap.width);
                assert!(*baseline > 0.0 && *baseline <= cap.height);
            }
        }
    }

    #[test]
    fn test_long_text_wraps_into_more_height() {
        let short = capture(&render_record(&jane(Template::Classic), Viewport::default()));
        let mut record = jane(Template::Classic);
        record.summary = "Seasoned engineer ".repeat(60);
        let long = capture(&render_record(&record, Viewport::default()));
        assert!(long.height > short.height);
    }

    #[test]
    fn test_background_painted_before_content() {
        let cap = capture(&render_record(&jane(Template::Modern), Viewport::default()));
        let first_rect = cap
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Rect { color, .. } if *color == Color::PRIMARY))
            .unwrap();
        let name = cap
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { content, .. } if content == "Jane Doe"))
            .unwrap();
        assert!(first_rect < name);
    }

    #[test]
    fn test_jpeg_avatar_embedded() {
        let mut record = jane(Template::Modern);
        record.profile_image = Some(ProfileImage::from_upload(&tiny_jpeg()).unwrap());
        let cap = capture(&render_record(&record, Viewport::default()));
        assert_eq!(cap.images.len(), 1);
        assert!(cap.ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
        assert!(!cap.text_lines().contains(&"JD"));
    }

    #[test]
    fn test_non_jpeg_avatar_falls_back_to_initials() {
        let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        png.extend_from_slice(&[0u8; 16]);
        let mut record = jane(Template::Modern);
        record.profile_image = Some(ProfileImage::from_upload(&png).unwrap());
        let cap = capture(&render_record(&record, Viewport::default()));
        assert!(cap.images.is_empty());
        assert!(cap.text_lines().contains(&"JD"));
    }

    #[test]
    fn test_sidebar_background_stretches_to_main_column() {
        let mut record = jane(Template::Modern);
        record.summary = "Seasoned engineer ".repeat(80);
        let cap = capture(&render_record(&record, Viewport::new(1024)));
        let panel = cap
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Rect { color, height, .. } if *color == Color::PANEL => Some(*height),
                _ => None,
            })
            .unwrap();
        let header = cap
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Rect { color, height, .. } if *color == Color::PRIMARY => Some(*height),
                _ => None,
            })
            .unwrap();
        assert!((panel + header - cap.height).abs() < 0.01);
    }
}
