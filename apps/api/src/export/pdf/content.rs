//! Page content stream builder.
//!
//! Coordinates are PDF user space (points, origin bottom-left).

use std::fmt::Write as _;

use crate::export::font_metrics::Face;
use crate::export::pdf::objects::{escape_string, format_real};
use crate::render::document::Color;

/// Control-point offset for approximating a quarter circle with one cubic Bézier.
const KAPPA: f64 = 0.552_284_75;

#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn op(&mut self, operands: &[f64], operator: &str) -> &mut Self {
        let mut line = String::new();
        for operand in operands {
            let _ = write!(line, "{} ", format_real(*operand));
        }
        line.push_str(operator);
        line.push('\n');
        self.data.extend_from_slice(line.as_bytes());
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "cm")
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.op(
            &[
                f64::from(color.0) / 255.0,
                f64::from(color.1) / 255.0,
                f64::from(color.2) / 255.0,
            ],
            "rg",
        )
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(&[x, y, width, height], "re")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(&[], "f")
    }

    /// Intersects the clip with the current path and discards the path (`W n`).
    pub fn clip(&mut self) -> &mut Self {
        self.op(&[], "W n")
    }

    /// Appends a closed circle path.
    pub fn circle(&mut self, cx: f64, cy: f64, r: f64) -> &mut Self {
        let k = r * KAPPA;
        self.op(&[cx + r, cy], "m")
            .op(&[cx + r, cy + k, cx + k, cy + r, cx, cy + r], "c")
            .op(&[cx - k, cy + r, cx - r, cy + k, cx - r, cy], "c")
            .op(&[cx - r, cy - k, cx - k, cy - r, cx, cy - r], "c")
            .op(&[cx + k, cy - r, cx + r, cy - k, cx + r, cy], "c")
            .op(&[], "h")
    }

    /// One positioned line of text: `BT /F size Tf 1 0 0 1 x y Tm (..) Tj ET`.
    pub fn text_line(&mut self, face: Face, size: f64, x: f64, y: f64, text: &str) -> &mut Self {
        self.op(&[], "BT");
        self.data.push(b'/');
        self.data.extend_from_slice(face.resource_name().as_bytes());
        self.data.push(b' ');
        self.op(&[size], "Tf");
        self.op(&[1.0, 0.0, 0.0, 1.0, x, y], "Tm");
        self.data.extend_from_slice(&escape_string(&encode_win_ansi(text)));
        self.data.extend_from_slice(b" Tj\n");
        self.op(&[], "ET")
    }

    /// Paints an image XObject into the given rectangle.
    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.save_state();
        self.transform(width, 0.0, 0.0, height, x, y);
        self.data.push(b'/');
        self.data.extend_from_slice(name.as_bytes());
        self.data.extend_from_slice(b" Do\n");
        self.restore_state()
    }
}

/// Encodes text for the standard fonts' WinAnsiEncoding. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(stream: ContentStream) -> String {
        String::from_utf8_lossy(&stream.into_bytes()).into_owned()
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(encode_win_ansi("a • b"), vec![b'a', b' ', 0x95, b' ', b'b']);
        assert_eq!(encode_win_ansi("é—"), vec![0xE9, 0x97]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_text_line_operators() {
        let mut stream = ContentStream::new();
        stream.text_line(Face::TimesBold, 12.0, 10.5, 700.0, "Jane (Doe)");
        assert_eq!(
            text(stream),
            "BT\n/F4 12 Tf\n1 0 0 1 10.5 700 Tm\n(Jane \\(Doe\\)) Tj\nET\n"
        );
    }

    #[test]
    fn test_fill_rect() {
        let mut stream = ContentStream::new();
        stream
            .set_fill_color(Color(255, 0, 0))
            .rect(0.0, 0.0, 10.0, 5.0)
            .fill();
        assert_eq!(text(stream), "1 0 0 rg\n0 0 10 5 re\nf\n");
    }

    #[test]
    fn test_draw_image_scopes_transform() {
        let mut stream = ContentStream::new();
        stream.draw_image("Im1", 1.0, 2.0, 30.0, 40.0);
        assert_eq!(text(stream), "q\n30 0 0 40 1 2 cm\n/Im1 Do\nQ\n");
    }
}
