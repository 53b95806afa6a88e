//! Static font-metric tables for the two document families.
//!
//! Character widths are in em units (relative to font size), taken from the standard
//! Helvetica and Times-Roman AFM files. The PDF uses the matching base-14 fonts, so
//! measured lines land where the viewer draws them. Bold faces are approximated by
//! scaling the regular table.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use crate::render::document::{FontFamily, Weight};

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.4;
/// Baseline position within the em box, from the top.
pub const ASCENT: f32 = 0.8;

const BOLD_FACTOR: f32 = 1.07;

// ────────────────────────────────────────────────────────────────────────────
// Faces
// ────────────────────────────────────────────────────────────────────────────

/// One of the four standard Type1 faces the exporter draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
}

impl Face {
    pub const ALL: [Face; 4] = [
        Face::Helvetica,
        Face::HelveticaBold,
        Face::TimesRoman,
        Face::TimesBold,
    ];

    pub fn of(family: FontFamily, weight: Weight) -> Self {
        match (family, weight) {
            (FontFamily::Sans, Weight::Regular) => Face::Helvetica,
            (FontFamily::Sans, Weight::Bold) => Face::HelveticaBold,
            (FontFamily::Serif, Weight::Regular) => Face::TimesRoman,
            (FontFamily::Serif, Weight::Bold) => Face::TimesBold,
        }
    }

    /// PostScript name of the base-14 font.
    pub fn base_font(&self) -> &'static str {
        match self {
            Face::Helvetica => "Helvetica",
            Face::HelveticaBold => "Helvetica-Bold",
            Face::TimesRoman => "Times-Roman",
            Face::TimesBold => "Times-Bold",
        }
    }

    /// Name under which the face is registered in page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Face::Helvetica => "F1",
            Face::HelveticaBold => "F2",
            Face::TimesRoman => "F3",
            Face::TimesBold => "F4",
        }
    }

    fn table(&self) -> &'static FontMetricTable {
        match self {
            Face::Helvetica | Face::HelveticaBold => &HELVETICA_TABLE,
            Face::TimesRoman | Face::TimesBold => &TIMES_TABLE,
        }
    }

    fn scale(&self) -> f32 {
        match self {
            Face::HelveticaBold | Face::TimesBold => BOLD_FACTOR,
            Face::Helvetica | Face::TimesRoman => 1.0,
        }
    }

    /// Width of `s` in em units.
    pub fn measure(&self, s: &str) -> f32 {
        self.table().measure_str(s) * self.scale()
    }

    /// Greedy word wrap at `max_width_em`. A single word wider than the line keeps its
    /// own line and overflows.
    pub fn wrap(&self, s: &str, max_width_em: f32) -> Vec<String> {
        let space_w = self.table().space_width * self.scale();
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in s.split_whitespace() {
            let word_w = self.measure(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + space_w + word_w > max_width_em {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.55,
    space_width: 0.278,
};

static TIMES_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.48,
    space_width: 0.25,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
