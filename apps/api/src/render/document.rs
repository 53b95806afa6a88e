//! The visual document tree produced by the renderers and consumed by the HTML serializer
//! and the export capture step.

use serde::{Deserialize, Serialize};

use crate::form::image::ProfileImage;
use crate::models::resume::Template;
use crate::render::Viewport;

// ────────────────────────────────────────────────────────────────────────────
// Styling primitives
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0x11, 0x18, 0x27);
    pub const WHITE: Color = Color(0xFF, 0xFF, 0xFF);
    pub const GRAY_100: Color = Color(0xF3, 0xF4, 0xF6);
    pub const GRAY_300: Color = Color(0xD1, 0xD5, 0xDB);
    pub const GRAY_600: Color = Color(0x4B, 0x55, 0x63);
    pub const GRAY_700: Color = Color(0x37, 0x41, 0x51);
    pub const PRIMARY: Color = Color(0x25, 0x63, 0xEB);
    pub const PRIMARY_SOFT: Color = Color(0xDB, 0xEA, 0xFE);
    pub const PANEL: Color = Color(0x1E, 0x29, 0x3B);
    pub const PANEL_TEXT: Color = Color(0xE2, 0xE8, 0xF0);

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    Sans,
    Serif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub family: FontFamily,
    /// Font size in CSS px.
    pub size: f32,
    pub weight: Weight,
    pub color: Color,
    pub align: Align,
    pub uppercase: bool,
}

impl TextStyle {
    pub fn new(family: FontFamily, size: f32) -> Self {
        Self {
            family,
            size,
            weight: Weight::Regular,
            color: Color::BLACK,
            align: Align::Start,
            uppercase: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = Weight::Bold;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStyle {
    pub padding: f32,
    /// Vertical space between children.
    pub gap: f32,
    pub background: Option<Color>,
    /// Draws a connecting timeline mark along the left edge.
    pub timeline: Option<Color>,
    /// Rule drawn under the block.
    pub border_bottom: Option<(Color, f32)>,
}

impl BlockStyle {
    pub fn gap(gap: f32) -> Self {
        Self {
            gap,
            ..Self::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Nodes
// ────────────────────────────────────────────────────────────────────────────

/// Content sections a renderer may emit. Used to tag blocks so callers can reason about
/// which sections a document contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Achievements,
    Hobbies,
    Languages,
}

impl SectionId {
    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Contact => "Contact",
            SectionId::Summary => "Professional Summary",
            SectionId::Experience => "Work Experience",
            SectionId::Education => "Education",
            SectionId::Skills => "Skills",
            SectionId::Projects => "Projects",
            SectionId::Achievements => "Achievements",
            SectionId::Hobbies => "Hobbies & Interests",
            SectionId::Languages => "Languages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Role {
    Header,
    Sidebar,
    Main,
    Section(SectionId),
    Entry,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub content: String,
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    /// The text as displayed (case transform applied).
    pub fn display(&self) -> String {
        if self.style.uppercase {
            self.content.to_uppercase()
        } else {
            self.content.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "px")]
pub enum ColumnWidth {
    Fixed(f32),
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub width: ColumnWidth,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Node {
    /// Vertical stack of children.
    Block {
        role: Role,
        style: BlockStyle,
        children: Vec<Node>,
    },
    /// Side-by-side columns sharing the available width.
    Columns { gap: f32, columns: Vec<Column> },
    Text(TextRun),
    /// Two runs on one line, pushed to opposite edges.
    Spread { start: TextRun, end: TextRun },
    /// Inline pills that wrap onto new lines.
    Chips {
        items: Vec<String>,
        text: TextStyle,
        background: Color,
    },
    /// Decorative labelled bar.
    SkillBar {
        label: TextRun,
        percent: u8,
        track: Color,
        fill: Color,
    },
    Rule { color: Color, thickness: f32 },
    Avatar {
        image: Option<ProfileImage>,
        initials: String,
        size: f32,
        background: Color,
    },
    Spacer(f32),
}

impl Node {
    pub fn block(role: Role, style: BlockStyle, children: Vec<Node>) -> Self {
        Node::Block {
            role,
            style,
            children,
        }
    }

    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Node::Text(TextRun::new(content, style))
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        match self {
            Node::Block { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            Node::Columns { columns, .. } => {
                for column in columns {
                    column.node.walk(visit);
                }
            }
            _ => {}
        }
    }
}

/// A fully rendered record: the layout variant, the viewport it was laid out for, and the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub template: Template,
    pub viewport: Viewport,
    pub title: String,
    pub root: Node,
}

impl Document {
    /// Sections present in the tree, in document order.
    pub fn sections(&self) -> Vec<SectionId> {
        let mut found = Vec::new();
        self.root.walk(&mut |node| {
            if let Node::Block {
                role: Role::Section(id),
                ..
            } = node
            {
                found.push(*id);
            }
        });
        found
    }

    pub fn has_section(&self, id: SectionId) -> bool {
        self.sections().contains(&id)
    }

    /// Every visible string in document order, one per line.
    pub fn text_content(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        self.root.walk(&mut |node| match node {
            Node::Text(run) => lines.push(run.display()),
            Node::Spread { start, end } => {
                lines.push(start.display());
                lines.push(end.display());
            }
            Node::Chips { items, .. } => lines.extend(items.iter().cloned()),
            Node::SkillBar { label, .. } => lines.push(label.display()),
            Node::Avatar {
                image: None,
                initials,
                ..
            } => lines.push(initials.clone()),
            _ => {}
        });
        lines.join("\n")
    }
}
