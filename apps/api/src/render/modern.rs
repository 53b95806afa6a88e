//! Modern layout: coloured header, fixed-width side panel (contact, education, skill bars,
//! languages) beside a main column (summary, timeline experience, projects, achievements,
//! hobbies) with numbered section headers. Below the breakpoint the panel stacks on top.

use crate::models::resume::ResumeRecord;
use crate::render::document::{
    BlockStyle, Color, Column, ColumnWidth, Document, FontFamily, Node, Role, SectionId, TextRun,
    TextStyle,
};
use crate::render::sections::{
    contact_items, initials, parse_chips, skill_level, visible_achievements, visible_education,
    visible_experience, visible_hobbies, visible_languages, visible_projects, visible_summary,
};
use crate::render::{Renderer, Viewport};

pub const SIDEBAR_WIDTH: f32 = 240.0;
/// Viewports narrower than this stack the side panel above the main column.
pub const STACK_BREAKPOINT: u32 = 768;

pub struct ModernRenderer;

impl Renderer for ModernRenderer {
    fn render(&self, record: &ResumeRecord, viewport: Viewport) -> Document {
        let header = header(record);
        let sidebar = sidebar(record);
        let main = main_column(record);

        let body = if viewport.width >= STACK_BREAKPOINT {
            Node::Columns {
                gap: 0.0,
                columns: vec![
                    Column {
                        width: ColumnWidth::Fixed(SIDEBAR_WIDTH),
                        node: sidebar,
                    },
                    Column {
                        width: ColumnWidth::Fill,
                        node: main,
                    },
                ],
            }
        } else {
            Node::block(Role::Plain, BlockStyle::default(), vec![sidebar, main])
        };

        Document {
            template: record.template,
            viewport,
            title: record.full_name.clone(),
            root: Node::block(Role::Plain, BlockStyle::default(), vec![header, body]),
        }
    }
}

fn sans(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Sans, size)
}

fn header(record: &ResumeRecord) -> Node {
    Node::block(
        Role::Header,
        BlockStyle {
            padding: 28.0,
            gap: 4.0,
            background: Some(Color::PRIMARY),
            ..BlockStyle::default()
        },
        vec![Node::text(
            record.full_name.clone(),
            sans(34.0).bold().color(Color::WHITE),
        )],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Side panel
// ────────────────────────────────────────────────────────────────────────────

fn panel_heading(id: SectionId) -> Node {
    Node::text(
        id.title(),
        sans(12.0).bold().uppercase().color(Color::WHITE),
    )
}

fn panel_section(id: SectionId, mut children: Vec<Node>) -> Node {
    children.insert(0, panel_heading(id));
    Node::block(Role::Section(id), BlockStyle::gap(6.0), children)
}

fn sidebar(record: &ResumeRecord) -> Node {
    let panel_text = sans(12.0).color(Color::PANEL_TEXT);
    let mut children = vec![Node::Avatar {
        image: record.profile_image.clone(),
        initials: initials(&record.full_name),
        size: 96.0,
        background: Color::PRIMARY,
    }];

    let contact = contact_items(record);
    if !contact.is_empty() {
        children.push(panel_section(
            SectionId::Contact,
            contact
                .into_iter()
                .map(|item| Node::text(item, panel_text))
                .collect(),
        ));
    }

    let education = visible_education(record);
    if !education.is_empty() {
        let entries = education
            .into_iter()
            .map(|edu| {
                let mut lines = vec![Node::text(
                    edu.degree.clone(),
                    sans(13.0).bold().color(Color::WHITE),
                )];
                if !edu.institution.is_empty() {
                    lines.push(Node::text(edu.institution.clone(), panel_text));
                }
                if !edu.year.is_empty() {
                    lines.push(Node::text(edu.year.clone(), panel_text));
                }
                Node::block(Role::Entry, BlockStyle::gap(2.0), lines)
            })
            .collect();
        children.push(panel_section(SectionId::Education, entries));
    }

    let technical = parse_chips(&record.technical_skills);
    let soft = parse_chips(&record.soft_skills);
    if !technical.is_empty() || !soft.is_empty() {
        let mut skills: Vec<Node> = technical
            .iter()
            .enumerate()
            .map(|(i, skill)| Node::SkillBar {
                label: TextRun::new(skill.clone(), panel_text),
                percent: skill_level(i, skill),
                track: Color::GRAY_600,
                fill: Color::PRIMARY,
            })
            .collect();
        if !soft.is_empty() {
            skills.push(Node::Chips {
                items: soft,
                text: sans(11.0).color(Color::WHITE),
                background: Color::GRAY_700,
            });
        }
        children.push(panel_section(SectionId::Skills, skills));
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let rows = languages
            .into_iter()
            .map(|lang| Node::Spread {
                start: TextRun::new(lang.name.clone(), panel_text),
                end: TextRun::new(lang.proficiency.as_str(), sans(11.0).color(Color::GRAY_300)),
            })
            .collect();
        children.push(panel_section(SectionId::Languages, rows));
    }

    Node::block(
        Role::Sidebar,
        BlockStyle {
            padding: 20.0,
            gap: 18.0,
            background: Some(Color::PANEL),
            ..BlockStyle::default()
        },
        children,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Main column
// ────────────────────────────────────────────────────────────────────────────

/// Numbers headers in the order sections actually appear.
struct SectionCounter(u8);

impl SectionCounter {
    fn section(&mut self, id: SectionId, mut children: Vec<Node>) -> Node {
        self.0 += 1;
        children.insert(
            0,
            Node::text(
                format!("{:02}  {}", self.0, id.title()),
                sans(18.0).bold().color(Color::PRIMARY),
            ),
        );
        Node::block(Role::Section(id), BlockStyle::gap(10.0), children)
    }
}

fn main_column(record: &ResumeRecord) -> Node {
    let body = sans(13.0).color(Color::GRAY_700);
    let mut counter = SectionCounter(0);
    let mut children = Vec::new();

    if let Some(summary) = visible_summary(record) {
        children.push(counter.section(SectionId::Summary, vec![Node::text(summary, body)]));
    }

    let experience = visible_experience(record);
    if !experience.is_empty() {
        let entries = experience
            .into_iter()
            .map(|exp| {
                let mut lines = vec![Node::Spread {
                    start: TextRun::new(exp.title.clone(), sans(15.0).bold()),
                    end: TextRun::new(exp.duration.clone(), sans(12.0).color(Color::GRAY_600)),
                }];
                if !exp.company.is_empty() {
                    lines.push(Node::text(
                        exp.company.clone(),
                        sans(13.0).bold().color(Color::PRIMARY),
                    ));
                }
                if !exp.description.is_empty() {
                    lines.push(Node::text(exp.description.clone(), body));
                }
                Node::block(
                    Role::Entry,
                    BlockStyle {
                        gap: 3.0,
                        timeline: Some(Color::PRIMARY),
                        ..BlockStyle::default()
                    },
                    lines,
                )
            })
            .collect();
        children.push(counter.section(SectionId::Experience, entries));
    }

    let projects = visible_projects(record);
    if !projects.is_empty() {
        let entries = projects
            .into_iter()
            .map(|project| {
                let mut lines = vec![Node::text(project.title.clone(), sans(15.0).bold())];
                if !project.description.is_empty() {
                    lines.push(Node::text(project.description.clone(), body));
                }
                let technologies = parse_chips(&project.technologies);
                if !technologies.is_empty() {
                    lines.push(Node::Chips {
                        items: technologies,
                        text: sans(11.0).color(Color::PRIMARY),
                        background: Color::PRIMARY_SOFT,
                    });
                }
                Node::block(Role::Entry, BlockStyle::gap(4.0), lines)
            })
            .collect();
        children.push(counter.section(SectionId::Projects, entries));
    }

    let achievements = visible_achievements(record);
    if !achievements.is_empty() {
        let entries = achievements
            .into_iter()
            .map(|achievement| {
                let mut lines = vec![Node::text(achievement.title.clone(), sans(14.0).bold())];
                if !achievement.description.is_empty() {
                    lines.push(Node::text(achievement.description.clone(), body));
                }
                Node::block(Role::Entry, BlockStyle::gap(2.0), lines)
            })
            .collect();
        children.push(counter.section(SectionId::Achievements, entries));
    }

    if let Some(hobbies) = visible_hobbies(record) {
        children.push(counter.section(SectionId::Hobbies, vec![Node::text(hobbies, body)]));
    }

    Node::block(
        Role::Main,
        BlockStyle {
            padding: 24.0,
            gap: 22.0,
            ..BlockStyle::default()
        },
        children,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Experience, Language, Project, Proficiency, SectionToggles};

    fn record() -> ResumeRecord {
        ResumeRecord {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            summary: "Systems engineer.".to_string(),
            technical_skills: "Rust, SQL, Go".to_string(),
            soft_skills: "Mentoring".to_string(),
            experience: vec![
                Experience {
                    title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    duration: "2020-2022".to_string(),
                    description: "Built things".to_string(),
                },
                Experience::default(),
            ],
            projects: vec![Project {
                title: "resumeforge".to_string(),
                technologies: "Rust, axum".to_string(),
                ..Project::default()
            }],
            languages: vec![Language {
                name: "French".to_string(),
                proficiency: Proficiency::Fluent,
            }],
            section_toggles: SectionToggles {
                projects: true,
                languages: true,
                ..SectionToggles::default()
            },
            ..ResumeRecord::default()
        }
    }

    fn render(width: u32) -> Document {
        ModernRenderer.render(&record(), Viewport::new(width))
    }

    #[test]
    fn test_wide_viewport_uses_two_columns() {
        let doc = render(1024);
        let Node::Block { children, .. } = &doc.root else {
            panic!("root must be a block");
        };
        match &children[1] {
            Node::Columns { columns, .. } => {
                assert_eq!(columns[0].width, ColumnWidth::Fixed(SIDEBAR_WIDTH));
                assert_eq!(columns[1].width, ColumnWidth::Fill);
            }
            other => panic!("expected columns, got {other:?}"),
        }
    }

    #[test]
    fn test_narrow_viewport_stacks_panel() {
        let doc = render(400);
        let Node::Block { children, .. } = &doc.root else {
            panic!("root must be a block");
        };
        assert!(matches!(children[1], Node::Block { .. }));
        // Same content either way.
        assert_eq!(doc.text_content(), render(1024).text_content());
    }

    #[test]
    fn test_sections_split_between_panel_and_main() {
        let doc = render(1024);
        assert_eq!(
            doc.sections(),
            vec![
                SectionId::Contact,
                SectionId::Skills,
                SectionId::Languages,
                SectionId::Summary,
                SectionId::Experience,
                SectionId::Projects,
            ]
        );
    }

    #[test]
    fn test_main_headers_numbered_in_order() {
        let text = render(1024).text_content();
        assert!(text.contains("01  Professional Summary"));
        assert!(text.contains("02  Work Experience"));
        assert!(text.contains("03  Projects"));
    }

    #[test]
    fn test_numbering_skips_omitted_sections() {
        let mut record = record();
        record.summary.clear();
        let text = ModernRenderer
            .render(&record, Viewport::default())
            .text_content();
        assert!(text.contains("01  Work Experience"));
        assert!(!text.contains("Professional Summary"));
    }

    #[test]
    fn test_one_skill_bar_per_technical_skill() {
        let doc = render(1024);
        let json = serde_json::to_value(&doc.root).unwrap().to_string();
        assert_eq!(json.matches("\"skill_bar\"").count(), 3);
    }

    #[test]
    fn test_initials_shown_without_image() {
        let text = render(1024).text_content();
        assert!(text.lines().any(|l| l == "JD"));
    }
}
