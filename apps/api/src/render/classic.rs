//! Classic layout: single column, centered serif header with a contact line, and uppercase
//! section headings separated by horizontal rules.

use crate::models::resume::ResumeRecord;
use crate::render::document::{
    BlockStyle, Color, Column, ColumnWidth, Document, FontFamily, Node, Role, SectionId,
    TextStyle,
};
use crate::render::sections::{
    contact_items, parse_chips, visible_achievements, visible_education, visible_experience,
    visible_hobbies, visible_languages, visible_projects, visible_summary,
};
use crate::render::{Renderer, Viewport};

pub struct ClassicRenderer;

impl Renderer for ClassicRenderer {
    fn render(&self, record: &ResumeRecord, viewport: Viewport) -> Document {
        let mut children = vec![header(record)];
        children.extend(body(record));

        Document {
            template: record.template,
            viewport,
            title: record.full_name.clone(),
            root: Node::block(
                Role::Plain,
                BlockStyle {
                    padding: 40.0,
                    gap: 20.0,
                    background: Some(Color::WHITE),
                    ..BlockStyle::default()
                },
                children,
            ),
        }
    }
}

fn serif(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Serif, size)
}

fn header(record: &ResumeRecord) -> Node {
    let mut lines = vec![Node::text(
        record.full_name.clone(),
        serif(30.0).bold().centered(),
    )];
    let contact = contact_items(record);
    if !contact.is_empty() {
        lines.push(Node::text(
            contact.join(" • "),
            serif(12.0).color(Color::GRAY_600).centered(),
        ));
    }
    Node::block(
        Role::Header,
        BlockStyle {
            padding: 0.0,
            gap: 6.0,
            border_bottom: Some((Color::BLACK, 2.0)),
            ..BlockStyle::default()
        },
        lines,
    )
}

fn section(id: SectionId, children: Vec<Node>) -> Node {
    let mut nodes = vec![
        Node::text(id.title(), serif(15.0).bold().uppercase()),
        Node::Rule {
            color: Color::GRAY_300,
            thickness: 1.0,
        },
    ];
    nodes.extend(children);
    Node::block(Role::Section(id), BlockStyle::gap(6.0), nodes)
}

/// Title line with an optional trailing detail, e.g. "Engineer | 2020-2022".
fn titled(title: &str, detail: &str) -> String {
    if detail.is_empty() {
        title.to_string()
    } else {
        format!("{title} | {detail}")
    }
}

fn entry(lines: Vec<Node>) -> Node {
    Node::block(Role::Entry, BlockStyle::gap(2.0), lines)
}

fn body(record: &ResumeRecord) -> Vec<Node> {
    let text = serif(12.5).color(Color::GRAY_700);
    let detail = serif(12.0).color(Color::GRAY_600);
    let mut sections = Vec::new();

    if let Some(summary) = visible_summary(record) {
        sections.push(section(SectionId::Summary, vec![Node::text(summary, text)]));
    }

    let experience = visible_experience(record);
    if !experience.is_empty() {
        let entries = experience
            .into_iter()
            .map(|exp| {
                let mut lines = vec![Node::text(
                    titled(&exp.title, &exp.duration),
                    serif(13.5).bold(),
                )];
                if !exp.company.is_empty() {
                    lines.push(Node::text(exp.company.clone(), detail));
                }
                if !exp.description.is_empty() {
                    lines.push(Node::text(exp.description.clone(), text));
                }
                entry(lines)
            })
            .collect();
        sections.push(section(SectionId::Experience, entries));
    }

    let education = visible_education(record);
    if !education.is_empty() {
        let entries = education
            .into_iter()
            .map(|edu| {
                let mut lines = vec![Node::text(
                    titled(&edu.degree, &edu.year),
                    serif(13.5).bold(),
                )];
                if !edu.institution.is_empty() {
                    lines.push(Node::text(edu.institution.clone(), detail));
                }
                entry(lines)
            })
            .collect();
        sections.push(section(SectionId::Education, entries));
    }

    let technical = parse_chips(&record.technical_skills);
    let soft = parse_chips(&record.soft_skills);
    if !technical.is_empty() || !soft.is_empty() {
        let list = |label: &str, items: Vec<String>| {
            let mut lines = vec![Node::text(label, serif(13.0).bold())];
            lines.extend(items.into_iter().map(|s| Node::text(format!("• {s}"), text)));
            Column {
                width: ColumnWidth::Fill,
                node: Node::block(Role::Plain, BlockStyle::gap(2.0), lines),
            }
        };
        let mut columns = Vec::new();
        if !technical.is_empty() {
            columns.push(list("Technical", technical));
        }
        if !soft.is_empty() {
            columns.push(list("Soft Skills", soft));
        }
        sections.push(section(
            SectionId::Skills,
            vec![Node::Columns { gap: 24.0, columns }],
        ));
    }

    let projects = visible_projects(record);
    if !projects.is_empty() {
        let entries = projects
            .into_iter()
            .map(|project| {
                let mut lines = vec![Node::text(project.title.clone(), serif(13.5).bold())];
                if !project.description.is_empty() {
                    lines.push(Node::text(project.description.clone(), text));
                }
                let technologies = parse_chips(&project.technologies);
                if !technologies.is_empty() {
                    lines.push(Node::text(
                        format!("Technologies: {}", technologies.join(", ")),
                        detail,
                    ));
                }
                entry(lines)
            })
            .collect();
        sections.push(section(SectionId::Projects, entries));
    }

    let achievements = visible_achievements(record);
    if !achievements.is_empty() {
        let entries = achievements
            .into_iter()
            .map(|achievement| {
                let mut lines = vec![Node::text(achievement.title.clone(), serif(13.5).bold())];
                if !achievement.description.is_empty() {
                    lines.push(Node::text(achievement.description.clone(), text));
                }
                entry(lines)
            })
            .collect();
        sections.push(section(SectionId::Achievements, entries));
    }

    let languages = visible_languages(record);
    if !languages.is_empty() {
        let lines = languages
            .into_iter()
            .map(|lang| {
                Node::text(
                    format!("{} — {}", lang.name, lang.proficiency.as_str()),
                    text,
                )
            })
            .collect();
        sections.push(section(SectionId::Languages, lines));
    }

    if let Some(hobbies) = visible_hobbies(record) {
        sections.push(section(SectionId::Hobbies, vec![Node::text(hobbies, text)]));
    }

    sections
}
