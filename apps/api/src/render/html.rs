//! Serializes a `Document` to a standalone HTML page with inline styles.

use std::fmt::Write as _;

use crate::render::document::{
    Align, BlockStyle, ColumnWidth, Document, FontFamily, Node, Role, TextRun, TextStyle, Weight,
};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(document: &Document) -> String {
    let mut body = String::new();
    write_node(&mut body, &document.root);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n\
         <body style=\"margin:0;background:#f3f4f6\">\n\
         <div class=\"resume resume-{}\" style=\"max-width:{}px;margin:0 auto\">{}</div>\n\
         </body>\n</html>\n",
        escape(&document.title),
        document.template.as_str(),
        document.viewport.width,
        body
    )
}

fn font_family(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Sans => "Inter,Helvetica,Arial,sans-serif",
        FontFamily::Serif => "Georgia,'Times New Roman',serif",
    }
}

fn text_css(style: &TextStyle) -> String {
    let mut css = format!(
        "font-family:{};font-size:{}px;color:{};margin:0",
        font_family(style.family),
        style.size,
        style.color.hex()
    );
    if style.weight == Weight::Bold {
        css.push_str(";font-weight:700");
    }
    if style.align == Align::Center {
        css.push_str(";text-align:center");
    }
    if style.uppercase {
        css.push_str(";text-transform:uppercase;letter-spacing:0.05em");
    }
    css
}

fn block_css(style: &BlockStyle) -> String {
    let mut css = format!(
        "display:flex;flex-direction:column;gap:{}px;padding:{}px",
        style.gap, style.padding
    );
    if let Some(bg) = style.background {
        let _ = write!(css, ";background:{}", bg.hex());
    }
    if let Some(color) = style.timeline {
        let _ = write!(css, ";border-left:2px solid {};padding-left:16px", color.hex());
    }
    if let Some((color, width)) = style.border_bottom {
        let _ = write!(
            css,
            ";border-bottom:{}px solid {};padding-bottom:12px",
            width,
            color.hex()
        );
    }
    css
}

fn write_run(out: &mut String, tag: &str, run: &TextRun) {
    let _ = write!(
        out,
        "<{tag} style=\"{}\">{}</{tag}>",
        text_css(&run.style),
        escape(&run.content)
    );
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Block {
            role,
            style,
            children,
        } => {
            let (tag, attr) = match role {
                Role::Header => ("header", String::new()),
                Role::Sidebar => ("aside", String::new()),
                Role::Main => ("main", String::new()),
                Role::Section(id) => (
                    "section",
                    format!(" data-section=\"{}\"", section_slug(id.title())),
                ),
                Role::Entry => ("article", String::new()),
                Role::Plain => ("div", String::new()),
            };
            let _ = write!(out, "<{tag}{attr} style=\"{}\">", block_css(style));
            for child in children {
                write_node(out, child);
            }
            let _ = write!(out, "</{tag}>");
        }
        Node::Columns { gap, columns } => {
            let _ = write!(
                out,
                "<div style=\"display:flex;flex-direction:row;gap:{gap}px;align-items:stretch\">"
            );
            for column in columns {
                let width = match column.width {
                    ColumnWidth::Fixed(px) => format!("flex:0 0 {px}px"),
                    ColumnWidth::Fill => "flex:1 1 0".to_string(),
                };
                let _ = write!(out, "<div style=\"{width}\">");
                write_node(out, &column.node);
                out.push_str("</div>");
            }
            out.push_str("</div>");
        }
        Node::Text(run) => write_run(out, "p", run),
        Node::Spread { start, end } => {
            out.push_str(
                "<div style=\"display:flex;justify-content:space-between;align-items:baseline\">",
            );
            write_run(out, "span", start);
            write_run(out, "span", end);
            out.push_str("</div>");
        }
        Node::Chips {
            items,
            text,
            background,
        } => {
            out.push_str("<div style=\"display:flex;flex-wrap:wrap;gap:6px\">");
            for item in items {
                let _ = write!(
                    out,
                    "<span style=\"{};background:{};border-radius:9999px;padding:2px 10px\">{}</span>",
                    text_css(text),
                    background.hex(),
                    escape(item)
                );
            }
            out.push_str("</div>");
        }
        Node::SkillBar {
            label,
            percent,
            track,
            fill,
        } => {
            out.push_str("<div class=\"skill\">");
            write_run(out, "span", label);
            let _ = write!(
                out,
                "<div style=\"height:6px;border-radius:3px;background:{}\">\
                 <div style=\"height:6px;border-radius:3px;width:{percent}%;background:{}\"></div></div></div>",
                track.hex(),
                fill.hex()
            );
        }
        Node::Rule { color, thickness } => {
            let _ = write!(
                out,
                "<hr style=\"border:0;border-top:{thickness}px solid {};margin:0\">",
                color.hex()
            );
        }
        Node::Avatar {
            image,
            initials,
            size,
            background,
        } => match image {
            Some(image) => {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"Profile\" style=\"width:{size}px;height:{size}px;\
                     border-radius:50%;object-fit:cover\">",
                    escape(image.data_url())
                );
            }
            None => {
                let _ = write!(
                    out,
                    "<div style=\"width:{size}px;height:{size}px;border-radius:50%;background:{};\
                     color:#ffffff;display:flex;align-items:center;justify-content:center;\
                     font-family:{};font-weight:700;font-size:{}px\">{}</div>",
                    background.hex(),
                    font_family(FontFamily::Sans),
                    size * 0.36,
                    escape(initials)
                );
            }
        },
        Node::Spacer(height) => {
            let _ = write!(out, "<div style=\"height:{height}px\"></div>");
        }
    }
}

fn section_slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
