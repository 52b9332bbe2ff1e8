//! Section assembly shared by every document type.
//!
//! A report is declared as an ordered list of [`Section`]s derived from the
//! input records; [`assemble`] feeds them through the flow writer and table
//! renderer one after another.

pub mod case;
pub mod laudo;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::config::{FallbackTable, RenderContext};
use crate::fonts::{FontStyle, wrap_with_ratio};
use crate::pdf::Document;
use crate::pdf::layout::{Cursor, add_space, ensure_room, write_paragraph};
use crate::pdf::table::{TableSpec, write_table};

#[derive(Clone, Debug, PartialEq)]
pub enum SectionBody {
    Text(String),
    Table(TableSpec),
    Nested(Vec<Section>),
}

/// One titled unit of a report.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

impl Section {
    pub fn text(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: SectionBody::Text(text.into()),
        }
    }

    pub fn table(title: impl Into<String>, table: TableSpec) -> Self {
        Self {
            title: title.into(),
            body: SectionBody::Table(table),
        }
    }

    pub fn nested(title: impl Into<String>, children: Vec<Section>) -> Self {
        Self {
            title: title.into(),
            body: SectionBody::Nested(children),
        }
    }
}

fn title_size(ctx: &RenderContext, depth: usize) -> f32 {
    let typography = ctx.typography();
    if depth == 0 {
        typography.heading_size
    } else {
        typography.subheading_size
    }
}

/// Height of a section's title plus the first line of its body.
fn lead_height(section: &Section, ctx: &RenderContext, depth: usize) -> f32 {
    let typography = ctx.typography();
    let size = title_size(ctx, depth);
    let title_lines = wrap_with_ratio(
        &section.title,
        ctx.geometry().content_width(),
        size,
        FontStyle::Bold,
        typography.line_height_ratio,
    )
    .lines
    .len();
    let title_h = title_lines as f32 * (ctx.line_height(size) + typography.line_gap) + typography.paragraph_gap;
    let body_h = match &section.body {
        SectionBody::Text(_) => ctx.line_height(typography.body_size),
        SectionBody::Table(_) => ctx.line_height(typography.table_size) + 2.0 * typography.cell_padding,
        SectionBody::Nested(children) => children
            .first()
            .map_or(0.0, |child| lead_height(child, ctx, depth + 1)),
    };
    title_h + body_h
}

fn write_section(doc: &mut Document, cursor: &mut Cursor, ctx: &RenderContext, section: &Section, depth: usize) {
    let typography = ctx.typography();
    let x = ctx.geometry().margin_left;
    let title_size = title_size(ctx, depth);

    // Keep the title on the same page as the start of its body.
    let lead = lead_height(section, ctx, depth).min(ctx.geometry().printable_height());
    ensure_room(doc, cursor, ctx, lead);
    write_paragraph(doc, cursor, ctx, &section.title, x, title_size, FontStyle::Bold);
    add_space(cursor, ctx, typography.paragraph_gap);

    match &section.body {
        SectionBody::Text(text) => {
            write_paragraph(doc, cursor, ctx, text, x, typography.body_size, FontStyle::Normal);
        }
        SectionBody::Table(table) => {
            write_table(doc, cursor, ctx, table, x);
        }
        SectionBody::Nested(children) => {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    add_space(cursor, ctx, typography.paragraph_gap);
                }
                write_section(doc, cursor, ctx, child, depth + 1);
            }
        }
    }
}

/// Write `sections` in order, separated by the configured section gap.
pub fn assemble(doc: &mut Document, cursor: &mut Cursor, ctx: &RenderContext, sections: &[Section]) -> f32 {
    for section in sections {
        add_space(cursor, ctx, ctx.typography().section_gap);
        write_section(doc, cursor, ctx, section, 0);
    }
    cursor.y
}

/// Format a record date for display.
///
/// RFC 3339 timestamps become `dd/mm/aaaa HH:MM` in their own offset, plain
/// dates become `dd/mm/aaaa`. Anything else is shown as given.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    value.to_string()
}

pub(crate) fn date_or(fallbacks: &FallbackTable, value: Option<&str>, field: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => format_date(v),
        _ => fallbacks.get(field).to_string(),
    }
}

pub(crate) fn text_or(fallbacks: &FallbackTable, value: Option<&str>, field: &str) -> String {
    fallbacks.text_or(value, field).to_string()
}

/// Attachment URLs one per line, or the `anexos` fallback when there are none.
pub(crate) fn attachments(fallbacks: &FallbackTable, urls: &[String]) -> String {
    let urls: Vec<&str> = urls
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .collect();
    if urls.is_empty() {
        fallbacks.get("anexos").to_string()
    } else {
        urls.join("\n")
    }
}

/// Letters that have no canonical decomposition onto ASCII.
fn fold_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'đ' => "d",
        'Đ' => "D",
        'ł' => "l",
        'Ł' => "L",
        'þ' => "th",
        'Þ' => "TH",
        _ => return None,
    })
}

pub const FILENAME_PLACEHOLDER: &str = "sem_identificacao";

/// Reduce an identifier to `[A-Za-z0-9_-]`, stripping accents and collapsing
/// every other run of characters into a single `_`.
pub fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else if let Some(folded) = fold_letter(c) {
            out.push_str(folded);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// `<prefix>_<slug>_<YYYY-MM-DD>.pdf`, with a placeholder for a missing identifier.
pub fn output_filename(prefix: &str, identifier: Option<&str>, ctx: &RenderContext) -> String {
    let id = identifier
        .map(slug)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FILENAME_PLACEHOLDER.to_string());
    format!("{}_{}_{}.pdf", prefix, id, ctx.generated_at.format("%Y-%m-%d"))
}
