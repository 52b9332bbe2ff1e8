use crate::config::RenderContext;
use crate::fonts::{FontStyle, wrap_with_ratio};

use super::{DrawOp, Document, Rgb};

/// Where the next piece of content will be written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    /// Index into [`Document::pages`].
    pub page: usize,
    /// Top-down offset from the upper page edge.
    pub y: f32,
}

impl Cursor {
    /// Cursor at the top margin of the first page.
    pub fn start(ctx: &RenderContext) -> Self {
        Self {
            page: 0,
            y: ctx.geometry().margin_top,
        }
    }

    pub fn at_page_top(&self, ctx: &RenderContext) -> bool {
        (self.y - ctx.geometry().margin_top).abs() < 0.01
    }
}

/// Page-advance transition: append a blank page and move the cursor to its top margin.
pub fn advance_page(doc: &mut Document, cursor: &mut Cursor, ctx: &RenderContext) {
    cursor.page = doc.push_page();
    cursor.y = ctx.geometry().margin_top;
    log::debug!("page advance → page {}", cursor.page + 1);
}

/// Advance to a new page when `height` does not fit below the cursor.
/// Returns true if a page was added.
pub fn ensure_room(doc: &mut Document, cursor: &mut Cursor, ctx: &RenderContext, height: f32) -> bool {
    if cursor.y + height > ctx.geometry().printable_bottom() {
        advance_page(doc, cursor, ctx);
        true
    } else {
        false
    }
}

/// Add vertical space without committing content. Space that runs past the
/// printable band is dropped; the next write starts a fresh page.
pub fn add_space(cursor: &mut Cursor, ctx: &RenderContext, space: f32) {
    cursor.y = (cursor.y + space).min(ctx.geometry().printable_bottom());
}

/// Wrap `text` at the width remaining right of `x` and commit it line by line,
/// breaking pages whenever the next line would overflow the printable band.
/// Returns the cursor position after the last line.
pub fn write_paragraph(
    doc: &mut Document,
    cursor: &mut Cursor,
    ctx: &RenderContext,
    text: &str,
    x: f32,
    font_size: f32,
    style: FontStyle,
) -> f32 {
    let geometry = ctx.geometry();
    let typography = ctx.typography();
    let max_width = (geometry.page_width - x - geometry.margin_right).max(0.0);
    let wrapped = wrap_with_ratio(text, max_width, font_size, style, typography.line_height_ratio);

    for line in wrapped.lines {
        ensure_room(doc, cursor, ctx, wrapped.line_height);
        doc.draw(
            cursor.page,
            DrawOp::Text {
                x,
                y: cursor.y,
                text: line,
                font_size,
                style,
                color: Rgb::BLACK,
            },
        );
        cursor.y += wrapped.line_height + typography.line_gap;
    }
    cursor.y
}

/// Horizontal rule across the content width, kept inside the printable band.
pub fn write_rule(doc: &mut Document, cursor: &mut Cursor, ctx: &RenderContext, width: f32, color: Rgb) {
    let geometry = ctx.geometry();
    ensure_room(doc, cursor, ctx, width);
    let y = cursor.y + width / 2.0;
    doc.draw(
        cursor.page,
        DrawOp::Line {
            x1: geometry.margin_left,
            y1: y,
            x2: geometry.page_width - geometry.margin_right,
            y2: y,
            width,
            color,
        },
    );
    cursor.y += width;
}
