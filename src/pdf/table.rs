use std::ops::Range;

use crate::config::RenderContext;
use crate::fonts::{FontStyle, wrap_with_ratio};

use super::layout::{Cursor, advance_page, ensure_room};
use super::{DrawOp, Document, Rgb};

const GRID_LINE_WIDTH: f32 = 0.5;

/// How the available width is split between columns.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnPlan {
    /// `available_width / column_count` for every column.
    Even,
    /// Relative weights, one per column. Normalized before use.
    Fractions(Vec<f32>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableTheme {
    /// Multi-column grid with a filled header band.
    Grid,
    /// Label/value pairs; the label column is bold.
    KeyValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    /// Header labels; empty for tables without a header row.
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub columns: ColumnPlan,
    pub theme: TableTheme,
    /// Redraw the header at the top of every continuation page.
    pub repeat_header: bool,
}

impl TableSpec {
    pub fn grid(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            header,
            rows,
            columns: ColumnPlan::Even,
            theme: TableTheme::Grid,
            repeat_header: false,
        }
    }

    /// Two-column label/value table split 35/65.
    pub fn key_value<L, V>(pairs: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<String>,
    {
        Self {
            header: Vec::new(),
            rows: pairs
                .into_iter()
                .map(|(l, v)| vec![l.into(), v.into()])
                .collect(),
            columns: ColumnPlan::Fractions(vec![0.35, 0.65]),
            theme: TableTheme::KeyValue,
            repeat_header: false,
        }
    }

    pub fn with_repeat_header(mut self, repeat: bool) -> Self {
        self.repeat_header = repeat;
        self
    }

    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Column widths, computed once per table.
    pub fn column_widths(&self, available: f32) -> Vec<f32> {
        let n = self.column_count();
        match &self.columns {
            ColumnPlan::Fractions(weights)
                if weights.len() == n && weights.iter().all(|w| *w > 0.0) =>
            {
                let total: f32 = weights.iter().sum();
                weights.iter().map(|w| available * w / total).collect()
            }
            _ => vec![available / n as f32; n],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowKind {
    Header,
    Body,
}

struct RowLayout {
    kind: RowKind,
    cells: Vec<Vec<String>>,
    styles: Vec<FontStyle>,
    line_count: usize,
}

impl RowLayout {
    fn height(&self, line_h: f32, padding: f32) -> f32 {
        self.line_count as f32 * line_h + 2.0 * padding
    }
}

fn cell_style(kind: RowKind, theme: TableTheme, col: usize) -> FontStyle {
    match (kind, theme, col) {
        (RowKind::Header, _, _) => FontStyle::Bold,
        (RowKind::Body, TableTheme::KeyValue, 0) => FontStyle::Bold,
        _ => FontStyle::Normal,
    }
}

fn layout_row(
    cells: &[String],
    kind: RowKind,
    theme: TableTheme,
    widths: &[f32],
    ctx: &RenderContext,
) -> RowLayout {
    let typography = ctx.typography();
    let pad = typography.cell_padding;
    let mut wrapped_cells = Vec::with_capacity(widths.len());
    let mut styles = Vec::with_capacity(widths.len());
    for (col, col_w) in widths.iter().enumerate() {
        let style = cell_style(kind, theme, col);
        let text = cells.get(col).map(String::as_str).unwrap_or("");
        let wrapped = wrap_with_ratio(
            text,
            (col_w - 2.0 * pad).max(0.0),
            typography.table_size,
            style,
            typography.line_height_ratio,
        );
        wrapped_cells.push(wrapped.lines);
        styles.push(style);
    }
    let line_count = wrapped_cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    RowLayout {
        kind,
        cells: wrapped_cells,
        styles,
        line_count,
    }
}

/// Draw lines `range` of every cell of `row` as one band starting at `y`.
fn draw_row_band(
    doc: &mut Document,
    page: usize,
    x: f32,
    y: f32,
    widths: &[f32],
    row: &RowLayout,
    range: Range<usize>,
    ctx: &RenderContext,
) -> f32 {
    let typography = ctx.typography();
    let pad = typography.cell_padding;
    let line_h = ctx.line_height(typography.table_size);
    let band_lines = row
        .cells
        .iter()
        .map(|lines| lines.len().min(range.end).saturating_sub(range.start))
        .max()
        .unwrap_or(0)
        .max(1);
    let height = band_lines as f32 * line_h + 2.0 * pad;
    let total_w: f32 = widths.iter().sum();

    let text_color = if row.kind == RowKind::Header {
        doc.draw(
            page,
            DrawOp::Rect {
                x,
                y,
                width: total_w,
                height,
                fill: Rgb::HEADER_FILL,
            },
        );
        Rgb::WHITE
    } else {
        Rgb::BLACK
    };

    let mut cell_x = x;
    for ((lines, style), col_w) in row.cells.iter().zip(&row.styles).zip(widths) {
        let end = range.end.min(lines.len());
        let start = range.start.min(end);
        for (i, line) in lines[start..end].iter().enumerate() {
            doc.draw(
                page,
                DrawOp::Text {
                    x: cell_x + pad,
                    y: y + pad + i as f32 * line_h,
                    text: line.clone(),
                    font_size: typography.table_size,
                    style: *style,
                    color: text_color,
                },
            );
        }
        cell_x += col_w;
    }

    let grid_line = |x1: f32, y1: f32, x2: f32, y2: f32| DrawOp::Line {
        x1,
        y1,
        x2,
        y2,
        width: GRID_LINE_WIDTH,
        color: Rgb::GRID,
    };
    doc.draw(page, grid_line(x, y, x + total_w, y));
    doc.draw(page, grid_line(x, y + height, x + total_w, y + height));
    let mut edge = x;
    doc.draw(page, grid_line(edge, y, edge, y + height));
    for col_w in widths {
        edge += col_w;
        doc.draw(page, grid_line(edge, y, edge, y + height));
    }

    height
}

/// Header band redrawn at the top of continuation pages.
struct HeaderRepeat<'a> {
    row: &'a RowLayout,
    drawn_on: Option<usize>,
}

impl HeaderRepeat<'_> {
    /// Draw the header if the cursor sits at the top of a page that lacks it.
    fn redraw_if_needed(&mut self, doc: &mut Document, cursor: &mut Cursor, ctx: &RenderContext, x: f32, widths: &[f32]) {
        if cursor.at_page_top(ctx) && self.drawn_on != Some(cursor.page) {
            cursor.y += draw_row_band(doc, cursor.page, x, cursor.y, widths, self.row, 0..self.row.line_count, ctx);
            self.drawn_on = Some(cursor.page);
        }
    }
}

/// Commit a row that is taller than a whole printable band, a page at a time.
fn write_oversized_row(
    doc: &mut Document,
    cursor: &mut Cursor,
    ctx: &RenderContext,
    x: f32,
    widths: &[f32],
    row: &RowLayout,
    mut repeat: Option<&mut HeaderRepeat<'_>>,
) {
    let typography = ctx.typography();
    let pad = typography.cell_padding;
    let line_h = ctx.line_height(typography.table_size);
    log::warn!(
        "table row with {} lines exceeds the printable height; splitting across pages",
        row.line_count
    );

    if !cursor.at_page_top(ctx) {
        advance_page(doc, cursor, ctx);
    }
    let mut offset = 0usize;
    while offset < row.line_count {
        if let Some(repeat) = repeat.as_deref_mut() {
            repeat.redraw_if_needed(doc, cursor, ctx, x, widths);
        }
        let room = ctx.geometry().printable_bottom() - cursor.y - 2.0 * pad;
        let fit = ((room / line_h).floor() as usize).max(1);
        let end = (offset + fit).min(row.line_count);
        cursor.y += draw_row_band(doc, cursor.page, x, cursor.y, widths, row, offset..end, ctx);
        offset = end;
        if offset < row.line_count {
            advance_page(doc, cursor, ctx);
        }
    }
}

/// Lay out a table starting at the cursor. Rows are never split across pages
/// unless a single row is taller than the printable band.
/// Returns the cursor position below the last row.
pub fn write_table(
    doc: &mut Document,
    cursor: &mut Cursor,
    ctx: &RenderContext,
    table: &TableSpec,
    x: f32,
) -> f32 {
    let geometry = ctx.geometry();
    let typography = ctx.typography();
    let pad = typography.cell_padding;
    let line_h = ctx.line_height(typography.table_size);
    let available = (geometry.page_width - x - geometry.margin_right).max(0.0);
    let widths = table.column_widths(available);
    let printable_height = geometry.printable_height();
    let repeat_header = table.repeat_header || ctx.config.repeat_table_header;

    let header = (!table.header.is_empty())
        .then(|| layout_row(&table.header, RowKind::Header, table.theme, &widths, ctx));

    let mut repeat = None;
    if let Some(header) = &header {
        let h = header.height(line_h, pad);
        if h > printable_height {
            write_oversized_row(doc, cursor, ctx, x, &widths, header, None);
        } else {
            ensure_room(doc, cursor, ctx, h);
            let page = cursor.page;
            cursor.y += draw_row_band(doc, page, x, cursor.y, &widths, header, 0..header.line_count, ctx);
            // Continuation pages need room for the header plus at least one line.
            if repeat_header && h + line_h + 2.0 * pad <= printable_height {
                repeat = Some(HeaderRepeat {
                    row: header,
                    drawn_on: Some(page),
                });
            }
        }
    }

    for (ri, cells) in table.rows.iter().enumerate() {
        let row = layout_row(cells, RowKind::Body, table.theme, &widths, ctx);
        let row_h = row.height(line_h, pad);
        log::debug!(
            "table row={} lines={} row_h={:.2} page={} y={:.2}",
            ri,
            row.line_count,
            row_h,
            cursor.page,
            cursor.y
        );

        if row_h > printable_height {
            write_oversized_row(doc, cursor, ctx, x, &widths, &row, repeat.as_mut());
            continue;
        }

        ensure_room(doc, cursor, ctx, row_h);
        if let Some(repeat) = repeat.as_mut()
            && repeat.row.height(line_h, pad) + row_h <= printable_height
        {
            repeat.redraw_if_needed(doc, cursor, ctx, x, &widths);
        }
        cursor.y += draw_row_band(doc, cursor.page, x, cursor.y, &widths, &row, 0..row.line_count, ctx);
    }

    cursor.y
}
