//! Page model and PDF serialization.
//!
//! Layout code works in a top-down coordinate space (y grows from the top edge
//! of the page). [`render`] is the only place that flips coordinates into PDF
//! user space.

pub mod footer;
pub mod layout;
pub mod table;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::PageGeometry;
use crate::fonts::{FontStyle, to_winansi_bytes};

/// Helvetica ascender, used to place the baseline below a line-box top.
const ASCENDER_RATIO: f32 = 0.718;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const HEADER_FILL: Rgb = Rgb(41, 65, 122);
    pub const GRID: Rgb = Rgb(180, 180, 180);
    pub const DIVIDER: Rgb = Rgb(120, 120, 120);

    fn components(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// One line of text; `y` is the top of its line box.
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        style: FontStyle,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
}

impl DrawOp {
    /// Vertical extent `(top, bottom)` of the operation.
    pub fn vertical_span(&self) -> (f32, f32) {
        match self {
            DrawOp::Text { y, font_size, .. } => (*y, *y + font_size),
            DrawOp::Line { y1, y2, .. } => (y1.min(*y2), y1.max(*y2)),
            DrawOp::Rect { y, height, .. } => (*y, *y + height),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub index: usize,
    /// Content band, written by the flow writer and table renderer.
    pub ops: Vec<DrawOp>,
    /// Reserved footer band, written only by [`footer::stamp_pages`].
    pub footer: Vec<DrawOp>,
}

impl Page {
    fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Text of every content-band line on this page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(DrawOp::text)
    }

    pub fn footer_texts(&self) -> impl Iterator<Item = &str> {
        self.footer.iter().filter_map(DrawOp::text)
    }
}

/// A document under construction: fixed geometry plus an arena of pages.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    /// Creates a document holding one blank page.
    pub fn new(geometry: PageGeometry, title: impl Into<String>) -> Self {
        Self {
            geometry,
            title: title.into(),
            pages: vec![Page::new(0)],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Appends a blank page and returns its index.
    pub(crate) fn push_page(&mut self) -> usize {
        let index = self.pages.len();
        self.pages.push(Page::new(index));
        index
    }

    pub(crate) fn draw(&mut self, page: usize, op: DrawOp) {
        if let Some(p) = self.pages.get_mut(page) {
            p.ops.push(op);
        }
    }
}

fn pdf_date(at: &DateTime<FixedOffset>) -> Date {
    let offset_minutes = at.offset().local_minus_utc() / 60;
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour((offset_minutes / 60) as i8)
        .utc_offset_minute((offset_minutes % 60).unsigned_abs() as u8)
}

fn write_op(content: &mut Content, op: &DrawOp, page_height: f32) {
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            font_size,
            style,
            color,
        } => {
            if text.is_empty() {
                return;
            }
            let (r, g, b) = color.components();
            let baseline = page_height - (y + font_size * ASCENDER_RATIO);
            content.set_fill_rgb(r, g, b);
            content.begin_text();
            content.set_font(Name(style.pdf_name().as_bytes()), *font_size);
            content.next_line(*x, baseline);
            content.show(Str(&to_winansi_bytes(text)));
            content.end_text();
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        } => {
            let (r, g, b) = color.components();
            content.save_state();
            content.set_line_width(*width);
            content.set_stroke_rgb(r, g, b);
            content.move_to(*x1, page_height - y1);
            content.line_to(*x2, page_height - y2);
            content.stroke();
            content.restore_state();
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            let (r, g, b) = fill.components();
            content.save_state();
            content.set_fill_rgb(r, g, b);
            content.rect(*x, page_height - y - height, *width, *height);
            content.fill_nonzero();
            content.restore_state();
        }
    }
}

/// Serialize a laid-out document to PDF bytes.
pub fn render(doc: &Document, generated_at: &DateTime<FixedOffset>) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let font_refs: Vec<(FontStyle, Ref)> = FontStyle::ALL.iter().map(|s| (*s, alloc())).collect();
    for (style, font_ref) in &font_refs {
        pdf.type1_font(*font_ref)
            .base_font(Name(style.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let page_height = doc.geometry.page_height;

    for (i, page) in doc.pages.iter().enumerate() {
        let mut content = Content::new();
        for op in page.ops.iter().chain(page.footer.iter()) {
            write_op(&mut content, op, page_height);
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(
            0.0,
            0.0,
            doc.geometry.page_width,
            doc.geometry.page_height,
        ))
        .parent(pages_id)
        .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (style, font_ref) in &font_refs {
            fonts.pair(Name(style.pdf_name().as_bytes()), *font_ref);
        }
    }

    pdf.document_info(info_id)
        .title(TextStr(&doc.title))
        .creator(TextStr("laudo-pdf"))
        .producer(TextStr(concat!("laudo-pdf ", env!("CARGO_PKG_VERSION"))))
        .creation_date(pdf_date(generated_at));

    log::debug!(
        "render: {} pages serialized in {:.1}ms",
        n,
        t0.elapsed().as_secs_f64() * 1000.0
    );

    pdf.finish()
}
