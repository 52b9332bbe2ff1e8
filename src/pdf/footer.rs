//! Final pass that writes page numbers and the generation timestamp into the
//! reserved footer band of every page.

use chrono::{DateTime, FixedOffset};

use crate::config::RenderContext;
use crate::fonts::{FontStyle, text_width};

use super::{DrawOp, Document, Rgb};

const DIVIDER_OFFSET: f32 = 4.0;
const TEXT_OFFSET: f32 = 8.0;

pub fn page_label(index: usize, total: usize) -> String {
    format!("Página {} de {}", index + 1, total)
}

pub fn timestamp_label(at: &DateTime<FixedOffset>) -> String {
    format!("Gerado em: {}", at.format("%d/%m/%Y %H:%M:%S"))
}

/// Stamp every page with a divider, "Página i de N" and the generation time.
///
/// Only touches [`Page::footer`](super::Page::footer), so the page count is
/// left unchanged. Stamping again replaces the previous footer.
pub fn stamp_pages(doc: &mut Document, ctx: &RenderContext) {
    let geometry = ctx.geometry();
    let size = ctx.typography().footer_size;
    let band_top = geometry.printable_bottom();
    let total = doc.pages.len();
    let timestamp = timestamp_label(&ctx.generated_at);

    for page in &mut doc.pages {
        let label = page_label(page.index, total);
        let label_w = text_width(&label, size, FontStyle::Normal);
        page.footer.clear();
        page.footer.push(DrawOp::Line {
            x1: geometry.margin_left,
            y1: band_top + DIVIDER_OFFSET,
            x2: geometry.page_width - geometry.margin_right,
            y2: band_top + DIVIDER_OFFSET,
            width: 0.5,
            color: Rgb::DIVIDER,
        });
        page.footer.push(DrawOp::Text {
            x: (geometry.page_width - label_w) / 2.0,
            y: band_top + TEXT_OFFSET,
            text: label,
            font_size: size,
            style: FontStyle::Normal,
            color: Rgb::DIVIDER,
        });
        page.footer.push(DrawOp::Text {
            x: geometry.margin_left,
            y: band_top + TEXT_OFFSET,
            text: timestamp.clone(),
            font_size: size,
            style: FontStyle::Normal,
            color: Rgb::DIVIDER,
        });
    }
    log::debug!("stamped {total} page footers");
}
