pub mod config;
mod error;
pub mod fonts;
pub mod model;
pub mod pdf;
pub mod report;

pub use config::{FallbackTable, PageGeometry, RenderContext, ReportConfig, Typography};
pub use error::{Error, RecordKind, Result};
pub use model::{CaseBundle, Caso, Evidencia, Laudo, LaudoBundle, RecordId, Related, Vitima};
pub use report::case::layout_case_report;
pub use report::laudo::layout_laudo_report;

use std::path::{Path, PathBuf};
use std::time::Instant;

use pdf::Document;

/// A finished report, ready to hand to the caller.
#[derive(Clone, Debug)]
pub struct GeneratedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl GeneratedPdf {
    /// Write the bytes into `dir` under the suggested filename.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

fn finish(
    layout: impl FnOnce() -> Result<Document>,
    filename: String,
    ctx: &RenderContext,
) -> Result<GeneratedPdf> {
    let t0 = Instant::now();

    let doc = layout()?;
    let t_layout = t0.elapsed();

    let bytes = pdf::render(&doc, &ctx.generated_at);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages, {} bytes, {})",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.page_count(),
        bytes.len(),
        filename,
    );

    Ok(GeneratedPdf {
        filename,
        bytes,
        page_count: doc.page_count(),
    })
}

/// Build the case report PDF. Fails only when `bundle.caso` is absent.
pub fn build_case_report(bundle: &CaseBundle, ctx: &RenderContext) -> Result<GeneratedPdf> {
    finish(
        || layout_case_report(bundle, ctx),
        report::case::case_filename(bundle, ctx),
        ctx,
    )
}

/// Build the laudo report PDF. Fails only when `bundle.evidencia` is absent.
pub fn build_laudo_report(bundle: &LaudoBundle, ctx: &RenderContext) -> Result<GeneratedPdf> {
    finish(
        || layout_laudo_report(bundle, ctx),
        report::laudo::laudo_filename(bundle, ctx),
        ctx,
    )
}

pub fn build_case_report_from_json(input: &Path, ctx: &RenderContext) -> Result<GeneratedPdf> {
    let data = std::fs::read(input)?;
    let bundle: CaseBundle = serde_json::from_slice(&data)?;
    build_case_report(&bundle, ctx)
}

pub fn build_laudo_report_from_json(input: &Path, ctx: &RenderContext) -> Result<GeneratedPdf> {
    let data = std::fs::read(input)?;
    let bundle: LaudoBundle = serde_json::from_slice(&data)?;
    build_laudo_report(&bundle, ctx)
}
