use crate::config::{FallbackTable, RenderContext};
use crate::error::{Error, RecordKind, Result};
use crate::fonts::FontStyle;
use crate::model::{Evidencia, LaudoBundle};
use crate::pdf::layout::{Cursor, add_space, write_paragraph, write_rule};
use crate::pdf::table::TableSpec;
use crate::pdf::{Document, Rgb, footer};

use super::case::{caso_table, evidencia_table, vitima_table};
use super::{Section, assemble, date_or, output_filename, text_or};

pub const FILENAME_PREFIX: &str = "Laudo";
pub const HEADING: &str = "LAUDO PERICIAL";

/// Sections of the laudo report, in print order.
pub fn laudo_sections(evidencia: &Evidencia, bundle: &LaudoBundle, fb: &FallbackTable) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(caso) = bundle.caso.as_ref().and_then(|c| c.resolved()) {
        sections.push(Section::table("DADOS DO CASO", caso_table(caso, fb)));
    }
    sections.push(Section::table("DADOS DA EVIDÊNCIA", evidencia_table(evidencia, fb)));
    if let Some(vitima) = bundle.vitima.as_ref().and_then(|v| v.resolved()) {
        sections.push(Section::table("DADOS DA VÍTIMA", vitima_table(vitima, fb)));
    }

    let laudo = bundle.laudo.as_ref().and_then(|l| l.resolved());
    if let Some(laudo) = laudo {
        sections.push(Section::text(
            "DESCRIÇÃO DA ANÁLISE",
            text_or(fb, laudo.descricao.as_deref(), "descricao"),
        ));
        sections.push(Section::text(
            "CONCLUSÃO TÉCNICA",
            text_or(fb, laudo.conclusao.as_deref(), "conclusao"),
        ));
    }

    let mut urls = evidencia.anexos.clone();
    if let Some(laudo) = laudo {
        urls.extend(laudo.anexos.iter().cloned());
    }
    sections.push(Section::text("ANEXOS", super::attachments(fb, &urls)));

    if let Some(laudo) = laudo {
        sections.push(Section::table(
            "RESPONSÁVEL TÉCNICO",
            TableSpec::key_value([
                ("Perito", text_or(fb, laudo.perito.as_deref(), "perito")),
                ("Data de Emissão", date_or(fb, laudo.data_emissao.as_deref(), "data_emissao")),
                ("Status", text_or(fb, laudo.status.as_deref(), "status")),
            ]),
        ));
    }

    sections
}

/// Lay out and stamp the laudo report for `bundle`.
pub fn layout_laudo_report(bundle: &LaudoBundle, ctx: &RenderContext) -> Result<Document> {
    let evidencia = bundle
        .evidencia
        .as_ref()
        .ok_or(Error::MissingRecord(RecordKind::Evidencia))?;
    let fb = ctx.fallbacks();
    let typography = ctx.typography();
    let subtitle = text_or(
        fb,
        bundle
            .laudo
            .as_ref()
            .and_then(|l| l.resolved())
            .and_then(|l| l.titulo.as_deref()),
        "titulo",
    );

    let mut doc = Document::new(*ctx.geometry(), format!("{HEADING} - {subtitle}"));
    let mut cursor = Cursor::start(ctx);
    let x = ctx.geometry().margin_left;

    write_paragraph(&mut doc, &mut cursor, ctx, HEADING, x, typography.title_size, FontStyle::Bold);
    write_paragraph(&mut doc, &mut cursor, ctx, &subtitle, x, typography.subtitle_size, FontStyle::Italic);
    add_space(&mut cursor, ctx, typography.paragraph_gap);
    write_rule(&mut doc, &mut cursor, ctx, 1.0, Rgb::HEADER_FILL);

    let sections = laudo_sections(evidencia, bundle, fb);
    assemble(&mut doc, &mut cursor, ctx, &sections);
    footer::stamp_pages(&mut doc, ctx);
    Ok(doc)
}

pub fn laudo_filename(bundle: &LaudoBundle, ctx: &RenderContext) -> String {
    let id = bundle.evidencia.as_ref().and_then(|e| e.tipo.as_deref());
    output_filename(FILENAME_PREFIX, id, ctx)
}
