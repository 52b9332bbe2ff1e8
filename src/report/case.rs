use crate::config::{FallbackTable, RenderContext};
use crate::error::{Error, RecordKind, Result};
use crate::fonts::FontStyle;
use crate::model::{CaseBundle, Caso, Evidencia, Laudo, Vitima};
use crate::pdf::layout::{Cursor, add_space, write_paragraph, write_rule};
use crate::pdf::table::TableSpec;
use crate::pdf::{Document, Rgb, footer};

use super::{Section, assemble, attachments, date_or, output_filename, text_or};

pub const FILENAME_PREFIX: &str = "Caso";

pub(crate) fn vitima_table(v: &Vitima, fb: &FallbackTable) -> TableSpec {
    TableSpec::key_value([
        ("Nome", text_or(fb, v.nome.as_deref(), "nome")),
        ("Sexo", text_or(fb, v.sexo.as_deref(), "sexo")),
        ("Idade", text_or(fb, v.idade.as_deref(), "idade")),
        ("Documento", text_or(fb, v.documento.as_deref(), "documento")),
        ("Etnia", text_or(fb, v.etnia.as_deref(), "etnia")),
        ("Identificada", text_or(fb, v.identificada.as_deref(), "identificada")),
        ("Observações", text_or(fb, v.observacoes.as_deref(), "observacoes")),
    ])
}

pub(crate) fn caso_table(c: &Caso, fb: &FallbackTable) -> TableSpec {
    TableSpec::key_value([
        ("Número", text_or(fb, c.numero.as_deref(), "numero")),
        ("Título", text_or(fb, c.titulo.as_deref(), "titulo")),
        ("Tipo", text_or(fb, c.tipo.as_deref(), "tipo")),
        ("Status", text_or(fb, c.status.as_deref(), "status")),
        ("Data de Abertura", date_or(fb, c.data_abertura.as_deref(), "data_abertura")),
        ("Data de Fechamento", date_or(fb, c.data_fechamento.as_deref(), "data_fechamento")),
        ("Local", text_or(fb, c.local.as_deref(), "local")),
        ("Responsável", text_or(fb, c.responsavel.as_deref(), "responsavel")),
    ])
}

pub(crate) fn evidencia_table(e: &Evidencia, fb: &FallbackTable) -> TableSpec {
    TableSpec::key_value([
        ("Tipo", text_or(fb, e.tipo.as_deref(), "tipo")),
        ("Descrição", text_or(fb, e.descricao.as_deref(), "descricao")),
        ("Data de Coleta", date_or(fb, e.data_coleta.as_deref(), "data_coleta")),
        ("Coletado por", text_or(fb, e.coletado_por.as_deref(), "coletado_por")),
        ("Local de Coleta", text_or(fb, e.local_coleta.as_deref(), "local_coleta")),
        ("Status", text_or(fb, e.status.as_deref(), "status")),
        ("Anexos", attachments(fb, &e.anexos)),
    ])
}

fn laudo_summary(l: &Laudo, fb: &FallbackTable) -> Vec<Section> {
    vec![
        Section::table(
            "Dados do Laudo",
            TableSpec::key_value([
                ("Perito", text_or(fb, l.perito.as_deref(), "perito")),
                ("Data de Emissão", date_or(fb, l.data_emissao.as_deref(), "data_emissao")),
                ("Status", text_or(fb, l.status.as_deref(), "status")),
            ]),
        ),
        Section::text("Conclusão", text_or(fb, l.conclusao.as_deref(), "conclusao")),
    ]
}

/// Sections of the case report, in print order. Absent related records are left out.
pub fn case_sections(caso: &Caso, bundle: &CaseBundle, fb: &FallbackTable) -> Vec<Section> {
    let mut sections = vec![
        Section::table("Informações do Caso", caso_table(caso, fb)),
        Section::text("Descrição", text_or(fb, caso.descricao.as_deref(), "descricao")),
    ];

    if let Some(vitima) = bundle.vitima.as_ref().and_then(|v| v.resolved()) {
        sections.push(Section::table("Vítima", vitima_table(vitima, fb)));
    }

    let evidencias: Vec<&Evidencia> = bundle.evidencias.iter().filter_map(|e| e.resolved()).collect();
    if !evidencias.is_empty() {
        let rows = evidencias
            .iter()
            .map(|e| {
                vec![
                    text_or(fb, e.tipo.as_deref(), "tipo"),
                    date_or(fb, e.data_coleta.as_deref(), "data_coleta"),
                    text_or(fb, e.status.as_deref(), "status"),
                ]
            })
            .collect();
        sections.push(Section::table(
            "Resumo das Evidências",
            TableSpec::grid(
                vec!["Tipo".into(), "Data de Coleta".into(), "Status".into()],
                rows,
            ),
        ));
        let children = evidencias
            .iter()
            .enumerate()
            .map(|(i, e)| {
                Section::table(
                    format!("Evidência {}: {}", i + 1, text_or(fb, e.tipo.as_deref(), "tipo")),
                    evidencia_table(e, fb),
                )
            })
            .collect();
        sections.push(Section::nested("Evidências", children));
    }

    let laudos: Vec<&Laudo> = bundle.laudos.iter().filter_map(|l| l.resolved()).collect();
    if !laudos.is_empty() {
        let children = laudos
            .iter()
            .enumerate()
            .map(|(i, l)| {
                Section::nested(
                    format!("Laudo {}: {}", i + 1, text_or(fb, l.titulo.as_deref(), "titulo")),
                    laudo_summary(l, fb),
                )
            })
            .collect();
        sections.push(Section::nested("Laudos", children));
    }

    sections
}

/// Lay out and stamp the case report for `bundle`.
pub fn layout_case_report(bundle: &CaseBundle, ctx: &RenderContext) -> Result<Document> {
    let caso = bundle.caso.as_ref().ok_or(Error::MissingRecord(RecordKind::Caso))?;
    let fb = ctx.fallbacks();
    let heading = format!("Caso: {}", text_or(fb, caso.titulo.as_deref(), "titulo"));

    let mut doc = Document::new(*ctx.geometry(), heading.clone());
    let mut cursor = Cursor::start(ctx);
    let x = ctx.geometry().margin_left;

    write_paragraph(&mut doc, &mut cursor, ctx, &heading, x, ctx.typography().title_size, FontStyle::Bold);
    add_space(&mut cursor, ctx, ctx.typography().paragraph_gap);
    write_rule(&mut doc, &mut cursor, ctx, 1.0, Rgb::HEADER_FILL);

    let sections = case_sections(caso, bundle, fb);
    assemble(&mut doc, &mut cursor, ctx, &sections);
    footer::stamp_pages(&mut doc, ctx);
    Ok(doc)
}

pub fn case_filename(bundle: &CaseBundle, ctx: &RenderContext) -> String {
    let id = bundle.caso.as_ref().and_then(|c| {
        c.numero
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(c.titulo.as_deref())
    });
    output_filename(FILENAME_PREFIX, id, ctx)
}
