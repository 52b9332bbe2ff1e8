#![allow(dead_code)]

use chrono::DateTime;

use laudo_pdf::pdf::{Document, DrawOp};
use laudo_pdf::{Caso, Evidencia, Laudo, RenderContext, ReportConfig, Vitima};

/// Render context with a fixed generation time so output is reproducible.
pub fn ctx() -> RenderContext {
    ctx_with(ReportConfig::default())
}

pub fn ctx_with(config: ReportConfig) -> RenderContext {
    let at = DateTime::parse_from_rfc3339("2024-05-10T14:30:00-03:00").unwrap();
    RenderContext::new(config, at)
}

/// Whitespace-separated words `<prefix>0000 <prefix>0001 ...` totalling at least `min_len` chars.
pub fn numbered_words(prefix: &str, min_len: usize) -> String {
    let mut out = String::new();
    let mut i = 0;
    while out.len() < min_len {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{prefix}{i:04}"));
        i += 1;
    }
    out
}

pub fn caso(titulo: &str) -> Caso {
    Caso {
        numero: Some("2024/001".into()),
        titulo: Some(titulo.into()),
        descricao: Some("Ocorrência registrada na delegacia central.".into()),
        tipo: Some("Homicídio".into()),
        status: Some("Em andamento".into()),
        data_abertura: Some("2024-01-01T10:00:00Z".into()),
        local: Some("Recife - PE".into()),
        responsavel: Some("Dra. Ana Souza".into()),
        ..Caso::default()
    }
}

pub fn evidencia(tipo: &str) -> Evidencia {
    Evidencia {
        tipo: Some(tipo.into()),
        descricao: Some("Material coletado no local".into()),
        data_coleta: Some("2024-01-02".into()),
        coletado_por: Some("Perito João".into()),
        local_coleta: Some("Sala de estar".into()),
        status: Some("Em análise".into()),
        anexos: vec!["https://files.example/ev/1.jpg".into()],
        ..Evidencia::default()
    }
}

pub fn vitima() -> Vitima {
    Vitima {
        nome: Some("Maria da Silva".into()),
        sexo: Some("Feminino".into()),
        idade: Some("34".into()),
        identificada: Some("Sim".into()),
        ..Vitima::default()
    }
}

pub fn laudo(descricao: &str) -> Laudo {
    Laudo {
        titulo: Some("Exame odontolegal".into()),
        descricao: Some(descricao.into()),
        conclusao: Some("Compatível com a arcada da vítima.".into()),
        perito: Some("Dr. Carlos Lima".into()),
        data_emissao: Some("2024-02-15T09:30:00-03:00".into()),
        status: Some("Finalizado".into()),
        ..Laudo::default()
    }
}

/// `(page index, text)` of every content-band text op, in reading order.
pub fn texts(doc: &Document) -> Vec<(usize, String)> {
    doc.pages
        .iter()
        .flat_map(|p| p.texts().map(move |t| (p.index, t.to_string())))
        .collect()
}

pub fn position_of(texts: &[(usize, String)], needle: &str) -> Option<usize> {
    texts.iter().position(|(_, t)| t == needle)
}

/// Text ops on `page` whose text equals `needle`, as `(x, y)`.
pub fn find_text(doc: &Document, page: usize, needle: &str) -> Vec<(f32, f32)> {
    doc.pages[page]
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, y, text, .. } if text == needle => Some((*x, *y)),
            _ => None,
        })
        .collect()
}

/// Inflate every FlateDecode stream in a serialized PDF.
pub fn content_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    let start_tag = b">>\nstream\n";
    let end_tag = b"\nendstream";
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(off) = find(&pdf[pos..], start_tag) {
        let data_start = pos + off + start_tag.len();
        let Some(len) = find(&pdf[data_start..], end_tag) else {
            break;
        };
        let data = &pdf[data_start..data_start + len];
        if let Ok(inflated) = miniz_oxide::inflate::decompress_to_vec_zlib(data) {
            out.push(inflated);
        }
        pos = data_start + len;
    }
    out
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}
