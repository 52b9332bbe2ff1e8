mod common;

use laudo_pdf::{
    Error, Evidencia, Laudo, LaudoBundle, RecordId, RecordKind, Related, build_laudo_report,
    layout_laudo_report,
};

fn bundle_with(descricao: &str) -> LaudoBundle {
    LaudoBundle {
        evidencia: Some(common::evidencia("Projétil de arma de fogo")),
        laudo: Some(common::laudo(descricao).into()),
        ..LaudoBundle::default()
    }
}

fn body_between(doc: &laudo_pdf::pdf::Document, start: &str, end: &str) -> Vec<String> {
    let texts = common::texts(doc);
    let from = common::position_of(&texts, start).unwrap_or_else(|| panic!("missing {start}"));
    let to = common::position_of(&texts, end).unwrap_or_else(|| panic!("missing {end}"));
    assert!(from < to, "{start} must precede {end}");
    texts[from + 1..to].iter().map(|(_, t)| t.clone()).collect()
}

#[test]
fn heading_and_subtitle_open_the_report() {
    let ctx = common::ctx();
    let doc = layout_laudo_report(&bundle_with("curto"), &ctx).unwrap();
    let texts: Vec<&str> = doc.pages[0].texts().collect();
    assert_eq!(&texts[..2], &["LAUDO PERICIAL", "Exame odontolegal"]);
    assert_eq!(doc.title, "LAUDO PERICIAL - Exame odontolegal");
}

#[test]
fn long_analysis_flows_across_pages_without_losing_words() {
    let ctx = common::ctx();
    let descricao = common::numbered_words("d", 5_000);
    let doc = layout_laudo_report(&bundle_with(&descricao), &ctx).unwrap();
    assert!(doc.page_count() >= 2, "got {} pages", doc.page_count());

    let lines = body_between(&doc, "DESCRIÇÃO DA ANÁLISE", "CONCLUSÃO TÉCNICA");
    let words: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
    let expected: Vec<&str> = descricao.split_whitespace().collect();
    assert_eq!(words, expected);

    // The conclusion title lands after the last analysis line, never beside it.
    let texts = common::texts(&doc);
    let last_line = texts
        .iter()
        .rev()
        .find(|(_, t)| t.ends_with(expected[expected.len() - 1]))
        .unwrap();
    let conclusion_page = texts
        .iter()
        .find(|(_, t)| t == "CONCLUSÃO TÉCNICA")
        .map(|(p, _)| *p)
        .unwrap();
    assert!(conclusion_page >= last_line.0);
    if conclusion_page == last_line.0 {
        let line_y = common::find_text(&doc, last_line.0, &last_line.1)[0].1;
        let title_y = common::find_text(&doc, conclusion_page, "CONCLUSÃO TÉCNICA")[0].1;
        assert!(title_y > line_y);
    }
}

#[test]
fn sections_follow_the_declared_order() {
    let ctx = common::ctx();
    let bundle = LaudoBundle {
        caso: Some(common::caso("Caso X").into()),
        vitima: Some(common::vitima().into()),
        ..bundle_with("Análise das arcadas.")
    };
    let doc = layout_laudo_report(&bundle, &ctx).unwrap();
    let texts = common::texts(&doc);
    let order: Vec<usize> = [
        "LAUDO PERICIAL",
        "DADOS DO CASO",
        "DADOS DA EVIDÊNCIA",
        "DADOS DA VÍTIMA",
        "DESCRIÇÃO DA ANÁLISE",
        "CONCLUSÃO TÉCNICA",
        "ANEXOS",
        "RESPONSÁVEL TÉCNICO",
    ]
    .iter()
    .map(|t| common::position_of(&texts, t).unwrap_or_else(|| panic!("missing {t}")))
    .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
}

#[test]
fn missing_conclusion_reads_pending() {
    let ctx = common::ctx();
    let mut laudo = common::laudo("texto");
    laudo.conclusao = None;
    let bundle = LaudoBundle {
        laudo: Some(laudo.into()),
        ..bundle_with("")
    };
    let doc = layout_laudo_report(&bundle, &ctx).unwrap();
    assert_eq!(body_between(&doc, "CONCLUSÃO TÉCNICA", "ANEXOS"), vec!["Pendente"]);
}

#[test]
fn attachments_list_evidence_then_laudo_urls() {
    let ctx = common::ctx();
    let mut laudo = common::laudo("texto");
    laudo.anexos = vec!["https://files.example/laudo/assinado.pdf".into()];
    let bundle = LaudoBundle {
        laudo: Some(laudo.into()),
        ..bundle_with("")
    };
    let doc = layout_laudo_report(&bundle, &ctx).unwrap();
    assert_eq!(
        body_between(&doc, "ANEXOS", "RESPONSÁVEL TÉCNICO"),
        vec![
            "https://files.example/ev/1.jpg",
            "https://files.example/laudo/assinado.pdf"
        ]
    );
}

#[test]
fn evidence_alone_renders_without_analysis_sections() {
    let ctx = common::ctx();
    let bundle = LaudoBundle {
        evidencia: Some(Evidencia {
            tipo: Some("Fibra têxtil".into()),
            ..Evidencia::default()
        }),
        ..LaudoBundle::default()
    };
    let doc = layout_laudo_report(&bundle, &ctx).unwrap();
    let texts: Vec<String> = common::texts(&doc).into_iter().map(|(_, t)| t).collect();

    assert_eq!(texts[1], "Sem título");
    for absent in [
        "DADOS DO CASO",
        "DADOS DA VÍTIMA",
        "DESCRIÇÃO DA ANÁLISE",
        "CONCLUSÃO TÉCNICA",
        "RESPONSÁVEL TÉCNICO",
    ] {
        assert!(!texts.contains(&absent.to_string()), "{absent} should be skipped");
    }
    assert_eq!(texts.last().map(String::as_str), Some("Nenhuma"));
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn unresolved_laudo_is_treated_as_absent() {
    let ctx = common::ctx();
    let evidence_only = LaudoBundle {
        evidencia: Some(common::evidencia("Projétil de arma de fogo")),
        ..LaudoBundle::default()
    };
    let unresolved = LaudoBundle {
        laudo: Some(Related::Unresolved(RecordId::Text("6650aa".into()))),
        caso: Some(Related::Unresolved(RecordId::Number(3))),
        ..evidence_only.clone()
    };
    assert_eq!(
        layout_laudo_report(&evidence_only, &ctx).unwrap(),
        layout_laudo_report(&unresolved, &ctx).unwrap()
    );
}

#[test]
fn missing_evidence_is_an_error() {
    let ctx = common::ctx();
    let bundle = LaudoBundle {
        laudo: Some(Laudo::default().into()),
        ..LaudoBundle::default()
    };
    let err = layout_laudo_report(&bundle, &ctx).unwrap_err();
    assert!(matches!(err, Error::MissingRecord(RecordKind::Evidencia)));
    assert!(matches!(
        build_laudo_report(&bundle, &ctx),
        Err(Error::MissingRecord(RecordKind::Evidencia))
    ));
}

#[test]
fn filename_uses_the_evidence_type() {
    let ctx = common::ctx();
    let generated = build_laudo_report(&bundle_with("curto"), &ctx).unwrap();
    assert_eq!(generated.filename, "Laudo_Projetil_de_arma_de_fogo_2024-05-10.pdf");
    assert!(generated.bytes.starts_with(b"%PDF-"));

    let untyped = LaudoBundle {
        evidencia: Some(Evidencia::default()),
        ..LaudoBundle::default()
    };
    let generated = build_laudo_report(&untyped, &ctx).unwrap();
    assert_eq!(generated.filename, "Laudo_sem_identificacao_2024-05-10.pdf");
}

#[test]
fn non_text_bodies_from_json_use_fallbacks() {
    let json = r#"{
        "evidencia": {"_id": "e1", "tipo": "Dente", "dataColeta": "2024-03-04", "anexos": []},
        "laudo": {"titulo": "Exame", "descricao": 0, "conclusao": false},
        "caso": "c1",
        "vitima": null
    }"#;
    let bundle: LaudoBundle = serde_json::from_str(json).unwrap();
    assert_eq!(bundle.caso, Some(Related::Unresolved(RecordId::Text("c1".into()))));
    assert_eq!(bundle.vitima, None);

    let doc = layout_laudo_report(&bundle, &common::ctx()).unwrap();
    assert_eq!(
        body_between(&doc, "DESCRIÇÃO DA ANÁLISE", "CONCLUSÃO TÉCNICA"),
        vec!["Não informado"]
    );
    assert_eq!(body_between(&doc, "CONCLUSÃO TÉCNICA", "ANEXOS"), vec!["Pendente"]);
    assert!(common::position_of(&common::texts(&doc), "04/03/2024").is_some());
}
