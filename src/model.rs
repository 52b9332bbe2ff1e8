//! Domain records consumed by the report builders.
//!
//! Records arrive already fetched by the data-access layer. Every field is
//! optional, and text fields are read leniently: numbers and booleans become
//! text, while `null`, arrays, and objects are treated as absent so that the
//! layout code only ever sees `Option<String>`. Free-text bodies (`descricao`,
//! `conclusao`, `observacoes`) only accept strings; anything else falls back.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("Sim".to_string()),
        Value::Bool(false) => Some("Não".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }))
}

fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn decode_related<T: DeserializeOwned>(value: Value) -> Option<Related<T>> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(related) => Some(related),
        Err(e) => {
            log::warn!("skipping malformed related record: {e}");
            None
        }
    }
}

fn lenient_related<'de, D, T>(deserializer: D) -> Result<Option<Related<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(decode_related))
}

/// `null` reads as an empty list; `null` and malformed elements are dropped.
fn lenient_related_list<'de, D, T>(deserializer: D) -> Result<Vec<Related<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(decode_related).collect(),
        Some(other) => decode_related(other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Identifier of a record that has not been fetched.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

/// A related record as delivered by the data-access layer.
///
/// The report builders only read `Resolved` values. An `Unresolved` reference
/// is rendered exactly like an absent record.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Related<T> {
    Resolved(T),
    Unresolved(RecordId),
}

impl<T> Related<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Related::Resolved(value) => Some(value),
            Related::Unresolved(id) => {
                log::warn!("related record {id:?} was not resolved; rendering as absent");
                None
            }
        }
    }
}

impl<T> From<T> for Related<T> {
    fn from(value: T) -> Self {
        Related::Resolved(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Caso {
    #[serde(alias = "_id", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub numero: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub titulo: Option<String>,
    #[serde(deserialize_with = "string_only")]
    pub descricao: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub tipo: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub data_abertura: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub data_fechamento: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub local: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub responsavel: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Evidencia {
    #[serde(alias = "_id", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub tipo: Option<String>,
    #[serde(deserialize_with = "string_only")]
    pub descricao: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub data_coleta: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub coletado_por: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub local_coleta: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    /// Attachment URLs.
    #[serde(deserialize_with = "lenient_list")]
    pub anexos: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vitima {
    #[serde(alias = "_id", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub nome: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sexo: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub idade: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub documento: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub etnia: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub identificada: Option<String>,
    #[serde(deserialize_with = "string_only")]
    pub observacoes: Option<String>,
}

/// Expert finding (laudo) issued for a piece of evidence.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Laudo {
    #[serde(alias = "_id", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub titulo: Option<String>,
    #[serde(deserialize_with = "string_only")]
    pub descricao: Option<String>,
    #[serde(deserialize_with = "string_only")]
    pub conclusao: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub perito: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub data_emissao: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub anexos: Vec<String>,
}

/// Input of the case report: the case plus its related records.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaseBundle {
    pub caso: Option<Caso>,
    #[serde(deserialize_with = "lenient_related_list")]
    pub evidencias: Vec<Related<Evidencia>>,
    #[serde(deserialize_with = "lenient_related")]
    pub vitima: Option<Related<Vitima>>,
    #[serde(deserialize_with = "lenient_related_list")]
    pub laudos: Vec<Related<Laudo>>,
}

/// Input of the laudo report: one piece of evidence plus its related records.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LaudoBundle {
    pub evidencia: Option<Evidencia>,
    #[serde(deserialize_with = "lenient_related")]
    pub laudo: Option<Related<Laudo>>,
    #[serde(deserialize_with = "lenient_related")]
    pub caso: Option<Related<Caso>>,
    #[serde(deserialize_with = "lenient_related")]
    pub vitima: Option<Related<Vitima>>,
}
