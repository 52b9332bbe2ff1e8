//! Report configuration: page geometry, typography, and the fallback literals
//! substituted for absent record fields.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};
use serde::Deserialize;

use crate::error::Result;

const MM: f32 = 72.0 / 25.4;

/// Fixed page geometry in PDF points. One geometry applies to a whole document.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Band above the bottom margin reserved for the page footer.
    pub footer_height: f32,
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            margin_top: 20.0 * MM,
            margin_bottom: 5.0 * MM,
            margin_left: 20.0 * MM,
            margin_right: 20.0 * MM,
            footer_height: 15.0 * MM,
        }
    }
}

impl PageGeometry {
    /// Lowest y (top-down) that section content may reach.
    pub fn printable_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom - self.footer_height
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Height of the band between the top margin and the footer band.
    pub fn printable_height(&self) -> f32 {
        self.printable_bottom() - self.margin_top
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub title_size: f32,
    pub subtitle_size: f32,
    pub heading_size: f32,
    pub subheading_size: f32,
    pub body_size: f32,
    pub table_size: f32,
    pub footer_size: f32,
    pub line_height_ratio: f32,
    /// Extra space after every committed line.
    pub line_gap: f32,
    pub section_gap: f32,
    /// Space between a section title and its body.
    pub paragraph_gap: f32,
    pub cell_padding: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title_size: 16.0,
            subtitle_size: 13.0,
            heading_size: 13.0,
            subheading_size: 11.0,
            body_size: 11.0,
            table_size: 10.0,
            footer_size: 8.0,
            line_height_ratio: crate::fonts::DEFAULT_LINE_HEIGHT_RATIO,
            line_gap: 1.5,
            section_gap: 8.0,
            paragraph_gap: 4.0,
            cell_padding: 3.0,
        }
    }
}

pub const DEFAULT_FALLBACK: &str = "Não informado";

/// Literal strings rendered in place of absent fields, keyed by field name.
///
/// Lookups for fields without an explicit entry return the `default` literal.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FallbackTable {
    pub default: String,
    pub fields: BTreeMap<String, String>,
}

impl Default for FallbackTable {
    fn default() -> Self {
        let fields = [
            ("idade", "N/A"),
            ("documento", "N/A"),
            ("etnia", "N/A"),
            ("data_fechamento", "N/A"),
            ("conclusao", "Pendente"),
            ("anexos", "Nenhuma"),
            ("titulo", "Sem título"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            default: DEFAULT_FALLBACK.to_string(),
            fields,
        }
    }
}

impl FallbackTable {
    pub fn get(&self, field: &str) -> &str {
        self.fields
            .get(field)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }

    /// `value` when it holds visible text, otherwise the literal for `field`.
    pub fn text_or<'a>(&'a self, value: Option<&'a str>, field: &str) -> &'a str {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => self.get(field),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub typography: Typography,
    pub fallbacks: FallbackTable,
    /// Repeat a table's header row at the top of each continuation page.
    pub repeat_table_header: bool,
}

impl ReportConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

/// Everything a layout call needs besides the document and cursor.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub config: ReportConfig,
    /// Timestamp stamped into every footer and used for the output filename.
    pub generated_at: DateTime<FixedOffset>,
}

impl RenderContext {
    pub fn new(config: ReportConfig, generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            config,
            generated_at,
        }
    }

    pub fn now(config: ReportConfig) -> Self {
        Self::new(config, Local::now().fixed_offset())
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.config.geometry
    }

    pub fn typography(&self) -> &Typography {
        &self.config.typography
    }

    pub fn fallbacks(&self) -> &FallbackTable {
        &self.config.fallbacks
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        crate::fonts::line_height(font_size, self.config.typography.line_height_ratio)
    }
}
