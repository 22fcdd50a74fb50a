//! Inline-or-document decision for analysis replies.

use super::fonts::{text_width, FontSet};
use super::layout::{layout, PageGeometry};
use super::pdf::write_pdf;
use crate::config::{LimitsConfig, RenderConfig};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

pub const FONT_SIZE: i64 = 12;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font file not found: {}", .0.display())]
    FontMissing(PathBuf),

    #[error("failed to read font file {}", .path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid font file {}", .path.display())]
    FontParse {
        path: PathBuf,
        #[source]
        source: ttf_parser::FaceParsingError,
    },

    #[error("failed to write PDF")]
    Pdf(#[from] lopdf::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Short enough to send as a chat message.
    Inline(String),
    /// Paginated PDF.
    Document { bytes: Vec<u8>, pages: usize },
}

pub struct ResponseRenderer {
    max_message_length: usize,
    font_dir: PathBuf,
    geometry: PageGeometry,
}

impl ResponseRenderer {
    pub fn new(limits: &LimitsConfig, render: &RenderConfig) -> Self {
        Self {
            max_message_length: limits.max_message_length,
            font_dir: render.font_dir.clone(),
            geometry: PageGeometry::LETTER,
        }
    }

    /// Length is counted in characters, not bytes.
    pub fn fits_inline(&self, text: &str) -> bool {
        text.chars().count() <= self.max_message_length
    }

    pub fn render(&self, analysis: &str) -> Result<Rendered, RenderError> {
        if self.fits_inline(analysis) {
            return Ok(Rendered::Inline(analysis.to_string()));
        }

        let fonts = FontSet::load(&self.font_dir)?;
        let face = fonts.regular.face()?;
        let pages = layout(analysis, &self.geometry, |text| {
            text_width(&face, text, FONT_SIZE as f32)
        });
        let page_count = pages.len().max(1);
        let bytes = write_pdf(&pages, &self.geometry, &fonts, FONT_SIZE)?;

        info!(chars = analysis.chars().count(), pages = page_count, size = bytes.len(), "Rendered analysis as PDF");
        Ok(Rendered::Document {
            bytes,
            pages: page_count,
        })
    }
}
