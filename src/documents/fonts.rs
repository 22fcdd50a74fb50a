//! TrueType font loading and text measurement.

use super::RenderError;
use std::path::{Path, PathBuf};
use ttf_parser::{Face, GlyphId};

pub const REGULAR_FONT_FILE: &str = "times.ttf";
pub const BOLD_FONT_FILE: &str = "timesbd.ttf";

pub struct FontFile {
    /// PDF base font name.
    pub name: &'static str,
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl FontFile {
    fn load(dir: &Path, file_name: &str, name: &'static str) -> Result<Self, RenderError> {
        let path = dir.join(file_name);
        let data = std::fs::read(&path).map_err(|source| RenderError::FontRead {
            path: path.clone(),
            source,
        })?;

        let font = Self { name, path, data };
        font.face()?;
        Ok(font)
    }

    pub fn face(&self) -> Result<Face<'_>, RenderError> {
        Face::parse(&self.data, 0).map_err(|source| RenderError::FontParse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Regular and bold weights of the serif family used for rendered analyses.
pub struct FontSet {
    pub regular: FontFile,
    pub bold: FontFile,
}

impl FontSet {
    /// Both weights must be present in `dir`.
    pub fn load(dir: &Path) -> Result<Self, RenderError> {
        for file_name in [REGULAR_FONT_FILE, BOLD_FONT_FILE] {
            let path = dir.join(file_name);
            if !path.exists() {
                return Err(RenderError::FontMissing(path));
            }
        }

        Ok(Self {
            regular: FontFile::load(dir, REGULAR_FONT_FILE, "TimesNewRoman")?,
            bold: FontFile::load(dir, BOLD_FONT_FILE, "TimesNewRoman-Bold")?,
        })
    }
}

/// Glyph for `c`, falling back to `.notdef`.
pub fn glyph_for(face: &Face<'_>, c: char) -> GlyphId {
    face.glyph_index(c).unwrap_or(GlyphId(0))
}

/// Advance width of `glyph` in 1/1000 text-space units.
pub fn glyph_width(face: &Face<'_>, glyph: GlyphId) -> i64 {
    let advance = face.glyph_hor_advance(glyph).unwrap_or(0) as i64;
    advance * 1000 / face.units_per_em().max(1) as i64
}

/// Rendered width of `text` at `size` points, without kerning.
pub fn text_width(face: &Face<'_>, text: &str, size: f32) -> f32 {
    let units_per_em = face.units_per_em().max(1) as f32;
    let advance: f32 = text
        .chars()
        .map(|c| face.glyph_hor_advance(glyph_for(face, c)).unwrap_or(0) as f32)
        .sum();
    advance * size / units_per_em
}
