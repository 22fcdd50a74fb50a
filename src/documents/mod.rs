//! Document handling: text extraction from uploads and PDF rendering of long
//! analyses.

pub mod extractor;
pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod renderer;

#[cfg(test)]
pub(crate) mod testing;

pub use extractor::{extract_text, DocumentKind, ExtractError};
pub use layout::{layout, Line, Page, PageGeometry};
pub use renderer::{RenderError, Rendered, ResponseRenderer};
