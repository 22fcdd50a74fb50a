//! Fixture fonts and PDF read-back helpers for rendering tests.

use super::fonts::{glyph_for, FontSet, BOLD_FONT_FILE, REGULAR_FONT_FILE};
use lopdf::content::Content;
use std::collections::HashMap;
use std::path::PathBuf;
use ttf_parser::Face;

/// Directory with the vendored serif fonts under the names the renderer expects.
pub(crate) fn font_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts");
    for file_name in [REGULAR_FONT_FILE, BOLD_FONT_FILE] {
        assert!(
            dir.join(file_name).exists(),
            "fixture font {} missing from {}",
            file_name,
            dir.display()
        );
    }
    dir
}

pub(crate) fn fonts() -> FontSet {
    FontSet::load(&font_dir()).unwrap()
}

/// Lines drawn by `Tj` operators on each page, glyph ids mapped back to the
/// characters of `alphabet` through the font's cmap.
pub(crate) fn drawn_lines(bytes: &[u8], face: &Face<'_>, alphabet: &str) -> Vec<Vec<String>> {
    let chars: HashMap<u16, char> = alphabet
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| (glyph_for(face, c).0, c))
        .collect();
    let doc = lopdf::Document::load_mem(bytes).unwrap();

    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| {
                    op.operands[0]
                        .as_str()
                        .unwrap()
                        .chunks_exact(2)
                        .map(|pair| chars[&u16::from_be_bytes([pair[0], pair[1]])])
                        .collect()
                })
                .collect()
        })
        .collect()
}
