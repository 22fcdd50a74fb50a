//! PDF assembly with embedded TrueType fonts.
//!
//! Text is drawn through a Type0 / Identity-H font so any glyph in the font
//! (Cyrillic included) can be shown; a ToUnicode map keeps the output
//! searchable and extractable.

use super::fonts::{glyph_for, glyph_width, FontFile, FontSet};
use super::layout::{Page, PageGeometry};
use super::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;
use ttf_parser::Face;

const FONT_RESOURCE: &str = "F1";

/// Glyphs drawn with one font, keyed by glyph id.
type GlyphUsage = BTreeMap<u16, char>;

fn encode_line(face: &Face<'_>, text: &str, usage: &mut GlyphUsage) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for c in text.chars() {
        let glyph = glyph_for(face, c);
        usage.entry(glyph.0).or_insert(c);
        bytes.extend_from_slice(&glyph.0.to_be_bytes());
    }
    bytes
}

fn page_content(
    face: &Face<'_>,
    page: &Page,
    geometry: &PageGeometry,
    font_size: i64,
    usage: &mut GlyphUsage,
) -> Result<Vec<u8>, RenderError> {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![FONT_RESOURCE.into(), font_size.into()]));
        operations.push(Operation::new("Td", vec![geometry.margin.into(), line.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_line(face, &line.text, usage), StringFormat::Hexadecimal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Ok(Content { operations }.encode()?)
}

fn to_unicode_cmap(usage: &GlyphUsage) -> Vec<u8> {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &char)> = usage.iter().collect();
    // bfchar sections are limited to 100 entries each.
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (glyph, c) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", glyph, utf16));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap.into_bytes()
}

fn scaled(face: &Face<'_>, value: i16) -> i64 {
    value as i64 * 1000 / face.units_per_em().max(1) as i64
}

fn embed_font(doc: &mut Document, font: &FontFile, usage: &GlyphUsage) -> Result<ObjectId, RenderError> {
    let face = font.face()?;

    let font_file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => font.data.len() as i64 },
        font.data.clone(),
    ));

    let bbox = face.global_bounding_box();
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font.name,
        // Serif | Nonsymbolic
        "Flags" => 34,
        "FontBBox" => vec![
            scaled(&face, bbox.x_min).into(),
            scaled(&face, bbox.y_min).into(),
            scaled(&face, bbox.x_max).into(),
            scaled(&face, bbox.y_max).into(),
        ],
        "ItalicAngle" => 0,
        "Ascent" => scaled(&face, face.ascender()),
        "Descent" => scaled(&face, face.descender()),
        "CapHeight" => scaled(&face, face.capital_height().unwrap_or(face.ascender())),
        "StemV" => 80,
        "FontFile2" => font_file_id,
    });

    let mut widths = Vec::with_capacity(usage.len() * 2);
    for glyph in usage.keys() {
        widths.push(Object::Integer(*glyph as i64));
        widths.push(Object::Array(vec![Object::Integer(glyph_width(
            &face,
            ttf_parser::GlyphId(*glyph),
        ))]));
    }

    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => font.name,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    // Identity-H text cannot be extracted without a ToUnicode map, even on a blank page.
    let cmap_id = doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(usage)));

    Ok(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => font.name,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![cid_font_id.into()],
        "ToUnicode" => cmap_id,
    }))
}

/// Write laid-out pages as a PDF, drawn in the regular weight at `font_size`.
/// Only the regular face is embedded.
pub fn write_pdf(
    pages: &[Page],
    geometry: &PageGeometry,
    fonts: &FontSet,
    font_size: i64,
) -> Result<Vec<u8>, RenderError> {
    let face = fonts.regular.face()?;
    let blank = [Page::default()];
    let pages = if pages.is_empty() { &blank[..] } else { pages };

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut usage = GlyphUsage::new();
    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(&face, page, geometry, font_size, &mut usage)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let font_id = embed_font(&mut doc, &fonts.regular, &usage)?;

    let mut font_resources = Dictionary::new();
    font_resources.set(FONT_RESOURCE, font_id);
    let resources_id = doc.add_object(dictionary! { "Font" => font_resources });

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), geometry.width.into(), geometry.height.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(lopdf::Error::from)?;
    Ok(out)
}
