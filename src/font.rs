use lopdf::{Object, StringFormat};
use owned_ttf_parser::{AsFaceRef as _, Face, OwnedFace};
use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    sync::Arc,
};
use unicode_normalization::UnicodeNormalization as _;

use crate::{
    error::ContextError,
    metrics::{win_ansi_code, StandardFont},
};

/// The character written in place of the ones a standard font cannot encode.
const REPLACEMENT_CODE: u8 = b'?';

/// Beginning of the `ToUnicode` character map of an embedded font, the placeholder is the font name.
const TO_UNICODE_MAP_HEADER: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /{}-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
";

const TO_UNICODE_MAP_FOOTER: &str = "endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

/// A font that text can be written and measured with.
#[derive(Clone, Debug)]
pub enum Font {
    /// One of the fonts every PDF reader provides, written with `WinAnsiEncoding`.
    Standard(StandardFont),
    /// A TrueType font embedded into the document, written by glyph ID.
    TrueType(TrueTypeFont),
}

impl Font {
    /// Loads a TrueType (or TrueType-flavoured OpenType) font file to be embedded into the document.
    pub fn from_true_type_file(font_path: &Path) -> Result<Font, ContextError> {
        let font_bytes = std::fs::read(font_path).map_err(|error| {
            ContextError::with_error(format!("Failed to read the font {:?}", font_path), &error)
        })?;
        let true_type_font = TrueTypeFont::from_bytes(font_bytes).map_err(|error| {
            ContextError::with_error(format!("Failed to parse the font {:?}", font_path), &error)
        })?;

        Ok(Font::TrueType(true_type_font))
    }

    /// Converts the text into the bytes of a PDF string for this font. The text is normalized in the
    /// NFC form first so that precomposed characters are looked up.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Font::Standard(standard_font) => text
                .nfc()
                .map(|character| {
                    win_ansi_code(character).unwrap_or_else(|| {
                        log::warn!(
                            "The character {:?} cannot be written with {}, replacing it with {:?}",
                            character,
                            standard_font.postscript_name(),
                            REPLACEMENT_CODE as char
                        );
                        REPLACEMENT_CODE
                    })
                })
                .collect(),
            Font::TrueType(true_type_font) => true_type_font
                .glyph_ids(text)
                .iter()
                .flat_map(|glyph_id| glyph_id.to_be_bytes())
                .collect(),
        }
    }

    /// The advance width in points of the text written at the given size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            Font::Standard(standard_font) => {
                standard_font.text_width(&self.encode(text), font_size)
            }
            Font::TrueType(true_type_font) => true_type_font.text_width(text, font_size),
        }
    }

    /// A short name used in log messages.
    pub fn display_name(&self) -> String {
        match self {
            Font::Standard(standard_font) => standard_font.postscript_name().to_string(),
            Font::TrueType(true_type_font) => format!(
                "embedded TrueType font ({} glyphs)",
                true_type_font.face().number_of_glyphs()
            ),
        }
    }

    /// Builds the font dictionary, inserting into the document the objects it refers to
    /// (for embedded fonts: the font file, its descriptor and the `ToUnicode` map).
    pub(crate) fn insert_into_document(
        &self,
        resource_name: &str,
        inner_document: &mut lopdf::Document,
    ) -> lopdf::Dictionary {
        match self {
            Font::Standard(standard_font) => lopdf::Dictionary::from_iter(vec![
                ("Type", Object::Name("Font".into())),
                ("Subtype", Object::Name("Type1".into())),
                (
                    "BaseFont",
                    Object::Name(standard_font.postscript_name().into()),
                ),
                ("Encoding", Object::Name("WinAnsiEncoding".into())),
            ]),
            Font::TrueType(true_type_font) => {
                true_type_font.insert_into_document(resource_name, inner_document)
            }
        }
    }
}

/// A parsed TrueType font together with the bytes it was parsed from, which are embedded as they are.
#[derive(Clone, Debug)]
pub struct TrueTypeFont {
    bytes: Arc<Vec<u8>>,
    face: Arc<OwnedFace>,
    units_per_em: u16,
}

impl TrueTypeFont {
    pub fn from_bytes(font_bytes: Vec<u8>) -> Result<TrueTypeFont, ContextError> {
        let face = OwnedFace::from_vec(font_bytes.clone(), 0)
            .map_err(|error| ContextError::with_error("Failed to parse the font face", &error))?;
        let units_per_em = face.as_face_ref().units_per_em();

        Ok(TrueTypeFont {
            bytes: Arc::new(font_bytes),
            face: Arc::new(face),
            units_per_em,
        })
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    /// The glyph IDs of the text, skipping (and logging) the characters missing from the font.
    fn glyph_ids(&self, text: &str) -> Vec<u16> {
        text.nfc()
            .filter_map(|character| match self.face().glyph_index(character) {
                Some(glyph_id) => Some(glyph_id.0),
                None => {
                    log::warn!("Unable to find the character {:?} in the font", character);
                    None
                }
            })
            .collect()
    }

    fn glyph_advance(&self, glyph_id: u16) -> Option<u16> {
        self.face()
            .glyph_hor_advance(owned_ttf_parser::GlyphId(glyph_id))
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = self
            .glyph_ids(text)
            .into_iter()
            .filter_map(|glyph_id| self.glyph_advance(glyph_id))
            .map(u32::from)
            .sum();
        units as f32 * font_size / self.units_per_em as f32
    }

    /// The association between glyph IDs and the first Unicode character mapped to them by the
    /// Unicode subtables of the font.
    fn glyph_characters(&self) -> BTreeMap<u16, char> {
        let mut glyph_characters = BTreeMap::new();
        let Some(character_map) = self.face().tables().cmap else {
            return glyph_characters;
        };

        for subtable in character_map
            .subtables
            .into_iter()
            .filter(|subtable| subtable.is_unicode())
        {
            subtable.codepoints(|codepoint| {
                let Some(character) = char::from_u32(codepoint) else {
                    return;
                };
                if let Some(glyph_id) = subtable
                    .glyph_index(codepoint)
                    .filter(|glyph_id| glyph_id.0 > 0)
                {
                    glyph_characters.entry(glyph_id.0).or_insert(character);
                }
            });
        }

        glyph_characters
    }

    /// Embeds the font as a `Type0` font with a single `CIDFontType2` descendant, using the
    /// `Identity-H` encoding so that strings are sequences of big-endian glyph IDs.
    fn insert_into_document(
        &self,
        resource_name: &str,
        inner_document: &mut lopdf::Document,
    ) -> lopdf::Dictionary {
        use lopdf::Object::*;

        let scale_to_thousandths = 1000.0 / self.units_per_em as f32;
        let to_thousandths = |units: i32| (units as f32 * scale_to_thousandths) as i64;

        let font_stream = lopdf::Stream::new(
            lopdf::Dictionary::from_iter(vec![("Length1", Integer(self.bytes.len() as i64))]),
            self.bytes.as_ref().clone(),
        )
        .with_compression(false);
        let font_stream_id = inner_document.add_object(font_stream);

        // The glyph widths are written as runs of consecutive glyph IDs: `first [w1 w2 ...]`
        let mut width_objects = Vec::<Object>::new();
        let mut run_start = None;
        let mut run_widths = Vec::<Object>::new();
        for glyph_id in 0..self.face().number_of_glyphs() {
            match self.glyph_advance(glyph_id) {
                Some(advance) => {
                    if run_start.is_none() {
                        run_start = Some(glyph_id);
                    }
                    run_widths.push(Integer(to_thousandths(i32::from(advance))));
                }
                None => {
                    if let Some(start) = run_start.take() {
                        width_objects.push(Integer(i64::from(start)));
                        width_objects.push(Array(std::mem::take(&mut run_widths)));
                    }
                }
            }
        }
        if let Some(start) = run_start {
            width_objects.push(Integer(i64::from(start)));
            width_objects.push(Array(run_widths));
        }

        let bounding_box = self
            .face()
            .global_bounding_box();
        let font_descriptor = lopdf::Dictionary::from_iter(vec![
            ("Type", Name("FontDescriptor".into())),
            ("FontName", Name(resource_name.into())),
            ("Ascent", Integer(to_thousandths(i32::from(self.face().ascender())))),
            ("Descent", Integer(to_thousandths(i32::from(self.face().descender())))),
            (
                "CapHeight",
                Integer(to_thousandths(i32::from(
                    self.face()
                        .capital_height()
                        .unwrap_or(self.face().ascender()),
                ))),
            ),
            ("ItalicAngle", Integer(0)),
            // Nonsymbolic font using the standard Latin character set
            ("Flags", Integer(32)),
            ("StemV", Integer(80)),
            (
                "FontBBox",
                Array(vec![
                    Integer(to_thousandths(i32::from(bounding_box.x_min))),
                    Integer(to_thousandths(i32::from(bounding_box.y_min))),
                    Integer(to_thousandths(i32::from(bounding_box.x_max))),
                    Integer(to_thousandths(i32::from(bounding_box.y_max))),
                ]),
            ),
            ("FontFile2", Reference(font_stream_id)),
        ]);
        let font_descriptor_id = inner_document.add_object(font_descriptor);

        let descendant_font = lopdf::Dictionary::from_iter(vec![
            ("Type", Name("Font".into())),
            ("Subtype", Name("CIDFontType2".into())),
            ("BaseFont", Name(resource_name.into())),
            (
                "CIDSystemInfo",
                Dictionary(lopdf::Dictionary::from_iter(vec![
                    ("Registry", String("Adobe".into(), StringFormat::Literal)),
                    ("Ordering", String("Identity".into(), StringFormat::Literal)),
                    ("Supplement", Integer(0)),
                ])),
            ),
            ("W", Array(width_objects)),
            ("DW", Integer(1000)),
            ("FontDescriptor", Reference(font_descriptor_id)),
        ]);

        let to_unicode_map = to_unicode_map(resource_name, &self.glyph_characters());
        let to_unicode_map_id = inner_document.add_object(lopdf::Stream::new(
            lopdf::Dictionary::new(),
            to_unicode_map.into_bytes(),
        ));

        lopdf::Dictionary::from_iter(vec![
            ("Type", Name("Font".into())),
            ("Subtype", Name("Type0".into())),
            ("BaseFont", Name(resource_name.into())),
            ("Encoding", Name("Identity-H".into())),
            ("DescendantFonts", Array(vec![Dictionary(descendant_font)])),
            ("ToUnicode", Reference(to_unicode_map_id)),
        ])
    }
}

/// Writes the `ToUnicode` map of an embedded font. Each `beginbfchar` block holds at most 100
/// entries whose glyph IDs share the same high byte.
fn to_unicode_map(resource_name: &str, glyph_characters: &BTreeMap<u16, char>) -> String {
    let mut blocks: HashMap<u8, Vec<Vec<(u16, char)>>> = HashMap::new();
    for (glyph_id, character) in glyph_characters {
        let high_byte_blocks = blocks.entry((glyph_id >> 8) as u8).or_default();
        match high_byte_blocks.last_mut() {
            Some(block) if block.len() < 100 => block.push((*glyph_id, *character)),
            _ => high_byte_blocks.push(vec![(*glyph_id, *character)]),
        }
    }

    let mut high_bytes: Vec<_> = blocks.keys().copied().collect();
    high_bytes.sort_unstable();

    let mut map = TO_UNICODE_MAP_HEADER.replace("{}", resource_name);
    for high_byte in high_bytes {
        for block in &blocks[&high_byte] {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (glyph_id, character) in block {
                let mut utf16 = [0u16; 2];
                let code_units: String = character
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|code_unit| format!("{code_unit:04x}"))
                    .collect();
                map.push_str(&format!("<{glyph_id:04x}> <{code_units}>\n"));
            }
            map.push_str("endbfchar\n");
        }
    }
    map.push_str(TO_UNICODE_MAP_FOOTER);

    map
}
