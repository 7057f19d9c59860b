use lopdf::{content::Operation, Object, ObjectId, StringFormat};
use std::{collections::HashMap, io::BufWriter, path::Path};
use time::OffsetDateTime;

use crate::{error::ContextError, font::Font, metrics::StandardFont};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_PAGE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bounds the walk up a page tree, which could otherwise loop on a malformed document.
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// Index of a font registered in a `PdfDocument`, obtained from `PdfDocument::add_font`
/// or `PdfDocument::standard_font`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontId(usize);

impl FontId {
    /// The name under which the font is listed in the page resources.
    fn resource_name(self) -> String {
        format!("F{}", self.0)
    }
}

/// The style every piece of text is written with. There is no "current font" kept between calls:
/// each call that writes or measures text receives its style explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontId,
    /// The font size in points.
    pub size: f32,
}

impl TextStyle {
    pub fn new(font: FontId, size: f32) -> Self {
        TextStyle { font, size }
    }
}

/// Information written into the document information dictionary and the trailer.
#[derive(Clone, Debug)]
pub struct PdfMetadata {
    pub title: String,
    pub author: Option<String>,
    /// Used both as creation and modification date.
    pub creation_date: OffsetDateTime,
    /// The second entry of the trailer `ID`, identifying this particular rendition of the document.
    pub instance_id: String,
}

/// One page of the document: its size in points and the content operations drawn on it so far.
#[derive(Debug, Clone)]
pub struct PdfPage {
    pub width: f32,
    pub height: f32,
    pub(crate) operations: Vec<Operation>,
}

/// A PDF document under construction. Pages are addressed by the index returned by `add_page`,
/// fonts by the `FontId` returned when registering them; nothing is written to the underlying
/// `lopdf::Document` until `write_all` is called.
#[derive(Debug)]
pub struct PdfDocument {
    /// The underlying PDF document, only populated by `write_all`.
    pub inner_document: lopdf::Document,
    /// The identifier of the document, the first entry of the trailer `ID`.
    pub identifier: String,
    fonts: Vec<Font>,
    standard_fonts: HashMap<StandardFont, FontId>,
    /// TrueType fonts loaded by name, so that each file is embedded once.
    named_fonts: HashMap<String, FontId>,
    pages: Vec<PdfPage>,
    finalized: bool,
    /// The page tree root and its kids, once written.
    pages_id: Option<ObjectId>,
    page_tree_kids: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn new<S: Into<String>>(identifier: S) -> Self {
        PdfDocument {
            inner_document: lopdf::Document::with_version("1.5"),
            identifier: identifier.into(),
            fonts: Vec::new(),
            standard_fonts: HashMap::new(),
            named_fonts: HashMap::new(),
            pages: Vec::new(),
            finalized: false,
            pages_id: None,
            page_tree_kids: Vec::new(),
        }
    }

    /// Appends an empty page of the given size in points and returns its index.
    pub fn add_page(&mut self, page_width: f32, page_height: f32) -> usize {
        self.pages.push(PdfPage {
            width: page_width,
            height: page_height,
            operations: Vec::new(),
        });
        self.pages.len() - 1
    }

    /// The number of drawn pages, not counting pages appended after writing.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The number of pages of the written document, appended pages included.
    pub fn written_page_count(&self) -> usize {
        self.page_tree_kids.len()
    }

    pub fn page(&self, page_index: usize) -> Result<&PdfPage, ContextError> {
        self.pages
            .get(page_index)
            .ok_or(ContextError::with_context(format!(
                "Failed to find the page with index {}",
                page_index
            )))
    }

    /// The operations drawn so far on the page.
    pub fn operations(&self, page_index: usize) -> Result<&[Operation], ContextError> {
        Ok(&self.page(page_index)?.operations)
    }

    /// Registers a font and returns the identifier to be used in a `TextStyle`.
    pub fn add_font(&mut self, font: Font) -> FontId {
        log::debug!(
            "Registering {} as F{}",
            font.display_name(),
            self.fonts.len()
        );
        self.fonts.push(font);
        FontId(self.fonts.len() - 1)
    }

    /// Loads and registers a TrueType font file which will be embedded into the document.
    pub fn add_font_file(&mut self, font_path: &Path) -> Result<FontId, ContextError> {
        let font = Font::from_true_type_file(font_path)?;
        Ok(self.add_font(font))
    }

    /// Returns the identifier of a standard font, registering it on first use.
    pub fn standard_font(&mut self, standard_font: StandardFont) -> FontId {
        if let Some(font_id) = self.standard_fonts.get(&standard_font) {
            return *font_id;
        }
        let font_id = self.add_font(Font::Standard(standard_font));
        self.standard_fonts.insert(standard_font, font_id);
        font_id
    }

    /// Resolves a font name: standard font names first, then the TrueType file associated with
    /// the name, if any.
    pub fn named_font(
        &mut self,
        font_name: &str,
        font_path: Option<&Path>,
    ) -> Result<FontId, ContextError> {
        if let Some(standard_font) = StandardFont::from_name(font_name) {
            return Ok(self.standard_font(standard_font));
        }
        if let Some(font_id) = self.named_fonts.get(font_name) {
            return Ok(*font_id);
        }
        let font_path = font_path.ok_or(ContextError::with_context(format!(
            "The font {:?} is neither a standard font nor associated with a font file",
            font_name
        )))?;
        let font_id = self.add_font_file(font_path).map_err(|error| {
            ContextError::with_error(format!("Failed to load the font {:?}", font_name), &error)
        })?;
        self.named_fonts.insert(font_name.to_string(), font_id);

        Ok(font_id)
    }

    pub fn font(&self, font_id: FontId) -> Result<&Font, ContextError> {
        self.fonts
            .get(font_id.0)
            .ok_or(ContextError::with_context(format!(
                "Failed to find font {} among the registered fonts",
                font_id.0
            )))
    }

    /// The advance width in points of the text written in the given style.
    pub fn text_width(&self, text: &str, style: &TextStyle) -> Result<f32, ContextError> {
        Ok(self.font(style.font)?.text_width(text, style.size))
    }

    /// Writes the text with its baseline starting at the given position (in points, from the
    /// bottom-left corner of the page). Empty text writes nothing.
    pub fn write_text(
        &mut self,
        page_index: usize,
        text: &str,
        style: &TextStyle,
        position: [f32; 2],
    ) -> Result<(), ContextError> {
        if text.is_empty() {
            return Ok(());
        }
        let font = self.font(style.font)?;
        let string_format = match font {
            Font::Standard(_) => StringFormat::Literal,
            Font::TrueType(_) => StringFormat::Hexadecimal,
        };
        let encoded_text = font.encode(text);
        let [x, y] = position;

        self.add_operations_to_page(
            page_index,
            vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(style.font.resource_name().into_bytes()),
                        style.size.into(),
                    ],
                ),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![Object::String(encoded_text, string_format)]),
                Operation::new("ET", vec![]),
            ],
        )
    }

    /// Strokes a straight line between the two points with the given line width, inside its own
    /// graphics state block so that the width does not leak into later operations.
    pub fn draw_line(
        &mut self,
        page_index: usize,
        from: [f32; 2],
        to: [f32; 2],
        line_width: f32,
    ) -> Result<(), ContextError> {
        let [from_x, from_y] = from;
        let [to_x, to_y] = to;
        self.add_operations_to_page(
            page_index,
            vec![
                Operation::new("q", vec![]),
                Operation::new("w", vec![line_width.into()]),
                Operation::new("m", vec![from_x.into(), from_y.into()]),
                Operation::new("l", vec![to_x.into(), to_y.into()]),
                Operation::new("S", vec![]),
                Operation::new("Q", vec![]),
            ],
        )
    }

    /// Writes the pages, fonts, catalog and information dictionary into the underlying document.
    /// It can only be called once, after which the document can be saved.
    pub fn write_all(&mut self, metadata: &PdfMetadata) -> Result<(), ContextError> {
        use lopdf::Object::*;
        use lopdf::StringFormat::Literal;

        if self.finalized {
            return Err(ContextError::with_context(
                "The PDF document has already been written",
            ));
        }
        if self.pages.is_empty() {
            return Err(ContextError::with_context(
                "Unable to write a PDF document without pages",
            ));
        }

        let timestamp = to_pdf_timestamp_format(&metadata.creation_date);
        let mut document_info = lopdf::Dictionary::from_iter(vec![
            ("Title", text_string(&metadata.title)),
            ("Creator", String("pleadr".into(), Literal)),
            ("Producer", String("pleadr".into(), Literal)),
            ("CreationDate", String(timestamp.clone().into_bytes(), Literal)),
            ("ModDate", String(timestamp.into_bytes(), Literal)),
            ("Trapped", "False".into()),
        ]);
        if let Some(author) = &metadata.author {
            document_info.set("Author", text_string(author));
        }
        let document_info_id = self.inner_document.add_object(Dictionary(document_info));

        // Every page shares the same font resources
        let mut fonts_dictionary = lopdf::Dictionary::new();
        for (index, font) in self.fonts.iter().enumerate() {
            let resource_name = FontId(index).resource_name();
            let font_dictionary =
                font.insert_into_document(&resource_name, &mut self.inner_document);
            let font_id = self.inner_document.add_object(Dictionary(font_dictionary));
            fonts_dictionary.set(resource_name, Reference(font_id));
        }
        let resources_id = self
            .inner_document
            .add_object(Dictionary(lopdf::Dictionary::from_iter(vec![(
                "Font",
                Dictionary(fonts_dictionary),
            )])));

        let pages_id = self.inner_document.new_object_id();
        let mut page_ids = Vec::new();
        for (index, page) in self.pages.iter().enumerate() {
            let content = lopdf::content::Content {
                operations: page.operations.clone(),
            }
            .encode()
            .map_err(|error| {
                ContextError::with_error(
                    format!("Failed to encode the content of page {}", index + 1),
                    &error,
                )
            })?;
            let content_id = self
                .inner_document
                .add_object(lopdf::Stream::new(lopdf::Dictionary::new(), content));

            let media_box = Array(vec![0.into(), 0.into(), page.width.into(), page.height.into()]);
            let page_dictionary = lopdf::Dictionary::from_iter(vec![
                ("Type", "Page".into()),
                ("Parent", Reference(pages_id)),
                ("MediaBox", media_box.clone()),
                ("CropBox", media_box),
                ("Resources", Reference(resources_id)),
                ("Contents", Reference(content_id)),
            ]);
            page_ids.push(self.inner_document.add_object(page_dictionary));
        }

        self.pages_id = Some(pages_id);
        self.page_tree_kids = page_ids;
        self.write_page_tree(pages_id);

        let catalog = lopdf::Dictionary::from_iter(vec![
            ("Type", "Catalog".into()),
            ("PageLayout", "OneColumn".into()),
            ("PageMode", "UseNone".into()),
            ("Pages", Reference(pages_id)),
        ]);
        let catalog_id = self.inner_document.add_object(catalog);

        self.inner_document.trailer.set("Root", Reference(catalog_id));
        self.inner_document
            .trailer
            .set("Info", Reference(document_info_id));
        self.inner_document.trailer.set(
            "ID",
            Array(vec![
                String(self.identifier.clone().into_bytes(), Literal),
                String(metadata.instance_id.clone().into_bytes(), Literal),
            ]),
        );

        self.finalized = true;
        Ok(())
    }

    /// Appends pages of another PDF document after the pages of this one, which must have been
    /// written already. Page numbers are 1-indexed; every page is appended, in order, when none
    /// are given. Returns the number of appended pages.
    pub fn append_pages(
        &mut self,
        mut source_document: lopdf::Document,
        page_numbers: &[u32],
    ) -> Result<usize, ContextError> {
        let pages_id = self.pages_id.ok_or(ContextError::with_context(
            "Pages can only be appended to a PDF document which has been written",
        ))?;

        source_document.renumber_objects_with(self.inner_document.max_id + 1);
        let source_pages = source_document.get_pages();
        let selected_page_ids = if page_numbers.is_empty() {
            source_pages.values().copied().collect::<Vec<_>>()
        } else {
            page_numbers
                .iter()
                .map(|page_number| {
                    source_pages
                        .get(page_number)
                        .copied()
                        .ok_or(ContextError::with_context(format!(
                            "The document has no page {}, it has {} pages",
                            page_number,
                            source_pages.len()
                        )))
                })
                .collect::<Result<Vec<_>, ContextError>>()?
        };

        // The pages leave their page tree, so they take along what they inherited from it
        let mut appended_pages = Vec::new();
        for page_id in &selected_page_ids {
            let mut page_dictionary = source_document
                .get_dictionary(*page_id)
                .map_err(|error| {
                    ContextError::with_error(
                        format!("Failed to read the page object {:?}", page_id),
                        &error,
                    )
                })?
                .clone();
            for key in INHERITABLE_PAGE_ATTRIBUTES {
                if page_dictionary.get(key).is_ok() {
                    continue;
                }
                if let Some(value) = inherited_attribute(&source_document, &page_dictionary, key) {
                    page_dictionary.set(key.to_vec(), value);
                }
            }
            page_dictionary.set("Parent", Object::Reference(pages_id));
            appended_pages.push((*page_id, page_dictionary));
        }

        for (object_id, object) in source_document.objects {
            let object_type = object
                .as_dict()
                .and_then(|dictionary| dictionary.get(b"Type"))
                .and_then(Object::as_name)
                .ok();
            if matches!(object_type, Some(b"Catalog") | Some(b"Pages")) {
                continue;
            }
            self.inner_document.objects.insert(object_id, object);
        }
        for (page_id, page_dictionary) in appended_pages {
            self.inner_document
                .objects
                .insert(page_id, Object::Dictionary(page_dictionary));
            self.page_tree_kids.push(page_id);
        }
        self.write_page_tree(pages_id);

        // Drops the pages that were not selected along with everything only they used
        self.inner_document.prune_objects();
        self.inner_document.max_id = self
            .inner_document
            .objects
            .keys()
            .map(|(id, _)| *id)
            .max()
            .unwrap_or(0);

        Ok(selected_page_ids.len())
    }

    /// (Re)writes the root of the page tree with the current kids.
    fn write_page_tree(&mut self, pages_id: ObjectId) {
        let kids = self
            .page_tree_kids
            .iter()
            .map(|page_id| Object::Reference(*page_id))
            .collect::<Vec<_>>();
        let pages = lopdf::Dictionary::from_iter(vec![
            ("Type", "Pages".into()),
            ("Count", Object::Integer(kids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        self.inner_document
            .objects
            .insert(pages_id, Object::Dictionary(pages));
    }

    /// Saves the written document to bytes, `write_all` must have been called before.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, ContextError> {
        if !self.finalized {
            return Err(ContextError::with_context(
                "The PDF document must be written before being saved",
            ));
        }
        let mut pdf_document_bytes = Vec::new();
        let mut writer = BufWriter::new(&mut pdf_document_bytes);
        self.inner_document.save_to(&mut writer).map_err(|error| {
            ContextError::with_error("Error while saving the PDF document to bytes", &error)
        })?;
        drop(writer);

        Ok(pdf_document_bytes)
    }

    /// Saves the written document to the given path, replacing any existing file.
    pub fn save_to_file(&mut self, pdf_path: &Path) -> Result<(), ContextError> {
        let pdf_document_bytes = self.save_to_bytes()?;
        std::fs::write(pdf_path, pdf_document_bytes).map_err(|error| {
            ContextError::with_error(
                format!("Failed to write the PDF document to {:?}", pdf_path),
                &error,
            )
        })
    }

    fn add_operations_to_page(
        &mut self,
        page_index: usize,
        operations: Vec<Operation>,
    ) -> Result<(), ContextError> {
        if self.finalized {
            return Err(ContextError::with_context(
                "Unable to draw onto a PDF document which has already been written",
            ));
        }
        let pdf_page = self
            .pages
            .get_mut(page_index)
            .ok_or(ContextError::with_context(format!(
                "Failed to find the page with index {}",
                page_index
            )))?;
        pdf_page.operations.extend(operations);

        Ok(())
    }
}

/// Looks up an attribute in the ancestors of a page.
fn inherited_attribute(
    source_document: &lopdf::Document,
    page_dictionary: &lopdf::Dictionary,
    key: &[u8],
) -> Option<Object> {
    let mut node = page_dictionary;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = source_document.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }

    None
}

/// A PDF text string: ASCII text is written as it is, anything else as UTF-16BE behind a byte
/// order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Formats the given time the way the PDF specification expects, e.g. `D:20170505150224+02'00'`.
fn to_pdf_timestamp_format(date: &OffsetDateTime) -> String {
    let offset = date.offset();
    let offset_sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{offset_sign}{:02}'{:02}'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        offset.whole_hours().abs(),
        offset.minutes_past_hour().abs(),
    )
}
