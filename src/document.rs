use serde::{Deserialize, Serialize};
use std::path::Path;
use time::OffsetDateTime;

use crate::{
    background::{draw_background, PageLabel},
    configuration::{PleadingConfiguration, INCH},
    error::ContextError,
    exhibit::{append_exhibits, Exhibit},
    grid::LineGrid,
    pdf::{PdfDocument, PdfMetadata, TextStyle},
    writer::{wrap_text, write_aligned, write_runs, Alignment, Extent, StyledRun},
};

/// Distance between the baseline of a field label and its underline.
const FIELD_UNDERLINE_DROP: f32 = 4.0;

/// A court filing: its title and the elements of each page. Nothing in the document refers to
/// absolute coordinates unless an element asks for it explicitly; lines are numbered lines of the
/// pleading grid.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PleadingDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Identifies the document across renditions, defaults to the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub pages: Vec<PleadingPage>,
    /// Existing PDF documents appended after the rendered pages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exhibits: Vec<Exhibit>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PleadingPage {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    /// A single string on a numbered line.
    Text(TextElement),
    /// Differently styled runs written one after the other on a numbered line.
    Runs(RunsElement),
    /// Text wrapped onto consecutive numbered lines.
    Paragraph(ParagraphElement),
    /// A horizontal line, e.g. for signatures.
    Rule(RuleElement),
    /// A label followed by an underlined blank.
    Field(FieldElement),
    CaptionBox(CaptionBoxElement),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub line: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default)]
    pub indent: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunsElement {
    pub line: u32,
    pub runs: Vec<RunElement>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default)]
    pub indent: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunElement {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    /// The line of the first wrapped line.
    pub line: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default)]
    pub indent: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleElement {
    /// A line position, possibly fractional.
    pub line: f32,
    #[serde(default)]
    pub rise: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldElement {
    pub line: u32,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    /// Where the underline starts, relative to `x`.
    #[serde(default = "default_field_value_offset")]
    pub value_offset: f32,
    #[serde(default = "default_field_length")]
    pub length: f32,
}

fn default_field_value_offset() -> f32 {
    0.6 * INCH
}

fn default_field_length() -> f32 {
    1.5 * INCH
}

/// The box around the parties and the case details. Its horizontal lines span from the innermost
/// left rule to the right rail (or to the right text margin when there is no rail).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptionBoxElement {
    pub top_line: f32,
    #[serde(default)]
    pub top_rise: f32,
    pub bottom_line: f32,
    #[serde(default)]
    pub bottom_rise: f32,
    /// The vertical line separating the parties from the case details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator_x: Option<f32>,
}

impl PleadingDocument {
    pub fn from_path(document_path: &Path) -> Result<PleadingDocument, ContextError> {
        let document_content = std::fs::read_to_string(document_path).map_err(|error| {
            ContextError::with_error(
                format!("Failed to read the document {:?}", document_path),
                &error,
            )
        })?;
        let document: PleadingDocument =
            serde_json::from_str(&document_content).map_err(|error| {
                ContextError::with_error(
                    format!("Failed to parse the document {:?}", document_path),
                    &error,
                )
            })?;

        Ok(document)
    }

    /// A document made of empty pleading paper.
    pub fn blank(title: Option<String>, page_count: usize) -> PleadingDocument {
        PleadingDocument {
            title,
            document_id: None,
            author: None,
            pages: vec![PleadingPage::default(); page_count],
            exhibits: Vec::new(),
        }
    }

    /// The first entry of the trailer `ID` of the PDF document.
    pub fn identifier(&self) -> String {
        self.document_id
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "pleading".to_string())
    }

    pub fn metadata(&self, creation_date: OffsetDateTime) -> PdfMetadata {
        PdfMetadata {
            title: self.title.clone().unwrap_or_default(),
            author: self.author.clone(),
            creation_date,
            instance_id: format!("{}-{}", self.identifier(), creation_date.unix_timestamp()),
        }
    }

    /// Draws every page, background first, into a new PDF document that still has to be written.
    pub fn to_pdf_document(
        &self,
        configuration: &PleadingConfiguration,
    ) -> Result<PdfDocument, ContextError> {
        if self.pages.is_empty() {
            return Err(ContextError::with_context("The document has no pages"));
        }
        let grid = configuration.grid()?;
        let mut pdf_document = PdfDocument::new(self.identifier());

        for (page_offset, page) in self.pages.iter().enumerate() {
            log::debug!(
                "Drawing page {} of {} ({} elements)",
                page_offset + 1,
                self.pages.len(),
                page.elements.len()
            );
            let page_index =
                pdf_document.add_page(configuration.page_width, configuration.page_height);
            let page_label = PageLabel {
                title: self.title.as_deref(),
                page_number: page_offset + 1,
                page_count: self.pages.len(),
            };
            draw_background(
                &mut pdf_document,
                page_index,
                configuration,
                &grid,
                &page_label,
            )
            .map_err(|error| {
                ContextError::with_error(
                    format!("Failed to draw the background of page {}", page_offset + 1),
                    &error,
                )
            })?;

            let mut page_renderer = PageRenderer {
                pdf_document: &mut pdf_document,
                page_index,
                configuration,
                grid: &grid,
            };
            for (element_index, element) in page.elements.iter().enumerate() {
                page_renderer.draw_element(element).map_err(|error| {
                    ContextError::with_error(
                        format!(
                            "Failed to draw element {} of page {}",
                            element_index + 1,
                            page_offset + 1
                        ),
                        &error,
                    )
                })?;
            }
        }

        Ok(pdf_document)
    }

    /// Renders and writes the document, then appends its exhibits. The result is ready to save.
    pub fn to_written_pdf_document(
        &self,
        configuration: &PleadingConfiguration,
        creation_date: OffsetDateTime,
    ) -> Result<PdfDocument, ContextError> {
        let mut pdf_document = self.to_pdf_document(configuration)?;
        pdf_document.write_all(&self.metadata(creation_date))?;
        append_exhibits(&mut pdf_document, &self.exhibits)?;

        Ok(pdf_document)
    }

    /// Renders, writes and saves the document in one go.
    pub fn save_to_pdf_file(
        &self,
        configuration: &PleadingConfiguration,
        creation_date: OffsetDateTime,
        pdf_path: &Path,
    ) -> Result<(), ContextError> {
        let mut pdf_document = self.to_written_pdf_document(configuration, creation_date)?;
        pdf_document.save_to_file(pdf_path)?;
        log::info!(
            "Saved {} pages ({} rendered) to {:?}",
            pdf_document.written_page_count(),
            pdf_document.page_count(),
            pdf_path
        );

        Ok(())
    }
}

/// Draws the elements of one page.
struct PageRenderer<'a> {
    pdf_document: &'a mut PdfDocument,
    page_index: usize,
    configuration: &'a PleadingConfiguration,
    grid: &'a LineGrid,
}

impl PageRenderer<'_> {
    fn draw_element(&mut self, element: &Element) -> Result<(), ContextError> {
        match element {
            Element::Text(text_element) => {
                let style = self.style(text_element.font.as_deref(), text_element.size)?;
                let runs = [StyledRun::new(text_element.text.as_str(), style)];
                self.draw_placed_runs(
                    text_element.line,
                    text_element.alignment,
                    text_element.x,
                    text_element.indent,
                    &runs,
                )
            }
            Element::Runs(runs_element) => {
                let runs = runs_element
                    .runs
                    .iter()
                    .map(|run| {
                        let style = self.style(run.font.as_deref(), run.size)?;
                        Ok(StyledRun::new(run.text.as_str(), style))
                    })
                    .collect::<Result<Vec<_>, ContextError>>()?;
                self.draw_placed_runs(
                    runs_element.line,
                    runs_element.alignment,
                    runs_element.x,
                    runs_element.indent,
                    &runs,
                )
            }
            Element::Paragraph(paragraph_element) => self.draw_paragraph(paragraph_element),
            Element::Rule(rule_element) => {
                let y = self.grid.position(rule_element.line)? + rule_element.rise;
                let x = rule_element.x.unwrap_or(self.configuration.margin_left);
                let length = rule_element
                    .length
                    .unwrap_or(self.configuration.text_right() - x);
                self.draw_horizontal_line(x, x + length, y)
            }
            Element::Field(field_element) => self.draw_field(field_element),
            Element::CaptionBox(caption_box) => self.draw_caption_box(caption_box),
        }
    }

    fn style(&mut self, font: Option<&str>, size: Option<f32>) -> Result<TextStyle, ContextError> {
        self.configuration.text_style(
            self.pdf_document,
            font.unwrap_or(&self.configuration.body_font),
            size.unwrap_or(self.configuration.body_size),
        )
    }

    fn draw_placed_runs(
        &mut self,
        line: u32,
        alignment: Alignment,
        x: Option<f32>,
        indent: f32,
        runs: &[StyledRun],
    ) -> Result<(), ContextError> {
        let anchor_x = x.unwrap_or(match alignment {
            Alignment::Left => self.configuration.margin_left,
            Alignment::Center => self.configuration.page_width / 2.0,
            Alignment::Right => self.configuration.text_right(),
        }) + indent;
        let extent = write_aligned(
            self.pdf_document,
            self.page_index,
            self.grid,
            line,
            anchor_x,
            alignment,
            runs,
        )?;
        self.warn_on_overflow(line, extent);

        Ok(())
    }

    fn warn_on_overflow(&self, line: u32, extent: Extent) {
        let text_right = self.configuration.text_right();
        if extent.right > text_right + 0.01 {
            log::warn!(
                "The text on line {} of page {} ends at {:.2}pt, {:.2}pt past the right margin",
                line,
                self.page_index + 1,
                extent.right,
                extent.right - text_right
            );
        }
    }

    fn draw_paragraph(&mut self, paragraph_element: &ParagraphElement) -> Result<(), ContextError> {
        let style = self.style(
            paragraph_element.font.as_deref(),
            paragraph_element.size,
        )?;
        self.grid.line_baseline(paragraph_element.line)?;
        let x = self.configuration.margin_left + paragraph_element.indent;
        let max_width = self.configuration.text_right() - x;
        let lines = wrap_text(self.pdf_document, &paragraph_element.text, &style, max_width)?;

        let last_line = paragraph_element.line as usize + lines.len().saturating_sub(1);
        if last_line > self.grid.line_count() as usize {
            return Err(ContextError::with_context(format!(
                "The paragraph starting on line {} needs {} lines but the page ends on line {}",
                paragraph_element.line,
                lines.len(),
                self.grid.line_count()
            )));
        }

        for (line, text) in (paragraph_element.line..).zip(lines) {
            let cursor = write_runs(
                self.pdf_document,
                self.page_index,
                self.grid,
                line,
                x,
                &[StyledRun::new(text, style)],
            )?;
            self.warn_on_overflow(line, Extent { left: x, right: cursor });
        }

        Ok(())
    }

    fn draw_field(&mut self, field_element: &FieldElement) -> Result<(), ContextError> {
        let style = self.style(field_element.font.as_deref(), field_element.size)?;
        let x = field_element.x.unwrap_or(self.configuration.margin_left);
        let value_x = x + field_element.value_offset;

        let mut runs = vec![StyledRun::new(field_element.label.as_str(), style)];
        let cursor = write_runs(
            self.pdf_document,
            self.page_index,
            self.grid,
            field_element.line,
            x,
            &runs,
        )?;
        if let Some(value) = &field_element.value {
            runs[0] = StyledRun::new(value.as_str(), style);
            write_runs(
                self.pdf_document,
                self.page_index,
                self.grid,
                field_element.line,
                value_x,
                &runs,
            )?;
        }
        if cursor > value_x {
            log::warn!(
                "The label {:?} on line {} of page {} runs into its underline",
                field_element.label,
                field_element.line,
                self.page_index + 1
            );
        }

        let underline_y = self.grid.line_baseline(field_element.line)? - FIELD_UNDERLINE_DROP;
        self.draw_horizontal_line(value_x, value_x + field_element.length, underline_y)
    }

    fn draw_caption_box(&mut self, caption_box: &CaptionBoxElement) -> Result<(), ContextError> {
        let top_y = self.grid.position(caption_box.top_line)? + caption_box.top_rise;
        let bottom_y = self.grid.position(caption_box.bottom_line)? + caption_box.bottom_rise;
        let left_x = self
            .configuration
            .left_rule_positions()
            .into_iter()
            .fold(self.configuration.rule_x, f32::max);
        let right_x = self
            .configuration
            .right_rule_x
            .unwrap_or(self.configuration.text_right());

        self.draw_horizontal_line(left_x, right_x, top_y)?;
        self.draw_horizontal_line(left_x, right_x, bottom_y)?;
        if let Some(separator_x) = caption_box.separator_x {
            self.pdf_document.draw_line(
                self.page_index,
                [separator_x, top_y],
                [separator_x, bottom_y],
                self.configuration.rule_width,
            )?;
        }

        Ok(())
    }

    fn draw_horizontal_line(&mut self, from_x: f32, to_x: f32, y: f32) -> Result<(), ContextError> {
        self.pdf_document.draw_line(
            self.page_index,
            [from_x, y],
            [to_x, y],
            self.configuration.rule_width,
        )
    }
}

#[cfg(test)]
mod tests {
    use lopdf::content::Operation;

    use super::{Element, PleadingDocument};
    use crate::configuration::PleadingConfiguration;

    const DOCUMENT: &str = r#"{
        "title": "DEMURRER TO UNLAWFUL DETAINER",
        "documentId": "26PDUD00325-demurrer",
        "pages": [
            { "elements": [
                { "type": "text", "line": 1, "text": "NUHA SAYEGH" },
                { "type": "text", "line": 8, "text": "SUPERIOR COURT", "font": "Times-Bold", "alignment": "center" },
                { "type": "captionBox", "topLine": 11, "topRise": 10, "bottomLine": 22.5, "separatorX": 324 },
                { "type": "field", "line": 17, "label": "Date:", "x": 334 }
            ] },
            { "elements": [
                { "type": "runs", "line": 4, "runs": [
                    { "text": "underlying lease agreement is void " },
                    { "text": "ab initio", "font": "Times-Italic" }
                ] },
                { "type": "rule", "line": 20, "rise": 12, "x": 108, "length": 180 }
            ] }
        ]
    }"#;

    fn strokes(operations: &[Operation]) -> Vec<[f32; 4]> {
        operations
            .windows(2)
            .filter(|window| window[0].operator == "m" && window[1].operator == "l")
            .map(|window| {
                [
                    window[0].operands[0].as_float().unwrap(),
                    window[0].operands[1].as_float().unwrap(),
                    window[1].operands[0].as_float().unwrap(),
                    window[1].operands[1].as_float().unwrap(),
                ]
            })
            .collect()
    }

    #[test]
    fn elements_are_tagged_by_type() {
        let document: PleadingDocument = serde_json::from_str(DOCUMENT).unwrap();
        assert_eq!(document.pages.len(), 2);
        assert!(matches!(document.pages[0].elements[2], Element::CaptionBox(_)));
        let Element::Field(field) = &document.pages[0].elements[3] else {
            panic!("expected a field");
        };
        assert!((field.value_offset - 43.2).abs() < 1e-4);
        assert_eq!(field.length, 108.0);
    }

    #[test]
    fn pages_get_their_background_and_elements() {
        let document: PleadingDocument = serde_json::from_str(DOCUMENT).unwrap();
        let configuration = PleadingConfiguration::default();
        let pdf_document = document.to_pdf_document(&configuration).unwrap();
        assert_eq!(pdf_document.page_count(), 2);

        let first_page = pdf_document.operations(0).unwrap();
        let text_objects = first_page
            .iter()
            .filter(|operation| operation.operator == "Tj")
            .count();
        // 28 line numbers, the footer, two texts and the field label
        assert_eq!(text_objects, 32);

        let second_page = pdf_document.operations(1).unwrap();
        let text_objects = second_page
            .iter()
            .filter(|operation| operation.operator == "Tj")
            .count();
        assert_eq!(text_objects, 31);
    }

    #[test]
    fn caption_box_spans_from_the_inner_rule_to_the_rail() {
        let document: PleadingDocument = serde_json::from_str(DOCUMENT).unwrap();
        let configuration = PleadingConfiguration::default();
        let grid = configuration.grid().unwrap();
        let pdf_document = document.to_pdf_document(&configuration).unwrap();

        let top_y = grid.baseline(11).unwrap() + 10.0;
        let bottom_y = grid.position(22.5).unwrap();
        let inner_rule_x = configuration.rule_x + 2.0;
        let strokes = strokes(pdf_document.operations(0).unwrap());
        assert!(strokes.contains(&[inner_rule_x, top_y, 576.0, top_y]));
        assert!(strokes.contains(&[inner_rule_x, bottom_y, 576.0, bottom_y]));
        assert!(strokes.contains(&[324.0, top_y, 324.0, bottom_y]));
        // The field underline
        let underline_y = grid.baseline(17).unwrap() - 4.0;
        assert!(strokes
            .iter()
            .any(|stroke| stroke[1] == underline_y && stroke[3] == underline_y));
    }

    #[test]
    fn overflowing_text_is_still_drawn() {
        let document: PleadingDocument = serde_json::from_str(
            r#"{ "pages": [ { "elements": [
                { "type": "text", "line": 3, "text": "This line is far too long to fit between the margins of a pleading page, yet it is kept." }
            ] } ] }"#,
        )
        .unwrap();
        let configuration = PleadingConfiguration {
            footer: None,
            ..Default::default()
        };
        let pdf_document = document.to_pdf_document(&configuration).unwrap();
        let text_objects = pdf_document
            .operations(0)
            .unwrap()
            .iter()
            .filter(|operation| operation.operator == "Tj")
            .count();
        assert_eq!(text_objects, 29);
    }

    #[test]
    fn paragraphs_fill_consecutive_lines() {
        let document: PleadingDocument = serde_json::from_str(
            r#"{ "pages": [ { "elements": [
                { "type": "paragraph", "line": 5, "font": "Courier", "size": 10, "indent": 408,
                  "text": "aaaa bbbb cccc dddd" }
            ] } ] }"#,
        )
        .unwrap();
        // 60 points remain between the indent and the right margin, room for ten characters
        let configuration = PleadingConfiguration {
            footer: None,
            ..Default::default()
        };
        let grid = configuration.grid().unwrap();
        let pdf_document = document.to_pdf_document(&configuration).unwrap();

        let paragraph_lines: Vec<f32> = pdf_document
            .operations(0)
            .unwrap()
            .iter()
            .filter(|operation| operation.operator == "Td")
            .map(|operation| operation.operands[1].as_float().unwrap())
            .skip(28)
            .collect();
        assert_eq!(
            paragraph_lines,
            vec![grid.baseline(5).unwrap(), grid.baseline(6).unwrap()]
        );
    }

    #[test]
    fn paragraphs_may_not_run_off_the_grid() {
        let document: PleadingDocument = serde_json::from_str(
            r#"{ "pages": [ { "elements": [
                { "type": "paragraph", "line": 28, "font": "Courier", "indent": 400,
                  "text": "one two three four five six" }
            ] } ] }"#,
        )
        .unwrap();
        let error = document
            .to_pdf_document(&PleadingConfiguration::default())
            .unwrap_err();
        assert_eq!(error.context, "Failed to draw element 1 of page 1");
        assert!(error
            .source_error
            .unwrap()
            .starts_with("The paragraph starting on line 28 needs"));
    }

    #[test]
    fn blank_paragraphs_still_need_a_numbered_line() {
        for line in [0, 99] {
            let document: PleadingDocument = serde_json::from_str(&format!(
                r#"{{ "pages": [ {{ "elements": [
                    {{ "type": "paragraph", "line": {}, "text": "   " }}
                ] }} ] }}"#,
                line
            ))
            .unwrap();
            let error = document
                .to_pdf_document(&PleadingConfiguration::default())
                .unwrap_err();
            assert_eq!(error.context, "Failed to draw element 1 of page 1");
        }

        let document: PleadingDocument = serde_json::from_str(
            r#"{ "pages": [ { "elements": [
                { "type": "paragraph", "line": 28, "text": "   " }
            ] } ] }"#,
        )
        .unwrap();
        assert!(document
            .to_pdf_document(&PleadingConfiguration::default())
            .is_ok());
    }

    #[test]
    fn unknown_fonts_name_the_element() {
        let document: PleadingDocument = serde_json::from_str(
            r#"{ "pages": [ {}, { "elements": [
                { "type": "text", "line": 1, "text": "x", "font": "Garamond" }
            ] } ] }"#,
        )
        .unwrap();
        let error = document
            .to_pdf_document(&PleadingConfiguration::default())
            .unwrap_err();
        assert_eq!(error.context, "Failed to draw element 1 of page 2");
    }

    #[test]
    fn documents_without_pages_are_rejected() {
        let document = PleadingDocument::blank(None, 0);
        assert!(document
            .to_pdf_document(&PleadingConfiguration::default())
            .is_err());
    }

    #[test]
    fn identifier_falls_back_to_the_title() {
        let mut document = PleadingDocument::blank(Some("NOTICE".into()), 1);
        assert_eq!(document.identifier(), "NOTICE");
        document.document_id = Some("case-1".into());
        assert_eq!(document.identifier(), "case-1");
        assert_eq!(
            document.metadata(time::OffsetDateTime::UNIX_EPOCH).instance_id,
            "case-1-0"
        );
    }
}
