use serde::{Deserialize, Serialize};

use crate::{
    error::ContextError,
    grid::LineGrid,
    pdf::{PdfDocument, TextStyle},
};

/// A span of text written in a single style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: TextStyle,
}

impl StyledRun {
    pub fn new<S: Into<String>>(text: S, style: TextStyle) -> Self {
        StyledRun {
            text: text.into(),
            style,
        }
    }
}

/// How a sequence of runs is placed relative to its anchor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    /// The runs start at the anchor.
    #[default]
    Left,
    /// The runs are centered on the anchor.
    Center,
    /// The runs end at the anchor.
    Right,
}

/// The horizontal span covered by written text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub left: f32,
    pub right: f32,
}

/// The total advance width of the runs, each measured in its own style.
pub fn measure_runs(pdf_document: &PdfDocument, runs: &[StyledRun]) -> Result<f32, ContextError> {
    runs.iter().try_fold(0.0, |width, run| -> Result<f32, ContextError> {
        Ok(width + pdf_document.text_width(&run.text, &run.style)?)
    })
}

/// Writes the runs one after the other on the baseline of `line`, starting at `x`, and returns the
/// position of the cursor after the last run.
pub fn write_runs(
    pdf_document: &mut PdfDocument,
    page_index: usize,
    grid: &LineGrid,
    line: u32,
    x: f32,
    runs: &[StyledRun],
) -> Result<f32, ContextError> {
    let baseline = grid.line_baseline(line)?;
    let mut cursor = x;
    for run in runs {
        if run.text.is_empty() {
            continue;
        }
        pdf_document.write_text(page_index, &run.text, &run.style, [cursor, baseline])?;
        cursor += pdf_document.text_width(&run.text, &run.style)?;
    }

    Ok(cursor)
}

pub fn write_aligned(
    pdf_document: &mut PdfDocument,
    page_index: usize,
    grid: &LineGrid,
    line: u32,
    anchor_x: f32,
    alignment: Alignment,
    runs: &[StyledRun],
) -> Result<Extent, ContextError> {
    let width = measure_runs(pdf_document, runs)?;
    let left = match alignment {
        Alignment::Left => anchor_x,
        Alignment::Center => anchor_x - width / 2.0,
        Alignment::Right => anchor_x - width,
    };
    let right = write_runs(pdf_document, page_index, grid, line, left, runs)?;

    Ok(Extent { left, right })
}

/// Breaks the text into lines no wider than `max_width`, splitting only at whitespace. A word wider
/// than `max_width` gets a line of its own. Line breaks in the text are kept, and empty lines
/// between them are preserved.
pub fn wrap_text(
    pdf_document: &PdfDocument,
    text: &str,
    style: &TextStyle,
    max_width: f32,
) -> Result<Vec<String>, ContextError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            if current_line.is_empty() {
                current_line.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current_line, word);
            if pdf_document.text_width(&candidate, style)? <= max_width {
                current_line = candidate;
            } else {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
            }
        }
        lines.push(current_line);
    }

    Ok(lines)
}
