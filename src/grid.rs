use serde::{Deserialize, Serialize};

use crate::error::ContextError;

/// Where the baseline of line 1 sits below the top margin.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum FirstLineOffset {
    /// A fixed distance in points.
    Points(f32),
    /// One full leading, so that line 1 occupies the first slot below the margin.
    FullLeading,
}

impl Default for FirstLineOffset {
    fn default() -> Self {
        FirstLineOffset::Points(18.0)
    }
}

/// The numbered lines of a pleading page: baseline `n` lies `(n - 1)` leadings below baseline 1.
/// All values are in points measured from the bottom of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGrid {
    first_baseline: f32,
    leading: f32,
    line_count: u32,
}

impl LineGrid {
    pub fn new(first_baseline: f32, leading: f32, line_count: u32) -> Result<Self, ContextError> {
        if !first_baseline.is_finite() {
            return Err(ContextError::with_context(format!(
                "The baseline of line 1 must be finite, found {}",
                first_baseline
            )));
        }
        if !(leading.is_finite() && leading > 0.0) {
            return Err(ContextError::with_context(format!(
                "The leading must be a positive number of points, found {}",
                leading
            )));
        }
        if line_count == 0 {
            return Err(ContextError::with_context(
                "A pleading grid needs at least one line",
            ));
        }

        Ok(LineGrid {
            first_baseline,
            leading,
            line_count,
        })
    }

    /// Builds the grid of a page from its height and top margin.
    pub fn from_page(
        page_height: f32,
        top_margin: f32,
        first_line_offset: FirstLineOffset,
        leading: f32,
        line_count: u32,
    ) -> Result<Self, ContextError> {
        let offset = match first_line_offset {
            FirstLineOffset::Points(points) => points,
            FirstLineOffset::FullLeading => leading,
        };
        LineGrid::new(page_height - top_margin - offset, leading, line_count)
    }

    pub fn first_baseline(&self) -> f32 {
        self.first_baseline
    }

    pub fn leading(&self) -> f32 {
        self.leading
    }

    pub fn line_count(&self) -> u32 {
        self.line_count
    }

    /// The baseline of any line from 1 upwards, including lines past the bottom of the grid.
    pub fn baseline(&self, line: u32) -> Result<f32, ContextError> {
        if line == 0 {
            return Err(ContextError::with_context(
                "Line numbers start at 1, line 0 does not exist",
            ));
        }
        Ok(self.first_baseline - (line - 1) as f32 * self.leading)
    }

    /// The baseline of a line on which text may be placed, that is from 1 to the line count.
    pub fn line_baseline(&self, line: u32) -> Result<f32, ContextError> {
        if line > self.line_count {
            return Err(ContextError::with_context(format!(
                "Line {} is past the last numbered line ({})",
                line, self.line_count
            )));
        }
        self.baseline(line)
    }

    /// The height of a fractional line position, e.g. 22.5 for halfway between lines 22 and 23.
    pub fn position(&self, line_position: f32) -> Result<f32, ContextError> {
        if !(line_position.is_finite() && line_position >= 1.0) {
            return Err(ContextError::with_context(format!(
                "Line positions start at 1, found {}",
                line_position
            )));
        }
        Ok(self.first_baseline - (line_position - 1.0) * self.leading)
    }

    /// The baseline of the last numbered line.
    pub fn last_baseline(&self) -> f32 {
        self.first_baseline - (self.line_count - 1) as f32 * self.leading
    }

    /// Every numbered line together with its baseline, from top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        (1..=self.line_count).map(move |line| {
            (
                line,
                self.first_baseline - (line - 1) as f32 * self.leading,
            )
        })
    }
}
