use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::ContextError,
    grid::{FirstLineOffset, LineGrid},
    pdf::{PdfDocument, TextStyle},
};

/// Points per inch.
pub const INCH: f32 = 72.0;

/// Whether the rule between the line numbers and the text is drawn once or twice.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RuleStyle {
    Single,
    Double,
}

/// How far the vertical rules extend.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RuleExtent {
    /// From the bottom to the top edge of the page.
    FullPage,
    /// From the bottom margin to the top margin.
    Margins,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterConfiguration {
    /// Whether a horizontal divider is drawn across the text width above the footer.
    pub divider: bool,
    /// Height of the divider above the bottom margin.
    pub divider_rise: f32,
    /// Baseline of the footer text.
    pub baseline: f32,
    pub font: String,
    pub size: f32,
}

impl Default for FooterConfiguration {
    fn default() -> Self {
        FooterConfiguration {
            divider: true,
            divider_rise: 15.0,
            baseline: 0.5 * INCH,
            font: "Times-Roman".into(),
            size: 10.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FontAssociation {
    pub font_family: String,
    pub font_file_path: PathBuf,
}

/// The geometry of a pleading page and the fonts used by default. Every field can be omitted from
/// a configuration file, in which case the value of `PleadingConfiguration::default` is used: a
/// US Letter page with 28 lines spaced 24 points apart, the first baseline 18 points below a
/// 0.9 inch top margin, text starting at 1.5 inches and a double rule at 1.3 inches.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PleadingConfiguration {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub leading: f32,
    pub line_count: u32,
    pub first_line_offset: FirstLineOffset,
    /// The horizontal center of the line numbers.
    pub line_number_x: f32,
    pub line_number_font: String,
    pub line_number_size: f32,
    pub rule_x: f32,
    pub rule_style: RuleStyle,
    /// Distance between the two rules of a double rule.
    pub double_rule_gap: f32,
    pub right_rule_x: Option<f32>,
    pub rule_extent: RuleExtent,
    pub rule_width: f32,
    pub body_font: String,
    pub body_size: f32,
    pub footer: Option<FooterConfiguration>,
    pub font_associations: Vec<FontAssociation>,
}

impl Default for PleadingConfiguration {
    fn default() -> Self {
        let page_width = 8.5 * INCH;
        PleadingConfiguration {
            page_width,
            page_height: 11.0 * INCH,
            margin_top: 0.9 * INCH,
            margin_bottom: 0.5 * INCH,
            margin_left: 1.5 * INCH,
            margin_right: 0.5 * INCH,
            leading: 24.0,
            line_count: 28,
            first_line_offset: FirstLineOffset::default(),
            line_number_x: 0.8 * INCH,
            line_number_font: "Times-Roman".into(),
            line_number_size: 12.0,
            rule_x: 1.3 * INCH,
            rule_style: RuleStyle::Double,
            double_rule_gap: 4.0,
            right_rule_x: Some(page_width - 0.5 * INCH),
            rule_extent: RuleExtent::FullPage,
            rule_width: 0.5,
            body_font: "Times-Roman".into(),
            body_size: 12.0,
            footer: Some(FooterConfiguration::default()),
            font_associations: Vec::new(),
        }
    }
}

impl PleadingConfiguration {
    /// Reads and validates a configuration file.
    pub fn from_path(configuration_file_path: &Path) -> Result<Self, ContextError> {
        let configuration_file_contents = std::fs::read_to_string(configuration_file_path)
            .map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to read the configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;
        let configuration: PleadingConfiguration =
            serde_json::from_str(&configuration_file_contents).map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to parse the configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;
        configuration.validate().map_err(|error| {
            ContextError::with_error(
                format!("Invalid configuration file {:?}", configuration_file_path),
                &error,
            )
        })?;

        Ok(configuration)
    }

    /// Checks that every length is a finite number, that the page has room for text and that every
    /// numbered line lands on the page.
    pub fn validate(&self) -> Result<(), ContextError> {
        let footer_lengths = self.footer.iter().flat_map(|footer| {
            [
                ("footer.dividerRise", footer.divider_rise),
                ("footer.baseline", footer.baseline),
                ("footer.size", footer.size),
            ]
        });
        let lengths = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
            ("leading", self.leading),
            ("lineNumberX", self.line_number_x),
            ("lineNumberSize", self.line_number_size),
            ("ruleX", self.rule_x),
            ("doubleRuleGap", self.double_rule_gap),
            ("ruleWidth", self.rule_width),
            ("bodySize", self.body_size),
        ]
        .into_iter()
        .chain(self.right_rule_x.map(|right_rule_x| ("rightRuleX", right_rule_x)))
        .chain(footer_lengths);
        for (name, length) in lengths {
            if !length.is_finite() {
                return Err(ContextError::with_context(format!(
                    "The {} of the configuration must be a finite number, found {}",
                    name, length
                )));
            }
        }

        if !(self.page_width > 0.0 && self.page_height > 0.0) {
            return Err(ContextError::with_context(format!(
                "The page must have a positive size, found {} x {}",
                self.page_width, self.page_height
            )));
        }
        if !(self.text_width() > 0.0) {
            return Err(ContextError::with_context(format!(
                "The left ({}) and right ({}) margins leave no room for text",
                self.margin_left, self.margin_right
            )));
        }
        let grid = self.grid()?;
        if grid.last_baseline() < 0.0 {
            return Err(ContextError::with_context(format!(
                "Line {} would be drawn below the page at {}",
                grid.line_count(),
                grid.last_baseline()
            )));
        }

        Ok(())
    }

    pub fn grid(&self) -> Result<LineGrid, ContextError> {
        LineGrid::from_page(
            self.page_height,
            self.margin_top,
            self.first_line_offset,
            self.leading,
            self.line_count,
        )
    }

    /// The x coordinate where the text area ends.
    pub fn text_right(&self) -> f32 {
        self.page_width - self.margin_right
    }

    pub fn text_width(&self) -> f32 {
        self.text_right() - self.margin_left
    }

    /// The bottom and top of the vertical rules.
    pub fn rule_span(&self) -> (f32, f32) {
        match self.rule_extent {
            RuleExtent::FullPage => (0.0, self.page_height),
            RuleExtent::Margins => (self.margin_bottom, self.page_height - self.margin_top),
        }
    }

    /// The x coordinates of the rule (or rules) separating line numbers from text.
    pub fn left_rule_positions(&self) -> Vec<f32> {
        match self.rule_style {
            RuleStyle::Single => vec![self.rule_x],
            RuleStyle::Double => {
                let half_gap = self.double_rule_gap / 2.0;
                vec![self.rule_x - half_gap, self.rule_x + half_gap]
            }
        }
    }

    /// Resolves the font name against the standard fonts and the font associations of this
    /// configuration, registering the font into the document if needed.
    pub fn text_style(
        &self,
        pdf_document: &mut PdfDocument,
        font_name: &str,
        font_size: f32,
    ) -> Result<TextStyle, ContextError> {
        let font_id = pdf_document.named_font(font_name, self.get_font_path(font_name))?;
        Ok(TextStyle::new(font_id, font_size))
    }

    pub fn body_style(&self, pdf_document: &mut PdfDocument) -> Result<TextStyle, ContextError> {
        self.text_style(pdf_document, &self.body_font, self.body_size)
    }

    pub fn get_font_path(&self, font_family: &str) -> Option<&Path> {
        self.font_associations
            .iter()
            .find(|font_association| font_association.font_family == font_family)
            .map(|font_association| font_association.font_file_path.as_path())
    }
}
