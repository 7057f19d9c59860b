use crate::{
    configuration::PleadingConfiguration, error::ContextError, grid::LineGrid, pdf::PdfDocument,
};

/// What the footer of a page says about the document it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLabel<'a> {
    pub title: Option<&'a str>,
    /// 1-indexed.
    pub page_number: usize,
    pub page_count: usize,
}

impl PageLabel<'_> {
    /// `"{title} | Page {n} of {total}"`, or only the page count for untitled documents.
    pub fn footer_text(&self) -> String {
        match self.title {
            Some(title) => format!(
                "{} | Page {} of {}",
                title, self.page_number, self.page_count
            ),
            None => format!("Page {} of {}", self.page_number, self.page_count),
        }
    }
}

/// Draws the pleading paper onto a page: the line numbers, the rule separating them from the text,
/// the right rail and the footer, each as enabled by the configuration. The footer is centered on
/// the page, not on the text area.
pub fn draw_background(
    pdf_document: &mut PdfDocument,
    page_index: usize,
    configuration: &PleadingConfiguration,
    grid: &LineGrid,
    page_label: &PageLabel,
) -> Result<(), ContextError> {
    draw_line_numbers(pdf_document, page_index, configuration, grid)?;

    let (rule_bottom, rule_top) = configuration.rule_span();
    let rule_positions = configuration
        .left_rule_positions()
        .into_iter()
        .chain(configuration.right_rule_x);
    for rule_x in rule_positions {
        pdf_document.draw_line(
            page_index,
            [rule_x, rule_bottom],
            [rule_x, rule_top],
            configuration.rule_width,
        )?;
    }

    if let Some(footer) = &configuration.footer {
        if footer.divider {
            let divider_y = configuration.margin_bottom + footer.divider_rise;
            pdf_document.draw_line(
                page_index,
                [configuration.margin_left, divider_y],
                [configuration.text_right(), divider_y],
                configuration.rule_width,
            )?;
        }

        let footer_style = configuration
            .text_style(pdf_document, &footer.font, footer.size)
            .map_err(|error| {
                ContextError::with_error("Failed to resolve the footer font", &error)
            })?;
        let footer_text = page_label.footer_text();
        let footer_width = pdf_document.text_width(&footer_text, &footer_style)?;
        pdf_document.write_text(
            page_index,
            &footer_text,
            &footer_style,
            [
                (configuration.page_width - footer_width) / 2.0,
                footer.baseline,
            ],
        )?;
    }

    Ok(())
}

fn draw_line_numbers(
    pdf_document: &mut PdfDocument,
    page_index: usize,
    configuration: &PleadingConfiguration,
    grid: &LineGrid,
) -> Result<(), ContextError> {
    let line_number_style = configuration
        .text_style(
            pdf_document,
            &configuration.line_number_font,
            configuration.line_number_size,
        )
        .map_err(|error| {
            ContextError::with_error("Failed to resolve the line number font", &error)
        })?;

    for (line, baseline) in grid.lines() {
        let label = line.to_string();
        let label_width = pdf_document.text_width(&label, &line_number_style)?;
        pdf_document.write_text(
            page_index,
            &label,
            &line_number_style,
            [configuration.line_number_x - label_width / 2.0, baseline],
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use lopdf::content::Operation;

    use super::{draw_background, PageLabel};
    use crate::{
        configuration::{PleadingConfiguration, RuleStyle},
        metrics::StandardFont,
        pdf::PdfDocument,
    };

    const LABEL: PageLabel<'static> = PageLabel {
        title: Some("DEMURRER"),
        page_number: 2,
        page_count: 3,
    };

    fn render(configuration: &PleadingConfiguration) -> Vec<Operation> {
        let mut pdf_document = PdfDocument::new("background");
        let page_index =
            pdf_document.add_page(configuration.page_width, configuration.page_height);
        let grid = configuration.grid().unwrap();
        draw_background(&mut pdf_document, page_index, configuration, &grid, &LABEL).unwrap();
        pdf_document.operations(page_index).unwrap().to_vec()
    }

    fn count(operations: &[Operation], operator: &str) -> usize {
        operations
            .iter()
            .filter(|operation| operation.operator == operator)
            .count()
    }

    fn text_positions(operations: &[Operation]) -> Vec<(f32, f32)> {
        operations
            .iter()
            .filter(|operation| operation.operator == "Td")
            .map(|operation| {
                (
                    operation.operands[0].as_float().unwrap(),
                    operation.operands[1].as_float().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn default_background_draws_every_part() {
        let configuration = PleadingConfiguration::default();
        let operations = render(&configuration);
        // 28 line numbers and the footer
        assert_eq!(count(&operations, "Tj"), 29);
        // Double rule, right rail and footer divider
        assert_eq!(count(&operations, "S"), 4);
    }

    #[test]
    fn line_numbers_sit_on_the_grid_centered_on_their_column() {
        let configuration = PleadingConfiguration::default();
        let grid = configuration.grid().unwrap();
        let positions = text_positions(&render(&configuration));

        // "1" is 500 units wide in Times-Roman, 6 points at 12 points
        let (x, y) = positions[0];
        assert!((x - (configuration.line_number_x - 3.0)).abs() < 1e-3);
        assert_eq!(y, grid.baseline(1).unwrap());
        // "28" is twice as wide
        let (x, y) = positions[27];
        assert!((x - (configuration.line_number_x - 6.0)).abs() < 1e-3);
        assert_eq!(y, grid.baseline(28).unwrap());
    }

    #[test]
    fn footer_is_centered_on_the_page() {
        let configuration = PleadingConfiguration::default();
        let footer = configuration.footer.clone().unwrap();
        let positions = text_positions(&render(&configuration));

        let footer_width = StandardFont::TimesRoman
            .text_width(LABEL.footer_text().as_bytes(), footer.size);
        let (x, y) = positions[28];
        assert!((x - (306.0 - footer_width / 2.0)).abs() < 1e-3);
        assert_eq!(y, footer.baseline);
    }

    #[test]
    fn single_rule_without_rail_or_footer() {
        let configuration = PleadingConfiguration {
            rule_style: RuleStyle::Single,
            right_rule_x: None,
            footer: None,
            ..Default::default()
        };
        let operations = render(&configuration);
        assert_eq!(count(&operations, "Tj"), 28);
        assert_eq!(count(&operations, "S"), 1);
    }

    #[test]
    fn footer_names_the_page() {
        assert_eq!(LABEL.footer_text(), "DEMURRER | Page 2 of 3");
        let untitled = PageLabel {
            title: None,
            ..LABEL
        };
        assert_eq!(untitled.footer_text(), "Page 2 of 3");
    }

    #[test]
    fn unknown_line_number_font_is_an_error() {
        let configuration = PleadingConfiguration {
            line_number_font: "Unknown".into(),
            ..Default::default()
        };
        let mut pdf_document = PdfDocument::new("background");
        let page_index = pdf_document.add_page(612.0, 792.0);
        let grid = configuration.grid().unwrap();
        let error =
            draw_background(&mut pdf_document, page_index, &configuration, &grid, &LABEL)
                .unwrap_err();
        assert_eq!(error.context, "Failed to resolve the line number font");
    }
}
