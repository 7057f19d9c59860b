use pleadr::{
    font::Font,
    grid::LineGrid,
    metrics::StandardFont,
    pdf::{PdfDocument, PdfMetadata, TextStyle},
    writer::{write_runs, StyledRun},
};
use rand::{distributions::Alphanumeric, seq::SliceRandom as _, Rng};
use time::OffsetDateTime;
use unicode_normalization::UnicodeNormalization as _;

const ITERATIONS: usize = 200;

fn random_ascii_string(rng: &mut rand::rngs::ThreadRng, maximum_length: usize) -> String {
    let length = rng.gen_range(0..=maximum_length);
    rng.sample_iter(&Alphanumeric)
        .map(char::from)
        .take(length)
        .collect()
}

fn random_utf8_characters(rng: &mut rand::rngs::ThreadRng, maximum_length: usize) -> String {
    let length = rng.gen_range(1..=maximum_length);
    rand_utf8::rand_utf8(rng, length).to_string()
}

#[test]
fn baselines_are_evenly_spaced_for_any_grid() {
    let mut rng = rand::thread_rng();
    for _ in 0..ITERATIONS {
        let first_baseline = rng.gen_range(100.0..1000.0_f32);
        let leading = rng.gen_range(6.0..36.0_f32);
        let line_count = rng.gen_range(1..=40);
        let grid = LineGrid::new(first_baseline, leading, line_count).unwrap();

        for line in 1..line_count {
            let spacing = grid.baseline(line).unwrap() - grid.baseline(line + 1).unwrap();
            assert!(
                (spacing - leading).abs() <= leading * 1e-3,
                "line {} of a grid starting at {} with leading {}",
                line,
                first_baseline,
                leading
            );
        }
        assert_eq!(grid.baseline(1).unwrap(), first_baseline);
    }
}

#[test]
fn consecutive_runs_never_overlap() {
    let mut rng = rand::thread_rng();
    let grid = LineGrid::new(693.0, 24.0, 28).unwrap();
    for _ in 0..ITERATIONS {
        let mut pdf_document = PdfDocument::new("runs");
        let page_index = pdf_document.add_page(612.0, 792.0);
        let runs: Vec<StyledRun> = (0..rng.gen_range(0..6))
            .map(|_| {
                let standard_font = *StandardFont::ALL.choose(&mut rng).unwrap();
                let style = TextStyle::new(
                    pdf_document.standard_font(standard_font),
                    rng.gen_range(8.0..16.0),
                );
                StyledRun::new(random_ascii_string(&mut rng, 12), style)
            })
            .collect();
        let line = rng.gen_range(1..=28);

        let cursor = write_runs(&mut pdf_document, page_index, &grid, line, 108.0, &runs).unwrap();

        let positions: Vec<f32> = pdf_document
            .operations(page_index)
            .unwrap()
            .iter()
            .filter(|operation| operation.operator == "Td")
            .map(|operation| operation.operands[0].as_float().unwrap())
            .collect();
        let drawn_runs: Vec<&StyledRun> = runs.iter().filter(|run| !run.text.is_empty()).collect();
        assert_eq!(positions.len(), drawn_runs.len());

        let mut expected_x = 108.0;
        for (x, run) in positions.iter().zip(drawn_runs) {
            assert!((x - expected_x).abs() < 1e-3);
            expected_x += pdf_document.text_width(&run.text, &run.style).unwrap();
        }
        assert!((cursor - expected_x).abs() < 1e-3);
    }
}

#[test]
fn any_text_can_be_written_with_a_standard_font() {
    let mut rng = rand::thread_rng();
    let font = Font::Standard(StandardFont::TimesRoman);
    let mut pdf_document = PdfDocument::new("encoding");
    let page_index = pdf_document.add_page(612.0, 792.0);
    let style = TextStyle::new(pdf_document.add_font(font.clone()), 12.0);

    for _ in 0..ITERATIONS {
        let text = random_utf8_characters(&mut rng, 40);
        // One byte per character, unknown characters being replaced
        assert_eq!(font.encode(&text).len(), text.nfc().count());
        let width = font.text_width(&text, 12.0);
        assert!(width.is_finite() && width >= 0.0);
        pdf_document
            .write_text(page_index, &text, &style, [108.0, 400.0])
            .unwrap();
    }

    pdf_document
        .write_all(&PdfMetadata {
            title: "encoding".into(),
            author: None,
            creation_date: OffsetDateTime::UNIX_EPOCH,
            instance_id: "encoding".into(),
        })
        .unwrap();
    let pdf_bytes = pdf_document.save_to_bytes().unwrap();
    assert_eq!(
        lopdf::Document::load_mem(&pdf_bytes)
            .unwrap()
            .get_pages()
            .len(),
        1
    );
}
