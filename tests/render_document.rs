use lopdf::{content::Content, Object};
use pleadr::{
    configuration::{PleadingConfiguration, RuleStyle},
    document::PleadingDocument,
};
use time::OffsetDateTime;

const DEMURRER: &str = include_str!("../demos/demurrer.json");

fn render_to_bytes(document: &PleadingDocument, configuration: &PleadingConfiguration) -> Vec<u8> {
    let mut pdf_document = document.to_pdf_document(configuration).unwrap();
    pdf_document
        .write_all(&document.metadata(OffsetDateTime::UNIX_EPOCH))
        .unwrap();
    pdf_document.save_to_bytes().unwrap()
}

fn format_operand(operand: &Object) -> String {
    match operand {
        Object::Name(name) => format!("/{}", String::from_utf8_lossy(name)),
        Object::String(bytes, _) => format!("({})", String::from_utf8_lossy(bytes)),
        number => format!("{:.2}", number.as_float().unwrap()),
    }
}

/// One line per operation, with numbers rounded to hundredths of a point.
fn describe_page_content(pdf_bytes: &[u8], page_number: u32) -> String {
    let reloaded = lopdf::Document::load_mem(pdf_bytes).unwrap();
    let page_id = reloaded.get_pages()[&page_number];
    let content = Content::decode(&reloaded.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .iter()
        .map(|operation| {
            std::iter::once(operation.operator.clone())
                .chain(operation.operands.iter().map(format_operand))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn demurrer_renders_on_three_letter_pages() {
    let document: PleadingDocument = serde_json::from_str(DEMURRER).unwrap();
    let pdf_bytes = render_to_bytes(&document, &PleadingConfiguration::default());

    let reloaded = lopdf::Document::load_mem(&pdf_bytes).unwrap();
    let pages = reloaded.get_pages();
    assert_eq!(pages.len(), 3);
    for page_id in pages.values() {
        let media_box: Vec<f32> = reloaded
            .get_dictionary(*page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|value| value.as_float().unwrap())
            .collect();
        assert_eq!(media_box, vec![0.0, 0.0, 612.0, 792.0]);
    }

    let mut base_fonts: Vec<Vec<u8>> = reloaded
        .objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dictionary| {
            dictionary
                .get(b"Type")
                .and_then(|value| value.as_name())
                .map(|name| name == b"Font")
                .unwrap_or(false)
        })
        .map(|dictionary| dictionary.get(b"BaseFont").unwrap().as_name().unwrap().to_vec())
        .collect();
    base_fonts.sort();
    assert_eq!(
        base_fonts,
        vec![
            b"Times-Bold".to_vec(),
            b"Times-Italic".to_vec(),
            b"Times-Roman".to_vec()
        ]
    );
}

#[test]
fn document_information_is_written() {
    let document: PleadingDocument = serde_json::from_str(DEMURRER).unwrap();
    let pdf_bytes = render_to_bytes(&document, &PleadingConfiguration::default());

    let reloaded = lopdf::Document::load_mem(&pdf_bytes).unwrap();
    let info_id = reloaded
        .trailer
        .get(b"Info")
        .unwrap()
        .as_reference()
        .unwrap();
    let info = reloaded.get_dictionary(info_id).unwrap();
    assert_eq!(
        info.get(b"Title").unwrap().as_str().unwrap(),
        b"DEMURRER TO UNLAWFUL DETAINER"
    );
    assert_eq!(info.get(b"Author").unwrap().as_str().unwrap(), b"NUHA SAYEGH");
    assert_eq!(
        info.get(b"CreationDate").unwrap().as_str().unwrap(),
        b"D:19700101000000+00'00'"
    );
}

#[test]
fn reproducible_renditions_are_identical() {
    let document: PleadingDocument = serde_json::from_str(DEMURRER).unwrap();
    let configuration = PleadingConfiguration::default();
    assert_eq!(
        render_to_bytes(&document, &configuration),
        render_to_bytes(&document, &configuration)
    );
}

#[test]
fn page_content_lists_background_then_elements() {
    let document: PleadingDocument = serde_json::from_str(
        r#"{ "pages": [ { "elements": [
            { "type": "text", "line": 2, "text": "Case No." }
        ] } ] }"#,
    )
    .unwrap();
    let configuration = PleadingConfiguration {
        line_count: 2,
        rule_style: RuleStyle::Single,
        right_rule_x: None,
        footer: None,
        ..Default::default()
    };
    let pdf_bytes = render_to_bytes(&document, &configuration);

    let expected_content = "\
BT
Tf /F0 12.00
Td 54.60 709.20
Tj (1)
ET
BT
Tf /F0 12.00
Td 54.60 685.20
Tj (2)
ET
q
w 0.50
m 93.60 0.00
l 93.60 792.00
S
Q
BT
Tf /F0 12.00
Td 108.00 685.20
Tj (Case No.)
ET";
    similar_asserts::assert_eq!(describe_page_content(&pdf_bytes, 1), expected_content);
}

#[test]
fn blank_paper_has_only_the_background() {
    let document = PleadingDocument::blank(Some("NOTICE OF RELATED CASE".into()), 2);
    let pdf_bytes = render_to_bytes(&document, &PleadingConfiguration::default());

    let second_page = describe_page_content(&pdf_bytes, 2);
    let text_objects = second_page
        .lines()
        .filter(|line| line.starts_with("Tj "))
        .collect::<Vec<_>>();
    assert_eq!(text_objects.len(), 29);
    assert_eq!(
        text_objects.last(),
        Some(&"Tj (NOTICE OF RELATED CASE | Page 2 of 2)")
    );
}

#[test]
fn exhibits_are_appended_after_the_filing() {
    let exhibit_path = std::env::temp_dir().join(format!(
        "pleadr-{}-exhibit-a.pdf",
        std::process::id()
    ));
    let exhibit = PleadingDocument::blank(Some("EXHIBIT A".into()), 2);
    exhibit
        .save_to_pdf_file(
            &PleadingConfiguration::default(),
            OffsetDateTime::UNIX_EPOCH,
            &exhibit_path,
        )
        .unwrap();

    let mut document: PleadingDocument = serde_json::from_str(DEMURRER).unwrap();
    document.exhibits = serde_json::from_str(&format!(
        r#"[ {{ "path": {:?} }}, {{ "path": "missing/exhibit-b.pdf" }}, {{ "path": {:?}, "pages": [2] }} ]"#,
        exhibit_path, exhibit_path
    ))
    .unwrap();
    let pdf_bytes = document
        .to_written_pdf_document(&PleadingConfiguration::default(), OffsetDateTime::UNIX_EPOCH)
        .unwrap()
        .save_to_bytes()
        .unwrap();
    std::fs::remove_file(&exhibit_path).unwrap();

    let reloaded = lopdf::Document::load_mem(&pdf_bytes).unwrap();
    assert_eq!(reloaded.get_pages().len(), 3 + 2 + 1);
    let footers: Vec<String> = (4..=6)
        .map(|page_number| {
            describe_page_content(&pdf_bytes, page_number)
                .lines()
                .filter(|line| line.starts_with("Tj "))
                .last()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(
        footers,
        [
            "Tj (EXHIBIT A | Page 1 of 2)",
            "Tj (EXHIBIT A | Page 2 of 2)",
            "Tj (EXHIBIT A | Page 2 of 2)"
        ]
    );
}
