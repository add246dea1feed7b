use papergraph_core::grobid::{parse_tei, MAX_REFERENCES};
use papergraph_core::{AuthorName, GrobidError};

const HEADER: &str = include_str!("fixtures/header.tei.xml");

#[test]
fn test_header_fields_are_extracted() {
    let paper = parse_tei(HEADER).expect("fixture should parse");

    assert_eq!(
        paper.title.as_deref(),
        Some("Neural Extraction of Scholarly Metadata")
    );
    assert_eq!(paper.doi.as_deref(), Some("10.1234/example.2020.42"));
    assert_eq!(paper.year, Some(2020));
    assert_eq!(
        paper.abstract_text.as_deref(),
        Some(
            "We present a model that recovers titles, authors and references \
             from scientific PDFs & evaluate it on two corpora."
        )
    );
    assert!(paper.missing_fields().is_empty());
}

#[test]
fn test_authors_come_from_the_header_only() {
    let paper = parse_tei(HEADER).unwrap();
    assert_eq!(
        paper.authors,
        vec![
            AuthorName::new("Jane Q", "Doe"),
            AuthorName::new("Ravi", "Kumar"),
            AuthorName {
                forename: None,
                surname: Some("Nakamura".into())
            },
        ]
    );
    assert_eq!(
        paper.author_names(),
        vec!["Jane Q Doe", "Ravi Kumar", "Nakamura"]
    );
}

#[test]
fn test_references_are_capped() {
    let paper = parse_tei(HEADER).unwrap();
    assert_eq!(paper.reference_count, 7);
    assert_eq!(paper.references.len(), MAX_REFERENCES);
    assert_eq!(
        paper.references,
        vec![
            "Conditional Random Fields",
            "Speech and Language Processing",
            "Attention Is All You Need",
            "Deep Residual Learning",
            "GROBID: Combining Automatic Bibliographic Data Recognition",
        ]
    );
}

#[test]
fn test_year_falls_back_to_date_text() {
    let xml = r#"<TEI><teiHeader><fileDesc>
        <publicationStmt><date type="published">Spring 2017</date></publicationStmt>
    </fileDesc></teiHeader></TEI>"#;
    assert_eq!(parse_tei(xml).unwrap().year, Some(2017));
}

#[test]
fn test_unpublished_date_is_used_when_nothing_better_exists() {
    let xml = r#"<TEI><teiHeader><fileDesc><sourceDesc><biblStruct><monogr>
        <imprint><date when="2011-01-01"/></imprint>
    </monogr></biblStruct></sourceDesc></fileDesc></teiHeader></TEI>"#;
    assert_eq!(parse_tei(xml).unwrap().year, Some(2011));
}

#[test]
fn test_header_analytic_title_is_a_fallback() {
    let xml = r#"<TEI><teiHeader><fileDesc>
        <titleStmt><title level="a" type="main"/></titleStmt>
        <sourceDesc><biblStruct><analytic>
            <title level="a" type="main">From The Source</title>
        </analytic></biblStruct></sourceDesc>
    </fileDesc></teiHeader></TEI>"#;
    assert_eq!(parse_tei(xml).unwrap().title.as_deref(), Some("From The Source"));
}

#[test]
fn test_non_tei_document_yields_empty_record() {
    let paper = parse_tei("<html><body><p>Service error</p></body></html>").unwrap();
    assert_eq!(paper.title, None);
    assert!(paper.authors.is_empty());
    assert!(paper.references.is_empty());
    assert_eq!(paper.missing_fields().len(), 6);
}

#[test]
fn test_malformed_xml_is_an_error() {
    let truncated = &HEADER[..HEADER.len() / 2];
    assert!(matches!(
        parse_tei(truncated),
        Err(GrobidError::MalformedTei(_))
    ));
}
