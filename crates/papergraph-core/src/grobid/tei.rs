//! Streaming extraction of header fields from GROBID's TEI output
//!
//! The document is read once with a pull parser while an element stack tracks
//! where each piece of text sits. Fields that are not present stay absent;
//! only XML that cannot be tokenised is an error.

use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use crate::error::GrobidError;
use crate::grobid::MAX_REFERENCES;
use crate::types::{AuthorName, PaperMetadata};

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(1[5-9]\d{2}|20\d{2})\b").expect("year regex"));

fn normalize(text: &str) -> Option<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!joined.is_empty()).then_some(joined)
}

fn year_from(text: &str) -> Option<i32> {
    YEAR.find(text).and_then(|m| m.as_str().parse().ok())
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[derive(Default)]
struct ReferenceTitles {
    analytic: String,
    monograph: String,
}

#[derive(Default)]
struct PersonName {
    forenames: Vec<String>,
    surname: String,
}

#[derive(Default)]
struct TeiCollector {
    stack: Vec<String>,

    title: String,
    title_done: bool,
    header_title: String,
    // (level, type) of the innermost open <title>
    title_attrs: (Option<String>, Option<String>),

    abstract_text: String,

    doi: Option<String>,
    doi_buffer: Option<String>,

    published_year: Option<i32>,
    fallback_year: Option<i32>,
    date_buffer: Option<(bool, String)>,

    authors: Vec<AuthorName>,
    person: Option<PersonName>,
    forename_buffer: String,

    reference: Option<ReferenceTitles>,
    references: Vec<String>,
    reference_count: usize,
}

impl TeiCollector {
    fn within(&self, name: &str) -> bool {
        self.stack.iter().any(|s| s == name)
    }

    fn top(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    fn in_references(&self) -> bool {
        self.within("listBibl")
    }

    fn in_header(&self) -> bool {
        self.within("teiHeader") && !self.in_references()
    }

    fn is_main_title(&self) -> bool {
        matches!(self.title_attrs.1.as_deref(), None | Some("main"))
    }

    fn open(&mut self, e: &BytesStart<'_>) {
        let name = local_name(e);
        self.on_element(&name, e);
        self.stack.push(name);
    }

    /// Handles attributes of both start and empty elements
    fn on_element(&mut self, name: &str, e: &BytesStart<'_>) {
        match name {
            "title" => {
                self.title_attrs = (attribute(e, b"level"), attribute(e, b"type"));
            }
            "idno" if self.in_header() && self.doi.is_none() => {
                let is_doi = attribute(e, b"type")
                    .map(|t| t.eq_ignore_ascii_case("doi"))
                    .unwrap_or(false);
                if is_doi {
                    self.doi_buffer = Some(String::new());
                }
            }
            "date" if self.in_header() => {
                let published = attribute(e, b"type").as_deref() == Some("published");
                match attribute(e, b"when").as_deref().and_then(year_from) {
                    Some(year) if published => {
                        self.published_year.get_or_insert(year);
                    }
                    Some(year) => {
                        self.fallback_year.get_or_insert(year);
                    }
                    None => self.date_buffer = Some((published, String::new())),
                }
            }
            "persName" if self.in_header() && self.within("sourceDesc") && self.within("author") => {
                self.person = Some(PersonName::default());
            }
            "forename" if self.person.is_some() => self.forename_buffer.clear(),
            "biblStruct" if self.in_references() => {
                self.reference = Some(ReferenceTitles::default());
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let top = match self.top() {
            Some(top) => top.to_string(),
            None => return,
        };

        if self.in_header() {
            if self.within("abstract") {
                self.abstract_text.push_str(text);
                self.abstract_text.push(' ');
            }
            if top == "title" && self.is_main_title() {
                if self.within("titleStmt") && !self.title_done {
                    self.title.push_str(text);
                } else if self.within("sourceDesc") && self.within("analytic") {
                    self.header_title.push_str(text);
                }
            }
            if let Some(buffer) = self.doi_buffer.as_mut() {
                buffer.push_str(text);
            }
            if let Some((_, buffer)) = self.date_buffer.as_mut() {
                buffer.push_str(text);
            }
        }

        if let Some(person) = self.person.as_mut() {
            match top.as_str() {
                "forename" => self.forename_buffer.push_str(text),
                "surname" => person.surname.push_str(text),
                _ => {}
            }
        }

        if top == "title" && self.is_main_title() {
            let in_analytic = self.within("analytic");
            let in_monograph = self.within("monogr");
            let monograph_level = matches!(self.title_attrs.0.as_deref(), None | Some("m"));
            if let Some(reference) = self.reference.as_mut() {
                if in_analytic {
                    reference.analytic.push_str(text);
                } else if in_monograph && monograph_level {
                    reference.monograph.push_str(text);
                }
            }
        }
    }

    fn close(&mut self) {
        let name = match self.stack.pop() {
            Some(name) => name,
            None => return,
        };

        match name.as_str() {
            "title" => {
                if self.within("titleStmt") && !self.in_references() && !self.title.trim().is_empty() {
                    self.title_done = true;
                }
                self.title_attrs = (None, None);
            }
            "idno" => {
                if let Some(buffer) = self.doi_buffer.take() {
                    self.doi = normalize(&buffer);
                }
            }
            "date" => {
                if let Some((published, buffer)) = self.date_buffer.take() {
                    if let Some(year) = year_from(&buffer) {
                        if published {
                            self.published_year.get_or_insert(year);
                        } else {
                            self.fallback_year.get_or_insert(year);
                        }
                    }
                }
            }
            "forename" => {
                if let (Some(person), Some(forename)) =
                    (self.person.as_mut(), normalize(&self.forename_buffer))
                {
                    person.forenames.push(forename);
                }
                self.forename_buffer.clear();
            }
            "persName" => {
                if let Some(person) = self.person.take() {
                    let forename = normalize(&person.forenames.join(" "));
                    let surname = normalize(&person.surname);
                    if forename.is_some() || surname.is_some() {
                        self.authors.push(AuthorName { forename, surname });
                    }
                }
            }
            "biblStruct" => {
                if let Some(reference) = self.reference.take() {
                    self.reference_count += 1;
                    let title =
                        normalize(&reference.analytic).or_else(|| normalize(&reference.monograph));
                    if let Some(title) = title {
                        if self.references.len() < MAX_REFERENCES {
                            self.references.push(title);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> PaperMetadata {
        PaperMetadata {
            title: normalize(&self.title).or_else(|| normalize(&self.header_title)),
            abstract_text: normalize(&self.abstract_text),
            authors: self.authors,
            year: self.published_year.or(self.fallback_year),
            doi: self.doi,
            references: self.references,
            reference_count: self.reference_count,
        }
    }
}

/// Extract header fields from a TEI document
pub fn parse_tei(xml: &str) -> Result<PaperMetadata, GrobidError> {
    let mut reader = Reader::from_str(xml);
    let mut collector = TeiCollector::default();
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            GrobidError::MalformedTei(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;
        match event {
            Event::Start(e) => {
                saw_root = true;
                collector.open(&e);
            }
            Event::Empty(e) => {
                saw_root = true;
                let name = local_name(&e);
                collector.on_element(&name, &e);
                collector.stack.push(name);
                collector.close();
            }
            Event::End(_) => collector.close(),
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| GrobidError::MalformedTei(e.to_string()))?;
                collector.text(&text);
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                collector.text(&String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(GrobidError::MalformedTei("document has no root element".to_string()));
    }
    if !collector.stack.is_empty() {
        return Err(GrobidError::MalformedTei(format!(
            "unexpected end of document inside <{}>",
            collector.stack.join("/")
        )));
    }

    Ok(collector.finish())
}
