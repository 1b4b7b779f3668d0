// src/services/extract.rs

//! HTML extraction.
//!
//! Parses a fetched page into a [`RecordSet`] using the configured CSS
//! selector schema. The structural container doubles as a layout check:
//! if it is missing the page changed upstream and extraction fails, while
//! a present but row-less container is a valid empty record set.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{PageSchema, Record, RecordSet};
use crate::utils::{normalize_whitespace, resolve_url};

/// Extractor for one page schema.
pub struct Extractor {
    container: Selector,
    container_source: String,
    row: Selector,
    skip_rows: usize,
    id: Selector,
    link: Option<Selector>,
    fields: Vec<(String, Selector)>,
}

impl Extractor {
    /// Build an extractor, parsing all schema selectors.
    pub fn new(schema: &PageSchema) -> Result<Self> {
        let fields = schema
            .fields
            .iter()
            .map(|f| Ok((f.name.clone(), Self::parse_selector(&f.selector)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            container: Self::parse_selector(&schema.container_selector)?,
            container_source: schema.container_selector.clone(),
            row: Self::parse_selector(&schema.row_selector)?,
            skip_rows: schema.skip_rows,
            id: Self::parse_selector(&schema.id_selector)?,
            link: schema
                .link_selector
                .as_deref()
                .map(Self::parse_selector)
                .transpose()?,
            fields,
        })
    }

    /// Extract all records from a page.
    ///
    /// `base_url` is the page URL, used to resolve relative links.
    pub fn extract(&self, html: &str, base_url: &str) -> Result<RecordSet> {
        let document = Html::parse_document(html);

        let container = document.select(&self.container).next().ok_or_else(|| {
            AppError::extraction(format!(
                "structural container '{}' not found; page layout may have changed",
                self.container_source
            ))
        })?;

        let base = Url::parse(base_url).ok();
        let mut records = RecordSet::new();

        for row in container.select(&self.row).skip(self.skip_rows) {
            let Some(record) = self.parse_row(&row, base.as_ref()) else {
                continue;
            };

            if records.contains(&record.id) {
                log::warn!("duplicate record id '{}' on page, keeping first", record.id);
                continue;
            }
            records.insert(record)?;
        }

        Ok(records)
    }

    /// Parse one row into a record. Rows without an id cell (e.g. further
    /// header rows) or with an empty id are skipped.
    fn parse_row(&self, row: &ElementRef, base: Option<&Url>) -> Option<Record> {
        let id_elem = row.select(&self.id).next()?;
        let id = normalize_whitespace(&id_elem.text().collect::<String>());
        if id.is_empty() {
            return None;
        }

        let mut record = Record::new(id);

        for (name, selector) in &self.fields {
            let value = row
                .select(selector)
                .next()
                .map(|el| normalize_whitespace(&el.text().collect::<String>()))
                .unwrap_or_default();
            record.fields.insert(name.clone(), value);
        }

        if let Some(link_sel) = &self.link {
            if let Some(href) = row
                .select(link_sel)
                .next()
                .and_then(|el| el.value().attr("href"))
            {
                let link = match base {
                    Some(base) => resolve_url(base, href),
                    None => href.to_string(),
                };
                record.fields.insert("link".to_string(), link);
            }
        }

        Some(record)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "https://curia.europa.eu/en/content/juris/c2_juris.htm";

    fn extractor() -> Extractor {
        Extractor::new(&PageSchema::default()).unwrap()
    }

    fn page(rows: &str) -> String {
        format!(
            "<html><body><div id=\"content\"><table>\
             <tr><td>Case</td><td>Description</td></tr>{rows}</table></div></body></html>"
        )
    }

    #[test]
    fn extracts_records_with_fields_and_link() {
        let html = page(
            "<tr><td><a href=\"/case/c123\">C-123/45</a></td><td>Judgment of the Court</td></tr>\
             <tr><td>C-67/89</td><td>Opinion of the Advocate General</td></tr>",
        );

        let records = extractor().extract(&html, BASE_URL).unwrap();
        assert_eq!(records.len(), 2);

        let first = records.get("C-123/45").unwrap();
        assert_eq!(first.field("description"), Some("Judgment of the Court"));
        assert_eq!(first.field("link"), Some("https://curia.europa.eu/case/c123"));

        let second = records.get("C-67/89").unwrap();
        assert_eq!(
            second.field("description"),
            Some("Opinion of the Advocate General")
        );
        assert_eq!(second.field("link"), None);
    }

    #[test]
    fn missing_container_is_an_extraction_error() {
        let html = "<html><body><p>Maintenance page</p></body></html>";
        let err = extractor().extract(html, BASE_URL).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn empty_table_is_a_valid_empty_set() {
        let html = page("");
        let records = extractor().extract(&html, BASE_URL).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn header_row_is_skipped() {
        let html = page("<tr><td>C-1/20</td><td>Judgment</td></tr>");
        let records = extractor().extract(&html, BASE_URL).unwrap();
        assert!(!records.contains("Case"));
        assert!(records.contains("C-1/20"));
    }

    #[test]
    fn rows_with_empty_id_are_skipped() {
        let html = page(
            "<tr><td>  </td><td>stray row</td></tr>\
             <tr><td>C-1/20</td><td>Judgment</td></tr>",
        );
        let records = extractor().extract(&html, BASE_URL).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let html = page(
            "<tr><td>C-1/20</td><td>first</td></tr>\
             <tr><td>C-1/20</td><td>second</td></tr>",
        );
        let records = extractor().extract(&html, BASE_URL).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.get("C-1/20").unwrap().field("description"), Some("first"));
    }

    #[test]
    fn cell_whitespace_is_normalized() {
        let html = page("<tr><td> C-1/20\n</td><td>Judgment\n\t of the   Court</td></tr>");
        let records = extractor().extract(&html, BASE_URL).unwrap();
        assert_eq!(
            records.get("C-1/20").unwrap().field("description"),
            Some("Judgment of the Court")
        );
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let mut schema = PageSchema::default();
        schema.row_selector = "[[invalid".to_string();
        assert!(matches!(
            Extractor::new(&schema),
            Err(AppError::Selector { .. })
        ));
    }
}
