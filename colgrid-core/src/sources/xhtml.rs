//! Positioned-span XHTML reader
//!
//! Reads the XHTML that PDF text extractors emit when asked to keep glyph
//! positions:
//! - one `<div class="page">` per page, optionally with `data-page="N"`
//! - one `<span data-bbox="x,y,width,height">text</span>` per text run
//!
//! Pages without `data-page` are numbered by position, starting at 1.

use super::{has_extension, FragmentSource};
use crate::types::{Fragment, FragmentDocument, PageFragments, PageIndex};
use anyhow::{anyhow, Result};
use quick_xml::escape::unescape_with;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static PAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<div\s+class="page"([^>]*)>(.*?)</div>"#).unwrap());

static PAGE_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-page="(\d+)""#).unwrap());

static SPAN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span[^>]*data-bbox="([^"]*)"[^>]*>([^<]*)</span>"#).unwrap()
});

pub struct XhtmlFragmentSource;

impl XhtmlFragmentSource {
    pub fn parse(&self, xhtml: &str) -> FragmentDocument {
        let mut pages = Vec::new();
        let mut skipped = 0usize;

        for (page_index, page_cap) in PAGE_REGEX.captures_iter(xhtml).enumerate() {
            let attributes = page_cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let page_number = PAGE_NUMBER_REGEX
                .captures(attributes)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<PageIndex>().ok())
                .unwrap_or((page_index + 1) as PageIndex);

            let mut fragments = Vec::new();
            if let Some(body) = page_cap.get(2) {
                for span in SPAN_REGEX.captures_iter(body.as_str()) {
                    let (Some(bbox), Some(text)) = (span.get(1), span.get(2)) else {
                        continue;
                    };
                    let text = unescape(text.as_str().trim());
                    if text.is_empty() {
                        continue;
                    }
                    match parse_bbox(bbox.as_str()) {
                        Some((x, y, width, height)) => fragments.push(Fragment::new(
                            text,
                            x,
                            x + width,
                            y,
                            y + height,
                            page_number,
                        )),
                        None => skipped += 1,
                    }
                }
            }
            pages.push(PageFragments::new(page_number, fragments));
        }

        if skipped > 0 {
            log::warn!("⚠️  Skipped {} spans with unreadable data-bbox", skipped);
        }

        let document = FragmentDocument::new(pages);
        log::info!(
            "✅ XHTML parsing complete: {} fragments across {} pages",
            document.fragment_count(),
            document.page_count()
        );
        document
    }
}

impl FragmentSource for XhtmlFragmentSource {
    fn read_document(&self, bytes: &[u8]) -> Result<FragmentDocument> {
        let xhtml =
            std::str::from_utf8(bytes).map_err(|e| anyhow!("XHTML input is not UTF-8: {}", e))?;
        Ok(self.parse(xhtml))
    }

    fn name(&self) -> &str {
        "xhtml"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        has_extension(path, &["xhtml", "html", "htm"])
    }
}

/// "x,y,width,height" with finite numbers and non-negative size
fn parse_bbox(value: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        &[x, y, w, h] if parts.iter().all(|v| v.is_finite()) && w >= 0.0 && h >= 0.0 => {
            Some((x, y, w, h))
        }
        _ => None,
    }
}

/// Decode character references in span text. Text that does not decode
/// (a bare `&`, an unknown entity) is kept as written.
fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    match unescape_with(text, named_entity) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            log::warn!("⚠️  Keeping span text '{}' as written: {}", text, e);
            text.to_string()
        }
    }
}

/// XML's predefined entities plus `&nbsp;`, which extractors emit for padding
fn named_entity(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        "nbsp" => Some(" "),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<html><body>
<div class="page" data-page="1"><p>
  <span class="f1" data-bbox="45.0,200.0,4.0,7.0">SM</span>
  <span class="f1" data-bbox="150.0,200.5,20.0,7.0">4 &amp; 6</span>
  <span class="f1" data-bbox="300.0,200.0,5.0,7.0">   </span>
</p></div>
<div class="page"><p>
  <span class="f2" data-bbox="bogus">x</span>
  <span class="f2" data-bbox="85,210,10,7">S-2</span>
</p></div>
</body></html>"#;

    #[test]
    fn test_parse_pages_and_spans() {
        let document = XhtmlFragmentSource.parse(SAMPLE);
        assert_eq!(document.page_numbers(), vec![1, 2]);

        let first = &document.page(1).unwrap().fragments;
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].text, "SM");
        assert_eq!((first[0].x0, first[0].x1), (45.0, 49.0));
        assert_eq!((first[0].y0, first[0].y1), (200.0, 207.0));
        assert_eq!(first[1].text, "4 & 6");

        let second = &document.page(2).unwrap().fragments;
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].text, "S-2");
        assert_eq!(second[0].page, 2);
    }

    #[test]
    fn test_parse_bbox() {
        assert_eq!(parse_bbox("1, 2, 3, 4"), Some((1.0, 2.0, 3.0, 4.0)));
        assert_eq!(parse_bbox("1,2,3"), None);
        assert_eq!(parse_bbox("1,2,-3,4"), None);
        assert_eq!(parse_bbox("1,2,NaN,4"), None);
    }

    #[test]
    fn test_unescape_decodes_once() {
        assert_eq!(unescape("&amp;lt;"), "&lt;");
        assert_eq!(unescape("a &lt; b"), "a < b");
        assert_eq!(unescape("&#39;x&apos;&nbsp;"), "'x' ");
    }

    #[test]
    fn test_numeric_references_in_spans() {
        let xhtml = r#"<div class="page" data-page="1"><span data-bbox="0,0,5,5">10&#176;C &#x41;</span><span data-bbox="10,0,5,5">&#177;0.5</span></div>"#;
        let document = XhtmlFragmentSource.parse(xhtml);
        let texts: Vec<&str> = document.page(1).unwrap().fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["10°C A", "±0.5"]);
    }

    #[test]
    fn test_undecodable_text_is_kept() {
        assert_eq!(unescape("AT&T"), "AT&T");
        assert_eq!(unescape("&bogus; 5"), "&bogus; 5");
    }

    #[test]
    fn test_repeated_data_page_is_merged() {
        let xhtml = r#"<div class="page" data-page="1"><span data-bbox="0,0,5,5">A</span></div>
<div class="page" data-page="1"><span data-bbox="0,20,5,5">B</span></div>"#;
        let document = XhtmlFragmentSource.parse(xhtml);
        assert_eq!(document.page_numbers(), vec![1]);
        assert_eq!(document.page(1).unwrap().fragments.len(), 2);
    }
}
