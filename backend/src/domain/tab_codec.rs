//! Share links: a tab encoded into a URL query string or fragment.
//!
//! The query form carries one parameter per tab field, with the structured
//! fields (`tabDescription`, `items`, `splitters`) as JSON. The compressed
//! form deflates that query and base64url-encodes it so long tabs still fit
//! in a link. Compressed links are not interchangeable with lz-string
//! `compressToEncodedURIComponent` output; such fragments fail to load. Decoding produces raw JSON for [`validate_tab`], so a link
//! goes through the same checks as any other input.
//!
//! [`validate_tab`]: crate::domain::tab_validation::validate_tab

use std::io::{Read, Write};
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::Serialize;
use serde_json::{json, Map, Value};
use shared::Tab;

#[derive(Debug, thiserror::Error)]
pub enum TabCodecError {
    #[error("Could not read link parameters: {0}")]
    InvalidQuery(#[from] serde_urlencoded::de::Error),
    #[error("Link parameter '{field}' is not valid JSON: {source}")]
    InvalidJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not encode tab: {0}")]
    Encode(String),
    #[error("Could not compress link: {0}")]
    Compression(#[from] std::io::Error),
    #[error("Link expands to more than {limit} bytes")]
    FragmentTooLarge { limit: u64 },
}

/// Largest query a compressed fragment may inflate to
pub const MAX_DECOMPRESSED_BYTES: u64 = 256 * 1024;

/// How share links carry the tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// `{base}/split?tabName=...`
    #[default]
    Query,
    /// `{base}/split#<deflated, base64url>`
    Compressed,
}

impl FromStr for LinkStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(LinkStyle::Query),
            "compressed" => Ok(LinkStyle::Compressed),
            other => Err(format!("unknown link style '{}'", other)),
        }
    }
}

/// Fields that travel as JSON inside the query
const JSON_FIELDS: [&str; 3] = ["tabDescription", "items", "splitters"];

/// Encode a tab as a form-urlencoded query string. `[` and `]` from the JSON
/// fields are always percent-escaped.
pub fn encode_query(tab: &Tab) -> Result<String, TabCodecError> {
    let pairs = [
        ("tabName", tab.tab_name.clone()),
        ("tabDescription", to_json(&tab.tab_description)?),
        ("taxAmount", tab.tax_amount.to_string()),
        ("tipAmount", tab.tip_amount.to_string()),
        ("tipBeforeTax", tab.tip_before_tax.to_string()),
        ("items", to_json(&tab.items)?),
        ("splitters", to_json(&tab.splitters)?),
    ];

    serde_urlencoded::to_string(pairs).map_err(|e| TabCodecError::Encode(e.to_string()))
}

/// Decode a query string into raw tab input. Malformed JSON in any of the
/// structured parameters is fatal; absent parameters are left out so
/// validation can report them.
pub fn decode_query(query: &str) -> Result<Value, TabCodecError> {
    let query = query.trim_start_matches(['?', '#']);
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;

    let mut raw = Map::new();
    for (key, value) in pairs {
        let field = key.as_str();
        let decoded = match JSON_FIELDS.iter().copied().find(|json_field| *json_field == field) {
            Some(json_field) => serde_json::from_str(&value).map_err(|source| {
                TabCodecError::InvalidJson {
                    field: json_field,
                    source,
                }
            })?,
            None => Value::String(value),
        };
        raw.insert(key, decoded);
    }

    raw.entry("tabDescription")
        .or_insert_with(|| json!({ "type": "None" }));

    Ok(Value::Object(raw))
}

/// Deflate the query form and encode it base64url without padding.
pub fn compress_query(tab: &Tab) -> Result<String, TabCodecError> {
    let query = encode_query(tab)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(query.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a link fragment that is either compressed or a plain query
/// (links created before compression was introduced).
pub fn decode_fragment(fragment: &str) -> Result<Value, TabCodecError> {
    let fragment = fragment.trim_start_matches(['?', '#']);
    match decompress(fragment)? {
        Some(query) => decode_query(&query),
        None => decode_query(fragment),
    }
}

/// `Ok(None)` when the fragment is not a compressed link at all.
fn decompress(fragment: &str) -> Result<Option<String>, TabCodecError> {
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(fragment) else {
        return Ok(None);
    };

    let mut inflated = Vec::new();
    let read = DeflateDecoder::new(bytes.as_slice())
        .take(MAX_DECOMPRESSED_BYTES + 1)
        .read_to_end(&mut inflated);
    if read.is_err() {
        return Ok(None);
    }
    if inflated.len() as u64 > MAX_DECOMPRESSED_BYTES {
        return Err(TabCodecError::FragmentTooLarge {
            limit: MAX_DECOMPRESSED_BYTES,
        });
    }

    Ok(String::from_utf8(inflated).ok())
}

/// Full link that reproduces the tab's split.
pub fn share_link(base_url: &str, tab: &Tab, style: LinkStyle) -> Result<String, TabCodecError> {
    let base_url = base_url.trim_end_matches('/');
    Ok(match style {
        LinkStyle::Query => format!("{}/split?{}", base_url, encode_query(tab)?),
        LinkStyle::Compressed => format!("{}/split#{}", base_url, compress_query(tab)?),
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, TabCodecError> {
    serde_json::to_string(value).map_err(|e| TabCodecError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::validation::TabValidationError;
    use crate::domain::tab_validation::validate_tab;
    use shared::{DescriptionType, Item, SplitterRef, TabDescription};

    fn create_mock_tab() -> Tab {
        Tab {
            tab_name: "Friday Dinner & Drinks".to_string(),
            tab_description: TabDescription {
                kind: DescriptionType::CashApp,
                details: Some("dinnerclub".to_string()),
            },
            tax_amount: 7.46,
            tip_before_tax: false,
            tip_amount: 19.16,
            items: vec![
                Item {
                    name: "Large Fries".to_string(),
                    price: 7.49,
                    splitters: vec![SplitterRef::new("Kyle"), SplitterRef::new("Adam")],
                },
                Item {
                    name: "2x Michelob".to_string(),
                    price: 13.5,
                    splitters: vec![SplitterRef::new("Adam")],
                },
            ],
            splitters: vec![SplitterRef::new("Kyle"), SplitterRef::new("Adam")],
        }
    }

    #[test]
    fn test_query_round_trip_through_validation() {
        let tab = create_mock_tab();

        let query = encode_query(&tab).unwrap();
        let decoded = validate_tab(&decode_query(&query).unwrap()).unwrap();

        assert_eq!(decoded, tab);
    }

    #[test]
    fn test_query_escapes_brackets_and_separators() {
        let query = encode_query(&create_mock_tab()).unwrap();

        assert!(!query.contains('['));
        assert!(!query.contains(']'));
        assert!(query.contains("%5B"));
        assert!(query.starts_with("tabName=Friday+Dinner+%26+Drinks&"));
        assert!(query.contains("taxAmount=7.46"));
        assert!(query.contains("tipBeforeTax=false"));
    }

    #[test]
    fn test_compressed_round_trip() {
        let tab = create_mock_tab();

        let fragment = compress_query(&tab).unwrap();
        assert!(fragment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let decoded = validate_tab(&decode_fragment(&fragment).unwrap()).unwrap();
        assert_eq!(decoded, tab);
    }

    #[test]
    fn test_plain_query_fragment_still_loads() {
        let tab = create_mock_tab();
        let fragment = format!("#{}", encode_query(&tab).unwrap());

        let decoded = validate_tab(&decode_fragment(&fragment).unwrap()).unwrap();

        assert_eq!(decoded, tab);
    }

    #[test]
    fn test_oversized_fragment_is_rejected() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder
            .write_all(&vec![b'a'; (MAX_DECOMPRESSED_BYTES * 4) as usize])
            .unwrap();
        let fragment = URL_SAFE_NO_PAD.encode(encoder.finish().unwrap());
        assert!(fragment.len() < 4096);

        match decode_fragment(&fragment) {
            Err(TabCodecError::FragmentTooLarge { limit }) => {
                assert_eq!(limit, MAX_DECOMPRESSED_BYTES)
            }
            other => panic!("expected the fragment to be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_compressed_fragment_is_not_a_tab() {
        // lz-string style output uses '+' and '$', outside the base64url alphabet
        let raw = decode_fragment("N4IgLgpgtgzg+hA5gJwgBw$$").unwrap();

        assert!(matches!(
            validate_tab(&raw),
            Err(TabValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_malformed_json_parameter_is_fatal() {
        let query = "tabName=Lunch&taxAmount=1&tipAmount=2&items=%5B%7Bbroken&splitters=%5B%5D";

        match decode_query(query) {
            Err(TabCodecError::InvalidJson { field, .. }) => assert_eq!(field, "items"),
            other => panic!("expected invalid JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_description_defaults_to_none() {
        let raw = decode_query("tabName=Lunch&taxAmount=0").unwrap();

        assert_eq!(raw["tabDescription"], json!({ "type": "None" }));
        assert_eq!(raw["taxAmount"], json!("0"));
        assert!(raw.get("items").is_none());
    }

    #[test]
    fn test_garbage_fragment_cannot_load() {
        let raw = decode_fragment("hello=world&page=2").unwrap();

        assert!(matches!(
            validate_tab(&raw),
            Err(TabValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_share_links() {
        let tab = create_mock_tab();

        let query_link = share_link("http://localhost:3000/", &tab, LinkStyle::Query).unwrap();
        assert!(query_link.starts_with("http://localhost:3000/split?tabName="));

        let compressed_link =
            share_link("https://tabs.example", &tab, LinkStyle::Compressed).unwrap();
        let (prefix, fragment) = compressed_link.split_once('#').unwrap();
        assert_eq!(prefix, "https://tabs.example/split");
        assert_eq!(validate_tab(&decode_fragment(fragment).unwrap()).unwrap(), tab);
    }

    #[test]
    fn test_link_style_parsing() {
        assert_eq!("query".parse::<LinkStyle>(), Ok(LinkStyle::Query));
        assert_eq!(" Compressed ".parse::<LinkStyle>(), Ok(LinkStyle::Compressed));
        assert!("short".parse::<LinkStyle>().is_err());
    }
}
