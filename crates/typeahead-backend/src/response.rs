//! Listing payload returned by the catalogue search endpoint.
//!
//! Only the fields the front end shows are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;
use typeahead_core::{ErrorKind, SearchError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    pub paging: Paging,
    #[serde(default)]
    pub results: Vec<Listing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Paging {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl SearchResponse {
    pub fn decode(body: &[u8]) -> Result<Self, SearchError> {
        if body.is_empty() {
            return Err(SearchError::new(ErrorKind::InvalidData, "empty response body"));
        }
        serde_json::from_slice(body)
            .map_err(|err| SearchError::new(ErrorKind::UnableToDecode, err.to_string()))
    }

    /// Listing titles in response order.
    pub fn titles(self) -> Vec<String> {
        self.results.into_iter().map(|listing| listing.title).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"{
        "site_id": "MCO",
        "paging": {"total": 2, "offset": 0, "limit": 10, "primary_results": 2},
        "results": [
            {"id": "MCO1", "title": "Porsche 911", "price": 350000000, "thumbnail": "http://img/1.jpg"},
            {"id": "MCO2", "title": "Porsche Cayenne"}
        ]
    }"#;

    #[test]
    fn decodes_titles_in_order() {
        let response = SearchResponse::decode(BODY.as_bytes()).unwrap();
        assert_eq!(response.paging, Paging { total: 2, offset: 0, limit: 10 });
        assert_eq!(response.results[0].price, Some(350_000_000.0));
        assert_eq!(response.results[1].thumbnail, None);
        assert_eq!(response.titles(), vec!["Porsche 911", "Porsche Cayenne"]);
    }

    #[test]
    fn missing_results_decode_as_empty() {
        let response =
            SearchResponse::decode(br#"{"paging":{"total":0,"offset":0,"limit":10}}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn empty_body_is_invalid_data() {
        let err = SearchResponse::decode(b"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidData);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = SearchResponse::decode(b"{\"paging\": 3}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnableToDecode);
    }
}
