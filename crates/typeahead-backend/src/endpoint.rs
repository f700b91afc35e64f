//! Search URL construction.
//!
//! ```text
//! {base}sites/{site}/search?category={category}&limit={limit}&offset={offset}&{filter}&q={query}
//! ```
//!
//! `filter` is `MODEL={model}` when a model is configured, `BRAND={brand}`
//! otherwise. `offset` is derived from a 1-based page number.

use hyper::Uri;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use typeahead_core::config::BackendConfig;
use typeahead_core::{ErrorKind, SearchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEndpoint {
    base_url: String,
    site: String,
    category: String,
    brand: String,
    model: Option<String>,
    limit: u32,
}

impl SearchEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = BackendConfig::default();
        Self {
            base_url: with_trailing_slash(base_url.into()),
            site: defaults.site,
            category: defaults.category,
            brand: defaults.brand,
            model: None,
            limit: defaults.limit,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            base_url: with_trailing_slash(config.base_url.clone()),
            site: config.site.clone(),
            category: config.category.clone(),
            brand: config.brand.clone(),
            model: Some(config.model.clone()).filter(|m| !m.is_empty()),
            limit: config.limit,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into()).filter(|m| !m.is_empty());
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Build the request URI for `query` on the 1-based `page`. Page `0` is
    /// treated as the first page.
    pub fn search_uri(&self, query: Option<&str>, page: u32) -> Result<Uri, SearchError> {
        let offset = page.saturating_sub(1).saturating_mul(self.limit);

        let filter = match &self.model {
            Some(model) => {
                if !model.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                    return Err(SearchError::new(
                        ErrorKind::InvalidCarModel,
                        format!("model id {model:?} is not a valid identifier"),
                    ));
                }
                format!("MODEL={model}")
            }
            None => format!("BRAND={}", self.brand),
        };

        let mut url = format!(
            "{}sites/{}/search?category={}&limit={}&offset={offset}&{filter}",
            self.base_url,
            encode(&self.site),
            encode(&self.category),
            self.limit,
        );
        if let Some(query) = query {
            url.push_str("&q=");
            url.push_str(&encode(query));
        }

        url.parse::<Uri>().map_err(|err| {
            SearchError::new(
                ErrorKind::InvalidUrl,
                format!("the search URL was not valid ({err}): {url}"),
            )
        })
    }
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, NON_ALPHANUMERIC).to_string()
}

fn with_trailing_slash(mut base: String) -> String {
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
