//! Canned catalogue responses.

use serde_json::json;

/// A well-formed search response whose listings carry `titles`.
pub fn search_body(titles: &[&str]) -> String {
    let results: Vec<_> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({
                "id": format!("MCO{}", 600_000_000 + i),
                "title": title,
                "price": 250_000_000.0 + i as f64,
                "thumbnail": format!("http://img.test/{i}.jpg"),
            })
        })
        .collect();
    json!({
        "paging": { "total": titles.len(), "offset": 0, "limit": 10 },
        "results": results,
    })
    .to_string()
}

pub const PORSCHE_TITLES: &[&str] = &["Porsche 911", "Porsche Cayenne"];

/// Valid JSON that is not a search response.
pub const WRONG_SHAPE_BODY: &str = r#"{"message":"resource not found","status":404}"#;

pub const TRUNCATED_BODY: &str = r#"{"paging":{"total":1,"offset":0,"limi"#;
