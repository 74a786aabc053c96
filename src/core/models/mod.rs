//! Backend payload types

pub mod ai;
pub mod auth;
pub mod conversations;
pub mod emails;
pub mod optical;
mod pagination;

use serde::Serialize;

pub use pagination::Pagination;

/// Flatten a filter struct into query parameters, skipping unset fields.
///
/// Keys come out in lexical order.
pub fn query_pairs<T: Serialize>(value: &T) -> Vec<(String, String)> {
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(value) else {
        return Vec::new();
    };
    map.into_iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) if s.trim().is_empty() => return None,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, rendered))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: Option<String>,
        blank: String,
        flag: bool,
        count: u32,
    }

    #[test]
    fn test_query_pairs_skips_empty() {
        let pairs = query_pairs(&Sample {
            name: None,
            blank: "  ".to_string(),
            flag: true,
            count: 3,
        });
        assert_eq!(
            pairs,
            vec![
                ("count".to_string(), "3".to_string()),
                ("flag".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_non_object() {
        assert!(query_pairs(&42).is_empty());
    }
}
