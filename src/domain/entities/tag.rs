use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Usage count of one blog tag. Serialized as `{_id, count}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagCount {
    #[serde(rename = "_id")]
    pub tag: String,
    pub count: i64,
}

impl TagCount {
    /// Groups tags across posts, counts them, orders by count descending
    /// (ties by tag name) and keeps the first `limit`.
    pub fn aggregate<'a, I>(tag_lists: I, limit: usize) -> Vec<TagCount>
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut counts: HashMap<&'a str, i64> = HashMap::new();
        for tags in tag_lists {
            for tag in tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut aggregated: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag: tag.to_string(), count })
            .collect();
        aggregated.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        aggregated.truncate(limit);
        aggregated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn counts_and_orders_descending() {
        let posts = vec![tags(&["rust", "web"]), tags(&["rust"]), tags(&["go", "web", "rust"])];
        let counts = TagCount::aggregate(posts.iter().map(Vec::as_slice), 20);
        assert_eq!(
            counts,
            vec![
                TagCount { tag: "rust".into(), count: 3 },
                TagCount { tag: "web".into(), count: 2 },
                TagCount { tag: "go".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn limits_result_size() {
        let posts: Vec<Vec<String>> = (0..30).map(|i| tags(&[&format!("tag{i}")])).collect();
        let counts = TagCount::aggregate(posts.iter().map(Vec::as_slice), 20);
        assert_eq!(counts.len(), 20);
    }

    #[test]
    fn serializes_with_underscore_id() {
        let json = serde_json::to_value(TagCount { tag: "rust".into(), count: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({"_id": "rust", "count": 2}));
    }
}
