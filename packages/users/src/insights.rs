use std::collections::HashMap;

use crate::models::{TagCount, User, UsersOverview};

const TOP_TAGS: usize = 10;

/// Aggregate statistics over all records. No enrichment calls are made.
///
/// Tags are grouped case-insensitively and reported with the spelling first
/// seen. Groups are ordered by count, descending; equal counts keep the order
/// in which the tags first appeared.
pub fn summarize(users: &[User]) -> UsersOverview {
    let analyzed_users = users.iter().filter(|u| u.is_analyzed()).count();

    let scores: Vec<f64> = users.iter().filter_map(|u| u.sentiment_score).collect();
    let average_sentiment = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    let mut groups: Vec<TagCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for tag in users.iter().filter_map(|u| u.tags.as_ref()).flatten() {
        let key = tag.to_lowercase();
        match positions.get(&key) {
            Some(&idx) => groups[idx].count += 1,
            None => {
                positions.insert(key, groups.len());
                groups.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }
    // sort_by is stable
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(TOP_TAGS);

    UsersOverview {
        total_users: users.len(),
        analyzed_users,
        average_sentiment,
        top_tags: groups,
    }
}
