//! Groups media versions by the identity of the item they belong to

use std::collections::HashMap;

use super::types::{DuplicateGroup, IdentityKey, Item};

/// Group every media version by `(title, year)` and keep the groups with more
/// than one version. Groups and their media keep the order they were found in.
pub fn find_duplicates<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut positions: HashMap<IdentityKey, usize> = HashMap::new();

    for item in items {
        let key = item.identity();
        for media in &item.media {
            let position = *positions.entry(key.clone()).or_insert_with(|| {
                groups.push(DuplicateGroup {
                    key: key.clone(),
                    media: Vec::new(),
                });
                groups.len() - 1
            });
            groups[position].media.push(media.clone());
        }
    }

    groups.retain(|group| group.media.len() > 1);
    groups
}
