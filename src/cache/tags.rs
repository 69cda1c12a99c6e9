//! Cache tags and the endpoint tag rules.
//!
//! Every cached query result is labeled with a set of tags; every
//! mutation declares the tags it invalidates. Coherency is tag-based,
//! never time-based: a write forces a re-fetch of exactly the cached
//! queries whose labels it touched.

use crate::models::Tutorial;

/// A cache invalidation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Collection-level tag for the full list. Invalidated by every
    /// write so list views re-fetch on any add/remove/change.
    List,
    /// Per-record tag keyed by server id.
    Item(i64),
}

/// Identity of a cacheable read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// GET /tutorials
    Tutorials,
    /// GET /tutorials/:id
    Tutorial(i64),
    /// GET /tutorials/published
    Published,
}

/// Response data for a read, shaped by its query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryData {
    List(Vec<Tutorial>),
    One(Tutorial),
}

impl QueryKey {
    /// Tags provided by a successful response.
    ///
    /// The full list provides one tag per returned record plus the
    /// collection tag. A single-record read provides its own tag. The
    /// published listing provides nothing and is therefore never
    /// invalidated by mutations.
    pub fn provides(&self, data: &QueryData) -> Vec<Tag> {
        match (self, data) {
            (QueryKey::Tutorials, QueryData::List(items)) => {
                let mut tags: Vec<Tag> = items.iter().map(|t| Tag::Item(t.id)).collect();
                tags.push(Tag::List);
                tags
            }
            (QueryKey::Tutorial(id), _) => vec![Tag::Item(*id)],
            (QueryKey::Published, _) => vec![],
            // A list key with mismatched data still subscribes to the
            // collection so it is not stranded in the cache forever.
            (QueryKey::Tutorials, QueryData::One(_)) => vec![Tag::List],
        }
    }
}

/// A write operation against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// POST /tutorials
    Create,
    /// PUT /tutorials/:id
    Update(i64),
    /// DELETE /tutorials/:id
    Delete(i64),
    /// DELETE /tutorials
    DeleteAll,
}

impl Mutation {
    /// Tags invalidated when this mutation succeeds.
    pub fn invalidates(&self) -> Vec<Tag> {
        match self {
            Mutation::Create | Mutation::DeleteAll | Mutation::Delete(_) => vec![Tag::List],
            Mutation::Update(id) => vec![Tag::Item(*id), Tag::List],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tutorial(id: i64) -> Tutorial {
        Tutorial {
            id,
            title: format!("t{}", id),
            description: "d".to_string(),
            published: false,
        }
    }

    #[test]
    fn test_list_provides_item_tags_plus_collection() {
        let data = QueryData::List(vec![tutorial(1), tutorial(2)]);
        let tags = QueryKey::Tutorials.provides(&data);
        assert!(tags.contains(&Tag::Item(1)));
        assert!(tags.contains(&Tag::Item(2)));
        assert!(tags.contains(&Tag::List));
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn test_empty_list_still_provides_collection_tag() {
        let data = QueryData::List(vec![]);
        assert_eq!(QueryKey::Tutorials.provides(&data), vec![Tag::List]);
    }

    #[test]
    fn test_single_read_provides_its_own_tag() {
        let data = QueryData::One(tutorial(42));
        assert_eq!(QueryKey::Tutorial(42).provides(&data), vec![Tag::Item(42)]);
    }

    #[test]
    fn test_published_provides_no_tags() {
        let data = QueryData::List(vec![tutorial(1)]);
        assert!(QueryKey::Published.provides(&data).is_empty());
    }

    #[test]
    fn test_update_invalidates_item_and_collection() {
        assert_eq!(
            Mutation::Update(5).invalidates(),
            vec![Tag::Item(5), Tag::List]
        );
    }

    #[test]
    fn test_other_mutations_invalidate_collection_only() {
        assert_eq!(Mutation::Create.invalidates(), vec![Tag::List]);
        assert_eq!(Mutation::Delete(9).invalidates(), vec![Tag::List]);
        assert_eq!(Mutation::DeleteAll.invalidates(), vec![Tag::List]);
    }
}
