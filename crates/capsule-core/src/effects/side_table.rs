//! Identity-keyed tag side table

use super::heap::TagEffects;
use crate::types::{ObjectId, Tag};
use std::collections::HashMap;

/// In-memory [`TagEffects`] handler.
///
/// Only non-`None` tags occupy an entry, so the table size equals the number
/// of currently tagged objects.
#[derive(Debug, Clone, Default)]
pub struct SideTable {
    tags: HashMap<ObjectId, Tag>,
}

impl SideTable {
    /// Create an empty side table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tagged objects.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if no object is tagged.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagEffects for SideTable {
    fn tag_of(&self, object: ObjectId) -> Tag {
        self.tags.get(&object).copied().unwrap_or_default()
    }

    fn set_tag(&mut self, object: ObjectId, tag: Tag) {
        match tag {
            Tag::None => {
                self.tags.remove(&object);
            }
            tag => {
                self.tags.insert(object, tag);
            }
        }
    }

    fn objects_with_tags(&self, tags: &[Tag]) -> Vec<(ObjectId, Tag)> {
        let mut found: Vec<(ObjectId, Tag)> = self
            .tags
            .iter()
            .filter(|(_, tag)| tags.contains(tag))
            .map(|(id, tag)| (*id, *tag))
            .collect();
        found.sort_unstable_by_key(|(id, _)| *id);
        found
    }

    fn clear_tags(&mut self) {
        self.tags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_object_reads_none() {
        let table = SideTable::new();
        assert_eq!(table.tag_of(ObjectId::new(1)), Tag::None);
        assert!(table.is_empty());
    }

    #[test]
    fn setting_none_removes_entry() {
        let mut table = SideTable::new();
        let obj = ObjectId::new(5);
        table.set_tag(obj, Tag::Move);
        assert_eq!(table.len(), 1);
        table.set_tag(obj, Tag::None);
        assert!(table.is_empty());
        assert_eq!(table.tag_of(obj), Tag::None);
    }

    #[test]
    fn enumerates_tagged_objects_in_id_order() {
        let mut table = SideTable::new();
        table.set_tag(ObjectId::new(9), Tag::IllegalMove);
        table.set_tag(ObjectId::new(2), Tag::Move);
        table.set_tag(ObjectId::new(4), Tag::IllegalMove);

        let illegal = table.objects_with_tags(&[Tag::IllegalMove]);
        assert_eq!(
            illegal,
            vec![
                (ObjectId::new(4), Tag::IllegalMove),
                (ObjectId::new(9), Tag::IllegalMove)
            ]
        );
        assert_eq!(table.objects_with_tags(&[Tag::Move, Tag::IllegalMove]).len(), 3);
        assert!(table.objects_with_tags(&[Tag::None]).is_empty());
    }

    proptest! {
        #[test]
        fn last_write_wins(writes in prop::collection::vec((0u64..16, 0i64..3), 0..64)) {
            let mut table = SideTable::new();
            let mut expected = HashMap::new();
            for (raw_id, raw_tag) in writes {
                let tag = Tag::from_raw(raw_tag).unwrap_or_default();
                table.set_tag(ObjectId::new(raw_id), tag);
                expected.insert(raw_id, tag);
            }
            for (raw_id, tag) in expected {
                prop_assert_eq!(table.tag_of(ObjectId::new(raw_id)), tag);
            }
        }
    }
}
