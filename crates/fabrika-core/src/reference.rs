//! # Reference Lists
//!
//! Named lists of strings used to populate and validate enumerated-choice
//! fields: the manager names and the activity-type names. They are fetched
//! once per session and rarely change.

use std::collections::BTreeMap;
use std::fmt;

use crate::entities::{ActivityType, Manager};
use crate::record::Record;

/// Which reference list a choice field draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReferenceKind {
    /// Names of all managers (`Manager::manager_name`).
    Managers,
    /// Names of all activity types (`ActivityType::name`).
    ActivityTypes,
}

impl ReferenceKind {
    /// Return the list name as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Managers => "managers",
            Self::ActivityTypes => "activity-types",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loaded reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceList {
    /// Which list this is.
    pub kind: ReferenceKind,
    /// Allowed values, in backend order.
    pub values: Vec<String>,
}

impl ReferenceList {
    /// Build a list from raw values.
    pub fn new(kind: ReferenceKind, values: Vec<String>) -> Self {
        Self { kind, values }
    }

    /// Manager-name list from fetched manager records.
    pub fn from_managers(records: &[Record<Manager>]) -> Self {
        Self::new(
            ReferenceKind::Managers,
            records.iter().map(|r| r.data.manager_name.clone()).collect(),
        )
    }

    /// Activity-type-name list from fetched activity-type records.
    pub fn from_activity_types(records: &[Record<ActivityType>]) -> Self {
        Self::new(
            ReferenceKind::ActivityTypes,
            records.iter().map(|r| r.data.name.clone()).collect(),
        )
    }

    /// Whether `value` is a member of the list.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// The set of reference lists loaded so far in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceLists {
    lists: BTreeMap<ReferenceKind, ReferenceList>,
}

impl ReferenceLists {
    /// Add or replace a list.
    pub fn insert(&mut self, list: ReferenceList) {
        self.lists.insert(list.kind, list);
    }

    /// The list of the given kind, if loaded.
    pub fn get(&self, kind: ReferenceKind) -> Option<&ReferenceList> {
        self.lists.get(&kind)
    }

    /// Membership test. `None` when the list has not been loaded.
    pub fn contains(&self, kind: ReferenceKind, value: &str) -> Option<bool> {
        self.get(kind).map(|list| list.contains(value))
    }

    /// Whether no list has been loaded.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RecordId;

    fn activity(id: i64, name: &str) -> Record<ActivityType> {
        Record::new(
            RecordId::new(id),
            ActivityType {
                name: name.to_string(),
                description: None,
            },
        )
    }

    #[test]
    fn builds_activity_type_list_in_order() {
        let list = ReferenceList::from_activity_types(&[
            activity(1, "ПРОЕКТИРОВАНИЕ"),
            activity(2, "ХИМИЯ"),
            activity(3, "ФАРМАЦЕВТИКА"),
        ]);
        assert_eq!(list.kind, ReferenceKind::ActivityTypes);
        assert_eq!(list.values, vec!["ПРОЕКТИРОВАНИЕ", "ХИМИЯ", "ФАРМАЦЕВТИКА"]);
        assert!(list.contains("ХИМИЯ"));
        assert!(!list.contains("химия"));
    }

    #[test]
    fn unloaded_list_answers_none() {
        let mut refs = ReferenceLists::default();
        assert!(refs.is_empty());
        assert_eq!(refs.contains(ReferenceKind::Managers, "X"), None);

        refs.insert(ReferenceList::new(ReferenceKind::Managers, vec!["X".into()]));
        assert_eq!(refs.contains(ReferenceKind::Managers, "X"), Some(true));
        assert_eq!(refs.contains(ReferenceKind::Managers, "Y"), Some(false));
        assert_eq!(refs.contains(ReferenceKind::ActivityTypes, "X"), None);
    }

    #[test]
    fn insert_replaces_existing_list() {
        let mut refs = ReferenceLists::default();
        refs.insert(ReferenceList::new(ReferenceKind::Managers, vec!["Old".into()]));
        refs.insert(ReferenceList::new(ReferenceKind::Managers, vec!["New".into()]));
        assert_eq!(refs.contains(ReferenceKind::Managers, "Old"), Some(false));
        assert_eq!(refs.contains(ReferenceKind::Managers, "New"), Some(true));
    }
}
