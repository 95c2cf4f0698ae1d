//! Filtered and sorted views over grid rows.
//!
//! Views never change the rows themselves. Filters are case-insensitive
//! substring matches on filterable columns; sorting is stable and only
//! allowed on sortable columns. Empty cells come first in either direction.

use std::cmp::Ordering;

use fabrika_core::{Entity, FieldValue, Record, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub needle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

/// Column filters plus an optional sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub filters: Vec<FieldFilter>,
    pub sort: Option<SortKey>,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows whose `field` contains `needle`, ignoring case.
    pub fn filter(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            needle: needle.into(),
        });
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortKey {
            field: field.into(),
            order,
        });
        self
    }

    /// Check every named column exists and allows the requested operation.
    pub fn validate<E: Entity>(&self) -> Result<(), ValidationError> {
        for filter in &self.filters {
            if !E::field_spec(&filter.field)?.filterable {
                return Err(ValidationError::NotFilterable(filter.field.clone()));
            }
        }
        if let Some(sort) = &self.sort {
            if !E::field_spec(&sort.field)?.sortable {
                return Err(ValidationError::NotSortable(sort.field.clone()));
            }
        }
        Ok(())
    }

    /// Select and order rows.
    pub fn apply<'a, E: Entity>(
        &self,
        rows: &'a [Record<E>],
    ) -> Result<Vec<&'a Record<E>>, ValidationError> {
        self.validate::<E>()?;
        let needles: Vec<(&str, String)> = self
            .filters
            .iter()
            .map(|f| (f.field.as_str(), f.needle.trim().to_lowercase()))
            .collect();

        let mut selected: Vec<&Record<E>> = rows
            .iter()
            .filter(|row| {
                needles.iter().all(|(field, needle)| {
                    needle.is_empty()
                        || row
                            .get(field)
                            .is_some_and(|v| v.contains_lowercase(needle))
                })
            })
            .collect();

        if let Some(sort) = &self.sort {
            selected.sort_by(|a, b| {
                let x = a.get(&sort.field).unwrap_or(FieldValue::Null);
                let y = b.get(&sort.field).unwrap_or(FieldValue::Null);
                match (x.is_null(), y.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => match sort.order {
                        SortOrder::Ascending => x.sort_cmp(&y),
                        SortOrder::Descending => y.sort_cmp(&x),
                    },
                }
            });
        }
        Ok(selected)
    }
}
