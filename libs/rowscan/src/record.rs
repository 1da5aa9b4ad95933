use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::value::{RawRow, Value};

/// Column bindings declared on one record field.
///
/// `tags` pairs a tag namespace with a column name, e.g. `("pg", "user_id")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub name: &'static str,
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldBinding {
    pub const fn new(name: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, tags }
    }

    /// Column bound under `tag`. An empty column name counts as unbound.
    pub fn column(&self, tag: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, column)| *column)
            .filter(|column| !column.is_empty())
    }
}

/// A struct whose fields are filled from row columns.
///
/// Usually derived with `#[derive(Record)]`; hand-written impls list their
/// bindings and route `assign_field` to [`crate::convert::assign`].
pub trait Record {
    /// Tagged fields, in declaration order. Untagged fields are absent.
    fn bindings() -> &'static [FieldBinding];

    /// Convert `raw` into the field at `index` of [`Record::bindings`].
    fn assign_field(
        &mut self,
        index: usize,
        raw: &Value,
        options: &ScanOptions,
    ) -> Result<(), ScanError>;
}

/// Bind one row into `record` through the fields tagged for `options.tag`.
///
/// Stops at the first failing field; fields written before it keep their
/// new values.
pub fn bind_record<R: Record>(
    record: &mut R,
    row: &RawRow,
    options: &ScanOptions,
) -> Result<(), ScanError> {
    for (index, binding) in R::bindings().iter().enumerate() {
        let Some(column) = binding.column(&options.tag) else {
            tracing::trace!(field = binding.name, tag = %options.tag, "no binding, skipping");
            continue;
        };
        let Some(raw) = row.get(column) else {
            tracing::trace!(field = binding.name, column, "column not in row, skipping");
            continue;
        };
        record
            .assign_field(index, raw, options)
            .map_err(|e| e.in_field(binding.name, column))?;
    }
    Ok(())
}
