use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::value::RawRow;

/// Something scan results can be written into.
///
/// Three shapes exist:
/// - a record (derived via `#[derive(Record)]`), bound from one row;
/// - `Option<D>` / `Box<D>`, indirection resolved down to a record, allocating
///   `Default` values where the slot is empty;
/// - `Vec<D>`, one element per row.
pub trait Destination {
    /// Whether a single row can be bound into this shape.
    const RECORD: bool;

    /// Whether this destination can receive a whole result set.
    const WRITABLE: bool = Self::RECORD;

    /// Bind one row.
    fn bind_row(&mut self, row: &RawRow, options: &ScanOptions) -> Result<(), ScanError>;

    /// Write a complete result set. Single-record shapes take the first row.
    fn fill(&mut self, rows: &[RawRow], options: &ScanOptions) -> Result<(), ScanError> {
        let row = rows.first().ok_or(ScanError::EmptyResult)?;
        self.bind_row(row, options)
    }
}

impl<D: Destination + Default> Destination for Option<D> {
    const RECORD: bool = D::RECORD;

    fn bind_row(&mut self, row: &RawRow, options: &ScanOptions) -> Result<(), ScanError> {
        if !D::RECORD {
            return Err(ScanError::DestinationNotWritable);
        }
        self.get_or_insert_with(D::default).bind_row(row, options)
    }
}

impl<D: Destination> Destination for Box<D> {
    const RECORD: bool = D::RECORD;

    fn bind_row(&mut self, row: &RawRow, options: &ScanOptions) -> Result<(), ScanError> {
        (**self).bind_row(row, options)
    }
}

impl<D: Destination + Default> Destination for Vec<D> {
    const RECORD: bool = false;
    const WRITABLE: bool = D::RECORD;

    fn bind_row(&mut self, _row: &RawRow, _options: &ScanOptions) -> Result<(), ScanError> {
        Err(ScanError::DestinationNotWritable)
    }

    fn fill(&mut self, rows: &[RawRow], options: &ScanOptions) -> Result<(), ScanError> {
        bind_collection(self, rows, options)
    }
}

/// Replace `dest` with one freshly bound element per row.
///
/// With no rows, or when any row fails, `dest` is left as it was.
pub fn bind_collection<D>(
    dest: &mut Vec<D>,
    rows: &[RawRow],
    options: &ScanOptions,
) -> Result<(), ScanError>
where
    D: Destination + Default,
{
    if rows.is_empty() {
        return Ok(());
    }
    if !D::RECORD {
        return Err(ScanError::DestinationNotWritable);
    }

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let mut item = D::default();
        item.bind_row(row, options)?;
        items.push(item);
    }
    *dest = items;
    Ok(())
}
