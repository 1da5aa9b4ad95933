use crate::config::ScanOptions;
use crate::cursor::Cursor;
use crate::dest::Destination;
use crate::error::ScanError;
use crate::extract::extract_rows;

/// Scan every row of `cursor` into `dest` with default options.
pub fn scan<C, D>(cursor: &mut C, dest: &mut D) -> Result<(), ScanError>
where
    C: Cursor + ?Sized,
    D: Destination,
{
    scan_with(cursor, dest, &ScanOptions::default())
}

/// Scan every row of `cursor` into `dest`.
///
/// Rows are buffered in full before binding starts. A collection destination
/// is replaced by one element per row (left alone when there are none); any
/// other destination is bound from the first row and fails with
/// [`ScanError::EmptyResult`] when there is none.
///
/// The cursor is not closed.
pub fn scan_with<C, D>(cursor: &mut C, dest: &mut D, options: &ScanOptions) -> Result<(), ScanError>
where
    C: Cursor + ?Sized,
    D: Destination,
{
    if !D::WRITABLE {
        return Err(ScanError::DestinationNotWritable);
    }

    let rows = extract_rows(cursor)?;
    tracing::debug!(
        destination = std::any::type_name::<D>(),
        rows = rows.len(),
        tag = %options.tag,
        "binding rows"
    );
    dest.fill(&rows, options)
}
