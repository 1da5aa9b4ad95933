use crate::cursor::Cursor;
use crate::error::ScanError;
use crate::value::{RawRow, Value};

/// Drain `cursor` into memory, one [`RawRow`] per cursor row.
///
/// Column names are read once. The cursor is left open.
pub fn extract_rows<C: Cursor + ?Sized>(cursor: &mut C) -> Result<Vec<RawRow>, ScanError> {
    let columns = cursor.columns().map_err(ScanError::cursor)?;
    let mut slots = vec![Value::Null; columns.len()];
    let mut rows = Vec::new();

    while cursor.advance() {
        cursor.scan(&mut slots).map_err(ScanError::cursor)?;

        let mut row = RawRow::with_capacity(columns.len());
        for (name, slot) in columns.iter().zip(slots.iter_mut()) {
            row.insert(name.as_str(), std::mem::take(slot));
        }
        rows.push(row);
    }

    tracing::debug!(columns = columns.len(), rows = rows.len(), "rows extracted");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::MemoryCursor;
    use crate::error::ErrorKind;

    #[test]
    fn rows_keep_cursor_order() {
        let mut cursor = MemoryCursor::new(["id", "name"])
            .with_row([Value::Int64(1), Value::from("Alice")])
            .with_row([Value::Int64(2), Value::from("Bob")]);

        let rows = extract_rows(&mut cursor).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&Value::Int64(1)));
        assert_eq!(rows[1].get("name"), Some(&Value::from("Bob")));
        assert!(!cursor.is_closed());
    }

    #[test]
    fn empty_result_set() {
        let mut cursor = MemoryCursor::new(["id"]);
        assert!(extract_rows(&mut cursor).unwrap().is_empty());
    }

    #[test]
    fn duplicate_column_names_keep_last() {
        let mut cursor = MemoryCursor::new(["id", "id"]).with_row([1i64, 2i64]);
        let rows = extract_rows(&mut cursor).unwrap();
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0].get("id"), Some(&Value::Int64(2)));
    }

    #[test]
    fn null_slots_do_not_leak_between_rows() {
        let mut cursor = MemoryCursor::new(["v"])
            .with_row([Value::Int64(1)])
            .with_row([Value::Null]);
        let rows = extract_rows(&mut cursor).unwrap();
        assert_eq!(rows[1].get("v"), Some(&Value::Null));
    }

    #[test]
    fn scan_failure_aborts() {
        let mut cursor = MemoryCursor::new(["a", "b"])
            .with_row([1i64, 2i64])
            .with_row([3i64]);
        let err = extract_rows(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cursor);
    }

    #[test]
    fn column_failure_aborts() {
        let mut cursor = MemoryCursor::new(["a"]).with_row([1i64]);
        cursor.close().unwrap();
        assert_eq!(extract_rows(&mut cursor).unwrap_err().kind(), ErrorKind::Cursor);
    }
}
