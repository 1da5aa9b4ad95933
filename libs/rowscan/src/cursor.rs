use crate::value::Value;

/// Forward-only result set, as exposed by a database driver.
///
/// The scan engine only calls `columns`, `advance` and `scan`; closing the
/// cursor stays with whoever opened it.
pub trait Cursor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Release driver resources.
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Ordered column names of the current result set.
    fn columns(&self) -> Result<Vec<String>, Self::Error>;

    /// Move to the next row. Returns `false` once rows are exhausted.
    fn advance(&mut self) -> bool;

    /// Fill one slot per column with the current row's values.
    fn scan(&mut self, slots: &mut [Value]) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryCursorError {
    #[error("cursor is closed")]
    Closed,

    #[error("scan called without a current row")]
    NoCurrentRow,

    #[error("expected {expected} scan slots, got {got}")]
    ArityMismatch { expected: usize, got: usize },
}

/// Cursor over a result set held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    /// Index of the current row; `None` before the first `advance`.
    position: Option<usize>,
    closed: bool,
}

impl MemoryCursor {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Append a row. Its length is only checked when the row is scanned.
    pub fn with_row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn current(&self) -> Option<&Vec<Value>> {
        self.position.and_then(|i| self.rows.get(i))
    }
}

impl Cursor for MemoryCursor {
    type Error = MemoryCursorError;

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed = true;
        Ok(())
    }

    fn columns(&self) -> Result<Vec<String>, Self::Error> {
        if self.closed {
            return Err(MemoryCursorError::Closed);
        }
        Ok(self.columns.clone())
    }

    fn advance(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let next = self.position.map_or(0, |i| i + 1);
        // Park one past the end so later calls keep returning false.
        self.position = Some(next.min(self.rows.len()));
        next < self.rows.len()
    }

    fn scan(&mut self, slots: &mut [Value]) -> Result<(), Self::Error> {
        if self.closed {
            return Err(MemoryCursorError::Closed);
        }
        let row = self.current().ok_or(MemoryCursorError::NoCurrentRow)?;
        if row.len() != slots.len() {
            return Err(MemoryCursorError::ArityMismatch {
                expected: row.len(),
                got: slots.len(),
            });
        }
        slots.clone_from_slice(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_through_rows_once() {
        let mut cursor = MemoryCursor::new(["id"]).with_row([1i64]).with_row([2i64]);
        let mut slots = vec![Value::Null];

        assert!(cursor.advance());
        cursor.scan(&mut slots).unwrap();
        assert_eq!(slots[0], Value::Int64(1));

        assert!(cursor.advance());
        cursor.scan(&mut slots).unwrap();
        assert_eq!(slots[0], Value::Int64(2));

        assert!(!cursor.advance());
        assert!(!cursor.advance());
        assert!(matches!(cursor.scan(&mut slots), Err(MemoryCursorError::NoCurrentRow)));
    }

    #[test]
    fn scan_before_advance_fails() {
        let mut cursor = MemoryCursor::new(["id"]).with_row([1i64]);
        let mut slots = vec![Value::Null];
        assert!(matches!(cursor.scan(&mut slots), Err(MemoryCursorError::NoCurrentRow)));
    }

    #[test]
    fn scan_checks_arity() {
        let mut cursor = MemoryCursor::new(["a", "b"]).with_row([1i64]);
        let mut slots = vec![Value::Null, Value::Null];
        assert!(cursor.advance());
        assert!(matches!(
            cursor.scan(&mut slots),
            Err(MemoryCursorError::ArityMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn closed_cursor_refuses_work() {
        let mut cursor = MemoryCursor::new(["id"]).with_row([1i64]);
        cursor.close().unwrap();
        assert!(cursor.is_closed());
        assert!(matches!(cursor.columns(), Err(MemoryCursorError::Closed)));
        assert!(!cursor.advance());
    }
}
