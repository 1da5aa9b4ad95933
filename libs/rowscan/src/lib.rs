//! Binds rows fetched from a database cursor into typed records.
//!
//! ```ignore
//! #[derive(rowscan::Record, Default)]
//! struct User {
//!     #[tag(pg = "id")]
//!     id: i64,
//!     #[tag(pg = "name")]
//!     name: String,
//! }
//!
//! let mut users: Vec<User> = Vec::new();
//! rowscan::scan(&mut cursor, &mut users)?;
//! ```

pub mod config;
pub mod convert;
pub mod cursor;
pub mod dest;
pub mod error;
pub mod extract;
pub mod record;
pub mod scan;
pub mod value;

pub use rowscan_derive::Record;

pub use config::{DEFAULT_TAG_NAME, DEFAULT_TIME_LAYOUT, ScanOptions};
pub use convert::{FieldKind, FieldValue};
pub use cursor::{Cursor, MemoryCursor};
pub use dest::Destination;
pub use error::{ErrorKind, ScanError};
pub use extract::extract_rows;
pub use record::{FieldBinding, Record};
pub use scan::{scan, scan_with};
pub use value::{RawRow, Value, ValueKind};
