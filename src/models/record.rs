//! Rows extracted from the upstream result table.

use serde::{Deserialize, Serialize};

/// One row of upstream data.
///
/// Columns arrive in the fixed order mobile, name, cnic, address. A field is
/// `None` when the source row stopped short of that column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub mobile: Option<String>,
    pub name: Option<String>,
    pub cnic: Option<String>,
    pub address: Option<String>,
}

impl Record {
    /// Build a record from cell texts in column order.
    pub fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        Self {
            mobile: cells.next(),
            name: cells.next(),
            cnic: cells.next(),
            address: cells.next(),
        }
    }
}
