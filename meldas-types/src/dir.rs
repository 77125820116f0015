//! Directory listing entries
//!
//! The directory scan returns one tab-delimited record per entry. Folder
//! records carry `name\tsize`, file records `name\tsize\tcomment` (the
//! comment may be absent). Sizes are reported to callers with thousands
//! separators, as the controller's own screens show them.

use crate::error::{Error, Result};

/// Whether a listing entry is a folder or a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

/// One entry from a controller directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub kind: EntryKind,
    pub name: String,
    /// Size formatted with thousands separators, e.g. `"1,234"`
    pub size: String,
    /// Free-form comment; folders never carry one
    pub comment: Option<String>,
}

impl DirEntry {
    /// Parse a tab-delimited scan record
    pub fn parse(kind: EntryKind, record: &str) -> Result<Self> {
        let mut fields = record.split('\t');
        let name = fields
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::MalformedRecord(record.to_owned()))?
            .to_owned();
        let size = fields
            .next()
            .and_then(|size| size.trim().parse::<u64>().ok())
            .map(format_size)
            .ok_or_else(|| Error::MalformedRecord(record.to_owned()))?;
        let comment = match kind {
            EntryKind::Folder => None,
            EntryKind::File => fields.next().filter(|c| !c.is_empty()).map(str::to_owned),
        };
        Ok(Self {
            kind,
            name,
            size,
            comment,
        })
    }
}

/// Format a byte count with `,` group separators
pub fn format_size(size: u64) -> String {
    let digits = size.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
