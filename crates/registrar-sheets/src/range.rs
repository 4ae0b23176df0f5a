use crate::error::{Result, SheetError};
use crate::service::Row;

/// Inclusive zero-based column bounds of an A1 range such as `Sheet!B:B`.
/// Only built by `parse`, which guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    start: usize,
    end: usize,
}

impl ColumnSpan {
    pub fn parse(range: &str) -> Result<Self> {
        let cells = range.rsplit_once('!').map_or(range, |(_, cells)| cells);
        let (start, end) = cells.split_once(':').unwrap_or((cells, cells));
        let start = column_index(start).ok_or_else(|| invalid(range))?;
        let end = column_index(end).ok_or_else(|| invalid(range))?;
        if end < start {
            return Err(invalid(range));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn slice(&self, row: &Row) -> Row {
        row.iter()
            .skip(self.start)
            .take(self.width())
            .cloned()
            .collect()
    }
}

fn column_index(cell: &str) -> Option<usize> {
    let letters: String = cell
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for ch in letters.chars() {
        let value = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(value)?;
    }
    Some(index - 1)
}

fn invalid(range: &str) -> SheetError {
    SheetError::InvalidRange(range.to_string())
}
