use std::ops::Range;

use crate::{data::Row, error::ConvertError};

/// A contiguous slice of the mapped rows, emitted together as one SQL file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch<'a> {
    /// 1-based position in the run.
    pub index: usize,
    /// 0-based offset of the first row within the whole row set.
    pub start: usize,
    pub rows: &'a [Row],
}

impl Batch<'_> {
    pub fn is_first(&self) -> bool {
        self.index == 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row positions covered, 0-based and end-exclusive.
    pub fn span(&self) -> Range<usize> {
        self.start..self.start + self.rows.len()
    }
}

pub fn validate_batch_size(batch_size: usize) -> Result<(), ConvertError> {
    if batch_size == 0 {
        Err(ConvertError::InvalidBatchSize(batch_size))
    } else {
        Ok(())
    }
}

pub fn batch_count(row_count: usize, batch_size: usize) -> usize {
    row_count.div_ceil(batch_size)
}

/// Splits `rows` into consecutive batches of at most `batch_size` rows.
pub fn partition(rows: &[Row], batch_size: usize) -> Result<Vec<Batch<'_>>, ConvertError> {
    validate_batch_size(batch_size)?;
    Ok(rows
        .chunks(batch_size)
        .enumerate()
        .map(|(idx, chunk)| Batch {
            index: idx + 1,
            start: idx * batch_size,
            rows: chunk,
        })
        .collect())
}
