use crate::records::row::RowData;

/// A contiguous slice of the row set processed as one unit of insertion work.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// 1-based position of the batch in the partition.
    pub number: usize,
    /// 0-based index of the first row of the batch in the full row set.
    pub offset: usize,
    pub rows: &'a [RowData],
}

impl<'a> Batch<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 1-based row number, in the full row set, of the `index`-th row of this batch.
    pub fn row_number(&self, index: usize) -> usize {
        self.offset + index + 1
    }
}

/// Splits `rows` into consecutive, non-overlapping batches of at most `size` rows.
/// A size of zero is treated as one.
pub fn partition(rows: &[RowData], size: usize) -> impl Iterator<Item = Batch<'_>> {
    let size = size.max(1);
    rows.chunks(size).enumerate().map(move |(i, chunk)| Batch {
        number: i + 1,
        offset: i * size,
        rows: chunk,
    })
}

pub fn batch_count(total_rows: usize, size: usize) -> usize {
    total_rows.div_ceil(size.max(1))
}
