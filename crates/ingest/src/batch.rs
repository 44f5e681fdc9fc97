use std::ops::Range;

/// How a batch lands in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Drop any existing table of the same name, recreate it, then insert.
    Replace,
    Append,
}

impl WriteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

/// Rows per write so that `rows * column_count` bound parameters stay within
/// `max_sql_variables`. Never less than one row.
pub fn rows_per_batch(max_sql_variables: usize, column_count: usize) -> usize {
    (max_sql_variables / column_count.max(1)).max(1)
}

/// Contiguous, ordered row ranges of at most `rows_per_batch` rows covering
/// `0..row_count`.
pub fn batch_ranges(row_count: usize, rows_per_batch: usize) -> impl Iterator<Item = Range<usize>> {
    let step = rows_per_batch.max(1);
    (0..row_count)
        .step_by(step)
        .map(move |start| start..(start + step).min(row_count))
}

#[cfg(test)]
mod tests {
    use super::{batch_ranges, rows_per_batch};

    #[test]
    fn rows_per_batch_divides_the_parameter_cap() {
        assert_eq!(rows_per_batch(900, 5), 180);
        assert_eq!(rows_per_batch(900, 1), 900);
        assert_eq!(rows_per_batch(900, 7), 128);
        assert_eq!(rows_per_batch(900, 900), 1);
    }

    #[test]
    fn rows_per_batch_never_drops_to_zero() {
        assert_eq!(rows_per_batch(900, 901), 1);
        assert_eq!(rows_per_batch(900, 5_000), 1);
    }

    #[test]
    fn batch_fits_the_cap_whenever_a_column_fits() {
        for columns in 1..=900 {
            let rows = rows_per_batch(900, columns);
            assert!(rows * columns <= 900, "{columns} columns -> {rows} rows");
        }
    }

    #[test]
    fn ranges_cover_every_row_once_in_order() {
        let ranges: Vec<_> = batch_ranges(10, 4).collect();
        assert_eq!(ranges, vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn empty_chunk_has_no_batches() {
        assert_eq!(batch_ranges(0, 180).count(), 0);
    }

    #[test]
    fn worked_example_batch_counts() {
        let per_batch = rows_per_batch(900, 5);
        assert_eq!(batch_ranges(50_000, per_batch).count(), 278);
        assert_eq!(batch_ranges(20_000, per_batch).count(), 112);
        let last = batch_ranges(50_000, per_batch).last().expect("last batch");
        assert_eq!(last.len(), 50_000 - 277 * 180);
    }
}
