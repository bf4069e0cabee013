//! Size-bounded submission of cell updates.

use sheetframe_core::{GridUpdate, Worksheet};

use crate::error::FrameError;

/// Send `updates` in consecutive chunks of at most `max_batch_size` cells,
/// one request per chunk. `None` sends everything in a single request.
///
/// A failed chunk stops the submission and is reported with its position;
/// chunks already sent stay applied. Returns the number of requests sent.
pub fn submit<W: Worksheet + ?Sized>(
    sheet: &mut W,
    updates: &[GridUpdate],
    max_batch_size: Option<usize>,
) -> Result<usize, FrameError> {
    if updates.is_empty() {
        return Ok(0);
    }
    let size = match max_batch_size {
        Some(0) => return Err(FrameError::Config("cell update batch size must be at least 1".into())),
        Some(n) => n,
        None => updates.len(),
    };

    let total = updates.len().div_ceil(size);
    log::debug!(
        "{} cell updates to send, will send {} batch(es) of {} cells maximum",
        updates.len(),
        total,
        size
    );

    for (i, chunk) in updates.chunks(size).enumerate() {
        let batch = i + 1;
        log::debug!("Sending batch {} of {} ({} cells)", batch, total, chunk.len());
        sheet
            .update_cells(chunk)
            .map_err(|source| FrameError::Batch { batch, total, source })?;
    }

    log::debug!("{} total update batch(es) sent", total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetframe_core::{MemoryWorksheet, SheetError};

    fn updates(n: usize) -> Vec<GridUpdate> {
        (1..=n).map(|r| GridUpdate::new(r, 1, format!("v{}", r))).collect()
    }

    #[test]
    fn test_single_request_without_limit() {
        let mut sheet = MemoryWorksheet::new("t", 10, 1);
        assert_eq!(submit(&mut sheet, &updates(10), None).unwrap(), 1);
        assert_eq!(sheet.update_calls(), vec![10]);
    }

    #[test]
    fn test_chunks_never_exceed_limit() {
        let mut sheet = MemoryWorksheet::new("t", 10, 1);
        assert_eq!(submit(&mut sheet, &updates(10), Some(4)).unwrap(), 3);
        assert_eq!(sheet.update_calls(), vec![4, 4, 2]);
        assert_eq!(sheet.cell(10, 1), Some("v10"));
    }

    #[test]
    fn test_failed_chunk_keeps_earlier_chunks() {
        // Rows 5.. are out of bounds, so the second chunk is rejected.
        let mut sheet = MemoryWorksheet::new("t", 4, 1);
        let err = submit(&mut sheet, &updates(6), Some(3)).unwrap_err();

        match err {
            FrameError::Batch { batch, total, source } => {
                assert_eq!((batch, total), (2, 2));
                assert!(matches!(source, SheetError::Validation(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(sheet.cell(3, 1), Some("v3"));
        assert_eq!(sheet.cell(4, 1), None);
    }

    #[test]
    fn test_empty_and_zero_limit() {
        let mut sheet = MemoryWorksheet::new("t", 1, 1);
        assert_eq!(submit(&mut sheet, &[], Some(5)).unwrap(), 0);
        assert!(sheet.calls().is_empty());
        assert!(matches!(submit(&mut sheet, &updates(1), Some(0)), Err(FrameError::Config(_))));
    }
}
