use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

use crate::store::{Row, ScanRequest, StoreError, TableStore};

enum Cursor {
    Start,
    After(Row),
    Exhausted,
}

/// Lazily scan `store`, following continuation keys until the table is exhausted.
///
/// The stream is forward-only; calling `scan` again starts a fresh pass from the
/// beginning of the table.
pub fn scan<'a, S>(
    store: &'a S,
    request: ScanRequest,
) -> impl Stream<Item = Result<Row, StoreError>> + Send + 'a
where
    S: TableStore + ?Sized,
{
    stream::try_unfold(Cursor::Start, move |cursor| {
        let request = request.clone();
        async move {
            let start_key = match cursor {
                Cursor::Start => None,
                Cursor::After(key) => Some(key),
                Cursor::Exhausted => return Ok::<_, StoreError>(None),
            };

            let page = store.scan_page(&request, start_key).await?;
            debug!(
                "Scanned page of {} rows from {}, more: {}",
                page.rows.len(),
                store.table_name(),
                page.last_evaluated_key.is_some()
            );

            let next = match page.last_evaluated_key {
                Some(key) => Cursor::After(key),
                None => Cursor::Exhausted,
            };
            Ok::<_, StoreError>(Some((page.rows, next)))
        }
    })
    .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<Row, StoreError>)))
    .try_flatten()
}
