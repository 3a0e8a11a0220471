use crate::core::error::LoadError;
use crate::features::regions::models::{level_label, LevelCount, Region};
use crate::features::regions::services::code_parser::parse_region_code;
use crate::features::regions::services::region_store::RegionStore;
use crate::shared::constants::DEFAULT_IMPORT_BATCH_SIZE;

/// One raw input row: the fields of a CSV record
pub type SourceRow = Vec<String>;

/// Outcome of a completed import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    /// Records submitted in committed batches, including skipped conflicts
    pub total_processed: u64,
    /// Rows actually written (conflicting codes excluded)
    pub inserted: u64,
    /// Number of committed batches
    pub batches: u64,
    /// Stored regions per level after the import
    pub per_level_counts: Vec<LevelCount>,
}

impl LoadSummary {
    /// Records whose code already existed in the store
    pub fn skipped(&self) -> u64 {
        self.total_processed.saturating_sub(self.inserted)
    }

    pub fn log(&self) {
        tracing::info!(
            "Region import completed: {} records processed ({} inserted, {} already present) in {} batches",
            self.total_processed,
            self.inserted,
            self.skipped(),
            self.batches
        );
        for LevelCount { level, count } in &self.per_level_counts {
            tracing::info!("  {}: {}", level_label(*level), count);
        }
    }
}

/// Turn a raw row into a region, or `None` when the row is malformed.
///
/// A row is malformed when it does not have exactly two fields or when the
/// code or name is empty after trimming.
pub fn region_from_fields(fields: &[String]) -> Option<Region> {
    let [code, name] = fields else {
        return None;
    };

    let code = code.trim();
    let name = name.trim();
    if code.is_empty() || name.is_empty() {
        return None;
    }

    parse_region_code(code, name).ok()
}

/// Lazily parse raw rows into regions, dropping malformed rows.
///
/// Source errors are passed through untouched.
pub fn regions_from_rows<I>(rows: I) -> impl Iterator<Item = Result<Region, csv::Error>>
where
    I: IntoIterator<Item = Result<SourceRow, csv::Error>>,
{
    rows.into_iter().filter_map(|row| match row {
        Ok(fields) => region_from_fields(&fields).map(Ok),
        Err(e) => Some(Err(e)),
    })
}

/// Streams parsed regions into a [`RegionStore`] in fixed-size batches.
#[derive(Debug, Clone, Copy)]
pub struct BatchLoader {
    batch_size: usize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(DEFAULT_IMPORT_BATCH_SIZE)
    }
}

impl BatchLoader {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Load every well-formed row of `source` into `store`.
    ///
    /// Each full batch, and the final partial one, is written and committed
    /// on its own. On failure the in-flight batch is discarded, earlier
    /// batches stay committed, and the error reports how many records were
    /// committed.
    pub async fn load<S, I>(&self, store: &mut S, source: I) -> Result<LoadSummary, LoadError>
    where
        S: RegionStore + ?Sized,
        I: IntoIterator<Item = Result<SourceRow, csv::Error>>,
    {
        let mut summary = LoadSummary::default();
        let mut batch: Vec<Region> = Vec::with_capacity(self.batch_size);

        for region in regions_from_rows(source) {
            let region = region.map_err(|source| LoadError::Source {
                committed: summary.total_processed,
                source,
            })?;

            batch.push(region);
            if batch.len() >= self.batch_size {
                self.flush(store, &mut batch, &mut summary).await?;
            }
        }

        if !batch.is_empty() {
            self.flush(store, &mut batch, &mut summary).await?;
            tracing::info!("Final batch committed");
        }

        summary.per_level_counts =
            store
                .count_by_level()
                .await
                .map_err(|source| LoadError::Summary {
                    committed: summary.total_processed,
                    source,
                })?;

        Ok(summary)
    }

    async fn flush<S>(
        &self,
        store: &mut S,
        batch: &mut Vec<Region>,
        summary: &mut LoadSummary,
    ) -> Result<(), LoadError>
    where
        S: RegionStore + ?Sized,
    {
        let size = batch.len() as u64;
        let inserted = store
            .insert_batch(batch)
            .await
            .map_err(|source| LoadError::Write {
                committed: summary.total_processed,
                source,
            })?;

        summary.total_processed += size;
        summary.inserted += inserted;
        summary.batches += 1;
        batch.clear();

        tracing::info!(
            "Processed batch of {} records ({} new, total: {})",
            size,
            inserted,
            summary.total_processed
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{source_rows, MemoryRegionStore};

    fn numbered_rows(count: usize) -> Vec<Result<SourceRow, csv::Error>> {
        (0..count)
            .map(|i| {
                Ok(vec![
                    format!("11.01.02.{:04}", i),
                    format!("Desa {}", i),
                ])
            })
            .collect()
    }

    fn level_counts(summary: &LoadSummary) -> Vec<(i32, i64)> {
        summary
            .per_level_counts
            .iter()
            .map(|c| (c.level, c.count))
            .collect()
    }

    #[test]
    fn test_region_from_fields_skips_malformed_rows() {
        let row = |fields: &[&str]| -> Vec<String> { fields.iter().map(|f| f.to_string()).collect() };

        assert!(region_from_fields(&row(&["", "Empty"])).is_none());
        assert!(region_from_fields(&row(&["11", "   "])).is_none());
        assert!(region_from_fields(&row(&["a", "b", "c"])).is_none());
        assert!(region_from_fields(&row(&["11"])).is_none());

        let region = region_from_fields(&row(&[" 11.01 ", " Kab. X "])).unwrap();
        assert_eq!(region.code, "11.01");
        assert_eq!(region.name, "Kab. X");
    }

    /// `count` good rows followed by a row that must never be read
    fn rows_then_panic(count: usize) -> impl Iterator<Item = Result<SourceRow, csv::Error>> {
        numbered_rows(count)
            .into_iter()
            .chain(std::iter::once_with(|| -> Result<SourceRow, csv::Error> {
                panic!("row past the stopping point was read")
            }))
    }

    #[test]
    fn test_regions_from_rows_reads_on_demand() {
        let regions: Vec<Region> = regions_from_rows(rows_then_panic(3))
            .take(3)
            .map(Result::unwrap)
            .collect();

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[2].code, "11.01.02.0002");
    }

    #[tokio::test]
    async fn test_failed_batch_stops_reading_the_source() {
        let mut store = MemoryRegionStore::failing_on_flush(2);

        let err = BatchLoader::new(2)
            .load(&mut store, rows_then_panic(4))
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::Write { committed: 2, .. }));
        assert_eq!(store.flushes, vec![2]);
    }

    #[tokio::test]
    async fn test_small_input_is_one_flush() {
        let mut store = MemoryRegionStore::default();
        let rows = source_rows(&[&["11", "Aceh"], &["11.01", "Kab. X"]]);

        let summary = BatchLoader::default().load(&mut store, rows).await.unwrap();

        assert_eq!(store.flushes, vec![2]);
        assert_eq!(summary.total_processed, 2);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.batches, 1);
        assert_eq!(level_counts(&summary), vec![(1, 1), (2, 1)]);
    }

    #[tokio::test]
    async fn test_malformed_rows_are_not_counted() {
        let mut store = MemoryRegionStore::default();
        let rows = source_rows(&[
            &["", "Empty"],
            &["a", "b", "c"],
            &["11", "Aceh"],
            &["11.01", ""],
        ]);

        let summary = BatchLoader::default().load(&mut store, rows).await.unwrap();

        assert_eq!(summary.total_processed, 1);
        assert_eq!(store.rows.len(), 1);
        assert!(store.rows.contains_key("11"));
    }

    #[tokio::test]
    async fn test_exact_batch_size_is_one_flush() {
        let mut store = MemoryRegionStore::default();

        let summary = BatchLoader::new(5)
            .load(&mut store, numbered_rows(5))
            .await
            .unwrap();

        assert_eq!(store.flushes, vec![5]);
        assert_eq!(summary.batches, 1);
    }

    #[tokio::test]
    async fn test_one_over_batch_size_is_two_flushes() {
        let mut store = MemoryRegionStore::default();

        let summary = BatchLoader::new(5)
            .load(&mut store, numbered_rows(6))
            .await
            .unwrap();

        assert_eq!(store.flushes, vec![5, 1]);
        assert_eq!(summary.batches, 2);
        assert_eq!(summary.total_processed, 6);
    }

    #[tokio::test]
    async fn test_default_batch_size_boundary() {
        let mut store = MemoryRegionStore::default();

        BatchLoader::default()
            .load(&mut store, numbered_rows(DEFAULT_IMPORT_BATCH_SIZE + 1))
            .await
            .unwrap();

        assert_eq!(store.flushes, vec![DEFAULT_IMPORT_BATCH_SIZE, 1]);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let mut store = MemoryRegionStore::default();
        let loader = BatchLoader::new(3);

        let first = loader.load(&mut store, numbered_rows(7)).await.unwrap();
        let first_ids: Vec<_> = store.rows.values().map(|r| r.id).collect();

        let second = loader.load(&mut store, numbered_rows(7)).await.unwrap();
        let second_ids: Vec<_> = store.rows.values().map(|r| r.id).collect();

        assert_eq!(store.rows.len(), 7);
        assert_eq!(first.inserted, 7);
        assert_eq!(second.total_processed, 7);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped(), 7);
        assert_eq!(level_counts(&first), level_counts(&second));
        // First write wins
        assert_eq!(first_ids, second_ids);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_committed_batches() {
        let mut store = MemoryRegionStore::failing_on_flush(2);

        let err = BatchLoader::new(2)
            .load(&mut store, numbered_rows(5))
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::Write { committed: 2, .. }));
        assert_eq!(err.committed(), 2);
        assert_eq!(store.flushes, vec![2]);
        assert_eq!(store.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_source_error_stops_the_load() {
        let mut store = MemoryRegionStore::default();
        let io_error = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let mut rows = source_rows(&[&["11", "Aceh"], &["12", "Sumatera Utara"]]);
        rows.push(Err(csv::Error::from(io_error)));
        rows.push(Ok(vec!["13".to_string(), "Sumatera Barat".to_string()]));

        let err = BatchLoader::new(1).load(&mut store, rows).await.unwrap_err();

        assert!(matches!(err, LoadError::Source { committed: 2, .. }));
        assert_eq!(store.rows.len(), 2);
        assert!(!store.rows.contains_key("13"));
    }

    #[tokio::test]
    async fn test_summary_failure_is_reported() {
        let mut store = MemoryRegionStore {
            fail_count_query: true,
            ..Default::default()
        };

        let err = BatchLoader::default()
            .load(&mut store, numbered_rows(3))
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::Summary { committed: 3, .. }));
        assert_eq!(store.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let mut store = MemoryRegionStore::default();

        let summary = BatchLoader::default()
            .load(&mut store, Vec::<Result<SourceRow, csv::Error>>::new())
            .await
            .unwrap();

        assert!(store.flushes.is_empty());
        assert_eq!(summary, LoadSummary::default());
    }

    #[tokio::test]
    async fn test_zero_batch_size_flushes_every_record() {
        let mut store = MemoryRegionStore::default();

        BatchLoader::new(0)
            .load(&mut store, numbered_rows(3))
            .await
            .unwrap();

        assert_eq!(store.flushes, vec![1, 1, 1]);
    }
}
