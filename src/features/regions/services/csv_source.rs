use std::io;
use std::path::Path;

use crate::features::regions::services::batch_loader::SourceRow;

/// CSV reader for a headerless `code,name` file.
///
/// Records of any length are accepted here; rows without exactly two fields
/// are dropped later by the loader.
pub fn region_csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

/// Open a region CSV file
pub fn open_region_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, csv::Error> {
    let file = std::fs::File::open(path)?;
    Ok(region_csv_reader(file))
}

/// Iterate the records of a region CSV as raw rows.
///
/// Records that are not valid UTF-8 are malformed rows: they are logged and
/// skipped. Any other error (I/O) is yielded to the caller.
pub fn region_rows<R: io::Read>(
    reader: csv::Reader<R>,
) -> impl Iterator<Item = Result<SourceRow, csv::Error>> {
    reader
        .into_records()
        .filter_map(|result| match result {
            Ok(record) => Some(Ok(record.iter().map(str::to_string).collect())),
            Err(err) => {
                if let csv::ErrorKind::Utf8 { pos, .. } = err.kind() {
                    tracing::warn!(
                        "Skipping non UTF-8 row at line {}",
                        pos.as_ref().map(|p| p.line()).unwrap_or_default()
                    );
                    return None;
                }
                Some(Err(err))
            }
        })
}
