use std::path::Path;

use anyhow::Context;
use fs_err::File;

use crate::mojo::schema::MovieRecord;

/// Writer for the record interchange CSV. The header row comes from the
/// record schema and is written together with the first record.
pub fn records_writer(path: &Path) -> anyhow::Result<csv::Writer<File>> {
    Ok(csv::Writer::from_writer(File::create(path)?))
}

pub fn write_records(path: &Path, records: &[MovieRecord]) -> anyhow::Result<()> {
    let mut writer = records_writer(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    Ok(writer.flush()?)
}

pub fn read_records(path: &Path) -> anyhow::Result<Vec<MovieRecord>> {
    (|| -> anyhow::Result<_> {
        let mut reader = csv::Reader::from_reader(File::open(path)?);
        Ok(reader.deserialize().collect::<Result<Vec<_>, _>>()?)
    })()
    .with_context(|| format!("while reading records from {path:?}"))
}
