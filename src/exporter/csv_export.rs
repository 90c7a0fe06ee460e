use crate::model::{ExportError, MarketRecord};
use std::fs::File;
use std::path::Path;

pub const CSV_HEADER: [&str; 5] = ["name", "symbol", "price", "market_cap", "change_24h"];

/// Header row first, even when there are no records.
pub fn write_csv(path: &Path, records: &[MarketRecord]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
pub fn read_csv(path: &Path) -> Result<Vec<MarketRecord>, ExportError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let records = rdr.deserialize().collect::<Result<Vec<MarketRecord>, _>>()?;
    Ok(records)
}
