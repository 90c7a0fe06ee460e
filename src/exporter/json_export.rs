use crate::model::{ExportError, Report};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write_json(path: &Path, report: &Report) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
pub fn read_json(path: &Path) -> Result<Report, ExportError> {
    let reader = std::io::BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
