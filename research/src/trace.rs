use std::io;

use bradley_terry::{TraceRow, TraceSink};

/// Writes a convergence trace as CSV, with the header
/// `iteration,max_diff,p0,...` before the first row.
pub struct CsvTrace<W: io::Write> {
    writer: csv::Writer<W>,
    wrote_header: bool,
}

impl<W: io::Write> CsvTrace<W> {
    pub fn new(writer: W) -> CsvTrace<W> {
        CsvTrace {
            writer: csv::Writer::from_writer(writer),
            wrote_header: false,
        }
    }

    pub fn into_inner(self) -> Result<W, csv::IntoInnerError<csv::Writer<W>>> {
        self.writer.into_inner()
    }
}

impl<W: io::Write> TraceSink for CsvTrace<W> {
    type Error = csv::Error;

    fn record(&mut self, row: TraceRow<'_>) -> Result<(), csv::Error> {
        if !self.wrote_header {
            let mut header = vec!["iteration".to_owned(), "max_diff".to_owned()];
            header.extend((0..row.skills.len()).map(|i| format!("p{i}")));
            self.writer.write_record(&header)?;
            self.wrote_header = true;
        }

        let mut record = vec![row.iteration.to_string(), row.max_delta.to_string()];
        record.extend(row.skills.iter().map(f64::to_string));
        self.writer.write_record(&record)
    }

    fn finish(&mut self) -> Result<(), csv::Error> {
        Ok(self.writer.flush()?)
    }
}
