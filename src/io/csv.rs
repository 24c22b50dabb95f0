use std::io::{self, Write};
use std::path::Path;

use crate::sim::SampleRecord;

/// Write a record sequence as CSV.
///
/// Columns: time, position, setpoint, control, error
pub fn write_records<W: Write>(writer: &mut W, records: &[SampleRecord]) -> io::Result<()> {
    writeln!(writer, "time,position,setpoint,control,error")?;

    for r in records {
        writeln!(
            writer,
            "{:.4},{:.6},{:.4},{:.6},{:.6}",
            r.time, r.position, r.setpoint, r.control, r.error,
        )?;
    }

    Ok(())
}

/// Write a record sequence to a CSV file at the given path.
pub fn write_records_file(path: impl AsRef<Path>, records: &[SampleRecord]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_records(&mut file, records)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_output_has_header_and_rows() {
        let recs = vec![
            SampleRecord { time: 0.0, position: 0.0, setpoint: 10.0, control: 9.81, error: 10.0 },
            SampleRecord { time: 0.01, position: 0.2, setpoint: 10.0, control: 29.0, error: 9.8 },
        ];

        let mut buf = Vec::new();
        write_records(&mut buf, &recs).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "time,position,setpoint,control,error");
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,0.000000,10.0000,"));
    }

    #[test]
    fn file_export_writes_every_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.csv");
        let recs: Vec<SampleRecord> = (0..5)
            .map(|i| SampleRecord { time: i as f64 * 0.1, position: 1.0, setpoint: 2.0, control: 3.0, error: 1.0 })
            .collect();

        write_records_file(&path, &recs).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.ends_with('\n'));
    }
}
