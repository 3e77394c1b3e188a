// CSV table loading and aligned series extraction
use crate::model::{Series, TableError};
use crate::utils::parse_datetime;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A delimited file loaded whole: header row plus raw string cells.
/// Shared read-only across all chart computations.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| TableError::Io {
            path: display.clone(),
            source: e,
        })?;
        Self::from_reader(file, &display)
    }

    pub fn from_reader<R: Read>(reader: R, path: &str) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| TableError::Csv {
                path: path.to_string(),
                source: e,
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| TableError::Csv {
                path: path.to_string(),
                source: e,
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    fn cell(&self, row: usize, column: usize) -> Result<&str, TableError> {
        self.rows[row]
            .get(column)
            .map(String::as_str)
            .ok_or(TableError::ColumnOutOfRange {
                column,
                row,
                width: self.rows[row].len(),
            })
    }

    /// Verifies that a column index is present in every row. Out-of-range
    /// selectors are fatal and must be caught before any chart renders.
    pub fn check_column(&self, column: usize) -> Result<(), TableError> {
        for (row, cells) in self.rows.iter().enumerate() {
            if column >= cells.len() {
                return Err(TableError::ColumnOutOfRange {
                    column,
                    row,
                    width: cells.len(),
                });
            }
        }
        Ok(())
    }

    /// Parses the designated timestamp column for every row. Any cell
    /// failing to parse fails the whole run; a partial date axis would
    /// corrupt every trend fit built on it.
    pub fn timestamps(&self, column: usize) -> Result<Vec<DateTime<Utc>>, TableError> {
        let mut out = Vec::with_capacity(self.rows.len());
        for row in 0..self.rows.len() {
            let cell = self.cell(row, column)?;
            let dt = parse_datetime(cell).ok_or_else(|| TableError::TimestampParse {
                value: cell.to_string(),
                row,
                column,
            })?;
            out.push(dt);
        }
        Ok(out)
    }

    /// Extracts the value column at `column` aligned with the given date
    /// axis, producing a `Series`. No partial results: one bad cell fails
    /// the extraction naming the cell.
    pub fn extract_series(
        &self,
        dates: &[DateTime<Utc>],
        column: usize,
    ) -> Result<Series, TableError> {
        let mut values = Vec::with_capacity(self.rows.len());
        for row in 0..self.rows.len() {
            let cell = self.cell(row, column)?;
            let value = cell
                .parse::<f64>()
                .map_err(|_| TableError::ValueParse {
                    value: cell.to_string(),
                    row,
                    column,
                })?;
            values.push(value);
        }
        Ok(Series::new(dates.to_vec(), values))
    }

    /// First rows of the table for `--verbose` preview.
    pub fn head(&self, n: usize) -> String {
        let mut out = self.headers.join(",");
        for row in self.rows.iter().take(n) {
            out.push('\n');
            out.push_str(&row.join(","));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "date,weight,hdl\n\
                       2024-01-01,80.5,1.4\n\
                       2024-01-08,80.1,1.5\n\
                       2024-01-15,79.6,1.45\n";

    fn table() -> Table {
        Table::from_reader(CSV.as_bytes(), "test.csv").unwrap()
    }

    #[test]
    fn loads_headers_and_rows() {
        let t = table();
        assert_eq!(t.headers, vec!["date", "weight", "hdl"]);
        assert_eq!(t.rows.len(), 3);
    }

    #[test]
    fn extracts_aligned_series() {
        let t = table();
        let dates = t.timestamps(0).unwrap();
        let weight = t.extract_series(&dates, 1).unwrap();
        assert_eq!(weight.len(), 3);
        assert_eq!(weight.values, vec![80.5, 80.1, 79.6]);
        assert_eq!(weight.timestamps, dates);
    }

    #[test]
    fn bad_timestamp_fails_whole_extraction() {
        let csv = "date,v\n2024-01-01,1\nnot-a-date,2\n";
        let t = Table::from_reader(csv.as_bytes(), "test.csv").unwrap();
        let err = t.timestamps(0).unwrap_err();
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn bad_value_names_the_cell() {
        let csv = "date,v\n2024-01-01,abc\n";
        let t = Table::from_reader(csv.as_bytes(), "test.csv").unwrap();
        let dates = t.timestamps(0).unwrap();
        let err = t.extract_series(&dates, 1).unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn check_column_accepts_present_and_rejects_missing() {
        let t = table();
        assert!(t.check_column(2).is_ok());
        assert!(matches!(
            t.check_column(3),
            Err(TableError::ColumnOutOfRange { column: 3, .. })
        ));
    }

    #[test]
    fn column_out_of_range_is_reported() {
        let t = table();
        let dates = t.timestamps(0).unwrap();
        assert!(matches!(
            t.extract_series(&dates, 7),
            Err(TableError::ColumnOutOfRange { column: 7, .. })
        ));
    }

    #[test]
    fn empty_table_yields_empty_series() {
        let t = Table::from_reader("date,v\n".as_bytes(), "test.csv").unwrap();
        let dates = t.timestamps(0).unwrap();
        let series = t.extract_series(&dates, 1).unwrap();
        assert!(series.is_empty());
    }
}
