//! Spreadsheets (xlsx, xlsm, xlsb, xls, ods)

use crate::error::ExtractError;
use crate::extractor::{TextExtractor, TextUnits};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use patrol_domain::TextUnit;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Emits one text unit per non-empty cell, sheet by sheet
///
/// Units are labelled `Sheet!A1`. Sheets are only parsed when the consumer
/// reaches them.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetExtractor;

impl TextExtractor for SpreadsheetExtractor {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        let workbook = open_workbook_auto(path)?;
        let sheets = workbook.sheet_names();
        debug!("{} has {} sheet(s)", path.display(), sheets.len());

        Ok(Box::new(WorkbookCells {
            workbook,
            sheets: sheets.into_iter(),
            current: None,
        }))
    }
}

/// Lazy walk over the cells of every sheet
struct WorkbookCells {
    workbook: Sheets<BufReader<File>>,
    sheets: std::vec::IntoIter<String>,
    current: Option<std::vec::IntoIter<TextUnit>>,
}

impl Iterator for WorkbookCells {
    type Item = Result<TextUnit, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cell) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Ok(cell));
            }

            let sheet = self.sheets.next()?;
            match self.workbook.worksheet_range(&sheet) {
                Ok(range) => self.current = Some(cell_units(&sheet, &range).into_iter()),
                Err(e) => {
                    self.current = None;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

fn cell_units(sheet: &str, range: &Range<Data>) -> Vec<TextUnit> {
    range
        .used_cells()
        .filter(|(_, _, value)| !matches!(value, Data::Empty))
        .map(|(row, col, value)| {
            let (abs_row, abs_col) = match range.start() {
                Some((r, c)) => (r as usize + row, c as usize + col),
                None => (row, col),
            };
            TextUnit::new(
                format!("{}!{}{}", sheet, column_name(abs_col), abs_row + 1),
                value.to_string(),
            )
        })
        .filter(|unit| !unit.text.is_empty())
        .collect()
}

/// Spreadsheet column letters for a zero-based index (0 → A, 26 → AA)
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn test_cell_units_skip_empty() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("user".to_string()));
        range.set_value((0, 1), Data::String("password".to_string()));
        range.set_value((1, 1), Data::String("hunter2".to_string()));

        let units = cell_units("Creds", &range);
        let labels: Vec<&str> = units.iter().map(|u| u.label.as_str()).collect();
        assert_eq!(labels, vec!["Creds!A1", "Creds!B1", "Creds!B2"]);
        assert_eq!(units[2].text, "hunter2");
    }

    #[test]
    fn test_offset_range_labels() {
        let mut range: Range<Data> = Range::new((2, 3), (2, 3));
        range.set_value((2, 3), Data::Int(42));

        let units = cell_units("S", &range);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].label, "S!D3");
        assert_eq!(units[0].text, "42");
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.xlsx");
        std::fs::write(&path, b"plain text pretending").unwrap();
        assert!(SpreadsheetExtractor.units(&path).is_err());
    }
}
