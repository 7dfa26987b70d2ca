// ── Tabular file I/O ──
//
// Raw file bytes to untyped rows, and canonical entities back to CSV or
// XLSX. Only input that is not tabular at all (undecodable text, a corrupt
// workbook) fails the file; short rows are kept with their missing cells
// left absent, so a failed import never reaches the store and a partial
// one still does.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use calamine::{Data, DataType, Reader};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use strum::{Display, EnumString, VariantNames};

use crate::error::CoreError;
use crate::normalize::{Coerced, Row, Schema};

/// Delimiters tried, in order, when sniffing a `.txt` header line.
const TXT_DELIMITERS: &[u8] = b",\t|;";

/// File formats an import may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RowFormat {
    /// Comma-separated with a header row.
    Csv,
    /// Delimited text with a header row; the delimiter is sniffed.
    Txt,
    /// Office Open XML workbook, first sheet.
    Xlsx,
    /// Legacy Excel workbook, first sheet. Import only.
    Xls,
}

impl RowFormat {
    /// Recognize a file extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Result<Self, CoreError> {
        extension
            .parse()
            .map_err(|_| CoreError::UnsupportedFormat {
                extension: extension.to_owned(),
            })
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    /// Whether rows are delimited text rather than a workbook.
    pub fn is_delimited(self) -> bool {
        matches!(self, Self::Csv | Self::Txt)
    }
}

/// Read a header-led file into rows keyed by column name.
///
/// Every value comes through as a string; blank cells, and cells missing
/// from a short row, are left out of the row so they count as absent
/// during normalization. Fully blank lines are skipped. Spreadsheets are
/// read from their first sheet, whose first row is the header.
pub fn parse_rows(bytes: &[u8], format: RowFormat) -> Result<Vec<Row>, CoreError> {
    let rows = if format.is_delimited() {
        parse_delimited(bytes, format)?
    } else {
        parse_workbook(bytes, format)?
    };
    tracing::debug!(%format, rows = rows.len(), "parsed tabular file");
    Ok(rows)
}

fn parse_err(format: RowFormat, reason: &dyn std::fmt::Display) -> CoreError {
    CoreError::ImportParse {
        format: format.to_string(),
        reason: reason.to_string(),
    }
}

/// Pick the delimiter for a file: always `,` for CSV, otherwise the first
/// candidate present in the header line.
fn sniff_delimiter(bytes: &[u8], format: RowFormat) -> u8 {
    if format != RowFormat::Txt {
        return b',';
    }
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    TXT_DELIMITERS
        .iter()
        .copied()
        .find(|d| header.contains(d))
        .unwrap_or(b',')
}

fn parse_delimited(bytes: &[u8], format: RowFormat) -> Result<Vec<Row>, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(sniff_delimiter(bytes, format))
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| parse_err(format, &e))?
        .clone();

    let mut rows = Vec::new();
    let mut short = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| parse_err(format, &e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < headers.len() {
            short += 1;
        }
        rows.push(keyed(
            headers.iter(),
            record.iter().map(|cell| (!cell.is_empty()).then(|| cell.to_owned())),
        ));
    }

    if short > 0 {
        tracing::warn!(%format, short, columns = headers.len(), "rows with missing trailing cells");
    }
    Ok(rows)
}

fn parse_workbook(bytes: &[u8], format: RowFormat) -> Result<Vec<Row>, CoreError> {
    let mut workbook =
        calamine::open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| parse_err(format, &e))?;
    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| parse_err(format, &"workbook has no sheets"))?
        .map_err(|e| parse_err(format, &e))?;

    let mut lines = sheet.rows();
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default().trim().to_owned())
        .collect();

    let rows = lines
        .map(|line| keyed(headers.iter().map(String::as_str), line.iter().map(cell_text)))
        .filter(|row| !row.is_empty())
        .collect();
    Ok(rows)
}

/// Text of one spreadsheet cell, `None` when it holds nothing usable.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => (!s.is_empty()).then(|| s.clone()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(_) => cell.as_datetime().map(|dt| dt.and_utc().to_rfc3339()),
    }
}

/// Pair header names with cells; unnamed columns and absent cells are
/// dropped.
fn keyed<'h>(
    headers: impl Iterator<Item = &'h str>,
    cells: impl Iterator<Item = Option<String>>,
) -> Row {
    headers
        .zip(cells)
        .filter(|(name, _)| !name.is_empty())
        .filter_map(|(name, cell)| cell.map(|text| (name.to_owned(), Value::String(text))))
        .collect()
}

/// Render entities as CSV, columns in canonical field order.
pub fn export_csv<T: Schema>(items: &[Arc<T>]) -> Result<String, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let export_err = |reason: String| CoreError::Export { reason };

    writer
        .write_record(T::FIELDS.iter().map(|f| f.field))
        .map_err(|e| export_err(e.to_string()))?;

    for item in items {
        let coerced = item.to_row();
        let cells = T::FIELDS.iter().map(|f| {
            coerced
                .get(f.field)
                .map(Coerced::to_cell)
                .unwrap_or_default()
        });
        writer
            .write_record(cells)
            .map_err(|e| export_err(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| export_err(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| export_err(e.to_string()))?;
    tracing::debug!(kind = %T::KIND, rows = items.len(), "exported csv");
    Ok(text)
}

/// Render entities as a single-sheet XLSX workbook, columns in canonical
/// field order. Numbers and flags keep their cell types; everything else
/// is written as text.
pub fn export_xlsx<T: Schema>(items: &[Arc<T>]) -> Result<Vec<u8>, CoreError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(T::KIND.to_string())?;

    for (col, field) in T::FIELDS.iter().enumerate() {
        sheet.write_string(0, column(col)?, field.field)?;
    }

    for (index, item) in items.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|e| CoreError::Export {
            reason: e.to_string(),
        })?;
        let coerced = item.to_row();
        for (col, field) in T::FIELDS.iter().enumerate() {
            let col = column(col)?;
            match coerced.get(field.field) {
                None => {}
                Some(Coerced::Number(n)) => {
                    sheet.write_number(row, col, *n)?;
                }
                Some(Coerced::Flag(b)) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Some(other) => {
                    sheet.write_string(row, col, other.to_cell())?;
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(kind = %T::KIND, rows = items.len(), "exported xlsx");
    Ok(bytes)
}

fn column(index: usize) -> Result<u16, CoreError> {
    u16::try_from(index).map_err(|e| CoreError::Export {
        reason: e.to_string(),
    })
}

/// Export in the format implied by a file name.
pub fn export<T: Schema>(items: &[Arc<T>], format: RowFormat) -> Result<Vec<u8>, CoreError> {
    match format {
        RowFormat::Csv | RowFormat::Txt => export_csv(items).map(String::into_bytes),
        RowFormat::Xlsx => export_xlsx(items),
        RowFormat::Xls => Err(CoreError::UnsupportedFormat {
            extension: format.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Alarm, AlarmStatus, NetworkRecord, Vendor};
    use crate::normalize::normalize;

    fn text(value: &str) -> Value {
        Value::String(value.into())
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(RowFormat::from_extension("CSV").unwrap(), RowFormat::Csv);
        assert_eq!(
            RowFormat::from_path(Path::new("/tmp/alarms.Txt")).unwrap(),
            RowFormat::Txt
        );
        assert_eq!(RowFormat::from_extension("xls").unwrap(), RowFormat::Xls);
        assert!(matches!(
            RowFormat::from_extension("json"),
            Err(CoreError::UnsupportedFormat { .. })
        ));
        assert!(RowFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn parse_rows_keys_by_header() {
        let text_file = "id,status,vendor\nA-1,Critical,Huawei\nA-2,,Nokia\n";
        let rows = parse_rows(text_file.as_bytes(), RowFormat::Csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["status"], text("Critical"));
        assert!(!rows[1].contains_key("status"));
        assert_eq!(rows[1]["vendor"], text("Nokia"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text_file = "id,status\nA-1,Major\n,\n\nA-2,Minor\n";
        let rows = parse_rows(text_file.as_bytes(), RowFormat::Txt).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn short_rows_keep_their_cells() {
        let text_file = "id,status,vendor\nA1,Critical,Huawei\nA2,Major\n";
        let rows = parse_rows(text_file.as_bytes(), RowFormat::Csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], text("A2"));
        assert_eq!(rows[1]["status"], text("Major"));
        assert!(!rows[1].contains_key("vendor"));

        let alarms = normalize::<Alarm>(&rows);
        assert_eq!(alarms.entities[1].vendor, Vendor::Ericsson);
        assert_eq!(alarms.diagnostics.fallbacks_for("vendor"), 1);
    }

    #[test]
    fn extra_cells_without_header_are_dropped() {
        let rows = parse_rows(b"id,status\nA-1,Minor,stray\n", RowFormat::Csv).unwrap();
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn invalid_utf8_fails() {
        let bytes = b"id,status\n\xff\xfe,Major\n";
        assert!(matches!(
            parse_rows(bytes, RowFormat::Csv),
            Err(CoreError::ImportParse { ref format, .. }) if format == "csv"
        ));
    }

    #[test]
    fn txt_delimiter_is_sniffed_from_header() {
        let tabbed = parse_rows(b"id\tstatus\tvendor\nA1\tCritical\tHuawei\n", RowFormat::Txt)
            .unwrap();
        assert_eq!(tabbed[0]["status"], text("Critical"));
        assert_eq!(tabbed[0]["vendor"], text("Huawei"));

        let piped = parse_rows(b"id|region\nS-1|North\n", RowFormat::Txt).unwrap();
        assert_eq!(piped[0]["region"], text("North"));

        let semi = parse_rows(b"id;availability\nS-1;99,5\n", RowFormat::Txt).unwrap();
        assert_eq!(semi[0]["availability"], text("99,5"));
    }

    #[test]
    fn csv_never_sniffs() {
        let rows = parse_rows(b"id\tstatus\nA1\tMajor\n", RowFormat::Csv).unwrap();
        assert!(rows[0].contains_key("id\tstatus"));
    }

    #[test]
    fn corrupt_workbook_fails() {
        for format in [RowFormat::Xlsx, RowFormat::Xls] {
            assert!(matches!(
                parse_rows(b"PK\x03\x04 not a workbook", format),
                Err(CoreError::ImportParse { .. })
            ));
        }
    }

    #[test]
    fn legacy_workbooks_are_not_written() {
        let none: Vec<Arc<Alarm>> = Vec::new();
        assert!(matches!(
            export(&none, RowFormat::Xls),
            Err(CoreError::UnsupportedFormat { ref extension }) if extension == "xls"
        ));
    }

    #[test]
    fn export_header_follows_field_order() {
        let none: Vec<Arc<NetworkRecord>> = Vec::new();
        let csv = export_csv(&none).unwrap();
        assert_eq!(
            csv.trim_end(),
            "id,vendor,technology,region,siteName,availability,throughput,latency,packetLoss,timestamp"
        );
    }

    #[test]
    fn export_then_import_preserves_alarms() {
        let text_file = "id,status,vendor,siteName,description,timestamp,acknowledged\n\
                    A-1,Critical,Huawei,\"North, Tower 3\",Link down,2024-01-01T00:00:00Z,true\n";
        let rows = parse_rows(text_file.as_bytes(), RowFormat::Csv).unwrap();
        let alarms: Vec<Arc<Alarm>> = normalize::<Alarm>(&rows)
            .entities
            .into_iter()
            .map(Arc::new)
            .collect();
        assert_eq!(alarms[0].status, AlarmStatus::Critical);
        assert_eq!(alarms[0].vendor, Vendor::Huawei);
        assert_eq!(alarms[0].site_name, "North, Tower 3");
        assert_eq!(
            alarms[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );

        let exported = export_csv(&alarms).unwrap();
        let again = parse_rows(exported.as_bytes(), RowFormat::Csv).unwrap();
        let reimported = normalize::<Alarm>(&again);
        assert!(reimported.diagnostics.is_clean());
        assert_eq!(reimported.entities[0], *alarms[0]);
    }

    #[test]
    fn xlsx_export_reads_back_through_first_sheet() {
        let rows = parse_rows(
            b"id,vendor,region,siteName,availability,latency,timestamp\n\
              S-1,Nokia,West,Harbour,99.25,12,2024-03-01T08:30:00Z\n\
              S-2,Huawei,North,Ridge,0,40.5,2024-03-02\n",
            RowFormat::Csv,
        )
        .unwrap();
        let sites: Vec<Arc<NetworkRecord>> = normalize::<NetworkRecord>(&rows)
            .entities
            .into_iter()
            .map(Arc::new)
            .collect();

        let workbook = export(&sites, RowFormat::Xlsx).unwrap();
        let again = parse_rows(&workbook, RowFormat::Xlsx).unwrap();
        assert_eq!(again.len(), 2);
        assert_eq!(again[0]["availability"], text("99.25"));

        let reimported = normalize::<NetworkRecord>(&again);
        assert!(reimported.diagnostics.is_clean());
        let expected: Vec<NetworkRecord> = sites.iter().map(|s| (**s).clone()).collect();
        assert_eq!(reimported.entities, expected);
        assert_eq!(reimported.entities[1].availability, 0.0);
    }

    #[test]
    fn xlsx_export_keeps_flags() {
        let rows = parse_rows(b"id,acknowledged\nA-1,true\nA-2,false\n", RowFormat::Csv).unwrap();
        let alarms: Vec<Arc<Alarm>> = normalize::<Alarm>(&rows)
            .entities
            .into_iter()
            .map(Arc::new)
            .collect();
        let again = parse_rows(&export_xlsx(&alarms).unwrap(), RowFormat::Xlsx).unwrap();
        assert_eq!(again[0]["acknowledged"], text("true"));
        assert_eq!(again[1]["acknowledged"], text("false"));
    }
}
