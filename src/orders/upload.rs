//! Uploaded order tables (CSV/TSV and spreadsheets)
//!
//! The format is inferred from the file extension. The first non-blank row
//! must carry the canonical column names; columns are looked up by name and
//! never remapped.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Ods, Reader, Xls, Xlsb, Xlsx};
use encoding_rs::WINDOWS_1252;

use crate::models::OrderRecord;
use crate::utils::error::IngestError;
use crate::utils::parse_quantity;

use super::OrderIngestor;

pub const COL_ORDER_ID: &str = "order_id";
pub const COL_PRODUCT: &str = "product";
pub const COL_QUANTITY: &str = "quantity";
pub const COL_VESSEL: &str = "vessel_name";
pub const COL_VOYAGE: &str = "voyage_code";

/// An uploaded file as received from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }
}

/// Tabular format declared by a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Delimited text; `None` means sniff the delimiter
    Delimited(Option<u8>),
    Xlsx,
    Xls,
    Xlsb,
    Ods,
}

impl TableFormat {
    /// Infer the format from a file name
    pub fn from_file_name(file_name: &str) -> Result<Self, IngestError> {
        let extension = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Delimited(None)),
            "tsv" => Ok(Self::Delimited(Some(b'\t'))),
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "xlsb" => Ok(Self::Xlsb),
            "ods" => Ok(Self::Ods),
            _ => Err(IngestError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// Orders read from an uploaded table
#[derive(Debug, Clone)]
pub struct UploadedOrders<'a> {
    file: &'a UploadedFile,
}

impl<'a> UploadedOrders<'a> {
    pub fn new(file: &'a UploadedFile) -> Self {
        Self { file }
    }

    fn read_rows(&self, format: TableFormat) -> Result<Vec<Vec<String>>, IngestError> {
        match format {
            TableFormat::Delimited(delimiter) => read_delimited(&self.file.bytes, delimiter),
            TableFormat::Xlsx => read_spreadsheet::<Xlsx<_>>(&self.file.bytes),
            TableFormat::Xls => read_spreadsheet::<Xls<_>>(&self.file.bytes),
            TableFormat::Xlsb => read_spreadsheet::<Xlsb<_>>(&self.file.bytes),
            TableFormat::Ods => read_spreadsheet::<Ods<_>>(&self.file.bytes),
        }
    }
}

impl OrderIngestor for UploadedOrders<'_> {
    fn ingest(&self) -> Result<Vec<OrderRecord>, IngestError> {
        let format = TableFormat::from_file_name(&self.file.file_name)?;
        let rows = self.read_rows(format)?;
        let orders = rows_to_orders(rows)?;

        tracing::debug!(
            file = %self.file.file_name,
            ?format,
            orders = orders.len(),
            "Parsed uploaded orders"
        );

        Ok(orders)
    }
}

/// Positions of the canonical columns in the header row
struct ColumnMap {
    order_id: usize,
    product: usize,
    quantity: usize,
    vessel: usize,
    voyage: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Result<Self, IngestError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require =
            |name: &str| find(name).ok_or_else(|| IngestError::MissingColumn(name.to_string()));

        Ok(Self {
            order_id: require(COL_ORDER_ID)?,
            product: require(COL_PRODUCT)?,
            quantity: require(COL_QUANTITY)?,
            vessel: require(COL_VESSEL)?,
            voyage: find(COL_VOYAGE),
        })
    }
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Convert header + data rows into orders
fn rows_to_orders(rows: Vec<Vec<String>>) -> Result<Vec<OrderRecord>, IngestError> {
    let mut rows = rows.into_iter().filter(|row| !is_blank_row(row));
    let header = rows.next().ok_or(IngestError::EmptySheet)?;
    let columns = ColumnMap::from_header(&header)?;

    let cell = |row: &[String], index: usize| row.get(index).cloned().unwrap_or_default();

    Ok(rows
        .map(|row| OrderRecord {
            order_id: cell(&row, columns.order_id),
            product: cell(&row, columns.product),
            quantity: parse_quantity(&cell(&row, columns.quantity)),
            vessel_name: cell(&row, columns.vessel),
            voyage_code: columns.voyage.map(|index| cell(&row, index)),
        })
        .collect())
}

/// Decode text as UTF-8 (BOM stripped), falling back to Windows-1252
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (cow, _, _) = WINDOWS_1252.decode(bytes);
            cow.into_owned()
        }
    }
}

/// Detect the most likely field delimiter from the first lines
///
/// The candidate producing the most consistent field count (more than one
/// field) across the sample wins; comma is the fallback.
fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: &[u8] = &[b',', b';', b'\t', b'|'];
    let sample: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(10)
        .collect();

    let mut best = b',';
    let mut best_score = 0usize;

    for &delimiter in CANDIDATES {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let Some(&target) = counts.first() else {
            continue;
        };
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count();
        let score = consistent * target;
        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }

    best
}

fn read_delimited(bytes: &[u8], delimiter: Option<u8>) -> Result<Vec<Vec<String>>, IngestError> {
    let content = decode_text(bytes);
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(IngestError::from)
        })
        .collect()
}

/// Read the first worksheet of a spreadsheet as text rows
fn read_spreadsheet<R>(bytes: &[u8]) -> Result<Vec<Vec<String>>, IngestError>
where
    R: Reader<Cursor<Vec<u8>>>,
{
    let mut workbook = R::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| IngestError::Spreadsheet(format!("{e:?}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptySheet)?
        .map_err(|e| IngestError::Spreadsheet(format!("{e:?}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
