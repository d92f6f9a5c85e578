use chrono::{NaiveDate, NaiveDateTime};
use contracts::domain::a001_sales_transaction::{StoreId, TransactionRecord};
use contracts::domain::a002_store::StoreDirectoryEntry;
use contracts::domain::a003_store_manager::ManagerContact;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shared::config::{DataConfig, TextEncoding};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8; set the encoding to latin-1", .path.display())]
    Encoding { path: PathBuf },

    #[error("{}: delimiter {delimiter:?} is not a single-byte character", .path.display())]
    Delimiter { path: PathBuf, delimiter: char },

    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: missing column {column}", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{} row {row}, column {column}: {reason}", .path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
        reason: String,
    },
}

/// The three input relations, straight from their files.
#[derive(Debug, Clone)]
pub struct ImportedRelations {
    pub transactions: Vec<TransactionRecord>,
    pub stores: Vec<StoreDirectoryEntry>,
    pub managers: Vec<ManagerContact>,
}

/// Accepted header spellings: the Portuguese spreadsheet names first, then
/// snake_case names.
mod columns {
    pub const STORE_ID: (&str, &[&str]) = ("store_id", &["ID Loja", "store_id"]);
    pub const STORE_NAME: (&str, &[&str]) = ("store_name", &["Loja", "store_name"]);
    pub const QUANTITY: (&str, &[&str]) = ("quantity", &["Quantidade", "quantity"]);
    pub const FINAL_VALUE: (&str, &[&str]) = ("final_value", &["Valor Final", "final_value"]);
    pub const DATE: (&str, &[&str]) = ("date", &["Data", "date"]);
    pub const SALE_CODE: (&str, &[&str]) =
        ("sale_code", &["Código Venda", "Codigo Venda", "sale_code"]);
    pub const PRODUCT: (&str, &[&str]) = ("product", &["Produto", "product"]);
    pub const MANAGER_NAME: (&str, &[&str]) = ("manager_name", &["Gerente", "manager_name"]);
    pub const MANAGER_EMAIL: (&str, &[&str]) =
        ("manager_email", &["E-mail", "Email", "manager_email"]);
}

type Column = (&'static str, &'static [&'static str]);

pub fn import_all(config: &DataConfig) -> Result<ImportedRelations, ImportError> {
    let transactions = read_transactions(&config.transactions_path, config.delimiter)?;
    let stores = read_stores(
        &config.stores_path,
        config.stores_delimiter,
        config.stores_encoding,
    )?;
    let managers = read_managers(&config.managers_path, config.delimiter)?;

    tracing::info!(
        "Imported {} transactions, {} stores, {} manager contacts",
        transactions.len(),
        stores.len(),
        managers.len()
    );

    Ok(ImportedRelations {
        transactions,
        stores,
        managers,
    })
}

pub fn read_transactions(
    path: &Path,
    delimiter: char,
) -> Result<Vec<TransactionRecord>, ImportError> {
    let text = read_text(path, TextEncoding::Utf8)?;
    parse_transactions(path, &text, delimiter)
}

pub fn read_stores(
    path: &Path,
    delimiter: char,
    encoding: TextEncoding,
) -> Result<Vec<StoreDirectoryEntry>, ImportError> {
    let text = read_text(path, encoding)?;
    parse_stores(path, &text, delimiter)
}

pub fn read_managers(path: &Path, delimiter: char) -> Result<Vec<ManagerContact>, ImportError> {
    let text = read_text(path, TextEncoding::Utf8)?;
    parse_managers(path, &text, delimiter)
}

fn read_text(path: &Path, encoding: TextEncoding) -> Result<String, ImportError> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|_| ImportError::Encoding {
            path: path.to_path_buf(),
        })?,
        // ISO-8859-1 bytes map one-to-one onto the first 256 code points
        TextEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
    };

    // Strip UTF-8 BOM if present
    Ok(text.trim_start_matches('\u{FEFF}').to_string())
}

/// Header-indexed view over one delimited text.
struct Table {
    path: PathBuf,
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
}

impl Table {
    fn parse(path: &Path, text: &str, delimiter: char) -> Result<Self, ImportError> {
        let delimiter = u8::try_from(delimiter).map_err(|_| ImportError::Delimiter {
            path: path.to_path_buf(),
            delimiter,
        })?;
        let csv_err = |source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(csv_err)?.clone();
        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;

        tracing::debug!(
            "{} headers: {:?}",
            path.display(),
            headers.iter().collect::<Vec<_>>()
        );

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            records,
        })
    }

    fn position(&self, column: Column) -> Option<usize> {
        let (_, aliases) = column;
        aliases.iter().find_map(|alias| {
            let alias = alias.to_lowercase();
            self.headers
                .iter()
                .position(|h| h.trim().to_lowercase() == alias)
        })
    }

    fn require(&self, column: Column) -> Result<usize, ImportError> {
        self.position(column).ok_or_else(|| ImportError::MissingColumn {
            path: self.path.clone(),
            column: column.0,
        })
    }

    fn invalid(&self, row: usize, column: Column, reason: impl Into<String>) -> ImportError {
        ImportError::InvalidValue {
            path: self.path.clone(),
            row,
            column: column.0,
            reason: reason.into(),
        }
    }

    /// Non-empty cell or an error naming the row and column.
    fn cell<'a>(
        &self,
        record: &'a csv::StringRecord,
        row: usize,
        index: usize,
        column: Column,
    ) -> Result<&'a str, ImportError> {
        record
            .get(index)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| self.invalid(row, column, "empty value"))
    }

    /// Data rows with their 1-based row numbers, skipping blank lines.
    fn rows(&self) -> impl Iterator<Item = (usize, &csv::StringRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.iter().any(|v| !v.is_empty()))
            .map(|(i, r)| (i + 1, r))
    }
}

fn parse_transactions(
    path: &Path,
    text: &str,
    delimiter: char,
) -> Result<Vec<TransactionRecord>, ImportError> {
    use columns::*;

    let table = Table::parse(path, text, delimiter)?;
    let store_idx = table.require(STORE_ID)?;
    let qty_idx = table.require(QUANTITY)?;
    let value_idx = table.require(FINAL_VALUE)?;
    let date_idx = table.require(DATE)?;
    let code_idx = table.position(SALE_CODE);
    let product_idx = table.position(PRODUCT);

    let optional = |record: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let mut out = Vec::with_capacity(table.records.len());
    for (row, record) in table.rows() {
        let store_id = table.cell(record, row, store_idx, STORE_ID)?;
        let quantity = parse_quantity(table.cell(record, row, qty_idx, QUANTITY)?)
            .map_err(|e| table.invalid(row, QUANTITY, e))?;
        let final_value = parse_decimal(table.cell(record, row, value_idx, FINAL_VALUE)?)
            .map_err(|e| table.invalid(row, FINAL_VALUE, e))?;
        let date = parse_date(table.cell(record, row, date_idx, DATE)?)
            .map_err(|e| table.invalid(row, DATE, e))?;

        out.push(TransactionRecord {
            store_id: StoreId::new(store_id),
            quantity,
            final_value,
            date,
            sale_code: optional(record, code_idx),
            product: optional(record, product_idx),
        });
    }
    Ok(out)
}

fn parse_stores(
    path: &Path,
    text: &str,
    delimiter: char,
) -> Result<Vec<StoreDirectoryEntry>, ImportError> {
    use columns::*;

    let table = Table::parse(path, text, delimiter)?;
    let id_idx = table.require(STORE_ID)?;
    let name_idx = table.require(STORE_NAME)?;

    table
        .rows()
        .map(|(row, record)| -> Result<StoreDirectoryEntry, ImportError> {
            Ok(StoreDirectoryEntry::new(
                StoreId::new(table.cell(record, row, id_idx, STORE_ID)?),
                table.cell(record, row, name_idx, STORE_NAME)?,
            ))
        })
        .collect()
}

fn parse_managers(
    path: &Path,
    text: &str,
    delimiter: char,
) -> Result<Vec<ManagerContact>, ImportError> {
    use columns::*;

    let table = Table::parse(path, text, delimiter)?;
    let store_idx = table.require(STORE_NAME)?;
    let name_idx = table.require(MANAGER_NAME)?;
    let email_idx = table.require(MANAGER_EMAIL)?;

    table
        .rows()
        .map(|(row, record)| -> Result<ManagerContact, ImportError> {
            Ok(ManagerContact::new(
                table.cell(record, row, store_idx, STORE_NAME)?,
                table.cell(record, row, name_idx, MANAGER_NAME)?,
                table.cell(record, row, email_idx, MANAGER_EMAIL)?,
            ))
        })
        .collect()
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|_| format!("unrecognized date {value:?}"))
}

/// Accepts `1234.5`, `1234,5`, `1.234,50` and `1,234.50`. With both
/// separators present the last one is the decimal mark.
fn parse_decimal(value: &str) -> Result<f64, String> {
    let normalized = match (value.rfind('.'), value.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => value.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => value.replace(',', ""),
        (None, Some(_)) => value.replace(',', "."),
        _ => value.to_string(),
    };
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("not a number: {value:?}")),
    }
}

/// Whole non-negative quantity; spreadsheet exports sometimes write `3.0`.
fn parse_quantity(value: &str) -> Result<u64, String> {
    if let Ok(q) = value.parse::<u64>() {
        return Ok(q);
    }
    match parse_decimal(value) {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(v as u64),
        _ => Err(format!("not a non-negative whole number: {value:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("sales.csv")
    }

    #[test]
    fn test_parse_transactions_with_portuguese_headers() {
        let text = "\
Código Venda,Data,ID Loja,Produto,Quantidade,Valor Unitário,Valor Final
65014,2019-01-01,1,Sunga Listrado,5,113,565
65014,01/01/2019, 1 ,Casaco Xadrez,1,269,\"269,5\"

65016,2019-01-02 00:00:00,11,Sapato Listrado,2,363,726
";
        let rows = parse_transactions(&path(), text, ',').unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].store_id, StoreId::new("1"));
        assert_eq!(rows[0].quantity, 5);
        assert_eq!(rows[0].final_value, 565.0);
        assert_eq!(rows[0].sale_code.as_deref(), Some("65014"));
        assert_eq!(rows[0].product.as_deref(), Some("Sunga Listrado"));
        assert_eq!(rows[1].store_id, StoreId::new("1"));
        assert_eq!(rows[1].final_value, 269.5);
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2019, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_transactions_with_snake_case_headers() {
        let text = "store_id,quantity,final_value,date\nS1,2,100,2024-01-01\n";
        let rows = parse_transactions(&path(), text, ',').unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].sale_code.is_none());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let text = "store_id,quantity,date\nS1,2,2024-01-01\n";
        let err = parse_transactions(&path(), text, ',').unwrap_err();

        assert!(matches!(err, ImportError::MissingColumn { column: "final_value", .. }));
    }

    #[test]
    fn test_invalid_value_names_row_and_column() {
        let text = "store_id,quantity,final_value,date\nS1,2,100,2024-01-01\nS1,-1,5,2024-01-01\n";
        let err = parse_transactions(&path(), text, ',').unwrap_err();

        match err {
            ImportError::InvalidValue { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "quantity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_stores_and_managers() {
        let stores = parse_stores(
            &path(),
            "ID Loja;Loja\n1;Iguatemi Campinas\n2;Shopping Morumbi\n",
            ';',
        )
        .unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[1].store_name, "Shopping Morumbi");

        let managers = parse_managers(
            &path(),
            "Loja,Gerente,E-mail\nShopping Morumbi,Ana,ana@example.com\n",
            ',',
        )
        .unwrap();
        assert_eq!(managers[0].manager_email, "ana@example.com");
    }

    #[test]
    fn test_read_latin1_store_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stores.csv");
        // "São Paulo" in ISO-8859-1
        let mut bytes = b"ID Loja;Loja\n3;S".to_vec();
        bytes.push(0xE3);
        bytes.extend_from_slice(b"o Paulo\n");
        std::fs::write(&file, &bytes).unwrap();

        let stores = read_stores(&file, ';', TextEncoding::Latin1).unwrap();
        assert_eq!(stores[0].store_name, "São Paulo");

        let err = read_stores(&file, ';', TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, ImportError::Encoding { .. }));
    }

    #[test]
    fn test_parse_decimal_and_quantity() {
        assert_eq!(parse_decimal("1234.5"), Ok(1234.5));
        assert_eq!(parse_decimal("1234,5"), Ok(1234.5));
        assert_eq!(parse_decimal("1.234,50"), Ok(1234.5));
        assert_eq!(parse_decimal("1,234.50"), Ok(1234.5));
        assert_eq!(parse_decimal("1,234,567.25"), Ok(1234567.25));
        assert_eq!(parse_decimal("1.234.567,25"), Ok(1234567.25));
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("inf").is_err());

        assert_eq!(parse_quantity("3"), Ok(3));
        assert_eq!(parse_quantity("3.0"), Ok(3));
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("-1").is_err());
    }
}
