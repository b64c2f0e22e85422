use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

// @module: File utilities and CSV tables

/// UTF-8 byte order mark written in front of exported tables
const UTF8_BOM: &str = "\u{FEFF}";

/// In-memory CSV table: one header row and any number of data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Cell at (`row`, `column`), or an empty string when the row is short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Index of the column named `header`
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Parse CSV text with a header row; a leading BOM is ignored and short rows are padded
    pub fn parse_csv_table(content: &str) -> Result<DataTable> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV row {}", index + 1))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        Ok(DataTable::new(headers, rows))
    }

    /// Read a CSV file into a table
    pub fn read_csv_table<P: AsRef<Path>>(path: P) -> Result<DataTable> {
        let content = Self::read_to_string(&path)?;
        Self::parse_csv_table(&content).with_context(|| format!("Invalid CSV file: {:?}", path.as_ref()))
    }

    /// Render a table as UTF-8 CSV with a leading BOM
    pub fn render_csv_table(table: &DataTable) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&table.headers).context("Failed to write CSV header")?;
        for row in &table.rows {
            writer.write_record(row).context("Failed to write CSV row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV data: {}", e))?;
        let body = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;

        Ok(format!("{}{}", UTF8_BOM, body))
    }

    /// Write a table as UTF-8 CSV with a leading BOM
    pub fn write_csv_table<P: AsRef<Path>>(path: P, table: &DataTable) -> Result<()> {
        let content = Self::render_csv_table(table)?;
        Self::write_to_file(path, &content)
    }
}
