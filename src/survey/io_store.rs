// Primitives for reading and writing the CSV file of answers.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};

use crate::survey::{io_common::*, *};

/// The data file as it was read: column names and raw cells.
///
/// Nothing is interpreted at this level, so a file written by another version of the
/// questionnaire is shown as it is. Every row has as many cells as there are columns.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ResponseTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResponseTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Reads the numbers of the given columns. Columns that are absent are skipped,
    /// blank cells are skipped, and any other cell must be a number.
    pub fn score_columns(&self, names: &[String]) -> SurveyResult<Vec<ScoreColumn>> {
        let mut res: Vec<ScoreColumn> = Vec::new();
        for name in names.iter() {
            let idx = match self.column_index(name) {
                Some(idx) => idx,
                None => continue,
            };
            let mut values: Vec<f64> = Vec::new();
            for (row_idx, row) in self.rows.iter().enumerate() {
                let cell = row[idx].trim();
                if cell.is_empty() {
                    continue;
                }
                let v = cell.parse::<f64>().ok().context(ParsingScoreSnafu {
                    column: name.clone(),
                    // The header is on line 1.
                    lineno: row_idx + 2,
                    content: cell.to_string(),
                })?;
                values.push(v);
            }
            res.push(ScoreColumn {
                name: name.clone(),
                values,
            });
        }
        Ok(res)
    }

    /// The table aligned in columns, header first.
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in self.rows.iter() {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let index_width = self.rows.len().saturating_sub(1).to_string().len();

        let mut lines: Vec<String> = Vec::new();
        let mut header = " ".repeat(index_width);
        for (c, w) in self.columns.iter().zip(widths.iter()) {
            header.push_str(&format!("  {:<w$}", c, w = w));
        }
        lines.push(header.trim_end().to_string());
        for (row_idx, row) in self.rows.iter().enumerate() {
            let mut line = format!("{:>w$}", row_idx, w = index_width);
            for (cell, w) in row.iter().zip(widths.iter()) {
                line.push_str(&format!("  {:<w$}", cell, w = w));
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }
}

/// Reads the data file.
///
/// Returns `None` when the file does not exist or is empty: there is no answer yet.
/// Short lines are padded with blank cells. A line with more cells than the header is an error.
pub fn read_table(path: &Path) -> SurveyResult<Option<ResponseTable>> {
    let path_s = path.display().to_string();
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("read_table: {:?} does not exist", path_s);
            return Ok(None);
        }
        Err(e) => return Err(e).context(OpeningStoreSnafu { path: path_s }),
    };
    if meta.len() == 0 {
        debug!("read_table: {:?} is empty", path_s);
        return Ok(None);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(ReadingCsvSnafu {
            path: path_s.clone(),
        })?;
    let columns: Vec<String> = rdr
        .headers()
        .context(ReadingCsvSnafu {
            path: path_s.clone(),
        })?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record_r in rdr.records() {
        let record = record_r.context(ReadingCsvSnafu {
            path: path_s.clone(),
        })?;
        let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        let lineno = record.position().map(|p| p.line()).unwrap_or_default();
        if row.len() > columns.len() {
            whatever!(
                "{}: line {} has {} cells for {} columns",
                simplify_file_name(path),
                lineno,
                row.len(),
                columns.len()
            )
        }
        if row.len() < columns.len() {
            warn!(
                "read_table: {}: line {} has {} cells for {} columns",
                simplify_file_name(path),
                lineno,
                row.len(),
                columns.len()
            );
            row.resize(columns.len(), String::new());
        }
        rows.push(row);
    }
    debug!(
        "read_table: {:?}: {} columns, {} rows",
        path_s,
        columns.len(),
        rows.len()
    );
    Ok(Some(ResponseTable { columns, rows }))
}

/// The text written for a score. It reads back to the same number.
pub fn format_score(v: f64) -> String {
    format!("{:?}", v)
}

/// The columns of a record, in the order they are first written: the groups, then the name.
pub fn record_columns(record: &ResponseRecord) -> Vec<String> {
    let mut cols: Vec<String> = record.scores.iter().map(|(n, _)| n.clone()).collect();
    cols.push(NAME_COLUMN.to_string());
    cols
}

/// The cells of a record laid out along `columns`. Unknown columns are left blank.
pub fn record_row(record: &ResponseRecord, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| {
            if c == NAME_COLUMN {
                record.name.clone()
            } else {
                record.score(c).map(format_score).unwrap_or_default()
            }
        })
        .collect()
}

/// Adds one record at the end of the data file.
///
/// The file and its header are created on the first record. After that, a record only adds
/// one line. If the header of the file misses one of the columns of the record, the file is
/// written again once with the new columns added at the end, blank for the older lines.
pub fn append_record(path: &Path, record: &ResponseRecord) -> SurveyResult<()> {
    let path_s = path.display().to_string();
    ensure_parent_dir(path)?;
    let new_columns = record_columns(record);

    let existing = read_table(path)?;
    match existing {
        None => {
            info!("append_record: creating {:?}", path_s);
            write_table(
                path,
                &ResponseTable {
                    columns: new_columns.clone(),
                    rows: vec![record_row(record, &new_columns)],
                },
            )
        }
        Some(table) if new_columns.iter().all(|c| table.column_index(c).is_some()) => {
            append_line(path, &record_row(record, &table.columns))
        }
        Some(mut table) => {
            let added: Vec<String> = new_columns
                .iter()
                .filter(|c| table.column_index(c).is_none())
                .cloned()
                .collect();
            warn!(
                "append_record: {}: adding columns {:?}",
                simplify_file_name(path),
                added
            );
            table.columns.extend(added);
            for row in table.rows.iter_mut() {
                row.resize(table.columns.len(), String::new());
            }
            let row = record_row(record, &table.columns);
            table.rows.push(row);
            let tmp = path.with_extension("csv.tmp");
            write_table(&tmp, &table)?;
            fs::rename(&tmp, path).context(WritingFileSnafu { path: path_s })
        }
    }
}

fn write_table(path: &Path, table: &ResponseTable) -> SurveyResult<()> {
    let path_s = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu {
        path: path_s.clone(),
    })?;
    wtr.write_record(&table.columns).context(WritingCsvSnafu {
        path: path_s.clone(),
    })?;
    for row in table.rows.iter() {
        wtr.write_record(row).context(WritingCsvSnafu {
            path: path_s.clone(),
        })?;
    }
    wtr.flush().context(WritingFileSnafu { path: path_s })
}

fn append_line(path: &Path, row: &[String]) -> SurveyResult<()> {
    let path_s = path.display().to_string();
    let mut file: File = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .context(OpeningStoreSnafu {
            path: path_s.clone(),
        })?;
    // A file edited by hand may not end with a line break.
    if !ends_with_newline(&mut file).context(OpeningStoreSnafu {
        path: path_s.clone(),
    })? {
        file.write_all(b"\n").context(WritingFileSnafu {
            path: path_s.clone(),
        })?;
    }
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    wtr.write_record(row).context(WritingCsvSnafu {
        path: path_s.clone(),
    })?;
    wtr.flush().context(WritingFileSnafu { path: path_s })
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
