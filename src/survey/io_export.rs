use rust_xlsxwriter::{Format, Workbook};

use crate::survey::{io_store::ResponseTable, *};

/// The table as CSV: header first, no index column.
pub fn table_to_csv(table: &ResponseTable) -> SurveyResult<Vec<u8>> {
    let path = "<csv export>";
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&table.columns)
        .context(WritingCsvSnafu { path })?;
    for row in table.rows.iter() {
        wtr.write_record(row).context(WritingCsvSnafu { path })?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context(WritingFileSnafu { path })?;
    debug!("table_to_csv: {} bytes", bytes.len());
    Ok(bytes)
}

/// The table as an Excel workbook with a single sheet.
///
/// The header row is in bold. Cells that read as numbers are stored as numbers, except in the
/// name column.
pub fn table_to_xlsx(table: &ResponseTable, sheet_name: &str) -> SurveyResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).context(WorkbookSnafu {})?;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .context(WorkbookSnafu {})?;
    }
    let name_col = table.column_index(NAME_COLUMN);
    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            if cell.is_empty() {
                continue;
            }
            match cell.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && name_col != Some(col) => {
                    worksheet.write_number(r, c, v).context(WorkbookSnafu {})?;
                }
                _ => {
                    worksheet.write_string(r, c, cell).context(WorkbookSnafu {})?;
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer().context(WorkbookSnafu {})?;
    debug!(
        "table_to_xlsx: sheet {:?}, {} rows, {} bytes",
        sheet_name,
        table.rows.len(),
        bytes.len()
    );
    Ok(bytes)
}
