//! Excel export functionality.

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

use crate::models::{AccessLog, User};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

/// Write the header row and column widths.
fn write_headers(worksheet: &mut Worksheet, columns: &[(&str, f64)]) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, (header, width)) in columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &format)?;
        worksheet.set_column_width(col, *width)?;
    }
    Ok(())
}

/// Autofilter over the data and freeze the header row.
fn finish_sheet(worksheet: &mut Worksheet, rows: usize, columns: usize) -> Result<(), XlsxError> {
    if rows > 0 {
        worksheet.autofilter(0, 0, rows as u32, (columns - 1) as u16)?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Export registered users to Excel file.
pub fn export_users_to_excel(users: &[User], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Users")?;

    let columns = [
        ("RFID", 15.0),
        ("Name", 30.0),
        ("Email", 30.0),
        ("Batch", 10.0),
        ("Status", 12.0),
    ];
    write_headers(worksheet, &columns)?;

    for (idx, user) in users.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &user.id)?;
        worksheet.write_string(row, 1, &user.name)?;
        worksheet.write_string(row, 2, &user.email)?;
        worksheet.write_string(row, 3, &user.batch)?;
        worksheet.write_string(row, 4, &user.status)?;
    }

    finish_sheet(worksheet, users.len(), columns.len())?;

    workbook.save(path)?;
    Ok(())
}

/// Export access logs to Excel file, in the order given.
pub fn export_access_logs_to_excel(logs: &[AccessLog], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Access Logs")?;

    let columns = [
        ("User ID", 20.0),
        ("RFID", 15.0),
        ("Date", 12.0),
        ("Time", 10.0),
        ("Status", 12.0),
    ];
    write_headers(worksheet, &columns)?;

    for (idx, log) in logs.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &log.user)?;
        worksheet.write_string(row, 1, &log.card_id)?;

        // Fall back to the raw controller text when it did not parse
        match log.time {
            Some(time) => {
                worksheet.write_string(row, 2, time.format("%Y-%m-%d").to_string())?;
                worksheet.write_string(row, 3, time.format("%H:%M:%S").to_string())?;
            }
            None => {
                worksheet.write_string(row, 2, log.timestamp.as_deref().unwrap_or(""))?;
                worksheet.write_string(row, 3, "")?;
            }
        }

        worksheet.write_string(row, 4, &log.status)?;
    }

    finish_sheet(worksheet, logs.len(), columns.len())?;

    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::access_logs_from_snapshot;
    use serde_json::json;

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("users");
        assert!(name.starts_with("users_"));
        assert!(name.ends_with(".xlsx"));
        // users_YYYYMMDD_HHMMSS.xlsx
        assert_eq!(name.len(), "users_".len() + 15 + ".xlsx".len());
    }

    #[test]
    fn test_export_users_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.xlsx");
        let users = vec![User {
            id: "A1B2".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            rfid: "A1B2".to_string(),
            batch: "2024".to_string(),
            status: "Allowed".to_string(),
        }];

        export_users_to_excel(&users, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_export_access_logs_handles_undated_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.xlsx");
        let logs = access_logs_from_snapshot(&json!({
            "k1": {"user": "A", "CardID": "C1", "Time": "2025-3-7 9:05:02", "Status": "Granted"},
            "k2": {"CardID": "C2", "Time": "whenever"}
        }));

        export_access_logs_to_excel(&logs, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_empty_lists() {
        let dir = tempfile::tempdir().unwrap();

        export_users_to_excel(&[], &dir.path().join("empty_users.xlsx")).unwrap();
        export_access_logs_to_excel(&[], &dir.path().join("empty_logs.xlsx")).unwrap();
    }
}
