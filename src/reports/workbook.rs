use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet, XlsxError};

use super::{ExpenseReport, GroupRow};
use crate::{error::ReportError, models::Expense};

pub const REPORT_FILENAME: &str = "expenses_report.xlsx";
pub const REPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DETAIL_HEADERS: [&str; 6] = ["ID", "Title", "Amount", "Category", "Payment Method", "Date"];
const CATEGORY_HEADERS: [&str; 3] = ["Category", "Total Amount", "Count"];
const MONTH_HEADERS: [&str; 3] = ["Month-Year", "Total Amount", "Count"];

/// Builds the three-sheet spreadsheet for `expenses` and returns the xlsx bytes.
///
/// Nothing is returned unless the whole document serializes.
pub fn build_report(expenses: &[Expense]) -> Result<Vec<u8>, ReportError> {
    let report = ExpenseReport::from_expenses(expenses);
    Ok(render(&report)?)
}

fn render(report: &ExpenseReport) -> Result<Vec<u8>, XlsxError> {
    let header = header_format();
    let bold = Format::new().set_bold();

    let mut workbook = Workbook::new();
    workbook.push_worksheet(detail_sheet(report, &header, &bold)?);
    workbook.push_worksheet(summary_sheet("Category Summary", &CATEGORY_HEADERS, &report.categories, &header)?);
    workbook.push_worksheet(summary_sheet("Monthly Summary", &MONTH_HEADERS, &report.months, &header)?);

    workbook.save_to_buffer()
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::Navy)
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

fn detail_sheet(report: &ExpenseReport, header: &Format, bold: &Format) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name("All Expenses")?;
    write_headers(&mut sheet, &DETAIL_HEADERS, header)?;

    let mut row: u32 = 1;
    for line in &report.detail {
        write_id(&mut sheet, row, line.id)?;
        sheet.write_string(row, 1, line.title.as_str())?;
        sheet.write_string(row, 2, line.amount.as_str())?;
        sheet.write_string(row, 3, line.category.as_str())?;
        sheet.write_string(row, 4, line.payment_method.as_str())?;
        sheet.write_string(row, 5, line.date.as_str())?;
        row += 1;
    }

    if let Some(total) = &report.total {
        sheet.write_string_with_format(row, 1, "TOTAL", bold)?;
        sheet.write_string_with_format(row, 2, total.as_str(), bold)?;
    }

    sheet.autofit();
    Ok(sheet)
}

// Ids beyond f64's exact integer range are written as text so no digit is lost.
const MAX_EXACT_ID: i64 = 1 << 53;

fn write_id(sheet: &mut Worksheet, row: u32, id: i64) -> Result<(), XlsxError> {
    if id.unsigned_abs() <= MAX_EXACT_ID as u64 {
        sheet.write_number(row, 0, id as f64)?;
    } else {
        sheet.write_string(row, 0, id.to_string())?;
    }
    Ok(())
}

fn summary_sheet(
    name: &str,
    headers: &[&str],
    rows: &[GroupRow],
    header: &Format,
) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(name)?;
    write_headers(&mut sheet, headers, header)?;

    for (i, group) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, group.label.as_str())?;
        sheet.write_string(row, 1, group.total.as_str())?;
        sheet.write_number(row, 2, group.count as f64)?;
    }

    sheet.autofit();
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::tests::{expense, sample_expenses};
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::Cursor;

    fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        open_workbook_from_rs(Cursor::new(bytes)).unwrap()
    }

    // Cells as "s:<text>", "n:<number>" or "_" for an empty or blank-text cell.
    fn sheet_rows(workbook: &mut Xlsx<Cursor<Vec<u8>>>, name: &str) -> Vec<Vec<String>> {
        let range = workbook.worksheet_range(name).unwrap();
        assert_eq!(range.start(), Some((0, 0)));
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::String(s) if s.is_empty() => "_".to_string(),
                        Data::String(s) => format!("s:{}", s),
                        Data::Float(f) => format!("n:{}", f),
                        Data::Int(i) => format!("n:{}", i),
                        Data::Empty => "_".to_string(),
                        other => format!("?:{:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_sheet_names_in_order() {
        let workbook = open(build_report(&sample_expenses()).unwrap());
        assert_eq!(
            workbook.sheet_names(),
            vec!["All Expenses", "Category Summary", "Monthly Summary"]
        );
    }

    #[test]
    fn test_detail_sheet_cells() {
        let mut workbook = open(build_report(&sample_expenses()).unwrap());
        let rows = sheet_rows(&mut workbook, "All Expenses");

        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[0],
            strings(&["s:ID", "s:Title", "s:Amount", "s:Category", "s:Payment Method", "s:Date"])
        );
        assert_eq!(
            rows[1],
            strings(&["n:1", "s:Coffee", "s:3.50", "s:Food", "s:Cash", "s:2024-05-01"])
        );
        assert_eq!(
            rows[3],
            strings(&["n:3", "s:Snack", "s:1.50", "s:Food", "s:Cash", "s:2024-06-01"])
        );
        assert_eq!(rows[4], strings(&["_", "s:TOTAL", "s:7.00", "_", "_", "_"]));
    }

    #[test]
    fn test_summary_sheet_cells() {
        let mut workbook = open(build_report(&sample_expenses()).unwrap());

        let categories = sheet_rows(&mut workbook, "Category Summary");
        assert_eq!(
            categories,
            vec![
                strings(&["s:Category", "s:Total Amount", "s:Count"]),
                strings(&["s:Food", "s:5.00", "n:2"]),
                strings(&["s:Transport", "s:2.00", "n:1"]),
            ]
        );

        let months = sheet_rows(&mut workbook, "Monthly Summary");
        assert_eq!(
            months,
            vec![
                strings(&["s:Month-Year", "s:Total Amount", "s:Count"]),
                strings(&["s:2024-05", "s:5.50", "n:2"]),
                strings(&["s:2024-06", "s:1.50", "n:1"]),
            ]
        );
    }

    #[test]
    fn test_empty_input_has_headers_only() {
        let mut workbook = open(build_report(&[]).unwrap());

        let detail = sheet_rows(&mut workbook, "All Expenses");
        assert_eq!(detail.len(), 1);
        assert_eq!(detail[0][0], "s:ID");

        assert_eq!(sheet_rows(&mut workbook, "Category Summary").len(), 1);
        assert_eq!(sheet_rows(&mut workbook, "Monthly Summary").len(), 1);
    }

    #[test]
    fn test_undated_expense_left_out_of_monthly_sheet() {
        let expenses = vec![
            expense(1, "Rent", "800", "Housing", "Transfer", None),
            expense(2, "Lunch", "12.25", "Food", "Card", Some((2024, 2, 9))),
        ];
        let mut workbook = open(build_report(&expenses).unwrap());

        let detail = sheet_rows(&mut workbook, "All Expenses");
        assert_eq!(detail[1][5], "_");
        assert_eq!(detail[3], strings(&["_", "s:TOTAL", "s:812.25", "_", "_", "_"]));

        let months = sheet_rows(&mut workbook, "Monthly Summary");
        assert_eq!(months.len(), 2);
        assert_eq!(months[1], strings(&["s:2024-02", "s:12.25", "n:1"]));
    }

    #[test]
    fn test_huge_ids_keep_every_digit() {
        let expenses = vec![
            expense(9_007_199_254_740_992, "Edge", "1", "A", "Cash", None),
            expense(9_007_199_254_740_993, "Past edge", "1", "A", "Cash", None),
        ];
        let mut workbook = open(build_report(&expenses).unwrap());

        let detail = sheet_rows(&mut workbook, "All Expenses");
        assert_eq!(detail[1][0], "n:9007199254740992");
        assert_eq!(detail[2][0], "s:9007199254740993");
    }

    #[test]
    fn test_overlong_sheet_name_is_an_error() {
        let report = ExpenseReport::from_expenses(&[]);
        let name = "a sheet name far longer than thirty-one characters";
        match summary_sheet(name, &CATEGORY_HEADERS, &report.categories, &header_format()) {
            Ok(_) => panic!("expected sheet name to be rejected"),
            Err(err) => {
                let wrapped = ReportError::from(err);
                assert!(wrapped.to_string().starts_with("Failed to export data to Excel"));
            }
        }
    }
}
