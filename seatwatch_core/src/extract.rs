//! Section table extraction.
//!
//! Locates the course header on the schedule page, walks the table that
//! follows it, and turns each data row into a [`SectionRecord`]. Pure
//! transformation: no I/O, rows come back in table order.

use log::warn;
use thiserror::Error;

use crate::html;
use crate::models::SectionRecord;

/// Column header names on the schedule page. The page pads and
/// abbreviates header text inconsistently, so matching is by substring.
const HEADER_SECTION: &str = "SEC.";
const HEADER_CLASS_NUMBER: &str = "CLASS #";
const HEADER_INSTRUCTOR: &str = "INSTRUCTOR";
const HEADER_OPEN_SEATS: &str = "OPEN SEATS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("course '{0}' not located on page")]
    CourseNotFound(String),
    #[error("no sections table found for course '{0}'")]
    TableNotFound(String),
}

/// Extract the section rows for `course_title` from a schedule page.
///
/// The title match is a case-sensitive substring of the course header
/// text. Rows shorter than the header row or missing a required column
/// are skipped with a warning rather than failing the whole page.
pub fn extract_sections(
    page: &str,
    course_title: &str,
) -> Result<Vec<SectionRecord>, ExtractError> {
    let header = find_course_header(page, course_title)
        .ok_or_else(|| ExtractError::CourseNotFound(course_title.to_string()))?;

    let table = table_following(page, header.end)
        .ok_or_else(|| ExtractError::TableNotFound(course_title.to_string()))?;

    Ok(parse_sections_table(table.inner(page)))
}

/// Scan for a `<div class="courseHeader">` whose text contains the title.
fn find_course_header(page: &str, course_title: &str) -> Option<html::TagBlock> {
    let mut at = 0;
    while let Some(block) = html::next_tag_block(page, "div", at) {
        if html::has_class(block.open_tag(page), "courseHeader")
            && html::text_content(block.inner(page)).contains(course_title)
        {
            return Some(block);
        }
        at = block.inner_start;
    }
    None
}

/// The sections table sits directly after its course header. A table that
/// first appears after the *next* course header belongs to another course.
fn table_following(page: &str, from: usize) -> Option<html::TagBlock> {
    let table = html::next_tag_block(page, "table", from)?;
    if let Some(next_header) = find_next_course_header(page, from) {
        if next_header.start < table.start {
            return None;
        }
    }
    Some(table)
}

fn find_next_course_header(page: &str, from: usize) -> Option<html::TagBlock> {
    let mut at = from;
    while let Some(block) = html::next_tag_block(page, "div", at) {
        if html::has_class(block.open_tag(page), "courseHeader") {
            return Some(block);
        }
        at = block.inner_start;
    }
    None
}

/// Parse the table body: first row is headers, every later row is zipped
/// positionally against them.
fn parse_sections_table(table: &str) -> Vec<SectionRecord> {
    let mut rows = Vec::new();
    let mut at = 0;
    while let Some(row) = html::next_tag_block(table, "tr", at) {
        rows.push(row_cells(row.inner(table)));
        at = row.end;
    }

    let mut it = rows.into_iter();
    let headers = match it.next() {
        Some(h) if !h.is_empty() => h,
        _ => return Vec::new(),
    };

    let mut records = Vec::new();
    for (i, cells) in it.enumerate() {
        match build_record(&headers, &cells) {
            Some(record) => records.push(record),
            None => warn!(
                "skipping malformed section row {} ({} cells vs {} headers)",
                i + 1,
                cells.len(),
                headers.len()
            ),
        }
    }
    records
}

/// Cell text in document order; data rows mix `<th scope="row">` and `<td>`.
fn row_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut at = 0;
    while let Some((_, block)) = html::next_any_tag_block(row, &["th", "td"], at) {
        cells.push(html::text_content(block.inner(row)));
        at = block.end;
    }
    cells
}

fn build_record(headers: &[String], cells: &[String]) -> Option<SectionRecord> {
    let section = cell_for(headers, cells, HEADER_SECTION)?;
    let class_number = cell_for(headers, cells, HEADER_CLASS_NUMBER)?;
    let instructor = cell_for(headers, cells, HEADER_INSTRUCTOR)?;
    let open_seats = cell_for(headers, cells, HEADER_OPEN_SEATS)
        .map(|v| parse_open_seats(&v))
        .unwrap_or(0);

    Some(SectionRecord {
        section,
        class_number,
        instructor,
        open_seats,
    })
}

/// Look up a cell by header name (ASCII case-insensitive substring).
fn cell_for(headers: &[String], cells: &[String], name: &str) -> Option<String> {
    let name_up = name.to_ascii_uppercase();
    headers
        .iter()
        .position(|h| h.to_ascii_uppercase().contains(&name_up))
        .and_then(|i| cells.get(i))
        .cloned()
}

/// Open-seat policy: the cell is an integer; empty or non-numeric markers
/// (some term pages use an icon instead of a count) count as 0.
fn parse_open_seats(cell: &str) -> u32 {
    cell.trim().parse::<u32>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div class="courseHeader"><span>CECS 491A</span> COMPUTER SCI SENIOR PROJECT I</div>
        <table>
        <tr><th scope="col">SEC.</th><th scope="col">CLASS #</th><th scope="col">INSTRUCTOR</th><th scope="col">OPEN SEATS</th></tr>
        <tr><th scope="row">01</th><td>1001</td><td>Smith</td><td>3</td></tr>
        <tr><th scope="row">02</th><td>1002</td><td>Jones</td><td></td></tr>
        </table>
        <div class="courseHeader">OTHER COURSE</div>
        <table><tr><th scope="col">SEC.</th></tr><tr><td>99</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_extract_basic_page() {
        let records = extract_sections(PAGE, "COMPUTER SCI SENIOR PROJECT I").unwrap();
        assert_eq!(
            records,
            vec![
                SectionRecord {
                    section: "01".to_string(),
                    class_number: "1001".to_string(),
                    instructor: "Smith".to_string(),
                    open_seats: 3,
                },
                SectionRecord {
                    section: "02".to_string(),
                    class_number: "1002".to_string(),
                    instructor: "Jones".to_string(),
                    open_seats: 0,
                },
            ]
        );
    }

    #[test]
    fn test_extract_preserves_row_order() {
        let records = extract_sections(PAGE, "COMPUTER SCI SENIOR PROJECT I").unwrap();
        let sections: Vec<&str> = records.iter().map(|r| r.section.as_str()).collect();
        assert_eq!(sections, vec!["01", "02"]);
    }

    #[test]
    fn test_course_not_found() {
        assert_eq!(
            extract_sections(PAGE, "INTRO TO BASKET WEAVING"),
            Err(ExtractError::CourseNotFound(
                "INTRO TO BASKET WEAVING".to_string()
            ))
        );
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        assert!(matches!(
            extract_sections(PAGE, "computer sci senior project i"),
            Err(ExtractError::CourseNotFound(_))
        ));
    }

    #[test]
    fn test_table_not_found() {
        let page = r#"
            <div class="courseHeader">LONELY COURSE</div>
            <p>schedule to be announced</p>
        "#;
        assert_eq!(
            extract_sections(page, "LONELY COURSE"),
            Err(ExtractError::TableNotFound("LONELY COURSE".to_string()))
        );
    }

    #[test]
    fn test_table_of_next_course_does_not_count() {
        let page = r#"
            <div class="courseHeader">FIRST COURSE</div>
            <div class="courseHeader">SECOND COURSE</div>
            <table><tr><th scope="col">SEC.</th></tr></table>
        "#;
        assert!(matches!(
            extract_sections(page, "FIRST COURSE"),
            Err(ExtractError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_non_numeric_seat_cell_counts_as_zero() {
        let page = r#"
            <div class="courseHeader">DOT COURSE</div>
            <table>
            <tr><th scope="col">SEC.</th><th scope="col">CLASS #</th><th scope="col">INSTRUCTOR</th><th scope="col">OPEN SEATS</th></tr>
            <tr><td>01</td><td>2001</td><td>Lee</td><td><img src="dot.gif"></td></tr>
            </table>
        "#;
        let records = extract_sections(page, "DOT COURSE").unwrap();
        assert_eq!(records[0].open_seats, 0);
    }

    #[test]
    fn test_short_row_is_skipped() {
        let page = r#"
            <div class="courseHeader">RAGGED COURSE</div>
            <table>
            <tr><th scope="col">SEC.</th><th scope="col">CLASS #</th><th scope="col">INSTRUCTOR</th><th scope="col">OPEN SEATS</th></tr>
            <tr><td>01</td></tr>
            <tr><td>02</td><td>2002</td><td>Kim</td><td>1</td></tr>
            </table>
        "#;
        let records = extract_sections(page, "RAGGED COURSE").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].section, "02");
        assert_eq!(records[0].open_seats, 1);
    }

    #[test]
    fn test_header_lookup_ignores_case_and_suffix() {
        let page = r#"
            <div class="courseHeader">PADDED COURSE</div>
            <table>
            <tr><th scope="col">Sec.</th><th scope="col">Class # / ID</th><th scope="col">Instructor Name</th><th scope="col">Open Seats Remaining</th></tr>
            <tr><td>05</td><td>3005</td><td>Garcia</td><td>12</td></tr>
            </table>
        "#;
        let records = extract_sections(page, "PADDED COURSE").unwrap();
        assert_eq!(records[0].class_number, "3005");
        assert_eq!(records[0].open_seats, 12);
    }

    #[test]
    fn test_empty_table_yields_no_records() {
        let page = r#"
            <div class="courseHeader">EMPTY COURSE</div>
            <table><tr><th scope="col">SEC.</th><th scope="col">OPEN SEATS</th></tr></table>
        "#;
        let records = extract_sections(page, "EMPTY COURSE").unwrap();
        assert!(records.is_empty());
    }
}
