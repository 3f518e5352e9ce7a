//! Spreadsheet report: one sheet per party plus a master summary.
//!
//! [`build_report`] shapes the data into plain rows; [`render_xlsx`] turns
//! those rows into an `.xlsx` document. Nothing is persisted.

use std::collections::HashSet;

use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use giftdrive_shared::domain::PledgeTally;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::storage::models::{ChildTree, PartyTree};

/// Longest sheet name the xlsx format accepts.
pub const SHEET_NAME_MAX: usize = 31;
pub const MASTER_SHEET: &str = "Master Summary";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const PARTY_COLUMNS: [&str; 12] = [
    "Child ID",
    "Child Name",
    "Age",
    "Has Received Pledge",
    "Wishlist Items",
    "Number of Wishes",
    "Pledger Name",
    "Pledger Email",
    "Pledger Phone",
    "Pledge Message",
    "Pledge Date",
    "Pledge Time",
];

pub const MASTER_COLUMNS: [&str; 7] = [
    "Party Name",
    "Date",
    "Location",
    "Total Children",
    "Children with Pledges",
    "Children Waiting",
    "Pledge Rate",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("xlsx: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    fn empty() -> Self {
        Cell::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub sheets: Vec<Sheet>,
}

/// Strips everything but ASCII letters, digits and whitespace, then cuts to
/// [`SHEET_NAME_MAX`] characters.
pub fn clean_sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .take(SHEET_NAME_MAX)
        .collect()
}

/// Cleaned, non-empty and unique (case-insensitively, as spreadsheet apps
/// compare) among the names already in `taken`.
fn unique_sheet_name(party_name: &str, party_id: i32, taken: &mut HashSet<String>) -> String {
    let mut base = clean_sheet_name(party_name);
    if base.trim().is_empty() {
        base = format!("Party {party_id}");
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({n})");
        let keep = SHEET_NAME_MAX.saturating_sub(suffix.len());
        candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }
    taken.insert(candidate.to_lowercase());
    candidate
}

fn local(dt: NaiveDateTime, tz: Tz) -> chrono::DateTime<Tz> {
    Utc.from_utc_datetime(&dt).with_timezone(&tz)
}

fn fmt_date(dt: NaiveDateTime, tz: Tz) -> String {
    local(dt, tz).format("%Y/%m/%d").to_string()
}

fn fmt_time(dt: NaiveDateTime, tz: Tz) -> String {
    local(dt, tz).format("%H:%M:%S").to_string()
}

fn tally(tree: &PartyTree) -> PledgeTally {
    PledgeTally::from_flags(tree.children.iter().map(|c| c.child.pledged))
}

fn child_row(c: &ChildTree, tz: Tz) -> Vec<Cell> {
    let wishes = c
        .wishlist
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    let mut row = vec![
        Cell::Number(c.child.id.into()),
        Cell::text(&c.child.name),
        Cell::Number(c.child.age.into()),
        Cell::text(if c.child.pledged { "YES" } else { "NO" }),
        Cell::text(wishes),
        Cell::Number(c.wishlist.len() as f64),
    ];
    // pledges are newest first
    match c.pledges.first() {
        Some(p) => row.extend([
            Cell::text(p.donor_name.as_deref().unwrap_or("Anonymous")),
            Cell::text(p.donor_email.as_deref().unwrap_or_default()),
            Cell::text(p.donor_phone.as_deref().unwrap_or_default()),
            Cell::text(p.message.as_deref().unwrap_or_default()),
            Cell::text(fmt_date(p.created_at, tz)),
            Cell::text(fmt_time(p.created_at, tz)),
        ]),
        None => row.extend([
            Cell::text("No pledge yet"),
            Cell::empty(),
            Cell::empty(),
            Cell::empty(),
            Cell::empty(),
            Cell::empty(),
        ]),
    }
    row
}

fn summary_row(tree: &PartyTree, tz: Tz) -> Vec<Cell> {
    let t = tally(tree);
    vec![
        Cell::text("PARTY SUMMARY"),
        Cell::text(&tree.party.name),
        Cell::empty(),
        Cell::empty(),
        Cell::text(format!("Date: {}", fmt_date(tree.party.date, tz))),
        Cell::text(format!("Location: {}", tree.party.location)),
        Cell::text(format!("Total Children: {}", t.total)),
        Cell::text(format!("Pledged: {}", t.pledged)),
        Cell::text(format!("Waiting: {}", t.waiting())),
        Cell::text(&tree.party.description),
        Cell::empty(),
        Cell::empty(),
    ]
}

fn master_row(tree: &PartyTree, tz: Tz) -> Vec<Cell> {
    let t = tally(tree);
    vec![
        Cell::text(&tree.party.name),
        Cell::text(fmt_date(tree.party.date, tz)),
        Cell::text(&tree.party.location),
        Cell::Number(t.total as f64),
        Cell::Number(t.pledged as f64),
        Cell::Number(t.waiting() as f64),
        Cell::text(t.rate_label()),
    ]
}

/// Expects parties in the order their sheets should appear (date ascending).
pub fn build_report(parties: &[PartyTree], tz: Tz) -> Report {
    let mut taken = HashSet::from([MASTER_SHEET.to_lowercase()]);
    let mut sheets: Vec<Sheet> = parties
        .iter()
        .map(|tree| {
            let mut rows = Vec::with_capacity(tree.children.len() + 1);
            rows.push(summary_row(tree, tz));
            rows.extend(tree.children.iter().map(|c| child_row(c, tz)));
            Sheet {
                name: unique_sheet_name(&tree.party.name, tree.party.id, &mut taken),
                columns: &PARTY_COLUMNS,
                rows,
            }
        })
        .collect();
    sheets.push(Sheet {
        name: MASTER_SHEET.to_string(),
        columns: &MASTER_COLUMNS,
        rows: parties.iter().map(|t| master_row(t, tz)).collect(),
    });
    Report { sheets }
}

pub fn render_xlsx(report: &Report) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    for sheet in &report.sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(&sheet.name)?;
        for (col, title) in sheet.columns.iter().enumerate() {
            let col = col as u16;
            ws.write_string_with_format(0, col, *title, &header)?;
            ws.set_column_width(col, (title.len() as f64).max(12.0) + 2.0)?;
        }
        for (r, row) in sheet.rows.iter().enumerate() {
            let r = (r + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) if s.is_empty() => {}
                    Cell::Text(s) => {
                        ws.write_string(r, col, s)?;
                    }
                    Cell::Number(n) => {
                        ws.write_number(r, col, *n)?;
                    }
                }
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

/// `<app>-report-<YYYY-MM-DD>.xlsx`, with the app name slugified.
pub fn report_filename(app_name: &str, today: chrono::NaiveDate) -> String {
    let app = slug::slugify(app_name);
    let app = if app.is_empty() { "giftdrive".to_string() } else { app };
    format!("{}-report-{}.xlsx", app, today.format("%Y-%m-%d"))
}
