//! Plain-text rendering of the three pages.

use std::fmt::{self, Write};

use shared::domain::{FormField, HistoryItem};

use crate::controller::{
    events::{Notice, NoticeKind, SUBMIT_SUCCEEDED},
    history::{HistoryPage, HistoryView},
    navigation::Page,
    submission::{SubmissionStatus, SubmitFormPage},
};

const TABLE_HEADERS: [&str; 4] = ["Date", "First name", "Last name", "Previous records"];

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Date => "Date",
        FormField::FirstName => "First name",
        FormField::LastName => "Last name",
    }
}

fn heading(f: &mut impl Write, page: Page) -> fmt::Result {
    writeln!(f, "{}", page.title())?;
    writeln!(f, "{}", "=".repeat(page.title().chars().count()))
}

fn notice(f: &mut impl Write, notice: &Notice) -> fmt::Result {
    let tag = match notice.kind() {
        NoticeKind::Prompt => "!",
        NoticeKind::Failure => "error",
    };
    writeln!(f, "[{tag}] {}", notice.message())
}

pub struct HomeScreen;

impl fmt::Display for HomeScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, Page::Home)?;
        for page in [Page::Submit, Page::History] {
            writeln!(f, "  {:<10} {}", page.path(), page.title())?;
        }
        Ok(())
    }
}

pub struct SubmitScreen<'a>(pub &'a SubmitFormPage);

impl fmt::Display for SubmitScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.0;
        heading(f, Page::Submit)?;

        if let Some(link) = page.history_link() {
            writeln!(f, "{SUBMIT_SUCCEEDED}")?;
            writeln!(f, "  -> {} {link}", Page::History.title())?;
        }

        for field in FormField::ALL {
            writeln!(f, "{} *: {}", field_label(field), page.value(field))?;
            for message in page.field_errors(field) {
                writeln!(f, "    ! {message}")?;
            }
        }
        for message in page.general_errors() {
            writeln!(f, "! {message}")?;
        }
        if page.status() == SubmissionStatus::Submitting {
            writeln!(f, "Sending...")?;
        }
        Ok(())
    }
}

fn options_line(
    f: &mut impl Write,
    label: &str,
    any: &str,
    selected: &str,
    options: &[String],
) -> fmt::Result {
    let shown = if selected.is_empty() { any } else { selected };
    write!(f, "{label}: {shown}")?;
    if !options.is_empty() {
        write!(f, "  (options: {})", options.join(", "))?;
    }
    writeln!(f)
}

fn table_line(f: &mut impl Write, cells: [&str; 4], widths: &[usize; 4]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "| {} |", padded.join(" | "))
}

fn table(f: &mut impl Write, items: &[HistoryItem], total: u64) -> fmt::Result {
    let rows: Vec<[String; 4]> = items
        .iter()
        .map(|item| {
            [
                item.date.clone(),
                item.first_name.clone(),
                item.last_name.clone(),
                item.count.to_string(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    table_line(f, TABLE_HEADERS, &widths)?;
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(width + 2)).collect();
    writeln!(f, "|{}|", rule.join("|"))?;
    for row in &rows {
        table_line(f, [&row[0], &row[1], &row[2], &row[3]], &widths)?;
    }
    writeln!(f, "Total records: {total}")
}

pub struct HistoryScreen<'a>(pub &'a HistoryPage);

impl fmt::Display for HistoryScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.0;
        let filter = page.filter();
        let names = page.names();
        heading(f, Page::History)?;
        writeln!(f, "Location: {}", page.location())?;

        let date = if filter.date.is_empty() {
            "-"
        } else {
            filter.date.as_str()
        };
        writeln!(f, "Date *: {date}")?;
        options_line(
            f,
            "First name",
            "All first names",
            &filter.first_name,
            &names.first_names,
        )?;
        options_line(
            f,
            "Last name",
            "All last names",
            &filter.last_name,
            &names.last_names,
        )?;
        if page.can_show() {
            writeln!(f, "[Show]")?;
        } else {
            writeln!(f, "[Show] (unavailable)")?;
        }

        if let Some(current) = page.notice() {
            notice(f, current)?;
        }

        match page.view() {
            HistoryView::NotQueried => Ok(()),
            HistoryView::Loading => writeln!(f, "Loading..."),
            HistoryView::Empty => writeln!(f, "No records found"),
            HistoryView::Table { items, total } => table(f, items, total),
        }
    }
}
