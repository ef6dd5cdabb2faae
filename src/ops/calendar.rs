use chrono::{Datelike, NaiveDate};

use crate::model::task::Task;

/// Month names for calendar headers
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The cells of a month view: `None` for the leading blanks before the 1st
/// (the grid starts on Sunday), then one entry per day of the month.
pub fn month_cells(year: i32, month: u32) -> Option<Vec<Option<NaiveDate>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let mut cells: Vec<Option<NaiveDate>> =
        vec![None; first.weekday().num_days_from_sunday() as usize];

    let mut day = first;
    while day.month() == month {
        cells.push(Some(day));
        day = day.succ_opt()?;
    }
    Some(cells)
}

/// Tasks whose due date falls on the given day (UTC)
pub fn tasks_due_on<'a>(tasks: &'a [Task], day: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.due_date.is_some_and(|due| due.date_naive() == day))
        .collect()
}

/// Tasks due in the given month, grouped as (day, tasks) in day order
pub fn tasks_due_in_month<'a>(
    tasks: &'a [Task],
    year: i32,
    month: u32,
) -> Vec<(NaiveDate, Vec<&'a Task>)> {
    let Some(cells) = month_cells(year, month) else {
        return Vec::new();
    };
    cells
        .into_iter()
        .flatten()
        .filter_map(|day| {
            let due = tasks_due_on(tasks, day);
            if due.is_empty() { None } else { Some((day, due)) }
        })
        .collect()
}
