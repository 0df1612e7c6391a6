use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::calendar::MonthCursor;
use crate::cli::Context;
use crate::error::Result;
use crate::fmt;

pub fn run(ctx: &Context, month: Option<String>, prev: bool, next: bool) -> Result<()> {
    let cursor = match month {
        Some(m) => MonthCursor::parse(&m)?,
        None => MonthCursor::current(),
    };
    let mut dash = ctx.dashboard(cursor)?;
    if prev {
        dash.prev_month();
    } else if next {
        dash.next_month();
    }

    let grid = dash.calendar();
    let mut table = Table::new();
    table.set_header(vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    for week in grid.weeks() {
        let cells: Vec<Cell> = week
            .iter()
            .map(|day| {
                let mut text = day.date.format("%-d").to_string();
                if day.is_pay_date {
                    text.push_str(" $");
                }
                if !day.periods.is_empty() {
                    text.push_str(&format!(" [{}]", day.periods.len()));
                }
                if !day.in_month {
                    Cell::new(text.dimmed())
                } else if day.is_pay_date {
                    Cell::new(text.green().bold())
                } else {
                    Cell::new(text)
                }
            })
            .collect();
        table.add_row(cells);
    }
    println!("{}\n{table}", dash.cursor().title().bold());
    println!("[n] = payroll periods covering the day, $ = pay date");

    let starting = dash.periods_this_month();
    if starting.is_empty() {
        println!("\nNo payroll periods start this month.");
        return Ok(());
    }
    let mut list = Table::new();
    list.set_header(vec!["Period", "Coverage", "Pay Date", "Status"]);
    for p in starting {
        list.add_row(vec![
            Cell::new(&p.label),
            Cell::new(fmt::date_range(p.start_date, p.end_date)),
            Cell::new(fmt::date(p.pay_date)),
            Cell::new(p.status.label()),
        ]);
    }
    println!("\nPeriods this month\n{list}");
    Ok(())
}
