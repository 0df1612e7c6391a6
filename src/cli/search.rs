use comfy_table::{Cell, Table};

use crate::calendar::MonthCursor;
use crate::cli::Context;
use crate::error::{PaylensError, Result};
use crate::fmt;

pub fn run(ctx: &Context, kind: &str, term: &str) -> Result<()> {
    let mut dash = ctx.dashboard(MonthCursor::current())?;
    dash.set_search(term);

    let mut table = Table::new();
    let count = match kind {
        "costs" | "employees" => {
            let rows = dash.filtered_costs();
            table.set_header(vec!["ID", "Name", "Department", "Position", "Cost to Company"]);
            for r in &rows {
                table.add_row(vec![
                    Cell::new(&r.entity_id),
                    Cell::new(&r.entity_name),
                    Cell::new(&r.department_name),
                    Cell::new(&r.position),
                    Cell::new(ctx.money(r.cost_to_company)),
                ]);
            }
            rows.len()
        }
        "advances" => {
            let rows = dash.filtered_advances();
            table.set_header(vec!["Number", "Employee", "Name", "Amount", "Amortization", "Balance", "Status"]);
            for a in &rows {
                table.add_row(vec![
                    Cell::new(&a.advance_number),
                    Cell::new(&a.employee_number),
                    Cell::new(&a.employee_name),
                    Cell::new(ctx.money(a.amount)),
                    Cell::new(ctx.money(a.amortization)),
                    Cell::new(ctx.money(a.balance)),
                    Cell::new(&a.status),
                ]);
            }
            rows.len()
        }
        "components" => {
            let rows = dash.filtered_components();
            table.set_header(vec!["Code", "Name", "Type", "Taxable", "De minimis limit"]);
            for c in &rows {
                let limit = match (c.is_de_minimis, c.limit) {
                    (true, Some(l)) => ctx.money(l),
                    (true, None) => "yes".to_string(),
                    (false, _) => String::new(),
                };
                table.add_row(vec![
                    Cell::new(&c.code),
                    Cell::new(&c.name),
                    Cell::new(format!("{:?}", c.component_type).to_lowercase()),
                    Cell::new(if c.is_taxable { "yes" } else { "no" }),
                    Cell::new(limit),
                ]);
            }
            rows.len()
        }
        "remittances" => {
            let rows = dash.filtered_remittances();
            table.set_header(vec!["Reference", "Agency", "Period", "Amount", "Due", "Status"]);
            for r in &rows {
                table.add_row(vec![
                    Cell::new(&r.reference_number),
                    Cell::new(r.agency.name()),
                    Cell::new(&r.period_label),
                    Cell::new(ctx.money(r.amount)),
                    Cell::new(fmt::date(r.due_date)),
                    Cell::new(&r.status),
                ]);
            }
            rows.len()
        }
        other => return Err(PaylensError::UnknownKind(other.to_string())),
    };

    if count == 0 {
        println!("No matches for \"{term}\".");
    } else {
        println!("{table}");
        println!("{count} match(es)");
    }
    Ok(())
}
