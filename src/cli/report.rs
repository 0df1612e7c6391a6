use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::calendar::MonthCursor;
use crate::cli::{print_json, Context, OutputArgs};
use crate::error::Result;
use crate::fmt::percent;
use crate::models::CostField;
use crate::variance::{VarianceGroup, VarianceStatus};

fn header(ctx: &Context, title: &str) -> String {
    if ctx.settings.company_name.is_empty() {
        title.to_string()
    } else {
        format!("{} - {title}", ctx.settings.company_name)
    }
}

pub fn departments(ctx: &Context, search: Option<String>, output: OutputArgs) -> Result<()> {
    let mut dash = ctx.dashboard(MonthCursor::current())?;
    if let Some(term) = search {
        dash.set_search(term);
    }
    let depts = dash.filtered_department_costs();
    let spread = dash.dispersion(CostField::CostToCompany);

    if output.json {
        return print_json(&depts);
    }
    if depts.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Department", "Headcount", "Basic Salary", "Cost to Company", "Average"]);
    for d in &depts {
        table.add_row(vec![
            Cell::new(&d.department_name),
            Cell::new(d.headcount),
            Cell::new(ctx.money(d.total_basic_salary)),
            Cell::new(ctx.money(d.total_cost)),
            Cell::new(ctx.money(d.average_cost)),
        ]);
    }
    let headcount: usize = depts.iter().map(|d| d.headcount).sum();
    let basic: f64 = depts.iter().map(|d| d.total_basic_salary).sum();
    let total: f64 = depts.iter().map(|d| d.total_cost).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(headcount),
        Cell::new(ctx.money(basic)),
        Cell::new(ctx.money(total)),
        Cell::new(ctx.money(crate::aggregate::average(total, headcount))),
    ]);
    println!("{}\n{table}", header(ctx, "Department Costs"));

    if !dash.search().is_empty() {
        println!("Filtered by \"{}\"", dash.search());
    }
    if let Some(sd) = spread.std_dev {
        println!("Std. deviation of cost to company (all employees): {}", ctx.money(sd));
    }
    Ok(())
}

pub fn positions(ctx: &Context, top: Option<usize>, output: OutputArgs) -> Result<()> {
    let dash = ctx.dashboard(MonthCursor::current())?;
    let limit = top.unwrap_or(ctx.settings.top_positions);
    let rows = dash.top_positions(limit);

    if output.json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Position", "Headcount", "Total Cost", "Average Cost"]);
    for (i, p) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&p.position),
            Cell::new(p.headcount),
            Cell::new(ctx.money(p.total_cost)),
            Cell::new(ctx.money(p.average_cost)),
        ]);
    }
    println!("{}\n{table}", header(ctx, &format!("Top {limit} Positions by Average Cost")));
    Ok(())
}

fn variance_row(ctx: &Context, name: &str, g: &VarianceGroup) -> Vec<Cell> {
    let (variance, status) = match g.status {
        VarianceStatus::Favorable => (
            ctx.money(g.variance).green().to_string(),
            g.status.label().green().to_string(),
        ),
        VarianceStatus::Unfavorable => (
            ctx.money(g.variance).red().to_string(),
            g.status.label().red().to_string(),
        ),
    };
    vec![
        Cell::new(name),
        Cell::new(ctx.money(g.budgeted)),
        Cell::new(ctx.money(g.actual)),
        Cell::new(variance),
        Cell::new(percent(g.variance_percent)),
        Cell::new(status),
    ]
}

pub fn variance(ctx: &Context, output: OutputArgs) -> Result<()> {
    let dash = ctx.dashboard(MonthCursor::current())?;
    let report = dash.variance();

    if output.json {
        return print_json(report);
    }
    if report.groups.is_empty() {
        println!("No budget lines found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Department", "Budgeted", "Actual", "Variance", "%", "Status"]);
    for g in &report.groups {
        table.add_row(variance_row(ctx, &g.department_name, g));
    }
    let mut total = variance_row(ctx, "", &report.total);
    total[0] = Cell::new("Total".bold());
    table.add_row(total);
    println!("{}\n{table}", header(ctx, "Budget Variance"));
    Ok(())
}

pub fn dispersion(ctx: &Context, field: &str, output: OutputArgs) -> Result<()> {
    let field = CostField::from_key(field)?;
    let dash = ctx.dashboard(MonthCursor::current())?;
    let d = dash.dispersion(field);

    if output.json {
        return print_json(&d);
    }

    let show = |v: Option<f64>| v.map(|x| ctx.money(x)).unwrap_or_else(|| "n/a".to_string());
    let mut table = Table::new();
    table.set_header(vec!["Measure", "Value"]);
    table.add_row(vec![Cell::new("Employees"), Cell::new(d.count)]);
    table.add_row(vec![Cell::new("Mean"), Cell::new(show(d.mean))]);
    table.add_row(vec![Cell::new("Minimum"), Cell::new(show(d.min))]);
    table.add_row(vec![Cell::new("Maximum"), Cell::new(show(d.max))]);
    table.add_row(vec![Cell::new("Std. deviation"), Cell::new(show(d.std_dev))]);
    println!("{}\n{table}", header(ctx, &format!("{} Dispersion", field.label())));
    Ok(())
}

pub fn remittances(ctx: &Context, output: OutputArgs) -> Result<()> {
    let dash = ctx.dashboard(MonthCursor::current())?;
    let totals = dash.remittance_totals();

    if output.json {
        return print_json(totals);
    }
    if totals.is_empty() {
        println!("No remittances found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Agency", "Count", "Total", "Average"]);
    for t in totals {
        table.add_row(vec![
            Cell::new(&t.name),
            Cell::new(t.count),
            Cell::new(ctx.money(t.total)),
            Cell::new(ctx.money(t.average)),
        ]);
    }
    let grand: f64 = totals.iter().map(|t| t.total).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(ctx.money(grand)),
        Cell::new(""),
    ]);
    println!("{}\n{table}", header(ctx, "Remittances by Agency"));
    Ok(())
}
