use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use groupforge::acceptance::Proposal;

pub struct ValidationRow {
    pub cohort: String,
    pub individuals: usize,
    pub pairs: usize,
    pub capacities: Vec<usize>,
    pub warnings: usize,
}

fn join_capacities(capacities: &[usize]) -> String {
    capacities
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn print_proposal(cohort: &str, proposal: &Proposal) {
    println!("\nCohort: {} ({} trials)", cohort, proposal.trials);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Group").add_attribute(Attribute::Bold),
        Cell::new("Size"),
        Cell::new("Members"),
    ]);

    for (i, members) in proposal.groups.iter().enumerate() {
        let label = if members.is_empty() {
            Cell::new("(empty)").fg(Color::DarkGrey)
        } else {
            Cell::new(members.join(", "))
        };
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(members.len()).set_alignment(CellAlignment::Right),
            label,
        ]);
    }
    println!("{}", table);
}

pub fn print_summary(results: &[(&str, &Proposal)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Cohort").add_attribute(Attribute::Bold),
        Cell::new("Groups"),
        Cell::new("Trials"),
        Cell::new("Score").fg(Color::Cyan),
    ]);

    for i in 1..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, p) in results {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(p.group_count()),
            Cell::new(p.trials),
            Cell::new(format!("{:.2}", p.score)).fg(Color::Cyan),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_validation_report(rows: &[ValidationRow]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Cohort").add_attribute(Attribute::Bold),
        Cell::new("Individuals"),
        Cell::new("Pairs"),
        Cell::new("Capacities"),
        Cell::new("Warnings"),
    ]);

    for row in rows {
        let warn_cell = if row.warnings > 0 {
            Cell::new(row.warnings).fg(Color::Yellow)
        } else {
            Cell::new(row.warnings)
        };
        table.add_row(vec![
            Cell::new(&row.cohort).add_attribute(Attribute::Bold),
            Cell::new(row.individuals).set_alignment(CellAlignment::Right),
            Cell::new(row.pairs).set_alignment(CellAlignment::Right),
            Cell::new(join_capacities(&row.capacities)),
            warn_cell,
        ]);
    }
    println!("\n{}", table);
    println!("Validated: {}", rows.len());
}
