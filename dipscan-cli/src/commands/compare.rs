use std::path::Path;

use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use dipscan_core::{compare_schedules, flatfile};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
}

pub fn run(file: &Path, amount: Decimal) -> anyhow::Result<()> {
    let series = flatfile::read_closes(file)?;
    let cmp = compare_schedules(&series, amount)?;

    let rows = vec![
        Row {
            schedule: "Daily".to_string(),
            cost: cmp.daily.cost.round_dp(2).to_string(),
            quantity: cmp.daily.quantity.round_dp(8).to_string(),
        },
        Row {
            schedule: "Twice-monthly (1st & 15th)".to_string(),
            cost: cmp.twice_monthly.cost.round_dp(2).to_string(),
            quantity: cmp.twice_monthly.quantity.round_dp(8).to_string(),
        },
    ];
    println!("{}", Table::new(rows));
    println!(
        "Daily quantity advantage: {}",
        cmp.quantity_difference().round_dp(8)
    );
    Ok(())
}
