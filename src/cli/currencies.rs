//! Lists supported currencies with their rates against a base

use super::ui;
use crate::core::error::CurrencyListError;
use crate::core::rates::{RateProvider, RateTable};
use anyhow::Result;
use comfy_table::{Cell, Table};

pub async fn run(rates: &dyn RateProvider, base: &str) -> Result<()> {
    let base = base.trim().to_uppercase();
    let table = rates
        .get_rates(&base)
        .await
        .map_err(CurrencyListError::from)?;
    if table.rates.is_empty() {
        return Err(CurrencyListError::Empty(base).into());
    }

    println!("{}", rates_table(&table));
    println!("Last update: {}", table.last_update_display());
    Ok(())
}

pub fn rates_table(table: &RateTable) -> Table {
    let mut out = ui::new_styled_table();
    out.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {}", table.base)),
    ]);
    for (code, rate) in &table.rates {
        out.add_row(vec![Cell::new(code), ui::rate_cell(*rate)]);
    }
    out
}
