//! The `aurelia catalog` command.

use aurelia_core::{Aurelia, CatalogItem};
use clap::Args;

/// Arguments for the `catalog` command.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Print the collection as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the catalog command.
pub fn execute(args: CatalogArgs, aurelia: &Aurelia) -> anyhow::Result<()> {
    let items = aurelia.catalog().items();

    if args.json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    for item in items {
        println!("{}", format_row(item));
    }
    tracing::debug!("Listed {} items", items.len());
    Ok(())
}

fn format_row(item: &CatalogItem) -> String {
    let status = if item.sold { "  [sold]" } else { "" };
    format!(
        "{:>4}  {:<36} {:<14} {:<10} {:>10}{}",
        item.id,
        item.name,
        item.category,
        item.era,
        format!("${:.2}", item.price),
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurelia_core::Catalog;

    #[test]
    fn test_format_row_includes_price_and_era() {
        let catalog = Catalog::builtin();
        let row = format_row(catalog.find("1").unwrap());
        assert!(row.contains("Victorian Mantel Clock"));
        assert!(row.contains("1880s"));
        assert!(row.contains("$420.00"));
        assert!(!row.contains("[sold]"));
    }

    #[test]
    fn test_format_row_marks_sold_items() {
        let mut item = Catalog::builtin().find("2").cloned().unwrap();
        item.sold = true;
        assert!(format_row(&item).ends_with("[sold]"));
    }
}
