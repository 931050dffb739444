//! Dialoguer theme, banner, and item card for the terminal storefront.

use aurelia_core::CatalogItem;
use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` in the storefront's gold-on-dark palette.
///
/// - Prompt prefix: yellow `›`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn aurelia_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("›".to_string()).for_stderr().yellow(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("".to_string()).for_stderr(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().yellow(),
        ..ColorfulTheme::default()
    }
}

/// Prints the storefront banner to stderr.
pub fn print_banner() {
    let version_line = format!("Aurelia Antiques v{}", aurelia_core::VERSION);
    let tagline = "Curated history, one piece at a time";

    // Inner width: tagline + 2 chars padding each side
    let inner_width = tagline.len() + 4;

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", tagline, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let gold = Style::new().for_stderr().yellow();

    eprintln!();
    eprintln!("{}", gold.apply_to(&top));
    eprintln!("{}", gold.apply_to(&mid1));
    eprintln!("{}", gold.apply_to(&mid2));
    eprintln!("{}", gold.apply_to(&bot));
    eprintln!();
}

/// Prints the detail card for one item to stderr.
pub fn print_item_card(item: &CatalogItem, cart: u32) {
    let gold = Style::new().for_stderr().yellow().bold();
    let label = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!("  {}", gold.apply_to(&item.name));
    eprintln!(
        "  {}",
        dim.apply_to(format!("{} · {} · ${:.2}", item.category, item.era, item.price))
    );
    if item.sold {
        eprintln!("  {}", Style::new().for_stderr().red().apply_to("Sold"));
    }
    eprintln!();
    eprintln!("  {} {}", label.apply_to("Description:"), item.description);
    eprintln!("  {} {}", label.apply_to("Provenance:"), item.history);
    eprintln!();
    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Cart: {cart} · /acquire to add · /next <id> for another piece · /quit to leave"
        ))
    );
    eprintln!("{}", dim.apply_to(format!("  {}", "─".repeat(60))));
}

/// Prints one curator line.
pub fn print_curator(text: &str) {
    let name = Style::new().for_stderr().yellow().bold();
    eprintln!();
    eprintln!("  {} {}", name.apply_to("Aurelius:"), text);
    eprintln!();
}
