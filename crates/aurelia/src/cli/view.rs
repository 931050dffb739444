//! The `aurelia view` command: item detail plus a curator chat.
//!
//! Each displayed item gets its own curator session from the desk. Moving to
//! another item with `/next` discards the conversation before the new one
//! opens.

use aurelia_core::{Aurelia, Catalog, CatalogItem, CuratorSession, ARCHIVES_UNAVAILABLE};
use clap::Args;
use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use super::theme::{aurelia_theme, print_banner, print_curator, print_item_card};
use super::{create_spinner, handle_interrupt};

/// Arguments for the `view` command.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Catalog id of the item to open
    pub id: String,
}

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Say(&'a str),
    Acquire,
    Next(&'a str),
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> ChatCommand<'_> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return ChatCommand::Say(line);
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "acquire" | "buy" => ChatCommand::Acquire,
        "next" if !arg.is_empty() => ChatCommand::Next(arg),
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(line),
    }
}

/// Add the displayed item to the cart. Sold pieces are refused.
fn acquire(item: &CatalogItem, cart: &mut u32) -> Result<String, String> {
    if item.sold {
        return Err(format!("The {} has already been sold.", item.name));
    }
    *cart += 1;
    Ok(format!("Added {} to cart.", item.name))
}

/// What the chat loop wants the shell to do next.
enum Action<'c> {
    Open(&'c CatalogItem),
    Leave,
}

/// Execute the view command.
pub async fn execute(args: ViewArgs, aurelia: &Aurelia) -> anyhow::Result<()> {
    let catalog = aurelia.catalog();
    let Some(mut item) = catalog.find(&args.id) else {
        anyhow::bail!(
            "No item with id '{}'. Run `aurelia catalog` to list the collection.",
            args.id
        );
    };

    print_banner();
    let theme = aurelia_theme();
    let mut desk = aurelia.curator_desk();
    let mut cart: u32 = 0;

    loop {
        print_item_card(item, cart);

        let action = match desk.view(item) {
            Ok(session) => {
                if let Some(greeting) = session.transcript().first() {
                    print_curator(&greeting.text);
                }
                chat(session, item, catalog, &theme, &mut cart).await?
            }
            Err(e) => {
                tracing::warn!("Curator unavailable: {e}");
                print_curator(ARCHIVES_UNAVAILABLE);
                Action::Leave
            }
        };

        match action {
            Action::Open(next) => item = next,
            Action::Leave => break,
        }
    }

    desk.close();
    if cart > 0 {
        let done = Style::new().for_stderr().green();
        eprintln!(
            "  {}",
            done.apply_to(format!("{cart} piece(s) reserved in your cart."))
        );
    }
    Ok(())
}

async fn chat<'c>(
    session: &CuratorSession,
    item: &CatalogItem,
    catalog: &'c Catalog,
    theme: &ColorfulTheme,
    cart: &mut u32,
) -> anyhow::Result<Action<'c>> {
    let dim = Style::new().for_stderr().dim();

    loop {
        let line = handle_interrupt(
            Input::<String>::with_theme(theme)
                .with_prompt("You")
                .allow_empty(true)
                .interact_text(),
        )?;
        let Some(line) = line else {
            return Ok(Action::Leave);
        };

        match parse_command(&line) {
            ChatCommand::Say("") => continue,
            ChatCommand::Say(text) => {
                let spinner = create_spinner("Aurelius is considering...");
                let reply = session.send(text).await;
                spinner.finish_and_clear();
                print_curator(&reply);
            }
            ChatCommand::Acquire => match acquire(item, cart) {
                // Acquiring closes the detail view
                Ok(added) => {
                    let done = Style::new().for_stderr().green();
                    eprintln!("  {}", done.apply_to(added));
                    return Ok(Action::Leave);
                }
                Err(refused) => eprintln!("  {}", dim.apply_to(refused)),
            },
            ChatCommand::Next(id) => match catalog.find(id) {
                Some(next) => return Ok(Action::Open(next)),
                None => eprintln!("  {}", dim.apply_to(format!("No item with id '{id}'."))),
            },
            ChatCommand::Quit => return Ok(Action::Leave),
            ChatCommand::Unknown(cmd) => {
                eprintln!(
                    "  {}",
                    dim.apply_to(format!(
                        "Unknown command {cmd}. Try /acquire, /next <id>, or /quit."
                    ))
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(
            parse_command("  Who made this clock?  "),
            ChatCommand::Say("Who made this clock?")
        );
        assert_eq!(parse_command("   "), ChatCommand::Say(""));
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_command("/acquire"), ChatCommand::Acquire);
        assert_eq!(parse_command("/next 5"), ChatCommand::Next("5"));
        assert_eq!(parse_command("/next   3 "), ChatCommand::Next("3"));
        assert_eq!(parse_command("/quit"), ChatCommand::Quit);
    }

    #[test]
    fn test_acquire_names_the_item() {
        let catalog = Catalog::builtin();
        let mut cart = 0;
        let added = acquire(catalog.find("1").unwrap(), &mut cart).unwrap();
        assert_eq!(added, "Added Victorian Mantel Clock to cart.");
        assert_eq!(cart, 1);
    }

    #[test]
    fn test_acquire_refuses_sold_items() {
        let mut item = Catalog::builtin().find("4").cloned().unwrap();
        item.sold = true;
        let mut cart = 2;
        let refused = acquire(&item, &mut cart).unwrap_err();
        assert!(refused.contains("already been sold"));
        assert_eq!(cart, 2);
    }

    #[test]
    fn test_next_without_id_is_unknown() {
        assert_eq!(parse_command("/next"), ChatCommand::Unknown("/next"));
        assert_eq!(parse_command("/polish"), ChatCommand::Unknown("/polish"));
    }
}
