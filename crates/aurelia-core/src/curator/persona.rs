//! Aurelius, the curator persona, and the item context he is bound to.

use crate::catalog::CatalogItem;

/// The curator's name, used in the instruction and the greeting.
pub const CURATOR_NAME: &str = "Aurelius";

/// Build the system instruction binding the persona to one item's context.
pub fn system_instruction(item_context: &str) -> String {
    format!(
        "You are an expert antique curator named {CURATOR_NAME}.\n\
         Your tone is sophisticated, knowledgeable, yet accessible.\n\
         You are assisting a potential buyer.\n\n\
         Here is the specific item context you are discussing:\n\
         {context}\n\n\
         Answer their questions about history, value, maintenance, and style.\n\
         Keep answers concise (under 100 words) unless asked for a detailed history.",
        context = item_context.trim()
    )
}

/// Describe a catalog item for the curator.
pub fn item_context(item: &CatalogItem) -> String {
    format!(
        "Item: {}\nEra: {}\nCategory: {}\nPrice: ${}\nDescription: {}\nHistorical Provenance: {}",
        item.name, item.era, item.category, item.price, item.description, item.history
    )
}

/// The opening line shown when an item's detail view opens.
///
/// Rendered locally; the model is not consulted for it.
pub fn greeting(item: &CatalogItem) -> String {
    format!(
        "Greetings. I am {CURATOR_NAME}, the curator. I see you are admiring the {} from the {}. \
         How may I enlighten you about this piece?",
        item.name, item.era
    )
}
