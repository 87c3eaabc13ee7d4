use kuy_dashboard_core::{CardView, EntityKey};

use super::Session;
use crate::cli::{GlobalOpts, ShowArgs};
use crate::display;
use crate::error::CliError;
use crate::output::OutputContext;

/// Run the `show` command: one entity as a card.
pub async fn run(
    args: ShowArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let schema = session.schema(&args.kind)?;
    let controller = session.loaded_controller(&schema, output).await?;

    let key = EntityKey::new(args.key.as_str());
    let cards = CardView::build(
        &controller.collection(),
        &schema,
        &session.render_context(&schema),
        None,
    );
    let card = cards
        .items
        .iter()
        .find(|item| item.key == key)
        .ok_or_else(|| CliError::EntityNotFound {
            kind: schema.kind.to_string(),
            key: args.key.clone(),
        })?;

    display::print_card(card, output);
    Ok(())
}
