use kuy_dashboard_core::{
    ActionsRenderer, CardView, FormError, SearchField, SearchState, TableView,
};

use super::Session;
use crate::cli::{GlobalOpts, ListArgs};
use crate::display;
use crate::error::CliError;
use crate::output::OutputContext;

/// Run the `list` command: fetch, search, and lay out one entity kind.
pub async fn run(
    args: ListArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let schema = session.schema(&args.kind)?;

    let field: SearchField = args
        .field
        .parse()
        .ok()
        .filter(|f| match f {
            SearchField::All => true,
            SearchField::Column(key) => schema.column(key.as_str()).is_some(),
        })
        .ok_or_else(|| FormError::UnknownField(args.field.clone()))?;

    let controller = session.loaded_controller(&schema, output).await?;
    let search = SearchState::new(args.search.unwrap_or_default()).in_field(field);
    let shown = controller.search(search);
    tracing::info!(kind = %schema.kind, total = controller.collection().len(), shown, "listed");

    let ctx = session.render_context(&schema);
    let read_only = session.writable(&schema).is_err();
    let no_actions = ActionsRenderer::new(|_, _| Vec::new());
    let actions = read_only.then_some(&no_actions);
    let rows = controller.filtered();

    let layout = args
        .layout
        .unwrap_or_else(|| session.config.cli.default_layout.clone());
    if layout == "cards" {
        display::print_cards(&CardView::build(&rows, &schema, &ctx, actions), output);
    } else {
        display::print_table(&TableView::build(&rows, &schema, &ctx, actions), output);
    }
    Ok(())
}
