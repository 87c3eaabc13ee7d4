use kuy_dashboard_core::{catalog, CardView};

use super::Session;
use crate::cli::GlobalOpts;
use crate::display;
use crate::error::CliError;
use crate::output::OutputContext;
use crate::progress::Spinner;

/// Run the `profile` command: the signed-in admin as a card.
pub async fn run(global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let spinner = Spinner::start(output, "Memuat profil...");
    let profile = session
        .client
        .profile()
        .await
        .inspect_err(|e| spinner.fail(&e.to_string()))?;
    spinner.clear();

    let schema = catalog::profile()?;
    let cards = CardView::build(
        std::slice::from_ref(&profile),
        &schema,
        &session.render_context(&schema),
        Some(&kuy_dashboard_core::ActionsRenderer::new(|_, _| Vec::new())),
    );
    if let Some(card) = cards.items.first() {
        display::print_card(card, output);
    }
    Ok(())
}
