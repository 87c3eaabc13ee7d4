use kuy_dashboard_core::{CardView, EntityForm, EntityKey};

use super::{apply_assignments, read_attachments, submit_form, Session};
use crate::cli::{EditArgs, GlobalOpts};
use crate::display;
use crate::error::CliError;
use crate::output::OutputContext;
use crate::progress::Spinner;

/// Run the `edit` command: open the edit form on an entity and save it.
///
/// Images are sent with the update as multipart file parts.
pub async fn run(
    args: EditArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let schema = session.schema(&args.kind)?;
    session.writable(&schema)?;
    let attachments = read_attachments(&args.images)?;

    let controller = session.loaded_controller(&schema, output).await?;
    let key = EntityKey::new(args.key.as_str());
    let entity = controller
        .find(&key)
        .ok_or_else(|| CliError::EntityNotFound {
            kind: schema.kind.to_string(),
            key: args.key.clone(),
        })?;

    let mut form = EntityForm::new(schema.clone());
    form.open_edit(&entity);
    apply_assignments(&mut form, &args.set)?;
    let draft = submit_form(&mut form, output)?;

    let spinner = Spinner::start(output, "Menyimpan...");
    let updated = controller
        .update(&key, &draft, &attachments)
        .await
        .inspect_err(|e| spinner.fail(&e.to_string()))?;
    spinner.clear();

    output.success(&format!("{} '{key}' updated", schema.kind));
    let cards = CardView::build(
        std::slice::from_ref(&updated),
        &schema,
        &session.render_context(&schema),
        None,
    );
    if let Some(card) = cards.items.first() {
        display::print_card(card, output);
    }
    Ok(())
}
