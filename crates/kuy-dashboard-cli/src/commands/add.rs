use kuy_dashboard_core::{CardView, EntityForm};
use serde_json::Value;

use super::{apply_assignments, read_attachments, submit_form, Session};
use crate::cli::{AddArgs, GlobalOpts};
use crate::display;
use crate::error::CliError;
use crate::output::OutputContext;
use crate::progress::Spinner;

/// Run the `add` command: fill the add form and create the entity.
///
/// Images are uploaded first; the returned URL becomes the field value.
pub async fn run(
    args: AddArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let schema = session.schema(&args.kind)?;
    session.writable(&schema)?;

    let mut form = EntityForm::new(schema.clone());
    form.open_add();
    apply_assignments(&mut form, &args.set)?;

    let uploader = session.client.uploader(&schema.endpoint);
    for image in read_attachments(&args.images)? {
        let field = image.field.clone();
        let spinner = Spinner::start(output, &format!("Mengunggah {}...", image.file_name));
        let url = uploader.upload(image).await.inspect_err(|e| spinner.fail(&e.to_string()))?;
        spinner.clear();
        form.set_field(&field, Value::String(url))?;
    }

    let draft = submit_form(&mut form, output)?;
    let controller = session.controller(&schema);
    let spinner = Spinner::start(output, "Menyimpan...");
    let created = controller
        .create(&draft)
        .await
        .inspect_err(|e| spinner.fail(&e.to_string()))?;
    spinner.clear();

    let cards = CardView::build(
        std::slice::from_ref(&created),
        &schema,
        &session.render_context(&schema),
        None,
    );
    if let Some(card) = cards.items.first() {
        output.success(&format!("{} '{}' created", schema.kind, card.key));
        display::print_card(card, output);
    }
    Ok(())
}
