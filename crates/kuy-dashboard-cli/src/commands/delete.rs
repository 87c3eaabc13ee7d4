use kuy_dashboard_backend::{AssumeYes, Confirm};
use kuy_dashboard_core::EntityKey;

use super::{PromptConfirm, Session};
use crate::cli::{DeleteArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::OutputContext;

/// Run the `delete` command.
pub async fn run(
    args: DeleteArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let schema = session.schema(&args.kind)?;
    session.writable(&schema)?;

    let confirm: &dyn Confirm = if args.yes {
        &AssumeYes
    } else if output.interactive() {
        &PromptConfirm
    } else {
        return Err(CliError::RequiresConfirmation);
    };

    let key = EntityKey::new(args.key.as_str());
    let controller = session.controller(&schema);
    controller.delete(&key, confirm).await?;

    match output.mode {
        crate::output::OutputMode::Json => output.print_json(&serde_json::json!({
            "deleted": key.as_str(),
            "kind": schema.kind.as_str(),
        })),
        _ => output.success(&format!("{} '{key}' deleted", schema.kind)),
    }
    Ok(())
}
