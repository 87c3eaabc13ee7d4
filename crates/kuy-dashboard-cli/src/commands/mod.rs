pub mod add;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod list;
pub mod login;
pub mod profile;
pub mod schemas;
pub mod show;
pub mod summary;

use std::path::Path;
use std::sync::Arc;

use kuy_dashboard_backend::{ApiClient, Attachment, Confirm, EntityController};
use kuy_dashboard_core::{
    catalog, parse_assignment, ColumnDescriptor, Draft, EntityForm, EntitySchema, RenderContext,
    SubmitOutcome,
};
use serde_json::Value;

use crate::cli::GlobalOpts;
use crate::config::{load_config, resolve_api_params, CliConfig};
use crate::error::CliError;
use crate::output::OutputContext;
use crate::progress::Spinner;
use crate::source::PageSource;

/// Loaded configuration plus a client built from it.
pub struct Session {
    pub config: CliConfig,
    pub client: ApiClient,
}

impl Session {
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load_config(global.config.as_deref())?;
        let params = resolve_api_params(&config, global);
        let mut client = ApiClient::new(&params.base_url, params.timeout)?;
        if let Some(token) = params.token {
            client = client.with_token(token);
        }
        tracing::debug!(base_url = %params.base_url, token = client.has_token(), "session opened");
        Ok(Self { config, client })
    }

    /// The built-in schema for `kind`, with any configured endpoint override.
    pub fn schema(&self, kind: &str) -> Result<Arc<EntitySchema>, CliError> {
        lookup_schema(&self.config, kind).map(Arc::new)
    }

    pub fn render_context(&self, schema: &EntitySchema) -> RenderContext {
        RenderContext::for_schema(schema, self.client.base_url())
    }

    pub fn controller(&self, schema: &Arc<EntitySchema>) -> EntityController<PageSource> {
        let source = PageSource::for_kind(schema.kind.as_str(), &schema.endpoint, &self.client);
        EntityController::new(Arc::clone(schema), source)
    }

    /// A controller whose collection has been fetched.
    pub async fn loaded_controller(
        &self,
        schema: &Arc<EntitySchema>,
        output: &OutputContext,
    ) -> Result<EntityController<PageSource>, CliError> {
        let controller = self.controller(schema);
        let spinner = Spinner::start(output, &format!("Memuat {}...", schema.title));
        match controller.load().await {
            Ok(_) => {
                spinner.clear();
                Ok(controller)
            }
            Err(e) => {
                spinner.fail(&e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn writable(&self, schema: &EntitySchema) -> Result<(), CliError> {
        let source = PageSource::for_kind(schema.kind.as_str(), &schema.endpoint, &self.client);
        if source.is_read_only() {
            return Err(CliError::ReadOnly {
                kind: schema.kind.to_string(),
            });
        }
        Ok(())
    }
}

/// Looks up a built-in schema and applies the configured endpoint override.
pub fn lookup_schema(config: &CliConfig, kind: &str) -> Result<EntitySchema, CliError> {
    let mut schema = catalog::by_kind(kind).ok_or_else(|| CliError::UnknownKind {
        kind: kind.to_string(),
        expected: catalog::KINDS.join(", "),
    })??;
    if let Some(endpoint) = config.endpoint_for(schema.kind.as_str()) {
        schema.endpoint = endpoint.to_string();
    }
    Ok(schema)
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Applies `--set field=value` assignments to an open form.
pub fn apply_assignments(form: &mut EntityForm, assignments: &[String]) -> Result<(), CliError> {
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        form.set_field(key.as_str(), value)?;
    }
    Ok(())
}

/// Parses `--image field=path` into attachments.
pub fn read_attachments(images: &[String]) -> Result<Vec<Attachment>, CliError> {
    images
        .iter()
        .map(|spec| {
            let (field, path) = spec
                .split_once('=')
                .filter(|(f, p)| !f.trim().is_empty() && !p.is_empty())
                .ok_or_else(|| {
                    CliError::Other(format!("--image expects FIELD=PATH, got '{spec}'"))
                })?;
            let path = Path::new(path);
            Attachment::from_path(field.trim(), path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

/// Submits the form. When required fields are missing and prompts are
/// possible, asks for them once and submits again.
pub fn submit_form(form: &mut EntityForm, output: &OutputContext) -> Result<Draft, CliError> {
    let mut prompted = false;
    loop {
        match form.submit(|_, _| {}, || {})? {
            SubmitOutcome::Committed { draft, .. } => return Ok(draft),
            SubmitOutcome::Invalid(errors) => {
                if prompted || !output.interactive() {
                    return Err(CliError::Validation { errors });
                }
                for (key, message) in errors.iter() {
                    output.warn(message);
                    let Some(column) = form.schema().column(key.as_str()).cloned() else {
                        continue;
                    };
                    let value = prompt_field(&column)?;
                    form.set_field(column.key.as_str(), value)?;
                }
                prompted = true;
            }
        }
    }
}

fn prompt_field(column: &ColumnDescriptor) -> Result<Value, CliError> {
    let prompt_error = |e: dialoguer::Error| CliError::Other(format!("prompt failed: {e}"));
    if column.constrains_input() {
        let labels: Vec<&str> = column.options.iter().map(|o| o.label.as_str()).collect();
        let picked = dialoguer::Select::new()
            .with_prompt(&column.label)
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        let value = column
            .options
            .iter()
            .nth(picked)
            .map(|o| o.value.clone())
            .unwrap_or_default();
        return Ok(Value::String(value));
    }
    let text: String = dialoguer::Input::new()
        .with_prompt(&column.label)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    Ok(Value::String(text))
}

/// Asks on the terminal before destructive actions.
pub struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuy_dashboard_core::FormError;
    use crate::output::OutputMode;

    fn non_interactive() -> OutputContext {
        OutputContext {
            mode: OutputMode::Json,
            verbose: 0,
            quiet: true,
            use_color: false,
        }
    }

    fn users_form() -> EntityForm {
        let mut form = EntityForm::new(Arc::new(catalog::users().unwrap()));
        form.open_add();
        form
    }

    #[test]
    fn assignments_fill_the_draft() {
        let mut form = users_form();
        apply_assignments(
            &mut form,
            &["name=Agus".to_string(), "email=agus@kuy.id".to_string()],
        )
        .unwrap();
        let draft = submit_form(&mut form, &non_interactive()).unwrap();
        assert_eq!(draft.get("name"), Some(&Value::String("Agus".into())));
        assert_eq!(draft.get("role"), Some(&Value::String("Admin".into())));
    }

    #[test]
    fn missing_required_field_is_a_validation_error() {
        let mut form = users_form();
        apply_assignments(&mut form, &["email=agus@kuy.id".to_string()]).unwrap();
        let err = submit_form(&mut form, &non_interactive()).unwrap_err();
        assert!(err.to_string().contains("Nama is required."));
        assert_eq!(err.exit_code(), crate::error::ExitCode::ValidationError);
    }

    #[test]
    fn bad_option_is_rejected() {
        let mut form = users_form();
        let err = apply_assignments(&mut form, &["status=Hilang".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::Form(FormError::InvalidOption { .. })));
    }

    #[test]
    fn endpoint_override_applies() {
        let mut config = CliConfig::default();
        config.endpoints.insert("blogs".into(), "/api/v2/blogs".into());
        assert_eq!(lookup_schema(&config, "blogs").unwrap().endpoint, "/api/v2/blogs");
        assert_eq!(lookup_schema(&config, "admins").unwrap().endpoint, "/api/user/admins");
        assert!(matches!(
            lookup_schema(&config, "trucks"),
            Err(CliError::UnknownKind { .. })
        ));
    }

    #[test]
    fn malformed_image_spec_is_rejected() {
        assert!(read_attachments(&["banner".to_string()]).is_err());
        assert!(matches!(
            read_attachments(&["banner=/nonexistent/b.png".to_string()]),
            Err(CliError::Io { .. })
        ));
    }
}
