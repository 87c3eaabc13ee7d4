use kuy_dashboard_core::{catalog, EntitySchema};

use crate::cli::{GlobalOpts, SchemasArgs};
use crate::config::load_config;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

use super::lookup_schema;

/// Run the `schemas` command: describe the built-in page schemas.
///
/// Works offline; only the config file is read for endpoint overrides.
pub fn run(args: SchemasArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let kinds: Vec<&str> = match &args.kind {
        Some(kind) => vec![kind.as_str()],
        None => catalog::KINDS.to_vec(),
    };

    let schemas = kinds
        .into_iter()
        .map(|kind| lookup_schema(&config, kind))
        .collect::<Result<Vec<_>, CliError>>()?;

    match output.mode {
        OutputMode::Json => {
            let json: Vec<serde_json::Value> = schemas.iter().map(schema_to_json).collect();
            output.print_json(&serde_json::json!({ "schemas": json }));
        }
        OutputMode::Plain => {
            for schema in &schemas {
                for column in schema.columns() {
                    println!(
                        "{}\t{}\t{}\t{}\t{}",
                        schema.kind,
                        column.key,
                        column.label,
                        column.kind,
                        if column.required { "required" } else { "" }
                    );
                }
            }
        }
        OutputMode::Human => {
            for (i, schema) in schemas.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                render_schema_detail(schema, output);
            }
        }
    }
    Ok(())
}

fn render_schema_detail(schema: &EntitySchema, output: &OutputContext) {
    println!(
        "{} ({})  {}",
        output.heading(&schema.title),
        schema.kind,
        schema.endpoint
    );
    let key = schema
        .key_accessor
        .attribute()
        .map(|k| k.to_string())
        .unwrap_or_else(|| "custom".to_string());
    println!("  key: {key}");
    for column in schema.columns() {
        let options: Vec<&str> = column.options.iter().map(|o| o.value.as_str()).collect();
        let options = if options.is_empty() {
            String::new()
        } else {
            format!("  [{}]", options.join("|"))
        };
        println!(
            "  {:<18} {:<22} {:<12}{}{}",
            column.key.as_str(),
            column.label,
            column.kind.to_string(),
            if column.required { " required" } else { "" },
            options
        );
    }
}

fn schema_to_json(schema: &EntitySchema) -> serde_json::Value {
    let columns: Vec<serde_json::Value> = schema
        .columns()
        .iter()
        .map(|c| {
            serde_json::json!({
                "key": c.key.as_str(),
                "label": c.label,
                "kind": c.kind.to_string(),
                "required": c.required,
                "options": c.options.iter().map(|o| o.value.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();
    let sections: Vec<serde_json::Value> = schema
        .card_sections()
        .iter()
        .map(|s| {
            serde_json::json!({
                "title": s.title,
                "fields": s.fields.iter().map(|f| f.key.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "kind": schema.kind.as_str(),
        "title": schema.title,
        "endpoint": schema.endpoint,
        "key": schema.key_accessor.attribute().map(|k| k.as_str()),
        "columns": columns,
        "card_sections": sections,
    })
}
