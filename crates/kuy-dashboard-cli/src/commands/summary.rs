use kuy_dashboard_backend::DashboardSummary;
use kuy_dashboard_core::{catalog, ActionsRenderer, TableView};

use super::Session;
use crate::cli::GlobalOpts;
use crate::display;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};
use crate::progress::Spinner;
use crate::source::with_total;

/// Widest bar of the monthly overview.
const BAR_WIDTH: f64 = 30.0;

/// Run the `summary` command: dashboard totals, overview and latest transactions.
pub async fn run(global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let session = Session::open(global)?;
    let spinner = Spinner::start(output, "Memuat dashboard...");
    let summary = session
        .client
        .dashboard()
        .await
        .inspect_err(|e| spinner.fail(&e.to_string()))?;
    spinner.clear();

    if output.mode == OutputMode::Json {
        let mut json = serde_json::to_value(&summary)
            .map_err(|e| CliError::Other(format!("could not serialize summary: {e}")))?;
        json["transactions"] = serde_json::json!(summary
            .transactions
            .iter()
            .cloned()
            .map(with_total)
            .collect::<Vec<_>>());
        output.print_json(&json);
        return Ok(());
    }

    print_totals(&summary, output);
    print_overview(&summary, output);

    let schema = catalog::transactions()?;
    let rows: Vec<_> = summary.transactions.into_iter().map(with_total).collect();
    let table = TableView::build(
        &rows,
        &schema,
        &session.render_context(&schema),
        Some(&ActionsRenderer::new(|_, _| Vec::new())),
    );
    if output.mode == OutputMode::Human {
        println!();
        println!("{}", output.heading(&schema.title));
    }
    display::print_table(&table, output);
    Ok(())
}

fn print_totals(summary: &DashboardSummary, output: &OutputContext) {
    for (label, value) in summary.totals() {
        match output.mode {
            OutputMode::Plain => println!("{label}\t{value}"),
            _ => println!("{} {value}", output.heading(&format!("{label:<20}"))),
        }
    }
}

fn print_overview(summary: &DashboardSummary, output: &OutputContext) {
    if output.mode != OutputMode::Human || summary.overview.is_empty() {
        return;
    }
    let max = summary
        .overview
        .iter()
        .map(|p| p.total_per_month)
        .fold(0.0_f64, f64::max);
    println!();
    for point in &summary.overview {
        let len = if max > 0.0 {
            (point.total_per_month / max * BAR_WIDTH).round() as usize
        } else {
            0
        };
        println!("{:<10} {} {}", point.month, "#".repeat(len), point.total_per_month);
    }
}
