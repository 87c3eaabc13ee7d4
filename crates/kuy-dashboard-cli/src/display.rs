//! Terminal rendering of table and card views.

use console::{measure_text_width, pad_str, truncate_str, Alignment};
use kuy_dashboard_core::view::EMPTY_MESSAGE;
use kuy_dashboard_core::{CardView, CardViewItem, Cell, RowAction, TableView};

use crate::output::{OutputContext, OutputMode};

/// Widest a table column may grow before its cells are truncated.
const MAX_COLUMN_WIDTH: usize = 40;

fn actions_text(actions: &[RowAction]) -> String {
    actions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain, single-line text of a cell.
fn flat(cell: &Cell) -> String {
    cell.display_text().replace(['\n', '\t'], " ")
}

pub fn print_table(view: &TableView, output: &OutputContext) {
    match output.mode {
        OutputMode::Json => match serde_json::to_value(view) {
            Ok(json) => output.print_json(&json),
            Err(e) => output.warn(&format!("could not serialize table: {e}")),
        },
        OutputMode::Plain => {
            for row in &view.rows {
                let cells: Vec<String> = row.cells.iter().map(flat).collect();
                println!("{}\t{}", row.key, cells.join("\t"));
            }
        }
        OutputMode::Human => print_table_human(view, output),
    }
}

fn print_table_human(view: &TableView, output: &OutputContext) {
    if view.is_empty() {
        output.status(EMPTY_MESSAGE);
        return;
    }

    let rows: Vec<Vec<(String, &Cell)>> = view
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| (flat(c), c)).collect())
        .collect();
    let actions: Vec<String> = view.rows.iter().map(|r| actions_text(&r.actions)).collect();

    let mut widths: Vec<usize> = view.header.iter().map(|h| measure_text_width(h)).collect();
    for row in &rows {
        for (i, (text, _)) in row.iter().enumerate() {
            widths[i] = widths[i].max(measure_text_width(text));
        }
    }
    if let Some(last) = widths.last_mut() {
        *last = actions.iter().map(|a| measure_text_width(a)).fold(*last, usize::max);
    }
    for w in &mut widths {
        *w = (*w).min(MAX_COLUMN_WIDTH);
    }

    let header: Vec<String> = view
        .header
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad_str(&output.heading(h), *w, Alignment::Left, Some("...")).into_owned())
        .collect();
    println!("{}", header.join("  ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));

    for (row, action) in rows.iter().zip(&actions) {
        let mut line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, cell), w)| {
                let shown = if measure_text_width(text) > *w {
                    truncate_str(text, *w, "...").into_owned()
                } else {
                    output.cell(cell)
                };
                pad_str(&shown, *w, Alignment::Left, None).into_owned()
            })
            .collect();
        line.push(action.clone());
        println!("{}", line.join("  ").trim_end());
    }
}

pub fn print_cards(view: &CardView, output: &OutputContext) {
    match output.mode {
        OutputMode::Json => match serde_json::to_value(view) {
            Ok(json) => output.print_json(&json),
            Err(e) => output.warn(&format!("could not serialize cards: {e}")),
        },
        OutputMode::Plain => {
            for item in &view.items {
                for section in &item.sections {
                    for field in &section.fields {
                        println!(
                            "{}\t{}\t{}\t{}",
                            item.key,
                            section.title,
                            field.label,
                            flat(&field.cell)
                        );
                    }
                }
            }
        }
        OutputMode::Human => {
            if view.is_empty() {
                output.status(EMPTY_MESSAGE);
                return;
            }
            for (i, item) in view.items.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_card_human(item, output);
            }
        }
    }
}

/// One card, used by `show`.
pub fn print_card(item: &CardViewItem, output: &OutputContext) {
    match output.mode {
        OutputMode::Human => print_card_human(item, output),
        _ => print_cards(
            &CardView {
                items: vec![item.clone()],
            },
            output,
        ),
    }
}

fn print_card_human(item: &CardViewItem, output: &OutputContext) {
    let status = item
        .status
        .as_ref()
        .map(|s| format!("  [{}]", output.cell(s)))
        .unwrap_or_default();
    println!("{}{status}", output.heading(&format!("# {}", item.key)));

    let label_width = item
        .sections
        .iter()
        .flat_map(|s| &s.fields)
        .map(|f| measure_text_width(&f.label))
        .max()
        .unwrap_or(0);

    for section in &item.sections {
        println!("  {}", output.heading(&section.title));
        for field in &section.fields {
            let label = pad_str(&field.label, label_width, Alignment::Left, None);
            let value = match &field.cell {
                Cell::RichText { full, .. } => full.clone(),
                cell => output.cell(cell),
            };
            println!("    {label}  {value}");
        }
    }
    if !item.actions.is_empty() {
        println!("  actions: {}", actions_text(&item.actions));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuy_dashboard_core::EntityKey;

    #[test]
    fn actions_join_with_spaces() {
        let key = EntityKey::new("7");
        let actions = vec![
            RowAction::Edit { key: key.clone() },
            RowAction::Delete { key },
            RowAction::PreviewImage {
                url: "http://x/a.png".into(),
            },
        ];
        assert_eq!(actions_text(&actions), "edit delete preview");
        assert_eq!(actions_text(&[]), "");
    }

    #[test]
    fn flat_cells_are_single_line() {
        let cell = Cell::RichText {
            excerpt: "a\nb".into(),
            full: "a\nb".into(),
        };
        assert!(!flat(&cell).contains('\n'));
    }
}
