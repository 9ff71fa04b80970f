use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::operation_registry::{OperationRegistry, RawOperation},
  ui::{Colors, colors::IntoComfyColor, term_width},
  utils::spec::SpecLoader,
};

pub async fn list_operations(input: &str, colors: &Colors) -> anyhow::Result<()> {
  let (spec, _) = SpecLoader::new(input)?.load().await?;
  let registry = OperationRegistry::from_spec(&spec)?;
  if registry.is_empty() {
    println!("No operations found in {input}");
    return Ok(());
  }

  println!("{}", operations_table(registry.operations(), colors));
  println!("{} operations", registry.len());
  Ok(())
}

/// Rows follow extraction order: path, then canonical method order.
fn operations_table(operations: &[RawOperation<'_>], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["FUNCTION", "METHOD", "PATH", "MODULE"] {
    header.add_cell(Cell::new(title).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(header);

  for operation in operations {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&operation.name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(operation.method.as_str())
        .fg(IntoComfyColor::into(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&operation.path).fg(IntoComfyColor::into(colors.primary())));
    row.add_cell(Cell::new(&operation.module).fg(IntoComfyColor::into(colors.success())));
    table.add_row(row);
  }
  table
}
