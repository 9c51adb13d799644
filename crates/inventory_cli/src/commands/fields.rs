use anyhow::Result;
use inventory_core::FieldCatalog;

use crate::output;

pub fn execute(format: &str) -> Result<()> {
    let catalog = FieldCatalog::diamond();
    output::print_fields(&catalog, format)
}
