//! Catalog inspection.

use anyhow::{Context, Result};

use super::Workbench;

pub fn show(workbench: &Workbench, init: bool) -> Result<()> {
    let path = workbench.catalog_store.path();

    if init {
        if path.exists() {
            println!("{} already exists", path.display());
        } else {
            workbench
                .catalog_store
                .save(&workbench.catalog_config)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    println!("# {}", workbench.paths.root().display());
    print!("{}", toml::to_string_pretty(&workbench.catalog_config)?);
    Ok(())
}
