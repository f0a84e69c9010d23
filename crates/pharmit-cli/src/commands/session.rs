//! Whole-session commands: new, show, validate, search, list, delete.

use anyhow::{bail, Context, Result};

use super::Workbench;

pub async fn new_query(workbench: &mut Workbench, handle: &str) -> Result<()> {
    workbench.controller.new_query().await?;
    workbench.save(handle).await?;
    println!("Started new session '{}'", handle);
    Ok(())
}

pub async fn show(workbench: &mut Workbench, handle: &str) -> Result<()> {
    workbench.open_session(handle, false).await?;
    let document = workbench.controller.document().await;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

pub async fn validate(workbench: &mut Workbench, handle: &str) -> Result<()> {
    workbench.open_session(handle, false).await?;

    let violations = workbench.controller.validate_filters().await;
    if violations.is_empty() {
        println!("Filters of '{}' are valid", handle);
        return Ok(());
    }
    for violation in &violations {
        println!("{}", violation);
    }
    bail!("{} filter violation(s) in '{}'", violations.len(), handle)
}

pub async fn search(workbench: &mut Workbench, handle: &str) -> Result<()> {
    workbench.open_session(handle, false).await?;

    let result = workbench.controller.start_search().await;
    workbench.report_events();
    let results = result.with_context(|| format!("Search for '{}' failed", handle))?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

pub async fn list(workbench: &mut Workbench) -> Result<()> {
    for handle in workbench.controller.list_sessions().await? {
        println!("{}", handle);
    }
    Ok(())
}

pub async fn delete(workbench: &mut Workbench, handle: &str) -> Result<()> {
    workbench
        .controller
        .delete_session(handle)
        .await
        .with_context(|| format!("Failed to delete session '{}'", handle))?;
    println!("Deleted session '{}'", handle);
    Ok(())
}
