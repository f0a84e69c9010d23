//! Single-field edits. Each opens the session, applies the edit and saves.

use std::str::FromStr;

use anyhow::{anyhow, Result};

use pharmit_core::feature::FeatureKind;
use pharmit_core::filter::{FilterField, HitLimit};
use pharmit_core::{PharmacophoreCandidate, PickMode, QueryError};

use super::Workbench;

pub async fn add_feature(
    workbench: &mut Workbench,
    handle: &str,
    kind: &str,
    position: [f64; 3],
    radius: Option<f64>,
) -> Result<()> {
    let kind = FeatureKind::from_str(kind).map_err(|_| anyhow!("Unknown feature kind '{}'", kind))?;
    workbench.open_session(handle, true).await?;

    let mut candidate = PharmacophoreCandidate::new(kind, position);
    candidate.radius = radius;
    let index = workbench
        .controller
        .pick_feature_with(candidate, PickMode::Add)
        .await?;

    workbench.save(handle).await?;
    println!("Added {} feature #{}", kind, index);
    Ok(())
}

pub async fn remove_feature(workbench: &mut Workbench, handle: &str, index: usize) -> Result<()> {
    workbench.open_session(handle, false).await?;
    let removed = workbench.controller.remove_feature(index).await?;
    workbench.save(handle).await?;
    println!("Removed {} feature #{}", removed.kind, index);
    Ok(())
}

pub async fn toggle_feature(workbench: &mut Workbench, handle: &str, index: usize) -> Result<()> {
    workbench.open_session(handle, false).await?;

    let state = workbench.controller.session_state().await;
    let enabled = match state.features.get(index) {
        Some(feature) => !feature.enabled,
        None => {
            return Err(QueryError::IndexOutOfRange {
                index,
                len: state.features.len(),
            }
            .into())
        }
    };
    workbench
        .controller
        .set_feature_enabled(index, enabled)
        .await?;

    workbench.save(handle).await?;
    println!(
        "Feature #{} {}",
        index,
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub async fn set_filter(
    workbench: &mut Workbench,
    handle: &str,
    field: &str,
    value: Option<f64>,
    clear: bool,
) -> Result<()> {
    let field =
        FilterField::from_str(field).map_err(|_| anyhow!("Unknown filter field '{}'", field))?;
    workbench.open_session(handle, true).await?;

    if clear {
        workbench.controller.clear_filter(field).await;
    } else {
        let value = value.ok_or_else(|| anyhow!("Give a value for {} or use --clear", field))?;
        workbench.controller.set_filter(field, value).await?;
    }

    workbench.save(handle).await?;
    let filters = workbench.controller.snapshot().await.filters;
    match (filters.hit_limit(field), filters.get(field)) {
        (Some(HitLimit::Unlimited), _) => println!("{} = no limit", field.label()),
        (_, Some(value)) => println!("{} = {}", field.label(), value),
        (_, None) => println!("{} cleared", field.label()),
    }
    Ok(())
}

pub async fn set_style(
    workbench: &mut Workbench,
    handle: &str,
    role: &str,
    style: usize,
) -> Result<()> {
    workbench.open_session(handle, true).await?;
    workbench.controller.set_style_by_name(role, style).await?;
    workbench.save(handle).await?;

    let palette = workbench.controller.catalog().palette();
    if let Some(entry) = palette.get(style) {
        println!("{} style set to {}", role, entry.name);
    }
    Ok(())
}

pub async fn select_vendor(workbench: &mut Workbench, handle: &str, name: &str) -> Result<()> {
    workbench.open_session(handle, true).await?;
    workbench.controller.select_vendor(name).await.map_err(|e| {
        anyhow!(
            "{} (available: {})",
            e,
            workbench.controller.list_vendors().join(", ")
        )
    })?;
    workbench.save(handle).await?;
    println!("Vendor set to {}", name);
    Ok(())
}
