//! Subcommand handlers. Each one builds what it needs from the loaded configuration and prints
//! its verdict to stdout; rule failures surface as errors.

use crate::args::CoursesArgs;
use anyhow::{Context, Result, bail};
use chub::RulesEngine;
use chub::domain::config::EngineConfig;
use chub::domain::identity::Principal;
use chub::features::catalog::{FileUpload, InMemoryCatalog, ListingQuery, UploadScope};
use chub::features::registration::password::meets_policy;
use std::fs;
use std::sync::Arc;
use tracing::debug;

pub(crate) fn list_courses(config: EngineConfig, args: &CoursesArgs) -> Result<()> {
    let json = fs::read_to_string(&args.catalog)
        .with_context(|| format!("Reading catalog {}", args.catalog.display()))?;
    let catalog = InMemoryCatalog::from_json(&json)?;
    let engine = RulesEngine::builder().catalog(Arc::new(catalog)).config(config).build()?;

    let principal = args
        .email
        .as_deref()
        .map_or_else(Principal::anonymous, |email| Principal::authenticated(email, args.role));

    for course_id in &args.bookmarks {
        engine.bookmark(&principal, course_id)?;
    }

    let query = ListingQuery {
        search: args.search.clone(),
        category: args.category.clone(),
        page: args.page,
        page_size: args.page_size,
    };
    debug!(?query, role = %principal.role(), "Listing courses");

    let page = engine.list_courses(&principal, &query)?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

pub(crate) fn check_upload(
    config: EngineConfig,
    filename: &str,
    size: u64,
    material: bool,
) -> Result<()> {
    let engine =
        RulesEngine::builder().catalog(Arc::new(InMemoryCatalog::new())).config(config).build()?;
    let scope = if material { UploadScope::Material } else { UploadScope::General };

    engine.validate_upload(&FileUpload::new(filename, size), scope)?;
    println!("accepted: {filename}");
    Ok(())
}

pub(crate) fn check_password(
    config: &EngineConfig,
    password: &str,
    confirm: Option<&str>,
) -> Result<()> {
    if !meets_policy(&config.policy.password, password) {
        bail!("password format invalid");
    }
    if confirm.is_some_and(|c| c != password) {
        bail!("passwords do not match");
    }
    println!("password accepted");
    Ok(())
}
