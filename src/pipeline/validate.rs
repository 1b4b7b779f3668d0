// src/pipeline/validate.rs

//! Configuration validation.

use crate::error::Result;
use crate::models::{Config, MailSettings};
use crate::services::Extractor;

/// Validate the configuration: value sanity, selector syntax, and mail
/// environment presence.
pub fn run_validate(config: &Config, settings: &MailSettings) -> Result<()> {
    config.validate()?;
    log::info!("config OK: {} source(s)", config.sources.len());
    for source in &config.sources {
        log::info!("  {} -> {}", source.key, source.url);
    }

    // Building the extractor parses every schema selector.
    Extractor::new(&config.schema)?;
    log::info!(
        "schema OK: container '{}', {} field selector(s)",
        config.schema.container_selector,
        config.schema.fields.len()
    );

    log::info!(
        "email sender: {}",
        if settings.sender.is_some() { "set" } else { "NOT SET" }
    );
    log::info!(
        "email credential: {}",
        if settings.credential_set { "set" } else { "NOT SET" }
    );
    log::info!("email recipients: {}", settings.recipients.len());

    log::info!("all validations passed");
    Ok(())
}
