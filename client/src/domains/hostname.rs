//! Hostname construction and validation

use crate::errors::{PlatformError, Result};

/// Build the full hostname from an optional subdomain and a base domain.
/// An empty subdomain registers the base domain itself.
pub fn join(subdomain: &str, base_domain: &str) -> String {
    if subdomain.is_empty() {
        base_domain.to_string()
    } else {
        format!("{}.{}", subdomain, base_domain)
    }
}

/// Extract the subdomain part of a hostname relative to a zone name.
/// Returns an empty string when the hostname is the zone apex.
pub fn subdomain_of(hostname: &str, zone_name: &str) -> String {
    match hostname.strip_suffix(&format!(".{}", zone_name)) {
        Some(prefix) => prefix.to_string(),
        None => String::new(),
    }
}

/// Check the syntactic shape of a hostname
pub fn validate(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        return Err(PlatformError::Validation(
            "Hostname must not be empty".to_string(),
        ));
    }

    let valid_labels = hostname.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    if !valid_labels {
        return Err(PlatformError::Validation(format!(
            "Invalid hostname: {}",
            hostname
        )));
    }

    Ok(())
}
