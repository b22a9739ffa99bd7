//!
//! High-level utility functions
//!
use std::{net::Ipv4Addr, sync::LazyLock};

use http::Uri;
use log::debug;
use regex::Regex;

use crate::{
    client::StatusClient,
    consumable::{levels, Consumable},
    error::InkError,
    threshold::{Evaluator, Verdict},
};

/// Path of the LEDM consumable usage document
pub const PRODUCT_USAGE_PATH: &str = "/DevMgmt/ProductUsageDyn.xml";

static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$").unwrap()
});

/// Check that `host` is an IPv4 address or a DNS name, optionally followed by `:port`
pub fn verify_host(host: &str) -> Result<(), InkError> {
    let invalid = || InkError::InvalidHost(host.to_owned());

    let name = match host.rsplit_once(':') {
        Some((name, port)) => {
            port.parse::<u16>().map_err(|_| invalid())?;
            name
        }
        None => host,
    };
    // fully qualified form
    let name = name.strip_suffix('.').unwrap_or(name);

    if name.parse::<Ipv4Addr>().is_ok() {
        return Ok(());
    }

    // all-numeric top label can only be a (malformed) address
    let numeric_tld = name
        .rsplit('.')
        .next()
        .is_some_and(|label| label.chars().all(|c| c.is_ascii_digit()));

    if HOSTNAME.is_match(name) && !numeric_tld {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Build the status document URI for `host`
pub fn endpoint_uri(host: &str, tls: bool, path: &str) -> Result<Uri, InkError> {
    verify_host(host)?;

    let uri = Uri::builder()
        .scheme(if tls { "https" } else { "http" })
        .authority(host)
        .path_and_query(path)
        .build()?;

    Ok(uri)
}

/// Evaluate checks against an already fetched status document
pub fn check_document(xml: &str, evaluator: &Evaluator) -> Result<Verdict, InkError> {
    let consumables = Consumable::parse_document(xml)?;
    debug!("Found {} consumables", consumables.len());

    Ok(evaluator.evaluate(&levels(&consumables)))
}

/// Fetch the status document from the printer and evaluate checks against it
pub fn check_printer(client: &StatusClient, evaluator: &Evaluator) -> Result<Verdict, InkError> {
    debug!("Checking {} fill levels at {}", evaluator.checks().len(), client.uri());
    let xml = client.fetch()?;
    check_document(&xml, evaluator)
}
