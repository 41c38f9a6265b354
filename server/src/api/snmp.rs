use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::error::AppError;
use super::AppState;
use crate::snmp::{self, SnmpVersion, Target};

const MAX_HOST_LEN: usize = 253;
const MAX_COMMUNITY_LEN: usize = 64;

/// What the caller wants from the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    /// Resolve the MAC/port client table.
    #[default]
    MacTable,
    /// Walk sysDescr only.
    Test,
}

/// Request body for POST /api/v1/snmp.
#[derive(Debug, Deserialize)]
pub struct SnmpRequest {
    pub host: String,
    pub community: String,
    #[serde(default)]
    pub version: SnmpVersion,
    #[serde(default, rename = "type")]
    pub kind: QueryKind,
}

impl SnmpRequest {
    /// Validate host and community before anything is handed to a walk tool.
    pub fn into_target(self) -> Result<Target, AppError> {
        validate_host(&self.host)?;
        validate_community(&self.community)?;
        Ok(Target {
            host: self.host,
            community: self.community,
            version: self.version,
        })
    }
}

/// Hostname or IPv4 literal: `[A-Za-z0-9.-]`, not starting with `-` so the
/// walk tool cannot read it as an option.
fn validate_host(host: &str) -> Result<(), AppError> {
    let valid = !host.is_empty()
        && host.len() <= MAX_HOST_LEN
        && !host.starts_with('-')
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("invalid host".to_string()))
    }
}

fn validate_community(community: &str) -> Result<(), AppError> {
    let valid = !community.is_empty()
        && community.len() <= MAX_COMMUNITY_LEN
        && community
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._@#!$%+=-".contains(c));
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("invalid community".to_string()))
    }
}

/// POST /api/v1/snmp: resolve a device's client table or test connectivity.
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<SnmpRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let kind = request.kind;
    let target = request.into_target()?;

    info!(host = %target.host, version = target.version.as_arg(), ?kind, "SNMP query");

    let response = match kind {
        QueryKind::MacTable => {
            Json(snmp::resolve_mac_table(state.walker.as_ref(), &target).await).into_response()
        }
        QueryKind::Test => {
            Json(snmp::test_connectivity(state.walker.as_ref(), &target).await).into_response()
        }
    };
    Ok(response)
}
