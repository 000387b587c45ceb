//! Route handlers
//!
//! Every read route replays the telemetry log on a blocking worker; nothing
//! is cached between requests.

use super::AppState;
use crate::domain::{DeviceEndpoint, ExtendedInfo};
use crate::error::DeviceError;
use crate::telemetry::{
    self, DeviceAggregate, DeviceTimeSeries, LatestReading, LogReport, SessionBestSample,
};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct CombinedData {
    pub data: BTreeMap<String, DeviceTimeSeries>,
    pub ips: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LatestData {
    pub latest: BTreeMap<String, LatestReading>,
    /// Live details for devices that answered
    pub extra: BTreeMap<String, ExtendedInfo>,
}

#[derive(Debug, Serialize)]
pub struct AverageData {
    pub averages: BTreeMap<String, DeviceAggregate>,
    pub duration: String,
    pub ips: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PoolStatus {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RestartOutcome {
    pub ok: bool,
    pub msg: String,
}

async fn load_report(state: &AppState) -> LogReport {
    let path = state.config.general.log_file.clone();
    tokio::task::spawn_blocking(move || telemetry::parse_all(path))
        .await
        .unwrap_or_else(|e| {
            log::warn!("Log replay task failed: {}", e);
            LogReport::default()
        })
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn combined_data(State(state): State<AppState>) -> Json<CombinedData> {
    let report = load_report(&state).await;
    Json(CombinedData {
        data: report.series,
        ips: report.devices,
    })
}

pub async fn latest_data(State(state): State<AppState>) -> Json<LatestData> {
    let report = load_report(&state).await;
    let timeout = state.config.server.extra_timeout();

    let lookups: Vec<_> = report
        .devices
        .iter()
        .map(|id| {
            let client = state.client.clone();
            let endpoint = DeviceEndpoint::new(id.as_str());
            tokio::task::spawn_blocking(move || {
                let info = client.system_info(&endpoint, timeout);
                (endpoint, info)
            })
        })
        .collect();

    let mut extra = BTreeMap::new();
    for lookup in lookups {
        match lookup.await {
            Ok((endpoint, Ok(info))) => {
                extra.insert(endpoint.to_string(), info.extended());
            }
            Ok((endpoint, Err(e))) => log::debug!("No live details for {}: {}", endpoint, e),
            Err(e) => log::warn!("Live detail task failed: {}", e),
        }
    }

    Json(LatestData {
        latest: report.latest,
        extra,
    })
}

pub async fn average_data(State(state): State<AppState>) -> Json<AverageData> {
    let report = load_report(&state).await;
    Json(AverageData {
        averages: report.averages,
        duration: report.duration,
        ips: report.devices,
    })
}

pub async fn max_hashrate(State(state): State<AppState>) -> Json<BTreeMap<String, f64>> {
    Json(load_report(&state).await.max_hashrate)
}

pub async fn session_best(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Vec<SessionBestSample>>> {
    Json(load_report(&state).await.session_best)
}

pub async fn report(State(state): State<AppState>) -> Json<LogReport> {
    Json(load_report(&state).await)
}

pub async fn pool_status(State(state): State<AppState>) -> Json<PoolStatus> {
    let path = state.config.general.pool_log.clone();
    let status = tokio::task::spawn_blocking(move || telemetry::pool_status(path))
        .await
        .unwrap_or_else(|e| format!("Log read error: {e}"));
    Json(PoolStatus { status })
}

pub async fn restart_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<RestartOutcome>) {
    let Some(endpoint) = state.config.find_device(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(RestartOutcome {
                ok: false,
                msg: format!("Unknown device {id}"),
            }),
        );
    };

    let client = state.client.clone();
    let timeout = state.config.restart.timeout();
    let target = endpoint.clone();
    let result = tokio::task::spawn_blocking(move || client.restart(&target, timeout))
        .await
        .unwrap_or_else(|e| Err(DeviceError::Unreachable(e.to_string())));

    match result {
        Ok(()) => {
            log::info!("Restart requested for {}", endpoint);
            (
                StatusCode::OK,
                Json(RestartOutcome {
                    ok: true,
                    msg: format!("Bitaxe {endpoint} reset OK"),
                }),
            )
        }
        Err(e) => {
            log::warn!("Restart of {} failed: {}", endpoint, e);
            let msg = match e {
                DeviceError::HttpError(code) => format!("HTTP {code}"),
                DeviceError::Unreachable(reason) => reason,
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RestartOutcome { ok: false, msg }),
            )
        }
    }
}
