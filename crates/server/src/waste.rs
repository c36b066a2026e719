//! Waste ledger endpoints.

use api_types::{
    DataResponse,
    waste::{WasteLogQuery, WasteLogView, WasteNew, WasteRecorded},
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use engine::{WasteCmd, WasteLogEntry, WasteLogFilter};

use crate::{
    ServerError, audit,
    server::{Actor, ServerState},
};

fn waste_log_view(entry: WasteLogEntry) -> WasteLogView {
    WasteLogView {
        id: entry.id,
        product_firebase_id: entry.product_firebase_id,
        product_name: entry.product_name,
        category: entry.category,
        quantity: entry.quantity,
        reason: entry.reason,
        recorded_by: entry.recorded_by,
        waste_date: entry.waste_date,
    }
}

/// Parse a date bound. A plain date covers the whole day, so it starts at
/// midnight for `date_from` and ends at the last instant for `date_to`.
fn parse_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, ServerError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ServerError::Generic(format!("invalid date: {value}")))?;
    let time = if end_of_day {
        NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    };
    let time = time.ok_or_else(|| ServerError::Generic(format!("invalid date: {value}")))?;
    Ok(date.and_time(time).and_utc())
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<WasteLogQuery>, QueryRejection>,
) -> Result<Json<DataResponse<Vec<WasteLogView>>>, ServerError> {
    let Query(query) = query?;
    let filter = WasteLogFilter {
        from: query
            .date_from
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_bound(v, false))
            .transpose()?,
        to: query
            .date_to
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_bound(v, true))
            .transpose()?,
    };

    let logs: Vec<WasteLogView> = state
        .engine
        .waste_logs(&filter)
        .await?
        .into_iter()
        .map(waste_log_view)
        .collect();
    let count = logs.len();
    Ok(Json(DataResponse::new(logs).count(count)))
}

pub async fn create(
    actor: Actor,
    State(state): State<ServerState>,
    payload: Result<Json<WasteNew>, JsonRejection>,
) -> Result<(StatusCode, Json<WasteRecorded>), ServerError> {
    let Json(payload) = payload?;
    if payload.product_firebase_id.trim().is_empty() {
        return Err(ServerError::Generic(
            "Missing required fields: productFirebaseId and quantity".to_string(),
        ));
    }

    let label = payload
        .product_name
        .clone()
        .unwrap_or_else(|| payload.product_firebase_id.clone());
    let quantity = payload.quantity;
    let details = match payload.reason.as_deref().map(str::trim) {
        Some(reason) if !reason.is_empty() => {
            format!("Recorded {quantity} units of {label} as waste ({reason})")
        }
        _ => format!("Recorded {quantity} units of {label} as waste"),
    };

    let mut cmd = WasteCmd::new(payload.product_firebase_id, payload.quantity);
    if let Some(reason) = payload.reason {
        cmd = cmd.reason(reason);
    }
    if let Some(name) = payload.product_name {
        cmd = cmd.product_name(name);
    }
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(recorded_by) = payload.recorded_by {
        cmd = cmd.recorded_by(recorded_by);
    }
    let new_inventory_b = state.engine.waste_deduct(cmd).await?;

    audit::record(&state, &actor, "Waste Recorded", details).await;

    Ok((
        StatusCode::CREATED,
        Json(WasteRecorded {
            success: true,
            message: format!("Successfully recorded {quantity} units of {label} as waste"),
            new_inventory_b,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dates_cover_the_whole_day() {
        let from = parse_bound("2026-03-01", false).ok().unwrap();
        let to = parse_bound("2026-03-01", true).ok().unwrap();
        assert_eq!(from.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert!(to > from);
        assert_eq!(to.date_naive(), from.date_naive());
    }

    #[test]
    fn rfc3339_bounds_are_converted_to_utc() {
        let ts = parse_bound("2026-03-01T10:00:00+02:00", false).ok().unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T08:00:00+00:00");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_bound("yesterday", false).is_err());
    }
}
