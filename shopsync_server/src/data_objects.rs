use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shopsync_common::Secret;
use shopsync_engine::db_types::NewTenant;

use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The body of a tenant registration request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTenantRequest {
    pub name: String,
    pub shop_domain: String,
    pub email: String,
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
}

impl From<NewTenantRequest> for NewTenant {
    fn from(req: NewTenantRequest) -> Self {
        NewTenant {
            name: req.name,
            shop_domain: req.shop_domain,
            email: req.email,
            api_key: req.api_key,
            api_secret: Secret::new(req.api_secret),
            access_token: Secret::new(req.access_token),
        }
    }
}

/// Query parameters for the orders trend. Each bound is either an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
/// A plain end date includes the whole of that day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TrendParams {
    pub fn range(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), ServerError> {
        let since = self.start.as_deref().map(|s| parse_bound(s, false)).transpose()?;
        let until = self.end.as_deref().map(|s| parse_bound(s, true)).transpose()?;
        Ok((since, until))
    }
}

fn parse_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, ServerError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ServerError::InvalidRequest(format!("'{value}' is not a valid date or timestamp. {e}")))?;
    let time = if end_of_day { NaiveTime::from_hms_milli_opt(23, 59, 59, 999) } else { NaiveTime::from_hms_opt(0, 0, 0) };
    let dt = time.map(|t| Utc.from_utc_datetime(&date.and_time(t)));
    dt.ok_or_else(|| ServerError::InvalidRequest(format!("'{value}' is out of range")))
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
