//! Request parsing shared by the JSON handlers.
//!
//! Every malformed or missing input becomes [`AppError::BadRequest`], so
//! handlers never see a half-parsed request.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use salon_db::db::DbProvider;
use salon_db::db::connection::DbConnection;
use salvo::Request;

use crate::error::{AppError, AppResult};

fn parse<T>(name: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::BadRequest(format!("invalid {name} '{raw}': {e}")))
}

/// ## Summary
/// Parses an optional query parameter. An empty value counts as absent.
///
/// ## Errors
/// Returns `BadRequest` if the value is present but does not parse.
pub fn optional_query<T>(req: &Request, name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match req.query::<String>(name) {
        Some(raw) if !raw.trim().is_empty() => parse(name, &raw).map(Some),
        _ => Ok(None),
    }
}

/// ## Errors
/// Returns `BadRequest` if the parameter is missing or does not parse.
pub fn required_query<T>(req: &Request, name: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    optional_query(req, name)?.ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

/// ## Errors
/// Returns `BadRequest` if the path segment is missing or does not parse.
pub fn path_param<T>(req: &Request, name: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = req
        .param::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing path parameter {name}")))?;
    parse(name, &raw)
}

/// ## Errors
/// Returns `BadRequest` if the body is not valid JSON for `T`.
pub async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::BadRequest(format!("invalid request body: {e}"))
    })
}

/// ## Errors
/// Returns an error if no connection can be checked out of the pool.
pub async fn connection(
    provider: &(dyn DbProvider + Send + Sync),
) -> AppResult<DbConnection<'_>> {
    Ok(provider.get_connection().await?)
}
