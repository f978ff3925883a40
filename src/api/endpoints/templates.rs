//! Template catalogue endpoints.

use std::str::FromStr;

use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::models::{Jurisdiction, Template, TemplateCategory};
use crate::templates::TemplateRegistry;

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
    pub jurisdiction: Option<String>,
}

fn parse_filter<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T::Err: std::fmt::Display,
{
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| T::from_str(s.trim()).map_err(|e| ApiError::BadRequest(e.to_string())))
        .transpose()
}

/// `GET /api/templates?category=&jurisdiction=`
pub async fn list(Query(q): Query<TemplateQuery>) -> Result<Json<Vec<&'static Template>>, ApiError> {
    let category: Option<TemplateCategory> = parse_filter(q.category.as_deref())?;
    let jurisdiction: Option<Jurisdiction> = parse_filter(q.jurisdiction.as_deref())?;
    Ok(Json(TemplateRegistry::builtin().query(category, jurisdiction)))
}

/// `GET /api/templates/:id`
pub async fn detail(Path(id): Path<String>) -> Result<Json<&'static Template>, ApiError> {
    Ok(Json(TemplateRegistry::builtin().get(&id)?))
}
