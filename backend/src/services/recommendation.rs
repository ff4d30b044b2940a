//! Crop recommendation service
//!
//! Validates a soil submission, asks the model service for a crop, and keeps
//! both the submission and the answer.

use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{
    format_processing_time, AlternativeCrop, ConfidenceLevel, RecommendationResult,
    RecommendationStatus, SoilForm, SoilParameters,
};
use shared::types::{Location, Pagination};
use shared::validation::{validate_location, validate_notes, validate_soil_input};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::ml_service::{MlServiceClient, PredictRequest};
use crate::middleware::AuthUser;

/// Recommendation service
#[derive(Clone)]
pub struct RecommendationService {
    db: PgPool,
}

/// Location as submitted; both coordinates must be present
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub name: Option<String>,
}

impl LocationInput {
    fn into_location(self) -> AppResult<Location> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Location {
                latitude,
                longitude,
                name: self.name.map(|n| n.trim().to_string()),
            }),
            _ => Err(AppError::ValidationError(
                "Location must include both latitude and longitude".to_string(),
            )),
        }
    }
}

/// Body of a recommendation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendInput {
    #[serde(flatten)]
    pub soil: SoilForm,
    pub location: Option<LocationInput>,
    pub notes: Option<String>,
}

/// Filters for listing stored recommendations
#[derive(Debug, Clone, Default)]
pub struct RecommendationFilter {
    pub user_id: Option<Uuid>,
    pub crop: Option<String>,
    pub status: Option<RecommendationStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// One page of recommendations
#[derive(Debug, Serialize)]
pub struct RecommendationPage {
    pub recommendations: Vec<RecommendationRecord>,
    pub total_pages: u32,
    pub current_page: u32,
    pub total: i64,
}

/// Owner summary attached to admin listings
#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

/// Stored recommendation with its soil input
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Owner>,
    pub crop: String,
    pub confidence: ConfidenceLevel,
    pub confidence_score: Option<f64>,
    pub alternative_crops: Vec<AlternativeCrop>,
    pub reasoning: Option<String>,
    pub ml_model_version: String,
    pub processing_time_ms: Option<i64>,
    pub status: RecommendationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub location: Option<Location>,
    pub soil_input_id: Option<Uuid>,
    pub soil_input: Option<SoilParameters>,
    pub created_at: DateTime<Utc>,
}

/// Flat row for CSV export
#[derive(Debug, Serialize)]
pub struct RecommendationCsvRow {
    pub id: Uuid,
    pub created_at: String,
    pub user_email: String,
    pub crop: String,
    pub confidence: String,
    pub confidence_score: Option<f64>,
    pub alternative_crops: String,
    pub status: String,
    pub processing_time_ms: Option<i64>,
    #[serde(rename = "N")]
    pub n: Option<f64>,
    #[serde(rename = "P")]
    pub p: Option<f64>,
    #[serde(rename = "K")]
    pub k: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub rainfall: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: String,
}

impl From<&RecommendationRecord> for RecommendationCsvRow {
    fn from(r: &RecommendationRecord) -> Self {
        let soil = r.soil_input.as_ref();
        Self {
            id: r.id,
            created_at: r.created_at.to_rfc3339(),
            user_email: r.user.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
            crop: r.crop.clone(),
            confidence: r.confidence.to_string(),
            confidence_score: r.confidence_score,
            alternative_crops: r
                .alternative_crops
                .iter()
                .map(|a| a.crop.as_str())
                .collect::<Vec<_>>()
                .join(";"),
            status: r.status.to_string(),
            processing_time_ms: r.processing_time_ms,
            n: soil.map(|s| s.n),
            p: soil.map(|s| s.p),
            k: soil.map(|s| s.k),
            temperature: soil.map(|s| s.temperature),
            humidity: soil.map(|s| s.humidity),
            ph: soil.map(|s| s.ph),
            rainfall: soil.map(|s| s.rainfall),
            latitude: r.location.as_ref().map(|l| l.latitude),
            longitude: r.location.as_ref().map(|l| l.longitude),
            location_name: r
                .location
                .as_ref()
                .and_then(|l| l.name.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RecommendationRow {
    id: Uuid,
    user_id: Option<Uuid>,
    soil_input_id: Option<Uuid>,
    crop: String,
    confidence: String,
    confidence_score: Option<f64>,
    alternative_crops: Json<Vec<AlternativeCrop>>,
    reasoning: Option<String>,
    ml_model_version: String,
    processing_time_ms: Option<i64>,
    status: String,
    error_message: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location_name: Option<String>,
    created_at: DateTime<Utc>,
    soil_n: Option<f64>,
    soil_p: Option<f64>,
    soil_k: Option<f64>,
    soil_temperature: Option<f64>,
    soil_humidity: Option<f64>,
    soil_ph: Option<f64>,
    soil_rainfall: Option<f64>,
    user_name: Option<String>,
    user_email: Option<String>,
}

impl From<RecommendationRow> for RecommendationRecord {
    fn from(row: RecommendationRow) -> Self {
        let soil_input = (|| {
            Some(SoilParameters {
                n: row.soil_n?,
                p: row.soil_p?,
                k: row.soil_k?,
                temperature: row.soil_temperature?,
                humidity: row.soil_humidity?,
                ph: row.soil_ph?,
                rainfall: row.soil_rainfall?,
            })
        })();
        let location = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
                name: row.location_name,
            }),
            _ => None,
        };
        let user = match (row.user_name, row.user_email) {
            (Some(name), Some(email)) => Some(Owner { name, email }),
            _ => None,
        };

        Self {
            id: row.id,
            user_id: row.user_id,
            user,
            crop: row.crop,
            confidence: row.confidence.parse().unwrap_or_default(),
            confidence_score: row.confidence_score,
            alternative_crops: row.alternative_crops.0,
            reasoning: row.reasoning,
            ml_model_version: row.ml_model_version,
            processing_time_ms: row.processing_time_ms,
            status: row.status.parse().unwrap_or_default(),
            error_message: row.error_message,
            location,
            soil_input_id: row.soil_input_id,
            soil_input,
            created_at: row.created_at,
        }
    }
}

const SELECT_RECOMMENDATIONS: &str = r#"
    SELECT r.id, r.user_id, r.soil_input_id, r.crop, r.confidence, r.confidence_score,
           r.alternative_crops, r.reasoning, r.ml_model_version, r.processing_time_ms,
           r.status, r.error_message, r.latitude, r.longitude, r.location_name, r.created_at,
           s.n AS soil_n, s.p AS soil_p, s.k AS soil_k, s.temperature AS soil_temperature,
           s.humidity AS soil_humidity, s.ph AS soil_ph, s.rainfall AS soil_rainfall,
           u.name AS user_name, u.email AS user_email
    FROM recommendations r
    LEFT JOIN soil_inputs s ON s.id = r.soil_input_id
    LEFT JOIN users u ON u.id = r.user_id
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::uuid IS NULL OR r.user_id = $1)
      AND ($2::text IS NULL OR r.crop ILIKE '%' || $2 || '%')
      AND ($3::text IS NULL OR r.status = $3)
      AND ($4::date IS NULL OR r.created_at >= $4::date)
      AND ($5::date IS NULL OR r.created_at < ($5::date + INTERVAL '1 day'))
"#;

impl RecommendationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Validate, predict, store and return a recommendation.
    ///
    /// The soil input is stored only for signed-in users; the recommendation
    /// is always stored.
    pub async fn recommend(
        &self,
        ml: &MlServiceClient,
        user: Option<&AuthUser>,
        input: RecommendInput,
    ) -> AppResult<RecommendationResult> {
        let started = Instant::now();

        let soil = input.soil.complete().ok_or_else(|| {
            AppError::ValidationError("All soil and climate parameters are required".to_string())
        })?;

        let location = input
            .location
            .map(LocationInput::into_location)
            .transpose()?;
        if let Some(location) = &location {
            validate_location(location)?;
        }

        validate_soil_input(&soil).map_err(AppError::ValidationErrors)?;

        let notes = input
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(notes) = &notes {
            validate_notes(notes)?;
        }

        let prediction = ml
            .predict(&PredictRequest::new(soil, location.as_ref()))
            .await
            .map_err(|e| {
                tracing::error!("ML service error: {}", e);
                AppError::MlServiceUnavailable(e.to_string())
            })?;

        let processing_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        let user_id = user.map(|u| u.user_id);

        let soil_input_id = match user_id {
            Some(user_id) => Some(
                self.store_soil_input(user_id, &soil, location.as_ref(), notes.as_deref())
                    .await?,
            ),
            None => None,
        };

        let (recommendation_id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO recommendations (
                user_id, soil_input_id, crop, confidence, confidence_score, alternative_crops,
                reasoning, ml_model_version, processing_time_ms, status,
                latitude, longitude, location_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, created_at
            "#,
        )
        .bind(user_id)
        .bind(soil_input_id)
        .bind(&prediction.crop)
        .bind(prediction.confidence.as_str())
        .bind(prediction.confidence_score)
        .bind(Json(&prediction.alternative_crops))
        .bind(&prediction.reasoning)
        .bind(&prediction.model_version)
        .bind(processing_ms)
        .bind(RecommendationStatus::Completed.as_str())
        .bind(location.as_ref().map(|l| l.latitude))
        .bind(location.as_ref().map(|l| l.longitude))
        .bind(location.as_ref().and_then(|l| l.name.clone()))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            "Recommended {} ({}) in {}ms",
            prediction.crop,
            prediction.confidence,
            processing_ms
        );

        Ok(RecommendationResult {
            recommendation_id,
            crop: prediction.crop,
            confidence: prediction.confidence,
            confidence_score: prediction.confidence_score,
            alternative_crops: prediction.alternative_crops,
            reasoning: prediction.reasoning,
            processing_time: format_processing_time(processing_ms),
            location,
            created_at,
        })
    }

    async fn store_soil_input(
        &self,
        user_id: Uuid,
        soil: &SoilParameters,
        location: Option<&Location>,
        notes: Option<&str>,
    ) -> AppResult<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO soil_inputs (
                user_id, n, p, k, temperature, humidity, ph, rainfall,
                latitude, longitude, location_name, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(soil.n)
        .bind(soil.p)
        .bind(soil.k)
        .bind(soil.temperature)
        .bind(soil.humidity)
        .bind(soil.ph)
        .bind(soil.rainfall)
        .bind(location.map(|l| l.latitude))
        .bind(location.map(|l| l.longitude))
        .bind(location.and_then(|l| l.name.clone()))
        .bind(notes)
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    /// List recommendations newest first
    pub async fn list(
        &self,
        filter: &RecommendationFilter,
        pagination: &Pagination,
    ) -> AppResult<RecommendationPage> {
        let crop = filter
            .crop
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let status = filter.status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, RecommendationRow>(&format!(
            "{} {} ORDER BY r.created_at DESC LIMIT $6 OFFSET $7",
            SELECT_RECOMMENDATIONS, FILTER_CLAUSE
        ))
        .bind(filter.user_id)
        .bind(crop)
        .bind(status)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM recommendations r {}",
            FILTER_CLAUSE
        ))
        .bind(filter.user_id)
        .bind(crop)
        .bind(status)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.db)
        .await?;

        Ok(RecommendationPage {
            recommendations: rows.into_iter().map(RecommendationRecord::from).collect(),
            total_pages: pagination.total_pages(total.max(0) as u64),
            current_page: pagination.page,
            total,
        })
    }

    /// A user's own recommendations
    pub async fn history(
        &self,
        user: &AuthUser,
        crop: Option<String>,
        pagination: &Pagination,
    ) -> AppResult<RecommendationPage> {
        let filter = RecommendationFilter {
            user_id: Some(user.user_id),
            crop,
            ..Default::default()
        };
        self.list(&filter, pagination).await
    }

    /// Fetch one recommendation the user owns (or any, for admins)
    pub async fn get_by_id(&self, user: &AuthUser, id: Uuid) -> AppResult<RecommendationRecord> {
        let record = self.find(id).await?;
        if !user.can_access(record.user_id) {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }
        Ok(record)
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> AppResult<()> {
        let record = self.find(id).await?;
        if !user.can_access(record.user_id) {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        sqlx::query("DELETE FROM recommendations WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!("Deleted recommendation {}", id);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<RecommendationRecord> {
        sqlx::query_as::<_, RecommendationRow>(&format!(
            "{} WHERE r.id = $1",
            SELECT_RECOMMENDATIONS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(RecommendationRecord::from)
        .ok_or_else(|| AppError::NotFound("Recommendation".to_string()))
    }

    /// Export recommendations as CSV
    pub fn export_to_csv(records: &[RecommendationRecord]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in records {
            wtr.serialize(RecommendationCsvRow::from(record))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RecommendationRecord {
        RecommendationRecord {
            id: Uuid::nil(),
            user_id: None,
            user: Some(Owner {
                name: "Ravi".into(),
                email: "ravi@example.com".into(),
            }),
            crop: "rice".into(),
            confidence: ConfidenceLevel::High,
            confidence_score: Some(0.91),
            alternative_crops: vec![
                AlternativeCrop {
                    crop: "jute".into(),
                    confidence: ConfidenceLevel::Medium,
                    confidence_score: Some(0.6),
                },
                AlternativeCrop {
                    crop: "maize".into(),
                    confidence: ConfidenceLevel::Low,
                    confidence_score: None,
                },
            ],
            reasoning: None,
            ml_model_version: "1.0.0".into(),
            processing_time_ms: Some(120),
            status: RecommendationStatus::Completed,
            error_message: None,
            location: Some(Location {
                latitude: 22.5,
                longitude: 88.3,
                name: Some("Kolkata".into()),
            }),
            soil_input_id: None,
            soil_input: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        let partial = LocationInput {
            latitude: Some(10.0),
            longitude: None,
            name: None,
        };
        let err = partial.into_location().unwrap_err();
        assert!(err.to_string().contains("both latitude and longitude"));

        let full = LocationInput {
            latitude: Some(10.0),
            longitude: Some(76.0),
            name: Some("  Kochi ".into()),
        };
        assert_eq!(full.into_location().unwrap().name.as_deref(), Some("Kochi"));
    }

    #[test]
    fn test_recommend_input_reads_flat_body() {
        let input: RecommendInput = serde_json::from_str(
            r#"{"N":90,"P":42,"K":43,"temperature":20.8,"humidity":82,"ph":6.5,"rainfall":202.9,
                "location":{"latitude":22.5,"longitude":88.3}}"#,
        )
        .unwrap();
        assert!(input.soil.complete().is_some());
        assert!(input.location.is_some());
    }

    #[test]
    fn test_csv_export() {
        let csv = RecommendationService::export_to_csv(&[record()]).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id,created_at,user_email,crop"));
        assert!(header.contains(",N,P,K,"));
        let row = lines.next().unwrap();
        assert!(row.contains("ravi@example.com,rice,High,0.91,jute;maize,completed,120"));
        assert!(row.ends_with("22.5,88.3,Kolkata"));
    }
}
