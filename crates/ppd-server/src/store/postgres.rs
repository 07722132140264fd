//! PostgreSQL implementation of the ingestion store
//!
//! Each record kind writes through its own INSERT so the column set stays
//! explicit per shape. The officer aggregate is only ever touched through a
//! single upsert statement whose increments happen inside the database, so
//! concurrent uploads naming the same badge id cannot lose updates.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::ingest::kpi::kpi_delta;
use crate::models::{ImportSource, ModuleKind, NewPerformanceRecord, RecordDetail};

use super::{IngestStore, JobOutcome, StoreError};

/// Postgres-backed store client
///
/// Cheap to clone; wraps the shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IngestStore for PgStore {
    async fn create_job(
        &self,
        filename: &str,
        source: ImportSource,
        module: ModuleKind,
        uploaded_by: &str,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO import_jobs (id, filename, source, module, status, uploaded_by)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            "#,
        )
        .bind(id)
        .bind(filename)
        .bind(source.as_str())
        .bind(module.as_str())
        .bind(uploaded_by)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn mark_processing(&self, job_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE import_jobs
            SET status = 'processing', updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn finalize_job(&self, job_id: Uuid, outcome: &JobOutcome) -> Result<(), StoreError> {
        let errors = serde_json::to_value(&outcome.errors)?;

        sqlx::query(
            r#"
            UPDATE import_jobs
            SET status = $2,
                total_rows = $3,
                processed_rows = $4,
                failed_rows = $5,
                errors = $6,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(outcome.status.as_str())
        .bind(outcome.total_rows)
        .bind(outcome.processed_rows)
        .bind(outcome.failed_rows)
        .bind(errors)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_record(
        &self,
        job_id: Uuid,
        record: &NewPerformanceRecord,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let module = record.module();

        match &record.detail {
            RecordDetail::SpecialDrive {
                drive_name,
                drive_date,
                cases_handled,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO performance_records
                        (id, module, badge_id, officer_name, department, district,
                         drive_name, drive_date, cases_handled, raw_data, import_job_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    "#,
                )
                .bind(id)
                .bind(module.as_str())
                .bind(&record.badge_id)
                .bind(&record.officer_name)
                .bind(&record.department)
                .bind(&record.district)
                .bind(drive_name)
                .bind(drive_date)
                .bind(cases_handled)
                .bind(&record.raw_data)
                .bind(job_id)
                .execute(&self.pool)
                .await?;
            },
            RecordDetail::Conviction {
                case_number,
                conviction_date,
                crime_type,
                court_name,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO performance_records
                        (id, module, badge_id, officer_name, department, district,
                         case_number, conviction_date, crime_type, court_name,
                         raw_data, import_job_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(id)
                .bind(module.as_str())
                .bind(&record.badge_id)
                .bind(&record.officer_name)
                .bind(&record.department)
                .bind(&record.district)
                .bind(case_number)
                .bind(conviction_date)
                .bind(crime_type)
                .bind(court_name)
                .bind(&record.raw_data)
                .bind(job_id)
                .execute(&self.pool)
                .await?;
            },
            RecordDetail::Detection {
                detection_date,
                crime_category,
                value_recovered,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO performance_records
                        (id, module, badge_id, officer_name, department, district,
                         detection_date, crime_category, value_recovered,
                         raw_data, import_job_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    "#,
                )
                .bind(id)
                .bind(module.as_str())
                .bind(&record.badge_id)
                .bind(&record.officer_name)
                .bind(&record.department)
                .bind(&record.district)
                .bind(detection_date)
                .bind(crime_category)
                .bind(value_recovered)
                .bind(&record.raw_data)
                .bind(job_id)
                .execute(&self.pool)
                .await?;
            },
        }

        Ok(id)
    }

    async fn apply_kpis(&self, record: &NewPerformanceRecord) -> Result<(), StoreError> {
        let delta = kpi_delta(&record.detail);

        // Find-or-create plus named increment in one statement. The
        // increments run inside the database, so there is no
        // read-modify-write window for concurrent uploads to race through.
        sqlx::query(
            r#"
            INSERT INTO officers
                (id, badge_id, name, department, designation, district,
                 cases_closed, cyber_resolved)
            VALUES ($1, $2, COALESCE($3, 'Officer ' || $2), COALESCE($4, 'Unknown'),
                    'Officer', $5, $6, $7)
            ON CONFLICT (badge_id) DO UPDATE SET
                name = COALESCE($3, officers.name),
                department = COALESCE($4, officers.department),
                district = COALESCE($5, officers.district),
                cases_closed = officers.cases_closed + $6,
                cyber_resolved = officers.cyber_resolved + $7,
                last_updated = now(),
                updated_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.badge_id)
        .bind(&record.officer_name)
        .bind(&record.department)
        .bind(&record.district)
        .bind(delta.cases_closed)
        .bind(delta.cyber_resolved)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore").finish_non_exhaustive()
    }
}
