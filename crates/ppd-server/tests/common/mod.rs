//! Shared test helpers
//!
//! An in-memory [`IngestStore`] implementation that mirrors the Postgres
//! store's observable semantics (job lifecycle, record tagging, atomic-style
//! aggregate increments with lazy creation defaults), so the orchestrator
//! can be exercised without a database.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use ppd_server::ingest::kpi::kpi_delta;
use ppd_server::models::{
    ImportSource, ImportStatus, ModuleKind, NewPerformanceRecord, RowError,
};
use ppd_server::store::{IngestStore, JobOutcome, StoreError};

/// Snapshot of one stored import job
#[derive(Debug, Clone)]
pub struct StoredJob {
    pub filename: String,
    pub source: ImportSource,
    pub module: ModuleKind,
    pub uploaded_by: String,
    pub status: ImportStatus,
    pub total_rows: i32,
    pub processed_rows: i32,
    pub failed_rows: i32,
    pub errors: Vec<RowError>,
}

/// Snapshot of one officer aggregate
#[derive(Debug, Clone)]
pub struct OfficerAggregate {
    pub name: String,
    pub department: String,
    pub district: Option<String>,
    pub cases_closed: i64,
    pub cyber_resolved: i64,
    pub update_count: u32,
}

#[derive(Default)]
struct MemoryStoreInner {
    jobs: HashMap<Uuid, StoredJob>,
    records: Vec<(Uuid, Uuid, NewPerformanceRecord)>,
    officers: HashMap<String, OfficerAggregate>,
    failing_badges: HashSet<String>,
}

/// In-memory store for orchestrator tests
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `insert_record` fail for rows carrying this badge id
    pub fn fail_inserts_for(&self, badge_id: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_badges
            .insert(badge_id.to_string());
    }

    pub fn job(&self, job_id: Uuid) -> Option<StoredJob> {
        self.inner.lock().unwrap().jobs.get(&job_id).cloned()
    }

    pub fn jobs(&self) -> Vec<StoredJob> {
        self.inner.lock().unwrap().jobs.values().cloned().collect()
    }

    /// All stored records as (record id, owning job id, record)
    pub fn records(&self) -> Vec<(Uuid, Uuid, NewPerformanceRecord)> {
        self.inner.lock().unwrap().records.clone()
    }

    pub fn officer(&self, badge_id: &str) -> Option<OfficerAggregate> {
        self.inner.lock().unwrap().officers.get(badge_id).cloned()
    }
}

#[async_trait]
impl IngestStore for MemoryStore {
    async fn create_job(
        &self,
        filename: &str,
        source: ImportSource,
        module: ModuleKind,
        uploaded_by: &str,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().jobs.insert(
            id,
            StoredJob {
                filename: filename.to_string(),
                source,
                module,
                uploaded_by: uploaded_by.to_string(),
                status: ImportStatus::Pending,
                total_rows: 0,
                processed_rows: 0,
                failed_rows: 0,
                errors: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn mark_processing(&self, job_id: Uuid) -> Result<(), StoreError> {
        if let Some(job) = self.inner.lock().unwrap().jobs.get_mut(&job_id) {
            job.status = ImportStatus::Processing;
        }
        Ok(())
    }

    async fn finalize_job(&self, job_id: Uuid, outcome: &JobOutcome) -> Result<(), StoreError> {
        if let Some(job) = self.inner.lock().unwrap().jobs.get_mut(&job_id) {
            job.status = outcome.status;
            job.total_rows = outcome.total_rows;
            job.processed_rows = outcome.processed_rows;
            job.failed_rows = outcome.failed_rows;
            job.errors = outcome.errors.clone();
        }
        Ok(())
    }

    async fn insert_record(
        &self,
        job_id: Uuid,
        record: &NewPerformanceRecord,
    ) -> Result<Uuid, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing_badges.contains(&record.badge_id) {
            return Err(StoreError::Sqlx(sqlx::Error::PoolClosed));
        }
        let id = Uuid::new_v4();
        inner.records.push((id, job_id, record.clone()));
        Ok(id)
    }

    async fn apply_kpis(&self, record: &NewPerformanceRecord) -> Result<(), StoreError> {
        let delta = kpi_delta(&record.detail);
        let mut inner = self.inner.lock().unwrap();

        let aggregate = inner
            .officers
            .entry(record.badge_id.clone())
            .or_insert_with(|| OfficerAggregate {
                name: record
                    .officer_name
                    .clone()
                    .unwrap_or_else(|| format!("Officer {}", record.badge_id)),
                department: record
                    .department
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                district: record.district.clone(),
                cases_closed: 0,
                cyber_resolved: 0,
                update_count: 0,
            });

        if let Some(name) = &record.officer_name {
            aggregate.name = name.clone();
        }
        if let Some(department) = &record.department {
            aggregate.department = department.clone();
        }
        if let Some(district) = &record.district {
            aggregate.district = Some(district.clone());
        }
        aggregate.cases_closed += delta.cases_closed;
        aggregate.cyber_resolved += delta.cyber_resolved;
        aggregate.update_count += 1;

        Ok(())
    }
}
