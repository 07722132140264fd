//! End-to-end orchestrator tests over the in-memory store
//!
//! These exercise the full parse -> transform -> persist -> aggregate loop,
//! including the permissive completion policy, row-order error recording,
//! and the documented non-idempotent aggregate accumulation.

mod common;

use std::sync::Arc;

use common::MemoryStore;
use ppd_server::ingest::{IngestError, IngestionPipeline};
use ppd_server::models::{ImportSource, ImportStatus, ModuleKind};
use ppd_server::store::IngestStore;

fn pipeline(store: &Arc<MemoryStore>) -> IngestionPipeline {
    IngestionPipeline::new(store.clone() as Arc<dyn IngestStore>)
}

const DETECTIONS_CSV: &[u8] =
    b"badgeId,crimeCategory,valueRecovered\nB1,Cyber Fraud,5000\nB2,Theft,200\n,Cyber,\n";

#[tokio::test]
async fn detections_batch_isolates_the_bad_row() {
    let store = MemoryStore::shared();

    let report = pipeline(&store)
        .run(
            DETECTIONS_CSV,
            "detections.csv",
            ImportSource::CctnsDetections,
            ModuleKind::Detections,
            "admin",
        )
        .await
        .unwrap();

    assert_eq!(report.status, ImportStatus::Completed);
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.processed_rows, 2);
    assert_eq!(report.failed_rows, 1);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 3);
    assert_eq!(report.errors[0].field, "transformation");
    assert_eq!(report.errors[0].message, "Missing badge ID");

    // Only the cyber-categorized detection moves the cyber counter
    assert_eq!(store.officer("B1").unwrap().cyber_resolved, 1);
    assert_eq!(store.officer("B2").unwrap().cyber_resolved, 0);

    // The finalized job mirrors the report and the declared upload fields
    let job = store.job(report.job_id).unwrap();
    assert_eq!(job.status, ImportStatus::Completed);
    assert_eq!(job.processed_rows + job.failed_rows, job.total_rows);
    assert_eq!(job.filename, "detections.csv");
    assert_eq!(job.source, ImportSource::CctnsDetections);
    assert_eq!(job.module, ModuleKind::Detections);
    assert_eq!(job.uploaded_by, "admin");
}

#[tokio::test]
async fn zero_row_file_completes_with_zero_totals() {
    let store = MemoryStore::shared();

    let report = pipeline(&store)
        .run(
            b"badgeId,crimeCategory\n",
            "empty.csv",
            ImportSource::Csv,
            ModuleKind::Detections,
            "admin",
        )
        .await
        .unwrap();

    // A file that parses to no rows is not a failure
    assert_eq!(report.status, ImportStatus::Completed);
    assert_eq!(report.total_rows, 0);
    assert_eq!(report.processed_rows, 0);
    assert_eq!(report.failed_rows, 0);
    assert!(report.errors.is_empty());
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn clean_conviction_batch_links_every_record_to_the_job() {
    let store = MemoryStore::shared();
    let csv = b"badgeId,caseNumber,crimeType\nB10,CR-1,Theft\nB11,CR-2,Fraud\nB12,CR-3,Assault\n";

    let report = pipeline(&store)
        .run(
            csv,
            "convictions.csv",
            ImportSource::CctnsConvictions,
            ModuleKind::Convictions,
            "ops",
        )
        .await
        .unwrap();

    assert_eq!(report.status, ImportStatus::Completed);
    assert_eq!(report.failed_rows, 0);

    let records = store.records();
    assert_eq!(records.len(), 3);
    for (_, job_id, record) in &records {
        assert_eq!(*job_id, report.job_id);
        assert_eq!(record.module(), ModuleKind::Convictions);
    }

    // Each conviction adds exactly one closed case
    for badge in ["B10", "B11", "B12"] {
        assert_eq!(store.officer(badge).unwrap().cases_closed, 1);
    }
}

#[tokio::test]
async fn unsupported_extension_is_a_hard_failure() {
    let store = MemoryStore::shared();

    let err = pipeline(&store)
        .run(
            b"irrelevant bytes",
            "report.docx",
            ImportSource::Manual,
            ModuleKind::Convictions,
            "admin",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::UnsupportedFormat(ref ext) if ext == "docx"));

    // No rows were processed, but the job record exists and is failed
    assert!(store.records().is_empty());
    let jobs = store.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, ImportStatus::Failed);
    assert_eq!(jobs[0].errors.len(), 1);
    assert_eq!(jobs[0].errors[0].row, 0);
    assert_eq!(jobs[0].errors[0].field, "file_parsing");
}

#[tokio::test]
async fn hard_failure_marks_the_job_failed_with_synthetic_error() {
    let store = MemoryStore::shared();
    let p = pipeline(&store);

    // Valid extension, garbage bytes: fails during parsing
    let err = p
        .run(
            b"definitely not a workbook",
            "drives.xlsx",
            ImportSource::Excel,
            ModuleKind::SpecialDrives,
            "admin",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Parse(_)));

    assert!(store.records().is_empty());
    let jobs = store.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, ImportStatus::Failed);
    assert_eq!(jobs[0].errors[0].field, "file_parsing");
    assert_eq!(jobs[0].total_rows, 0);
}

#[tokio::test]
async fn every_row_failing_marks_the_job_failed() {
    let store = MemoryStore::shared();
    let csv = b"officerName,crimeType\nAsha,Theft\nRavi,Fraud\n";

    let report = pipeline(&store)
        .run(
            csv,
            "no_badges.csv",
            ImportSource::CctnsConvictions,
            ModuleKind::Convictions,
            "admin",
        )
        .await
        .unwrap();

    assert_eq!(report.status, ImportStatus::Failed);
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.failed_rows, 2);
    assert_eq!(report.processed_rows, 0);

    // Same reason string on every row
    for error in &report.errors {
        assert_eq!(error.message, "Missing badge ID");
    }

    // Errors are recorded in file order
    let rows: Vec<i32> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![1, 2]);
}

#[tokio::test]
async fn one_surviving_row_still_completes_the_job() {
    let store = MemoryStore::shared();
    let csv = b"badgeId,driveName\nB1,Operation Night Watch\n,missing\n,also missing\n";

    let report = pipeline(&store)
        .run(
            csv,
            "drives.csv",
            ImportSource::CctnsSpecialDrives,
            ModuleKind::SpecialDrives,
            "admin",
        )
        .await
        .unwrap();

    // Permissive policy: one success out of three keeps the job completed
    assert_eq!(report.status, ImportStatus::Completed);
    assert_eq!(report.processed_rows, 1);
    assert_eq!(report.failed_rows, 2);
}

#[tokio::test]
async fn per_row_store_failure_does_not_abort_the_batch() {
    let store = MemoryStore::shared();
    store.fail_inserts_for("B2");

    let csv = b"badgeId,caseNumber\nB1,CR-1\nB2,CR-2\nB3,CR-3\n";
    let report = pipeline(&store)
        .run(
            csv,
            "convictions.csv",
            ImportSource::CctnsConvictions,
            ModuleKind::Convictions,
            "admin",
        )
        .await
        .unwrap();

    assert_eq!(report.status, ImportStatus::Completed);
    assert_eq!(report.processed_rows, 2);
    assert_eq!(report.failed_rows, 1);
    assert_eq!(report.errors[0].row, 2);
    assert_eq!(report.errors[0].field, "general");

    // The failing row never reached the aggregate
    assert!(store.officer("B2").is_none());
    assert_eq!(store.officer("B1").unwrap().cases_closed, 1);
    assert_eq!(store.officer("B3").unwrap().cases_closed, 1);
}

#[tokio::test]
async fn unparsable_cases_handled_defaults_to_zero_without_failing() {
    let store = MemoryStore::shared();
    let csv = b"badgeId,casesHandled\nB1,a dozen\n";

    let report = pipeline(&store)
        .run(
            csv,
            "drives.csv",
            ImportSource::CctnsSpecialDrives,
            ModuleKind::SpecialDrives,
            "admin",
        )
        .await
        .unwrap();

    assert_eq!(report.processed_rows, 1);
    assert_eq!(report.failed_rows, 0);
    assert_eq!(store.officer("B1").unwrap().cases_closed, 0);
}

#[tokio::test]
async fn reingesting_the_same_file_doubles_the_counters() {
    // Documented behavior, not a bug: aggregate accumulation is a function
    // of which runs executed, so re-uploads double-count.
    let store = MemoryStore::shared();
    let p = pipeline(&store);
    let csv = b"badgeId,casesHandled\nB1,5\n";

    for _ in 0..2 {
        p.run(
            csv,
            "drives.csv",
            ImportSource::CctnsSpecialDrives,
            ModuleKind::SpecialDrives,
            "admin",
        )
        .await
        .unwrap();
    }

    let officer = store.officer("B1").unwrap();
    assert_eq!(officer.cases_closed, 10);
    assert_eq!(officer.update_count, 2);
}

#[tokio::test]
async fn aggregate_is_created_lazily_with_defaults() {
    let store = MemoryStore::shared();
    let csv = b"badgeId,caseNumber\nB77,CR-9\n";

    pipeline(&store)
        .run(
            csv,
            "convictions.csv",
            ImportSource::CctnsConvictions,
            ModuleKind::Convictions,
            "admin",
        )
        .await
        .unwrap();

    let officer = store.officer("B77").unwrap();
    assert_eq!(officer.name, "Officer B77");
    assert_eq!(officer.department, "Unknown");
    assert!(officer.district.is_none());
}

#[tokio::test]
async fn aggregate_refreshes_identity_fields_when_provided() {
    let store = MemoryStore::shared();
    let p = pipeline(&store);

    p.run(
        b"badgeId,caseNumber\nB5,CR-1\n",
        "first.csv",
        ImportSource::CctnsConvictions,
        ModuleKind::Convictions,
        "admin",
    )
    .await
    .unwrap();

    p.run(
        b"badgeId,officerName,district\nB5,Asha Patnaik,Cuttack\n",
        "second.csv",
        ImportSource::CctnsConvictions,
        ModuleKind::Convictions,
        "admin",
    )
    .await
    .unwrap();

    let officer = store.officer("B5").unwrap();
    assert_eq!(officer.name, "Asha Patnaik");
    assert_eq!(officer.district.as_deref(), Some("Cuttack"));
    assert_eq!(officer.cases_closed, 2);
}
