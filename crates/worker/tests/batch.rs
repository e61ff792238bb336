//! Integration tests for the reminder batch runner.
//!
//! External endpoints point at an unroutable port, so every pipeline
//! run fails at the render stage. What matters here is the batch
//! contract: one reminder row per due loan, terminal statuses
//! persisted, and no loan's failure stopping the loop.

use std::time::Duration;

use chrono::NaiveDate;
use emivid_db::models::customer::CreateCustomer;
use emivid_db::models::loan::CreateLoan;
use emivid_db::models::reminder::ReminderListQuery;
use emivid_db::models::status::ReminderStatus;
use emivid_db::repositories::{CustomerRepo, LoanRepo, ReminderRepo};
use emivid_heygen::{GeneratorConfig, HeygenApi, RetryConfig, VideoGenerator};
use emivid_pipeline::{ReminderPipeline, SimulatedWhatsApp};
use emivid_speech::SpeechClient;
use emivid_translate::{Translator, TranslatorConfig};
use emivid_worker::runner::run_batch;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

fn cycle_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 23).unwrap()
}

async fn seed_due_loan(pool: &PgPool, n: u32) {
    let customer = CustomerRepo::create(
        pool,
        &CreateCustomer {
            name: format!("Customer {n}"),
            whatsapp_number: format!("+9112345678{n:02}"),
            preferred_language: None,
        },
    )
    .await
    .unwrap();
    LoanRepo::create(
        pool,
        &CreateLoan {
            customer_id: customer.id,
            loan_number: format!("E{n:05}"),
            emi_amount: Decimal::from(20000),
            due_date: cycle_date(),
            is_active: None,
        },
    )
    .await
    .unwrap();
}

fn unreachable_generator(media_dir: &std::path::Path) -> VideoGenerator {
    VideoGenerator::new(
        HeygenApi::new("http://127.0.0.1:9".to_string(), "test".to_string()),
        GeneratorConfig {
            avatar_id: "avatar-1".to_string(),
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_millis(50),
            media_dir: media_dir.to_path_buf(),
            media_url_prefix: "https://media.example.com".to_string(),
            retry: RetryConfig {
                attempts: 1,
                initial_delay: Duration::from_millis(1),
                ..Default::default()
            },
        },
    )
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failing_pipelines_never_abort_the_batch(pool: PgPool) {
    for n in 1..=3 {
        seed_due_loan(&pool, n).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let translator = Translator::new(TranslatorConfig::Disabled);
    let speech = SpeechClient::new(
        "http://127.0.0.1:9".to_string(),
        "test".to_string(),
        dir.path().to_path_buf(),
    );
    let generator = unreachable_generator(dir.path());
    let pipeline = ReminderPipeline::new(&translator, &speech, &generator, &SimulatedWhatsApp);

    let summary = run_batch(&pool, &pipeline, cycle_date(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.sent, 0);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.skipped, 0);

    // Every loan got its reminder row, each in a terminal status.
    let reminders = ReminderRepo::list(&pool, &ReminderListQuery::default())
        .await
        .unwrap();
    assert_eq!(reminders.len(), 3);
    for reminder in &reminders {
        assert_eq!(reminder.status_id, ReminderStatus::Failed.id());
        assert_eq!(reminder.video_url, None);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_run_finds_nothing_to_do(pool: PgPool) {
    seed_due_loan(&pool, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let translator = Translator::new(TranslatorConfig::Disabled);
    let speech = SpeechClient::new(
        "http://127.0.0.1:9".to_string(),
        "test".to_string(),
        dir.path().to_path_buf(),
    );
    let generator = unreachable_generator(dir.path());
    let pipeline = ReminderPipeline::new(&translator, &speech, &generator, &SimulatedWhatsApp);

    let first = run_batch(&pool, &pipeline, cycle_date(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.processed, 1);

    // The failed reminder claimed the cycle; the loan is no longer due.
    let second = run_batch(&pool, &pipeline, cycle_date(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(second.processed, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_cycle_is_a_clean_run(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let translator = Translator::new(TranslatorConfig::Disabled);
    let speech = SpeechClient::new(
        "http://127.0.0.1:9".to_string(),
        "test".to_string(),
        dir.path().to_path_buf(),
    );
    let generator = unreachable_generator(dir.path());
    let pipeline = ReminderPipeline::new(&translator, &speech, &generator, &SimulatedWhatsApp);

    let summary = run_batch(&pool, &pipeline, cycle_date(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.processed, 0);
}
