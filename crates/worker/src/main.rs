use chrono::{Days, Utc};
use emivid_heygen::{GeneratorConfig, HeygenApi, RetryConfig, VideoGenerator};
use emivid_pipeline::{ReminderPipeline, SimulatedWhatsApp};
use emivid_speech::SpeechClient;
use emivid_translate::Translator;
use emivid_worker::config::WorkerConfig;
use emivid_worker::runner;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emivid_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env()?;

    let pool = emivid_db::create_pool(&config.database_url).await?;
    emivid_db::health_check(&pool).await?;
    emivid_db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    // One shared HTTP client; service wrappers live for this run only.
    let http = reqwest::Client::new();
    let translator = Translator::with_client(http.clone(), config.translate.clone());
    let speech = SpeechClient::with_client(
        http.clone(),
        config.tts_api_url.clone(),
        config.tts_api_key.clone(),
        config.scratch_dir.clone(),
    );
    let generator = VideoGenerator::new(
        HeygenApi::with_client(
            http,
            config.heygen_api_url.clone(),
            config.heygen_api_key.clone(),
        ),
        GeneratorConfig {
            avatar_id: config.avatar_id.clone(),
            poll_interval: config.poll_interval,
            timeout: config.video_timeout,
            media_dir: config.media_dir.clone(),
            media_url_prefix: config.media_url_prefix.clone(),
            retry: RetryConfig {
                attempts: config.upload_retry_attempts,
                ..Default::default()
            },
        },
    );
    let notifier = SimulatedWhatsApp;
    let pipeline = ReminderPipeline::new(&translator, &speech, &generator, &notifier);

    let cycle_date = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(config.lead_days))
        .expect("cycle date within calendar range");

    let cancel = CancellationToken::new();
    runner::run_batch(&pool, &pipeline, cycle_date, &cancel).await?;

    Ok(())
}
