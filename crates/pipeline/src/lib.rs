//! Per-loan reminder pipeline.
//!
//! Stitches the collaborators together for one reminder:
//! compose the script, translate it, acquire a voice, render the
//! avatar video, deliver it. All collaborators are injected, so tests
//! (and future deployments) can substitute any of them. Failures come
//! back as a typed [`PipelineFailure`]; no raw collaborator error
//! crosses the pipeline boundary.

use chrono::NaiveDate;
use emivid_core::script::{compose_script, ScriptParams};
use emivid_core::voice::voice_for_language;
use emivid_heygen::{RenderedVideo, VideoGenerator, VoiceSource};
use emivid_speech::SpeechClient;
use emivid_translate::Translator;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

pub mod notify;

pub use notify::{DeliveryReceipt, Notifier, NotifyError, SimulatedWhatsApp};

/// Everything the pipeline needs to know about one due loan.
#[derive(Debug, Clone)]
pub struct ReminderRequest {
    pub event_type: String,
    pub customer_name: String,
    pub whatsapp_number: String,
    pub preferred_language: String,
    pub loan_number: String,
    pub emi_amount: Decimal,
    pub due_date: NaiveDate,
}

/// How the video gets its voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechMode {
    /// Synthesize audio locally and upload it; fall back to
    /// [`ProviderVoice`](Self::ProviderVoice) if synthesis fails.
    Synthesize,
    /// Send raw text and let the provider voice it.
    ProviderVoice,
}

/// Pipeline step a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Render,
    Notify,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Render => "render",
            PipelineStage::Notify => "notify",
        }
    }
}

/// Typed failure the job runner records against the reminder.
#[derive(Debug, thiserror::Error)]
#[error("Pipeline {} stage failed: {reason}", .stage.as_str())]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    pub reason: String,
}

/// A fully delivered reminder.
#[derive(Debug)]
pub struct SentReminder {
    /// The script as spoken (translated where applicable).
    pub script: String,
    pub video: RenderedVideo,
    pub receipt: DeliveryReceipt,
}

/// One-reminder pipeline over injected collaborators.
pub struct ReminderPipeline<'a> {
    translator: &'a Translator,
    speech: &'a SpeechClient,
    generator: &'a VideoGenerator,
    notifier: &'a dyn Notifier,
    speech_mode: SpeechMode,
}

impl<'a> ReminderPipeline<'a> {
    pub fn new(
        translator: &'a Translator,
        speech: &'a SpeechClient,
        generator: &'a VideoGenerator,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            translator,
            speech,
            generator,
            notifier,
            speech_mode: SpeechMode::Synthesize,
        }
    }

    pub fn with_speech_mode(mut self, mode: SpeechMode) -> Self {
        self.speech_mode = mode;
        self
    }

    /// Produce and deliver one reminder video.
    ///
    /// Script composition and translation cannot fail by contract;
    /// voice acquisition degrades to the provider voice rather than
    /// failing. Only the render and notify steps can sink a reminder.
    pub async fn run(
        &self,
        request: &ReminderRequest,
        cancel: &CancellationToken,
    ) -> Result<SentReminder, PipelineFailure> {
        let english = compose_script(
            &request.event_type,
            &ScriptParams {
                customer_name: request.customer_name.clone(),
                loan_number: request.loan_number.clone(),
                emi_amount: request.emi_amount,
                due_date: request.due_date,
            },
        );
        let script = self
            .translator
            .translate(&english, &request.preferred_language)
            .await;

        tracing::debug!(
            loan_number = %request.loan_number,
            language = %request.preferred_language,
            "Reminder script ready",
        );

        let voice = self
            .acquire_voice(&script, &request.preferred_language)
            .await;

        let video = self
            .generator
            .render(voice, cancel)
            .await
            .map_err(|e| PipelineFailure {
                stage: PipelineStage::Render,
                reason: e.to_string(),
            })?;

        let receipt = self
            .notifier
            .send_video(&request.whatsapp_number, &script, &video.public_url)
            .await
            .map_err(|e| PipelineFailure {
                stage: PipelineStage::Notify,
                reason: e.to_string(),
            })?;

        tracing::info!(
            loan_number = %request.loan_number,
            video_url = %video.public_url,
            message_sid = %receipt.message_sid,
            "Reminder delivered",
        );

        Ok(SentReminder {
            script,
            video,
            receipt,
        })
    }

    /// Pick the voice input per [`SpeechMode`].
    ///
    /// A synthesis failure is logged and degrades to the provider
    /// voice; bad audio alone must not cost the customer the reminder.
    async fn acquire_voice(&self, script: &str, language: &str) -> VoiceSource {
        match self.speech_mode {
            SpeechMode::ProviderVoice => provider_voice(script, language),
            SpeechMode::Synthesize => match self.speech.synthesize(script, language).await {
                Ok(audio) => VoiceSource::Audio(audio),
                Err(e) => {
                    tracing::warn!(
                        language,
                        error = %e,
                        "Speech synthesis failed, using provider voice",
                    );
                    provider_voice(script, language)
                }
            },
        }
    }
}

fn provider_voice(script: &str, language: &str) -> VoiceSource {
    VoiceSource::Text {
        text: script.to_string(),
        voice_id: voice_for_language(language).to_string(),
    }
}
