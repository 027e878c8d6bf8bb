//! Polling: wait for an asynchronous vendor job to reach a terminal state.
//!
//! `poll_until` is vendor-agnostic: the probe classifies each response and the loop
//! applies fixed-interval sleeps, the wall-clock deadline and the unparsable budget.
//! `JobMonitor` binds it to speech-to-text jobs.

use crate::config::PollConfig;
use crate::error::{VoiceError, VoiceResult};
use crate::vendor::{JobSnapshot, JobStatus, SpeechToText, TranscriptionJob};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Classification of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Pending,
    Ready(T),
    Failed(String),
    /// Response could not be read; polling continues until the budget runs out.
    Unparsable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
    /// Consecutive unparsable responses allowed; `None` keeps waiting until the timeout.
    pub max_unparsable: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from(&PollConfig::default())
    }
}

impl From<&PollConfig> for PollSettings {
    fn from(config: &PollConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            timeout: Duration::from_secs(config.timeout_secs),
            max_unparsable: (config.max_unparsable > 0).then_some(config.max_unparsable),
        }
    }
}

/// Probe until `Ready`/`Failed`, or fail with `JobTimeout` once the deadline has passed.
///
/// The deadline is checked after each non-terminal probe, so a job that finishes on
/// the last probe still succeeds. Probe errors abort immediately.
pub async fn poll_until<T, F, Fut>(settings: &PollSettings, mut probe: F) -> VoiceResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = VoiceResult<PollOutcome<T>>>,
{
    let start = Instant::now();
    let mut attempt: u32 = 0;
    let mut unparsable: u32 = 0;

    loop {
        attempt += 1;
        match probe(attempt).await? {
            PollOutcome::Ready(value) => {
                tracing::debug!(target: "selah::poll", attempt, "Job reached terminal success");
                return Ok(value);
            }
            PollOutcome::Failed(details) => return Err(VoiceError::JobFailed(details)),
            PollOutcome::Pending => unparsable = 0,
            PollOutcome::Unparsable(raw) => {
                unparsable += 1;
                tracing::warn!(target: "selah::poll", attempt, unparsable, "Unparsable status response, still waiting");
                if let Some(max) = settings.max_unparsable {
                    if unparsable >= max {
                        return Err(VoiceError::UnrecognizedResponse(format!(
                            "{} consecutive unparsable status responses; last: {}",
                            unparsable,
                            raw.chars().take(200).collect::<String>()
                        )));
                    }
                }
            }
        }

        let elapsed = start.elapsed();
        if elapsed > settings.timeout {
            return Err(VoiceError::JobTimeout {
                waited_secs: elapsed.as_secs(),
            });
        }
        tokio::time::sleep(settings.interval).await;
    }
}

/// Map a speech-to-text status snapshot onto the generic outcome.
pub fn classify_transcription(snapshot: JobSnapshot) -> VoiceResult<PollOutcome<String>> {
    match snapshot {
        JobSnapshot::Parsed {
            status: JobStatus::Finished,
            text: Some(text),
            ..
        } => Ok(PollOutcome::Ready(text)),
        JobSnapshot::Parsed {
            status: JobStatus::Finished,
            text: None,
            raw,
        } => Err(VoiceError::UnrecognizedResponse(format!(
            "finished job without transcript: {}",
            raw.chars().take(200).collect::<String>()
        ))),
        JobSnapshot::Parsed {
            status: JobStatus::Failed,
            raw,
            ..
        } => Ok(PollOutcome::Failed(raw)),
        JobSnapshot::Parsed { .. } => Ok(PollOutcome::Pending),
        JobSnapshot::Unparsable { raw } => Ok(PollOutcome::Unparsable(raw)),
    }
}

/// Waits on one transcription job at a time; holds no per-job state between calls.
pub struct JobMonitor {
    stt: Arc<dyn SpeechToText>,
    settings: PollSettings,
}

impl JobMonitor {
    pub fn new(stt: Arc<dyn SpeechToText>, settings: PollSettings) -> Self {
        Self { stt, settings }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Poll `job` until it finishes and return its transcript.
    pub async fn await_completion(&self, job: &TranscriptionJob) -> VoiceResult<String> {
        let stt = Arc::clone(&self.stt);
        poll_until(&self.settings, |attempt| {
            let stt = Arc::clone(&stt);
            async move {
                tracing::debug!(target: "selah::poll", job_id = %job.id, attempt, "Polling transcription status");
                let snapshot = stt.transcription_status(job).await?;
                classify_transcription(snapshot)
            }
        })
        .await
    }
}
