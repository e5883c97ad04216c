#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use whisper_relay::application::ports::{
    ArtifactStore, ArtifactStoreError, CallbackDeliveryError, CallbackDispatcher,
    CallbackPayload, JobRegistry, TranscriptionEngine, TranscriptionError,
};
use whisper_relay::domain::{ArtifactRef, CallbackTarget, JobId, JobStatus};

pub const API_KEY: &str = "test-service-key";
pub const BOUNDARY: &str = "whisper-relay-test-boundary";

/// Smallest payload the format sniffer accepts as WAV.
pub fn wav_bytes() -> Vec<u8> {
    let mut data = b"RIFF".to_vec();
    data.extend_from_slice(&[36, 0, 0, 0]);
    data.extend_from_slice(b"WAVEfmt ");
    data.extend_from_slice(&[0u8; 32]);
    data
}

pub fn callback_target(url: &str, fields: &[(&str, &str)]) -> CallbackTarget {
    let correlation: BTreeMap<String, String> = fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    CallbackTarget::new(url, correlation).unwrap()
}

pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub enum Part<'a> {
    File(&'a str, &'a [u8]),
    Text(&'a str, &'a str),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File(filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub enum FakeOutcome {
    Transcript(String),
    BadInput,
    EngineFailure,
    Panic,
    Delayed(Duration, String),
}

pub struct FakeTranscriptionEngine {
    outcome: FakeOutcome,
    calls: AtomicUsize,
}

impl FakeTranscriptionEngine {
    pub fn new(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn transcribing(text: &str) -> Self {
        Self::new(FakeOutcome::Transcript(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionEngine for FakeTranscriptionEngine {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            FakeOutcome::Transcript(text) => Ok(text.clone()),
            FakeOutcome::BadInput => Err(TranscriptionError::DecodingFailed(
                "corrupt audio stream".to_string(),
            )),
            FakeOutcome::EngineFailure => Err(TranscriptionError::ApiRequestFailed(
                "status 502: upstream unavailable".to_string(),
            )),
            FakeOutcome::Panic => panic!("decoder exploded"),
            FakeOutcome::Delayed(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
        }
    }
}

/// Blocks inside `transcribe` until the test lets it continue.
#[derive(Default)]
pub struct GatedEngine {
    pub started: Notify,
    pub release: Notify,
}

#[async_trait]
impl TranscriptionEngine for GatedEngine {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok("released".to_string())
    }
}

/// Tracks the highest number of transcriptions running at once.
pub struct ConcurrencyProbeEngine {
    delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyProbeEngine {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionEngine for ConcurrencyProbeEngine {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok("probe".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Delivery {
    pub url: String,
    pub payload: serde_json::Value,
}

#[derive(Default)]
pub struct RecordingCallbackDispatcher {
    deliveries: Mutex<Vec<Delivery>>,
    unreachable: bool,
}

impl RecordingCallbackDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the attempt, then fails it like a refused connection.
    pub fn unreachable() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
            unreachable: true,
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallbackDispatcher for RecordingCallbackDispatcher {
    async fn send(
        &self,
        target: &CallbackTarget,
        payload: &CallbackPayload,
    ) -> Result<(), CallbackDeliveryError> {
        self.deliveries.lock().unwrap().push(Delivery {
            url: target.url().to_string(),
            payload: serde_json::to_value(payload).unwrap(),
        });
        if self.unreachable {
            return Err(CallbackDeliveryError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Blows up on every delivery, after the job has already been recorded.
#[derive(Default)]
pub struct PanickingCallbackDispatcher;

#[async_trait]
impl CallbackDispatcher for PanickingCallbackDispatcher {
    async fn send(
        &self,
        _target: &CallbackTarget,
        _payload: &CallbackPayload,
    ) -> Result<(), CallbackDeliveryError> {
        panic!("callback serializer exploded")
    }
}

/// What the world looked like when a callback went out.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackObservation {
    pub status: Option<JobStatus>,
    pub artifact_present: bool,
}

pub struct ProbingCallbackDispatcher {
    registry: Arc<dyn JobRegistry>,
    store: Arc<dyn ArtifactStore>,
    artifact: ArtifactRef,
    observations: Mutex<Vec<CallbackObservation>>,
}

impl ProbingCallbackDispatcher {
    pub fn new(
        registry: Arc<dyn JobRegistry>,
        store: Arc<dyn ArtifactStore>,
        artifact: ArtifactRef,
    ) -> Self {
        Self {
            registry,
            store,
            artifact,
            observations: Mutex::new(Vec::new()),
        }
    }

    pub fn observations(&self) -> Vec<CallbackObservation> {
        self.observations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallbackDispatcher for ProbingCallbackDispatcher {
    async fn send(
        &self,
        _target: &CallbackTarget,
        payload: &CallbackPayload,
    ) -> Result<(), CallbackDeliveryError> {
        let job_id = JobId::from_uuid(payload.job_id.parse().unwrap());
        let status = self.registry.get(job_id).await.map(|job| job.status);
        let artifact_present = self.store.exists(&self.artifact).await.unwrap();
        self.observations.lock().unwrap().push(CallbackObservation {
            status,
            artifact_present,
        });
        Ok(())
    }
}

/// Refuses every write, as a full disk would.
#[derive(Default)]
pub struct FailingArtifactStore;

#[async_trait]
impl ArtifactStore for FailingArtifactStore {
    async fn save(
        &self,
        _job_id: &JobId,
        _data: Bytes,
        _extension: Option<&str>,
    ) -> Result<ArtifactRef, ArtifactStoreError> {
        Err(ArtifactStoreError::WriteFailed("no space left on device".to_string()))
    }

    async fn fetch(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, ArtifactStoreError> {
        Err(ArtifactStoreError::NotFound(artifact.to_string()))
    }

    async fn delete(&self, _artifact: &ArtifactRef) -> Result<(), ArtifactStoreError> {
        Ok(())
    }

    async fn exists(&self, _artifact: &ArtifactRef) -> Result<bool, ArtifactStoreError> {
        Ok(false)
    }

    async fn purge(&self) -> Result<usize, ArtifactStoreError> {
        Ok(0)
    }
}

/// Polls the store until the artifact is gone.
pub async fn wait_for_artifact_removal(store: &dyn ArtifactStore, artifact: &ArtifactRef) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.exists(artifact).await.unwrap() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("artifact was not removed in time")
}

/// Polls the registry until the job reaches a terminal state.
pub async fn wait_for_terminal(registry: &dyn JobRegistry, job_id: JobId) -> JobStatus {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(job) = registry.get(job_id).await {
                if job.status.is_terminal() {
                    return job.status;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}
