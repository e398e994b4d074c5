use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::forms::models::FormConfig;

/// Destination for editor saves. The production sink is the form service's
/// full-replace update; tests substitute recorders.
#[async_trait]
pub trait SaveSink: Send + Sync {
    async fn save(&self, form_id: Uuid, config: &FormConfig) -> Result<()>;
}

/// Trailing-debounce auto-save.
///
/// Each [`schedule`] aborts the pending debounce task and replaces it with
/// a fresh one carrying the latest snapshot, so within one quiet window at
/// most one save fires and it carries the final state. Because the whole
/// sleep-then-save task is abortable, a superseded save that is already in
/// flight is cancelled at its next await point instead of landing a stale
/// write. Sink failures are logged, never surfaced.
///
/// [`schedule`]: AutoSaver::schedule
pub struct AutoSaver {
    sink: Arc<dyn SaveSink>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl AutoSaver {
    pub fn new(sink: Arc<dyn SaveSink>, delay: Duration) -> Self {
        Self {
            sink,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// Schedule a save of `config`, cancelling and replacing any pending one.
    pub fn schedule(&mut self, form_id: Uuid, config: FormConfig) {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let sink = Arc::clone(&self.sink);
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // A newer edit superseded this snapshot while we slept.
            if generation.load(Ordering::SeqCst) != my_generation {
                return;
            }

            if let Err(e) = sink.save(form_id, &config).await {
                warn!("Auto-save failed for form {}: {}", form_id, e);
            }
        }));
    }

    /// Abort the pending save, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Wait for the pending save to run to completion.
    #[allow(dead_code)]
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        saves: Mutex<Vec<(Uuid, FormConfig)>>,
    }

    #[async_trait]
    impl SaveSink for RecordingSink {
        async fn save(&self, form_id: Uuid, config: &FormConfig) -> Result<()> {
            self.saves.lock().await.push((form_id, config.clone()));
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl SaveSink for FailingSink {
        async fn save(&self, _form_id: Uuid, _config: &FormConfig) -> Result<()> {
            Err(AppError::Internal("save sink unavailable".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_edits_in_window_produce_one_save_with_final_state() {
        let sink = Arc::new(RecordingSink::default());
        let mut saver = AutoSaver::new(sink.clone(), Duration::from_millis(1000));
        let form_id = Uuid::new_v4();

        let mut config = FormConfig::default();
        config.title = "First".to_string();
        saver.schedule(form_id, config.clone());

        tokio::time::sleep(Duration::from_millis(200)).await;

        config.title = "Second".to_string();
        saver.schedule(form_id, config.clone());

        saver.flush().await;

        let saves = sink.saves.lock().await;
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0, form_id);
        assert_eq!(saves[0].1.title, "Second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_in_separate_windows_each_save() {
        let sink = Arc::new(RecordingSink::default());
        let mut saver = AutoSaver::new(sink.clone(), Duration::from_millis(1000));
        let form_id = Uuid::new_v4();

        saver.schedule(form_id, FormConfig::default());
        saver.flush().await;

        saver.schedule(form_id, FormConfig::default());
        saver.flush().await;

        assert_eq!(sink.saves.lock().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_save() {
        let sink = Arc::new(RecordingSink::default());
        let mut saver = AutoSaver::new(sink.clone(), Duration::from_millis(1000));

        saver.schedule(Uuid::new_v4(), FormConfig::default());
        saver.cancel();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(sink.saves.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_failure_is_swallowed() {
        let mut saver = AutoSaver::new(Arc::new(FailingSink), Duration::from_millis(100));
        saver.schedule(Uuid::new_v4(), FormConfig::default());
        // Must not panic or propagate; failures are only logged.
        saver.flush().await;
    }
}
