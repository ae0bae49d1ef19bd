//! Generic bounded polling for long-running Atlas jobs.
//!
//! All three job families (store generation, store import, funnel
//! generation) share one loop: fetch status, report progress, stop on a
//! terminal state, give up at the deadline. The loop is parametric over the
//! status payload via [`StatusEnvelope`], so family-specific result shapes
//! never leak in here.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::AtlasError;

/// The only states the engine reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    /// `completed` and `failed` are terminal: once observed, polling stops.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Minimal common envelope every pollable status payload exposes.
pub trait StatusEnvelope {
    fn state(&self) -> JobState;
    fn percentage_complete(&self) -> f64;
    fn error_message(&self) -> Option<&str>;
}

/// Tuning knobs for one polling call.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Maximum wall-clock duration before giving up with
    /// [`AtlasError::Timeout`].
    pub max_wait: Duration,
    /// Fixed delay between successive status checks.
    pub poll_interval: Duration,
    /// When true, a network-level error during one status fetch is logged
    /// and treated as a missed poll instead of aborting the wait. Defaults
    /// to false: a single transient failure surfaces immediately. API-level
    /// rejections always abort regardless of this flag.
    pub retry_on_transport_error: bool,
}

impl Default for PollOptions {
    fn default() -> Self {
        PollOptions {
            max_wait: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            retry_on_transport_error: false,
        }
    }
}

impl PollOptions {
    /// Interactive generation/funnel waits: 10 minutes at 3-second ticks.
    pub fn interactive() -> Self {
        PollOptions {
            max_wait: Duration::from_secs(600),
            poll_interval: Duration::from_secs(3),
            ..PollOptions::default()
        }
    }

    /// Import waits: 5 minutes at 3-second ticks.
    pub fn import() -> Self {
        PollOptions {
            max_wait: Duration::from_secs(300),
            poll_interval: Duration::from_secs(3),
            ..PollOptions::default()
        }
    }
}

/// Poll `fetch_status` until the job reaches a terminal state, the deadline
/// elapses, or `cancel` fires.
///
/// The progress callback, when supplied, runs synchronously on the polling
/// task once per iteration with that iteration's full payload, terminal
/// observations included; keep it cheap or the loop stalls.
///
/// Deadline boundary: elapsed time is checked after each fetch and before
/// the sleep, inclusive of request latency. A fetch therefore lands exactly
/// on the deadline instant, and a job that never terminates sees
/// `floor(max_wait / poll_interval) + 1` status calls before
/// [`AtlasError::Timeout`].
///
/// A terminal `failed` status is returned as `Ok`: a failed job is an
/// expected business outcome, and callers branch on
/// [`StatusEnvelope::state`].
pub async fn wait_for_completion<S, F, Fut>(
    mut fetch_status: F,
    options: &PollOptions,
    cancel: &CancellationToken,
    mut on_progress: Option<&mut dyn FnMut(&S)>,
) -> Result<S, AtlasError>
where
    S: StatusEnvelope,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, AtlasError>>,
{
    let start = Instant::now();
    loop {
        if cancel.is_cancelled() {
            return Err(AtlasError::Cancelled);
        }

        match fetch_status().await {
            Ok(status) => {
                if let Some(cb) = on_progress.as_deref_mut() {
                    cb(&status);
                }
                if status.state().is_terminal() {
                    return Ok(status);
                }
            }
            Err(err) if options.retry_on_transport_error && err.is_transport() => {
                log::warn!("status fetch failed, will poll again: {err}");
            }
            Err(err) => return Err(err),
        }

        if start.elapsed() >= options.max_wait {
            return Err(AtlasError::Timeout);
        }

        tokio::select! {
            _ = tokio::time::sleep(options.poll_interval) => {}
            _ = cancel.cancelled() => return Err(AtlasError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct StubStatus {
        state: JobState,
        percentage: f64,
        error: Option<String>,
        product_name: Option<String>,
    }

    impl StubStatus {
        fn new(state: JobState, percentage: f64) -> Self {
            StubStatus {
                state,
                percentage,
                error: None,
                product_name: None,
            }
        }
    }

    impl StatusEnvelope for StubStatus {
        fn state(&self) -> JobState {
            self.state
        }
        fn percentage_complete(&self) -> f64 {
            self.percentage
        }
        fn error_message(&self) -> Option<&str> {
            self.error.as_deref()
        }
    }

    /// Fetcher that pops scripted responses and counts calls. Once the
    /// script runs dry it keeps repeating the last response.
    fn scripted(
        responses: Vec<StubStatus>,
    ) -> (
        impl FnMut() -> std::future::Ready<Result<StubStatus, AtlasError>>,
        Rc<Cell<usize>>,
    ) {
        let calls = Rc::new(Cell::new(0));
        let calls_out = calls.clone();
        let queue = RefCell::new(responses.into_iter().collect::<VecDeque<_>>());
        let fetch = move || {
            calls.set(calls.get() + 1);
            let mut q = queue.borrow_mut();
            let next = if q.len() > 1 {
                q.pop_front().unwrap()
            } else {
                q.front().cloned().expect("script must not be empty")
            };
            std::future::ready(Ok(next))
        };
        (fetch, calls_out)
    }

    fn quick_options() -> PollOptions {
        PollOptions {
            max_wait: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            retry_on_transport_error: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_completed_and_reports_every_iteration() {
        let mut widget = StubStatus::new(JobState::Completed, 100.0);
        widget.product_name = Some("Widget".into());
        let (fetch, calls) = scripted(vec![
            StubStatus::new(JobState::Pending, 0.0),
            StubStatus::new(JobState::Processing, 40.0),
            StubStatus::new(JobState::Processing, 90.0),
            widget,
        ]);

        let mut seen = Vec::new();
        let cancel = CancellationToken::new();
        let result = wait_for_completion(
            fetch,
            &quick_options(),
            &cancel,
            Some(&mut |s: &StubStatus| seen.push(s.percentage_complete())),
        )
        .await
        .unwrap();

        assert_eq!(result.state(), JobState::Completed);
        assert_eq!(result.product_name.as_deref(), Some("Widget"));
        assert_eq!(calls.get(), 4);
        assert_eq!(seen, vec![0.0, 40.0, 90.0, 100.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_is_a_normal_terminal_return() {
        let mut failed = StubStatus::new(JobState::Failed, 55.0);
        failed.error = Some("generation blew up".into());
        let (fetch, calls) = scripted(vec![StubStatus::new(JobState::Processing, 10.0), failed]);

        let cancel = CancellationToken::new();
        let result = wait_for_completion(fetch, &quick_options(), &cancel, None)
            .await
            .unwrap();

        assert_eq!(result.state(), JobState::Failed);
        assert_eq!(result.error_message(), Some("generation blew up"));
        // No further calls after the terminal observation.
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_floor_plus_one_calls() {
        // 10s max wait, 5s interval: fetches at t=0, t=5s, and on the t=10s
        // boundary itself (inclusive check), then Timeout.
        let (fetch, calls) = scripted(vec![StubStatus::new(JobState::Processing, 50.0)]);
        let options = PollOptions {
            max_wait: Duration::from_secs(10),
            poll_interval: Duration::from_secs(5),
            retry_on_transport_error: false,
        };

        let cancel = CancellationToken::new();
        let err = wait_for_completion(fetch, &options, &cancel, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AtlasError::Timeout));
        assert_eq!(err.code(), 408);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_callback_sees_terminal_payload_too() {
        let (fetch, _) = scripted(vec![StubStatus::new(JobState::Completed, 100.0)]);
        let mut observed = Vec::new();
        let cancel = CancellationToken::new();
        wait_for_completion(
            fetch,
            &quick_options(),
            &cancel,
            Some(&mut |s: &StubStatus| observed.push(s.state())),
        )
        .await
        .unwrap();
        assert_eq!(observed, vec![JobState::Completed]);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_error_aborts_the_wait_by_default() {
        let calls = Rc::new(Cell::new(0));
        let calls_in = calls.clone();
        let fetch = move || {
            calls_in.set(calls_in.get() + 1);
            std::future::ready(Err::<StubStatus, _>(AtlasError::Decode(
                serde_json::from_str::<serde_json::Value>("not json").unwrap_err(),
            )))
        };

        let cancel = CancellationToken::new();
        let err = wait_for_completion(fetch, &quick_options(), &cancel, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::Decode(_)));
        assert_eq!(calls.get(), 1);
    }

    // Real time: the first fetch produces a genuine connection-refused
    // reqwest error, which the engine must treat as a missed poll when
    // retry_on_transport_error is set.
    #[tokio::test]
    async fn transport_error_is_a_missed_poll_when_retry_enabled() {
        let calls = Rc::new(Cell::new(0));
        let calls_in = calls.clone();
        let fetch = move || {
            let n = calls_in.get() + 1;
            calls_in.set(n);
            async move {
                if n == 1 {
                    // Port 9 (discard) is closed in test environments.
                    let err = reqwest::get("http://127.0.0.1:9/").await.unwrap_err();
                    Err(AtlasError::from(err))
                } else {
                    Ok(StubStatus::new(JobState::Completed, 100.0))
                }
            }
        };
        let options = PollOptions {
            max_wait: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
            retry_on_transport_error: true,
        };
        let cancel = CancellationToken::new();
        let result = wait_for_completion(fetch, &options, &cancel, None)
            .await
            .unwrap();
        assert_eq!(result.state(), JobState::Completed);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn non_transport_errors_abort_even_with_retry_enabled() {
        let fetch = || {
            std::future::ready(Err::<StubStatus, _>(AtlasError::ApiRejected {
                status: 500,
                message: "internal".into(),
                details: serde_json::Value::Null,
            }))
        };
        let options = PollOptions {
            retry_on_transport_error: true,
            ..quick_options()
        };
        let cancel = CancellationToken::new();
        let err = wait_for_completion(fetch, &options, &cancel, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::ApiRejected { status: 500, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_sleep() {
        let (fetch, calls) = scripted(vec![StubStatus::new(JobState::Processing, 10.0)]);
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            canceller.cancel();
        });

        let err = wait_for_completion(fetch, &quick_options(), &cancel, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::Cancelled));
        // Cancelled mid-sleep, before the second fetch.
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_skips_the_first_fetch() {
        let (fetch, calls) = scripted(vec![StubStatus::new(JobState::Completed, 100.0)]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = wait_for_completion(fetch, &quick_options(), &cancel, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::Cancelled));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn job_state_wire_names_are_snake_case() {
        assert_eq!(
            serde_json::from_str::<JobState>("\"processing\"").unwrap(),
            JobState::Processing
        );
        assert_eq!(serde_json::to_string(&JobState::Failed).unwrap(), "\"failed\"");
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Processing.is_terminal());
    }
}
