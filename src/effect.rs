//! Effects - side effects declared by the reducer, and the task that runs them

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error};

use crate::action::Action;
use crate::api::{FetchError, WeatherClient};
use crate::state::WeatherReport;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current conditions for `city`, tagged with the search generation
    FetchWeather { request_id: u64, city: String },
}

/// Run one weather fetch and turn its outcome into exactly one terminal action.
///
/// Dropping the returned future (e.g. when a newer search replaces this task)
/// aborts the request.
pub async fn fetch_weather(client: WeatherClient, request_id: u64, city: String) -> Action {
    let fetch_city = city.clone();
    run_fetch(request_id, city, async move {
        client.fetch_current(&fetch_city).await
    })
    .await
}

/// Drive `fetch` in its own Tokio task so a panic or abort inside it still
/// resolves to `WeatherDidError`.
async fn run_fetch<F>(request_id: u64, city: String, fetch: F) -> Action
where
    F: Future<Output = Result<WeatherReport, FetchError>> + Send + 'static,
{
    let outcome = match AbortOnDrop(tokio::spawn(fetch)).await {
        Ok(result) => result,
        Err(join_error) => {
            error!(request_id, %city, error = %join_error, "weather task did not finish");
            Err(FetchError::Interrupted)
        }
    };

    match outcome {
        Ok(report) => Action::WeatherDidLoad { request_id, report },
        Err(err) => {
            debug!(request_id, %city, error = ?err, "weather fetch failed");
            Action::WeatherDidError {
                request_id,
                message: err.to_string(),
            }
        }
    }
}

/// Join handle that aborts its task when dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Future for AbortOnDrop<T> {
    type Output = Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_run_fetch_success() {
        let report = WeatherReport {
            area_name: "Paris".into(),
            ..Default::default()
        };
        let expected = report.clone();

        let action = run_fetch(4, "Paris".into(), async move { Ok(report) }).await;

        assert_eq!(
            action,
            Action::WeatherDidLoad {
                request_id: 4,
                report: expected,
            }
        );
    }

    #[tokio::test]
    async fn test_run_fetch_panic_is_interrupted() {
        let action = run_fetch(9, "Paris".into(), async {
            if true {
                panic!("fetch blew up");
            }
            Err(FetchError::IncompleteData)
        })
        .await;

        assert_eq!(
            action,
            Action::WeatherDidError {
                request_id: 9,
                message: "The weather request was interrupted. Please try again.".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_abort_on_drop_reports_cancelled_task() {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();

        let result = AbortOnDrop(handle).await;

        assert!(result.is_err_and(|e| e.is_cancelled()));
    }

    #[tokio::test]
    async fn test_dropping_fetch_aborts_request_task() {
        let (alive_tx, alive_rx) = oneshot::channel::<()>();
        let fetch = run_fetch(1, "Paris".into(), async move {
            let _alive = alive_tx;
            std::future::pending::<()>().await;
            Err(FetchError::IncompleteData)
        });

        // Cancel the outer future while the request is still in flight.
        let cancelled = tokio::time::timeout(Duration::from_millis(20), fetch).await;
        assert!(cancelled.is_err());

        // The inner task was aborted, so its sender is gone.
        assert!(alive_rx.await.is_err());
    }
}
