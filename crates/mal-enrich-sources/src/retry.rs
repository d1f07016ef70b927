use crate::error::FetchError;
use mal_enrich_config::RetrySettings;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Bounded exponential backoff for rate-limited or blocked responses.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(32),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_backoff: Duration::from_secs(settings.initial_backoff_secs),
            max_backoff: Duration::from_secs(settings.max_backoff_secs),
        }
    }
}

fn is_retryable(status: u16) -> bool {
    matches!(status, 429 | 403)
}

fn retry_after_seconds(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Execute `request` with retries on 429/403 and on request timeouts.
///
/// A `Retry-After` header pins the next backoff to exactly that many
/// seconds; otherwise the backoff doubles, capped at `max_backoff`.
/// Exhausting retries surfaces `FetchError::RateLimited` for the caller
/// to handle; other transport errors propagate immediately.
pub async fn retry_with_backoff<F, Fut>(
    policy: &RetryPolicy,
    mut request: F,
) -> Result<reqwest::Response, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut backoff = policy.initial_backoff;

    for attempt in 0..=policy.max_retries {
        let last_attempt = attempt == policy.max_retries;
        match request().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if !is_retryable(status) {
                    return Ok(response);
                }
                if last_attempt {
                    return Err(FetchError::RateLimited(status));
                }
                if let Some(secs) = retry_after_seconds(&response) {
                    backoff = Duration::from_secs(secs);
                }
                debug!(status, backoff_ms = backoff.as_millis() as u64, "rate limited, backing off");
            }
            Err(err) if err.is_timeout() && !last_attempt => {
                debug!(backoff_ms = backoff.as_millis() as u64, "request timed out, retrying");
            }
            Err(err) => return Err(err.into()),
        }

        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(policy.max_backoff);
    }

    unreachable!("final attempt always returns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn response(status: u16) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body("")
            .unwrap()
            .into()
    }

    fn response_with_retry_after(status: u16, secs: u64) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .header("Retry-After", secs.to_string())
            .body("")
            .unwrap()
            .into()
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_retry_on_ok() {
        let result = retry_with_backoff(&RetryPolicy::default(), || {
            std::future::ready(Ok(response(200)))
        })
        .await;
        assert_eq!(result.unwrap().status(), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_rate_limits_with_doubling_backoff() {
        let mut statuses = vec![429, 429, 200].into_iter();
        let start = Instant::now();

        let result = retry_with_backoff(&RetryPolicy::default(), move || {
            std::future::ready(Ok(response(statuses.next().unwrap())))
        })
        .await;

        assert_eq!(result.unwrap().status(), 200);
        // 1s then 2s of backoff before the successful attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn honors_retry_after_header() {
        let mut responses = vec![
            response_with_retry_after(429, 7),
            response(200),
        ]
        .into_iter();
        let start = Instant::now();

        let result = retry_with_backoff(&RetryPolicy::default(), move || {
            std::future::ready(Ok(responses.next().unwrap()))
        })
        .await;

        assert_eq!(result.unwrap().status(), 200);
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_is_capped_at_max() {
        let policy = RetryPolicy {
            max_retries: 4,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(2),
        };
        let mut statuses = vec![429, 429, 429, 429, 200].into_iter();
        let start = Instant::now();

        let result = retry_with_backoff(&policy, move || {
            std::future::ready(Ok(response(statuses.next().unwrap())))
        })
        .await;

        assert_eq!(result.unwrap().status(), 200);
        // 1s + 2s + 2s + 2s: doubling stops at the cap.
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_surfaces_rate_limited() {
        let result = retry_with_backoff(&RetryPolicy::default(), || {
            std::future::ready(Ok(response(403)))
        })
        .await;

        match result {
            Err(FetchError::RateLimited(403)) => {}
            other => panic!("expected RateLimited(403), got {other:?}"),
        }
    }
}
