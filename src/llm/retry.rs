use crate::constants::DEFAULT_RETRY_DELAY;
use crate::errors::RetryError;
use crate::llm::{CompletionRequest, LlmClient};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

/// How long to keep retrying a failing completion call
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts before giving up; `None` retries forever
    pub max_attempts: Option<u32>,
    /// Pause after the first failure
    pub delay: Duration,
    /// Multiplier applied to the pause after each further failure, 1.0 keeps it fixed
    pub backoff: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: None,
            delay: DEFAULT_RETRY_DELAY,
            backoff: 1.0,
        }
    }
}

impl RetryPolicy {
    /// Pause to observe after the `failures`-th consecutive failure (1-based)
    pub fn delay_after(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1) as i32;
        self.delay.mul_f64(self.backoff.powi(exponent))
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Completion client bound to the run's model settings and retry policy.
///
/// Every agent goes through this caller, so a flaky provider stalls the loop
/// instead of aborting it unless the policy bounds the attempts.
#[derive(Debug)]
pub struct RetryingCaller {
    client: LlmClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
    policy: RetryPolicy,
}

impl RetryingCaller {
    pub fn new(
        client: LlmClient,
        model: &str,
        temperature: f32,
        max_tokens: u32,
        policy: RetryPolicy,
    ) -> Self {
        RetryingCaller {
            client,
            model: model.to_string(),
            temperature,
            max_tokens,
            policy,
        }
    }

    /// Completes `prompt` with the default short token budget
    pub async fn call(&self, prompt: &str) -> Result<String, RetryError> {
        self.call_with_max_tokens(prompt, self.max_tokens).await
    }

    pub async fn call_with_max_tokens(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, RetryError> {
        let request = CompletionRequest {
            prompt: prompt.to_string(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens,
        };
        self.call_with_retry(&request).await
    }

    /// Repeats the identical request until it succeeds or the policy gives up
    pub async fn call_with_retry(&self, request: &CompletionRequest) -> Result<String, RetryError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.client.complete(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    error!("Error: {}", e);
                    if self.policy.exhausted(attempts) {
                        warn!("Giving up after {} attempts", attempts);
                        return Err(RetryError::Exhausted {
                            attempts,
                            last_error: e,
                        });
                    }
                    let pause = self.policy.delay_after(attempts);
                    warn!("Retrying in {}", humantime::format_duration(pause));
                    sleep(pause).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProvider;

    fn quick_policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
            backoff: 1.0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_fixed_delay_cycles() {
        let provider = ScriptedProvider::new(vec![Err("timeout"), Err("quota"), Ok("OK")]);
        let calls = provider.calls();
        let caller = RetryingCaller::new(
            LlmClient::from_provider(Box::new(provider)),
            "gpt-3.5-turbo",
            0.4,
            100,
            RetryPolicy::default(),
        );

        let started = tokio::time::Instant::now();
        assert_eq!(caller.call("ping").await.unwrap(), "OK");
        assert_eq!(started.elapsed(), Duration::from_secs(20));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.prompt == "ping" && c.max_tokens == 100));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_stretches_each_pause() {
        let provider = ScriptedProvider::new(vec![Err("a"), Err("b"), Err("c"), Ok("OK")]);
        let caller = RetryingCaller::new(
            LlmClient::from_provider(Box::new(provider)),
            "gpt-3.5-turbo",
            0.4,
            100,
            RetryPolicy {
                max_attempts: None,
                delay: Duration::from_secs(1),
                backoff: 2.0,
            },
        );

        let started = tokio::time::Instant::now();
        caller.call("ping").await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(1 + 2 + 4));
    }

    #[tokio::test]
    async fn bounded_policy_reports_exhaustion() {
        let provider = ScriptedProvider::new(vec![Err("down"), Err("still down"), Ok("late")]);
        let caller = RetryingCaller::new(
            LlmClient::from_provider(Box::new(provider)),
            "gpt-3.5-turbo",
            0.4,
            100,
            quick_policy(Some(2)),
        );

        match caller.call("ping").await {
            Err(RetryError::Exhausted {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 2);
                assert!(last_error.to_string().contains("still down"));
            }
            Ok(text) => panic!("expected exhaustion, got {}", text),
        }
    }

    #[tokio::test]
    async fn execution_budget_is_forwarded() {
        let provider = ScriptedProvider::new(vec![Ok("long prose")]);
        let calls = provider.calls();
        let caller = RetryingCaller::new(
            LlmClient::from_provider(Box::new(provider)),
            "llama3",
            0.7,
            100,
            quick_policy(None),
        );

        caller.call_with_max_tokens("write", 2000).await.unwrap();
        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].max_tokens, 2000);
        assert_eq!(calls[0].model, "llama3");
        assert_eq!(calls[0].temperature, 0.7);
    }

    #[test]
    fn fixed_delay_unless_backoff_grows() {
        let fixed = RetryPolicy::default();
        assert_eq!(fixed.delay_after(1), Duration::from_secs(10));
        assert_eq!(fixed.delay_after(5), Duration::from_secs(10));

        let growing = RetryPolicy {
            backoff: 2.0,
            ..RetryPolicy::default()
        };
        assert_eq!(growing.delay_after(1), Duration::from_secs(10));
        assert_eq!(growing.delay_after(3), Duration::from_secs(40));
    }
}
