// Unit tests for the retry policy.
// Timing is measured on tokio's paused clock so the full 1s/2s/4s/8s schedule
// runs instantly and exactly.

use crate::retry::{OnExhausted, RetryPolicy};

use std::cell::RefCell;
use std::time::Duration;

use tokio::time::Instant;

const BASE_DELAY: Duration = Duration::from_millis(1000);
const TOLERANCE: Duration = Duration::from_millis(5);

fn assert_close(actual: Duration, expected: Duration) {
    assert!(
        actual >= expected && actual <= expected + TOLERANCE,
        "expected ~{expected:?}, got {actual:?}"
    );
}

/// **VALUE**: Pins the exact backoff schedule: immediate first attempt, then
/// 1000, 2000, 4000 and 8000 ms.
///
/// **WHY THIS MATTERS**: The schedule bounds how long a user stares at the
/// progress view when the backend is flaky. Jitter or a different multiplier
/// would silently change the worst case.
///
/// **BUG THIS CATCHES**: Would catch a non-zero randomization factor, a
/// `current_interval` left at the backoff crate's 500ms default, or an
/// off-by-one that sleeps before the first attempt.
#[tokio::test(start_paused = true)]
async fn given_four_failures_then_success_when_run_then_returns_value_after_exponential_delays() {
    // GIVEN: An operation that fails four times, then succeeds
    let policy = RetryPolicy::new(5, BASE_DELAY);
    let start = Instant::now();
    let attempts: RefCell<Vec<Instant>> = RefCell::new(Vec::new());

    // WHEN: Running it through the policy
    let result: Result<&str, String> = policy
        .run("flaky", OnExhausted::Rethrow, || {
            attempts.borrow_mut().push(Instant::now());
            let count = attempts.borrow().len();
            async move {
                if count < 5 {
                    Err(format!("failure {count}"))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

    // THEN: Success value after exactly five attempts
    assert_eq!(result, Ok("done"));
    let attempts = attempts.into_inner();
    assert_eq!(attempts.len(), 5);

    // AND: First attempt immediate, then doubling gaps
    assert_close(attempts[0] - start, Duration::ZERO);
    let expected = [1000, 2000, 4000, 8000];
    for (pair, millis) in attempts.windows(2).zip(expected) {
        assert_close(pair[1] - pair[0], Duration::from_millis(millis));
    }
}

#[tokio::test(start_paused = true)]
async fn given_always_failing_operation_when_rethrow_then_returns_last_error() {
    // GIVEN: An operation that never succeeds
    let policy = RetryPolicy::new(5, BASE_DELAY);
    let calls = RefCell::new(0u32);

    // WHEN: Running with Rethrow
    let result: Result<(), String> = policy
        .run("doomed", OnExhausted::Rethrow, || {
            *calls.borrow_mut() += 1;
            let n = *calls.borrow();
            async move { Err(format!("failure {n}")) }
        })
        .await;

    // THEN: The error is from the fifth attempt
    assert_eq!(result, Err("failure 5".to_string()));
    assert_eq!(calls.into_inner(), 5);
}

#[tokio::test(start_paused = true)]
async fn given_always_failing_operation_when_default_value_then_returns_default_after_all_attempts() {
    // GIVEN: An operation that never succeeds
    let policy = RetryPolicy::new(5, BASE_DELAY);
    let start = Instant::now();
    let calls = RefCell::new(0u32);

    // WHEN: Running with a default value
    let result: Result<Vec<u8>, String> = policy
        .run("optional", OnExhausted::DefaultValue(Vec::new()), || {
            *calls.borrow_mut() += 1;
            async { Err("nope".to_string()) }
        })
        .await;

    // THEN: Default returned, every attempt made, full backoff waited
    assert_eq!(result, Ok(Vec::new()));
    assert_eq!(calls.into_inner(), 5);
    assert_close(start.elapsed(), Duration::from_millis(15_000));
}

#[tokio::test(start_paused = true)]
async fn given_immediate_success_when_run_then_no_delay_and_single_attempt() {
    let policy = RetryPolicy::default();
    let start = Instant::now();
    let calls = RefCell::new(0u32);

    let result: Result<u8, String> = policy
        .run("fine", OnExhausted::Rethrow, || {
            *calls.borrow_mut() += 1;
            async { Ok(7) }
        })
        .await;

    assert_eq!(result, Ok(7));
    assert_eq!(calls.into_inner(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

/// **VALUE**: Errors that cannot change between attempts fail fast instead of
/// burning the whole 15 s backoff budget.
///
/// **BUG THIS CATCHES**: Would catch the retryability check being ignored, or
/// a non-retryable error bypassing `on_exhausted` (a default-value call site
/// must still get its default).
#[tokio::test(start_paused = true)]
async fn given_non_retryable_error_when_run_if_then_stops_after_one_attempt() {
    // GIVEN: An operation whose error is never worth retrying
    let policy = RetryPolicy::new(5, BASE_DELAY);
    let start = Instant::now();
    let calls = RefCell::new(0u32);

    // WHEN: Running with Rethrow
    let rethrown: Result<(), String> = policy
        .run_if(
            "permanent",
            OnExhausted::Rethrow,
            |e: &String| !e.starts_with("bad input"),
            || {
                *calls.borrow_mut() += 1;
                async { Err("bad input: blank".to_string()) }
            },
        )
        .await;

    // THEN: One attempt, no waiting, the error comes back
    assert_eq!(rethrown, Err("bad input: blank".to_string()));
    assert_eq!(calls.replace(0), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);

    // AND: With a default value, the default is still returned after one attempt
    let defaulted: Result<Vec<u8>, String> = policy
        .run_if(
            "permanent",
            OnExhausted::DefaultValue(vec![1]),
            |e: &String| !e.starts_with("bad input"),
            || {
                *calls.borrow_mut() += 1;
                async { Err("bad input: blank".to_string()) }
            },
        )
        .await;

    assert_eq!(defaulted, Ok(vec![1]));
    assert_eq!(calls.into_inner(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_retryable_errors_when_run_if_then_full_schedule_is_used() {
    let policy = RetryPolicy::new(3, BASE_DELAY);
    let calls = RefCell::new(0u32);

    let result: Result<(), String> = policy
        .run_if("transient", OnExhausted::Rethrow, |_: &String| true, || {
            *calls.borrow_mut() += 1;
            async { Err("timeout".to_string()) }
        })
        .await;

    assert_eq!(result, Err("timeout".to_string()));
    assert_eq!(calls.into_inner(), 3);
}

#[test]
fn given_zero_max_attempts_when_constructing_policy_then_one_attempt_is_kept() {
    let policy = RetryPolicy::new(0, BASE_DELAY);

    assert_eq!(policy.max_attempts(), 1);
    assert_eq!(RetryPolicy::default().max_attempts(), 5);
    assert_eq!(RetryPolicy::default().base_delay(), BASE_DELAY);
}
