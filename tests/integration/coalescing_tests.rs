//! Coalescing tests
//!
//! Concurrent duplicate calls share one upstream invocation, both at the
//! coalescer level and through the whole orchestrator.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use llm_gateway::core::coalescer::RequestCoalescer;
use llm_gateway::monitoring::metrics::GatewayMetrics;
use llm_gateway::{ChatResponse, FinishReason, Usage};

use crate::common::{chat_request, fast_config, orchestrator_with, Behavior, ScriptedProvider};

fn response(id: &str) -> ChatResponse {
    ChatResponse {
        id: id.to_string(),
        content: "shared".to_string(),
        model: "test".to_string(),
        finish_reason: FinishReason::Stop,
        usage: Usage::default(),
    }
}

#[tokio::test]
async fn five_concurrent_callers_share_one_invocation() {
    let coalescer = Arc::new(RequestCoalescer::new(
        Duration::from_millis(100),
        Arc::new(GatewayMetrics::new().unwrap()),
    ));
    let counter = Arc::new(AtomicU32::new(0));

    let mut handles = Vec::new();
    for _ in 0..5 {
        let coalescer = Arc::clone(&coalescer);
        let counter = Arc::clone(&counter);
        handles.push(tokio::spawn(async move {
            coalescer
                .execute("k", move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(response("only"))
                })
                .await
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.id, "only");
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn orchestrator_coalesces_identical_concurrent_requests() {
    let provider = Arc::new(
        ScriptedProvider::new(Behavior::Succeed).with_delay(Duration::from_millis(40)),
    );
    let orchestrator = Arc::new(orchestrator_with(Arc::clone(&provider), &fast_config()));

    let mut handles = Vec::new();
    for _ in 0..5 {
        let orchestrator = Arc::clone(&orchestrator);
        handles.push(tokio::spawn(async move {
            orchestrator.chat(chat_request("gpt-4"), None, None).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    assert_eq!(provider.calls(), 1);
    assert!(ids.iter().all(|id| id == &ids[0]));
}

#[tokio::test]
async fn different_requests_are_not_coalesced() {
    let provider = Arc::new(
        ScriptedProvider::new(Behavior::Succeed).with_delay(Duration::from_millis(20)),
    );
    let orchestrator = Arc::new(orchestrator_with(Arc::clone(&provider), &fast_config()));

    let first = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.chat(chat_request("gpt-4"), None, None).await })
    };
    let second = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.chat(chat_request("gpt-4o"), None, None).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();
    assert_eq!(provider.calls(), 2);
}
