//! Lazy provider: shared in-flight generation and memoization.

mod common;

use common::fixed_now;
use crm_synth_core::{
    config::GeneratorConfig,
    dataset::DatasetMode,
    metrics,
    provider::{GenerationCache, LazyDataProvider},
    rng::RngBank,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

fn provider(seed: u64) -> LazyDataProvider {
    LazyDataProvider::new(GeneratorConfig::builtin(), RngBank::new(seed), fixed_now())
        .expect("builtin config is valid")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_for_one_key_share_a_single_generation() {
    let cache = Arc::new(GenerationCache::<Vec<u64>>::new("test"));
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_generate("shared", move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(50));
                        vec![1, 2, 3]
                    })
                    .await
            })
        })
        .collect();

    let mut results = Vec::new();
    for h in handles {
        results.push(h.await.expect("task joined").expect("generated"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1, "generated more than once");
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    assert_eq!(*results[0], vec![1, 2, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn generation_completes_after_its_requester_is_dropped() {
    let cache = Arc::new(GenerationCache::<u32>::new("test"));
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let requester = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .get_or_generate("slow", move || {
                    started_tx.send(()).expect("signal start");
                    release_rx.recv().expect("wait for release");
                    42
                })
                .await
        })
    };

    tokio::task::spawn_blocking(move || started_rx.recv())
        .await
        .expect("join")
        .expect("generation started");
    requester.abort();
    assert!(requester.await.is_err(), "requester was cancelled");

    release_tx.send(()).expect("release generator");
    let value = cache
        .get_or_generate("slow", || unreachable!("result must come from the first run"))
        .await
        .expect("cached value");
    assert_eq!(*value, 42);
}

#[tokio::test]
async fn provider_memoizes_per_key() {
    let p = provider(42);
    assert!(p.cached_customers(50).is_none(), "nothing generated eagerly");

    let first = p.customers(50).await.unwrap();
    let again = p.customers(50).await.unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(first.len(), 50);

    let other = p.customers(60).await.unwrap();
    assert_eq!(other.len(), 60);
    assert!(p.cached_customers(50).is_some());

    p.clear();
    assert!(p.cached_customers(50).is_none());
    let regenerated = p.customers(50).await.unwrap();
    assert_eq!(*regenerated, *first, "same seed and key, same data");
}

#[tokio::test]
async fn values_do_not_depend_on_request_order() {
    let a = provider(7);
    let b = provider(7);

    a.campaigns(5).await.unwrap();
    a.customers(10).await.unwrap();
    let from_a = a.customers(20).await.unwrap();
    let from_b = b.customers(20).await.unwrap();
    assert_eq!(*from_a, *from_b);
}

#[tokio::test]
async fn metrics_are_derived_from_the_cached_entities() {
    let p = provider(11);
    let m = p.dashboard_metrics(40, 400).await.unwrap();
    let customers = p.customers(40).await.unwrap();
    let txns = p.transactions(40, 400).await.unwrap();

    assert_eq!(m.total_customers, 40);
    let direct = metrics::generate_dashboard_metrics(&customers, &txns, fixed_now(), 30);
    assert_eq!(*m, direct);
    assert!(txns.iter().all(|t| customers.iter().any(|c| c.id == t.customer_id)));
}

#[tokio::test]
async fn fixture_mode_helpers_use_configured_sizes() {
    let p = provider(13);
    let sizes = *DatasetMode::Fixture.sizes(p.config());
    let m = p.metrics_for(DatasetMode::Fixture).await.unwrap();
    assert_eq!(m.total_customers, sizes.customers);

    let insights = p.insights_for(DatasetMode::Fixture).await.unwrap();
    assert!(insights.churn_predictions.len() <= 50);
}
