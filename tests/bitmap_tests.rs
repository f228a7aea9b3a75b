use rand::Rng;
use rotating_bloom_rs::{
    BitStore, BloomFilter, Filter, FilterConfigBuilder, InMemoryBackend,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn random_positions(count: usize, size: u64) -> Vec<u64> {
    let mut rng = rand::rng();
    let mut positions = HashSet::with_capacity(count);
    while positions.len() < count {
        positions.insert(rng.random_range(0..size));
    }
    positions.into_iter().collect()
}

#[tokio::test]
async fn set_bits_then_check_bits_holds_for_random_batches() {
    let backend = Arc::new(InMemoryBackend::new());
    let bits = BitStore::new(
        Arc::clone(&backend) as _,
        "batch",
        100_000,
        None,
    )
    .await
    .unwrap();

    for batch_size in [1, 7, 100, 1000] {
        let positions = random_positions(batch_size, bits.size());
        bits.set_bits(&positions).await.unwrap();
        assert!(bits.check_bits(&positions).await.unwrap());
    }
}

#[tokio::test]
async fn empty_check_needs_no_backend_round_trip() {
    let backend = Arc::new(InMemoryBackend::new());
    let bits =
        BitStore::new(Arc::clone(&backend) as _, "noop", 1024, None)
            .await
            .unwrap();

    assert!(bits.check_bits(&[]).await.unwrap());
    assert_eq!(backend.read_calls(), 0);
}

#[tokio::test]
async fn stores_built_back_to_back_get_distinct_keys() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut keys = HashSet::new();
    for _ in 0..50 {
        let bits = BitStore::new(
            Arc::clone(&backend) as _,
            "dupcheck",
            64,
            None,
        )
        .await
        .unwrap();
        assert!(keys.insert(bits.key().to_string()));
    }
}

#[tokio::test]
async fn ttl_reclaims_filter_data() {
    let backend = Arc::new(InMemoryBackend::new());
    let config = FilterConfigBuilder::default()
        .capacity(1000)
        .ttl(Some(Duration::from_millis(60)))
        .build()
        .unwrap();
    let filter = BloomFilter::new(Arc::clone(&backend) as _, config)
        .await
        .unwrap();

    filter.add("short lived").await.unwrap();
    assert!(filter.exist("short lived").await.unwrap());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!filter.exist("short lived").await.unwrap());
}

#[tokio::test]
async fn bloom_filter_false_positives_stay_reasonable() {
    let backend = Arc::new(InMemoryBackend::new());
    let config = FilterConfigBuilder::default()
        .capacity(10_000)
        .false_positive_rate(0.01)
        .build()
        .unwrap();
    let filter = BloomFilter::new(Arc::clone(&backend) as _, config)
        .await
        .unwrap();

    for i in 0..1000 {
        let item = format!("member_{i}");
        filter.add(&item).await.unwrap();
    }
    for i in 0..1000 {
        let item = format!("member_{i}");
        assert!(filter.exist(&item).await.unwrap());
    }

    let mut false_positives = 0;
    for i in 0..1000 {
        let item = format!("stranger_{i}");
        if filter.exist(&item).await.unwrap() {
            false_positives += 1;
        }
    }
    // well under capacity, so observed fpr should sit near the target
    assert!(
        false_positives < 50,
        "false positive count is too high: {false_positives}"
    );
}
