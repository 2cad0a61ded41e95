mod support;

use std::{collections::HashMap, sync::{Arc, OnceLock}};

use buques::cache::{CacheConfig, MemoryStore};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serial_test::serial;

use support::{BrokenStore, FakeRepo, get, router, sample_vessels};

/// The global recorder can only be installed once per test binary.
fn snapshotter() -> &'static Snapshotter {
    static SNAPSHOTTER: OnceLock<Snapshotter> = OnceLock::new();
    SNAPSHOTTER.get_or_init(|| {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        recorder
            .install()
            .expect("debug metrics recorder should install in this test process");
        snapshotter
    })
}

fn counters() -> HashMap<String, u64> {
    snapshotter()
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((key.key().name().to_string(), count)),
            _ => None,
        })
        .collect()
}

fn delta(before: &HashMap<String, u64>, after: &HashMap<String, u64>, name: &str) -> u64 {
    after.get(name).copied().unwrap_or(0) - before.get(name).copied().unwrap_or(0)
}

#[tokio::test]
#[serial]
async fn miss_then_hit_emits_lookup_counters() {
    let before = counters();

    let repo = FakeRepo::returning(sample_vessels());
    let app = router(repo, Arc::new(MemoryStore::new()), CacheConfig::default());
    get(&app, "/buquesenpuerto").await;
    get(&app, "/buquesenpuerto").await;

    let after = counters();
    assert_eq!(delta(&before, &after, "buques_cache_miss_total"), 1);
    assert_eq!(delta(&before, &after, "buques_cache_hit_total"), 1);
    assert_eq!(delta(&before, &after, "buques_source_fetch_total"), 1);
    assert_eq!(delta(&before, &after, "buques_cache_error_total"), 0);
}

#[tokio::test]
#[serial]
async fn broken_store_emits_error_counters() {
    let before = counters();

    let repo = FakeRepo::returning(sample_vessels());
    let app = router(repo, Arc::new(BrokenStore), CacheConfig::default());
    get(&app, "/buquesenpuerto").await;

    let after = counters();
    assert_eq!(delta(&before, &after, "buques_cache_error_total"), 1);
    assert_eq!(delta(&before, &after, "buques_cache_store_error_total"), 1);
    assert_eq!(delta(&before, &after, "buques_source_fetch_total"), 1);
    assert_eq!(delta(&before, &after, "buques_cache_hit_total"), 0);
}
