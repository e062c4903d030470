use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mural_core::{Canvas, Rgba};
use mural_history::{
    HistoryConfig, HistoryStore, LocalStore, MemoryStore, SnapshotStore, Storage, StoreError,
    StoreResult, StringStore,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Primary tier whose writes and deletes can be switched off mid-test.
#[derive(Default)]
struct Flaky {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl Flaky {
    fn fail(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SnapshotStore for Flaky {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check()?;
        self.inner.set(key, value).await
    }
    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.check()?;
        self.inner.delete(key).await
    }
    async fn clear(&self) -> StoreResult<()> {
        self.check()?;
        self.inner.clear().await
    }
}

struct Fixture {
    history: HistoryStore,
    primary: Arc<Flaky>,
    fallback: Arc<LocalStore>,
}

async fn fixture() -> Fixture {
    init_tracing();
    let primary = Arc::new(Flaky::default());
    let fallback = Arc::new(LocalStore::default());
    let storage = Storage::open(Some(primary.clone()), fallback.clone()).await;
    Fixture {
        history: HistoryStore::open(HistoryConfig::default(), storage),
        primary,
        fallback,
    }
}

fn surface(n: u8) -> Canvas {
    let mut canvas = Canvas::new(16, 16, Rgba([255, 255, 255, 255]));
    canvas.set_pixel(n as u32 % 16, n as u32 / 16, Rgba([n, 0, 0, 255]));
    canvas
}

fn absent_everywhere(f: &Fixture, key: &str) -> bool {
    !f.primary.inner.contains(key) && !f.fallback.contains(key)
}

#[tokio::test]
async fn index_is_last_after_every_save() {
    let mut f = fixture().await;
    for n in 0..60 {
        f.history.save(&surface(n)).await.unwrap();
        assert_eq!(f.history.index(), f.history.len() as isize - 1);
    }
}

#[tokio::test]
async fn undo_then_redo_is_bit_identical() {
    let mut f = fixture().await;
    for n in 0..3 {
        f.history.save(&surface(n)).await.unwrap();
    }
    let mut canvas = surface(2);
    let before = canvas.clone();

    assert!(f.history.undo(&mut canvas).await);
    assert_ne!(canvas, before);
    assert!(f.history.redo(&mut canvas).await);
    assert_eq!(canvas, before);
}

#[tokio::test]
async fn saving_past_the_cap_evicts_oldest_from_both_tiers() {
    let mut f = fixture().await;
    let mut keys = Vec::new();
    for n in 0..55 {
        // Put a few of the oldest entries on the fallback tier.
        f.primary.fail(n % 2 == 0 && n < 6);
        keys.push(f.history.save(&surface(n)).await.unwrap());
    }
    f.primary.fail(false);

    assert_eq!(f.history.len(), 50);
    assert_eq!(f.history.index(), 49);
    for key in &keys[..5] {
        assert!(absent_everywhere(&f, key), "{key} survived eviction");
    }
    for key in &keys[5..] {
        assert!(f.primary.inner.contains(key) || f.fallback.contains(key));
    }
}

#[tokio::test]
async fn save_after_undo_truncates_redo_branch() {
    let mut f = fixture().await;
    let mut keys = Vec::new();
    for n in 0..3 {
        keys.push(f.history.save(&surface(n)).await.unwrap());
    }
    let mut canvas = surface(2);
    assert!(f.history.undo(&mut canvas).await);
    assert!(f.history.undo(&mut canvas).await);
    assert!(f.history.can_redo());

    f.history.save(&surface(9)).await.unwrap();
    assert_eq!(f.history.len(), 2);
    assert_eq!(f.history.index(), 1);
    assert!(!f.history.can_redo());
    assert!(absent_everywhere(&f, &keys[1]));
    assert!(absent_everywhere(&f, &keys[2]));
}

#[tokio::test]
async fn eviction_proceeds_when_primary_deletes_fail() {
    let mut f = fixture().await;
    for n in 0..50 {
        f.history.save(&surface(n)).await.unwrap();
    }
    f.primary.fail(true);
    for n in 50..55 {
        let key = f.history.save(&surface(n)).await.unwrap();
        assert!(f.fallback.contains(&key));
        assert_eq!(f.history.len(), 50);
        assert_eq!(f.history.index(), 49);
    }
    assert_eq!(f.history.keys().first().map(String::as_str), Some("canvas_history_5"));
    assert!(!f.history.can_redo());
}

#[tokio::test]
async fn truncation_proceeds_when_primary_deletes_fail() {
    let mut f = fixture().await;
    for n in 0..3 {
        f.history.save(&surface(n)).await.unwrap();
    }
    let mut canvas = surface(2);
    assert!(f.history.undo(&mut canvas).await);
    assert!(f.history.undo(&mut canvas).await);

    f.primary.fail(true);
    let key = f.history.save(&surface(9)).await.unwrap();
    assert_eq!(f.history.len(), 2);
    assert_eq!(f.history.index(), 1);
    assert!(!f.history.can_redo());
    assert!(f.fallback.contains(&key));
    assert!(!f.fallback.contains("canvas_history_2"));
}

#[tokio::test]
async fn undo_and_redo_at_the_edges_are_noops() {
    let mut f = fixture().await;
    let mut canvas = surface(7);
    let before = canvas.clone();

    assert!(!f.history.undo(&mut canvas).await);
    assert!(!f.history.redo(&mut canvas).await);
    assert_eq!(f.history.index(), -1);

    f.history.save(&surface(1)).await.unwrap();
    assert!(!f.history.undo(&mut canvas).await);
    assert!(!f.history.redo(&mut canvas).await);
    assert_eq!(f.history.index(), 0);
    assert_eq!(canvas, before);
}

#[tokio::test]
async fn clear_empties_the_stack() {
    let mut f = fixture().await;
    let mut keys = Vec::new();
    for n in 0..4 {
        keys.push(f.history.save(&surface(n)).await.unwrap());
    }
    f.history.clear().await;

    assert_eq!(f.history.len(), 0);
    assert_eq!(f.history.index(), -1);
    assert!(!f.history.can_undo());
    assert!(!f.history.can_redo());
    for key in &keys {
        assert!(absent_everywhere(&f, key));
    }
}

#[tokio::test]
async fn corrupted_entry_leaves_surface_and_index_alone() {
    let mut f = fixture().await;
    let first = f.history.save(&surface(1)).await.unwrap();
    f.history.save(&surface(2)).await.unwrap();

    f.primary.inner.set(&first, "data:image/png;base64,AAAA").await.unwrap();
    let mut canvas = surface(2);
    assert!(!f.history.undo(&mut canvas).await);
    assert_eq!(canvas, surface(2));
    assert_eq!(f.history.index(), 1);

    f.primary.inner.delete(&first).await.unwrap();
    assert!(!f.history.undo(&mut canvas).await);
    assert_eq!(f.history.index(), 1);
}

#[tokio::test]
async fn writes_fall_back_silently_and_stay_readable() {
    let mut f = fixture().await;
    f.history.save(&surface(1)).await.unwrap();
    f.primary.fail(true);
    let key = f.history.save(&surface(2)).await.unwrap();
    assert!(f.fallback.contains(&key));

    // Reads of the primary also fail now; both entries come from somewhere.
    let mut canvas = surface(2);
    f.primary.fail(false);
    assert!(f.history.undo(&mut canvas).await);
    assert_eq!(canvas, surface(1));
    f.primary.fail(true);
    assert!(f.history.redo(&mut canvas).await);
    assert_eq!(canvas, surface(2));
}

#[tokio::test]
async fn reopening_restores_stack_from_metadata() {
    init_tracing();
    let primary = Arc::new(MemoryStore::new());
    let fallback = Arc::new(LocalStore::default());

    let mut history = HistoryStore::open(
        HistoryConfig::default(),
        Storage::new(Some(primary.clone()), fallback.clone()),
    );
    for n in 0..3 {
        history.save(&surface(n)).await.unwrap();
    }
    let mut canvas = surface(2);
    history.undo(&mut canvas).await;
    drop(history);

    let reopened = HistoryStore::open(
        HistoryConfig::default(),
        Storage::new(Some(primary.clone()), fallback.clone()),
    );
    assert_eq!(reopened.len(), 3);
    assert_eq!(reopened.index(), 1);
    assert!(reopened.can_redo());

    let mut fresh = Canvas::new(16, 16, Rgba([0, 0, 0, 0]));
    assert!(reopened.restore_current(&mut fresh).await);
    assert_eq!(fresh, surface(1));
}

#[tokio::test]
async fn legacy_metadata_without_base_is_accepted() {
    init_tracing();
    let fallback = Arc::new(LocalStore::default());
    fallback
        .set("canvas_history_meta", r#"{"length":2,"index":0}"#)
        .unwrap();
    let history = HistoryStore::open(HistoryConfig::default(), Storage::new(None, fallback));
    assert_eq!(history.keys(), vec!["canvas_history_0", "canvas_history_1"]);
    assert_eq!(history.current_key().as_deref(), Some("canvas_history_0"));
}
