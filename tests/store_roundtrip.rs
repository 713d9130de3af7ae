use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use typing_toucan::core::{ProgressiveSource, ScoreStore, Session, SessionConfig};
use typing_toucan::store::{load_record, FileStore, StoreConfig};
use typing_toucan::types::{
    Difficulty, GameMode, Preference, ScoreKey, GROUND_THRESHOLD, PHYSICS_STEP,
};

fn temp_dir(tag: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "toucan-it-{tag}-{}-{n}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// The subset of the file format other tools may rely on.
#[derive(Debug, Deserialize)]
struct OnDisk {
    normal_level: u32,
    arcade_streak: u32,
    capitals_enabled: bool,
}

#[test]
fn scores_survive_a_restart() {
    let config = StoreConfig::default().with_data_dir(temp_dir("restart"));
    {
        let store = FileStore::open(&config).unwrap();
        assert!(store.save_score(ScoreKey::ArcadeStreak, 12));
        store.set_preference(Preference::CapitalsEnabled, true);
    }

    let raw = std::fs::read_to_string(config.score_path()).unwrap();
    let on_disk: OnDisk = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk.normal_level, 1);
    assert_eq!(on_disk.arcade_streak, 12);
    assert!(on_disk.capitals_enabled);

    let store = FileStore::open(&config).unwrap();
    assert_eq!(store.score(ScoreKey::ArcadeStreak), 12);
    assert!(store.preference(Preference::CapitalsEnabled));
    assert!(!store.save_score(ScoreKey::ArcadeStreak, 11));
}

#[test]
fn older_files_fill_in_defaults() {
    let config = StoreConfig::default().with_data_dir(temp_dir("partial"));
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(config.score_path(), r#"{"text_streak": 7}"#).unwrap();

    let record = load_record(&config.score_path());
    assert_eq!(record.text_streak, 7);
    assert_eq!(record.normal_level, 1);
    assert!(record.sound_enabled);
}

#[test]
fn reset_keeps_preferences() {
    let config = StoreConfig::default().with_data_dir(temp_dir("reset"));
    let store = FileStore::open(&config).unwrap();
    store.save_score(ScoreKey::NormalLevel, 9);
    store.save_score(ScoreKey::CustomStreak, 4);
    store.set_preference(Preference::SoundEnabled, false);
    store.reset_scores();
    store.shutdown();

    let record = load_record(&config.score_path());
    assert_eq!(record.normal_level, 1);
    assert_eq!(record.custom_streak, 0);
    assert!(!record.sound_enabled);
}

#[test]
fn session_writes_through_the_file_store() {
    let config = StoreConfig::default().with_data_dir(temp_dir("session"));
    let file_store = Arc::new(FileStore::open(&config).unwrap());
    file_store.set_preference(Preference::CapitalsEnabled, true);
    let store: Arc<dyn ScoreStore> = file_store.clone();

    let mut session = Session::new(
        SessionConfig::new(GameMode::Normal { start_level: 1 }, Difficulty::Normal),
        Box::new(ProgressiveSource::new(4)),
        store,
    )
    .unwrap();
    assert!(session.capitals_enabled());

    session.type_char(session.queue().first().unwrap());
    for _ in 0..5 {
        let x = session.bird().left() + 1.0;
        let y = session.bird().y;
        session.obstacles_mut().spawn(x, y, false, 0);
        session.update(PHYSICS_STEP);
    }
    assert_eq!(session.level(), 2);

    session.bird_mut().y = GROUND_THRESHOLD - 1.0;
    session.bird_mut().velocity = 0.0;
    session.update(PHYSICS_STEP);
    session.set_capitals(false);
    drop(session);

    file_store.shutdown();
    let record = load_record(&config.score_path());
    assert_eq!(record.normal_level, 2);
    assert!(!record.capitals_enabled);
}
