
use lull_storage::settings;
use test_helpers::TestDb;

#[tokio::test]
async fn test_set_and_get_setting() {
    let db = TestDb::new().await;

    let value = serde_json::json!(0.65);
    settings::set_setting(db.pool(), "playback.global_volume", &value)
        .await
        .unwrap();

    let result = settings::get_setting(db.pool(), "playback.global_volume")
        .await
        .unwrap();
    assert_eq!(result, Some(value));
}

#[tokio::test]
async fn test_get_non_existent_setting() {
    let db = TestDb::new().await;

    let result = settings::get_setting(db.pool(), "non_existent_key")
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_last_write_wins() {
    let db = TestDb::new().await;

    for volume in [0.1, 0.4, 0.9] {
        settings::set_setting(db.pool(), "playback.global_volume", &serde_json::json!(volume))
            .await
            .unwrap();
    }

    let result = settings::get_setting(db.pool(), "playback.global_volume")
        .await
        .unwrap();
    assert_eq!(result, Some(serde_json::json!(0.9)));
}

#[tokio::test]
async fn test_delete_setting() {
    let db = TestDb::new().await;

    settings::set_setting(db.pool(), "presets.last_active", &serde_json::json!("abc"))
        .await
        .unwrap();
    settings::delete_setting(db.pool(), "presets.last_active")
        .await
        .unwrap();
    // Deleting twice is fine
    settings::delete_setting(db.pool(), "presets.last_active")
        .await
        .unwrap();

    let result = settings::get_setting(db.pool(), "presets.last_active")
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_prefix_query_escapes_wildcards() {
    let db = TestDb::new().await;

    let state = serde_json::json!({ "isSelected": true, "volume": 0.5 });
    settings::set_setting(db.pool(), "sound.rain.ogg", &state).await.unwrap();
    settings::set_setting(db.pool(), "sound.wind.ogg", &state).await.unwrap();
    settings::set_setting(db.pool(), "soundXother", &state).await.unwrap();
    settings::set_setting(db.pool(), "playback.global_volume", &serde_json::json!(1.0))
        .await
        .unwrap();

    let sounds = settings::get_settings_with_prefix(db.pool(), "sound.")
        .await
        .unwrap();
    let keys: Vec<_> = sounds.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["sound.rain.ogg", "sound.wind.ogg"]);
}

#[tokio::test]
async fn test_settings_survive_reopen() {
    let db = TestDb::new().await;
    settings::set_setting(db.pool(), "playback.global_volume", &serde_json::json!(0.3))
        .await
        .unwrap();
    db.pool.close().await;

    let pool = lull_storage::create_pool(&db.url).await.unwrap();
    lull_storage::run_migrations(&pool).await.unwrap();
    let result = settings::get_setting(&pool, "playback.global_volume")
        .await
        .unwrap();
    assert_eq!(result, Some(serde_json::json!(0.3)));
}
