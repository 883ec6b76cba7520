use hearth_domain::config::{CompressionKind, EventsConfig, HubConfig, LogConfig, StoreConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let store = StoreConfig::default();
    assert_eq!(store.root, std::path::PathBuf::from("data"));
    assert!(store.create);
    assert_eq!(store.compression, CompressionKind::Lz4);

    let events = EventsConfig::default();
    assert_eq!(events.capacity, 128);

    let log = LogConfig::default();
    assert_eq!(log.level, "info");
    assert!(log.path.is_none());
}

#[test]
fn hub_config_deserializes() {
    let raw = json!({
        "store": { "root": "/var/lib/hearth", "create": false, "compression": "none" },
        "events": { "capacity": 32 },
        "log": { "level": "debug", "path": "/var/log/hearth" }
    });

    let cfg: HubConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.store.root, std::path::PathBuf::from("/var/lib/hearth"));
    assert!(!cfg.store.create);
    assert_eq!(cfg.store.compression, CompressionKind::None);
    assert_eq!(cfg.events.capacity, 32);
    assert_eq!(cfg.log.level, "debug");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: HubConfig = serde_json::from_value(json!({})).expect("empty config deserialize");
    assert_eq!(cfg.store.compression, CompressionKind::Lz4);
    assert_eq!(cfg.events.capacity, 128);
}
