use shooting_range::config::*;
use shooting_range::entities::Point;

use pretty_assertions::assert_eq;

#[test]
fn defaults_are_valid() {
    let t = Tunables::default();
    assert!(t.validate().is_ok());
    assert_eq!(t.spawn_interval_ms, 5000);
    assert_eq!(t.enemy_tick_ms, 50);
    assert_eq!(t.bullet_tick_ms, 30);
    assert_eq!(t.max_live_enemies, 5);
    assert_eq!(t.fire_origin(), Point::new(50.0, 95.0));
    assert!(t.piercing_bullets);
}

#[test]
fn partial_json_overrides_defaults() {
    let t = Tunables::from_json_str(r#"{ "spawn_interval_ms": 1000, "piercing_bullets": false }"#)
        .unwrap();
    assert_eq!(t.spawn_interval_ms, 1000);
    assert!(!t.piercing_bullets);
    assert_eq!(t.enemy_tick_ms, 50);
}

#[test]
fn ranges_load_from_json() {
    let t = Tunables::from_json_str(r#"{ "enemy_speed": { "start": 1.0, "end": 2.0 } }"#).unwrap();
    assert_eq!(t.enemy_speed, 1.0..2.0);
}

#[test]
fn defaults_round_trip_through_json() {
    let json = serde_json::to_string(&Tunables::default()).unwrap();
    assert_eq!(Tunables::from_json_str(&json).unwrap(), Tunables::default());
}

#[test]
fn zero_interval_is_rejected() {
    let err = Tunables::from_json_str(r#"{ "enemy_tick_ms": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "enemy_tick_ms", .. }));
}

#[test]
fn empty_range_is_rejected() {
    let t = Tunables {
        spawn_x: 90.0..10.0,
        ..Tunables::default()
    };
    assert!(matches!(t.validate(), Err(ConfigError::Invalid { field: "spawn_x", .. })));
}

#[test]
fn inverted_batch_is_rejected() {
    let t = Tunables {
        spawn_batch_min: 3,
        spawn_batch_max: 2,
        ..Tunables::default()
    };
    assert!(matches!(t.validate(), Err(ConfigError::Invalid { field: "spawn_batch_min", .. })));
}

#[test]
fn non_positive_speeds_are_rejected() {
    let t = Tunables {
        bullet_speed: 0.0,
        ..Tunables::default()
    };
    assert!(t.validate().is_err());
    let t = Tunables {
        enemy_speed: -1.0..0.5,
        ..Tunables::default()
    };
    assert!(t.validate().is_err());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Tunables::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Tunables::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("failed to read config file"));
}
