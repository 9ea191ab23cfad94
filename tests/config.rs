use cosmogenesis_lib::model::config::{Seeding, UniverseConfig};
use cosmogenesis_lib::model::universe::Universe;

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = UniverseConfig::load("definitely/not/here/config.toml").unwrap();
    assert_eq!(config, UniverseConfig::default());
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
    let config = UniverseConfig::load(path).unwrap();
    assert_eq!(config, UniverseConfig::default());
}

#[test]
fn test_serialized_defaults_parse_back() {
    let text = toml::to_string(&UniverseConfig::default()).unwrap();
    let parsed = UniverseConfig::from_toml(&text).unwrap();
    assert_eq!(parsed, UniverseConfig::default());
}

#[test]
fn test_invalid_file_content_is_an_error() {
    assert!(UniverseConfig::from_toml("[world]\nrows = -3").is_err());
    assert!(UniverseConfig::from_toml("[history]\ncapacity = 0").is_err());
}

#[test]
fn test_empty_seeding_starts_without_life() {
    let config = UniverseConfig::from_toml(
        r#"
        [world]
        rows = 12
        cols = 12
        seed = 1
        seeding = "empty"
        war_mode = false
        "#,
    )
    .unwrap();
    assert_eq!(config.world.seeding, Seeding::Empty);
    let universe = Universe::new(config).unwrap();
    assert_eq!(universe.live_count(), 0);
}

#[test]
fn test_fingerprint_tracks_rule_sections() {
    let base = UniverseConfig::default();
    let mut changed = base.clone();
    changed.rules.base_mutation_rate = 0.001;
    let mut cosmetic = base.clone();
    cosmetic.logging.summary_interval = 10;
    assert_ne!(base.fingerprint(), changed.fingerprint());
    assert_eq!(base.fingerprint(), cosmetic.fingerprint());
}
