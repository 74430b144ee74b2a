use std::collections::HashMap;

use lumen_ngin::config::{DemoConfig, MAX_BLUR_RADIUS, SHADOW_MAP_SIZE_RANGE, parse_flag};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn no_variables_gives_defaults() {
    assert_eq!(DemoConfig::from_lookup(|_| None), DemoConfig::default());
}

#[test]
fn variables_override_defaults() {
    let config = DemoConfig::from_lookup(lookup(&[
        ("LUMEN_ASSET_DIR", "/tmp/assets"),
        ("LUMEN_VSYNC", "false"),
        ("LUMEN_WIDTH", "800"),
        ("LUMEN_HEIGHT", "600"),
        ("LUMEN_SHADOW_MAP_SIZE", "1024"),
        ("LUMEN_BLUR_RADIUS", " 3 "),
    ]));
    assert_eq!(config.asset_dir, std::path::PathBuf::from("/tmp/assets"));
    assert!(!config.vsync);
    assert_eq!((config.width, config.height), (800, 600));
    assert_eq!(config.shadow_map_size, 1024);
    assert_eq!(config.blur_radius, 3);
    assert!((config.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
}

#[test]
fn unparsable_values_are_ignored() {
    let config = DemoConfig::from_lookup(lookup(&[("LUMEN_WIDTH", "wide"), ("LUMEN_VSYNC", "maybe")]));
    let defaults = DemoConfig::default();
    assert_eq!(config.width, defaults.width);
    assert_eq!(config.vsync, defaults.vsync);
}

#[test]
fn out_of_range_values_are_clamped() {
    let config = DemoConfig::from_lookup(lookup(&[
        ("LUMEN_SHADOW_MAP_SIZE", "1"),
        ("LUMEN_BLUR_RADIUS", "1000"),
        ("LUMEN_HEIGHT", "0"),
    ]));
    assert_eq!(config.shadow_map_size, SHADOW_MAP_SIZE_RANGE.0);
    assert_eq!(config.blur_radius, MAX_BLUR_RADIUS);
    assert_eq!(config.height, 1);

    let big = DemoConfig {
        shadow_map_size: u32::MAX,
        ..Default::default()
    }
    .sanitized();
    assert_eq!(big.shadow_map_size, SHADOW_MAP_SIZE_RANGE.1);
}

#[test]
fn vsync_accepts_common_boolean_spellings() {
    for (raw, expected) in [("0", false), ("OFF", false), ("no", false), ("1", true), (" Yes ", true), ("on", true)] {
        let config = DemoConfig::from_lookup(lookup(&[("LUMEN_VSYNC", raw)]));
        assert_eq!(config.vsync, expected, "LUMEN_VSYNC={raw:?}");
    }
}

#[test]
fn parse_flag_rejects_other_words() {
    assert_eq!(parse_flag("TRUE"), Some(true));
    assert_eq!(parse_flag("maybe"), None);
    assert_eq!(parse_flag(""), None);
    assert_eq!(parse_flag("2"), None);
}
