//! Property-based tests for faildup-settings.

use faildup_settings::{AnalyzeConfig, AnalyzeSettings, TomlConfig};
use proptest::prelude::*;

proptest! {
    #[test]
    fn threshold_in_unit_interval_validates(t in 0.0f64..=1.0) {
        let s = AnalyzeSettings { threshold: t, ..Default::default() };
        prop_assert!(s.validate().is_ok());
    }

    #[test]
    fn threshold_above_one_is_rejected(t in 1.0001f64..100.0) {
        let s = AnalyzeSettings { threshold: t, ..Default::default() };
        prop_assert!(s.validate().is_err());
    }

    #[test]
    fn toml_config_survives_serialization(
        threshold in proptest::option::of(0.0f64..=1.0),
        drain in proptest::option::of(any::<bool>()),
        patterns in proptest::option::of(prop::collection::vec("[a-z*]{1,8}\\.xml", 1..4)),
    ) {
        let cfg = TomlConfig {
            analyze: AnalyzeConfig {
                threshold,
                drain,
                format: None,
                out: None,
                patterns,
            },
        };
        let text = toml::to_string(&cfg).unwrap();
        let back = TomlConfig::parse(&text).unwrap();
        prop_assert_eq!(back, cfg);
    }
}
