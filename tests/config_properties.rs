//! Property tests for configuration resolution

use std::path::Path;

use proptest::prelude::*;

use stackup::config::{ConfigFile, DeploymentConfig, DEFAULT_DOMAIN, DEFAULT_PORT};

fn resolve(port: Option<u32>, domain: Option<String>) -> DeploymentConfig {
    DeploymentConfig::resolve(Path::new("/proj"), &ConfigFile::default(), port, domain)
}

proptest! {
    #[test]
    fn port_override_always_wins(port in 1u32..200_000) {
        let config = resolve(Some(port), None);
        prop_assert_eq!(config.port, port);
        prop_assert_eq!(config.domain.as_str(), DEFAULT_DOMAIN);
    }

    #[test]
    fn domain_override_always_wins(domain in "[a-z][a-z0-9-]{0,20}\\.example\\.(com|org)") {
        let config = resolve(None, Some(domain.clone()));
        prop_assert_eq!(config.domain, domain);
        prop_assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn both_overrides_are_independent(
        port in 1u32..200_000,
        domain in "[a-z][a-z0-9-]{0,20}\\.example\\.com",
    ) {
        let config = resolve(Some(port), Some(domain.clone()));
        prop_assert_eq!(config.port, port);
        prop_assert_eq!(config.domain, domain);
    }

    #[test]
    fn file_port_used_when_no_cli_override(port in 1u32..200_000) {
        let file: ConfigFile =
            toml::from_str(&format!("[deploy]\nport = {port}\n")).unwrap();
        let config = DeploymentConfig::resolve(Path::new("/proj"), &file, None, None);
        prop_assert_eq!(config.port, port);
    }
}

#[test]
fn no_overrides_resolve_to_defaults() {
    let config = resolve(None, None);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.domain, DEFAULT_DOMAIN);
}
