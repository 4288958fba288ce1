use std::fs::File;
use std::time::Duration;

use dt_core::prelude::*;
use serde::{
    Deserialize,
    Deserializer,
    de,
};

use crate::Options;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorConfig {
    pub namespace_prefix: String,
    pub output_path: String,

    #[serde(deserialize_with = "de_opt_duration")]
    pub query_timeout: Option<Duration>,

    #[serde(deserialize_with = "de_duration")]
    pub shutdown_grace_period: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            namespace_prefix: DEFAULT_NAMESPACE_PREFIX.into(),
            output_path: DEFAULT_OUTPUT_PATH.into(),
            query_timeout: None,
            shutdown_grace_period: Duration::ZERO,
        }
    }
}

impl MonitorConfig {
    pub fn load(filename: &str) -> anyhow::Result<MonitorConfig> {
        Ok(serde_yaml::from_reader(File::open(filename)?)?)
    }

    // Command-line flags (and the NAMESPACE_PREFIX env var) win over the config file
    pub fn resolve(opts: &Options) -> anyhow::Result<MonitorConfig> {
        let mut config = match &opts.config_file {
            Some(filename) => MonitorConfig::load(filename)?,
            None => MonitorConfig::default(),
        };

        if let Some(prefix) = &opts.namespace_prefix {
            config.namespace_prefix = prefix.clone();
        }
        if let Some(output) = &opts.output {
            config.output_path = output.clone();
        }
        if let Some(timeout) = opts.query_timeout {
            config.query_timeout = Some(timeout.into());
        }
        if let Some(grace) = opts.shutdown_grace_period {
            config.shutdown_grace_period = grace.into();
        }

        Ok(config)
    }
}

fn de_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(de::Error::custom)
}

fn de_opt_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => humantime::parse_duration(&s).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::NamedTempFile;
    use assert_fs::prelude::*;
    use clap::Parser;
    use dt_testutils::*;

    use super::*;

    #[rstest]
    fn test_config_defaults() {
        let config: MonitorConfig = serde_yaml::from_str("---\n{}").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.namespace_prefix, "redhat-rhmi-");
        assert_eq!(config.output_path, "downtime.json");
    }

    #[rstest]
    fn test_config_durations() {
        let config_yml = "
---
namespacePrefix: test-
queryTimeout: 30s
shutdownGracePeriod: 1m 30s
";
        let config: MonitorConfig = serde_yaml::from_str(config_yml).unwrap();
        assert_eq!(config.namespace_prefix, TEST_PREFIX);
        assert_eq!(config.query_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.shutdown_grace_period, Duration::from_secs(90));
    }

    #[rstest]
    fn test_config_bad_duration() {
        let res = serde_yaml::from_str::<MonitorConfig>("queryTimeout: forever");
        assert!(res.is_err());
    }

    #[rstest]
    fn test_resolve_overrides_file() {
        let file = NamedTempFile::new("config.yml").unwrap();
        file.write_str("namespacePrefix: from-file-\noutputPath: s3://bucket/downtime.json\nqueryTimeout: 5s\n")
            .unwrap();

        let opts = Options::parse_from([
            "dt-monitor",
            "--config-file",
            file.path().to_str().unwrap(),
            "--namespace-prefix",
            TEST_PREFIX,
        ]);
        let config = MonitorConfig::resolve(&opts).unwrap();

        assert_eq!(config.namespace_prefix, TEST_PREFIX);
        assert_eq!(config.output_path, "s3://bucket/downtime.json");
        assert_eq!(config.query_timeout, Some(Duration::from_secs(5)));
    }

    #[rstest]
    fn test_resolve_no_file() {
        let opts = Options::parse_from(["dt-monitor", "--output", "/tmp/out.json", "--query-timeout", "2s"]);
        let config = MonitorConfig::resolve(&opts).unwrap();

        assert_eq!(config.output_path, "/tmp/out.json");
        assert_eq!(config.query_timeout, Some(Duration::from_secs(2)));
    }
}
