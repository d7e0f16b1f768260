//! Configuration loading integration tests
//!
//! File based loading goes through `load_config`; environment overrides are
//! exercised through `load_config_with` and `ServiceConfig::from_lookup` so
//! tests never touch the process environment.

#[cfg(test)]
mod tests {
    use microbatch_rs::config::{ServiceConfig, Validate, load_config_with};
    use microbatch_rs::{Config, LogFormat, ServiceError, ShutdownPolicy, load_config};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXAMPLE: &str = include_str!("../../config/ingestd.yaml.example");

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    // ==================== File loading ====================

    /// The shipped example file must stay valid and match the defaults
    #[test]
    fn test_example_config_matches_defaults() {
        let config = Config::from_yaml_str(EXAMPLE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let file = write_config(
            r#"
server:
  port: 9000
  workers: 2
batching:
  queue_capacity: 64
  max_batch_size: 16
  linger_ms: 5
  enqueue_timeout_ms: null
  shutdown_policy: discard
logging:
  format: json
"#,
        );

        let config = load_config(Some(file.path())).await.unwrap();

        assert_eq!(config.server().port, 9000);
        assert_eq!(config.server().worker_count(), 2);
        assert_eq!(config.batching().queue_capacity, 64);
        assert_eq!(config.batching().max_batch_size, 16);
        assert_eq!(config.batching().enqueue_timeout(), None);
        assert_eq!(config.batching().shutdown_policy, ShutdownPolicy::Discard);
        assert_eq!(config.logging().format, LogFormat::Json);
        // Untouched sections keep their defaults
        assert_eq!(config.delivery().max_attempts, 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_a_config_error() {
        let result = load_config(Some(std::path::Path::new("/nonexistent/ingestd.yaml"))).await;
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[tokio::test]
    async fn test_invalid_batching_is_rejected_at_load() {
        let file = write_config("batching:\n  queue_capacity: 8\n  max_batch_size: 32\n");

        let err = load_config(Some(file.path())).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("batching"), "{}", message);
        assert!(message.contains("queue capacity"), "{}", message);
    }

    #[test]
    fn test_unknown_shutdown_policy_is_rejected() {
        let result = Config::from_yaml_str("batching:\n  shutdown_policy: later\n");
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn test_yaml_rendering_reloads_identically() {
        let mut config = Config::default();
        config.service.batching.linger_ms = 3;
        config.service.batching.enqueue_timeout_ms = None;

        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml_str(&yaml).unwrap(), config);
        assert!(config.to_json().unwrap().contains("\"linger_ms\": 3"));
    }

    // ==================== Environment overrides ====================

    #[tokio::test]
    async fn test_env_overrides_file_values() {
        let file = write_config(
            "batching:\n  linger_ms: 40\n  max_batch_size: 10\n  shutdown_policy: discard\n",
        );

        let config = load_config_with(Some(file.path()), |key| match key {
            "BATCH_LINGER_MS" => Some("2".to_string()),
            // Spelling out the default must still override the file
            "BATCH_SHUTDOWN_POLICY" => Some("flush".to_string()),
            _ => None,
        })
        .await
        .unwrap();

        assert_eq!(config.batching().linger_ms, 2);
        assert_eq!(config.batching().max_batch_size, 10);
        assert_eq!(config.batching().shutdown_policy, ShutdownPolicy::Flush);
    }

    #[tokio::test]
    async fn test_file_completed_by_env_is_valid() {
        let file = write_config("batching:\n  queue_capacity: 500\n");

        let config = load_config_with(Some(file.path()), |key| match key {
            "BATCH_MAX_SIZE" => Some("100".to_string()),
            _ => None,
        })
        .await
        .unwrap();

        assert_eq!(config.batching().queue_capacity, 500);
        assert_eq!(config.batching().max_batch_size, 100);
    }

    #[tokio::test]
    async fn test_env_can_invalidate_a_valid_file() {
        let file = write_config("batching:\n  queue_capacity: 500\n  max_batch_size: 100\n");

        let err = load_config_with(Some(file.path()), |key| match key {
            "BATCH_QUEUE_CAPACITY" => Some("50".to_string()),
            _ => None,
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("queue capacity"), "{}", err);
    }

    #[test]
    fn test_env_values_are_validated() {
        let env = ServiceConfig::from_lookup(|key| match key {
            "BATCH_LINGER_MS" => Some("120000".to_string()),
            _ => None,
        })
        .unwrap();

        let err = env.validate().unwrap_err();
        assert!(err.starts_with("batching:"), "{}", err);

        let err = ServiceConfig::from_lookup(|key| match key {
            "LOG_FORMAT" => Some("xml".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("LOG_FORMAT"));
    }
}
