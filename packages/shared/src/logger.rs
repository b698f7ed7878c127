//! Logging setup utilities for the Chitchat binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the calling crate and the binary get `default_log_level`; the
/// `RUST_LOG` environment variable overrides the whole filter.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chitchat-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chitchat_shared::logger::setup_logger;
///
/// setup_logger("chitchat-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Crate and binary names are normalised to module-path form (`-` -> `_`),
/// which is what `EnvFilter` matches targets against.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    format!(
        "chitchat_server={level},chitchat_client={level},chitchat_shared={level},{binary}={level}",
        level = default_log_level,
        binary = binary_target,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalises_binary_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let binary_name = "chitchat-server";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert!(filter.contains("chitchat_server=debug"));
        assert!(!filter.contains("chitchat-server"));
    }

    #[test]
    fn test_default_filter_applies_level_to_every_crate() {
        // テスト項目: 全てのクレートに同じログレベルが適用される
        // given (前提条件):
        let binary_name = "chitchat-client";

        // when (操作):
        let filter = default_filter(binary_name, "warn");

        // then (期待する結果):
        for directive in filter.split(',') {
            assert!(directive.ends_with("=warn"), "directive: {directive}");
        }
    }
}
