//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence. Without it, `default_level` applies to the
/// binary's own crates and `warn` to everything else.
///
/// Calling this more than once is a no-op.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let crate_name = bin_name.replace('-', "_");
    format!(
        "warn,{crate_name}={default_level},parlor_shared={default_level},tower_http={default_level}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        // テスト項目: バイナリ名のハイフンがクレート名に変換される
        // when (操作):
        let directives = default_directives("parlor-server", "debug");

        // then (期待する結果):
        assert_eq!(
            directives,
            "warn,parlor_server=debug,parlor_shared=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_setup_logger_twice_is_noop() {
        // テスト項目: 二回呼び出しても panic しない
        setup_logger("parlor-server", "info");
        setup_logger("parlor-server", "info");
    }
}
