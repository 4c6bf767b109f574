use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::APP_CONFIG;

/// Directives used when `RUST_LOG` is unset. Library events are logged under
/// `qau_api`, binaries under their own name.
fn default_directives(crate_name: &str, level: &str) -> String {
    let mut targets = vec![crate_name, "qau_api", "tower_http"];
    targets.dedup();
    let mut directives: Vec<String> = targets
        .into_iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    directives.push("sea_orm=warn".to_string());
    directives.join(",")
}

pub fn init_standard_tracing(crate_name: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(crate_name, &APP_CONFIG.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_binary_is_not_listed_twice() {
        assert_eq!(
            default_directives("qau_api", "debug"),
            "qau_api=debug,tower_http=debug,sea_orm=warn"
        );
    }

    #[test]
    fn other_binaries_also_log_the_library() {
        assert_eq!(
            default_directives("seed_users", "info"),
            "seed_users=info,qau_api=info,tower_http=info,sea_orm=warn"
        );
    }
}
