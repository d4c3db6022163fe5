use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once; subsequent calls are ignored.
///
/// `filter` follows the `env_logger` syntax (e.g. "debug",
/// "cardioid_engine=debug,wgpu=warn"). `RUST_LOG` wins when set; otherwise
/// the default keeps the engine at info while quieting the GPU stack's
/// per-frame chatter.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(env) = std::env::var("RUST_LOG") {
            builder.parse_filters(&env);
        } else if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else {
            builder.parse_filters("info,wgpu_core=warn,wgpu_hal=warn,naga=warn");
        }

        builder.init();

        log::debug!("logging initialized");
    });
}
