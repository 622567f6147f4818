use std::sync::OnceLock;

const FUSEBOX_ENV: &str = "INSPECTOR_FUSEBOX_ENABLED";

static GLOBAL_FLAGS: OnceLock<InspectorFlags> = OnceLock::new();

/// Feature flags consulted when an inspector target is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InspectorFlags {
    /// Whether the modern (Fusebox) debugging backend is enabled.
    pub fusebox_enabled: bool,
}

impl InspectorFlags {
    pub fn new(fusebox_enabled: bool) -> Self {
        Self { fusebox_enabled }
    }

    pub fn from_env() -> Self {
        let fusebox_enabled = std::env::var(FUSEBOX_ENV)
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self { fusebox_enabled }
    }

    /// Process-wide flags, read from the environment on first use.
    pub fn global() -> &'static InspectorFlags {
        GLOBAL_FLAGS.get_or_init(Self::from_env)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
