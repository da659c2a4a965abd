use tracing::Level;
use tracing::Metadata;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::Filter;
use tracing_subscriber::registry::LookupSpan;

/// Only events from this crate reach the log files
pub const TARGET_PREFIX: &str = "muhaqqiq";

/// Passes events of exactly the listed levels emitted by this crate.
#[derive(Debug, Clone, Copy)]
pub struct CrateLevelFilter {
    levels: &'static [Level],
}

impl CrateLevelFilter {
    pub const fn debug_only() -> Self {
        Self { levels: &[Level::DEBUG] }
    }

    pub const fn info_only() -> Self {
        Self { levels: &[Level::INFO] }
    }

    pub const fn warn_and_error() -> Self {
        Self {
            levels: &[Level::WARN, Level::ERROR],
        }
    }

    pub const fn error_only() -> Self {
        Self { levels: &[Level::ERROR] }
    }

    pub fn accepts(
        &self,
        meta: &Metadata<'_>,
    ) -> bool {
        self.levels.contains(meta.level()) && meta.target().starts_with(TARGET_PREFIX)
    }
}

impl<S> Filter<S> for CrateLevelFilter
where
    S: tracing::Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn enabled(
        &self,
        meta: &Metadata<'_>,
        _ctx: &Context<'_, S>,
    ) -> bool {
        self.accepts(meta)
    }
}
