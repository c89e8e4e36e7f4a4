//! Event loop configuration.

use serde::{Deserialize, Serialize};

/// Settings for [`EventLoop`](crate::EventLoop).
///
/// Missing fields take their defaults, so hosts can load a partial document:
///
/// ```
/// use promise_runtime::EventLoopConfig;
///
/// let config: EventLoopConfig = serde_json::from_str(r#"{ "max_jobs_per_drain": 64 }"#).unwrap();
/// assert_eq!(config.max_jobs_per_drain, Some(64));
/// assert!(config.collect_uncaught);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLoopConfig {
    /// Upper bound on microtask jobs run by a single drain. `None` is unbounded.
    pub max_jobs_per_drain: Option<usize>,
    /// Keep errors thrown by fire-and-forget reaction jobs for later inspection.
    pub collect_uncaught: bool,
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self {
            max_jobs_per_drain: None,
            collect_uncaught: true,
        }
    }
}
