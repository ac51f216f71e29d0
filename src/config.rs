//! # Engine configuration.
//!
//! [`Config`] carries the engine's log tag. Broadcast streams are unbounded
//! per subscription, so there is no capacity to tune.
//!
//! # Example
//! ```
//! use coreactor::Config;
//!
//! let cfg = Config { tag: "checkout".into() };
//!
//! assert_eq!(cfg.tag, "checkout");
//! assert_eq!(Config::default().tag, "coreactor");
//! ```

use std::borrow::Cow;

/// Configuration for one engine instance.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name used in logs and diagnostics records.
    pub tag: Cow<'static, str>,
}

impl Default for Config {
    /// - `tag = "coreactor"`
    fn default() -> Self {
        Self {
            tag: Cow::Borrowed("coreactor"),
        }
    }
}
