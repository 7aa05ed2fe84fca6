//! Logging configuration for the simulator.
//!
//! The crate logs through the `log` facade macros (`error!`, `warn!`, `info!`, `debug!`,
//! `trace!`), which this module re-exports. What is actually emitted is decided by a single global
//! [`LevelFilter`] plus optional per-module filters, installed into a `log4rs` console logger
//! writing to stderr. With the `logging` feature disabled, the configuration is kept but nothing
//! is printed.
//!
//! Logging is _disabled_ by default. The command line enables it with `--log-level <level>`.
//! Roughly, the levels are used as follows:
//!
//!  - `info`: one message per network and per curve
//!  - `debug`: removal schedules and generated network statistics
//!  - `trace`: every removal, every SIR step and every random stream creation
//!
//! ```rust
//! use netsir::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! // Curve progress only, but every SIR step
//! set_log_level(LevelFilter::Info);
//! set_module_filter("netsir::sir", LevelFilter::Trace);
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

use std::collections::hash_map::Entry;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

pub use log::{debug, error, info, trace, warn, LevelFilter};
#[cfg(feature = "logging")]
use log4rs::Handle;

use crate::HashMap;

// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// Level filter applied to the messages of one module path (e.g. `"netsir::sweep"`).
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    module: String,
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Holds the logging configuration and the handle of the installed logger.
///
/// Loggers are installed globally, so only the singleton in `LOG_CONFIGURATION` exists. The
/// public API is made of free functions operating on it.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// Level for modules without an explicit filter. `LevelFilter::Off` disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: HashMap<String, ModuleLogConfiguration>,

    #[cfg(feature = "logging")]
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations: HashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    pub(in crate::log) fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Returns true if the configuration was mutated, false otherwise.
    fn insert_module_filter(&mut self, module: &str, level: LevelFilter) -> bool {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                let module_config = entry.get_mut();
                if module_config.level == level {
                    return false;
                }
                module_config.level = level;
            }
            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        true
    }

    pub(in crate::log) fn set_module_filter(&mut self, module: &str, level: LevelFilter) {
        if self.insert_module_filter(module, level) {
            self.set_config();
        }
    }

    pub(in crate::log) fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

// The public API

/// Sets the global log level. `LevelFilter::Off` disables logging.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Turns off all log messages.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    get_log_configuration().set_module_filter(module_path, level_filter);
}

/// Removes the filter of a module path, which then follows the global level again.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    // The configuration stays consistent even if a holder panicked
    LOG_CONFIGURATION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::{LazyLock, Mutex};

    use log::{error, trace, LevelFilter};

    use super::{get_log_configuration, remove_module_filter, set_log_level, set_module_filter};

    // Force logging tests to run serially for consistent behavior.
    static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    #[test]
    fn set_global_level() {
        let _guard = TEST_MUTEX.lock().unwrap();
        set_log_level(LevelFilter::Error);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Error);
            error!("set_global_level: global set to error");
            trace!("set_global_level: NOT EMITTED");
        }
        set_log_level(LevelFilter::Off);
        assert_eq!(get_log_configuration().global_log_level, LevelFilter::Off);
    }

    #[test]
    fn set_and_remove_module_filters() {
        let _guard = TEST_MUTEX.lock().unwrap();
        set_module_filter("netsir::sir", LevelFilter::Trace);
        set_module_filter("netsir::sweep", LevelFilter::Debug);
        {
            let config = get_log_configuration();
            assert_eq!(
                config.module_configurations.get("netsir::sir"),
                Some(&("netsir::sir", LevelFilter::Trace).into())
            );
            assert_eq!(
                config.module_configurations.get("netsir::sweep"),
                Some(&("netsir::sweep", LevelFilter::Debug).into())
            );
        }

        remove_module_filter("netsir::sir");
        remove_module_filter("netsir::sweep");
        let config = get_log_configuration();
        assert!(!config.module_configurations.contains_key("netsir::sir"));
        assert!(!config.module_configurations.contains_key("netsir::sweep"));
    }
}
