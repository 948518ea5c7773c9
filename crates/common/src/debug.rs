//! Per-module debug loggers.
//!
//! Logging is off unless requested through the environment:
//!
//! - `DEBUG=*` enables every logger
//! - `DEBUG=parser` enables one
//! - `DEBUG=parser,matcher` enables several
//!
//! `DEBUG_VERBOSITY` (0-3, default 1) gates the `detail` channel.
//!
//! Loggers carry a nesting depth so recursive parse and match attempts read
//! as an indented tree on stderr.

use std::collections::HashSet;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

struct Config {
    all: bool,
    names: HashSet<String>,
    verbosity: u8,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let raw = env::var("DEBUG").unwrap_or_default();
        let all = matches!(raw.as_str(), "*" | "1" | "true");
        let names = if all {
            HashSet::new()
        } else {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };
        let verbosity = env::var("DEBUG_VERBOSITY")
            .ok()
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(1)
            .min(3);
        Config { all, names, verbosity }
    })
}

/// A named logger for one subsystem.
pub struct Logger {
    name: &'static str,
    enabled: bool,
    depth: AtomicUsize,
}

impl Logger {
    pub const fn disabled() -> Self {
        Self {
            name: "",
            enabled: false,
            depth: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn emit(&self, tag: &str, msg: &str) {
        let depth = self.depth.load(Ordering::Relaxed);
        eprintln!("{}[{}]{} {}", "  ".repeat(depth), self.name, tag, msg);
    }

    #[inline]
    pub fn log(&self, msg: &str) {
        if self.enabled {
            self.emit("", msg);
        }
    }

    #[inline]
    pub fn detail(&self, msg: &str) {
        if self.enabled && config().verbosity >= 2 {
            self.emit("", msg);
        }
    }

    #[inline]
    pub fn ok(&self, msg: &str) {
        if self.enabled {
            self.emit(" ok:", msg);
        }
    }

    #[inline]
    pub fn fail(&self, msg: &str) {
        if self.enabled {
            self.emit(" fail:", msg);
        }
    }

    #[inline]
    pub fn push_indent(&self) {
        if self.enabled {
            self.depth.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn pop_indent(&self) {
        if self.enabled {
            let _ = self
                .depth
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| {
                    Some(d.saturating_sub(1))
                });
        }
    }
}

/// Create the logger for `name`, enabled if the environment asks for it.
pub fn create_logger(name: &'static str) -> Logger {
    let cfg = config();
    Logger {
        name,
        enabled: cfg.all || cfg.names.contains(name),
        depth: AtomicUsize::new(0),
    }
}

// The macros exist so disabled loggers skip the format! cost entirely.

#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:tt)*) => {
        if $logger.enabled() {
            $logger.log(&format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_detail {
    ($logger:expr, $($arg:tt)*) => {
        if $logger.enabled() {
            $logger.detail(&format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_ok {
    ($logger:expr, $($arg:tt)*) => {
        if $logger.enabled() {
            $logger.ok(&format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_fail {
    ($logger:expr, $($arg:tt)*) => {
        if $logger.enabled() {
            $logger.fail(&format!($($arg)*));
        }
    };
}
