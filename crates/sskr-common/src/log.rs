// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Logging infrastructure for the SSKR core.
//!
//! A lightweight, no_std circular log. Entries carry a monotonically
//! increasing sequence number instead of a timestamp; a secure element has
//! no trustworthy clock, and the sequence is enough to order events for a
//! forensic read-out.
//!
//! # Security
//!
//! Share payloads, secrets, and digest keys must NEVER be logged. Callers
//! log opcodes, lengths, and error codes only.

use core::fmt::{self, Write};
use heapless::String;

/// Maximum log message length
pub const MAX_LOG_MESSAGE_LEN: usize = 64;

/// Log buffer size (number of entries)
pub const LOG_BUFFER_SIZE: usize = 16;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Errors that require immediate attention
    Error = 0,
    /// Warnings about potential issues
    Warn = 1,
    /// Informational messages
    Info = 2,
    /// Debug messages (development only)
    Debug = 3,
}

impl LogLevel {
    /// Get a short prefix for the log level
    #[must_use]
    pub const fn prefix(&self) -> char {
        match self {
            Self::Error => 'E',
            Self::Warn => 'W',
            Self::Info => 'I',
            Self::Debug => 'D',
        }
    }
}

/// A single log entry
#[derive(Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Sequence number assigned by the buffer at write time
    pub seq: u32,
    /// Module/component name
    pub module: &'static str,
    /// Log message
    pub message: String<MAX_LOG_MESSAGE_LEN>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:06} {} [{}] {}",
            self.seq,
            self.level.prefix(),
            self.module,
            self.message
        )
    }
}

/// Circular log buffer
pub struct LogBuffer {
    entries: [Option<LogEntry>; LOG_BUFFER_SIZE],
    write_index: usize,
    count: usize,
    next_seq: u32,
    min_level: LogLevel,
}

impl LogBuffer {
    /// Create a new empty log buffer
    #[must_use]
    pub const fn new() -> Self {
        const NONE: Option<LogEntry> = None;
        Self {
            entries: [NONE; LOG_BUFFER_SIZE],
            write_index: 0,
            count: 0,
            next_seq: 0,
            min_level: LogLevel::Info,
        }
    }

    /// Set the minimum log level
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Check if a log level should be recorded
    #[must_use]
    pub const fn should_log(&self, level: LogLevel) -> bool {
        (level as u8) <= (self.min_level as u8)
    }

    /// Record a message, assigning it the next sequence number
    ///
    /// Messages longer than [`MAX_LOG_MESSAGE_LEN`] are truncated.
    pub fn log(&mut self, level: LogLevel, module: &'static str, args: fmt::Arguments<'_>) {
        if !self.should_log(level) {
            return;
        }

        let mut message = String::<MAX_LOG_MESSAGE_LEN>::new();
        let _ = message.write_fmt(args);

        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        self.entries[self.write_index] = Some(LogEntry {
            level,
            seq,
            module,
            message,
        });
        self.write_index = (self.write_index + 1) % LOG_BUFFER_SIZE;
        if self.count < LOG_BUFFER_SIZE {
            self.count += 1;
        }
    }

    /// Get the number of retained entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Check if the buffer is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
        self.write_index = 0;
        self.count = 0;
    }

    /// Iterate over retained entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        let start = if self.count < LOG_BUFFER_SIZE {
            0
        } else {
            self.write_index
        };
        (0..self.count).filter_map(move |i| {
            self.entries[(start + i) % LOG_BUFFER_SIZE].as_ref()
        })
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Log an error message
#[macro_export]
macro_rules! log_error {
    ($buffer:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Error, $module, format_args!($($arg)*))
    };
}

/// Log a warning message
#[macro_export]
macro_rules! log_warn {
    ($buffer:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Warn, $module, format_args!($($arg)*))
    };
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($buffer:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Info, $module, format_args!($($arg)*))
    };
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($buffer:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Debug, $module, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_orders_entries() {
        let mut buf = LogBuffer::new();
        crate::log_info!(buf, "test", "first");
        crate::log_error!(buf, "test", "second code=0x{:04X}", 0x0101u16);

        assert_eq!(buf.len(), 2);
        let mut it = buf.iter();
        let a = it.next().unwrap();
        let b = it.next().unwrap();
        assert_eq!(a.seq, 0);
        assert_eq!(a.message.as_str(), "first");
        assert_eq!(b.seq, 1);
        assert_eq!(b.message.as_str(), "second code=0x0101");
    }

    #[test]
    fn level_filter_drops_below_minimum() {
        let mut buf = LogBuffer::new();
        // default minimum is Info
        crate::log_debug!(buf, "test", "dropped");
        assert!(buf.is_empty());

        buf.set_min_level(LogLevel::Debug);
        crate::log_debug!(buf, "test", "kept");
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn wraps_and_keeps_newest() {
        let mut buf = LogBuffer::new();
        for i in 0..(LOG_BUFFER_SIZE + 4) {
            crate::log_info!(buf, "test", "entry {}", i);
        }
        assert_eq!(buf.len(), LOG_BUFFER_SIZE);

        // oldest retained entry is the 5th written
        let first = buf.iter().next().unwrap();
        assert_eq!(first.seq, 4);
        let last = buf.iter().last().unwrap();
        assert_eq!(last.seq as usize, LOG_BUFFER_SIZE + 3);
    }
}
