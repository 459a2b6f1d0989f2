//! Converter configuration for resource limits.
//!
//! This module provides [`ConverterConfig`] for controlling how many
//! elements a single read may produce, and [`ElementBudget`] which tracks
//! that limit while an array is being consumed.
//!
//! # Example
//!
//! ```ignore
//! use seqjson_core::config::ConverterConfig;
//!
//! // No limit (the default)
//! let config = ConverterConfig::default();
//!
//! // Refuse arrays with more than 10k elements
//! let config = ConverterConfig::new().with_max_elements(10_000);
//! ```

use crate::Error;

/// Configuration for converter behavior and resource limits.
///
/// # Default Values
///
/// | Setting | Default | Rationale |
/// |---------|---------|-----------|
/// | `max_elements` | `usize::MAX` | No limit by default |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Maximum number of elements read from a single array.
    ///
    /// Applies both when populating a container and when feeding a
    /// constructor. Exceeding it fails the read with
    /// [`Error::ElementLimitExceeded`].
    ///
    /// Default: `usize::MAX` (no limit)
    pub max_elements: usize,
}

impl Default for ConverterConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ConverterConfig {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        max_elements: usize::MAX,
    };

    /// Creates a new configuration with default values.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the maximum element count.
    ///
    /// # Arguments
    ///
    /// * `count` - Maximum elements per array. Use `usize::MAX` to disable.
    #[inline]
    pub const fn with_max_elements(mut self, count: usize) -> Self {
        self.max_elements = count;
        self
    }

    /// Creates a fresh budget for one array.
    #[inline]
    pub const fn budget(&self) -> ElementBudget {
        ElementBudget::new(self.max_elements)
    }
}

/// Counts elements read from one array against a limit.
#[derive(Debug, Clone, Copy)]
pub struct ElementBudget {
    count: usize,
    limit: usize,
}

impl ElementBudget {
    /// Creates a budget allowing at most `limit` elements.
    #[inline]
    pub const fn new(limit: usize) -> Self {
        Self { count: 0, limit }
    }

    /// Creates a budget with no limit.
    #[inline]
    pub const fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Number of elements read so far.
    #[inline]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Records one more element.
    ///
    /// Returns `Err(Error::ElementLimitExceeded)` if the new count would
    /// exceed the limit.
    #[inline]
    pub fn consume(&mut self) -> Result<(), Error> {
        self.count = self.count.saturating_add(1);
        if self.count > self.limit {
            Err(Error::ElementLimitExceeded {
                count: self.count,
                limit: self.limit,
            })
        } else {
            Ok(())
        }
    }
}
