//! Per-level options and their partial updates.
//!
//! ## Data Flow
//! ```text
//! LevelUpdate (levels?, enabled?, trace_depth?, formatter?, driver?)
//!     → LevelTable::apply (merge into each targeted level, in place)
//!     → indices of touched levels
//!     → owner rebuilds the dispatch function of exactly those levels
//! ```
//!
//! ## Rules
//! - No level names, or an empty list, targets every level.
//! - Unknown level names are ignored; no error is raised.
//! - Omitted fields keep their current value.
//! - `trace_depth` is never negative: signed input is clamped to 0.

use std::fmt;

use crate::driver::SharedDriver;
use crate::formatter::SharedFormatter;
use crate::level::LevelSet;

/// Effective configuration of one level of one logger or factory.
pub struct LevelOptions<T: ?Sized + 'static> {
    /// Disabled levels produce no output and do no work.
    pub enabled: bool,

    /// Maximum number of call-site frames handed to the formatter; 0 disables tracing.
    pub trace_depth: usize,

    pub formatter: SharedFormatter<T>,

    pub driver: SharedDriver,
}

impl<T: ?Sized + 'static> LevelOptions<T> {
    /// Options with the documented defaults: enabled, no tracing.
    pub fn new(formatter: SharedFormatter<T>, driver: SharedDriver) -> Self {
        Self {
            enabled: true,
            trace_depth: 0,
            formatter,
            driver,
        }
    }
}

impl<T: ?Sized + 'static> Clone for LevelOptions<T> {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            trace_depth: self.trace_depth,
            formatter: self.formatter.clone(),
            driver: self.driver.clone(),
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for LevelOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelOptions")
            .field("enabled", &self.enabled)
            .field("trace_depth", &self.trace_depth)
            .finish_non_exhaustive()
    }
}

/// Partial update of level options.
///
/// ```
/// use logdeck_core::LevelUpdate;
///
/// // Mute DEBUG only
/// let update = LevelUpdate::<str>::new().level("debug").enabled(false);
/// # let _ = update;
/// ```
pub struct LevelUpdate<T: ?Sized + 'static> {
    levels: Vec<String>,
    enabled: Option<bool>,
    trace_depth: Option<usize>,
    formatter: Option<SharedFormatter<T>>,
    driver: Option<SharedDriver>,
}

impl<T: ?Sized + 'static> LevelUpdate<T> {
    /// An update targeting all levels and changing nothing yet.
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            enabled: None,
            trace_depth: None,
            formatter: None,
            driver: None,
        }
    }

    /// Add one level to the targets.
    pub fn level(mut self, name: impl Into<String>) -> Self {
        self.levels.push(name.into());
        self
    }

    /// Add several levels to the targets.
    pub fn levels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the trace depth; negative values become 0.
    pub fn trace_depth(mut self, depth: i64) -> Self {
        self.trace_depth = Some(usize::try_from(depth.max(0)).unwrap_or(usize::MAX));
        self
    }

    pub fn formatter(mut self, formatter: SharedFormatter<T>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn driver(mut self, driver: SharedDriver) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Level names this update was restricted to; empty means all.
    pub fn target_names(&self) -> &[String] {
        &self.levels
    }

    /// Indices in `set` this update applies to, in set order, without duplicates.
    pub(crate) fn targets(&self, set: &LevelSet) -> Vec<usize> {
        if self.levels.is_empty() {
            return (0..set.len()).collect();
        }

        let mut indices: Vec<usize> = self
            .levels
            .iter()
            .filter_map(|name| set.index_of(name))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Merge the provided fields into `options`.
    pub(crate) fn merge_into(&self, options: &mut LevelOptions<T>) {
        if let Some(enabled) = self.enabled {
            options.enabled = enabled;
        }
        if let Some(depth) = self.trace_depth {
            options.trace_depth = depth;
        }
        if let Some(formatter) = &self.formatter {
            options.formatter = formatter.clone();
        }
        if let Some(driver) = &self.driver {
            options.driver = driver.clone();
        }
    }
}

impl<T: ?Sized + 'static> Default for LevelUpdate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> Clone for LevelUpdate<T> {
    fn clone(&self) -> Self {
        Self {
            levels: self.levels.clone(),
            enabled: self.enabled,
            trace_depth: self.trace_depth,
            formatter: self.formatter.clone(),
            driver: self.driver.clone(),
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for LevelUpdate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelUpdate")
            .field("levels", &self.levels)
            .field("enabled", &self.enabled)
            .field("trace_depth", &self.trace_depth)
            .field("formatter", &self.formatter.is_some())
            .field("driver", &self.driver.is_some())
            .finish()
    }
}

/// Level options for every level of a [`LevelSet`], index-aligned.
pub(crate) struct LevelTable<T: ?Sized + 'static> {
    levels: LevelSet,
    options: Vec<LevelOptions<T>>,
}

impl<T: ?Sized + 'static> LevelTable<T> {
    /// Every level starts from a copy of `seed`.
    pub(crate) fn new(levels: LevelSet, seed: LevelOptions<T>) -> Self {
        let options = vec![seed; levels.len()];
        Self { levels, options }
    }

    pub(crate) fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub(crate) fn get(&self, name: &str) -> Option<&LevelOptions<T>> {
        self.levels.index_of(name).map(|i| &self.options[i])
    }

    pub(crate) fn at(&self, index: usize) -> &LevelOptions<T> {
        &self.options[index]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &LevelOptions<T>)> + '_ {
        self.levels.iter().zip(self.options.iter())
    }

    /// Merge `update` in place; returns the indices that were touched.
    pub(crate) fn apply(&mut self, update: &LevelUpdate<T>) -> Vec<usize> {
        let targets = update.targets(&self.levels);
        for &index in &targets {
            update.merge_into(&mut self.options[index]);
        }
        targets
    }
}

impl<T: ?Sized + 'static> Clone for LevelTable<T> {
    fn clone(&self) -> Self {
        Self {
            levels: self.levels.clone(),
            options: self.options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MemoryDriver;
    use crate::formatter::TextFormatter;
    use std::sync::Arc;

    fn seed() -> LevelOptions<str> {
        LevelOptions::new(Arc::new(TextFormatter), Arc::new(MemoryDriver::new()))
    }

    #[test]
    fn test_defaults() {
        let options = seed();
        assert!(options.enabled);
        assert_eq!(options.trace_depth, 0);
    }

    #[test]
    fn test_empty_update_targets_all() {
        let set = LevelSet::default();
        assert_eq!(LevelUpdate::<str>::new().targets(&set), vec![0, 1, 2, 3, 4]);
        let empty: [&str; 0] = [];
        assert_eq!(LevelUpdate::<str>::new().levels(empty).targets(&set), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_and_duplicate_levels() {
        let set = LevelSet::default();
        let update = LevelUpdate::<str>::new().levels(["info", "nope", "error", "info"]);
        assert_eq!(update.targets(&set), vec![0, 4]);

        // only unknown names: nothing is touched
        let update = LevelUpdate::<str>::new().level("verbose");
        assert!(update.targets(&set).is_empty());
    }

    #[test]
    fn test_trace_depth_clamped() {
        let mut options = seed();
        LevelUpdate::<str>::new().trace_depth(-3).merge_into(&mut options);
        assert_eq!(options.trace_depth, 0);

        LevelUpdate::<str>::new().trace_depth(7).merge_into(&mut options);
        assert_eq!(options.trace_depth, 7);
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut options = seed();
        LevelUpdate::<str>::new().trace_depth(4).merge_into(&mut options);
        LevelUpdate::<str>::new().enabled(false).merge_into(&mut options);
        assert!(!options.enabled);
        assert_eq!(options.trace_depth, 4);

        let driver: SharedDriver = Arc::new(MemoryDriver::new());
        LevelUpdate::<str>::new().driver(driver.clone()).merge_into(&mut options);
        assert!(Arc::ptr_eq(&options.driver, &driver));
        assert!(!options.enabled);
    }

    #[test]
    fn test_table_apply_in_place() {
        let mut table = LevelTable::new(LevelSet::default(), seed());
        let touched = table.apply(&LevelUpdate::new().level("debug").enabled(false));
        assert_eq!(touched, vec![3]);
        assert!(!table.get("debug").unwrap().enabled);
        assert!(table.get("info").unwrap().enabled);
        assert!(table.get("nope").is_none());
    }

    #[test]
    fn test_table_clone_is_independent() {
        let mut a = LevelTable::new(LevelSet::default(), seed());
        let b = a.clone();
        a.apply(&LevelUpdate::new().enabled(false).trace_depth(2));

        assert!(b.iter().all(|(_, o)| o.enabled && o.trace_depth == 0));
        assert!(a.iter().all(|(_, o)| !o.enabled && o.trace_depth == 2));
    }
}
