//! Level names.
//!
//! A [`LevelSet`] fixes which level methods a logger or factory answers to.
//! It is immutable once built and cheap to clone.

use std::fmt;
use std::sync::Arc;

use crate::error::LevelSetError;

/// The names of default levels.
pub const DEFAULT_LEVELS: [&str; 5] = ["error", "notice", "warning", "debug", "info"];

/// Ordered, duplicate-free, non-empty sequence of level names.
#[derive(Clone, PartialEq, Eq)]
pub struct LevelSet {
    names: Arc<[Arc<str>]>,
}

impl LevelSet {
    /// Build a level set, keeping the given order.
    pub fn new<I, S>(names: I) -> Result<Self, LevelSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected: Vec<Arc<str>> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if collected.iter().any(|n| &**n == name) {
                return Err(LevelSetError::Duplicate(name.to_string()));
            }
            collected.push(Arc::from(name));
        }

        if collected.is_empty() {
            return Err(LevelSetError::Empty);
        }

        Ok(Self {
            names: collected.into(),
        })
    }

    /// Position of `name`, if it belongs to the set.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| &**n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Name at `index`.
    ///
    /// # Panics
    /// If `index >= self.len()`.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    pub(crate) fn shared_name(&self, index: usize) -> Arc<str> {
        Arc::clone(&self.names[index])
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|n| &**n)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_LEVELS.iter().map(|n| Arc::from(*n)).collect(),
        }
    }
}

impl fmt::Debug for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels_order() {
        let set = LevelSet::default();
        assert_eq!(set.to_vec(), DEFAULT_LEVELS.to_vec());
        assert_eq!(set.index_of("warning"), Some(2));
        assert_eq!(set.name(4), "info");
    }

    #[test]
    fn test_rejects_empty() {
        let names: [&str; 0] = [];
        assert_eq!(LevelSet::new(names), Err(LevelSetError::Empty));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = LevelSet::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, LevelSetError::Duplicate("a".into()));
    }

    #[test]
    fn test_custom_levels() {
        let set = LevelSet::new(vec!["fatal".to_string(), "trace".to_string()]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("trace"));
        assert!(!set.contains("info"));
        assert_eq!(format!("{}", set), "fatal, trace");
        assert_eq!(format!("{:?}", set), "[\"fatal\", \"trace\"]");
    }

    #[test]
    fn test_clone_shares_names() {
        let a = LevelSet::default();
        let b = a.clone();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.shared_name(0), &b.shared_name(0)));
    }
}
