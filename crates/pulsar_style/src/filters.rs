//! Extension points third parties use to alter generated data

/// The error type filters may fail with
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single registered filter
type FilterFn<T> = Box<dyn Fn(T) -> Result<T, BoxError> + Send + Sync>;

/// An ordered list of filters applied to a value.
///
/// Each filter receives the output of the previous one. A failing filter is logged and skipped,
/// the next filter receives the value as it was before the failing one ran.
pub struct Filters<T> {
    /// The hook name, used in logs
    hook: &'static str,
    /// Registered filters in order
    filters: Vec<(String, FilterFn<T>)>,
}

impl<T> Filters<T> {
    /// Create a empty filter list for `hook`
    #[must_use]
    pub fn new(hook: &'static str) -> Self {
        Self {
            hook,
            filters: Vec::new(),
        }
    }

    /// The hook name
    #[must_use]
    pub fn hook(&self) -> &'static str {
        self.hook
    }

    /// Register a filter that can not fail
    pub fn add(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(T) -> T + Send + Sync + 'static,
    ) -> &mut Self {
        self.try_add(name, move |value| Ok(filter(value)))
    }

    /// Register a fallible filter
    pub fn try_add(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(T) -> Result<T, BoxError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.filters.push((name.into(), Box::new(filter)));
        self
    }

    /// Number of registered filters
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Are there no filters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<T: Clone> Filters<T> {
    /// Run `value` through every filter in registration order
    pub fn apply(&self, mut value: T) -> T {
        for (name, filter) in &self.filters {
            log::trace!("Applying filter {name} on {}", self.hook);
            match filter(value.clone()) {
                Ok(filtered) => value = filtered,
                Err(err) => {
                    log::warn!("Filter {name} on {} failed, skipping it: {err}", self.hook);
                }
            }
        }
        value
    }
}

impl<T> std::fmt::Debug for Filters<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filters")
            .field("hook", &self.hook)
            .field(
                "filters",
                &self.filters.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
