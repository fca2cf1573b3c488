/// Change detector for reactive inputs.
///
/// Remembers the last value it was fed and reports whether a new value
/// differs. The first value fed is always a change.
#[derive(Debug, Clone)]
pub struct Changed<T> {
    last: Option<T>,
}

impl<T> Default for Changed<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq> Changed<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Records `value` and returns `true` if it differs from the previous one.
    pub fn update(&mut self, value: T) -> bool {
        if self.last.as_ref() == Some(&value) {
            return false;
        }
        self.last = Some(value);
        true
    }

    /// The last recorded value, if any.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Forgets the recorded value so the next `update` reports a change.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::Changed;

    #[test]
    fn first_value_is_a_change() {
        let mut c = Changed::new();
        assert!(c.update(false));
        assert!(!c.update(false));
        assert!(c.update(true));
        assert_eq!(c.get(), Some(&true));
    }

    #[test]
    fn reset_forces_next_change() {
        let mut c = Changed::new();
        c.update(3);
        c.reset();
        assert!(c.update(3));
    }
}
