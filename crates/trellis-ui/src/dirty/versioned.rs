//! Versioned widget properties.

/// A property value with a change counter.
///
/// Widgets keep the fields their renderer reads in `Versioned` cells; the
/// renderer remembers the last version it applied and skips the update when
/// nothing changed.
///
/// ```
/// use trellis_ui::dirty::Versioned;
///
/// let mut text = Versioned::new(String::from("Save"));
/// let seen = text.version();
/// assert!(!text.set(String::from("Save")));
/// assert!(text.set(String::from("Save as")));
/// assert!(text.is_newer_than(seen));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Versioned<T> {
    value: T,
    version: u32,
}

impl<T> Versioned<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// True when the value changed since `seen` was read.
    pub fn is_newer_than(&self, seen: u32) -> bool {
        self.version != seen
    }

}

impl<T: PartialEq> Versioned<T> {
    /// Store `value`, bumping the version only if it differs.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version = self.version.wrapping_add(1);
        true
    }
}

impl Versioned<String> {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Versioned<String> {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}
