//! Normalized path handling at the provider boundary

/// A path normalized to use forward slashes internally.
///
/// Host object models hand out platform-native paths; all engine logic works
/// on this normalized form so path comparisons behave the same everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl TreePath {
    /// Create a new TreePath from any string-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            inner: path.as_ref().replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Strip a directory prefix, returning the remainder without a leading
    /// slash. Returns `None` when `base` is not a prefix of this path.
    pub fn strip_prefix(&self, base: &TreePath) -> Option<&str> {
        let base = base.inner.trim_end_matches('/');
        let rest = self.inner.strip_prefix(base)?;
        Some(rest.trim_start_matches('/'))
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Display for TreePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for TreePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TreePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
