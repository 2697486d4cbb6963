//! Hash-mode addressing.
//!
//! # Responsibilities
//! - Derive navigation requests from `#/path?query` fragments or full locations
//! - Format `href`s for a given path
//! - Keep the back/forward stack of rendered paths
//!
//! # Design Decisions
//! - The path lives after `#`, so no server-side route configuration is needed
//! - Query and nested fragment are passed through untouched

use std::fmt;

use url::Url;
use uuid::Uuid;

/// One navigation event, created per request and discarded after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    id: Uuid,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl NavigationRequest {
    /// Request for a bare path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            query: None,
            fragment: None,
        }
    }

    /// Parse the part after `#` in hash mode: `#/load?x=1#section`.
    pub fn from_hash(hash: &str) -> Self {
        let rest = hash.strip_prefix('#').unwrap_or(hash);
        let (rest, fragment) = match rest.split_once('#') {
            Some((before, after)) => (before, Some(after.to_string())),
            None => (rest, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };

        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self {
            id: Uuid::new_v4(),
            path,
            query,
            fragment,
        }
    }

    /// Parse a full address-bar location such as `http://host/index.html#/load`.
    pub fn from_location(location: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(location)?;
        Ok(Self::from_hash(url.fragment().unwrap_or("")))
    }

    /// Accept whatever a caller hands to the navigator: a location URL, a hash, or a path.
    pub fn parse(input: &str) -> Self {
        if input.contains("://") {
            if let Ok(request) = Self::from_location(input) {
                return request;
            }
            tracing::debug!(input = %input, "Unparseable location, treating as hash");
        }
        Self::from_hash(input)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl fmt::Display for NavigationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

/// Back/forward stack of rendered paths.
#[derive(Debug, Clone, Default)]
pub struct HashHistory {
    base: String,
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl HashHistory {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            entries: Vec::new(),
            cursor: None,
        }
    }

    /// Address for `path` under this history's base.
    pub fn href(&self, path: &str) -> String {
        format!("{}#{}", self.base, path)
    }

    /// Record a new position, dropping anything ahead of the cursor.
    pub fn push(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.current() == Some(path.as_str()) {
            return;
        }
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(path);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Overwrite the current position.
    pub fn replace(&mut self, path: impl Into<String>) {
        match self.cursor {
            Some(c) => self.entries[c] = path.into(),
            None => self.push(path),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|c| self.entries[c].as_str())
    }

    /// Path one step back, without moving.
    pub fn peek_back(&self) -> Option<&str> {
        let c = self.cursor?;
        c.checked_sub(1).map(|i| self.entries[i].as_str())
    }

    /// Path one step forward, without moving.
    pub fn peek_forward(&self) -> Option<&str> {
        let c = self.cursor?;
        self.entries.get(c + 1).map(String::as_str)
    }

    pub fn back(&mut self) -> Option<&str> {
        let c = self.cursor?.checked_sub(1)?;
        self.cursor = Some(c);
        Some(&self.entries[c])
    }

    pub fn forward(&mut self) -> Option<&str> {
        let c = self.cursor? + 1;
        if c >= self.entries.len() {
            return None;
        }
        self.cursor = Some(c);
        Some(&self.entries[c])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_parsing() {
        let req = NavigationRequest::from_hash("#/load?robot=1#top");
        assert_eq!(req.path(), "/load");
        assert_eq!(req.query(), Some("robot=1"));
        assert_eq!(req.fragment(), Some("top"));
        assert_eq!(req.to_string(), "#/load?robot=1#top");

        assert_eq!(NavigationRequest::from_hash("#").path(), "/");
        assert_eq!(NavigationRequest::from_hash("").path(), "/");
        assert_eq!(NavigationRequest::from_hash("blockly").path(), "/blockly");
    }

    #[test]
    fn test_location_parsing() {
        let req = NavigationRequest::from_location("http://localhost:5173/index.html#/blockly?id=7").unwrap();
        assert_eq!(req.path(), "/blockly");
        assert_eq!(req.query(), Some("id=7"));

        let root = NavigationRequest::from_location("http://localhost:5173/").unwrap();
        assert_eq!(root.path(), "/");

        assert!(NavigationRequest::from_location("not a url").is_err());
    }

    #[test]
    fn test_parse_accepts_paths_and_locations() {
        assert_eq!(NavigationRequest::parse("/load").path(), "/load");
        assert_eq!(NavigationRequest::parse("#/load").path(), "/load");
        assert_eq!(NavigationRequest::parse("https://robot.local/#/drag").path(), "/drag");
    }

    #[test]
    fn test_request_ids_unique() {
        assert_ne!(NavigationRequest::new("/").id(), NavigationRequest::new("/").id());
    }

    #[test]
    fn test_history_back_forward() {
        let mut history = HashHistory::new("/index.html");
        assert_eq!(history.href("/load"), "/index.html#/load");

        history.push("/load");
        history.push("/blockly");
        history.push("/blockly");
        assert_eq!(history.len(), 2);

        assert_eq!(history.back(), Some("/load"));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some("/blockly"));
        assert_eq!(history.forward(), None);

        history.back();
        history.push("/drag");
        assert_eq!(history.peek_forward(), None);
        assert_eq!(history.peek_back(), Some("/load"));
        assert_eq!(history.len(), 2);

        history.replace("/load2");
        assert_eq!(history.current(), Some("/load2"));
    }
}
