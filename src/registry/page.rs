use serde::Deserialize;

/// One page of the Docker Hub tag listing.
#[derive(Debug, Default, Deserialize)]
pub struct TagPage {
    #[serde(default)]
    results: Vec<TagEntry>,
    #[serde(default)]
    next: Option<String>,
}

/// Entries without a name are kept on decode and skipped by `into_parts`.
#[derive(Debug, Deserialize)]
pub struct TagEntry {
    #[serde(default)]
    name: Option<String>,
}

impl TagPage {
    pub fn new(names: Vec<String>, next: Option<String>) -> Self {
        Self {
            results: names.into_iter().map(|name| TagEntry { name: Some(name) }).collect(),
            next,
        }
    }

    pub fn results(&self) -> &[TagEntry] {
        &self.results
    }

    /// Absolute URL of the following page, `None` on the last one.
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn into_parts(self) -> (Vec<String>, Option<String>) {
        let names = self.results.into_iter().filter_map(|entry| entry.name).collect();
        (names, self.next)
    }
}

impl TagEntry {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
