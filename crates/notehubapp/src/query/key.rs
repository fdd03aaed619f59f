use crate::model::ListParams;
use serde::Serialize;
use std::fmt;

pub const NOTES_NAMESPACE: &str = "notes";

/// Cache identity of one notes listing.
///
/// Two keys are equal iff namespace, page and search text all match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueryKey {
    namespace: &'static str,
    page: u32,
    search: String,
}

impl QueryKey {
    /// Key for `page` (clamped to at least 1) filtered by `search`.
    pub fn notes(page: u32, search: impl Into<String>) -> Self {
        Self {
            namespace: NOTES_NAMESPACE,
            page: page.max(1),
            search: search.into(),
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }

    pub fn to_params(&self, per_page: u32) -> ListParams {
        ListParams {
            page: self.page,
            per_page,
            search: self.search.clone(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[page={}, search={:?}]", self.namespace, self.page, self.search)
    }
}
