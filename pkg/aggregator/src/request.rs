use pkg_rbac::RoleAssigner;
use pkg_types::{ApiError, Labels};
use std::sync::{Arc, Mutex};

/// One logical read made on behalf of one caller.
pub struct AggregationRequest<R> {
    /// Empty means every namespace.
    pub namespace: String,
    /// Restricts results to one application (`<link label>=<linked name>`).
    pub linked_name: Option<String>,
    /// Caller-supplied selector used when an object declares none.
    pub label_selector: Option<Labels>,
    pub role: Arc<R>,
}

impl<R: RoleAssigner> AggregationRequest<R> {
    pub fn new(namespace: impl Into<String>, role: Arc<R>) -> Self {
        Self {
            namespace: namespace.into(),
            linked_name: None,
            label_selector: None,
            role,
        }
    }

    pub fn linked(mut self, linked_name: impl Into<String>) -> Self {
        self.linked_name = Some(linked_name.into());
        self
    }

    pub fn with_selector(mut self, selector: Labels) -> Self {
        self.label_selector = Some(selector);
        self
    }

    pub(crate) fn in_namespace(&self, namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            linked_name: self.linked_name.clone(),
            label_selector: self.label_selector.clone(),
            role: Arc::clone(&self.role),
        }
    }
}

impl<R> Clone for AggregationRequest<R> {
    fn clone(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            linked_name: self.linked_name.clone(),
            label_selector: self.label_selector.clone(),
            role: Arc::clone(&self.role),
        }
    }
}

// --- Error collection ---

/// Failures reported by concurrent workers of one request.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Mutex<Vec<ApiError>>,
}

impl ErrorCollector {
    pub fn push(&self, err: ApiError) {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(err);
    }

    /// `Ok` when nothing was collected, otherwise every failure folded into one.
    pub fn finish(&self) -> Result<(), ApiError> {
        let errors = self
            .errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::from_list(&errors))
        }
    }
}
