//! Mock augmentor for testing
//!
//! Returns a configured suggestion list, or an error when `fail` is set, so
//! tests can exercise both the merge path and the failure-recovery path
//! without a network.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::Suggestion;

use super::{AugmentContext, SuggestionAugmentor};

#[derive(Default)]
pub struct MockAugmentor {
    pub suggestions: Vec<Suggestion>,
    pub fail: bool,
}

impl MockAugmentor {
    pub fn returning(suggestions: Vec<Suggestion>) -> Self {
        Self {
            suggestions,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            suggestions: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SuggestionAugmentor for MockAugmentor {
    async fn generate(&self, _ctx: &AugmentContext<'_>) -> Result<Vec<Suggestion>> {
        if self.fail {
            return Err(Error::Augment("mock augmentor failure".to_string()));
        }
        Ok(self.suggestions.clone())
    }
}
