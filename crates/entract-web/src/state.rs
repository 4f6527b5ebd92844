use std::sync::Arc;

use entract_core::{EntityRecognizer, TextExtractor};

/// Shared application state accessible from all handlers.
///
/// Collaborators are constructed once in `main` and injected here; handlers
/// never reach for process globals.
pub struct AppState {
    pub extractor: TextExtractor,
    pub recognizer: Arc<dyn EntityRecognizer>,
}
