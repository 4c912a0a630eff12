use std::sync::Arc;

use ns_providers::NewsPipeline;

pub struct AppState {
    pub pipeline: Arc<NewsPipeline>,
}

impl AppState {
    pub fn new(pipeline: NewsPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
