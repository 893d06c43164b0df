use std::sync::Arc;

use ingredient_copilot_core::application::CopilotService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: CopilotService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: CopilotService) -> Self {
        Self { args, service }
    }
}
