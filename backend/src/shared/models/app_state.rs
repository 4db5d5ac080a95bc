use std::sync::Arc;

use crate::data_access::task_repository::TaskRepository;

pub struct AppState {
    pub tasks: TaskRepository,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

pub type SharedState = Arc<AppState>;
