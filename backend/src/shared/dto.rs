// Requests
pub mod create_task_request;
pub mod update_task_request;
pub mod task_list_query;

// Responses
pub mod error_body;
pub mod health_response;
