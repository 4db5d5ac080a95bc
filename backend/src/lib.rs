//---------------------------------------
pub mod web_api {
    pub mod api_error;
    pub mod controllers;
    pub mod routes;
    pub mod validated;
}

pub use web_api::controllers::*;
pub use web_api::routes::map_routes;
//---------------------------------------

//---------------------------------------
pub mod shared {
    pub mod dto;
    pub mod models;
    pub mod validation;
}

pub use shared::dto::*;
pub use shared::models::*;
pub use shared::validation;
//---------------------------------------

//---------------------------------------
pub mod data_access {
    pub mod data_context;
    pub mod memory_store;
    pub mod task_repository;
    pub mod task_store;
}
//---------------------------------------

//---------------------------------------
pub mod client {
    pub mod task_client;
}
//---------------------------------------
