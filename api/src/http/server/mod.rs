pub mod api_error;
pub mod app_state;
pub mod middleware;
pub mod response;

pub use api_error::ApiError;
pub use app_state::AppState;
pub use response::Response;
