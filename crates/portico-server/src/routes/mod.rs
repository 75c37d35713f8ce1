//! API routes.

pub mod health;
pub mod login;
pub mod relay;

pub use health::{HealthResponse, health_routes};
pub use login::{LoginRequest, login_handler};
pub use relay::{
    RelayGetRequest, RelayPostFormRequest, RelayPostJsonRequest, relay_get_handler,
    relay_post_form_handler, relay_post_json_handler,
};
