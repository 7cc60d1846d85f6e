//! Data transfer objects for the Web API.

pub mod request;
pub mod response;
pub mod validation;

pub use request::{
    ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest, UpdateAccountRequest,
    UpdateAvatarRequest, UpdateCoverImageRequest,
};
pub use response::{ApiResponse, SessionResponse, UserInfo};
pub use validation::ValidatedJson;
