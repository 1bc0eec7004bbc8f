//! Business operations behind the HTTP handlers.

mod auth;
mod farmer;
mod order;
mod product;
pub mod upload;
mod validation;

pub use auth::{
    AuthService, FarmerSummary, LoginRequest, LoginResponse, PasswordResetRequest, RegisterInput, Registration,
};
pub use farmer::{BiographyRequest, FarmerService, StoreActivityRequest};
pub use order::{OrderService, StatusChange, StatusUpdateRequest};
pub use product::{ProductService, RelinkReport};
pub use upload::{FilePolicy, MultipartForm, UploadedFile};
pub use validation::RequestValidator;
