use thiserror::Error;

/// Authentication failures at the API boundary
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Bearer token has expired")]
    TokenExpired,

    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        "UNAUTHENTICATED"
    }

    pub fn into_field_error(self) -> juniper::FieldError {
        let mut extensions = juniper::Object::with_capacity(1);
        extensions.add_field("code", juniper::Value::scalar(self.code().to_string()));
        juniper::FieldError::new(self.to_string(), juniper::Value::Object(extensions))
    }
}
