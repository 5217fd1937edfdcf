//! Caller identity.
//!
//! The gateway in front of the service authenticates users and forwards who
//! they are in two headers. The middleware turns them into an explicit
//! [`Caller`] stored in the request extensions.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use engine::Caller;

static USER_EMAIL_HEADER: HeaderName = HeaderName::from_static("x-user-email");
static USER_ROLE_HEADER: HeaderName = HeaderName::from_static("x-user-role");

fn decode_text<'i, I>(values: &mut I) -> Result<String, AxumError>
where
    I: Iterator<Item = &'i HeaderValue>,
{
    let value = values.next().ok_or_else(AxumError::invalid)?;
    let Ok(value) = value.to_str() else {
        return Err(AxumError::invalid());
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(AxumError::invalid());
    }
    Ok(value.to_string())
}

fn encode_text<E: Extend<HeaderValue>>(value: &str, values: &mut E) {
    match HeaderValue::from_str(value) {
        Ok(value) => values.extend(std::iter::once(value)),
        Err(_) => tracing::error!("failed to encode caller header"),
    }
}

/// `x-user-email`: the authenticated user's account key.
#[derive(Debug)]
pub(crate) struct UserEmail(pub String);

impl Header for UserEmail {
    fn name() -> &'static HeaderName {
        &USER_EMAIL_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_text(values).map(UserEmail)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_text(&self.0, values);
    }
}

/// `x-user-role`: the authenticated user's role.
#[derive(Debug)]
pub(crate) struct UserRole(pub String);

impl Header for UserRole {
    fn name() -> &'static HeaderName {
        &USER_ROLE_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_text(values).map(UserRole)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_text(&self.0, values);
    }
}

pub(crate) async fn identify(
    email: Option<TypedHeader<UserEmail>>,
    role: Option<TypedHeader<UserRole>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (Some(TypedHeader(email)), Some(TypedHeader(role))) = (email, role) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(Caller::new(email.0, role.0));
    Ok(next.run(request).await)
}
