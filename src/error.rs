use reqwest::StatusCode;
use thiserror::Error;

/// Which family of endpoints a request went to. A 401 means different things
/// depending on the answer: on `/auth/*` the stored credentials are bad, on
/// anything else it may be a transient backend race.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointClass {
    Auth,
    Resource,
}

impl EndpointClass {
    pub fn of(endpoint: &str) -> Self {
        if endpoint.starts_with("/auth/") {
            EndpointClass::Auth
        } else {
            EndpointClass::Resource
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized request to {endpoint}")]
    Unauthorized {
        endpoint: String,
        class: EndpointClass,
    },

    #[error("{endpoint} responded with {status}")]
    Status {
        endpoint: String,
        status: StatusCode,
    },

    #[error("request error: {0:#}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auth_endpoints() {
        assert_eq!(EndpointClass::of("/auth/login"), EndpointClass::Auth);
        assert_eq!(EndpointClass::of("/auth/profile"), EndpointClass::Auth);
        assert_eq!(EndpointClass::of("/cart"), EndpointClass::Resource);
        assert_eq!(EndpointClass::of("/resto/4"), EndpointClass::Resource);
    }
}
