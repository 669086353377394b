//! ApiVersions API types (key 18, version 0).

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 0;

/// The v0 request has an empty body.
pub fn request() -> Request<()> {
    Request::new(api::API_VERSIONS, VERSION, ())
}

wire_struct! {
    pub struct ApiVersionsResponse {
        pub error_code: i16,
        pub api_keys: Vec<ApiKeyVersion>,
    }
}

wire_struct! {
    pub struct ApiKeyVersion {
        pub api_key: i16,
        pub min_version: i16,
        pub max_version: i16,
    }
}

impl ApiVersionsResponse {
    /// Version range the broker reports for an API, if any.
    pub fn version_range(&self, api_key: i16) -> Option<(i16, i16)> {
        self.api_keys
            .iter()
            .find(|k| k.api_key == api_key)
            .map(|k| (k.min_version, k.max_version))
    }

    pub fn max_version(&self, api_key: i16) -> Option<i16> {
        self.version_range(api_key).map(|(_, max)| max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_bytes, to_bytes};

    #[test]
    fn test_response_round_trip() {
        let resp = ApiVersionsResponse {
            error_code: 0,
            api_keys: vec![
                ApiKeyVersion {
                    api_key: api::PRODUCE,
                    min_version: 0,
                    max_version: 7,
                },
                ApiKeyVersion {
                    api_key: api::FETCH,
                    min_version: 0,
                    max_version: 11,
                },
            ],
        };
        let back: ApiVersionsResponse = from_bytes(to_bytes(&resp)).unwrap();
        assert_eq!(back, resp);
        assert_eq!(back.max_version(api::PRODUCE), Some(7));
        assert_eq!(back.version_range(api::FETCH), Some((0, 11)));
        assert_eq!(back.max_version(api::METADATA), None);
    }
}
