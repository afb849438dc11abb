//! Transport error mapping
//!
//! Translates reqwest failures and non-2xx CRM responses into the shared
//! `PortError` so callers never see transport types.

use core_kernel::PortError;

/// Maps a reqwest error onto the port error taxonomy
pub fn transport_error(err: reqwest::Error) -> PortError {
    if err.is_timeout() || err.is_connect() {
        PortError::connection(err.to_string())
    } else if err.is_decode() {
        PortError::serialization(err.to_string())
    } else {
        PortError::internal(err.to_string())
    }
}

/// Consumes a non-2xx response into an upstream error carrying the payload
pub async fn upstream_error(response: reqwest::Response) -> PortError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    PortError::upstream(status, body)
}

#[cfg(test)]
mod tests {
    use core_kernel::PortError;

    #[test]
    fn upstream_variant_preserves_status() {
        let err = PortError::upstream(409, "conflict");
        match err {
            PortError::Upstream { status, body } => {
                assert_eq!(status, 409);
                assert_eq!(body, "conflict");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
