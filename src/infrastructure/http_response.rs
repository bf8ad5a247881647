// HTTP response utilities - optional Brotli encoding
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
};
use bytes::Bytes;
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Whether the client accepts Brotli
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

async fn brotli(raw: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = BrotliEncoder::new(raw);
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).await?;
    Ok(compressed)
}

/// Build a 200 response, Brotli-compressed when `compress` is set
pub async fn encoded_response(
    content_type: &'static str,
    raw: Vec<u8>,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let (body, content_encoding) = if compress {
        let compressed = brotli(&raw).await.map_err(|e| {
            tracing::error!(error = %e, "Brotli compression failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::debug!(raw = raw.len(), compressed = compressed.len(), "Compressed response");
        (Bytes::from(compressed), Some("br"))
    } else {
        (Bytes::from(raw), None)
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, HeaderValue::from(body.len()))
        .header(header::VARY, "accept-encoding");

    if let Some(encoding) = content_encoding {
        builder = builder.header(header::CONTENT_ENCODING, encoding);
    }

    builder.body(Body::from(body)).map_err(|e| {
        tracing::error!(error = %e, "Failed to build response");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Serialize `data` as JSON with optional compression
pub async fn json_response<T: Serialize>(data: &T, compress: bool) -> Result<Response<Body>, StatusCode> {
    let raw = serde_json::to_vec(data).map_err(|e| {
        tracing::error!(error = %e, "JSON serialization failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    encoded_response("application/json", raw, compress).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::BrotliDecoder;

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));

        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
        assert!(accepts_brotli(&headers));
    }

    #[tokio::test]
    async fn test_plain_response() {
        let response = encoded_response("image/svg+xml", b"<svg/>".to_vec(), false)
            .await
            .unwrap();

        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "6");
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    }

    #[tokio::test]
    async fn test_compressed_round_trip() {
        let raw = br#"{"metrics":[]}"#.repeat(20);
        let response = encoded_response("application/json", raw.clone(), true)
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let mut decoder = BrotliDecoder::new(&body[..]);
        let mut decoded = Vec::new();
        decoder.read_to_end(&mut decoded).await.unwrap();
        assert_eq!(decoded, raw);
    }
}
