//! HTTP handlers. Thin: parse the request, call into `selah-core`, serialize the result.

pub mod advice;
pub mod voice;

pub async fn health() -> &'static str {
    "OK"
}
