use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use tracing::debug;

/**
 * Middleware logging method, path, status and duration of every request on the `performance` target.
 */
pub async fn timing_middleware(request: ServiceRequest, next: Next<impl MessageBody>) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start_time = std::time::Instant::now();
    let path = request.path().to_owned();
    let method = request.method().to_owned();
    let trace_id = request.headers().get("X-Trace-ID").and_then(|value| value.to_str().ok()).map(str::to_owned);
    let response = next.call(request).await;
    let response_code = match &response {
        Ok(service_response) => service_response.status().as_u16(),
        // Errors escaping the handler chain are rendered as internal errors.
        Err(_) => 500,
    };
    let duration = start_time.elapsed();
    debug!(target: "performance", trace_id = trace_id.as_deref().unwrap_or("-"), "Request for {} {} with status {} processed in {}ms", method, path, response_code, duration.as_millis());
    response
}

#[cfg(test)]
mod test {
    use actix_web::{App, HttpResponse, middleware::from_fn, test, web};

    use super::*;

    #[actix_web::test]
    async fn test_timing_middleware_passes_response_through() {
        let app = test::init_service(App::new().wrap(from_fn(timing_middleware)).route("/ping", web::get().to(|| async { HttpResponse::NoContent().finish() }))).await;
        let request = test::TestRequest::get().uri("/ping").insert_header(("X-Trace-ID", "abc")).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status().as_u16(), 204);
    }
}
