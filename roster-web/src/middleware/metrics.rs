//! Middlewares for reporting Metrics in Roster.

use crate::errors::HandlerError;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web::Data,
    Error as ActixError,
};
use cadence::{StatsdClient, Timed};
use std::{
    future::{ready, Future, Ready},
    pin::Pin,
    task::Context,
    time::Instant,
};

/// Factory for [`MetricsMiddleware`].
pub struct Metrics;

/// Middleware to record request metrics.
pub struct MetricsMiddleware<S> {
    /// The wrapped service.
    service: S,
}

impl<S> Transform<S, ServiceRequest> for Metrics
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = ActixError>,
    S::Future: 'static,
{
    type Response = ServiceResponse;

    type Error = ActixError;

    type Transform = MetricsMiddleware<S>;

    type InitError = ();

    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddleware { service }))
    }
}

impl<S> Service<ServiceRequest> for MetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = ActixError>,
    S::Future: 'static,
{
    type Response = ServiceResponse;

    type Error = ActixError;

    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx).map_err(|error| {
            tracing::error!(
                r#type = "web.metrics.polling-error",
                ?error,
                "Error polling service from metrics middleware"
            );
            HandlerError::internal().into()
        })
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let path = req.path().to_string();
        let metrics_client = req.app_data::<Data<StatsdClient>>().cloned();
        let fut = self.service.call(req);

        Box::pin(async move {
            let response = fut.await?;
            match metrics_client {
                Some(metrics_client) => {
                    metrics_client
                        .time_with_tags("request.duration", start.elapsed())
                        .with_tag("path", &path)
                        .with_tag("status", response.status().as_str())
                        .send();
                }
                None => tracing::warn!(
                    r#type = "web.metrics.no-client",
                    "No metrics client configured, but metrics middleware attached"
                ),
            }
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Metrics;
    use actix_web::{
        test,
        web::{self, Data},
        App, HttpResponse,
    };
    use cadence::{SpyMetricSink, StatsdClient};

    #[actix_rt::test]
    async fn test_request_duration_reaches_shared_client() {
        let (rx, sink) = SpyMetricSink::new();
        let metrics_client = Data::new(StatsdClient::from_sink("", sink));
        let app = test::init_service(
            App::new()
                .app_data(metrics_client.clone())
                .wrap(Metrics)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let request = test::TestRequest::get().uri("/ping").to_request();
        let response = test::call_service(&app, request).await;
        assert!(response.status().is_success());

        let line = String::from_utf8(rx.try_recv().expect("a metric was sent"))
            .expect("metric is not utf8");
        assert!(line.starts_with("request.duration:"), "metric: {}", line);
        assert!(line.contains("path:/ping"), "metric: {}", line);
        assert!(line.contains("status:200"), "metric: {}", line);
    }
}
