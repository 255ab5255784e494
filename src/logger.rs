use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use log::{error, info, warn};
use std::rc::Rc;
use std::time::Instant;

/// Request/response logging middleware
///
/// One line per request on completion; the level follows the response
/// class (5xx error, 4xx warn, otherwise info). Query strings are logged
/// but headers never are, since they carry credentials.
pub struct LoggerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggerMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(LoggerMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query = req.query_string().to_string();

        let service = self.service.clone();

        Box::pin(async move {
            let res = service.call(req).await?;

            let elapsed_ms = start_time.elapsed().as_millis();
            let status = res.status();
            let target = if query.is_empty() {
                path
            } else {
                format!("{}?{}", path, query)
            };

            if status.is_server_error() {
                error!("{} {} - {} ({}ms)", method, target, status.as_u16(), elapsed_ms);
            } else if status.is_client_error() {
                warn!("{} {} - {} ({}ms)", method, target, status.as_u16(), elapsed_ms);
            } else {
                info!("{} {} - {} ({}ms)", method, target, status.as_u16(), elapsed_ms);
            }

            Ok(res)
        })
    }
}
