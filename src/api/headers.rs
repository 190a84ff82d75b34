use super::*;

pub(super) const NO_STORE: &str = "no-store";

/// Marks responses uncacheable unless the handler chose a policy itself.
pub(super) async fn cache_policy(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut res = next.run(req).await;
    res.headers_mut()
        .entry(header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static(NO_STORE));

    debug!(%method, %path, status = res.status().as_u16(), "served");
    res
}
