use gloo_net::http::{Request, RequestBuilder};
use wowmaps_core::{Method, RestCall, RestReply, RestTransport, TransportError};

/// `fetch`-based transport for the catalog and assistant clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn builder(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Patch => Request::patch(url),
        Method::Delete => Request::delete(url),
    }
}

fn failed(err: gloo_net::Error) -> TransportError {
    TransportError(err.to_string())
}

#[async_trait::async_trait(?Send)]
impl RestTransport for GlooTransport {
    async fn execute(&self, call: RestCall) -> Result<RestReply, TransportError> {
        log::debug!("{} {}", call.method, call.url);
        let request = builder(call.method, &call.url);
        let request = match &call.body {
            Some(body) => request.json(body),
            None => request.build(),
        }
        .map_err(failed)?;
        let response = request.send().await.map_err(failed)?;
        let status = response.status();
        let body = response.text().await.map_err(failed)?;
        Ok(RestReply { status, body })
    }
}
