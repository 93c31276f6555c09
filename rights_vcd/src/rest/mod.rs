//! VcdRestClient and generic utilities to help with vCloud
//! API requests

pub mod consts;

use async_trait::async_trait;
use rights_core::{
    logging::{debug, error},
    Result, RightsError, SessionContext,
};

/// Authenticated XML requests against the API.
///
/// Every request is built from the session passed in, so one transport
/// can serve any number of sessions.
#[async_trait]
pub trait XmlTransport: Send + Sync {
    /// GET a resource and return its body.
    async fn get_xml(
        &self,
        session: &SessionContext,
        url: &str,
        content_type: &str,
    ) -> Result<String>;

    /// PUT a full XML document to a resource.
    async fn put_xml(
        &self,
        session: &SessionContext,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<()>;
}

/// Wrapper struct for http functionality
#[derive(Default, Clone)]
pub struct VcdRestClient {
    http_client: reqwest::Client,
}

impl VcdRestClient {
    /// Initialize a new VcdRestClient
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .build()
            .map_err(|e| RightsError::Transport(format!("building http client: {e}")))?;
        Ok(VcdRestClient { http_client })
    }

    /// Builds a request carrying the session's auth and version headers
    pub(crate) fn build_request(
        &self,
        session: &SessionContext,
        url: &str,
        content_type: &str,
        method: reqwest::Method,
    ) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header(consts::AUTH_HEADER, &session.session_token)
            .header(
                consts::ACCEPT_HEADER,
                consts::accept_header_value(&session.api_version),
            )
            .header(consts::CONTENT_TYPE_HEADER, content_type)
            .header(consts::USER_AGENT_HEADER, consts::USER_AGENT)
    }

    /// Send a request and return the response body, turning any failure
    /// into a transport error.
    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<String> {
        let request = req.build().map_err(|e| {
            error!("unable to build request: {e}");
            RightsError::Transport(format!("building request: {e}"))
        })?;
        let (method, url) = (request.method().to_owned(), request.url().to_owned());
        debug!("{method} {url}");

        let resp = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| {
                error!("error with request ({method} {url}): {e}");
                RightsError::Transport(format!("{method} {url}: {e}"))
            })?
            .error_for_status()
            .map_err(|e| {
                error!("error with request - bad response ({method} {url}): {e}");
                RightsError::Transport(format!("{method} {url}: {e}"))
            })?;

        resp.text().await.map_err(|e| {
            error!("error reading response body ({method} {url}): {e}");
            RightsError::Transport(format!("reading response from {method} {url}: {e}"))
        })
    }
}

#[async_trait]
impl XmlTransport for VcdRestClient {
    async fn get_xml(
        &self,
        session: &SessionContext,
        url: &str,
        content_type: &str,
    ) -> Result<String> {
        let req = self.build_request(session, url, content_type, reqwest::Method::GET);
        self.execute(req).await
    }

    async fn put_xml(
        &self,
        session: &SessionContext,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<()> {
        let req = self
            .build_request(session, url, content_type, reqwest::Method::PUT)
            .body(body);
        self.execute(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_carry_session_headers() -> anyhow::Result<()> {
        let session = SessionContext::new("https://vcd.example.com/api", "tok-123", "9.7");
        let req = VcdRestClient::new()?
            .build_request(
                &session,
                "https://vcd.example.com/api/admin",
                consts::ADMIN_MEDIA_TYPE,
                reqwest::Method::GET,
            )
            .build()?;

        let headers = req.headers();
        assert_eq!(headers[consts::AUTH_HEADER], "tok-123");
        assert_eq!(
            headers[consts::ACCEPT_HEADER],
            "application/*+xml;version=27.0"
        );
        assert_eq!(headers[consts::CONTENT_TYPE_HEADER], consts::ADMIN_MEDIA_TYPE);
        Ok(())
    }
}
