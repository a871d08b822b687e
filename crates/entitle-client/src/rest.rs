//! Envelope-level HTTP helpers.
//!
//! Every Entitle endpoint speaks the same dialect: form-encoded request
//! parameters in, an XML envelope out. These helpers own the status
//! handling and the parse; the typed resources own URLs and conversion.

use entitle_wire::Envelope;

use crate::error::ClientError;
use crate::retry::retry_send;

pub(crate) async fn get_envelope(
    http: &reqwest::Client,
    url: &str,
    endpoint: &str,
) -> Result<Envelope, ClientError> {
    let resp = retry_send(|| http.get(url).send())
        .await
        .map_err(|e| http_error(endpoint, e))?;
    read_envelope(resp, endpoint).await
}

/// Like [`get_envelope`], mapping 404 to `None`.
pub(crate) async fn get_envelope_opt(
    http: &reqwest::Client,
    url: &str,
    endpoint: &str,
) -> Result<Option<Envelope>, ClientError> {
    let resp = retry_send(|| http.get(url).send())
        .await
        .map_err(|e| http_error(endpoint, e))?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    read_envelope(resp, endpoint).await.map(Some)
}

pub(crate) async fn post_form(
    http: &reqwest::Client,
    url: &str,
    endpoint: &str,
    params: &[(String, String)],
) -> Result<Envelope, ClientError> {
    let resp = retry_send(|| http.post(url).form(params).send())
        .await
        .map_err(|e| http_error(endpoint, e))?;
    read_envelope(resp, endpoint).await
}

pub(crate) async fn delete(
    http: &reqwest::Client,
    url: &str,
    endpoint: &str,
) -> Result<(), ClientError> {
    let resp = retry_send(|| http.delete(url).send())
        .await
        .map_err(|e| http_error(endpoint, e))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(())
}

async fn read_envelope(resp: reqwest::Response, endpoint: &str) -> Result<Envelope, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    let body = resp.text().await.map_err(|e| http_error(endpoint, e))?;
    Ok(Envelope::from_xml(&body)?)
}

fn http_error(endpoint: &str, source: reqwest::Error) -> ClientError {
    ClientError::Http {
        endpoint: endpoint.to_string(),
        source,
    }
}
