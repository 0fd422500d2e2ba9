//! Async HTTP client wrapping the margin JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use margin_core::{collection::CommentSet, comment::Comment};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

/// Async HTTP client for the margin comment API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: Url,
}

/// Shape of the server's error bodies.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let base_url = Url::parse(base_url)
      .with_context(|| format!("invalid server URL {base_url:?}"))?;
    if base_url.cannot_be_a_base() {
      return Err(anyhow!("server URL {base_url} cannot carry a path"));
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url })
  }

  /// Base URL with `segments` appended, each percent-encoded.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  /// `GET /comment.json`
  pub async fn list(&self) -> Result<CommentSet> {
    let url = self.url(&["comment.json"]);
    tracing::debug!(%url, "listing comments");
    let resp = self
      .client
      .get(url)
      .send()
      .await
      .context("GET /comment.json failed")?;

    if !resp.status().is_success() {
      return Err(failure("GET /comment.json", resp).await);
    }
    resp.json().await.context("deserialising comments")
  }

  /// `POST /comments` — returns the comment as stored by the server.
  pub async fn create(&self, comment: &Comment) -> Result<Comment> {
    let url = self.url(&["comments"]);
    tracing::debug!(%url, id = %comment.id, "creating comment");
    let resp = self
      .client
      .post(url)
      .json(comment)
      .send()
      .await
      .context("POST /comments failed")?;

    if resp.status() != StatusCode::CREATED {
      return Err(failure("POST /comments", resp).await);
    }
    resp.json().await.context("deserialising created comment")
  }

  /// `DELETE /comments/:id` — `Ok(false)` when the server had no such id.
  pub async fn delete(&self, id: &str) -> Result<bool> {
    let url = self.url(&["comments", id]);
    tracing::debug!(%url, "deleting comment");
    let resp = self
      .client
      .delete(url)
      .send()
      .await
      .context("DELETE /comments failed")?;

    match resp.status() {
      StatusCode::NO_CONTENT => Ok(true),
      StatusCode::NOT_FOUND => Ok(false),
      _ => Err(failure("DELETE /comments", resp).await),
    }
  }
}

/// Turn an unexpected response into an error carrying the server's message.
async fn failure(what: &str, resp: Response) -> anyhow::Error {
  let status = resp.status();
  match resp.json::<ErrorBody>().await {
    Ok(body) => anyhow!("{what} → {status}: {}", body.error),
    Err(_) => anyhow!("{what} → {status}"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn comment_urls_are_encoded_under_the_base_path() {
    let client = ApiClient::new("http://localhost:3000/margin/").unwrap();
    assert_eq!(
      client.url(&["comments", "c 1/2"]).as_str(),
      "http://localhost:3000/margin/comments/c%201%2F2"
    );
    assert_eq!(
      client.url(&["comment.json"]).as_str(),
      "http://localhost:3000/margin/comment.json"
    );
  }

  #[test]
  fn bare_host_base_url() {
    let client = ApiClient::new("http://localhost:3000").unwrap();
    assert_eq!(
      client.url(&["comments"]).as_str(),
      "http://localhost:3000/comments"
    );
  }

  #[test]
  fn rejects_non_http_base() {
    assert!(ApiClient::new("mailto:someone@example.com").is_err());
    assert!(ApiClient::new("not a url").is_err());
  }
}
