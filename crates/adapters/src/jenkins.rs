// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP access to a Jenkins server

use async_trait::async_trait;
use jkq_core::{HttpError, Response, TaskOptions};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter for talking to Jenkins.
///
/// Any status code is a successful exchange; only failures to complete the
/// request at all are errors.
#[async_trait]
pub trait JenkinsClient: Clone + Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<Response, HttpError>;

    /// POST an url-encoded form with extra request headers
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Response, HttpError>;

    /// GET `url`, streaming a 200 body into `dest`. Other statuses are
    /// returned with their body and `dest` is left untouched.
    async fn download(&self, url: &str, dest: &Path) -> Result<Response, HttpError>;
}

/// [`JenkinsClient`] over reqwest with preemptive basic auth
#[derive(Clone)]
pub struct ReqwestJenkinsClient {
    inner: reqwest::Client,
    username: String,
    password: String,
}

impl ReqwestJenkinsClient {
    pub fn new(options: &TaskOptions) -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .danger_accept_invalid_certs(!options.strict_ssl)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Self { inner, username: options.username.clone(), password: options.password.clone() })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let request = self.inner.request(method, url);
        if self.username.is_empty() {
            request
        } else {
            request.basic_auth(&self.username, Some(&self.password))
        }
    }
}

#[async_trait]
impl JenkinsClient for ReqwestJenkinsClient {
    async fn get(&self, url: &str) -> Result<Response, HttpError> {
        tracing::debug!(%url, "GET");
        let response = self.request(reqwest::Method::GET, url).send().await.map_err(classify)?;
        read_response(response).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Response, HttpError> {
        tracing::debug!(%url, fields = form.len(), "POST");
        let mut request = self.request(reqwest::Method::POST, url).form(form);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await.map_err(classify)?;
        read_response(response).await
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<Response, HttpError> {
        tracing::debug!(%url, dest = %dest.display(), "download");
        let mut response =
            self.request(reqwest::Method::GET, url).send().await.map_err(classify)?;
        if response.status() != reqwest::StatusCode::OK {
            return read_response(response).await;
        }

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let mut file = tokio::fs::File::create(dest).await.map_err(|e| io_error(dest, e))?;
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            file.write_all(&chunk).await.map_err(|e| io_error(dest, e))?;
        }
        file.flush().await.map_err(|e| io_error(dest, e))?;
        Ok(Response { status, headers, body: Vec::new() })
    }
}

async fn read_response(response: reqwest::Response) -> Result<Response, HttpError> {
    let status = response.status().as_u16();
    let headers = collect_headers(response.headers());
    let body = response.bytes().await.map_err(|e| match classify(e) {
        HttpError::Transport(message) => HttpError::Body(message),
        other => other,
    })?;
    Ok(Response { status, headers, body: body.to_vec() })
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

fn classify(err: reqwest::Error) -> HttpError {
    if is_connection_reset(&err) {
        HttpError::ConnectionReset(err.to_string())
    } else {
        HttpError::Transport(error_chain(&err))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> HttpError {
    if err.kind() == std::io::ErrorKind::ConnectionReset {
        return HttpError::ConnectionReset(err.to_string());
    }
    HttpError::Io { path: path.display().to_string(), message: err.to_string() }
}

/// Whether any error in the source chain is an I/O connection reset
fn is_connection_reset(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionReset {
                return true;
            }
        }
        current = e.source();
    }
    false
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        message.push_str(": ");
        message.push_str(&e.to_string());
        current = e.source();
    }
    message
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::JenkinsClient;
    use async_trait::async_trait;
    use jkq_core::{HttpError, Response};
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    /// Recorded request
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum JenkinsCall {
        Get { url: String },
        PostForm { url: String, form: Vec<(String, String)>, headers: Vec<(String, String)> },
        Download { url: String, dest: PathBuf },
    }

    impl JenkinsCall {
        pub fn url(&self) -> &str {
            match self {
                JenkinsCall::Get { url }
                | JenkinsCall::PostForm { url, .. }
                | JenkinsCall::Download { url, .. } => url,
            }
        }
    }

    #[derive(Clone)]
    struct Reply {
        outcome: Result<Response, HttpError>,
        /// Time the server takes to answer
        delay: Duration,
    }

    #[derive(Default)]
    struct FakeJenkinsState {
        routes: HashMap<String, VecDeque<Reply>>,
        calls: Vec<JenkinsCall>,
    }

    /// Scripted Jenkins server.
    ///
    /// Replies are queued per exact URL and consumed in order; the last reply
    /// for a URL repeats forever. Unscripted URLs answer 404.
    #[derive(Clone, Default)]
    pub struct FakeJenkinsClient {
        inner: Arc<Mutex<FakeJenkinsState>>,
    }

    impl FakeJenkinsClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, url: &str, response: Response) -> &Self {
            self.push(url, Ok(response), Duration::ZERO);
            self
        }

        /// Queue a reply that arrives only after `delay`
        pub fn respond_after(&self, url: &str, delay: Duration, response: Response) -> &Self {
            self.push(url, Ok(response), delay);
            self
        }

        pub fn fail(&self, url: &str, error: HttpError) -> &Self {
            self.push(url, Err(error), Duration::ZERO);
            self
        }

        /// Get all recorded requests
        pub fn calls(&self) -> Vec<JenkinsCall> {
            self.inner.lock().calls.clone()
        }

        pub fn requests_to(&self, url: &str) -> usize {
            self.inner.lock().calls.iter().filter(|call| call.url() == url).count()
        }

        fn push(&self, url: &str, outcome: Result<Response, HttpError>, delay: Duration) {
            let reply = Reply { outcome, delay };
            self.inner.lock().routes.entry(url.to_string()).or_default().push_back(reply);
        }

        async fn reply(&self, call: JenkinsCall) -> Result<Response, HttpError> {
            let reply = {
                let mut state = self.inner.lock();
                let url = call.url().to_string();
                state.calls.push(call);
                match state.routes.get_mut(&url) {
                    Some(queue) if queue.len() > 1 => queue.pop_front(),
                    Some(queue) => queue.front().cloned(),
                    None => None,
                }
            };
            let Some(reply) = reply else {
                return Ok(Response::new(404).with_body("Not Found"));
            };
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            reply.outcome
        }
    }

    #[async_trait]
    impl JenkinsClient for FakeJenkinsClient {
        async fn get(&self, url: &str) -> Result<Response, HttpError> {
            self.reply(JenkinsCall::Get { url: url.to_string() }).await
        }

        async fn post_form(
            &self,
            url: &str,
            form: &[(String, String)],
            headers: &[(String, String)],
        ) -> Result<Response, HttpError> {
            self.reply(JenkinsCall::PostForm {
                url: url.to_string(),
                form: form.to_vec(),
                headers: headers.to_vec(),
            })
            .await
        }

        async fn download(&self, url: &str, dest: &Path) -> Result<Response, HttpError> {
            let mut response = self
                .reply(JenkinsCall::Download { url: url.to_string(), dest: dest.to_path_buf() })
                .await?;
            if response.status == 200 {
                tokio::fs::write(dest, &response.body).await.map_err(|e| HttpError::Io {
                    path: dest.display().to_string(),
                    message: e.to_string(),
                })?;
                response.body.clear();
            }
            Ok(response)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeJenkinsClient, JenkinsCall};

#[cfg(test)]
#[path = "jenkins_tests.rs"]
mod tests;
