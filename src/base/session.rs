use std::path::Path;

use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Proxy, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::base::account::{Credentials, Endpoint};
use crate::base::portal::{classify, rejection, PageStatus};
use crate::utils::constants::{Page, CHUNK_SIZE, SUBMIT_ASSIGNMENT, URL};
use crate::Error;

/// A logged in student talking to the portal
/// <br> Starts out talking to the portal directly and switches to the proxy for good once the portal reports that access is blocked
#[derive(Debug)]
pub struct Session {
    credentials: Credentials,
    endpoint: Endpoint,
    direct: Client,
    proxied: Client,
    use_proxy: bool,
}

impl Session {
    /// Creates a session for the endpoint derived from `credentials`, using the school filter as fallback proxy
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        let endpoint = credentials.endpoint()?;
        Self::with_proxy(credentials, endpoint, URL::PROXY)
    }

    pub fn with_proxy(credentials: Credentials, endpoint: Endpoint, proxy: &str) -> Result<Self, Error> {
        let direct = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| Error::Network(format!("failed to build client '{}'", e)))?;

        let proxy = Proxy::all(proxy).map_err(|e| Error::Config(format!("invalid proxy '{}': {}", proxy, e)))?;
        let proxied = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| Error::Network(format!("failed to build proxied client '{}'", e)))?;

        Ok(Self { credentials, endpoint, direct, proxied, use_proxy: false })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns true once the session has switched to the proxy
    pub fn is_proxied(&self) -> bool {
        self.use_proxy
    }

    fn client(&self) -> &Client {
        if self.use_proxy {
            &self.proxied
        } else {
            &self.direct
        }
    }

    /// Posts the credentials together with `page` and returns the page if the portal accepted it
    /// <br> A blocked request is sent once more through the proxy, that answer is only checked for rejections
    pub async fn fetch(&mut self, page: Page) -> Result<String, Error> {
        let html = self.post_page(page).await?;

        match classify(&html) {
            PageStatus::Ok => Ok(html),
            PageStatus::Rejected(rejection) => Err(Error::Rejected(rejection)),
            PageStatus::Blocked if self.use_proxy => Ok(html),
            PageStatus::Blocked => {
                warn!("access to '{}' is blocked, switching to proxy '{}'", self.endpoint.url(), URL::PROXY);
                self.use_proxy = true;

                let html = self.post_page(page).await?;
                match rejection(&html) {
                    Some(rejection) => Err(Error::Rejected(rejection)),
                    None => Ok(html),
                }
            }
        }
    }

    async fn post_page(&self, page: Page) -> Result<String, Error> {
        let params = [
            ("classes", self.credentials.period.as_str()),
            ("students", self.credentials.name.as_str()),
            ("password", self.credentials.password.as_str()),
            ("Submit", "Submit"),
            ("page", page.as_str()),
        ];

        debug!("posting page '{}' (proxy: {})", page.as_str(), self.use_proxy);
        let response = self
            .client()
            .post(self.endpoint.url().clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Network(format!("failed to post page '{}': {}", page.as_str(), e)))?;
        debug!("page '{}' answered with {}", page.as_str(), response.status());

        response
            .text()
            .await
            .map_err(|e| Error::Parsing(format!("failed to parse response as text '{}'", e)))
    }

    /// Downloads a file linked from a portal page to `destination` and returns the amount of bytes written
    /// <br> Please note that `destination` will be overwritten if there is already a file. A failed transfer can leave a partial file behind
    pub async fn download(&self, link: &str, destination: &Path) -> Result<u64, Error> {
        let url = self.endpoint.resolve(link)?;
        debug!("downloading '{}' to '{}' (proxy: {})", url, destination.display(), self.use_proxy);

        let mut response = self
            .client()
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Network(format!("download of '{}' failed '{}'", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::FetchFailed(response.status().as_u16()));
        }

        let mut file = File::create(destination).await.map_err(|e| {
            Error::FileSystem(format!("failed to create file at '{}' with error '{}'", destination.display(), e))
        })?;

        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::Network(format!("download of '{}' was interrupted '{}'", url, e)))?
        {
            for block in chunk.chunks(CHUNK_SIZE) {
                file.write_all(block)
                    .await
                    .map_err(|e| Error::FileSystem(format!("failed to save file with error '{}'", e)))?;
                written += block.len() as u64;
            }
        }
        file.flush()
            .await
            .map_err(|e| Error::FileSystem(format!("failed to save file with error '{}'", e)))?;

        info!("downloaded {} bytes from '{}'", written, url);
        Ok(written)
    }

    /// Submits the file at `path` for the assignment `assignment_id`, optionally with a comment to the teacher
    pub async fn submit(&self, assignment_id: &str, path: &Path, comment: Option<&str>) -> Result<(), Error> {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| Error::FileSystem(format!("failed to read '{}' with error '{}'", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let form = Form::new()
            .text("page", Page::StoreHomework.as_str())
            .text("id4", self.credentials.student_id.clone())
            .text("classid", self.credentials.period.clone())
            .text("assignmentid", assignment_id.to_string())
            .text("teacher_comment", comment.unwrap_or_default().to_string())
            .text("submit", SUBMIT_ASSIGNMENT)
            .part("filecontents", Part::bytes(contents).file_name(file_name));

        debug!("submitting '{}' for assignment '{}' (proxy: {})", path.display(), assignment_id, self.use_proxy);
        let response = self
            .client()
            .post(self.endpoint.url().clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(format!("failed to submit '{}': {}", path.display(), e)))?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(Error::SubmitFailed(status.as_u16())),
        }
    }
}
