use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::io::AsyncRead;

use super::download::Download;
use super::pipe::pipe;
use super::producer::produce;
use super::transport::{Body, Request, Response, Transport};
use crate::core::{
    Encoder, check_status, content_length, decode_envelope, join_path, merge, parent_path,
    properties_path,
};
use crate::data::{ClientConfig, Permission, ResourceDescriptor, Transfer};
use crate::error::{Error, Result};

/// Header carrying the uploaded resource's modification time.
pub const MODIFIED_HEADER: &str = "Fh-Modified";

#[derive(Serialize)]
struct PermissionUpdate<'a> {
    permissions: &'a Permission,
}

/// Client for a resource server.
///
/// All paths are server-relative (`/v1/file/docs/a.txt`), never full URLs.
pub struct Client<T> {
    transport: Arc<T>,
    config:    ClientConfig,
}

impl<T: Transport + 'static> Client<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig { &self.config }

    /// Full URL of a server-relative path.
    pub fn full_url(&self, path: &str) -> String { format!("{}{}", self.config.root, path) }

    fn request(&self, method: Method, path: &str) -> Request {
        Request::new(method, self.full_url(path))
            .header(AUTHORIZATION.as_str(), self.config.credentials.basic_auth())
    }

    async fn send(&self, request: Request) -> Result<Response> {
        let url = request.url.clone();
        self.transport
            .execute(request)
            .await
            .map_err(|e| Error::transport(&url, e))
    }

    /// Fetch the metadata record of a resource.
    pub async fn retrieve(&self, path: &str) -> Result<ResourceDescriptor> {
        let props = properties_path(path.trim_end_matches('/'))?;
        self.get_json(&props).await
    }

    /// List the children of a directory. Non-directories have none.
    pub async fn children(&self, dir: &ResourceDescriptor) -> Result<Vec<ResourceDescriptor>> {
        if !dir.is_dir {
            return Ok(Vec::new());
        }
        self.get_json(&dir.children_path()?).await
    }

    async fn get_json<D: DeserializeOwned>(&self, path: &str) -> Result<D> {
        self.call(self.request(Method::GET, path)).await
    }

    /// Send a metadata request and unwrap the envelope of its response.
    async fn call<D: DeserializeOwned>(&self, request: Request) -> Result<D> {
        let url = request.url.clone();
        let response = self.send(request).await?;
        let status = response.status;
        let body = response.bytes().await.map_err(Error::Body)?;
        decode_envelope(&url, status, &body)
    }

    /// Delete a file or datastore.
    pub async fn delete(&self, resource: &ResourceDescriptor) -> Result<()> {
        let request = self.request(Method::DELETE, &resource.url);
        self.call::<IgnoredAny>(request).await?;
        tracing::debug!(url = %resource.url, "resource deleted");
        Ok(())
    }

    /// Replace the permissions of a file or datastore.
    pub async fn set_permission(
        &self,
        resource: &ResourceDescriptor,
        permission: &Permission,
    ) -> Result<()> {
        let body = serde_json::to_vec(&PermissionUpdate {
            permissions: permission,
        })
        .map_err(Error::Encode)?;
        let request = self
            .request(Method::PUT, &resource.url)
            .header(CONTENT_TYPE.as_str(), "application/json")
            .body(Body::Full(Bytes::from(body)));
        self.call::<IgnoredAny>(request).await?;
        Ok(())
    }

    /// Upload a local file into `destination`.
    ///
    /// The resource is named after the file, and the file's size and
    /// modification time describe the transfer.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        destination: &ResourceDescriptor,
    ) -> Result<ResourceDescriptor> {
        let path = path.as_ref();
        if !destination.is_dir {
            return Err(Error::NotAContainer {
                url: destination.url.clone(),
            });
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidName(path.display().to_string()))?;

        let file = tokio::fs::File::open(path).await.map_err(Error::SourceRead)?;
        let metadata = file.metadata().await.map_err(Error::SourceRead)?;
        if metadata.is_dir() {
            return Err(Error::SourceRead(io::Error::other(format!(
                "{} is a directory",
                path.display()
            ))));
        }

        let mut transfer = Transfer::new(name, metadata.len());
        if let Ok(modified) = metadata.modified() {
            transfer = transfer.modified(modified.into());
        }
        self.upload(&transfer, file, destination).await
    }

    /// Stream `source` into `destination` as `transfer.name`.
    ///
    /// Exactly `transfer.size` bytes are sent under a `Content-Length` fixed
    /// before the first byte. The encoder and the HTTP exchange run
    /// concurrently through a bounded pipe, so memory use does not grow with
    /// the payload. On success the new resource's metadata is fetched from
    /// the server.
    ///
    /// `destination` must be a directory; otherwise this fails before
    /// `source` is read.
    pub async fn upload<R>(
        &self,
        transfer: &Transfer,
        source: R,
        destination: &ResourceDescriptor,
    ) -> Result<ResourceDescriptor>
    where
        R: AsyncRead + Unpin + Send,
    {
        if !destination.is_dir {
            return Err(Error::NotAContainer {
                url: destination.url.clone(),
            });
        }
        let resource = join_path(&destination.url, &transfer.name)?;
        let target = parent_path(&resource)?;

        self.send_upload(transfer, source, &target).await?;
        self.retrieve(&resource).await
    }

    /// Run the producer and the exchange for one upload and merge their
    /// outcomes. Returns the payload bytes sent.
    async fn send_upload<R>(&self, transfer: &Transfer, source: R, target: &str) -> Result<u64>
    where
        R: AsyncRead + Unpin + Send,
    {
        let encoder = Encoder::new();
        let length = content_length(&transfer.name, transfer.size);
        let (writer, reader) = pipe();

        let mut request = self
            .request(transfer.method.http_method(), target)
            .header(CONTENT_TYPE.as_str(), encoder.content_type());
        if let Some(modified) = transfer.modified_header() {
            request = request.header(MODIFIED_HEADER, modified);
        }
        let request = request.body(Body::Pipe { reader, length });
        let url = request.url.clone();

        tracing::debug!(
            %url,
            method = %transfer.method,
            name = %transfer.name,
            size = transfer.size,
            content_length = length,
            "starting upload"
        );

        let outcome = {
            let producer = produce(writer, &encoder, &transfer.name, source, transfer.size);
            let exchange = async {
                let response = self.send(request).await?;
                check_status(&url, response.status)
            };
            tokio::pin!(producer, exchange);

            // the transport may keep the pipe's read end after answering, so a
            // failed exchange has to release the writer itself
            tokio::select! {
                produced = &mut producer => merge(produced, exchange.await),
                exchanged = &mut exchange => match exchanged {
                    Ok(()) => merge(producer.await, Ok(())),
                    Err(e) => merge(Err(Error::PipeClosed), Err(e)),
                },
            }
        };

        match outcome.into_result() {
            Ok(sent) => {
                tracing::debug!(%url, sent, "upload finished");
                Ok(sent)
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "upload failed");
                Err(e)
            }
        }
    }

    /// Reader over a resource's content. No request is made until the
    /// first read.
    pub fn download(&self, path: &str) -> Result<Download<T>> {
        if !path.starts_with('/') {
            return Err(Error::InvalidPath(path.to_string()));
        }
        Ok(Download::new(
            Arc::clone(&self.transport),
            self.full_url(path),
            self.config.credentials.basic_auth(),
        ))
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
