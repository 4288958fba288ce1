/// Reports are written through the [object_store](https://docs.rs/object_store/latest/object_store/index.html)
/// crate, so the output path can be a local file (the default) or an object in any of the three
/// major cloud providers.  Credentials for cloud storage are loaded from the environment:
///
/// ### AWS
///
/// Set the `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` environment variables, and pass in a
/// URL like `s3://bucket/path/to/downtime.json`.
///
/// ### Azure
///
/// Set the `AZURE_STORAGE_ACCOUNT_NAME` and `AZURE_STORAGE_ACCOUNT_KEY` environment variables, and
/// pass in a URL like `azure://container/path/to/downtime.json`.
///
/// ### GCP
///
/// Set the `GOOGLE_SERVICE_ACCOUNT` environment variable to the path for your service account JSON
/// file, and pass in a URL like `gs://bucket/path/to/downtime.json`.
use std::path::{
    PathBuf,
    absolute,
};

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use object_store::path::Path;
use object_store::{
    DynObjectStore,
    ObjectStoreScheme,
    PutPayload,
};
use url::Url;

use crate::errors::*;

#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    fn location(&self) -> String;
    async fn put(&self, data: Bytes) -> EmptyResult;
}

#[derive(Debug)]
pub struct ObjectReportStore {
    location: String,
    store: Box<DynObjectStore>,
    path: Path,
}

impl ObjectReportStore {
    pub fn new(path_str: &str) -> anyhow::Result<ObjectReportStore> {
        let (scheme, path) = parse_path(path_str)?;
        let store: Box<DynObjectStore> = match scheme {
            ObjectStoreScheme::Local => Box::new(object_store::local::LocalFileSystem::new()),
            ObjectStoreScheme::Memory => Box::new(object_store::memory::InMemory::new()),
            ObjectStoreScheme::AmazonS3 => {
                Box::new(object_store::aws::AmazonS3Builder::from_env().with_url(path_str).build()?)
            },
            ObjectStoreScheme::MicrosoftAzure => Box::new(
                object_store::azure::MicrosoftAzureBuilder::from_env()
                    .with_url(path_str)
                    .build()?,
            ),
            ObjectStoreScheme::GoogleCloudStorage => Box::new(
                object_store::gcp::GoogleCloudStorageBuilder::from_env()
                    .with_url(path_str)
                    .build()?,
            ),
            other => bail!("unsupported report location scheme {other:?}: {path_str}"),
        };

        Ok(ObjectReportStore { location: path_str.into(), store, path })
    }
}

#[async_trait]
impl ReportStore for ObjectReportStore {
    fn location(&self) -> String {
        self.location.clone()
    }

    // Object stores replace the whole object on put, which is what we want: the report is
    // re-rendered from scratch every time, never appended to.
    async fn put(&self, data: Bytes) -> EmptyResult {
        let payload = PutPayload::from_bytes(data);
        self.store.put(&self.path, payload).await?;
        Ok(())
    }
}

fn parse_path(path_str: &str) -> anyhow::Result<(ObjectStoreScheme, Path)> {
    let url = match Url::parse(path_str) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = absolute_strip_dots(path_str)?;
            Url::from_file_path(path).map_err(|e| anyhow!("could not create URL from file path: {e:?}"))?
        },
        res => res?,
    };

    Ok(ObjectStoreScheme::parse(&url)?)
}

fn absolute_strip_dots(path_str: &str) -> anyhow::Result<PathBuf> {
    // `Path::canonicalize` requires the file to exist already, which the report won't on the
    // first write; `absolute` doesn't strip `..` components, and ObjectStoreScheme::parse can't
    // handle them, so we have to do that ourselves.
    let orig_path = absolute(PathBuf::from(path_str))?;
    let mut new_path = PathBuf::new();

    for component in orig_path.iter() {
        if component == ".." {
            if !new_path.pop() {
                bail!("malformed relative path: {path_str}");
            }
        } else {
            new_path.push(component);
        }
    }

    Ok(new_path)
}
