use anyhow::{Context as _, anyhow};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectCannedAcl, ObjectIdentifier};

use crate::storage::object::{ObjectStore, normalize_object_key, public_url};

/// Object store backed by an S3-compatible bucket.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3ObjectStore {
    /// Store using an existing client.
    pub fn new(client: Client, bucket: impl Into<String>, public_base: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base: public_base.into(),
        }
    }

    /// Build a client from the ambient AWS configuration plus optional overrides.
    pub async fn connect(
        bucket: &str,
        region: Option<&str>,
        endpoint: Option<&str>,
        public_base: &str,
    ) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()), bucket, public_base)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_public(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let key = normalize_object_key(path)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| anyhow!("put s3://{}/{key}: {e}", self.bucket))?;
        Ok(public_url(&self.public_base, &key))
    }

    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        let prefix = format!("{}/", normalize_object_key(prefix)?);
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| anyhow!("list s3://{}/{prefix}: {e}", self.bucket))?;
            keys.extend(page.contents().iter().filter_map(|o| o.key()).map(str::to_string));
        }

        for delete in delete_batches(&keys)? {
            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| anyhow!("delete s3://{}/{prefix}: {e}", self.bucket))?;
        }
        Ok(())
    }
}

/// Most keys a single `DeleteObjects` request accepts.
const MAX_DELETE_BATCH: usize = 1000;

fn delete_batches(keys: &[String]) -> anyhow::Result<Vec<Delete>> {
    keys.chunks(MAX_DELETE_BATCH)
        .map(|chunk| {
            let ids = chunk
                .iter()
                .map(|k| ObjectIdentifier::builder().key(k).build())
                .collect::<Result<Vec<_>, _>>()
                .context("build s3 object identifiers")?;
            Delete::builder()
                .set_objects(Some(ids))
                .quiet(true)
                .build()
                .context("build s3 delete request")
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/storage/s3.rs"]
mod tests;
