use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    entities::upload::{ResourceKind, StoreUpload, StoredAsset},
    errors::StoreError,
};

/// Remote store that keeps uploaded media and produces eager renditions.
#[automock]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Uploads the payload and waits until the store has settled the call,
    /// including every eager transformation it was asked for.
    ///
    /// Renditions in the returned asset are expected in the order of
    /// `upload.eager`; the store may omit ones it failed to produce.
    async fn upload(&self, upload: StoreUpload) -> Result<StoredAsset, StoreError>;

    /// Delivery URL for an asset, derived without contacting the store.
    fn delivery_url(&self, kind: ResourceKind, asset_id: &str) -> String;
}

#[async_trait]
impl<T> AssetStore for Arc<T>
where
    T: AssetStore + ?Sized,
{
    async fn upload(&self, upload: StoreUpload) -> Result<StoredAsset, StoreError> {
        (**self).upload(upload).await
    }

    fn delivery_url(&self, kind: ResourceKind, asset_id: &str) -> String {
        (**self).delivery_url(kind, asset_id)
    }
}
