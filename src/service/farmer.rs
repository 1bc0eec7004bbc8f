//! Farmer profile, storefront and attachment management.

use super::upload::{farmer_object_key, MultipartForm, UploadedFile, CERTIFICATE_POLICY, IMAGE_POLICY};
use super::validation::RequestValidator;
use crate::auth::AuthFarmer;
use crate::error::AppError;
use crate::model::{
    AttachmentKind, Farmer, FarmerCertificate, FarmerChanges, FarmerId, FarmerImage, PublicFarmer,
    StoreActivity, StoreInfo,
};
use crate::platform::{FARMER_DOCUMENTS_BUCKET, FARMER_IMAGES_BUCKET};
use crate::state::AppState;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct BiographyRequest {
    pub farmer_biografi: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct StoreActivityRequest {
    /// `active` or `nonactive`.
    pub store_activity: String,
}

pub struct FarmerService;

impl FarmerService {
    pub async fn profile(state: &AppState, auth: &AuthFarmer) -> Result<Farmer, AppError> {
        Self::load(state, auth.farmer_id).await
    }

    pub async fn update_profile(
        state: &AppState,
        auth: &AuthFarmer,
        changes: &FarmerChanges,
    ) -> Result<Farmer, AppError> {
        Self::validate_changes(changes)?;
        let farmer = state
            .store
            .update_farmer(auth.farmer_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("farmer {}", auth.farmer_id)))?;
        tracing::info!(farmer_id = farmer.farmer_id, "profile updated");
        Ok(farmer)
    }

    /// Remove the farmer row, then the identity user. The identity call is best effort.
    pub async fn delete_profile(state: &AppState, auth: &AuthFarmer) -> Result<(), AppError> {
        if !state.store.delete_farmer(auth.farmer_id).await? {
            return Err(AppError::NotFound(format!("farmer {}", auth.farmer_id)));
        }
        tracing::info!(farmer_id = auth.farmer_id, "farmer deleted");
        if let Err(e) = state.identity.delete_user(auth.user_id).await {
            tracing::warn!(user_id = %auth.user_id, error = %e, "identity user not deleted");
        }
        Ok(())
    }

    /// Visible only while the account is `Active`.
    pub async fn public_profile(state: &AppState, farmer_id: FarmerId) -> Result<PublicFarmer, AppError> {
        let farmer = Self::load(state, farmer_id).await?;
        if !farmer.is_active() {
            return Err(AppError::NotFound(format!("farmer {}", farmer_id)));
        }
        Ok(farmer.public_profile())
    }

    pub async fn store_info(state: &AppState, auth: &AuthFarmer) -> Result<StoreInfo, AppError> {
        let farmer = Self::load(state, auth.farmer_id).await?;
        Self::assemble_store(state, farmer).await
    }

    /// Storefront for visitors: the farmer must be `Active` and the store switched on.
    pub async fn public_store(state: &AppState, farmer_id: FarmerId) -> Result<StoreInfo, AppError> {
        let farmer = Self::load(state, farmer_id).await?;
        if !farmer.is_active() || farmer.store_activity != StoreActivity::Active {
            return Err(AppError::NotFound(format!("store {}", farmer_id)));
        }
        Self::assemble_store(state, farmer).await
    }

    pub async fn set_biography(
        state: &AppState,
        auth: &AuthFarmer,
        req: &BiographyRequest,
    ) -> Result<StoreInfo, AppError> {
        let farmer = state
            .store
            .set_biography(auth.farmer_id, req.farmer_biografi.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("farmer {}", auth.farmer_id)))?;
        tracing::info!(farmer_id = farmer.farmer_id, "biography updated");
        Self::assemble_store(state, farmer).await
    }

    pub async fn set_store_activity(
        state: &AppState,
        auth: &AuthFarmer,
        req: &StoreActivityRequest,
    ) -> Result<StoreInfo, AppError> {
        let activity = StoreActivity::try_from(req.store_activity.trim().to_string())
            .map_err(|_| AppError::Validation("store_activity must be active or nonactive".into()))?;
        let farmer = state
            .store
            .set_store_activity(auth.farmer_id, activity)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("farmer {}", auth.farmer_id)))?;
        tracing::info!(farmer_id = farmer.farmer_id, store_activity = activity.as_str(), "store activity updated");
        Self::assemble_store(state, farmer).await
    }

    pub async fn upload_image(
        state: &AppState,
        auth: &AuthFarmer,
        mut form: MultipartForm,
    ) -> Result<FarmerImage, AppError> {
        let file = form
            .take_file("file")
            .ok_or_else(|| AppError::Validation("file is required".into()))?;
        let ext = IMAGE_POLICY.check(&file)?;
        let key = farmer_object_key(auth.farmer_id, ext);
        state
            .storage
            .upload(FARMER_IMAGES_BUCKET, &key, file.bytes, &file.content_type)
            .await?;
        let url = state.storage.public_url(FARMER_IMAGES_BUCKET, &key);
        match state.store.insert_image(auth.farmer_id, &key, &url).await {
            Ok(image) => {
                tracing::info!(farmer_id = auth.farmer_id, image_id = image.id, "farm image added");
                Ok(image)
            }
            Err(e) => {
                Self::discard_object(state, FARMER_IMAGES_BUCKET, &key).await;
                Err(e)
            }
        }
    }

    pub async fn upload_certificate(
        state: &AppState,
        auth: &AuthFarmer,
        mut form: MultipartForm,
    ) -> Result<FarmerCertificate, AppError> {
        let file = form
            .take_file("file")
            .ok_or_else(|| AppError::Validation("file is required".into()))?;
        Self::attach_certificate(state, auth.farmer_id, file).await
    }

    /// Store a certificate in the private bucket and record it with a presigned link.
    pub(crate) async fn attach_certificate(
        state: &AppState,
        farmer_id: FarmerId,
        file: UploadedFile,
    ) -> Result<FarmerCertificate, AppError> {
        let ext = CERTIFICATE_POLICY.check(&file)?;
        let key = farmer_object_key(farmer_id, ext);
        state
            .storage
            .upload(FARMER_DOCUMENTS_BUCKET, &key, file.bytes, &file.content_type)
            .await?;
        let inserted = match state.storage.signed_url(FARMER_DOCUMENTS_BUCKET, &key).await {
            Ok(url) => state.store.insert_certificate(farmer_id, &key, &url).await,
            Err(e) => Err(e.into()),
        };
        match inserted {
            Ok(certificate) => {
                tracing::info!(farmer_id, certificate_id = certificate.id, "certificate added");
                Ok(certificate)
            }
            Err(e) => {
                Self::discard_object(state, FARMER_DOCUMENTS_BUCKET, &key).await;
                Err(e)
            }
        }
    }

    pub async fn delete_attachment(
        state: &AppState,
        auth: &AuthFarmer,
        kind: AttachmentKind,
        id: i64,
    ) -> Result<(), AppError> {
        let (bucket, owner, file_path) = match kind {
            AttachmentKind::Image => {
                let image = state
                    .store
                    .image_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("image {}", id)))?;
                (FARMER_IMAGES_BUCKET, image.farmer_id, image.file_path)
            }
            AttachmentKind::Certificate => {
                let certificate = state
                    .store
                    .certificate_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("certificate {}", id)))?;
                (FARMER_DOCUMENTS_BUCKET, certificate.farmer_id, certificate.file_path)
            }
        };
        if owner != auth.farmer_id {
            return Err(AppError::Forbidden(format!("{} {} belongs to another farmer", kind.label(), id)));
        }

        state.storage.remove(bucket, &[file_path]).await?;
        let removed = match kind {
            AttachmentKind::Image => state.store.delete_image(id).await?,
            AttachmentKind::Certificate => state.store.delete_certificate(id).await?,
        };
        if !removed {
            return Err(AppError::NotFound(format!("{} {}", kind.label(), id)));
        }
        tracing::info!(farmer_id = auth.farmer_id, attachment_id = id, bucket, "attachment deleted");
        Ok(())
    }

    async fn load(state: &AppState, farmer_id: FarmerId) -> Result<Farmer, AppError> {
        state
            .store
            .farmer_by_id(farmer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("farmer {}", farmer_id)))
    }

    /// Images plus certificates with presigned links issued for this read.
    async fn assemble_store(state: &AppState, farmer: Farmer) -> Result<StoreInfo, AppError> {
        let images = state.store.images_for(farmer.farmer_id).await?;
        let mut certificates = state.store.certificates_for(farmer.farmer_id).await?;
        for certificate in certificates.iter_mut() {
            match state.storage.signed_url(FARMER_DOCUMENTS_BUCKET, &certificate.file_path).await {
                Ok(url) => certificate.certificate_url = url,
                Err(e) => {
                    tracing::warn!(certificate_id = certificate.id, error = %e, "keeping stored certificate link")
                }
            }
        }
        Ok(StoreInfo {
            farmer_id: farmer.farmer_id,
            farm_name: farmer.farm_name,
            farmer_biografi: farmer.farmer_biografi,
            store_activity: farmer.store_activity,
            images,
            certificates,
        })
    }

    async fn discard_object(state: &AppState, bucket: &str, key: &str) {
        if let Err(e) = state.storage.remove(bucket, &[key.to_string()]).await {
            tracing::warn!(bucket, key, error = %e, "orphaned object left in storage");
        }
    }

    fn validate_changes(changes: &FarmerChanges) -> Result<(), AppError> {
        if changes.is_empty() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let texts = [
            ("farmer_name", &changes.farmer_name),
            ("farmer_last_name", &changes.farmer_last_name),
            ("farmer_address", &changes.farmer_address),
            ("farmer_city", &changes.farmer_city),
            ("farmer_town", &changes.farmer_town),
            ("farmer_neighbourhood", &changes.farmer_neighbourhood),
            ("farmer_phone_number", &changes.farmer_phone_number),
            ("farm_name", &changes.farm_name),
        ];
        for (col, value) in texts {
            if let Some(v) = value {
                RequestValidator::required(col, Some(v.as_str()))?;
            }
        }
        if let Some(phone) = &changes.farmer_phone_number {
            RequestValidator::phone("farmer_phone_number", phone.trim())?;
        }
        if let Some(age) = changes.farmer_age {
            if age <= 0 {
                return Err(AppError::Validation("farmer_age must be a positive integer".into()));
            }
        }
        Ok(())
    }
}
