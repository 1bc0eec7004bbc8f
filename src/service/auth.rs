//! Registration, login and password reset against the identity provider.

use super::farmer::FarmerService;
use super::upload::{MultipartForm, CERTIFICATE_POLICY};
use super::validation::RequestValidator;
use crate::error::AppError;
use crate::model::{ActivityStatus, Farmer, FarmerCertificate, FarmerId, NewFarmer};
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Registration form fields after validation.
#[derive(Clone, Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub farmer_name: String,
    pub farmer_last_name: String,
    pub farmer_age: i32,
    pub farmer_address: String,
    pub farmer_city: String,
    pub farmer_town: String,
    pub farmer_neighbourhood: String,
    pub farmer_phone_number: String,
    pub farm_name: String,
    pub farmer_tc_no: String,
    pub farmer_activity_status: ActivityStatus,
    pub imgurl: Option<String>,
}

impl RegisterInput {
    pub fn from_form(form: &MultipartForm) -> Result<Self, AppError> {
        let req = |col: &str| RequestValidator::required(col, form.text(col)).map(str::to_string);

        let email = req("farmer_mail")?;
        RequestValidator::email("farmer_mail", &email)?;
        let password = form
            .text("farmer_password")
            .ok_or_else(|| AppError::Validation("farmer_password is required".into()))?
            .to_string();
        RequestValidator::min_length("farmer_password", &password, 6)?;
        let farmer_age = RequestValidator::positive_int("farmer_age", &req("farmer_age")?)?;
        let farmer_phone_number = req("farmer_phone_number")?;
        RequestValidator::phone("farmer_phone_number", &farmer_phone_number)?;
        let farmer_tc_no = req("farmer_tc_no")?;
        RequestValidator::national_id("farmer_tc_no", &farmer_tc_no)?;
        // Older clients send the misspelled `famer_neighbourhood`.
        let farmer_neighbourhood = RequestValidator::required(
            "farmer_neighbourhood",
            form.text("farmer_neighbourhood").or_else(|| form.text("famer_neighbourhood")),
        )?
        .to_string();
        let farmer_activity_status = match form.text("farmer_activity_status") {
            Some(s) => ActivityStatus::try_from(s.to_string())
                .map_err(|_| AppError::Validation("farmer_activity_status must be Active or NonActive".into()))?,
            None => ActivityStatus::NonActive,
        };

        Ok(RegisterInput {
            email,
            password,
            farmer_name: req("farmer_name")?,
            farmer_last_name: req("farmer_last_name")?,
            farmer_age,
            farmer_address: req("farmer_address")?,
            farmer_city: req("farmer_city")?,
            farmer_town: req("farmer_town")?,
            farmer_neighbourhood,
            farmer_phone_number,
            farm_name: req("farm_name")?,
            farmer_tc_no,
            farmer_activity_status,
            imgurl: form.text("imgurl").map(str::to_string),
        })
    }

    fn into_new_farmer(self, auth_id: Uuid) -> NewFarmer {
        NewFarmer {
            auth_id,
            farmer_name: self.farmer_name,
            farmer_last_name: self.farmer_last_name,
            farmer_age: self.farmer_age,
            farmer_address: self.farmer_address,
            farmer_city: self.farmer_city,
            farmer_town: self.farmer_town,
            farmer_neighbourhood: self.farmer_neighbourhood,
            farmer_phone_number: self.farmer_phone_number,
            farmer_mail: self.email,
            farmer_activity_status: self.farmer_activity_status,
            farm_name: self.farm_name,
            farmer_tc_no: self.farmer_tc_no,
            imgurl: self.imgurl,
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Registration {
    pub farmer: Farmer,
    pub certificate: Option<FarmerCertificate>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct FarmerSummary {
    pub farmer_id: FarmerId,
    pub farmer_name: String,
    pub farmer_last_name: String,
    pub farm_name: String,
    pub farmer_mail: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub farmer: FarmerSummary,
}

pub struct AuthService;

impl AuthService {
    /// Sign up with the identity provider, then write the farmer row and the optional
    /// certificate. A later step failing undoes the earlier ones.
    pub async fn register(state: &AppState, mut form: MultipartForm) -> Result<Registration, AppError> {
        let input = RegisterInput::from_form(&form)?;
        let certificate = form.take_file("certificate");
        if let Some(file) = &certificate {
            CERTIFICATE_POLICY.check(file)?;
        }

        let user = state.identity.sign_up(&input.email, &input.password).await?;
        let farmer = match state.store.insert_farmer(&input.into_new_farmer(user.id)).await {
            Ok(f) => f,
            Err(e) => {
                Self::discard_identity(state, user.id).await;
                return Err(e);
            }
        };
        tracing::info!(farmer_id = farmer.farmer_id, "farmer registered");

        let certificate = match certificate {
            Some(file) => match FarmerService::attach_certificate(state, farmer.farmer_id, file).await {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(farmer_id = farmer.farmer_id, error = %e, "certificate upload failed, rolling back registration");
                    if let Err(del) = state.store.delete_farmer(farmer.farmer_id).await {
                        tracing::error!(farmer_id = farmer.farmer_id, error = %del, "farmer rollback failed");
                    }
                    Self::discard_identity(state, user.id).await;
                    return Err(e);
                }
            },
            None => None,
        };
        Ok(Registration { farmer, certificate })
    }

    /// Exchange credentials for a session. Only `Active` farmers receive a token.
    pub async fn login(state: &AppState, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let email = RequestValidator::required("email", Some(&req.email))?;
        let password = RequestValidator::required("password", Some(&req.password))?;
        let session = state.identity.sign_in(email, password).await?;
        let farmer = state
            .store
            .farmer_by_auth_id(session.user.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("farmer not found".into()))?;
        if !farmer.is_active() {
            tracing::warn!(farmer_id = farmer.farmer_id, "login refused for inactive farmer");
            return Err(AppError::Forbidden("account is not active".into()));
        }
        tracing::info!(farmer_id = farmer.farmer_id, "farmer logged in");
        Ok(LoginResponse {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            farmer: FarmerSummary {
                farmer_id: farmer.farmer_id,
                farmer_name: farmer.farmer_name,
                farmer_last_name: farmer.farmer_last_name,
                farm_name: farmer.farm_name,
                farmer_mail: farmer.farmer_mail,
            },
        })
    }

    pub async fn request_password_reset(state: &AppState, req: &PasswordResetRequest) -> Result<(), AppError> {
        let email = RequestValidator::required("email", Some(&req.email))?;
        RequestValidator::email("email", email)?;
        state.identity.request_password_reset(email).await?;
        tracing::info!("password reset requested");
        Ok(())
    }

    /// Best effort; a failure leaves an orphaned identity user and is only logged.
    async fn discard_identity(state: &AppState, user_id: Uuid) {
        if let Err(e) = state.identity.delete_user(user_id).await {
            tracing::error!(user_id = %user_id, error = %e, "identity user cleanup failed");
        }
    }
}
