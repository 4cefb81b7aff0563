//! Client for the external building-energy model.
//!
//! The model is an opaque HTTP service taking building parameters and
//! answering with a single predicted consumption figure. Requests are
//! validated here before they leave the process.

use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Building use categories, numbered the way the model was trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PrimaryUse {
    Education = 0,
    EntertainmentPublicAssembly = 1,
    FoodSalesAndService = 2,
    Healthcare = 3,
    LodgingResidential = 4,
    Office = 5,
    Parking = 6,
    PublicServices = 7,
    ReligiousWorship = 8,
    Retail = 9,
    Utility = 10,
    WarehouseStorage = 11,
}

impl PrimaryUse {
    pub const ALL: [PrimaryUse; 12] = [
        PrimaryUse::Education,
        PrimaryUse::EntertainmentPublicAssembly,
        PrimaryUse::FoodSalesAndService,
        PrimaryUse::Healthcare,
        PrimaryUse::LodgingResidential,
        PrimaryUse::Office,
        PrimaryUse::Parking,
        PrimaryUse::PublicServices,
        PrimaryUse::ReligiousWorship,
        PrimaryUse::Retail,
        PrimaryUse::Utility,
        PrimaryUse::WarehouseStorage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PrimaryUse::Education => "Education",
            PrimaryUse::EntertainmentPublicAssembly => "Entertainment/public assembly",
            PrimaryUse::FoodSalesAndService => "Food sales and service",
            PrimaryUse::Healthcare => "Healthcare",
            PrimaryUse::LodgingResidential => "Lodging/residential",
            PrimaryUse::Office => "Office",
            PrimaryUse::Parking => "Parking",
            PrimaryUse::PublicServices => "Public services",
            PrimaryUse::ReligiousWorship => "Religious worship",
            PrimaryUse::Retail => "Retail",
            PrimaryUse::Utility => "Utility",
            PrimaryUse::WarehouseStorage => "Warehouse/storage",
        }
    }
}

impl TryFrom<u8> for PrimaryUse {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| format!("primary_use must be between 0 and 11, got {value}"))
    }
}

impl From<PrimaryUse> for u8 {
    fn from(value: PrimaryUse) -> Self {
        value as u8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub square_meters: f64,
    pub year_built: i32,
    pub primary_use: PrimaryUse,
    /// ISO `YYYY-MM-DD`
    pub date: NaiveDate,
}

impl PredictionRequest {
    pub fn validate(&self) -> Result<(), PredictError> {
        if !self.square_meters.is_finite() || self.square_meters <= 0.0 {
            return Err(PredictError::InvalidInput(
                "square_meters must be a positive number".to_string(),
            ));
        }
        if self.year_built > Utc::now().year() {
            return Err(PredictError::InvalidInput(
                "year_built cannot be in the future".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_energy_kwh: f64,
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Prediction service unavailable: {0}")]
    Upstream(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    pub async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictError> {
        request.validate()?;
        debug!(
            "Requesting prediction for {} building of {} m2",
            request.primary_use.label(),
            request.square_meters
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<PredictionResponse>()
            .await?;
        Ok(response)
    }
}
