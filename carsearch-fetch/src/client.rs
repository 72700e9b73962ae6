//! vPIC catalog HTTP client.

use async_trait::async_trait;
use carsearch_core::{sort_makes, CatalogRow, VehicleMake, VehicleType};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::catalog::CatalogApi;
use crate::error::FetchError;
use crate::settings::CatalogSettings;
use crate::wire::{self, MakeRow, ModelRow, VehicleTypeRow};

/// User agent string for CarSearch.
const USER_AGENT: &str = concat!("CarSearch/", env!("CARGO_PKG_VERSION"));

/// The catalog variable whose values are the vehicle types.
const VEHICLE_TYPE_VARIABLE: &str = "vehicle type";

// ============================================================================
// Catalog Client
// ============================================================================

/// HTTP client for the vPIC vehicle catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client for the public vPIC service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(&CatalogSettings::default())
    }

    /// Creates a client from settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL cannot carry path
    /// segments, or [`FetchError::Http`] if the HTTP client cannot be built.
    pub fn with_settings(settings: &CatalogSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let inner = Client::builder()
            .timeout(settings.timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner, base_url })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL from percent-encoded path segments.
    fn endpoint<I>(&self, segments: I) -> Result<Url, FetchError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("format", "json");
        Ok(url)
    }

    /// URL listing all vehicle types.
    pub fn vehicle_types_url(&self) -> Result<Url, FetchError> {
        self.endpoint(["getvehiclevariablevalueslist", VEHICLE_TYPE_VARIABLE])
    }

    /// URL listing makes for a vehicle type.
    pub fn makes_url(&self, vehicle_type: &VehicleType) -> Result<Url, FetchError> {
        self.endpoint(["GetMakesForVehicleType", vehicle_type.name.trim()])
    }

    /// URL listing models for a make of a vehicle type, optionally one year.
    pub fn models_url(
        &self,
        vehicle_type: &VehicleType,
        make: &VehicleMake,
        year: Option<i32>,
    ) -> Result<Url, FetchError> {
        let mut segments = vec![
            "GetModelsForMakeIdYear".to_string(),
            "makeId".to_string(),
            make.id.to_string(),
        ];
        if let Some(year) = year {
            segments.push("modelyear".to_string());
            segments.push(year.to_string());
        }
        segments.push("vehicleType".to_string());
        segments.push(vehicle_type.name.trim().to_string());

        self.endpoint(segments)
    }

    /// Performs a GET and converts the `Results` rows.
    async fn get_results<R, T>(&self, url: Url) -> Result<Vec<T>, FetchError>
    where
        R: DeserializeOwned,
        T: From<R>,
    {
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Response received");
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        let body = response.text().await?;
        wire::parse_results::<R, T>(&body)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn list_vehicle_types(&self) -> Result<Vec<VehicleType>, FetchError> {
        let url = self.vehicle_types_url()?;
        let types = self.get_results::<VehicleTypeRow, VehicleType>(url).await?;
        debug!(count = types.len(), "Vehicle types loaded");
        Ok(types)
    }

    #[instrument(skip(self), fields(vehicle_type = %vehicle_type))]
    async fn list_makes(
        &self,
        vehicle_type: &VehicleType,
    ) -> Result<Vec<VehicleMake>, FetchError> {
        let url = self.makes_url(vehicle_type)?;
        let mut makes = self.get_results::<MakeRow, VehicleMake>(url).await?;
        sort_makes(&mut makes);
        debug!(count = makes.len(), "Makes loaded");
        Ok(makes)
    }

    #[instrument(skip(self), fields(vehicle_type = %vehicle_type, make = %make))]
    async fn list_models(
        &self,
        vehicle_type: &VehicleType,
        make: &VehicleMake,
        year: Option<i32>,
    ) -> Result<Vec<CatalogRow>, FetchError> {
        let url = self.models_url(vehicle_type, make, year)?;
        let rows = self.get_results::<ModelRow, CatalogRow>(url).await?;
        debug!(count = rows.len(), "Models loaded");
        Ok(rows)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CatalogClient {
        CatalogClient::with_settings(&CatalogSettings::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_vehicle_types_url_encodes_space() {
        let client = CatalogClient::new().unwrap();
        assert_eq!(
            client.vehicle_types_url().unwrap().as_str(),
            "https://vpic.nhtsa.dot.gov/api/vehicles/getvehiclevariablevalueslist/vehicle%20type?format=json"
        );
    }

    #[test]
    fn test_makes_url_trims_and_encodes_type() {
        let client = CatalogClient::new().unwrap();
        let vt = VehicleType {
            name: "Passenger Car ".to_string(),
        };
        assert_eq!(
            client.makes_url(&vt).unwrap().as_str(),
            "https://vpic.nhtsa.dot.gov/api/vehicles/GetMakesForVehicleType/Passenger%20Car?format=json"
        );
    }

    #[test]
    fn test_models_url_with_and_without_year() {
        let client = client("http://localhost:8080/api/vehicles/");
        let vt = VehicleType::new("Car");
        let make = VehicleMake::new(440, "ASTON MARTIN");

        assert_eq!(
            client.models_url(&vt, &make, None).unwrap().as_str(),
            "http://localhost:8080/api/vehicles/GetModelsForMakeIdYear/makeId/440/vehicleType/Car?format=json"
        );
        assert_eq!(
            client.models_url(&vt, &make, Some(2015)).unwrap().as_str(),
            "http://localhost:8080/api/vehicles/GetModelsForMakeIdYear/makeId/440/modelyear/2015/vehicleType/Car?format=json"
        );
    }

    #[test]
    fn test_slash_in_type_stays_one_segment() {
        let client = client("http://localhost:8080");
        let vt = VehicleType::new("Bus/Coach");
        assert_eq!(
            client.makes_url(&vt).unwrap().as_str(),
            "http://localhost:8080/GetMakesForVehicleType/Bus%2FCoach?format=json"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let settings = CatalogSettings::default().with_base_url("mailto:catalog@example.com");
        let err = CatalogClient::with_settings(&settings).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert!(!err.is_retryable());
    }
}
