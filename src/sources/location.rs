use serde_json::Value;

use crate::request::TargetingParams;
use crate::utils::constants::{PARAM_LATITUDE, PARAM_LIMIT, PARAM_LONGITUDE, PARAM_PAGE, PARAM_RADIUS};

/// Geo lookup with optional radius and pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<f64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl LocationQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius: None,
            limit: None,
            page: None,
        }
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Remap onto data source params, after any targeting params already present.
    pub fn apply(&self, params: &mut TargetingParams) {
        params.insert(PARAM_LATITUDE.to_owned(), Value::from(self.latitude));
        params.insert(PARAM_LONGITUDE.to_owned(), Value::from(self.longitude));
        if let Some(radius) = self.radius {
            params.insert(PARAM_RADIUS.to_owned(), Value::from(radius));
        }
        if let Some(limit) = self.limit {
            params.insert(PARAM_LIMIT.to_owned(), Value::from(limit));
        }
        if let Some(page) = self.page {
            params.insert(PARAM_PAGE.to_owned(), Value::from(page));
        }
    }
}
