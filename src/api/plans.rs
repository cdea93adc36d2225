//! Subscription plans and checkout

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{fail, ApiError};
use crate::gateway::{Gateway, RequestContext};
use crate::security::Sanitizer;

/// Billing period of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanInterval {
    Month,
    Year,
}

impl PlanInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanInterval::Month => "month",
            PlanInterval::Year => "year",
        }
    }
}

impl fmt::Display for PlanInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Stripe price identifier
    pub price_id: String,
    pub interval: PlanInterval,
    /// Price in cents
    pub amount: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn price(&self) -> String {
        format_price(self.amount, self.interval)
    }
}

/// Formats a price in cents, e.g. `999` monthly → `$9.99/month`
pub fn format_price(amount: u64, interval: PlanInterval) -> String {
    format!("${}.{:02}/{}", amount / 100, amount % 100, interval)
}

/// Hosted checkout page for a subscription
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutRequest<'a> {
    plan_id: u64,
    email: &'a str,
}

#[derive(Clone)]
pub struct PlansApi {
    gateway: Arc<Gateway>,
}

impl PlansApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
        let plans: Vec<Plan> = self
            .gateway
            .send_json(RequestContext::get("/plans"))
            .await
            .map_err(fail("Failed to load plans"))?;
        tracing::debug!("Loaded {} plans", plans.len());
        Ok(plans)
    }

    /// Opens a Stripe checkout session for `plan_id`
    pub async fn checkout(&self, plan_id: u64, email: &str) -> Result<CheckoutSession, ApiError> {
        let request = RequestContext::post("/stripe/checkout")
            .json(&CheckoutRequest { plan_id, email })
            .map_err(fail("Failed to start checkout process"))?;
        let session: CheckoutSession = self
            .gateway
            .send_json(request)
            .await
            .map_err(fail("Failed to start checkout process"))?;

        tracing::info!(
            "Checkout for plan {} created: {}",
            plan_id,
            Sanitizer::sanitize_url(&session.url)
        );
        Ok(session)
    }
}
