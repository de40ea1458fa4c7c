//! Pricing configuration and pure cost-estimation math.
//!
//! Both the remote quote path and the local fallback path funnel a
//! base USD cost through [`credits_from_base_usd`], so the two paths
//! differ only in where the base cost comes from.

use serde::{Deserialize, Serialize};

use crate::generation::GenerationKind;
use crate::model::ModelInfo;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Margin applied when neither a category margin nor the universal
/// margin is configured.
pub const DEFAULT_MARGIN_PERCENT: f64 = 0.0;

/// Conversion rate used when the pricing config is missing or reports
/// a non-positive rate.
pub const DEFAULT_CREDITS_PER_USD: f64 = 100.0;

// ---------------------------------------------------------------------------
// PricingConfig
// ---------------------------------------------------------------------------

/// Platform pricing configuration.
///
/// Read-mostly: fetched wholesale from the public pricing endpoint on
/// mount and refreshed on demand. Staleness is acceptable; the server
/// reconciles the authoritative charge at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Fallback margin applied to every category without its own margin.
    pub universal_margin_percent: f64,
    pub image_margin_percent: Option<f64>,
    pub video_margin_percent: Option<f64>,
    pub chat_margin_percent: Option<f64>,
    /// How many user-facing credits one USD buys.
    pub credits_per_usd: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            universal_margin_percent: DEFAULT_MARGIN_PERCENT,
            image_margin_percent: None,
            video_margin_percent: None,
            chat_margin_percent: None,
            credits_per_usd: DEFAULT_CREDITS_PER_USD,
        }
    }
}

impl PricingConfig {
    /// Select the margin percentage for a generation kind.
    ///
    /// The category margin wins only when it is configured *and*
    /// non-zero; both `None` and `Some(0.0)` fall through to the
    /// universal margin. A zero category margin is indistinguishable
    /// from "unset" on the wire, so this quirk is preserved for
    /// compatibility with the server's charge computation.
    pub fn margin_for(&self, kind: GenerationKind) -> f64 {
        let category = match kind {
            GenerationKind::Image => self.image_margin_percent,
            GenerationKind::Video => self.video_margin_percent,
            GenerationKind::Chat => self.chat_margin_percent,
        };
        match category {
            Some(m) if m != 0.0 => m,
            _ => self.universal_margin_percent,
        }
    }

    /// Effective credits-per-USD rate, guarding against a missing or
    /// non-positive configured rate.
    pub fn effective_rate(&self) -> f64 {
        if self.credits_per_usd > 0.0 {
            self.credits_per_usd
        } else {
            DEFAULT_CREDITS_PER_USD
        }
    }
}

// ---------------------------------------------------------------------------
// Estimation math
// ---------------------------------------------------------------------------

/// Convert a base USD cost into user-facing credits:
/// `base_usd × (1 + margin/100) / credits_per_usd`.
///
/// Never returns a negative value.
pub fn credits_from_base_usd(base_usd: f64, kind: GenerationKind, config: &PricingConfig) -> f64 {
    let margin = config.margin_for(kind);
    let credits = base_usd * (1.0 + margin / 100.0) / config.effective_rate();
    credits.max(0.0)
}

/// Quantity multiplier for an estimate.
///
/// Only image generations scale with the requested quantity; video and
/// chat are always a single unit regardless of `quantity`.
pub fn quantity_multiplier(kind: GenerationKind, quantity: u32) -> u32 {
    match kind {
        GenerationKind::Image => quantity.max(1),
        GenerationKind::Video | GenerationKind::Chat => 1,
    }
}

/// Local fallback estimate for one model, used when the remote quote
/// call fails or times out.
///
/// `model.base_unit_cost × quantity_multiplier`, then the same
/// margin/conversion formula as the quote path.
pub fn local_estimate(model: &ModelInfo, quantity: u32, config: &PricingConfig) -> f64 {
    let base_usd = model.base_unit_cost * quantity_multiplier(model.kind, quantity) as f64;
    credits_from_base_usd(base_usd, model.kind, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
