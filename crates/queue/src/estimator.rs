//! Price estimation front-end: remote quotes with a local fallback.
//!
//! Estimation must never block or fail a submission. Each selected
//! model is quoted independently; a failed or timed-out quote falls
//! back to the local approximation for that model only. The margin and
//! conversion math itself lives in `polymuse_core::pricing` so both
//! paths share it.

use std::collections::HashMap;

use polymuse_client::RemoteApi;
use polymuse_core::generation::GenerationKind;
use polymuse_core::model::ModelInfo;
use polymuse_core::pricing::{self, PricingConfig};

/// Option key the requested quantity is folded into for image quotes.
pub const NUM_IMAGES_OPTION: &str = "num_images";

/// Build the option set sent to the quote endpoint for one model.
///
/// For image kinds the requested quantity is folded in as
/// [`NUM_IMAGES_OPTION`]; video and chat quotes never carry a quantity.
pub fn quote_options(
    model: &ModelInfo,
    options: &HashMap<String, serde_json::Value>,
    quantity: u32,
) -> HashMap<String, serde_json::Value> {
    let mut out = options.clone();
    if model.kind == GenerationKind::Image {
        out.insert(
            NUM_IMAGES_OPTION.to_string(),
            serde_json::json!(quantity.max(1)),
        );
    }
    out
}

/// Estimate the credit cost of submitting `options`/`quantity` to every
/// model in `models`, summed across models.
///
/// Primary path: one remote quote per model, converted through the
/// margin formula. Fallback path (per model, on quote failure):
/// `base_unit_cost × quantity_multiplier` through the same formula.
/// Always returns a non-negative number; never errors.
pub async fn estimate(
    remote: &dyn RemoteApi,
    models: &[ModelInfo],
    options: &HashMap<String, serde_json::Value>,
    quantity: u32,
    config: &PricingConfig,
) -> f64 {
    let mut total = 0.0;

    for model in models {
        let opts = quote_options(model, options, quantity);
        let credits = match remote.quote(&model.id, &opts).await {
            Ok(q) => pricing::credits_from_base_usd(q.price, model.kind, config),
            Err(e) => {
                tracing::debug!(
                    model_id = %model.id,
                    error = %e,
                    "Quote failed, using local estimate",
                );
                pricing::local_estimate(model, quantity, config)
            }
        };
        total += credits;
    }

    total.max(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRemote;

    fn model(id: &str, kind: GenerationKind, base: f64) -> ModelInfo {
        ModelInfo {
            id: id.into(),
            display_name: format!("Model {id}"),
            kind,
            base_unit_cost: base,
            credit_cost: 0.0,
            requires_reference_image: false,
            option_multipliers: Default::default(),
        }
    }

    fn config() -> PricingConfig {
        PricingConfig {
            universal_margin_percent: 20.0,
            credits_per_usd: 0.01,
            ..Default::default()
        }
    }

    #[test]
    fn quote_options_folds_quantity_for_image() {
        let m = model("m1", GenerationKind::Image, 0.05);
        let opts = quote_options(&m, &HashMap::new(), 3);
        assert_eq!(opts[NUM_IMAGES_OPTION], serde_json::json!(3));
    }

    #[test]
    fn quote_options_omits_quantity_for_video_and_chat() {
        for kind in [GenerationKind::Video, GenerationKind::Chat] {
            let m = model("m1", kind, 0.05);
            let opts = quote_options(&m, &HashMap::new(), 3);
            assert!(!opts.contains_key(NUM_IMAGES_OPTION));
        }
    }

    #[tokio::test]
    async fn sums_quotes_across_models() {
        let remote = FakeRemote::new().with_quote_price(0.10);
        let models = vec![
            model("m1", GenerationKind::Image, 0.05),
            model("m2", GenerationKind::Video, 0.50),
        ];
        // Each quote: 0.10 × 1.20 / 0.01 = 12 credits.
        let total = estimate(&remote, &models, &HashMap::new(), 1, &config()).await;
        assert!((total - 24.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn quote_failure_falls_back_to_local_estimate() {
        let remote = FakeRemote::new().with_quote_failure();
        let models = vec![model("m1", GenerationKind::Image, 0.05)];
        // Local: 0.05 × 1 × 1.20 / 0.01 = 6 credits.
        let total = estimate(&remote, &models, &HashMap::new(), 1, &config()).await;
        assert!((total - 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn fallback_quantity_applies_only_to_image() {
        let remote = FakeRemote::new().with_quote_failure();
        let cfg = config();

        let image = vec![model("m1", GenerationKind::Image, 0.05)];
        let one = estimate(&remote, &image, &HashMap::new(), 1, &cfg).await;
        let four = estimate(&remote, &image, &HashMap::new(), 4, &cfg).await;
        assert!((four - one * 4.0).abs() < 1e-9);

        let video = vec![model("m2", GenerationKind::Video, 0.50)];
        let v1 = estimate(&remote, &video, &HashMap::new(), 1, &cfg).await;
        let v4 = estimate(&remote, &video, &HashMap::new(), 4, &cfg).await;
        assert!((v1 - v4).abs() < 1e-9);
    }
}
