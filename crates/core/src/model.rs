//! Model catalog types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::generation::GenerationKind;
use crate::types::ModelId;

/// One entry in the platform's model catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: ModelId,
    pub display_name: String,
    pub kind: GenerationKind,
    /// Provider's raw cost per unit, in USD, before margin.
    pub base_unit_cost: f64,
    /// Catalog-advertised credit price, for display only.
    pub credit_cost: f64,
    /// Whether submissions to this model must carry at least one
    /// reference image.
    #[serde(default)]
    pub requires_reference_image: bool,
    /// Per-option price multipliers (e.g. resolution tiers).
    #[serde(default)]
    pub option_multipliers: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "id": "m1",
            "display_name": "Model One",
            "kind": "image",
            "base_unit_cost": 0.04,
            "credit_cost": 5.0
        }"#;
        let model: ModelInfo = serde_json::from_str(json).unwrap();
        assert!(!model.requires_reference_image);
        assert!(model.option_multipliers.is_empty());
        assert_eq!(model.kind, GenerationKind::Image);
    }
}
