use serde::Serialize;
use std::fmt;

/// Number of fine-grained classes the model emits.
pub const NUM_CLASSES: usize = 10;

/// Model output index -> fine class, in training order. The order is part
/// of the model contract and must not change.
pub const FINE_CLASSES: [&str; NUM_CLASSES] = [
    "glass_bottle",            // 0
    "glass_cup",               // 1
    "metal_can",               // 2
    "paper_bag",               // 3
    "paper_ball",              // 4
    "paper_milk_package",      // 5
    "paper_package",           // 6
    "plastic_bottle",          // 7
    "plastic_cup",             // 8
    "plastic_transparent_cup", // 9
];

/// User-facing material group. Localized display strings are the UI's
/// concern; `label` is the canonical vocabulary.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Glass,
    Metal,
    Paper,
    Plastic,
    Undefined,
}

impl Material {
    pub fn label(&self) -> &'static str {
        match self {
            Material::Glass => "Glass",
            Material::Metal => "Metal",
            Material::Paper => "Paper",
            Material::Plastic => "Plastic",
            Material::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Map a model output index to its material group. Out-of-range indices
/// fall through to `Undefined`.
pub fn material_for_class(index: usize) -> Material {
    match FINE_CLASSES.get(index).copied() {
        Some("glass_bottle") | Some("glass_cup") => Material::Glass,
        Some("metal_can") => Material::Metal,
        Some("paper_bag") | Some("paper_ball") | Some("paper_milk_package")
        | Some("paper_package") => Material::Paper,
        Some("plastic_bottle") | Some("plastic_cup") | Some("plastic_transparent_cup") => {
            Material::Plastic
        }
        _ => Material::Undefined,
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ModelStatus {
    pub ready: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_exhaustive_over_model_outputs() {
        let expected = [
            Material::Glass,
            Material::Glass,
            Material::Metal,
            Material::Paper,
            Material::Paper,
            Material::Paper,
            Material::Paper,
            Material::Plastic,
            Material::Plastic,
            Material::Plastic,
        ];
        for (idx, material) in expected.iter().enumerate() {
            assert_eq!(material_for_class(idx), *material, "class index {}", idx);
        }
    }

    #[test]
    fn out_of_range_index_is_undefined() {
        assert_eq!(material_for_class(NUM_CLASSES), Material::Undefined);
        assert_eq!(material_for_class(usize::MAX), Material::Undefined);
    }

    #[test]
    fn labels_match_fixed_vocabulary() {
        assert_eq!(Material::Glass.label(), "Glass");
        assert_eq!(Material::Metal.label(), "Metal");
        assert_eq!(Material::Paper.label(), "Paper");
        assert_eq!(Material::Plastic.label(), "Plastic");
        assert_eq!(Material::Undefined.label(), "Undefined");
    }

    #[test]
    fn mapping_is_stable_across_calls() {
        for idx in 0..NUM_CLASSES {
            assert_eq!(material_for_class(idx), material_for_class(idx));
        }
    }
}
