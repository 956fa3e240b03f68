#![cfg(feature = "serde")]

use conekkt::cones::ConeDims;
use conekkt::kktsolvers::*;

#[test]
fn test_serde_cone_dims() {
    let dims = ConeDims::new(3, vec![2, 4], vec![3]).unwrap();
    let json = serde_json::to_string(&dims).unwrap();
    let dims2: ConeDims = serde_json::from_str(&json).unwrap();
    assert_eq!(dims, dims2);

    // deserialization validates the descriptor
    let bad = r#"{"l": 1, "q": [0], "s": []}"#;
    assert!(serde_json::from_str::<ConeDims>(bad).is_err());
}

#[test]
fn test_serde_settings() {
    let settings = DenseKKTSettingsBuilder::<f64>::default()
        .iterative_refinement_enable(true)
        .iterative_refinement_max_iter(3)
        .build()
        .unwrap();
    let json = serde_json::to_string(&settings).unwrap();
    let settings2: DenseKKTSettings<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(settings, settings2);

    // missing fields take their defaults
    let partial: DenseKKTSettings<f64> = serde_json::from_str(r#"{"check_finite": false}"#).unwrap();
    assert!(!partial.check_finite);
    assert_eq!(partial.iterative_refinement_max_iter, 10);
    assert!(partial.validate().is_ok());

}
