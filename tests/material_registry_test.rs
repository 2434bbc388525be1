use cgmath::Vector3;
use party_scene::resources::material::{MaterialError, MaterialRegistry};

#[test]
fn should_look_up_defined_materials() {
    let mut materials = MaterialRegistry::new();
    materials
        .define("Wood", [0.4, 0.25, 0.1], [0.05, 0.05, 0.05], 4.0)
        .unwrap();
    materials
        .define("Ceramic", [0.9, 0.9, 0.95], [0.9, 0.9, 0.9], 48.0)
        .unwrap();

    let wood = materials.lookup("Wood").unwrap();
    assert_eq!(wood.diffuse_color, Vector3::new(0.4, 0.25, 0.1));
    assert_eq!(wood.specular_color, Vector3::new(0.05, 0.05, 0.05));
    assert_eq!(wood.shininess, 4.0);
    assert_eq!(materials.lookup("Ceramic").unwrap().shininess, 48.0);
    assert_eq!(materials.len(), 2);
}

#[test]
fn should_miss_on_empty_and_unknown() {
    let mut materials = MaterialRegistry::new();
    assert!(materials.lookup("Wood").is_none());

    materials.define("Candle", [1.0, 0.85, 0.5], [0.2, 0.2, 0.2], 4.0).unwrap();
    assert!(materials.lookup("Wood").is_none());
}

#[test]
fn should_reject_duplicate_tag_and_keep_first() {
    let mut materials = MaterialRegistry::new();
    materials.define("Cake", [0.95, 0.8, 0.7], [0.2, 0.15, 0.1], 8.0).unwrap();

    let again = materials.define("Cake", [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);

    assert_eq!(again, Err(MaterialError::DuplicateTag("Cake".to_string())));
    assert_eq!(materials.len(), 1);
    assert_eq!(materials.lookup("Cake").unwrap().shininess, 8.0);
}

#[test]
fn should_reject_non_positive_shininess() {
    let mut materials = MaterialRegistry::new();
    for shininess in [0.0, -2.0, f32::NAN, f32::INFINITY] {
        let result = materials.define("Bad", [1.0; 3], [1.0; 3], shininess);
        assert!(
            matches!(result, Err(MaterialError::InvalidShininess { .. })),
            "shininess {shininess} was accepted"
        );
    }
    assert!(materials.is_empty());
}
