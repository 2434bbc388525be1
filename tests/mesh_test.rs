use approx::assert_relative_eq;
use party_scene::resources::mesh::{MeshData, Primitive};

fn y_range(mesh: &MeshData) -> (f32, f32) {
    mesh.vertices
        .iter()
        .map(|v| v.position[1])
        .fold((f32::MAX, f32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)))
}

#[test]
fn should_generate_valid_triangle_lists() {
    for primitive in Primitive::ALL {
        let mesh = primitive.generate();
        assert!(!mesh.indices.is_empty(), "{primitive:?} is empty");
        assert_eq!(mesh.indices.len() % 3, 0, "{primitive:?} is not a triangle list");
        assert!(
            mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()),
            "{primitive:?} indexes past its vertices"
        );
        for v in &mesh.vertices {
            let [x, y, z] = v.normal;
            assert_relative_eq!((x * x + y * y + z * z).sqrt(), 1.0, epsilon = 1e-4);
        }
    }
}

#[test]
fn should_build_plane_and_box_with_flat_faces() {
    let plane = Primitive::Plane.generate();
    assert_eq!((plane.vertices.len(), plane.triangle_count()), (4, 2));
    assert!(plane.vertices.iter().all(|v| v.position[1] == 0.0 && v.normal == [0.0, 1.0, 0.0]));

    let cube = Primitive::Box.generate();
    assert_eq!((cube.vertices.len(), cube.triangle_count()), (24, 12));
    assert!(
        cube.vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 0.5))
    );
}

#[test]
fn should_stand_round_shapes_on_the_origin() {
    for primitive in [Primitive::Cylinder, Primitive::Cone] {
        let (lo, hi) = y_range(&primitive.generate());
        assert_relative_eq!(lo, 0.0);
        assert_relative_eq!(hi, 1.0);
    }

    let (lo, hi) = y_range(&Primitive::Sphere.generate());
    assert_relative_eq!(lo, -1.0, epsilon = 1e-5);
    assert_relative_eq!(hi, 1.0, epsilon = 1e-5);
}

#[test]
fn should_centre_pyramid_vertically() {
    let pyramid = Primitive::Pyramid4.generate();
    assert_eq!((pyramid.vertices.len(), pyramid.triangle_count()), (16, 6));
    assert_eq!(y_range(&pyramid), (-0.5, 0.5));

    // side normals point outwards and up
    for v in pyramid.vertices.iter().take(12) {
        assert!(v.normal[1] > 0.0);
    }
}
