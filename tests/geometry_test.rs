use std::collections::HashSet;

use map_app::data_structures::geometry::Geometry;

#[test]
fn should_generate_sphere_layout() {
    let sphere = Geometry::sphere(1.0, 20, 20);
    assert_eq!(sphere.vertices.len(), 21 * 21);
    assert_eq!(sphere.triangle_count(), 20 * (2 * 20 - 2));
    assert_eq!(sphere.indices.len(), 2280);
    assert!(sphere.indices.iter().all(|i| (*i as usize) < sphere.vertices.len()));
}

#[test]
fn should_place_vertices_on_the_surface() {
    let radius = 2.5;
    let sphere = Geometry::sphere(radius, 12, 8);
    for vertex in &sphere.vertices {
        let [x, y, z] = vertex.position;
        let length = (x * x + y * y + z * z).sqrt();
        assert!((length - radius).abs() < 1e-4, "vertex off the surface: {:?}", vertex.position);

        let [nx, ny, nz] = vertex.normal;
        assert!(((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() < 1e-4);
    }
    // First row is the north pole.
    assert!((sphere.vertices[0].position[1] - radius).abs() < 1e-4);
    assert!((sphere.vertices.last().expect("vertices").position[1] + radius).abs() < 1e-4);
}

#[test]
fn should_generate_plane_quad() {
    let plane = Geometry::plane(2.0, 2.0);
    assert_eq!(plane.vertices.len(), 4);
    assert_eq!(plane.indices, vec![0, 2, 1, 2, 3, 1]);
    for vertex in &plane.vertices {
        assert_eq!(vertex.position[0].abs(), 1.0);
        assert_eq!(vertex.position[1].abs(), 1.0);
        assert_eq!(vertex.position[2], 0.0);
    }
}

#[test]
fn should_emit_each_edge_once() {
    let plane = Geometry::plane(1.0, 1.0);
    let lines = plane.wireframe_indices();
    // Four sides plus the shared diagonal.
    assert_eq!(lines.len(), 10);

    let sphere = Geometry::sphere(1.0, 20, 20);
    let lines = sphere.wireframe_indices();
    assert_eq!(lines.len() % 2, 0);

    let edges: Vec<(u32, u32)> = lines.chunks_exact(2).map(|e| (e[0], e[1])).collect();
    let unique: HashSet<_> = edges.iter().copied().collect();
    assert_eq!(unique.len(), edges.len());
    assert_eq!(edges.len(), 1198);
    assert!(edges.iter().all(|(u, v)| u < v));
}

#[test]
fn should_cover_every_triangle_edge() {
    let sphere = Geometry::sphere(1.0, 6, 4);
    let lines = sphere.wireframe_indices();
    let edges: HashSet<(u32, u32)> = lines.chunks_exact(2).map(|e| (e[0], e[1])).collect();

    for tri in sphere.indices.chunks_exact(3) {
        for (u, v) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            assert!(edges.contains(&(u.min(v), u.max(v))));
        }
    }
}
