// src/utils/geometry.rs

type Point3 = [f64; 3];

/// Calculates distance between two points (Angstroms)
pub fn calculate_distance(p1: Point3, p2: Point3) -> f64 {
    len(sub(p1, p2))
}

/// True if `p` lies inside (or on) the sphere of `radius` around `center`
pub fn within_sphere(center: Point3, p: Point3, radius: f64) -> bool {
    let d = sub(p, center);
    dot(d, d) <= radius * radius
}

// --- Internal Math Helpers for [f64; 3] ---

fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn len(a: Point3) -> f64 {
    dot(a, a).sqrt()
}
