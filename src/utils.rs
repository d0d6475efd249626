//! Great-circle distance on a spherical Earth, plus the unit constants shared by the
//! parsing and metrics code.

/// Mean radius of the Earth in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Nautical miles per kilometre.
pub const KM_TO_NM: f64 = 0.539957;

/// Calculates the great-circle distance in kilometres between two `(lat, lon)` points
/// given in degrees, using the spherical law of cosines.
///
/// Floating-point error can push the cosine argument slightly outside `[-1, 1]`
/// for coincident or antipodal points, so it is clamped before `acos`.
///
/// # Examples
///
/// ```
/// use ibtracs::earth_distance_km;
///
/// let d = earth_distance_km((0.0, 0.0), (0.0, 1.0));
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn earth_distance_km(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let (lat1, lon1) = (p1.0.to_radians(), p1.1.to_radians());
    let (lat2, lon2) = (p2.0.to_radians(), p2.1.to_radians());
    let arg = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).abs().cos();
    EARTH_RADIUS_KM * arg.clamp(-1.0, 1.0).acos()
}

/// Elementwise [`earth_distance_km`] over two equally long slices of points.
///
/// Extra points in the longer slice are ignored.
pub fn earth_distances_km(from: &[(f64, f64)], to: &[(f64, f64)]) -> Vec<f64> {
    from.iter()
        .zip(to)
        .map(|(&p1, &p2)| earth_distance_km(p1, p2))
        .collect()
}
