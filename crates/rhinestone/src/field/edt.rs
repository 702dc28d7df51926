//! Exact Euclidean distance transform over feature rasters.
//!
//! Based on the Felzenszwalb-Huttenlocher algorithm: the squared distance is separable, so
//! one lower-envelope-of-parabolas pass over every row followed by one over every column
//! gives exact distances in linear time.
use image::GrayImage;

/// Distance from every pixel to the nearest feature pixel (any non-zero value).
///
/// The result is row-major with the raster's dimensions. Without any feature pixel every
/// entry holds the raster diagonal, which is larger than any in-raster distance.
pub fn distance_to_features(features: &GrayImage) -> Vec<f32> {
    let (w, h) = (features.width() as usize, features.height() as usize);
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let far = (w * w + h * h) as f64;
    let mut sq: Vec<f64> = features
        .as_raw()
        .iter()
        .map(|&v| if v != 0 { 0.0 } else { far })
        .collect();

    let mut scratch = Envelope::with_capacity(w.max(h));

    let mut row_out = vec![0.0; w];
    for y in 0..h {
        let row = &mut sq[y * w..(y + 1) * w];
        scratch.transform(row, &mut row_out);
        row.copy_from_slice(&row_out);
    }

    let mut col_in = vec![0.0; h];
    let mut col_out = vec![0.0; h];
    for x in 0..w {
        for y in 0..h {
            col_in[y] = sq[y * w + x];
        }
        scratch.transform(&col_in, &mut col_out);
        for y in 0..h {
            sq[y * w + x] = col_out[y];
        }
    }

    sq.into_iter().map(|d| (d.min(far)).sqrt() as f32).collect()
}

/// Reusable buffers for the 1D lower-envelope pass.
struct Envelope {
    /// Sites of the parabolas forming the envelope.
    sites: Vec<usize>,
    /// Boundaries between consecutive envelope parabolas.
    bounds: Vec<f64>,
}

impl Envelope {
    fn with_capacity(n: usize) -> Self {
        Self {
            sites: vec![0; n],
            bounds: vec![0.0; n + 1],
        }
    }

    /// Squared 1D distance transform of the sampled function `f` into `out`.
    fn transform(&mut self, f: &[f64], out: &mut [f64]) {
        let n = f.len();
        debug_assert_eq!(n, out.len(), "input and output must have same length");
        if n == 0 {
            return;
        }

        let v = &mut self.sites;
        let z = &mut self.bounds;
        let mut k = 0usize;
        v[0] = 0;
        z[0] = f64::NEG_INFINITY;
        z[1] = f64::INFINITY;

        for q in 1..n {
            let mut s = intersection(f, q, v[k]);
            while s <= z[k] {
                // z[0] is -inf, so this never underflows.
                k -= 1;
                s = intersection(f, q, v[k]);
            }
            k += 1;
            v[k] = q;
            z[k] = s;
            z[k + 1] = f64::INFINITY;
        }

        k = 0;
        for (q, dq) in out.iter_mut().enumerate() {
            while z[k + 1] < q as f64 {
                k += 1;
            }
            let dx = q as f64 - v[k] as f64;
            *dq = dx * dx + f[v[k]];
        }
    }
}

/// Horizontal position where the parabolas rooted at `q` and `p` intersect (`q > p`).
#[inline]
fn intersection(f: &[f64], q: usize, p: usize) -> f64 {
    let (qf, pf) = (q as f64, p as f64);
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(w: u32, h: u32, features: &[(u32, u32)]) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for &(x, y) in features {
            img.put_pixel(x, y, image::Luma([255]));
        }
        img
    }

    #[test]
    fn envelope_computes_squared_distance_to_nearest_site() {
        let mut env = Envelope::with_capacity(4);
        let f = vec![0.0, 1000.0, 1000.0, 0.0];
        let mut out = vec![0.0; 4];
        env.transform(&f, &mut out);
        assert_eq!(out, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn single_row_distances() {
        let result = distance_to_features(&raster(3, 1, &[(0, 0)]));
        assert_eq!(result, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn distances_around_center_feature() {
        let result = distance_to_features(&raster(5, 5, &[(2, 2)]));

        assert_eq!(result[12], 0.0);
        for idx in [7, 11, 13, 17] {
            assert!((result[idx] - 1.0).abs() < 1e-5);
        }
        let sqrt2 = 2.0_f32.sqrt();
        for idx in [6, 8, 16, 18] {
            assert!((result[idx] - sqrt2).abs() < 1e-5);
        }
        assert!((result[0] - 8.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn all_features_gives_zero_everywhere() {
        let mut img = GrayImage::new(2, 2);
        img.pixels_mut().for_each(|p| p.0[0] = 1);
        assert_eq!(distance_to_features(&img), vec![0.0; 4]);
    }

    #[test]
    fn no_features_saturates_at_diagonal() {
        let result = distance_to_features(&GrayImage::new(3, 4));
        assert_eq!(result.len(), 12);
        for v in result {
            assert!((v - 5.0).abs() < 1e-5);
        }
    }

    #[test]
    fn empty_raster_yields_nothing() {
        assert!(distance_to_features(&GrayImage::new(0, 3)).is_empty());
    }
}
