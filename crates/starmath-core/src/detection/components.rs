use ndarray::Array2;

use crate::geometry::{Point, Rect};

use super::config::ClusterConfig;

/// A connected group of foreground pixels: a star candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct StarBlob {
    pixels: Vec<Point<i32>>,
    bounds: Rect<i32>,
}

impl StarBlob {
    /// Blob from its member pixels. Returns `None` for an empty pixel list.
    pub fn from_pixels(pixels: Vec<Point<i32>>) -> Option<Self> {
        let first = *pixels.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in &pixels {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let bounds = Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
        Some(Self { pixels, bounds })
    }

    /// Member pixels in row-major order.
    pub fn pixels(&self) -> &[Point<i32>] {
        &self.pixels
    }

    /// Smallest rectangle containing every member pixel.
    pub fn bounds(&self) -> Rect<i32> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Group the foreground pixels of `mask` into blobs.
///
/// Two-pass labeling with union-find. Pixels within `cluster_radius` of each
/// other (Chebyshev distance) share a blob, so radius 1 is 8-connectivity.
/// Blobs are returned in the row-major order of their first pixel.
pub fn find_clusters(mask: &Array2<bool>, config: &ClusterConfig) -> Vec<StarBlob> {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }
    let radius = config.cluster_radius.max(1) as isize;

    let mut labels = Array2::<u32>::zeros((h, w));
    // Index 0 unused; labels start at 1.
    let mut parent: Vec<u32> = vec![0];

    // Pass 1: provisional labels from already visited neighbours.
    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }

            let mut label = 0u32;
            for dy in -radius..=0 {
                let r = row as isize + dy;
                if r < 0 {
                    continue;
                }
                let dx_end = if dy == 0 { -1 } else { radius };
                for dx in -radius..=dx_end {
                    let c = col as isize + dx;
                    if c < 0 || c >= w as isize {
                        continue;
                    }
                    let neighbour = labels[[r as usize, c as usize]];
                    if neighbour == 0 {
                        continue;
                    }
                    if label == 0 {
                        label = find(&parent, neighbour);
                    } else {
                        label = union(&mut parent, label, neighbour);
                    }
                }
            }

            if label == 0 {
                label = parent.len() as u32;
                parent.push(label);
            }
            labels[[row, col]] = label;
        }
    }

    // Pass 2: resolve labels. The root of a component is the label of its
    // first pixel, so first sight of a root follows row-major order.
    let mut slot_of_root: Vec<Option<usize>> = vec![None; parent.len()];
    let mut groups: Vec<Vec<Point<i32>>> = Vec::new();

    for row in 0..h {
        for col in 0..w {
            let lbl = labels[[row, col]];
            if lbl == 0 {
                continue;
            }
            let root = find(&parent, lbl) as usize;
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(Point::new(col as i32, row as i32));
        }
    }

    let total = groups.len();
    let blobs: Vec<StarBlob> = groups
        .into_iter()
        .filter_map(StarBlob::from_pixels)
        .filter(|blob| blob.len() >= config.min_pixels)
        .filter(|blob| match config.max_size {
            Some(max) => {
                let b = blob.bounds();
                b.width as usize <= max && b.height as usize <= max
            }
            None => true,
        })
        .collect();

    tracing::debug!(
        clusters = total,
        kept = blobs.len(),
        "Star clusters labelled"
    );
    blobs
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

/// Merge the sets of `a` and `b`, returning the surviving root.
fn union(parent: &mut [u32], a: u32, b: u32) -> u32 {
    let ra = find(parent, a);
    let rb = find(parent, b);
    // Larger root joins the smaller one so roots stay first-pixel labels.
    let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
    parent[big as usize] = small;
    small
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u_shape_merges_into_one_blob() {
        // Two arms meet only at the bottom row, after both got labels.
        let mut mask = Array2::from_elem((3, 3), false);
        for &(r, c) in &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2)] {
            mask[[r, c]] = true;
        }
        let config = ClusterConfig {
            min_pixels: 1,
            ..Default::default()
        };
        let blobs = find_clusters(&mask, &config);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].len(), 7);
        assert_eq!(blobs[0].bounds(), Rect::new(0, 0, 3, 3));
    }
}
