mod common;

use starmath_core::detection::{find_clusters, ClusterConfig};
use starmath_core::geometry::{Point, Rect};

use common::mask_from;

fn any_size() -> ClusterConfig {
    ClusterConfig {
        min_pixels: 1,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Labeling
// ---------------------------------------------------------------------------

#[test]
fn test_empty_mask_yields_no_blobs() {
    let mask = mask_from(&["....", "....", "...."]);
    assert!(find_clusters(&mask, &any_size()).is_empty());
}

#[test]
fn test_zero_sized_mask_yields_no_blobs() {
    let mask = mask_from(&[]);
    assert!(find_clusters(&mask, &any_size()).is_empty());
}

#[test]
fn test_two_separate_blobs_in_scan_order() {
    let mask = mask_from(&[
        "........",
        "......#.",
        "..##..##",
        "..##....",
    ]);
    let blobs = find_clusters(&mask, &any_size());
    assert_eq!(blobs.len(), 2);

    // The right blob starts on an earlier row, so it comes first.
    assert_eq!(blobs[0].bounds(), Rect::new(6, 1, 2, 2));
    assert_eq!(blobs[0].len(), 3);
    assert_eq!(blobs[1].bounds(), Rect::new(2, 2, 2, 2));
    assert_eq!(
        blobs[1].pixels(),
        &[
            Point::new(2, 2),
            Point::new(3, 2),
            Point::new(2, 3),
            Point::new(3, 3)
        ]
    );
}

#[test]
fn test_diagonal_neighbours_join() {
    let mask = mask_from(&["#...", ".#..", "..#.", "...#"]);
    let blobs = find_clusters(&mask, &any_size());
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].len(), 4);
}

#[test]
fn test_anti_diagonal_neighbours_join() {
    let mask = mask_from(&["...#", "..#.", ".#..", "#..."]);
    assert_eq!(find_clusters(&mask, &any_size()).len(), 1);
}

#[test]
fn test_cluster_radius_bridges_gaps() {
    let mask = mask_from(&["#.#...#"]);
    assert_eq!(find_clusters(&mask, &any_size()).len(), 3);

    let config = ClusterConfig {
        cluster_radius: 2,
        ..any_size()
    };
    let blobs = find_clusters(&mask, &config);
    assert_eq!(blobs.len(), 2);
    assert_eq!(blobs[0].len(), 2);
}

#[test]
fn test_every_pixel_assigned_once() {
    let mask = mask_from(&[
        "##..#..#",
        "#..##.##",
        "..#.....",
        ".###..#.",
        "#...##.#",
    ]);
    let blobs = find_clusters(&mask, &any_size());
    let total: usize = blobs.iter().map(|b| b.len()).sum();
    assert_eq!(total, mask.iter().filter(|&&m| m).count());

    let mut seen = std::collections::HashSet::new();
    for blob in &blobs {
        for p in blob.pixels() {
            assert!(seen.insert((p.x, p.y)), "pixel {p:?} in two blobs");
            assert!(blob.bounds().contains_point(p));
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn test_min_pixels_drops_speckles() {
    let mask = mask_from(&["#....", "...##", "...##"]);
    let config = ClusterConfig {
        min_pixels: 2,
        ..Default::default()
    };
    let blobs = find_clusters(&mask, &config);
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].len(), 4);
}

#[test]
fn test_max_size_drops_extended_blobs() {
    let mask = mask_from(&["######.", ".......", "....##."]);
    let config = ClusterConfig {
        max_size: Some(3),
        ..any_size()
    };
    let blobs = find_clusters(&mask, &config);
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].bounds(), Rect::new(4, 2, 2, 1));
}

#[test]
fn test_bounds_within_image() {
    let mask = mask_from(&["#..#", "....", "#..#"]);
    let image_bounds = Rect::new(0, 0, 4, 3);
    for blob in find_clusters(&mask, &any_size()) {
        assert!(image_bounds.contains(&blob.bounds()));
    }
}
