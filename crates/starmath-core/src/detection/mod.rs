pub mod centroid;
pub mod components;
pub mod config;
pub mod fwhm;
pub mod hfd;
pub mod stars;
pub mod threshold;

pub use centroid::Centroider;
pub use components::{find_clusters, StarBlob};
pub use config::{
    CentroidConfig, CentroidMethod, ClusterConfig, DegeneratePolicy, DetectionConfig,
    FwhmConfig, FwhmMethod, HfdConfig, ThresholdMethod,
};
pub use fwhm::{fwhm, FwhmMeasurement};
pub use hfd::{hfd, max_hfd_limit};
pub use stars::{detect, detect_stars, measure_star, Star, StarField};
pub use threshold::{Mask, Thresholder};
