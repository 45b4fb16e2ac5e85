//! Square-crop image datasets: resize to a target short side, crop to a
//! square around the image center or a detected face, and write the results
//! with their label files into a fresh output folder.

pub mod dataset;
pub mod detection;
pub mod imaging;
pub mod pipeline;
pub mod shared;
