//! Box math shared by model-based detection backends.

use crate::shared::bounding_box::BoundingBox;

/// A scored detection in continuous image coordinates, `[x1, y1, x2, y2]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredBox {
    pub bbox: [f64; 4],
    pub score: f64,
}

impl ScoredBox {
    /// Snaps to whole pixels and clips to a `width` × `height` image.
    ///
    /// Returns `None` when nothing of the box remains inside the image.
    pub fn to_pixel_box(&self, width: u32, height: u32) -> Option<BoundingBox> {
        let clip = |v: f64, max: u32| v.round().clamp(0.0, max as f64) as u32;
        let pixel = BoundingBox::new(
            clip(self.bbox[0], width),
            clip(self.bbox[1], height),
            clip(self.bbox[2], width),
            clip(self.bbox[3], height),
        );
        pixel.is_within(width, height).then_some(pixel)
    }
}

/// IoU between two bounding boxes represented as `[x1, y1, x2, y2]`.
pub fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }

    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

/// Greedy NMS: sort by score descending, suppress overlapping boxes.
///
/// The result stays in descending score order.
pub fn nms(mut dets: Vec<ScoredBox>, iou_thresh: f64) -> Vec<ScoredBox> {
    dets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<ScoredBox> = Vec::with_capacity(dets.len());
    for det in dets {
        if keep.iter().all(|k| bbox_iou(&k.bbox, &det.bbox) <= iou_thresh) {
            keep.push(det);
        }
    }
    keep
}
