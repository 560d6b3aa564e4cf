use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::annotations::detection::RawDetection;

/// Reads a file with one class name per line into a vector so that the
/// number ids which come out of the inference session can be given meaning.
pub fn read_classes_txt_file(filepath: &Path) -> io::Result<Vec<String>> {
    BufReader::new(File::open(filepath)?).lines().collect()
}

/// Non maximum suppression removes duplicate detections of one object.
///
/// Tiling makes duplicates routine rather than incidental: an object lying in
/// the overlap band between two tiles is detected once per tile. Suppression
/// is greedy and class-blind, so whichever detection scored highest survives
/// no matter which tile or class it came from. A detection suppressed by a
/// stronger one takes no further part, it cannot knock out anything itself.
pub fn non_maximum_suppression(
    mut detections: Vec<RawDetection>,
    iou_threshold: f32,
) -> Vec<RawDetection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut detections_to_remove: Vec<bool> = vec![false; detections.len()];
    for (current_index, current_det) in detections.iter().enumerate() {
        if detections_to_remove[current_index] {
            continue;
        }
        for (offset, other_det) in detections[current_index + 1..].iter().enumerate() {
            let other_index = current_index + offset + 1;
            if detections_to_remove[other_index] {
                continue;
            }
            let iou = current_det.bbox.intersection_over_union(&other_det.bbox);
            if iou > iou_threshold {
                detections_to_remove[other_index] = true;
            }
        }
    }
    let mut drop_iter = detections_to_remove.into_iter();
    detections.retain(|_| !drop_iter.next().unwrap_or(false));
    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::bounding_box::BoundingBox;

    #[test]
    fn nms_of_nothing_is_nothing() {
        let nms_result = non_maximum_suppression(Vec::new(), 0.5);
        assert!(nms_result.is_empty());
    }

    #[test]
    fn nms_no_overlap() {
        let dets = vec![
            RawDetection::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.6, 0),
            RawDetection::new(BoundingBox::new(2.0, 2.0, 3.0, 3.0), 0.6, 0),
        ];
        let nms_result = non_maximum_suppression(dets.clone(), 0.5);
        let true_dets = dets;
        assert_eq!(true_dets, nms_result);
    }

    #[test]
    fn nms_standard_usage() {
        let dets = vec![
            RawDetection::new(BoundingBox::new(0.0, 0.0, 4.0, 4.0), 0.6, 0),
            RawDetection::new(BoundingBox::new(0.0, 0.0, 5.0, 5.0), 0.55, 0),
            RawDetection::new(BoundingBox::new(6.0, 6.0, 10.0, 10.0), 0.75, 0),
        ];
        let nms_result = non_maximum_suppression(dets, 0.5);
        let true_dets = vec![
            RawDetection::new(BoundingBox::new(6.0, 6.0, 10.0, 10.0), 0.75, 0),
            RawDetection::new(BoundingBox::new(0.0, 0.0, 4.0, 4.0), 0.6, 0),
        ];
        assert_eq!(true_dets, nms_result);
    }

    #[test]
    fn nms_suppresses_across_classes() {
        let dets = vec![
            RawDetection::new(BoundingBox::new(0.0, 0.0, 4.5, 4.5), 0.6, 0),
            RawDetection::new(BoundingBox::new(0.0, 0.0, 5.0, 5.0), 0.55, 1),
            RawDetection::new(BoundingBox::new(6.0, 6.0, 10.0, 10.0), 0.75, 3),
        ];
        let nms_result = non_maximum_suppression(dets, 0.5);
        let true_dets = vec![
            RawDetection::new(BoundingBox::new(6.0, 6.0, 10.0, 10.0), 0.75, 3),
            RawDetection::new(BoundingBox::new(0.0, 0.0, 4.5, 4.5), 0.6, 0),
        ];
        assert_eq!(true_dets, nms_result);
    }

    #[test]
    fn nms_keeps_moderately_overlapping_boxes() {
        // IoU here is 1/3, under the 0.45 threshold, so nothing is removed.
        let dets = vec![
            RawDetection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9, 0),
            RawDetection::new(BoundingBox::new(0.0, 5.0, 10.0, 15.0), 0.8, 0),
        ];
        let nms_result = non_maximum_suppression(dets.clone(), 0.45);
        let true_dets = dets;
        assert_eq!(true_dets, nms_result);
    }

    #[test]
    fn nms_suppressed_boxes_do_not_suppress_others() {
        // B overlaps both A and C past the threshold, but A only overlaps B.
        // Once A knocks out B, C must survive.
        let dets = vec![
            RawDetection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9, 0),
            RawDetection::new(BoundingBox::new(0.0, 4.0, 10.0, 14.0), 0.8, 0),
            RawDetection::new(BoundingBox::new(0.0, 8.0, 10.0, 18.0), 0.7, 0),
        ];
        let nms_result = non_maximum_suppression(dets, 0.4);
        let true_dets = vec![
            RawDetection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9, 0),
            RawDetection::new(BoundingBox::new(0.0, 8.0, 10.0, 18.0), 0.7, 0),
        ];
        assert_eq!(true_dets, nms_result);
    }

    #[test]
    fn reads_class_names_line_by_line() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Cf_blk_rot").unwrap();
        writeln!(file, "Cf_healthy_l").unwrap();
        writeln!(file, "Cf_r_spot").unwrap();
        drop(file);
        let classes = read_classes_txt_file(&path).unwrap();
        assert_eq!(classes, vec!["Cf_blk_rot", "Cf_healthy_l", "Cf_r_spot"]);
    }
}
