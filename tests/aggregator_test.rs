//! Tests for frame-to-video aggregation behavior.

use trapvid::aggregate::{
    AggregationPolicy, BoundingBox, Category, Detection, FrameDetectionRecord, MergeStrategy,
    RepeatOptions, aggregate,
};

fn detection(category: Category, confidence: f32) -> Detection {
    Detection {
        category,
        confidence,
        bounding_box: BoundingBox::from_array([0.2, 0.2, 0.3, 0.3]),
    }
}

fn record(video: &str, frame_index: u64, detections: Vec<Detection>) -> FrameDetectionRecord {
    FrameDetectionRecord {
        frame_path: format!("{video}/frame{frame_index:06}.jpg"),
        video_id: video.to_string(),
        frame_index,
        detections,
    }
}

/// Two frames from video A, one empty frame from video B, max-per-category
/// at threshold 0.5.
#[test]
fn test_two_video_scenario() {
    let records = vec![
        record("A", 0, vec![detection(Category::Animal, 0.9)]),
        record(
            "A",
            5,
            vec![
                detection(Category::Animal, 0.95),
                detection(Category::Person, 0.6),
            ],
        ),
        record("B", 2, vec![]),
    ];
    let policy = AggregationPolicy {
        confidence_threshold: 0.5,
        ..AggregationPolicy::default()
    };

    let out = aggregate(records, &policy);

    assert_eq!(out.summaries.len(), 2);

    let a = &out.summaries[0];
    assert_eq!(a.video_id, "A");
    assert_eq!(a.frame_count, 2);
    assert_eq!(a.detections.len(), 2);
    assert_eq!(a.detections[0].detection.category, Category::Animal);
    assert!((a.detections[0].detection.confidence - 0.95).abs() < 1e-6);
    assert_eq!(a.detections[0].frame_index, 5);
    assert_eq!(a.detections[1].detection.category, Category::Person);
    assert!((a.detections[1].detection.confidence - 0.6).abs() < 1e-6);
    assert_eq!(a.max_confidence_frame.as_deref(), Some("A/frame000005.jpg"));

    let b = &out.summaries[1];
    assert_eq!(b.video_id, "B");
    assert!(b.detections.is_empty());
    assert_eq!(b.frame_count, 1);
}

/// Equal-confidence vehicle detections at frames 3 and 7 resolve to frame 3.
#[test]
fn test_equal_confidence_resolves_to_earlier_frame() {
    let records = vec![
        record("A", 7, vec![detection(Category::Vehicle, 0.8)]),
        record("A", 3, vec![detection(Category::Vehicle, 0.8)]),
    ];

    let out = aggregate(records, &AggregationPolicy::default());

    let summary = &out.summaries[0];
    assert_eq!(summary.detections.len(), 1);
    assert_eq!(summary.detections[0].frame_index, 3);
    assert_eq!(
        summary.max_confidence_frame.as_deref(),
        Some("A/frame000003.jpg")
    );
}

/// A box violating x+w <= 1 is dropped; valid siblings survive.
#[test]
fn test_overflowing_box_dropped_with_diagnostic() {
    let bad = Detection {
        category: Category::Animal,
        confidence: 0.9,
        bounding_box: BoundingBox::from_array([0.5, 0.5, 0.7, 0.2]),
    };
    let records = vec![record("A", 0, vec![bad, detection(Category::Person, 0.7)])];

    let out = aggregate(records, &AggregationPolicy::default());

    assert_eq!(out.diagnostics.detections_dropped, 1);
    assert_eq!(out.diagnostics.dropped[0].frame_path, "A/frame000000.jpg");
    assert_eq!(out.summaries[0].detections.len(), 1);
    assert_eq!(
        out.summaries[0].detections[0].detection.category,
        Category::Person
    );
}

/// Same input and policy twice produces identical output.
#[test]
fn test_idempotence() {
    let records = vec![
        record("A", 0, vec![detection(Category::Animal, 0.9)]),
        record("B", 1, vec![detection(Category::Person, 0.7)]),
        record("A", 2, vec![detection(Category::Vehicle, 0.5)]),
    ];
    let policy = AggregationPolicy::top_k(2);

    let first = aggregate(records.clone(), &policy);
    let second = aggregate(records, &policy);

    assert_eq!(format!("{:?}", first.summaries), format!("{:?}", second.summaries));
    assert_eq!(
        format!("{:?}", first.diagnostics),
        format!("{:?}", second.diagnostics)
    );
}

/// Reordering the input changes neither the video set nor the chosen
/// detections under max-per-category.
#[test]
fn test_shuffle_invariance_of_grouping() {
    let forward = vec![
        record("A", 0, vec![detection(Category::Animal, 0.9)]),
        record("A", 5, vec![detection(Category::Animal, 0.95)]),
        record("B", 2, vec![detection(Category::Person, 0.4)]),
        record("A", 9, vec![detection(Category::Person, 0.6)]),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let policy = AggregationPolicy::default();
    let out_forward = aggregate(forward, &policy);
    let out_reversed = aggregate(reversed, &policy);

    let mut ids_forward: Vec<String> = out_forward
        .summaries
        .iter()
        .map(|s| s.video_id.clone())
        .collect();
    let mut ids_reversed: Vec<String> = out_reversed
        .summaries
        .iter()
        .map(|s| s.video_id.clone())
        .collect();
    ids_forward.sort();
    ids_reversed.sort();
    assert_eq!(ids_forward, ids_reversed);

    for summary in &out_forward.summaries {
        let twin = out_reversed
            .summaries
            .iter()
            .find(|s| s.video_id == summary.video_id)
            .expect("video missing after shuffle");
        assert_eq!(format!("{:?}", summary.detections), format!("{:?}", twin.detections));
        assert_eq!(summary.max_confidence_frame, twin.max_confidence_frame);
    }
}

/// Output order follows first appearance, not name or count.
#[test]
fn test_output_order_is_first_appearance() {
    let records = vec![
        record("zebra.mp4", 0, vec![]),
        record("aardvark.mp4", 0, vec![]),
        record("zebra.mp4", 1, vec![]),
    ];

    let out = aggregate(records, &AggregationPolicy::default());

    let ids: Vec<&str> = out.summaries.iter().map(|s| s.video_id.as_str()).collect();
    assert_eq!(ids, vec!["zebra.mp4", "aardvark.mp4"]);
}

/// Exactly one summary per distinct video id.
#[test]
fn test_completeness() {
    let records = vec![
        record("A", 0, vec![]),
        record("B", 0, vec![]),
        record("A", 1, vec![]),
        record("C", 0, vec![]),
        record("B", 1, vec![]),
    ];

    let out = aggregate(records, &AggregationPolicy::default());

    assert_eq!(out.summaries.len(), 3);
}

/// Raising the threshold never increases retained detections.
#[test]
fn test_threshold_monotonicity() {
    let records = vec![
        record(
            "A",
            0,
            vec![
                detection(Category::Animal, 0.2),
                detection(Category::Person, 0.5),
            ],
        ),
        record(
            "A",
            1,
            vec![
                detection(Category::Animal, 0.8),
                detection(Category::Vehicle, 0.35),
            ],
        ),
        record("B", 0, vec![detection(Category::Animal, 0.6)]),
    ];

    let mut previous = usize::MAX;
    for threshold in [0.0, 0.3, 0.5, 0.7, 0.9] {
        let policy = AggregationPolicy {
            confidence_threshold: threshold,
            merge_strategy: MergeStrategy::All,
            ..AggregationPolicy::default()
        };
        let out = aggregate(records.clone(), &policy);
        let retained: usize = out.summaries.iter().map(|s| s.detections.len()).sum();
        assert!(retained <= previous, "threshold {threshold} increased retention");
        previous = retained;
    }
}

/// A fence post detected at the same spot in every frame loses to the
/// animal walking through once repeat suppression is enabled.
#[test]
fn test_repeat_suppression_removes_static_false_positive() {
    let static_detection = Detection {
        category: Category::Animal,
        confidence: 0.98,
        bounding_box: BoundingBox::from_array([0.45, 0.45, 0.08, 0.08]),
    };
    let passing_animal = Detection {
        category: Category::Animal,
        confidence: 0.7,
        bounding_box: BoundingBox::from_array([0.1, 0.6, 0.15, 0.15]),
    };

    let mut records: Vec<FrameDetectionRecord> = (0..6)
        .map(|i| record("A", i, vec![static_detection.clone()]))
        .collect();
    records[3].detections.push(passing_animal);

    let plain = aggregate(records.clone(), &AggregationPolicy::default());
    assert!((plain.summaries[0].detections[0].detection.confidence - 0.98).abs() < 1e-6);

    let policy = AggregationPolicy {
        repeat_suppression: Some(RepeatOptions {
            occurrence_threshold: 5,
            ..RepeatOptions::default()
        }),
        ..AggregationPolicy::default()
    };
    let out = aggregate(records, &policy);

    let a = &out.summaries[0];
    assert_eq!(a.detections.len(), 1);
    assert!((a.detections[0].detection.confidence - 0.7).abs() < 1e-6);
    assert_eq!(a.detections[0].frame_index, 3);
    assert_eq!(out.diagnostics.repeats_suppressed, 6);
    assert_eq!(a.frame_count, 6);
}
