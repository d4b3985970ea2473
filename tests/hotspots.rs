use hotspot::cluster::kmeans::partition;
use hotspot::cluster::summary::{summarize, RiskTier};
use hotspot::{HotspotError, Point, PointSet};

/// Three loose neighbourhoods plus a little noise, laid out deterministically
fn city() -> PointSet {
    let anchors = [(41.88, -87.62), (41.75, -87.65), (41.97, -87.70)];
    (0..240)
        .map(|i| {
            let (lat, lon) = anchors[i % anchors.len()];
            let jitter = ((i * 37) % 101) as f64 / 10_000.0;
            Point::new(lat + jitter, lon - jitter * 0.5)
        })
        .collect()
}

#[test]
fn partition_is_deterministic() {
    let points = city();
    for k in 1..=10 {
        let first = partition(&points, k).unwrap();
        for _ in 0..3 {
            let again = partition(&points, k).unwrap();
            assert_eq!(first.assignment, again.assignment, "labels differ for k={}", k);
            assert_eq!(first.centers, again.centers, "centers differ for k={}", k);
        }
    }
}

#[test]
fn every_point_has_one_label_and_counts_add_up() {
    let points = city();
    for k in 2..=10 {
        let result = partition(&points, k).unwrap();

        assert_eq!(result.assignment.len(), points.len());
        assert!(result.assignment.labels().iter().all(|&l| l < k));
        assert_eq!(result.centers.len(), k);

        let summaries = summarize(&result.assignment).unwrap();
        let total: usize = summaries.iter().map(|s| s.count).sum();
        assert_eq!(total, points.len());
    }
}

#[test]
fn no_cluster_is_left_empty() {
    let points = city();
    for k in 1..=10 {
        let result = partition(&points, k).unwrap();
        let summaries = summarize(&result.assignment).unwrap();

        assert_eq!(summaries.len(), k, "empty cluster for k={}", k);
        for (label, center) in result.centers.iter().enumerate() {
            assert_eq!(center.label, label);
            assert!(center.position.lat.is_finite() && center.position.lon.is_finite());
        }
    }
}

#[test]
fn centers_are_member_means() {
    let points = city();
    let result = partition(&points, 4).unwrap();

    for center in &result.centers {
        let members: Vec<Point> = result
            .assignment
            .members(center.label)
            .map(|i| points[i])
            .collect();
        let mean = Point::mean(&members).unwrap();
        assert!(center.position.distance(&mean) < 1e-9);
    }
}

#[test]
fn summarize_twice_gives_same_result() {
    let result = partition(&city(), 3).unwrap();
    assert_eq!(
        summarize(&result.assignment).unwrap(),
        summarize(&result.assignment).unwrap()
    );
}

#[test]
fn k_equal_to_point_count_gives_singletons() {
    let points: PointSet = vec![
        Point::new(41.88, -87.62),
        Point::new(41.88, -87.62),
        Point::new(41.90, -87.60),
        Point::new(41.70, -87.55),
        Point::new(41.95, -87.71),
    ]
    .into();

    let result = partition(&points, points.len()).unwrap();
    let summaries = summarize(&result.assignment).unwrap();

    assert_eq!(summaries.len(), points.len());
    assert!(summaries
        .iter()
        .all(|s| s.count == 1 && s.tier == RiskTier::Low));
}

#[test]
fn k_of_one_holds_everything() {
    let points = city();
    let result = partition(&points, 1).unwrap();
    let summaries = summarize(&result.assignment).unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].count, points.len());
    assert_eq!(summaries[0].tier, RiskTier::Moderate);
}

#[test]
fn downtown_scenario() {
    let points: PointSet = vec![
        Point::new(41.88, -87.62),
        Point::new(41.88, -87.62),
        Point::new(41.90, -87.60),
    ]
    .into();

    let result = partition(&points, 2).unwrap();
    let labels = result.assignment.labels();

    assert_eq!(labels[0], labels[1]);
    assert_ne!(labels[0], labels[2]);
    assert_eq!(result.centers[labels[0]].position, Point::new(41.88, -87.62));
    assert_eq!(result.centers[labels[2]].position, Point::new(41.90, -87.60));

    let summaries = summarize(&result.assignment).unwrap();
    assert_eq!(summaries.iter().map(|s| s.count).sum::<usize>(), 3);
    assert!(summaries.iter().all(|s| s.tier == RiskTier::Low));
}

#[test]
fn identical_points_form_a_high_risk_hotspot() {
    let points: PointSet = vec![Point::new(41.88, -87.62); 501].into();

    let result = partition(&points, 1).unwrap();
    let summaries = summarize(&result.assignment).unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].count, 501);
    assert_eq!(summaries[0].tier, RiskTier::High);
    assert!(result.centers[0].position.distance(&Point::new(41.88, -87.62)) < 1e-9);
}

#[test]
fn empty_input_is_insufficient_data() {
    for k in [0, 1, 5] {
        assert!(matches!(
            partition(&PointSet::default(), k),
            Err(HotspotError::InsufficientData(_))
        ));
    }
}

#[test]
fn zero_k_is_invalid() {
    let points: PointSet = vec![Point::new(41.88, -87.62)].into();
    assert!(matches!(
        partition(&points, 0),
        Err(HotspotError::InvalidParameter(_))
    ));
}

#[test]
fn csv_to_summary_end_to_end() {
    use hotspot::analysis::{analyze, AnalysisOptions};
    use hotspot::config::Config;
    use hotspot::data::{load_incidents, LoadOptions};

    let mut csv = String::from("LATITUDE,LONGITUDE,PRIMARY_TYPE\n");
    for i in 0..30 {
        let lat = if i % 2 == 0 { 41.88 } else { 41.70 };
        csv.push_str(&format!("{},{},THEFT\n", lat, -87.62));
    }
    csv.push_str(",-87.60,THEFT\n");

    let path = std::env::temp_dir().join(format!("hotspot_e2e_{}.csv", std::process::id()));
    std::fs::write(&path, csv).unwrap();
    let points = load_incidents(&path.to_string_lossy(), &LoadOptions::default()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(points.len(), 30);

    let config = Config {
        k: 2,
        ..Config::default()
    };
    let analysis = analyze(points, &config, AnalysisOptions::default()).unwrap();

    assert_eq!(analysis.insights.total_points, 30);
    assert_eq!(analysis.insights.most_dense_count, 15);
    assert_eq!(
        analysis.summaries.iter().map(|s| s.count).collect::<Vec<_>>(),
        vec![15, 15]
    );
}

#[test]
fn non_finite_point_never_yields_a_nan_center() {
    let points: PointSet = vec![
        Point::new(41.88, -87.62),
        Point::new(f64::NAN, -87.60),
        Point::new(41.90, -87.60),
    ]
    .into();

    match partition(&points, 2) {
        Err(HotspotError::InvariantViolation(_)) => {}
        other => panic!("expected an invariant violation, got {:?}", other),
    }
}
