//! End-to-end tests through the public API: CSV in, statistics, scenes and
//! diagram files out.

mod support;

use chrono::NaiveDate;
use shotmarker::models::{FiringPosition, MarkerColor, StatOverlay};
use shotmarker::parsing::{parse_shots_csv, parse_shots_csv_str};
use shotmarker::render::SvgRenderer;
use shotmarker::services::{
    analyze_shots, generate_plots, AnalysisOptions, BoundsPolicy, PlotRequest, SighterPolicy,
};
use shotmarker::{models::Distance, AnalysisError};

use support::{csv_file, raw_csv_file, MATCH_CSV};

fn match_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 29).unwrap()
}

#[test]
fn test_two_shot_left_group() {
    let file = csv_file(&["L1,10,20,9", "L2,-10,-20,X"]);
    let shots = parse_shots_csv(file.path()).unwrap();

    let options = AnalysisOptions::new(Distance::M600, "range", match_day());
    let report = analyze_shots(shots, &options);

    assert_eq!(report.groups.len(), 1);
    assert!(report.failures.is_empty());
    assert!(report.group(FiringPosition::Middle).is_none());
    assert!(report.group(FiringPosition::Right).is_none());

    let left = report.group(FiringPosition::Left).unwrap();
    assert_eq!(left.name, "range_l");
    assert_eq!(left.statistics.centroid.x, 0.0);
    assert_eq!(left.statistics.centroid.y, 0.0);
    assert_eq!(left.statistics.total_score, 15);
    assert_eq!(left.statistics.count_x, 1);

    let pair = left.statistics.furthest_pair.as_ref().unwrap();
    assert_eq!(pair.first.id, "L1");
    assert_eq!(pair.second.id, "L2");
    assert!((pair.distance - 44.72).abs() < 0.01);

    assert_eq!(left.scene.title, "600m - range_l\n\n29-Dec-2025\n15.1");
    assert_eq!(left.scene.markers.len(), 2);
    assert!(left
        .scene
        .overlays
        .iter()
        .any(|o| o.label() == "Max Distance (44.7 mm)"));
}

#[test]
fn test_match_card_groups_and_failures() {
    let shots = parse_shots_csv_str(MATCH_CSV).unwrap();
    assert_eq!(shots.len(), 8);

    let options = AnalysisOptions::new(Distance::M900, "match", match_day());
    let report = analyze_shots(shots, &options);

    let left = report.group(FiringPosition::Left).unwrap();
    assert_eq!(left.statistics.shot_count, 4);
    assert_eq!(left.statistics.total_score, 20);
    assert_eq!(left.statistics.count_x, 1);
    assert!((left.statistics.centroid.x - 37.625).abs() < 1e-9);
    assert!((left.statistics.centroid.y + 18.75).abs() < 1e-9);
    // The sighter is the first row, so the default scan finds no pair.
    assert!(left.statistics.furthest_pair.is_none());
    assert!(!left
        .scene
        .overlays
        .iter()
        .any(|o| matches!(o, StatOverlay::MaxDistance { .. })));

    let sighter = left
        .scene
        .markers
        .iter()
        .find(|m| m.label.starts_with("S1"))
        .unwrap();
    assert_eq!(sighter.color, MarkerColor::Red);
    assert_eq!(sighter.label, "S1\n(4)");

    assert!(report.group(FiringPosition::Middle).is_none());
    assert!(report.group(FiringPosition::Right).is_none());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].position, FiringPosition::Right);
    assert_eq!(report.failures[0].code, "INVALID_SCORE");
}

#[test]
fn test_excluding_sighters_finds_widest_pair() {
    let shots = parse_shots_csv_str(MATCH_CSV).unwrap();
    let options = AnalysisOptions::new(Distance::M900, "match", match_day())
        .with_sighter_policy(SighterPolicy::ExcludeSighterPairs);
    let report = analyze_shots(shots, &options);

    let pair = report
        .group(FiringPosition::Left)
        .and_then(|g| g.statistics.furthest_pair.as_ref())
        .unwrap();
    assert_eq!(pair.first.id, "L2");
    assert_eq!(pair.second.id, "L3");
    assert!((pair.distance - 2225.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_offsets_switch_to_fixed_window() {
    let shots = parse_shots_csv_str("id,x mm,y mm,score\nM1,500,-20,5\nM2,-10,10,5\n").unwrap();

    let auto = analyze_shots(
        shots.clone(),
        &AnalysisOptions::new(Distance::M300, "auto", match_day()),
    );
    let bounds = auto.group(FiringPosition::Middle).unwrap().scene.bounds;
    assert_eq!(bounds.x.min, -350.0);
    assert_eq!(bounds.x.max, 550.0);
    assert_eq!(bounds.y.min, -350.0);
    assert_eq!(bounds.y.max, 350.0);

    let fixed = analyze_shots(
        shots,
        &AnalysisOptions::new(Distance::M300, "fixed", match_day()).with_offsets(25, 0),
    );
    let bounds = fixed.group(FiringPosition::Middle).unwrap().scene.bounds;
    assert_eq!(bounds.x.min, -350.0);
    assert_eq!(bounds.x.max, 350.0);
    assert_eq!(BoundsPolicy::from_offset(25), BoundsPolicy::FixedWindow);
}

#[test]
fn test_generate_plots_writes_diagrams() {
    let file = raw_csv_file(MATCH_CSV);
    let out = tempfile::tempdir().unwrap();

    let request = PlotRequest::new("match", 900, match_day());
    let outputs = generate_plots(file.path(), &request, &SvgRenderer::default(), out.path())
        .unwrap();

    assert_eq!(outputs.files.len(), 1);
    assert_eq!(outputs.failures.len(), 1);

    let left = outputs.file(FiringPosition::Left).unwrap();
    assert_eq!(left.file_name, "match_l.svg");
    assert_eq!(left.path, out.path().join("match_l.svg"));

    let svg = std::fs::read_to_string(&left.path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("900m - match_l"));
    assert!(svg.contains("20.1"));
    assert!(!out.path().join("match_r.svg").exists());
}

#[test]
fn test_generate_plots_rejects_distance_before_reading() {
    let out = tempfile::tempdir().unwrap();
    let missing = out.path().join("does-not-exist.csv");

    let request = PlotRequest::new("match", 450, match_day());
    let err = generate_plots(&missing, &request, &SvgRenderer::default(), out.path()).unwrap_err();

    assert!(matches!(err, AnalysisError::UnsupportedDistance { requested: 450 }));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_generate_plots_missing_column() {
    let file = raw_csv_file("id,x,y,score\nL1,1,1,5\n");
    let out = tempfile::tempdir().unwrap();

    let request = PlotRequest::new("match", 600, match_day());
    let err = generate_plots(file.path(), &request, &SvgRenderer::default(), out.path())
        .unwrap_err();

    assert!(matches!(err, AnalysisError::MissingColumn(_)));
    assert_eq!(err.code(), "MISSING_COLUMN");
}

#[test]
fn test_rows_without_position_prefix_produce_nothing() {
    let file = csv_file(&["Z1,0,0,5", "11,3,3,X"]);
    let out = tempfile::tempdir().unwrap();

    let request = PlotRequest::new("none", 600, match_day());
    let outputs = generate_plots(file.path(), &request, &SvgRenderer::default(), out.path())
        .unwrap();

    assert!(outputs.is_empty());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}
