//! Generate diagram files for a shot table.
//!
//! This is the one service that touches the filesystem: it writes one image
//! per analysed group into the output directory. Input files are only read.

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::analysis::{analyze_shots, AnalysisOptions, AnalysisReport, GroupFailure};
use super::statistics::{GroupStatistics, SighterPolicy};
use crate::error::Result;
use crate::models::{Distance, FiringPosition, Shot};
use crate::parsing::parse_shots_csv;
use crate::render::SceneRenderer;

/// Parameters of one plot run, as given on the command line or the upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub prefix: String,
    pub distance_m: u32,
    pub x_offset: i64,
    pub y_offset: i64,
    pub sighter_policy: SighterPolicy,
    pub date: NaiveDate,
}

impl PlotRequest {
    pub fn new(prefix: impl Into<String>, distance_m: u32, date: NaiveDate) -> Self {
        Self {
            prefix: prefix.into(),
            distance_m,
            x_offset: 0,
            y_offset: 0,
            sighter_policy: SighterPolicy::default(),
            date,
        }
    }

    pub fn with_offsets(mut self, x_offset: i64, y_offset: i64) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// Resolve the distance and build analysis options.
    pub fn analysis_options(&self) -> Result<AnalysisOptions> {
        let distance = Distance::from_meters(self.distance_m)?;
        Ok(AnalysisOptions::new(distance, self.prefix.clone(), self.date)
            .with_offsets(self.x_offset, self.y_offset)
            .with_sighter_policy(self.sighter_policy))
    }
}

/// One written diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFile {
    pub position: FiringPosition,
    pub name: String,
    pub file_name: String,
    pub path: PathBuf,
    pub statistics: GroupStatistics,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlotOutputs {
    pub files: Vec<PlotFile>,
    pub failures: Vec<GroupFailure>,
}

impl PlotOutputs {
    pub fn file(&self, position: FiringPosition) -> Option<&PlotFile> {
        self.files.iter().find(|f| f.position == position)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Render every group of a report and write the images into `output_dir`.
///
/// Either every group's file is written or none is: when a render or write
/// fails, files already written by this call are removed before the error is
/// returned.
pub fn write_report(
    report: &AnalysisReport,
    renderer: &dyn SceneRenderer,
    output_dir: &Path,
) -> Result<PlotOutputs> {
    std::fs::create_dir_all(output_dir)?;

    let mut files = Vec::with_capacity(report.groups.len());
    if let Err(err) = write_groups(report, renderer, output_dir, &mut files) {
        for file in &files {
            if let Err(remove_err) = std::fs::remove_file(&file.path) {
                warn!("Could not remove {}: {}", file.path.display(), remove_err);
            }
        }
        return Err(err);
    }

    Ok(PlotOutputs {
        files,
        failures: report.failures.clone(),
    })
}

fn write_groups(
    report: &AnalysisReport,
    renderer: &dyn SceneRenderer,
    output_dir: &Path,
    files: &mut Vec<PlotFile>,
) -> Result<()> {
    for group in &report.groups {
        let bytes = renderer.render(&group.scene)?;
        let file_name = format!("{}.{}", group.name, renderer.file_extension());
        let path = output_dir.join(&file_name);
        std::fs::write(&path, bytes)?;
        debug!("Wrote {}", path.display());

        files.push(PlotFile {
            position: group.scene.position,
            name: group.name.clone(),
            file_name,
            path,
            statistics: group.statistics.clone(),
        });
    }
    Ok(())
}

/// Analyse already-parsed shots and write one diagram per non-empty group.
pub fn generate_plots_from_shots(
    shots: Vec<Shot>,
    request: &PlotRequest,
    renderer: &dyn SceneRenderer,
    output_dir: &Path,
) -> Result<PlotOutputs> {
    let options = request.analysis_options()?;
    let report = analyze_shots(shots, &options);
    let outputs = write_report(&report, renderer, output_dir)?;

    info!(
        "Generated {} plot(s) for prefix '{}' at {}",
        outputs.files.len(),
        request.prefix,
        options.distance
    );
    Ok(outputs)
}

/// Read a CSV file and write one diagram per non-empty group.
///
/// The distance is checked before the file is opened.
pub fn generate_plots(
    csv_path: &Path,
    request: &PlotRequest,
    renderer: &dyn SceneRenderer,
    output_dir: &Path,
) -> Result<PlotOutputs> {
    request.analysis_options()?;
    let shots = parse_shots_csv(csv_path)?;
    generate_plots_from_shots(shots, request, renderer, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::models::Scene;
    use crate::render::SvgRenderer;
    use std::io::Write;

    /// Renders like [`SvgRenderer`] but fails on the right-hand group.
    struct FailOnRight(SvgRenderer);

    impl SceneRenderer for FailOnRight {
        fn file_extension(&self) -> &'static str {
            self.0.file_extension()
        }

        fn content_type(&self) -> &'static str {
            self.0.content_type()
        }

        fn render(&self, scene: &Scene) -> Result<Vec<u8>> {
            if scene.position == FiringPosition::Right {
                return Err(AnalysisError::Render("right target unavailable".into()));
            }
            self.0.render(scene)
        }
    }

    fn request(distance_m: u32) -> PlotRequest {
        PlotRequest::new("club", distance_m, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())
    }

    #[test]
    fn test_generate_plots_writes_one_file_per_group() {
        let dir = tempfile::tempdir().unwrap();
        let mut csv = tempfile::NamedTempFile::new().unwrap();
        write!(csv, "id,x mm,y mm,score\nL1,10,20,5\nL2,-10,-20,X\nR1,0,0,6\n").unwrap();

        let outputs = generate_plots(
            csv.path(),
            &request(600),
            &SvgRenderer::default(),
            dir.path(),
        )
        .unwrap();

        assert_eq!(outputs.files.len(), 2);
        assert!(outputs.file(FiringPosition::Middle).is_none());

        let left = outputs.file(FiringPosition::Left).unwrap();
        assert_eq!(left.file_name, "club_l.svg");
        assert!(left.path.exists());
        assert_eq!(left.statistics.total_score, 11);

        let right = outputs.file(FiringPosition::Right).unwrap();
        assert_eq!(right.path, dir.path().join("club_r.svg"));
        assert!(!dir.path().join("club_m.svg").exists());

        let svg = std::fs::read_to_string(&left.path).unwrap();
        assert!(svg.contains("600m - club_l"));
    }

    #[test]
    fn test_unsupported_distance_checked_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_plots(
            Path::new("/does/not/exist.csv"),
            &request(450),
            &SvgRenderer::default(),
            dir.path(),
        )
        .unwrap_err();

        assert!(matches!(err, AnalysisError::UnsupportedDistance { requested: 450 }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_group_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let shots = vec![
            Shot::new("L1", 0.0, 0.0, "?"),
            Shot::new("M1", 0.0, 0.0, "4"),
        ];

        let outputs =
            generate_plots_from_shots(shots, &request(300), &SvgRenderer::default(), dir.path())
                .unwrap();

        assert_eq!(outputs.files.len(), 1);
        assert_eq!(outputs.failures.len(), 1);
        assert_eq!(outputs.failures[0].position, FiringPosition::Left);
        assert!(!dir.path().join("club_l.svg").exists());
    }

    #[test]
    fn test_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let shots = vec![Shot::new("M1", 0.0, 0.0, "4")];

        generate_plots_from_shots(shots, &request(900), &SvgRenderer::default(), &nested)
            .unwrap();

        assert!(nested.join("club_m.svg").exists());
    }

    #[test]
    fn test_render_failure_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let shots = vec![
            Shot::new("L1", 0.0, 0.0, "5"),
            Shot::new("M1", 1.0, 1.0, "4"),
            Shot::new("R1", 2.0, 2.0, "3"),
        ];

        let err = generate_plots_from_shots(
            shots,
            &request(600),
            &FailOnRight(SvgRenderer::default()),
            dir.path(),
        )
        .unwrap_err();

        assert!(matches!(err, AnalysisError::Render(_)));
        assert!(!dir.path().join("club_l.svg").exists());
        assert!(!dir.path().join("club_m.svg").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
