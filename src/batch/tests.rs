use super::*;
use crate::config::Config;
use crate::data::{CsvLoader, DataTable, LoaderError, TableLoader};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Delegates to `CsvLoader` and records the order of the calls.
#[derive(Default)]
struct RecordingLoader {
    inner: CsvLoader,
    calls: Vec<String>,
}

impl TableLoader for RecordingLoader {
    fn load(&mut self, path: &Path) -> Result<DataTable, LoaderError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.calls.push(name);
        self.inner.load(path)
    }
}

struct Dirs {
    _root: TempDir,
    data: PathBuf,
    output: PathBuf,
}

fn dirs() -> Dirs {
    let root = TempDir::new().unwrap();
    let data = root.path().join("data");
    let output = root.path().join("plots");
    fs::create_dir(&data).unwrap();
    fs::create_dir(&output).unwrap();
    Dirs {
        _root: root,
        data,
        output,
    }
}

fn config(dirs: &Dirs) -> Config {
    Config {
        data_dir: dirs.data.clone(),
        output_dir: dirs.output.clone(),
    }
}

fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

#[test]
fn plot_name_replaces_extension() {
    assert_eq!(
        plot_file_name(Path::new("/data/sample.csv")).unwrap(),
        "sample-plot.pdf"
    );
    assert_eq!(
        plot_file_name(Path::new("run.2024.csv")).unwrap(),
        "run.2024-plot.pdf"
    );
    assert!(plot_file_name(Path::new("/")).is_none());
}

#[test]
fn files_are_processed_in_name_order() {
    let dirs = dirs();
    for name in ["c.csv", "a.csv", "b.csv"] {
        fs::write(dirs.data.join(name), "1,2\n3,4\n").unwrap();
    }
    fs::write(dirs.data.join("notes.txt"), "not data").unwrap();

    let mut plotter = BatchPlotter::with_loader(config(&dirs), RecordingLoader::default());
    let report = plotter.run().unwrap();

    assert_eq!(plotter.loader().calls, vec!["a.csv", "b.csv", "c.csv"]);
    assert_eq!(
        report.outputs,
        vec![
            dirs.output.join("a-plot.pdf"),
            dirs.output.join("b-plot.pdf"),
            dirs.output.join("c-plot.pdf"),
        ]
    );
}

#[test]
fn empty_data_dir_writes_nothing() {
    let dirs = dirs();

    let report = BatchPlotter::new(config(&dirs)).run().unwrap();

    assert!(report.outputs.is_empty());
    assert!(output_names(&dirs.output).is_empty());
}

#[test]
fn sample_file_produces_three_panel_pdf() {
    let dirs = dirs();
    fs::write(dirs.data.join("sample.csv"), "1,2\n3,4\n5,6\n").unwrap();

    BatchPlotter::new(config(&dirs)).run().unwrap();

    assert_eq!(output_names(&dirs.output), vec!["sample-plot.pdf"]);
    let pdf = fs::read(dirs.output.join("sample-plot.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(contains(&pdf, "/MediaBox [0 0 720 216]"));
    for label in ["(Mean) Tj", "(Max) Tj", "(Min) Tj"] {
        assert!(contains(&pdf, label), "missing {label}");
    }
}

#[test]
fn bad_file_stops_the_run() {
    let dirs = dirs();
    fs::write(dirs.data.join("a.csv"), "1,2\n3,4\n").unwrap();
    fs::write(dirs.data.join("b.csv"), "1,x\n3,4\n").unwrap();
    fs::write(dirs.data.join("c.csv"), "5,6\n7,8\n").unwrap();

    let mut plotter = BatchPlotter::with_loader(config(&dirs), RecordingLoader::default());
    let err = plotter.run().unwrap_err();

    assert!(matches!(
        err,
        BatchError::Load(LoaderError::NonNumeric { row: 1, column: 2, .. })
    ));
    assert_eq!(plotter.loader().calls, vec!["a.csv", "b.csv"]);
    assert_eq!(output_names(&dirs.output), vec!["a-plot.pdf"]);
}

#[test]
fn missing_output_dir_fails_on_first_write() {
    let dirs = dirs();
    fs::write(dirs.data.join("a.csv"), "1,2\n").unwrap();
    let config = Config {
        data_dir: dirs.data.clone(),
        output_dir: dirs.output.join("missing"),
    };

    let err = BatchPlotter::new(config).run().unwrap_err();

    match err {
        BatchError::Write { path, .. } => {
            assert_eq!(path, dirs.output.join("missing").join("a-plot.pdf"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_output_dir_is_fine_without_inputs() {
    let dirs = dirs();
    let config = Config {
        data_dir: dirs.data.clone(),
        output_dir: dirs.output.join("missing"),
    };

    assert!(BatchPlotter::new(config).run().unwrap().outputs.is_empty());
}

#[test]
fn missing_data_dir_is_reported() {
    let dirs = dirs();
    let config = Config {
        data_dir: dirs.data.join("missing"),
        output_dir: dirs.output.clone(),
    };

    assert!(matches!(
        BatchPlotter::new(config).run(),
        Err(BatchError::DataDir { .. })
    ));
}

#[test]
fn rerun_overwrites_with_identical_output() {
    let dirs = dirs();
    fs::write(dirs.data.join("a.csv"), "1,2,3\n4,5,6\n").unwrap();
    fs::write(dirs.data.join("b.csv"), "0.5\n-1.5\n").unwrap();

    BatchPlotter::new(config(&dirs)).run().unwrap();
    let first_a = fs::read(dirs.output.join("a-plot.pdf")).unwrap();
    let first_b = fs::read(dirs.output.join("b-plot.pdf")).unwrap();

    BatchPlotter::new(config(&dirs)).run().unwrap();

    assert_eq!(output_names(&dirs.output), vec!["a-plot.pdf", "b-plot.pdf"]);
    assert_eq!(fs::read(dirs.output.join("a-plot.pdf")).unwrap(), first_a);
    assert_eq!(fs::read(dirs.output.join("b-plot.pdf")).unwrap(), first_b);
}

#[test]
fn file_ending_in_blank_line_is_plotted() {
    let dirs = dirs();
    fs::write(dirs.data.join("padded.csv"), "1,2\n3,4\n\n").unwrap();

    let report = BatchPlotter::new(config(&dirs)).run().unwrap();

    assert_eq!(report.outputs, vec![dirs.output.join("padded-plot.pdf")]);
    let pdf = fs::read(dirs.output.join("padded-plot.pdf")).unwrap();
    assert!(contains(&pdf, "(Mean) Tj"));
}
