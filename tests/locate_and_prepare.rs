use anyhow::Result;
use assert_fs::TempDir;
use assert_fs::prelude::*;

use hym_custody::{
    Catalog, ConversionRunner, ConvertRequest, CustodyError, CycleSelector, Decision, EssentialFiles, LocateOutcome,
    PipelinePaths, PrepareRequest, ProbeRequest, RunLayout, RunOutcome, ScriptedConfirm, locate_or_promote, prepare,
};

const LOOK: &str =
    "A suitable HYM data set was not found in storage.  Look in the active code directory for a new HYM data set?";
const PROMOTE: &str = "Proceed with these actions?";
const MAKE_SILO: &str = "Would you like to create the SILO output directory?";

fn seed(dir: &assert_fs::fixture::ChildPath, names: &[&str]) {
    dir.create_dir_all().unwrap();
    for n in names {
        dir.child(n).write_str(n).unwrap();
    }
}

fn layout(td: &TempDir) -> RunLayout {
    RunLayout::new(td.child("code").path(), td.child("runs/r1").path(), "HYM_Data")
}

#[test]
fn promotes_complete_set_from_code_directory() {
    let td = TempDir::new().unwrap();
    td.child("runs").create_dir_all().unwrap();
    seed(&td.child("code"), &["hstat.d", "hgrid.d", "t.out", "makefile", "start.d"]);

    let mut c = ScriptedConfirm::yes(2);
    let outcome = locate_or_promote(&layout(&td), &Catalog::hym(), &EssentialFiles::default(), &mut c).unwrap();

    let LocateOutcome::Promoted(report) = outcome else {
        panic!("expected promotion");
    };
    assert_eq!(report.moved, ["hgrid.d", "hstat.d", "t.out"]);
    assert_eq!(c.asked(), [LOOK, PROMOTE]);
    let data = td.child("runs/r1/HYM_Data");
    data.child("hstat.d").assert("hstat.d");
    data.child("makefile").assert("makefile");
    assert!(td.child("code/makefile").path().exists());
    assert!(!td.child("code/start.d").path().exists());
}

#[test]
fn archived_set_needs_no_questions() {
    let td = TempDir::new().unwrap();
    seed(&td.child("runs/r1/HYM_Data"), &["hstat.d", "hgrid.d"]);
    let mut c = ScriptedConfirm::yes(0);
    let outcome = locate_or_promote(&layout(&td), &Catalog::hym(), &EssentialFiles::default(), &mut c).unwrap();
    assert!(matches!(outcome, LocateOutcome::AlreadyArchived));
    assert!(c.asked().is_empty());
}

#[test]
fn incomplete_archive_is_fatal_without_prompting() {
    let td = TempDir::new().unwrap();
    seed(&td.child("runs/r1/HYM_Data"), &["hstat.d"]);
    let mut c = ScriptedConfirm::yes(2);
    let err = locate_or_promote(&layout(&td), &Catalog::hym(), &EssentialFiles::default(), &mut c).unwrap_err();
    match err.downcast_ref::<CustodyError>() {
        Some(CustodyError::IncompleteDataSet { missing, .. }) => assert_eq!(missing, &["hgrid.d"]),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(c.asked().is_empty());
}

#[test]
fn empty_code_directory_means_no_data_set() {
    let td = TempDir::new().unwrap();
    seed(&td.child("code"), &["notes.txt"]);
    let mut c = ScriptedConfirm::yes(2);
    let err = locate_or_promote(&layout(&td), &Catalog::hym(), &EssentialFiles::default(), &mut c).unwrap_err();
    let ce = err.downcast_ref::<CustodyError>().unwrap();
    assert!(matches!(ce, CustodyError::NoDataSet { .. }));
    assert_eq!(ce.code(), 7);
    assert!(!td.child("runs/r1").path().exists());
}

#[test]
fn declining_the_search_aborts() {
    let td = TempDir::new().unwrap();
    seed(&td.child("code"), &["hstat.d", "hgrid.d"]);
    let mut c = ScriptedConfirm::new([Decision::Abort]);
    let err = locate_or_promote(&layout(&td), &Catalog::hym(), &EssentialFiles::default(), &mut c).unwrap_err();
    assert!(matches!(err.downcast_ref::<CustodyError>(), Some(CustodyError::UserAbort { .. })));
    assert!(td.child("code/hstat.d").path().exists());
}

#[test]
fn missing_code_directory_is_reported_after_the_search_prompt() {
    let td = TempDir::new().unwrap();
    td.child("runs/r1").create_dir_all().unwrap();
    let mut c = ScriptedConfirm::yes(2);
    let err = locate_or_promote(&layout(&td), &Catalog::hym(), &EssentialFiles::default(), &mut c).unwrap_err();
    let ce = err.downcast_ref::<CustodyError>().unwrap();
    match ce {
        CustodyError::MissingDirectory { path, .. } => assert_eq!(path, td.child("code").path()),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(ce.code(), 3);
    assert_eq!(c.asked(), [LOOK]);
}

#[derive(Default)]
struct FakeRunner {
    converts: Vec<ConvertRequest>,
    probes: Vec<ProbeRequest>,
    fail_convert: bool,
}

impl ConversionRunner for FakeRunner {
    fn convert(&mut self, req: &ConvertRequest) -> Result<RunOutcome> {
        self.converts.push(req.clone());
        Ok(RunOutcome {
            success: !self.fail_convert,
            code: Some(if self.fail_convert { 1 } else { 0 }),
            stdout: "converted\n".into(),
            stderr: String::new(),
        })
    }

    fn extract_probe(&mut self, req: &ProbeRequest) -> Result<RunOutcome> {
        self.probes.push(req.clone());
        Ok(RunOutcome {
            success: true,
            code: Some(0),
            ..Default::default()
        })
    }
}

fn archived_run(td: &TempDir, ncyc: u32) -> PipelinePaths {
    let data = td.child("runs/r1/HYM_Data");
    seed(&data, &["hgrid.d", "h3ds.d", "h3db.d"]);
    data.child("hstat.d").write_str(&format!("nx= 64\n i3dbout= {ncyc}\n")).unwrap();
    PipelinePaths::new(layout(td), td.child("runs/r1/SILO_Data").path(), td.child("runs/r1/Probe_Data").path())
}

fn request(convert: bool, probe: bool, cycle: CycleSelector) -> PrepareRequest {
    PrepareRequest {
        convert,
        probe,
        cycle,
        fields: "10100".parse().unwrap(),
        phi_rot: 45.0,
    }
}

#[test]
fn convert_and_probe_run_in_order() {
    let td = TempDir::new().unwrap();
    let paths = archived_run(&td, 12);
    let mut c = ScriptedConfirm::yes(1);
    let mut runner = FakeRunner::default();

    let summary = prepare(
        &paths,
        &request(true, true, CycleSelector::Single(12)),
        &Catalog::hym(),
        &mut c,
        &mut runner,
    )
    .unwrap();

    assert_eq!(summary.ncyc, Some(12));
    assert!(matches!(summary.located, Some(LocateOutcome::AlreadyArchived)));
    assert_eq!(c.asked(), [MAKE_SILO]);
    assert!(paths.silo_dir.path.is_dir());
    assert!(paths.probe_dir.path.is_dir());
    assert_eq!(runner.converts.len(), 1);
    assert_eq!(runner.converts[0].args()[2..], ["12", "10100"]);
    assert_eq!(runner.probes[0].args()[3], "45.000000");
}

#[test]
fn cycle_beyond_ncyc_stops_before_conversion() {
    let td = TempDir::new().unwrap();
    let paths = archived_run(&td, 4);
    std::fs::create_dir_all(&paths.silo_dir.path).unwrap();
    let mut c = ScriptedConfirm::yes(0);
    let mut runner = FakeRunner::default();

    let err = prepare(
        &paths,
        &request(true, false, CycleSelector::Single(5)),
        &Catalog::hym(),
        &mut c,
        &mut runner,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CustodyError>(),
        Some(CustodyError::CycleOutOfRange { cycle: 5, ncyc: 4 })
    ));
    assert!(runner.converts.is_empty());
}

#[test]
fn missing_field_file_makes_the_set_incomplete() {
    let td = TempDir::new().unwrap();
    let paths = archived_run(&td, 4);
    let mut req = request(true, false, CycleSelector::All);
    req.fields = "00011".parse().unwrap();
    let mut runner = FakeRunner::default();
    let err = prepare(&paths, &req, &Catalog::hym(), &mut ScriptedConfirm::yes(3), &mut runner).unwrap_err();
    match err.downcast_ref::<CustodyError>() {
        Some(CustodyError::IncompleteDataSet { missing, .. }) => assert_eq!(missing, &["h3dv.d", "h3dj.d"]),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn failed_conversion_skips_probe_extraction() {
    let td = TempDir::new().unwrap();
    let paths = archived_run(&td, 4);
    let mut runner = FakeRunner {
        fail_convert: true,
        ..Default::default()
    };
    let err = prepare(
        &paths,
        &request(true, true, CycleSelector::All),
        &Catalog::hym(),
        &mut ScriptedConfirm::yes(1),
        &mut runner,
    )
    .unwrap_err();
    let ce = err.downcast_ref::<CustodyError>().unwrap();
    assert!(matches!(ce, CustodyError::CollaboratorFailed { .. }));
    assert_eq!(ce.code(), 10);
    assert!(runner.probes.is_empty());
}

#[test]
fn probe_only_creates_output_directory_without_asking() {
    let td = TempDir::new().unwrap();
    let paths = archived_run(&td, 4);
    let mut c = ScriptedConfirm::yes(0);
    let mut runner = FakeRunner::default();
    let summary = prepare(
        &paths,
        &request(false, true, CycleSelector::All),
        &Catalog::hym(),
        &mut c,
        &mut runner,
    )
    .unwrap();
    assert!(summary.located.is_none());
    assert!(c.asked().is_empty());
    assert!(paths.probe_dir.path.is_dir());
    assert!(runner.converts.is_empty());
    assert_eq!(runner.probes.len(), 1);
}
