mod support;

use support::{
    DRIVE_TIMEOUT, StubServer, TestEnv, drive_until, error_response, json_response, sample_zip,
    zip_response,
};

use mammodesk::egui_app::controller::EguiController;
use mammodesk::egui_app::state::DatasetModalPhase;

const CLASS_STATS_BODY: &str = r#"{
    "total_images": 1200,
    "class_stats": {
        "BI-RADS 0": 100,
        "BI-RADS 1": 200,
        "BI-RADS 2": 500,
        "BI-RADS 3": 250,
        "BI-RADS 4": 120,
        "BI-RADS 5": 30
    }
}"#;

struct ExportHarness {
    env: TestEnv,
    server: StubServer,
    controller: EguiController,
}

impl ExportHarness {
    fn new() -> Self {
        let server = StubServer::start();
        let env = TestEnv::new(&server.base_url());
        let mut controller = EguiController::new();
        controller.load_configuration().expect("load config");
        Self {
            env,
            server,
            controller,
        }
    }

    fn open_until_ready(&mut self) {
        self.server.enqueue(json_response(CLASS_STATS_BODY));
        self.controller.open_dataset_modal();
        assert!(drive_until(&mut self.controller, DRIVE_TIMEOUT, |c| {
            c.ui.dataset.phase == DatasetModalPhase::Ready
        }));
    }
}

#[test]
fn export_happy_path_writes_data_zip() {
    let mut h = ExportHarness::new();
    h.open_until_ready();

    let distribution = h
        .controller
        .ui
        .dataset
        .distribution
        .as_ref()
        .expect("distribution loaded");
    assert_eq!(distribution.total_images(), 1200);
    assert_eq!(distribution.count_for("BI-RADS 2"), 500);

    h.controller.request_dataset_export();
    assert_eq!(h.controller.ui.dataset.phase, DatasetModalPhase::Confirming);

    h.server.enqueue(zip_response(&sample_zip()));
    h.controller.confirm_dataset_export();
    assert_eq!(h.controller.ui.dataset.phase, DatasetModalPhase::Exporting);

    // The close control is refused while the export runs.
    assert!(!h.controller.close_dataset_modal());
    assert_eq!(h.controller.ui.dataset.phase, DatasetModalPhase::Exporting);

    assert!(drive_until(&mut h.controller, DRIVE_TIMEOUT, |c| {
        c.ui.dataset.phase == DatasetModalPhase::Closed
    }));

    let archive = h.env.download_dir().join("data.zip");
    assert!(archive.is_file());
    let mut file = std::fs::File::open(&archive).expect("open archive");
    let unpacked = zip::ZipArchive::new(&mut file).expect("archive is readable");
    assert_eq!(unpacked.len(), 3);

    let requests = h.server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/v1/admin/dataset/class-stats");
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/api/v1/admin/create-dataset-download");
    assert_eq!(
        requests[1].body_json(),
        serde_json::json!({ "train_percent": 70, "val_percent": 20, "test_percent": 10 })
    );
}

#[test]
fn export_failure_returns_to_ready_and_can_retry() {
    let mut h = ExportHarness::new();
    h.open_until_ready();

    h.controller.ui.dataset.ratio.set_cut1(60);
    h.controller.ui.dataset.ratio.set_cut2(80);
    h.controller.request_dataset_export();

    let log_before = h.controller.ui.status.log.len();
    h.server
        .enqueue(error_response(500, r#"{"detail": "storage offline"}"#));
    h.controller.confirm_dataset_export();
    assert!(drive_until(&mut h.controller, DRIVE_TIMEOUT, |c| {
        c.ui.dataset.phase == DatasetModalPhase::Ready
    }));

    // The ratio survives the failure and the error is shown once.
    assert_eq!(
        (
            h.controller.ui.dataset.ratio.cut1(),
            h.controller.ui.dataset.ratio.cut2()
        ),
        (60, 80)
    );
    let error = h
        .controller
        .ui
        .dataset
        .last_error
        .as_deref()
        .expect("error surfaced in the modal");
    assert!(error.contains("storage offline"), "got: {error}");
    assert_eq!(h.controller.ui.status.log.len(), log_before + 1);

    // A second attempt with the same ratio succeeds.
    h.controller.request_dataset_export();
    h.server.enqueue(zip_response(&sample_zip()));
    h.controller.confirm_dataset_export();
    assert!(drive_until(&mut h.controller, DRIVE_TIMEOUT, |c| {
        c.ui.dataset.phase == DatasetModalPhase::Closed
    }));
    assert!(h.env.download_dir().join("data.zip").is_file());

    let requests = h.server.requests();
    let retry = requests.last().expect("retry request");
    assert_eq!(
        retry.body_json(),
        serde_json::json!({ "train_percent": 60, "val_percent": 20, "test_percent": 20 })
    );
}

#[test]
fn malformed_archive_payload_fails_the_export() {
    let mut h = ExportHarness::new();
    h.open_until_ready();

    h.controller.request_dataset_export();
    h.server
        .enqueue(zip_response(b"<html>definitely not a zip</html>"));
    h.controller.confirm_dataset_export();
    assert!(drive_until(&mut h.controller, DRIVE_TIMEOUT, |c| {
        c.ui.dataset.phase == DatasetModalPhase::Ready
    }));
    assert!(h.controller.ui.dataset.last_error.is_some());
    assert!(!h.env.download_dir().join("data.zip").exists());
}

#[test]
fn stats_failure_stays_in_loading_until_reopened() {
    let server = StubServer::start();
    let env = TestEnv::new(&server.base_url());
    let mut controller = EguiController::new();
    controller.load_configuration().expect("load config");

    server.enqueue(error_response(500, r#"{"detail": "database down"}"#));
    controller.open_dataset_modal();
    assert!(drive_until(&mut controller, DRIVE_TIMEOUT, |c| {
        c.ui.dataset.last_error.is_some()
    }));
    assert_eq!(controller.ui.dataset.phase, DatasetModalPhase::Loading);

    // Close and reopen is the retry path.
    assert!(controller.close_dataset_modal());
    server.enqueue(json_response(CLASS_STATS_BODY));
    controller.open_dataset_modal();
    assert!(controller.ui.dataset.last_error.is_none());
    assert!(drive_until(&mut controller, DRIVE_TIMEOUT, |c| {
        c.ui.dataset.phase == DatasetModalPhase::Ready
    }));
    drop(env);
}
