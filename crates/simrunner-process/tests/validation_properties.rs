//! Property tests for descriptor validation
//!
//! Validation failures must never leave a log file behind.

use proptest::prelude::*;
use simrunner_process::{ProcessDescriptor, ProcessError, SimProcess};

fn arb_stem() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,11}"
}

fn arb_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _.-]{0,16}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A missing executable always fails with ExecutableNotFound
    #[test]
    fn prop_missing_executable_is_not_found(stem in arb_stem(), id in arb_id()) {
        let sim = tempfile::tempdir().unwrap();
        let exe = sim.path().join(format!("{stem}.exe"));
        let log = sim.path().join(format!("{stem}.log"));

        let err = SimProcess::new(ProcessDescriptor::new(&exe, id).working_dir(sim.path()))
            .unwrap_err();

        let reports_exe = matches!(err, ProcessError::ExecutableNotFound { ref path } if path == &exe);
        prop_assert!(reports_exe, "unexpected error: {}", err);
        prop_assert!(!log.exists(), "log file created for a missing executable");
    }

    /// A missing working directory always fails with WorkingDirNotFound
    #[test]
    fn prop_missing_working_dir_is_not_found(stem in arb_stem(), sub in arb_stem()) {
        let sim = tempfile::tempdir().unwrap();
        let exe = sim.path().join(format!("{stem}.exe"));
        std::fs::write(&exe, b"").unwrap();
        let missing = sim.path().join(format!("{sub}_missing"));
        let log = sim.path().join(format!("{stem}.log"));

        let err = SimProcess::new(ProcessDescriptor::new(&exe, "JCP").working_dir(&missing))
            .unwrap_err();

        let reports_dir = matches!(err, ProcessError::WorkingDirNotFound { .. });
        prop_assert!(err.is_not_found(), "unexpected error: {}", err);
        prop_assert!(reports_dir, "unexpected error: {}", err);
        prop_assert!(!missing.exists(), "missing working directory was created");
        prop_assert!(!log.exists(), "log file created for a missing working directory");
    }

    /// Any valid descriptor yields `<stem>.log` next to the working directory
    #[test]
    fn prop_log_named_after_executable(stem in arb_stem(), ext in "[a-z]{1,4}", id in arb_id()) {
        let sim = tempfile::tempdir().unwrap();
        let exe = sim.path().join(format!("{stem}.{ext}"));
        std::fs::write(&exe, b"").unwrap();

        let expected_name = format!("{stem}.{ext}");
        let expected_log = sim.path().join(format!("{stem}.log"));

        let process = SimProcess::new(ProcessDescriptor::new(&exe, id.clone()).working_dir(sim.path()))
            .unwrap();

        let log_matches = process.log_path().file_name() == expected_log.file_name();
        prop_assert_eq!(process.id(), id.as_str());
        prop_assert_eq!(process.name(), expected_name.as_str());
        prop_assert!(log_matches, "log file was {}", process.log_path().display());
        prop_assert!(process.log_path().exists(), "log file was not created");
    }
}
