//! Advisory emitted when no working directory is configured

use std::path::PathBuf;

use simrunner_process::{ProcessDescriptor, ProcessState, SimProcess};
use tracing_test::traced_test;

/// Removes a file when dropped, even if an assertion fails first
struct RemoveOnDrop(PathBuf);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
#[traced_test]
fn test_defaults_to_current_dir_with_one_advisory() {
    let bin = tempfile::tempdir().unwrap();
    let name = format!("cwd_default_{}", std::process::id());
    let exe = bin.path().join(format!("{name}.exe"));
    std::fs::write(&exe, b"").unwrap();

    let cwd = std::env::current_dir().unwrap();
    let log = cwd.join(format!("{name}.log"));
    let _cleanup = RemoveOnDrop(log.clone());

    let process = SimProcess::new(ProcessDescriptor::new(&exe, "JCP")).unwrap();

    assert_eq!(process.working_dir(), cwd.as_path());
    assert_eq!(process.log_path(), log.as_path());
    assert_eq!(process.state(), ProcessState::Idle);
    assert!(log.exists());

    drop(process);

    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("No working directory configured"))
            .count()
        {
            1 => Ok(()),
            n => Err(format!("expected exactly one advisory, saw {n}")),
        }
    });
    assert!(logs_contain("New process created"));
}

#[test]
#[traced_test]
fn test_explicit_working_dir_has_no_advisory() {
    let sim = tempfile::tempdir().unwrap();
    let exe = sim.path().join("app.exe");
    std::fs::write(&exe, b"").unwrap();

    let process =
        SimProcess::new(ProcessDescriptor::new(&exe, "JCP").working_dir(sim.path())).unwrap();

    assert_eq!(process.name(), "app.exe");
    assert!(process.log_path().ends_with("app.log"));
    assert!(!logs_contain("No working directory configured"));
}
