use crate::*;
use predicates::prelude::*;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(trials!(test_sessions_lists_backups, test_devices_prints_serial));
}

fn test_sessions_lists_backups() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/Pictures/a.png", b"a")?;
    phone.cmd("/sdcard/Pictures").arg("backup").assert().success();

    let name = file_name(&phone.sessions()?[0]);
    phone
        .cmd("/sdcard/Pictures")
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains(name))
        .stdout(predicate::str::contains("1 file(s), device FAKE0001"))
        .stdout(predicate::str::contains("delete script"));
    Ok(())
}

fn test_devices_prints_serial() -> TestResult {
    let phone = PhoneFixture::new()?;

    phone
        .cmd("/sdcard/Pictures")
        .arg("devices")
        .assert()
        .success()
        .stdout(predicate::str::contains("FAKE0001\tdevice"));
    Ok(())
}
