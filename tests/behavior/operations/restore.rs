use crate::*;
use predicates::prelude::*;
use std::fs;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(trials!(
        test_restore_latest_session_overwrites_phone,
        test_restore_named_session,
        test_restore_reports_folders_missing_at_backup,
        test_restore_unreadable_folder_keeps_going,
        test_restore_without_sessions_fails
    ));
}

fn test_restore_latest_session_overwrites_phone() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/DCIM/Camera/IMG_1.jpg", b"one")?;
    phone.put("/sdcard/DCIM/Camera/trip/IMG_2.jpg", b"two")?;
    phone
        .cmd("/sdcard/DCIM/Camera")
        .arg("backup")
        .assert()
        .success();

    phone.put("/sdcard/DCIM/Camera/IMG_1.jpg", b"edited on the phone")?;
    phone.remove("/sdcard/DCIM/Camera/trip/IMG_2.jpg")?;

    phone
        .cmd("/sdcard/DCIM/Camera")
        .arg("--non-interactive")
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s) pushed"));

    assert_eq!(phone.read("/sdcard/DCIM/Camera/IMG_1.jpg")?, b"one");
    assert_eq!(phone.read("/sdcard/DCIM/Camera/trip/IMG_2.jpg")?, b"two");
    Ok(())
}

fn test_restore_named_session() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/Pictures/a.png", b"first")?;
    phone.cmd("/sdcard/Pictures").arg("backup").assert().success();
    phone.put("/sdcard/Pictures/a.png", b"second")?;
    phone.cmd("/sdcard/Pictures").arg("backup").assert().success();

    let sessions = phone.sessions()?;
    let oldest = file_name(&sessions[0]);
    phone.remove("/sdcard/Pictures/a.png")?;

    phone
        .cmd("/sdcard/Pictures")
        .arg("restore")
        .arg(&oldest)
        .assert()
        .success();

    assert_eq!(phone.read("/sdcard/Pictures/a.png")?, b"first");
    Ok(())
}

fn test_restore_reports_folders_missing_at_backup() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/Pictures/a.png", b"a")?;
    phone
        .cmd("/sdcard/Pictures,/sdcard/Missing")
        .arg("backup")
        .assert()
        .failure();

    phone
        .cmd("/sdcard/Pictures,/sdcard/Missing")
        .arg("--non-interactive")
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Skipped: Missing (/sdcard/Missing was not on the phone at backup time)",
        ))
        .stdout(predicate::str::contains("1 file(s) pushed"));
    Ok(())
}

fn test_restore_unreadable_folder_keeps_going() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/DCIM/Camera/IMG_1.jpg", b"one")?;
    phone.put("/sdcard/Pictures/a.png", b"a")?;
    phone
        .cmd("/sdcard/DCIM/Camera,/sdcard/Pictures")
        .arg("backup")
        .assert()
        .success();

    let session = phone.sessions()?.remove(0);
    fs::remove_dir_all(session.join("DCIM_Camera"))?;
    fs::write(session.join("DCIM_Camera"), b"not a folder")?;
    phone.remove("/sdcard/Pictures/a.png")?;

    phone
        .cmd("/sdcard/DCIM/Camera,/sdcard/Pictures")
        .arg("--non-interactive")
        .arg("restore")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to restore 'DCIM_Camera'"))
        .stderr(predicate::str::contains("Partial restore: 1 folder(s) unreadable"));

    assert_eq!(phone.read("/sdcard/Pictures/a.png")?, b"a");
    Ok(())
}

fn test_restore_without_sessions_fails() -> TestResult {
    let phone = PhoneFixture::new()?;

    phone
        .cmd("/sdcard/Pictures")
        .arg("--non-interactive")
        .arg("restore")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backup sessions found"));
    Ok(())
}
