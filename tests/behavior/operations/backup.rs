use crate::*;
use predicates::prelude::*;
use std::fs;

pub fn tests(tests: &mut Vec<Trial>) {
    tests.extend(trials!(
        test_backup_copies_media_and_writes_script,
        test_backup_missing_dir_keeps_going,
        test_backup_twice_creates_two_sessions,
        test_backup_ignore_patterns_skip_script_lines,
        test_backup_offline_device_fails_before_session
    ));
}

fn test_backup_copies_media_and_writes_script() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/DCIM/Camera/IMG_1.jpg", b"one")?;
    phone.put("/sdcard/DCIM/Camera/IMG_2.jpg", b"two")?;

    phone
        .cmd("/sdcard/DCIM/Camera")
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s) copied"));

    let sessions = phone.sessions()?;
    assert_eq!(sessions.len(), 1);
    let folder = sessions[0].join("DCIM_Camera");
    assert_eq!(fs::read(folder.join("IMG_1.jpg"))?, b"one");
    assert_eq!(fs::read(folder.join("IMG_2.jpg"))?, b"two");
    assert!(sessions[0].join("session.json").is_file());

    let script = fs::read_to_string(phone.only_script()?)?;
    assert!(script.contains("rm '/sdcard/DCIM/Camera/IMG_1.jpg'"));
    assert!(script.contains("rm '/sdcard/DCIM/Camera/IMG_2.jpg'"));

    // Backing up never touches the phone.
    assert!(phone.exists("/sdcard/DCIM/Camera/IMG_1.jpg"));
    Ok(())
}

fn test_backup_missing_dir_keeps_going() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/DCIM/Camera/IMG_1.jpg", b"one")?;

    phone
        .cmd("/sdcard/DCIM/Camera,/sdcard/Missing")
        .arg("backup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found on phone: /sdcard/Missing"))
        .stderr(predicate::str::contains("Partial backup"));

    let sessions = phone.sessions()?;
    assert!(sessions[0].join("DCIM_Camera/IMG_1.jpg").is_file());
    assert!(!sessions[0].join("Missing").exists());

    let script = fs::read_to_string(phone.only_script()?)?;
    assert!(script.contains("IMG_1.jpg"));
    Ok(())
}

fn test_backup_twice_creates_two_sessions() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/Pictures/a.png", b"a")?;

    for _ in 0..2 {
        phone.cmd("/sdcard/Pictures").arg("backup").assert().success();
    }

    let sessions = phone.sessions()?;
    assert_eq!(sessions.len(), 2);
    assert_ne!(sessions[0], sessions[1]);
    for session in &sessions {
        assert!(session.join("Pictures/a.png").is_file());
    }
    Ok(())
}

fn test_backup_ignore_patterns_skip_script_lines() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/DCIM/Camera/IMG_1.jpg", b"one")?;
    phone.put("/sdcard/DCIM/Camera/VID_1.mp4", b"video")?;

    phone
        .cmd("/sdcard/DCIM/Camera")
        .env("DELETE_IGNORE_PATTERNS", "*.mp4")
        .arg("backup")
        .assert()
        .success();

    let sessions = phone.sessions()?;
    assert!(sessions[0].join("DCIM_Camera/VID_1.mp4").is_file());

    let script = fs::read_to_string(phone.only_script()?)?;
    assert!(script.contains("IMG_1.jpg"));
    assert!(!script.contains("VID_1.mp4"));
    Ok(())
}

fn test_backup_offline_device_fails_before_session() -> TestResult {
    let phone = PhoneFixture::new()?;
    phone.put("/sdcard/DCIM/Camera/IMG_1.jpg", b"one")?;

    phone
        .cmd("/sdcard/DCIM/Camera")
        .env("FAKE_ADB_OFFLINE", "1")
        .arg("backup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No connected/authorized device"));

    assert!(phone.sessions()?.is_empty());
    Ok(())
}
