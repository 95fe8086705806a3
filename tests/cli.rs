//! End-to-end tests for the `gastos` binary against the local backend

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gastos(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gastos").unwrap();
    cmd.env("GASTOS_DATA_DIR", dir.path())
        .env_remove("GASTOS_SUPABASE_KEY");
    cmd
}

fn open_january(dir: &TempDir) {
    gastos(dir)
        .args(["budget", "set", "1000", "--month", "2025-01"])
        .assert()
        .success();
}

fn add_taxi(dir: &TempDir) -> String {
    let output = gastos(dir)
        .args([
            "expense", "add", "-d", "Taxi", "-c", "600-500-140", "-a", "15.50", "--date",
            "2025-01-10",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Added expense: "))
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn test_init_writes_settings() {
    let dir = TempDir::new().unwrap();

    gastos(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
}

#[test]
fn test_init_supabase_needs_url() {
    let dir = TempDir::new().unwrap();

    gastos(&dir)
        .args(["init", "--backend", "supabase"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url"));
}

#[test]
fn test_add_without_budget_is_refused() {
    let dir = TempDir::new().unwrap();

    gastos(&dir)
        .args([
            "expense", "add", "-d", "Taxi", "-c", "600-500-140", "-a", "15.50", "--date",
            "2025-01-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No budget set"));
}

#[test]
fn test_zero_budget_closes_entry() {
    let dir = TempDir::new().unwrap();

    gastos(&dir)
        .args(["budget", "set", "0", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("closed"));

    gastos(&dir)
        .args([
            "expense", "add", "-d", "Taxi", "-c", "600-500-140", "-a", "15.50", "--date",
            "2025-01-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zero"));
}

#[test]
fn test_add_and_list_expense() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);

    gastos(&dir)
        .args([
            "expense", "add", "-d", "Taxi", "-c", "600-500-140", "-a", "15.50", "--date",
            "2025-01-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("₡15.50"))
        .stdout(predicate::str::contains("DDI---"));

    gastos(&dir)
        .args(["expense", "list", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxi"))
        .stdout(predicate::str::contains("1 expense(s)"));

    // Other months stay empty
    gastos(&dir)
        .args(["expense", "list", "--month", "2025-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found"));
}

#[test]
fn test_add_validation_errors() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);

    gastos(&dir)
        .args([
            "expense", "add", "-d", "  ", "-c", "600-500-140", "-a", "15.50", "--date",
            "2025-01-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Description is required"));

    gastos(&dir)
        .args([
            "expense", "add", "-d", "Taxi", "-c", "600-500-140", "-a", "abc", "--date",
            "2025-01-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a number"));

    gastos(&dir)
        .args(["expense", "list", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found"));
}

#[test]
fn test_list_filters_by_cost_center() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);
    add_taxi(&dir);

    gastos(&dir)
        .args([
            "expense", "add", "-d", "Papel", "-c", "600-600-300", "-a", "4", "--date",
            "2025-01-12",
        ])
        .assert()
        .success();

    gastos(&dir)
        .args([
            "expense",
            "list",
            "--month",
            "2025-01",
            "--cost-center",
            "600-600-300",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Papel"))
        .stdout(predicate::str::contains("Taxi").not());
}

#[test]
fn test_delete_requires_force() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);
    let id = add_taxi(&dir);

    gastos(&dir)
        .args(["expense", "delete", &id, "--month", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force"));

    gastos(&dir)
        .args(["expense", "delete", &id, "--month", "2025-01", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted expense"));

    gastos(&dir)
        .args(["expense", "list", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found"));
}

#[test]
fn test_edit_expense() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);
    let id = add_taxi(&dir);

    gastos(&dir)
        .args(["expense", "edit", &id, "--month", "2025-01", "-a", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₡20.00"));

    gastos(&dir)
        .args(["expense", "show", &id, "--month", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₡20.00"));
}

#[test]
fn test_receipt_round_trip() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);

    let image = dir.path().join("ticket.jpg");
    let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
    std::fs::write(&image, bytes).unwrap();

    let output = gastos(&dir)
        .args([
            "expense", "add", "-d", "Taxi", "-c", "600-500-140", "-a", "15.50", "--date",
            "2025-01-10", "--receipt",
        ])
        .arg(&image)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Receipt:     uploaded"));
    let id = stdout
        .lines()
        .find_map(|line| line.strip_prefix("Added expense: "))
        .unwrap()
        .trim()
        .to_string();

    let saved = dir.path().join("saved.jpg");
    gastos(&dir)
        .args(["expense", "receipt", &id, "--month", "2025-01", "--output"])
        .arg(&saved)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved receipt"));

    assert_eq!(std::fs::read(&saved).unwrap(), bytes);
}

#[test]
fn test_non_jpeg_receipt_is_rejected() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);

    let image = dir.path().join("ticket.png");
    std::fs::write(&image, b"\x89PNG").unwrap();

    gastos(&dir)
        .args([
            "expense", "add", "-d", "Taxi", "-c", "600-500-140", "-a", "15.50", "--date",
            "2025-01-10", "--receipt",
        ])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JPEG"));
}

#[test]
fn test_summary_shows_totals() {
    let dir = TempDir::new().unwrap();
    open_january(&dir);
    add_taxi(&dir);

    gastos(&dir)
        .args(["summary", "--month", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₡15.50"))
        .stdout(predicate::str::contains("600-500-140"));
}

#[test]
fn test_cost_center_list_has_defaults() {
    let dir = TempDir::new().unwrap();

    gastos(&dir)
        .args(["cost-center", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("600-500-140"));
}

#[test]
fn test_out_of_range_month_is_rejected() {
    let dir = TempDir::new().unwrap();

    gastos(&dir)
        .args(["expense", "list", "--month", "262142-12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of the supported date range"));
}
