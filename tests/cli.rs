use assert_cmd::Command;
use predicates::prelude::*;

fn hearth(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("hearth").unwrap();
    // Keep settings and data inside the test sandbox.
    cmd.env("HOME", home);
    cmd
}

#[test]
fn test_init_import_and_month_summary() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = home.path().join("ledger");

    hearth(home.path())
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized ledger"));

    let csv_path = home.path().join("dara-bank-march.csv");
    std::fs::write(
        &csv_path,
        "Date,Transaction Type,Description,Debit,Credit\n\
         3/5/2024,DEBIT,SHELL GAS #123,45.00,\n\
         3/6/2024,CREDIT,DIRECT DEP PAYROLL,,2500.00\n\
         3/7/2024,DEBIT,CREDIT CRD EPAY,500.00,\n",
    )
    .unwrap();

    hearth(home.path())
        .arg("import")
        .arg(&csv_path)
        .args(["--account", "Dara Bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 imported"));

    // Importing the same file again is a no-op.
    hearth(home.path())
        .arg("import")
        .arg(&csv_path)
        .args(["--account", "Dara Bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 imported"));

    hearth(home.path())
        .args(["month", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Automotive"))
        .stdout(predicate::str::contains("Credit card payments"));

    hearth(home.path())
        .arg("accounts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dara Bank"));
}

#[test]
fn test_unrecognized_csv_warns_instead_of_failing() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = home.path().join("ledger");
    hearth(home.path())
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success();

    let csv_path = home.path().join("odd.csv");
    std::fs::write(&csv_path, "Col1,Col2\nfoo,bar\n").unwrap();

    hearth(home.path())
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unrecognized CSV layout"));
}

#[test]
fn test_invalid_override_type_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = home.path().join("ledger");
    hearth(home.path())
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success();

    hearth(home.path())
        .args(["override", "apply", "abc123", "--type", "delete"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid override type"));
}

#[test]
fn test_categories_lists_catalog() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = home.path().join("ledger");
    hearth(home.path())
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success();

    hearth(home.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transfers"))
        .stdout(predicate::str::contains("Groceries"));
}
