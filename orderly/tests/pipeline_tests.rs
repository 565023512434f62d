use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// A private copy of the superstore demo project.
struct OrderlyTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl OrderlyTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("Workspace root not found")?
            .join("demos/superstore");

        let dest = tmp.path().join("superstore");
        Self::copy_dir(&project_root, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn copy_dir(src: &PathBuf, dst: &PathBuf) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.skip_exist = true;
        options.content_only = true;

        fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        // A stale local build of the demo must not leak into the copy
        let stale = dst.join("target");
        if stale.exists() {
            fs::remove_dir_all(stale)?;
        }
        Ok(())
    }

    fn orderly(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("orderly"));
        cmd.current_dir(&self.root);
        cmd.env_remove("ORDERLY_TARGET_PATH");
        cmd.env_remove("ORDERLY_INPUT");
        cmd
    }

    fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).with_context(|| format!("{} not generated", path.display()))
    }
}

#[test]
fn test_run_builds_star_schema() -> Result<()> {
    let env = OrderlyTestEnv::new()?;

    env.orderly()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    let geography = env.read("target/marts/DimGeography.csv")?;
    insta::assert_snapshot!(geography, @r"
    Country,City,State,Postal Code,Region,GeographyID
    United States,Henderson,Kentucky,42420,South,1
    United States,Los Angeles,California,90036,West,2
    United States,Los Angeles,California,90032,West,3
    United States,Seattle,Washington,98103,West,4
    United States,Madison,Wisconsin,53711,Central,5
    ");

    let audit = env.read("target/marts/audit.csv")?;
    insta::assert_snapshot!(audit, @r"
    Data Mart System Name,Count Rows,Count Distinct Primary Key,Count Distinct Row ID
    DimCustomer,5,5,
    DimProduct,7,7,
    DimGeography,5,5,
    FactOrders,7,5,7
    ");

    // Superseded extract of the same period is never read
    let facts = env.read("target/marts/FactOrders.csv")?;
    assert!(!facts.contains("CA-2021-999999"));
    assert!(facts.lines().skip(1).all(|l| !l.starts_with("4,") && !l.starts_with("5,")));
    assert!(facts.contains("CA-2021-152156"));
    assert!(!facts.contains("ca-2021-152156"));
    // "n/a" sales and an impossible ship date are nulls, so row 13 is excluded
    assert!(!facts.contains("CA-2021-143336"));
    assert!(!facts.contains("n/a"));
    Ok(())
}

#[test]
fn test_run_writes_quality_artifacts_and_result() -> Result<()> {
    let env = OrderlyTestEnv::new()?;
    env.orderly().arg("run").assert().success();

    let summary = env.read("target/quality/summary.csv")?;
    let types: Vec<&str> = summary
        .lines()
        .skip(1)
        .filter_map(|l| l.split(',').next())
        .collect();
    assert_eq!(
        types,
        vec![
            "Negative Quantity",
            "Negative Profit",
            "Invalid Discount",
            "Invalid Dates",
            "Exact Duplicates",
            "Duplicate Order Lines",
            "Missing Values",
            "Mixed Data Types"
        ]
    );

    let mixed = env.read("target/quality/mixed_data_types.csv")?;
    assert!(mixed.contains("Discount,\"float, str\""));
    assert!(!mixed.contains("Sales"));

    let failures = env.read("target/quality/parse_failures.csv")?;
    assert!(failures.contains("Ship Date,date,31/02/2021"));
    assert!(failures.contains("Discount,float,0.2%"));
    assert!(!failures.contains("n/a"));

    let issues: Vec<String> = walkdir::WalkDir::new(env.root.join("target/quality/issues"))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(issues.len(), 7);
    assert!(issues.contains(&"duplicate_order_lines.csv".to_string()));

    let result: serde_json::Value = serde_json::from_str(&env.read("target/run_result.json")?)?;
    assert_eq!(result["success"], true);
    assert_eq!(result["total_rows"], 15);
    assert_eq!(result["excluded_rows"], 8);
    assert_eq!(result["clean_rows"], 7);
    assert_eq!(result["flagged"]["duplicate_order_lines"], 4);
    assert_eq!(result["flagged"]["missing_values"], 2);
    assert_eq!(result["flagged"]["mixed_data_types"], 1);
    assert_eq!(result["parse_failures"], 2);
    Ok(())
}

#[test]
fn test_check_skips_the_mart() -> Result<()> {
    let env = OrderlyTestEnv::new()?;

    env.orderly()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("SME review"));

    assert!(env.root.join("target/quality/quality_report.csv").exists());
    assert!(!env.root.join("target/marts").exists());

    let result: serde_json::Value = serde_json::from_str(&env.read("target/run_result.json")?)?;
    assert_eq!(result["mode"], "check");
    assert!(result["clean_rows"].is_null());
    Ok(())
}

#[test]
fn test_missing_column_fails_with_schema_error() -> Result<()> {
    let env = OrderlyTestEnv::new()?;
    fs::write(
        env.root.join("data/manual_corrections.csv"),
        "Row ID,Order ID,Order Date\n100,CA-2021-1,2021-01-01\n",
    )?;

    env.orderly()
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("orderly::domain::schema")
                .and(predicate::str::contains("Ship Date"))
                .and(predicate::str::contains("manual_corrections.csv")),
        );

    assert!(!env.root.join("target/marts").exists());
    Ok(())
}

#[test]
fn test_inspect_prints_a_mart_table() -> Result<()> {
    let env = OrderlyTestEnv::new()?;
    env.orderly().arg("run").assert().success();

    env.orderly()
        .args(["inspect", "--table", "DimGeography", "--limit", "2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Henderson")
                .and(predicate::str::contains("Showing 2 of 5 row(s)"))
                .and(predicate::str::contains("Madison").not()),
        );

    env.orderly()
        .args(["inspect", "--table", "NoSuchTable"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_target_path_env_override() -> Result<()> {
    let env = OrderlyTestEnv::new()?;
    env.orderly()
        .arg("run")
        .env("ORDERLY_TARGET_PATH", "build")
        .assert()
        .success();

    assert!(env.root.join("build/marts/FactOrders.csv").exists());
    assert!(!env.root.join("target").exists());
    Ok(())
}

#[test]
fn test_clean_removes_target() -> Result<()> {
    let env = OrderlyTestEnv::new()?;
    env.orderly().arg("run").assert().success();
    assert!(env.root.join("target").exists());

    env.orderly()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Artifact removed"));

    assert!(!env.root.join("target").exists());
    assert!(env.root.join("data").exists());
    Ok(())
}
