//! Common test utilities and helpers

use std::fs;
use std::path::{Path, PathBuf};
use tabrecon::{Dataset, Result, Value};
use tempfile::TempDir;

/// Build an in-memory dataset, panicking on malformed test input
pub fn dataset(name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Dataset {
    Dataset::from_rows(name, columns, rows).expect("test dataset should be valid")
}

/// `id`/`name` dataset; `None` names are missing values
pub fn people(name: &str, rows: &[(i64, Option<&str>)]) -> Dataset {
    dataset(
        name,
        &["id", "name"],
        rows.iter()
            .map(|(id, n)| vec![Value::from(*id), Value::from(*n)])
            .collect(),
    )
}

/// Test fixture manager for creating temporary input files
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create a test CSV file from rows of cells
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> Result<PathBuf> {
        let path = self.path(name);
        let mut content = String::new();

        for row in data {
            content.push_str(&row.join(","));
            content.push('\n');
        }

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a test file with raw string content
    pub fn create_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a test JSON file with sample data
    pub fn create_json(&self, name: &str, data: &serde_json::Value) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, serde_json::to_string_pretty(data)?)?;
        Ok(path)
    }

    /// Create a keyed CSV with `rows` rows; every `modify_every`th row gets
    /// a different amount when `variant` is true
    pub fn create_large_csv(
        &self,
        name: &str,
        rows: usize,
        modify_every: usize,
        variant: bool,
    ) -> Result<PathBuf> {
        let path = self.path(name);
        let mut content = String::from("id,label,amount\n");

        for i in 0..rows {
            let amount = if variant && i % modify_every == 0 { i * 10 + 1 } else { i * 10 };
            content.push_str(&format!("{},label_{},{}\n", i, i, amount));
        }

        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run a tabrecon command with the fixture root as working directory
    pub fn run_command(&self, args: &[&str]) -> Result<()> {
        use clap::Parser;
        use tabrecon::cli::Cli;
        use tabrecon::commands::execute_command;

        let mut cmd_args = vec!["tabrecon"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| tabrecon::TabreconError::invalid_input(e.to_string()))?;

        let dir = cli.dir.as_deref().or(Some(self.fixture.root()));
        execute_command(cli.command, cli.config.as_deref(), dir)
    }

    pub fn expect_success(&self, args: &[&str]) {
        self.run_command(args).expect("Command should succeed");
    }

    pub fn expect_failure(&self, args: &[&str]) -> tabrecon::TabreconError {
        self.run_command(args).expect_err("Command should fail")
    }

    /// Run `compare` writing JSON to a file and return the parsed report
    pub fn compare_json(&self, left: &str, right: &str, extra: &[&str]) -> serde_json::Value {
        let output = self.fixture.path("result.json");
        let mut args = vec![
            "compare",
            left,
            right,
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ];
        args.extend(extra);
        self.expect_success(&args);

        let content = fs::read_to_string(&output).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

/// Sample data generators for testing
pub mod sample_data {
    pub fn baseline_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price"],
            vec!["1", "Apple", "1.50"],
            vec!["2", "Banana", "0.75"],
            vec!["3", "Cherry", "2.00"],
        ]
    }

    pub fn updated_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price"],
            vec!["1", "Apple", "1.60"], // Price changed
            vec!["2", "Banana", "0.75"],
            vec!["4", "Date", "3.00"], // New row, Cherry removed
        ]
    }

    pub fn extra_column_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price", "category"],
            vec!["1", "Apple", "1.50", "Fruit"],
            vec!["2", "Banana", "0.75", ""],
            vec!["3", "Cherry", "2.00", "Fruit"],
        ]
    }
}

/// Assertion helpers for test validation
pub mod assertions {
    use std::path::Path;

    pub fn assert_file_exists_and_not_empty(path: &Path) {
        assert!(path.exists(), "File should exist: {}", path.display());
        let metadata = std::fs::metadata(path).expect("Should be able to read file metadata");
        assert!(metadata.len() > 0, "File should not be empty: {}", path.display());
    }

    /// Assert the summary block of a JSON report
    pub fn assert_summary(
        report: &serde_json::Value,
        added: u64,
        deleted: u64,
        modified: u64,
        unchanged: u64,
    ) {
        let summary = &report["summary"];
        assert_eq!(summary["added"], added, "added count");
        assert_eq!(summary["deleted"], deleted, "deleted count");
        assert_eq!(summary["modified"], modified, "modified count");
        assert_eq!(summary["unchanged"], unchanged, "unchanged count");
    }
}
