use std::{fs, path::PathBuf};

use tempfile::tempdir;

use trellis_cli::{Args, run};

/// Collects all .md files from a directory
fn collect_md_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn demo_files() -> Vec<PathBuf> {
    // Demos are at workspace root, relative to workspace not the crate
    let demos_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos");
    collect_md_files(demos_path)
}

fn args_for(input: &PathBuf, output: &PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        mode: None,
        check: false,
        fmt: false,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_layout_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = demo_files();
    assert!(!demos.is_empty(), "No demo documents found in demos/");

    let mut failed = Vec::new();

    for demo_path in &demos {
        let output_filename = format!(
            "{}.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        let args = args_for(demo_path, &output_path);
        if let Err(e) = run(&args) {
            failed.push((demo_path.clone(), e));
            continue;
        }

        let json = fs::read_to_string(&output_path).expect("output file written");
        assert!(json.contains("\"nodes\""), "layout JSON has a nodes array");
    }

    if !failed.is_empty() {
        eprintln!("\nDemo documents that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo document(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_round_trip_check() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    for demo_path in demo_files() {
        let output_path = temp_dir.path().join("unused.json");
        let mut args = args_for(&demo_path, &output_path);
        args.check = true;

        run(&args).unwrap_or_else(|err| {
            panic!("round-trip check failed for {}: {err}", demo_path.display())
        });
        assert!(!output_path.exists(), "--check must not write output");
    }
}

#[test]
fn e2e_smoke_test_fmt_is_stable() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    for demo_path in demo_files() {
        let first_path = temp_dir.path().join("first.md");
        let mut args = args_for(&demo_path, &first_path);
        args.fmt = true;
        run(&args).expect("formatting a demo succeeds");

        // Formatting canonical output again must be a fixed point.
        let second_path = temp_dir.path().join("second.md");
        let mut args = args_for(&first_path, &second_path);
        args.fmt = true;
        run(&args).expect("re-formatting succeeds");

        let first = fs::read_to_string(&first_path).unwrap();
        let second = fs::read_to_string(&second_path).unwrap();
        assert_eq!(first, second, "canonical form drifted for {}", demo_path.display());
    }
}

#[test]
fn e2e_smoke_test_mode_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demo = demo_files().into_iter().next().expect("at least one demo");

    let output_path = temp_dir.path().join("horizontal.json");
    let mut args = args_for(&demo, &output_path);
    args.mode = Some("horizontal".to_string());
    run(&args).expect("layout with mode override succeeds");

    let json = fs::read_to_string(&output_path).unwrap();
    assert!(json.contains("\"mode\": \"horizontal\""));

    let mut args = args_for(&demo, &output_path);
    args.mode = Some("diagonal".to_string());
    assert!(run(&args).is_err(), "unknown mode is rejected");
}

#[test]
fn e2e_smoke_test_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("out.json");
    let missing = temp_dir.path().join("does-not-exist.md");

    let args = args_for(&missing, &output_path);
    assert!(run(&args).is_err());
}
