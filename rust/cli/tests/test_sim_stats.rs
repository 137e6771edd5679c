use lastturn_cli::run;
use lastturn_engine::logger::MatchRecord;
use std::fs;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(args.iter().copied(), &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn sim_writes_one_record_per_match() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs").join("sim.jsonl");
    let path_str = path.to_string_lossy().to_string();

    let (code, out, _err) = run_cli(&[
        "lastturn", "sim", "--matches", "4", "--seed", "11", "--output", &path_str,
    ]);
    assert_eq!(code, 0);
    assert!(out.contains(&format!("Saved 4 records to {}", path_str)));

    let content = fs::read_to_string(&path).unwrap();
    let records: Vec<MatchRecord> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 4);
    for (i, rec) in records.iter().enumerate() {
        assert_eq!(rec.seed, Some(11 + i as u64));
        assert!(rec.played_at.is_some());
        assert!(rec.match_id.ends_with(&format!("-{:06}", i + 1)));
    }
}

#[test]
fn stats_aggregates_sim_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.jsonl");
    let path_str = path.to_string_lossy().to_string();
    let (code, _, _) = run_cli(&[
        "lastturn", "sim", "--matches", "6", "--seed", "3", "--output", &path_str,
    ]);
    assert_eq!(code, 0);

    let (code, out, err) = run_cli(&["lastturn", "stats", "--input", &path_str]);
    assert_eq!(code, 0, "stderr: {err}");
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["matches"], 6);
    let outcomes = &json["outcomes"];
    let sum = outcomes["VICTORY"].as_u64().unwrap()
        + outcomes["DEFEAT"].as_u64().unwrap()
        + outcomes["DRAW"].as_u64().unwrap();
    assert_eq!(sum, 6);
    assert_eq!(json["corrupted"], 0);
}

#[test]
fn stats_skips_corrupted_lines_in_directories() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.jsonl");
    let good_str = good.to_string_lossy().to_string();
    let (code, _, _) = run_cli(&[
        "lastturn", "sim", "--matches", "2", "--seed", "5", "--output", &good_str,
    ]);
    assert_eq!(code, 0);
    fs::write(dir.path().join("bad.jsonl"), "{not json}\n").unwrap();

    let dir_str = dir.path().to_string_lossy().to_string();
    let (code, out, err) = run_cli(&["lastturn", "stats", "--input", &dir_str]);
    assert_eq!(code, 0);
    assert!(err.contains("Skipped 1 corrupted record(s)"));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["matches"], 2);
    assert_eq!(json["corrupted"], 1);
}

#[test]
fn stats_fails_on_a_file_without_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.jsonl");
    fs::write(&path, "garbage\n{\"match_id\": 1}\n").unwrap();

    let (code, _out, err) = run_cli(&["lastturn", "stats", "--input", &path.to_string_lossy()]);
    assert_eq!(code, 2);
    assert!(err.contains("Invalid record"));
}

#[test]
fn stats_reports_missing_input() {
    let (code, _out, err) = run_cli(&["lastturn", "stats", "--input", "/nonexistent/x.jsonl"]);
    assert_eq!(code, 2);
    assert!(err.contains("Failed to read"));
}

#[test]
fn stats_can_count_a_single_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.jsonl");
    let path_str = path.to_string_lossy().to_string();
    let (code, _, _) = run_cli(&[
        "lastturn", "sim", "--matches", "6", "--seed", "3", "--output", &path_str,
    ]);
    assert_eq!(code, 0);

    let (_, all, _) = run_cli(&["lastturn", "stats", "--input", &path_str]);
    let all: serde_json::Value = serde_json::from_str(&all).unwrap();
    let victories = all["outcomes"]["VICTORY"].as_u64().unwrap();

    let (code, out, err) = run_cli(&[
        "lastturn", "stats", "--input", &path_str, "--outcome", "victory",
    ]);
    assert_eq!(code, 0, "stderr: {err}");
    let only: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(only["matches"].as_u64().unwrap(), victories);
    assert_eq!(only["outcomes"]["DEFEAT"], 0);
    assert_eq!(only["outcomes"]["DRAW"], 0);

    let (code, _, _) = run_cli(&["lastturn", "stats", "--input", &path_str, "--outcome", "won"]);
    assert_eq!(code, 2);
}
