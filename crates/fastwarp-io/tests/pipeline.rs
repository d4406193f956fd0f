//! End-to-end integration tests: CSV -> align -> JSON -> deserialize.

use std::fs;
use std::io::Write;

use fastwarp_dtw::{Euclidean, FastDtw};
use fastwarp_io::{AlignmentWriter, ExperimentName, SequenceReader};
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn align_round_trip() {
    let dir = TempDir::new().unwrap();

    // 1. Write two sequence CSVs with a shared shape, one time-shifted
    let left_csv: String = std::iter::once("time,angle\n".to_string())
        .chain((0..24).map(|i| format!("{},{}\n", i, f64::from(i % 8))))
        .collect();
    let right_csv: String = std::iter::once("time,angle\n".to_string())
        .chain((0..20).map(|i| format!("{},{}\n", i, f64::from((i + 2) % 8))))
        .collect();
    let left_path = write_csv(&dir, "left.csv", &left_csv);
    let right_path = write_csv(&dir, "right.csv", &right_csv);

    // 2. Read both
    let left = SequenceReader::new(&left_path).read().expect("left should parse");
    let right = SequenceReader::new(&right_path).read().expect("right should parse");
    assert_eq!(left.name, "left");
    assert_eq!(right.name, "right");
    assert_eq!(left.sequence.len(), 24);
    assert_eq!(right.sequence.len(), 20);

    // 3. Align
    let alignment = FastDtw::new(1)
        .align(left.sequence.as_view(), right.sequence.as_view(), &Euclidean)
        .unwrap();

    // 4. Write JSON artifact
    let experiment = ExperimentName::new("align_rt".into()).unwrap();
    let writer = AlignmentWriter::new(dir.path(), experiment).unwrap();
    writer
        .write_alignment(&left.name, &right.name, 1, &alignment)
        .unwrap();

    // 5. Deserialize back and verify
    let json_path = dir.path().join("align_rt_alignment.json");
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();

    assert_eq!(content["experiment"], "align_rt");
    assert_eq!(content["left"], "left");
    assert_eq!(content["right"], "right");
    assert!((content["cost"].as_f64().unwrap() - alignment.cost().value()).abs() < 1e-12);

    let path = content["path"].as_array().unwrap();
    assert_eq!(path.len(), alignment.path().len());
    // Endpoints span the full matrix
    assert_eq!(path.first().unwrap().as_array().unwrap()[0], 0);
    assert_eq!(path.first().unwrap().as_array().unwrap()[1], 0);
    assert_eq!(path.last().unwrap().as_array().unwrap()[0], 23);
    assert_eq!(path.last().unwrap().as_array().unwrap()[1], 19);
}

#[test]
fn pairwise_round_trip() {
    let dir = TempDir::new().unwrap();

    let mut names = Vec::new();
    let mut sequences = Vec::new();
    for (idx, offset) in [0.0, 0.5, 4.0].iter().enumerate() {
        let csv: String = std::iter::once("time,v\n".to_string())
            .chain((0..12).map(|i| format!("{},{}\n", i, f64::from(i % 4) + offset)))
            .collect();
        let path = write_csv(&dir, &format!("seq{idx}.csv"), &csv);
        let loaded = SequenceReader::new(&path).read().unwrap();
        names.push(loaded.name);
        sequences.push(loaded.sequence);
    }

    let matrix = FastDtw::new(1).pairwise(&sequences, &Euclidean).unwrap();
    let experiment = ExperimentName::new("pw_rt".into()).unwrap();
    let writer = AlignmentWriter::new(dir.path(), experiment).unwrap();
    writer.write_pairwise(&names, 1, &matrix).unwrap();

    let json_path = dir.path().join("pw_rt_pairwise.json");
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();

    assert_eq!(content["n_sequences"], 3);
    assert_eq!(content["names"].as_array().unwrap().len(), 3);
    let costs = content["costs"].as_array().unwrap();
    // The two near-identical sequences are closer to each other than to the
    // offset one.
    let near = costs[0][1].as_f64().unwrap();
    let far = costs[0][2].as_f64().unwrap();
    assert!(near < far, "expected {near} < {far}");
}
