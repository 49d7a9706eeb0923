//! Integration tests for Squashbench
//!
//! These tests verify the end-to-end behavior of a sweep with in-process codecs.

use squashbench::{
    BenchError, Codec, CodecError, Corpus, DirectorySource, ExecutionConfig, Executor, Invocation,
    JsonFileSink, Level, MemorySink, Sample, SampleCategory, run_sweep,
};
use std::cell::Cell;
use std::time::Duration;

/// Stores every other byte; decompression doubles each byte back.
/// Lossless only for payloads made of repeated byte pairs.
struct HalvingCodec {
    levels: Vec<Level>,
}

impl Codec for HalvingCodec {
    fn name(&self) -> &str {
        "halving"
    }
    fn levels(&self) -> Vec<Level> {
        self.levels.clone()
    }
    fn compress(&self, payload: &[u8], level: Level) -> Result<Invocation, CodecError> {
        Ok(Invocation {
            output: payload.iter().step_by(2).copied().collect(),
            cpu_time: Duration::from_micros(100 * u64::from(level)),
        })
    }
    fn decompress(&self, compressed: &[u8]) -> Result<Invocation, CodecError> {
        Ok(Invocation {
            output: compressed.iter().flat_map(|&b| [b, b]).collect(),
            cpu_time: Duration::ZERO,
        })
    }
}

/// Flips the last byte on decompression.
struct CorruptingCodec;

impl Codec for CorruptingCodec {
    fn name(&self) -> &str {
        "corrupting"
    }
    fn levels(&self) -> Vec<Level> {
        vec![1]
    }
    fn compress(&self, payload: &[u8], _level: Level) -> Result<Invocation, CodecError> {
        Ok(Invocation {
            output: payload.to_vec(),
            cpu_time: Duration::ZERO,
        })
    }
    fn decompress(&self, compressed: &[u8]) -> Result<Invocation, CodecError> {
        let mut output = compressed.to_vec();
        if let Some(last) = output.last_mut() {
            *last ^= 0xff;
        }
        Ok(Invocation {
            output,
            cpu_time: Duration::ZERO,
        })
    }
}

/// Appends one more trailing marker byte on every call.
struct GrowingCodec {
    calls: Cell<usize>,
}

impl Codec for GrowingCodec {
    fn name(&self) -> &str {
        "growing"
    }
    fn levels(&self) -> Vec<Level> {
        vec![4]
    }
    fn compress(&self, payload: &[u8], _level: Level) -> Result<Invocation, CodecError> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        let mut output = payload.to_vec();
        output.extend(std::iter::repeat_n(0xAA, call));
        output.push(call as u8);
        Ok(Invocation {
            output,
            cpu_time: Duration::from_micros(50),
        })
    }
    fn decompress(&self, compressed: &[u8]) -> Result<Invocation, CodecError> {
        let markers = compressed[compressed.len() - 1] as usize;
        Ok(Invocation {
            output: compressed[..compressed.len() - 1 - markers].to_vec(),
            cpu_time: Duration::ZERO,
        })
    }
}

fn paired(len: usize, seed: u8) -> Vec<u8> {
    (0..len / 2)
        .flat_map(|i| {
            let b = seed.wrapping_add(i as u8);
            [b, b]
        })
        .collect()
}

fn executor(rounds: usize) -> Executor {
    Executor::new(ExecutionConfig {
        rounds,
        ..Default::default()
    })
    .unwrap()
}

/// Three single-instance categories through a size-halving codec
#[test]
fn test_sweep_records_raw_and_compressed_sizes() {
    let corpus = Corpus::from_payloads([
        ("battery", paired(10, 1)),
        ("humidity", paired(20, 2)),
        ("position", paired(30, 3)),
    ]);
    let codecs: Vec<Box<dyn Codec>> = vec![Box::new(HalvingCodec {
        levels: vec![1, 2, 3],
    })];
    let mut sink = MemorySink::default();

    let outcome = run_sweep(&executor(3), &corpus, &codecs, &mut sink, None).unwrap();

    assert_eq!(sink.documents.len(), 1);
    let doc: serde_json::Value = serde_json::from_str(&sink.documents[0]).unwrap();

    for (category, raw, compressed) in [("battery", 10, 5), ("humidity", 20, 10), ("position", 30, 15)] {
        assert_eq!(doc["sizes"][category]["raw"], raw as f64);
        for level in ["1", "2", "3"] {
            assert_eq!(doc["sizes"][category]["halving"][level], compressed as f64);
        }
        assert!(doc["times"][category].get("raw").is_none());
    }

    let level_three = doc["times"]["battery"]["halving"]["3"].as_f64().unwrap();
    assert!((level_three - 0.0003).abs() < 1e-9);
    assert!(outcome.warnings.is_empty());
}

/// Category order of the document follows the corpus, not alphabetical order
#[test]
fn test_document_preserves_category_order() {
    let corpus = Corpus::from_payloads([("temperature", paired(8, 9)), ("battery", paired(8, 4))]);
    let codecs: Vec<Box<dyn Codec>> = vec![Box::new(HalvingCodec { levels: vec![1] })];
    let mut sink = MemorySink::default();

    run_sweep(&executor(1), &corpus, &codecs, &mut sink, None).unwrap();

    let doc = &sink.documents[0];
    let temperature = doc.find("\"temperature\"").unwrap();
    let battery = doc.find("\"battery\"").unwrap();
    assert!(temperature < battery);
}

/// A lossy codec aborts the sweep and nothing reaches the sink
#[test]
fn test_round_trip_failure_aborts_without_report() {
    let corpus = Corpus::from_payloads([("image", vec![1, 2, 3, 4, 5])]);
    let codecs: Vec<Box<dyn Codec>> = vec![
        Box::new(HalvingCodec { levels: vec![1] }),
        Box::new(CorruptingCodec),
    ];
    let mut sink = MemorySink::default();

    let err = run_sweep(&executor(5), &corpus, &codecs, &mut sink, None).unwrap_err();

    // The halving codec already fails on this unpaired payload
    assert!(matches!(err, BenchError::RoundTrip { ref algorithm, .. } if algorithm == "halving"));
    assert!(sink.documents.is_empty());

    let codecs: Vec<Box<dyn Codec>> = vec![Box::new(CorruptingCodec)];
    let err = run_sweep(&executor(5), &corpus, &codecs, &mut sink, None).unwrap_err();
    assert!(err.to_string().contains("corrupting level 1"));
    assert!(sink.documents.is_empty());
}

/// Compressed size drifting between rounds is fatal
#[test]
fn test_nondeterministic_size_aborts() {
    let corpus = Corpus::from_payloads([("tempSensor", b"steady payload".to_vec())]);
    let codecs: Vec<Box<dyn Codec>> = vec![Box::new(GrowingCodec {
        calls: Cell::new(0),
    })];
    let mut sink = MemorySink::default();

    let err = run_sweep(&executor(5), &corpus, &codecs, &mut sink, None).unwrap_err();

    match err {
        BenchError::NonDeterministicSize {
            algorithm,
            level,
            sample,
            round,
            ..
        } => {
            assert_eq!(algorithm, "growing");
            assert_eq!(level, 4);
            assert_eq!(sample, "tempSensor");
            assert_eq!(round, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(sink.documents.is_empty());
}

/// Two instances of one category are averaged per level
#[test]
fn test_instances_are_averaged() {
    let corpus = Corpus::new(vec![SampleCategory {
        name: "detectedImages".to_string(),
        samples: vec![
            Sample::new("detectedImages0", paired(1000, 7)),
            Sample::new("detectedImages1", paired(2000, 8)),
        ],
    }]);
    let codecs: Vec<Box<dyn Codec>> = vec![Box::new(HalvingCodec { levels: vec![2] })];
    let mut sink = MemorySink::default();

    let outcome = run_sweep(&executor(2), &corpus, &codecs, &mut sink, None).unwrap();

    let category = outcome.report.table.category("detectedImages").unwrap();
    assert_eq!(category.raw_size, 1500.0);
    assert_eq!(category.instances, 2);
    assert_eq!(
        outcome.report.table.get("detectedImages", "halving", 2).unwrap().size,
        750.0
    );
}

/// Samples loaded from disk flow through to a JSON file on disk
#[test]
fn test_directory_corpus_to_json_file() {
    let data = tempfile::TempDir::new().unwrap();
    std::fs::write(data.path().join("temperature0.bin"), paired(40, 1)).unwrap();
    std::fs::write(data.path().join("temperature1.bin"), paired(60, 2)).unwrap();
    std::fs::write(data.path().join("image.bin"), paired(10, 3)).unwrap();

    let source = DirectorySource::new(data.path(), "bin");
    let names = vec!["temperature".to_string(), "image".to_string()];
    let corpus = Corpus::load(&source, &names).unwrap();

    let out = tempfile::TempDir::new().unwrap();
    let path = out.path().join("results").join("results.json");
    let mut sink = JsonFileSink::new(&path);
    let codecs: Vec<Box<dyn Codec>> = vec![Box::new(HalvingCodec { levels: vec![1] })];

    run_sweep(&executor(1), &corpus, &codecs, &mut sink, None).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["sizes"]["temperature"]["raw"], 50.0);
    assert_eq!(doc["sizes"]["temperature"]["halving"]["1"], 25.0);
    assert_eq!(doc["sizes"]["image"]["raw"], 10.0);
    assert!(doc.get("meta").is_none());
}
