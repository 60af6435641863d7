use std::fs;
use std::path::Path;

use slotframe_core::{
    compute_metrics, get_intent_labels, get_slot_labels, multi_compute_metrics,
    multilabel2one_hot, read_file, IntentIds, LabelVocab, TaskConfig,
};

const GOLD: &str = "\
show O
flights O
from O
boston B-fromloc.city_name
to O
denver B-toloc.city_name
atis/atis_flight

what O
is O
the O
fare O
to O
new B-toloc.city_name
york I-toloc.city_name
atis_airfare

list O
airlines O
atis_airline
";

const PRED: &str = "\
show O
flights O
from O
boston B-fromloc.city_name
to O
denver B-toloc.city_name
atis_flight

what O
is O
the O
fare O
to O
new B-toloc.city_name
york O
atis_airfare

list O
airlines O
atis_flight
";

fn setup_task(root: &Path) -> TaskConfig {
    let task_dir = root.join("atis");
    fs::create_dir_all(&task_dir).unwrap();
    fs::write(
        task_dir.join("intent_label.txt"),
        "UNK\natis_flight\natis_airfare\natis_airline\n",
    )
    .unwrap();
    fs::write(
        task_dir.join("slot_label.txt"),
        "PAD\nUNK\nO\nB-fromloc.city_name\nB-toloc.city_name\nI-toloc.city_name\n",
    )
    .unwrap();
    fs::write(task_dir.join("test.txt"), GOLD).unwrap();
    fs::write(task_dir.join("pred.txt"), PRED).unwrap();

    TaskConfig::new("atis").with_data_dir(root)
}

#[test]
fn single_intent_evaluation_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup_task(dir.path());

    let intent_vocab = LabelVocab::new(get_intent_labels(&cfg).unwrap());
    let slot_vocab = LabelVocab::new(get_slot_labels(&cfg).unwrap());
    assert_eq!(intent_vocab.len(), 4);
    assert_eq!(slot_vocab.id_of("I-toloc.city_name"), Some(5));

    let gold = read_file(cfg.task_dir().join("test.txt")).unwrap();
    let pred = read_file(cfg.task_dir().join("pred.txt")).unwrap();
    assert_eq!(gold.len(), 3);
    assert_eq!(gold.intents[0], vec!["atis_flight"]);

    let to_ids = |intents: &[Vec<String>]| -> Vec<Option<usize>> {
        intents
            .iter()
            .map(|i| intent_vocab.id_of(&i[0]))
            .collect()
    };
    let intent_labels = to_ids(&gold.intents);
    let intent_preds = to_ids(&pred.intents);

    let metrics = compute_metrics(&intent_preds, &intent_labels, &pred.slots, &gold.slots).unwrap();

    assert!((metrics.get("intent_acc").unwrap() - 2.0 / 3.0).abs() < 1e-9);
    // gold: 3 entities, pred: 3 entities, 2 shared
    assert!((metrics.get("slot_precision").unwrap() - 2.0 / 3.0).abs() < 1e-6);
    assert!((metrics.get("slot_recall").unwrap() - 2.0 / 3.0).abs() < 1e-6);
    assert!((metrics.get("sementic_frame_acc").unwrap() - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn multi_intent_evaluation() {
    let gold_text = "fare O\nand O\nflights O\natis_airfare#atis_flight\nhi O\natis_greeting\n";
    let pred_text = "fare O\nand O\nflights O\natis_airfare#atis_flight\nhi O\natis_flight\n";

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("gold.txt"), gold_text).unwrap();
    fs::write(dir.path().join("pred.txt"), pred_text).unwrap();

    let gold = read_file(dir.path().join("gold.txt")).unwrap().split_multi_intents('#');
    let pred = read_file(dir.path().join("pred.txt")).unwrap().split_multi_intents('#');

    let vocab = LabelVocab::new(
        ["atis_airfare", "atis_flight", "atis_greeting"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    let multi_hot = |intents: &[Vec<String>]| -> Vec<Vec<f32>> {
        intents
            .iter()
            .map(|names| {
                let ids: Vec<usize> = names.iter().filter_map(|n| vocab.id_of(n)).collect();
                multilabel2one_hot(&IntentIds::from(ids), vocab.len())
            })
            .collect()
    };

    let metrics = multi_compute_metrics(
        &multi_hot(&pred.intents),
        &multi_hot(&gold.intents),
        &pred.slots,
        &gold.slots,
        &pred.intents,
        &gold.intents,
    )
    .unwrap();

    assert_eq!(metrics.get("intent_precision"), Some(0.5));
    assert_eq!(metrics.get("sementic_frame_acc"), Some(0.5));
    // airfare: 1.0, flight: tp1 fp1 -> 2/3, greeting: fn1 -> 0
    let expected_f1 = (1.0 + 2.0 / 3.0 + 0.0) / 3.0;
    assert!((metrics.get("intent_f1").unwrap() - expected_f1).abs() < 1e-9);
}
