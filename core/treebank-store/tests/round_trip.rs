use pretty_assertions::assert_eq;
use proptest::prelude::*;
use treebank_parser::parse_sentence;
use treebank_store::{DiagnosticKind, LoadOptions, TreebankStore};

const TWO_SENTENCES: &str = "\
# sent_id = weblog-1
# text = What if Google Morphed Into GoogleOS?
1\tWhat\twhat\tPRON\tWP\tPronType=Int\t0\troot\t_\t_
2\tif\tif\tSCONJ\tIN\t_\t4\tmark\t_\t_
3\tGoogle\tGoogle\tPROPN\tNNP\tNumber=Sing\t4\tnsubj\t_\t_
4\tMorphed\tmorph\tVERB\tVBD\tMood=Ind|Tense=Past|VerbForm=Fin\t1\tadvcl\t_\t_
5\tInto\tinto\tADP\tIN\t_\t6\tcase\t_\t_
6\tGoogleOS\tGoogleOS\tPROPN\tNNP\tNumber=Sing\t4\tobl\t_\tSpaceAfter=No
7\t?\t?\tPUNCT\t.\t_\t4\tpunct\t_\t_

# sent_id = es-2
# text = Vámonos al mar.
# translit = vamonos al mar
1-2\tVámonos\t_\t_\t_\t_\t_\t_\t_\t_
1\tVamos\tir\tVERB\t_\tMood=Imp|Number=Plur|Person=1\t0\troot\t_\t_
2\tnos\tnosotros\tPRON\t_\tCase=Acc|Number=Plur|Person=1\t1\tobj\t_\t_
3-4\tal\t_\t_\t_\t_\t_\t_\t_\tSpaceAfter=No
3\ta\ta\tADP\t_\t_\t5\tcase\t_\t_
4\tel\tel\tDET\t_\tDefinite=Def\t5\tdet\t_\t_
5\tmar\tmar\tNOUN\t_\tNumber=Sing\t1\tobl\t_\t_
6\t.\t.\tPUNCT\t_\t_\t1\tpunct\t_\t_

";

#[test]
fn load_then_save_reproduces_canonical_text() {
    let mut store = TreebankStore::new("UD_Mixed");
    let report = store.load(TWO_SENTENCES);

    assert_eq!(report.loaded, 2);
    assert!(report.diagnostics.is_empty());
    assert_eq!(store.save(), TWO_SENTENCES);
}

#[test]
fn root_head_round_trips_as_zero() {
    let mut store = TreebankStore::new("t");
    store.load(TWO_SENTENCES);
    let sentence = store.get("weblog-1").unwrap();
    let root = sentence.token("1").unwrap();

    assert_eq!(root.head(), None);
    assert!(sentence.to_string().contains("\n1\tWhat\twhat\tPRON\tWP\tPronType=Int\t0\troot\t_\t_\n"));
}

#[test]
fn multiword_span_always_writes_sentinel_head() {
    let mut store = TreebankStore::new("t");
    store.load(TWO_SENTENCES);
    let sentence = store.get("es-2").unwrap();

    let line = sentence
        .to_string()
        .lines()
        .find(|line| line.starts_with("3-4\t"))
        .map(str::to_string)
        .unwrap();
    assert_eq!(line.split('\t').nth(6), Some("_"));
}

#[test]
fn invalid_id_block_contributes_nothing() {
    let raw = format!("{TWO_SENTENCES}# sent_id = broken\nabc\tx\tx\t_\t_\t_\t0\troot\t_\t_\n");
    let mut store = TreebankStore::new("t");
    let report = store.load(&raw);

    assert_eq!(store.len(), 2);
    assert_eq!(store.get("broken"), None);
    assert_eq!(report.diagnostics.len(), 1);

    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::InvalidTokenId);
    assert_eq!(diagnostic.raw, "abc");
    assert_eq!(diagnostic.sent_id.as_deref(), Some("broken"));
}

#[test]
fn features_are_written_in_key_order() {
    let mut store = TreebankStore::new("t");
    store.load("# sent_id = f\n1\tdog\tdog\tNOUN\t_\tNumber=Sing|Case=Nom\t0\troot\t_\t_\n");

    let written = store.save();
    assert!(written.contains("\tCase=Nom|Number=Sing\t"));
}

#[test]
fn duplicate_sent_id_keeps_second_block() {
    let raw = "# sent_id = dup\n1\tfirst\tfirst\t_\t_\t_\t0\troot\t_\t_\n\n\
               # sent_id = dup\n1\tsecond\tsecond\t_\t_\t_\t0\troot\t_\t_\n";
    let mut store = TreebankStore::new("t");
    store.load(raw);

    assert_eq!(store.len(), 1);
    let expected = parse_sentence("# sent_id = dup\n1\tsecond\tsecond\t_\t_\t_\t0\troot\t_\t_\n")
        .unwrap()
        .sentence;
    assert_eq!(store.get("dup"), Some(&expected));
}

#[test]
fn malformed_feature_pair_keeps_the_token() {
    let mut store = TreebankStore::new("t");
    let report = store.load("# sent_id = m\n1\tdog\tdog\tNOUN\tNN\tCase=Nom|BadPair\t0\troot\t_\t_\n");

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MalformedFeaturePair);

    let token = store.get("m").unwrap().token("1").unwrap();
    assert_eq!(token.feats.as_ref().map(|f| f.len()), Some(1));
    assert_eq!(token.xpos.as_deref(), Some("NN"));
}

#[test]
fn saved_text_reloads_to_the_same_store() {
    let mut first = TreebankStore::new("t");
    first.load("# sent_id = a\n1\tx\tx\t_\t_\tB=2|A=1\t2\tdep\t_\t_\n2\ty\ty\t_\t_\t_\t0\troot\t_\t_\n");

    let mut second = TreebankStore::new("t");
    second.load(&first.save());

    assert_eq!(second.get("a"), first.get("a"));
    assert_eq!(second.save(), first.save());
}

proptest! {
    #[test]
    fn load_order_wins_regardless_of_parallelism(ids in proptest::collection::vec(0u8..6, 1..40)) {
        let raw: String = ids
            .iter()
            .enumerate()
            .map(|(i, id)| format!("# sent_id = s{id}\n1\tw{i}\tw\t_\t_\t_\t0\troot\t_\t_\n\n"))
            .collect();

        let mut sequential = TreebankStore::new("t");
        sequential.load_with(&raw, &LoadOptions::sequential());

        let mut parallel = TreebankStore::new("t");
        parallel.load_with(&raw, &LoadOptions { parallel: true, min_parallel_blocks: 1 });

        prop_assert_eq!(sequential.save(), parallel.save());
    }
}
