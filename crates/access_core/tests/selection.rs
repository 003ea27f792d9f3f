use access_core::{can_submit, DocumentHandle, InputSelection, Stage, Submission};

fn doc(name: &str) -> DocumentHandle {
    DocumentHandle::new(name, b"%PDF-1.7".to_vec())
}

enum Step {
    Document(&'static str),
    Url(&'static str),
}

fn assert_exclusive(selection: &InputSelection) {
    let has_document = selection.document().is_some();
    let has_url = !selection.source_url().is_empty();
    assert!(!(has_document && has_url), "both inputs set: {selection:?}");
}

#[test]
fn setting_either_input_clears_the_other() {
    let steps = [
        Step::Document("a.pdf"),
        Step::Url("https://example.com"),
        Step::Url("https://example.org"),
        Step::Document("b.txt"),
        Step::Document("c.pdf"),
        Step::Url(""),
        Step::Document("d.pdf"),
        Step::Url("   "),
    ];

    let mut selection = InputSelection::new();
    for step in steps {
        match step {
            Step::Document(name) => {
                selection.set_document(doc(name));
                assert_eq!(selection.document().map(DocumentHandle::filename), Some(name));
                assert_eq!(selection.source_url(), "");
            }
            Step::Url(text) => {
                selection.set_source_url(text);
                assert!(selection.document().is_none());
                assert_eq!(selection.source_url(), text);
            }
        }
        assert_exclusive(&selection);
    }
}

#[test]
fn empty_selection_is_valid_but_not_submittable() {
    let selection = InputSelection::new();
    assert!(selection.document().is_none());
    assert_eq!(selection.source_url(), "");
    assert!(!can_submit(&selection, Stage::Idle));
}

#[test]
fn guard_refuses_every_busy_stage() {
    let mut selection = InputSelection::new();
    selection.set_source_url("https://en.wikipedia.org/wiki/Law");

    assert!(can_submit(&selection, Stage::Idle));
    assert!(!can_submit(&selection, Stage::Extracting));
    assert!(!can_submit(&selection, Stage::AiProcessing));
}

#[test]
fn document_submission_carries_the_handle() {
    let mut selection = InputSelection::new();
    selection.set_source_url("https://example.com");
    selection.set_document(doc("paper.pdf"));

    match selection.submission() {
        Some(Submission::Document(handle)) => {
            assert_eq!(handle.filename(), "paper.pdf");
            assert_eq!(handle.content(), b"%PDF-1.7");
        }
        other => panic!("expected document submission, got {other:?}"),
    }
}
