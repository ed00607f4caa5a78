use visionary_pipeline::segment;

fn texts(input: &str) -> Vec<String> {
    segment(input)
        .into_iter()
        .map(|unit| unit.text().clone())
        .collect()
}

#[test]
fn test_empty_input_has_no_units() {
    assert!(segment("").is_empty());
    assert!(segment(" \t\n ").is_empty());
}

#[test]
fn test_single_sentence() {
    assert_eq!(texts("Hi."), ["Hi."]);
}

#[test]
fn test_mixed_terminators() {
    assert_eq!(texts("A. B! C?"), ["A.", "B!", "C?"]);
}

#[test]
fn test_unterminated_tail_is_kept() {
    assert_eq!(
        texts("The door opened. Nobody was there"),
        ["The door opened.", "Nobody was there"]
    );
    assert_eq!(texts("just a fragment"), ["just a fragment"]);
}

#[test]
fn test_whitespace_runs_and_newlines_are_one_boundary() {
    assert_eq!(
        texts("  First line.\n\n   Second line!\tThird?  "),
        ["First line.", "Second line!", "Third?"]
    );
}

#[test]
fn test_punctuation_without_whitespace_does_not_split() {
    assert_eq!(texts("Pi is 3.14 today."), ["Pi is 3.14 today."]);
    assert_eq!(texts("Wait...what?"), ["Wait...what?"]);
}

#[test]
fn test_abbreviations_split_like_sentences() {
    // Known limitation of the heuristic.
    assert_eq!(texts("Dr. Smith waved."), ["Dr.", "Smith waved."]);
}

#[test]
fn test_whitespace_without_punctuation_does_not_split() {
    assert_eq!(texts("one two three"), ["one two three"]);
}

#[test]
fn test_indices_are_contiguous_from_zero() {
    let units = segment("One. Two. Three.");
    let indices: Vec<usize> = units.iter().map(|u| *u.index()).collect();
    assert_eq!(indices, [0, 1, 2]);
}

#[test]
fn test_units_are_trimmed_and_non_empty() {
    let inputs = [
        "A.   B.",
        "?!. ",
        "Hello! \u{00A0} World?",
        "Ends with space. ",
        "\n\nLeading newlines. And more",
    ];
    for input in inputs {
        for unit in segment(input) {
            assert!(!unit.text().is_empty(), "empty unit from {input:?}");
            assert_eq!(unit.text().trim(), unit.text(), "untrimmed unit from {input:?}");
        }
    }
}

#[test]
fn test_boundaries_only_after_terminators() {
    let input = "It rained. The cat, soaked, ran home! Did it dry off? Eventually";
    let units = segment(input);
    for unit in &units[..units.len() - 1] {
        let last = unit.text().chars().last().unwrap();
        assert!(matches!(last, '.' | '!' | '?'), "bad boundary after {:?}", unit.text());
    }
    let rejoined: Vec<&str> = units.iter().map(|u| u.text().as_str()).collect();
    assert_eq!(rejoined.join(" "), input);
}

#[test]
fn test_byte_order_mark_is_whitespace() {
    assert_eq!(
        texts("\u{FEFF}A cat sat.\u{FEFF}It slept."),
        ["A cat sat.", "It slept."]
    );
    assert_eq!(texts("Hi.\u{FEFF}"), ["Hi."]);
    assert!(segment("\u{FEFF} \u{FEFF}").is_empty());
}
