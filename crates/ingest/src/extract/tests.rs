use super::*;

#[test]
fn callout_stops_at_blank_line() {
    let axioms = extract_axioms("> [!DANGER] Do not delete\n\nnext paragraph");
    assert_eq!(axioms.len(), 1);
    assert_eq!(axioms[0].kind, "DANGER");
    assert_eq!(axioms[0].description, "Do not delete");
    assert_eq!(axioms[0].source, AxiomSource::Callout);
    assert!(axioms[0].title.is_none());
}

#[test]
fn subsection_body_stops_at_next_subsection() {
    let axioms = extract_axioms("### 3.1. No refunds\nBecause reasons.\n### 3.2. Next rule\n...");
    let first = &axioms[0];
    assert_eq!(first.kind, BUSINESS_RULE);
    assert_eq!(first.title.as_deref(), Some("No refunds"));
    assert_eq!(first.description, "Because reasons.");
    assert!(!first.description.contains("Next rule"));
    assert_eq!(first.source, AxiomSource::Section);

    assert_eq!(axioms.len(), 2);
    assert_eq!(axioms[1].title.as_deref(), Some("Next rule"));
    assert_eq!(axioms[1].description, "...");
}

#[test]
fn callout_continuation_lines_are_joined() {
    let md = "> [!WARNING]\n> Never hard-delete a patient.\n> Archive instead.\n\nbody";
    let axioms = extract_axioms(md);
    assert_eq!(axioms.len(), 1);
    assert_eq!(axioms[0].kind, "WARNING");
    assert_eq!(axioms[0].description, "Never hard-delete a patient. Archive instead.");
}

#[test]
fn callout_stops_at_next_callout_and_heading() {
    let md = "> [!NOTE] first\n> [!IMPORTANT] second\ncontinued\n## Heading\ntext";
    let axioms = extract_axioms(md);
    assert_eq!(axioms.len(), 2);
    assert_eq!(axioms[0].description, "first");
    assert_eq!(axioms[1].kind, "IMPORTANT");
    assert_eq!(axioms[1].description, "second\ncontinued");
}

#[test]
fn subsection_stops_at_higher_level_heading() {
    let md = "## 3. Rules\n### 3.1. Tier cap\nTier never exceeds 3.\nSecond line.\n## 4. Other\nignored";
    let axioms = extract_axioms(md);
    assert_eq!(axioms.len(), 1);
    assert_eq!(axioms[0].title.as_deref(), Some("Tier cap"));
    assert_eq!(axioms[0].description, "Tier never exceeds 3.\nSecond line.");
}

#[test]
fn unnumbered_and_wrong_level_headings_are_not_rules() {
    let md = "### Overview\ntext\n## 3.1. Too high\ntext\n#### 3.2. Too low\ntext\n### 3. Missing minor\ntext";
    assert!(extract_axioms(md).is_empty());
}

#[test]
fn callouts_precede_sections_in_output() {
    let md = "### 1.1. Rule\nbody\n\n> [!TIP] hint\n";
    let axioms = extract_axioms(md);
    assert_eq!(axioms.len(), 2);
    assert_eq!(axioms[0].source, AxiomSource::Callout);
    assert_eq!(axioms[1].source, AxiomSource::Section);
    // The callout sits inside the subsection body; both grammars see it.
    assert!(axioms[1].description.contains("[!TIP] hint"));
}

#[test]
fn extraction_does_not_deduplicate() {
    let md = "> [!DANGER] same\n\n> [!DANGER] same\n";
    let axioms = extract_axioms(md);
    assert_eq!(axioms.len(), 2);
    assert_eq!(axioms[0], axioms[1]);

    let twice: Vec<_> = extract_axioms(md).into_iter().chain(extract_axioms(md)).collect();
    assert_eq!(twice.len(), 4);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(extract_axioms("").is_empty());
    assert!(extract_axioms("plain prose\nwith no rules").is_empty());
}

#[test]
fn unquoted_continuation_keeps_line_break() {
    let md = "> [!NOTE] a\n> b\nc\n  d  \n\ntail";
    let axioms = extract_axioms(md);
    assert_eq!(axioms.len(), 1);
    assert_eq!(axioms[0].description, "a b\nc\nd");
}
