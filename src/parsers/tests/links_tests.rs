use crate::parsers::links::link_context;

#[test]
fn test_context_around_link() {
    let context = link_context("Read the guide for details.", "the guide", 100);
    assert_eq!(context.as_deref(), Some("Read the guide for details."));
}

#[test]
fn test_context_trims_each_side() {
    let context = link_context("  \n before  LINK  after \n ", "LINK", 100);
    assert_eq!(context.as_deref(), Some("before LINK after"));
}

#[test]
fn test_missing_link_text_has_no_context() {
    // Text rendered by styling or scripts never appears in the parent text
    assert_eq!(link_context("Some parent text", "Click here", 100), None);
}

#[test]
fn test_first_occurrence_is_used() {
    let context = link_context("x one y one z", "one", 2);
    assert_eq!(context.as_deref(), Some("x one y"));
}

#[test]
fn test_window_counts_characters() {
    let context = link_context("ééééé link ààààà", "link", 3);
    assert_eq!(context.as_deref(), Some("éé link àà"));
}

#[test]
fn test_zero_window() {
    let context = link_context("before link after", "link", 0);
    assert_eq!(context.as_deref(), Some("link"));
}
