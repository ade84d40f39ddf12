use super::*;

#[test]
fn fresh_ticket_is_current() {
    let generation = RenderGeneration::new();
    let ticket = generation.begin();
    assert_eq!(ticket.generation(), 1);
    assert!(ticket.is_current());
    ticket.check().unwrap();
}

#[test]
fn newer_request_supersedes_older_ticket() {
    let generation = RenderGeneration::new();
    let old = generation.begin();
    let new = generation.clone().begin();

    assert!(!old.is_current());
    assert!(new.is_current());
    match old.check().unwrap_err() {
        SlideError::Superseded { started, current } => {
            assert_eq!(started, 1);
            assert_eq!(current, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(generation.current(), 2);
}
