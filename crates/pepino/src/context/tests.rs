//! Unit tests for the context store.

use super::*;

#[derive(Debug, Default, PartialEq)]
struct Counter(u32);

#[derive(Debug, Default, PartialEq)]
struct Account {
    owner: String,
    balance: i64,
}

#[test]
fn creates_one_instance_per_type() {
    let mut contexts = Contexts::new();
    contexts.get_or_create::<Counter>().0 += 1;
    contexts.get_or_create::<Counter>().0 += 1;
    contexts.get_or_create::<Account>().balance = 10;

    assert_eq!(contexts.get::<Counter>(), Some(&Counter(2)));
    assert_eq!(contexts.get::<Account>().map(|a| a.balance), Some(10));
    assert_eq!(contexts.len(), 2);
}

#[test]
fn get_does_not_create() {
    let contexts = Contexts::new();
    assert!(contexts.get::<Counter>().is_none());
    assert!(contexts.is_empty());
}

#[test]
fn insert_replaces_and_returns_previous_instance() {
    let mut contexts = Contexts::new();
    assert_eq!(contexts.insert(Counter(1)), None);
    assert_eq!(contexts.insert(Counter(5)), Some(Counter(1)));
    if let Some(counter) = contexts.get_mut::<Counter>() {
        counter.0 += 1;
    }
    assert_eq!(contexts.remove::<Counter>(), Some(Counter(6)));
    assert!(contexts.is_empty());
}

#[test]
fn reset_restores_defaults() {
    let mut contexts = Contexts::new();
    contexts.get_or_create::<Account>().owner = "ada".into();
    contexts.reset();
    assert!(contexts.is_empty());
    assert_eq!(contexts.get_or_create::<Account>(), &mut Account::default());
}

#[test]
fn debug_lists_type_names() {
    let mut contexts = Contexts::new();
    contexts.get_or_create::<Counter>();
    let rendered = format!("{contexts:?}");
    assert!(rendered.contains("Counter"), "{rendered}");
}
