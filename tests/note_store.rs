use std::sync::Arc;
use std::thread;

use chrono::{Duration, TimeZone, Utc};
use notekeeper::{Lifetime, ManualClock, NoteError, NoteStore, Registration};

fn store_at_fixed_time() -> (Arc<NoteStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
    ));
    (Arc::new(NoteStore::with_clock(clock.clone())), clock)
}

fn texts(store: &NoteStore, user: &str) -> Vec<String> {
    store
        .get_all(user)
        .unwrap()
        .iter()
        .map(|n| n.text().to_string())
        .collect()
}

#[test]
fn kek_lol_scenario_without_lifetime() {
    let (store, _) = store_at_fixed_time();
    assert_eq!(store.register_user("kek").unwrap(), Registration::Created);

    let lifetime = Lifetime::parse(Some("0")).unwrap();
    store.add_note("kek", "LOL", lifetime).unwrap();

    let first = store.get_first("kek").unwrap();
    assert_eq!(first.text(), "LOL");
    assert_eq!(first.expires_at(), None);
}

#[test]
fn one_hour_note_is_gone_after_two_hours() {
    let (store, clock) = store_at_fixed_time();
    store.register_user("kek").unwrap();
    store.add_note("kek", "short-lived", Lifetime::Hours(1)).unwrap();
    assert_eq!(texts(&store, "kek"), vec!["short-lived"]);

    clock.advance(Duration::hours(2));

    assert!(store.get_all("kek").unwrap().is_empty());
    assert_eq!(store.get_first("kek"), Err(NoteError::EmptyLedger));
    assert_eq!(store.get_last("kek"), Err(NoteError::EmptyLedger));
}

#[test]
fn ttl_note_disappears_exactly_at_its_deadline() {
    let (store, clock) = store_at_fixed_time();
    store.register_user("kek").unwrap();
    store.add_note("kek", "three hours", Lifetime::Hours(3)).unwrap();

    clock.advance(Duration::hours(3) - Duration::seconds(1));
    assert_eq!(texts(&store, "kek"), vec!["three hours"]);

    clock.advance(Duration::seconds(1));
    assert!(texts(&store, "kek").is_empty());
}

#[test]
fn notes_without_lifetime_survive_any_elapsed_time() {
    let (store, clock) = store_at_fixed_time();
    store.register_user("kek").unwrap();
    store.add_note("kek", "absent", Lifetime::Absent).unwrap();
    store.add_note("kek", "zero", Lifetime::Hours(0)).unwrap();

    for _ in 0..10 {
        clock.advance(Duration::days(3650));
        assert_eq!(texts(&store, "kek"), vec!["absent", "zero"]);
    }
}

#[test]
fn get_all_keeps_insertion_order_across_mixed_lifetimes() {
    let (store, clock) = store_at_fixed_time();
    store.register_user("kek").unwrap();

    let expected: Vec<String> = (0..20).map(|i| format!("note-{i}")).collect();
    for (i, text) in expected.iter().enumerate() {
        let lifetime = if i % 2 == 0 { Lifetime::Absent } else { Lifetime::Hours(100) };
        store.add_note("kek", text, lifetime).unwrap();
        clock.advance(Duration::minutes(1));
    }

    assert_eq!(texts(&store, "kek"), expected);

    let created: Vec<_> = store.get_all("kek").unwrap().iter().map(|n| n.created_at()).collect();
    assert!(created.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn sweep_keeps_order_of_survivors() {
    let (store, clock) = store_at_fixed_time();
    store.register_user("kek").unwrap();
    store.add_note("kek", "a", Lifetime::Absent).unwrap();
    store.add_note("kek", "b", Lifetime::Hours(1)).unwrap();
    store.add_note("kek", "c", Lifetime::Hours(1)).unwrap();
    store.add_note("kek", "d", Lifetime::Hours(5)).unwrap();
    store.add_note("kek", "e", Lifetime::Absent).unwrap();

    clock.advance(Duration::hours(1));
    assert_eq!(texts(&store, "kek"), vec!["a", "d", "e"]);
    assert_eq!(store.get_last("kek").unwrap().text(), "e");

    clock.advance(Duration::hours(4));
    assert_eq!(texts(&store, "kek"), vec!["a", "e"]);
}

#[test]
fn delete_at_removes_only_the_kth_note() {
    let (store, _) = store_at_fixed_time();
    store.register_user("kek").unwrap();
    for text in ["zero", "one", "two", "three"] {
        store.add_note("kek", text, Lifetime::Absent).unwrap();
    }

    assert_eq!(store.delete_at("kek", 2).unwrap().text(), "two");
    assert_eq!(texts(&store, "kek"), vec!["zero", "one", "three"]);

    assert_eq!(store.delete_at("kek", 0).unwrap().text(), "zero");
    assert_eq!(texts(&store, "kek"), vec!["one", "three"]);
}

#[test]
fn delete_past_the_end_is_not_found() {
    let (store, _) = store_at_fixed_time();
    store.register_user("kek").unwrap();
    store.add_note("kek", "a", Lifetime::Absent).unwrap();
    store.add_note("kek", "b", Lifetime::Absent).unwrap();

    assert_eq!(store.delete_at("kek", 5), Err(NoteError::NotFound));
    assert_eq!(store.delete_at("kek", 2), Err(NoteError::NotFound));
    assert_eq!(texts(&store, "kek"), vec!["a", "b"]);
}

#[test]
fn second_registration_changes_nothing() {
    let (store, _) = store_at_fixed_time();
    store.register_user("kek").unwrap();
    store.add_note("kek", "a", Lifetime::Absent).unwrap();

    assert_eq!(store.register_user("kek").unwrap(), Registration::AlreadyExists);
    assert_eq!(store.register_user("kek").unwrap(), Registration::AlreadyExists);
    assert_eq!(texts(&store, "kek"), vec!["a"]);
    assert_eq!(store.user_count(), 1);
}

#[test]
fn concurrent_adds_to_two_users_are_all_kept() {
    const N: usize = 400;
    const M: usize = 250;
    let store = Arc::new(NoteStore::new());
    store.register_user("alice").unwrap();
    store.register_user("bob").unwrap();

    thread::scope(|s| {
        for t in 0..4 {
            let store = &store;
            s.spawn(move || {
                for i in 0..N / 4 {
                    store
                        .add_note("alice", &format!("a-{t}-{i}"), Lifetime::Absent)
                        .unwrap();
                }
            });
        }
        for t in 0..5 {
            let store = &store;
            s.spawn(move || {
                for i in 0..M / 5 {
                    store
                        .add_note("bob", &format!("b-{t}-{i}"), Lifetime::Hours(1))
                        .unwrap();
                    // Readers race with writers on the same ledger.
                    let _ = store.get_last("bob");
                }
            });
        }
    });

    assert_eq!(store.get_all("alice").unwrap().len(), N);
    assert_eq!(store.get_all("bob").unwrap().len(), M);
}

#[test]
fn concurrent_registration_creates_each_user_once() {
    let store = Arc::new(NoteStore::new());

    let created: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = &store;
                s.spawn(move || {
                    (0..50)
                        .filter(|i| {
                            store.register_user(&format!("user-{i}")).unwrap()
                                == Registration::Created
                        })
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(created, 50);
    assert_eq!(store.user_count(), 50);
}

#[test]
fn concurrent_deletes_never_remove_more_than_exists() {
    let store = Arc::new(NoteStore::new());
    store.register_user("kek").unwrap();
    for i in 0..100 {
        store.add_note("kek", &format!("n{i}"), Lifetime::Absent).unwrap();
    }

    let deleted: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let store = &store;
                s.spawn(move || (0..40).filter(|_| store.delete_at("kek", 0).is_ok()).count())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(deleted, 100);
    assert!(store.get_all("kek").unwrap().is_empty());
}
