//! Every puzzle of the 5784 edition against a small synthetic store.
//!
//! Each customer below is the single answer to exactly one puzzle, and the
//! rows are arranged so no other customer satisfies that puzzle's filters.

#![allow(clippy::unwrap_used)]

use noahs_core::zodiac::{ChineseZodiac, ZodiacSign};
use noahs_integration_tests::StoreFixture;
use noahs_query::reference::BuiltinReference;
use noahs_query::{Edition, Puzzle, PuzzleError, Solver};

fn store() -> StoreFixture {
    StoreFixture::new()
        // Customers
        .customer(1001, "Sam Tannenbaum", "Bronx, NY 10451", "1960-02-02", "826-636-2286")
        .customer(1002, "Jane Park", "Brooklyn, NY 11201", "1980-01-01", "718-555-0102")
        .customer(1003, "Lou Vance", "Brooklyn, NY 11201", "1975-07-01", "718-555-0103")
        .customer(1004, "Ada Early", "Queens, NY 11101", "1970-04-04", "718-555-0104")
        .customer(1005, "Cat Owner", "Staten Island, NY 10301", "1950-05-05", "718-555-0105")
        .customer(1006, "Flo Frugal", "Bronx, NY 10451", "1966-06-06", "718-555-0106")
        .customer(1007, "Hal Match", "Bronx, NY 10451", "1985-08-08", "718-555-0107")
        .customer(1008, "Col Lector", "Harlem, NY 10027", "1990-09-09", "718-555-0108")
        // Products
        .product("BKY1001", "Sesame Bagel", "1.00")
        .product("PET1004", "Senior Cat Food", "5.00")
        .product("HOM2001", "Manual Mixer (orange)", "10.00")
        .product("HOM2002", "Manual Mixer (blue)", "10.00")
        .product("TOY3002", "Rubber Duck", "2.00")
        // Contractor: a bagel in 2017
        .in_store_order(1, 1002, "2017-03-01 08:00:00")
        .item(1, "BKY1001", 1, "1.50")
        // Early bird: bakery before five, two at a time
        .order(2, 1004, "2019-05-01 04:10:00", Some("2019-05-01 04:20:00"))
        .item(2, "BKY1001", 2, "1.50")
        .order(3, 1004, "2019-05-08 04:10:00", Some("2019-05-08 04:20:00"))
        .item(3, "BKY1001", 2, "1.50")
        // Cat lady: senior cat food on Staten Island
        .order(4, 1005, "2019-07-01 10:00:00", Some("2019-07-03 10:00:00"))
        .item(4, "PET1004", 1, "6.00")
        .order(5, 1005, "2019-08-01 10:00:00", Some("2019-08-03 10:00:00"))
        .item(5, "PET1004", 1, "6.00")
        // Bargain hunter: both lines at or below cost, one in store with a colour
        .in_store_order(6, 1006, "2019-06-01 12:30:10")
        .item(6, "HOM2001", 1, "9.00")
        .order(7, 1006, "2019-06-02 12:00:00", Some("2019-06-04 12:00:00"))
        .item(7, "TOY3002", 1, "2.00")
        // Meet cute: the other colour, same minute
        .in_store_order(8, 1007, "2019-06-01 12:30:45")
        .item(8, "HOM2002", 1, "12.00")
        // Collector: most lines overall
        .order(9, 1008, "2020-01-01 10:00:00", Some("2020-01-02 10:00:00"))
        .item(9, "TOY3002", 1, "2.50")
        .item(9, "TOY3002", 1, "2.50")
        .order(10, 1008, "2020-02-01 10:00:00", Some("2020-02-02 10:00:00"))
        .item(10, "TOY3002", 1, "2.50")
        .item(10, "TOY3002", 1, "2.50")
}

fn zodiac() -> noahs_query::ZodiacReference {
    BuiltinReference.lookup(ZodiacSign::Cancer, ChineseZodiac::Rabbit)
}

// ============================================================================
// Full solve
// ============================================================================

#[test]
fn test_solve_all_offline() {
    let (_dir, data) = store().load().unwrap();

    let answers = Solver::new(&data, Edition::Y5784)
        .with_zodiac(zodiac())
        .solve_all()
        .unwrap();

    let ids: Vec<i32> = answers.iter().map(|a| a.customer_id.as_i32()).collect();
    assert_eq!(ids, vec![1001, 1002, 1003, 1004, 1005, 1006, 1007, 1008]);

    let numbers: Vec<u8> = answers.iter().map(|a| a.puzzle).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(answers.iter().all(|a| a.edition == Edition::Y5784));
}

#[test]
fn test_solve_through_stops_at_target() {
    let (_dir, data) = store().load().unwrap();
    let mut solver = Solver::new(&data, Edition::Y5784).with_zodiac(zodiac());

    let chain = solver.solve_through(Puzzle::MeetCute).unwrap();
    let puzzles: Vec<u8> = chain.iter().map(|a| a.puzzle).collect();
    assert_eq!(puzzles, vec![6, 7]);
    assert_eq!(chain.last().unwrap().name, "Hal Match");

    // The prerequisite's answer is remembered.
    assert_eq!(
        solver.answer(Puzzle::BargainHunter).unwrap().name,
        "Flo Frugal"
    );
    assert!(solver.answer(Puzzle::Contractor).is_none());
}

#[test]
fn test_neighbor_without_reference_fails() {
    let (_dir, data) = store().load().unwrap();

    let err = Solver::new(&data, Edition::Y5784)
        .solve_through(Puzzle::Neighbor)
        .unwrap_err();
    assert!(matches!(err, PuzzleError::MissingReference(Puzzle::Neighbor)));
}

#[test]
fn test_neighbor_rejects_reference_for_another_edition() {
    let (_dir, data) = store().load().unwrap();

    let err = Solver::new(&data, Edition::Y5784)
        .with_zodiac(BuiltinReference.lookup(ZodiacSign::Libra, ChineseZodiac::Goat))
        .solve_through(Puzzle::Neighbor)
        .unwrap_err();
    assert!(matches!(err, PuzzleError::MissingReference(Puzzle::Neighbor)));
}

// ============================================================================
// Output shape
// ============================================================================

#[test]
fn test_answers_serialize_for_json_output() {
    let (_dir, data) = store().load().unwrap();

    let answer = Solver::new(&data, Edition::Y5784)
        .solve(Puzzle::Investigator)
        .unwrap();
    let json = serde_json::to_value(&answer).unwrap();

    assert_eq!(json["edition"], "5784");
    assert_eq!(json["puzzle"], 1);
    assert_eq!(json["customer_id"], 1001);
    assert_eq!(json["phone"], "826-636-2286");
}
