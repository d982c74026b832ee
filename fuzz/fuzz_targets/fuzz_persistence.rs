//! Fuzz testing for the checkpoint parser.
//!
//! Feeds arbitrary bytes to the record parser and the table loader. Parsing
//! must never panic, every record it yields must carry a finite deadline, and
//! loading must never overflow the table.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use frecstore::config::{MAX_ENTRIES, MAX_PATH_LEN, TABLE_SIZE};
use frecstore::persistence::{load_bytes, Records};
use frecstore::storage::EntryTable;

#[derive(Debug, Arbitrary)]
struct PersistenceInput {
    data: Vec<u8>,
    preload: u8,
}

fuzz_target!(|input: PersistenceInput| {
    for (_, deadline) in Records::new(&input.data) {
        assert!(deadline.is_finite());
    }

    let mut buf = vec![0u8; TABLE_SIZE];
    let table = EntryTable::from_bytes_mut(&mut buf).unwrap();
    table.reset();
    for i in 0..input.preload {
        table.push(format!("/pre/{i}").as_bytes(), 0.0);
    }

    let stats = load_bytes(table, &input.data);

    assert!(table.len() <= MAX_ENTRIES);
    assert_eq!(table.len(), input.preload as usize + stats.loaded);
    for entry in table.entries() {
        assert!(entry.path().len() <= MAX_PATH_LEN);
    }
});
