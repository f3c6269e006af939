//! Benchmark utilities.

use algoedb_codec::{record, Record};
use algoedb_core::Database;
use rand::Rng;

const NAMES: [&str; 8] = ["ada", "bo", "cy", "di", "ed", "flo", "gus", "hal"];

/// Generate a random string of the specified length.
pub fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Generate one person-shaped record with a `bio` of `payload` characters.
pub fn random_person(payload: usize) -> Record {
    let mut rng = rand::thread_rng();
    record! {
        "name" => NAMES[rng.gen_range(0..NAMES.len())],
        "age" => rng.gen_range(0..100i64),
        "score" => rng.gen::<f64>(),
        "active" => rng.gen::<bool>(),
        "bio" => random_string(payload),
    }
}

/// Generate `count` person records.
pub fn generate_people(count: usize, payload: usize) -> Vec<Record> {
    (0..count).map(|_| random_person(payload)).collect()
}

/// Open an in-memory database holding `count` people.
pub fn populated_memory_db(count: usize) -> Database {
    let db = Database::open_in_memory().expect("open in-memory database");
    db.insert_many(generate_people(count, 32))
        .expect("populate database");
    db
}
