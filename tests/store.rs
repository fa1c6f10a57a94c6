use bosco_tables::db::{
    Day, DaySnapshot, DayStore, Field, FileStorage, KeyValueStorage, MemoryStorage, Reservation,
    TableState, TABLES,
};

fn store() -> (DayStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    (DayStore::new(storage.clone()), storage)
}

fn stored_snapshot(storage: &MemoryStorage, key: &str) -> DaySnapshot {
    let raw = storage.get(key).unwrap().expect("snapshot guardado");
    DaySnapshot::from_json(&raw).unwrap()
}

#[test]
fn new_store_starts_on_first_day_and_empty() {
    let (store, storage) = store();
    assert_eq!(store.day(), Day::Jueves);
    assert!(store.snapshot().is_empty());
    // seleccionar un día no escribe nada
    assert_eq!(storage.write_count(), 0);
}

#[test]
fn default_on_miss_for_every_table() {
    let (store, _) = store();
    for table in TABLES {
        let r = store.reservation(table);
        assert_eq!(r, Reservation::empty(table));
        assert_eq!(r.name, "");
        assert_eq!(r.status, "");
        assert_eq!(store.table_state(table), TableState::Empty);
    }
    assert!(store.snapshot().reservations.is_empty());
}

#[test]
fn set_field_keeps_unrelated_fields() {
    let (mut store, _) = store();
    store.set_field(12, Field::Name, "Alex");
    store.set_field(12, Field::Notes, "VIP");

    let r = store.reservation(12);
    assert_eq!(r.table, 12);
    assert_eq!(r.name, "Alex");
    assert_eq!(r.notes, "VIP");
    assert_eq!(r.party_size, "");
}

#[test]
fn every_mutation_writes_the_whole_snapshot() {
    let (mut store, storage) = store();
    store.set_field(20, Field::Name, "Mateo");
    store.add_guests("Caro");
    assert_eq!(storage.write_count(), 2);

    let saved = stored_snapshot(&storage, "bosco:v1:Jueves");
    assert_eq!(saved.reservations[&20].name, "Mateo");
    assert_eq!(saved.guest_list, vec!["Caro"]);
    assert!(saved.saved_at.is_some());
}

#[test]
fn round_trip_through_storage() {
    let (mut store, storage) = store();
    store.set_field(31, Field::PartySize, "6");
    store.set_field(31, Field::Status, "pendiente");
    store.set_field(43, Field::GuestsText, "Ana, Luis");
    store.add_guests("A\nB\nB");
    let expected = store.snapshot().clone();

    let reopened = DayStore::new(storage.clone());
    assert_eq!(reopened.snapshot().reservations, expected.reservations);
    assert_eq!(reopened.snapshot().guest_list, expected.guest_list);
}

#[test]
fn values_are_stored_verbatim() {
    let (mut store, _) = store();
    store.set_field(50, Field::PartySize, "  seis o siete ");
    store.set_field(50, Field::Status, "cualquier cosa");

    let r = store.reservation(50);
    assert_eq!(r.party_size, "  seis o siete ");
    assert_eq!(r.status, "cualquier cosa");
    assert_eq!(store.table_state(50), TableState::Pending);
}

#[test]
fn clear_table_removes_instead_of_blanking() {
    let (mut store, storage) = store();
    store.set_field(13, Field::Name, "Beto");
    store.set_field(13, Field::Status, "confirmada");
    assert_eq!(store.table_state(13), TableState::Confirmed);

    store.clear_table(13);
    assert_eq!(store.reservation(13), Reservation::empty(13));
    assert_eq!(store.table_state(13), TableState::Empty);
    assert!(!store.snapshot().reservations.contains_key(&13));

    let saved = stored_snapshot(&storage, "bosco:v1:Jueves");
    assert!(!saved.reservations.contains_key(&13));
}

#[test]
fn clear_table_without_entry_is_a_no_op() {
    let (mut store, storage) = store();
    store.clear_table(61);
    assert_eq!(storage.write_count(), 0);
    assert!(store.snapshot().reservations.is_empty());
}

#[test]
fn blanked_record_is_kept_but_derives_empty() {
    let (mut store, _) = store();
    store.set_field(41, Field::Name, "Alex");
    store.set_field(41, Field::Name, "");

    assert!(store.snapshot().reservations.contains_key(&41));
    assert_eq!(store.table_state(41), TableState::Empty);
}

#[test]
fn add_guests_splits_on_commas_and_newlines() {
    let (mut store, storage) = store();
    let added = store.add_guests("Alex, Mateo\nBeto,, Caro");

    assert_eq!(added, 4);
    assert_eq!(store.guest_list(), ["Alex", "Mateo", "Beto", "Caro"]);
    assert_eq!(storage.write_count(), 1);

    store.add_guests("Alex");
    assert_eq!(store.guest_list(), ["Alex", "Mateo", "Beto", "Caro", "Alex"]);
}

#[test]
fn blank_guest_text_adds_nothing_and_does_not_write() {
    let (mut store, storage) = store();
    assert_eq!(store.add_guests("   "), 0);
    assert_eq!(store.add_guests(""), 0);
    assert_eq!(store.add_guests(" ,\n, "), 0);

    assert!(store.guest_list().is_empty());
    assert_eq!(storage.write_count(), 0);
}

#[test]
fn remove_guest_by_index() {
    let (mut store, storage) = store();
    store.add_guests("A,B,C");
    let writes = storage.write_count();

    assert_eq!(store.remove_guest(5), None);
    assert_eq!(store.guest_list(), ["A", "B", "C"]);
    assert_eq!(storage.write_count(), writes);

    assert_eq!(store.remove_guest(1).as_deref(), Some("B"));
    assert_eq!(store.guest_list(), ["A", "C"]);
    assert_eq!(storage.write_count(), writes + 1);
}

#[test]
fn state_derivation() {
    let (mut store, _) = store();
    store.set_field(10, Field::Name, "Alex");
    store.set_field(10, Field::Status, "CONFIRMADA");
    assert_eq!(store.table_state(10), TableState::Confirmed);

    store.set_field(10, Field::Status, "");
    assert_eq!(store.table_state(10), TableState::Pending);

    store.set_field(10, Field::Status, "pendiente");
    assert_eq!(store.table_state(10), TableState::Pending);
}

#[test]
fn days_are_isolated() {
    let (mut store, _) = store();
    store.select_day(Day::Jueves);
    store.set_field(22, Field::Name, "Alex");
    store.add_guests("Mateo");

    store.select_day(Day::Viernes);
    assert_eq!(store.day(), Day::Viernes);
    assert_eq!(store.reservation(22), Reservation::empty(22));
    assert!(store.guest_list().is_empty());

    store.select_day(Day::Jueves);
    assert_eq!(store.reservation(22).name, "Alex");
    assert_eq!(store.guest_list(), ["Mateo"]);
}

#[test]
fn clear_day_erases_persisted_entry() {
    let (mut store, storage) = store();
    store.set_field(30, Field::Name, "Caro");
    store.select_day(Day::Viernes);
    store.add_guests("Ana");

    store.clear_day(Day::Jueves);
    assert_eq!(store.day(), Day::Jueves);
    assert!(store.snapshot().is_empty());
    assert!(!storage.contains_key("bosco:v1:Jueves"));

    store.select_day(Day::Jueves);
    assert!(store.snapshot().is_empty());

    // los demás días no se tocan
    store.select_day(Day::Viernes);
    assert_eq!(store.guest_list(), ["Ana"]);
}

#[test]
fn corrupt_snapshot_loads_empty() {
    let storage = MemoryStorage::new();
    storage.insert_raw("bosco:v1:Sabado", "{not json");

    let mut store = DayStore::new(storage.clone());
    store.select_day(Day::Sabado);
    assert!(store.snapshot().is_empty());

    // el siguiente cambio reemplaza el valor corrupto
    store.add_guests("Beto");
    let saved = stored_snapshot(&storage, "bosco:v1:Sabado");
    assert_eq!(saved.guest_list, vec!["Beto"]);
}

#[test]
fn snapshot_written_by_the_browser_is_readable() {
    let storage = MemoryStorage::new();
    storage.insert_raw(
        "bosco:v1:Viernes",
        r#"{"reservations":{"23":{"table":23,"name":"Alex","partySize":"4","rp":"Beto","notes":"","status":"confirmada","guestsText":"Ana, Luis"}},"guestList":["Caro"],"savedAt":"2025-03-06T21:04:05.123Z"}"#,
    );

    let mut store = DayStore::new(storage);
    store.select_day(Day::Viernes);

    let r = store.reservation(23);
    assert_eq!(r.party_size, "4");
    assert_eq!(r.rp, "Beto");
    assert_eq!(r.guests_text, "Ana, Luis");
    assert_eq!(store.table_state(23), TableState::Confirmed);
    assert_eq!(store.guest_list(), ["Caro"]);
}

#[test]
fn write_failures_keep_memory_and_do_not_panic() {
    let storage = MemoryStorage::with_quota(0);
    let mut store = DayStore::new(storage.clone());

    store.set_field(11, Field::Name, "Alex");
    store.add_guests("Mateo, Beto");
    assert_eq!(store.remove_guest(0).as_deref(), Some("Mateo"));

    assert_eq!(store.reservation(11).name, "Alex");
    assert_eq!(store.guest_list(), ["Beto"]);
    assert_eq!(storage.write_count(), 0);
    assert!(!storage.contains_key("bosco:v1:Jueves"));

    // cuando el medio vuelve, la siguiente mutación guarda todo
    storage.set_quota(None);
    store.set_field(11, Field::Notes, "VIP");
    let saved = stored_snapshot(&storage, "bosco:v1:Jueves");
    assert_eq!(saved.reservations[&11].name, "Alex");
    assert_eq!(saved.guest_list, vec!["Beto"]);
}

#[test]
fn file_storage_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = DayStore::new(FileStorage::open(dir.path()).unwrap());
        store.select_day(Day::Sabado);
        store.set_field(70, Field::Name, "Luis");
        store.add_guests("Ana\nCaro");
    }

    let mut store = DayStore::new(FileStorage::open(dir.path()).unwrap());
    assert!(store.snapshot().is_empty());

    store.select_day(Day::Sabado);
    assert_eq!(store.reservation(70).name, "Luis");
    assert_eq!(store.guest_list(), ["Ana", "Caro"]);

    store.clear_day(Day::Sabado);
    assert!(!dir.path().join("bosco%3Av1%3ASabado.json").exists());
}

#[test]
fn prefixes_that_look_alike_do_not_share_files() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = DayStore::with_prefix(FileStorage::open(dir.path()).unwrap(), "bosco:v1");
    first.set_field(10, Field::Name, "Alex");

    let second = DayStore::with_prefix(FileStorage::open(dir.path()).unwrap(), "bosco_v1");
    assert_eq!(second.reservation(10), Reservation::empty(10));
    assert!(second.snapshot().is_empty());
}
