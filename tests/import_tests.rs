//! Integration tests for importing one vault file into another.

use std::fs;
use std::path::Path;

use localvault::crypto::{decrypt, KdfParams};
use localvault::errors::VaultError;
use localvault::vault::{import_vault, NewEntry, RecordStore, VaultRecord, VaultSession};
use tempfile::TempDir;

const LOCAL_PASS: &str = "local-passphrase";
const FOREIGN_PASS: &str = "foreign-passphrase";

fn fast_params() -> KdfParams {
    KdfParams {
        cost_factor: 1024,
        ..KdfParams::default()
    }
}

fn session_at(path: &Path) -> VaultSession {
    VaultSession::new(RecordStore::file(path), fast_params())
}

/// Helper: an unlocked local vault plus a foreign vault file with the
/// given `(title, secret)` entries.  Returns the foreign file's bytes.
fn setup(foreign_entries: &[(&str, &str)]) -> (TempDir, VaultSession, Vec<u8>) {
    let dir = TempDir::new().expect("create temp dir");

    let mut local = session_at(&dir.path().join("local.json"));
    local.setup(LOCAL_PASS).expect("local setup");

    let foreign_path = dir.path().join("foreign.json");
    let mut foreign = session_at(&foreign_path);
    foreign.setup(FOREIGN_PASS).expect("foreign setup");
    for &(title, secret) in foreign_entries {
        foreign
            .add_entry(NewEntry {
                title,
                note: "imported note",
                secret,
            })
            .expect("foreign add");
    }

    let bytes = fs::read(&foreign_path).expect("read foreign file");
    (dir, local, bytes)
}

fn local_record(session: &VaultSession) -> VaultRecord {
    session.store().load().unwrap().unwrap()
}

// ---------------------------------------------------------------------------
// Successful import
// ---------------------------------------------------------------------------

#[test]
fn import_rekeys_every_entry() {
    let (_dir, local, bytes) = setup(&[("bank", "p@ss"), ("mail", "hunter2")]);
    let foreign: VaultRecord = serde_json::from_slice(&bytes).unwrap();

    let summary = import_vault(&local, &bytes, FOREIGN_PASS).unwrap();
    assert_eq!(summary.imported, 2);

    let record = local_record(&local);
    assert_eq!(record.entries.len(), 2);

    let foreign_key = {
        let master = foreign.master.as_ref().unwrap();
        master.hash.clone()
    };

    for (imported, original) in record.entries.iter().zip(&foreign.entries) {
        // Fresh id, same metadata.
        assert_ne!(imported.id, original.id);
        assert_eq!(imported.title, original.title);
        assert_eq!(imported.note, original.note);
        assert_eq!(imported.created_at, original.created_at);

        // Bound to the new id and no longer readable with the foreign key.
        assert_eq!(imported.envelope.associated_data, imported.id);
        assert!(matches!(
            decrypt(&foreign_key, &imported.envelope, &imported.id),
            Err(VaultError::AuthenticationFailed)
        ));
    }

    let secrets: Vec<_> = record
        .entries
        .iter()
        .map(|e| local.reveal_entry(&e.id).unwrap().to_string())
        .collect();
    assert_eq!(secrets, ["hunter2", "p@ss"]);
}

#[test]
fn import_appends_after_existing_entries() {
    let (_dir, mut local, bytes) = setup(&[("imported", "from afar")]);
    let mine = local
        .add_entry(NewEntry {
            title: "mine",
            note: "",
            secret: "local secret",
        })
        .unwrap();

    import_vault(&local, &bytes, FOREIGN_PASS).unwrap();

    let titles: Vec<_> = local
        .list_entries()
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["mine", "imported"]);
    assert_eq!(local.reveal_entry(&mine.id).unwrap().as_str(), "local secret");
}

#[test]
fn import_of_empty_vault_adds_nothing() {
    let (_dir, local, bytes) = setup(&[]);
    let summary = import_vault(&local, &bytes, FOREIGN_PASS).unwrap();
    assert_eq!(summary.imported, 0);
    assert!(local.list_entries().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Rejections leave the local vault untouched
// ---------------------------------------------------------------------------

#[test]
fn wrong_foreign_passphrase_is_rejected() {
    let (_dir, local, bytes) = setup(&[("bank", "p@ss")]);
    let before = local_record(&local);

    assert!(matches!(
        import_vault(&local, &bytes, "not-the-passphrase"),
        Err(VaultError::WrongPassphrase)
    ));
    assert!(matches!(
        import_vault(&local, &bytes, ""),
        Err(VaultError::WrongPassphrase)
    ));
    assert_eq!(local_record(&local), before);
}

#[test]
fn corrupted_last_entry_aborts_whole_import() {
    let (_dir, local, bytes) = setup(&[("one", "1"), ("two", "2"), ("three", "3")]);
    let before = local_record(&local);

    let mut foreign: VaultRecord = serde_json::from_slice(&bytes).unwrap();
    let last = foreign.entries.last_mut().unwrap();
    last.envelope.ciphertext[0] ^= 0xFF;
    let corrupted = serde_json::to_vec(&foreign).unwrap();

    assert!(matches!(
        import_vault(&local, &corrupted, FOREIGN_PASS),
        Err(VaultError::InvalidFile(_))
    ));
    assert_eq!(local_record(&local), before);
    assert!(local.list_entries().unwrap().is_empty());
}

#[test]
fn relinked_last_entry_aborts_whole_import() {
    let (_dir, local, bytes) = setup(&[("one", "1"), ("two", "2"), ("three", "3")]);
    let before = local_record(&local);

    // Move the first entry's envelope, unchanged, onto the last entry.
    let mut foreign: VaultRecord = serde_json::from_slice(&bytes).unwrap();
    let moved = foreign.entries[0].envelope.clone();
    foreign.entries.last_mut().unwrap().envelope = moved;
    let relinked = serde_json::to_vec(&foreign).unwrap();

    assert!(matches!(
        import_vault(&local, &relinked, FOREIGN_PASS),
        Err(VaultError::InvalidFile(_))
    ));
    assert_eq!(local_record(&local), before);
    assert!(local.list_entries().unwrap().is_empty());
}

#[test]
fn malformed_files_are_invalid() {
    let (_dir, local, bytes) = setup(&[("bank", "p@ss")]);

    let mut no_version: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    no_version.as_object_mut().unwrap().remove("version");

    let mut no_master: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    no_master["master"] = serde_json::Value::Null;

    let mut short_nonce: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    short_nonce["entries"][0]["passwordCrypto"]["iv"] = "AAAA".into();

    let cases: Vec<Vec<u8>> = vec![
        b"not json at all".to_vec(),
        b"[1, 2, 3]".to_vec(),
        serde_json::to_vec(&no_version).unwrap(),
        serde_json::to_vec(&no_master).unwrap(),
        serde_json::to_vec(&short_nonce).unwrap(),
    ];

    for case in cases {
        assert!(
            matches!(
                import_vault(&local, &case, FOREIGN_PASS),
                Err(VaultError::InvalidFile(_))
            ),
            "expected InvalidFile for {}",
            String::from_utf8_lossy(&case)
        );
    }
    assert!(local.list_entries().unwrap().is_empty());
}

#[test]
fn locked_session_cannot_import() {
    let (_dir, mut local, bytes) = setup(&[("bank", "p@ss")]);
    local.lock();

    assert!(matches!(
        import_vault(&local, &bytes, FOREIGN_PASS),
        Err(VaultError::UnlockRequired)
    ));
}
