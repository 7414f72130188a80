use speculate2::speculate;

speculate! {
    use serde_json::{json, Value};
    use technotes_core::models::{Note, RequestBody, User};
    use technotes_core::{Database, NoteService, ServiceError, UserService};

    fn setup_db() -> Database {
        let db = Database::open_memory().expect("Failed to create test database");
        db.migrate().expect("Failed to migrate test database");
        db
    }

    fn body(value: Value) -> RequestBody {
        RequestBody::from(value)
    }

    fn create_test_note(notes: &NoteService, user: &str, title: &str) -> Note {
        notes
            .create(&body(json!({ "user": user, "title": title, "text": "body" })))
            .expect("Failed to create note")
    }

    fn create_test_user(users: &UserService, username: &str) -> User {
        users
            .create(&body(json!({ "username": username, "password": "hunter2" })))
            .expect("Failed to create user")
    }

    fn stored_hash(db: &Database, id: &str) -> String {
        db.with_connection(|conn| {
            conn.query_row("SELECT password FROM users WHERE id = ?1", [id], |row| row.get(0))
        })
        .expect("Failed to read password hash")
    }

    fn message(err: ServiceError) -> String {
        err.to_string()
    }

    describe "note service" {
        describe "list" {
            it "fails with not found when there are no notes" {
                let notes = NoteService::new(setup_db());
                let err = notes.list().unwrap_err();

                assert!(matches!(err, ServiceError::NotFound(_)));
                assert_eq!(message(err), "No notes found");
            }

            it "attaches the owner's username to each note" {
                let db = setup_db();
                let users = UserService::new(db.clone());
                let notes = NoteService::new(db);
                let alice = create_test_user(&users, "alice");
                let bob = create_test_user(&users, "bob");

                create_test_note(&notes, &alice.id, "Shop");
                create_test_note(&notes, &bob.id, "Fix printer");
                create_test_note(&notes, &alice.id, "Call plumber");

                let listed = notes.list().unwrap();
                assert_eq!(listed.len(), 3);
                for entry in &listed {
                    let expected = if entry.note.user == alice.id { "alice" } else { "bob" };
                    assert_eq!(entry.username.as_deref(), Some(expected));
                }
            }

            it "leaves the username empty for unknown owners" {
                let notes = NoteService::new(setup_db());
                create_test_note(&notes, "u1", "Shop");

                let listed = notes.list().unwrap();
                assert_eq!(listed[0].username, None);
            }

            it "returns created notes with their fields intact" {
                let notes = NoteService::new(setup_db());
                let created = create_test_note(&notes, "u1", "Shop");

                let listed = notes.list().unwrap();
                assert_eq!(listed[0].note, created);
                assert_eq!(listed[0].note.text, "body");
                assert!(!listed[0].note.completed);
            }
        }

        describe "create" {
            it "requires user, title and text" {
                let notes = NoteService::new(setup_db());

                for payload in [
                    json!({ "title": "Shop", "text": "milk" }),
                    json!({ "user": "u1", "text": "milk" }),
                    json!({ "user": "u1", "title": "Shop" }),
                    json!({ "user": "", "title": "Shop", "text": "milk" }),
                    json!({ "user": 7, "title": "Shop", "text": "milk" }),
                ] {
                    let err = notes.create(&body(payload)).unwrap_err();
                    assert!(matches!(err, ServiceError::InvalidInput(_)));
                    assert_eq!(message(err), "All fields are required");
                }
            }

            it "rejects titles that differ only in case" {
                let notes = NoteService::new(setup_db());
                create_test_note(&notes, "u1", "Shop");

                let err = notes
                    .create(&body(json!({ "user": "u2", "title": "SHOP", "text": "eggs" })))
                    .unwrap_err();
                assert!(matches!(err, ServiceError::Conflict(_)));
                assert_eq!(message(err), "Duplicate note title");
                assert_eq!(notes.list().unwrap().len(), 1);
            }

            it "treats sharp s and double s as the same title" {
                let notes = NoteService::new(setup_db());
                create_test_note(&notes, "u1", "Straße");

                let err = notes
                    .create(&body(json!({ "user": "u2", "title": "STRASSE", "text": "eggs" })))
                    .unwrap_err();
                assert_eq!(message(err), "Duplicate note title");
            }
        }

        describe "update" {
            it "overwrites every field" {
                let notes = NoteService::new(setup_db());
                let note = create_test_note(&notes, "u1", "Shop");

                let updated = notes
                    .update(&body(json!({
                        "id": note.id,
                        "user": "u2",
                        "title": "Groceries",
                        "text": "eggs",
                        "completed": true,
                    })))
                    .unwrap();

                assert_eq!(updated.id, note.id);
                assert_eq!(updated.user, "u2");
                assert_eq!(updated.title, "Groceries");
                assert_eq!(updated.text, "eggs");
                assert!(updated.completed);
                assert_eq!(notes.list().unwrap()[0].note, updated);
            }

            it "allows a note to keep its own title" {
                let notes = NoteService::new(setup_db());
                let note = create_test_note(&notes, "u1", "Shop");

                let updated = notes
                    .update(&body(json!({
                        "id": note.id,
                        "user": "u1",
                        "title": "shop",
                        "text": "milk",
                        "completed": false,
                    })))
                    .unwrap();
                assert_eq!(updated.title, "shop");
            }

            it "rejects a title owned by another note" {
                let notes = NoteService::new(setup_db());
                create_test_note(&notes, "u1", "Shop");
                let other = create_test_note(&notes, "u1", "Laundry");

                let err = notes
                    .update(&body(json!({
                        "id": other.id,
                        "user": "u1",
                        "title": "SHOP",
                        "text": "x",
                        "completed": false,
                    })))
                    .unwrap_err();
                assert!(matches!(err, ServiceError::Conflict(_)));
            }

            it "requires a boolean completed flag" {
                let notes = NoteService::new(setup_db());
                let note = create_test_note(&notes, "u1", "Shop");

                let err = notes
                    .update(&body(json!({
                        "id": note.id,
                        "user": "u1",
                        "title": "Shop",
                        "text": "milk",
                        "completed": "yes",
                    })))
                    .unwrap_err();
                assert_eq!(message(err), "All fields are required");
            }

            it "fails with not found for an unknown id" {
                let notes = NoteService::new(setup_db());

                let err = notes
                    .update(&body(json!({
                        "id": "missing",
                        "user": "u1",
                        "title": "Shop",
                        "text": "milk",
                        "completed": false,
                    })))
                    .unwrap_err();
                assert!(matches!(err, ServiceError::NotFound(_)));
                assert_eq!(message(err), "Note not found");
            }
        }

        describe "delete" {
            it "requires an id" {
                let notes = NoteService::new(setup_db());
                let err = notes.delete(&body(json!({}))).unwrap_err();
                assert_eq!(message(err), "Note ID required");
            }

            it "removes the note and returns it" {
                let notes = NoteService::new(setup_db());
                let note = create_test_note(&notes, "u1", "Shop");

                let deleted = notes.delete(&body(json!({ "id": note.id }))).unwrap();
                assert_eq!(deleted.id, note.id);
                assert!(matches!(notes.list(), Err(ServiceError::NotFound(_))));

                let err = notes.delete(&body(json!({ "id": note.id }))).unwrap_err();
                assert_eq!(message(err), "Note not found");
            }
        }
    }

    describe "user service" {
        describe "list" {
            it "fails with not found when there are no users" {
                let users = UserService::new(setup_db());
                let err = users.list().unwrap_err();
                assert_eq!(message(err), "No users found");
            }

            it "never exposes passwords" {
                let users = UserService::new(setup_db());
                create_test_user(&users, "alice");

                let listed = serde_json::to_value(users.list().unwrap()).unwrap();
                assert_eq!(listed[0]["username"], "alice");
                assert!(listed[0].get("password").is_none());
            }
        }

        describe "create" {
            it "requires username and password" {
                let users = UserService::new(setup_db());

                let err = users.create(&body(json!({ "username": "alice" }))).unwrap_err();
                assert_eq!(message(err), "All fields are required");

                let err = users.create(&body(json!({ "password": "x" }))).unwrap_err();
                assert_eq!(message(err), "All fields are required");
            }

            it "hashes the password" {
                let db = setup_db();
                let users = UserService::new(db.clone());
                let user = create_test_user(&users, "alice");

                let hash = stored_hash(&db, &user.id);
                assert_ne!(hash, "hunter2");
                assert!(bcrypt::verify("hunter2", &hash).unwrap());
            }

            it "defaults roles unless a non-empty list is given" {
                let users = UserService::new(setup_db());

                let defaulted = users
                    .create(&body(json!({ "username": "a", "password": "x", "roles": [] })))
                    .unwrap();
                assert_eq!(defaulted.roles, vec!["Employee".to_string()]);

                let explicit = users
                    .create(&body(json!({ "username": "b", "password": "x", "roles": ["Manager"] })))
                    .unwrap();
                assert_eq!(explicit.roles, vec!["Manager".to_string()]);
            }

            it "stores scalar roles as strings" {
                let users = UserService::new(setup_db());

                let user = users
                    .create(&body(json!({ "username": "a", "password": "x", "roles": ["Manager", 7] })))
                    .unwrap();
                assert_eq!(user.roles, vec!["Manager".to_string(), "7".to_string()]);

                let err = users
                    .create(&body(json!({ "username": "b", "password": "x", "roles": [{}] })))
                    .unwrap_err();
                assert_eq!(message(err), "All fields are required");
            }

            it "rejects usernames that differ only in case" {
                let users = UserService::new(setup_db());
                create_test_user(&users, "Alice");

                let err = users
                    .create(&body(json!({ "username": "alice", "password": "x" })))
                    .unwrap_err();
                assert!(matches!(err, ServiceError::Conflict(_)));
                assert_eq!(message(err), "Duplicate username");
            }
        }

        describe "update" {
            it "rejects an empty role list" {
                let users = UserService::new(setup_db());
                let user = create_test_user(&users, "alice");

                let err = users
                    .update(&body(json!({
                        "id": user.id,
                        "username": "alice",
                        "roles": [],
                        "active": true,
                    })))
                    .unwrap_err();
                assert!(matches!(err, ServiceError::InvalidInput(_)));
                assert_eq!(message(err), "All fields except password is required");
            }

            it "keeps the stored hash when no password is given" {
                let db = setup_db();
                let users = UserService::new(db.clone());
                let user = create_test_user(&users, "alice");
                let before = stored_hash(&db, &user.id);

                let updated = users
                    .update(&body(json!({
                        "id": user.id,
                        "username": "ALICE",
                        "roles": ["Admin"],
                        "active": false,
                    })))
                    .unwrap();

                assert_eq!(updated.username, "ALICE");
                assert_eq!(updated.roles, vec!["Admin".to_string()]);
                assert!(!updated.active);
                assert_eq!(stored_hash(&db, &user.id), before);
            }

            it "rehashes a supplied password" {
                let db = setup_db();
                let users = UserService::new(db.clone());
                let user = create_test_user(&users, "alice");

                users
                    .update(&body(json!({
                        "id": user.id,
                        "username": "alice",
                        "roles": ["Employee"],
                        "active": true,
                        "password": "correct horse",
                    })))
                    .unwrap();

                let hash = stored_hash(&db, &user.id);
                assert!(bcrypt::verify("correct horse", &hash).unwrap());
            }

            it "rejects a username owned by another user" {
                let users = UserService::new(setup_db());
                create_test_user(&users, "alice");
                let bob = create_test_user(&users, "bob");

                let err = users
                    .update(&body(json!({
                        "id": bob.id,
                        "username": "Alice",
                        "roles": ["Employee"],
                        "active": true,
                    })))
                    .unwrap_err();
                assert!(matches!(err, ServiceError::Conflict(_)));
            }

            it "fails with not found for an unknown id" {
                let users = UserService::new(setup_db());

                let err = users
                    .update(&body(json!({
                        "id": "42",
                        "username": "alice",
                        "roles": ["Employee"],
                        "active": true,
                    })))
                    .unwrap_err();
                assert_eq!(message(err), "User not found!");
            }
        }

        describe "delete" {
            it "refuses users that still own notes" {
                let db = setup_db();
                let users = UserService::new(db.clone());
                let notes = NoteService::new(db);
                let user = create_test_user(&users, "alice");
                create_test_note(&notes, &user.id, "Shop");

                let err = users.delete(&body(json!({ "id": user.id }))).unwrap_err();
                assert!(matches!(err, ServiceError::InvalidInput(_)));
                assert_eq!(message(err), "User has assigned notes");
                assert_eq!(users.list().unwrap().len(), 1);
            }

            it "checks note ownership before existence" {
                let db = setup_db();
                let users = UserService::new(db.clone());
                let notes = NoteService::new(db);
                create_test_note(&notes, "42", "Shop");

                let err = users.delete(&body(json!({ "id": "42" }))).unwrap_err();
                assert_eq!(message(err), "User has assigned notes");
            }

            it "removes a user without notes" {
                let users = UserService::new(setup_db());
                let user = create_test_user(&users, "alice");

                let deleted = users.delete(&body(json!({ "id": user.id }))).unwrap();
                assert_eq!(deleted.username, "alice");

                let err = users.delete(&body(json!({ "id": user.id }))).unwrap_err();
                assert_eq!(message(err), "User not found");
            }

            it "requires an id" {
                let users = UserService::new(setup_db());
                let err = users.delete(&body(json!({ "id": "" }))).unwrap_err();
                assert_eq!(message(err), "User ID required");
            }
        }
    }
}
