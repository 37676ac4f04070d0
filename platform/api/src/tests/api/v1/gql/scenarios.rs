//! End to end flows through the schema. They need a database, run them with
//! `DATABASE_URL` set and `--ignored`.

use std::sync::Arc;
use std::time::Duration;

use async_graphql::{Request, Variables};
use common::prelude::FutureTimeout;
use futures_util::StreamExt;
use serde_json::{json, Value};
use serial_test::serial;

use crate::api::request_context::RequestContext;
use crate::api::v1::gql::ext::RequestExt;
use crate::api::v1::gql::{schema, MySchema};
use crate::config::AppConfig;
use crate::global::GlobalState;
use crate::tests::global::db_global_state;

struct Viewer {
	id: String,
	ctx: RequestContext,
}

async fn execute(schema: &MySchema, global: &Arc<GlobalState>, ctx: &RequestContext, query: &str, variables: Value) -> Value {
	let res = schema
		.execute(
			Request::from(query)
				.variables(Variables::from_json(variables))
				.provide_global(global.clone())
				.provide_context(ctx.clone()),
		)
		.timeout(Duration::from_secs(5))
		.await
		.unwrap();

	assert!(res.errors.is_empty(), "{:?}", res.errors);
	res.data.into_json().unwrap()
}

async fn register(schema: &MySchema, global: &Arc<GlobalState>, username: &str) -> Viewer {
	let ctx = RequestContext::default();
	let data = execute(
		schema,
		global,
		&ctx,
		r#"
			mutation($input: RegisterInput!) {
				register(registerInput: $input) {
					errors { field message }
					user { id }
				}
			}
		"#,
		json!({
			"input": {
				"email": format!("{username}@notes.local"),
				"username": username,
				"password": "hunter22a",
			}
		}),
	)
	.await;

	let id = data["register"]["user"]["id"].as_str().unwrap().to_string();

	Viewer { id, ctx }
}

async fn create_collection(schema: &MySchema, global: &Arc<GlobalState>, viewer: &Viewer, title: &str, visibility: &str) -> String {
	let data = execute(
		schema,
		global,
		&viewer.ctx,
		r#"
			mutation($title: String!, $visibility: String!) {
				createCollection(title: $title, visibility: $visibility) {
					collection { id }
					error { property message }
				}
			}
		"#,
		json!({ "title": title, "visibility": visibility }),
	)
	.await;

	data["createCollection"]["collection"]["id"].as_str().unwrap().to_string()
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_duplicate_registration() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	register(&schema, &global, "alice").await;

	let data = execute(
		&schema,
		&global,
		&RequestContext::default(),
		r#"
			mutation {
				register(registerInput: { email: "alice@notes.local", username: "alice", password: "hunter22a" }) {
					errors { field message }
					user { id }
				}
			}
		"#,
		json!({}),
	)
	.await;

	assert_eq!(
		data,
		json!({
			"register": {
				"errors": [{ "field": "registerInput", "message": "Already registered" }],
				"user": null,
			}
		})
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_vote_twice_restores_upvotes() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;
	let id = create_collection(&schema, &global, &alice, "recipes", "public").await;

	let vote = r#"
		mutation($id: ULID!) {
			vote(id: $id) {
				collection { upvotes }
			}
		}
	"#;

	let data = execute(&schema, &global, &bob.ctx, vote, json!({ "id": id })).await;
	assert_eq!(data["vote"]["collection"]["upvotes"], json!(1));

	let data = execute(&schema, &global, &bob.ctx, vote, json!({ "id": id })).await;
	assert_eq!(data["vote"]["collection"]["upvotes"], json!(0));

	let data = execute(
		&schema,
		&global,
		&bob.ctx,
		r#"
			mutation($id: ULID!) {
				first: vote(id: $id) { collection { upvotes } }
				second: vote(id: $id) { collection { upvotes } }
			}
		"#,
		json!({ "id": id }),
	)
	.await;
	assert_eq!(
		data,
		json!({
			"first": { "collection": { "upvotes": 1 } },
			"second": { "collection": { "upvotes": 0 } },
		})
	);

	let data = execute(
		&schema,
		&global,
		&bob.ctx,
		"query($id: ULID!) { me { upvoted } userVotes(userId: $id) { id } }",
		json!({ "id": bob.id }),
	)
	.await;
	assert_eq!(data, json!({ "me": { "upvoted": [] }, "userVotes": [] }));

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_collection_ownership() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;
	let public = create_collection(&schema, &global, &alice, "public one", "public").await;
	create_collection(&schema, &global, &alice, "secret one", "private").await;

	let data = execute(
		&schema,
		&global,
		&bob.ctx,
		"mutation($id: ULID!) { deleteCollection(id: $id) }",
		json!({ "id": public }),
	)
	.await;
	assert_eq!(data, json!({ "deleteCollection": false }));

	let data = execute(
		&schema,
		&global,
		&bob.ctx,
		r#"query { user(username: "alice") { collections { title } } publicNotes(username: "alice") { title } }"#,
		json!({}),
	)
	.await;
	assert_eq!(
		data,
		json!({
			"user": { "collections": [{ "title": "public one" }] },
			"publicNotes": [{ "title": "public one" }],
		})
	);

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"query { user(username: "alice") { collections { title } } }"#,
		json!({}),
	)
	.await;
	assert_eq!(data["user"]["collections"].as_array().unwrap().len(), 2);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_move_list_to_same_collection() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let collection = create_collection(&schema, &global, &alice, "work", "private").await;

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation($collectionId: ULID!) {
				createNotesList(collectionId: $collectionId, title: "todo") {
					notesList { id }
				}
			}
		"#,
		json!({ "collectionId": collection }),
	)
	.await;
	let list = data["createNotesList"]["notesList"]["id"].as_str().unwrap().to_string();

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation($location: ListLocationInput!, $target: ULID!) {
				moveList(listLocation: $location, newCollectionId: $target) {
					notesList { id }
					error { property message }
				}
			}
		"#,
		json!({
			"location": { "collectionId": collection, "listId": list },
			"target": collection,
		}),
	)
	.await;

	assert_eq!(
		data["moveList"]["error"],
		json!({
			"property": "listLocation.collectionId && newCollectionId",
			"message": "Source and target collections cannot be the same.",
		})
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_message_reaches_room_members() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let manager = tokio::spawn({
		let global = global.clone();
		async move { global.subscription_manager.run(global.ctx.clone()).await }
	});

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation($userId: ULID!) {
				createChatRoom(chatRoomInput: { name: "general", userIds: [$userId] }) {
					chatRoom { id members }
				}
			}
		"#,
		json!({ "userId": bob.id }),
	)
	.await;
	let room = data["createChatRoom"]["chatRoom"]["id"].as_str().unwrap().to_string();
	assert_eq!(data["createChatRoom"]["chatRoom"]["members"], json!([alice.id, bob.id]));

	let mut stream = schema.execute_stream(
		Request::from("subscription($chatId: ULID!) { messageSent(args: { chatId: $chatId }) { content senderId } }")
			.variables(Variables::from_json(json!({ "chatId": room })))
			.provide_global(global.clone())
			.provide_context(bob.ctx.clone()),
	);

	let send = {
		let schema = schema.clone();
		let global = global.clone();
		let ctx = alice.ctx.clone();
		let room = room.clone();
		async move {
			// The subscription has to be registered before the message is published.
			tokio::time::sleep(Duration::from_millis(200)).await;
			execute(
				&schema,
				&global,
				&ctx,
				r#"
					mutation($chatId: ULID!) {
						createMessage(createMessageInput: { chatId: $chatId, content: "hello" }) {
							message { id }
						}
					}
				"#,
				json!({ "chatId": room }),
			)
			.await
		}
	};

	let (response, _) = tokio::join!(stream.next().timeout(Duration::from_secs(5)), send);
	let response = response.unwrap().unwrap();

	assert!(response.errors.is_empty(), "{:?}", response.errors);
	assert_eq!(
		response.data.into_json().unwrap(),
		json!({ "messageSent": { "content": "hello", "senderId": alice.id } })
	);

	drop(stream);
	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
	manager.timeout(Duration::from_secs(1)).await.unwrap().unwrap().unwrap();
}

async fn create_list_with_note(schema: &MySchema, global: &Arc<GlobalState>, viewer: &Viewer, collection: &str) -> (String, String) {
	let data = execute(
		schema,
		global,
		&viewer.ctx,
		r#"
			mutation($collectionId: ULID!) {
				createNotesList(collectionId: $collectionId, title: "soups") {
					notesList { id }
				}
			}
		"#,
		json!({ "collectionId": collection }),
	)
	.await;
	let list = data["createNotesList"]["notesList"]["id"].as_str().unwrap().to_string();

	let data = execute(
		schema,
		global,
		&viewer.ctx,
		r#"
			mutation($location: ListLocationInput!) {
				addNote(listLocation: $location, noteInput: { title: "leek", body: "two stalks" }) {
					note { id }
				}
			}
		"#,
		json!({ "location": { "collectionId": collection, "listId": list } }),
	)
	.await;
	let note = data["addNote"]["note"]["id"].as_str().unwrap().to_string();

	(list, note)
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_unknown_ids_are_not_found() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation {
				follow(targetUserId: "this-id-does-not-exist")
				deleteCollection(id: "nope")
				updateCollection(id: "collection-does-not-exist", collectionInput: { title: "x" }) {
					error { property message }
				}
			}
		"#,
		json!({}),
	)
	.await;
	assert_eq!(
		data,
		json!({
			"follow": false,
			"deleteCollection": false,
			"updateCollection": {
				"error": { "property": "collection", "message": "Collection does not exist." },
			},
		})
	);

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"query { collection(id: "collection-does-not-exist") { error { property message } } }"#,
		json!({}),
	)
	.await;
	assert_eq!(
		data["collection"]["error"],
		json!({ "property": "collection", "message": "Collection does not exist." })
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_update_user_twice_in_one_request() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation {
				first: updateUser(username: "alicia") { errors { field } user { username } }
				second: updateUser(password: "newPassword") { errors { field } user { username } }
			}
		"#,
		json!({}),
	)
	.await;
	assert_eq!(
		data,
		json!({
			"first": { "errors": null, "user": { "username": "alicia" } },
			"second": { "errors": null, "user": { "username": "alicia" } },
		})
	);

	let data = execute(
		&schema,
		&global,
		&RequestContext::default(),
		r#"mutation { login(usernameOrEmail: "alicia", password: "newPassword") { errors { field } user { username } } }"#,
		json!({}),
	)
	.await;
	assert_eq!(data["login"], json!({ "errors": null, "user": { "username": "alicia" } }));

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"mutation { updateUser(username: "al") { errors { field message } user { id } } }"#,
		json!({}),
	)
	.await;
	assert_eq!(
		data["updateUser"],
		json!({
			"errors": [{ "field": "username", "message": "Username must be at least 3 characters long" }],
			"user": null,
		})
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_follow_toggles() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;

	let follow = "mutation($id: ULID!) { follow(targetUserId: $id) }";

	let data = execute(&schema, &global, &alice.ctx, follow, json!({ "id": bob.id })).await;
	assert_eq!(data, json!({ "follow": true }));

	let data = execute(&schema, &global, &alice.ctx, follow, json!({ "id": alice.id })).await;
	assert_eq!(data, json!({ "follow": null }));

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			query($bob: ULID!) {
				following { username }
				userFollowers(userId: $bob) { username }
			}
		"#,
		json!({ "bob": bob.id }),
	)
	.await;
	assert_eq!(
		data,
		json!({
			"following": [{ "username": "bob" }],
			"userFollowers": [{ "username": "alice" }],
		})
	);

	let data = execute(&schema, &global, &alice.ctx, follow, json!({ "id": bob.id })).await;
	assert_eq!(data, json!({ "follow": false }));

	let data = execute(&schema, &global, &bob.ctx, "query { followers { id } me { followers } }", json!({})).await;
	assert_eq!(data, json!({ "followers": [], "me": { "followers": [] } }));

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_activity_feed() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;

	create_collection(&schema, &global, &bob, "created", "public").await;
	let updated = create_collection(&schema, &global, &bob, "updated", "public").await;
	create_collection(&schema, &global, &bob, "hidden", "private").await;

	execute(
		&schema,
		&global,
		&bob.ctx,
		r#"
			mutation($id: ULID!) {
				updateCollection(id: $id, collectionInput: { title: "renamed" }) {
					collection { id }
				}
			}
		"#,
		json!({ "id": updated }),
	)
	.await;

	execute(
		&schema,
		&global,
		&alice.ctx,
		"mutation($id: ULID!) { follow(targetUserId: $id) }",
		json!({ "id": bob.id }),
	)
	.await;

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		"query { activityFeed { activity collection { title } } }",
		json!({}),
	)
	.await;
	let mut feed = data["activityFeed"].as_array().unwrap().clone();
	feed.sort_by_key(|item| item["collection"]["title"].as_str().unwrap().to_string());
	assert_eq!(
		feed,
		vec![
			json!({ "activity": "CREATE", "collection": { "title": "created" } }),
			json!({ "activity": "UPDATE", "collection": { "title": "renamed" } }),
		]
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_save_public_collection() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;
	let carol = register(&schema, &global, "carol").await;

	let recipes = create_collection(&schema, &global, &alice, "recipes", "public").await;
	let (_, note) = create_list_with_note(&schema, &global, &alice, &recipes).await;
	let secret = create_collection(&schema, &global, &carol, "secret", "private").await;

	let save = r#"
		mutation($target: ULID!, $id: ULID!) {
			savePublicCollection(targetUserId: $target, collectionId: $id) {
				collection { id ownerId title lists { title notes { id title body } } }
				error { property message }
			}
		}
	"#;

	let data = execute(&schema, &global, &bob.ctx, save, json!({ "target": alice.id, "id": recipes })).await;
	let copy = &data["savePublicCollection"]["collection"];
	assert_eq!(data["savePublicCollection"]["error"], json!(null));
	assert_ne!(copy["id"], json!(recipes));
	assert_eq!(copy["ownerId"], json!(bob.id));
	assert_eq!(copy["title"], json!("recipes"));
	assert_eq!(copy["lists"][0]["title"], json!("soups"));
	assert_eq!(copy["lists"][0]["notes"][0]["title"], json!("leek"));
	assert_eq!(copy["lists"][0]["notes"][0]["body"], json!("two stalks"));
	assert_ne!(copy["lists"][0]["notes"][0]["id"], json!(note));

	let data = execute(&schema, &global, &bob.ctx, save, json!({ "target": alice.id, "id": recipes })).await;
	assert_eq!(
		data["savePublicCollection"],
		json!({
			"collection": null,
			"error": { "property": "title", "message": "Collection with title 'recipes' already exisits." },
		})
	);

	let data = execute(&schema, &global, &bob.ctx, save, json!({ "target": carol.id, "id": secret })).await;
	assert_eq!(
		data["savePublicCollection"],
		json!({
			"collection": null,
			"error": { "property": "visibility", "message": "No public collections" },
		})
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_notes_not_found() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let collection = create_collection(&schema, &global, &alice, "work", "private").await;
	let (list, _) = create_list_with_note(&schema, &global, &alice, &collection).await;
	let missing = ulid::Ulid::new().to_string();

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation($collectionId: ULID!, $listId: ULID!, $missing: ULID!) {
				updateNotesList(
					listLocation: { collectionId: $collectionId, listId: $missing }
					notesListInput: { title: "renamed" }
				) {
					error { property message }
				}
				updateNote(
					noteLocation: { collectionId: $collectionId, listId: $listId, noteId: $missing }
					noteInput: { title: "leek", body: "three stalks" }
				) {
					error { property message }
				}
				deleteNote(noteLocation: { collectionId: $collectionId, listId: $listId, noteId: $missing })
			}
		"#,
		json!({ "collectionId": collection, "listId": list, "missing": missing }),
	)
	.await;
	assert_eq!(
		data,
		json!({
			"updateNotesList": { "error": { "property": "list", "message": "List note found" } },
			"updateNote": { "error": { "property": "note", "message": "Note note found." } },
			"deleteNote": false,
		})
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_chat_membership_errors() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;
	let carol = register(&schema, &global, "carol").await;

	let private = r#"
		mutation($userId: ULID!) {
			createChatPrivate(chatPrivateInput: { userId: $userId }) {
				chatPrivate { participants }
				error { property message }
			}
		}
	"#;

	let data = execute(&schema, &global, &alice.ctx, private, json!({ "userId": alice.id })).await;
	assert_eq!(
		data["createChatPrivate"]["error"],
		json!({ "property": "chatPrivateInput.userId", "message": "Cannot find a user for userA." })
	);

	let data = execute(&schema, &global, &alice.ctx, private, json!({ "userId": bob.id })).await;
	assert_eq!(
		data["createChatPrivate"]["chatPrivate"]["participants"],
		json!([alice.id, bob.id])
	);

	let data = execute(&schema, &global, &bob.ctx, private, json!({ "userId": alice.id })).await;
	assert_eq!(
		data["createChatPrivate"]["error"],
		json!({
			"property": "chatPrivates[].participants",
			"message": "Already have a private chat with the given user.",
		})
	);

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation($userId: ULID!) {
				createChatRoom(chatRoomInput: { name: "general", userIds: [$userId] }) {
					chatRoom { id }
				}
			}
		"#,
		json!({ "userId": bob.id }),
	)
	.await;
	let room = data["createChatRoom"]["chatRoom"]["id"].as_str().unwrap().to_string();

	let data = execute(
		&schema,
		&global,
		&bob.ctx,
		"mutation($id: ULID!) { joinChatRoom(chatRoomId: $id) { error { property message } } }",
		json!({ "id": room }),
	)
	.await;
	assert_eq!(
		data["joinChatRoom"]["error"],
		json!({ "property": "chatRoom.members", "message": "You are already a member of this chat room." })
	);

	let data = execute(
		&schema,
		&global,
		&carol.ctx,
		"mutation($id: ULID!) { leaveChatRoom(chatRoomId: $id) { error { property message } } }",
		json!({ "id": room }),
	)
	.await;
	assert_eq!(
		data["leaveChatRoom"]["error"],
		json!({ "property": "chatRoom.members", "message": "You are not a member of this chat room." })
	);

	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
}

#[serial]
#[tokio::test]
#[ignore]
async fn test_serial_message_skips_non_members() {
	let (global, handler) = db_global_state(AppConfig::default()).await;
	let schema = schema();

	let manager = tokio::spawn({
		let global = global.clone();
		async move { global.subscription_manager.run(global.ctx.clone()).await }
	});

	let alice = register(&schema, &global, "alice").await;
	let bob = register(&schema, &global, "bob").await;
	let carol = register(&schema, &global, "carol").await;

	let data = execute(
		&schema,
		&global,
		&alice.ctx,
		r#"
			mutation($userId: ULID!) {
				createChatRoom(chatRoomInput: { name: "general", userIds: [$userId] }) {
					chatRoom { id }
				}
			}
		"#,
		json!({ "userId": bob.id }),
	)
	.await;
	let room = data["createChatRoom"]["chatRoom"]["id"].as_str().unwrap().to_string();

	let mut stream = schema.execute_stream(
		Request::from("subscription($chatId: ULID!) { messageSent(args: { chatId: $chatId }) { content } }")
			.variables(Variables::from_json(json!({ "chatId": room })))
			.provide_global(global.clone())
			.provide_context(carol.ctx.clone()),
	);

	let send = {
		let schema = schema.clone();
		let global = global.clone();
		let ctx = alice.ctx.clone();
		let room = room.clone();
		async move {
			tokio::time::sleep(Duration::from_millis(200)).await;
			execute(
				&schema,
				&global,
				&ctx,
				r#"
					mutation($chatId: ULID!) {
						createMessage(createMessageInput: { chatId: $chatId, content: "members only" }) {
							message { id }
						}
					}
				"#,
				json!({ "chatId": room }),
			)
			.await
		}
	};

	let (response, _) = tokio::join!(stream.next().timeout(Duration::from_secs(1)), send);
	assert!(response.is_err(), "non-member received {response:?}");

	drop(stream);
	drop(global);
	handler.cancel().timeout(Duration::from_secs(1)).await.unwrap();
	manager.timeout(Duration::from_secs(1)).await.unwrap().unwrap().unwrap();
}
