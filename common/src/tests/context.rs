use std::time::Duration;

use tokio::time::timeout;

use crate::context::Context;

#[tokio::test]
async fn test_context_cancel() {
	let (ctx, handler) = Context::new();

	let handle = tokio::spawn(async move {
		ctx.done().await;
		assert!(ctx.is_done());
	});

	timeout(Duration::from_millis(300), handler.cancel())
		.await
		.expect("handler should finish once the task drops its context");

	timeout(Duration::from_millis(300), handle)
		.await
		.expect("task should be cancelled")
		.expect("panic in task");
}

#[tokio::test]
async fn test_cancel_waits_for_clones() {
	let (ctx, handler) = Context::new();
	let held = ctx.clone();
	drop(ctx);

	let cancel = tokio::spawn(handler.cancel());

	tokio::time::sleep(Duration::from_millis(50)).await;
	assert!(held.is_done());
	assert!(!cancel.is_finished());

	drop(held);

	timeout(Duration::from_millis(300), cancel)
		.await
		.expect("cancel should complete after the last clone is dropped")
		.expect("panic in task");
}

#[tokio::test]
async fn test_dropping_handler_cancels() {
	let (ctx, handler) = Context::new();
	assert!(!ctx.is_done());

	drop(handler);

	timeout(Duration::from_millis(300), ctx.done())
		.await
		.expect("context should be cancelled");
}

#[tokio::test]
async fn test_child_follows_parent() {
	let (parent, parent_handler) = Context::new();
	let (child, child_handler) = parent.child();

	let (sibling, sibling_handler) = parent.child();
	drop(sibling_handler);
	assert!(sibling.is_done());
	assert!(!parent.is_done());
	drop(sibling);

	let waiter = tokio::spawn(async move {
		child.done().await;
	});

	drop(parent);
	timeout(Duration::from_millis(300), parent_handler.cancel())
		.await
		.expect("parent cancel should not wait on child contexts");

	timeout(Duration::from_millis(300), waiter)
		.await
		.expect("child should be cancelled with its parent")
		.expect("panic in task");

	assert!(child_handler.is_done());
}
