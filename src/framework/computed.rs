//! Actions as plain functions.
//!
//! [`computed_action`] turns an action name into a function that any [`ActionFor`] host
//! can call, which is handy for components (controllers, services) that only hold a
//! reference to something able to resolve actions.

use serde_json::Value;

use super::core::{ActionFor, ActionFuture};

/// Returns a function that resolves `action_name` on its host at call time and invokes it.
///
/// # Example
/// ```ignore
/// let publish = computed_action::<Record>("publish");
/// let body = publish(&post, json!({"notify": true})).await?;
/// ```
pub fn computed_action<H>(action_name: impl Into<String>) -> impl Fn(&H, Value) -> ActionFuture
where
    H: ActionFor + ?Sized,
{
    let action_name = action_name.into();
    move |host: &H, params: Value| host.invoke(&action_name, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{ActionError, BoundAction};
    use futures::FutureExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts resolutions so tests can see when they happen.
    #[derive(Default)]
    struct Controller {
        resolved: AtomicUsize,
    }

    impl ActionFor for Controller {
        fn action_for(&self, action_name: &str) -> Result<BoundAction, ActionError> {
            self.resolved.fetch_add(1, Ordering::SeqCst);
            let name = action_name.to_owned();
            Ok(BoundAction::new(action_name, move |params| {
                let name = name.clone();
                async move { Ok(json!({"action": name, "params": params})) }.boxed()
            }))
        }
    }

    #[tokio::test]
    async fn test_resolves_on_each_call() {
        let controller = Controller::default();
        let publish = computed_action::<Controller>("publish");
        assert_eq!(controller.resolved.load(Ordering::SeqCst), 0);

        let first = publish(&controller, json!(1)).await.unwrap();
        let second = publish(&controller, json!(2)).await.unwrap();

        assert_eq!(first, json!({"action": "publish", "params": 1}));
        assert_eq!(second, json!({"action": "publish", "params": 2}));
        assert_eq!(controller.resolved.load(Ordering::SeqCst), 2);
    }
}
