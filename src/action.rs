//! Command handlers and the payload they receive

use futures_util::future::{self, BoxFuture, FutureExt};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Resolved value of one option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Boolean flag, or a valued flag given without its optional value
    Flag(bool),
    /// Number of occurrences of a counting flag
    Count(u8),
    /// Single value (or the declared default)
    Value(String),
    /// Values collected by a variadic option
    Values(Vec<String>),
}

impl OptionValue {
    /// Single value, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the option counts as set
    pub fn is_set(&self) -> bool {
        match self {
            Self::Flag(set) => *set,
            Self::Count(n) => *n > 0,
            Self::Value(_) => true,
            Self::Values(values) => !values.is_empty(),
        }
    }
}

/// Payload handed to an action when its command is matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMetaData {
    /// One entry per declared positional argument, in declaration order
    pub args: Vec<Option<String>>,

    /// Resolved options keyed by long name
    pub options: BTreeMap<String, OptionValue>,
}

impl ActionMetaData {
    /// Positional value at `index`
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(|value| value.as_deref())
    }

    /// Resolved option by long name
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Whether a flag was set
    pub fn flag(&self, name: &str) -> bool {
        self.option(name).is_some_and(OptionValue::is_set)
    }

    /// Single value of an option
    pub fn value(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(OptionValue::as_str)
    }
}

type HandlerFn = dyn Fn(ActionMetaData) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync;

/// Handler attached to a command
///
/// Cloning is cheap; clones share the same underlying closure.
#[derive(Clone)]
pub struct Action {
    handler: Arc<HandlerFn>,
}

impl Action {
    /// Wrap a synchronous handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(ActionMetaData) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(move |metadata| future::ready(handler(metadata)).boxed()),
        }
    }

    /// Wrap an asynchronous handler
    pub fn future<F, Fut>(handler: F) -> Self
    where
        F: Fn(ActionMetaData) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |metadata| handler(metadata).boxed()),
        }
    }

    /// Invoke the handler
    pub fn call(&self, metadata: ActionMetaData) -> BoxFuture<'static, anyhow::Result<()>> {
        (self.handler)(metadata)
    }

    /// Whether two actions share the same closure
    pub fn ptr_eq(&self, other: &Action) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_sync_action_runs_on_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let action = Action::new(move |metadata| {
            sink.lock().unwrap().push(metadata.arg(0).unwrap_or_default().to_string());
            Ok(())
        });

        let metadata = ActionMetaData {
            args: vec![Some("Ada".to_string())],
            ..Default::default()
        };
        action.call(metadata).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["Ada".to_string()]);
    }

    #[tokio::test]
    async fn test_async_action_error_passes_through() {
        let action = Action::future(|_| async { Err::<(), _>(anyhow::anyhow!("remote unavailable")) });
        let err = action.call(ActionMetaData::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "remote unavailable");
    }

    #[test]
    fn test_metadata_accessors() {
        let mut metadata = ActionMetaData {
            args: vec![Some("a".to_string()), None],
            ..Default::default()
        };
        metadata.options.insert("loud".to_string(), OptionValue::Flag(true));
        metadata.options.insert("quiet".to_string(), OptionValue::Flag(false));
        metadata.options.insert("out".to_string(), OptionValue::Value(".".to_string()));

        assert_eq!(metadata.arg(0), Some("a"));
        assert_eq!(metadata.arg(1), None);
        assert_eq!(metadata.arg(5), None);
        assert!(metadata.flag("loud"));
        assert!(!metadata.flag("quiet"));
        assert!(!metadata.flag("missing"));
        assert_eq!(metadata.value("out"), Some("."));
        assert_eq!(metadata.value("loud"), None);
    }

    #[test]
    fn test_clones_share_handler() {
        let action = Action::new(|_| Ok(()));
        let other = Action::new(|_| Ok(()));
        assert!(action.ptr_eq(&action.clone()));
        assert!(!action.ptr_eq(&other));
    }
}
