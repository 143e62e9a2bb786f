//! Resource tags and their reconciliation.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys with this prefix are managed by AWS and cannot be set or removed.
pub const SYSTEM_TAG_PREFIX: &str = "aws:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn ignore_system(mut self) -> Self {
        self.0.retain(|key, _| !key.starts_with(SYSTEM_TAG_PREFIX));
        self
    }

    /// Keys present here but missing from `new`.
    pub fn removed(&self, new: &Tags) -> Vec<String> {
        self.0
            .keys()
            .filter(|key| !new.0.contains_key(*key))
            .cloned()
            .collect()
    }

    /// Entries of `new` that are missing here or carry a different value.
    pub fn updated(&self, new: &Tags) -> Tags {
        new.0
            .iter()
            .filter(|(key, value)| self.0.get(*key) != Some(*value))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Tagging operations of one service, addressed by resource identifier
/// (usually the ARN).
///
/// Implemented by the caller for the service that owns the resource;
/// CloudFormation stacks have no tagging API of their own, so none ships here.
#[async_trait]
pub trait TagResource {
    async fn list_tags(&self, identifier: &str) -> Result<Tags>;

    async fn tag_resource(&self, identifier: &str, tags: &Tags) -> Result<()>;

    async fn untag_resource(&self, identifier: &str, keys: &[String]) -> Result<()>;
}

/// Remote tags of `identifier` as they should be recorded in state.
pub async fn read_tags<C>(client: &C, identifier: &str) -> Result<Tags>
where
    C: TagResource + Sync + ?Sized,
{
    Ok(client.list_tags(identifier).await?.ignore_system())
}

/// Bring the remote tags of `identifier` from `old` to `new`.
///
/// Removed keys are untagged before changed entries are tagged. System tags
/// on either side are ignored.
pub async fn update_tags<C>(client: &C, identifier: &str, old: &Tags, new: &Tags) -> Result<()>
where
    C: TagResource + Sync + ?Sized,
{
    let old = old.clone().ignore_system();
    let new = new.clone().ignore_system();

    let removed = old.removed(&new);
    if !removed.is_empty() {
        tracing::debug!(identifier, keys = ?removed, "untagging resource");
        client.untag_resource(identifier, &removed).await?;
    }

    let updated = old.updated(&new);
    if !updated.is_empty() {
        tracing::debug!(identifier, ntags = updated.len(), "tagging resource");
        client.tag_resource(identifier, &updated).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq)]
    enum Call {
        Tag(String, Tags),
        Untag(String, Vec<String>),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Call>>,
        remote: Tags,
        fail_untag: bool,
    }

    #[async_trait]
    impl TagResource for Recorder {
        async fn list_tags(&self, _identifier: &str) -> Result<Tags> {
            Ok(self.remote.clone())
        }

        async fn tag_resource(&self, identifier: &str, tags: &Tags) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Tag(identifier.to_string(), tags.clone()));
            Ok(())
        }

        async fn untag_resource(&self, identifier: &str, keys: &[String]) -> Result<()> {
            if self.fail_untag {
                return Err(Error::Aws("AccessDenied".to_string()));
            }
            self.calls
                .lock()
                .unwrap()
                .push(Call::Untag(identifier.to_string(), keys.to_vec()));
            Ok(())
        }
    }

    const ARN: &str = "arn:aws:scheduler:eu-west-1:735669964269:schedule-group/default";

    #[test]
    fn test_diff() {
        let old: Tags = vec![("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        let new: Tags = vec![("b", "2"), ("c", "30"), ("d", "4")].into_iter().collect();

        assert_eq!(old.removed(&new), vec!["a".to_string()]);

        let updated = old.updated(&new);
        assert_eq!(updated.len(), 2);
        assert_eq!(updated.get("c"), Some("30"));
        assert_eq!(updated.get("d"), Some("4"));
        assert_eq!(updated.get("b"), None);
    }

    #[test]
    fn test_ignore_system() {
        let tags: Tags = vec![("aws:cloudformation:stack-name", "app"), ("team", "infra")]
            .into_iter()
            .collect();
        let tags = tags.ignore_system();
        assert_eq!(tags.keys().collect::<Vec<_>>(), vec!["team"]);
    }

    #[tokio::test]
    async fn test_read_tags_drops_system_tags() {
        let client = Recorder {
            remote: vec![("aws:cloudformation:logical-id", "Bucket"), ("env", "dev")]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let tags = read_tags(&client, ARN).await.unwrap();

        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![("env", "dev")]);
    }

    #[tokio::test]
    async fn test_update_tags_no_changes() {
        let client = Recorder::default();
        let tags: Tags = vec![("team", "infra")].into_iter().collect();

        update_tags(&client, ARN, &tags, &tags).await.unwrap();

        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_tags_untags_then_tags() {
        let client = Recorder::default();
        let old: Tags = vec![("team", "infra"), ("env", "dev")].into_iter().collect();
        let new: Tags = vec![("team", "platform")].into_iter().collect();

        update_tags(&client, ARN, &old, &new).await.unwrap();

        let expected_tags: Tags = vec![("team", "platform")].into_iter().collect();
        assert_eq!(
            *client.calls.lock().unwrap(),
            vec![
                Call::Untag(ARN.to_string(), vec!["env".to_string()]),
                Call::Tag(ARN.to_string(), expected_tags),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_tags_leaves_system_tags_alone() {
        let client = Recorder::default();
        let old: Tags = vec![("aws:cloudformation:stack-id", "x"), ("team", "infra")]
            .into_iter()
            .collect();
        let new: Tags = vec![("aws:created-by", "y"), ("team", "infra")]
            .into_iter()
            .collect();

        update_tags(&client, ARN, &old, &new).await.unwrap();

        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_tags_stops_on_error() {
        let client = Recorder {
            fail_untag: true,
            ..Default::default()
        };
        let old: Tags = vec![("env", "dev")].into_iter().collect();
        let new: Tags = vec![("team", "infra")].into_iter().collect();

        let err = update_tags(&client, ARN, &old, &new).await.unwrap_err();

        assert_eq!(err, Error::Aws("AccessDenied".to_string()));
        assert!(client.calls.lock().unwrap().is_empty());
    }
}
