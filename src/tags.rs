//! Tag reconciliation for Block Storage resources.

/// Prefix of the Kubernetes cluster ownership tag.
pub const CLUSTER_TAG_PREFIX: &str = "kubernetes.io/cluster/";

/// Key of the legacy cluster ownership tag.
pub const CLUSTER_TAG_KEY: &str = "KubernetesCluster";

/// Ordered list of tags without duplicates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Builds a set from `tags`, keeping the first occurrence of each value.
    #[must_use]
    pub fn unique<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.extend(tags);
        set
    }

    /// Concatenates `first` and `second`, then removes duplicates.
    #[must_use]
    pub fn merge(first: &[String], second: &[String]) -> Self {
        Self::unique(first.iter().chain(second).cloned())
    }

    /// Appends tags that are not already present.
    pub fn extend<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags.into_iter().map(Into::<String>::into) {
            if !self.0.contains(&tag) {
                self.0.push(tag);
            }
        }
    }

    /// Tags in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the set and returns its tags.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Returns `true` for tags asserting cluster ownership.
#[must_use]
pub fn is_ownership_tag(tag: &str) -> bool {
    tag.starts_with(CLUSTER_TAG_PREFIX)
        || tag
            .split_once(':')
            .map_or(tag == CLUSTER_TAG_KEY, |(key, _)| key == CLUSTER_TAG_KEY)
}

/// Re-targets ownership tags at `cluster_name`.
///
/// With a cluster name, the result starts with the two ownership tags for
/// that cluster followed by every source tag that is not itself an ownership
/// tag. Without one, the source tags are returned unchanged.
#[must_use]
pub fn rewrite_ownership(source: &[String], cluster_name: Option<&str>) -> Vec<String> {
    let Some(cluster) = cluster_name else {
        return source.to_vec();
    };

    let mut result = Vec::with_capacity(source.len() + 2);
    result.push(format!("{CLUSTER_TAG_PREFIX}{cluster}:owned"));
    result.push(format!("{CLUSTER_TAG_KEY}:{cluster}"));
    result.extend(
        source
            .iter()
            .filter(|tag| !is_ownership_tag(tag))
            .cloned(),
    );
    result
}
