//! Removal of operational fields from resources handed back to callers

use serde_json::Value as JsonValue;

use crate::nested;

/// Metadata fields that are always stripped
pub const OPERATIONAL_METADATA_FIELDS: [&str; 3] = ["resourceVersion", "managedFields", "selfLink"];

/// Strips operational metadata and any configured sensitive paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sanitizer {
    extra_fields: Vec<Vec<String>>,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also strip the given dotted paths, e.g. `spec.credentials.token`
    ///
    /// Empty paths and empty segments are ignored.
    pub fn with_extra_fields<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            let segments: Vec<String> = path
                .as_ref()
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect();
            if !segments.is_empty() {
                self.extra_fields.push(segments);
            }
        }
        self
    }

    /// Configured extra paths, dotted
    pub fn extra_fields(&self) -> Vec<String> {
        self.extra_fields.iter().map(|p| p.join(".")).collect()
    }

    /// Sanitize a single resource in place
    pub fn sanitize(&self, resource: &mut JsonValue) {
        tracing::debug!(
            name = nested::string(resource, &["metadata", "name"]).or("").unwrap_or_default(),
            namespace = nested::string(resource, &["metadata", "namespace"]).or("").unwrap_or_default(),
            kind = nested::string(resource, &["kind"]).or("").unwrap_or_default(),
            "Sanitizing resource"
        );

        for field in OPERATIONAL_METADATA_FIELDS {
            nested::remove(resource, &["metadata", field]);
        }

        for path in &self.extra_fields {
            let segments: Vec<&str> = path.iter().map(String::as_str).collect();
            nested::remove(resource, &segments);
        }
    }

    /// Sanitize every resource in a list
    pub fn sanitize_all(&self, resources: &mut [JsonValue]) {
        for resource in resources {
            self.sanitize(resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn github_repo() -> JsonValue {
        json!({
            "apiVersion": "promise.platform.giantswarm.io/v1beta1",
            "kind": "GitHubRepo",
            "metadata": {
                "name": "payments",
                "namespace": "team-a",
                "uid": "5b0c1e9a",
                "labels": { "team": "a" },
                "resourceVersion": "48213",
                "selfLink": "/apis/promise.platform.giantswarm.io/v1beta1/namespaces/team-a/githubrepos/payments",
                "managedFields": [{ "manager": "kubectl", "operation": "Apply" }]
            },
            "spec": {
                "visibility": "private",
                "credentials": { "token": "ghp_secret", "user": "bot" }
            }
        })
    }

    #[test]
    fn test_strips_operational_fields() {
        let mut resource = github_repo();
        Sanitizer::new().sanitize(&mut resource);

        let metadata = resource["metadata"].as_object().unwrap();
        for field in OPERATIONAL_METADATA_FIELDS {
            assert!(!metadata.contains_key(field), "{field} not removed");
        }
        assert_eq!(metadata["name"], "payments");
        assert_eq!(metadata["namespace"], "team-a");
        assert_eq!(metadata["uid"], "5b0c1e9a");
        assert_eq!(metadata["labels"], json!({ "team": "a" }));
        assert_eq!(resource["spec"], github_repo()["spec"]);
    }

    #[test]
    fn test_absent_fields_are_noop() {
        let mut resource = json!({ "kind": "GitHubApp", "spec": { "name": "x" } });
        let before = resource.clone();
        Sanitizer::new().sanitize(&mut resource);
        assert_eq!(resource, before);
    }

    #[test]
    fn test_extra_fields() {
        let sanitizer = Sanitizer::new().with_extra_fields(["spec.credentials.token", "", "status."]);
        assert_eq!(sanitizer.extra_fields(), vec!["spec.credentials.token", "status"]);

        let mut resource = github_repo();
        sanitizer.sanitize(&mut resource);
        assert_eq!(resource["spec"]["credentials"], json!({ "user": "bot" }));
    }

    #[test]
    fn test_sanitize_all() {
        let mut resources = vec![github_repo(), github_repo()];
        Sanitizer::new().sanitize_all(&mut resources);
        assert!(
            resources
                .iter()
                .all(|r| r["metadata"].get("resourceVersion").is_none())
        );
    }
}
