//! Resource manager API client for hierarchy lookups
//!
//! Two endpoints are used: the v1 `projects.getAncestry` call, which returns
//! the whole chain above a project at once, and the v3 resource get, which
//! returns a single folder/project with its parent. Credentials delegate to
//! `GOOGLE_OAUTH_ACCESS_TOKEN`.

use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::errors::{ConvertError, ConvertResult};
use crate::output;

const V1_BASE: &str = "https://cloudresourcemanager.googleapis.com/v1";
const V3_BASE: &str = "https://cloudresourcemanager.googleapis.com/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// A single hierarchy resource with its parent reference
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Resource name, e.g. `folders/456`
    pub name: String,
    /// Parent resource name; empty for organizations
    pub parent: String,
}

/// Hierarchy lookups, behind a trait so tests can inject in-memory fakes
pub trait HierarchyLookup: Send + Sync {
    /// Full ancestry for a project, sorted from closest to furthest.
    /// The chain includes the project itself.
    fn project_ancestry(&self, project_id: &str) -> ConvertResult<Vec<String>>;

    /// Fetch a single hierarchy resource by name (`folders/456`)
    fn get(&self, name: &str) -> ConvertResult<HierarchyNode>;
}

/// Cloud Resource Manager client over HTTP
pub struct CrmClient {
    http: reqwest::blocking::Client,
    v1_base: String,
    v3_base: String,
}

impl CrmClient {
    pub fn new(user_agent: &str) -> ConvertResult<Self> {
        Self::with_bases(user_agent, V1_BASE, V3_BASE)
    }

    fn with_bases(user_agent: &str, v1_base: &str, v3_base: &str) -> ConvertResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConvertError::HierarchyApi(e.to_string()))?;
        Ok(Self {
            http,
            v1_base: v1_base.to_string(),
            v3_base: v3_base.to_string(),
        })
    }

    /// Send a request, retrying transport failures and 5xx responses with
    /// exponential backoff. 403/404 map to their dedicated error variants.
    fn send_with_retry(
        &self,
        method: reqwest::Method,
        url: &str,
        resource: &str,
    ) -> ConvertResult<Value> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut request = self.http.request(method.clone(), url);
            if let Ok(token) = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
                request = request.bearer_auth(token);
            }
            if method == reqwest::Method::POST {
                request = request.json(&serde_json::json!({}));
            }

            match request.send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json()
                            .map_err(|e| ConvertError::HierarchyApi(e.to_string()));
                    }
                    if status == reqwest::StatusCode::FORBIDDEN {
                        return Err(ConvertError::PermissionDenied {
                            resource: resource.to_string(),
                        });
                    }
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(ConvertError::HierarchyNotFound {
                            resource: resource.to_string(),
                        });
                    }
                    if status.is_server_error() && attempt < MAX_ATTEMPTS {
                        thread::sleep(BACKOFF_BASE * 2u32.pow(attempt - 1));
                        continue;
                    }
                    return Err(ConvertError::HierarchyApi(format!(
                        "{} returned status {}",
                        resource, status
                    )));
                }
                Err(err) if attempt < MAX_ATTEMPTS => {
                    output::debug(&format!(
                        "{}: attempt {} failed ({}), retrying",
                        resource, attempt, err
                    ));
                    thread::sleep(BACKOFF_BASE * 2u32.pow(attempt - 1));
                }
                Err(err) => return Err(ConvertError::HierarchyApi(err.to_string())),
            }
        }
    }
}

impl HierarchyLookup for CrmClient {
    fn project_ancestry(&self, project_id: &str) -> ConvertResult<Vec<String>> {
        let resource = format!("projects/{}", project_id);
        let url = format!("{}/projects/{}:getAncestry", self.v1_base, project_id);
        let body = self.send_with_retry(reqwest::Method::POST, &url, &resource)?;
        parse_ancestry_response(&body, &resource)
    }

    fn get(&self, name: &str) -> ConvertResult<HierarchyNode> {
        let url = format!("{}/{}", self.v3_base, name);
        let body = self.send_with_retry(reqwest::Method::GET, &url, name)?;
        parse_node_response(&body, name)
    }
}

/// Decode a v1 getAncestry response into `<type>s/<id>` entries
fn parse_ancestry_response(body: &Value, resource: &str) -> ConvertResult<Vec<String>> {
    let ancestors = body
        .get("ancestor")
        .and_then(|a| a.as_array())
        .ok_or_else(|| {
            ConvertError::HierarchyApi(format!("{}: getAncestry response has no ancestors", resource))
        })?;

    let mut chain = Vec::with_capacity(ancestors.len());
    for ancestor in ancestors {
        let resource_id = ancestor.get("resourceId");
        let kind = resource_id
            .and_then(|r| r.get("type"))
            .and_then(|t| t.as_str());
        let id = resource_id
            .and_then(|r| r.get("id"))
            .and_then(|i| i.as_str());
        match (kind, id) {
            (Some(kind), Some(id)) => chain.push(format!("{}s/{}", kind, id)),
            _ => {
                return Err(ConvertError::HierarchyApi(format!(
                    "{}: malformed ancestor entry in getAncestry response",
                    resource
                )));
            }
        }
    }
    Ok(chain)
}

/// Decode a v3 resource get response into a node with its parent
fn parse_node_response(body: &Value, resource: &str) -> ConvertResult<HierarchyNode> {
    let name = body
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| {
            ConvertError::HierarchyApi(format!("{}: response has no resource name", resource))
        })?;
    let parent = body
        .get("parent")
        .and_then(|p| p.as_str())
        .unwrap_or_default();
    Ok(HierarchyNode {
        name: name.to_string(),
        parent: parent.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ancestry_response() {
        let body = json!({
            "ancestor": [
                {"resourceId": {"type": "project", "id": "123"}},
                {"resourceId": {"type": "folder", "id": "456"}},
                {"resourceId": {"type": "organization", "id": "1"}}
            ]
        });
        let chain = parse_ancestry_response(&body, "projects/123").unwrap();
        assert_eq!(chain, vec!["projects/123", "folders/456", "organizations/1"]);
    }

    #[test]
    fn test_parse_ancestry_response_rejects_malformed_entries() {
        let body = json!({"ancestor": [{"resourceId": {"type": "project"}}]});
        assert!(parse_ancestry_response(&body, "projects/123").is_err());
        assert!(parse_ancestry_response(&json!({}), "projects/123").is_err());
    }

    #[test]
    fn test_parse_node_response() {
        let body = json!({"name": "folders/456", "parent": "organizations/1"});
        let node = parse_node_response(&body, "folders/456").unwrap();
        assert_eq!(node.name, "folders/456");
        assert_eq!(node.parent, "organizations/1");
    }

    #[test]
    fn test_parse_node_response_without_parent() {
        let body = json!({"name": "organizations/1"});
        let node = parse_node_response(&body, "organizations/1").unwrap();
        assert!(node.parent.is_empty());
    }

    #[test]
    fn test_transport_failures_are_retried_then_surfaced() {
        // Discard port: connection refused on every attempt
        let client =
            CrmClient::with_bases("caiconv-test", "http://127.0.0.1:9", "http://127.0.0.1:9")
                .unwrap();
        let err = client.project_ancestry("123").unwrap_err();
        assert!(matches!(err, ConvertError::HierarchyApi(_)));
    }
}
