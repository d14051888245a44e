//! Ancestry resolution for converted resources
//!
//! Computes the org -> folder -> project chain above a resource, consulting a
//! shared cache before the resource manager API. The cache is keyed by every
//! identifier along a resolved chain, so sibling resources under the same
//! folder resolve without further network calls. Chains are immutable for the
//! duration of a run, which makes cache writes commutative; concurrent
//! populations are last-write-wins.

mod client;

pub use client::{CrmClient, HierarchyLookup, HierarchyNode};

use std::collections::HashMap;
use std::sync::RwLock;

use crate::asset::Asset;
use crate::config::ConvertConfig;
use crate::errors::{ConvertError, ConvertResult};
use crate::output;
use crate::tfdata::ResourceData;

const PROJECT_ASSET_TYPE: &str = "cloudresourcemanager.googleapis.com/Project";
const FOLDER_ASSET_TYPE: &str = "cloudresourcemanager.googleapis.com/Folder";
const ORGANIZATION_ASSET_TYPE: &str = "cloudresourcemanager.googleapis.com/Organization";
const BILLING_INFO_ASSET_TYPE: &str = "cloudbilling.googleapis.com/ProjectBillingInfo";

const UNKNOWN_ORGANIZATION: &str = "organizations/unknown";
const PARENT_PREFIX: &str = "//cloudresourcemanager.googleapis.com/";

/// Fetches the ancestor chain and CAI parent for a resource
pub trait AncestryManager: Send + Sync {
    /// Returns ancestors sorted from closest to furthest, plus the full CAI
    /// parent name for the asset.
    fn ancestors(
        &self,
        config: &ConvertConfig,
        data: &ResourceData,
        asset: &Asset,
    ) -> ConvertResult<(Vec<String>, String)>;
}

/// Manager that skips ancestry resolution entirely
pub struct NoOpAncestryManager;

impl AncestryManager for NoOpAncestryManager {
    fn ancestors(
        &self,
        _config: &ConvertConfig,
        _data: &ResourceData,
        _asset: &Asset,
    ) -> ConvertResult<(Vec<String>, String)> {
        Ok((Vec::new(), String::new()))
    }
}

/// Caching ancestry manager backed by an optional hierarchy client.
/// Without a client (offline mode) only pre-seeded entries resolve.
pub struct Manager {
    client: Option<Box<dyn HierarchyLookup>>,
    cache: RwLock<HashMap<String, Vec<String>>>,
}

impl Manager {
    /// Build a manager from the conversion config. Online mode constructs a
    /// resource manager client; the cache is seeded from
    /// `config.ancestry_cache` either way.
    pub fn new(config: &ConvertConfig) -> ConvertResult<Self> {
        let client: Option<Box<dyn HierarchyLookup>> = if config.offline {
            None
        } else {
            Some(Box::new(CrmClient::new(&config.user_agent)?))
        };
        Self::with_client(client, &config.ancestry_cache)
    }

    /// Build a manager around an explicit client (tests inject fakes here)
    pub fn with_client(
        client: Option<Box<dyn HierarchyLookup>>,
        entries: &HashMap<String, String>,
    ) -> ConvertResult<Self> {
        let manager = Self {
            client,
            cache: RwLock::new(HashMap::new()),
        };
        manager.seed(entries)?;
        Ok(manager)
    }

    fn seed(&self, entries: &HashMap<String, String>) -> ConvertResult<()> {
        for (item, ancestry) in entries {
            if item.is_empty() || ancestry.is_empty() {
                continue;
            }
            let mut ancestors = match parse_ancestry_path(ancestry) {
                Ok(a) => a,
                Err(err) => {
                    output::debug(&format!("skipping ancestry seed '{}': {}", ancestry, err));
                    continue;
                }
            };
            let key = parse_ancestry_key(item)?;
            // The cached chain includes the keyed resource itself
            if ancestors.first() != Some(&key) {
                ancestors.insert(0, key.clone());
            }
            self.store(&key, &ancestors);
        }
        Ok(())
    }

    fn store(&self, key: &str, ancestors: &[String]) {
        if key.is_empty() || ancestors.is_empty() {
            return;
        }
        let mut cache = self.cache.write().unwrap();
        cache
            .entry(key.to_string())
            .or_insert_with(|| ancestors.to_vec());
        // Cache every suffix of the chain under its own identifier
        for (i, ancestor) in ancestors.iter().enumerate() {
            cache
                .entry(ancestor.clone())
                .or_insert_with(|| ancestors[i..].to_vec());
        }
    }

    fn cached(&self, key: &str) -> Option<Vec<String>> {
        self.cache.read().unwrap().get(key).cloned()
    }

    /// Walk upward from `key` until an organization or a cached chain is
    /// reached, caching the result under every identifier visited.
    fn resolve_chain(&self, key: &str) -> ConvertResult<Vec<String>> {
        let mut ancestors: Vec<String> = Vec::new();
        let mut cur = key.to_string();

        while !cur.is_empty() {
            if let Some(mut chain) = self.cached(&cur) {
                ancestors.append(&mut chain);
                break;
            }
            if cur.starts_with("organizations/") {
                ancestors.push(cur.clone());
                break;
            }
            let Some(client) = self.client.as_ref() else {
                return Err(ConvertError::AncestryUnavailable { key: cur });
            };
            if let Some(project_id) = cur.strip_prefix("projects/") {
                // A single getAncestry call yields the whole remaining chain
                ancestors.extend(client.project_ancestry(project_id)?);
                cur.clear();
            } else {
                let node = client.get(&cur)?;
                ancestors.push(node.name.clone());
                cur = node.parent;
            }
        }

        self.store(key, &ancestors);
        Ok(ancestors)
    }

    fn fetch_ancestors(
        &self,
        config: &ConvertConfig,
        data: &ResourceData,
        asset: &Asset,
    ) -> ConvertResult<Vec<String>> {
        let org_key = data
            .get_string("org_id")
            .map(|id| prefixed("organizations/", &id));
        let folder_key = data
            .get_string("folder_id")
            .map(|id| prefixed("folders/", &id));
        let project_key = self
            .project_for_asset(config, data, asset)
            .map(|id| prefixed("projects/", &id));

        match asset.asset_type.as_str() {
            FOLDER_ASSET_TYPE => {
                let key = folder_key
                    .or(org_key)
                    .unwrap_or_else(|| UNKNOWN_ORGANIZATION.to_string());
                if key == UNKNOWN_ORGANIZATION {
                    return Ok(vec![key]);
                }
                self.resolve_chain(&key)
            }
            ORGANIZATION_ASSET_TYPE => {
                let key = org_key.ok_or_else(|| ConvertError::MalformedRecord {
                    address: data.address().to_string(),
                    message: "organization id not found in resource data".to_string(),
                })?;
                self.resolve_chain(&key)
            }
            PROJECT_ASSET_TYPE | BILLING_INFO_ASSET_TYPE => {
                let mut ancestors = Vec::new();
                if let Some(project) = &project_key {
                    ancestors.push(project.clone());
                }
                // Only one of org_id / folder_id may be set on a project
                if let Some(org) = org_key {
                    ancestors.push(org);
                    return Ok(ancestors);
                }
                if let Some(folder) = folder_key {
                    ancestors.extend(self.resolve_chain(&folder)?);
                    return Ok(ancestors);
                }
                match project_key {
                    Some(project) => self.resolve_chain(&project),
                    None => Ok(vec![UNKNOWN_ORGANIZATION.to_string()]),
                }
            }
            _ => match project_key {
                Some(project) => self.resolve_chain(&project),
                None => Ok(vec![UNKNOWN_ORGANIZATION.to_string()]),
            },
        }
    }

    /// Determine the project identifier the asset belongs to. Project-like
    /// assets prefer their numeric id; everything else reads the resource's
    /// `project` attribute, falling back to the configured default.
    fn project_for_asset(
        &self,
        config: &ConvertConfig,
        data: &ResourceData,
        asset: &Asset,
    ) -> Option<String> {
        match asset.asset_type.as_str() {
            PROJECT_ASSET_TYPE | BILLING_INFO_ASSET_TYPE => data
                .get_string("number")
                .or_else(|| data.get_string("project_id")),
            _ => data.project_or_default(config),
        }
    }
}

impl AncestryManager for Manager {
    fn ancestors(
        &self,
        config: &ConvertConfig,
        data: &ResourceData,
        asset: &Asset,
    ) -> ConvertResult<(Vec<String>, String)> {
        let ancestors = self.fetch_ancestors(config, data, asset)?;
        let parent = asset_parent(&asset.asset_type, &ancestors);
        Ok((ancestors, parent))
    }
}

/// The CAI parent name for an asset, derived from its ancestor chain.
/// Hierarchy resources (project, folder) are contained by the entry above
/// themselves; leaf resources are contained by the chain head.
fn asset_parent(asset_type: &str, ancestors: &[String]) -> String {
    let containing = match asset_type {
        PROJECT_ASSET_TYPE | FOLDER_ASSET_TYPE => {
            if ancestors.len() > 1 {
                ancestors.get(1)
            } else {
                ancestors.first()
            }
        }
        ORGANIZATION_ASSET_TYPE => None,
        _ => ancestors.first(),
    };
    match containing {
        Some(ancestor) => format!("{}{}", PARENT_PREFIX, ancestor),
        None => String::new(),
    }
}

fn prefixed(prefix: &str, id: &str) -> String {
    if id.starts_with(prefix) {
        id.to_string()
    } else {
        format!("{}{}", prefix, id)
    }
}

/// Normalize a seed key to `<type>/<id>`; bare ids are treated as projects.
fn parse_ancestry_key(val: &str) -> ConvertResult<String> {
    let key = normalize_ancestry(val);
    match key.rsplit_once('/') {
        None => Ok(format!("projects/{}", key)),
        Some((kind, _)) if matches!(kind, "projects" | "folders" | "organizations") => Ok(key),
        Some(_) => Err(ConvertError::InvalidAncestryPath {
            path: val.to_string(),
            message: "key must start with projects/, folders/, or organizations/".to_string(),
        }),
    }
}

/// Parse a root-first ancestry path like `organizations/1/folders/2` into a
/// closest-first chain `[folders/2, organizations/1]`.
fn parse_ancestry_path(path: &str) -> ConvertResult<Vec<String>> {
    let normalized = normalize_ancestry(path);
    let segments: Vec<&str> = normalized.split('/').collect();
    if segments.len() % 2 != 0 {
        return Err(ConvertError::InvalidAncestryPath {
            path: path.to_string(),
            message: "expected alternating <type>/<id> segments".to_string(),
        });
    }
    let mut ancestors = Vec::with_capacity(segments.len() / 2);
    for pair in segments.chunks(2) {
        if !matches!(pair[0], "projects" | "folders" | "organizations") {
            return Err(ConvertError::InvalidAncestryPath {
                path: path.to_string(),
                message: format!("unknown hierarchy type '{}'", pair[0]),
            });
        }
        ancestors.push(format!("{}/{}", pair[0], pair[1]));
    }
    ancestors.reverse();
    Ok(ancestors)
}

fn normalize_ancestry(val: &str) -> String {
    let mut out = val.to_string();
    for (old, new) in [
        ("organization/", "organizations/"),
        ("folder/", "folders/"),
        ("project/", "projects/"),
    ] {
        out = out.replace(old, new);
    }
    out
}
