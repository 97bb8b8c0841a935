//! Record shapes of the IP pool listing API (`api/v2/pool/ip/`), and the
//! allocation tree built from them.
//!
//! Only the fields the layout needs are modelled; unknown fields are ignored.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cidr::Ipv4Cidr;
use crate::error::IpSpaceError;

/// Utilization of a pool with no subnets, in percent.
const FULL: f64 = 100.0;

/// Reference to another pool by its API id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRef {
    /// API id of the referenced pool
    #[serde(rename = "@id")]
    pub id: String,
}

/// One allocated IP pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Network address
    pub network: Ipv4Addr,
    /// Prefix length, not yet validated
    pub prefix_length: u8,
    /// Free-form label
    #[serde(default)]
    pub description: Option<String>,
    /// API id
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Outermost pool this one was allocated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_level: Option<PoolRef>,
}

impl Pool {
    /// The pool as a network.
    ///
    /// # Errors
    ///
    /// [`IpSpaceError::InvalidPrefix`] when `prefix_length` is above 32.
    pub fn cidr(&self) -> Result<Ipv4Cidr, IpSpaceError> {
        Ipv4Cidr::new(self.network, self.prefix_length)
    }

    /// A pool is top level when it is its own top-level ancestor, or names none.
    pub fn is_top_level(&self) -> bool {
        match (&self.id, &self.top_level) {
            (_, None) => true,
            (Some(id), Some(top)) => *id == top.id,
            (None, Some(_)) => false,
        }
    }
}

/// One page of a paginated listing. `next` is the URL of the following page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPage {
    /// URL of the following page, `None` on the last one
    #[serde(default)]
    pub next: Option<String>,
    /// Pools on this page
    #[serde(default)]
    pub results: Vec<Pool>,
}

impl PoolPage {
    /// Whether no page follows this one
    pub const fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Pools on this page that are their own top-level ancestor
    pub fn top_level(&self) -> impl Iterator<Item = &Pool> {
        self.results.iter().filter(|pool| pool.is_top_level())
    }
}

/// Handle of a pool inside a [`PoolTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(usize);

#[derive(Clone, Debug)]
struct PoolNode {
    pool: Pool,
    cidr: Ipv4Cidr,
    parent: Option<PoolId>,
    subnets: Vec<PoolId>,
    utilization: f64,
}

/// Pools nested by containment, with the share of each pool taken up by subnets.
///
/// Every pool hangs under the smallest other pool containing it. A pool listed
/// twice nests under its first occurrence.
///
/// Utilization is in percent. A pool with no subnets is fully used. Otherwise
/// each direct subnet contributes its own utilization weighted by its share of
/// the parent's addresses.
///
/// ```
/// use ipspace::{Pool, PoolTree};
///
/// let pools: Vec<Pool> = serde_json::from_str(r#"[
///     {"network": "10.0.0.0", "prefix_length": 16},
///     {"network": "10.0.0.0", "prefix_length": 17}
/// ]"#).unwrap();
/// let tree = PoolTree::from_pools(pools).unwrap();
/// let root = tree.roots()[0];
/// assert_eq!(tree.utilization(root), Some(50.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PoolTree {
    /// Parents always precede their subnets
    nodes: Vec<PoolNode>,
    roots: Vec<PoolId>,
}

impl PoolTree {
    /// Builds the tree from pools in any order.
    ///
    /// # Errors
    ///
    /// [`IpSpaceError::InvalidPrefix`] for a pool whose prefix length is above 32.
    pub fn from_pools<I: IntoIterator<Item = Pool>>(pools: I) -> Result<Self, IpSpaceError> {
        let mut placed = pools
            .into_iter()
            .map(|pool| Ok((pool.cidr()?, pool)))
            .collect::<Result<Vec<_>, IpSpaceError>>()?;
        // Wider networks first, so every parent is placed before its subnets
        placed.sort_by_key(|(cidr, _)| (cidr.prefix_len(), cidr.network()));

        let mut tree = Self::default();
        for (cidr, pool) in placed {
            let id = PoolId(tree.nodes.len());
            let parent = tree.deepest_containing(cidr);
            match parent {
                Some(parent) => tree.nodes[parent.0].subnets.push(id),
                None => tree.roots.push(id),
            }
            tree.nodes.push(PoolNode {
                pool,
                cidr,
                parent,
                subnets: Vec::new(),
                utilization: FULL,
            });
        }

        for index in (0..tree.nodes.len()).rev() {
            let node = &tree.nodes[index];
            if node.subnets.is_empty() {
                continue;
            }
            let used: f64 = node
                .subnets
                .iter()
                .map(|child| {
                    let child = &tree.nodes[child.0];
                    let share = 0.5_f64.powi(i32::from(child.cidr.prefix_len() - node.cidr.prefix_len()));
                    share * child.utilization
                })
                .sum();
            tree.nodes[index].utilization = used;
        }

        debug!(pools = tree.nodes.len(), roots = tree.roots.len(), "pool tree");
        Ok(tree)
    }

    /// Pools not contained in any other pool, widest network first
    pub fn roots(&self) -> &[PoolId] {
        &self.roots
    }

    /// Every pool, each parent ahead of its subnets
    pub fn ids(&self) -> impl Iterator<Item = PoolId> {
        (0..self.nodes.len()).map(PoolId)
    }

    /// Number of pools in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no pools
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The record behind `id`
    pub fn pool(&self, id: PoolId) -> Option<&Pool> {
        self.node(id).map(|node| &node.pool)
    }

    /// Network of `id`
    pub fn cidr(&self, id: PoolId) -> Option<Ipv4Cidr> {
        self.node(id).map(|node| node.cidr)
    }

    /// Smallest pool containing `id`
    pub fn parent(&self, id: PoolId) -> Option<PoolId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Pools directly inside `id`
    pub fn subnets(&self, id: PoolId) -> &[PoolId] {
        self.node(id).map(|node| node.subnets.as_slice()).unwrap_or_default()
    }

    /// Percentage of `id` taken up by its subnets, 100 for a pool without any
    pub fn utilization(&self, id: PoolId) -> Option<f64> {
        self.node(id).map(|node| node.utilization)
    }

    /// First pool listed for exactly `cidr`
    pub fn find(&self, cidr: Ipv4Cidr) -> Option<PoolId> {
        let mut level = &self.roots;
        loop {
            let &next = level.iter().find(|id| self.nodes[id.0].cidr.contains(cidr))?;
            if self.nodes[next.0].cidr == cidr {
                return Some(next);
            }
            level = &self.nodes[next.0].subnets;
        }
    }

    fn node(&self, id: PoolId) -> Option<&PoolNode> {
        self.nodes.get(id.0)
    }

    /// Deepest pool containing `cidr`. Siblings never overlap, so at most one
    /// per level matches.
    fn deepest_containing(&self, cidr: Ipv4Cidr) -> Option<PoolId> {
        let mut level = &self.roots;
        let mut found = None;
        while let Some(&next) = level.iter().find(|id| self.nodes[id.0].cidr.contains(cidr)) {
            found = Some(next);
            level = &self.nodes[next.0].subnets;
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "count": 3,
        "next": "http://example.net/api/v2/pool/ip/?format=json&page=2&prefix_length=24",
        "results": [
            {
                "@id": "a",
                "network": "10.0.0.0",
                "prefix_length": 24,
                "description": "backbone",
                "top_level": {"@id": "a"}
            },
            {
                "@id": "b",
                "network": "10.0.0.128",
                "prefix_length": 25,
                "description": null,
                "top_level": {"@id": "a"}
            },
            {
                "network": "10.9.0.0",
                "prefix_length": 16
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_page() {
        let page: PoolPage = serde_json::from_str(PAGE).unwrap();
        assert!(!page.is_last());
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].description.as_deref(), Some("backbone"));
        assert_eq!(page.results[1].description, None);
        assert_eq!(
            page.results[1].cidr().unwrap(),
            "10.0.0.128/25".parse::<Ipv4Cidr>().unwrap()
        );
    }

    #[test]
    fn test_top_level() {
        let page: PoolPage = serde_json::from_str(PAGE).unwrap();
        let ids: Vec<_> = page
            .top_level()
            .map(|pool| pool.cidr().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["10.0.0.0/24", "10.9.0.0/16"]);
    }

    #[test]
    fn test_last_page() {
        let page: PoolPage = serde_json::from_str(r#"{"next": null, "results": []}"#).unwrap();
        assert!(page.is_last());
        assert_eq!(page.top_level().count(), 0);
    }

    fn pool(cidr: &str, description: &str) -> Pool {
        let cidr: Ipv4Cidr = cidr.parse().unwrap();
        Pool {
            network: cidr.network(),
            prefix_length: cidr.prefix_len(),
            description: Some(description.to_string()),
            id: None,
            top_level: None,
        }
    }

    fn utilization_of(tree: &PoolTree, cidr: &str) -> f64 {
        let id = tree.find(cidr.parse().unwrap()).unwrap();
        tree.utilization(id).unwrap()
    }

    #[test]
    fn test_leaf_is_fully_used() {
        let tree = PoolTree::from_pools([pool("10.0.0.0/24", "lan")]).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(utilization_of(&tree, "10.0.0.0/24"), 100.0);
    }

    #[test]
    fn test_half_allocated_parent() {
        let tree = PoolTree::from_pools([pool("10.0.0.0/16", "site"), pool("10.0.128.0/17", "upper")]).unwrap();
        assert_eq!(utilization_of(&tree, "10.0.0.0/16"), 50.0);
        assert_eq!(utilization_of(&tree, "10.0.128.0/17"), 100.0);
    }

    #[test]
    fn test_two_levels_of_nesting() {
        // Listed innermost first; the tree does not depend on input order
        let tree = PoolTree::from_pools([
            pool("10.0.0.0/18", "leaf"),
            pool("10.0.0.0/17", "middle"),
            pool("10.0.0.0/16", "top"),
        ])
        .unwrap();
        assert_eq!(utilization_of(&tree, "10.0.0.0/18"), 100.0);
        assert_eq!(utilization_of(&tree, "10.0.0.0/17"), 50.0);
        assert_eq!(utilization_of(&tree, "10.0.0.0/16"), 25.0);

        let leaf = tree.find("10.0.0.0/18".parse().unwrap()).unwrap();
        let middle = tree.parent(leaf).unwrap();
        let top = tree.parent(middle).unwrap();
        assert_eq!(tree.pool(middle).unwrap().description.as_deref(), Some("middle"));
        assert_eq!(tree.roots(), &[top]);
        assert_eq!(tree.parent(top), None);
    }

    #[test]
    fn test_siblings_add_up() {
        let tree = PoolTree::from_pools([
            pool("10.0.0.0/16", "site"),
            pool("10.0.0.0/17", "lower"),
            pool("10.0.128.0/18", "quarter"),
            pool("10.0.192.0/24", "sliver"),
        ])
        .unwrap();
        // 50 + 25 + 100 / 256
        assert_eq!(utilization_of(&tree, "10.0.0.0/16"), 75.390_625);
        let site = tree.roots()[0];
        assert_eq!(tree.subnets(site).len(), 3);
    }

    #[test]
    fn test_forest_and_duplicates() {
        let tree = PoolTree::from_pools([
            pool("10.0.0.0/16", "first"),
            pool("192.168.0.0/24", "other"),
            pool("10.0.0.0/16", "again"),
        ])
        .unwrap();
        assert_eq!(tree.roots().len(), 2);

        let first = tree.find("10.0.0.0/16".parse().unwrap()).unwrap();
        assert_eq!(tree.pool(first).unwrap().description.as_deref(), Some("first"));
        let again = tree.subnets(first)[0];
        assert_eq!(tree.pool(again).unwrap().description.as_deref(), Some("again"));
        // The copy covers all of it
        assert_eq!(tree.utilization(first), Some(100.0));

        assert_eq!(tree.find("10.1.0.0/16".parse().unwrap()), None);
        assert_eq!(tree.ids().count(), 3);
    }

    #[test]
    fn test_empty_tree() {
        let tree = PoolTree::from_pools(Vec::<Pool>::new()).unwrap();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
        assert_eq!(tree.utilization(PoolId(0)), None);
        assert!(tree.subnets(PoolId(0)).is_empty());
    }

    #[test]
    fn test_tree_rejects_bad_prefix() {
        let mut bad = pool("10.0.0.0/8", "bad");
        bad.prefix_length = 40;
        assert_eq!(
            PoolTree::from_pools([pool("10.0.0.0/8", "ok"), bad]).unwrap_err(),
            IpSpaceError::InvalidPrefix(40)
        );
    }

    #[test]
    fn test_bad_prefix_length() {
        let pool = Pool {
            network: Ipv4Addr::new(10, 0, 0, 0),
            prefix_length: 33,
            description: None,
            id: None,
            top_level: None,
        };
        assert_eq!(pool.cidr(), Err(IpSpaceError::InvalidPrefix(33)));
    }
}
