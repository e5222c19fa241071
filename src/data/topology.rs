//! Host resolution from the crush tree.
//!
//! Only direct `host -> osd` edges are followed. An OSD nested under an
//! intermediate bucket (for example `host -> chassis -> osd`) is not
//! resolved to any host. The host name is the crush bucket name, which is
//! not guaranteed to match the name the machine reports for itself.

use std::collections::{BTreeMap, HashMap};

use clusterwatch_types::{osd_name, CrushNode, NodeId, OsdId, OsdTree};
use tracing::trace;

/// Lookup from OSD name (`osd.<id>`) to the name of its host bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostIndex {
    hosts: BTreeMap<String, String>,
}

impl HostIndex {
    /// Build the index from a crush tree snapshot.
    pub fn from_tree(tree: &OsdTree) -> Self {
        let nodes_by_id: HashMap<NodeId, &CrushNode> =
            tree.nodes.iter().map(|node| (node.id, node)).collect();

        let mut hosts = BTreeMap::new();
        for host in tree.nodes.iter().filter(|node| node.is_host()) {
            for child_id in &host.children {
                match nodes_by_id.get(child_id) {
                    Some(child) if child.is_osd() => {
                        hosts.insert(child.name.clone(), host.name.clone());
                    }
                    Some(_) => {}
                    None => trace!(host = %host.name, child = child_id, "child not in tree"),
                }
            }
        }

        Self { hosts }
    }

    /// Host of the device with the given crush name.
    pub fn host_of(&self, name: &str) -> Option<&str> {
        self.hosts.get(name).map(String::as_str)
    }

    /// Host of the given OSD.
    pub fn host_of_osd(&self, id: OsdId) -> Option<&str> {
        self.host_of(&osd_name(id))
    }

    /// Number of resolved devices.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_child_resolves() {
        let tree = OsdTree {
            nodes: vec![
                CrushNode::bucket(-1, "root", "default", vec![-2]),
                CrushNode::host(-2, "node-a", vec![3]),
                CrushNode::osd(3),
            ],
        };

        let index = HostIndex::from_tree(&tree);

        assert_eq!(index.host_of("osd.3"), Some("node-a"));
        assert_eq!(index.host_of_osd(3), Some("node-a"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_nested_device_is_unresolved() {
        let tree = OsdTree {
            nodes: vec![
                CrushNode::host(-2, "node-a", vec![-3]),
                CrushNode::bucket(-3, "rack", "rack-1", vec![5]),
                CrushNode::osd(5),
            ],
        };

        let index = HostIndex::from_tree(&tree);

        assert_eq!(index.host_of_osd(5), None);
        assert!(index.is_empty());
    }

    #[test]
    fn test_missing_child_is_skipped() {
        let tree = OsdTree {
            nodes: vec![CrushNode::host(-2, "node-a", vec![0, 1]), CrushNode::osd(1)],
        };

        let index = HostIndex::from_tree(&tree);

        assert_eq!(index.host_of_osd(0), None);
        assert_eq!(index.host_of_osd(1), Some("node-a"));
    }

    #[test]
    fn test_multiple_hosts() {
        let tree = OsdTree {
            nodes: vec![
                CrushNode::host(-2, "node-a", vec![0, 1]),
                CrushNode::host(-3, "node-b", vec![2]),
                CrushNode::osd(0),
                CrushNode::osd(1),
                CrushNode::osd(2),
            ],
        };

        let index = HostIndex::from_tree(&tree);

        assert_eq!(index.host_of_osd(1), Some("node-a"));
        assert_eq!(index.host_of_osd(2), Some("node-b"));
    }
}
