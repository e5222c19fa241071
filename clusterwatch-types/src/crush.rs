//! Crush topology tree.

use crate::{osd_name, NodeId, OsdId};

/// Node type of a physical host bucket.
pub const HOST_TYPE: &str = "host";

/// Node type of a storage device leaf.
pub const OSD_TYPE: &str = "osd";

/// Snapshot of the crush tree as a flat node list.
///
/// Parent/child relationships are expressed through [`CrushNode::children`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsdTree {
    pub nodes: Vec<CrushNode>,
}

/// A node of the crush tree: a bucket (root, rack, host, ...) or a device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrushNode {
    pub id: NodeId,

    /// Bucket or device type, e.g. `"root"`, `"host"`, `"osd"`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub node_type: String,

    pub name: String,

    /// Ids of the direct children. Devices have none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<NodeId>,
}

impl CrushNode {
    /// Create a bucket node of an arbitrary type.
    pub fn bucket(
        id: NodeId,
        node_type: impl Into<String>,
        name: impl Into<String>,
        children: Vec<NodeId>,
    ) -> Self {
        Self {
            id,
            node_type: node_type.into(),
            name: name.into(),
            children,
        }
    }

    /// Create a host bucket.
    pub fn host(id: NodeId, name: impl Into<String>, children: Vec<NodeId>) -> Self {
        Self::bucket(id, HOST_TYPE, name, children)
    }

    /// Create a device leaf for an OSD, named `osd.<id>`.
    pub fn osd(id: OsdId) -> Self {
        Self {
            id: NodeId::from(id),
            node_type: OSD_TYPE.to_string(),
            name: osd_name(id),
            children: Vec::new(),
        }
    }

    pub fn is_host(&self) -> bool {
        self.node_type == HOST_TYPE
    }

    pub fn is_osd(&self) -> bool {
        self.node_type == OSD_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let host = CrushNode::host(-2, "node-a", vec![0]);
        assert!(host.is_host());
        assert!(!host.is_osd());

        let osd = CrushNode::osd(4);
        assert!(osd.is_osd());
        assert_eq!(osd.id, 4);
        assert_eq!(osd.name, "osd.4");
        assert!(osd.children.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_tree() {
        let json = r#"{"nodes": [
            {"id": -1, "type": "root", "name": "default", "children": [-2]},
            {"id": -2, "type": "host", "name": "node-a", "children": [0]},
            {"id": 0, "type": "osd", "name": "osd.0", "status": "up"}
        ]}"#;
        let tree: OsdTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.nodes.len(), 3);
        assert!(tree.nodes[1].is_host());
        assert!(tree.nodes[2].children.is_empty());
    }
}
