//! OSD map - storage daemons and the pool directory.

use crate::OsdId;

/// Snapshot of the object storage daemon map.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsdMap {
    /// Every OSD known to the cluster, in map order.
    pub osds: Vec<Osd>,

    /// Pool directory.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pools: Vec<Pool>,
}

impl OsdMap {
    /// Find an OSD record by id.
    pub fn get(&self, id: OsdId) -> Option<&Osd> {
        self.osds.iter().find(|o| o.osd == id)
    }
}

/// A single OSD record.
///
/// `up` and `in` are independent: an OSD can be running but drained
/// (`up`, not `in`) or stopped but still holding data (`in`, not `up`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Osd {
    /// OSD id.
    pub osd: OsdId,

    pub uuid: String,

    /// Whether the daemon is running.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::serde_helpers::flag"))]
    pub up: bool,

    /// Whether the daemon is part of the data distribution.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "in", deserialize_with = "crate::serde_helpers::flag")
    )]
    pub in_: bool,

    /// Map epoch the daemon last came up in.
    pub up_from: u64,

    pub public_addr: String,
    pub cluster_addr: String,
    pub heartbeat_back_addr: String,
    pub heartbeat_front_addr: String,
}

impl Osd {
    /// Create a record with the given flags and placeholder addresses.
    pub fn new(osd: OsdId, up: bool, in_: bool) -> Self {
        Self {
            osd,
            up,
            in_,
            ..Default::default()
        }
    }

    /// Crush name of this OSD (`osd.<id>`).
    pub fn name(&self) -> String {
        osd_name(self.osd)
    }
}

/// Crush name for an OSD id.
pub fn osd_name(id: OsdId) -> String {
    format!("osd.{}", id)
}

/// An entry of the pool directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pool {
    /// Pool id, the prefix of every placement group id in the pool.
    pub pool: u64,
    pub pool_name: String,
}

impl Pool {
    pub fn new(pool: u64, pool_name: impl Into<String>) -> Self {
        Self {
            pool,
            pool_name: pool_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osd_name() {
        assert_eq!(Osd::new(12, true, true).name(), "osd.12");
        assert_eq!(osd_name(0), "osd.0");
    }

    #[test]
    fn test_get_by_id() {
        let map = OsdMap {
            osds: vec![Osd::new(3, true, true), Osd::new(7, false, true)],
            pools: vec![],
        };
        assert!(!map.get(7).unwrap().up);
        assert!(map.get(4).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_integer_flags() {
        let json = r#"{
            "osds": [{
                "osd": 0,
                "uuid": "9c6e8e4a-0b0b-4a4e-9a3e-1f1e2d3c4b5a",
                "up": 1,
                "in": 0,
                "up_from": 42,
                "public_addr": "10.0.0.1:6800/1",
                "cluster_addr": "10.0.1.1:6800/1",
                "heartbeat_back_addr": "10.0.1.1:6801/1",
                "heartbeat_front_addr": "10.0.0.1:6801/1",
                "weight": 1.0
            }],
            "pools": [{"pool": 1, "pool_name": "rbd", "size": 3}]
        }"#;

        let map: OsdMap = serde_json::from_str(json).unwrap();
        let osd = &map.osds[0];
        assert!(osd.up);
        assert!(!osd.in_);
        assert_eq!(osd.up_from, 42);
        assert_eq!(map.pools[0].pool_name, "rbd");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"osds": [{"osd": 0, "up": true, "in": true}]}"#;
        assert!(serde_json::from_str::<OsdMap>(json).is_err());
    }
}
