use serde::{Deserialize, Deserializer, Serialize};

/// One aggregated cost record as returned by the allocation API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Allocation {
    pub name: String,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(deserialize_with = "null_as_zero")]
    pub minutes: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub cpu_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub cpu_efficiency: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub ram_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub ram_efficiency: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub gpu_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub pv_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub network_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub shared_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub external_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub total_cost: f64,
    #[serde(deserialize_with = "null_as_zero")]
    pub total_efficiency: f64,
}

/// The backend reports undefined figures (e.g. efficiency with no requests) as null
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl Allocation {
    /// Split the aggregated name into one value per aggregation key.
    ///
    /// Multi-key aggregations are joined with `/` by the backend. Missing
    /// trailing segments (as with the idle record) come back empty.
    pub fn key_values(&self, keys: usize) -> Vec<&str> {
        let mut values: Vec<&str> = self.name.splitn(keys.max(1), '/').collect();
        values.resize(keys, "");
        values
    }
}

/// Allocation records for a single accumulated window, in backend order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationSet {
    pub allocations: Vec<Allocation>,
}

impl AllocationSet {
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Allocation> {
        self.allocations.iter()
    }
}

impl FromIterator<Allocation> for AllocationSet {
    fn from_iter<I: IntoIterator<Item = Allocation>>(iter: I) -> Self {
        Self {
            allocations: iter.into_iter().collect(),
        }
    }
}
