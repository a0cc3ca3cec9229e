// Input records and the packing result handed back to callers

use serde::{Deserialize, Serialize};

/// Largest quantity the MILP backends represent exactly; they model
/// coefficients as `f64`. Loaders and the gRPC mapper reject anything larger.
pub const MAX_EXACT_QUANTITY: u64 = 1 << 53;

/// A container that may be chosen to hold items.
///
/// `volume_capacity` and `cost` above [`MAX_EXACT_QUANTITY`] lose precision
/// once they become solver coefficients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    #[serde(alias = "display_name")]
    pub id: String,
    #[serde(alias = "volume")]
    pub volume_capacity: u64,
    pub cost: u64,
}

impl Bin {
    pub fn new(id: impl Into<String>, volume_capacity: u64, cost: u64) -> Self {
        Self {
            id: id.into(),
            volume_capacity,
            cost,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.volume_capacity <= MAX_EXACT_QUANTITY && self.cost <= MAX_EXACT_QUANTITY
    }
}

/// Something that has to be packed into exactly one bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(alias = "display_name")]
    pub id: String,
    pub volume: u64,
}

impl Item {
    pub fn new(id: impl Into<String>, volume: u64) -> Self {
        Self {
            id: id.into(),
            volume,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.volume <= MAX_EXACT_QUANTITY
    }
}

/// A chosen bin together with the items packed into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedBin {
    #[serde(flatten)]
    pub bin: Bin,
    pub items: Vec<Item>,
}

impl PackedBin {
    /// Saturates at `u64::MAX`
    pub fn used_volume(&self) -> u64 {
        saturating_sum(self.items.iter().map(|item| item.volume))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Bins chosen by the solver, in input order, each with its items in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Packing {
    bins: Vec<PackedBin>,
}

impl Packing {
    pub fn new(bins: Vec<PackedBin>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &[PackedBin] {
        &self.bins
    }

    pub fn into_bins(self) -> Vec<PackedBin> {
        self.bins
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Saturates at `u64::MAX`
    pub fn total_cost(&self) -> u64 {
        saturating_sum(self.bins.iter().map(|packed| packed.bin.cost))
    }

    /// Committed capacity of the chosen bins, not the volume actually filled.
    /// Saturates at `u64::MAX`.
    pub fn total_volume(&self) -> u64 {
        saturating_sum(self.bins.iter().map(|packed| packed.bin.volume_capacity))
    }

    /// Saturates at `u64::MAX`
    pub fn used_volume(&self) -> u64 {
        saturating_sum(self.bins.iter().map(PackedBin::used_volume))
    }

    /// The scalarized objective this packing scores, given the count penalty
    /// of the instance it was solved from. Exact for any `u64` inputs.
    pub fn objective_value(&self, count_penalty: u64) -> u128 {
        self.bins
            .iter()
            .map(|packed| {
                count_penalty as u128 + packed.bin.cost as u128 + packed.bin.volume_capacity as u128
            })
            .sum()
    }

    /// The bin holding the item with the given id
    pub fn bin_of(&self, item_id: &str) -> Option<&Bin> {
        self.bins
            .iter()
            .find(|packed| packed.items.iter().any(|item| item.id == item_id))
            .map(|packed| &packed.bin)
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Packing {
        Packing::new(vec![
            PackedBin {
                bin: Bin::new("A", 10, 5),
                items: vec![Item::new("x", 6), Item::new("y", 3)],
            },
            PackedBin {
                bin: Bin::new("B", 5, 1),
                items: vec![Item::new("z", 2)],
            },
        ])
    }

    #[test]
    fn test_totals() {
        let packing = sample();

        assert_eq!(packing.bin_count(), 2);
        assert_eq!(packing.total_cost(), 6);
        assert_eq!(packing.total_volume(), 15);
        assert_eq!(packing.used_volume(), 11);
        assert_eq!(packing.objective_value(10), 2 * 10 + 6 + 15);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let packing = Packing::new(vec![
            PackedBin {
                bin: Bin::new("A", u64::MAX, u64::MAX - 1),
                items: vec![Item::new("x", u64::MAX)],
            },
            PackedBin {
                bin: Bin::new("B", u64::MAX, 3),
                items: vec![Item::new("y", 7)],
            },
        ]);

        assert_eq!(packing.total_cost(), u64::MAX);
        assert_eq!(packing.total_volume(), u64::MAX);
        assert_eq!(packing.used_volume(), u64::MAX);
        assert_eq!(packing.bins()[1].used_volume(), 7);
        assert_eq!(
            packing.objective_value(u64::MAX),
            4 * u64::MAX as u128 + (u64::MAX - 1) as u128 + 3
        );
    }

    #[test]
    fn test_exact_range() {
        assert!(Bin::new("A", MAX_EXACT_QUANTITY, 1).is_exact());
        assert!(!Bin::new("A", 1, MAX_EXACT_QUANTITY + 1).is_exact());
        assert!(Item::new("x", MAX_EXACT_QUANTITY).is_exact());
        assert!(!Item::new("x", u64::MAX).is_exact());
    }

    #[test]
    fn test_bin_of() {
        let packing = sample();

        assert_eq!(packing.bin_of("z").map(|b| b.id.as_str()), Some("B"));
        assert_eq!(packing.bin_of("missing"), None);
    }

    #[test]
    fn test_serializes_bins_with_items() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json[0]["id"], "A");
        assert_eq!(json[0]["volume_capacity"], 10);
        assert_eq!(json[0]["items"][1]["id"], "y");
        assert_eq!(json[1]["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_bin_accepts_display_name_and_volume() {
        let bin: Bin =
            serde_json::from_str(r#"{"display_name": "Crate", "volume": 120, "cost": 15}"#)
                .unwrap();

        assert_eq!(bin, Bin::new("Crate", 120, 15));
    }
}
