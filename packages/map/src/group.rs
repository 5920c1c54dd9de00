//! Grouping of records by filming location.

use std::collections::BTreeMap;

use car_map_car_models::{Dataset, LngLat, RecordId};
use serde::Serialize;

/// A `(Film_City, Film_State)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LocationKey {
    pub city: String,
    pub state: String,
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// The records filmed at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationGroup {
    /// The location.
    pub key: LocationKey,
    /// Member records, in subset order.
    pub records: Vec<RecordId>,
    /// Coordinates of the first member; every member is assumed to share
    /// them. `None` if the first member has no coordinates.
    pub anchor: Option<LngLat>,
}

impl LocationGroup {
    /// Number of records in the group.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// Groups `ids` by location, in order of first appearance.
#[must_use]
pub fn group_by_location(dataset: &Dataset, ids: &[RecordId]) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::new();
    let mut index: BTreeMap<LocationKey, usize> = BTreeMap::new();

    for (id, record) in ids.iter().filter_map(|id| Some((*id, dataset.get(*id)?))) {
        let key = LocationKey {
            city: record.film_city.clone(),
            state: record.film_state.clone(),
        };
        if let Some(&i) = index.get(&key) {
            groups[i].records.push(id);
        } else {
            index.insert(key.clone(), groups.len());
            groups.push(LocationGroup {
                key,
                records: vec![id],
                anchor: record.coordinates,
            });
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use car_map_car_models::{CarRecord, Ratings};

    use super::*;

    fn car(city: &str, state: &str, coordinates: Option<LngLat>) -> CarRecord {
        CarRecord {
            make: "Ford".to_string(),
            model: "GT".to_string(),
            year: "2006".to_string(),
            year_value: Some(2006),
            film_city: city.to_string(),
            film_state: state.to_string(),
            coordinates,
            ratings: Ratings::default(),
        }
    }

    #[test]
    fn shared_location_uses_first_coordinates() {
        let dataset = Dataset::new(vec![
            car("Austin", "TX", Some(LngLat::new(-97.74, 30.27))),
            car("Austin", "TX", Some(LngLat::new(-97.80, 30.30))),
        ]);
        let ids: Vec<RecordId> = dataset.ids().collect();
        let groups = group_by_location(&dataset, &ids);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[0].anchor, Some(LngLat::new(-97.74, 30.27)));
        assert_eq!(groups[0].key.to_string(), "Austin, TX");
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let dataset = Dataset::new(vec![
            car("Denver", "CO", None),
            car("Austin", "TX", None),
            car("Denver", "CO", None),
            car("Austin", "MN", None),
        ]);
        let ids: Vec<RecordId> = dataset.ids().collect();
        let labels: Vec<String> = group_by_location(&dataset, &ids)
            .iter()
            .map(|g| g.key.to_string())
            .collect();
        assert_eq!(labels, ["Denver, CO", "Austin, TX", "Austin, MN"]);
    }

    #[test]
    fn anchor_comes_from_first_member_only() {
        let dataset = Dataset::new(vec![
            car("Austin", "TX", None),
            car("Austin", "TX", Some(LngLat::new(-97.74, 30.27))),
        ]);
        let ids: Vec<RecordId> = dataset.ids().collect();
        let groups = group_by_location(&dataset, &ids);
        assert_eq!(groups[0].anchor, None);
        assert_eq!(groups[0].count(), 2);
    }

    #[test]
    fn only_listed_ids_are_grouped() {
        let dataset = Dataset::new(vec![
            car("Austin", "TX", None),
            car("Denver", "CO", None),
            car("Austin", "TX", None),
        ]);
        let groups = group_by_location(&dataset, &[RecordId(2), RecordId(7)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].records, [RecordId(2)]);
        assert!(group_by_location(&dataset, &[]).is_empty());
    }
}
