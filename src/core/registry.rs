use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::SeriesDescriptor;

/// Mutation commands accepted by the extent registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryAction {
    /// Replaces the descriptor stored under its id, or appends a new one.
    UpsertSeries(SeriesDescriptor),
    /// Deletes by id; removing an unknown id is a no-op.
    RemoveSeries { id: String },
}

/// Registration-ordered store of series descriptors.
///
/// The registry is a reducer: [`ExtentRegistry::dispatch`] never mutates in
/// place and instead produces the successor state, so callers can treat state
/// values as immutable snapshots. The `revision` counter stands in for
/// reference identity: it advances exactly when the stored series set changed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtentRegistry {
    series: IndexMap<String, SeriesDescriptor>,
    revision: u64,
}

impl ExtentRegistry {
    /// Applies one action and returns the successor state.
    #[must_use]
    pub fn dispatch(&self, action: RegistryAction) -> Self {
        let mut next = self.clone();
        match action {
            RegistryAction::UpsertSeries(descriptor) => {
                trace!(id = %descriptor.id, "registry upsert");
                let changed = next
                    .series
                    .get(&descriptor.id)
                    .map_or(true, |existing| *existing != descriptor);
                // IndexMap keeps the original slot for already-known ids, so
                // registration order survives updates.
                next.series.insert(descriptor.id.clone(), descriptor);
                if changed {
                    next.revision += 1;
                }
            }
            RegistryAction::RemoveSeries { id } => {
                trace!(id = %id, "registry remove");
                if next.series.shift_remove(&id).is_some() {
                    next.revision += 1;
                }
            }
        }
        next
    }

    /// Registered descriptors in registration order.
    pub fn series(&self) -> impl Iterator<Item = &SeriesDescriptor> {
        self.series.values()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SeriesDescriptor> {
        self.series.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.series.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Monotone counter advanced by every structural change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Ids currently registered, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtentRegistry, RegistryAction};
    use crate::core::{AxisBinding, SeriesDescriptor};

    fn descriptor(id: &str, xs: &[f64], ys: &[f64]) -> SeriesDescriptor {
        SeriesDescriptor::from_data(id, id, AxisBinding::new("x", "y"), xs, ys)
            .expect("valid descriptor")
    }

    #[test]
    fn upsert_appends_then_replaces_in_place() {
        let state = ExtentRegistry::default();
        let state = state.dispatch(RegistryAction::UpsertSeries(descriptor(
            "a",
            &[0.0, 1.0],
            &[0.0, 1.0],
        )));
        let state = state.dispatch(RegistryAction::UpsertSeries(descriptor(
            "b",
            &[2.0, 3.0],
            &[2.0, 3.0],
        )));
        let state = state.dispatch(RegistryAction::UpsertSeries(descriptor(
            "a",
            &[0.0, 9.0],
            &[0.0, 9.0],
        )));

        let ids: Vec<&str> = state.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(state.get("a").expect("a").x_extent.expect("extent").max, 9.0);
    }

    #[test]
    fn remove_unknown_id_is_noop_and_keeps_revision() {
        let state = ExtentRegistry::default()
            .dispatch(RegistryAction::UpsertSeries(descriptor("a", &[0.0], &[0.0])));
        let revision = state.revision();
        let next = state.dispatch(RegistryAction::RemoveSeries {
            id: "missing".to_owned(),
        });
        assert_eq!(next.revision(), revision);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn upserting_identical_descriptor_keeps_revision() {
        let series = descriptor("a", &[0.0, 1.0], &[0.0, 1.0]);
        let state =
            ExtentRegistry::default().dispatch(RegistryAction::UpsertSeries(series.clone()));
        let revision = state.revision();
        let next = state.dispatch(RegistryAction::UpsertSeries(series));
        assert_eq!(next.revision(), revision);
    }

    #[test]
    fn remove_then_readd_matches_never_removed() {
        let series_a = descriptor("a", &[0.0, 4.0], &[1.0, 2.0]);
        let series_b = descriptor("b", &[5.0, 6.0], &[3.0, 4.0]);

        let direct = ExtentRegistry::default()
            .dispatch(RegistryAction::UpsertSeries(series_a.clone()))
            .dispatch(RegistryAction::UpsertSeries(series_b.clone()));

        let round_trip = ExtentRegistry::default()
            .dispatch(RegistryAction::UpsertSeries(series_a.clone()))
            .dispatch(RegistryAction::UpsertSeries(series_b))
            .dispatch(RegistryAction::RemoveSeries {
                id: "a".to_owned(),
            })
            .dispatch(RegistryAction::UpsertSeries(series_a));

        let direct_series: Vec<_> = direct.series().cloned().collect();
        let round_series: Vec<_> = round_trip.series().cloned().collect();
        // Registration order differs ("a" re-registers after "b"), but the
        // stored descriptor set is identical.
        assert_eq!(direct_series.len(), round_series.len());
        for series in direct_series {
            assert_eq!(round_trip.get(&series.id), Some(&series));
        }
    }
}
