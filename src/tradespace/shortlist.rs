use itertools::Itertools;

use crate::{prelude::*, tradespace::capex::CapexRecord};

/// Cheapest `k` records of every solar tier.
///
/// Tiers come out in ascending solar scale, records within a tier by ascending capex. The sort
/// is stable, so records of equal capex keep their input order.
#[instrument(skip(records), fields(n_records = records.len()))]
pub fn cheapest_per_tier(mut records: Vec<CapexRecord>, k: usize) -> Vec<CapexRecord> {
    records.sort_by_key(|record| (record.point.config.solar_scale, record.capex));
    let shortlist = records
        .into_iter()
        .chunk_by(|record| record.point.config.solar_scale)
        .into_iter()
        .flat_map(|(_, tier)| tier.take(k))
        .collect_vec();
    debug!(n_shortlisted = shortlist.len(), "shortlisted");
    shortlist
}
